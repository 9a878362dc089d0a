//! Route command - Show which agent handles a request.

use anyhow::Result;
use clap::Args;
use tracing::debug;

use pilot_chat::Sender;
use pilot_router::IntentRouter;

use super::InvalidArgs;
use crate::config::PilotConfig;

#[derive(Args)]
pub struct RouteArgs {
    /// Request text
    #[arg(required = true, num_args = 1..)]
    text: Vec<String>,

    /// Print the decision as JSON
    #[arg(long)]
    json: bool,
}

pub async fn execute(args: RouteArgs, config: &PilotConfig) -> Result<()> {
    let text = args.text.join(" ");
    if text.trim().is_empty() {
        return Err(InvalidArgs("request text is empty".to_string()).into());
    }

    let router = IntentRouter::from_config(&config.router)?;
    let decision = router.route(&text);
    debug!("Routed {:?} to {}", text, decision.category);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
        return Ok(());
    }

    let agent = Sender::for_category(decision.category);
    println!("🧭 {}", decision.status_line);
    println!("   Category: {}", decision.category);
    println!("   Agent:    {}", agent.display_name());
    match decision.matched_rule.and_then(|i| router.rules().get(i).map(|r| (i, r))) {
        Some((index, rule)) => println!("   Rule:     #{} ({})", index + 1, rule.pattern()),
        None => println!("   Rule:     default"),
    }
    Ok(())
}
