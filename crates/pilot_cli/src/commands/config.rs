//! Config command - Print the effective configuration.

use anyhow::Result;
use clap::Args;

use pilot_router::IntentRouter;

use crate::config::PilotConfig;

#[derive(Args)]
pub struct ConfigArgs {
    /// Also list the routing rules in priority order
    #[arg(long)]
    rules: bool,
}

pub async fn execute(args: ConfigArgs, config: &PilotConfig) -> Result<()> {
    print!("{}", config.to_yaml()?);

    if args.rules {
        let router = IntentRouter::from_config(&config.router)?;
        println!();
        println!("📋 Routing rules:");
        for (i, rule) in router.rules().iter().enumerate() {
            println!("   {}. {:<14} {}", i + 1, rule.category.to_string(), rule.pattern());
        }
        let default = router.default_route();
        println!("   default: {} ({})", default.category, default.status_line);
    }
    Ok(())
}
