//! Agent roster and canned replies.
//!
//! Each category has exactly one canned reply set. Replies are looked up,
//! never generated.

use chrono::{Duration, Utc};

use pilot_router::AgentCategory;

use crate::types::{ChartPayload, Message, Sender};

/// Prompt logged after every upload
pub const UPLOAD_PROMPT: &str =
    "Dataset uploaded. Ask the agents to clean, analyze, model or summarize it.";

/// Profile of an agent shown in the roster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentProfile {
    pub sender: Sender,
    pub category: AgentCategory,
    pub description: &'static str,
}

impl AgentProfile {
    pub fn display_name(&self) -> &'static str {
        self.sender.display_name()
    }
}

/// All agents, in rule priority order
pub fn roster() -> Vec<AgentProfile> {
    AgentCategory::ALL
        .into_iter()
        .map(|category| AgentProfile {
            sender: Sender::for_category(category),
            category,
            description: description(category),
        })
        .collect()
}

fn description(category: AgentCategory) -> &'static str {
    match category {
        AgentCategory::Preprocessing => "Cleans data, removes duplicates and encodes columns",
        AgentCategory::Exploration => "Explores distributions, trends and correlations",
        AgentCategory::Modeling => "Trains models and reports evaluation metrics",
        AgentCategory::Insight => "Turns results into business insights",
    }
}

/// Attachment delivered with a canned reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CannedAttachment {
    File {
        name: String,
        mime_type: String,
        content: String,
    },
    Chart {
        caption: String,
        chart: ChartPayload,
    },
}

/// Canned reply set for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CannedReply {
    pub sender: Sender,
    pub text: String,
    pub attachment: Option<CannedAttachment>,
}

/// Source of canned replies
#[cfg_attr(test, mockall::automock)]
pub trait ReplyCatalog: Send + Sync {
    /// Reply set for a category
    fn reply_for(&self, category: AgentCategory) -> CannedReply;
}

/// The built-in reply table
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedReplies;

impl ReplyCatalog for CannedReplies {
    fn reply_for(&self, category: AgentCategory) -> CannedReply {
        let sender = Sender::for_category(category);
        match category {
            AgentCategory::Preprocessing => CannedReply {
                sender,
                text: PREPROCESSING_REPLY.to_string(),
                attachment: Some(CannedAttachment::File {
                    name: "cleaned_data.csv".to_string(),
                    mime_type: "text/csv".to_string(),
                    content: CLEANED_DATA_CSV.to_string(),
                }),
            },
            AgentCategory::Exploration => CannedReply {
                sender,
                text: EXPLORATION_REPLY.to_string(),
                attachment: Some(CannedAttachment::Chart {
                    caption: "Correlation with churn by feature".to_string(),
                    chart: ChartPayload::new("Feature Correlation", vec![72, 48, 35, 61, 27]),
                }),
            },
            AgentCategory::Modeling => CannedReply {
                sender,
                text: MODELING_REPLY.to_string(),
                attachment: Some(CannedAttachment::File {
                    name: "predictions.csv".to_string(),
                    mime_type: "text/csv".to_string(),
                    content: PREDICTIONS_CSV.to_string(),
                }),
            },
            AgentCategory::Insight => CannedReply {
                sender,
                text: INSIGHT_REPLY.to_string(),
                attachment: None,
            },
        }
    }
}

/// Messages a session can open with
pub fn seed_messages() -> Vec<Message> {
    let now = Utc::now();
    vec![
        Message::agent(
            Sender::DataEngineer,
            "Data cleaning process completed successfully. Found and resolved 847 anomalies in the dataset.",
        )
        .at(now - Duration::minutes(5)),
        Message::user("Can you show me the outlier detection results?").at(now - Duration::minutes(4)),
        Message::chart(
            Sender::DataAnalyst,
            "Here are the outlier detection results. The model identified 23 significant outliers across 5 features.",
            ChartPayload::new("Outlier Detection Results", vec![65, 45, 80, 30, 55]),
        )
        .at(now - Duration::minutes(3)),
    ]
}

const PREPROCESSING_REPLY: &str = "Data cleaning complete. I removed 128 duplicate rows, \
imputed 342 null values and encoded 4 categorical columns. The cleaned dataset is attached.";

const EXPLORATION_REPLY: &str = "Exploratory analysis complete. Income is right-skewed, \
tenure and churn show a strong negative correlation (r = -0.61), and monthly revenue trends \
upward through Q3.";

const MODELING_REPLY: &str = "Model training complete. Gradient boosting reached 0.91 accuracy, \
0.88 F1 and 0.94 ROC AUC on the hold-out set. Predictions are attached.";

const INSIGHT_REPLY: &str = "Key insight: enterprise customers with declining usage are three \
times more likely to churn. Targeted retention offers for this group could recover about 14% \
of at-risk revenue.";

const CLEANED_DATA_CSV: &str = "customer_id,age,income,segment,churned
1001,34,52000,retail,0
1002,45,87000,enterprise,1
1003,29,41000,retail,0
1004,52,120000,enterprise,0
1005,38,63000,smb,1
1006,41,58000,smb,0
";

const PREDICTIONS_CSV: &str = "customer_id,churn_probability,predicted_label
1001,0.12,0
1002,0.81,1
1003,0.07,0
1004,0.34,0
1005,0.66,1
1006,0.22,0
";
