//! Core types for the chat session engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pilot_router::{AgentCategory, RouteDecision};

use crate::content::ContentHandle;

/// Unique identifier for a chat session
pub type SessionId = String;

/// Identifier of a scheduled agent reply
pub type ReplyId = u64;

/// Who sent a message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Sender {
    User,
    System,
    DataEngineer,
    DataAnalyst,
    DataScientist,
    Insight,
}

impl Sender {
    /// The agent that answers requests of a category
    pub fn for_category(category: AgentCategory) -> Self {
        match category {
            AgentCategory::Preprocessing => Self::DataEngineer,
            AgentCategory::Exploration => Self::DataAnalyst,
            AgentCategory::Modeling => Self::DataScientist,
            AgentCategory::Insight => Self::Insight,
        }
    }

    /// Category handled by this sender, if it is an agent
    pub fn category(&self) -> Option<AgentCategory> {
        match self {
            Self::DataEngineer => Some(AgentCategory::Preprocessing),
            Self::DataAnalyst => Some(AgentCategory::Exploration),
            Self::DataScientist => Some(AgentCategory::Modeling),
            Self::Insight => Some(AgentCategory::Insight),
            Self::User | Self::System => None,
        }
    }

    /// Whether this sender is one of the agents
    pub fn is_agent(&self) -> bool {
        self.category().is_some()
    }

    /// Get the display name for this sender
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::User => "You",
            Self::System => "System",
            Self::DataEngineer => "Data Engineer",
            Self::DataAnalyst => "Data Analyst",
            Self::DataScientist => "Data Scientist",
            Self::Insight => "Insight Agent",
        }
    }
}

/// Bar chart attached to an agent message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartPayload {
    /// Chart caption
    pub title: String,
    /// Bar heights as percentages
    pub values: Vec<u8>,
}

impl ChartPayload {
    pub fn new(title: impl Into<String>, values: Vec<u8>) -> Self {
        Self {
            title: title.into(),
            values,
        }
    }
}

/// File referenced by a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileAttachment {
    #[serde(rename = "fileName")]
    pub file_name: String,
    /// Content handle resolvable through the session's content store
    #[serde(rename = "fileUrl")]
    pub file_ref: ContentHandle,
    /// First lines of a text payload (at most five)
    #[serde(rename = "previewLines", default, skip_serializing_if = "Vec::is_empty")]
    pub preview_lines: Vec<String>,
}

/// What a message carries; the file fields only exist for file messages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Log,
    Chart(ChartPayload),
    File(FileAttachment),
}

impl MessageKind {
    /// Lowercase kind label
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Log => "log",
            Self::Chart(_) => "chart",
            Self::File(_) => "file",
        }
    }
}

/// A single transcript entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Unique message ID (UUID)
    pub id: String,
    pub sender: Sender,
    pub content: String,
    /// When the message was created
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: MessageKind,
}

impl Message {
    fn new(sender: Sender, content: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender,
            content: content.into(),
            timestamp: Utc::now(),
            kind,
        }
    }

    /// Create a user text message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Sender::User, content, MessageKind::Text)
    }

    /// Create a system log line
    pub fn system_log(content: impl Into<String>) -> Self {
        Self::new(Sender::System, content, MessageKind::Log)
    }

    /// Create an agent text message
    pub fn agent(sender: Sender, content: impl Into<String>) -> Self {
        Self::new(sender, content, MessageKind::Text)
    }

    /// Create a chart message
    pub fn chart(sender: Sender, content: impl Into<String>, chart: ChartPayload) -> Self {
        Self::new(sender, content, MessageKind::Chart(chart))
    }

    /// Create a file message
    pub fn file(sender: Sender, attachment: FileAttachment) -> Self {
        let content = attachment.file_name.clone();
        Self::new(sender, content, MessageKind::File(attachment))
    }

    /// Backdate the message
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// The attached file, if this is a file message
    pub fn attachment(&self) -> Option<&FileAttachment> {
        match &self.kind {
            MessageKind::File(file) => Some(file),
            _ => None,
        }
    }

    /// The chart payload, if this is a chart message
    pub fn chart_payload(&self) -> Option<&ChartPayload> {
        match &self.kind {
            MessageKind::Chart(chart) => Some(chart),
            _ => None,
        }
    }
}

/// Change notifications published to subscribers
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum SessionEvent {
    MessageAppended { message: Message },
    PendingChanged { pending: bool },
    UploadRecorded {
        #[serde(rename = "fileName")]
        file_name: String,
        handle: ContentHandle,
    },
    Closed,
}

/// Why a submission was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IgnoreReason {
    /// Text was empty after trimming
    EmptyText,
    /// No file was provided
    MissingFile,
    /// A reply is still pending and the policy rejects new submissions
    ReplyPending,
    /// The session has been closed
    SessionClosed,
    /// Text needs a Tokio runtime to schedule its reply
    NoRuntime,
}

/// Result of a submission. Invalid input is absorbed, never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Text was accepted and a reply scheduled
    TextAccepted {
        route: RouteDecision,
        reply_id: ReplyId,
        /// Replies cancelled by this submission (supersede policy)
        superseded: usize,
    },
    /// File was recorded in the upload index
    FileAccepted {
        handle: ContentHandle,
        preview_lines: usize,
    },
    Ignored(IgnoreReason),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Ignored(_))
    }

    /// The routing decision of an accepted text submission
    pub fn route(&self) -> Option<&RouteDecision> {
        match self {
            Self::TextAccepted { route, .. } => Some(route),
            _ => None,
        }
    }
}
