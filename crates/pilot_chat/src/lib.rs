//! # pilot_chat - Simulated Agent Chat for DataPilot
//!
//! This crate provides the session state engine behind the agent chat:
//! - Text submissions routed to one of four agents
//! - Canned agent replies delivered after a fixed delay
//! - CSV/JSON uploads with line previews and a per-session content store
//! - Change notifications for read-only consumers
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │  submit_text /  │────▶│  Intent Router  │────▶│  Reply Timer    │
//! │  submit_file    │     └─────────────────┘     └────────┬────────┘
//! └────────┬────────┘                                      │
//!          ▼                                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │     Session State (transcript, upload index, content store)     │
//! └────────────────────────────────┬────────────────────────────────┘
//!                                  ▼
//!                        ┌───────────────────┐
//!                        │  SessionEvent     │
//!                        │  subscribers      │
//!                        └───────────────────┘
//! ```

pub mod agents;
pub mod config;
pub mod content;
pub mod error;
pub mod session;
pub mod types;

pub use agents::*;
pub use config::*;
pub use content::*;
pub use error::*;
pub use session::*;
pub use types::*;
