//! Chat session engine.
//!
//! A [`ChatSession`] owns the transcript, the upload index and the content
//! store. It is mutated only through [`ChatSession::submit_text`],
//! [`ChatSession::submit_file`] and the reply timers those schedule, and
//! publishes every change as a [`SessionEvent`].
//!
//! Reply timers are Tokio tasks, so text submissions must be made from
//! within a Tokio runtime.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use pilot_router::{AgentCategory, IntentRouter};

use crate::agents::{seed_messages, CannedAttachment, CannedReplies, ReplyCatalog, UPLOAD_PROMPT};
use crate::config::{ChatConfig, PendingPolicy};
use crate::content::{preview_lines, ContentHandle, ContentStore, UploadedFile};
use crate::types::{
    FileAttachment, IgnoreReason, Message, ReplyId, Sender, SessionEvent, SessionId,
    SubmitOutcome,
};

const EVENT_CAPACITY: usize = 256;

/// Mutable session state, guarded by the session mutex
#[derive(Default)]
struct SessionState {
    transcript: Vec<Message>,
    upload_index: HashMap<String, ContentHandle>,
    content: ContentStore,
    /// Replies scheduled but not yet delivered, keyed by reply id
    in_flight: HashMap<ReplyId, JoinHandle<()>>,
    next_reply_id: ReplyId,
    closed: bool,
}

impl SessionState {
    fn pending(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Abort every in-flight reply and return how many were cancelled
    fn cancel_replies(&mut self) -> usize {
        let cancelled = self.in_flight.len();
        for (_, handle) in self.in_flight.drain() {
            handle.abort();
        }
        cancelled
    }
}

struct SessionInner {
    id: SessionId,
    config: ChatConfig,
    router: IntentRouter,
    catalog: Arc<dyn ReplyCatalog>,
    state: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionInner {
    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn append(&self, state: &mut SessionState, message: Message) {
        state.transcript.push(message.clone());
        self.publish(SessionEvent::MessageAppended { message });
    }

    /// Append the canned reply for `category`, unless the reply was cancelled
    fn deliver_reply(&self, reply_id: ReplyId, category: AgentCategory) {
        let mut state = self.state.lock();
        if state.in_flight.remove(&reply_id).is_none() {
            debug!(session = %self.id, reply_id, "Dropping cancelled reply");
            return;
        }

        let reply = self.catalog.reply_for(category);
        self.append(&mut state, Message::agent(reply.sender, reply.text));

        match reply.attachment {
            Some(CannedAttachment::File {
                name,
                mime_type,
                content,
            }) => {
                let preview = preview_lines(&content, self.config.preview_limit());
                let handle = state
                    .content
                    .insert(name.clone(), Some(mime_type), content.into_bytes());
                let attachment = FileAttachment {
                    file_name: name,
                    file_ref: handle,
                    preview_lines: preview,
                };
                self.append(&mut state, Message::file(reply.sender, attachment));
            }
            Some(CannedAttachment::Chart { caption, chart }) => {
                self.append(&mut state, Message::chart(reply.sender, caption, chart));
            }
            None => {}
        }

        debug!(session = %self.id, reply_id, %category, "Delivered agent reply");
        if !state.pending() {
            self.publish(SessionEvent::PendingChanged { pending: false });
        }
    }
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        self.state.get_mut().cancel_replies();
    }
}

/// Handle to a chat session. Clones share the same session.
#[derive(Clone)]
pub struct ChatSession {
    inner: Arc<SessionInner>,
}

impl ChatSession {
    /// Open a session with the built-in router and replies
    pub fn new(config: ChatConfig) -> Self {
        Self::builder().config(config).build()
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn config(&self) -> &ChatConfig {
        &self.inner.config
    }

    /// Submit user text.
    ///
    /// Appends a user message and a routing log line, then schedules the
    /// canned agent reply after the configured delay. Blank text is ignored.
    pub fn submit_text(&self, text: &str) -> SubmitOutcome {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            debug!(session = %self.inner.id, "Ignoring blank submission");
            return SubmitOutcome::Ignored(IgnoreReason::EmptyText);
        }
        // Checked before any state change so a rejected submission leaves no trace
        let Ok(runtime) = Handle::try_current() else {
            debug!(session = %self.inner.id, "No Tokio runtime, cannot schedule a reply");
            return SubmitOutcome::Ignored(IgnoreReason::NoRuntime);
        };

        let inner = &self.inner;
        let mut state = inner.state.lock();
        if state.closed {
            return SubmitOutcome::Ignored(IgnoreReason::SessionClosed);
        }

        let was_pending = state.pending();
        let superseded = match inner.config.pending_policy {
            PendingPolicy::Reject if was_pending => {
                debug!(session = %inner.id, "Reply pending, rejecting submission");
                return SubmitOutcome::Ignored(IgnoreReason::ReplyPending);
            }
            PendingPolicy::Supersede => state.cancel_replies(),
            _ => 0,
        };

        let route = inner.router.route(trimmed);
        inner.append(&mut state, Message::user(trimmed));
        inner.append(&mut state, Message::system_log(route.status_line.clone()));

        let reply_id = state.next_reply_id;
        state.next_reply_id += 1;

        let weak: Weak<SessionInner> = Arc::downgrade(&self.inner);
        let delay = inner.config.reply_delay();
        let category = route.category;
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                inner.deliver_reply(reply_id, category);
            }
        });
        state.in_flight.insert(reply_id, handle);

        if !was_pending {
            inner.publish(SessionEvent::PendingChanged { pending: true });
        }

        info!(
            session = %inner.id,
            category = %route.category,
            reply_id,
            superseded,
            "Accepted text submission"
        );
        SubmitOutcome::TextAccepted {
            route,
            reply_id,
            superseded,
        }
    }

    /// Submit an uploaded file.
    ///
    /// CSV and JSON files get a preview of their first lines. The file is
    /// stored and indexed by name, replacing any earlier upload of the same
    /// name. Uploads do not trigger routing or a reply.
    pub fn submit_file(&self, file: Option<UploadedFile>) -> SubmitOutcome {
        let Some(file) = file else {
            debug!(session = %self.inner.id, "Ignoring empty file selection");
            return SubmitOutcome::Ignored(IgnoreReason::MissingFile);
        };

        let inner = &self.inner;
        let mut state = inner.state.lock();
        if state.closed {
            return SubmitOutcome::Ignored(IgnoreReason::SessionClosed);
        }

        let preview = if file.is_previewable() {
            file.preview_lines(inner.config.preview_limit())
        } else {
            Vec::new()
        };
        let preview_count = preview.len();

        let UploadedFile {
            name,
            mime_type,
            bytes,
        } = file;
        let handle = state.content.insert(name.clone(), mime_type, bytes);
        if let Some(previous) = state.upload_index.insert(name.clone(), handle.clone()) {
            debug!(session = %inner.id, file = %name, %previous, "Replacing earlier upload");
        }
        inner.publish(SessionEvent::UploadRecorded {
            file_name: name.clone(),
            handle: handle.clone(),
        });

        let attachment = FileAttachment {
            file_name: name.clone(),
            file_ref: handle.clone(),
            preview_lines: preview,
        };
        inner.append(&mut state, Message::file(Sender::User, attachment));
        inner.append(&mut state, Message::system_log(UPLOAD_PROMPT));

        info!(session = %inner.id, file = %name, preview_lines = preview_count, "Recorded upload");
        SubmitOutcome::FileAccepted {
            handle,
            preview_lines: preview_count,
        }
    }

    /// Snapshot of the transcript
    pub fn transcript(&self) -> Vec<Message> {
        self.inner.state.lock().transcript.clone()
    }

    /// Number of messages in the transcript
    pub fn message_count(&self) -> usize {
        self.inner.state.lock().transcript.len()
    }

    /// Whether a simulated reply is in flight
    pub fn pending_reply(&self) -> bool {
        self.inner.state.lock().pending()
    }

    /// Number of replies in flight
    pub fn replies_in_flight(&self) -> usize {
        self.inner.state.lock().in_flight.len()
    }

    /// Handle of the latest upload with this name
    pub fn upload_handle(&self, file_name: &str) -> Option<ContentHandle> {
        self.inner.state.lock().upload_index.get(file_name).cloned()
    }

    /// Snapshot of the upload index
    pub fn upload_index(&self) -> HashMap<String, ContentHandle> {
        self.inner.state.lock().upload_index.clone()
    }

    /// Resolve a content handle to bytes
    pub fn resolve(&self, handle: &ContentHandle) -> Option<Arc<[u8]>> {
        self.inner.state.lock().content.resolve(handle)
    }

    /// Release content the consumer no longer needs
    pub fn release(&self, handle: &ContentHandle) -> bool {
        self.inner.state.lock().content.release(handle)
    }

    /// Subscribe to session changes
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Close the session, cancelling outstanding replies.
    ///
    /// The transcript stays readable; later submissions are ignored.
    pub fn close(&self) {
        let mut state = self.inner.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        let cancelled = state.cancel_replies();
        if cancelled > 0 {
            self.inner.publish(SessionEvent::PendingChanged { pending: false });
        }
        self.inner.publish(SessionEvent::Closed);
        info!(session = %self.inner.id, cancelled, "Closed chat session");
    }

    pub fn is_closed(&self) -> bool {
        self.inner.state.lock().closed
    }
}

/// Builder for chat sessions
#[derive(Default)]
pub struct SessionBuilder {
    config: ChatConfig,
    router: Option<IntentRouter>,
    catalog: Option<Arc<dyn ReplyCatalog>>,
    seed: bool,
}

impl SessionBuilder {
    pub fn config(mut self, config: ChatConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom router
    pub fn router(mut self, router: IntentRouter) -> Self {
        self.router = Some(router);
        self
    }

    /// Use a custom reply catalog
    pub fn catalog(mut self, catalog: Arc<dyn ReplyCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Open with the greeting transcript
    pub fn seed_transcript(mut self, seed: bool) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> ChatSession {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let state = SessionState {
            transcript: if self.seed { seed_messages() } else { Vec::new() },
            ..Default::default()
        };

        let inner = SessionInner {
            id: uuid::Uuid::new_v4().to_string(),
            config: self.config,
            router: self.router.unwrap_or_default(),
            catalog: self.catalog.unwrap_or_else(|| Arc::new(CannedReplies)),
            state: Mutex::new(state),
            events,
        };
        info!(
            session = %inner.id,
            policy = %inner.config.pending_policy,
            delay_ms = inner.config.reply_delay_ms,
            "Opened chat session"
        );

        ChatSession {
            inner: Arc::new(inner),
        }
    }
}
