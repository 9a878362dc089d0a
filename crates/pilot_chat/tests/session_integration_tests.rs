//! Integration tests for the chat session engine.

use std::time::Duration;

use pilot_chat::{
    ChatConfig, ChatSession, IgnoreReason, MessageKind, PendingPolicy, Sender, SessionEvent,
    SubmitOutcome, UploadedFile, UPLOAD_PROMPT,
};
use pilot_router::{rules, AgentCategory};

async fn wait_for_reply() {
    tokio::time::sleep(Duration::from_millis(2100)).await;
}

fn session_with(policy: PendingPolicy) -> ChatSession {
    ChatSession::new(ChatConfig::default().pending_policy(policy))
}

/// Full modeling scenario: immediate user + log, then reply with predictions file.
#[tokio::test(start_paused = true)]
async fn test_modeling_request_scenario() {
    let session = ChatSession::new(ChatConfig::default());
    let outcome = session.submit_text("train a model for accuracy");
    assert_eq!(outcome.route().unwrap().category, AgentCategory::Modeling);

    let before = session.transcript();
    assert_eq!(before.len(), 2);
    assert_eq!(before[0].sender, Sender::User);
    assert_eq!(before[1].sender, Sender::System);
    assert_eq!(before[1].kind, MessageKind::Log);
    assert_eq!(before[1].content, rules::MODELING_STATUS);
    assert!(session.pending_reply());

    wait_for_reply().await;

    let after = session.transcript();
    assert_eq!(after.len(), 4);
    assert_eq!(after[2].sender, Sender::DataScientist);
    assert_eq!(after[2].kind, MessageKind::Text);

    let file = after[3].attachment().expect("predictions attachment");
    assert_eq!(after[3].sender, Sender::DataScientist);
    assert_eq!(file.file_name, "predictions.csv");
    assert_eq!(file.preview_lines.len(), 5);
    assert_eq!(file.preview_lines[0], "customer_id,churn_probability,predicted_label");

    let bytes = session.resolve(&file.file_ref).expect("generated content is stored");
    assert!(String::from_utf8_lossy(&bytes).starts_with("customer_id"));
    assert!(!session.pending_reply());
}

/// Each category gets its own canned reply set.
#[tokio::test(start_paused = true)]
async fn test_reply_sets_per_category() {
    let cases = [
        ("clean the data", Sender::DataEngineer, Some("file")),
        ("show the trend", Sender::DataAnalyst, Some("chart")),
        ("predict churn", Sender::DataScientist, Some("file")),
        ("business summary", Sender::Insight, None),
        ("hello", Sender::DataAnalyst, Some("chart")),
    ];

    for (text, sender, attachment_kind) in cases {
        let session = ChatSession::new(ChatConfig::default());
        session.submit_text(text);
        wait_for_reply().await;

        let transcript = session.transcript();
        assert_eq!(transcript[2].sender, sender, "reply sender for '{}'", text);
        match attachment_kind {
            Some(kind) => {
                assert_eq!(transcript.len(), 4, "'{}'", text);
                assert_eq!(transcript[3].kind.name(), kind);
            }
            None => assert_eq!(transcript.len(), 3, "'{}'", text),
        }
    }
}

/// Whitespace-only text changes nothing and schedules nothing.
#[tokio::test(start_paused = true)]
async fn test_blank_submission_is_a_no_op() {
    let session = ChatSession::new(ChatConfig::default());
    let mut events = session.subscribe();

    assert_eq!(
        session.submit_text("   "),
        SubmitOutcome::Ignored(IgnoreReason::EmptyText)
    );
    wait_for_reply().await;

    assert_eq!(session.message_count(), 0);
    assert_eq!(session.replies_in_flight(), 0);
    assert!(events.try_recv().is_err());
}

/// Reject policy: text sent while a reply is pending is ignored.
#[tokio::test(start_paused = true)]
async fn test_reject_policy_blocks_while_pending() {
    let session = session_with(PendingPolicy::Reject);
    assert!(session.submit_text("clean the data").is_accepted());
    assert_eq!(
        session.submit_text("clean the data"),
        SubmitOutcome::Ignored(IgnoreReason::ReplyPending)
    );
    assert_eq!(session.message_count(), 2);

    wait_for_reply().await;
    assert!(!session.pending_reply());
    assert!(session.submit_text("clean the data").is_accepted());
}

/// Concurrent policy: repeated text is not idempotent.
#[tokio::test(start_paused = true)]
async fn test_concurrent_policy_schedules_every_reply() {
    let session = session_with(PendingPolicy::Concurrent);
    session.submit_text("business summary");
    session.submit_text("business summary");

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 4);
    assert_ne!(transcript[0].id, transcript[2].id);
    assert_eq!(session.replies_in_flight(), 2);

    wait_for_reply().await;
    let transcript = session.transcript();
    assert_eq!(transcript.len(), 6);
    assert_eq!(transcript[4].sender, Sender::Insight);
    assert_eq!(transcript[5].sender, Sender::Insight);
    assert!(!session.pending_reply());
}

/// Concurrent policy: pending stays true until the last reply lands.
#[tokio::test(start_paused = true)]
async fn test_concurrent_pending_tracks_last_reply() {
    let session = session_with(PendingPolicy::Concurrent);
    session.submit_text("business summary");
    tokio::time::sleep(Duration::from_millis(1000)).await;
    session.submit_text("business summary");

    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(session.message_count(), 5);
    assert!(session.pending_reply());

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(session.message_count(), 6);
    assert!(!session.pending_reply());
}

/// Supersede policy: a new submission cancels the stale reply.
#[tokio::test(start_paused = true)]
async fn test_supersede_policy_cancels_stale_reply() {
    let session = session_with(PendingPolicy::Supersede);
    session.submit_text("clean the data");
    match session.submit_text("business summary") {
        SubmitOutcome::TextAccepted { superseded, .. } => assert_eq!(superseded, 1),
        other => panic!("unexpected outcome: {:?}", other),
    }

    wait_for_reply().await;
    let transcript = session.transcript();
    assert_eq!(transcript.len(), 5);
    assert_eq!(transcript[4].sender, Sender::Insight);
    assert!(transcript.iter().all(|m| m.sender != Sender::DataEngineer));
    assert!(!session.pending_reply());
}

/// Closing cancels outstanding replies and ignores later input.
#[tokio::test(start_paused = true)]
async fn test_close_cancels_replies() {
    let session = ChatSession::new(ChatConfig::default());
    session.submit_text("train a model");
    session.close();

    assert!(!session.pending_reply());
    wait_for_reply().await;
    assert_eq!(session.message_count(), 2);

    assert_eq!(
        session.submit_text("train a model"),
        SubmitOutcome::Ignored(IgnoreReason::SessionClosed)
    );
    assert_eq!(
        session.submit_file(Some(UploadedFile::new("a.csv", "x"))),
        SubmitOutcome::Ignored(IgnoreReason::SessionClosed)
    );
    assert!(session.is_closed());
}

/// Uploading a CSV yields a preview and an indexed handle.
#[tokio::test]
async fn test_csv_upload_round_trip() {
    let session = ChatSession::new(ChatConfig::default());
    let outcome = session.submit_file(Some(UploadedFile::new("data.csv", "a,b\n1,2\n3,4\n")));
    assert!(matches!(
        outcome,
        SubmitOutcome::FileAccepted { preview_lines: 4, .. }
    ));

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 2);

    let file = transcript[0].attachment().unwrap();
    assert_eq!(transcript[0].sender, Sender::User);
    assert_eq!(file.preview_lines, vec!["a,b", "1,2", "3,4", ""]);
    assert_eq!(transcript[1].sender, Sender::System);
    assert_eq!(transcript[1].content, UPLOAD_PROMPT);

    let handle = session.upload_handle("data.csv").unwrap();
    assert_eq!(handle, file.file_ref);
    assert_eq!(session.resolve(&handle).as_deref(), Some(&b"a,b\n1,2\n3,4\n"[..]));

    // Uploads never route or schedule a reply.
    assert!(!session.pending_reply());
    assert_eq!(session.replies_in_flight(), 0);
}

#[tokio::test]
async fn test_reupload_overwrites_index() {
    let session = ChatSession::new(ChatConfig::default());
    session.submit_file(Some(UploadedFile::new("data.csv", "v1")));
    let first = session.upload_handle("data.csv").unwrap();
    session.submit_file(Some(UploadedFile::new("data.csv", "v2")));
    let second = session.upload_handle("data.csv").unwrap();

    assert_ne!(first, second);
    assert_eq!(session.upload_index().len(), 1);
    assert_eq!(session.resolve(&second).as_deref(), Some(&b"v2"[..]));
    // The earlier message still resolves until released.
    assert!(session.resolve(&first).is_some());
    assert!(session.release(&first));
    assert!(session.resolve(&first).is_none());
    assert_eq!(session.message_count(), 4);
}

#[tokio::test]
async fn test_non_previewable_and_missing_files() {
    let session = ChatSession::new(ChatConfig::default());

    assert_eq!(
        session.submit_file(None),
        SubmitOutcome::Ignored(IgnoreReason::MissingFile)
    );
    assert_eq!(session.message_count(), 0);

    session.submit_file(Some(UploadedFile::new("notes.txt", "line one\nline two")));
    let transcript = session.transcript();
    assert!(transcript[0].attachment().unwrap().preview_lines.is_empty());
    assert!(session.upload_handle("notes.txt").is_some());

    session.submit_file(Some(
        UploadedFile::new("export", "{\"a\": 1}").with_mime_type("application/json"),
    ));
    let transcript = session.transcript();
    assert_eq!(transcript[2].attachment().unwrap().preview_lines, vec!["{\"a\": 1}"]);
}

/// Subscribers see every change in order.
#[tokio::test(start_paused = true)]
async fn test_events_follow_transcript() {
    let session = ChatSession::new(ChatConfig::default());
    let mut events = session.subscribe();

    session.submit_text("summary");
    wait_for_reply().await;

    let mut received = Vec::new();
    while let Ok(event) = events.try_recv() {
        received.push(event);
    }

    assert_eq!(received.len(), 5);
    assert!(matches!(received[0], SessionEvent::MessageAppended { .. }));
    assert!(matches!(received[1], SessionEvent::MessageAppended { .. }));
    assert!(matches!(received[2], SessionEvent::PendingChanged { pending: true }));
    match &received[3] {
        SessionEvent::MessageAppended { message } => assert_eq!(message.sender, Sender::Insight),
        other => panic!("unexpected event: {:?}", other),
    }
    assert!(matches!(received[4], SessionEvent::PendingChanged { pending: false }));
}

/// Transcript order is insertion order and messages are never rewritten.
#[tokio::test(start_paused = true)]
async fn test_transcript_is_append_only() {
    let session = session_with(PendingPolicy::Concurrent);
    session.submit_text("clean the data");
    let snapshot = session.transcript();

    session.submit_file(Some(UploadedFile::new("data.csv", "a,b")));
    wait_for_reply().await;

    let transcript = session.transcript();
    assert_eq!(&transcript[..snapshot.len()], &snapshot[..]);
    assert!(transcript.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}
