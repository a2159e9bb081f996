//! Drives a conversation over a stream of replies and invokes the pipeline once.

use crate::conversation::{Conversation, ConversationState, TriggerBinding};
use crate::orchestrator::ReleasePipeline;
use crate::{ReleaseRecord, ReleaseRequest};
use tokio::io::{AsyncBufRead, Lines};

/// Where conversation output goes
pub trait Reporter {
    /// Ask the requester a question
    fn prompt(&self, text: &str);
    /// Report a completed release
    fn released(&self, record: &ReleaseRecord);
    /// Report a failed release with a short message
    fn failed(&self, message: &str);
    /// Report that the exchange ended without an answer
    fn cancelled(&self);
}

/// How a conversation finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationOutcome {
    /// The pipeline completed
    Released(ReleaseRecord),
    /// The pipeline failed; carries the reported message
    Failed(String),
    /// No valid answer was given; the pipeline never ran
    Cancelled,
}

/// Runs release-type exchanges against a pipeline
#[derive(Debug)]
pub struct ConversationController<'a, P> {
    pipeline: &'a P,
}

impl<'a, P: ReleasePipeline> ConversationController<'a, P> {
    /// Controller invoking `pipeline`
    pub fn new(pipeline: &'a P) -> Self {
        Self { pipeline }
    }

    /// Run `conversation` to completion, reading replies from `replies`.
    ///
    /// A conversation already confirmed skips straight to the pipeline. End of
    /// input or a read error while awaiting an answer cancels it.
    pub async fn run<L>(
        &self,
        binding: &TriggerBinding,
        mut conversation: Conversation,
        replies: &mut Lines<L>,
        reporter: &impl Reporter,
    ) -> ConversationOutcome
    where
        L: AsyncBufRead + Unpin,
    {
        loop {
            match conversation.state() {
                ConversationState::AwaitingReleaseType => {
                    if let Some(question) = conversation.prompt() {
                        reporter.prompt(question);
                    }
                    match replies.next_line().await {
                        Ok(Some(reply)) => {
                            conversation.on_reply(&reply);
                        }
                        Ok(None) => {
                            conversation.on_end();
                        }
                        Err(e) => {
                            log::warn!("Reading reply failed, ending conversation: {}", e);
                            conversation.on_end();
                        }
                    }
                }
                ConversationState::Confirmed(release_type) => {
                    let request =
                        ReleaseRequest::new(&binding.owner, &binding.repo, release_type);
                    return self.release(&request, reporter).await;
                }
                ConversationState::Cancelled => {
                    log::info!(
                        "Release of {}/{} cancelled before an answer",
                        binding.owner,
                        binding.repo
                    );
                    reporter.cancelled();
                    return ConversationOutcome::Cancelled;
                }
            }
        }
    }

    async fn release(
        &self,
        request: &ReleaseRequest,
        reporter: &impl Reporter,
    ) -> ConversationOutcome {
        match self.pipeline.release_and_tag(request).await {
            Ok(record) => {
                reporter.released(&record);
                ConversationOutcome::Released(record)
            }
            Err(e) => {
                log::error!(
                    "Release of {}/{} failed: {:?}",
                    request.owner,
                    request.repo,
                    e
                );
                let message = format!("{e} (see server logs for details)");
                reporter.failed(&message);
                ConversationOutcome::Failed(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReleaseType;
    use crate::error::{GitError, Result};
    use crate::version::VersionTag;
    use std::cell::RefCell;
    use tokio::io::AsyncBufReadExt;

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<String>>,
    }

    impl Reporter for Recorder {
        fn prompt(&self, text: &str) {
            self.events.borrow_mut().push(format!("prompt: {text}"));
        }
        fn released(&self, record: &ReleaseRecord) {
            self.events.borrow_mut().push(format!(
                "released: {} {} {}",
                record.version, record.release_name, record.release_url
            ));
        }
        fn failed(&self, message: &str) {
            self.events.borrow_mut().push(format!("failed: {message}"));
        }
        fn cancelled(&self) {
            self.events.borrow_mut().push("cancelled".to_string());
        }
    }

    #[derive(Default)]
    struct CountingPipeline {
        requests: RefCell<Vec<ReleaseRequest>>,
        fail: bool,
    }

    impl ReleasePipeline for CountingPipeline {
        async fn release_and_tag(&self, request: &ReleaseRequest) -> Result<ReleaseRecord> {
            self.requests.borrow_mut().push(request.clone());
            if self.fail {
                return Err(GitError::CloneFailed {
                    url: "git@github.com:acme/widget.git".to_string(),
                    reason: "connection reset".to_string(),
                }
                .into());
            }
            Ok(ReleaseRecord {
                version: "v1.3.0".parse::<VersionTag>().unwrap(),
                release_name: "brave-falcon".to_string(),
                release_notes: String::new(),
                release_url: "https://github.com/acme/widget/releases/tag/v1.3.0".to_string(),
            })
        }
    }

    fn binding() -> TriggerBinding {
        TriggerBinding::new("release widget", "acme", "widget")
    }

    #[tokio::test]
    async fn reprompts_until_a_valid_answer_then_releases_once() {
        let pipeline = CountingPipeline::default();
        let controller = ConversationController::new(&pipeline);
        let reporter = Recorder::default();
        let mut replies = "maybe\nsoon\nfeature\nbugfix\n".as_bytes().lines();

        let outcome = controller
            .run(&binding(), Conversation::new(), &mut replies, &reporter)
            .await;

        assert!(matches!(outcome, ConversationOutcome::Released(_)));
        let requests = pipeline.requests.borrow();
        assert_eq!(
            *requests,
            vec![ReleaseRequest::new("acme", "widget", ReleaseType::Feature)]
        );

        let events = reporter.events.borrow();
        assert_eq!(events.iter().filter(|e| e.starts_with("prompt")).count(), 3);
        assert_eq!(
            events.last().unwrap(),
            "released: v1.3.0 brave-falcon https://github.com/acme/widget/releases/tag/v1.3.0"
        );

        // The trailing reply was never consumed
        assert_eq!(replies.next_line().await.unwrap().as_deref(), Some("bugfix"));
    }

    #[tokio::test]
    async fn end_of_input_cancels_without_running_the_pipeline() {
        let pipeline = CountingPipeline::default();
        let controller = ConversationController::new(&pipeline);
        let reporter = Recorder::default();
        let mut replies = "maybe\n".as_bytes().lines();

        let outcome = controller
            .run(&binding(), Conversation::new(), &mut replies, &reporter)
            .await;

        assert_eq!(outcome, ConversationOutcome::Cancelled);
        assert!(pipeline.requests.borrow().is_empty());
        assert_eq!(reporter.events.borrow().last().unwrap(), "cancelled");
    }

    #[tokio::test]
    async fn failures_report_the_error_message() {
        let pipeline = CountingPipeline {
            fail: true,
            ..CountingPipeline::default()
        };
        let controller = ConversationController::new(&pipeline);
        let reporter = Recorder::default();
        let mut replies = "bugfix\n".as_bytes().lines();

        let outcome = controller
            .run(&binding(), Conversation::new(), &mut replies, &reporter)
            .await;

        let ConversationOutcome::Failed(message) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert!(message.contains("connection reset"));
        assert!(message.contains("server logs"));
        assert_eq!(pipeline.requests.borrow().len(), 1);
    }

    #[tokio::test]
    async fn preconfirmed_conversation_needs_no_replies() {
        let pipeline = CountingPipeline::default();
        let controller = ConversationController::new(&pipeline);
        let reporter = Recorder::default();
        let mut replies = "".as_bytes().lines();

        let mut conversation = Conversation::new();
        conversation.on_reply("bugfix");
        let outcome = controller
            .run(&binding(), conversation, &mut replies, &reporter)
            .await;

        assert!(matches!(outcome, ConversationOutcome::Released(_)));
        assert!(
            reporter
                .events
                .borrow()
                .iter()
                .all(|e| !e.starts_with("prompt"))
        );
    }
}
