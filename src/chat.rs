//! Conversation sessions and the run polling state machine.

use std::time::Duration;

use serde_json::Value;
use tokio::time::{sleep, Instant};

use crate::api::messages::{Content, Role, Text};
use crate::api::runs::{RequiredAction, RunStatus};
use crate::api::AssistantsApi;
use crate::{Error, Result};

/// Literal prefix on an outgoing message that forces the retrieval tool for
/// that turn. Stripped from the message before it is sent.
pub const TOOL_CALL_PREFIX: &str = "tc!";

/// Polling cadence for run completion.
#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    /// Interval between run retrievals.
    pub step: Duration,
    /// Total budget before a run is declared timed out, measured against a
    /// monotonic deadline so slow remote calls count against it.
    pub timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            step: Duration::from_millis(250),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Assistant reply to a user message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    /// Message text with citation markers rewritten to `[*1]`, `[*2]`, ...
    pub message: String,
    /// Total tokens consumed by the run.
    pub token_count: u32,
    /// Filenames of the cited files, in marker order.
    pub annotation_files: Vec<String>,
}

/// Tool call the remote run is paused on. The caller executes the named
/// function and resumes with [`Chat::submit_tool_outputs`].
#[derive(Debug, Clone, PartialEq)]
pub struct PendingToolCall {
    pub run_id: String,
    pub tool_call_id: String,
    pub name: String,
    /// Arguments decoded from the model's JSON text.
    pub arguments: Value,
}

/// Result of driving a run to a terminal state. Pausing on a tool call is
/// control flow, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    Reply(ChatResponse),
    ActionRequired(PendingToolCall),
}

enum RunOutcome {
    Completed { total_tokens: u32 },
    ActionRequired(PendingToolCall),
}

/// A conversation with an assistant, bound to one thread for its lifetime.
pub struct Chat<'a, C: AssistantsApi> {
    client: &'a C,
    assistant_id: String,
    thread_id: Option<String>,
    poll: PollSettings,
}

impl<'a, C: AssistantsApi> Chat<'a, C> {
    pub fn new(client: &'a C, assistant_id: impl Into<String>) -> Self {
        Self {
            client,
            assistant_id: assistant_id.into(),
            thread_id: None,
            poll: PollSettings::default(),
        }
    }

    /// Resumes an existing thread instead of creating one on [`start`].
    ///
    /// [`start`]: Chat::start
    pub fn with_thread(client: &'a C, assistant_id: impl Into<String>, thread_id: impl Into<String>) -> Self {
        Self {
            client,
            assistant_id: assistant_id.into(),
            thread_id: Some(thread_id.into()),
            poll: PollSettings::default(),
        }
    }

    pub fn with_poll_settings(mut self, poll: PollSettings) -> Self {
        self.poll = poll;
        self
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    /// Creates the conversation thread unless one was supplied.
    pub async fn start(&mut self) -> Result<()> {
        log::info!("Starting chat");
        if self.thread_id.is_none() {
            self.thread_id = Some(self.client.create_thread().await?.id);
        }
        log::info!("Thread ID: {}", self.thread_id.as_deref().unwrap_or(""));
        Ok(())
    }

    /// Sends a user message and drives the resulting run to a terminal
    /// state. A leading `tc!` is stripped exactly once and forces the
    /// retrieval tool for this turn; a message that merely contains the
    /// prefix elsewhere is sent untouched.
    pub async fn send_user_message(&self, message: &str) -> Result<ChatOutcome> {
        let force_tool_call = should_force_tool_call(message);
        let content = strip_tool_call_prefix(message);
        let thread_id = self.require_thread()?.to_string();

        self.client
            .create_message(&thread_id, content, Role::User)
            .await?;
        let run = self
            .client
            .create_run(&self.assistant_id, &thread_id, force_tool_call)
            .await?;

        self.finish_run(&thread_id, &run.id).await
    }

    /// Posts a tool output for a paused run and resumes polling it.
    pub async fn submit_tool_outputs(
        &self,
        run_id: &str,
        tool_call_id: &str,
        output: &str,
    ) -> Result<ChatOutcome> {
        let thread_id = self.require_thread()?.to_string();
        self.client
            .submit_tool_outputs(&thread_id, run_id, tool_call_id, output)
            .await?;

        self.finish_run(&thread_id, run_id).await
    }

    async fn finish_run(&self, thread_id: &str, run_id: &str) -> Result<ChatOutcome> {
        match self.wait_for_run(thread_id, run_id).await? {
            RunOutcome::Completed { total_tokens } => {
                let (message, annotation_files) = self.last_message(thread_id).await?;
                Ok(ChatOutcome::Reply(ChatResponse {
                    message,
                    token_count: total_tokens,
                    annotation_files,
                }))
            }
            RunOutcome::ActionRequired(pending) => Ok(ChatOutcome::ActionRequired(pending)),
        }
    }

    /// Polls the run until it completes, fails, pauses on a tool call, or
    /// the deadline passes. Terminal observations return immediately with no
    /// further sleep or retrieval.
    async fn wait_for_run(&self, thread_id: &str, run_id: &str) -> Result<RunOutcome> {
        let deadline = Instant::now() + self.poll.timeout;

        loop {
            let run = self.client.get_run(thread_id, run_id).await?;

            match run.status {
                RunStatus::Completed => {
                    let total_tokens = run.usage.map(|usage| usage.total_tokens).unwrap_or(0);
                    return Ok(RunOutcome::Completed { total_tokens });
                }
                RunStatus::RequiresAction => {
                    let Some(RequiredAction::SubmitToolOutputs {
                        submit_tool_outputs,
                    }) = run.required_action
                    else {
                        return Err(Error::RunFailed {
                            status: RunStatus::RequiresAction,
                        });
                    };
                    // Only the first queued call is surfaced; the remote run
                    // re-reports any remaining calls after resumption.
                    let Some(call) = submit_tool_outputs.tool_calls.into_iter().next() else {
                        return Err(Error::RunFailed {
                            status: RunStatus::RequiresAction,
                        });
                    };
                    return Ok(RunOutcome::ActionRequired(PendingToolCall {
                        run_id: run.id,
                        tool_call_id: call.id,
                        name: call.function.name,
                        arguments: serde_json::from_str(&call.function.arguments)?,
                    }));
                }
                RunStatus::Failed | RunStatus::Expired | RunStatus::Cancelled => {
                    return Err(Error::RunFailed { status: run.status });
                }
                _ => {}
            }

            if Instant::now() >= deadline {
                return Err(Error::RunTimedOut {
                    seconds: self.poll.timeout.as_secs(),
                });
            }
            sleep(self.poll.step).await;
        }
    }

    /// Fetches the newest thread message and extracts its text, rewriting
    /// citation markers to sequential footnotes and resolving the cited file
    /// ids to filenames.
    async fn last_message(&self, thread_id: &str) -> Result<(String, Vec<String>)> {
        let messages = self.client.list_messages(thread_id).await?;
        let newest = messages.into_iter().last().ok_or(Error::MissingTextContent)?;
        let content = newest
            .content
            .into_iter()
            .next()
            .ok_or(Error::MissingTextContent)?;
        let Content::Text { text } = content else {
            return Err(Error::MissingTextContent);
        };

        self.rewrite_annotations(text).await
    }

    async fn rewrite_annotations(&self, text: Text) -> Result<(String, Vec<String>)> {
        let mut message = text.value;
        let mut annotation_files = Vec::new();
        let mut annotations = text.annotations;
        annotations.sort_by_key(|annotation| annotation.start_index);

        for (index, annotation) in annotations.iter().enumerate() {
            let footnote = format!("[*{}]", index + 1);
            if let Some(at) = message.find(&annotation.text) {
                message.replace_range(at..at + annotation.text.len(), &footnote);
            }
            if let Some(citation) = &annotation.file_citation {
                let file = self.client.get_file(&citation.file_id).await?;
                annotation_files.push(file.filename);
            }
        }

        Ok((message, annotation_files))
    }

    fn require_thread(&self) -> Result<&str> {
        self.thread_id.as_deref().ok_or(Error::ChatNotStarted)
    }
}

fn should_force_tool_call(message: &str) -> bool {
    message.starts_with(TOOL_CALL_PREFIX)
}

fn strip_tool_call_prefix(message: &str) -> &str {
    message.strip_prefix(TOOL_CALL_PREFIX).unwrap_or(message)
}
