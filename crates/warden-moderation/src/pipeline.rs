//! Pipeline wiring and the chat command boundary.
//!
//! [`ModerationService::evaluate`] runs every stage in order and fails fast.
//! [`ModerationCommands::remove`] is the only place errors are caught: each
//! failure becomes one channel message plus a logged diagnostic.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, instrument, warn};
use warden_core::{Decision, ModerationError, ModerationResult, Prompt, RawResponse};
use warden_llm::InferenceClient;

use crate::context::{ContextAssembler, MessageSource};
use crate::dispatcher::{ActionDispatcher, Notifier};
use crate::parser::extract_json;
use crate::prompt::PromptBuilder;
use crate::validator::validate;

/// Posted after the prompt is built and before inference starts.
pub const ANALYSIS_NOTICE: &str = "Analyzing reported message for Code of Conduct violations...";

/// Posted when `remove` is not a reply to another message.
pub const USAGE_MESSAGE: &str = "Please reply to the message that violates the Code of Conduct.";

/// One inbound `remove` command, as delivered by the chat adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandInvocation {
    /// Channel the command was issued in. All replies go here.
    pub channel_id: String,
    /// Identifier of the user who issued the command.
    pub invoker_id: String,
    /// Message the command replied to, if any.
    pub reply_to: Option<String>,
}

/// Inbound chat commands. One method per command.
#[async_trait]
pub trait ModerationCommands: Send + Sync {
    /// Evaluate the message the invocation replied to and post the outcome.
    async fn remove(&self, invocation: CommandInvocation);
}

/// The moderation decision pipeline.
///
/// Holds no per-evaluation state, so one instance serves concurrent
/// evaluations.
#[derive(Clone)]
pub struct ModerationService {
    assembler: ContextAssembler,
    prompts: PromptBuilder,
    inference: Arc<dyn InferenceClient>,
    dispatcher: ActionDispatcher,
    notifier: Arc<dyn Notifier>,
}

impl ModerationService {
    /// Wire the pipeline from its ports.
    pub fn new(
        source: Arc<dyn MessageSource>,
        notifier: Arc<dyn Notifier>,
        inference: Arc<dyn InferenceClient>,
        prompts: PromptBuilder,
    ) -> Self {
        Self {
            assembler: ContextAssembler::new(source),
            prompts,
            inference,
            dispatcher: ActionDispatcher::new(Arc::clone(&notifier)),
            notifier,
        }
    }

    /// Evaluate `message_id` in `channel_id` and post the decision.
    #[instrument(skip(self))]
    pub async fn evaluate(&self, channel_id: &str, message_id: &str) -> ModerationResult<Decision> {
        let (reported, context) = self.assembler.assemble(channel_id, message_id).await?;
        let prompt = self.prompts.build(&reported, &context);

        self.notifier.send(channel_id, ANALYSIS_NOTICE).await?;

        let raw = self.run_inference(prompt).await?;
        let decision = extract_json(&raw)
            .and_then(|candidate| validate(&candidate, &reported))
            .map_err(|e| e.with_raw_response(&raw))?;

        let _ = self.dispatcher.dispatch(channel_id, &decision).await?;
        Ok(decision)
    }

    /// Run the model call on its own task, off the event-handling path.
    async fn run_inference(&self, prompt: Prompt) -> ModerationResult<RawResponse> {
        let inference = Arc::clone(&self.inference);
        let handle = tokio::spawn(async move { inference.invoke(&prompt).await });
        let raw = handle
            .await
            .map_err(|e| ModerationError::Unexpected(format!("inference task failed: {e}")))??;
        Ok(raw)
    }

    async fn report_failure(&self, channel_id: &str, err: &ModerationError) {
        if let Some(raw) = err.raw_response() {
            error!(raw, "model output could not be turned into a decision");
        }
        error!(category = err.category(), error = %err, "remove command failed");

        if let Err(send_err) = self.notifier.send(channel_id, &err.user_message()).await {
            warn!(error = %send_err, "failed to post error notice");
        }
    }
}

#[async_trait]
impl ModerationCommands for ModerationService {
    async fn remove(&self, invocation: CommandInvocation) {
        let Some(target) = invocation.reply_to.as_deref() else {
            if let Err(e) = self.notifier.send(&invocation.channel_id, USAGE_MESSAGE).await {
                warn!(error = %e, "failed to post usage notice");
            }
            return;
        };

        info!(
            channel_id = %invocation.channel_id,
            invoker = %invocation.invoker_id,
            target,
            "remove command"
        );

        if let Err(e) = self.evaluate(&invocation.channel_id, target).await {
            self.report_failure(&invocation.channel_id, &e).await;
        }
    }
}
