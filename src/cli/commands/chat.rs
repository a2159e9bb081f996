//! Chat command: trigger phrases on stdin start release conversations.

use super::helpers::{TerminalReporter, build_orchestrator, load_startup};
use crate::cli::{Args, RuntimeConfig};
use crate::conversation::{
    Conversation, ConversationController, ConversationOutcome, Reporter, TriggerBinding,
    find_trigger,
};
use crate::error::{CliError, Result};
use crate::orchestrator::ReleasePipeline;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

/// Execute chat command
pub(super) async fn execute_chat(args: &Args, config: &RuntimeConfig) -> Result<i32> {
    let startup = load_startup(config, args.github_token.as_deref())?;
    let triggers = startup.config.triggers.clone();
    if triggers.is_empty() {
        return Err(CliError::InvalidArguments {
            reason: "no [[triggers]] configured; add one to release-bot.toml or use `release`"
                .to_string(),
        }
        .into());
    }
    let orchestrator = build_orchestrator(config, startup)?;

    config.println("Listening for trigger phrases:");
    for binding in &triggers {
        config.indent(&format!(
            "\"{}\" -> {}/{}",
            binding.phrase, binding.owner, binding.repo
        ));
    }

    let reporter = TerminalReporter::new(config.output());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let outcomes = serve(&triggers, &orchestrator, &mut lines, &reporter).await;

    let failed = outcomes
        .iter()
        .filter(|o| matches!(o, ConversationOutcome::Failed(_)))
        .count();
    config.verbose_println(&format!(
        "{} conversation(s), {} failed",
        outcomes.len(),
        failed
    ));
    Ok(0)
}

/// Hold conversations until input ends.
///
/// Messages that are not a trigger phrase are ignored. Conversations run one
/// at a time and each reads its replies from the same input.
pub(super) async fn serve<P, L>(
    triggers: &[TriggerBinding],
    pipeline: &P,
    lines: &mut Lines<L>,
    reporter: &impl Reporter,
) -> Vec<ConversationOutcome>
where
    P: ReleasePipeline,
    L: AsyncBufRead + Unpin,
{
    let controller = ConversationController::new(pipeline);
    let mut outcomes = Vec::new();

    loop {
        let message = match lines.next_line().await {
            Ok(Some(message)) => message,
            Ok(None) => break,
            Err(e) => {
                log::warn!("Reading input failed, stopping: {}", e);
                break;
            }
        };

        let Some(binding) = find_trigger(triggers, &message) else {
            log::debug!("Ignoring message without trigger: {:?}", message);
            continue;
        };
        log::info!(
            "Trigger \"{}\" received for {}/{}",
            binding.phrase,
            binding.owner,
            binding.repo
        );
        let outcome = controller
            .run(binding, Conversation::new(), lines, reporter)
            .await;
        outcomes.push(outcome);
    }

    outcomes
}
