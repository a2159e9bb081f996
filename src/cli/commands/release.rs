//! Release command: one conversation for a repository named on the command line.

use super::helpers::{TerminalReporter, build_orchestrator, load_startup, parse_repo};
use crate::cli::{Args, Command, RuntimeConfig};
use crate::conversation::{Conversation, ConversationController, ConversationOutcome, TriggerBinding};
use crate::ReleaseType;
use crate::error::{CliError, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Execute release command
pub(super) async fn execute_release(args: &Args, config: &RuntimeConfig) -> Result<i32> {
    let Command::Release { repo, release_type } = &args.command else {
        return Err(CliError::InvalidArguments {
            reason: "release command expected".to_string(),
        }
        .into());
    };

    // Credentials first: nothing touches disk or network without them
    let startup = load_startup(config, args.github_token.as_deref())?;
    let (owner, name) = parse_repo(repo)?;
    let orchestrator = build_orchestrator(config, startup)?;

    let binding = TriggerBinding::new(format!("release {name}"), owner, name);
    let mut conversation = Conversation::new();
    if let Some(release_type) = release_type {
        conversation.on_reply(&ReleaseType::from(*release_type).to_string());
    }

    config.println(&format!("Releasing {repo}"));
    let reporter = TerminalReporter::new(config.output());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let controller = ConversationController::new(&orchestrator);

    match controller
        .run(&binding, conversation, &mut lines, &reporter)
        .await
    {
        ConversationOutcome::Released(_) => Ok(0),
        ConversationOutcome::Failed(_) | ConversationOutcome::Cancelled => Ok(1),
    }
}
