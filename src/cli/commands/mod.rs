//! Command execution functions.
//!
//! Each command loads startup configuration first; a missing passphrase,
//! key pair or token ends the process before any workspace is created.

// Submodules
mod chat;
mod check;
mod helpers;
mod release;

use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::Result;

use chat::execute_chat;
use check::execute_check;
use release::execute_release;

/// Execute the main command based on parsed arguments
pub async fn execute_command(args: Args) -> Result<i32> {
    if let Err(validation_error) = args.validate() {
        let output = super::OutputManager::new(false);
        output.error(&format!("Invalid arguments: {}", validation_error));
        return Ok(1);
    }

    let config = RuntimeConfig::from(&args);

    let result = match &args.command {
        Command::Chat => execute_chat(&args, &config).await,
        Command::Release { .. } => execute_release(&args, &config).await,
        Command::Check => execute_check(&args, &config).await.map(|()| {
            config.success_println("Configuration is valid");
            0
        }),
    };

    match result {
        Ok(exit_code) => Ok(exit_code),
        Err(e) => {
            config.error_println(&format!(
                "Command '{}' failed: {}",
                args.command.name(),
                e
            ));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                config.println("\nRecovery suggestions:");
                for suggestion in suggestions {
                    config.indent(&format!("• {}", suggestion));
                }
            }

            Ok(1)
        }
    }
}
