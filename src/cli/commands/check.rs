//! Check command: validate startup configuration.

use super::helpers::load_startup;
use crate::cli::{Args, RuntimeConfig};
use crate::error::Result;
use crate::notes::TemplateNotes;

/// Execute check command
pub(super) async fn execute_check(args: &Args, config: &RuntimeConfig) -> Result<()> {
    let startup = load_startup(config, args.github_token.as_deref())?;
    config.success_println("Passphrase present");
    config.success_println(&format!(
        "Key pair found at {}",
        startup.credentials.private_key().display()
    ));
    config.success_println("GitHub token present");

    if let Some(path) = &startup.config.notes_template {
        TemplateNotes::from_file(path)?;
        config.success_println(&format!("Notes template {} compiles", path.display()));
    }

    if startup.config.triggers.is_empty() {
        config.warning_println("No trigger phrases configured; only `release` is usable");
    } else {
        config.println("Trigger phrases:");
        for binding in &startup.config.triggers {
            config.indent(&format!(
                "\"{}\" -> {}/{}",
                binding.phrase, binding.owner, binding.repo
            ));
        }
    }

    Ok(())
}
