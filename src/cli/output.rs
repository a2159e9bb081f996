//! Colored terminal output for the bot's operator console.
//!
//! Prompts and results go to stdout, errors to stderr. Each line is rendered
//! into a `termcolor` buffer first and printed in one write.

use std::io::{self, Write};
use termcolor::{Buffer, BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Output manager for consistent colored terminal output
#[derive(Debug)]
pub struct OutputManager {
    bufwtr: BufferWriter,
    verbose: bool,
}

impl Clone for OutputManager {
    fn clone(&self) -> Self {
        Self::new(self.verbose)
    }
}

impl OutputManager {
    /// Create a new output manager; `verbose` enables [`OutputManager::verbose`] lines
    pub fn new(verbose: bool) -> Self {
        Self {
            bufwtr: BufferWriter::stdout(ColorChoice::Auto),
            verbose,
        }
    }

    /// Print a question addressed to the requester
    pub fn question(&self, message: &str) -> io::Result<()> {
        self.emit(|buffer| self.render_question(buffer, message))
    }

    /// Print a success message
    pub fn success(&self, message: &str) -> io::Result<()> {
        self.emit(|buffer| self.render_success(buffer, message))
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) -> io::Result<()> {
        self.emit(|buffer| self.render_warning(buffer, message))
    }

    /// Print an error message to stderr
    pub fn error(&self, message: &str) {
        let bufwtr = BufferWriter::stderr(ColorChoice::Auto);
        let mut buffer = bufwtr.buffer();

        if self.render_error(&mut buffer, message).is_err() || bufwtr.print(&buffer).is_err() {
            // Stderr failed - fallback to stdout as last resort
            println!("[STDERR ERROR] ✗ {}", message);
        }
    }

    /// Print a verbose/debug message (only in verbose mode)
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        self.emit(|buffer| self.render_verbose(buffer, message))
    }

    /// Print indented text (for sub-items)
    pub fn indent(&self, message: &str) -> io::Result<()> {
        self.emit(|buffer| writeln!(buffer, "    {}", message))
    }

    /// Print a plain message
    pub fn println(&self, message: &str) -> io::Result<()> {
        self.emit(|buffer| writeln!(buffer, "{}", message))
    }

    fn emit(&self, render: impl FnOnce(&mut Buffer) -> io::Result<()>) -> io::Result<()> {
        let mut buffer = self.bufwtr.buffer();
        render(&mut buffer)?;
        if buffer.is_empty() {
            return Ok(());
        }
        self.bufwtr.print(&buffer)
    }

    fn render_question(&self, buffer: &mut impl WriteColor, message: &str) -> io::Result<()> {
        marked(buffer, "?", ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true), message)
    }

    fn render_success(&self, buffer: &mut impl WriteColor, message: &str) -> io::Result<()> {
        marked(buffer, "✓", ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true), message)
    }

    fn render_warning(&self, buffer: &mut impl WriteColor, message: &str) -> io::Result<()> {
        buffer.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
        write!(buffer, "⚠")?;
        buffer.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        writeln!(buffer, " {}", message)?;
        buffer.reset()
    }

    fn render_error(&self, buffer: &mut impl WriteColor, message: &str) -> io::Result<()> {
        buffer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(buffer, "✗")?;
        buffer.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
        writeln!(buffer, " {}", message)?;
        buffer.reset()
    }

    fn render_verbose(&self, buffer: &mut impl WriteColor, message: &str) -> io::Result<()> {
        if !self.verbose {
            return Ok(());
        }
        marked(buffer, "→", ColorSpec::new().set_fg(Some(Color::Blue)), message)
    }
}

/// Colored marker followed by an uncolored message
fn marked(
    buffer: &mut impl WriteColor,
    marker: &str,
    spec: &ColorSpec,
    message: &str,
) -> io::Result<()> {
    buffer.set_color(spec)?;
    write!(buffer, "{}", marker)?;
    buffer.reset()?;
    writeln!(buffer, " {}", message)
}
