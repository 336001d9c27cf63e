//! `OperatorPrompt` backed by the terminal.
//!
//! Answers are always read from stdin. `dialoguer` draws the confirm only
//! when stdout and stderr are both terminals; otherwise (output piped to a
//! log) the prompt is written as a plain line and the answer read line by
//! line.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use console::Term;
use dialoguer::Confirm;

use crate::application::ports::OperatorPrompt;

/// Terminal prompt. When `non_interactive`, every question takes its default
/// and nothing is read from stdin.
pub struct TerminalPrompt {
    non_interactive: bool,
}

impl TerminalPrompt {
    #[must_use]
    pub fn new(non_interactive: bool) -> Self {
        Self { non_interactive }
    }
}

impl OperatorPrompt for TerminalPrompt {
    fn is_interactive(&self) -> bool {
        !self.non_interactive
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        if Term::stderr().is_term() && Term::stdout().is_term() {
            return Confirm::new()
                .with_prompt(prompt)
                .default(default)
                .interact()
                .context("reading confirmation");
        }
        read_confirmation(prompt, default, &mut io::stderr(), &mut io::stdin().lock())
    }

    fn acknowledge(&self, prompt: &str) -> Result<()> {
        if self.non_interactive {
            return Ok(());
        }
        wait_for_line(prompt, &mut io::stderr(), &mut io::stdin().lock())
    }
}

/// Write `prompt` and block until one line arrives on `input`.
///
/// # Errors
///
/// Returns an error if `input` is closed before a line is read.
pub fn wait_for_line(prompt: &str, out: &mut impl Write, input: &mut impl BufRead) -> Result<()> {
    writeln!(out, "{prompt}").context("writing prompt")?;
    out.flush().context("writing prompt")?;
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .context("waiting for acknowledgment")?;
    if read == 0 {
        anyhow::bail!(
            "stdin closed before the acknowledgment was given\n\nRe-run from a terminal, or pass --yes to skip the pause"
        );
    }
    Ok(())
}

/// Line-based yes/no question. An empty answer takes `default`; anything
/// unrecognised asks again.
///
/// # Errors
///
/// Returns an error if `input` is closed before an answer is read.
pub fn read_confirmation(
    prompt: &str,
    default: bool,
    out: &mut impl Write,
    input: &mut impl BufRead,
) -> Result<bool> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    loop {
        write!(out, "{prompt} {hint} ").context("writing prompt")?;
        out.flush().context("writing prompt")?;
        let mut line = String::new();
        let read = input.read_line(&mut line).context("reading confirmation")?;
        if read == 0 {
            anyhow::bail!(
                "stdin closed before the question was answered\n\nRe-run from a terminal, or pass --yes to take the default"
            );
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(out, "please answer y or n").context("writing prompt")?,
        }
    }
}
