//! ui::prompts
//!
//! Interactive prompts and the terminal interaction surface.
//!
//! # Design
//!
//! Prompts are only shown in interactive mode. Callers decide whether the
//! session is interactive and build a [`Prompter`] only when it is; the
//! publish workflow never prompts.
//!
//! A [`Prompter`] reads lines from any `BufRead` and writes to any `Write`,
//! so scripted input drives it in tests. End of input always means
//! [`PromptError::Cancelled`].

use std::io::{self, BufRead, IsTerminal, StdinLock, Stdout, Write};
use std::path::PathBuf;

use thiserror::Error;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode")]
    NotInteractive,

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<io::Error> for PromptError {
    fn from(err: io::Error) -> Self {
        PromptError::IoError(err.to_string())
    }
}

/// Whether stdin and stdout are both attached to a terminal.
pub fn is_terminal() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

/// What the upload workflow needs from a human.
pub trait Interaction {
    /// Ask which folder to upload.
    fn ask_folder(&mut self) -> Result<PathBuf, PromptError>;

    /// Ask for the repository name, offering `default`.
    fn ask_repo_name(&mut self, default: &str) -> Result<String, PromptError>;

    /// Report a successful upload.
    fn report_success(&mut self, web_url: &str) -> Result<(), PromptError>;

    /// Report a failed upload.
    fn report_failure(&mut self, message: &str) -> Result<(), PromptError>;
}

/// Line-oriented prompter.
pub struct Prompter<R, W> {
    reader: R,
    writer: W,
    mask_secrets: bool,
}

impl Prompter<StdinLock<'static>, Stdout> {
    /// Prompt on the process's terminal, masking secret input.
    pub fn stdio() -> Self {
        Self {
            reader: io::stdin().lock(),
            writer: io::stdout(),
            mask_secrets: true,
        }
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Prompt over arbitrary streams. Secret input is read as a plain line.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            mask_secrets: false,
        }
    }

    /// Consume the prompter, returning the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Write a line of output.
    pub fn say(&mut self, message: &str) -> Result<(), PromptError> {
        writeln!(self.writer, "{}", message)?;
        Ok(())
    }

    /// Prompt for text input.
    ///
    /// An empty answer yields `default` when one is given.
    pub fn input(&mut self, message: &str, default: Option<&str>) -> Result<String, PromptError> {
        match default {
            Some(d) if !d.is_empty() => write!(self.writer, "{} [{}]: ", message, d)?,
            _ => write!(self.writer, "{}: ", message)?,
        }
        self.writer.flush()?;

        let answer = self.read_line()?;
        if answer.is_empty() {
            Ok(default.unwrap_or_default().to_string())
        } else {
            Ok(answer)
        }
    }

    /// Prompt for masked input (e.g., tokens).
    ///
    /// The input is not echoed when prompting on a terminal.
    pub fn password(&mut self, message: &str) -> Result<String, PromptError> {
        if self.mask_secrets {
            return rpassword::prompt_password(format!("{}: ", message))
                .map(|s| s.trim().to_string())
                .map_err(|e| match e.kind() {
                    io::ErrorKind::UnexpectedEof => PromptError::Cancelled,
                    _ => e.into(),
                });
        }
        write!(self.writer, "{}: ", message)?;
        self.writer.flush()?;
        self.read_line()
    }

    /// Prompt for confirmation (yes/no).
    pub fn confirm(&mut self, message: &str, default: bool) -> Result<bool, PromptError> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            write!(self.writer, "{} [{}]: ", message, hint)?;
            self.writer.flush()?;
            match self.read_line()?.to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.writer, "Please answer y or n.")?,
            }
        }
    }

    /// Prompt to select from a list of options.
    ///
    /// Returns the index of the selected option. Options are numbered
    /// from 1 on screen.
    pub fn select<T: AsRef<str>>(
        &mut self,
        message: &str,
        options: &[T],
        default: Option<usize>,
    ) -> Result<usize, PromptError> {
        if options.is_empty() {
            return Err(PromptError::Cancelled);
        }

        writeln!(self.writer, "{}", message)?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.writer, "  {}) {}", i + 1, option.as_ref())?;
        }

        loop {
            match default {
                Some(d) if d < options.len() => write!(self.writer, "Choice [{}]: ", d + 1)?,
                _ => write!(self.writer, "Choice: ")?,
            }
            self.writer.flush()?;

            let answer = self.read_line()?;
            if answer.is_empty() {
                if let Some(d) = default.filter(|d| *d < options.len()) {
                    return Ok(d);
                }
            } else if let Ok(n) = answer.parse::<usize>() {
                if (1..=options.len()).contains(&n) {
                    return Ok(n - 1);
                }
            }
            writeln!(
                self.writer,
                "Enter a number between 1 and {}.",
                options.len()
            )?;
        }
    }

    /// Read one trimmed line. End of input is a cancellation.
    fn read_line(&mut self) -> Result<String, PromptError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(PromptError::Cancelled);
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Interaction for Prompter<R, W> {
    fn ask_folder(&mut self) -> Result<PathBuf, PromptError> {
        let folder = self.input("Folder to upload (empty to cancel)", None)?;
        if folder.is_empty() {
            return Err(PromptError::Cancelled);
        }
        Ok(expand_home(&folder))
    }

    fn ask_repo_name(&mut self, default: &str) -> Result<String, PromptError> {
        let name = self.input("Repository name", Some(default))?;
        if name.is_empty() {
            return Err(PromptError::Cancelled);
        }
        Ok(name)
    }

    fn report_success(&mut self, web_url: &str) -> Result<(), PromptError> {
        self.say(&format!("Upload complete: {}", web_url))
    }

    fn report_failure(&mut self, message: &str) -> Result<(), PromptError> {
        self.say(&format!("Upload failed: {}", message))
    }
}

/// Expand a leading `~` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
