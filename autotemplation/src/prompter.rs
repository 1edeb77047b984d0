//! Interactive input.
//!
//! The engine never reads a terminal directly. Every question - a manual
//! placeholder value, the document date, a template choice, a lookup sheet
//! path - goes through the [`Prompter`] trait, so runs can be scripted.

use std::collections::{HashMap, VecDeque};
use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::error::{Error, Result};

/// Source of answers for interactive questions.
pub trait Prompter {
    /// Ask a free-form question and return the raw answer.
    ///
    /// # Errors
    ///
    /// Returns an error if no answer can be obtained (closed input, exhausted
    /// script, I/O failure).
    fn ask(&mut self, question: &str) -> Result<String>;

    /// Return the value for a manual placeholder.
    ///
    /// The answer is stored verbatim; an empty string is a valid value.
    ///
    /// # Errors
    ///
    /// Same as [`Prompter::ask`].
    fn resolve(&mut self, identifier: &str) -> Result<String> {
        self.ask(&format!("Enter a value for {identifier}"))
    }

    /// Show a line of information, such as a menu entry. Does nothing by
    /// default.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn say(&mut self, _message: &str) -> Result<()> {
        Ok(())
    }
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn ask(&mut self, question: &str) -> Result<String> {
        (**self).ask(question)
    }

    fn say(&mut self, message: &str) -> Result<()> {
        (**self).say(message)
    }

    fn resolve(&mut self, identifier: &str) -> Result<String> {
        (**self).resolve(identifier)
    }
}

/// Line-oriented prompter over a reader/writer pair.
#[derive(Debug)]
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompter bound to the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    /// Create a prompter over arbitrary streams.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the prompter, returning the output stream.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question}:  ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::prompt("input closed"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }
}

/// Prompter with canned answers, for tests and non-interactive runs.
///
/// [`Prompter::resolve`] answers from the per-identifier map first, then
/// falls back to the reply queue. [`Prompter::ask`] pops the reply queue.
/// Once the queue is empty every question fails.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    answers: HashMap<String, String>,
    replies: VecDeque<String>,
    questions: Vec<String>,
    messages: Vec<String>,
}

impl ScriptedPrompter {
    /// Create an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `identifier` with `value` whenever it is resolved.
    #[must_use]
    pub fn answer(mut self, identifier: impl Into<String>, value: impl Into<String>) -> Self {
        self.answers.insert(identifier.into(), value.into());
        self
    }

    /// Queue a reply for the next free-form question.
    #[must_use]
    pub fn reply(mut self, text: impl Into<String>) -> Self {
        self.replies.push_back(text.into());
        self
    }

    /// Every question asked so far, in order.
    #[must_use]
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    /// Every message shown so far, in order.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &str) -> Result<String> {
        self.questions.push(question.to_string());
        self.replies
            .pop_front()
            .ok_or_else(|| Error::prompt(format!("no scripted reply for `{question}`")))
    }

    fn resolve(&mut self, identifier: &str) -> Result<String> {
        if let Some(value) = self.answers.get(identifier) {
            debug!(identifier, "scripted answer");
            self.questions.push(identifier.to_string());
            return Ok(value.clone());
        }
        self.ask(&format!("Enter a value for {identifier}"))
    }

    fn say(&mut self, message: &str) -> Result<()> {
        self.messages.push(message.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_console_prompter_reads_line() {
        let mut prompter = ConsolePrompter::new("Acme Corp\r\nnext\n".as_bytes(), Vec::new());
        assert_eq!(prompter.resolve("CLIENT").unwrap(), "Acme Corp");
        assert_eq!(prompter.ask("Other").unwrap(), "next");

        let shown = String::from_utf8(prompter.into_output()).unwrap();
        assert!(shown.contains("Enter a value for CLIENT:  "));
        assert!(shown.contains("Other:  "));
    }

    #[test]
    fn test_console_prompter_say() {
        let mut prompter = ConsolePrompter::new("".as_bytes(), Vec::new());
        prompter.say("1) Memo").unwrap();
        assert_eq!(String::from_utf8(prompter.into_output()).unwrap(), "1) Memo\n");
    }

    #[test]
    fn test_console_prompter_keeps_empty_answer() {
        let mut prompter = ConsolePrompter::new("\n".as_bytes(), Vec::new());
        assert_eq!(prompter.resolve("NOTE").unwrap(), "");
    }

    #[test]
    fn test_console_prompter_eof() {
        let mut prompter = ConsolePrompter::new("".as_bytes(), Vec::new());
        assert!(matches!(prompter.ask("q"), Err(Error::Prompt(_))));
    }

    #[test]
    fn test_scripted_answers_and_replies() {
        let mut prompter = ScriptedPrompter::new().answer("CLIENT", "Acme").reply("queued");
        assert_eq!(prompter.resolve("CLIENT").unwrap(), "Acme");
        assert_eq!(prompter.resolve("CLIENT").unwrap(), "Acme");
        assert_eq!(prompter.resolve("OTHER").unwrap(), "queued");
        assert!(prompter.resolve("THIRD").is_err());
        assert_eq!(prompter.questions().len(), 4);
    }

    #[test]
    fn test_mut_ref_forwarding() {
        fn resolve_a<P: Prompter>(mut prompter: P) -> String {
            prompter.resolve("A").unwrap()
        }

        let mut inner = ScriptedPrompter::new().answer("A", "1");
        assert_eq!(resolve_a(&mut inner), "1");
        assert_eq!(inner.questions(), ["A".to_string()]);
    }
}
