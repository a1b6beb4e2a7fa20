use anyhow::Result;
use dialoguer::Input;
use std::io::{self, BufRead, IsTerminal, Write};

/// Source of operator answers.
pub trait Prompt {
    /// Ask `question` and return the raw answer (may be empty).
    fn ask(&mut self, question: &str) -> Result<String>;
}

/// Reads answers from the process's stdin.
///
/// An interactive terminal gets a `dialoguer` prompt; piped input is read
/// line by line so the workflow can be scripted.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, question: &str) -> Result<String> {
        if io::stdin().is_terminal() {
            let answer: String = Input::new()
                .with_prompt(question)
                .allow_empty(true)
                .interact_text()?;
            return Ok(answer);
        }
        let mut stderr = io::stderr();
        write!(stderr, "{}: ", question)?;
        stderr.flush()?;
        read_answer(&mut io::stdin().lock())
    }
}

/// Read one line, stripping the line terminator. EOF counts as empty input.
pub fn read_answer(input: &mut dyn BufRead) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
