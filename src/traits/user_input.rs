use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::io::{BufRead, IsTerminal, Write};
use std::sync::Mutex;

/// Response type for mock user input
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum MockResponse {
    Password(String),
    Cancelled,
}

/// Trait for user input operations to enable testing with mocks
pub trait UserInput: Send + Sync {
    /// Read a sensitive value without echoing it
    fn password(&self, prompt: &str) -> Result<String>;
}

/// Real user input implementation using inquire crate
///
/// Falls back to a plain line read when stdin is not a terminal, so the
/// value can be piped in.
pub struct InquireUserInput;

impl InquireUserInput {
    fn read_piped_line(prompt: &str) -> Result<String> {
        print!("{} ", prompt);
        std::io::stdout().flush().context("Failed to flush prompt")?;

        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;

        // A bare newline or EOF both end up as an empty value
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl UserInput for InquireUserInput {
    fn password(&self, prompt: &str) -> Result<String> {
        if !std::io::stdin().is_terminal() {
            return Self::read_piped_line(prompt);
        }

        use inquire::{Password, PasswordDisplayMode};
        let answer = Password::new(prompt)
            .with_display_mode(PasswordDisplayMode::Hidden)
            .without_confirmation()
            .prompt()?;
        Ok(answer)
    }
}

/// Mock user input implementation for testing
#[allow(dead_code)]
pub struct MockUserInput {
    responses: Mutex<VecDeque<MockResponse>>,
    prompts: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockUserInput {
    /// Create new mock with no pre-configured responses
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Create mock with pre-configured responses
    pub fn with_responses(responses: Vec<MockResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts shown so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Get the next response from the queue
    fn next_response(&self) -> Result<MockResponse> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("No more mock responses available"))
    }
}

impl Default for MockUserInput {
    fn default() -> Self {
        Self::new()
    }
}

impl UserInput for MockUserInput {
    fn password(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        match self.next_response()? {
            MockResponse::Password(answer) => Ok(answer),
            MockResponse::Cancelled => anyhow::bail!("Operation was canceled by the user"),
        }
    }
}
