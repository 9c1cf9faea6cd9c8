pub mod user_input;
pub mod output;
pub mod command;

pub use user_input::{UserInput, InquireUserInput};
pub use output::{Output, TerminalOutput};
pub use command::{CommandExecutor, RealCommandExecutor};

#[cfg(test)]
pub use user_input::{MockResponse, MockUserInput};
#[cfg(test)]
pub use output::{MockOutput, OutputMessage};
#[cfg(test)]
pub use command::{MockCommandExecutor, MockCommandResult};
