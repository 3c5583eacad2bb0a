use inquire::{InquireError, Select, Text};

use crate::Chain;

pub const CHAIN_SELECTION_PROMPT: &str =
    "Select a chain to deploy to (use arrow keys to navigate):";

/// Questions for the constructor parameters that follow the World ID address, in parameter
/// order. Extend this list when the contract constructor grows.
pub const CONSTRUCTOR_PROMPTS: [&str; 2] = ["App ID:", "Action:"];

/// Interactive input. Questions are asked one at a time; answers are returned verbatim.
pub trait Prompter {
    fn select_chain(&mut self, chains: &[Chain]) -> Result<Chain, InquireError>;

    fn ask(&mut self, question: &str) -> Result<String, InquireError>;
}

/// Prompts on the controlling terminal.
#[derive(Copy, Clone, Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn select_chain(&mut self, chains: &[Chain]) -> Result<Chain, InquireError> {
        Select::new(CHAIN_SELECTION_PROMPT, chains.to_vec()).prompt()
    }

    fn ask(&mut self, question: &str) -> Result<String, InquireError> {
        Text::new(question).prompt()
    }
}
