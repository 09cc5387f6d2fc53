//! Markup parser: tokenizer states and tree construction.

/// Parser state, insertion modes and tree construction.
pub mod core;
mod doctype;
mod helpers;
mod raw_text;
/// The tokenizer state machine.
pub mod states;

pub use self::core::{HTMLParser, InsertionMode, print_tree};
pub use self::states::TokenizerState;
