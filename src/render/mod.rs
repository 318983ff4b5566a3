//! Result rendering: numbered, highlighted, collapsible code cards

pub mod card;
pub mod clipboard;
pub mod syntax;

pub use card::{MatchTier, ResultCard, ResultView};
pub use clipboard::{Clipboard, SystemClipboard};
pub use syntax::TokenClass;
