pub mod aggregate;
pub mod classifiers;
pub mod error;
pub mod expander;
pub mod fields;
pub mod finder;
pub mod note;
pub mod scanner;
pub mod web;

// Re-export main types for convenient access
pub use note::{sort_notes, Note, EMAIL, EMOJI, HASHTAG, MENTION, URL};
pub use error::{Error, Result};

// Re-export scanning and aggregation entry points
pub use finder::{find_string, Finder};
pub use scanner::{Classifier, FieldFunc};
pub use aggregate::{find_many, find_many_string, Many};
pub use expander::{Expander, Rewrite};

// Re-export built-in classifiers and their configuration
pub use classifiers::{ClassifierConfig, EmojiTable, Finders};
