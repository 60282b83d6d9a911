use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use super::ClassifierConfig;
use crate::scanner::Classifier;

/// Raw `:name:` emoji codes, punctuation trimmed
#[derive(Debug, Clone, Default)]
pub struct EmojiCode {
    config: Arc<ClassifierConfig>,
}

impl EmojiCode {
    pub fn new(config: Arc<ClassifierConfig>) -> Self {
        Self { config }
    }
}

impl Classifier for EmojiCode {
    fn classify<'f>(&self, field: &'f [u8]) -> Option<Cow<'f, [u8]>> {
        let trimmed = self.config.trim_punctuation(field);
        let is_code = trimmed.len() > 2 && trimmed.starts_with(b":") && trimmed.ends_with(b":");
        is_code.then_some(Cow::Borrowed(trimmed))
    }
}

/// Lookup from `:name:` codes to glyphs.
///
/// The default table resolves the full set of GitHub shortcodes through the
/// `emojis` crate; entries added with [`EmojiTable::insert`] take precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiTable {
    overrides: HashMap<String, String>,
    shortcodes: bool,
}

impl Default for EmojiTable {
    fn default() -> Self {
        Self {
            overrides: HashMap::new(),
            shortcodes: true,
        }
    }
}

impl EmojiTable {
    /// Table with no entries, not even the GitHub shortcodes
    pub fn empty() -> Self {
        Self {
            overrides: HashMap::new(),
            shortcodes: false,
        }
    }

    /// Add or replace a code; the colons are optional
    pub fn insert(&mut self, code: &str, glyph: impl Into<String>) {
        self.overrides.insert(normalize_code(code), glyph.into());
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        if let Some(glyph) = self.overrides.get(code) {
            return Some(glyph.as_str());
        }
        if !self.shortcodes {
            return None;
        }
        let name = code.strip_prefix(':')?.strip_suffix(':')?;
        emojis::get_by_shortcode(name).map(|emoji| emoji.as_str())
    }

    /// Whether no code can resolve
    pub fn is_empty(&self) -> bool {
        !self.shortcodes && self.overrides.is_empty()
    }

    /// Glyph for a code; unknown codes come back unchanged
    pub fn expand(&self, code: &str) -> String {
        self.get(code).unwrap_or(code).to_string()
    }
}

/// Collects into an [`EmojiTable::empty`] table holding only the given codes
impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for EmojiTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::empty();
        table.extend(iter);
        table
    }
}

impl<K: AsRef<str>, V: Into<String>> Extend<(K, V)> for EmojiTable {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (code, glyph) in iter {
            self.insert(code.as_ref(), glyph);
        }
    }
}

fn normalize_code(code: &str) -> String {
    let name = code.trim_matches(':');
    format!(":{name}:")
}
