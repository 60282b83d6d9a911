// WHY: classifier tables are passed in as values so callers and tests can
// swap punctuation and domain lists without touching shared state

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;
use crate::note::{EMAIL, EMOJI, HASHTAG, MENTION, URL};
use crate::scanner::FieldFunc;

pub mod emoji;
pub mod links;
pub mod social;

pub use emoji::{EmojiCode, EmojiTable};
pub use links::{Email, Url};
pub use social::{Hashtag, Mention};

/// Common punctuation and quotation characters trimmed from token edges
pub const DEFAULT_PUNCTUATION: &str = ".?!'\",;";

/// Domain suffixes recognised by the url and email classifiers
pub const DEFAULT_DOMAIN_SUFFIXES: &[&str] = &[
    ".com", ".net", ".org", ".edu", ".co", ".io", ".uk", ".us", ".ca", ".de", ".jp", ".fr",
    ".au", ".ru", ".ch", ".it", ".nl", ".se", ".no", ".es", ".mil",
];

/// Data shared by the built-in classifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Characters stripped from both ends of a field before matching
    pub punctuation: String,
    /// Suffixes that mark a field as a domain name, checked in order
    pub domain_suffixes: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            punctuation: DEFAULT_PUNCTUATION.to_string(),
            domain_suffixes: DEFAULT_DOMAIN_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ClassifierConfig {
    /// Parse a JSON config; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Trim punctuation characters off both ends of `field`
    pub fn trim_punctuation<'a>(&self, field: &'a [u8]) -> &'a [u8] {
        let mut trimmed = field;
        let mut buf = [0u8; 4];
        loop {
            let before = trimmed.len();
            for ch in self.punctuation.chars() {
                let encoded = ch.encode_utf8(&mut buf).as_bytes();
                if let Some(rest) = trimmed.strip_prefix(encoded) {
                    trimmed = rest;
                }
                if let Some(rest) = trimmed.strip_suffix(encoded) {
                    trimmed = rest;
                }
            }
            if trimmed.len() == before {
                return trimmed;
            }
        }
    }

    /// Whether `field` ends with one of the configured domain suffixes
    pub fn has_domain_suffix(&self, field: &[u8]) -> bool {
        self.domain_suffixes
            .iter()
            .any(|suffix| field.ends_with(suffix.as_bytes()))
    }
}

/// Hands out the built-in finders, all sharing one config
#[derive(Debug, Clone, Default)]
pub struct Finders {
    config: Arc<ClassifierConfig>,
}

impl Finders {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Finds @twitter style mentions
    pub fn mentions(&self) -> FieldFunc {
        FieldFunc::new(MENTION, Mention::new(Arc::clone(&self.config)))
    }

    /// Finds #hashtags
    pub fn hashtags(&self) -> FieldFunc {
        FieldFunc::new(HASHTAG, Hashtag::new(Arc::clone(&self.config)))
    }

    /// Finds web addresses
    pub fn urls(&self) -> FieldFunc {
        FieldFunc::new(URL, Url::new(Arc::clone(&self.config)))
    }

    /// Finds email addresses
    pub fn emails(&self) -> FieldFunc {
        FieldFunc::new(EMAIL, Email::new(Arc::clone(&self.config)))
    }

    /// Finds :emoji: codes
    pub fn emoji(&self) -> FieldFunc {
        FieldFunc::new(EMOJI, EmojiCode::new(Arc::clone(&self.config)))
    }

    /// Finder for a kind tag, if it is one of the built-in kinds
    pub fn by_kind(&self, kind: &str) -> Option<FieldFunc> {
        match kind {
            MENTION => Some(self.mentions()),
            HASHTAG => Some(self.hashtags()),
            URL => Some(self.urls()),
            EMAIL => Some(self.emails()),
            EMOJI => Some(self.emoji()),
            _ => None,
        }
    }

    /// Every built-in finder
    pub fn all(&self) -> Vec<FieldFunc> {
        vec![
            self.mentions(),
            self.hashtags(),
            self.urls(),
            self.emails(),
            self.emoji(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_punctuation_both_ends() {
        let config = ClassifierConfig::default();
        assert_eq!(config.trim_punctuation(b"\"@mat\","), b"@mat");
        assert_eq!(config.trim_punctuation(b"Google.com?"), b"Google.com");
        assert_eq!(config.trim_punctuation(b"...!?"), b"");
        assert_eq!(config.trim_punctuation(b"plain"), b"plain");
    }

    #[test]
    fn test_trim_custom_multibyte_punctuation() {
        let config = ClassifierConfig {
            punctuation: "\u{201C}\u{201D}.".to_string(),
            ..Default::default()
        };
        let field = "\u{201C}@mat.\u{201D}".as_bytes();
        assert_eq!(config.trim_punctuation(field), b"@mat");
    }

    #[test]
    fn test_domain_suffix() {
        let config = ClassifierConfig::default();
        assert!(config.has_domain_suffix(b"downlist.io"));
        assert!(config.has_domain_suffix(b"example.co.uk"));
        assert!(!config.has_domain_suffix(b"example.zz"));
    }

    #[test]
    fn test_from_json_keeps_missing_defaults() {
        let config = ClassifierConfig::from_json(r#"{"domain_suffixes": [".dev"]}"#).unwrap();
        assert_eq!(config.punctuation, DEFAULT_PUNCTUATION);
        assert_eq!(config.domain_suffixes, vec![".dev".to_string()]);

        assert!(ClassifierConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_by_kind() {
        let finders = Finders::default();
        assert_eq!(finders.by_kind("mention").unwrap().kind(), MENTION);
        assert_eq!(finders.by_kind("emoji").unwrap().kind(), EMOJI);
        assert!(finders.by_kind("weather").is_none());
        assert_eq!(finders.all().len(), 5);
    }
}
