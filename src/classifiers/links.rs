use std::borrow::Cow;
use std::sync::Arc;

use super::ClassifierConfig;
use crate::scanner::Classifier;

/// Web addresses: `http…`/`www…` prefixes or a known domain suffix.
/// Fields containing `@` are left to the email classifier.
#[derive(Debug, Clone, Default)]
pub struct Url {
    config: Arc<ClassifierConfig>,
}

impl Url {
    pub fn new(config: Arc<ClassifierConfig>) -> Self {
        Self { config }
    }
}

impl Classifier for Url {
    fn classify<'f>(&self, field: &'f [u8]) -> Option<Cow<'f, [u8]>> {
        if field.contains(&b'@') {
            return None;
        }
        let trimmed = self.config.trim_punctuation(field);
        let is_url = trimmed.starts_with(b"http")
            || trimmed.starts_with(b"www")
            || self.config.has_domain_suffix(trimmed);
        is_url.then_some(Cow::Borrowed(trimmed))
    }
}

/// Email addresses: an `@` and a known domain suffix
#[derive(Debug, Clone, Default)]
pub struct Email {
    config: Arc<ClassifierConfig>,
}

impl Email {
    pub fn new(config: Arc<ClassifierConfig>) -> Self {
        Self { config }
    }
}

impl Classifier for Email {
    fn classify<'f>(&self, field: &'f [u8]) -> Option<Cow<'f, [u8]>> {
        if !field.contains(&b'@') {
            return None;
        }
        let trimmed = self.config.trim_punctuation(field);
        self.config
            .has_domain_suffix(trimmed)
            .then_some(Cow::Borrowed(trimmed))
    }
}
