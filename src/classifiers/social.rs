use std::borrow::Cow;
use std::sync::Arc;

use super::ClassifierConfig;
use crate::scanner::Classifier;

/// Punctuation-trimmed field starting with `sigil` and at least one more byte
fn sigil_token<'f>(config: &ClassifierConfig, field: &'f [u8], sigil: u8) -> Option<Cow<'f, [u8]>> {
    let trimmed = config.trim_punctuation(field);
    (trimmed.len() > 1 && trimmed[0] == sigil).then_some(Cow::Borrowed(trimmed))
}

/// `@name` mentions
#[derive(Debug, Clone, Default)]
pub struct Mention {
    config: Arc<ClassifierConfig>,
}

impl Mention {
    pub fn new(config: Arc<ClassifierConfig>) -> Self {
        Self { config }
    }
}

impl Classifier for Mention {
    fn classify<'f>(&self, field: &'f [u8]) -> Option<Cow<'f, [u8]>> {
        sigil_token(&self.config, field, b'@')
    }
}

/// `#tag` hashtags
#[derive(Debug, Clone, Default)]
pub struct Hashtag {
    config: Arc<ClassifierConfig>,
}

impl Hashtag {
    pub fn new(config: Arc<ClassifierConfig>) -> Self {
        Self { config }
    }
}

impl Classifier for Hashtag {
    fn classify<'f>(&self, field: &'f [u8]) -> Option<Cow<'f, [u8]>> {
        sigil_token(&self.config, field, b'#')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::Finders;
    use crate::note::sort_notes;
    use std::sync::Arc;

    fn classify(classifier: &dyn Classifier, field: &str) -> Option<String> {
        classifier
            .classify(field.as_bytes())
            .map(|chosen| String::from_utf8(chosen.into_owned()).unwrap())
    }

    #[test]
    fn test_mention_trims_punctuation() {
        let mention = Mention::default();
        assert_eq!(classify(&mention, "@matryer"), Some("@matryer".into()));
        assert_eq!(classify(&mention, "\"@mat\","), Some("@mat".into()));
        assert_eq!(classify(&mention, "@"), None);
        assert_eq!(classify(&mention, "mat@"), None);
        assert_eq!(classify(&mention, "#mat"), None);
    }

    #[test]
    fn test_hashtag_trims_punctuation() {
        let hashtag = Hashtag::default();
        assert_eq!(classify(&hashtag, "#lovely."), Some("#lovely".into()));
        assert_eq!(classify(&hashtag, "#"), None);
        assert_eq!(classify(&hashtag, "@lovely"), None);
    }

    #[tokio::test]
    async fn test_mentions_in_text() {
        let src = "Call me @matryer on Twitter, or follow @downlistapp instead.";
        let mut notes = Finders::default()
            .mentions()
            .scan(Arc::from(src.as_bytes()))
            .await
            .unwrap();
        sort_notes(&mut notes);

        let found: Vec<_> = notes.iter().map(|n| (n.to_string(), n.start, n.end())).collect();
        assert_eq!(
            found,
            vec![("@matryer".to_string(), 8, 16), ("@downlistapp".to_string(), 39, 51)]
        );
        assert!(notes.iter().all(|n| n.kind == "mention"));
    }

    #[tokio::test]
    async fn test_hashtags_in_text() {
        let src = "I love programming in #golang - it's #lovely.";
        let mut notes = Finders::default()
            .hashtags()
            .scan(Arc::from(src.as_bytes()))
            .await
            .unwrap();
        sort_notes(&mut notes);

        let found: Vec<_> = notes.iter().map(|n| (n.to_string(), n.start)).collect();
        assert_eq!(found, vec![("#golang".to_string(), 22), ("#lovely".to_string(), 37)]);
        assert!(notes.iter().all(|n| n.kind == "hashtag"));
    }
}
