// WHY: the field scanner is the only place offsets are assigned, so every
// note's start is resolved here against its own field and nowhere else

use futures::future::{BoxFuture, FutureExt};
use std::borrow::Cow;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::fields::split_fields;
use crate::finder::Finder;
use crate::note::Note;

/// Decides whether a single field is a match and which bytes to record.
///
/// Returning `Some(chosen)` reports a match; `chosen` must be a contiguous
/// part of `field`, otherwise the scan fails with
/// [`Error::UnmatchedSubstring`].
pub trait Classifier: Send + Sync + 'static {
    fn classify<'f>(&self, field: &'f [u8]) -> Option<Cow<'f, [u8]>>;
}

/// Plain closures work as classifiers
impl<F> Classifier for F
where
    F: Fn(&[u8]) -> Option<Vec<u8>> + Send + Sync + 'static,
{
    fn classify<'f>(&self, field: &'f [u8]) -> Option<Cow<'f, [u8]>> {
        self(field).map(Cow::Owned)
    }
}

/// A finder that classifies every whitespace-delimited field of the source
/// concurrently, one task per field.
#[derive(Clone)]
pub struct FieldFunc {
    kind: Arc<str>,
    classifier: Arc<dyn Classifier>,
}

impl FieldFunc {
    pub fn new(kind: impl Into<String>, classifier: impl Classifier) -> Self {
        Self {
            kind: Arc::from(kind.into()),
            classifier: Arc::new(classifier),
        }
    }

    /// Kind tag given to every note this finder produces
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Scan all fields of `source`.
    ///
    /// Returns once every field task has finished, or at the first failure.
    /// On failure the remaining tasks are aborted and the notes collected so
    /// far are dropped. Notes come back in completion order.
    pub async fn scan(&self, source: Arc<[u8]>) -> Result<Vec<Note>> {
        let spans: Vec<Range<usize>> = split_fields(&source)
            .into_iter()
            .map(|(start, field)| start..start + field.len())
            .collect();
        let field_count = spans.len();

        let mut tasks = JoinSet::new();
        for span in spans {
            let source = Arc::clone(&source);
            let classifier = Arc::clone(&self.classifier);
            let kind = Arc::clone(&self.kind);
            tasks.spawn(async move { classify_field(classifier.as_ref(), &kind, &source, span) });
        }

        let mut notes = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.map_err(Error::from).and_then(|result| result);
            match outcome {
                Ok(Some(note)) => notes.push(note),
                Ok(None) => {}
                Err(e) => {
                    warn!(kind = %self.kind, error = %e, "Field scan failed, abandoning remaining fields");
                    tasks.abort_all();
                    return Err(e);
                }
            }
        }

        debug!(kind = %self.kind, fields = field_count, notes = notes.len(), "Field scan complete");
        Ok(notes)
    }
}

impl Finder for FieldFunc {
    fn find(&self, source: Arc<[u8]>) -> BoxFuture<'static, Result<Vec<Note>>> {
        let scanner = self.clone();
        async move { scanner.scan(source).await }.boxed()
    }
}

impl fmt::Debug for FieldFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldFunc").field("kind", &self.kind).finish_non_exhaustive()
    }
}

/// Classify one field and resolve the chosen bytes to an absolute offset
fn classify_field(
    classifier: &dyn Classifier,
    kind: &str,
    source: &[u8],
    span: Range<usize>,
) -> Result<Option<Note>> {
    let field = &source[span.clone()];
    let Some(chosen) = classifier.classify(field) else {
        return Ok(None);
    };

    // WHY: searching the whole source would pick the first occurrence of a
    // repeated token; the position is only unambiguous within this field
    let offset = locate(field, &chosen)
        .ok_or_else(|| Error::UnmatchedSubstring(chosen.to_vec()))?;

    let note = Note::new(chosen.into_owned(), span.start + offset, kind);
    debug_assert!(note.matches(source));
    Ok(Some(note))
}

/// Index of the first occurrence of `needle` within `haystack`
fn locate(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
