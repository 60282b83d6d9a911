// WHY: several finders scan the same read-only bytes, so the only
// synchronisation needed is the join point where their notes are merged

use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::finder::Finder;
use crate::note::Note;

/// Run every finder concurrently against `source` and merge their notes.
///
/// If any finder fails, the other finders are aborted, every note found so
/// far is discarded and only the error is returned.
///
/// Notes are concatenated in the order of `finders`, whatever order the
/// finders complete in. After a stable [`sort_notes`](crate::sort_notes),
/// notes that share a start are therefore ordered by finder position, so
/// when one field is claimed by several finders (`#foo.com` is a hashtag and
/// a url) the earlier finder wins in [`Expander::expand`](crate::Expander::expand).
pub async fn find_many(source: impl Into<Arc<[u8]>>, finders: &[&dyn Finder]) -> Result<Vec<Note>> {
    let source = source.into();
    let scans = finders
        .iter()
        .map(|finder| finder.find(Arc::clone(&source)))
        .collect();
    fan_in(scans).await
}

/// String form of [`find_many`]
pub async fn find_many_string(source: &str, finders: &[&dyn Finder]) -> Result<Vec<Note>> {
    find_many(source.as_bytes(), finders).await
}

async fn fan_in(scans: Vec<BoxFuture<'static, Result<Vec<Note>>>>) -> Result<Vec<Note>> {
    let finder_count = scans.len();
    let mut tasks = JoinSet::new();
    for (index, scan) in scans.into_iter().enumerate() {
        tasks.spawn(async move { (index, scan.await) });
    }

    // slot per finder so the merge order does not depend on completion order
    let mut slots: Vec<Option<Vec<Note>>> = vec![None; finder_count];
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined
            .map_err(Error::from)
            .and_then(|(index, result)| result.map(|found| (index, found)));
        match outcome {
            Ok((index, found)) => slots[index] = Some(found),
            Err(e) => {
                warn!(error = %e, "Finder failed, discarding merged notes");
                tasks.abort_all();
                return Err(e);
            }
        }
    }

    let notes: Vec<Note> = slots.into_iter().flatten().flatten().collect();
    debug!(finders = finder_count, notes = notes.len(), "Merged finder results");
    Ok(notes)
}

/// Wraps several finders into one; its `find` runs them all concurrently
/// with the same discard-on-error policy as [`find_many`].
#[derive(Clone, Default)]
pub struct Many {
    finders: Vec<Arc<dyn Finder>>,
}

impl Many {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a finder
    pub fn with(mut self, finder: impl Finder + 'static) -> Self {
        self.finders.push(Arc::new(finder));
        self
    }

    pub fn push(&mut self, finder: Arc<dyn Finder>) {
        self.finders.push(finder);
    }

    pub fn len(&self) -> usize {
        self.finders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.finders.is_empty()
    }
}

impl FromIterator<Arc<dyn Finder>> for Many {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Finder>>>(iter: I) -> Self {
        Self {
            finders: iter.into_iter().collect(),
        }
    }
}

impl Finder for Many {
    fn find(&self, source: Arc<[u8]>) -> BoxFuture<'static, Result<Vec<Note>>> {
        let scans = self
            .finders
            .iter()
            .map(|finder| finder.find(Arc::clone(&source)))
            .collect();
        fan_in(scans).boxed()
    }
}
