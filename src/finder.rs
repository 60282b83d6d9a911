use futures::future::BoxFuture;
use std::sync::Arc;

use crate::error::Result;
use crate::note::Note;

/// Types capable of finding notes in a source text.
///
/// The source is shared, read-only bytes. The returned future owns
/// everything it needs, so it can be spawned onto the runtime and a single
/// finder can serve many concurrent callers.
///
/// The built-in finders spawn their work with `tokio::task`, so their
/// futures must be polled inside a tokio runtime; polling them from another
/// executor panics.
pub trait Finder: Send + Sync {
    fn find(&self, source: Arc<[u8]>) -> BoxFuture<'static, Result<Vec<Note>>>;
}

impl<T: Finder + ?Sized> Finder for Arc<T> {
    fn find(&self, source: Arc<[u8]>) -> BoxFuture<'static, Result<Vec<Note>>> {
        (**self).find(source)
    }
}

impl<T: Finder + ?Sized> Finder for Box<T> {
    fn find(&self, source: Arc<[u8]>) -> BoxFuture<'static, Result<Vec<Note>>> {
        (**self).find(source)
    }
}

/// Use the finder to find notes within the specified string
pub async fn find_string(finder: &dyn Finder, source: &str) -> Result<Vec<Note>> {
    finder.find(Arc::from(source.as_bytes())).await
}
