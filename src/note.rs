// WHY: a Note is the only value that crosses from scanning into expansion,
// so its offset rules live here next to the type

use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::borrow::Cow;
use std::fmt;

/// Kind tag for `@name` mentions
pub const MENTION: &str = "mention";
/// Kind tag for `#tag` hashtags
pub const HASHTAG: &str = "hashtag";
/// Kind tag for web addresses
pub const URL: &str = "url";
/// Kind tag for email addresses
pub const EMAIL: &str = "email";
/// Kind tag for `:name:` emoji codes
pub const EMOJI: &str = "emoji";

/// Something interesting found within a source text.
///
/// `start` is a byte offset into the original, unmodified source and the end
/// is always derived from it, so `source[start..end()] == val` holds for every
/// note a finder produces. Only the expander moves `start`, and only while it
/// owns the note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub val: Vec<u8>,
    pub start: usize,
    pub kind: String,
}

impl Note {
    pub fn new(val: impl Into<Vec<u8>>, start: usize, kind: impl Into<String>) -> Self {
        Self {
            val: val.into(),
            start,
            kind: kind.into(),
        }
    }

    /// Byte offset one past the last byte of the note
    pub fn end(&self) -> usize {
        self.start + self.val.len()
    }

    /// Value as text, replacing invalid UTF-8 sequences
    pub fn as_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.val)
    }

    /// Check the note against the source it was produced from
    pub fn matches(&self, source: &[u8]) -> bool {
        source.get(self.start..self.end()) == Some(self.val.as_slice())
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

impl Serialize for Note {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Note", 4)?;
        state.serialize_field("val", &self.as_str())?;
        state.serialize_field("start", &self.start)?;
        state.serialize_field("end", &self.end())?;
        state.serialize_field("kind", &self.kind)?;
        state.end()
    }
}

/// Sort notes by start offset.
/// Stable, so notes sharing a start keep their insertion order.
pub fn sort_notes(notes: &mut [Note]) {
    notes.sort_by_key(|note| note.start);
}
