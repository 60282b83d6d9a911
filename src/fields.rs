// WHY: fields are keyed by offset, never by content; the same word can
// appear several times and each occurrence must keep its own position

use std::collections::BTreeMap;

/// Whitespace-delimited fields keyed by their starting byte offset in the source
pub type Fields<'a> = BTreeMap<usize, &'a [u8]>;

/// ASCII whitespace as used for field splitting (includes vertical tab,
/// which `u8::is_ascii_whitespace` does not)
fn is_ascii_space(byte: u8) -> bool {
    matches!(byte, b'\t' | b'\n' | 0x0B | 0x0C | b'\r' | b' ')
}

/// Split `src` into maximal runs of non-whitespace bytes.
///
/// Pure ASCII input takes a byte-wise path. Any byte with the high bit set
/// switches to Unicode whitespace classification on codepoint boundaries,
/// so multi-byte characters are never split. Invalid UTF-8 bytes count as
/// non-whitespace.
pub fn split_fields(src: &[u8]) -> Fields<'_> {
    if src.is_ascii() {
        split_ascii(src)
    } else {
        split_unicode(src)
    }
}

fn split_ascii(src: &[u8]) -> Fields<'_> {
    let mut collector = FieldCollector::new(src);
    for (at, &byte) in src.iter().enumerate() {
        if is_ascii_space(byte) {
            collector.space(at);
        } else {
            collector.word(at);
        }
    }
    collector.finish()
}

fn split_unicode(src: &[u8]) -> Fields<'_> {
    let mut collector = FieldCollector::new(src);
    let mut offset = 0;

    for chunk in src.utf8_chunks() {
        for (i, ch) in chunk.valid().char_indices() {
            if ch.is_whitespace() {
                collector.space(offset + i);
            } else {
                collector.word(offset + i);
            }
        }
        offset += chunk.valid().len();

        if !chunk.invalid().is_empty() {
            collector.word(offset);
            offset += chunk.invalid().len();
        }
    }
    collector.finish()
}

/// Tracks the currently open field while walking the source
struct FieldCollector<'a> {
    src: &'a [u8],
    open: Option<usize>,
    fields: Fields<'a>,
}

impl<'a> FieldCollector<'a> {
    fn new(src: &'a [u8]) -> Self {
        Self {
            src,
            open: None,
            fields: BTreeMap::new(),
        }
    }

    fn word(&mut self, at: usize) {
        if self.open.is_none() {
            self.open = Some(at);
        }
    }

    fn space(&mut self, at: usize) {
        if let Some(start) = self.open.take() {
            let src = self.src;
            self.fields.insert(start, &src[start..at]);
        }
    }

    fn finish(mut self) -> Fields<'a> {
        self.space(self.src.len());
        self.fields
    }
}
