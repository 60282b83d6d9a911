// WHY: replacements change the text length, so every later note is shifted
// by the size difference before it is used

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use tracing::{debug, warn};

use crate::note::{sort_notes, Note};

/// Rewrite function applied to a note's value
pub type Rewrite = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Maps note kinds to rewrite functions used to replace the text of each
/// note in the original string.
#[derive(Default)]
pub struct Expander {
    rules: HashMap<String, Rewrite>,
    // applied to the text between replaced notes
    text_rule: Option<Rewrite>,
}

impl Expander {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Expander::insert`]
    pub fn with_rule<F>(mut self, kind: impl Into<String>, rewrite: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.insert(kind, rewrite);
        self
    }

    /// Set the rewrite for a kind, replacing any previous one
    pub fn insert<F>(&mut self, kind: impl Into<String>, rewrite: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.rules.insert(kind.into(), Box::new(rewrite));
    }

    /// Rewrite applied to every stretch of text outside the replaced notes,
    /// such as an html escaper when the rules produce markup
    pub fn with_text_rule<F>(mut self, rewrite: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.text_rule = Some(Box::new(rewrite));
        self
    }

    pub fn has_rule(&self, kind: &str) -> bool {
        self.rules.contains_key(kind)
    }

    /// Produce a new string with every note whose kind has a rule replaced
    /// by that rule's output.
    ///
    /// `notes` must have been found in `source` and are consumed: they are
    /// sorted by start, and each replacement shifts the start of every later
    /// note by the change in length. Notes without a rule are left as they
    /// are and shift nothing. A note that no longer lines up with the text
    /// (it overlaps an earlier replacement, runs past the end, or its bytes
    /// differ) is skipped with a warning and counts as plain text.
    pub fn expand(&self, source: &str, mut notes: Vec<Note>) -> String {
        sort_notes(&mut notes);

        let mut text = source.as_bytes().to_vec();
        // end of the most recent replacement, in current text coordinates
        let mut replaced_to = 0;
        let mut replaced = 0;

        for i in 0..notes.len() {
            let (done, pending) = notes.split_at_mut(i + 1);
            let note = &mut done[i];

            let Some(rewrite) = self.rules.get(&note.kind) else {
                continue;
            };

            if note.start < replaced_to || !note.matches(&text) {
                warn!(
                    kind = %note.kind,
                    start = note.start,
                    val = %note.as_str(),
                    "Skipping note that does not line up with the text"
                );
                continue;
            }

            let gap_delta = self.rewrite_text(&mut text, replaced_to..note.start);
            note.start = note.start.saturating_add_signed(gap_delta);

            let value = note.as_str();
            let insert = rewrite(&value);
            text.splice(note.start..note.end(), insert.bytes());

            let delta = gap_delta + insert.len() as isize - note.val.len() as isize;
            for later in pending.iter_mut() {
                later.start = later.start.saturating_add_signed(delta);
            }
            replaced_to = note.start + insert.len();
            replaced += 1;
        }

        let end = text.len();
        self.rewrite_text(&mut text, replaced_to..end);

        debug!(notes = notes.len(), replaced, "Expansion complete");
        String::from_utf8(text)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
    }

    /// Apply the text rule to `span` in place; returns the change in length
    fn rewrite_text(&self, text: &mut Vec<u8>, span: Range<usize>) -> isize {
        let Some(rewrite) = &self.text_rule else {
            return 0;
        };
        if span.is_empty() {
            return 0;
        }
        let plain = String::from_utf8_lossy(&text[span.clone()]).into_owned();
        let insert = rewrite(&plain);
        let delta = insert.len() as isize - span.len() as isize;
        text.splice(span, insert.bytes());
        delta
    }
}

impl fmt::Debug for Expander {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.rules.keys().collect();
        kinds.sort();
        f.debug_struct("Expander").field("kinds", &kinds).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::{HASHTAG, MENTION, URL};

    fn notes_for(source: &str, kind: &str, token: &str) -> Vec<Note> {
        source
            .match_indices(token)
            .map(|(start, val)| Note::new(val, start, kind))
            .collect()
    }

    #[test]
    fn test_repeated_tokens_each_replaced_once() {
        let source = "@ab x @ab y @ab";
        let expander = Expander::new().with_rule(MENTION, |v| format!("[{v}]"));
        let out = expander.expand(source, notes_for(source, MENTION, "@ab"));
        assert_eq!(out, "[@ab] x [@ab] y [@ab]");
    }

    #[test]
    fn test_shrinking_and_growing_rewrites() {
        let source = "@longname then @longname";
        let shrink = Expander::new().with_rule(MENTION, |_| "L".to_string());
        assert_eq!(shrink.expand(source, notes_for(source, MENTION, "@longname")), "L then L");

        let grow = Expander::new().with_rule(MENTION, |v| v.repeat(3));
        assert_eq!(
            grow.expand(source, notes_for(source, MENTION, "@longname")),
            "@longname@longname@longname then @longname@longname@longname"
        );
    }

    #[test]
    fn test_empty_rewrite_removes_token() {
        let source = "a #x b #x c";
        let expander = Expander::new().with_rule(HASHTAG, |_| String::new());
        assert_eq!(expander.expand(source, notes_for(source, HASHTAG, "#x")), "a  b  c");
    }

    #[test]
    fn test_unsorted_notes_are_sorted_first() {
        let source = "@a @b";
        let notes = vec![Note::new("@b", 3, MENTION), Note::new("@a", 0, MENTION)];
        let expander = Expander::new().with_rule(MENTION, |v| format!("<{v}>"));
        assert_eq!(expander.expand(source, notes), "<@a> <@b>");
    }

    #[test]
    fn test_kinds_without_rules_are_untouched() {
        let source = "#tag @who";
        let notes = vec![Note::new("#tag", 0, HASHTAG), Note::new("@who", 5, MENTION)];
        let expander = Expander::new().with_rule(MENTION, |v| format!("<{v}>"));
        assert_eq!(expander.expand(source, notes), "#tag <@who>");
    }

    #[test]
    fn test_multibyte_rewrites_keep_offsets() {
        let source = ":beer: and :beer:";
        let expander = Expander::new().with_rule("emoji", |_| "\u{1F37A}".to_string());
        assert_eq!(
            expander.expand(source, notes_for(source, "emoji", ":beer:")),
            "\u{1F37A} and \u{1F37A}"
        );
    }

    #[test]
    fn test_overlapping_note_is_skipped() {
        let source = "see www.a.com now";
        let notes = vec![Note::new("www.a.com", 4, URL), Note::new("a.com", 8, URL)];
        let expander = Expander::new().with_rule(URL, |v| format!("<{v}>"));
        assert_eq!(expander.expand(source, notes), "see <www.a.com> now");
    }

    #[test]
    fn test_foreign_notes_are_skipped() {
        let source = "short";
        let notes = vec![Note::new("@far", 100, MENTION), Note::new("@no", 0, MENTION)];
        let expander = Expander::new().with_rule(MENTION, |v| format!("<{v}>"));
        assert_eq!(expander.expand(source, notes), "short");
    }

    #[test]
    fn test_identity_rewrite_round_trips() {
        let source = "a @b c @b #d";
        let mut notes = notes_for(source, MENTION, "@b");
        notes.extend(notes_for(source, HASHTAG, "#d"));
        notes.reverse();
        let expander = Expander::new()
            .with_rule(MENTION, |v| v.to_string())
            .with_rule(HASHTAG, |v| v.to_string());
        assert_eq!(expander.expand(source, notes), source);
    }

    #[test]
    fn test_text_rule_rewrites_only_text_between_notes() {
        let source = "<b> @a & @b </b>";
        let notes = notes_for(source, MENTION, "@a")
            .into_iter()
            .chain(notes_for(source, MENTION, "@b"))
            .collect();
        let expander = Expander::new()
            .with_rule(MENTION, |v| format!("<i>{v}</i>"))
            .with_text_rule(|t| t.replace('<', "[").replace('>', "]").replace('&', "+"));
        assert_eq!(expander.expand(source, notes), "[b] <i>@a</i> + <i>@b</i> [/b]");
    }

    #[test]
    fn test_text_rule_without_notes_covers_whole_source() {
        let expander = Expander::new().with_text_rule(|t| t.to_uppercase());
        assert_eq!(expander.expand("plain text", Vec::new()), "PLAIN TEXT");
        assert_eq!(expander.expand("", Vec::new()), "");
    }

    #[test]
    fn test_debug_lists_kinds() {
        let expander = Expander::new()
            .with_rule(URL, |v| v.to_string())
            .with_rule(MENTION, |v| v.to_string());
        assert!(expander.has_rule(URL));
        assert!(!expander.has_rule(HASHTAG));
        assert_eq!(format!("{expander:?}"), r#"Expander { kinds: ["mention", "url"] }"#);
    }
}
