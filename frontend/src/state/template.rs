//! The session's message template and its field tokens.
//!
//! A token is any `{field}` substring of the template text (the markers are
//! configurable through [`TokenSyntax`]). Tokens are resolved against a
//! recipient row at render time; a token whose field the row does not carry
//! renders as an empty string so a single sparse row never blocks a send.

use std::collections::{BTreeSet, HashMap};

use regex::Regex;

use common::model::datasource::DataSource;

/// Marker pair delimiting a field token inside template text.
///
/// There is no escaping: a literal marker character cannot appear in
/// rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSyntax {
    pub open: char,
    pub close: char,
}

impl Default for TokenSyntax {
    fn default() -> Self {
        Self {
            open: '{',
            close: '}',
        }
    }
}

impl TokenSyntax {
    /// A token referencing `field`, e.g. `{Name}`.
    pub fn token(&self, field: &str) -> String {
        format!("{}{}{}", self.open, field, self.close)
    }

    fn pattern(&self) -> Regex {
        let open = regex::escape(&self.open.to_string());
        let close = regex::escape(&self.close.to_string());
        // Escaped single-character literals always form a valid pattern.
        Regex::new(&format!("{open}([^{open}{close}]+){close}")).unwrap()
    }
}

/// The template being edited in this session, plus enough bookkeeping to
/// know whether it matches its last-saved backend record.
#[derive(Debug, Clone, Default)]
pub struct TemplateDraft {
    text: String,
    syntax: TokenSyntax,
    saved: Option<SavedTemplate>,
}

#[derive(Debug, Clone)]
struct SavedTemplate {
    id: String,
    digest: String,
}

impl TemplateDraft {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Replaces the template text wholesale.
    pub fn set_text(&mut self, text: String) {
        self.text = text;
    }

    /// Appends a token referencing `field` at the end of the text,
    /// separated by a space. Always succeeds; the field is not checked
    /// against any source until dispatch time.
    pub fn insert_field(&mut self, field: &str) {
        self.text.push(' ');
        self.text.push_str(&self.syntax.token(field));
    }

    /// The set of fields referenced by tokens in the current text.
    pub fn referenced_fields(&self) -> BTreeSet<String> {
        self.syntax
            .pattern()
            .captures_iter(&self.text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Referenced fields the given source does not provide. Pure read: the
    /// template text is left untouched.
    pub fn missing_fields(&self, source: &DataSource) -> BTreeSet<String> {
        self.referenced_fields()
            .into_iter()
            .filter(|field| !source.columns.contains(field))
            .collect()
    }

    /// Substitutes each token with the row's value for its field, verbatim.
    /// Fields absent from the row become empty strings.
    pub fn render(&self, row: &HashMap<String, String>) -> String {
        self.syntax
            .pattern()
            .replace_all(&self.text, |caps: &regex::Captures| {
                row.get(&caps[1]).cloned().unwrap_or_default()
            })
            .into_owned()
    }

    /// Records the backend id the current text was saved under.
    pub fn mark_saved(&mut self, id: String) {
        self.saved = Some(SavedTemplate {
            id,
            digest: content_digest(&self.text),
        });
    }

    /// True when the text differs from the last-saved record (or was never
    /// saved at all).
    pub fn is_dirty(&self) -> bool {
        match &self.saved {
            Some(saved) => saved.digest != content_digest(&self.text),
            None => !self.text.is_empty(),
        }
    }

    /// The saved record id, but only while the text still matches it.
    pub fn saved_id_if_clean(&self) -> Option<String> {
        match &self.saved {
            Some(saved) if saved.digest == content_digest(&self.text) => Some(saved.id.clone()),
            _ => None,
        }
    }
}

/// Hex digest used for template dirty-checking.
fn content_digest(input: &str) -> String {
    format!("{:x}", md5::compute(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(columns: &[&str]) -> DataSource {
        DataSource::from_parts(columns.iter().map(|c| c.to_string()).collect(), vec![]).unwrap()
    }

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn tokens_are_scanned_from_the_text() {
        let mut draft = TemplateDraft::default();
        draft.set_text("Hello {Name}, welcome to {Company}! Regards, {Name}".into());
        let fields: Vec<_> = draft.referenced_fields().into_iter().collect();
        assert_eq!(fields, vec!["Company", "Name"]);
    }

    #[test]
    fn insert_field_appends_a_token() {
        let mut draft = TemplateDraft::default();
        draft.set_text("Hello".into());
        draft.insert_field("Name");
        assert_eq!(draft.text(), "Hello {Name}");
    }

    #[test]
    fn missing_fields_is_a_pure_set_difference() {
        let mut draft = TemplateDraft::default();
        draft.set_text("Hi {Name} from {Company}".into());
        let before = draft.text().to_string();

        let missing = draft.missing_fields(&source(&["Email", "Name"]));
        assert_eq!(missing.into_iter().collect::<Vec<_>>(), vec!["Company"]);
        assert_eq!(draft.text(), before);
        assert!(draft.missing_fields(&source(&["Name", "Company"])).is_empty());
    }

    #[test]
    fn render_substitutes_values_verbatim() {
        let mut draft = TemplateDraft::default();
        draft.set_text("Hello {Name}, your code is {Code}".into());
        let rendered = draft.render(&row(&[("Name", "Alice"), ("Code", "A-7")]));
        assert_eq!(rendered, "Hello Alice, your code is A-7");
    }

    #[test]
    fn unresolved_tokens_render_as_empty() {
        let mut draft = TemplateDraft::default();
        draft.set_text("Hello {Name} of {Company}".into());
        let rendered = draft.render(&row(&[("Name", "Alice")]));
        assert_eq!(rendered, "Hello Alice of ");
    }

    #[test]
    fn custom_markers_are_honored() {
        let mut draft = TemplateDraft {
            syntax: TokenSyntax {
                open: '<',
                close: '>',
            },
            ..TemplateDraft::default()
        };
        draft.set_text("Hi <Name>, ignore {Name}".into());
        let fields: Vec<_> = draft.referenced_fields().into_iter().collect();
        assert_eq!(fields, vec!["Name"]);
        assert_eq!(
            draft.render(&row(&[("Name", "Bo")])),
            "Hi Bo, ignore {Name}"
        );
    }

    #[test]
    fn dirty_tracking_follows_saves_and_edits() {
        let mut draft = TemplateDraft::default();
        assert!(!draft.is_dirty());

        draft.set_text("Hello {Name}".into());
        assert!(draft.is_dirty());
        assert_eq!(draft.saved_id_if_clean(), None);

        draft.mark_saved("t1".into());
        assert!(!draft.is_dirty());
        assert_eq!(draft.saved_id_if_clean(), Some("t1".into()));

        draft.set_text("Hello {Name}!".into());
        assert!(draft.is_dirty());
        assert_eq!(draft.saved_id_if_clean(), None);
    }
}
