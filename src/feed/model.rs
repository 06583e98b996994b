use chrono::{DateTime, Utc};

/// Default cap on the number of entries kept from a single feed.
pub const MAX_ENTRIES: usize = 1000;

/// Normalized result of parsing an RSS or Atom document.
///
/// Produced fresh for every fetch. Entries keep the order the source feed
/// lists them in and are never re-sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFeed {
    /// Feed-level fields (title, link, language, ...)
    pub metadata: FeedMetadata,
    /// Feed items in source order, capped at [`MAX_ENTRIES`] by the parser
    pub entries: Vec<EntryRecord>,
    /// Set when the source XML could not be parsed cleanly
    pub bozo: bool,
    /// Parser error message that caused `bozo` to be set
    pub bozo_exception: Option<String>,
}

impl ParsedFeed {
    /// Builds the "malformed input" result: no metadata, no entries.
    pub fn bozo(message: impl Into<String>) -> Self {
        Self {
            bozo: true,
            bozo_exception: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Feed-level fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedMetadata {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    /// Atom 0.3 `info`. feed-rs does not surface it, so it is only set when
    /// metadata is built by hand.
    pub info: Option<String>,
    pub link: Option<String>,
    pub language: Option<String>,
    pub author: Option<String>,
    pub id: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

/// A single feed item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryRecord {
    pub title: Option<String>,
    pub link: Option<String>,
    /// Source `<guid>`/`<id>`. Absent when the feed omits it; the Atom
    /// output falls back to `link`.
    pub id: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    /// Body of the first content block
    pub content: Option<String>,
    pub summary: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

/// Named access to the string fields of a record.
///
/// Unknown keys resolve to `None`, so a candidate list may name fields that a
/// particular record type does not carry.
pub trait FieldLookup {
    fn field(&self, key: &str) -> Option<&str>;
}

impl FieldLookup for FeedMetadata {
    fn field(&self, key: &str) -> Option<&str> {
        match key {
            "title" => self.title.as_deref(),
            "subtitle" => self.subtitle.as_deref(),
            "info" => self.info.as_deref(),
            "link" => self.link.as_deref(),
            "language" => self.language.as_deref(),
            "author" => self.author.as_deref(),
            "id" => self.id.as_deref(),
            _ => None,
        }
    }
}

impl FieldLookup for EntryRecord {
    fn field(&self, key: &str) -> Option<&str> {
        match key {
            "title" => self.title.as_deref(),
            "link" => self.link.as_deref(),
            "id" => self.id.as_deref(),
            "author" => self.author.as_deref(),
            "publisher" => self.publisher.as_deref(),
            "content" => self.content.as_deref(),
            "summary" => self.summary.as_deref(),
            _ => None,
        }
    }
}

/// Returns the value of the first key in `keys` that is present on `source`.
///
/// # Examples
///
/// ```
/// use refeed::feed::{first_non_none, FeedMetadata};
///
/// let meta = FeedMetadata {
///     subtitle: Some("S".to_string()),
///     ..FeedMetadata::default()
/// };
/// assert_eq!(first_non_none(&meta, &["title", "subtitle", "info"]), Some("S"));
/// ```
pub fn first_non_none<'a, T>(source: &'a T, keys: &[&str]) -> Option<&'a str>
where
    T: FieldLookup + ?Sized,
{
    keys.iter().find_map(|key| source.field(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_non_none_respects_key_order() {
        let meta = FeedMetadata {
            title: Some("T".into()),
            subtitle: Some("S".into()),
            ..FeedMetadata::default()
        };
        assert_eq!(first_non_none(&meta, &["subtitle", "title"]), Some("S"));
        assert_eq!(first_non_none(&meta, &["title", "subtitle"]), Some("T"));
    }

    #[test]
    fn test_first_non_none_skips_absent_fields() {
        let entry = EntryRecord {
            publisher: Some("Pub".into()),
            ..EntryRecord::default()
        };
        assert_eq!(first_non_none(&entry, &["author", "publisher"]), Some("Pub"));
    }

    #[test]
    fn test_first_non_none_unknown_keys_resolve_to_none() {
        let entry = EntryRecord {
            title: Some("x".into()),
            ..EntryRecord::default()
        };
        assert_eq!(first_non_none(&entry, &["info", "nonsense"]), None);
        assert_eq!(first_non_none(&entry, &[]), None);
    }

    #[test]
    fn test_present_empty_string_counts_as_present() {
        let meta = FeedMetadata {
            title: Some(String::new()),
            subtitle: Some("S".into()),
            ..FeedMetadata::default()
        };
        assert_eq!(first_non_none(&meta, &["title", "subtitle"]), Some(""));
    }

    #[test]
    fn test_bozo_constructor() {
        let feed = ParsedFeed::bozo("no root");
        assert!(feed.bozo);
        assert_eq!(feed.bozo_exception.as_deref(), Some("no root"));
        assert!(feed.entries.is_empty());
        assert_eq!(feed.metadata, FeedMetadata::default());
    }
}
