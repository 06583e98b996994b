//! Atom 1.0 serialization of a [`ParsedFeed`].
//!
//! Output is built in two passes: a compact Atom document is written first,
//! then re-read as generic XML so an `xml-stylesheet` processing instruction
//! can be placed right after the declaration while the whole document is
//! re-emitted with indentation.

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Cursor;
use thiserror::Error;

use crate::feed::model::{first_non_none, EntryRecord, FeedMetadata, ParsedFeed};

pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
pub const DEFAULT_STYLESHEET: &str = "/static/rss.xsl";

const FEED_TITLE_KEYS: &[&str] = &["title", "subtitle", "info"];
const ENTRY_AUTHOR_KEYS: &[&str] = &["author", "publisher"];

/// Errors that can occur while building the Atom document.
///
/// [`Transcoder::to_atom`] logs these and returns `None`; use
/// [`Transcoder::transcode`] to inspect them.
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("feed has no title")]
    MissingFeedTitle,

    #[error("feed has no id")]
    MissingFeedId,

    #[error("entry {index} has no {field}")]
    MissingEntryField { index: usize, field: &'static str },

    #[error("XML write error: {0}")]
    Write(String),

    #[error("XML read error: {0}")]
    Read(String),

    #[error("Generated XML contains invalid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Converts parsed feeds into stylesheet-annotated Atom documents.
#[derive(Debug, Clone)]
pub struct Transcoder {
    stylesheet_href: String,
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::new(DEFAULT_STYLESHEET)
    }
}

impl Transcoder {
    pub fn new(stylesheet_href: impl Into<String>) -> Self {
        Self {
            stylesheet_href: stylesheet_href.into(),
        }
    }

    pub fn stylesheet_href(&self) -> &str {
        &self.stylesheet_href
    }

    /// Renders `feed` as Atom, or `None` if there is nothing to render or
    /// rendering failed. Failures are logged, never returned.
    ///
    /// `feed_url` is the URL the feed was requested from; it stands in for
    /// the feed link when the source has none.
    pub fn to_atom(&self, feed_url: &str, feed: Option<&ParsedFeed>) -> Option<String> {
        let Some(feed) = feed else {
            tracing::error!(feed_url = %feed_url, "No parsed feed to transcode");
            return None;
        };

        match self.transcode(feed_url, feed) {
            Ok(xml) => Some(xml),
            Err(e) => {
                tracing::error!(feed_url = %feed_url, error = %e, "Atom transcoding failed");
                None
            }
        }
    }

    /// Same as [`Transcoder::to_atom`] but surfaces the failure reason.
    pub fn transcode(&self, feed_url: &str, feed: &ParsedFeed) -> Result<String, TranscodeError> {
        let document = AtomFeed::resolve(feed_url, feed, Utc::now())?;
        let compact = document.write()?;
        insert_stylesheet(&compact, &self.stylesheet_href)
    }
}

/// Renders `feed` with the default stylesheet (`/static/rss.xsl`).
///
/// See [`Transcoder::to_atom`].
pub fn to_atom(feed_url: &str, feed: Option<&ParsedFeed>) -> Option<String> {
    Transcoder::default().to_atom(feed_url, feed)
}

/// Feed fields after fallback resolution, ready to serialize.
struct AtomFeed<'a> {
    id: &'a str,
    title: &'a str,
    updated: DateTime<Utc>,
    author: Option<&'a str>,
    link: &'a str,
    subtitle: Option<&'a str>,
    language: Option<&'a str>,
    entries: Vec<AtomEntry<'a>>,
}

struct AtomEntry<'a> {
    id: &'a str,
    title: &'a str,
    updated: DateTime<Utc>,
    author: Option<&'a str>,
    content: Option<&'a str>,
    link: Option<&'a str>,
    summary: Option<&'a str>,
    published: Option<DateTime<Utc>>,
}

impl<'a> AtomFeed<'a> {
    fn resolve(
        feed_url: &'a str,
        feed: &'a ParsedFeed,
        now: DateTime<Utc>,
    ) -> Result<Self, TranscodeError> {
        let meta: &FeedMetadata = &feed.metadata;

        let title = first_non_none(meta, FEED_TITLE_KEYS)
            .filter(|t| !t.is_empty())
            .ok_or(TranscodeError::MissingFeedTitle)?;
        let link = meta
            .link
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or(feed_url);
        let id = Some(meta.id.as_deref().unwrap_or(link))
            .filter(|id| !id.is_empty())
            .ok_or(TranscodeError::MissingFeedId)?;

        let entries = feed
            .entries
            .iter()
            .enumerate()
            .map(|(index, entry)| AtomEntry::resolve(index, entry, now))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id,
            title,
            updated: meta.updated.unwrap_or(now),
            author: meta.author.as_deref(),
            link,
            subtitle: first_non_none(meta, &["subtitle"]),
            language: meta.language.as_deref(),
            entries,
        })
    }

    fn write(&self) -> Result<String, TranscodeError> {
        let mut w = AtomWriter::compact();
        w.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new("feed");
        root.push_attribute(("xmlns", ATOM_NS));
        if let Some(lang) = self.language {
            root.push_attribute(("xml:lang", lang));
        }
        w.event(Event::Start(root))?;

        w.text_element("id", self.id)?;
        w.text_element("title", self.title)?;
        w.timestamp("updated", self.updated)?;
        if let Some(name) = self.author {
            w.person("author", name)?;
        }
        w.link(self.link, Some("alternate"))?;
        w.generator()?;
        if let Some(subtitle) = self.subtitle {
            w.text_element("subtitle", subtitle)?;
        }

        for entry in &self.entries {
            entry.write(&mut w)?;
        }

        w.event(Event::End(BytesEnd::new("feed")))?;
        w.finish()
    }
}

impl<'a> AtomEntry<'a> {
    fn resolve(
        index: usize,
        entry: &'a EntryRecord,
        now: DateTime<Utc>,
    ) -> Result<Self, TranscodeError> {
        let link = first_non_none(entry, &["link"]);

        let title = entry
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(TranscodeError::MissingEntryField {
                index,
                field: "title",
            })?;
        let id = entry
            .id
            .as_deref()
            .or(link)
            .filter(|id| !id.is_empty())
            .ok_or(TranscodeError::MissingEntryField { index, field: "id" })?;

        Ok(Self {
            id,
            title,
            updated: entry.updated.unwrap_or(now),
            author: first_non_none(entry, ENTRY_AUTHOR_KEYS),
            content: entry.content.as_deref(),
            link,
            summary: entry.summary.as_deref(),
            published: entry.published,
        })
    }

    fn write(&self, w: &mut AtomWriter) -> Result<(), TranscodeError> {
        w.event(Event::Start(BytesStart::new("entry")))?;
        w.text_element("id", self.id)?;
        w.text_element("title", self.title)?;
        w.timestamp("updated", self.updated)?;
        if let Some(name) = self.author {
            w.person("author", name)?;
        }
        if let Some(content) = self.content {
            w.html_element("content", content)?;
        }
        if let Some(href) = self.link {
            w.link(href, Some("alternate"))?;
        }
        if let Some(summary) = self.summary {
            w.html_element("summary", summary)?;
        }
        if let Some(published) = self.published {
            w.timestamp("published", published)?;
        }
        w.event(Event::End(BytesEnd::new("entry")))
    }
}

/// Thin wrapper over `quick_xml::Writer` for the handful of Atom shapes used.
struct AtomWriter {
    inner: Writer<Cursor<Vec<u8>>>,
}

impl AtomWriter {
    fn compact() -> Self {
        Self {
            inner: Writer::new(Cursor::new(Vec::new())),
        }
    }

    fn indented() -> Self {
        Self {
            inner: Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), TranscodeError> {
        self.inner
            .write_event(event)
            .map_err(|e| TranscodeError::Write(e.to_string()))
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<(), TranscodeError> {
        self.event(Event::Start(BytesStart::new(name)))?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn html_element(&mut self, name: &str, html: &str) -> Result<(), TranscodeError> {
        let mut start = BytesStart::new(name);
        start.push_attribute(("type", "html"));
        self.event(Event::Start(start))?;
        self.event(Event::Text(BytesText::new(html)))?;
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn person(&mut self, role: &str, name: &str) -> Result<(), TranscodeError> {
        self.event(Event::Start(BytesStart::new(role)))?;
        self.text_element("name", name)?;
        self.event(Event::End(BytesEnd::new(role)))
    }

    fn link(&mut self, href: &str, rel: Option<&str>) -> Result<(), TranscodeError> {
        let mut link = BytesStart::new("link");
        link.push_attribute(("href", href));
        if let Some(rel) = rel {
            link.push_attribute(("rel", rel));
        }
        self.event(Event::Empty(link))
    }

    fn timestamp(&mut self, name: &str, at: DateTime<Utc>) -> Result<(), TranscodeError> {
        self.text_element(name, &at.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    fn generator(&mut self) -> Result<(), TranscodeError> {
        let mut start = BytesStart::new("generator");
        start.push_attribute(("version", env!("CARGO_PKG_VERSION")));
        self.event(Event::Start(start))?;
        self.event(Event::Text(BytesText::new(env!("CARGO_PKG_NAME"))))?;
        self.event(Event::End(BytesEnd::new("generator")))
    }

    fn finish(self) -> Result<String, TranscodeError> {
        Ok(String::from_utf8(self.inner.into_inner().into_inner())?)
    }
}

/// Re-emits `xml` indented, with an `xml-stylesheet` processing instruction
/// pointing at `href` as the first node after the XML declaration.
///
/// A declaration is added when `xml` has none. Whitespace-only text between
/// nodes is dropped so the output indentation is uniform; an element whose
/// entire content is whitespace keeps it.
///
/// # Errors
///
/// Returns [`TranscodeError::Read`] if `xml` is not well-formed.
pub fn insert_stylesheet(xml: &str, href: &str) -> Result<String, TranscodeError> {
    let mut reader = Reader::from_str(xml);
    let mut w = AtomWriter::indented();

    let instruction = format!(
        r#"xml-stylesheet type="text/xsl" href="{}""#,
        quick_xml::escape::escape(href)
    );
    let mut inserted = false;
    // Whitespace is held back until we know whether it is an element's
    // whole content (kept) or layout between nodes (dropped).
    let mut pending_blank: Option<BytesText<'_>> = None;
    let mut after_start = false;

    loop {
        match reader.read_event() {
            Ok(Event::Decl(decl)) if !inserted => {
                w.event(Event::Decl(decl))?;
                w.event(Event::PI(BytesPI::new(instruction.as_str())))?;
                inserted = true;
            }
            Ok(Event::Eof) => break,
            Ok(Event::Text(text)) if text.iter().all(u8::is_ascii_whitespace) => {
                pending_blank = Some(text);
            }
            Ok(event) => {
                if !inserted {
                    w.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
                    w.event(Event::PI(BytesPI::new(instruction.as_str())))?;
                    inserted = true;
                }
                let blank = pending_blank.take();
                if let (true, Event::End(_), Some(blank)) = (after_start, &event, blank) {
                    w.event(Event::Text(blank))?;
                }
                after_start = matches!(event, Event::Start(_));
                w.event(event)?;
            }
            Err(e) => return Err(TranscodeError::Read(e.to_string())),
        }
    }

    w.finish()
}
