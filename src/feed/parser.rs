use feed_rs::model::{Entry, Feed, Link, Person, Text};
use feed_rs::parser;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

use crate::feed::model::{EntryRecord, FeedMetadata, ParsedFeed};

const DC_NS: &[u8] = b"http://purl.org/dc/elements/1.1/";

/// Parses RSS 0.9x/1.0/2.0 or Atom bytes into a [`ParsedFeed`].
///
/// Never fails: input feed-rs rejects comes back with `bozo` set and no
/// entries. At most `max_entries` entries are kept, in source order.
pub fn parse_feed(bytes: &[u8], max_entries: usize) -> ParsedFeed {
    // A missing <guid>/<id> must stay missing so the Atom output can fall
    // back to the entry link instead of a synthesized hash.
    let parser = parser::Builder::new()
        .id_generator(|_links, _title, _uri| String::new())
        .build();

    match parser.parse(bytes) {
        Ok(feed) => normalize(feed, &dc_publishers(bytes), max_entries),
        Err(e) => ParsedFeed::bozo(e.to_string()),
    }
}

fn normalize(feed: Feed, publishers: &[Option<String>], max_entries: usize) -> ParsedFeed {
    let metadata = FeedMetadata {
        title: feed.title.map(text_content),
        subtitle: feed.description.map(text_content),
        info: None,
        link: primary_link(&feed.links),
        language: feed.language.and_then(non_empty),
        author: first_name(&feed.authors),
        id: non_empty(feed.id),
        published: feed.published,
        updated: feed.updated,
    };

    let entries = feed
        .entries
        .into_iter()
        .take(max_entries)
        .enumerate()
        .map(|(i, entry)| normalize_entry(entry, publishers.get(i).cloned().flatten()))
        .collect();

    ParsedFeed {
        metadata,
        entries,
        bozo: false,
        bozo_exception: None,
    }
}

fn normalize_entry(entry: Entry, dc_publisher: Option<String>) -> EntryRecord {
    EntryRecord {
        title: entry.title.map(text_content),
        link: primary_link(&entry.links),
        id: non_empty(entry.id),
        author: first_name(&entry.authors),
        publisher: dc_publisher.or_else(|| first_name(&entry.contributors)),
        content: entry.content.and_then(|c| c.body),
        summary: entry.summary.map(text_content),
        published: entry.published,
        updated: entry.updated,
    }
}

/// Collects the `<dc:publisher>` of every item/entry, in document order.
///
/// feed-rs does not keep this element, so it is read in a separate pass.
/// Items without one get `None`. A read error ends the pass early and the
/// remaining entries simply have no publisher.
fn dc_publishers(bytes: &[u8]) -> Vec<Option<String>> {
    let mut reader = NsReader::from_reader(bytes);
    let mut publishers = Vec::new();
    let mut text: Option<String> = None;

    loop {
        match reader.read_resolved_event() {
            Ok((_, Event::Start(e))) if is_entry(e.local_name().as_ref()) => {
                publishers.push(None);
            }
            Ok((ResolveResult::Bound(Namespace(ns)), Event::Start(e)))
                if ns == DC_NS
                    && e.local_name().as_ref() == b"publisher"
                    && !publishers.is_empty() =>
            {
                text = Some(String::new());
            }
            Ok((_, Event::Text(t))) => {
                if let Some(buf) = text.as_mut() {
                    match t.unescape() {
                        Ok(s) => buf.push_str(&s),
                        Err(_) => buf.push_str(&String::from_utf8_lossy(&t)),
                    }
                }
            }
            Ok((_, Event::CData(c))) => {
                if let Some(buf) = text.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Ok((_, Event::End(e))) if e.local_name().as_ref() == b"publisher" => {
                if let (Some(buf), Some(last)) = (text.take(), publishers.last_mut()) {
                    *last = non_empty(buf);
                }
            }
            Ok((_, Event::Eof)) | Err(_) => break,
            Ok(_) => {}
        }
    }

    publishers
}

fn is_entry(local_name: &[u8]) -> bool {
    local_name == b"item" || local_name == b"entry"
}

/// Picks the `alternate` link (or one with no `rel`), falling back to the
/// first link of any kind.
fn primary_link(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| links.first())
        .map(|l| l.href.clone())
        .and_then(non_empty)
}

fn first_name(people: &[Person]) -> Option<String> {
    people.first().and_then(|p| non_empty(p.name.clone()))
}

fn text_content(text: Text) -> String {
    text.content
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == s.len() {
        Some(s)
    } else {
        Some(trimmed.to_string())
    }
}
