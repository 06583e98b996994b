//! Feed fetching, parsing and Atom re-serialization.
//!
//! - **Fetching**: conditional HTTP GET (`If-None-Match` / `If-Modified-Since`)
//! - **Parsing**: RSS/Atom into a normalized [`ParsedFeed`] via `feed-rs`
//! - **Transcoding**: [`ParsedFeed`] into an Atom 1.0 document carrying an
//!   `xml-stylesheet` processing instruction
//!
//! # Architecture
//!
//! - [`model`] - Normalized feed and entry records
//! - [`parser`] - feed-rs adapter, entry cap and malformed-input handling
//! - [`fetcher`] - HTTP exchange and status classification
//! - [`atom`] - Atom serialization and stylesheet injection
//!
//! # Example
//!
//! ```ignore
//! use refeed::feed::{to_atom, CacheValidators, FetchSettings, Fetcher};
//!
//! let fetcher = Fetcher::new(FetchSettings::default())?;
//! let result = fetcher.fetch(url, &CacheValidators::default()).await;
//! if result.updated {
//!     let xml = to_atom(url, result.parsed_feed.as_ref());
//! }
//! ```

pub mod atom;
pub mod fetcher;
pub mod model;
pub mod parser;

pub use atom::{insert_stylesheet, to_atom, TranscodeError, Transcoder, DEFAULT_STYLESHEET};
pub use fetcher::{
    CacheValidators, FetchError, FetchResult, FetchSettings, Fetcher, DEFAULT_TIMEOUT,
    MAX_FEED_SIZE,
};
pub use model::{first_non_none, EntryRecord, FeedMetadata, FieldLookup, ParsedFeed, MAX_ENTRIES};
pub use parser::parse_feed;
