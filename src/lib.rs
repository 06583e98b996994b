//! Fetch an RSS/Atom feed with conditional GET and re-emit it as an Atom
//! document annotated with an `xml-stylesheet` processing instruction.

pub mod config;
pub mod feed;
pub mod util;

#[cfg(test)]
mod test_support;
