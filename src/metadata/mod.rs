//! Metadata extraction module.
//!
//! Structured data embedded in the page head, read as a secondary source
//! when the visible markup does not give up a field.

pub mod json_ld;

pub use json_ld::{collect_links, first_admissible_link};
