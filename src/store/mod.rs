//! Flat-file document store.
//!
//! Every collection is a directory under the data path (`.furrow/` by default) and every
//! document is a markdown file with TOML (`+++`) or YAML (`---`) frontmatter. The body below
//! the frontmatter holds the document's free-form notes.
//!
//! ## File Format
//!
//! ```markdown
//! +++
//! id = "inv-k3x9qa"
//! company_id = "co-7bd2e1"
//! name = "DAP fertilizer"
//! category = "fertilizer"
//! unit = "kg"
//! quantity = "150"
//! reorder_level = "50"
//! created = "2026-03-01T07:30:00Z"
//! updated = "2026-03-04T16:10:00Z"
//! +++
//!
//! Stored in the east shed.
//! ```
//!
//! ## Components
//!
//! - [`Store`]: reads, writes and caches documents of any [`Collection`]
//! - [`WriteBatch`]: several writes committed all-or-nothing
//! - [`Document`]: implemented by every record type
//! - [`parse_document`] / [`render_document`]: the frontmatter codec

mod batch;
mod collection;
mod markdown;
#[allow(clippy::module_inception)]
mod store;

pub use batch::WriteBatch;
pub use collection::{Collection, Document};
pub use markdown::{FrontmatterFormat, detect_format, parse_document, render_document};
pub use store::Store;
