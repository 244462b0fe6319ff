//! Content module - front-matter parsing, records and loading

mod error;
mod frontmatter;
mod markdown;
mod record;
pub mod repository;

pub use error::ContentError;
pub use frontmatter::{parse_date_string, FieldValue, FrontMatter};
pub use markdown::MarkdownRenderer;
pub use record::{ContentRecord, Metadata};
pub use repository::{ContentRepository, LoadPolicy, LoadReport};
