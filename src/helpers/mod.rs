//! Helper functions for templates
//!
//! URL building, HTML text cleanup, date formatting and the page range
//! used by the pagination controls.

mod date;
mod html;
mod pagination;
mod url;

pub use date::*;
pub use html::*;
pub use pagination::*;
pub use url::*;
