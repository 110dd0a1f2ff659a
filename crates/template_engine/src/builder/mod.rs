//! Content builders
//!
//! Builders are handed to the closures passed to the
//! [`DocumentBuilder`](crate::DocumentBuilder) facade. Inline builders collect
//! runs in a buffer; block builders write paragraphs, tables and lists into
//! every target occurrence as each call is made.

mod block;
mod format;
mod inline;
mod list;
mod table;

pub use block::BlockBuilder;
pub use format::{Format, FormatExt};
pub use inline::InlineBuilder;
pub use list::OrderedListBuilder;
pub use table::{CellBuilder, RowBuilder, TableBuilder};
