//! Output module for rendering audit reports

mod markdown;

pub use markdown::{format_markdown_report, write_markdown_report};
