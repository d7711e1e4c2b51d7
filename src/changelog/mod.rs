//! Changelog rendering, normalization, and writing.

pub mod clean;
pub mod format;
pub mod postprocess;
pub mod writer;

pub use clean::{build_summary, clean_changelog_text};
pub use format::{ChangelogCategory, categorize, generate_basic_changelog};
pub use postprocess::post_process;
pub use writer::write_changelog;
