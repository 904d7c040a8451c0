//! Dataset bookkeeping for the annotation tool
//!
//! One JSON document of text items, partitioned across annotators by index
//! arithmetic, with a resumable cursor per annotator and aggregate label
//! statistics.

mod assign;
mod cursor;
mod error;
mod schema;
mod stats;
mod store;

pub use assign::assignment;
pub use cursor::{next_item, CursorOutcome};
pub use error::{LabelsetError, Result};
pub use schema::{Item, Label};
pub use stats::{summarize, user_progress, DatasetSummary, UserProgress};
pub use store::DatasetStore;
