use std::ops::Range;

use crate::{assignment, Item, Label};

/// Label tallies over the full dataset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DatasetSummary {
    pub total: usize,
    pub labeled: usize,
    pub toxic: usize,
    pub non_toxic: usize,
    pub unknown: usize,
}

impl DatasetSummary {
    /// Items carrying a definite toxicity verdict (toxic or non-toxic).
    pub fn usable(&self) -> usize {
        self.toxic + self.non_toxic
    }

    /// Labeled share of the whole dataset. `None` on an empty dataset.
    pub fn completion_pct(&self) -> Option<f64> {
        share(self.labeled, self.total)
    }

    /// Toxic share among labeled items. `None` when nothing is labeled yet.
    pub fn toxic_pct(&self) -> Option<f64> {
        share(self.toxic, self.labeled)
    }

    pub fn non_toxic_pct(&self) -> Option<f64> {
        share(self.non_toxic, self.labeled)
    }

    pub fn unknown_pct(&self) -> Option<f64> {
        share(self.unknown, self.labeled)
    }
}

fn share(part: usize, whole: usize) -> Option<f64> {
    (whole != 0).then(|| part as f64 * 100.0 / whole as f64)
}

/// Single pass over the dataset.
pub fn summarize(items: &[Item]) -> DatasetSummary {
    let mut s = DatasetSummary {
        total: items.len(),
        ..Default::default()
    };
    for item in items {
        match item.label {
            Label::Unlabeled => {}
            Label::Toxic => {
                s.labeled += 1;
                s.toxic += 1;
            }
            Label::NonToxic => {
                s.labeled += 1;
                s.non_toxic += 1;
            }
            Label::Unknown => {
                s.labeled += 1;
                s.unknown += 1;
            }
        }
    }
    s
}

/// One user's completion over their derived assignment. Any label kind
/// counts as labeled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserProgress {
    pub user_id: i64,
    pub range: Range<usize>,
    pub labeled: usize,
}

impl UserProgress {
    /// `None` for an empty assignment (out-of-pool id or empty dataset).
    pub fn percent(&self) -> Option<f64> {
        share(self.labeled, self.range.len())
    }
}

pub fn user_progress(items: &[Item], user_id: i64, user_count: i64) -> UserProgress {
    let range = assignment(user_id, user_count, items.len());
    let labeled = items[range.clone()]
        .iter()
        .filter(|i| i.label.is_labeled())
        .count();
    UserProgress {
        user_id,
        range,
        labeled,
    }
}
