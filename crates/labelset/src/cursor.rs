use std::ops::Range;

use crate::Item;

/// Result of a next-item scan over one user's assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CursorOutcome {
    /// An item to present. `entry_id` is the offset within the assignment,
    /// `start_id` the absolute dataset index (the submit target).
    Pending {
        entry_id: usize,
        start_id: usize,
        text: String,
    },
    /// Every item in the assignment already carries a label.
    Done,
}

/// Scan the assignment for the item to present next.
///
/// Scanning starts at `resume` (falling back to 0 when absent or past the
/// slice) and stops at the first unlabeled item. With `revisit` set, the item
/// at the scan start is presented regardless of its label state, which is how
/// go-back re-shows an already-labeled entry.
///
/// `range` must lie within `items`; [`crate::assignment`] guarantees that.
/// The returned `start_id` never leaves `range`.
pub fn next_item(
    items: &[Item],
    range: Range<usize>,
    resume: Option<usize>,
    revisit: bool,
) -> CursorOutcome {
    let slice = &items[range.clone()];
    let start = match resume {
        Some(off) if off <= slice.len() => off,
        _ => 0,
    };

    for (off, item) in slice.iter().enumerate().skip(start) {
        if revisit || !item.label.is_labeled() {
            return CursorOutcome::Pending {
                entry_id: off,
                start_id: off + range.start,
                text: item.text.clone(),
            };
        }
    }

    CursorOutcome::Done
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Label;

    fn dataset(labels: &[Label]) -> Vec<Item> {
        labels
            .iter()
            .enumerate()
            .map(|(i, l)| Item {
                text: format!("test {i}"),
                label: *l,
            })
            .collect()
    }

    #[test]
    fn first_unlabeled_item_in_range_is_presented() {
        use Label::*;
        let items = dataset(&[Toxic, Toxic, Unlabeled, Unlabeled]);
        let got = next_item(&items, 0..4, None, false);
        assert_eq!(
            got,
            CursorOutcome::Pending {
                entry_id: 2,
                start_id: 2,
                text: "test 2".into()
            }
        );
    }

    #[test]
    fn start_id_is_offset_by_range_start() {
        use Label::*;
        let items = dataset(&[Toxic, Toxic, Unlabeled, Unlabeled]);
        let got = next_item(&items, 2..4, None, false);
        assert_eq!(
            got,
            CursorOutcome::Pending {
                entry_id: 0,
                start_id: 2,
                text: "test 2".into()
            }
        );
    }

    #[test]
    fn scan_resumes_from_remembered_offset() {
        use Label::*;
        // offset 0 is unlabeled, but the session remembers offset 2
        let items = dataset(&[Unlabeled, Toxic, Unlabeled, Unlabeled]);
        let got = next_item(&items, 0..4, Some(2), false);
        assert_eq!(
            got,
            CursorOutcome::Pending {
                entry_id: 2,
                start_id: 2,
                text: "test 2".into()
            }
        );
    }

    #[test]
    fn invalid_resume_offset_restarts_at_zero() {
        use Label::*;
        let items = dataset(&[Unlabeled, Unlabeled]);
        let got = next_item(&items, 0..2, Some(17), false);
        assert_eq!(
            got,
            CursorOutcome::Pending {
                entry_id: 0,
                start_id: 0,
                text: "test 0".into()
            }
        );
    }

    #[test]
    fn revisit_presents_a_labeled_item() {
        use Label::*;
        // go-back after offset 3: cursor sits at 2, item 2 is labeled
        let items = dataset(&[Toxic, Toxic, NonToxic, Unlabeled, Unlabeled]);
        let got = next_item(&items, 0..5, Some(2), true);
        assert_eq!(
            got,
            CursorOutcome::Pending {
                entry_id: 2,
                start_id: 2,
                text: "test 2".into()
            }
        );
    }

    #[test]
    fn exhausted_slice_reports_done() {
        use Label::*;
        let items = dataset(&[Toxic, NonToxic, Unknown, Unlabeled]);
        // the unlabeled item sits outside the caller's range
        assert_eq!(next_item(&items, 0..3, None, false), CursorOutcome::Done);
    }

    #[test]
    fn scan_never_leaves_the_assigned_range() {
        use Label::*;
        let items = dataset(&[Unlabeled, Toxic, Toxic, Unlabeled, Unlabeled]);
        for resume in [None, Some(0), Some(1), Some(2), Some(99)] {
            for revisit in [false, true] {
                if let CursorOutcome::Pending { start_id, .. } =
                    next_item(&items, 1..3, resume, revisit)
                {
                    assert!((1..3).contains(&start_id));
                }
            }
        }
    }

    #[test]
    fn empty_range_is_done() {
        let items = dataset(&[Label::Unlabeled]);
        assert_eq!(next_item(&items, 1..1, None, false), CursorOutcome::Done);
    }
}
