//! Paginated view over a page sequence
//!
//! Previews are rendered one fixed-size group at a time. The sequence being
//! paged is either every page of the document or the sorted selection.

use crate::selection::SelectedPages;
use serde::Serialize;

/// Pages per group in the preview grid
pub const DEFAULT_GROUP_SIZE: usize = 12;

/// Number of groups needed to show `slice_len` items
pub fn group_count(slice_len: usize, group_size: usize) -> usize {
    slice_len.div_ceil(group_size.max(1))
}

/// Move `direction` groups from `current_group`, clamped to the valid groups
///
/// Returns 0 when the slice is empty; callers treat `group_count == 0` as
/// "navigation disabled".
pub fn paginate(slice_len: usize, group_size: usize, current_group: usize, direction: i64) -> usize {
    let groups = group_count(slice_len, group_size);
    if groups == 0 {
        return 0;
    }

    let current = i64::try_from(current_group).unwrap_or(i64::MAX);
    let last = i64::try_from(groups - 1).unwrap_or(i64::MAX);
    current.saturating_add(direction).clamp(0, last) as usize
}

/// Which sequence the working group slices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// All document pages in natural order
    AllPages,
    /// Only the selected pages, ascending
    #[default]
    Selected,
}

/// Navigation summary for the visible group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupInfo {
    pub mode: ViewMode,
    pub group_index: usize,
    pub total_groups: usize,
    pub first_page: Option<u32>,
    pub last_page: Option<u32>,
    pub can_prev: bool,
    pub can_next: bool,
}

impl GroupInfo {
    /// Navigation controls are only shown when there is more than one group
    pub fn is_navigable(&self) -> bool {
        self.total_groups > 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingSet {
    group_size: usize,
    current_group: usize,
    mode: ViewMode,
}

impl Default for WorkingSet {
    fn default() -> Self {
        Self::new(DEFAULT_GROUP_SIZE)
    }
}

impl WorkingSet {
    pub fn new(group_size: usize) -> Self {
        Self {
            group_size: group_size.max(1),
            current_group: 0,
            mode: ViewMode::Selected,
        }
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }

    pub fn current_group(&self) -> usize {
        self.current_group
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Switch the sliced sequence and go back to the first group
    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
        self.current_group = 0;
    }

    pub fn reset(&mut self) {
        self.set_mode(ViewMode::Selected);
    }

    /// Length of the sequence being paged
    pub fn slice_len(&self, total_pages: u32, selection: &SelectedPages) -> usize {
        match self.mode {
            ViewMode::AllPages => total_pages as usize,
            ViewMode::Selected => selection.len(),
        }
    }

    pub fn total_groups(&self, total_pages: u32, selection: &SelectedPages) -> usize {
        group_count(self.slice_len(total_pages, selection), self.group_size)
    }

    /// Page numbers of the visible group
    pub fn group_pages(&self, total_pages: u32, selection: &SelectedPages) -> Vec<u32> {
        let start = self.current_group * self.group_size;
        match self.mode {
            ViewMode::AllPages => {
                let total = total_pages as usize;
                if start >= total {
                    return Vec::new();
                }
                let end = (start + self.group_size).min(total);
                (start as u32 + 1..=end as u32).collect()
            }
            ViewMode::Selected => selection.iter().skip(start).take(self.group_size).collect(),
        }
    }

    /// Move by `direction` groups. Returns true when the visible group changed.
    pub fn navigate(&mut self, direction: i64, total_pages: u32, selection: &SelectedPages) -> bool {
        let next = paginate(
            self.slice_len(total_pages, selection),
            self.group_size,
            self.current_group,
            direction,
        );
        let changed = next != self.current_group;
        self.current_group = next;
        changed
    }

    /// Pull the current group back into range after the sequence shrank
    pub fn settle(&mut self, total_pages: u32, selection: &SelectedPages) {
        self.current_group = paginate(
            self.slice_len(total_pages, selection),
            self.group_size,
            self.current_group,
            0,
        );
    }

    pub fn group_info(&self, total_pages: u32, selection: &SelectedPages) -> GroupInfo {
        let total_groups = self.total_groups(total_pages, selection);
        let pages = self.group_pages(total_pages, selection);

        GroupInfo {
            mode: self.mode,
            group_index: self.current_group,
            total_groups,
            first_page: pages.first().copied(),
            last_page: pages.last().copied(),
            can_prev: total_groups > 0 && self.current_group > 0,
            can_next: total_groups > 0 && self.current_group + 1 < total_groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn selection_of(pages: impl IntoIterator<Item = u32>) -> SelectedPages {
        let mut selection = SelectedPages::new();
        selection.replace(pages);
        selection
    }

    #[test]
    fn test_group_count() {
        assert_eq!(group_count(0, 12), 0);
        assert_eq!(group_count(1, 12), 1);
        assert_eq!(group_count(12, 12), 1);
        assert_eq!(group_count(13, 12), 2);
    }

    #[test]
    fn test_paginate_clamps() {
        assert_eq!(paginate(15, 12, 0, 1), 1);
        assert_eq!(paginate(15, 12, 1, 1), 1);
        assert_eq!(paginate(15, 12, 0, -1), 0);
        assert_eq!(paginate(100, 12, 3, 100), 8);
        assert_eq!(paginate(100, 12, 3, i64::MIN), 0);
    }

    #[test]
    fn test_paginate_empty_slice() {
        assert_eq!(paginate(0, 12, 0, 1), 0);
        assert_eq!(paginate(0, 12, 5, -1), 0);
    }

    #[test]
    fn test_selected_mode_groups() {
        let selection = selection_of(1..=15);
        let mut set = WorkingSet::new(12);

        assert_eq!(set.group_pages(20, &selection), (1..=12).collect::<Vec<_>>());
        assert!(set.navigate(1, 20, &selection));
        assert_eq!(set.group_pages(20, &selection), vec![13, 14, 15]);
        assert!(!set.navigate(1, 20, &selection));
        assert_eq!(set.current_group(), 1);
    }

    #[test]
    fn test_all_pages_mode_groups() {
        let selection = SelectedPages::new();
        let mut set = WorkingSet::new(12);
        set.set_mode(ViewMode::AllPages);

        assert_eq!(set.total_groups(30, &selection), 3);
        set.navigate(2, 30, &selection);
        assert_eq!(set.group_pages(30, &selection), (25..=30).collect::<Vec<_>>());
    }

    #[test]
    fn test_set_mode_resets_group() {
        let selection = SelectedPages::new();
        let mut set = WorkingSet::new(5);
        set.set_mode(ViewMode::AllPages);
        set.navigate(1, 20, &selection);
        assert_eq!(set.current_group(), 1);

        set.set_mode(ViewMode::Selected);
        assert_eq!(set.current_group(), 0);
    }

    #[test]
    fn test_settle_after_selection_shrinks() {
        let mut selection = selection_of(1..=15);
        let mut set = WorkingSet::new(12);
        set.navigate(1, 20, &selection);

        selection.replace([1, 2]);
        set.settle(20, &selection);
        assert_eq!(set.current_group(), 0);

        selection.clear();
        set.settle(20, &selection);
        assert_eq!(set.current_group(), 0);
        assert!(set.group_pages(20, &selection).is_empty());
    }

    #[test]
    fn test_group_info() {
        let selection = selection_of([2, 4, 6, 8, 10]);
        let mut set = WorkingSet::new(2);
        set.navigate(1, 10, &selection);

        assert_eq!(
            set.group_info(10, &selection),
            GroupInfo {
                mode: ViewMode::Selected,
                group_index: 1,
                total_groups: 3,
                first_page: Some(6),
                last_page: Some(8),
                can_prev: true,
                can_next: true,
            }
        );
    }

    #[test]
    fn test_group_info_empty() {
        let set = WorkingSet::default();
        let info = set.group_info(10, &SelectedPages::new());
        assert_eq!(info.total_groups, 0);
        assert_eq!(info.first_page, None);
        assert!(!info.can_prev);
        assert!(!info.can_next);
        assert!(!info.is_navigable());
    }

    #[test]
    fn test_zero_group_size_treated_as_one() {
        let set = WorkingSet::new(0);
        assert_eq!(set.group_size(), 1);
    }
}
