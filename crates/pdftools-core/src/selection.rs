//! Selected pages for the extract tool

use crate::ranges::format_page_spec;
use std::collections::BTreeSet;

/// Add `page` if absent, remove it if present. Returns whether it is now selected.
pub fn toggle(pages: &mut BTreeSet<u32>, page: u32) -> bool {
    if pages.remove(&page) {
        false
    } else {
        pages.insert(page);
        true
    }
}

/// The set of pages the user picked, always iterated in ascending order
///
/// Range checking is the caller's job: pages come either from a successful
/// parse or from clicks on previews of pages that exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedPages {
    pages: BTreeSet<u32>,
}

impl SelectedPages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn contains(&self, page: u32) -> bool {
        self.pages.contains(&page)
    }

    pub fn toggle(&mut self, page: u32) -> bool {
        toggle(&mut self.pages, page)
    }

    /// Select every page of a document with `total_pages` pages
    pub fn select_all(&mut self, total_pages: u32) {
        self.pages.extend(1..=total_pages);
    }

    pub fn clear(&mut self) {
        self.pages.clear();
    }

    /// Install the result of a successful parse
    pub fn replace(&mut self, pages: impl IntoIterator<Item = u32>) {
        self.pages = pages.into_iter().collect();
    }

    /// Deselect `group` when all of it is selected, otherwise select all of it
    pub fn toggle_group(&mut self, group: &[u32]) {
        if group.iter().all(|p| self.pages.contains(p)) {
            for page in group {
                self.pages.remove(page);
            }
        } else {
            self.pages.extend(group.iter().copied());
        }
    }

    /// Sorted page numbers
    pub fn to_vec(&self) -> Vec<u32> {
        self.pages.iter().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages.iter().copied()
    }

    /// Canonical specification text for the current selection
    pub fn to_spec(&self) -> String {
        format_page_spec(&self.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut pages = BTreeSet::from([1, 4]);
        assert!(toggle(&mut pages, 2));
        assert_eq!(pages, BTreeSet::from([1, 2, 4]));
        assert!(!toggle(&mut pages, 2));
        assert_eq!(pages, BTreeSet::from([1, 4]));
    }

    #[test]
    fn test_selection_stays_sorted() {
        let mut selection = SelectedPages::new();
        for page in [9, 2, 5, 3] {
            selection.toggle(page);
        }
        assert_eq!(selection.to_vec(), vec![2, 3, 5, 9]);
        assert_eq!(selection.to_spec(), "2-3, 5, 9");
    }

    #[test]
    fn test_select_all_and_clear() {
        let mut selection = SelectedPages::new();
        selection.toggle(3);
        selection.select_all(4);
        assert_eq!(selection.to_vec(), vec![1, 2, 3, 4]);
        assert_eq!(selection.to_spec(), "1-4");

        selection.clear();
        assert!(selection.is_empty());
        assert_eq!(selection.to_spec(), "");
    }

    #[test]
    fn test_toggle_group_selects_when_partially_selected() {
        let mut selection = SelectedPages::new();
        selection.toggle(2);
        selection.toggle_group(&[1, 2, 3]);
        assert_eq!(selection.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_toggle_group_deselects_when_fully_selected() {
        let mut selection = SelectedPages::new();
        selection.replace([1, 2, 3, 7]);
        selection.toggle_group(&[1, 2, 3]);
        assert_eq!(selection.to_vec(), vec![7]);
    }

    #[test]
    fn test_replace_discards_previous() {
        let mut selection = SelectedPages::new();
        selection.replace([5, 6]);
        selection.replace([1]);
        assert_eq!(selection.to_vec(), vec![1]);
        assert!(!selection.contains(5));
    }
}
