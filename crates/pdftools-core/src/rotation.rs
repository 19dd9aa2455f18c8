//! Rotate tool state
//!
//! Each page keeps the rotation stored in the document (`/Rotate`) and the
//! extra rotation the user applied. The backend receives the sum for every
//! page, keyed by zero-based page index.

use crate::error::ValidationError;
use std::collections::BTreeMap;

/// Final angle per zero-based page index
pub type PageRotations = BTreeMap<u32, u32>;

/// Fold any angle into `0..360`
///
/// ```
/// use pdftools_core::rotation::normalize_angle;
///
/// assert_eq!(normalize_angle(450), 90);
/// assert_eq!(normalize_angle(-90), 270);
/// ```
pub fn normalize_angle(angle: i64) -> u32 {
    // rem_euclid is non-negative and below 360
    angle.rem_euclid(360) as u32
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationState {
    base: Vec<u32>,
    extra: Vec<u32>,
    current_page: u32,
}

impl RotationState {
    /// `base_rotations[i]` is the stored rotation of page `i + 1`
    pub fn new(base_rotations: Vec<u32>) -> Self {
        let extra = vec![0; base_rotations.len()];
        let current_page = u32::from(!base_rotations.is_empty());
        Self {
            base: base_rotations.into_iter().map(|a| a % 360).collect(),
            extra,
            current_page,
        }
    }

    pub fn page_count(&self) -> u32 {
        self.base.len() as u32
    }

    /// 1-indexed, 0 when there are no pages
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Step through pages. Returns false at either end.
    pub fn change_page(&mut self, direction: i64) -> bool {
        let target = i64::from(self.current_page).saturating_add(direction);
        let current = i64::from(self.current_page);
        if target < 1 || target > i64::from(self.page_count()) || target == current {
            return false;
        }
        self.current_page = target as u32;
        true
    }

    fn index(&self, page: u32) -> Result<usize, ValidationError> {
        if page == 0 || page > self.page_count() {
            return Err(ValidationError::OutOfRange {
                page: i64::from(page),
                total_pages: self.page_count(),
            });
        }
        Ok(page as usize - 1)
    }

    /// Add `delta` degrees to a page. Returns its new extra rotation.
    pub fn rotate(&mut self, page: u32, delta: i64) -> Result<u32, ValidationError> {
        let index = self.index(page)?;
        let angle = normalize_angle(i64::from(self.extra[index]) + delta);
        self.extra[index] = angle;
        Ok(angle)
    }

    pub fn rotate_current(&mut self, delta: i64) -> Result<u32, ValidationError> {
        self.rotate(self.current_page, delta)
    }

    /// Rotate several pages; nothing changes when one is out of range
    pub fn rotate_pages(&mut self, pages: &[u32], delta: i64) -> Result<(), ValidationError> {
        for &page in pages {
            self.index(page)?;
        }
        for &page in pages {
            self.rotate(page, delta)?;
        }
        Ok(())
    }

    pub fn extra_rotation(&self, page: u32) -> u32 {
        self.index(page).map_or(0, |i| self.extra[i])
    }

    /// Angle to preview the page at
    pub fn display_rotation(&self, page: u32) -> u32 {
        self.index(page)
            .map_or(0, |i| (self.base[i] + self.extra[i]) % 360)
    }

    pub fn is_modified(&self) -> bool {
        self.extra.iter().any(|&a| a != 0)
    }

    pub fn reset(&mut self) {
        self.extra.iter_mut().for_each(|a| *a = 0);
    }

    /// Stored plus extra rotation for every page
    pub fn final_rotations(&self) -> PageRotations {
        self.base
            .iter()
            .zip(&self.extra)
            .enumerate()
            .map(|(index, (base, extra))| (index as u32, (base + extra) % 360))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(0), 0);
        assert_eq!(normalize_angle(360), 0);
        assert_eq!(normalize_angle(-90), 270);
        assert_eq!(normalize_angle(-450), 270);
        assert_eq!(normalize_angle(720 + 180), 180);
    }

    #[test]
    fn test_rotate_wraps_both_ways() {
        let mut state = RotationState::new(vec![0, 0]);
        assert_eq!(state.rotate(1, -90).unwrap(), 270);
        assert_eq!(state.rotate(1, 90).unwrap(), 0);
        assert_eq!(state.rotate(2, 90).unwrap(), 90);
        assert_eq!(state.rotate(2, 270).unwrap(), 0);
        assert!(!state.is_modified());
    }

    #[test]
    fn test_final_rotations_add_stored_rotation() {
        let mut state = RotationState::new(vec![90, 0, 270]);
        state.rotate(1, 90).unwrap();
        state.rotate(3, 180).unwrap();

        let expected: PageRotations = [(0, 180), (1, 0), (2, 90)].into_iter().collect();
        assert_eq!(state.final_rotations(), expected);
        assert_eq!(state.display_rotation(3), 90);
        assert_eq!(state.extra_rotation(3), 180);
    }

    #[test]
    fn test_rotate_out_of_range() {
        let mut state = RotationState::new(vec![0; 3]);
        assert_eq!(
            state.rotate(4, 90).unwrap_err(),
            ValidationError::OutOfRange {
                page: 4,
                total_pages: 3
            }
        );
        assert!(state.rotate(0, 90).is_err());
    }

    #[test]
    fn test_rotate_pages_is_all_or_nothing() {
        let mut state = RotationState::new(vec![0; 5]);
        assert!(state.rotate_pages(&[1, 2, 9], 90).is_err());
        assert!(!state.is_modified());

        state.rotate_pages(&[1, 3], -90).unwrap();
        assert_eq!(state.extra_rotation(1), 270);
        assert_eq!(state.extra_rotation(2), 0);
        assert_eq!(state.extra_rotation(3), 270);
    }

    #[test]
    fn test_page_navigation_and_current_rotation() {
        let mut state = RotationState::new(vec![0; 3]);
        assert_eq!(state.current_page(), 1);
        assert!(!state.change_page(-1));
        assert!(state.change_page(1));
        assert!(state.change_page(1));
        assert!(!state.change_page(1));
        assert_eq!(state.current_page(), 3);

        state.rotate_current(90).unwrap();
        assert_eq!(state.extra_rotation(3), 90);

        state.reset();
        assert!(!state.is_modified());
    }

    #[test]
    fn test_empty_document() {
        let mut state = RotationState::new(Vec::new());
        assert_eq!(state.current_page(), 0);
        assert!(!state.change_page(1));
        assert!(state.rotate_current(90).is_err());
        assert!(state.final_rotations().is_empty());
    }
}
