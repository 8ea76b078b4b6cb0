//! Section boundaries over the flat item sequence.

use listnode_core::{IndexPath, ListError, Reindex, Result};
use std::ops::Range;

/// Item counts per section, in order.
///
/// Sections are a view over the single flat sequence: section `s` covers
/// the items after all of the sections before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMap {
    counts: Vec<usize>,
}

impl Default for SectionMap {
    fn default() -> Self {
        Self::single(0)
    }
}

impl SectionMap {
    /// One section holding `len` items.
    pub fn single(len: usize) -> Self {
        Self { counts: vec![len] }
    }

    pub fn from_counts(counts: Vec<usize>) -> Self {
        Self { counts }
    }

    /// Number of sections
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total items across all sections
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Items in `section`.
    pub fn count(&self, section: usize) -> Result<usize> {
        self.counts
            .get(section)
            .copied()
            .ok_or(ListError::SectionOutOfBounds {
                section,
                sections: self.counts.len(),
            })
    }

    /// Flat index of the first item in `section`.
    pub fn section_start(&self, section: usize) -> Result<usize> {
        self.count(section)?;
        Ok(self.counts[..section].iter().sum())
    }

    /// Flat index for `path`.
    pub fn flat_index(&self, path: IndexPath) -> Result<usize> {
        let count = self.count(path.section)?;
        let start = self.section_start(path.section)?;
        if path.item >= count {
            return Err(ListError::out_of_bounds(
                start.saturating_add(path.item),
                self.total(),
            ));
        }
        Ok(start + path.item)
    }

    /// Index path for a flat index.
    pub fn path_for(&self, index: usize) -> Result<IndexPath> {
        let mut start = 0;
        for (section, &count) in self.counts.iter().enumerate() {
            if index < start + count {
                return Ok(IndexPath::new(section, index - start));
            }
            start += count;
        }
        Err(ListError::out_of_bounds(index, start))
    }

    /// Section an insert at flat index `at` lands in.
    ///
    /// The section containing `at`, or the last section when `at` is the
    /// end of the sequence.
    fn section_for_insert(&self, at: usize) -> usize {
        let mut start = 0;
        for (section, &count) in self.counts.iter().enumerate() {
            if at < start + count {
                return section;
            }
            start += count;
        }
        self.counts.len().saturating_sub(1)
    }
}

impl Reindex for SectionMap {
    fn insert_slots(&mut self, at: usize, count: usize) {
        if self.counts.is_empty() {
            self.counts.push(0);
        }
        let section = self.section_for_insert(at);
        self.counts[section] += count;
    }

    fn remove_slots(&mut self, range: Range<usize>) {
        let mut start = 0;
        for count in &mut self.counts {
            let end = start + *count;
            let overlap = range.end.min(end).saturating_sub(range.start.max(start));
            *count -= overlap;
            start = end;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use listnode_core::INVALID_INDEX;

    fn map() -> SectionMap {
        SectionMap::from_counts(vec![2, 0, 3])
    }

    #[test]
    fn test_flat_index_and_back() {
        let m = map();
        assert_eq!(m.total(), 5);
        assert_eq!(m.flat_index(IndexPath::new(2, 1)).unwrap(), 3);
        assert_eq!(m.path_for(3).unwrap(), IndexPath::new(2, 1));
        assert_eq!(m.path_for(1).unwrap(), IndexPath::new(0, 1));
    }

    #[test]
    fn test_bad_paths() {
        let m = map();
        assert_eq!(
            m.flat_index(IndexPath::new(3, 0)).unwrap_err(),
            ListError::SectionOutOfBounds {
                section: 3,
                sections: 3
            }
        );
        assert!(m.flat_index(IndexPath::new(1, 0)).is_err());
        assert!(m.path_for(5).is_err());
    }

    #[test]
    fn test_invalid_item_in_later_section() {
        let m = SectionMap::from_counts(vec![2, 1]);
        assert_eq!(
            m.flat_index(IndexPath::new(1, INVALID_INDEX)).unwrap_err(),
            ListError::out_of_bounds(usize::MAX, 3)
        );
        assert!(m.flat_index(IndexPath::new(INVALID_INDEX, 0)).is_err());
        assert!(m.path_for(INVALID_INDEX).is_err());
    }

    #[test]
    fn test_insert_goes_to_containing_section() {
        let mut m = map();
        m.insert_slots(2, 4);
        assert_eq!(m.counts(), &[2, 0, 7]);
        m.insert_slots(0, 1);
        assert_eq!(m.counts(), &[3, 0, 7]);
    }

    #[test]
    fn test_insert_at_end_goes_to_last_section() {
        let mut m = map();
        m.insert_slots(5, 1);
        assert_eq!(m.counts(), &[2, 0, 4]);
    }

    #[test]
    fn test_remove_across_sections() {
        let mut m = map();
        m.remove_slots(1..4);
        assert_eq!(m.counts(), &[1, 0, 1]);
    }

    #[test]
    fn test_move_uses_remove_then_insert() {
        let mut m = SectionMap::from_counts(vec![2, 2]);
        // Move item 0 to the end: section 0 shrinks, last section grows
        m.move_slots(0..1, 3);
        assert_eq!(m.counts(), &[1, 3]);
    }
}
