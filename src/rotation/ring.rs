//! Wrap-around category ring
//!
//! The ring is the ordered, fixed set of blog categories the scheduler
//! cycles through. Successor lookup is a total function: unknown input
//! and the empty starting state both resolve to the first element, so
//! ring traversal can never fail.

use crate::models::BlogCategory;

/// Immutable ordered sequence of categories with wrap-around successor
/// lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRing {
    categories: Vec<BlogCategory>,
}

impl CategoryRing {
    /// Create the ring over the full category set in rotation order
    pub fn new() -> Self {
        Self {
            categories: BlogCategory::all(),
        }
    }

    /// Create a ring with a custom order
    ///
    /// Duplicates are dropped after their first occurrence. An empty
    /// input yields the default ring; the ring is never empty.
    pub fn from_categories(categories: Vec<BlogCategory>) -> Self {
        let mut seen = Vec::with_capacity(categories.len());
        for category in categories {
            if !seen.contains(&category) {
                seen.push(category);
            }
        }

        if seen.is_empty() {
            return Self::new();
        }

        Self { categories: seen }
    }

    /// Number of categories in the ring
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        // Construction guarantees at least one element
        false
    }

    /// The ring's first element, used as the fresh-start default
    pub fn first(&self) -> BlogCategory {
        self.categories[0]
    }

    /// All categories in ring order
    pub fn categories(&self) -> &[BlogCategory] {
        &self.categories
    }

    /// Position of a category in the ring
    pub fn index_of(&self, category: BlogCategory) -> Option<usize> {
        self.categories.iter().position(|c| *c == category)
    }

    /// Next category after the given one, wrapping at the end
    ///
    /// `None` and categories not present in the ring both map to the
    /// first element.
    pub fn successor_of(&self, category: Option<BlogCategory>) -> BlogCategory {
        match category.and_then(|c| self.index_of(c)) {
            Some(index) => self.categories[(index + 1) % self.categories.len()],
            None => self.first(),
        }
    }
}

impl Default for CategoryRing {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_ring_covers_all_categories() {
        let ring = CategoryRing::new();
        assert_eq!(ring.len(), BlogCategory::all().len());
        assert_eq!(ring.first(), BlogCategory::AiModels);
    }

    #[test]
    fn test_successor_of_none_is_first() {
        let ring = CategoryRing::new();
        assert_eq!(ring.successor_of(None), ring.first());
    }

    #[test]
    fn test_successor_wraps_around() {
        let ring = CategoryRing::new();
        let last = *ring.categories().last().unwrap();
        assert_eq!(ring.successor_of(Some(last)), ring.first());
    }

    #[test]
    fn test_successor_advances_by_one() {
        let ring = CategoryRing::new();
        let categories = ring.categories().to_vec();
        for (i, category) in categories.iter().enumerate() {
            let expected = categories[(i + 1) % categories.len()];
            assert_eq!(ring.successor_of(Some(*category)), expected);
        }
    }

    #[test]
    fn test_custom_ring_order() {
        let ring = CategoryRing::from_categories(vec![
            BlogCategory::Tutorials,
            BlogCategory::Industry,
            BlogCategory::Engineering,
        ]);
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.first(), BlogCategory::Tutorials);
        assert_eq!(
            ring.successor_of(Some(BlogCategory::Engineering)),
            BlogCategory::Tutorials
        );
    }

    #[test]
    fn test_category_outside_ring_falls_back_to_first() {
        let ring = CategoryRing::from_categories(vec![
            BlogCategory::Tutorials,
            BlogCategory::Industry,
        ]);
        assert_eq!(
            ring.successor_of(Some(BlogCategory::CompanyNews)),
            BlogCategory::Tutorials
        );
    }

    #[test]
    fn test_empty_input_yields_default_ring() {
        let ring = CategoryRing::from_categories(vec![]);
        assert_eq!(ring.len(), BlogCategory::all().len());
    }

    #[test]
    fn test_duplicates_are_dropped() {
        let ring = CategoryRing::from_categories(vec![
            BlogCategory::Industry,
            BlogCategory::Industry,
            BlogCategory::Tutorials,
        ]);
        assert_eq!(ring.len(), 2);
    }

    proptest! {
        // Walking the ring len() times from any starting point returns
        // to that starting point, and every step stays in the ring.
        #[test]
        fn prop_full_walk_returns_to_start(start in 0usize..7) {
            let ring = CategoryRing::new();
            let origin = ring.categories()[start];

            let mut current = origin;
            for _ in 0..ring.len() {
                current = ring.successor_of(Some(current));
                prop_assert!(ring.index_of(current).is_some());
            }

            prop_assert_eq!(current, origin);
        }
    }
}
