//! Navigation stack management
//!
//! This module provides the `NavigationStack` data structure for tracking the
//! back-navigable screens of the UI. Windows are ordered from bottom to top,
//! with the last entry being the screen the user currently sees.
//!
//! Unlike a plain z-order list the same window may appear more than once:
//! reopening a screen that is buried in the stack pushes it again. Only an
//! immediate repeat of the current top is refused.

use super::WindowId;

/// Result of removing a window from the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackRemoval {
    /// Position (from the bottom) the removed entry occupied
    pub index: usize,

    /// Entry directly below the removed one, if any
    pub previous: Option<WindowId>,

    /// Whether other occurrences of the window are still stacked
    pub was_duplicate: bool,

    /// Whether the removed entry was the top of the stack
    pub was_top: bool,
}

/// Back-navigation stack of `Normal` windows.
///
/// # Examples
///
/// ```
/// use stackui::window::{NavigationStack, WindowId};
///
/// let mut stack = NavigationStack::new();
/// stack.push(WindowId::new("Main"));
/// stack.push(WindowId::new("Shop"));
///
/// assert_eq!(stack.top(), Some(&WindowId::new("Shop")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct NavigationStack {
    /// Windows ordered from bottom to top
    entries: Vec<WindowId>,
}

impl NavigationStack {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Pushes a window on top of the stack.
    ///
    /// Pushing the window that is already on top is a no-op.
    ///
    /// # Returns
    ///
    /// `true` if the window was pushed
    pub fn push(&mut self, id: WindowId) -> bool {
        if self.top() == Some(&id) {
            return false;
        }
        self.entries.push(id);
        true
    }

    /// Removes the top-most occurrence of a window.
    ///
    /// All other entries keep their relative order. The entry that sat
    /// directly below the removed slot is reported as `previous`.
    ///
    /// # Returns
    ///
    /// `None` if the window is not stacked
    pub fn remove_topmost(&mut self, id: &WindowId) -> Option<StackRemoval> {
        let index = self.entries.iter().rposition(|entry| entry == id)?;
        let was_top = index + 1 == self.entries.len();
        let previous = index.checked_sub(1).map(|below| self.entries[below].clone());

        self.entries.remove(index);
        let was_duplicate = self.entries.contains(id);

        Some(StackRemoval {
            index,
            previous,
            was_duplicate,
            was_top,
        })
    }

    /// Returns the window currently on top.
    pub fn top(&self) -> Option<&WindowId> {
        self.entries.last()
    }

    pub fn bottom(&self) -> Option<&WindowId> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &WindowId) -> bool {
        self.entries.contains(id)
    }

    /// Number of times a window appears in the stack.
    pub fn occurrences(&self, id: &WindowId) -> usize {
        self.entries.iter().filter(|entry| *entry == id).count()
    }

    /// Returns the entries in bottom-to-top order.
    pub fn entries(&self) -> &[WindowId] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &WindowId> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(name: &str) -> WindowId {
        WindowId::new(name)
    }

    fn stack_of(names: &[&str]) -> NavigationStack {
        let mut stack = NavigationStack::new();
        for name in names {
            stack.push(id(name));
        }
        stack
    }

    fn names(stack: &NavigationStack) -> Vec<&str> {
        stack.iter().map(WindowId::as_str).collect()
    }

    #[test]
    fn test_new_stack_is_empty() {
        let stack = NavigationStack::new();
        assert!(stack.is_empty());
        assert_eq!(stack.len(), 0);
        assert_eq!(stack.top(), None);
        assert_eq!(stack.bottom(), None);
    }

    #[test]
    fn test_push_adds_to_top() {
        let stack = stack_of(&["A", "B", "C"]);

        assert_eq!(stack.len(), 3);
        assert_eq!(stack.top(), Some(&id("C")));
        assert_eq!(stack.bottom(), Some(&id("A")));
        assert_eq!(names(&stack), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_push_current_top_is_noop() {
        let mut stack = NavigationStack::new();
        assert!(stack.push(id("A")));
        assert!(!stack.push(id("A")));

        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_push_buried_window_stacks_it_again() {
        let mut stack = stack_of(&["A", "B"]);
        assert!(stack.push(id("A")));

        assert_eq!(names(&stack), vec!["A", "B", "A"]);
        assert_eq!(stack.occurrences(&id("A")), 2);
    }

    #[test]
    fn test_remove_middle_window() {
        let mut stack = stack_of(&["A", "B", "C"]);

        let removal = stack.remove_topmost(&id("B")).unwrap();
        assert_eq!(removal.index, 1);
        assert_eq!(removal.previous, Some(id("A")));
        assert!(!removal.was_duplicate);
        assert!(!removal.was_top);
        assert_eq!(names(&stack), vec!["A", "C"]);
        assert_eq!(stack.top(), Some(&id("C")));
    }

    #[test]
    fn test_remove_top_window_exposes_previous() {
        let mut stack = stack_of(&["A", "B"]);

        let removal = stack.remove_topmost(&id("B")).unwrap();
        assert!(removal.was_top);
        assert_eq!(removal.previous, Some(id("A")));
        assert_eq!(stack.top(), Some(&id("A")));
    }

    #[test]
    fn test_remove_bottom_window_has_no_previous() {
        let mut stack = stack_of(&["A", "B"]);

        let removal = stack.remove_topmost(&id("A")).unwrap();
        assert_eq!(removal.previous, None);
        assert_eq!(names(&stack), vec!["B"]);
    }

    #[test]
    fn test_remove_duplicate_takes_topmost_occurrence() {
        let mut stack = stack_of(&["A", "B", "A", "C"]);

        let removal = stack.remove_topmost(&id("A")).unwrap();
        assert_eq!(removal.index, 2);
        assert_eq!(removal.previous, Some(id("B")));
        assert!(removal.was_duplicate);
        assert_eq!(names(&stack), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_remove_nonexistent_window() {
        let mut stack = stack_of(&["A"]);

        assert_eq!(stack.remove_topmost(&id("Z")), None);
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut stack = stack_of(&["A", "B", "C"]);
        stack.clear();

        assert!(stack.is_empty());
        assert_eq!(stack.top(), None);
    }

    #[test]
    fn test_with_capacity() {
        let stack = NavigationStack::with_capacity(10);
        assert!(stack.is_empty());
        assert!(stack.entries.capacity() >= 10);
    }

    proptest! {
        #[test]
        fn prop_push_never_repeats_top(pushes in prop::collection::vec(0u8..4, 0..40)) {
            let mut stack = NavigationStack::new();
            for p in pushes {
                stack.push(WindowId::new(format!("W{}", p)));
            }
            for pair in stack.entries().windows(2) {
                prop_assert_ne!(&pair[0], &pair[1]);
            }
        }

        #[test]
        fn prop_remove_preserves_relative_order(
            pushes in prop::collection::vec(0u8..5, 1..30),
            target in 0u8..5,
        ) {
            let mut stack = NavigationStack::new();
            for p in &pushes {
                stack.push(WindowId::new(format!("W{}", p)));
            }
            let target = WindowId::new(format!("W{}", target));
            let before: Vec<WindowId> = stack.entries().to_vec();

            match stack.remove_topmost(&target) {
                Some(removal) => {
                    let mut expected = before.clone();
                    expected.remove(removal.index);
                    prop_assert_eq!(stack.entries(), expected.as_slice());
                    prop_assert_eq!(removal.was_duplicate, expected.contains(&target));
                    prop_assert!(!before[removal.index + 1..].contains(&target));
                }
                None => prop_assert_eq!(stack.entries(), before.as_slice()),
            }
        }
    }
}
