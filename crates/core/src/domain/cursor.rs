// Cursor Collection - ordered items with a circular navigation cursor

use super::error::{DomainError, Result};

/// Fixed-length, non-empty sequence with one cursor.
///
/// The cursor wraps modulo the length on every step, so it is always a
/// valid index.
#[derive(Debug, Clone)]
pub struct CursorCollection<T> {
    items: Vec<T>,
    index: usize,
}

impl<T> CursorCollection<T> {
    /// Create a collection with the cursor on the first element
    ///
    /// # Errors
    /// `DomainError::EmptyCollection` if `items` is empty
    pub fn new(items: Vec<T>, what: &str) -> Result<Self> {
        if items.is_empty() {
            return Err(DomainError::EmptyCollection(what.to_string()));
        }
        Ok(Self { items, index: 0 })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false for a constructed collection
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &T {
        &self.items[self.index]
    }

    pub fn current_mut(&mut self) -> &mut T {
        &mut self.items[self.index]
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Move the cursor by `delta`, wrapping in both directions
    pub fn advance(&mut self, delta: isize) {
        let len = self.items.len() as isize;
        self.index = (self.index as isize + delta).rem_euclid(len) as usize;
    }

    pub fn move_next(&mut self) {
        self.advance(1);
    }

    pub fn move_previous(&mut self) {
        self.advance(-1);
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }
}

impl<'a, T> IntoIterator for &'a CursorCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
