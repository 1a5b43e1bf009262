//! # Result Accumulator
//!
//! Owns the visible row list. Pages are merged in one of two ways:
//! replace (the list becomes the page) or append (the page is added to the
//! end). Nothing else mutates the list.

/// Visible rows plus the completion flag of the last merged page
#[derive(Debug, Clone)]
pub struct ResultAccumulator<R> {
    visible: Vec<R>,
    completed: bool,
}

impl<R> Default for ResultAccumulator<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> ResultAccumulator<R> {
    pub fn new() -> Self {
        Self {
            visible: Vec::new(),
            completed: false,
        }
    }

    /// The visible list, in display order
    pub fn visible(&self) -> &[R] {
        &self.visible
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// True when the last merged page was the final one
    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Replaces the visible list with `content`
    pub fn replace(&mut self, content: Vec<R>, completed: bool) {
        self.visible = content;
        self.completed = completed;
    }

    /// Appends `content` to the visible list.
    ///
    /// Returns false without touching the list when `content` is empty or
    /// when the list is already complete.
    pub fn append(&mut self, content: Vec<R>, completed: bool) -> bool {
        if self.completed {
            return false;
        }
        self.completed = completed;
        if content.is_empty() {
            return false;
        }
        self.visible.extend(content);
        true
    }

    /// Drops the visible list, keeping nothing
    pub fn clear(&mut self) {
        self.visible.clear();
        self.completed = false;
    }

    /// Consumes the accumulator, returning the visible list
    pub fn into_visible(self) -> Vec<R> {
        self.visible
    }
}
