use serde::{Deserialize, Serialize};

use crate::model::ElectionId;

/// A counter object used to implement the auto-increment election ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    next: ElectionId,
}

impl Counter {
    /// Create a new `Counter` starting at the given value.
    pub fn new(start: ElectionId) -> Self {
        Self { next: start }
    }

    /// Retrieve the next value of the counter, advancing it.
    pub fn next(&mut self) -> ElectionId {
        let value = self.next;
        self.next += 1;
        value
    }

    /// The value the next call to [`Counter::next`] will return.
    pub fn peek(&self) -> ElectionId {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_increment() {
        const START: ElectionId = 5;

        let mut counter = Counter::new(START);

        // Get the next value.
        assert_eq!(counter.next(), START);

        // Check the counter was incremented.
        assert_eq!(counter.peek(), START + 1);
        assert_eq!(counter.next(), START + 1);
    }
}
