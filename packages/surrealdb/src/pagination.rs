use serde::{Deserialize, Serialize};

/// Offset/count window for history queries.
///
/// Both bounds are optional: an absent offset starts at the newest record,
/// an absent count leaves the sequence unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Records to skip from the start of the sequence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,

    /// Maximum records to produce
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

impl Pagination {
    pub fn new(offset: Option<u64>, count: Option<u64>) -> Self {
        Self { offset, count }
    }

    /// Window with both bounds set
    pub fn page(offset: u64, count: u64) -> Self {
        Self { offset: Some(offset), count: Some(count) }
    }

    /// First record index of the window
    pub fn start(&self) -> u64 {
        self.offset.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_unbounded_from_the_start() {
        let window = Pagination::default();
        assert_eq!(window.start(), 0);
        assert_eq!(window.count, None);
    }

    #[test]
    fn page_sets_both_bounds() {
        let window = Pagination::page(20, 10);
        assert_eq!(window.start(), 20);
        assert_eq!(window.count, Some(10));
    }
}
