//! Record identifier type.

use std::fmt;

/// Identifies a stored record: the page it lives on and its slot within
/// that page.
///
/// The index never interprets a `RecordId`; it only stores it next to the
/// entry it was inserted with and hands it back on lookup.
///
/// # Example
/// ```
/// use ixtree::RecordId;
///
/// let rid = RecordId::new(3, 7);
/// assert!(rid.is_valid());
/// assert_eq!(rid.page_num(), 3);
/// assert_eq!(rid.slot_num(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId {
    page_num: i32,
    slot_num: i32,
}

impl RecordId {
    /// Sentinel page number for "no page".
    pub const NULL_PAGE: i32 = -1;

    /// Sentinel slot number for "no slot".
    pub const NULL_SLOT: i32 = -1;

    /// The record id that points nowhere.
    pub const NULL: RecordId = RecordId {
        page_num: Self::NULL_PAGE,
        slot_num: Self::NULL_SLOT,
    };

    /// Create a new RecordId.
    #[inline]
    pub fn new(page_num: i32, slot_num: i32) -> Self {
        RecordId { page_num, slot_num }
    }

    #[inline]
    pub fn page_num(&self) -> i32 {
        self.page_num
    }

    #[inline]
    pub fn slot_num(&self) -> i32 {
        self.slot_num
    }

    /// A record id is valid when neither component is a sentinel.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.page_num != Self::NULL_PAGE && self.slot_num != Self::NULL_SLOT
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "Rid({}, {})", self.page_num, self.slot_num)
        } else {
            write!(f, "Rid(NULL)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_new() {
        let rid = RecordId::new(4, 2);
        assert_eq!(rid.page_num(), 4);
        assert_eq!(rid.slot_num(), 2);
        assert!(rid.is_valid());
    }

    #[test]
    fn test_record_id_null() {
        assert!(!RecordId::NULL.is_valid());
        assert!(!RecordId::new(RecordId::NULL_PAGE, 0).is_valid());
        assert!(!RecordId::new(0, RecordId::NULL_SLOT).is_valid());
        assert_eq!(RecordId::default(), RecordId::NULL);
    }

    #[test]
    fn test_record_id_equality() {
        assert_eq!(RecordId::new(1, 1), RecordId::new(1, 1));
        assert_ne!(RecordId::new(1, 1), RecordId::new(1, 2));
    }

    #[test]
    fn test_record_id_display() {
        assert_eq!(format!("{}", RecordId::new(42, 3)), "Rid(42, 3)");
        assert_eq!(format!("{}", RecordId::NULL), "Rid(NULL)");
    }
}
