//! Page identifiers.

/// Sentinel for "no page".
///
/// Callers that keep a page id slot before a page has been assigned use this
/// value; it is never handed out as a real page number.
pub const INVALID_PAGE_ID: PageId = PageId(u64::MAX);

/// Unique identifier for a page within the storage system.
///
/// PageId is the key of the page table: the buffer pool manager maps it to
/// the [`FrameId`](crate::storage::buffer::FrameId) currently holding the
/// page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub u64);

impl PageId {
    /// Creates a new PageId from a page number.
    pub const fn new(page_num: u64) -> Self {
        Self(page_num)
    }

    /// Returns the page number.
    pub const fn page_num(&self) -> u64 {
        self.0
    }

    /// Returns true unless this is [`INVALID_PAGE_ID`].
    pub const fn is_valid(&self) -> bool {
        self.0 != INVALID_PAGE_ID.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_id_new() {
        let page_id = PageId::new(42);
        assert_eq!(page_id.page_num(), 42);
        assert!(page_id.is_valid());
    }

    #[test]
    fn test_invalid_page_id() {
        assert!(!INVALID_PAGE_ID.is_valid());
        assert_eq!(INVALID_PAGE_ID.page_num(), u64::MAX);
    }

    #[test]
    fn test_page_id_ordering() {
        assert!(PageId::new(0) < PageId::new(1));
        assert!(PageId::new(1) < PageId::new(100));
        assert_eq!(PageId::new(42), PageId::new(42));
    }
}
