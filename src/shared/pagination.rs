//! Page-size math for list endpoints.
//!
//! `page_size` comes from configuration and is validated at startup
//! (`AppConfig::validate`), so a zero value can never reach `compute`.

use crate::shared::errors::DomainError;

/// Offset/total-pages pair for one page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageResult {
    /// Row offset of the first item on the requested page.
    pub offset: u64,
    /// Total number of pages; 0 when there are no items.
    pub total_pages: u64,
}

/// Compute pagination bounds for a listing.
///
/// A `requested_page` past the last page yields an offset beyond the
/// available rows; the query then returns an empty page, which is fine.
pub fn compute(total_items: u64, requested_page: u32, page_size: u32) -> PageResult {
    debug_assert!(page_size > 0, "page_size is validated at startup");
    let page_size = u64::from(page_size);
    PageResult {
        offset: page_size * (u64::from(requested_page) - 1),
        total_pages: total_items.div_ceil(page_size),
    }
}

/// Reject out-of-range page numbers before any query runs.
///
/// Pages start at 1; zero is a client error rather than a silent clamp.
pub fn validate_page(requested_page: u32) -> Result<u32, DomainError> {
    if requested_page == 0 {
        return Err(DomainError::Validation(
            "page must be a positive integer".to_string(),
        ));
    }
    Ok(requested_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(compute(5, 1, 2).total_pages, 3);
        assert_eq!(compute(4, 1, 2).total_pages, 2);
        assert_eq!(compute(1, 1, 20).total_pages, 1);
    }

    #[test]
    fn empty_listing_has_zero_pages() {
        let page = compute(0, 1, 20);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn offset_is_page_size_times_preceding_pages() {
        assert_eq!(compute(100, 1, 20).offset, 0);
        assert_eq!(compute(100, 3, 2).offset, 4);
        assert_eq!(compute(100, 5, 20).offset, 80);
    }

    #[test]
    fn page_past_the_end_is_not_an_error() {
        let page = compute(5, 99, 2);
        assert_eq!(page.total_pages, 3);
        // offset exceeds available rows; the query returns an empty page
        assert_eq!(page.offset, 196);
    }

    #[test]
    fn page_zero_is_rejected() {
        assert!(validate_page(0).is_err());
        assert_eq!(validate_page(1).unwrap(), 1);
        assert_eq!(validate_page(7).unwrap(), 7);
    }
}
