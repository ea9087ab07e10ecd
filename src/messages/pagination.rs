/**
 * Cursor Pagination
 *
 * Pages are fetched as `limit + 1` rows; the extra row only signals that
 * more data exists and is cut before the response. The cursor is the id of
 * the last item actually returned.
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Anything pageable by an id cursor.
pub trait Cursored {
    fn cursor_id(&self) -> Uuid;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub next_cursor: Option<Uuid>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

/// Shape a `limit + 1` fetch into a page.
///
/// Exactly `limit + 1` rows means there is a next page: truncate to
/// `limit` and point the cursor at the last kept item. Anything shorter is
/// the final page.
pub fn paginate<T: Cursored>(mut items: Vec<T>, limit: usize) -> PaginatedResult<T> {
    let has_more = items.len() > limit;
    if has_more {
        items.truncate(limit);
    }
    let next_cursor = if has_more {
        items.last().map(Cursored::cursor_id)
    } else {
        None
    };

    PaginatedResult {
        items,
        meta: PageMeta {
            next_cursor,
            has_more,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Item(Uuid);

    impl Cursored for Item {
        fn cursor_id(&self) -> Uuid {
            self.0
        }
    }

    fn items(n: usize) -> Vec<Item> {
        (0..n).map(|_| Item(Uuid::now_v7())).collect()
    }

    #[test]
    fn test_full_page_plus_one_sets_cursor() {
        let fetched = items(4);
        let last_kept = fetched[2].0;

        let page = paginate(fetched, 3);
        assert_eq!(page.items.len(), 3);
        assert!(page.meta.has_more);
        assert_eq!(page.meta.next_cursor, Some(last_kept));
    }

    #[test]
    fn test_short_page_is_final() {
        let page = paginate(items(2), 3);
        assert_eq!(page.items.len(), 2);
        assert!(!page.meta.has_more);
        assert_eq!(page.meta.next_cursor, None);
    }

    #[test]
    fn test_exact_limit_without_extra_row_is_final() {
        let page = paginate(items(3), 3);
        assert_eq!(page.items.len(), 3);
        assert!(!page.meta.has_more);
        assert_eq!(page.meta.next_cursor, None);
    }

    #[test]
    fn test_empty_page() {
        let page = paginate(items(0), 3);
        assert!(page.items.is_empty());
        assert!(!page.meta.has_more);
        assert_eq!(page.meta.next_cursor, None);
    }
}
