//! Turns untrusted query parameters into a bounded query window.

pub const DEFAULT_LIMIT: i64 = 5;
pub const MAX_LIMIT: i64 = 100;

/// A validated pagination window. `page` is 1-based; `limit` is always within
/// 1..=MAX_LIMIT, so offset math and the page count can never divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
    pub limit: i64,
}

impl Page {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            number: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.limit
    }

    /// ceil(total / limit). A page past the end is not an error; the query
    /// simply returns an empty list.
    pub fn total_pages(&self, total: i64) -> i64 {
        (total + self.limit - 1) / self.limit
    }
}

/// Escapes LIKE metacharacters so a search term is matched as a literal
/// substring. Postgres uses backslash as the default escape character.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_params_absent() {
        let p = Page::new(None, None);
        assert_eq!(p.number, 1);
        assert_eq!(p.limit, DEFAULT_LIMIT);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn page_and_limit_are_clamped() {
        assert_eq!(Page::new(Some(0), None).number, 1);
        assert_eq!(Page::new(Some(-3), None).number, 1);
        assert_eq!(Page::new(None, Some(0)).limit, 1);
        assert_eq!(Page::new(None, Some(-10)).limit, 1);
        assert_eq!(Page::new(None, Some(10_000)).limit, MAX_LIMIT);
    }

    #[test]
    fn offset_follows_page_number() {
        let p = Page::new(Some(3), Some(5));
        assert_eq!(p.offset(), 10);
    }

    #[test]
    fn total_pages_is_ceiling_division() {
        let p = Page::new(None, Some(5));
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(1), 1);
        assert_eq!(p.total_pages(5), 1);
        assert_eq!(p.total_pages(6), 2);
        assert_eq!(p.total_pages(11), 3);
    }

    #[test]
    fn limit_one_never_divides_by_zero() {
        let p = Page::new(Some(1), Some(0));
        assert_eq!(p.total_pages(7), 7);
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }
}
