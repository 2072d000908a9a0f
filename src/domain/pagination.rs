use serde::Serialize;

pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Offset/limit window for listing endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    offset: i64,
    limit: i64,
}

impl PageParams {
    pub fn new(offset: i64, limit: i64) -> Self {
        let limit = if limit <= 0 { DEFAULT_PAGE_LIMIT } else { limit.min(MAX_PAGE_LIMIT) };
        Self {
            offset: offset.max(0),
            limit,
        }
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_LIMIT)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub result: Vec<T>,
    pub next: Option<i64>,
}

impl<T> Page<T> {
    /// `next` points past this page only when the page came back full.
    pub fn build(result: Vec<T>, params: PageParams) -> Self {
        let next = (result.len() as i64 == params.limit()).then(|| params.offset() + params.limit());
        Self { result, next }
    }
}
