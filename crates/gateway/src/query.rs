//! Record queries and their query-string encoding.

use ledgerscope_primitives::SortDirection;

/// Continue an ordered scan from `start_index` (or from the service's default
/// head for the direction when `None`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorQuery {
    pub start_index: Option<u64>,
    pub limit: u32,
    pub direction: SortDirection,
}

/// Fetch one numbered page of the whole collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
    pub direction: SortDirection,
    /// Restrict entries to an owner public key.
    pub public_key: Option<String>,
}

/// Fetch the records within `radius` of `center`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowQuery {
    pub center: u64,
    pub radius: u64,
}

impl WindowQuery {
    /// Inclusive index bounds of the window. The lower bound is clipped at 0;
    /// the upper bound is clipped by the service at the current chain height.
    pub fn bounds(&self) -> (u64, u64) {
        (
            self.center.saturating_sub(self.radius),
            self.center.saturating_add(self.radius),
        )
    }

    /// Upper limit on the number of records in the window.
    pub fn span(&self) -> u64 {
        let (low, high) = self.bounds();
        (high - low).saturating_add(1)
    }

    pub fn contains(&self, index: u64) -> bool {
        let (low, high) = self.bounds();
        (low..=high).contains(&index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Cursor(CursorQuery),
    Page(PageQuery),
    Window(WindowQuery),
}

impl Query {
    /// Query-string parameters for the collection endpoint.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Cursor(query) => {
                let mut params = vec![("sort", query.direction.as_str().to_owned())];
                if let Some(start) = query.start_index {
                    params.push(("startWithIndex", start.to_string()));
                }
                params.push(("limit", query.limit.to_string()));
                params
            }
            Self::Page(query) => {
                let mut params = vec![
                    ("scope", "all".to_owned()),
                    ("sort", query.direction.as_str().to_owned()),
                    ("page", query.page.to_string()),
                    ("pageLimit", query.page_size.to_string()),
                ];
                if let Some(key) = &query.public_key {
                    params.push(("publicKey", key.clone()));
                }
                params
            }
            Self::Window(query) => {
                // Descending scan from the top of the window covering its full span.
                let (_, high) = query.bounds();
                vec![
                    ("scope", "range".to_owned()),
                    ("sort", SortDirection::Descending.as_str().to_owned()),
                    ("startIndex", high.to_string()),
                    ("recordLimit", query.span().to_string()),
                    ("pageLimit", "1".to_owned()),
                ]
            }
        }
    }
}

impl From<CursorQuery> for Query {
    fn from(query: CursorQuery) -> Self {
        Self::Cursor(query)
    }
}

impl From<PageQuery> for Query {
    fn from(query: PageQuery) -> Self {
        Self::Page(query)
    }
}

impl From<WindowQuery> for Query {
    fn from(query: WindowQuery) -> Self {
        Self::Window(query)
    }
}
