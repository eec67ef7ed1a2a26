use serde::Deserialize;
use utoipa::IntoParams;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Query parameters shared by all list endpoints.
#[derive(Debug, Default, Clone, Copy, Deserialize, IntoParams)]
pub struct PageParams {
    /// Page size (default 10)
    pub limit: Option<i64>,
    /// Number of items to skip (default 0)
    pub offset: Option<i64>,
}

impl PageParams {
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let params = PageParams::default();
        assert_eq!(params.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn clamps_out_of_range_values() {
        let params = PageParams {
            limit: Some(100_000),
            offset: Some(-5),
        };
        assert_eq!(params.limit(), MAX_PAGE_SIZE);
        assert_eq!(params.offset(), 0);

        let params = PageParams {
            limit: Some(0),
            offset: None,
        };
        assert_eq!(params.limit(), 1);
    }
}
