use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn is_requested(&self) -> bool {
        self.page.is_some() || self.per_page.is_some()
    }

    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Admin listing filters. Page parameters are kept flat because
/// `serde_urlencoded` cannot parse numbers through `#[serde(flatten)]`.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CheckoutListQuery {
    /// Page number, default 1. Pagination applies only when a page parameter is given.
    pub page: Option<i64>,
    /// Items per page, default 20, at most 100.
    pub per_page: Option<i64>,
    /// Exact status name.
    pub status: Option<String>,
    /// Case-insensitive search over username, email, phone number and status.
    pub q: Option<String>,
    /// Creation time order, default `desc`.
    pub sort_order: Option<SortOrder>,
}

impl CheckoutListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    /// Viewer's offset from UTC in minutes east (e.g. 420 for UTC+07:00), default 0.
    pub tz_offset_minutes: Option<i32>,
}
