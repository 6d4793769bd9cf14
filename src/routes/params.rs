use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::users::Role,
    error::{AppError, AppResult},
};

pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl Pagination {
    /// Resolve (page, page_size, offset). Out-of-range values are a caller
    /// error, not something to silently clamp.
    pub fn validate(&self) -> AppResult<(i64, i64, i64)> {
        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err(AppError::Validation("page must be at least 1".into()));
        }
        let page_size = self.page_size.unwrap_or(10);
        if page_size <= 0 {
            return Err(AppError::Validation("pageSize must be positive".into()));
        }
        let page_size = page_size.min(MAX_PAGE_SIZE);
        Ok((page, page_size, (page - 1) * page_size))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: Option<&str>, default: SortOrder) -> AppResult<SortOrder> {
        match raw {
            None | Some("") => Ok(default),
            Some("asc") => Ok(SortOrder::Asc),
            Some("desc") => Ok(SortOrder::Desc),
            Some(other) => Err(AppError::Validation(format!(
                "sortOrder must be asc or desc (got {other})"
            ))),
        }
    }
}

/// Allow-listed sort columns for user and store listings. Anything outside
/// the list is rejected rather than spliced into the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSortBy {
    Name,
    Email,
    CreatedAt,
}

impl ListSortBy {
    pub fn parse(raw: Option<&str>, default: ListSortBy) -> AppResult<ListSortBy> {
        match raw {
            None | Some("") => Ok(default),
            Some("name") => Ok(ListSortBy::Name),
            Some("email") => Ok(ListSortBy::Email),
            Some("createdAt") => Ok(ListSortBy::CreatedAt),
            Some(other) => Err(AppError::Validation(format!(
                "sortBy must be one of name, email, createdAt (got {other})"
            ))),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl StoreListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStoreListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search: Option<String>,
    pub owner_id: Option<Uuid>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl AdminStoreListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search: Option<String>,
    pub role: Option<Role>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl UserListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            page_size: self.page_size,
        }
    }
}
