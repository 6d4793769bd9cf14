use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Meta {
    pub fn new(page: i64, page_size: i64, total: i64) -> Self {
        let total_pages = ((total + page_size - 1) / page_size).max(1);
        Self {
            page,
            page_size,
            total,
            total_pages,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, pagination: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            pagination,
        }
    }
}
