use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct UsersByRole {
    #[serde(rename = "ADMIN")]
    pub admin: i64,
    #[serde(rename = "OWNER")]
    pub owner: i64,
    #[serde(rename = "USER")]
    pub user: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_stores: i64,
    pub total_ratings: i64,
    pub users_by_role: UsersByRole,
}
