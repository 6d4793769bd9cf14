use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{entity::users::Role, models::User};

#[derive(Deserialize, Debug, ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: Option<String>,
    pub role: Role,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct UserList {
    #[schema(value_type = Vec<User>)]
    pub items: Vec<User>,
}
