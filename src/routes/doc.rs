use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        admin::{DashboardStats, UsersByRole},
        auth::{AuthResponse, LoginRequest, SignupRequest},
        ratings::{RatingList, RatingResponse, RatingWithUser, SubmitRatingRequest},
        stores::{
            AdminStore, AdminStoreList, CreateStoreRequest, OwnerStore, StoreList,
            StoreWithMyRating,
        },
        users::{CreateUserRequest, UserList},
    },
    entity::users::Role,
    models::{Rating, User, UserRef},
    response::{ApiResponse, Meta},
    routes::{admin, auth, health, owner, stores},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::signup,
        auth::login,
        auth::me,
        stores::list_stores,
        stores::submit_rating,
        admin::dashboard,
        admin::list_users,
        admin::create_user,
        admin::list_stores,
        admin::create_store,
        owner::my_store,
        owner::my_store_ratings,
    ),
    components(
        schemas(
            Role,
            User,
            UserRef,
            Rating,
            SignupRequest,
            LoginRequest,
            AuthResponse,
            CreateUserRequest,
            UserList,
            CreateStoreRequest,
            AdminStore,
            AdminStoreList,
            StoreWithMyRating,
            StoreList,
            OwnerStore,
            SubmitRatingRequest,
            RatingResponse,
            RatingWithUser,
            RatingList,
            DashboardStats,
            UsersByRole,
            Meta,
            ApiResponse<User>,
            ApiResponse<AuthResponse>,
            ApiResponse<AdminStore>,
            ApiResponse<UserList>,
            ApiResponse<AdminStoreList>,
            ApiResponse<StoreList>,
            ApiResponse<OwnerStore>,
            ApiResponse<RatingResponse>,
            ApiResponse<RatingList>,
            ApiResponse<DashboardStats>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Signup, login and profile"),
        (name = "Stores", description = "Store browsing and rating"),
        (name = "Admin", description = "User and store administration"),
        (name = "Owner", description = "Store-owner dashboard"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
