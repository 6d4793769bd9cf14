use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::auth::{AuthResponse, Claims, LoginRequest, SignupRequest},
    entity::{
        Users,
        users::{ActiveModel, Column, Role},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
    response::ApiResponse,
    state::AppState,
};

pub fn validate_name(name: &str) -> AppResult<()> {
    let len = name.chars().count();
    if !(20..=60).contains(&len) {
        return Err(AppError::Validation(
            "name must be between 20 and 60 characters".into(),
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> AppResult<()> {
    let len = password.chars().count();
    if !(8..=16).contains(&len) {
        return Err(AppError::Validation(
            "password must be between 8 and 16 characters".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AppError::Validation(
            "password must contain an uppercase letter".into(),
        ));
    }
    if !password.chars().any(|c| !c.is_alphanumeric()) {
        return Err(AppError::Validation(
            "password must contain a special character".into(),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> AppResult<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(AppError::Validation("email is not valid".into()));
    }
    Ok(())
}

pub fn validate_address(address: Option<&str>) -> AppResult<()> {
    if let Some(address) = address {
        if address.chars().count() > 400 {
            return Err(AppError::Validation(
                "address must be at most 400 characters".into(),
            ));
        }
    }
    Ok(())
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn issue_token(user_id: Uuid, role: Role) -> AppResult<String> {
    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        role,
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
    Ok(token)
}

pub async fn signup(
    state: &AppState,
    payload: SignupRequest,
) -> AppResult<ApiResponse<AuthResponse>> {
    let SignupRequest {
        name,
        email,
        password,
        address,
    } = payload;

    validate_name(&name)?;
    validate_email(&email)?;
    validate_password(&password)?;
    validate_address(address.as_deref())?;

    let exist = Users::find()
        .filter(Column::Email.eq(&email))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::Conflict("Email is already registered".into()));
    }

    let password_hash = hash_password(&password)?;

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        email: Set(email),
        password_hash: Set(password_hash),
        address: Set(address),
        role: Set(Role::User),
        created_at: NotSet,
    };
    let user = active.insert(&state.orm).await?;

    let token = issue_token(user.id, user.role)?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.id),
        "user_signup",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Account created",
        AuthResponse {
            token,
            user: User::from(user),
        },
        None,
    ))
}

pub async fn login(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<AuthResponse>> {
    let LoginRequest { email, password } = payload;

    let user = Users::find()
        .filter(Column::Email.eq(&email))
        .one(&state.orm)
        .await?;
    let user = match user {
        Some(u) => u,
        None => return Err(AppError::Unauthorized("Invalid email or password".into())),
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::Unauthorized("Invalid email or password".into()));
    }

    let token = issue_token(user.id, user.role)?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.id),
        "user_login",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Logged in",
        AuthResponse {
            token,
            user: User::from(user),
        },
        None,
    ))
}

pub async fn current_user(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    let profile = Users::find_by_id(user.user_id).one(&state.orm).await?;
    let profile = match profile {
        Some(u) => u,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Profile", User::from(profile), None))
}
