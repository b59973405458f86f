//! Authentication handlers: register, login, current user.

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use tracing::info;

use super::dto::{LoginRequest, RegisterRequest, TokenResponse, UserInfo};
use crate::auth::{create_token, hash_password, verify_password, AuthenticatedUser, JwtConfig};
use crate::infrastructure::database::entities::user;
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};
use crate::shared::errors::{DomainError, InfraError};
use crate::shared::AppError;

/// Auth handler state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub db: DatabaseConnection,
    pub jwt_config: JwtConfig,
}

fn token_response(u: user::Model, config: &JwtConfig) -> Result<TokenResponse, AppError> {
    let token = create_token(&u.id, &u.username, &u.role.to_string(), config)
        .map_err(|e| InfraError::Crypto(e.to_string()))?;
    Ok(TokenResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: config.expiration_hours * 3600,
        user: UserInfo::from(u),
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered, returns a JWT token", body = ApiResponse<TokenResponse>),
        (status = 409, description = "Username or email already taken"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TokenResponse>>), AppError> {
    let existing = user::Entity::find()
        .filter(
            user::Column::Username
                .eq(&request.username)
                .or(user::Column::Email.eq(&request.email)),
        )
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(DomainError::Conflict(
            "user with that email or username already exists".to_string(),
        )
        .into());
    }

    let password_hash =
        hash_password(&request.password).map_err(|e| InfraError::Crypto(e.to_string()))?;

    let now = Utc::now();
    let created = user::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        username: Set(request.username),
        email: Set(request.email),
        password_hash: Set(password_hash),
        role: Set(user::UserRole::Member),
        is_active: Set(true),
        created_at: Set(now),
        last_login_at: Set(Some(now)),
        login_count: Set(1),
    }
    .insert(&state.db)
    .await?;

    info!(user = %created.username, "user registered");

    let response = token_response(created, &state.jwt_config)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated, returns a JWT token", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Invalid credentials or deactivated account")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, AppError> {
    let found = user::Entity::find()
        .filter(
            user::Column::Username
                .eq(&request.username)
                .or(user::Column::Email.eq(&request.username)),
        )
        .one(&state.db)
        .await?;

    let Some(found) = found else {
        return Err(DomainError::Unauthorized("invalid username or password".to_string()).into());
    };

    if !found.is_active {
        return Err(DomainError::Unauthorized("account is deactivated".to_string()).into());
    }

    let valid = verify_password(&request.password, &found.password_hash)
        .map_err(|e| InfraError::Crypto(e.to_string()))?;
    if !valid {
        return Err(DomainError::Unauthorized("invalid username or password".to_string()).into());
    }

    // Track login count and time, as the profile page shows both.
    let login_count = found.login_count + 1;
    let mut active: user::ActiveModel = found.into();
    active.login_count = Set(login_count);
    active.last_login_at = Set(Some(Utc::now()));
    let updated = active.update(&state.db).await?;

    info!(user = %updated.username, "user logged in");

    let response = token_response(updated, &state.jwt_config)?;
    Ok(Json(ApiResponse::success(response)))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_user(
    State(state): State<AuthHandlerState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<UserInfo>>, AppError> {
    let Some(found) = user::Entity::find_by_id(&auth_user.user_id)
        .one(&state.db)
        .await?
    else {
        return Err(DomainError::not_found("user", "id", auth_user.user_id).into());
    };

    Ok(Json(ApiResponse::success(UserInfo::from(found))))
}
