// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::auth::{session, Auth, Role};
use crate::error::ApiError;
use crate::models::{
    Identity, SignUpRequest, UpdatePasswordRequest, UpdateUserRequest, UserInfo, WithdrawRequest,
};
use crate::state::AppState;
use crate::store::{NewUser, StoreError};

/// Register a new account with the `user` role.
#[utoipa::path(
    post,
    path = "/signUp",
    tag = "Users",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created", body = UserInfo),
        (status = 400, description = "Missing email, nickname or password"),
        (status = 409, description = "Email or nickname already taken"),
    )
)]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<UserInfo>), ApiError> {
    let email = request.email.trim();
    if email.is_empty() || request.nick_name.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("email, nick_name and password are required"));
    }

    let email = Identity::from(email);
    if state.store.read().await.find_by_email(&email).is_some() {
        return Err(StoreError::EmailTaken.into());
    }

    let password_hash = session::hash_password(&state, &request.password).await?;
    let user = state.store.write().await.insert_user(NewUser {
        email,
        nick_name: request.nick_name,
        name: request.name,
        age: request.age,
        password_hash,
        role: Role::default(),
    })?;

    info!(user_id = %user.id, "User signed up");
    Ok((StatusCode::CREATED, Json(UserInfo::from(&user))))
}

/// Get the caller's own account.
#[utoipa::path(
    get,
    path = "/user/info",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Account information", body = UserInfo),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_my_info(
    State(state): State<AppState>,
    Auth(principal): Auth,
) -> Result<Json<UserInfo>, ApiError> {
    let user = state
        .store
        .read()
        .await
        .find_by_email(&principal.email)
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(UserInfo::from(&user)))
}

/// Get another account's public information.
#[utoipa::path(
    get,
    path = "/user/{user_id}/info",
    tag = "Users",
    security(("bearer" = [])),
    params(("user_id" = String, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account information", body = UserInfo),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "No such account"),
    )
)]
pub async fn get_user_info(
    State(state): State<AppState>,
    Auth(_principal): Auth,
    Path(user_id): Path<String>,
) -> Result<Json<UserInfo>, ApiError> {
    let user = state
        .store
        .read()
        .await
        .find_by_id(&user_id)
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(UserInfo::from(&user)))
}

/// Update nickname, name or age. Absent fields are unchanged.
#[utoipa::path(
    put,
    path = "/user/update/info",
    tag = "Users",
    security(("bearer" = [])),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated account", body = UserInfo),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 409, description = "Nickname already taken"),
    )
)]
pub async fn update_info(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserInfo>, ApiError> {
    let user = state
        .store
        .write()
        .await
        .update_profile(&principal.email, request)?;
    info!(user_id = %user.id, "Profile updated");
    Ok(Json(UserInfo::from(&user)))
}

/// Change the password after re-checking the current one.
///
/// Every outstanding token stops verifying and the refresh binding is
/// cleared; the client has to log in again.
#[utoipa::path(
    put,
    path = "/user/update/password",
    tag = "Users",
    security(("bearer" = [])),
    request_body = UpdatePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "New password is empty"),
        (status = 401, description = "Current password did not match"),
    )
)]
pub async fn update_password(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Json(request): Json<UpdatePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    if request.new_password.is_empty() {
        return Err(ApiError::bad_request("new_password is required"));
    }

    let user = session::reauthenticate(&state, &principal.email, &request.check_password).await?;
    let password_hash = session::hash_password(&state, &request.new_password).await?;
    state
        .store
        .write()
        .await
        .update_password_hash(&user.email, password_hash)?;

    info!(user_id = %user.id, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}

/// Delete the caller's account after re-checking the password.
#[utoipa::path(
    delete,
    path = "/user/withdraw",
    tag = "Users",
    security(("bearer" = [])),
    request_body = WithdrawRequest,
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Password did not match"),
    )
)]
pub async fn withdraw(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Json(request): Json<WithdrawRequest>,
) -> Result<StatusCode, ApiError> {
    let user = session::reauthenticate(&state, &principal.email, &request.password).await?;
    state.store.write().await.delete_user(&user.email)?;

    info!(user_id = %user.id, "User withdrew");
    Ok(StatusCode::NO_CONTENT)
}
