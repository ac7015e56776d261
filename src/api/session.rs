// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login and logout endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::auth::{filter::insert_token_header, session, Auth, AuthError};
use crate::models::{LoginRequest, LoginResponse};
use crate::state::AppState;

/// Exchange credentials for a token pair.
///
/// The raw tokens are returned in the access and refresh headers (no
/// `Bearer` prefix); the JSON body only carries account and expiry data.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; tokens in response headers", body = LoginResponse),
        (status = 401, description = "Invalid email or password"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, AuthError> {
    let (user, pair) = session::login(&state, &request.email, &request.password).await?;

    let body = LoginResponse {
        user_id: user.id,
        email: user.email.to_string(),
        role: user.role,
        access_expires_at: pair.access_expires_at,
        refresh_expires_at: pair.refresh_expires_at,
    };

    let mut response = (StatusCode::OK, Json(body)).into_response();
    let headers = response.headers_mut();
    insert_token_header(headers, &state.settings.access_header, &pair.access_token)?;
    insert_token_header(headers, &state.settings.refresh_header, &pair.refresh_token)?;
    Ok(response)
}

/// Drop the caller's refresh token. The current access token keeps working
/// until it expires.
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Logged out"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    Auth(principal): Auth,
) -> Result<StatusCode, AuthError> {
    session::logout(&state, &principal.email).await?;
    Ok(StatusCode::NO_CONTENT)
}
