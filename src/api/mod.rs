// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{authenticate, Role},
    config::DEFAULT_REFRESH_HEADER,
    models::{
        LoginRequest, LoginResponse, SignUpRequest, UpdatePasswordRequest, UpdateUserRequest,
        UserInfo, WithdrawRequest,
    },
    state::AppState,
};

pub mod health;
pub mod session;
pub mod users;

/// Build the application router.
///
/// Every API route runs behind the authentication filter; the docs do not.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/signUp", post(users::sign_up))
        .route("/login", post(session::login))
        .route("/logout", post(session::logout))
        .route("/user/info", get(users::get_my_info))
        .route("/user/{user_id}/info", get(users::get_user_info))
        .route("/user/update/info", put(users::update_info))
        .route("/user/update/password", put(users::update_password))
        .route("/user/withdraw", delete(users::withdraw))
        .layer(from_fn_with_state(state.clone(), authenticate))
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

/// Registers the access and refresh token headers as security schemes.
struct TokenHeaders;

impl Modify for TokenHeaders {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "refresh",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(DEFAULT_REFRESH_HEADER))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::root,
        health::health,
        users::sign_up,
        session::login,
        session::logout,
        users::get_my_info,
        users::get_user_info,
        users::update_info,
        users::update_password,
        users::withdraw
    ),
    components(
        schemas(
            Role,
            UserInfo,
            SignUpRequest,
            LoginRequest,
            LoginResponse,
            UpdateUserRequest,
            UpdatePasswordRequest,
            WithdrawRequest,
            health::HealthResponse
        )
    ),
    modifiers(&TokenHeaders),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Auth", description = "Login and logout; tokens travel in the Authorization headers"),
        (name = "Users", description = "Account management")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::BcryptVerifier;
    use crate::config::AuthSettings;
    use crate::store::InMemoryStore;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn app() -> Router {
        let state = AppState::new(InMemoryStore::new(), AuthSettings::new("router-secret"))
            .with_verifier(BcryptVerifier::with_cost(4));
        router(state)
    }

    #[tokio::test]
    async fn root_is_public() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn protected_route_without_token_is_unauthorized() {
        let response = app()
            .oneshot(Request::builder().uri("/user/info").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error_code"], "unauthenticated");
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api-doc/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(doc["paths"].get("/user/{user_id}/info").is_some());
        assert!(doc["components"]["securitySchemes"].get("bearer").is_some());
    }
}
