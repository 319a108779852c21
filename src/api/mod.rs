// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{any::Any, net::SocketAddr, time::Duration};

use axum::{
    http::{header::CONTENT_TYPE, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::error;
use utoipa::{
    openapi::{
        security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
        server::Server,
    },
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{require_identity, Authorized, Identity},
    config::SERVER_VERSION,
    error::{ApiError, ErrorBody},
    models::{Account, LoginRequest, Node, TokenResponse},
    state::AppState,
};

pub mod accounts;
pub mod auth;
pub mod nodes;
pub mod version;

/// Requests running longer than this are answered with 408.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Browsers may cache a CORS preflight for this long.
const CORS_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Path serving the interactive API docs.
pub const SWAGGER_PATH: &str = "/swagger";

/// Path serving the OpenAPI document.
pub const OPENAPI_PATH: &str = "/api-doc/openapi.json";

/// Literal accepted in place of an account id.
pub const SELF_ID: &str = "self";

/// API document advertised for a server listening on `addr`.
pub fn api_docs(addr: SocketAddr) -> utoipa::openapi::OpenApi {
    let mut docs = ApiDoc::openapi();
    docs.info.version = SERVER_VERSION.to_string();
    docs.servers = Some(vec![Server::new(server_url(addr))]);
    docs
}

fn server_url(addr: SocketAddr) -> String {
    format!("http://{addr}")
}

/// Router with the default API document.
pub fn router(state: AppState) -> Router {
    router_with_docs(state, ApiDoc::openapi())
}

pub fn router_with_docs(state: AppState, docs: utoipa::openapi::OpenApi) -> Router {
    let auth_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", get(auth::refresh));

    let protected_routes = Router::new()
        .route("/accounts/{id}", get(accounts::get_account))
        .route("/accounts/", get(accounts::query_account))
        .route("/accounts", get(accounts::query_account))
        .route("/config/server/version", get(version::server_version))
        .route(
            "/nodes/{id}",
            get(nodes::get_node)
                .put(nodes::add_node)
                .delete(nodes::delete_node),
        )
        .route("/nodes/{id}/health", get(nodes::get_health))
        .route("/nodes/{id}/info", get(nodes::get_info))
        .route("/nodes/{id}/perf", get(nodes::get_perf))
        .route("/nodes/", get(nodes::query_node))
        .route("/nodes", get(nodes::query_node))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_identity,
        ));

    let app = Router::new()
        .merge(auth_routes)
        .merge(protected_routes)
        .method_not_allowed_fallback(page_not_found)
        .fallback(page_not_found)
        .with_state(state)
        .merge(SwaggerUi::new(SWAGGER_PATH).url(OPENAPI_PATH, docs));

    with_layers(app)
}

/// Wrap the router in the shared middleware stack.
///
/// `Router::layer` wraps what came before, so the last layer added runs first:
/// request id, CORS, tracing, timeout, then panic recovery.
fn with_layers(app: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([
            Method::DELETE,
            Method::GET,
            Method::PATCH,
            Method::POST,
            Method::PUT,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .expose_headers([CONTENT_TYPE])
        .max_age(CORS_MAX_AGE);

    app.layer(CatchPanicLayer::custom(panic_response))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic"
    };
    error!(panic = %detail, "Handler panicked");
    ApiError::internal("internal server error").into_response()
}

/// Fallback for unmatched paths and methods. Callers must still be authorized.
async fn page_not_found(Authorized(_): Authorized) -> ApiError {
    ApiError::not_found("Page not found")
}

/// Parse a path id, rejecting anything that is not a non-negative integer.
pub(crate) fn parse_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse::<u64>()
        .map_err(|e| ApiError::bad_request(format!("invalid id {raw:?}: {e}")))
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
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
        components.add_security_scheme(
            "token_query",
            SecurityScheme::ApiKey(ApiKey::Query(ApiKeyValue::new("token"))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "metalflow", description = "Metal Flow API"),
    paths(
        auth::login,
        auth::refresh,
        accounts::get_account,
        accounts::query_account,
        version::server_version,
        nodes::get_node,
        nodes::get_health,
        nodes::get_info,
        nodes::get_perf,
        nodes::query_node,
        nodes::add_node,
        nodes::delete_node
    ),
    components(
        schemas(Account, Node, LoginRequest, TokenResponse, ErrorBody, Identity)
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Login and token refresh"),
        (name = "accounts", description = "Account lookup"),
        (name = "config", description = "Server configuration"),
        (name = "nodes", description = "Node lookup")
    )
)]
pub struct ApiDoc;


#[cfg(test)]
mod tests {
    use super::test_support::{admin_token, get, send, token_for};
    use super::*;
    use axum::{
        body::Body,
        http::{
            header::{
                ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_ORIGIN,
                ACCESS_CONTROL_REQUEST_METHOD, ORIGIN, WWW_AUTHENTICATE,
            },
            Request,
        },
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(AppState::default());
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn login_then_read_protected_resources() {
        let app = router(AppState::default());

        let request = Request::post("/auth/login")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"username":"admin","password":"admin"}"#))
            .unwrap();
        let (status, body) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 200);
        let token = body["token"].as_str().unwrap().to_string();

        let (status, body) = get(app.clone(), "/accounts/1", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "John Doe");

        let (status, body) = get(app.clone(), "/nodes/0/health", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "running");

        let (status, body) = get(app, "/accounts/?q=", Some(&token)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 404);
    }

    #[tokio::test]
    async fn protected_route_without_token_is_unauthorized() {
        let app = router(AppState::default());
        let response = app
            .oneshot(Request::get("/accounts/1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[WWW_AUTHENTICATE], "JWT realm=metalflow");
    }

    #[tokio::test]
    async fn expired_or_tampered_token_is_unauthorized() {
        let state = AppState::default();
        let expired = state
            .tokens
            .issue_at(
                &Identity::new("admin"),
                chrono::Utc::now() - chrono::TimeDelta::hours(2),
            )
            .unwrap()
            .token;
        let tampered = format!("{}x", admin_token(&state));
        let app = router(state);

        let (status, body) = get(app.clone(), "/accounts/1", Some(&expired)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "token is expired");

        let (status, body) = get(app, "/accounts/1", Some(&tampered)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], 401);
    }

    #[tokio::test]
    async fn non_admin_identity_is_forbidden() {
        let state = AppState::default();
        let token = token_for(&state, "john");
        let (status, body) = get(router(state), "/nodes/0", Some(&token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], 403);
        assert_eq!(body["message"], "you don't have permission to access this resource");
    }

    #[tokio::test]
    async fn unmatched_path_requires_auth_then_404() {
        let state = AppState::default();
        let token = admin_token(&state);
        let app = router(state);

        let (status, _) = get(app.clone(), "/no/such/page", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = get(app, "/no/such/page", Some(&token)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Page not found");
    }

    #[tokio::test]
    async fn unrouted_method_requires_auth_then_404() {
        let state = AppState::default();
        let token = admin_token(&state);
        let app = router(state);

        let request = Request::post("/accounts/1").body(Body::empty()).unwrap();
        let (status, body) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], 401);

        let request = Request::post("/accounts/1")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 404);
        assert_eq!(body["message"], "Page not found");
    }

    #[tokio::test]
    async fn token_in_query_or_cookie_is_accepted() {
        let state = AppState::default();
        let token = admin_token(&state);
        let app = router(state);

        let (status, _) = get(app.clone(), &format!("/nodes/1?token={token}"), None).await;
        assert_eq!(status, StatusCode::OK);

        let request = Request::get("/nodes/1")
            .header("cookie", format!("jwt={token}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["region"], "Xian");
    }

    #[tokio::test]
    async fn panicking_handler_returns_500_and_server_keeps_serving() {
        async fn boom() -> &'static str {
            panic!("boom")
        }
        let app = with_layers(
            Router::new()
                .route("/boom", axum::routing::get(boom))
                .route("/ok", axum::routing::get(|| async { "ok" })),
        );

        let (status, body) = get(app.clone(), "/boom", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], 500);

        let response = app
            .oneshot(Request::get("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn slow_handler_times_out_with_408() {
        async fn slow() -> &'static str {
            tokio::time::sleep(Duration::from_secs(60)).await;
            "late"
        }
        tokio::time::pause();
        let app = with_layers(Router::new().route("/slow", axum::routing::get(slow)));
        let response = app
            .oneshot(Request::get("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let app = router(AppState::default());
        let response = app
            .oneshot(Request::get("/auth/refresh").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn cors_preflight_mirrors_origin() {
        let app = router(AppState::default());
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/accounts/1")
            .header(ORIGIN, "http://example.com")
            .header(ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://example.com"
        );
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[tokio::test]
    async fn openapi_document_is_public() {
        let docs = api_docs(crate::server::parse_listen_url(":9080").unwrap());
        assert_eq!(docs.info.version, SERVER_VERSION);
        let app = router_with_docs(AppState::default(), docs);

        let (status, body) = get(app, OPENAPI_PATH, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["servers"][0]["url"], "http://0.0.0.0:9080");
        assert!(body["paths"]["/accounts/{id}"].is_object());
    }

    #[test]
    fn parse_id_rejects_non_numbers() {
        assert_eq!(parse_id("7").unwrap(), 7);
        assert_eq!(parse_id("-1").unwrap_err().status, StatusCode::BAD_REQUEST);
        assert_eq!(parse_id("abc").unwrap_err().status, StatusCode::BAD_REQUEST);
    }
}
