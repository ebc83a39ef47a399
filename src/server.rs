/// HTTP server setup and routing
use crate::{
    context::AppContext,
    error::{AccountError, AccountResult},
};
use axum::{
    http::{header, Method, StatusCode},
    response::Json,
    Router,
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Build the main application router
/// Returns Router<()> because state is already provided
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .merge(crate::api::routes(ctx.clone()))
        .fallback(not_found)
        .with_state(ctx)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// 404 handler
async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "NotFound",
            "message": "Endpoint not found"
        })),
    )
}

/// Start the HTTP server
pub async fn serve(ctx: AppContext) -> AccountResult<()> {
    let addr = ctx.listen_addr();

    info!("Account service listening on {}", addr);
    info!("   Database: {}", ctx.config.storage.account_db.display());
    info!("   Token lifetime: {}s", ctx.session_tokens.ttl_secs());

    let app = build_router(ctx);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AccountError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AccountError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ServerConfig, db};
    use axum::{
        body::Body,
        http::{Request, Response},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    async fn create_test_app() -> (Router, AppContext) {
        let pool = db::create_memory_pool().await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        let ctx = AppContext::with_pool(ServerConfig::for_tests(), pool);
        (build_router(ctx.clone()), ctx)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_user(token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri("/user");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn signup_alice(app: &Router) -> i64 {
        let response = app
            .clone()
            .oneshot(post_json(
                "/signup",
                json!({"username": "alice", "password": "secret123", "email": "a@x.com"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await["userId"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_signup_login_profile_scenario() {
        let (app, _) = create_test_app().await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/signup",
                json!({"username": "alice", "password": "secret123", "email": "a@x.com"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["message"], "User created");
        let user_id = body["userId"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(post_json(
                "/login",
                json!({"username": "alice", "password": "wrong"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Invalid credentials");
        assert!(body.get("token").is_none());

        let response = app
            .clone()
            .oneshot(post_json(
                "/login",
                json!({"username": "alice", "password": "secret123", "latitude": 1.0, "longitude": 2.0}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let token = json_body(response).await["token"]
            .as_str()
            .unwrap()
            .to_string();

        let response = app.clone().oneshot(get_user(Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let profile = json_body(response).await;
        assert_eq!(profile["id"], user_id);
        assert_eq!(profile["username"], "alice");
        assert_eq!(profile["email"], "a@x.com");
        assert_eq!(profile["latitude"], 1.0);
        assert_eq!(profile["longitude"], 2.0);
        assert!(profile.get("password").is_none());
        assert!(profile.get("created_at").is_some());
    }

    #[tokio::test]
    async fn test_signup_missing_field_is_bad_request() {
        let (app, _) = create_test_app().await;

        let response = app
            .oneshot(post_json(
                "/signup",
                json!({"username": "alice", "password": "secret123"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["message"],
            "Username, password, and email are required"
        );
    }

    #[tokio::test]
    async fn test_signup_malformed_body_is_bad_request() {
        let (app, _) = create_test_app().await;

        let request = Request::builder()
            .method("POST")
            .uri("/signup")
            .header("Content-Type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["message"].is_string());
    }

    #[tokio::test]
    async fn test_signup_duplicate_username_is_conflict() {
        let (app, _) = create_test_app().await;
        signup_alice(&app).await;

        let response = app
            .oneshot(post_json(
                "/signup",
                json!({"username": "alice", "password": "other", "email": "b@x.com"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_login_unknown_user_is_not_found() {
        let (app, _) = create_test_app().await;

        let response = app
            .oneshot(post_json(
                "/login",
                json!({"username": "ghost", "password": "secret123"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["message"], "User not found");
    }

    #[tokio::test]
    async fn test_user_requires_token() {
        let (app, _) = create_test_app().await;

        let response = app.oneshot(get_user(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(response).await["message"],
            "No token, authorization denied"
        );
    }

    #[tokio::test]
    async fn test_user_rejects_garbage_token() {
        let (app, _) = create_test_app().await;

        let response = app.oneshot(get_user(Some("not.a.token"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_user_gone_after_token_issued() {
        let (app, ctx) = create_test_app().await;
        let user_id = signup_alice(&app).await;
        let token = ctx.session_tokens.issue(user_id).unwrap();

        sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(user_id)
            .execute(&ctx.account_db)
            .await
            .unwrap();

        let response = app.oneshot(get_user(Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_storage_failure_uses_generic_message() {
        let (app, ctx) = create_test_app().await;
        ctx.account_db.close().await;

        let response = app
            .oneshot(post_json(
                "/login",
                json!({"username": "alice", "password": "secret123"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["message"], "Error logging in");
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let (app, _) = create_test_app().await;

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (app, _) = create_test_app().await;

        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["message"], "Endpoint not found");
    }
}
