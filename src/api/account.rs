/// Account endpoints: signup, login and profile
use crate::{
    account::{LoginRequest, LoginResponse, SignupRequest, SignupResponse},
    api::middleware::require_session,
    auth::AuthenticatedAccount,
    context::AppContext,
    db::account::AccountProfile,
    error::{AccountError, AccountResult},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};

/// Build account routes
///
/// Only `/user` sits behind the session middleware.
pub fn routes(ctx: AppContext) -> Router<AppContext> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route(
            "/user",
            get(get_user).route_layer(middleware::from_fn_with_state(ctx, require_session)),
        )
}

/// Turn a body-parse failure into a 400 carrying a `message`
fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> AccountResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AccountError::Validation(rejection.body_text()))
}

/// Create account endpoint
async fn signup(
    State(ctx): State<AppContext>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> AccountResult<(StatusCode, Json<SignupResponse>)> {
    let req = parse_body(body)?;

    let user_id = ctx
        .account_manager
        .register(req)
        .await
        .map_err(|e| e.masked("Error creating user"))?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created".to_string(),
            user_id,
        }),
    ))
}

/// Login endpoint
async fn login(
    State(ctx): State<AppContext>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> AccountResult<Json<LoginResponse>> {
    let req = parse_body(body)?;

    let token = ctx
        .account_manager
        .authenticate(req)
        .await
        .map_err(|e| e.masked("Error logging in"))?;

    Ok(Json(LoginResponse { token }))
}

/// Profile endpoint for the authenticated account
async fn get_user(
    State(ctx): State<AppContext>,
    Extension(account): Extension<AuthenticatedAccount>,
) -> AccountResult<Json<AccountProfile>> {
    let profile = ctx
        .account_manager
        .get_profile(account.id)
        .await
        .map_err(|e| e.masked("Error fetching user details"))?;

    Ok(Json(profile))
}
