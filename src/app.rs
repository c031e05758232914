use axum::{
    http::{header, HeaderName, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    middleware::{
        auth::{require_auth, NEW_TOKEN_HEADER, REFRESH_TOKEN_HEADER},
        request::{handle_panic, request_context, REQUEST_ID_HEADER},
    },
    routes::{self, admin, health, metrics, posts, profile, users},
    AppState,
};

/// Assembles every route and the global middleware stack.
pub fn router(state: AppState) -> Router {
    let auth = from_fn_with_state(state.clone(), require_auth);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(REFRESH_TOKEN_HEADER),
        ])
        .expose_headers([
            HeaderName::from_static(NEW_TOKEN_HEADER),
            HeaderName::from_static(REQUEST_ID_HEADER),
        ]);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::metrics_handler))
        // Auth
        .route("/api/auth/signup", post(routes::auth::signup))
        .route("/api/auth/signin", post(routes::auth::signin))
        // Users
        .route("/api/users/me", get(users::me).route_layer(auth.clone()))
        .route("/api/users/{id}", get(users::get_user).route_layer(auth.clone()))
        // Profile
        .route(
            "/api/profile",
            get(profile::get_profile)
                .put(profile::upsert_profile)
                .route_layer(auth.clone()),
        )
        // Posts: reads are public, writes need a bearer token
        .route(
            "/api/posts",
            get(posts::list_posts).merge(post(posts::create_post).route_layer(auth)),
        )
        .route("/api/posts/{id}", get(posts::get_post))
        // Admin dashboard
        .route("/admin", get(admin::index))
        .route("/admin/", get(admin::index))
        .route("/admin/users", get(admin::users))
        .route("/admin/users/{id}", delete(admin::delete_user))
        .route("/admin/posts", get(admin::posts))
        .route("/admin/posts/{id}", delete(admin::delete_post))
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(from_fn(request_context))
        .with_state(state)
}
