use crate::handlers::{
    auth::{login, login_form, logout, signup, signup_form},
    health::health_check,
    home::{homepage, not_found},
    messages::{create_message, delete_message, new_message_form, show_message},
    users::{
        delete_user, edit_profile, edit_profile_form, follow_user, list_users, show_followers,
        show_following, show_likes, show_user, stop_following, toggle_like,
    },
};
use crate::schemas::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        .route("/", get(homepage))
        // Authentication
        .route("/signup", get(signup_form).post(signup))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
        // Messages
        .route("/messages/new", get(new_message_form).post(create_message))
        .route("/messages/:message_id", get(show_message))
        .route("/messages/:message_id/delete", post(delete_message))
        // Users
        .route("/users", get(list_users))
        .route("/users/profile", get(edit_profile_form).post(edit_profile))
        .route("/users/delete", post(delete_user))
        .route("/users/:user_id", get(show_user))
        .route("/users/:user_id/following", get(show_following))
        .route("/users/:user_id/followers", get(show_followers))
        .route("/users/:user_id/likes", get(show_likes))
        .route("/users/follow/:user_id", post(follow_user))
        .route("/users/stop-following/:user_id", post(stop_following))
        .route("/users/add_like/:message_id", post(toggle_like))
        .fallback(not_found)
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30))),
        )
        .with_state(state)
}
