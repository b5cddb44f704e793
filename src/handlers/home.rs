use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};
use tracing::{debug, instrument};

use super::{liked_ids, page_context, profile_stats};
use crate::error::{AppError, AppResult};
use crate::schemas::AppState;
use crate::session::Session;
use crate::views;

/// Landing page for anonymous visitors, feed for logged-in users
#[instrument(skip(state, session))]
pub async fn homepage(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    let ctx = page_context(&session, &state.db).await?;

    let Some(user) = ctx.current_user.as_ref() else {
        return Ok((session, Html(views::home::anon_home_page(&ctx))).into_response());
    };

    let feed = user.feed(&state.db, state.feed_limit).await?;
    debug!("Loaded {} feed messages for user {}", feed.len(), user.id);
    let stats = profile_stats(&state.db, user).await?;
    let liked = liked_ids(&state.db, Some(user)).await?;

    let html = views::home::home_page(&ctx, user, stats, &feed, &liked);
    Ok((session, Html(html)).into_response())
}

/// Fallback for unknown routes
pub async fn not_found() -> AppError {
    AppError::NotFound("Page")
}
