pub mod auth;
pub mod health;
pub mod home;
pub mod messages;
pub mod users;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use model::entities::user;
use sea_orm::{ConnectionTrait, DbErr};
use tracing::warn;

use crate::session::{Flash, Session};
use crate::views::{users::ProfileStats, PageContext};

/// Plain `302 Found` redirect.
pub(crate) fn found(location: impl Into<String>) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.into())]).into_response()
}

/// Flash "Access unauthorized." and send the client home.
pub(crate) async fn access_unauthorized(session: Session) -> Response {
    warn!("Unauthorized access attempt");
    session.flash(Flash::danger("Access unauthorized.")).await;
    (session, found("/")).into_response()
}

/// Consume pending flashes and resolve the logged-in user for rendering.
pub(crate) async fn page_context<C>(session: &Session, db: &C) -> Result<PageContext, DbErr>
where
    C: ConnectionTrait,
{
    let current_user = session.current_user(db).await?;
    let flashes = session.take_flashes().await;
    Ok(PageContext::new(current_user, flashes))
}

/// Counters for a profile header.
pub(crate) async fn profile_stats<C>(db: &C, target: &user::Model) -> Result<ProfileStats, DbErr>
where
    C: ConnectionTrait,
{
    Ok(ProfileStats {
        messages: target.messages(db).await?.len(),
        following: target.following(db).await?.len(),
        followers: target.followers(db).await?.len(),
        likes: target.liked_message_ids(db).await?.len(),
    })
}

/// Ids of the users `viewer` follows, empty for anonymous viewers.
pub(crate) async fn following_ids<C>(db: &C, viewer: Option<&user::Model>) -> Result<Vec<i32>, DbErr>
where
    C: ConnectionTrait,
{
    match viewer {
        Some(viewer) => Ok(viewer.following(db).await?.into_iter().map(|u| u.id).collect()),
        None => Ok(Vec::new()),
    }
}

/// Ids of the messages `viewer` liked, empty for anonymous viewers.
pub(crate) async fn liked_ids<C>(db: &C, viewer: Option<&user::Model>) -> Result<Vec<i32>, DbErr>
where
    C: ConnectionTrait,
{
    match viewer {
        Some(viewer) => viewer.liked_message_ids(db).await,
        None => Ok(Vec::new()),
    }
}
