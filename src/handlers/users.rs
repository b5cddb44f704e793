use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
    Form,
};
use model::entities::{message, user};
use model::error::{Conflict, ModelError};
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, Set, TransactionTrait};
use tracing::{debug, error, info, instrument, trace, warn};
use validator::Validate;

use super::{access_unauthorized, following_ids, found, liked_ids, page_context, profile_stats};
use crate::error::{AppError, AppResult};
use crate::schemas::{error_messages, AppState, ProfileForm, SearchQuery};
use crate::session::Session;
use crate::views::{self, users::ProfileFields};

async fn find_user(state: &AppState, user_id: i32) -> AppResult<user::Model> {
    user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or(AppError::NotFound("User"))
}

/// List users, optionally filtered by a username fragment
#[instrument(skip(state, session))]
pub async fn list_users(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> AppResult<Response> {
    let users = user::Entity::search(&state.db, query.q.as_deref()).await?;
    debug!("Found {} users", users.len());

    let ctx = page_context(&session, &state.db).await?;
    let following = following_ids(&state.db, ctx.current_user.as_ref()).await?;
    let html = views::users::index_page(&ctx, &users, &following);
    Ok((session, Html(html)).into_response())
}

/// Profile page with the user's messages
#[instrument(skip(state, session))]
pub async fn show_user(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
) -> AppResult<Response> {
    let target = find_user(&state, user_id).await?;
    let user_messages = target.messages(&state.db).await?;
    let stats = profile_stats(&state.db, &target).await?;

    let ctx = page_context(&session, &state.db).await?;
    let following = following_ids(&state.db, ctx.current_user.as_ref()).await?;
    let liked = liked_ids(&state.db, ctx.current_user.as_ref()).await?;

    let html = views::users::show_page(&ctx, &target, stats, &following, &user_messages, &liked);
    Ok((session, Html(html)).into_response())
}

/// Users the target follows
#[instrument(skip(state, session))]
pub async fn show_following(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
) -> AppResult<Response> {
    let ctx = page_context(&session, &state.db).await?;
    if ctx.current_user.is_none() {
        return Ok(access_unauthorized(session).await);
    }

    let target = find_user(&state, user_id).await?;
    let users = target.following(&state.db).await?;
    let stats = profile_stats(&state.db, &target).await?;
    let following = following_ids(&state.db, ctx.current_user.as_ref()).await?;

    let html = views::users::follow_list_page(&ctx, &target, stats, &following, &users);
    Ok((session, Html(html)).into_response())
}

/// Users following the target
#[instrument(skip(state, session))]
pub async fn show_followers(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
) -> AppResult<Response> {
    let ctx = page_context(&session, &state.db).await?;
    if ctx.current_user.is_none() {
        return Ok(access_unauthorized(session).await);
    }

    let target = find_user(&state, user_id).await?;
    let users = target.followers(&state.db).await?;
    let stats = profile_stats(&state.db, &target).await?;
    let following = following_ids(&state.db, ctx.current_user.as_ref()).await?;

    let html = views::users::follow_list_page(&ctx, &target, stats, &following, &users);
    Ok((session, Html(html)).into_response())
}

/// Messages the target liked
#[instrument(skip(state, session))]
pub async fn show_likes(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
) -> AppResult<Response> {
    let ctx = page_context(&session, &state.db).await?;
    if ctx.current_user.is_none() {
        return Ok(access_unauthorized(session).await);
    }

    let target = find_user(&state, user_id).await?;
    let liked_messages = target.likes(&state.db).await?;
    let stats = profile_stats(&state.db, &target).await?;
    let following = following_ids(&state.db, ctx.current_user.as_ref()).await?;
    let viewer_liked = liked_ids(&state.db, ctx.current_user.as_ref()).await?;

    let html = views::users::likes_page(&ctx, &target, stats, &following, &liked_messages, &viewer_liked);
    Ok((session, Html(html)).into_response())
}

/// Follow another user
#[instrument(skip(state, session))]
pub async fn follow_user(
    State(state): State<AppState>,
    session: Session,
    Path(followee_id): Path<i32>,
) -> AppResult<Response> {
    trace!("Entering follow_user function");
    let Some(current) = session.current_user(&state.db).await? else {
        return Ok(access_unauthorized(session).await);
    };

    let txn = state.db.begin().await?;
    let Some(followee) = user::Entity::find_by_id(followee_id).one(&txn).await? else {
        txn.rollback().await?;
        return Err(AppError::NotFound("User"));
    };
    current.follow(&txn, &followee).await?;
    txn.commit().await?;

    info!("User {} now follows user {}", current.id, followee.id);
    Ok((session, found(format!("/users/{}/following", current.id))).into_response())
}

/// Stop following another user
#[instrument(skip(state, session))]
pub async fn stop_following(
    State(state): State<AppState>,
    session: Session,
    Path(followee_id): Path<i32>,
) -> AppResult<Response> {
    trace!("Entering stop_following function");
    let Some(current) = session.current_user(&state.db).await? else {
        return Ok(access_unauthorized(session).await);
    };

    let txn = state.db.begin().await?;
    let Some(followee) = user::Entity::find_by_id(followee_id).one(&txn).await? else {
        txn.rollback().await?;
        return Err(AppError::NotFound("User"));
    };
    let removed = current.unfollow(&txn, &followee).await?;
    txn.commit().await?;

    if removed {
        info!("User {} stopped following user {}", current.id, followee.id);
    } else {
        debug!("User {} was not following user {}", current.id, followee.id);
    }
    Ok((session, found(format!("/users/{}/following", current.id))).into_response())
}

/// Like a message, or unlike it if already liked
#[instrument(skip(state, session))]
pub async fn toggle_like(
    State(state): State<AppState>,
    session: Session,
    Path(message_id): Path<i32>,
) -> AppResult<Response> {
    trace!("Entering toggle_like function");
    let Some(current) = session.current_user(&state.db).await? else {
        return Ok(access_unauthorized(session).await);
    };

    let txn = state.db.begin().await?;
    let Some(liked_message) = message::Entity::find_by_id(message_id).one(&txn).await? else {
        txn.rollback().await?;
        return Err(AppError::NotFound("Message"));
    };

    if liked_message.user_id == current.id {
        txn.rollback().await?;
        return Err(AppError::Forbidden("users cannot like their own messages"));
    }

    let liked = current.toggle_like(&txn, &liked_message).await?;
    txn.commit().await?;

    info!(
        "User {} {} message {}",
        current.id,
        if liked { "liked" } else { "unliked" },
        liked_message.id
    );
    Ok((session, found("/")).into_response())
}

/// Render the profile edit form for the logged-in user
#[instrument(skip(state, session))]
pub async fn edit_profile_form(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    let ctx = page_context(&session, &state.db).await?;
    let Some(current) = ctx.current_user.as_ref() else {
        return Ok(access_unauthorized(session).await);
    };

    let html = views::users::edit_profile_page(&ctx, &ProfileFields::from(current), &[]);
    Ok((session, Html(html)).into_response())
}

/// Update the logged-in user's profile after confirming their password
#[instrument(skip(state, session, form))]
pub async fn edit_profile(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> AppResult<Response> {
    trace!("Entering edit_profile function");
    let Some(current) = session.current_user(&state.db).await? else {
        return Ok(access_unauthorized(session).await);
    };
    let form = form.normalize();

    let errors = match form.validate() {
        Err(errors) => error_messages(&errors),
        Ok(()) => match user::Entity::authenticate(&state.db, &current.username, &form.password).await? {
            None => vec!["Wrong password, please try again.".to_string()],
            Some(_) => match update_profile(&state, current.clone(), &form).await? {
                None => return Ok((session, found(format!("/users/{}", current.id))).into_response()),
                Some(notice) => vec![notice.to_string()],
            },
        },
    };

    warn!("Profile update for user {} rejected: {:?}", current.id, errors);
    let ctx = page_context(&session, &state.db).await?;
    let fields = ProfileFields {
        username: &form.username,
        email: &form.email,
        image_url: form.image_url.as_deref().unwrap_or(""),
        header_image_url: form.header_image_url.as_deref().unwrap_or(""),
        bio: form.bio.as_deref().unwrap_or(""),
        location: form.location.as_deref().unwrap_or(""),
    };
    let html = views::users::edit_profile_page(&ctx, &fields, &errors);
    Ok((session, Html(html)).into_response())
}

/// Write the profile changes. Returns the notice to show when the new
/// username or email is already taken.
async fn update_profile(
    state: &AppState,
    current: user::Model,
    form: &ProfileForm,
) -> AppResult<Option<&'static str>> {
    let user_id = current.id;
    let mut active: user::ActiveModel = current.into();
    active.username = Set(form.username.clone());
    active.email = Set(form.email.clone());
    active.image_url = Set(form
        .image_url
        .clone()
        .unwrap_or_else(|| user::DEFAULT_IMAGE_URL.to_string()));
    active.header_image_url = Set(form
        .header_image_url
        .clone()
        .unwrap_or_else(|| user::DEFAULT_HEADER_IMAGE_URL.to_string()));
    active.bio = Set(form.bio.clone());
    active.location = Set(form.location.clone());

    let txn = state.db.begin().await?;
    match active.update(&txn).await {
        Ok(updated) => {
            txn.commit().await?;
            info!("User {} updated their profile", updated.id);
            Ok(None)
        }
        Err(db_error) => {
            txn.rollback().await?;
            let err = ModelError::from(db_error);
            match err.conflict() {
                Some(Conflict::Username) => Ok(Some("Username already taken")),
                Some(Conflict::Email) => Ok(Some("Email already taken")),
                None => {
                    error!("Failed to update user {}: {}", user_id, err);
                    Err(err.into())
                }
            }
        }
    }
}

/// Delete the logged-in user together with everything they own
#[instrument(skip(state, session))]
pub async fn delete_user(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    trace!("Entering delete_user function");
    let Some(current) = session.current_user(&state.db).await? else {
        return Ok(access_unauthorized(session).await);
    };

    let user_id = current.id;
    let txn = state.db.begin().await?;
    current.delete(&txn).await?;
    txn.commit().await?;
    // Only a committed delete ends the session
    session.logout().await;

    info!("User {} deleted their account", user_id);
    Ok((session, found("/signup")).into_response())
}
