use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
    Form,
};
use model::entities::message;
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, Set, TransactionTrait};
use tracing::{debug, error, info, instrument, trace, warn};
use validator::Validate;

use super::{access_unauthorized, found, page_context};
use crate::error::{AppError, AppResult};
use crate::schemas::{error_messages, AppState, MessageForm};
use crate::session::Session;
use crate::views;

/// Render the new message form
#[instrument(skip(state, session))]
pub async fn new_message_form(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    let ctx = page_context(&session, &state.db).await?;
    if ctx.current_user.is_none() {
        return Ok(access_unauthorized(session).await);
    }

    let html = views::messages::new_message_page(&ctx, "", &[]);
    Ok((session, Html(html)).into_response())
}

/// Post a message as the logged-in user.
///
/// The author is always the session user; any `user_id` in the submitted
/// form is ignored.
#[instrument(skip(state, session, form))]
pub async fn create_message(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<MessageForm>,
) -> AppResult<Response> {
    trace!("Entering create_message function");
    let Some(user) = session.current_user(&state.db).await? else {
        return Ok(access_unauthorized(session).await);
    };

    if let Err(errors) = form.validate() {
        debug!("Message form rejected for user {}: {}", user.id, errors);
        let ctx = page_context(&session, &state.db).await?;
        let html = views::messages::new_message_page(&ctx, &form.text, &error_messages(&errors));
        return Ok((session, Html(html)).into_response());
    }

    let txn = state.db.begin().await?;
    let created = message::ActiveModel {
        text: Set(form.text),
        user_id: Set(user.id),
        ..Default::default()
    }
    .insert(&txn)
    .await;

    match created {
        Ok(msg) => {
            txn.commit().await?;
            info!("Message created successfully with ID: {} by user {}", msg.id, user.id);
            Ok((session, found(format!("/users/{}", user.id))).into_response())
        }
        Err(db_error) => {
            error!("Failed to create message for user {}: {}", user.id, db_error);
            txn.rollback().await?;
            Err(db_error.into())
        }
    }
}

/// Show one message with its author
#[instrument(skip(state, session))]
pub async fn show_message(
    State(state): State<AppState>,
    session: Session,
    Path(message_id): Path<i32>,
) -> AppResult<Response> {
    let (msg, author) = message::Entity::find_with_author(&state.db, message_id)
        .await?
        .ok_or(AppError::NotFound("Message"))?;

    let ctx = page_context(&session, &state.db).await?;
    let html = views::messages::show_message_page(&ctx, &msg, &author);
    Ok((session, Html(html)).into_response())
}

/// Delete a message owned by the logged-in user
#[instrument(skip(state, session))]
pub async fn delete_message(
    State(state): State<AppState>,
    session: Session,
    Path(message_id): Path<i32>,
) -> AppResult<Response> {
    trace!("Entering delete_message function");
    let Some(user) = session.current_user(&state.db).await? else {
        return Ok(access_unauthorized(session).await);
    };

    let txn = state.db.begin().await?;
    let Some(msg) = message::Entity::find_by_id(message_id).one(&txn).await? else {
        txn.rollback().await?;
        return Err(AppError::NotFound("Message"));
    };

    if msg.user_id != user.id {
        warn!("User {} tried to delete message {} of user {}", user.id, msg.id, msg.user_id);
        txn.rollback().await?;
        return Ok(access_unauthorized(session).await);
    }

    msg.delete(&txn).await?;
    txn.commit().await?;
    info!("Message {} deleted by user {}", message_id, user.id);
    Ok((session, found(format!("/users/{}", user.id))).into_response())
}
