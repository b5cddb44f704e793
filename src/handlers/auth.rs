use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    Form,
};
use model::entities::user::{self, NewUser};
use model::error::Conflict;
use sea_orm::TransactionTrait;
use tracing::{debug, info, instrument, trace, warn};
use validator::Validate;

use super::{found, page_context};
use crate::error::AppResult;
use crate::schemas::{error_messages, AppState, LoginForm, SignupForm};
use crate::session::{Flash, Session};
use crate::views;

/// Render the signup form
#[instrument(skip(state, session))]
pub async fn signup_form(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    let ctx = page_context(&session, &state.db).await?;
    let html = views::auth::signup_page(&ctx, "", "", "", &[]);
    Ok((session, Html(html)).into_response())
}

/// Create a user and log them in.
///
/// Invalid input and taken usernames or emails re-render the form; the
/// insert runs in its own transaction, which is rolled back on conflict.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn signup(
    State(state): State<AppState>,
    mut session: Session,
    Form(form): Form<SignupForm>,
) -> AppResult<Response> {
    trace!("Entering signup function");
    let form = form.normalize();
    let image_url = form.image_url.clone().unwrap_or_default();

    if let Err(errors) = form.validate() {
        debug!("Signup form rejected: {}", errors);
        let ctx = page_context(&session, &state.db).await?;
        let html = views::auth::signup_page(&ctx, &form.username, &form.email, &image_url, &error_messages(&errors));
        return Ok((session, Html(html)).into_response());
    }

    let new_user = NewUser {
        username: Some(form.username.clone()),
        email: Some(form.email.clone()),
        password: form.password,
        image_url: form.image_url,
    };

    let txn = state.db.begin().await?;
    let notice = match user::Entity::signup(&txn, new_user).await {
        Ok(created) => {
            txn.commit().await?;
            info!("User {} signed up with ID: {}", created.username, created.id);
            session.login(created.id).await;
            return Ok((session, found("/")).into_response());
        }
        Err(err) => {
            txn.rollback().await?;
            match err.conflict() {
                Some(Conflict::Username) => "Username already taken",
                Some(Conflict::Email) => "Email already taken",
                None => return Err(err.into()),
            }
        }
    };

    warn!("Signup for {} rejected: {}", form.username, notice);
    let ctx = page_context(&session, &state.db).await?;
    let html = views::auth::signup_page(&ctx, &form.username, &form.email, &image_url, &[notice.to_string()]);
    Ok((session, Html(html)).into_response())
}

/// Render the login form
#[instrument(skip(state, session))]
pub async fn login_form(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    let ctx = page_context(&session, &state.db).await?;
    let html = views::auth::login_page(&ctx, "", &[]);
    Ok((session, Html(html)).into_response())
}

/// Verify credentials and start an authenticated session
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    mut session: Session,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    trace!("Entering login function");
    let username = form.username.trim().to_string();

    let errors = match form.validate() {
        Ok(()) => match user::Entity::authenticate(&state.db, &username, &form.password).await? {
            Some(user) => {
                info!("User {} logged in", user.username);
                session.login(user.id).await;
                session.flash(Flash::success(format!("Hello, {}!", user.username))).await;
                return Ok((session, found("/")).into_response());
            }
            None => vec!["Invalid credentials.".to_string()],
        },
        Err(errors) => error_messages(&errors),
    };

    warn!("Login failed for {}", username);
    let ctx = page_context(&session, &state.db).await?;
    let html = views::auth::login_page(&ctx, &username, &errors);
    Ok((session, Html(html)).into_response())
}

/// Forget the logged-in user
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    session.logout().await;
    session.flash(Flash::success("You have successfully logged out.")).await;
    (session, found("/login")).into_response()
}
