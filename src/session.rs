//! Cookie-identified, server-side sessions.
//!
//! The browser only ever holds an opaque random id in the `warbler_session`
//! cookie. Everything else, the logged-in user id and pending flash messages,
//! lives in an in-process [`moka`] cache that forgets idle sessions after the
//! configured time-to-live.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponseParts, ResponseParts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use model::entities::user;
use moka::future::Cache;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait};
use tracing::{debug, trace};
use uuid::Uuid;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "warbler_session";
/// Session key holding the id of the logged-in user.
pub const CURR_USER_KEY: &str = "curr_user";

/// Bootstrap alert category of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashCategory {
    Success,
    Danger,
}

impl FlashCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashCategory::Success => "success",
            FlashCategory::Danger => "danger",
        }
    }
}

/// A one-shot notice shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self { category: FlashCategory::Success, message: message.into() }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self { category: FlashCategory::Danger, message: message.into() }
    }
}

/// Everything stored server-side for one browser.
#[derive(Debug, Clone, Default)]
pub struct SessionData {
    /// Stored under [`CURR_USER_KEY`].
    pub user_id: Option<i32>,
    pub flashes: Vec<Flash>,
}

/// Shared store of all live sessions.
#[derive(Clone, Debug)]
pub struct SessionStore {
    cache: Cache<String, SessionData>,
}

impl SessionStore {
    pub fn new(time_to_idle: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(100_000)
            .time_to_idle(time_to_idle)
            .build();
        Self { cache }
    }

    async fn load(&self, id: &str) -> SessionData {
        self.cache.get(id).await.unwrap_or_default()
    }

    async fn store(&self, id: String, data: SessionData) {
        self.cache.insert(id, data).await;
    }

    fn contains(&self, id: &str) -> bool {
        self.cache.contains_key(id)
    }

    /// Register a new, empty session and return its id.
    async fn issue(&self) -> String {
        let id = Uuid::new_v4().to_string();
        self.store(id.clone(), SessionData::default()).await;
        id
    }
}

fn session_cookie(id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// The session of the current request.
///
/// Extracting it never fails: a request whose cookie does not name a session
/// this server issued gets a fresh id, which is sent back as a cookie once
/// the session is part of the response. Handlers that modify the session
/// must return it.
#[derive(Debug)]
pub struct Session {
    id: String,
    store: SessionStore,
    jar: CookieJar,
}

impl Session {
    async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut SessionData),
    {
        let mut data = self.store.load(&self.id).await;
        f(&mut data);
        self.store.store(self.id.clone(), data).await;
    }

    pub async fn user_id(&self) -> Option<i32> {
        self.store.load(&self.id).await.user_id
    }

    /// Mark `user_id` as logged in.
    ///
    /// The session moves to a new id; the old one stops being valid.
    pub async fn login(&mut self, user_id: i32) {
        let mut data = self.store.load(&self.id).await;
        data.user_id = Some(user_id);

        let new_id = Uuid::new_v4().to_string();
        self.store.store(new_id.clone(), data).await;
        self.store.cache.invalidate(&self.id).await;
        debug!("Session {} renewed as {}, {} = {}", self.id, new_id, CURR_USER_KEY, user_id);

        self.jar = self.jar.clone().add(session_cookie(new_id.clone()));
        self.id = new_id;
    }

    /// Forget the logged-in user. Pending flashes survive.
    pub async fn logout(&self) {
        debug!("Session {} cleared {}", self.id, CURR_USER_KEY);
        self.update(|data| data.user_id = None).await;
    }

    pub async fn flash(&self, flash: Flash) {
        trace!("Queueing flash for session {}: {:?}", self.id, flash);
        self.update(|data| data.flashes.push(flash)).await;
    }

    /// Remove and return all pending flashes.
    pub async fn take_flashes(&self) -> Vec<Flash> {
        let mut taken = Vec::new();
        self.update(|data| taken = std::mem::take(&mut data.flashes)).await;
        taken
    }

    /// The logged-in user, if the session has one and it still exists.
    pub async fn current_user<C>(&self, db: &C) -> Result<Option<user::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        match self.user_id().await {
            Some(id) => user::Entity::find_by_id(id).one(db).await,
            None => Ok(None),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    SessionStore: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let store = SessionStore::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        if let Some(cookie) = jar.get(SESSION_COOKIE) {
            if store.contains(cookie.value()) {
                let id = cookie.value().to_string();
                return Ok(Session { id, store, jar });
            }
            debug!("Ignoring unknown session id from client");
        }

        let id = store.issue().await;
        trace!("Starting new session {}", id);
        let jar = jar.add(session_cookie(id.clone()));
        Ok(Session { id, store, jar })
    }
}

impl IntoResponseParts for Session {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        self.jar.into_response_parts(res)
    }
}
