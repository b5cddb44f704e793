use axum::extract::FromRef;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::session::SessionStore;

/// Application state shared across handlers
#[derive(Clone, Debug, FromRef)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Server-side session records
    pub sessions: SessionStore,
    /// Maximum number of messages on the home feed
    pub feed_limit: u64,
}

/// Signup form. Every field defaults to empty so a partial submission
/// re-renders the form instead of being rejected by the extractor.
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct SignupForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required."))]
    pub username: String,
    #[serde(default)]
    #[validate(email(message = "Invalid email address."))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: String,
    #[serde(default)]
    #[validate(url(message = "Image URL must be a valid URL."))]
    pub image_url: Option<String>,
}

/// Login form.
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required."))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

/// New message form. Only the text is read; the author always comes from
/// the session.
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct MessageForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 140, message = "Messages are 1 to 140 characters."))]
    pub text: String,
}

/// Profile edit form, confirmed with the current password.
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct ProfileForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required."))]
    pub username: String,
    #[serde(default)]
    #[validate(email(message = "Invalid email address."))]
    pub email: String,
    #[serde(default)]
    #[validate(url(message = "Image URL must be a valid URL."))]
    pub image_url: Option<String>,
    #[serde(default)]
    #[validate(url(message = "Header image URL must be a valid URL."))]
    pub header_image_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub password: String,
}

/// Query string of the user search page.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Blank optional inputs arrive as empty strings; treat them as absent.
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

impl SignupForm {
    pub fn normalize(mut self) -> Self {
        self.username = self.username.trim().to_string();
        self.email = self.email.trim().to_string();
        self.image_url = blank_to_none(self.image_url);
        self
    }
}

impl ProfileForm {
    pub fn normalize(mut self) -> Self {
        self.username = self.username.trim().to_string();
        self.email = self.email.trim().to_string();
        self.image_url = blank_to_none(self.image_url);
        self.header_image_url = blank_to_none(self.header_image_url);
        self.bio = blank_to_none(self.bio);
        self.location = blank_to_none(self.location);
        self
    }
}

/// Flatten validation failures into the messages shown above a form, in
/// field order for stable output.
pub fn error_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("Invalid value for {}.", field),
            })
        })
        .collect()
}
