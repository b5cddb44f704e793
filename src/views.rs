//! Server-side HTML rendering.
//!
//! Views are plain functions from models to markup. Every piece of user
//! supplied text goes through [`escape`] before it is interpolated.

pub mod auth;
pub mod errors;
pub mod home;
pub mod layout;
pub mod messages;
pub mod users;

use model::entities::user;

use crate::session::Flash;

/// What every page needs besides its own content.
#[derive(Debug, Default)]
pub struct PageContext {
    pub current_user: Option<user::Model>,
    pub flashes: Vec<Flash>,
}

impl PageContext {
    pub fn new(current_user: Option<user::Model>, flashes: Vec<Flash>) -> Self {
        Self { current_user, flashes }
    }

    pub fn current_user_id(&self) -> Option<i32> {
        self.current_user.as_ref().map(|u| u.id)
    }
}

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render form validation errors as alert boxes.
pub(crate) fn form_errors(errors: &[String]) -> String {
    errors
        .iter()
        .map(|e| format!("<div class=\"alert alert-danger\">{}</div>\n", escape(e)))
        .collect()
}
