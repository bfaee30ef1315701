use chrono::{DateTime, Utc};
use snapfeed_api::endpoints::users::User;

/// In-memory mirror of the session, kept alongside durable storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub is_authenticated: bool,
    pub refreshed_at: Option<DateTime<Utc>>,
}
