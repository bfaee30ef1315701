mod error;
mod session;
mod settings;
mod token_storage;

pub use error::AuthError;
pub use session::{AuthState, Session};
pub use settings::Settings;
pub use token_storage::TokenStore;

use snapfeed_api::Client;
use std::sync::Arc;

/// Wire up token storage, the API client and the session from settings.
///
/// Stored tokens are picked up but not verified; call [`Session::restore`]
/// to load the profile.
pub fn connect(settings: &Settings) -> Result<Arc<Session>, AuthError> {
    settings.validate().map_err(AuthError::Configuration)?;

    let storage = Arc::new(TokenStore::open(&settings.token_path)?);
    let client = Arc::new(Client::new(settings.client_config(), storage)?);
    tracing::debug!(base_url = %client.config().base_url, "Client configured");

    Ok(Session::new(client))
}
