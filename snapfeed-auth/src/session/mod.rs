mod models;

pub use models::AuthState;

use crate::error::AuthError;
use chrono::Utc;
use futures::future::BoxFuture;
use futures::FutureExt;
use secrecy::SecretString;
use snapfeed_api::endpoints::users::User;
use snapfeed_api::endpoints::Message;
use snapfeed_api::store::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use snapfeed_api::{Client, HandlerError, Request, SessionHandler, TokenStorage};
use std::sync::{Arc, PoisonError, RwLock};

/// Owns the signed-in user and the auth flows.
///
/// Registers itself with the client as its session handler, so a 401 anywhere
/// in the app refreshes through [`Session::refresh_access_token`] and a failed
/// refresh ends up in [`Session::logout`].
pub struct Session {
    client: Arc<Client>,
    storage: Arc<dyn TokenStorage>,
    state: RwLock<AuthState>,
}

impl Session {
    pub fn new(client: Arc<Client>) -> Arc<Self> {
        let storage = client.storage().clone();
        let state = AuthState {
            access_token: storage.access_token(),
            refresh_token: storage.refresh_token(),
            ..AuthState::default()
        };

        let session = Arc::new(Self {
            client,
            storage,
            state: RwLock::new(state),
        });

        let handler: Arc<dyn SessionHandler> = session.clone();
        session
            .client
            .register_session_handler(Arc::downgrade(&handler));

        session
    }

    pub fn client(&self) -> &Arc<Client> {
        &self.client
    }

    pub fn state(&self) -> AuthState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state().user
    }

    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_authenticated
    }

    fn update_state<F>(&self, update_fn: F)
    where
        F: FnOnce(&mut AuthState),
    {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        update_fn(&mut *state);
    }

    /// Resume a stored session: attach the stored token and load the profile.
    /// Logs out if the profile cannot be fetched.
    pub async fn restore(&self) -> Result<Option<User>, AuthError> {
        let Some(token) = self.storage.access_token() else {
            return Ok(None);
        };
        self.client.set_token(Some(&token));

        match self.client.send(Request::users().me()).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, username = %user.username, "Session restored");
                self.update_state(|s| {
                    s.user = Some(user.clone());
                    s.is_authenticated = true;
                });
                Ok(Some(user))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch user profile");
                // A failed refresh during the fetch has already logged out.
                if self.storage.access_token().is_some() {
                    self.logout().await;
                }
                Err(e.into())
            }
        }
    }

    pub async fn login(&self, email: &str, password: SecretString) -> Result<User, AuthError> {
        let response = self
            .client
            .send(Request::auth().login(email, password))
            .await?;

        self.storage.save_session(&response.access, &response.refresh)?;
        self.client.set_token(Some(&response.access));

        tracing::info!(user_id = response.user.id, "Logged in");
        self.update_state(|s| {
            s.access_token = Some(response.access.clone());
            s.refresh_token = Some(response.refresh.clone());
            s.user = Some(response.user.clone());
            s.is_authenticated = true;
        });

        Ok(response.user)
    }

    /// Create an account. The backend then emails an OTP to confirm it.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: SecretString,
        confirm_password: SecretString,
    ) -> Result<Message, AuthError> {
        let request = Request::auth().register(username, email, password, confirm_password);
        let message = self.client.send(request).await?;
        tracing::info!(email, "Registration submitted");
        Ok(message)
    }

    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<Message, AuthError> {
        Ok(self.client.send(Request::auth().verify_otp(email, otp)).await?)
    }

    pub async fn resend_otp(&self, email: &str) -> Result<Message, AuthError> {
        Ok(self.client.send(Request::auth().resend_otp(email)).await?)
    }

    pub async fn forgot_password(&self, email: &str) -> Result<Message, AuthError> {
        Ok(self
            .client
            .send(Request::auth().forgot_password(email))
            .await?)
    }

    pub async fn verify_forgot_otp(&self, email: &str, otp: &str) -> Result<Message, AuthError> {
        Ok(self
            .client
            .send(Request::auth().verify_forgot_otp(email, otp))
            .await?)
    }

    pub async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        password: SecretString,
    ) -> Result<Message, AuthError> {
        Ok(self
            .client
            .send(Request::auth().reset_password(email, otp, password))
            .await?)
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Persists the new access token (and the refresh token, if the backend
    /// rotated it) and updates the client's default header. Failure leaves the
    /// session untouched; ending it is up to the caller.
    pub async fn refresh_access_token(&self) -> Result<String, AuthError> {
        let refresh = self
            .storage
            .refresh_token()
            .ok_or(AuthError::NotAuthenticated)?;

        let response = self
            .client
            .send_without_refresh(Request::auth().refresh(refresh))
            .await?;

        self.storage.set(ACCESS_TOKEN_KEY, &response.access)?;
        if let Some(rotated) = &response.refresh {
            self.storage.set(REFRESH_TOKEN_KEY, rotated)?;
        }
        self.client.set_token(Some(&response.access));

        self.update_state(|s| {
            s.access_token = Some(response.access.clone());
            if let Some(rotated) = &response.refresh {
                s.refresh_token = Some(rotated.clone());
            }
            s.refreshed_at = Some(Utc::now());
        });
        tracing::debug!(rotated = response.refresh.is_some(), "Access token refreshed");

        Ok(response.access)
    }

    /// Tell the backend to drop the refresh token, then clear everything
    /// locally. The local half always runs.
    pub async fn logout(&self) {
        if let Some(refresh) = self.storage.refresh_token() {
            if let Err(e) = self
                .client
                .send_without_refresh(Request::auth().logout(refresh))
                .await
            {
                tracing::warn!(error = %e, "Logout request failed");
            }
        }

        if let Err(e) = self.storage.clear() {
            tracing::error!(error = %e, "Failed to clear token storage");
        }
        self.client.set_token(None);
        self.update_state(|s| *s = AuthState::default());

        tracing::info!("Logged out");
    }
}

impl SessionHandler for Session {
    fn refresh_access_token(&self) -> BoxFuture<'_, Result<String, HandlerError>> {
        async move {
            Session::refresh_access_token(self)
                .await
                .map_err(HandlerError::from)
        }
        .boxed()
    }

    fn logout(&self) -> BoxFuture<'_, ()> {
        Session::logout(self).boxed()
    }
}
