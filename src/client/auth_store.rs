//! Session state: token, current user and login lifecycle.

use super::api::{ApiClient, ClientError};
use crate::application::dto::request::UpdateProfileRequest;
use crate::application::dto::response::ProfileResponse;

#[derive(Debug, Clone, Default)]
pub struct AuthStore {
    pub token: Option<String>,
    pub user: Option<ProfileResponse>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

impl AuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some() && self.is_authenticated
    }

    /// Resume a session from a persisted token. A failed profile fetch
    /// leaves the session in place without user data.
    pub async fn restore(&mut self, client: &mut ApiClient, token: String) {
        client.set_token(Some(token.clone()));
        self.token = Some(token);
        self.is_authenticated = true;

        if let Err(e) = self.refresh_profile(client).await {
            tracing::warn!(error = %e, "Could not load profile on restore");
        }
    }

    /// Log in and load the profile. On failure the session is cleared and
    /// the error returned; an unverified account is reported through
    /// [`ClientError::is_email_not_verified`].
    pub async fn login(
        &mut self,
        client: &mut ApiClient,
        email: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        self.is_loading = true;
        let result = client.login(email, password).await;
        let outcome = match result {
            Ok(response) => {
                client.set_token(Some(response.token.clone()));
                self.token = Some(response.token);
                self.is_authenticated = true;

                if let Err(e) = self.refresh_profile(client).await {
                    tracing::warn!(error = %e, "Could not load profile after login");
                }
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Login failed");
                self.logout(client);
                Err(e)
            }
        };
        self.is_loading = false;
        outcome
    }

    pub fn logout(&mut self, client: &mut ApiClient) {
        self.token = None;
        self.user = None;
        self.is_authenticated = false;
        client.set_token(None);
    }

    /// Replace the cached user with the server's profile.
    pub async fn refresh_profile(&mut self, client: &ApiClient) -> Result<(), ClientError> {
        let profile = client.profile().await?;
        self.user = Some(profile);
        Ok(())
    }

    /// Merge edited fields into the cached user.
    pub fn merge_profile(&mut self, update: &UpdateProfileRequest) {
        let Some(user) = self.user.as_mut() else {
            return;
        };
        if let Some(name) = &update.name {
            user.name = name.clone();
        }
        if let Some(bio) = &update.bio {
            user.bio = Some(bio.clone());
        }
        if let Some(photo_url) = &update.photo_url {
            user.photo_url = Some(photo_url.clone());
        }
    }

    /// Save profile edits and cache the result.
    pub async fn update_profile(
        &mut self,
        client: &ApiClient,
        update: &UpdateProfileRequest,
    ) -> Result<(), ClientError> {
        let profile = client.update_profile(update).await?;
        self.user = Some(profile);
        Ok(())
    }

    /// Presence heartbeat; failures are only logged.
    pub async fn update_online_status(&self, client: &ApiClient) {
        if let Err(e) = client.update_online_status().await {
            tracing::warn!(error = %e, "Online status update failed");
        }
    }
}
