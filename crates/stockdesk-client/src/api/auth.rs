//! Sign-in, sign-out and the signed-in profile.

use stockdesk_core::{AuthData, LoginRequest, PermissionSet, Profile};
use tracing::info;

use crate::client::ApiClient;
use crate::error::ClientResult;

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        AuthApi { client }
    }

    /// `POST /auth/login`; stores both cookies on success.
    pub async fn login(&self, credentials: &LoginRequest) -> ClientResult<AuthData> {
        let auth: AuthData = self.client.post("/auth/login", credentials).await?;
        self.client.session().store_tokens(&auth)?;
        info!(email = %credentials.email, "Logged in");
        Ok(auth)
    }

    /// Drops the local session. The backend keeps no logout endpoint.
    pub fn logout(&self) -> ClientResult<()> {
        self.client.session().clear_tokens()?;
        info!("Logged out");
        Ok(())
    }

    /// Renews the access token now.
    pub async fn refresh(&self) -> ClientResult<String> {
        self.client.refresh_session().await
    }

    /// `GET /auth/profile`.
    pub async fn profile(&self) -> ClientResult<Profile> {
        self.client.get("/auth/profile").await
    }

    /// Permission codes of the signed-in user.
    pub async fn permissions(&self) -> ClientResult<PermissionSet> {
        let profile = self.profile().await?;
        Ok(profile.permissions.into_iter().collect())
    }
}
