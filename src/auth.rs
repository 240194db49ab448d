use std::path::PathBuf;

use log::{debug, info};
use rspotify::{AuthCodeSpotify, Config, Credentials, OAuth, Token, prelude::*, scopes};

use crate::clients::errors::{Error, Result};

/// Whether `token` has passed its expiry time.
pub fn token_is_expired(token: &Token) -> bool {
    token.is_expired()
}

/// Return `token` unchanged if still valid, otherwise a refreshed one obtained through `oauth`.
pub async fn refresh_token(oauth: &AuthCodeSpotify, token: Token) -> Result<Token> {
    if !token_is_expired(&token) {
        return Ok(token);
    }
    info!("Token expired, refreshing");
    *oauth
        .token
        .lock()
        .await
        .map_err(|_| Error::AuthError("token lock is poisoned".into()))? = Some(token);
    oauth.refresh_token().await?;
    stored_token(oauth).await
}

async fn stored_token(oauth: &AuthCodeSpotify) -> Result<Token> {
    let token = oauth
        .token
        .lock()
        .await
        .map_err(|_| Error::AuthError("token lock is poisoned".into()))?;
    (*token)
        .clone()
        .ok_or_else(|| Error::AuthError("no token available, authorize first".into()))
}

/// Obtains user access tokens through the authorization code flow.
pub struct Authorizer {
    pub oauth: AuthCodeSpotify,
}

impl Authorizer {
    pub fn new(oauth: AuthCodeSpotify) -> Self {
        Authorizer { oauth }
    }

    // Create an Authorizer from environment variables or raise a configuration error
    pub fn try_default() -> Result<Self> {
        let creds = Credentials::from_env().ok_or_else(|| {
            Error::ConfigurationError(
                "Missing Spotify credentials in environment variables. \
                 Set RSPOTIFY_CLIENT_ID and RSPOTIFY_CLIENT_SECRET."
                    .into(),
            )
        })?;
        let oauth = OAuth::from_env(scopes!(
            "user-library-read",
            "user-top-read",
            "user-follow-read",
            "playlist-modify-public"
        ))
        .ok_or_else(|| {
            Error::ConfigurationError(
                "Missing Spotify OAuth configuration in environment variables. \
                 Set RSPOTIFY_REDIRECT_URI."
                    .into(),
            )
        })?;

        let cache_path = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp")) // Fallback to /tmp if cache directory can't be determined
            .join(".spotifetch_token_cache");

        let oauth = AuthCodeSpotify::with_config(
            creds,
            oauth,
            Config {
                token_cached: true,
                cache_path,
                ..Default::default()
            },
        );

        Ok(Self { oauth })
    }

    // Authorize via CLI prompt and OAuth flow. Reuses a cached token when there is one.
    pub async fn authorize(&self) -> Result<()> {
        debug!("Starting Spotify authorization ...");
        let url = self.oauth.get_authorize_url(false)?;
        self.oauth.prompt_for_token(&url).await?;
        Ok(())
    }

    /// A currently valid access token, refreshed if it expired.
    pub async fn access_token(&self) -> Result<String> {
        let token = stored_token(&self.oauth).await?;
        let token = refresh_token(&self.oauth, token).await?;
        Ok(token.access_token)
    }
}
