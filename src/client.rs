// src/client.rs

use crate::{config::AppConfig, error::*, models::*};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use log::debug;
use reqwest::{Response, StatusCode, header::AUTHORIZATION};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;
use std::path::Path;
use url::Url;

/// Imgur API client. Carries the application identity and, once a user has
/// authorized, the token pair; the Authorization header is derived from
/// whichever is present.
#[derive(Clone)]
pub struct ImgurClient {
    http: ClientWithMiddleware,
    api_base: Url,
    client_id: String,
    client_secret: String,
    access_token: Option<String>,
    refresh_token: Option<String>,
}

impl ImgurClient {
    /// Builds the HTTP stack. The client starts without any credentials;
    /// the authenticator applies them before the first API call goes out.
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let http = ClientBuilder::new(
            reqwest::Client::builder()
                .user_agent(config.user_agent.clone())
                .connect_timeout(config.connect_timeout)
                .timeout(config.timeout)
                .build()?,
        )
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();

        Ok(Self {
            http,
            api_base: config.api_base.clone(),
            client_id: String::new(),
            client_secret: String::new(),
            access_token: None,
            refresh_token: None,
        })
    }

    pub fn set_client_credentials(&mut self, id: impl Into<String>, secret: impl Into<String>) {
        self.client_id = id.into();
        self.client_secret = secret.into();
    }

    /// Switches the client to Bearer authorization for all later API calls.
    pub fn set_user_auth(
        &mut self,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) {
        self.access_token = Some(access_token.into());
        self.refresh_token = Some(refresh_token.into());
    }

    /// Page the user must visit to approve this application and read a PIN.
    pub fn auth_url(&self) -> AppResult<String> {
        let mut url = self.api_base.join("oauth2/authorize")?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "pin");
        Ok(url.into())
    }

    pub async fn exchange_pin(&self, pin: &str) -> AppResult<TokenSet> {
        let form = [
            ("client_id", self.client_id.clone()),
            ("client_secret", self.client_secret.clone()),
            ("grant_type", "pin".to_string()),
            ("pin", pin.to_string()),
        ];
        self.token_request(&form).await
    }

    /// Trades the stored refresh token for a fresh token pair.
    pub async fn refresh_access_token(&self) -> AppResult<TokenSet> {
        let refresh = self.refresh_token.clone().ok_or(AppError::AuthRejected)?;
        let form = [
            ("client_id", self.client_id.clone()),
            ("client_secret", self.client_secret.clone()),
            ("grant_type", "refresh_token".to_string()),
            ("refresh_token", refresh),
        ];
        self.token_request(&form).await
    }

    pub async fn create_album(
        &self,
        title: Option<&str>,
        description: Option<&str>,
    ) -> AppResult<AlbumHandle> {
        let mut form: Vec<(&str, String)> = Vec::new();
        if let Some(title) = title {
            form.push(("title", title.to_string()));
        }
        if let Some(description) = description {
            form.push(("description", description.to_string()));
        }
        self.post_api("3/album", &form).await
    }

    /// Asks the service to fetch and mirror a remote image.
    pub async fn upload_from_url(
        &self,
        image_url: &str,
        config: &UploadConfig,
    ) -> AppResult<UploadedImage> {
        let mut form = vec![
            ("image", image_url.to_string()),
            ("type", "URL".to_string()),
        ];
        Self::push_metadata(&mut form, config);
        self.post_api("3/image", &form).await
    }

    /// Uploads a local file, base64-encoded into the form body.
    pub async fn upload_from_path(
        &self,
        path: &Path,
        config: &UploadConfig,
    ) -> AppResult<UploadedImage> {
        let contents = std::fs::read(path)?;
        let mut form = vec![
            ("image", BASE64.encode(contents)),
            ("type", "base64".to_string()),
        ];
        Self::push_metadata(&mut form, config);
        self.post_api("3/image", &form).await
    }

    /// Cheap authenticated read. Doubles as the validity probe for client
    /// credentials, since it works without any user authorization.
    pub async fn credits(&self) -> AppResult<RateLimit> {
        self.get_api("3/credits").await
    }

    /// Probes whether the current access token is still accepted.
    pub async fn verify_user_auth(&self) -> AppResult<AccountSettings> {
        self.get_api("3/account/me/settings").await
    }

    fn push_metadata(form: &mut Vec<(&str, String)>, config: &UploadConfig) {
        if let Some(album) = &config.album {
            form.push(("album", album.clone()));
        }
        if let Some(title) = &config.title {
            form.push(("title", title.clone()));
        }
        if let Some(description) = &config.description {
            form.push(("description", description.clone()));
        }
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        let header_value = match &self.access_token {
            Some(token) => format!("Bearer {token}"),
            None => format!("Client-ID {}", self.client_id),
        };
        builder.header(AUTHORIZATION, header_value)
    }

    /// A 401/403 means whichever credential went out in the header was bad.
    fn rejection(&self) -> AppError {
        if self.access_token.is_some() {
            AppError::AuthRejected
        } else {
            AppError::ClientCredentialsRejected
        }
    }

    async fn get_api<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let url = self.api_base.join(path)?;
        debug!("GET {url}");
        let response = self.authed(self.http.get(url.clone())).send().await?;
        self.decode_api(url, response).await
    }

    async fn post_api<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, String)],
    ) -> AppResult<T> {
        let url = self.api_base.join(path)?;
        debug!("POST {url}");
        let response = self
            .authed(self.http.post(url.clone()))
            .form(form)
            .send()
            .await?;
        self.decode_api(url, response).await
    }

    /// The OAuth endpoints take no Authorization header and answer with a
    /// flat payload instead of the `{ data, success, status }` envelope.
    async fn token_request(&self, form: &[(&str, String)]) -> AppResult<TokenSet> {
        let url = self.api_base.join("oauth2/token")?;
        debug!("POST {url}");
        let response = self.http.post(url.clone()).form(form).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            // A bad PIN or a stale refresh token comes back as a client
            // error; anything else is unexpected.
            if status.is_client_error() {
                return Err(AppError::AuthRejected);
            }
            return Err(AppError::Api(format!("token endpoint returned HTTP {status}")));
        }
        serde_json::from_str(&body).map_err(|source| AppError::ApiParseFailed {
            url: url.to_string(),
            source,
        })
    }

    async fn decode_api<T: DeserializeOwned>(&self, url: Url, response: Response) -> AppResult<T> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(self.rejection());
        }
        let body = response.text().await?;
        let envelope: Envelope = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            // Error statuses can arrive with a non-JSON body, such as a
            // gateway's HTML page; report the status, not a parse failure.
            Err(_) if !status.is_success() => {
                return Err(AppError::Api(format!("unexpected HTTP status {status}")));
            }
            Err(source) => {
                return Err(AppError::ApiParseFailed {
                    url: url.to_string(),
                    source,
                });
            }
        };
        if !status.is_success() || !envelope.success {
            let message = envelope
                .error_message()
                .unwrap_or_else(|| format!("unexpected HTTP status {status}"));
            return Err(AppError::Api(message));
        }
        serde_json::from_value(envelope.data).map_err(|source| AppError::ApiParseFailed {
            url: url.to_string(),
            source,
        })
    }
}
