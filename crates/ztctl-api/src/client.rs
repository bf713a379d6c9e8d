//! Asynchronous ZeroTier Central client implementation.

use crate::models::{JsonMap, MemberInfo, MemberPost, NetworkInfo, NetworkPost};
use crate::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Method, Request, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;
use ztctl_core::client::{normalize_base_url, ClientConfig};
use ztctl_core::Error;

const USER_AGENT: &str = concat!("ztctl/", env!("CARGO_PKG_VERSION"));

/// Status and decoded body of one request/response round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange<R> {
    /// HTTP status returned by the service.
    pub status: StatusCode,
    /// Decoded body; only present for a 200 response that was decoded.
    pub data: Option<R>,
}

impl<R> Exchange<R> {
    /// True for a 200 response.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// Status line such as `404 Not Found`.
    #[must_use]
    pub fn status_line(&self) -> String {
        self.status.to_string()
    }

    /// Consume the exchange, returning the decoded body.
    pub fn into_data(self) -> Option<R> {
        self.data
    }
}

/// Resource calls offered by ZeroTier Central.
///
/// Every call is a single request. A non-200 status is not an error: it comes
/// back as an [`Exchange`] without data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ZeroTierApi: Send + Sync {
    /// `GET /network`
    async fn list_networks(&self) -> Result<Exchange<Vec<NetworkInfo>>>;

    /// `POST /network` with an empty object; the service allocates a network
    /// with default settings.
    async fn create_network(&self) -> Result<Exchange<JsonMap>>;

    /// `POST /network/{nid}`
    async fn update_network(&self, nid: &str, conf: &NetworkPost)
        -> Result<Exchange<NetworkInfo>>;

    /// `DELETE /network/{nid}`
    async fn delete_network(&self, nid: &str) -> Result<Exchange<()>>;

    /// `GET /network/{nid}/member`
    async fn list_members(&self, nid: &str) -> Result<Exchange<Vec<MemberInfo>>>;

    /// `POST /network/{nid}/member/{mid}`
    async fn update_member(
        &self,
        nid: &str,
        mid: &str,
        conf: &MemberPost,
    ) -> Result<Exchange<MemberInfo>>;

    /// `DELETE /network/{nid}/member/{mid}`
    async fn delete_member(&self, nid: &str, mid: &str) -> Result<Exchange<()>>;

    /// `GET /user/{uid}`
    async fn get_user(&self, uid: &str) -> Result<Exchange<JsonMap>>;
}

/// Builder for [`ZtClient`].
#[derive(Debug)]
pub struct ZtClientBuilder {
    base_url: String,
    token: SecretString,
    http_config: ClientConfig,
}

impl ZtClientBuilder {
    /// Create a new builder for the given base URL and API token.
    pub fn new(base_url: impl Into<String>, token: SecretString) -> Self {
        Self {
            base_url: base_url.into(),
            token,
            http_config: ClientConfig::new(),
        }
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Build the client instance.
    ///
    /// Strips one trailing slash from the base URL and replaces a zero timeout
    /// with the default before constructing the transport.
    pub fn build(self) -> Result<ZtClient> {
        let timeout = self.http_config.effective_timeout();
        let mut builder = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .connect_timeout(self.http_config.connect_timeout);

        if !self.http_config.enable_compression {
            builder = builder.no_gzip();
        }

        let http = builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

        Ok(ZtClient {
            http,
            base_url: normalize_base_url(&self.base_url).to_string(),
            token: self.token,
            timeout,
        })
    }
}

/// Asynchronous client for ZeroTier Central.
///
/// Immutable once built; share it by reference.
#[derive(Debug)]
pub struct ZtClient {
    http: Client,
    base_url: String,
    token: SecretString,
    timeout: Duration,
}

impl ZtClient {
    /// Construct with default settings.
    pub fn new(base_url: impl Into<String>, token: SecretString) -> Result<Self> {
        ZtClientBuilder::new(base_url, token).build()
    }

    /// Access the normalized base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Effective request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Assemble an authenticated request for `base_url + path`.
    ///
    /// GET, HEAD and OPTIONS never carry a body. For other methods a present
    /// `body` is encoded as JSON.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidEndpoint`] when the URL cannot be formed,
    /// [`Error::EncodingError`] when the body cannot be encoded.
    pub fn build_request<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Request>
    where
        B: Serialize + ?Sized,
    {
        let target = format!("{}{path}", self.base_url);
        let url = Url::parse(&target)
            .map_err(|err| Error::InvalidEndpoint(format!("`{target}`: {err}")))?;

        let mut auth = HeaderValue::from_str(&format!("token {}", self.token.expose_secret()))
            .map_err(|err| Error::InvalidRequest(format!("Invalid API token: {err}")))?;
        auth.set_sensitive(true);

        let mut request = self.http.request(method.clone(), url).header(AUTHORIZATION, auth);

        if !carries_no_body(&method) {
            if let Some(payload) = body {
                let encoded = serde_json::to_vec(payload)
                    .map_err(|err| Error::EncodingError(format!("`{path}`: {err}")))?;
                request = request
                    .header(CONTENT_TYPE, "application/json")
                    .body(encoded);
            }
        }

        request
            .build()
            .map_err(|err| Error::InvalidRequest(format!("`{path}`: {err}")))
    }

    /// Send one request and decode a 200 response body into `R`.
    ///
    /// A non-200 status returns an [`Exchange`] without data and leaves the
    /// body undecoded.
    ///
    /// # Errors
    ///
    /// Request construction errors, transport errors ([`Error::Timeout`],
    /// [`Error::ServiceUnavailable`], [`Error::HttpError`]) and
    /// [`Error::DecodeError`] for a 200 body that does not match `R`.
    pub async fn execute<B, R>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Exchange<R>>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let (status, payload) = self.dispatch(method, path, body).await?;
        let data = match payload {
            Some(bytes) => Some(decode_body(path, &bytes)?),
            None => None,
        };
        Ok(Exchange { status, data })
    }

    /// Send one request without decoding the response body.
    ///
    /// # Errors
    ///
    /// Request construction and transport errors.
    pub async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Exchange<()>>
    where
        B: Serialize + ?Sized,
    {
        let (status, _) = self.dispatch(method, path, body).await?;
        Ok(Exchange { status, data: None })
    }

    #[instrument(level = "debug", skip(self, body))]
    async fn dispatch<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(StatusCode, Option<Vec<u8>>)>
    where
        B: Serialize + ?Sized,
    {
        let request = self.build_request(method.clone(), path, body)?;

        info!(%method, path, "ZeroTier request");

        // The response owns the connection; it is released when dropped on
        // every return path below.
        let response = self.http.execute(request).await.map_err(|err| {
            warn!(%method, path, error = %err, "ZeroTier request failed");
            Error::from(err)
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(%method, path, %status, "ZeroTier returned non-OK status");
            return Ok((status, None));
        }

        let bytes = response.bytes().await.map_err(|err| {
            Error::HttpError(format!("Failed to read response body for `{path}`: {err}"))
        })?;
        debug!(%method, path, %status, len = bytes.len(), "ZeroTier response");

        Ok((status, Some(bytes.to_vec())))
    }
}

fn carries_no_body(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD || *method == Method::OPTIONS
}

fn decode_body<R>(path: &str, bytes: &[u8]) -> Result<R>
where
    R: DeserializeOwned,
{
    serde_json::from_slice(bytes)
        .map_err(|err| Error::DecodeError(format!("Failed to parse response for `{path}`: {err}")))
}

#[async_trait]
impl ZeroTierApi for ZtClient {
    async fn list_networks(&self) -> Result<Exchange<Vec<NetworkInfo>>> {
        self.execute::<(), _>(Method::GET, "/network", None).await
    }

    async fn create_network(&self) -> Result<Exchange<JsonMap>> {
        self.execute(Method::POST, "/network", Some(&JsonMap::new()))
            .await
    }

    async fn update_network(
        &self,
        nid: &str,
        conf: &NetworkPost,
    ) -> Result<Exchange<NetworkInfo>> {
        let path = format!("/network/{nid}");
        self.execute(Method::POST, &path, Some(conf)).await
    }

    async fn delete_network(&self, nid: &str) -> Result<Exchange<()>> {
        let path = format!("/network/{nid}");
        self.send::<()>(Method::DELETE, &path, None).await
    }

    async fn list_members(&self, nid: &str) -> Result<Exchange<Vec<MemberInfo>>> {
        let path = format!("/network/{nid}/member");
        self.execute::<(), _>(Method::GET, &path, None).await
    }

    async fn update_member(
        &self,
        nid: &str,
        mid: &str,
        conf: &MemberPost,
    ) -> Result<Exchange<MemberInfo>> {
        let path = format!("/network/{nid}/member/{mid}");
        self.execute(Method::POST, &path, Some(conf)).await
    }

    async fn delete_member(&self, nid: &str, mid: &str) -> Result<Exchange<()>> {
        let path = format!("/network/{nid}/member/{mid}");
        self.send::<()>(Method::DELETE, &path, None).await
    }

    async fn get_user(&self, uid: &str) -> Result<Exchange<JsonMap>> {
        let path = format!("/user/{uid}");
        self.execute::<(), _>(Method::GET, &path, None).await
    }
}
