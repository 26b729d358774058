//! HTTP client for the trust-ledger REST API.

use std::sync::Arc;

use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use url::Url;

use crate::{
    body::ResponseBody,
    config::ClientConfig,
    cookies::{get_cookie, CSRF_COOKIE, CSRF_HEADER},
    errors::ApiError,
    request::RequestOptions,
    Error,
};

/// HTTP client for the trust-ledger REST API.
///
/// Every call is a single round trip: cookies from the client's jar are
/// always sent, non-`GET` calls echo the `csrftoken` cookie back as
/// `X-CSRFToken`, and failing responses are normalized into [`Error`].
/// There are no retries, no caching and no timeout; wrap calls in
/// `tokio::time::timeout` if one is needed.
pub struct Client {
    /// API root, e.g. `https://ledger.example.com/api`. Paths are appended verbatim.
    base_api_url: String,
    http: reqwest::Client,
    jar: Arc<Jar>,
}

impl Client {
    /// Creates a client configured from `TRUSTLEDGER_*` environment variables.
    pub fn new() -> Result<Self, Error> {
        Self::with_config(ClientConfig::from_env(), Arc::new(Jar::default()))
    }

    /// Creates a client with a custom base URL and an empty cookie jar. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::with_config(ClientConfig::new(base_url), Arc::new(Jar::default()))
    }

    /// Creates a client sharing an existing cookie jar.
    pub fn with_config(config: ClientConfig, jar: Arc<Jar>) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder().cookie_provider(Arc::clone(&jar));
        if let Some(ref agent) = config.user_agent {
            builder = builder.user_agent(agent.as_str());
        }
        let http = builder.build().map_err(|e| {
            tracing::error!("Failed to build HTTP client: {}", e);
            Error::Network(e)
        })?;
        Ok(Self {
            base_api_url: config.base_url,
            http,
            jar,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    /// The cookie jar requests are sent with.
    pub fn cookie_jar(&self) -> &Arc<Jar> {
        &self.jar
    }

    /// Stores a `Set-Cookie` style string in the jar, scoped to the API origin.
    pub fn add_cookie(&self, cookie: &str) -> Result<(), Error> {
        let url = self.get_url("/")?;
        self.jar.add_cookie_str(cookie, &url);
        Ok(())
    }

    fn get_url(&self, path: &str) -> Result<Url, Error> {
        Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::InvalidUrl(format!("{}{}: {}", self.base_api_url, path, e))
        })
    }

    fn build_headers(&self, url: &Url, options: &RequestOptions) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::InvalidHeader(format!("{}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::InvalidHeader(format!("{}: {}", name, e)))?;
            headers.insert(name, value);
        }

        if options.is_mutating() {
            if let Some(token) = get_cookie(self.jar.as_ref(), url, CSRF_COOKIE) {
                let value = HeaderValue::from_str(&token)
                    .map_err(|e| Error::InvalidHeader(format!("{}: {}", CSRF_HEADER, e)))?;
                headers.insert(HeaderName::from_static("x-csrftoken"), value);
            }
        }

        Ok(headers)
    }

    /// Performs one round trip to `path` relative to the API root.
    pub async fn request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<ResponseBody, Error> {
        let url = self.get_url(path)?;
        let headers = self.build_headers(&url, &options)?;
        tracing::debug!(
            "{} {} (csrf: {})",
            options.method,
            url,
            headers.contains_key("x-csrftoken")
        );

        let mut req = self.http.request(options.method.clone(), url).headers(headers);
        if options.sends_body() {
            if let Some(ref body) = options.body {
                let text = serde_json::to_string(body).map_err(Error::Serialize)?;
                req = req.body(text);
            }
        }

        let resp = req.send().await.map_err(|e| {
            tracing::error!("Failed to send {} {}: {}", options.method, path, e);
            Error::Network(e)
        })?;

        let status = resp.status();
        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(ResponseBody::is_json_content_type)
            .unwrap_or(false);

        if !is_json {
            if !status.is_success() {
                tracing::error!("Request failed with status {}", status);
                return Err(Error::HttpStatus {
                    status: status.as_u16(),
                });
            }
            let text = resp.text().await.map_err(|e| {
                tracing::error!("Failed to read response body: {}", e);
                Error::Network(e)
            })?;
            return Ok(ResponseBody::Text(text));
        }

        let bytes = resp.bytes().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::Network(e)
        })?;
        let value: serde_json::Value = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!("Failed to parse JSON body (status {}): {}", status, e);
            Error::Decode(e)
        })?;

        if !status.is_success() {
            let err = ApiError::from_body(status.as_u16(), value);
            tracing::warn!("Request failed with status {}: {}", status, err.message);
            return Err(Error::Api(err));
        }

        Ok(ResponseBody::Json(value))
    }

    /// `GET path`.
    pub async fn get(&self, path: &str) -> Result<ResponseBody, Error> {
        self.request(path, RequestOptions::new(Method::GET)).await
    }

    /// `POST path` with `body` as JSON.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ResponseBody, Error> {
        self.request(path, RequestOptions::new(Method::POST).with_body(body)?)
            .await
    }

    /// `PUT path` with `body` as JSON.
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ResponseBody, Error> {
        self.request(path, RequestOptions::new(Method::PUT).with_body(body)?)
            .await
    }

    /// `PATCH path` with `body` as JSON.
    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ResponseBody, Error> {
        self.request(path, RequestOptions::new(Method::PATCH).with_body(body)?)
            .await
    }

    /// `DELETE path`.
    pub async fn delete(&self, path: &str) -> Result<ResponseBody, Error> {
        self.request(path, RequestOptions::new(Method::DELETE)).await
    }
}
