//! Request client for the trust-ledger REST API.
//!
//! One [`Client`] value is constructed with its API root and passed by
//! reference to every caller. Each verb call performs a single round trip and
//! returns either the decoded [`ResponseBody`] or a normalized [`Error`].

mod body;
mod client;
pub mod config;
pub mod cookies;
mod error_shape;
mod errors;
mod request;
pub use self::body::ResponseBody;
pub use self::client::Client;
pub use self::config::ClientConfig;
pub use self::error_shape::ErrorShape;
pub use self::errors::{ApiError, Error};
pub use self::request::RequestOptions;
pub use reqwest::cookie::Jar;
pub use reqwest::Method;
