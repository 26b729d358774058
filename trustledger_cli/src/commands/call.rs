use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use serde_json::Value;
use trustledger_api::{Client, Method, RequestOptions};

use crate::output::{print_body, print_failure, OutputFormat};

#[derive(Args)]
pub struct PathArgs {
    /// Path relative to the API root, e.g. /v1/dashboard/
    pub path: String,
}

#[derive(Args)]
pub struct BodyArgs {
    /// Path relative to the API root
    pub path: String,

    /// JSON body, or @FILE to read it from a file
    #[arg(long)]
    pub data: Option<String>,
}

/// Per-call settings shared by every subcommand.
pub struct CallOptions {
    pub headers: Vec<String>,
    pub timeout: Option<u64>,
}

pub async fn run(
    method: Method,
    path: &str,
    data: Option<&str>,
    client: &Client,
    opts: &CallOptions,
    format: &OutputFormat,
) -> Result<()> {
    tracing::debug!("{} {}{}", method, client.base_url(), path);
    let mut request = RequestOptions::new(method);
    for raw in &opts.headers {
        let (name, value) = parse_header(raw)?;
        request = request.with_header(&name, &value);
    }
    if let Some(data) = data {
        request.body = Some(parse_body(data)?);
    }

    let call = client.request(path, request);
    let result = match opts.timeout {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), call)
            .await
            .map_err(|_| anyhow!("{} timed out after {}s", path, secs))?,
        None => call.await,
    };

    match result {
        Ok(body) => {
            print_body(&body, format)?;
            Ok(())
        }
        Err(err) => {
            print_failure(&err);
            Err(err.into())
        }
    }
}

/// Splits `Name: value` into its parts.
pub fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("header must look like NAME:VALUE, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        bail!("header name is empty in '{}'", raw);
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Checks that a `--cookie` argument has a `NAME=VALUE` pair up front.
pub fn validate_cookie(raw: &str) -> Result<()> {
    match raw.split(';').next().and_then(|pair| pair.split_once('=')) {
        Some((name, _)) if !name.trim().is_empty() => Ok(()),
        _ => bail!("cookie must look like NAME=VALUE, got '{}'", raw),
    }
}

/// Parses `--data`: inline JSON, or `@path` to a JSON file.
pub fn parse_body(data: &str) -> Result<Value> {
    let text = match data.strip_prefix('@') {
        Some(file) => {
            std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file))?
        }
        None => data.to_string(),
    };
    serde_json::from_str(&text).context("--data is not valid JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn header_split_on_first_colon() {
        assert_eq!(
            parse_header("Content-Type: text/csv").unwrap(),
            ("Content-Type".to_string(), "text/csv".to_string())
        );
        assert_eq!(
            parse_header("X-Trace:a:b").unwrap(),
            ("X-Trace".to_string(), "a:b".to_string())
        );
    }

    #[test]
    fn header_without_colon_rejected() {
        assert!(parse_header("Content-Type text/csv").is_err());
        assert!(parse_header(": value").is_err());
    }

    #[test]
    fn cookie_validation() {
        assert!(validate_cookie("sessionid=abc").is_ok());
        assert!(validate_cookie("sessionid=abc; Path=/").is_ok());
        assert!(validate_cookie("sessionid").is_err());
        assert!(validate_cookie("=abc").is_err());
    }

    #[test]
    fn inline_body_parsed() {
        assert_eq!(
            parse_body(r#"{"reason": "stale"}"#).unwrap(),
            json!({"reason": "stale"})
        );
    }

    #[test]
    fn invalid_body_rejected() {
        assert!(parse_body("{reason}").is_err());
    }

    #[test]
    fn body_read_from_file() {
        let path = std::env::temp_dir().join("trustledger_cli_body_test.json");
        std::fs::write(&path, r#"{"memo": "void"}"#).unwrap();
        let arg = format!("@{}", path.display());
        assert_eq!(parse_body(&arg).unwrap(), json!({"memo": "void"}));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_body_file_rejected() {
        assert!(parse_body("@/nonexistent/trustledger/body.json").is_err());
    }
}
