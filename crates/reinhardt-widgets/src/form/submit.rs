//! Default JSON submission over HTTP.

use reqwest::{Method, Url};
use serde_json::Value;
use thiserror::Error;

use super::state::FieldValues;

/// Why a submission failed. Emitted as `form:submitError`, never returned.
#[derive(Debug, Error)]
pub enum SubmitError {
	/// The `on_submit` hook returned an error.
	#[error("{0}")]
	Callback(String),

	/// The submit URL is neither absolute nor resolvable against the base URL.
	#[error("invalid submit URL `{0}`")]
	InvalidUrl(String),

	/// The form's method is not a valid HTTP method.
	#[error("invalid submit method `{0}`")]
	InvalidMethod(String),

	/// The request could not be sent.
	#[error("submit request failed: {0}")]
	Transport(#[source] reqwest::Error),

	/// The server answered with a non-2xx status.
	#[error("Submit failed: {0}")]
	Status(u16),

	/// The response body is not JSON.
	#[error("submit response is not JSON: {0}")]
	Decode(#[source] reqwest::Error),
}

/// Resolves `raw` against `base` unless it is already absolute.
pub(crate) fn resolve_url(raw: &str, base: Option<&str>) -> Result<Url, SubmitError> {
	if let Ok(url) = Url::parse(raw) {
		return Ok(url);
	}
	base.and_then(|base| Url::parse(base).ok())
		.and_then(|base| base.join(raw).ok())
		.ok_or_else(|| SubmitError::InvalidUrl(raw.to_string()))
}

/// Sends `values` as a JSON body and returns the decoded JSON response.
pub(crate) async fn submit_json(
	url: Url,
	method: &str,
	values: &FieldValues,
) -> Result<Value, SubmitError> {
	let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
		.map_err(|_| SubmitError::InvalidMethod(method.to_string()))?;
	let response = reqwest::Client::new()
		.request(method, url)
		.json(values)
		.send()
		.await
		.map_err(SubmitError::Transport)?;
	let status = response.status();
	if !status.is_success() {
		return Err(SubmitError::Status(status.as_u16()));
	}
	response.json().await.map_err(SubmitError::Decode)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("https://api.example.com/save", None, "https://api.example.com/save")]
	#[case("/save", Some("https://example.com/app/"), "https://example.com/save")]
	#[case("save", Some("https://example.com/app/"), "https://example.com/app/save")]
	fn test_resolve_url(#[case] raw: &str, #[case] base: Option<&str>, #[case] expected: &str) {
		assert_eq!(resolve_url(raw, base).unwrap().as_str(), expected);
	}

	#[rstest]
	fn test_relative_url_without_base_is_invalid() {
		assert!(matches!(
			resolve_url("/save", None),
			Err(SubmitError::InvalidUrl(url)) if url == "/save"
		));
	}

	#[rstest]
	fn test_status_message() {
		assert_eq!(SubmitError::Status(500).to_string(), "Submit failed: 500");
	}
}
