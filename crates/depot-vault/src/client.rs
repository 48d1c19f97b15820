// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Trust-authority client implementation.

use std::time::Duration;

use depot_common_secret::{Secret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::{AuthExchangeError, SecretFetchError};
use crate::identity::IdentityToken;

/// Header carrying the session token on secret reads.
pub const VAULT_TOKEN_HEADER: &str = "X-Vault-Token";

/// Longest upstream error body excerpt kept in an error message.
const ERROR_BODY_LIMIT: usize = 200;

/// Session token issued by a successful identity exchange.
///
/// Only [`VaultClient::exchange_identity`] can construct one.
#[derive(Debug)]
pub struct SessionToken(SecretString);

impl SessionToken {
	pub fn expose(&self) -> &str {
		self.0.expose()
	}
}

/// Raw secret response body, not yet interpreted.
#[derive(Debug)]
pub struct SecretPayload(Secret<Vec<u8>>);

impl SecretPayload {
	pub fn new(bytes: Vec<u8>) -> Self {
		Self(Secret::new(bytes))
	}

	pub fn as_bytes(&self) -> &[u8] {
		self.0.expose()
	}
}

#[derive(Serialize)]
struct LoginRequest<'a> {
	jwt: &'a str,
	role: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
	auth: Option<LoginAuth>,
}

#[derive(Deserialize)]
struct LoginAuth {
	client_token: Option<String>,
}

/// One-shot client for the trust authority.
///
/// Holds no tokens: every call takes the credential it needs and returns
/// the next one, so a single instance can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct VaultClient {
	http: reqwest::Client,
}

impl VaultClient {
	/// Create a client whose calls are each bounded by `timeout`.
	pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
		Ok(Self::with_http_client(
			depot_common_http::client_with_timeout(timeout)?,
		))
	}

	pub fn with_http_client(http: reqwest::Client) -> Self {
		Self { http }
	}

	/// Exchange a workload identity token for a session token.
	///
	/// POSTs `{"jwt", "role"}` to `address + auth_path` and returns
	/// `auth.client_token` from the response. Single attempt, no retry.
	#[instrument(skip_all, fields(address = %address, auth_path = %auth_path, role = %role))]
	pub async fn exchange_identity(
		&self,
		address: &str,
		auth_path: &str,
		role: &str,
		identity: &IdentityToken,
	) -> Result<SessionToken, AuthExchangeError> {
		let url = join_url(address, auth_path);
		let request = LoginRequest {
			jwt: identity.expose(),
			role,
		};

		let response = self
			.http
			.post(&url)
			.json(&request)
			.send()
			.await
			.map_err(AuthExchangeError::Transport)?;

		let status = response.status();
		let body = response
			.bytes()
			.await
			.map_err(|e| AuthExchangeError::InvalidResponse(e.to_string()))?;

		if !status.is_success() {
			warn!(status = %status, "identity exchange rejected");
			return Err(AuthExchangeError::Status {
				status,
				body: sanitize_body_for_error(&String::from_utf8_lossy(&body), ERROR_BODY_LIMIT),
			});
		}

		let parsed: LoginResponse = serde_json::from_slice(&body)
			.map_err(|e| AuthExchangeError::InvalidResponse(e.to_string()))?;

		let token = parsed
			.auth
			.and_then(|auth| auth.client_token)
			.ok_or(AuthExchangeError::MissingToken)?;

		info!("obtained session token from trust authority");
		Ok(SessionToken(SecretString::new(token)))
	}

	/// Read the secret at `address + secret_path` using a session token.
	///
	/// The body is returned as-is; see [`crate::extract`] for parsing.
	#[instrument(skip_all, fields(address = %address, secret_path = %secret_path))]
	pub async fn fetch_secret(
		&self,
		address: &str,
		secret_path: &str,
		session: &SessionToken,
	) -> Result<SecretPayload, SecretFetchError> {
		let url = join_url(address, secret_path);

		let response = self
			.http
			.get(&url)
			.header(VAULT_TOKEN_HEADER, session.expose())
			.send()
			.await
			.map_err(SecretFetchError::Transport)?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			warn!(status = %status, "secret request rejected");
			return Err(SecretFetchError::Status {
				status,
				body: sanitize_body_for_error(&body, ERROR_BODY_LIMIT),
			});
		}

		let body = response.bytes().await.map_err(SecretFetchError::Body)?;
		debug!(bytes = body.len(), "read secret from trust authority");
		Ok(SecretPayload::new(body.to_vec()))
	}
}

/// Concatenate address and path, collapsing a doubled slash at the seam.
fn join_url(address: &str, path: &str) -> String {
	match (address.ends_with('/'), path.starts_with('/')) {
		(true, true) => format!("{}{}", address, &path[1..]),
		_ => format!("{address}{path}"),
	}
}

fn sanitize_body_for_error(body: &str, max_len: usize) -> String {
	let sanitized: String = body
		.chars()
		.filter(|c| !c.is_control() || *c == ' ')
		.take(max_len)
		.collect();
	if body.chars().count() > max_len {
		format!("{sanitized}...")
	} else {
		sanitized
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn join_url_concatenates() {
		assert_eq!(
			join_url("http://vault:8200", "/v1/auth/kubernetes/login"),
			"http://vault:8200/v1/auth/kubernetes/login"
		);
		assert_eq!(
			join_url("http://vault:8200/", "/v1/secret/data/x"),
			"http://vault:8200/v1/secret/data/x"
		);
	}

	#[test]
	fn sanitize_strips_control_chars_and_truncates() {
		assert_eq!(sanitize_body_for_error("a\nb\tc", 10), "abc");
		assert_eq!(sanitize_body_for_error("abcdef", 3), "abc...");
	}

	#[test]
	fn login_request_wire_shape() {
		let body = serde_json::to_value(LoginRequest {
			jwt: "tok123",
			role: "depot",
		})
		.unwrap();
		assert_eq!(body, serde_json::json!({"jwt": "tok123", "role": "depot"}));
	}

	#[test]
	fn session_token_debug_is_redacted() {
		let token = SessionToken(SecretString::new("sess456".to_string()));
		assert!(!format!("{token:?}").contains("sess456"));
	}
}
