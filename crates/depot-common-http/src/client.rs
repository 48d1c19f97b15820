// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Outbound HTTP client with a consistent User-Agent header.

use reqwest::{redirect, Client, ClientBuilder};
use std::time::Duration;

/// Creates a client builder with the depot User-Agent.
///
/// Redirects are never followed: a redirect from the trust authority
/// would otherwise replay `X-Vault-Token` to whatever host it names.
pub fn builder() -> ClientBuilder {
	Client::builder()
		.user_agent(user_agent())
		.redirect(redirect::Policy::none())
}

/// Creates a client whose every request is bounded by `timeout`.
pub fn client_with_timeout(timeout: Duration) -> reqwest::Result<Client> {
	builder().timeout(timeout).build()
}

/// Returns the depot User-Agent string.
///
/// Format: `depot/{version}`
pub fn user_agent() -> String {
	format!("depot/{}", env!("CARGO_PKG_VERSION"))
}
