// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for each step of the credential broker.
//!
//! None of these carry token or key material.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// The workload identity token could not be read.
#[derive(Debug, Error)]
pub enum IdentityTokenError {
	#[error("failed to read identity token at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("identity token at {path} is empty")]
	Empty { path: PathBuf },
}

/// The trust authority did not hand out a session token.
#[derive(Debug, Error)]
pub enum AuthExchangeError {
	#[error("identity exchange request failed: {0}")]
	Transport(#[source] reqwest::Error),

	#[error("identity exchange rejected with HTTP {status}: {body}")]
	Status { status: StatusCode, body: String },

	#[error("malformed identity exchange response: {0}")]
	InvalidResponse(String),

	#[error("identity exchange response has no auth.client_token")]
	MissingToken,
}

/// The secret could not be retrieved.
#[derive(Debug, Error)]
pub enum SecretFetchError {
	#[error("secret request failed: {0}")]
	Transport(#[source] reqwest::Error),

	#[error("secret request returned HTTP {status}: {body}")]
	Status { status: StatusCode, body: String },

	#[error("failed to read secret response body: {0}")]
	Body(#[source] reqwest::Error),
}

/// The secret payload does not hold a usable key pair.
#[derive(Debug, Error)]
pub enum MalformedSecretError {
	#[error("secret payload is not valid JSON: {0}")]
	InvalidJson(#[source] serde_json::Error),

	#[error("secret payload has no `data` mapping")]
	MissingData,

	#[error("secret payload is missing `data.{0}`")]
	MissingKey(&'static str),

	#[error("secret payload field `data.{0}` is not a string")]
	NotAString(&'static str),
}
