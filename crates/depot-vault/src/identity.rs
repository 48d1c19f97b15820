// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Workload identity token source.

use std::path::{Path, PathBuf};

use depot_common_secret::SecretString;
use tracing::debug;

use crate::error::IdentityTokenError;

/// A workload identity token, valid for the request that read it.
#[derive(Debug, Clone)]
pub struct IdentityToken(SecretString);

impl IdentityToken {
	pub fn new(token: impl Into<String>) -> Self {
		Self(SecretString::new(token.into()))
	}

	pub fn expose(&self) -> &str {
		self.0.expose()
	}
}

/// Reads the identity token from a file on every call.
///
/// The kubelet rotates projected tokens in place, so the file is never
/// cached.
#[derive(Debug, Clone)]
pub struct TokenFile {
	path: PathBuf,
}

impl TokenFile {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Read the current token, trimming surrounding whitespace.
	pub async fn read(&self) -> Result<IdentityToken, IdentityTokenError> {
		let raw = SecretString::new(tokio::fs::read_to_string(&self.path).await.map_err(
			|source| IdentityTokenError::Io {
				path: self.path.clone(),
				source,
			},
		)?);

		if raw.is_blank() {
			return Err(IdentityTokenError::Empty {
				path: self.path.clone(),
			});
		}

		debug!(path = %self.path.display(), "read identity token");
		Ok(IdentityToken::new(raw.expose().trim()))
	}
}
