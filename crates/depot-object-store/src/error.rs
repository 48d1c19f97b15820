// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use thiserror::Error;

/// Failure to build a storage client or to download an object.
#[derive(Debug, Error)]
pub enum ObjectFetchError {
	#[error("failed to build storage client for {endpoint}: {source}")]
	Connect {
		endpoint: String,
		#[source]
		source: object_store::Error,
	},

	#[error("invalid object key {key}: {source}")]
	InvalidKey {
		key: String,
		#[source]
		source: object_store::path::Error,
	},

	#[error("object {key} not found in bucket {bucket}")]
	NotFound { bucket: String, key: String },

	#[error("failed to download object {key}: {source}")]
	Transfer {
		key: String,
		#[source]
		source: object_store::Error,
	},

	#[error("failed to write {path}: {source}")]
	Write {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}
