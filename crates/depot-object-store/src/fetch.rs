// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Object download into the local cache.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use depot_vault::StorageCredentials;
use futures::stream::BoxStream;
use futures::StreamExt;
use object_store::path::Path as ObjectPath;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

use crate::connector::{StoreConnector, StoreTarget};
use crate::error::ObjectFetchError;

/// Downloads objects with per-request credentials.
#[derive(Clone)]
pub struct ObjectFetcher {
	connector: Arc<dyn StoreConnector>,
}

impl ObjectFetcher {
	pub fn new(connector: Arc<dyn StoreConnector>) -> Self {
		Self { connector }
	}

	/// Download `object_key` from `target` to `local_path`.
	///
	/// The object is streamed into a sibling temp file which is then renamed
	/// over `local_path`, so concurrent readers never observe a partial file.
	/// The parent directory of `local_path` must already exist.
	/// Returns the number of bytes written.
	#[instrument(skip_all, fields(bucket = %target.bucket, key = %object_key, path = %local_path.display()))]
	pub async fn fetch(
		&self,
		target: &StoreTarget<'_>,
		object_key: &str,
		credentials: &StorageCredentials,
		local_path: &Path,
	) -> Result<u64, ObjectFetchError> {
		// Used verbatim: `Path::from` percent-encodes `~`, `[`, `#` and non-ASCII.
		let location =
			ObjectPath::parse(object_key).map_err(|source| ObjectFetchError::InvalidKey {
				key: object_key.to_string(),
				source,
			})?;

		let store = self.connector.connect(target, credentials)?;
		let result = store.get(&location).await.map_err(|e| match e {
			object_store::Error::NotFound { .. } => ObjectFetchError::NotFound {
				bucket: target.bucket.to_string(),
				key: object_key.to_string(),
			},
			source => ObjectFetchError::Transfer {
				key: object_key.to_string(),
				source,
			},
		})?;

		let partial = partial_path(local_path);
		let mut file = tokio::fs::File::create(&partial)
			.await
			.map_err(|source| ObjectFetchError::Write {
				path: partial.clone(),
				source,
			})?;

		let written = match write_stream(result.into_stream(), &mut file, object_key, &partial).await
		{
			Ok(written) => written,
			Err(e) => {
				drop(file);
				discard(&partial).await;
				return Err(e);
			}
		};
		drop(file);

		if let Err(source) = tokio::fs::rename(&partial, local_path).await {
			discard(&partial).await;
			return Err(ObjectFetchError::Write {
				path: local_path.to_path_buf(),
				source,
			});
		}

		info!(bytes = written, "object downloaded");
		Ok(written)
	}
}

impl std::fmt::Debug for ObjectFetcher {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ObjectFetcher").finish_non_exhaustive()
	}
}

async fn write_stream(
	mut stream: BoxStream<'static, object_store::Result<bytes::Bytes>>,
	file: &mut tokio::fs::File,
	object_key: &str,
	partial: &Path,
) -> Result<u64, ObjectFetchError> {
	let write_err = |source| ObjectFetchError::Write {
		path: partial.to_path_buf(),
		source,
	};

	let mut written = 0u64;
	while let Some(chunk) = stream.next().await {
		let chunk = chunk.map_err(|source| ObjectFetchError::Transfer {
			key: object_key.to_string(),
			source,
		})?;
		file.write_all(&chunk).await.map_err(write_err)?;
		written += chunk.len() as u64;
	}
	file.flush().await.map_err(write_err)?;
	file.sync_all().await.map_err(write_err)?;

	debug!(bytes = written, "object streamed to temp file");
	Ok(written)
}

/// `dir/name` -> `dir/.name.<uuid>.part`
fn partial_path(local_path: &Path) -> PathBuf {
	let mut name = OsString::from(".");
	name.push(local_path.file_name().unwrap_or_default());
	name.push(format!(".{}.part", uuid::Uuid::new_v4()));
	local_path.with_file_name(name)
}

async fn discard(partial: &Path) {
	if let Err(e) = tokio::fs::remove_file(partial).await {
		if e.kind() != std::io::ErrorKind::NotFound {
			warn!(path = %partial.display(), error = %e, "failed to remove partial download");
		}
	}
}
