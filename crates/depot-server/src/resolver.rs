// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Asset resolution: catalog lookup followed by the credential chain.
//!
//! For a known asset every request performs, strictly in order:
//!
//! 1. read the workload identity token
//! 2. exchange it with the trust authority for a session token
//! 3. read the asset's secret with the session token
//! 4. extract the storage key pair from the secret
//! 5. download the object into the cache directory
//!
//! The first failing step ends the request. Nothing from one request is
//! reused by another.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use depot_object_store::{ObjectFetchError, ObjectFetcher, S3Connector, StoreTarget};
use depot_server_config::{AssetCatalog, AssetDescriptor, ServerConfig};
use depot_vault::{
	extract, AuthExchangeError, IdentityTokenError, MalformedSecretError, SecretFetchError,
	TokenFile, VaultClient,
};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Why an asset could not be made available locally.
#[derive(Debug, Error)]
pub enum ResolveError {
	#[error("Data asset: {0} not found")]
	NotFound(String),

	#[error(transparent)]
	Identity(#[from] IdentityTokenError),

	#[error(transparent)]
	AuthExchange(#[from] AuthExchangeError),

	#[error(transparent)]
	SecretFetch(#[from] SecretFetchError),

	#[error(transparent)]
	MalformedSecret(#[from] MalformedSecretError),

	#[error(transparent)]
	ObjectFetch(#[from] ObjectFetchError),

	#[error("retrieval of data asset {name} did not finish within {}s", .deadline.as_secs())]
	Timeout { name: String, deadline: Duration },
}

impl ResolveError {
	/// Stable machine-readable name of the failing step.
	pub fn kind(&self) -> &'static str {
		match self {
			ResolveError::NotFound(_) => "not_found",
			ResolveError::Identity(_) => "identity",
			ResolveError::AuthExchange(_) => "auth_exchange",
			ResolveError::SecretFetch(_) => "secret_fetch",
			ResolveError::MalformedSecret(_) => "malformed_secret",
			ResolveError::ObjectFetch(_) => "storage",
			ResolveError::Timeout { .. } => "timeout",
		}
	}
}

/// A downloaded asset in the cache directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalAsset {
	path: PathBuf,
	size: u64,
}

impl LocalAsset {
	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn size(&self) -> u64 {
		self.size
	}
}

/// Resolves asset names against an immutable catalog.
///
/// Cheap to clone; clones share the catalog and HTTP connection pool.
#[derive(Debug, Clone)]
pub struct AssetResolver {
	catalog: Arc<AssetCatalog>,
	token_file: TokenFile,
	vault: VaultClient,
	fetcher: ObjectFetcher,
	cache_dir: PathBuf,
	deadline: Duration,
}

impl AssetResolver {
	pub fn new(
		catalog: Arc<AssetCatalog>,
		token_file: TokenFile,
		vault: VaultClient,
		fetcher: ObjectFetcher,
		cache_dir: impl Into<PathBuf>,
		deadline: Duration,
	) -> Self {
		Self {
			catalog,
			token_file,
			vault,
			fetcher,
			cache_dir: cache_dir.into(),
			deadline,
		}
	}

	/// Wire up the production chain: token file, HTTP trust authority, S3.
	pub fn from_config(
		config: &ServerConfig,
		catalog: AssetCatalog,
	) -> Result<Self, reqwest::Error> {
		let timeout = config.upstream.request_timeout();
		Ok(Self::new(
			Arc::new(catalog),
			TokenFile::new(&config.paths.identity_token_path),
			VaultClient::new(timeout)?,
			ObjectFetcher::new(Arc::new(S3Connector::new(timeout))),
			&config.paths.cache_dir,
			timeout,
		))
	}

	/// Cache location for an object key.
	pub fn local_path(&self, object_key: &str) -> PathBuf {
		self.cache_dir.join(object_key)
	}

	/// Make the named asset available locally.
	///
	/// Unknown names fail with [`ResolveError::NotFound`] before any I/O.
	#[instrument(skip(self))]
	pub async fn resolve(&self, name: &str) -> Result<LocalAsset, ResolveError> {
		let Some(asset) = self.catalog.get(name) else {
			info!("data asset not in catalog");
			return Err(ResolveError::NotFound(name.to_string()));
		};

		let result = match tokio::time::timeout(self.deadline, self.retrieve(asset)).await {
			Ok(result) => result,
			Err(_) => Err(ResolveError::Timeout {
				name: name.to_string(),
				deadline: self.deadline,
			}),
		};

		match &result {
			Ok(local) => info!(
				path = %local.path.display(),
				bytes = local.size,
				"data asset retrieved"
			),
			Err(e) => warn!(kind = e.kind(), error = %e, "data asset retrieval failed"),
		}

		result
	}

	async fn retrieve(&self, asset: &AssetDescriptor) -> Result<LocalAsset, ResolveError> {
		let authority = asset.trust_authority();
		let storage = asset.storage();

		let identity = self.token_file.read().await?;
		let session = self
			.vault
			.exchange_identity(
				&authority.address,
				&authority.auth_path,
				&authority.role,
				&identity,
			)
			.await?;
		let payload = self
			.vault
			.fetch_secret(&authority.address, &authority.secret_path, &session)
			.await?;
		let credentials = extract(&payload)?;

		let path = self.local_path(&storage.object_key);
		ensure_parent(&path).await?;

		let target = StoreTarget {
			endpoint: &storage.endpoint_url,
			bucket: &storage.bucket,
			region: storage.region.as_deref(),
		};
		let size = self
			.fetcher
			.fetch(&target, &storage.object_key, &credentials, &path)
			.await?;

		Ok(LocalAsset { path, size })
	}
}

/// Nested object keys map to nested cache paths.
async fn ensure_parent(path: &Path) -> Result<(), ObjectFetchError> {
	let Some(parent) = path.parent() else {
		return Ok(());
	};
	debug!(dir = %parent.display(), "ensuring cache directory");
	tokio::fs::create_dir_all(parent)
		.await
		.map_err(|source| ObjectFetchError::Write {
			path: parent.to_path_buf(),
			source,
		})
}
