// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Storage client construction.

use std::sync::Arc;
use std::time::Duration;

use depot_vault::StorageCredentials;
use object_store::aws::AmazonS3Builder;
use object_store::{ClientOptions, ObjectStore, RetryConfig};
use tracing::debug;

use crate::error::ObjectFetchError;

/// Region used for request signing when an asset does not name one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Endpoint and bucket an object is read from.
#[derive(Debug, Clone, Copy)]
pub struct StoreTarget<'a> {
	/// `host[:port]`, or a URL when a scheme is given.
	pub endpoint: &'a str,
	pub bucket: &'a str,
	pub region: Option<&'a str>,
}

/// Builds an authenticated store for one request.
pub trait StoreConnector: Send + Sync {
	fn connect(
		&self,
		target: &StoreTarget<'_>,
		credentials: &StorageCredentials,
	) -> Result<Arc<dyn ObjectStore>, ObjectFetchError>;
}

/// Connector for S3-compatible endpoints (MinIO, Ceph RGW, AWS S3).
///
/// Endpoints without a scheme are addressed over plain HTTP, and requests
/// use path-style bucket addressing. Each store makes a single attempt per
/// call: retries are disabled.
#[derive(Debug, Clone)]
pub struct S3Connector {
	timeout: Duration,
}

impl S3Connector {
	pub fn new(timeout: Duration) -> Self {
		Self { timeout }
	}
}

impl StoreConnector for S3Connector {
	fn connect(
		&self,
		target: &StoreTarget<'_>,
		credentials: &StorageCredentials,
	) -> Result<Arc<dyn ObjectStore>, ObjectFetchError> {
		let endpoint = endpoint_url(target.endpoint);
		let region = target.region.unwrap_or(DEFAULT_REGION);

		debug!(endpoint = %endpoint, bucket = %target.bucket, region = %region, "building S3 client");

		let store = AmazonS3Builder::new()
			.with_endpoint(&endpoint)
			.with_bucket_name(target.bucket)
			.with_region(region)
			.with_access_key_id(credentials.access_key())
			.with_secret_access_key(credentials.secret_key())
			.with_virtual_hosted_style_request(false)
			.with_retry(RetryConfig {
				max_retries: 0,
				..Default::default()
			})
			.with_client_options(ClientOptions::new().with_timeout(self.timeout))
			.with_allow_http(true)
			.build()
			.map_err(|source| ObjectFetchError::Connect {
				endpoint: endpoint.clone(),
				source,
			})?;

		Ok(Arc::new(store))
	}
}

/// Turn a catalog endpoint into a URL, defaulting to plain HTTP.
fn endpoint_url(endpoint: &str) -> String {
	let endpoint = endpoint.trim().trim_end_matches('/');
	if endpoint.contains("://") {
		endpoint.to_string()
	} else {
		format!("http://{endpoint}")
	}
}
