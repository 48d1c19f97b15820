// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared fixtures: a mock trust authority, an in-memory bucket, and a
//! resolver wired to both.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use depot_object_store::{ObjectFetchError, ObjectFetcher, StoreConnector, StoreTarget};
use depot_server::AssetResolver;
use depot_server_config::AssetCatalog;
use depot_vault::{StorageCredentials, TokenFile, VaultClient, VAULT_TOKEN_HEADER};
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};
use serde_json::json;
use tempfile::{NamedTempFile, TempDir};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const AUTH_PATH: &str = "/v1/auth/kubernetes/login";
pub const SECRET_PATH: &str = "/v1/secret/data/reports";

/// In-memory bucket that only opens for the expected key pair.
pub struct Bucket {
	pub name: &'static str,
	pub store: Arc<InMemory>,
}

impl Bucket {
	pub fn new(name: &'static str) -> Arc<Self> {
		Arc::new(Self {
			name,
			store: Arc::new(InMemory::new()),
		})
	}

	pub async fn put(&self, key: &str, body: &[u8]) {
		self.store
			.put(&ObjectPath::parse(key).unwrap(), PutPayload::from(body.to_vec()))
			.await
			.unwrap();
	}
}

impl StoreConnector for Bucket {
	fn connect(
		&self,
		target: &StoreTarget<'_>,
		credentials: &StorageCredentials,
	) -> Result<Arc<dyn ObjectStore>, ObjectFetchError> {
		assert_eq!(target.bucket, self.name);
		assert_eq!(credentials.access_key(), "AK");
		assert_eq!(credentials.secret_key(), "SK");
		Ok(self.store.clone())
	}
}

/// Catalog with a single asset named `name`, authenticated against `vault`.
pub fn catalog(name: &str, object_key: &str, vault: &MockServer) -> AssetCatalog {
	let yaml = format!(
		r#"
data:
  - name: {name}
    capability: read
    format: csv
    connection:
      type: s3
      s3:
        bucket: b
        object_key: "{object_key}"
        endpoint_url: minio.storage.svc:9000
        vault_credentials:
          address: "{address}"
          authPath: {AUTH_PATH}
          role: depot
          secretPath: {SECRET_PATH}
"#,
		address = vault.uri(),
	);
	AssetCatalog::from_yaml_str(&yaml, "test.yaml").unwrap()
}

pub fn token_file(contents: &str) -> NamedTempFile {
	let file = NamedTempFile::new().unwrap();
	std::fs::write(file.path(), contents).unwrap();
	file
}

pub struct Fixture {
	pub vault: MockServer,
	pub bucket: Arc<Bucket>,
	pub token: NamedTempFile,
	pub cache: TempDir,
	pub resolver: AssetResolver,
}

impl Fixture {
	/// `reports` -> object `object_key` in bucket `b`, token `tok123`.
	pub async fn new(object_key: &str) -> Self {
		Self::with_deadline(object_key, Duration::from_secs(5)).await
	}

	pub async fn with_deadline(object_key: &str, deadline: Duration) -> Self {
		let vault = MockServer::start().await;
		let bucket = Bucket::new("b");
		let token = token_file("tok123\n");
		let cache = TempDir::new().unwrap();

		let resolver = AssetResolver::new(
			Arc::new(catalog("reports", object_key, &vault)),
			TokenFile::new(token.path()),
			VaultClient::new(Duration::from_secs(5)).unwrap(),
			ObjectFetcher::new(bucket.clone()),
			cache.path(),
			deadline,
		);

		Self {
			vault,
			bucket,
			token,
			cache,
			resolver,
		}
	}

	pub async fn mount_exchange(&self) {
		Mock::given(method("POST"))
			.and(path(AUTH_PATH))
			.and(body_json(json!({"jwt": "tok123", "role": "depot"})))
			.respond_with(
				ResponseTemplate::new(200).set_body_json(json!({"auth": {"client_token": "sess456"}})),
			)
			.expect(1)
			.mount(&self.vault)
			.await;
	}

	pub async fn mount_secret(&self) {
		Mock::given(method("GET"))
			.and(path(SECRET_PATH))
			.and(header(VAULT_TOKEN_HEADER, "sess456"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"data": {"access_key": "AK", "secret_key": "SK"}
			})))
			.expect(1)
			.mount(&self.vault)
			.await;
	}

	/// Fail the test if any trust-authority call is made.
	pub async fn forbid_vault_calls(&self) {
		Mock::given(wiremock::matchers::any())
			.respond_with(ResponseTemplate::new(500))
			.expect(0)
			.mount(&self.vault)
			.await;
	}
}
