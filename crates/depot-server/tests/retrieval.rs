// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end resolution through a mock trust authority and in-memory storage.

mod common;

use std::time::Duration;

use common::{Fixture, AUTH_PATH, SECRET_PATH};
use depot_object_store::ObjectFetchError;
use depot_server::ResolveError;
use depot_vault::{AuthExchangeError, IdentityTokenError, MalformedSecretError, SecretFetchError};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn reports_asset_is_downloaded_byte_for_byte() {
	let fixture = Fixture::new("k").await;
	fixture.mount_exchange().await;
	fixture.mount_secret().await;
	fixture.bucket.put("k", b"region,total\nemea,42\n").await;

	let asset = fixture.resolver.resolve("reports").await.unwrap();

	assert_eq!(asset.path(), fixture.cache.path().join("k"));
	assert_eq!(asset.size(), 21);
	assert_eq!(
		std::fs::read(asset.path()).unwrap(),
		b"region,total\nemea,42\n"
	);
}

#[tokio::test]
async fn every_request_runs_the_full_chain() {
	let fixture = Fixture::new("k").await;
	Mock::given(method("POST"))
		.and(path(AUTH_PATH))
		.respond_with(
			ResponseTemplate::new(200).set_body_json(json!({"auth": {"client_token": "sess456"}})),
		)
		.expect(2)
		.mount(&fixture.vault)
		.await;
	Mock::given(method("GET"))
		.and(path(SECRET_PATH))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"data": {"access_key": "AK", "secret_key": "SK"}
		})))
		.expect(2)
		.mount(&fixture.vault)
		.await;

	fixture.bucket.put("k", b"v1").await;
	fixture.resolver.resolve("reports").await.unwrap();

	fixture.bucket.put("k", b"v2").await;
	let asset = fixture.resolver.resolve("reports").await.unwrap();
	assert_eq!(std::fs::read(asset.path()).unwrap(), b"v2");
}

#[tokio::test]
async fn identity_token_is_reread_per_request() {
	let fixture = Fixture::new("k").await;
	fixture.bucket.put("k", b"data").await;

	Mock::given(method("POST"))
		.and(path(AUTH_PATH))
		.and(wiremock::matchers::body_json(json!({"jwt": "rotated", "role": "depot"})))
		.respond_with(
			ResponseTemplate::new(200).set_body_json(json!({"auth": {"client_token": "sess456"}})),
		)
		.expect(1)
		.mount(&fixture.vault)
		.await;
	fixture.mount_secret().await;

	std::fs::write(fixture.token.path(), "rotated").unwrap();
	fixture.resolver.resolve("reports").await.unwrap();
}

#[tokio::test]
async fn nested_object_key_creates_cache_subdirectories() {
	let fixture = Fixture::new("reports/2025/q1.csv").await;
	fixture.mount_exchange().await;
	fixture.mount_secret().await;
	fixture.bucket.put("reports/2025/q1.csv", b"a,b\n").await;

	let asset = fixture.resolver.resolve("reports").await.unwrap();

	assert_eq!(
		asset.path(),
		fixture.cache.path().join("reports/2025/q1.csv")
	);
	assert_eq!(std::fs::read(asset.path()).unwrap(), b"a,b\n");
}

#[tokio::test]
async fn object_key_with_tilde_and_accents_resolves() {
	let fixture = Fixture::new("exports/données~2024.csv").await;
	fixture.mount_exchange().await;
	fixture.mount_secret().await;
	fixture.bucket.put("exports/données~2024.csv", b"x\n").await;

	let asset = fixture.resolver.resolve("reports").await.unwrap();

	assert_eq!(
		asset.path(),
		fixture.cache.path().join("exports/données~2024.csv")
	);
	assert_eq!(std::fs::read(asset.path()).unwrap(), b"x\n");
}

#[tokio::test]
async fn unknown_asset_makes_no_calls() {
	let fixture = Fixture::new("k").await;
	fixture.forbid_vault_calls().await;

	let err = fixture.resolver.resolve("unknown").await.unwrap_err();

	assert_eq!(err.to_string(), "Data asset: unknown not found");
	assert!(std::fs::read_dir(fixture.cache.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn missing_identity_token_stops_before_exchange() {
	let fixture = Fixture::new("k").await;
	fixture.forbid_vault_calls().await;
	std::fs::remove_file(fixture.token.path()).unwrap();

	let err = fixture.resolver.resolve("reports").await.unwrap_err();

	assert!(matches!(
		err,
		ResolveError::Identity(IdentityTokenError::Io { .. })
	));
}

#[tokio::test]
async fn rejected_exchange_halts_before_secret_read() {
	let fixture = Fixture::new("k").await;
	Mock::given(method("POST"))
		.and(path(AUTH_PATH))
		.respond_with(
			ResponseTemplate::new(403).set_body_json(json!({"errors": ["permission denied"]})),
		)
		.expect(1)
		.mount(&fixture.vault)
		.await;
	Mock::given(method("GET"))
		.and(path(SECRET_PATH))
		.respond_with(ResponseTemplate::new(200))
		.expect(0)
		.mount(&fixture.vault)
		.await;
	fixture.bucket.put("k", b"data").await;

	let err = fixture.resolver.resolve("reports").await.unwrap_err();

	assert!(matches!(
		err,
		ResolveError::AuthExchange(AuthExchangeError::Status { .. })
	));
	assert!(!fixture.cache.path().join("k").exists());
}

#[tokio::test]
async fn exchange_without_client_token_halts_chain() {
	let fixture = Fixture::new("k").await;
	Mock::given(method("POST"))
		.and(path(AUTH_PATH))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({"auth": null})))
		.mount(&fixture.vault)
		.await;
	Mock::given(method("GET"))
		.respond_with(ResponseTemplate::new(200))
		.expect(0)
		.mount(&fixture.vault)
		.await;

	let err = fixture.resolver.resolve("reports").await.unwrap_err();

	assert!(matches!(
		err,
		ResolveError::AuthExchange(AuthExchangeError::MissingToken)
	));
}

#[tokio::test]
async fn secret_read_failure_is_reported() {
	let fixture = Fixture::new("k").await;
	fixture.mount_exchange().await;
	Mock::given(method("GET"))
		.and(path(SECRET_PATH))
		.respond_with(ResponseTemplate::new(404).set_body_json(json!({"errors": []})))
		.mount(&fixture.vault)
		.await;

	let err = fixture.resolver.resolve("reports").await.unwrap_err();

	assert!(matches!(
		err,
		ResolveError::SecretFetch(SecretFetchError::Status { .. })
	));
}

#[tokio::test]
async fn secret_without_keys_is_malformed() {
	let fixture = Fixture::new("k").await;
	fixture.mount_exchange().await;
	Mock::given(method("GET"))
		.and(path(SECRET_PATH))
		.respond_with(
			ResponseTemplate::new(200).set_body_json(json!({"data": {"username": "reports"}})),
		)
		.mount(&fixture.vault)
		.await;
	fixture.bucket.put("k", b"data").await;

	let err = fixture.resolver.resolve("reports").await.unwrap_err();

	assert!(matches!(
		err,
		ResolveError::MalformedSecret(MalformedSecretError::MissingKey("access_key"))
	));
	assert!(!fixture.cache.path().join("k").exists());
}

#[tokio::test]
async fn missing_object_is_storage_error() {
	let fixture = Fixture::new("k").await;
	fixture.mount_exchange().await;
	fixture.mount_secret().await;

	let err = fixture.resolver.resolve("reports").await.unwrap_err();

	assert!(matches!(
		err,
		ResolveError::ObjectFetch(ObjectFetchError::NotFound { .. })
	));
	assert_eq!(err.kind(), "storage");
}

#[tokio::test]
async fn slow_trust_authority_hits_the_deadline() {
	let fixture = Fixture::with_deadline("k", Duration::from_millis(200)).await;
	Mock::given(method("POST"))
		.and(path(AUTH_PATH))
		.respond_with(
			ResponseTemplate::new(200)
				.set_body_json(json!({"auth": {"client_token": "sess456"}}))
				.set_delay(Duration::from_secs(2)),
		)
		.mount(&fixture.vault)
		.await;

	let err = fixture.resolver.resolve("reports").await.unwrap_err();

	assert!(matches!(err, ResolveError::Timeout { ref name, .. } if name == "reports"));
}
