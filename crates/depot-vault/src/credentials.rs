// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Storage credential extraction from a secret payload.

use depot_common_secret::SecretString;
use serde_json::{Map, Value};
use tracing::debug;

use crate::client::SecretPayload;
use crate::error::MalformedSecretError;

const ACCESS_KEY: &str = "access_key";
const SECRET_KEY: &str = "secret_key";

/// Object-storage key pair for one request.
///
/// Only [`extract`] produces these; both halves are zeroized on drop.
#[derive(Debug, Clone)]
pub struct StorageCredentials {
	access_key: SecretString,
	secret_key: SecretString,
}

impl StorageCredentials {
	pub fn access_key(&self) -> &str {
		self.access_key.expose()
	}

	pub fn secret_key(&self) -> &str {
		self.secret_key.expose()
	}
}

/// Parse `data.access_key` / `data.secret_key` out of a secret payload.
///
/// KV version 2 secrets wrap the fields one level deeper
/// (`data.data.access_key`); that layout is accepted when the outer
/// `data` mapping holds neither key. Either both keys are present as
/// strings or the whole extraction fails.
pub fn extract(payload: &SecretPayload) -> Result<StorageCredentials, MalformedSecretError> {
	let document: Value =
		serde_json::from_slice(payload.as_bytes()).map_err(MalformedSecretError::InvalidJson)?;

	let data = document
		.get("data")
		.and_then(Value::as_object)
		.ok_or(MalformedSecretError::MissingData)?;

	let fields = credential_fields(data);

	let credentials = StorageCredentials {
		access_key: SecretString::new(string_field(fields, ACCESS_KEY)?),
		secret_key: SecretString::new(string_field(fields, SECRET_KEY)?),
	};

	debug!("extracted storage credentials from secret");
	Ok(credentials)
}

fn credential_fields(data: &Map<String, Value>) -> &Map<String, Value> {
	if data.contains_key(ACCESS_KEY) || data.contains_key(SECRET_KEY) {
		return data;
	}
	data.get("data").and_then(Value::as_object).unwrap_or(data)
}

fn string_field(
	fields: &Map<String, Value>,
	key: &'static str,
) -> Result<String, MalformedSecretError> {
	match fields.get(key) {
		None | Some(Value::Null) => Err(MalformedSecretError::MissingKey(key)),
		Some(Value::String(value)) => Ok(value.clone()),
		Some(_) => Err(MalformedSecretError::NotAString(key)),
	}
}
