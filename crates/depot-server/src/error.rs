// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP mapping of resolution failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use depot_object_store::ObjectFetchError;
use serde::Serialize;

use crate::resolver::ResolveError;

/// JSON error body.
///
/// Not-found responses carry only `error`; every other failure also names
/// the failing step in `kind`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	pub error: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub kind: Option<&'static str>,
}

impl ResolveError {
	pub fn status_code(&self) -> StatusCode {
		match self {
			ResolveError::NotFound(_) => StatusCode::NOT_FOUND,
			ResolveError::Identity(_) => StatusCode::INTERNAL_SERVER_ERROR,
			ResolveError::ObjectFetch(ObjectFetchError::Write { .. }) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
			ResolveError::AuthExchange(_)
			| ResolveError::SecretFetch(_)
			| ResolveError::MalformedSecret(_)
			| ResolveError::ObjectFetch(_) => StatusCode::BAD_GATEWAY,
			ResolveError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
		}
	}
}

impl IntoResponse for ResolveError {
	fn into_response(self) -> Response {
		let status = self.status_code();
		let kind = match &self {
			ResolveError::NotFound(_) => None,
			_ => Some(self.kind()),
		};
		let body = ErrorResponse {
			error: self.to_string(),
			kind,
		};
		(status, Json(body)).into_response()
	}
}
