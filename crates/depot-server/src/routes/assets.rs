// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Data asset HTTP handler.

use axum::{
	extract::{Path, Request, State},
	response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::api::AppState;

/// GET /{key} - Retrieve a data asset and stream the cached file.
///
/// Content type is guessed from the file extension. Range and
/// conditional requests are handled by `ServeFile`.
pub async fn get_asset(
	State(state): State<AppState>,
	Path(key): Path<String>,
	request: Request,
) -> Response {
	let asset = match state.resolver.resolve(&key).await {
		Ok(asset) => asset,
		Err(e) => return e.into_response(),
	};

	match ServeFile::new(asset.path()).oneshot(request).await {
		Ok(response) => response.into_response(),
		Err(infallible) => match infallible {},
	}
}
