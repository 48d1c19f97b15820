// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Router and shared handler state.

use axum::{routing::get, Router};

use crate::resolver::AssetResolver;
use crate::routes;

#[derive(Clone)]
pub struct AppState {
	pub resolver: AssetResolver,
}

impl AppState {
	pub fn new(resolver: AssetResolver) -> Self {
		Self { resolver }
	}
}

/// Build the application router. Tracing and other layers are added by
/// the binary.
pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/{key}", get(routes::assets::get_asset))
		.with_state(state)
}
