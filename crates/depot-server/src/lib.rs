// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Depot data asset server.
//!
//! Resolves a data asset name from the catalog to an object in
//! S3-compatible storage, obtaining storage credentials from a trust
//! authority on every request, and serves the downloaded file over HTTP.

pub mod api;
pub mod error;
pub mod resolver;
pub mod routes;

pub use api::{create_router, AppState};
pub use depot_server_config::ServerConfig;
pub use error::ErrorResponse;
pub use resolver::{AssetResolver, LocalAsset, ResolveError};
