// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Object fetcher for data assets.
//!
//! [`ObjectFetcher`] authenticates to an S3-compatible endpoint with a
//! per-request key pair and streams one object into a local file. The
//! store is built through the [`StoreConnector`] seam so that any
//! [`object_store::ObjectStore`] can stand in for S3.

mod connector;
mod error;
mod fetch;

pub use connector::{S3Connector, StoreConnector, StoreTarget, DEFAULT_REGION};
pub use error::ObjectFetchError;
pub use fetch::ObjectFetcher;
