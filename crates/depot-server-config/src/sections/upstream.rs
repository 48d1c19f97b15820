// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Limits applied to calls made to the trust authority and object store.

use serde::Deserialize;
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
	/// Deadline for one full resolution, and for each outbound HTTP call.
	pub request_timeout_secs: u64,
}

impl UpstreamConfig {
	pub fn request_timeout(&self) -> Duration {
		Duration::from_secs(self.request_timeout_secs)
	}
}

impl Default for UpstreamConfig {
	fn default() -> Self {
		UpstreamConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamConfigLayer {
	#[serde(default)]
	pub request_timeout_secs: Option<u64>,
}

impl UpstreamConfigLayer {
	pub fn merge(&mut self, other: UpstreamConfigLayer) {
		if other.request_timeout_secs.is_some() {
			self.request_timeout_secs = other.request_timeout_secs;
		}
	}

	pub fn finalize(self) -> UpstreamConfig {
		UpstreamConfig {
			request_timeout_secs: self
				.request_timeout_secs
				.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
		}
	}
}
