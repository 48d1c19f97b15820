// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for depot.
//!
//! Every outbound call to a trust authority goes through a client built
//! here, so the User-Agent, timeout and redirect policy stay consistent.

mod client;

pub use client::{builder, client_with_timeout, user_agent};
