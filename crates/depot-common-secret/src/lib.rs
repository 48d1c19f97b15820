// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wrapper for the short-lived secrets that flow through a single asset request.
//!
//! Identity tokens, session tokens and storage key pairs all travel through
//! code that logs heavily. [`Secret<T>`] keeps them out of that output:
//!
//! - `Debug` and `Display` always render [`REDACTED`]
//! - the inner value is zeroized when the wrapper is dropped
//! - reading the value requires an explicit [`Secret::expose`] call
//!
//! ```
//! use depot_common_secret::SecretString;
//!
//! let session = SecretString::new("hvs.CAESIJ".to_string());
//! assert_eq!(format!("{session}"), "[REDACTED]");
//! assert_eq!(session.expose(), "hvs.CAESIJ");
//! ```

use std::fmt;
use zeroize::Zeroize;

/// Placeholder rendered in place of any secret value.
pub const REDACTED: &str = "[REDACTED]";

/// A value that must never reach logs or error messages.
///
/// There is intentionally no `Deref` and no `Serialize`; call sites opt in
/// to the raw value with [`Secret::expose`].
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Secret<T>
where
	T: Zeroize,
{
	inner: T,
}

/// The common case: a token or key held as a string.
pub type SecretString = Secret<String>;

impl<T> Secret<T>
where
	T: Zeroize,
{
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Borrow the raw value.
	pub fn expose(&self) -> &T {
		&self.inner
	}
}

impl SecretString {
	/// True when the wrapped string is empty after trimming whitespace.
	pub fn is_blank(&self) -> bool {
		self.inner.trim().is_empty()
	}
}

impl<T> Clone for Secret<T>
where
	T: Zeroize + Clone,
{
	fn clone(&self) -> Self {
		Self::new(self.inner.clone())
	}
}

impl<T> fmt::Debug for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Secret").field(&REDACTED).finish()
	}
}

impl<T> fmt::Display for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T> PartialEq for Secret<T>
where
	T: Zeroize + PartialEq,
{
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl<T> Eq for Secret<T> where T: Zeroize + Eq {}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Self::new(value.to_string())
	}
}
