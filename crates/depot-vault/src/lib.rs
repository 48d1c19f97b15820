// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client for the trust authority that vends object-storage credentials.
//!
//! One asset request walks this crate top to bottom exactly once:
//! 1. [`TokenFile::read`] loads the workload identity token from disk
//! 2. [`VaultClient::exchange_identity`] trades it for a session token
//! 3. [`VaultClient::fetch_secret`] reads the scoped secret with that token
//! 4. [`extract`] pulls the access/secret key pair out of the payload
//!
//! Nothing is cached between requests.
//!
//! # Example
//!
//! ```ignore
//! use depot_vault::{extract, TokenFile, VaultClient};
//!
//! let vault = VaultClient::new(Duration::from_secs(30))?;
//! let identity = TokenFile::new("/var/run/secrets/kubernetes.io/serviceaccount/token").read().await?;
//! let session = vault
//!     .exchange_identity("http://vault:8200", "/v1/auth/kubernetes/login", "depot", &identity)
//!     .await?;
//! let payload = vault
//!     .fetch_secret("http://vault:8200", "/v1/secret/data/reports", &session)
//!     .await?;
//! let credentials = extract(&payload)?;
//! ```

mod client;
mod credentials;
mod error;
mod identity;

pub use client::{SecretPayload, SessionToken, VaultClient, VAULT_TOKEN_HEADER};
pub use credentials::{extract, StorageCredentials};
pub use error::{AuthExchangeError, IdentityTokenError, MalformedSecretError, SecretFetchError};
pub use identity::{IdentityToken, TokenFile};
