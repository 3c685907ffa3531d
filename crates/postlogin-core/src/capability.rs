// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Capabilities a host injects into the post-login actions.
//!
//! - [`IdentityStore`]: the two identity-store calls the resolver and the directive
//!   applier need. Implementations own retries and timeouts.
//! - [`DirectiveSink`]: the host's login-flow API that directives are applied to.
//! - [`TokenCodec`]: signing and verification of redirect session tokens.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::directive::{EnableMultifactorOptions, SendRedirectOptions};
use crate::error::{SinkError, StoreError, TokenError};
use crate::token::{TokenCreationOptions, ValidateSessionTokenOptions};
use crate::types::{MultifactorProvider, TokenTarget, UserId};
use crate::user::{Identity, User};

/// The secondary identity to move into a primary user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkIdentityRequest {
	pub provider: String,
	pub external_id: String,
}

/// Read and link access to the identity store.
///
/// # Ordering contract
///
/// [`get_users_by_email`](IdentityStore::get_users_by_email) must return users in a
/// stable order, earliest-created first. The resolver designates the first user as
/// canonical, so an unstable order makes merges non-reproducible.
#[async_trait]
pub trait IdentityStore: Send + Sync {
	/// All users whose email equals `email`.
	///
	/// An empty vector means "no such users". Failing to check must be an error.
	async fn get_users_by_email(&self, email: &str) -> Result<Vec<User>, StoreError>;

	/// Move the identity described by `request` into `primary_user_id`.
	///
	/// Returns the primary user's identity list after the link.
	async fn link_identity(
		&self,
		primary_user_id: &UserId,
		request: &LinkIdentityRequest,
	) -> Result<Vec<Identity>, StoreError>;
}

/// The host's login-flow API.
///
/// Calls are synchronous; the host may batch them internally (metadata changes are
/// typically aggregated and persisted once at the end of the flow).
pub trait DirectiveSink {
	fn set_custom_claim(&mut self, token: TokenTarget, key: &str, value: &Value)
		-> Result<(), SinkError>;

	fn enable_multifactor(
		&mut self,
		provider: MultifactorProvider,
		options: &EnableMultifactorOptions,
	) -> Result<(), SinkError>;

	fn deny(&mut self, reason: &str) -> Result<(), SinkError>;

	fn send_redirect(&mut self, url: &str, options: &SendRedirectOptions) -> Result<(), SinkError>;

	fn set_app_metadata(&mut self, key: &str, value: &Value) -> Result<(), SinkError>;

	fn set_user_metadata(&mut self, key: &str, value: &Value) -> Result<(), SinkError>;
}

/// Signs and verifies redirect session tokens.
pub trait TokenCodec {
	/// Encode `options.payload` into a signed token.
	fn encode_token(&self, options: &TokenCreationOptions) -> Result<String, TokenError>;

	/// Verify the token sent back to the continue endpoint and return its payload.
	fn validate_token(
		&self,
		options: &ValidateSessionTokenOptions,
	) -> Result<Map<String, Value>, TokenError>;
}
