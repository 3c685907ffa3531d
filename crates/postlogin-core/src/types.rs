// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions shared by the login event and directives.
//!
//! - **ID newtypes**: [`UserId`] and [`ConnectionId`] wrap the platform's opaque string
//!   identifiers (`auth0|5f7c...`, `con_abc123`) so they cannot be mixed up
//! - **Token targets**: which issued token a custom claim lands on ([`TokenTarget`])
//! - **Multifactor providers**: the values accepted by the multifactor enable call
//!   ([`MultifactorProvider`])
//! - **Authentication methods**: names reported in the event's authentication history
//!   ([`AuthenticationMethodName`])

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(String);

		impl $name {
			/// Create a new ID from its platform representation.
			pub fn new(id: impl Into<String>) -> Self {
				Self(id.into())
			}

			/// Borrow the raw identifier.
			pub fn as_str(&self) -> &str {
				&self.0
			}

			/// Get the inner string value.
			pub fn into_inner(self) -> String {
				self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(&self.0)
			}
		}

		impl From<String> for $name {
			fn from(id: String) -> Self {
				Self(id)
			}
		}

		impl From<&str> for $name {
			fn from(id: &str) -> Self {
				Self(id.to_string())
			}
		}

		impl From<$name> for String {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Stable identifier of a user record in the identity store.");
define_id_type!(ConnectionId, "Unique identifier of a connection.");

// =============================================================================
// Token Targets
// =============================================================================

/// The issued token a custom claim is written to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenTarget {
	#[default]
	AccessToken,
	IdToken,
}

impl fmt::Display for TokenTarget {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TokenTarget::AccessToken => write!(f, "access_token"),
			TokenTarget::IdToken => write!(f, "id_token"),
		}
	}
}

// =============================================================================
// Multifactor Providers
// =============================================================================

/// Multifactor provider requested for the login flow.
///
/// [`MultifactorProvider::Any`] lets the platform pick among the user's enrolled
/// factors; [`MultifactorProvider::None`] turns the challenge off for this flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MultifactorProvider {
	Any,
	Duo,
	GoogleAuthenticator,
	Guardian,
	None,
}

impl fmt::Display for MultifactorProvider {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MultifactorProvider::Any => write!(f, "any"),
			MultifactorProvider::Duo => write!(f, "duo"),
			MultifactorProvider::GoogleAuthenticator => write!(f, "google-authenticator"),
			MultifactorProvider::Guardian => write!(f, "guardian"),
			MultifactorProvider::None => write!(f, "none"),
		}
	}
}

// =============================================================================
// Authentication Methods
// =============================================================================

/// Authentication method a user completed during their session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthenticationMethodName {
	/// Social or enterprise federation.
	Federated,
	/// Username and password.
	Pwd,
	/// Existing session (silent authentication).
	Ses,
	/// Passwordless email.
	Email,
	/// Second factor.
	Mfa,
	/// Test-only method.
	Mock,
}

impl fmt::Display for AuthenticationMethodName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AuthenticationMethodName::Federated => write!(f, "federated"),
			AuthenticationMethodName::Pwd => write!(f, "pwd"),
			AuthenticationMethodName::Ses => write!(f, "ses"),
			AuthenticationMethodName::Email => write!(f, "email"),
			AuthenticationMethodName::Mfa => write!(f, "mfa"),
			AuthenticationMethodName::Mock => write!(f, "mock"),
		}
	}
}

// =============================================================================
// Transaction Protocol
// =============================================================================

/// Protocol used to start the login transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionProtocol {
	OidcBasicProfile,
	OidcImplicitProfile,
	Oauth2DeviceCode,
	Oauth2ResourceOwner,
	Oauth2ResourceOwnerJwtBearer,
	Oauth2Password,
	Oauth2AccessToken,
	Oauth2RefreshToken,
	Oauth2TokenExchange,
	OidcHybridProfile,
	Samlp,
	Wsfed,
	WstrustUsernamemixed,
}
