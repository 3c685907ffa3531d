// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User records and the identities linked to them.
//!
//! This module provides:
//! - [`User`] - a user record as held by the identity store and carried on the login event
//! - [`Identity`] - one (provider, external user id) pair owned by a user
//!
//! # PII Handling
//!
//! `email`, `name` and `nickname` are user-provided PII. They are never passed to
//! tracing fields by the actions in this workspace; log the [`UserId`] instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::types::UserId;

/// A user record.
///
/// A user may own several identities, e.g. one database identity and one social
/// identity after their accounts were merged. The first listed identity is the one
/// the user was created with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
	/// Stable identifier, `<provider>|<external id>` for the identity the record was created from.
	pub user_id: UserId,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,

	#[serde(default)]
	pub email_verified: bool,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub nickname: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub picture: Option<String>,

	/// Identities owned by this user, in link order.
	#[serde(default)]
	pub identities: Vec<Identity>,

	/// Enrolled multifactor providers (e.g. `guardian`, `duo`).
	#[serde(default, deserialize_with = "null_as_empty")]
	pub multifactor: Vec<String>,

	#[serde(default)]
	pub app_metadata: Map<String, Value>,

	#[serde(default)]
	pub user_metadata: Map<String, Value>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<DateTime<Utc>>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_login: Option<DateTime<Utc>>,
}

impl User {
	/// Create a bare user record with no identities.
	pub fn new(user_id: impl Into<UserId>) -> Self {
		Self {
			user_id: user_id.into(),
			email: None,
			email_verified: false,
			name: None,
			nickname: None,
			picture: None,
			identities: Vec::new(),
			multifactor: Vec::new(),
			app_metadata: Map::new(),
			user_metadata: Map::new(),
			created_at: None,
			last_login: None,
		}
	}

	pub fn with_email(mut self, email: impl Into<String>) -> Self {
		self.email = Some(email.into());
		self
	}

	pub fn with_identity(mut self, identity: Identity) -> Self {
		self.identities.push(identity);
		self
	}

	pub fn with_multifactor(mut self, provider: impl Into<String>) -> Self {
		self.multifactor.push(provider.into());
		self
	}

	/// The identity the record was created with, if any is listed.
	pub fn primary_identity(&self) -> Option<&Identity> {
		self.identities.first()
	}

	/// Returns true if this user owns the identity `(provider, external_id)`.
	pub fn owns_identity(&self, provider: &str, external_id: &str) -> bool {
		self.identities
			.iter()
			.any(|identity| identity.matches(provider, external_id))
	}
}

/// One way a user authenticated, as a (provider, external user id) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
	/// Provider name, e.g. `auth0`, `github`, `google-oauth2`.
	pub provider: String,

	/// The user's id at the provider. Providers report it as a string or a number.
	#[serde(rename = "user_id", deserialize_with = "string_or_number")]
	pub external_id: String,

	/// Connection the identity belongs to.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub connection: Option<String>,

	#[serde(default, rename = "isSocial")]
	pub is_social: bool,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub profile_data: Option<Map<String, Value>>,
}

impl Identity {
	pub fn new(provider: impl Into<String>, external_id: impl Into<String>) -> Self {
		Self {
			provider: provider.into(),
			external_id: external_id.into(),
			connection: None,
			is_social: false,
			profile_data: None,
		}
	}

	pub fn social(provider: impl Into<String>, external_id: impl Into<String>) -> Self {
		let provider = provider.into();
		Self {
			connection: Some(provider.clone()),
			is_social: true,
			..Self::new(provider, external_id)
		}
	}

	pub fn matches(&self, provider: &str, external_id: &str) -> bool {
		self.provider == provider && self.external_id == external_id
	}
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Raw {
		Text(String),
		Number(serde_json::Number),
	}

	Ok(match Raw::deserialize(deserializer)? {
		Raw::Text(s) => s,
		Raw::Number(n) => n.to_string(),
	})
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn deserializes_numeric_external_id() {
		let json = r#"{"provider": "github", "user_id": 42, "connection": "github", "isSocial": true}"#;
		let identity: Identity = serde_json::from_str(json).unwrap();
		assert_eq!(identity.external_id, "42");
		assert!(identity.is_social);
	}

	#[test]
	fn deserializes_string_external_id() {
		let json = r#"{"provider": "auth0", "user_id": "5f7c8ec7c33c6c004bbafe82"}"#;
		let identity: Identity = serde_json::from_str(json).unwrap();
		assert_eq!(identity.external_id, "5f7c8ec7c33c6c004bbafe82");
		assert!(!identity.is_social);
		assert!(identity.connection.is_none());
	}

	#[test]
	fn missing_multifactor_is_empty() {
		let user: User = serde_json::from_str(r#"{"user_id": "auth0|1"}"#).unwrap();
		assert!(user.multifactor.is_empty());
		assert!(user.identities.is_empty());
		assert!(user.email.is_none());
	}

	#[test]
	fn null_multifactor_is_empty() {
		let user: User =
			serde_json::from_str(r#"{"user_id": "auth0|1", "multifactor": null}"#).unwrap();
		assert!(user.multifactor.is_empty());
	}

	#[test]
	fn primary_identity_is_first_listed() {
		let user = User::new("auth0|1")
			.with_identity(Identity::new("auth0", "1"))
			.with_identity(Identity::social("github", "42"));
		assert_eq!(user.primary_identity().unwrap().provider, "auth0");
		assert!(user.owns_identity("github", "42"));
		assert!(!user.owns_identity("github", "43"));
	}

	#[test]
	fn social_identity_uses_provider_as_connection() {
		let identity = Identity::social("google-oauth2", "1093");
		assert_eq!(identity.connection.as_deref(), Some("google-oauth2"));
		assert!(identity.is_social);
	}
}
