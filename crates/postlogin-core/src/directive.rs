// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Side-effect instructions produced by post-login actions.
//!
//! Actions accumulate directives in order and return them; the host applies them
//! once and discards them. Order matters: a later `EnableMultifactor` overrides an
//! earlier one for the same flow, and `Deny` stops the flow after the current action.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{MultifactorProvider, TokenTarget, UserId};

/// Options passed along with a multifactor enable request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnableMultifactorOptions {
	/// Whether the browser may be remembered so later challenges can be skipped.
	pub allow_remember_browser: bool,
}

impl Default for EnableMultifactorOptions {
	fn default() -> Self {
		Self {
			allow_remember_browser: true,
		}
	}
}

/// Options for a redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRedirectOptions {
	/// Additional query parameters appended to the redirect URL.
	#[serde(default)]
	pub query: BTreeMap<String, String>,
}

/// A single instruction for the host to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Directive {
	/// Set a custom claim on the access or ID token issued at the end of the flow.
	SetCustomClaim {
		token: TokenTarget,
		key: String,
		value: Value,
	},

	/// Move the identity `(provider, external_id)`, currently owned by
	/// `secondary_user_id`, into `primary_user_id`.
	LinkIdentity {
		primary_user_id: UserId,
		secondary_user_id: UserId,
		provider: String,
		external_id: String,
	},

	/// Require (or, with [`MultifactorProvider::None`], waive) a second factor.
	EnableMultifactor {
		provider: MultifactorProvider,
		options: EnableMultifactorOptions,
	},

	/// Reject the login attempt. `reason` may be shown to the end user.
	Deny { reason: String },

	/// Redirect the browser once the current action completes.
	SendRedirect {
		url: String,
		#[serde(default)]
		options: SendRedirectOptions,
	},

	/// Set application metadata on the user. A `null` value removes the key.
	SetAppMetadata { key: String, value: Value },

	/// Set user metadata on the user. A `null` value removes the key.
	SetUserMetadata { key: String, value: Value },
}

impl Directive {
	pub fn set_custom_claim(token: TokenTarget, key: impl Into<String>, value: impl Into<Value>) -> Self {
		Directive::SetCustomClaim {
			token,
			key: key.into(),
			value: value.into(),
		}
	}

	pub fn enable_multifactor(provider: MultifactorProvider, options: EnableMultifactorOptions) -> Self {
		Directive::EnableMultifactor { provider, options }
	}

	/// Turn the multifactor challenge off for this flow.
	pub fn disable_multifactor() -> Self {
		Directive::EnableMultifactor {
			provider: MultifactorProvider::None,
			options: EnableMultifactorOptions::default(),
		}
	}

	pub fn deny(reason: impl Into<String>) -> Self {
		Directive::Deny {
			reason: reason.into(),
		}
	}

	/// Short name of the directive kind, used in logs.
	pub fn kind(&self) -> &'static str {
		match self {
			Directive::SetCustomClaim { .. } => "set_custom_claim",
			Directive::LinkIdentity { .. } => "link_identity",
			Directive::EnableMultifactor { .. } => "enable_multifactor",
			Directive::Deny { .. } => "deny",
			Directive::SendRedirect { .. } => "send_redirect",
			Directive::SetAppMetadata { .. } => "set_app_metadata",
			Directive::SetUserMetadata { .. } => "set_user_metadata",
		}
	}

	pub fn is_link(&self) -> bool {
		matches!(self, Directive::LinkIdentity { .. })
	}

	pub fn is_claim(&self) -> bool {
		matches!(self, Directive::SetCustomClaim { .. })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn serializes_with_type_tag() {
		let directive = Directive::set_custom_claim(
			TokenTarget::AccessToken,
			"https://example.com/user_id",
			"auth0|1",
		);
		let json = serde_json::to_value(&directive).unwrap();
		assert_eq!(json["type"], "set_custom_claim");
		assert_eq!(json["token"], "access_token");
		assert_eq!(json["value"], "auth0|1");
	}

	#[test]
	fn disable_multifactor_uses_none_provider() {
		let json = serde_json::to_value(Directive::disable_multifactor()).unwrap();
		assert_eq!(json["type"], "enable_multifactor");
		assert_eq!(json["provider"], "none");
	}

	#[test]
	fn enable_options_default_remembers_browser() {
		assert!(EnableMultifactorOptions::default().allow_remember_browser);
		let json = serde_json::to_value(EnableMultifactorOptions::default()).unwrap();
		assert_eq!(json["allowRememberBrowser"], true);
	}

	#[test]
	fn kind_names_each_variant() {
		assert_eq!(Directive::deny("blocked").kind(), "deny");
		assert!(!Directive::deny("blocked").is_link());
		let link = Directive::LinkIdentity {
			primary_user_id: UserId::new("auth0|1"),
			secondary_user_id: UserId::new("github|42"),
			provider: "github".to_string(),
			external_id: "42".to_string(),
		};
		assert!(link.is_link());
		assert_eq!(link.kind(), "link_identity");
	}
}
