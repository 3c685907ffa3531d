// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-call options for the post-login actions.
//!
//! Every field is optional; the accessor methods apply the documented defaults so
//! callers never have to repeat them:
//!
//! | option                    | default            |
//! |---------------------------|--------------------|
//! | `namespace`               | [`DEFAULT_NAMESPACE`] |
//! | `set_custom_claims`       | `access_token`     |
//! | `disable_on_social_login` | `false`            |
//! | `allow_remember_browser`  | `true`             |

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::TokenTarget;

/// Namespace prefix for custom claims when none is configured.
pub const DEFAULT_NAMESPACE: &str = "https://auth0.vedicium.io";

/// Where the canonical `user_id` claim is written, if anywhere.
///
/// On the wire this is `"access_token"`, `"id_token"` or `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SetCustomClaims {
	#[default]
	AccessToken,
	IdToken,
	Disabled,
}

impl SetCustomClaims {
	/// The token to write to, or `None` when claims are disabled.
	pub fn target(&self) -> Option<TokenTarget> {
		match self {
			SetCustomClaims::AccessToken => Some(TokenTarget::AccessToken),
			SetCustomClaims::IdToken => Some(TokenTarget::IdToken),
			SetCustomClaims::Disabled => None,
		}
	}

	/// Parse the textual form used by configuration files and environment variables.
	pub fn parse(value: &str) -> Option<Self> {
		match value.trim().to_ascii_lowercase().as_str() {
			"access_token" => Some(SetCustomClaims::AccessToken),
			"id_token" => Some(SetCustomClaims::IdToken),
			"false" | "none" | "disabled" | "0" => Some(SetCustomClaims::Disabled),
			_ => None,
		}
	}
}

impl fmt::Display for SetCustomClaims {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SetCustomClaims::AccessToken => write!(f, "access_token"),
			SetCustomClaims::IdToken => write!(f, "id_token"),
			SetCustomClaims::Disabled => write!(f, "false"),
		}
	}
}

impl Serialize for SetCustomClaims {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match self.target() {
			Some(target) => target.serialize(serializer),
			None => serializer.serialize_bool(false),
		}
	}
}

impl<'de> Deserialize<'de> for SetCustomClaims {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Raw {
			Flag(bool),
			Target(TokenTarget),
		}

		Ok(match Raw::deserialize(deserializer)? {
			Raw::Flag(false) => SetCustomClaims::Disabled,
			Raw::Flag(true) | Raw::Target(TokenTarget::AccessToken) => SetCustomClaims::AccessToken,
			Raw::Target(TokenTarget::IdToken) => SetCustomClaims::IdToken,
		})
	}
}

/// Options shared by the identity resolver and the multifactor evaluator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOptions {
	/// Namespace used to build custom claim keys.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub namespace: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub set_custom_claims: Option<SetCustomClaims>,

	/// Waive the multifactor challenge when the login came through a social connection.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub disable_on_social_login: Option<bool>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub allow_remember_browser: Option<bool>,
}

impl ActionOptions {
	/// The claim namespace. An empty namespace falls back to the default.
	pub fn namespace(&self) -> &str {
		self.namespace
			.as_deref()
			.filter(|ns| !ns.is_empty())
			.unwrap_or(DEFAULT_NAMESPACE)
	}

	pub fn set_custom_claims(&self) -> SetCustomClaims {
		self.set_custom_claims.unwrap_or_default()
	}

	pub fn disable_on_social_login(&self) -> bool {
		self.disable_on_social_login.unwrap_or(false)
	}

	pub fn allow_remember_browser(&self) -> bool {
		self.allow_remember_browser.unwrap_or(true)
	}

	/// Fully-qualified claim key for `name`, e.g. `https://auth0.vedicium.io/user_id`.
	pub fn claim_key(&self, name: &str) -> String {
		format!("{}/{}", self.namespace(), name)
	}

}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	mod defaults {
		use super::*;

		#[test]
		fn empty_options_use_documented_defaults() {
			let options = ActionOptions::default();
			assert_eq!(options.namespace(), DEFAULT_NAMESPACE);
			assert_eq!(options.set_custom_claims(), SetCustomClaims::AccessToken);
			assert!(!options.disable_on_social_login());
			assert!(options.allow_remember_browser());
		}

		#[test]
		fn empty_namespace_falls_back_to_default() {
			let options = ActionOptions {
				namespace: Some(String::new()),
				..Default::default()
			};
			assert_eq!(options.claim_key("user_id"), format!("{DEFAULT_NAMESPACE}/user_id"));
		}

		#[test]
		fn custom_namespace_builds_claim_key() {
			let options = ActionOptions {
				namespace: Some("https://example.com".to_string()),
				..Default::default()
			};
			assert_eq!(options.claim_key("user_id"), "https://example.com/user_id");
		}
	}

	mod set_custom_claims {
		use super::*;

		#[test]
		fn deserializes_false_as_disabled() {
			let value: SetCustomClaims = serde_json::from_str("false").unwrap();
			assert_eq!(value, SetCustomClaims::Disabled);
			assert_eq!(value.target(), None);
		}

		#[test]
		fn deserializes_token_names() {
			let value: SetCustomClaims = serde_json::from_str("\"id_token\"").unwrap();
			assert_eq!(value.target(), Some(TokenTarget::IdToken));
			let value: SetCustomClaims = serde_json::from_str("\"access_token\"").unwrap();
			assert_eq!(value.target(), Some(TokenTarget::AccessToken));
		}

		#[test]
		fn rejects_unknown_token_name() {
			assert!(serde_json::from_str::<SetCustomClaims>("\"refresh_token\"").is_err());
		}

		#[test]
		fn serializes_disabled_as_false() {
			assert_eq!(
				serde_json::to_string(&SetCustomClaims::Disabled).unwrap(),
				"false"
			);
			assert_eq!(
				serde_json::to_string(&SetCustomClaims::IdToken).unwrap(),
				"\"id_token\""
			);
		}

		#[test]
		fn parses_textual_forms() {
			assert_eq!(SetCustomClaims::parse("ID_TOKEN"), Some(SetCustomClaims::IdToken));
			assert_eq!(SetCustomClaims::parse("none"), Some(SetCustomClaims::Disabled));
			assert_eq!(SetCustomClaims::parse("bogus"), None);
		}
	}

	#[test]
	fn options_deserialize_from_camel_case() {
		let options: ActionOptions = serde_json::from_str(
			r#"{"namespace": "https://example.com", "setCustomClaims": false, "disableOnSocialLogin": true}"#,
		)
		.unwrap();
		assert_eq!(options.set_custom_claims(), SetCustomClaims::Disabled);
		assert!(options.disable_on_social_login());
		assert!(options.allow_remember_browser());
	}

	proptest! {
			#[test]
			fn claim_key_is_namespace_slash_name(
					host in "[a-z]{1,12}",
					name in "[a-z_]{1,16}",
			) {
					let options = ActionOptions {
							namespace: Some(format!("https://{host}.example.com")),
							..Default::default()
					};
					prop_assert_eq!(
							options.claim_key(&name),
							format!("https://{}.example.com/{}", host, name)
					);
			}
	}
}
