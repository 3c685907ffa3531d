// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Defaults for the post-login action options.

use postlogin_core::{ActionOptions, SetCustomClaims};
use serde::Deserialize;

/// Action options layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionsConfigLayer {
	#[serde(default)]
	pub namespace: Option<String>,
	#[serde(default)]
	pub set_custom_claims: Option<SetCustomClaims>,
	#[serde(default)]
	pub disable_on_social_login: Option<bool>,
	#[serde(default)]
	pub allow_remember_browser: Option<bool>,
}

impl ActionsConfigLayer {
	pub fn merge(&mut self, other: ActionsConfigLayer) {
		if other.namespace.is_some() {
			self.namespace = other.namespace;
		}
		if other.set_custom_claims.is_some() {
			self.set_custom_claims = other.set_custom_claims;
		}
		if other.disable_on_social_login.is_some() {
			self.disable_on_social_login = other.disable_on_social_login;
		}
		if other.allow_remember_browser.is_some() {
			self.allow_remember_browser = other.allow_remember_browser;
		}
	}

	/// Resolve into fully-populated options.
	pub fn finalize(self) -> ActionOptions {
		let defaults = ActionOptions::default();
		let namespace = self
			.namespace
			.unwrap_or_else(|| defaults.namespace().to_string());
		ActionOptions {
			namespace: Some(namespace),
			set_custom_claims: Some(self.set_custom_claims.unwrap_or_default()),
			disable_on_social_login: Some(self.disable_on_social_login.unwrap_or(false)),
			allow_remember_browser: Some(self.allow_remember_browser.unwrap_or(true)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use postlogin_core::DEFAULT_NAMESPACE;

	#[test]
	fn test_finalize_defaults() {
		let options = ActionsConfigLayer::default().finalize();
		assert_eq!(options.namespace.as_deref(), Some(DEFAULT_NAMESPACE));
		assert_eq!(options.set_custom_claims, Some(SetCustomClaims::AccessToken));
		assert_eq!(options.disable_on_social_login, Some(false));
		assert_eq!(options.allow_remember_browser, Some(true));
	}

	#[test]
	fn test_merge_overrides_set_fields_only() {
		let mut base = ActionsConfigLayer {
			namespace: Some("https://base.example.com".to_string()),
			disable_on_social_login: Some(true),
			..Default::default()
		};
		base.merge(ActionsConfigLayer {
			set_custom_claims: Some(SetCustomClaims::Disabled),
			..Default::default()
		});
		let options = base.finalize();
		assert_eq!(options.namespace(), "https://base.example.com");
		assert_eq!(options.set_custom_claims(), SetCustomClaims::Disabled);
		assert!(options.disable_on_social_login());
	}

	#[test]
	fn test_toml_accepts_false_for_claims() {
		let layer: ActionsConfigLayer = toml::from_str("set_custom_claims = false").unwrap();
		assert_eq!(layer.set_custom_claims, Some(SetCustomClaims::Disabled));
		let layer: ActionsConfigLayer = toml::from_str("set_custom_claims = \"id_token\"").unwrap();
		assert_eq!(layer.set_custom_claims, Some(SetCustomClaims::IdToken));
	}
}
