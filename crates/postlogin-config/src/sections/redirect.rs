// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Redirect session-token configuration.
//!
//! The signing secret is never read from the TOML file; it only comes from
//! `POSTLOGIN_REDIRECT_SECRET` or `POSTLOGIN_REDIRECT_SECRET_FILE`.

use postlogin_core::token::{DEFAULT_TOKEN_EXPIRY_SECONDS, DEFAULT_TOKEN_PARAMETER};
use postlogin_core::{SecretString, TokenCreationOptions, ValidateSessionTokenOptions};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Shortest accepted signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 16;

/// Redirect configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct RedirectConfig {
	pub secret: Option<SecretString>,
	pub token_expiry_seconds: u64,
	/// Query parameter carrying the session token to and from the redirect target.
	pub token_parameter: String,
}

impl Default for RedirectConfig {
	fn default() -> Self {
		Self {
			secret: None,
			token_expiry_seconds: DEFAULT_TOKEN_EXPIRY_SECONDS,
			token_parameter: DEFAULT_TOKEN_PARAMETER.to_string(),
		}
	}
}

impl RedirectConfig {
	/// Options for encoding `payload` with the configured secret and expiry.
	///
	/// `None` when no signing secret is configured.
	pub fn token_options(&self, payload: Map<String, Value>) -> Option<TokenCreationOptions> {
		let secret = self.secret.clone()?;
		Some(TokenCreationOptions::new(payload, secret).expires_in(self.token_expiry_seconds))
	}

	/// Options for validating a returned token with the configured secret and parameter.
	///
	/// `None` when no signing secret is configured.
	pub fn validate_options(&self) -> Option<ValidateSessionTokenOptions> {
		let secret = self.secret.clone()?;
		Some(ValidateSessionTokenOptions::new(secret).with_parameter(self.token_parameter.clone()))
	}
}

/// Redirect configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedirectConfigLayer {
	#[serde(default)]
	pub token_expiry_seconds: Option<u64>,
	#[serde(default)]
	pub token_parameter: Option<String>,
}

impl RedirectConfigLayer {
	pub fn merge(&mut self, other: RedirectConfigLayer) {
		if other.token_expiry_seconds.is_some() {
			self.token_expiry_seconds = other.token_expiry_seconds;
		}
		if other.token_parameter.is_some() {
			self.token_parameter = other.token_parameter;
		}
	}

	pub fn finalize(self, secret: Option<SecretString>) -> RedirectConfig {
		RedirectConfig {
			secret,
			token_expiry_seconds: self
				.token_expiry_seconds
				.unwrap_or(DEFAULT_TOKEN_EXPIRY_SECONDS),
			token_parameter: self
				.token_parameter
				.unwrap_or_else(|| DEFAULT_TOKEN_PARAMETER.to_string()),
		}
	}
}
