// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Options for the redirect session-token contract.
//!
//! A redirect target receives a signed session token carrying data whose integrity it
//! must be able to verify with a shared secret. Signing and verification belong to the
//! host's [`TokenCodec`](crate::capability::TokenCodec); this crate only fixes the inputs.

use serde_json::{Map, Value};

use crate::secret::SecretString;

/// Token lifetime when none is requested: 15 minutes.
pub const DEFAULT_TOKEN_EXPIRY_SECONDS: u64 = 900;

/// Query or body parameter carrying the token back to the continue endpoint.
pub const DEFAULT_TOKEN_PARAMETER: &str = "session_token";

/// Inputs for encoding a session token.
#[derive(Debug, Clone)]
pub struct TokenCreationOptions {
	pub expires_in_seconds: u64,
	pub payload: Map<String, Value>,
	pub secret: SecretString,
}

impl TokenCreationOptions {
	pub fn new(payload: Map<String, Value>, secret: SecretString) -> Self {
		Self {
			expires_in_seconds: DEFAULT_TOKEN_EXPIRY_SECONDS,
			payload,
			secret,
		}
	}

	pub fn expires_in(mut self, seconds: u64) -> Self {
		self.expires_in_seconds = seconds;
		self
	}
}

/// Inputs for validating a session token returned to the continue endpoint.
#[derive(Debug, Clone)]
pub struct ValidateSessionTokenOptions {
	pub secret: SecretString,
	pub token_parameter_name: String,
}

impl ValidateSessionTokenOptions {
	pub fn new(secret: SecretString) -> Self {
		Self {
			secret,
			token_parameter_name: DEFAULT_TOKEN_PARAMETER.to_string(),
		}
	}

	pub fn with_parameter(mut self, name: impl Into<String>) -> Self {
		self.token_parameter_name = name.into();
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn creation_defaults_to_fifteen_minutes() {
		let options = TokenCreationOptions::new(Map::new(), SecretString::new("s".repeat(32)));
		assert_eq!(options.expires_in_seconds, 900);
		assert_eq!(options.expires_in(60).expires_in_seconds, 60);
	}

	#[test]
	fn validation_defaults_to_session_token_parameter() {
		let options = ValidateSessionTokenOptions::new(SecretString::new("s".repeat(32)));
		assert_eq!(options.token_parameter_name, "session_token");
		assert_eq!(options.with_parameter("state_token").token_parameter_name, "state_token");
	}

	#[test]
	fn debug_output_redacts_secret() {
		let options = TokenCreationOptions::new(Map::new(), SecretString::new("hunter2hunter2".to_string()));
		let debug = format!("{options:?}");
		assert!(!debug.contains("hunter2"));
		assert!(debug.contains("[REDACTED]"));
	}
}
