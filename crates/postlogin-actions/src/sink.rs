// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! A directive sink that records what it was asked to do.
//!
//! Used by the CLI's dry-run host and by tests. Each call is stored back as the
//! equivalent [`Directive`], so `applied()` can be compared with a resolver's output.

use postlogin_core::{
	Directive, DirectiveSink, EnableMultifactorOptions, MultifactorProvider, SendRedirectOptions,
	SinkError, TokenTarget,
};
use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
	applied: Vec<Directive>,
}

impl RecordingSink {
	pub fn applied(&self) -> &[Directive] {
		&self.applied
	}

	pub fn into_directives(self) -> Vec<Directive> {
		self.applied
	}

	/// Reason of the first deny, if the login was denied.
	pub fn denied_reason(&self) -> Option<&str> {
		self.applied.iter().find_map(|d| match d {
			Directive::Deny { reason } => Some(reason.as_str()),
			_ => None,
		})
	}

	/// The multifactor provider in effect: the last enable call wins.
	pub fn effective_multifactor(&self) -> Option<MultifactorProvider> {
		self.applied.iter().rev().find_map(|d| match d {
			Directive::EnableMultifactor { provider, .. } => Some(*provider),
			_ => None,
		})
	}

	/// Value of claim `key` on `token`, last write wins.
	pub fn claim(&self, token: TokenTarget, key: &str) -> Option<&Value> {
		self.applied.iter().rev().find_map(|d| match d {
			Directive::SetCustomClaim {
				token: t,
				key: k,
				value,
			} if *t == token && k == key => Some(value),
			_ => None,
		})
	}
}

impl DirectiveSink for RecordingSink {
	fn set_custom_claim(&mut self, token: TokenTarget, key: &str, value: &Value) -> Result<(), SinkError> {
		self.applied
			.push(Directive::set_custom_claim(token, key, value.clone()));
		Ok(())
	}

	fn enable_multifactor(
		&mut self,
		provider: MultifactorProvider,
		options: &EnableMultifactorOptions,
	) -> Result<(), SinkError> {
		self.applied
			.push(Directive::enable_multifactor(provider, *options));
		Ok(())
	}

	fn deny(&mut self, reason: &str) -> Result<(), SinkError> {
		self.applied.push(Directive::deny(reason));
		Ok(())
	}

	fn send_redirect(&mut self, url: &str, options: &SendRedirectOptions) -> Result<(), SinkError> {
		self.applied.push(Directive::SendRedirect {
			url: url.to_string(),
			options: options.clone(),
		});
		Ok(())
	}

	fn set_app_metadata(&mut self, key: &str, value: &Value) -> Result<(), SinkError> {
		self.applied.push(Directive::SetAppMetadata {
			key: key.to_string(),
			value: value.clone(),
		});
		Ok(())
	}

	fn set_user_metadata(&mut self, key: &str, value: &Value) -> Result<(), SinkError> {
		self.applied.push(Directive::SetUserMetadata {
			key: key.to_string(),
			value: value.clone(),
		});
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn last_multifactor_call_wins() {
		let mut sink = RecordingSink::default();
		sink.enable_multifactor(MultifactorProvider::Any, &EnableMultifactorOptions::default())
			.unwrap();
		sink.enable_multifactor(MultifactorProvider::None, &EnableMultifactorOptions::default())
			.unwrap();
		assert_eq!(sink.effective_multifactor(), Some(MultifactorProvider::None));
	}

	#[test]
	fn claims_are_scoped_by_token() {
		let mut sink = RecordingSink::default();
		sink.set_custom_claim(TokenTarget::IdToken, "ns/user_id", &json!("auth0|1"))
			.unwrap();
		assert_eq!(
			sink.claim(TokenTarget::IdToken, "ns/user_id"),
			Some(&json!("auth0|1"))
		);
		assert_eq!(sink.claim(TokenTarget::AccessToken, "ns/user_id"), None);
	}

	#[test]
	fn no_deny_means_no_reason() {
		let mut sink = RecordingSink::default();
		sink.set_user_metadata("locale", &json!("nl")).unwrap();
		assert_eq!(sink.denied_reason(), None);
		assert_eq!(sink.into_directives().len(), 1);
	}
}
