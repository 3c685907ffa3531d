// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered configuration for hosts running the post-login actions.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Validation of the claim namespace and the redirect signing secret
//! - Consistent environment variable naming (`POSTLOGIN_*`)
//!
//! # Usage
//!
//! ```ignore
//! use postlogin_config::load_config;
//!
//! let config = load_config()?;
//! println!("claims under {}", config.actions.namespace());
//! ```

pub mod env;
pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use env::load_secret_env;
pub use error::{ConfigError, SecretEnvError};
pub use layer::PostloginConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, ENV_PREFIX};

use std::path::Path;

use postlogin_core::{ActionOptions, SecretString, DEFAULT_NAMESPACE};
use tracing::{debug, info};

/// Fully resolved configuration.
#[derive(Debug, Clone, Default)]
pub struct PostloginConfig {
	pub actions: ActionOptions,
	pub logging: LoggingConfig,
	pub redirect: RedirectConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`POSTLOGIN_*`)
/// 2. Config file (`/etc/postlogin/config.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<PostloginConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource::default()),
	];
	load_from_sources(sources, ENV_PREFIX)
}

/// Load configuration using an explicit config file instead of the system one.
pub fn load_config_with_file(path: impl AsRef<Path>) -> Result<PostloginConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(path.as_ref())),
		Box::new(EnvSource::default()),
	];
	load_from_sources(sources, ENV_PREFIX)
}

/// Load configuration from defaults and environment only.
pub fn load_config_from_env() -> Result<PostloginConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> =
		vec![Box::new(DefaultsSource), Box::new(EnvSource::default())];
	load_from_sources(sources, ENV_PREFIX)
}

/// Merge `sources` by precedence and finalize.
///
/// The redirect secret is read from `{env_prefix}_REDIRECT_SECRET` (or its
/// `_FILE` variant) and never from a config file.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
	env_prefix: &str,
) -> Result<PostloginConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = PostloginConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	let secret = load_secret_env(&format!("{env_prefix}_REDIRECT_SECRET"))?;
	let config = finalize(merged, secret)?;
	info!(
		namespace = %config.actions.namespace(),
		set_custom_claims = %config.actions.set_custom_claims(),
		disable_on_social_login = config.actions.disable_on_social_login(),
		redirect_secret = config.redirect.secret.is_some(),
		"configuration loaded"
	);
	Ok(config)
}

/// Resolve a merged layer into a validated configuration.
pub fn finalize(
	layer: PostloginConfigLayer,
	secret: Option<SecretString>,
) -> Result<PostloginConfig, ConfigError> {
	let config = PostloginConfig {
		actions: layer.actions.unwrap_or_default().finalize(),
		logging: layer.logging.unwrap_or_default().finalize(),
		redirect: layer.redirect.unwrap_or_default().finalize(secret),
	};
	validate_config(&config)?;
	Ok(config)
}

/// Check cross-field constraints.
pub fn validate_config(config: &PostloginConfig) -> Result<(), ConfigError> {
	let namespace = config
		.actions
		.namespace
		.as_deref()
		.unwrap_or(DEFAULT_NAMESPACE);
	if namespace.trim().is_empty() {
		return Err(ConfigError::Validation(
			"actions.namespace must not be empty".to_string(),
		));
	}
	if namespace.ends_with('/') {
		return Err(ConfigError::Validation(format!(
			"actions.namespace must not end with '/': {namespace}"
		)));
	}

	if let Some(secret) = &config.redirect.secret {
		if secret.len() < MIN_SECRET_LEN {
			return Err(ConfigError::Validation(format!(
				"redirect secret must be at least {MIN_SECRET_LEN} bytes"
			)));
		}
	}

	if config.redirect.token_expiry_seconds == 0 {
		return Err(ConfigError::Validation(
			"redirect.token_expiry_seconds must be greater than zero".to_string(),
		));
	}

	if config.redirect.token_parameter.trim().is_empty() {
		return Err(ConfigError::Validation(
			"redirect.token_parameter must not be empty".to_string(),
		));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use postlogin_core::SetCustomClaims;
	use proptest::prelude::*;
	use std::io::Write;
	use tempfile::NamedTempFile;

	fn layer_from_toml(toml: &str) -> PostloginConfigLayer {
		toml::from_str(toml).unwrap()
	}

	#[test]
	fn test_defaults_finalize() {
		let config = finalize(PostloginConfigLayer::default(), None).unwrap();
		assert_eq!(config.actions.namespace(), DEFAULT_NAMESPACE);
		assert_eq!(config.actions.set_custom_claims(), SetCustomClaims::AccessToken);
		assert!(!config.actions.disable_on_social_login());
		assert!(config.actions.allow_remember_browser());
		assert_eq!(config.logging.format, LogFormat::Pretty);
		assert!(config.redirect.secret.is_none());
	}

	#[test]
	fn test_default_config_is_valid() {
		assert!(validate_config(&PostloginConfig::default()).is_ok());
	}

	#[test]
	fn test_trailing_slash_namespace_rejected() {
		let layer = layer_from_toml("[actions]\nnamespace = \"https://example.com/\"");
		let err = finalize(layer, None).unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
	}

	#[test]
	fn test_blank_namespace_rejected() {
		let layer = layer_from_toml("[actions]\nnamespace = \"  \"");
		assert!(finalize(layer, None).is_err());
	}

	#[test]
	fn test_short_secret_rejected() {
		let err = finalize(
			PostloginConfigLayer::default(),
			Some(SecretString::new("short".to_string())),
		)
		.unwrap_err();
		assert!(err.to_string().contains("at least 16 bytes"));
	}

	#[test]
	fn test_zero_expiry_rejected() {
		let layer = layer_from_toml("[redirect]\ntoken_expiry_seconds = 0");
		assert!(finalize(layer, None).is_err());
	}

	#[test]
	fn test_empty_token_parameter_rejected() {
		let layer = layer_from_toml("[redirect]\ntoken_parameter = \"\"");
		assert!(finalize(layer, None).is_err());
	}

	#[test]
	fn test_env_expiry_reaches_token_options() {
		let prefix = "POSTLOGIN_TEST_LIB_EXPIRY";
		std::env::set_var(format!("{prefix}_REDIRECT_TOKEN_EXPIRY_SECONDS"), "60");
		std::env::set_var(format!("{prefix}_REDIRECT_SECRET"), "0123456789abcdef0123");

		let sources: Vec<Box<dyn ConfigSource>> =
			vec![Box::new(DefaultsSource), Box::new(EnvSource::new(prefix))];
		let config = load_from_sources(sources, prefix).unwrap();

		let options = config
			.redirect
			.token_options(serde_json::Map::new())
			.unwrap();
		assert_eq!(options.expires_in_seconds, 60);
		assert_eq!(
			config.redirect.validate_options().unwrap().token_parameter_name,
			"session_token"
		);
	}

	#[test]
	fn test_env_overrides_file() {
		let mut file = NamedTempFile::new().unwrap();
		writeln!(
			file,
			r#"
[actions]
namespace = "https://file.example.com"
disable_on_social_login = true

[logging]
level = "debug"
"#
		)
		.unwrap();

		let prefix = "POSTLOGIN_TEST_LIB_OVERRIDE";
		std::env::set_var(format!("{prefix}_NAMESPACE"), "https://env.example.com");
		std::env::set_var(format!("{prefix}_REDIRECT_SECRET"), "0123456789abcdef0123");

		let sources: Vec<Box<dyn ConfigSource>> = vec![
			Box::new(EnvSource::new(prefix)),
			Box::new(TomlSource::new(file.path())),
			Box::new(DefaultsSource),
		];
		let config = load_from_sources(sources, prefix).unwrap();

		assert_eq!(config.actions.namespace(), "https://env.example.com");
		assert!(config.actions.disable_on_social_login());
		assert_eq!(config.logging.level, "debug");
		assert_eq!(config.redirect.secret.unwrap().expose(), "0123456789abcdef0123");
	}

	#[test]
	fn test_secret_file_variant() {
		let mut secret_file = NamedTempFile::new().unwrap();
		writeln!(secret_file, "file-based-signing-secret").unwrap();

		let prefix = "POSTLOGIN_TEST_LIB_SECRET_FILE";
		std::env::set_var(format!("{prefix}_REDIRECT_SECRET_FILE"), secret_file.path());

		let sources: Vec<Box<dyn ConfigSource>> = vec![Box::new(DefaultsSource)];
		let config = load_from_sources(sources, prefix).unwrap();
		assert_eq!(
			config.redirect.secret.unwrap().expose(),
			"file-based-signing-secret"
		);
	}

	proptest! {
		#[test]
		fn namespaces_without_trailing_slash_validate(host in "[a-z]{1,12}") {
			let namespace = format!("https://{host}.example.com");
			let layer = PostloginConfigLayer {
				actions: Some(ActionsConfigLayer {
					namespace: Some(namespace.clone()),
					..Default::default()
				}),
				..Default::default()
			};
			let config = finalize(layer, None).unwrap();
			prop_assert_eq!(config.actions.claim_key("user_id"), format!("{namespace}/user_id"));
		}
	}
}
