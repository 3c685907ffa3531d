// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use postlogin_core::SetCustomClaims;
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::PostloginConfigLayer;
use crate::sections::{ActionsConfigLayer, LogFormat, LoggingConfigLayer, RedirectConfigLayer};

/// Default prefix for environment variables.
pub const ENV_PREFIX: &str = "POSTLOGIN";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<PostloginConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<PostloginConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(PostloginConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is skipped.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/postlogin/config.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<PostloginConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(PostloginConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: PostloginConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: `<PREFIX>_<FIELD>`, e.g. `POSTLOGIN_NAMESPACE`.
pub struct EnvSource {
	prefix: String,
}

impl EnvSource {
	pub fn new(prefix: impl Into<String>) -> Self {
		Self {
			prefix: prefix.into(),
		}
	}

	fn key(&self, field: &str) -> String {
		format!("{}_{field}", self.prefix)
	}

	fn load_actions(&self) -> Result<ActionsConfigLayer, ConfigError> {
		let set_custom_claims = match env_var(&self.key("SET_CUSTOM_CLAIMS")) {
			Some(v) => Some(SetCustomClaims::parse(&v).ok_or_else(|| {
				ConfigError::InvalidValue {
					key: self.key("SET_CUSTOM_CLAIMS"),
					message: format!("expected access_token, id_token or false, got '{v}'"),
				}
			})?),
			None => None,
		};

		Ok(ActionsConfigLayer {
			namespace: env_var(&self.key("NAMESPACE")),
			set_custom_claims,
			disable_on_social_login: env_bool(&self.key("DISABLE_ON_SOCIAL_LOGIN")),
			allow_remember_browser: env_bool(&self.key("ALLOW_REMEMBER_BROWSER")),
		})
	}

	fn load_logging(&self) -> Result<LoggingConfigLayer, ConfigError> {
		let format = match env_var(&self.key("LOG_FORMAT")) {
			Some(v) => Some(LogFormat::parse(&v).ok_or_else(|| ConfigError::InvalidValue {
				key: self.key("LOG_FORMAT"),
				message: format!("expected pretty, compact or json, got '{v}'"),
			})?),
			None => None,
		};

		Ok(LoggingConfigLayer {
			level: env_var(&self.key("LOG_LEVEL")),
			format,
		})
	}

	fn load_redirect(&self) -> Result<RedirectConfigLayer, ConfigError> {
		Ok(RedirectConfigLayer {
			token_expiry_seconds: env_u64(&self.key("REDIRECT_TOKEN_EXPIRY_SECONDS"))?,
			token_parameter: env_var(&self.key("REDIRECT_TOKEN_PARAMETER")),
		})
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new(ENV_PREFIX)
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<PostloginConfigLayer, ConfigError> {
		debug!(prefix = %self.prefix, "loading environment variables");
		Ok(PostloginConfigLayer {
			actions: Some(self.load_actions()?),
			logging: Some(self.load_logging()?),
			redirect: Some(self.load_redirect()?),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Option<bool> {
	env_var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn env_u64(name: &str) -> Result<Option<u64>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid u64 value '{v}'"),
		}),
		None => Ok(None),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use tempfile::NamedTempFile;

	#[test]
	fn test_precedence_order() {
		assert!(Precedence::Defaults < Precedence::ConfigFile);
		assert!(Precedence::ConfigFile < Precedence::Environment);
	}

	#[test]
	fn test_missing_toml_file_is_empty_layer() {
		let layer = TomlSource::new("/nonexistent/postlogin.toml").load().unwrap();
		assert!(layer.actions.is_none());
		assert!(layer.logging.is_none());
	}

	#[test]
	fn test_toml_source_parses_sections() {
		let mut file = NamedTempFile::new().unwrap();
		writeln!(
			file,
			r#"
[actions]
namespace = "https://claims.example.com"
set_custom_claims = "id_token"

[logging]
format = "json"
"#
		)
		.unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		let actions = layer.actions.unwrap();
		assert_eq!(actions.namespace.as_deref(), Some("https://claims.example.com"));
		assert_eq!(actions.set_custom_claims, Some(SetCustomClaims::IdToken));
		assert_eq!(layer.logging.unwrap().format, Some(LogFormat::Json));
	}

	#[test]
	fn test_invalid_toml_is_reported_with_path() {
		let mut file = NamedTempFile::new().unwrap();
		writeln!(file, "[actions\nnamespace = ").unwrap();

		let err = TomlSource::new(file.path()).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
	}

	#[test]
	fn test_env_source_reads_prefixed_vars() {
		let source = EnvSource::new("POSTLOGIN_TEST_SOURCES_READ");
		std::env::set_var("POSTLOGIN_TEST_SOURCES_READ_NAMESPACE", "https://env.example.com");
		std::env::set_var("POSTLOGIN_TEST_SOURCES_READ_DISABLE_ON_SOCIAL_LOGIN", "1");
		std::env::set_var("POSTLOGIN_TEST_SOURCES_READ_SET_CUSTOM_CLAIMS", "false");

		let layer = source.load().unwrap();
		let actions = layer.actions.unwrap();
		assert_eq!(actions.namespace.as_deref(), Some("https://env.example.com"));
		assert_eq!(actions.disable_on_social_login, Some(true));
		assert_eq!(actions.set_custom_claims, Some(SetCustomClaims::Disabled));
		assert_eq!(actions.allow_remember_browser, None);
	}

	#[test]
	fn test_env_source_reads_redirect_settings() {
		let source = EnvSource::new("POSTLOGIN_TEST_SOURCES_REDIRECT");
		std::env::set_var("POSTLOGIN_TEST_SOURCES_REDIRECT_REDIRECT_TOKEN_EXPIRY_SECONDS", "300");
		std::env::set_var("POSTLOGIN_TEST_SOURCES_REDIRECT_REDIRECT_TOKEN_PARAMETER", "state_token");

		let redirect = source.load().unwrap().redirect.unwrap();
		assert_eq!(redirect.token_expiry_seconds, Some(300));
		assert_eq!(redirect.token_parameter.as_deref(), Some("state_token"));
	}

	#[test]
	fn test_env_source_rejects_unknown_log_format() {
		let source = EnvSource::new("POSTLOGIN_TEST_SOURCES_FORMAT");
		std::env::set_var("POSTLOGIN_TEST_SOURCES_FORMAT_LOG_FORMAT", "xml");

		let err = source.load().unwrap_err();
		assert!(matches!(err, ConfigError::InvalidValue { .. }));
	}
}
