// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `postlogin`: evaluate the post-login actions against a recorded event.
//!
//! Directives are printed to stdout as JSON; logs go to stderr.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use postlogin_actions::{InMemoryIdentityStore, LoginPipeline, RecordingSink};
use postlogin_config::{load_config, load_config_with_file, LogFormat, LoggingConfig, PostloginConfig};
use postlogin_core::classify::{
	has_completed_multifactor, is_multifactor_configured, is_regular_login, is_social_login,
};
use postlogin_core::{LoginEvent, User};
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "postlogin")]
#[command(about = "Identity merge and multifactor gating for post-login events")]
#[command(version)]
struct Args {
	/// Config file (defaults to /etc/postlogin/config.toml)
	#[arg(long, global = true, env = "POSTLOGIN_CONFIG")]
	config: Option<PathBuf>,

	/// Log filter, overrides the configured level
	#[arg(long, global = true)]
	log_level: Option<String>,

	/// Emit logs as JSON
	#[arg(long, global = true)]
	json_logs: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Evaluate both actions for a login event
	Run {
		/// Login event JSON as delivered by the platform
		#[arg(long)]
		event: PathBuf,

		/// JSON array of users backing the identity store
		#[arg(long)]
		users: PathBuf,

		/// Apply the directives to the in-memory store and a recording sink
		#[arg(long)]
		apply: bool,
	},

	/// Print how a login event is classified
	Classify {
		#[arg(long)]
		event: PathBuf,
	},

	/// Print the resolved configuration
	Config,
}

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();

	let config = match &args.config {
		Some(path) => load_config_with_file(path),
		None => load_config(),
	}
	.context("failed to load configuration")?;

	let mut logging = config.logging.clone();
	if let Some(level) = &args.log_level {
		logging.level = level.clone();
	}
	if args.json_logs {
		logging.format = LogFormat::Json;
	}
	init_tracing(&logging);

	match args.command {
		Command::Run {
			event,
			users,
			apply,
		} => run(&config, &event, &users, apply).await,
		Command::Classify { event } => classify(&event),
		Command::Config => show_config(&config),
	}
}

async fn run(config: &PostloginConfig, event_path: &Path, users_path: &Path, apply: bool) -> Result<()> {
	let event: LoginEvent = read_json(event_path)?;
	let users: Vec<User> = read_json(users_path)?;
	debug!(users = users.len(), "seeding identity store");

	let store = Arc::new(InMemoryIdentityStore::with_users(users));
	let pipeline = LoginPipeline::new(store.clone(), config.actions.clone());

	if !apply {
		let outcome = pipeline.run(&event).await?;
		print_json(&json!({
			"canonical_user_id": outcome.canonical_user.user_id,
			"directives": outcome.directives,
		}))?;
		return Ok(());
	}

	let mut sink = RecordingSink::default();
	let (outcome, report) = pipeline.run_and_apply(&event, &mut sink).await?;
	info!(applied = report.applied, denied = report.denied, "directives applied");

	print_json(&json!({
		"canonical_user_id": outcome.canonical_user.user_id,
		"directives": outcome.directives,
		"applied": report.applied,
		"denied": report.denied,
		"linked_identities": report.linked_identities,
		"effective_multifactor": sink.effective_multifactor(),
		"users": store.users().await,
	}))
}

fn classify(event_path: &Path) -> Result<()> {
	let event: LoginEvent = read_json(event_path)?;
	print_json(&json!({
		"user_id": event.user.user_id,
		"connection_strategy": event.connection.strategy,
		"regular_login": is_regular_login(&event),
		"social_login": is_social_login(&event),
		"multifactor_configured": is_multifactor_configured(&event),
		"multifactor_completed": has_completed_multifactor(&event),
	}))
}

fn show_config(config: &PostloginConfig) -> Result<()> {
	print_json(&json!({
		"actions": {
			"namespace": config.actions.namespace(),
			"set_custom_claims": config.actions.set_custom_claims(),
			"disable_on_social_login": config.actions.disable_on_social_login(),
			"allow_remember_browser": config.actions.allow_remember_browser(),
		},
		"logging": {
			"level": config.logging.level,
			"format": config.logging.format.to_string(),
		},
		"redirect": {
			"secret": config.redirect.secret.as_ref().map(|s| s.to_string()),
			"token_expiry_seconds": config.redirect.token_expiry_seconds,
			"token_parameter": config.redirect.token_parameter,
		},
	}))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
	let content = std::fs::read_to_string(path)
		.with_context(|| format!("failed to read {}", path.display()))?;
	serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

fn print_json(value: &serde_json::Value) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(filter_directive(&logging.level)));

	match logging.format {
		LogFormat::Json => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().json().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Compact => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().compact().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Pretty => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().with_writer(std::io::stderr))
				.init();
		}
	}
}

/// A bare level applies to the workspace crates only; full directives pass through.
fn filter_directive(level: &str) -> String {
	if level.contains('=') || level.contains(',') {
		level.to_string()
	} else {
		format!("postlogin={level},postlogin_actions={level},postlogin_config={level},postlogin_core={level}")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bare_level_targets_workspace_crates() {
		let directive = filter_directive("debug");
		assert!(directive.contains("postlogin_actions=debug"));
		assert!(directive.contains("postlogin_config=debug"));
	}

	#[test]
	fn full_directive_passes_through() {
		assert_eq!(filter_directive("postlogin_actions=trace"), "postlogin_actions=trace");
	}

	#[test]
	fn args_parse_run_command() {
		let args = Args::try_parse_from([
			"postlogin",
			"--json-logs",
			"run",
			"--event",
			"event.json",
			"--users",
			"users.json",
			"--apply",
		])
		.unwrap();
		assert!(args.json_logs);
		match args.command {
			Command::Run { apply, .. } => assert!(apply),
			other => panic!("unexpected command: {other:?}"),
		}
	}
}
