// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Multifactor gating policy.
//!
//! [`evaluate_multifactor`] decides, in strict order:
//!
//! 1. **No enrollment**: no directive. A factor the user never enrolled cannot be forced.
//! 2. **Social carve-out**: with `disable_on_social_login` set and a social connection,
//!    the challenge is waived (`enable('none')`).
//! 3. **Otherwise**: any enrolled factor is required (`enable('any')`).
//!
//! The carve-out only ever waives a requirement this policy would have imposed.

use postlogin_core::classify::{is_multifactor_configured, is_social_login};
use postlogin_core::{
	ActionOptions, Directive, EnableMultifactorOptions, LoginEvent, MultifactorProvider,
};
use tracing::{debug, instrument};

/// Evaluate the multifactor policy for `event`.
#[instrument(
    level = "debug",
    skip(event, options),
    fields(
        user_id = %event.user.user_id,
        strategy = %event.connection.strategy,
    )
)]
pub fn evaluate_multifactor(event: &LoginEvent, options: &ActionOptions) -> Option<Directive> {
	if !is_multifactor_configured(event) {
		debug!("no multifactor enrollment, nothing to enforce");
		return None;
	}

	if options.disable_on_social_login() && is_social_login(event) {
		debug!("social login with carve-out enabled, waiving multifactor");
		return Some(disable_multifactor());
	}

	let directive = Directive::enable_multifactor(
		MultifactorProvider::Any,
		EnableMultifactorOptions {
			allow_remember_browser: options.allow_remember_browser(),
		},
	);
	debug!(
		allow_remember_browser = options.allow_remember_browser(),
		"requiring multifactor"
	);
	Some(directive)
}

/// Waive the multifactor challenge for this flow.
pub fn disable_multifactor() -> Directive {
	Directive::disable_multifactor()
}
