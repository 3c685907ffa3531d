// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Login-type predicates over a [`LoginEvent`].
//!
//! All predicates are pure and total over any deserialized event.

use crate::event::LoginEvent;
use crate::types::AuthenticationMethodName;

/// Strategy of the platform's built-in username/password database.
pub const DATABASE_STRATEGY: &str = "auth0";

/// Returns true for a username/password login against the built-in database.
pub fn is_regular_login(event: &LoginEvent) -> bool {
	event.connection.strategy == DATABASE_STRATEGY
}

/// Returns true for a social login.
///
/// Social connections are named after their strategy (`github`, `google-oauth2`),
/// while enterprise and database connections carry a custom name.
pub fn is_social_login(event: &LoginEvent) -> bool {
	event.connection.strategy == event.connection.name
}

/// Returns true if the user has at least one multifactor enrollment.
pub fn is_multifactor_configured(event: &LoginEvent) -> bool {
	!event.user.multifactor.is_empty()
}

/// Returns true if `method` appears in the session's authentication history.
///
/// Events without an `authentication` section have no history.
pub fn has_completed_method(event: &LoginEvent, method: AuthenticationMethodName) -> bool {
	event
		.authentication
		.as_ref()
		.map(|auth| auth.methods.iter().any(|m| m.name == method))
		.unwrap_or(false)
}

/// Returns true if the user already completed a second factor in this session.
pub fn has_completed_multifactor(event: &LoginEvent) -> bool {
	has_completed_method(event, AuthenticationMethodName::Mfa)
}
