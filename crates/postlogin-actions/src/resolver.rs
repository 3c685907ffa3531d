// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity resolution: merge users sharing an email into one canonical user.
//!
//! [`resolve`] looks up every user with the login's email address. When two or more
//! come back, the first one is canonical and every other user gets a
//! [`Directive::LinkIdentity`] moving its first-listed identity into the canonical
//! user. A single `user_id` claim naming the canonical user follows, unless claims
//! are disabled.
//!
//! The lookup is the only external call. The resolver never links anything itself;
//! the host applies the returned directives (see [`crate::apply`]).

use postlogin_core::{ActionOptions, Directive, IdentityStore, LoginEvent, User, UserId};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::{ResolveError, Result};

/// Claim name carrying the canonical user id.
pub const USER_ID_CLAIM: &str = "user_id";

/// Outcome of identity resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
	/// The user that remains after merging.
	pub canonical_user: User,
	/// Link directives in candidate order, followed by the claim directive.
	pub directives: Vec<Directive>,
}

impl Resolution {
	/// Number of link directives issued.
	pub fn link_count(&self) -> usize {
		self.directives.iter().filter(|d| d.is_link()).count()
	}

	/// Returns true if the canonical user differs from the user logging in.
	pub fn switched_user(&self, event: &LoginEvent) -> bool {
		self.canonical_user.user_id != event.user.user_id
	}
}

/// Resolve the canonical user for `event` and issue the merge directives.
///
/// # Errors
///
/// - [`ResolveError::Lookup`] if the store lookup fails. The error is not retried.
/// - [`ResolveError::CandidateWithoutIdentity`] if a duplicate user lists no identity.
///
/// An event without an email is not an error: no lookup is made and the event's user
/// is canonical.
#[instrument(
    level = "debug",
    skip(event, store, options),
    fields(
        user_id = %event.user.user_id,
        connection = %event.connection.name,
    )
)]
pub async fn resolve<S>(event: &LoginEvent, store: &S, options: &ActionOptions) -> Result<Resolution>
where
	S: IdentityStore + ?Sized,
{
	let mut directives = Vec::new();

	let canonical_user = match event.user.email.as_deref().filter(|e| !e.is_empty()) {
		None => {
			debug!("login event has no email, skipping duplicate lookup");
			event.user.clone()
		}
		Some(email) => {
			let candidates = store.get_users_by_email(email).await.map_err(|e| {
				warn!(error = %e, "duplicate lookup failed");
				ResolveError::Lookup(e)
			})?;
			debug!(candidates = candidates.len(), "duplicate lookup complete");
			merge_candidates(&event.user, candidates, &mut directives)?
		}
	};

	if let Some(claim) = user_id_claim(&canonical_user.user_id, options) {
		directives.push(claim);
	}

	debug!(
		canonical_user_id = %canonical_user.user_id,
		links = directives.iter().filter(|d| d.is_link()).count(),
		"identity resolution complete"
	);

	Ok(Resolution {
		canonical_user,
		directives,
	})
}

/// Pick the canonical user from `candidates` and push one link directive per other user.
fn merge_candidates(
	current: &User,
	candidates: Vec<User>,
	directives: &mut Vec<Directive>,
) -> Result<User> {
	if candidates.len() < 2 {
		return Ok(current.clone());
	}

	let mut candidates = candidates.into_iter();
	let Some(primary) = candidates.next() else {
		return Ok(current.clone());
	};

	for candidate in candidates.filter(|c| c.user_id != primary.user_id) {
		let identity = candidate
			.primary_identity()
			.ok_or_else(|| ResolveError::CandidateWithoutIdentity(candidate.user_id.clone()))?;

		directives.push(Directive::LinkIdentity {
			primary_user_id: primary.user_id.clone(),
			secondary_user_id: candidate.user_id.clone(),
			provider: identity.provider.clone(),
			external_id: identity.external_id.clone(),
		});
	}

	Ok(primary)
}

/// The `<namespace>/user_id` claim, or `None` when claims are disabled.
fn user_id_claim(user_id: &UserId, options: &ActionOptions) -> Option<Directive> {
	let target = options.set_custom_claims().target()?;
	Some(Directive::set_custom_claim(
		target,
		options.claim_key(USER_ID_CLAIM),
		Value::String(user_id.to_string()),
	))
}
