// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the post-login actions.

use postlogin_core::{SinkError, StoreError, TokenError, UserId};
use thiserror::Error;

/// Errors from identity resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
	/// The duplicate lookup failed. This is never reported as "no duplicates".
	#[error("duplicate lookup failed: {0}")]
	Lookup(#[source] StoreError),

	/// A duplicate user lists no identity, so there is nothing to link.
	#[error("candidate user {0} has no identity to link")]
	CandidateWithoutIdentity(UserId),
}

impl ResolveError {
	/// Returns true if the failure came from the identity store rather than the input.
	pub fn is_capability_error(&self) -> bool {
		matches!(self, ResolveError::Lookup(_))
	}
}

/// Errors from applying directives. `index` is the position of the failing directive;
/// every directive before it has been applied.
#[derive(Debug, Error)]
pub enum ApplyError {
	#[error("directive {index} ({kind}) failed in identity store: {source}")]
	Store {
		index: usize,
		kind: &'static str,
		#[source]
		source: StoreError,
	},

	#[error("directive {index} ({kind}) rejected by sink: {source}")]
	Sink {
		index: usize,
		kind: &'static str,
		#[source]
		source: SinkError,
	},
}

impl ApplyError {
	/// Number of directives applied before the failure.
	pub fn applied(&self) -> usize {
		match self {
			ApplyError::Store { index, .. } | ApplyError::Sink { index, .. } => *index,
		}
	}
}

/// Errors from building a redirect.
#[derive(Debug, Error)]
pub enum RedirectError {
	#[error("invalid redirect url '{url}': {source}")]
	InvalidUrl {
		url: String,
		#[source]
		source: url::ParseError,
	},

	#[error("redirect url '{0}' must use https")]
	InsecureUrl(String),

	#[error(transparent)]
	Token(#[from] TokenError),
}

/// Errors from running the whole pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
	#[error(transparent)]
	Resolve(#[from] ResolveError),

	#[error(transparent)]
	Apply(#[from] ApplyError),
}

/// Result type for identity resolution.
pub type Result<T> = std::result::Result<T, ResolveError>;
