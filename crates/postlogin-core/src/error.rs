// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Errors raised by the capabilities a host injects.

use thiserror::Error;

use crate::types::UserId;

/// Errors from the identity store.
#[derive(Debug, Error)]
pub enum StoreError {
	/// The store could not be reached (network failure, timeout, cancellation).
	#[error("identity store unavailable: {0}")]
	Unavailable(String),

	/// The store answered with something that could not be interpreted.
	#[error("malformed identity store response: {0}")]
	MalformedResponse(String),

	#[error("user not found: {0}")]
	UserNotFound(UserId),

	#[error("identity {provider}|{external_id} not found")]
	IdentityNotFound {
		provider: String,
		external_id: String,
	},

	/// The store refused the operation.
	#[error("identity store rejected request: {0}")]
	Rejected(String),
}

/// Errors from the directive sink.
#[derive(Debug, Error)]
pub enum SinkError {
	#[error("directive rejected by host: {0}")]
	Rejected(String),

	#[error("invalid redirect url: {0}")]
	InvalidRedirect(String),
}

/// Errors from the token codec.
#[derive(Debug, Error)]
pub enum TokenError {
	#[error("failed to encode token: {0}")]
	Encode(String),

	#[error("session token parameter '{0}' missing from request")]
	MissingParameter(String),

	#[error("session token invalid: {0}")]
	Invalid(String),

	#[error("session token expired")]
	Expired,
}
