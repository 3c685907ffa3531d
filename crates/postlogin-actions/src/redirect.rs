// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Redirect directives carrying a signed session token.
//!
//! An action that needs input from an external page (consent, profile completion)
//! redirects the browser there with a session token the page can verify, and later
//! validates the token the page sends back to the continue endpoint. Token signing is
//! the host's [`TokenCodec`]; this module validates the target URL and builds the directive.

use postlogin_core::{
	Directive, SendRedirectOptions, TokenCodec, TokenCreationOptions, TokenError,
	ValidateSessionTokenOptions,
};
use serde_json::{Map, Value};
use tracing::{debug, instrument};
use url::Url;

use crate::error::RedirectError;

/// Build a redirect to `url` with extra query parameters.
///
/// The URL must be absolute and use `https`, except for loopback hosts during development.
pub fn redirect(
	url: &str,
	query: impl IntoIterator<Item = (String, String)>,
) -> Result<Directive, RedirectError> {
	let parsed = Url::parse(url).map_err(|source| RedirectError::InvalidUrl {
		url: url.to_string(),
		source,
	})?;

	if parsed.scheme() != "https" && !is_loopback(&parsed) {
		return Err(RedirectError::InsecureUrl(url.to_string()));
	}

	Ok(Directive::SendRedirect {
		url: parsed.to_string(),
		options: SendRedirectOptions {
			query: query.into_iter().collect(),
		},
	})
}

/// Build a redirect to `url` carrying a session token encoded by `codec`.
///
/// The token is sent as query parameter `parameter`, which must match the
/// `token_parameter_name` the continue endpoint validates with.
#[instrument(level = "debug", skip(codec, token), fields(expires_in = token.expires_in_seconds))]
pub fn redirect_with_session_token<C>(
	url: &str,
	codec: &C,
	token: &TokenCreationOptions,
	parameter: &str,
) -> Result<Directive, RedirectError>
where
	C: TokenCodec + ?Sized,
{
	if parameter.is_empty() {
		return Err(RedirectError::Token(TokenError::MissingParameter(
			parameter.to_string(),
		)));
	}
	let encoded = codec.encode_token(token)?;
	debug!("session token encoded");
	redirect(url, [(parameter.to_string(), encoded)])
}

/// Validate the session token returned to the continue endpoint and return its payload.
pub fn resume_after_redirect<C>(
	codec: &C,
	options: &ValidateSessionTokenOptions,
) -> Result<Map<String, Value>, RedirectError>
where
	C: TokenCodec + ?Sized,
{
	Ok(codec.validate_token(options)?)
}

fn is_loopback(url: &Url) -> bool {
	url.scheme() == "http"
		&& matches!(url.host_str(), Some("localhost") | Some("127.0.0.1") | Some("[::1]"))
}
