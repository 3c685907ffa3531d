// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Applying directives to the host's capabilities.
//!
//! Directives are applied one at a time, in order. Link directives go to the
//! [`IdentityStore`]; everything else goes to the [`DirectiveSink`]. Application stops
//! at the first failure and nothing is retried, so a failed link after a successful one
//! leaves a partial merge that the host must tolerate.

use postlogin_core::{
	Directive, DirectiveSink, Identity, IdentityStore, LinkIdentityRequest, SinkError,
};
use tracing::{debug, instrument, warn};

use crate::error::ApplyError;

/// Summary of a successful application.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyReport {
	/// Number of directives applied.
	pub applied: usize,
	/// Identity list of the primary user after the last link, if any link was applied.
	pub linked_identities: Option<Vec<Identity>>,
	/// Set when a deny directive was applied; later directives are still delivered.
	pub denied: bool,
}

/// Apply `directives` in order.
#[instrument(level = "debug", skip_all, fields(directives = directives.len()))]
pub async fn apply_directives<K, S>(
	directives: &[Directive],
	sink: &mut K,
	store: &S,
) -> Result<ApplyReport, ApplyError>
where
	K: DirectiveSink + ?Sized,
	S: IdentityStore + ?Sized,
{
	let mut report = ApplyReport::default();

	for (index, directive) in directives.iter().enumerate() {
		let kind = directive.kind();
		let sink_err = |source: SinkError| {
			warn!(index, kind, error = %source, "sink rejected directive");
			ApplyError::Sink {
				index,
				kind,
				source,
			}
		};

		match directive {
			Directive::LinkIdentity {
				primary_user_id,
				provider,
				external_id,
				..
			} => {
				let request = LinkIdentityRequest {
					provider: provider.clone(),
					external_id: external_id.clone(),
				};
				let identities = store
					.link_identity(primary_user_id, &request)
					.await
					.map_err(|source| {
						warn!(index, kind, error = %source, "identity link failed");
						ApplyError::Store {
							index,
							kind,
							source,
						}
					})?;
				report.linked_identities = Some(identities);
			}
			Directive::SetCustomClaim { token, key, value } => {
				sink.set_custom_claim(*token, key, value).map_err(sink_err)?;
			}
			Directive::EnableMultifactor { provider, options } => {
				sink.enable_multifactor(*provider, options).map_err(sink_err)?;
			}
			Directive::Deny { reason } => {
				sink.deny(reason).map_err(sink_err)?;
				report.denied = true;
			}
			Directive::SendRedirect { url, options } => {
				sink.send_redirect(url, options).map_err(sink_err)?;
			}
			Directive::SetAppMetadata { key, value } => {
				sink.set_app_metadata(key, value).map_err(sink_err)?;
			}
			Directive::SetUserMetadata { key, value } => {
				sink.set_user_metadata(key, value).map_err(sink_err)?;
			}
		}

		debug!(index, kind, "directive applied");
		report.applied += 1;
	}

	Ok(report)
}
