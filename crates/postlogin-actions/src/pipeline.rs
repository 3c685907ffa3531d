// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The two actions composed the way a host runs them for one login transaction.
//!
//! [`LoginPipeline::run`] resolves the canonical user, then evaluates the multifactor
//! policy, and returns every directive in that order. [`LoginPipeline::apply`] hands the
//! directives to the host's sink and the pipeline's store. A lookup failure aborts the run
//! before any directive exists, so an unmerged login is never reported as success.

use std::sync::Arc;

use postlogin_core::{ActionOptions, Directive, DirectiveSink, IdentityStore, LoginEvent, User};
use tracing::{info, instrument};

use crate::apply::{apply_directives, ApplyReport};
use crate::error::{PipelineError, ResolveError};
use crate::multifactor::evaluate_multifactor;
use crate::resolver::resolve;

/// Directives produced for one login.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
	pub canonical_user: User,
	pub directives: Vec<Directive>,
}

/// Runs the identity resolver and the multifactor policy against one store.
pub struct LoginPipeline<S: ?Sized> {
	store: Arc<S>,
	options: ActionOptions,
}

impl<S> LoginPipeline<S>
where
	S: IdentityStore + ?Sized,
{
	pub fn new(store: Arc<S>, options: ActionOptions) -> Self {
		Self { store, options }
	}

	/// Produce the directives for `event` without applying them.
	#[instrument(level = "debug", skip_all, fields(user_id = %event.user.user_id))]
	pub async fn run(&self, event: &LoginEvent) -> Result<PipelineOutcome, ResolveError> {
		let resolution = resolve(event, self.store.as_ref(), &self.options).await?;
		let mut directives = resolution.directives;
		directives.extend(evaluate_multifactor(event, &self.options));

		info!(
			canonical_user_id = %resolution.canonical_user.user_id,
			directives = directives.len(),
			"post-login actions evaluated"
		);

		Ok(PipelineOutcome {
			canonical_user: resolution.canonical_user,
			directives,
		})
	}

	/// Apply `outcome` to `sink`, sending links to the pipeline's store.
	pub async fn apply<K>(&self, outcome: &PipelineOutcome, sink: &mut K) -> Result<ApplyReport, PipelineError>
	where
		K: DirectiveSink + ?Sized,
	{
		Ok(apply_directives(&outcome.directives, sink, self.store.as_ref()).await?)
	}

	/// Run and apply in one step.
	pub async fn run_and_apply<K>(
		&self,
		event: &LoginEvent,
		sink: &mut K,
	) -> Result<(PipelineOutcome, ApplyReport), PipelineError>
	where
		K: DirectiveSink + ?Sized,
	{
		let outcome = self.run(event).await?;
		let report = self.apply(&outcome, sink).await?;
		Ok((outcome, report))
	}
}
