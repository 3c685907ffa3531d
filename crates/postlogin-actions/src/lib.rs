// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Post-login actions: identity merging and multifactor gating.
//!
//! Both actions are pure functions over a [`LoginEvent`](postlogin_core::LoginEvent)
//! snapshot. The identity resolver makes a single asynchronous lookup through the
//! injected [`IdentityStore`](postlogin_core::IdentityStore); the multifactor policy
//! makes none. Neither applies anything: they return
//! [`Directive`](postlogin_core::Directive)s for the host.
//!
//! ```no_run
//! use std::sync::Arc;
//! use postlogin_actions::{InMemoryIdentityStore, LoginPipeline, RecordingSink};
//! use postlogin_core::{ActionOptions, LoginEvent};
//!
//! # async fn example(event: LoginEvent) -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryIdentityStore::new());
//! let pipeline = LoginPipeline::new(store, ActionOptions::default());
//!
//! let outcome = pipeline.run(&event).await?;
//! let mut sink = RecordingSink::default();
//! pipeline.apply(&outcome, &mut sink).await?;
//! # Ok(())
//! # }
//! ```

pub mod apply;
pub mod error;
pub mod memory;
pub mod multifactor;
pub mod pipeline;
pub mod redirect;
pub mod resolver;
pub mod sink;

pub use apply::{apply_directives, ApplyReport};
pub use error::{ApplyError, PipelineError, RedirectError, ResolveError};
pub use memory::InMemoryIdentityStore;
pub use multifactor::{disable_multifactor, evaluate_multifactor};
pub use pipeline::{LoginPipeline, PipelineOutcome};
pub use redirect::{redirect, redirect_with_session_token, resume_after_redirect};
pub use resolver::{resolve, Resolution, USER_ID_CLAIM};
pub use sink::RecordingSink;
