// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for post-login actions.
//!
//! A login pipeline hands each action a read-only [`LoginEvent`] snapshot. Actions never
//! mutate the snapshot or the identity store directly; they return [`Directive`]s which
//! the host applies through the [`DirectiveSink`] and [`IdentityStore`] capabilities.
//!
//! - [`event`]: the login event snapshot and its nested records
//! - [`user`]: user records and linked identities
//! - [`directive`]: side-effect instructions produced by actions
//! - [`options`]: per-call action options and their defaults
//! - [`classify`]: login-type predicates shared by the actions
//! - [`capability`]: traits for the identity store, directive sink and token codec

pub mod capability;
pub mod classify;
pub mod directive;
pub mod error;
pub mod event;
pub mod options;
pub mod secret;
pub mod token;
pub mod types;
pub mod user;

pub use capability::{DirectiveSink, IdentityStore, LinkIdentityRequest, TokenCodec};
pub use directive::{Directive, EnableMultifactorOptions, SendRedirectOptions};
pub use error::{SinkError, StoreError, TokenError};
pub use event::{
	AuthenticationInfo, AuthenticationMethod, AuthorizationInfo, Client, Connection, GeoIp,
	LoginEvent, LoginStats, Organization, Request, ResourceServer, Tenant, Transaction,
};
pub use options::{ActionOptions, SetCustomClaims, DEFAULT_NAMESPACE};
pub use secret::{Secret, SecretString, REDACTED};
pub use token::{TokenCreationOptions, ValidateSessionTokenOptions};
pub use types::{
	AuthenticationMethodName, ConnectionId, MultifactorProvider, TokenTarget, TransactionProtocol,
	UserId,
};
pub use user::{Identity, User};
