// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The post-login event snapshot.
//!
//! [`LoginEvent`] is handed to every action of one login transaction. It is read-only:
//! actions borrow it and express every intended change as a
//! [`Directive`](crate::directive::Directive).
//!
//! Field names follow the platform's JSON payload so a host can deserialize the
//! payload directly. `authentication`, `authorization`, `organization` and
//! `resource_server` are absent on some flows and are modelled as `Option`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{AuthenticationMethodName, ConnectionId, TransactionProtocol};
use crate::user::User;

/// Details about the user and the context in which they are logging in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginEvent {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub authentication: Option<AuthenticationInfo>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub authorization: Option<AuthorizationInfo>,
	pub client: Client,
	pub connection: Connection,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub organization: Option<Organization>,
	pub request: Request,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub resource_server: Option<ResourceServer>,
	#[serde(default)]
	pub stats: LoginStats,
	pub tenant: Tenant,
	pub transaction: Transaction,
	pub user: User,
}

impl LoginEvent {
	/// Build a minimal event for `user` logging in through `connection`.
	///
	/// Every other record is empty. Useful for hosts replaying stored users and for tests.
	pub fn new(user: User, connection: Connection) -> Self {
		Self {
			authentication: None,
			authorization: None,
			client: Client::default(),
			connection,
			organization: None,
			request: Request::default(),
			resource_server: None,
			stats: LoginStats::default(),
			tenant: Tenant::default(),
			transaction: Transaction::default(),
			user,
		}
	}

	pub fn with_authentication_method(mut self, method: AuthenticationMethod) -> Self {
		self.authentication
			.get_or_insert_with(AuthenticationInfo::default)
			.methods
			.push(method);
		self
	}
}

/// An authentication method completed during the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationMethod {
	pub name: AuthenticationMethodName,
	pub timestamp: DateTime<Utc>,
}

/// Authentication signals obtained during the login flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationInfo {
	#[serde(default)]
	pub methods: Vec<AuthenticationMethod>,
}

/// Authorization granted to the user that is logging in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationInfo {
	#[serde(default)]
	pub roles: Vec<String>,
}

/// The application the login transaction was initiated from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
	#[serde(default)]
	pub client_id: String,
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub metadata: BTreeMap<String, String>,
}

/// The connection used to authenticate the user.
///
/// For social connections `strategy == name` (e.g. both `google-oauth2`). Enterprise and
/// database connections carry their own name with a strategy such as `waad`, `ad` or `auth0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
	pub id: ConnectionId,
	pub name: String,
	pub strategy: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub metadata: Option<BTreeMap<String, String>>,
}

impl Connection {
	pub fn new(
		id: impl Into<ConnectionId>,
		name: impl Into<String>,
		strategy: impl Into<String>,
	) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			strategy: strategy.into(),
			metadata: None,
		}
	}

	/// A social connection, whose name and strategy coincide.
	pub fn social(id: impl Into<ConnectionId>, strategy: impl Into<String>) -> Self {
		let strategy = strategy.into();
		Self::new(id, strategy.clone(), strategy)
	}
}

/// Geolocation of the request's IP address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoIp {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub city_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub continent_code: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub country_code: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub country_code3: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub country_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub latitude: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub longitude: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub time_zone: Option<String>,
}

/// The request that initiated the transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Request {
	/// Only populated on refresh token and client credential exchange flows.
	#[serde(default)]
	pub body: BTreeMap<String, String>,
	#[serde(default)]
	pub geoip: GeoIp,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub hostname: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ip: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub language: Option<String>,
	#[serde(default)]
	pub method: String,
	#[serde(default)]
	pub query: BTreeMap<String, Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_agent: Option<String>,
}

/// The resource server access is requested for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceServer {
	pub identifier: String,
}

/// Login statistics for the current user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginStats {
	#[serde(default)]
	pub logins_count: u64,
}

/// The tenant the transaction belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
	#[serde(default)]
	pub id: String,
}

/// The organization the user is logging in to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
	pub id: String,
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub display_name: Option<String>,
	#[serde(default)]
	pub metadata: BTreeMap<String, String>,
}

/// Details about the current transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
	#[serde(default)]
	pub acr_values: Vec<String>,
	#[serde(default)]
	pub locale: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub protocol: Option<TransactionProtocol>,
	#[serde(default)]
	pub requested_scopes: Vec<String>,
	#[serde(default)]
	pub ui_locales: Vec<String>,
}
