// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory identity store.
//!
//! Users are kept in insertion order, which stands in for creation order, so
//! [`IdentityStore::get_users_by_email`] honours the earliest-created-first contract.
//! Linking moves every identity of the secondary user into the primary user and removes
//! the secondary record, the way the platform's account linking behaves.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use postlogin_core::{Identity, IdentityStore, LinkIdentityRequest, StoreError, User, UserId};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
	users: RwLock<Vec<User>>,
	unavailable: AtomicBool,
}

impl InMemoryIdentityStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a store holding `users`, oldest first.
	pub fn with_users(users: Vec<User>) -> Self {
		Self {
			users: RwLock::new(users),
			unavailable: AtomicBool::new(false),
		}
	}

	pub async fn user(&self, user_id: &UserId) -> Option<User> {
		self.users
			.read()
			.await
			.iter()
			.find(|u| &u.user_id == user_id)
			.cloned()
	}

	/// Snapshot of every user, oldest first.
	pub async fn users(&self) -> Vec<User> {
		self.users.read().await.clone()
	}

	/// Make every call fail with [`StoreError::Unavailable`].
	pub fn set_unavailable(&self, unavailable: bool) {
		self.unavailable.store(unavailable, Ordering::SeqCst);
	}

	fn check_available(&self) -> Result<(), StoreError> {
		if self.unavailable.load(Ordering::SeqCst) {
			return Err(StoreError::Unavailable("in-memory store marked unavailable".to_string()));
		}
		Ok(())
	}
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
	async fn get_users_by_email(&self, email: &str) -> Result<Vec<User>, StoreError> {
		self.check_available()?;
		let users = self.users.read().await;
		Ok(users
			.iter()
			.filter(|u| {
				u.email
					.as_deref()
					.map(|e| e.eq_ignore_ascii_case(email))
					.unwrap_or(false)
			})
			.cloned()
			.collect())
	}

	#[instrument(level = "debug", skip(self, request), fields(provider = %request.provider))]
	async fn link_identity(
		&self,
		primary_user_id: &UserId,
		request: &LinkIdentityRequest,
	) -> Result<Vec<Identity>, StoreError> {
		self.check_available()?;
		let mut users = self.users.write().await;

		let primary_index = users
			.iter()
			.position(|u| &u.user_id == primary_user_id)
			.ok_or_else(|| StoreError::UserNotFound(primary_user_id.clone()))?;

		if users[primary_index].owns_identity(&request.provider, &request.external_id) {
			debug!("identity already owned by primary user");
			return Ok(users[primary_index].identities.clone());
		}

		let secondary_index = users
			.iter()
			.position(|u| u.owns_identity(&request.provider, &request.external_id))
			.ok_or_else(|| StoreError::IdentityNotFound {
				provider: request.provider.clone(),
				external_id: request.external_id.clone(),
			})?;

		let secondary = users.remove(secondary_index);
		let primary_index = if secondary_index < primary_index {
			primary_index - 1
		} else {
			primary_index
		};

		let primary = &mut users[primary_index];
		primary.identities.extend(secondary.identities);
		debug!(
			secondary_user_id = %secondary.user_id,
			identities = primary.identities.len(),
			"identity linked"
		);
		Ok(primary.identities.clone())
	}
}
