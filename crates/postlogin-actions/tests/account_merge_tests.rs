// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end tests: platform JSON in, directives applied to an in-memory store.

use std::sync::Arc;

use postlogin_actions::{
	resolve, InMemoryIdentityStore, LoginPipeline, PipelineError, RecordingSink, ResolveError,
};
use postlogin_core::{
	ActionOptions, Directive, LoginEvent, MultifactorProvider, SetCustomClaims, TokenTarget, User,
	UserId, DEFAULT_NAMESPACE,
};
use serde_json::json;

/// `U1` signed up with a password first, `U2` later through GitHub with the same email.
fn store() -> InMemoryIdentityStore {
	let users: Vec<User> = serde_json::from_value(json!([
		{
			"user_id": "auth0|U1",
			"email": "a@x.com",
			"email_verified": true,
			"identities": [{"provider": "auth0", "user_id": "U1", "connection": "Username-Password-Authentication"}],
			"created_at": "2023-01-01T00:00:00Z"
		},
		{
			"user_id": "github|42",
			"email": "a@x.com",
			"identities": [{"provider": "github", "user_id": 42, "connection": "github", "isSocial": true}],
			"multifactor": ["guardian"],
			"created_at": "2024-06-01T00:00:00Z"
		}
	]))
	.unwrap();
	InMemoryIdentityStore::with_users(users)
}

fn github_login() -> LoginEvent {
	serde_json::from_value(json!({
		"client": {"client_id": "app", "name": "Dashboard"},
		"connection": {"id": "con_gh", "name": "github", "strategy": "github"},
		"request": {"method": "GET"},
		"tenant": {"id": "tenant"},
		"transaction": {"locale": "en"},
		"user": {
			"user_id": "github|42",
			"email": "a@x.com",
			"identities": [{"provider": "github", "user_id": 42, "isSocial": true}],
			"multifactor": ["guardian"]
		}
	}))
	.unwrap()
}

#[tokio::test]
async fn github_account_merges_into_password_account() {
	let store = store();
	let resolution = resolve(&github_login(), &store, &ActionOptions::default())
		.await
		.unwrap();

	assert_eq!(resolution.canonical_user.user_id, UserId::new("auth0|U1"));
	assert_eq!(
		resolution.directives,
		vec![
			Directive::LinkIdentity {
				primary_user_id: UserId::new("auth0|U1"),
				secondary_user_id: UserId::new("github|42"),
				provider: "github".to_string(),
				external_id: "42".to_string(),
			},
			Directive::set_custom_claim(
				TokenTarget::AccessToken,
				format!("{DEFAULT_NAMESPACE}/user_id"),
				"auth0|U1",
			),
		]
	);
}

#[tokio::test]
async fn second_login_after_merge_issues_no_links() {
	let store = Arc::new(store());
	let pipeline = LoginPipeline::new(store.clone(), ActionOptions::default());
	let mut sink = RecordingSink::default();
	pipeline
		.run_and_apply(&github_login(), &mut sink)
		.await
		.unwrap();

	let merged = store.user(&UserId::new("auth0|U1")).await.unwrap();
	assert_eq!(merged.identities.len(), 2);
	assert_eq!(store.users().await.len(), 1);

	let mut event = github_login();
	event.user = merged;
	let outcome = pipeline.run(&event).await.unwrap();
	assert!(outcome.directives.iter().all(|d| !d.is_link()));
	assert_eq!(outcome.canonical_user.user_id, UserId::new("auth0|U1"));
}

#[tokio::test]
async fn applied_claims_and_multifactor_reach_sink() {
	let pipeline = LoginPipeline::new(
		Arc::new(store()),
		ActionOptions {
			namespace: Some("https://example.com".to_string()),
			set_custom_claims: Some(SetCustomClaims::IdToken),
			..Default::default()
		},
	);
	let mut sink = RecordingSink::default();

	let (_, report) = pipeline
		.run_and_apply(&github_login(), &mut sink)
		.await
		.unwrap();

	assert_eq!(report.applied, 3);
	assert_eq!(
		sink.claim(TokenTarget::IdToken, "https://example.com/user_id"),
		Some(&json!("auth0|U1"))
	);
	assert_eq!(sink.effective_multifactor(), Some(MultifactorProvider::Any));
}

#[tokio::test]
async fn unavailable_store_is_not_treated_as_no_duplicates() {
	let store = Arc::new(store());
	store.set_unavailable(true);
	let pipeline = LoginPipeline::new(store, ActionOptions::default());
	let mut sink = RecordingSink::default();

	let err = pipeline
		.run_and_apply(&github_login(), &mut sink)
		.await
		.unwrap_err();

	match err {
		PipelineError::Resolve(e @ ResolveError::Lookup(_)) => assert!(e.is_capability_error()),
		other => panic!("unexpected error: {other}"),
	}
	assert!(sink.applied().is_empty());
}
