mod common;

// std
use std::{env, fs, process, sync::Arc};
// self
use common::Fault;
use oidc_registry::{
	error::{Error, ErrorKind},
	model::{ClientSecret, ClientTemplate},
	registry::ClientRegistry,
	section::{AuthenticatePatch, ClientView},
	store::{CollectionKind, FileStore},
	time::OffsetDateTime,
};

#[tokio::test]
async fn failed_collection_load_fails_the_whole_read() {
	let (registry, store) = common::memory_registry();
	let created = common::create(&registry, ClientTemplate::Hybrid, "web").await;

	for kind in CollectionKind::ALL {
		let faulty = common::faulty_registry(&store, Fault::FailChildren(kind));
		let err = faulty.get(created.id).await.expect_err("Failed load must fail the read.");

		assert_eq!(err.kind(), ErrorKind::Failure, "{kind} failure should be internal");
		assert!(faulty.get_view(created.id).await.is_err());
	}

	assert_eq!(registry.get(created.id).await.expect("Healthy store should load."), created);
}

#[tokio::test]
async fn misrouted_collections_are_internal_failures() {
	let (registry, store) = common::memory_registry();
	let created = common::create(&registry, ClientTemplate::Native, "app").await;
	let faulty = common::faulty_registry(&store, Fault::MisrouteChildren(CollectionKind::Claims));
	let err = faulty.get(created.id).await.expect_err("Wrong collection kind must fail.");

	assert!(matches!(err, Error::Failure { .. }));
	assert_eq!(err.to_string(), "Internal registry failure.");
	assert_eq!(err.kind().http_status(), 500);
}

#[tokio::test]
async fn edit_through_a_broken_read_writes_nothing() {
	let (registry, store) = common::memory_registry();
	let created = common::create(&registry, ClientTemplate::Hybrid, "portal").await;
	let faulty = common::faulty_registry(&store, Fault::FailChildren(CollectionKind::Secrets));

	faulty
		.edit_json("token", created.id, br#"{"access_token_lifetime": 60}"#)
		.await
		.expect_err("Edit must fail when the read fails.");

	assert_eq!(registry.get(created.id).await.expect("Client should load."), created);
}

#[tokio::test]
async fn concurrent_delete_never_tears_a_read() {
	let (registry, store) = common::memory_registry();
	let created = common::create(&registry, ClientTemplate::Machine, "batch").await;
	let racing = common::faulty_registry(&store, Fault::DeleteAfterRead);
	let loaded = racing.get(created.id).await.expect("Read before the delete should succeed.");

	assert_eq!(loaded, created);
	assert_eq!(loaded.allowed_grant_types.len(), 2);
	assert!(registry.get(created.id).await.expect_err("Client should be gone.").is_not_found());
}

#[tokio::test]
async fn edit_racing_a_delete_does_not_resurrect_the_client() {
	let (registry, store) = common::memory_registry();
	let created = common::create(&registry, ClientTemplate::Hybrid, "kiosk").await;
	let racing = common::faulty_registry(&store, Fault::DeleteAfterRead);
	let err = racing
		.edit_json("basic", created.id, br#"{"client_name": "Kiosk"}"#)
		.await
		.expect_err("Edit of a deleted client must fail.");

	let gone = registry.get(created.id).await.expect_err("Client should stay deleted.");

	assert!(err.is_not_found());
	assert!(gone.is_not_found());
}

#[tokio::test]
async fn client_view_splits_every_section() {
	let (registry, _) = common::memory_registry();
	let created = common::create(&registry, ClientTemplate::Machine, "reporting").await;
	let view = registry.get_view(created.id).await.expect("Client view should load.");

	assert_eq!(view, ClientView::from_config(&created));
	assert_eq!(view.basic.id, created.id);
	assert_eq!(view.basic.client_id, created.client_id);
	assert!(view.authenticate.require_client_secret);
	assert_eq!(view.token.client_claims_prefix, "client_");
	assert!(view.consent.allow_remember_consent);
	assert_eq!(view.device.device_code_lifetime, 300);
	assert!(registry.get_view(created.id.get().saturating_add(1).into()).await.is_err());
}

#[tokio::test]
async fn secrets_survive_persistence_hashed() {
	let (registry, _) = common::memory_registry();
	let created = common::create(&registry, ClientTemplate::Machine, "svc").await;
	let now = OffsetDateTime::now_utc();

	assert!(!created.can_authenticate_at(now));

	let (plaintext, secret) = ClientSecret::generate();

	registry
		.edit(created.id, AuthenticatePatch {
			client_secrets: Some(vec![secret.with_description("primary")]),
			..Default::default()
		}
		.into())
		.await
		.expect("Secret edit should succeed.");

	let loaded = registry.get(created.id).await.expect("Client should load.");
	let stored = &loaded.client_secrets[0];

	assert_ne!(stored.value.expose(), plaintext);
	assert!(stored.matches(&plaintext));
	assert!(!format!("{stored:?}").contains(stored.value.expose()));
	assert!(loaded.can_authenticate_at(now));
}

#[tokio::test]
async fn file_store_round_trips_full_clients() {
	let path = env::temp_dir().join(format!(
		"oidc_registry_assembly_{}_{}.json",
		process::id(),
		OffsetDateTime::now_utc().unix_timestamp_nanos(),
	));
	let store = FileStore::open(&path).expect("File store should open.");
	let registry = ClientRegistry::new(Arc::new(store));
	let created = common::create(&registry, ClientTemplate::SinglePageApp, "spa-file").await;

	registry
		.edit_json(
			"basic",
			created.id,
			br#"{"redirect_uris": ["https://spa.example.com/cb"], "allowed_scopes": ["openid"]}"#,
		)
		.await
		.expect("Basic edit should succeed.");

	let expected = registry.get(created.id).await.expect("Client should load.");

	drop(registry);

	let reopened = ClientRegistry::new(Arc::new(
		FileStore::open(&path).expect("File store should reopen."),
	));

	assert_eq!(reopened.get(created.id).await.expect("Client should reload."), expected);

	fs::remove_file(&path).unwrap_or_else(|e| {
		panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
	});
}
