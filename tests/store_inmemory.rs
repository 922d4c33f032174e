mod common;

// self
use oidc_registry::{
	model::ClientKey,
	query::{PageRequest, SortField, SortSpec},
	store::{ChildRows, ClientStore, CollectionKind, MemoryStore, StoreError},
};

fn page(sort: SortSpec, skip: usize, limit: usize) -> PageRequest {
	PageRequest { sort, skip, limit }
}

#[tokio::test]
async fn insert_assigns_keys_from_one() {
	let store = MemoryStore::default();
	let first = store.insert(common::stored("a")).await.expect("First insert should succeed.");
	let second = store.insert(common::stored("b")).await.expect("Second insert should succeed.");

	assert_eq!((first, second), (ClientKey(1), ClientKey(2)));

	let row = store
		.find_by_id(second)
		.await
		.expect("Lookup should succeed.")
		.expect("Inserted row should be present.");

	assert_eq!(row.id, second);
	assert_eq!(row.client_id, "b");
	assert_eq!(store.find_by_id(ClientKey::UNASSIGNED).await.expect("Lookup should succeed."), None);
}

#[tokio::test]
async fn unique_index_guards_insert_and_update() {
	let store = MemoryStore::default();
	let a = store.insert(common::stored("a")).await.expect("Insert should succeed.");

	store.insert(common::stored("b")).await.expect("Insert should succeed.");

	let err = store.insert(common::stored("a")).await.expect_err("Duplicate insert must fail.");

	assert_eq!(err, StoreError::UniqueViolation { constraint: "client_id".into(), value: "a".into() });

	let err = store
		.update_full(a, common::stored("b"))
		.await
		.expect_err("Update onto a taken client_id must fail.");

	assert!(matches!(err, StoreError::UniqueViolation { ref value, .. } if value == "b"));
	assert!(store.update_full(a, common::stored("a")).await.expect("Self update should succeed."));
	assert!(
		!store
			.update_full(ClientKey(99), common::stored("z"))
			.await
			.expect("Missing update should not error.")
	);
	assert_eq!(store.count().await.expect("Count should succeed."), 2);
}

#[tokio::test]
async fn children_are_replaced_and_deleted_with_their_client() {
	let store = MemoryStore::default();
	let mut client = common::stored("a");

	client.children = vec![ChildRows::Scopes(vec!["openid".into()])];

	let id = store.insert(client.clone()).await.expect("Insert should succeed.");

	assert_eq!(
		store.load_children(id, CollectionKind::Scopes).await.expect("Load should succeed."),
		ChildRows::Scopes(vec!["openid".into()])
	);
	assert_eq!(
		store.load_children(id, CollectionKind::Claims).await.expect("Load should succeed."),
		ChildRows::empty(CollectionKind::Claims)
	);

	client.children = vec![ChildRows::CorsOrigins(vec!["https://a.example.com".into()])];

	assert!(store.update_full(id, client).await.expect("Update should succeed."));
	assert!(
		store
			.load_children(id, CollectionKind::Scopes)
			.await
			.expect("Load should succeed.")
			.is_empty()
	);

	let full = store
		.find_full(id)
		.await
		.expect("Full read should succeed.")
		.expect("Client should exist.");

	assert_eq!(full.row.client_id, "a");
	assert_eq!(full.children.len(), CollectionKind::ALL.len());
	assert!(full.children.iter().zip(CollectionKind::ALL).all(|(rows, kind)| rows.kind() == kind));
	assert!(full.children.contains(&ChildRows::CorsOrigins(vec!["https://a.example.com".into()])));

	let removed = store.delete_by_ids(&[id, ClientKey(5)]).await.expect("Delete should succeed.");

	assert_eq!(removed, [id]);
	assert!(
		store
			.load_children(id, CollectionKind::CorsOrigins)
			.await
			.expect("Load should succeed.")
			.is_empty()
	);
	assert_eq!(store.find_key_by_client_id("a").await.expect("Lookup should succeed."), None);
	assert_eq!(store.find_full(id).await.expect("Full read should succeed."), None);
}

#[tokio::test]
async fn pages_sort_with_key_tie_breaks() {
	let store = MemoryStore::default();

	for client_id in ["c", "a", "b"] {
		store.insert(common::stored(client_id)).await.expect("Insert should succeed.");
	}

	let by_id = store
		.find_all(&page(SortSpec::default(), 0, 10))
		.await
		.expect("Listing should succeed.");

	assert_eq!(by_id.iter().map(|row| row.client_id.as_str()).collect::<Vec<_>>(), ["c", "a", "b"]);

	let by_client_id = store
		.find_all(&page(SortSpec::desc(SortField::ClientId), 1, 10))
		.await
		.expect("Listing should succeed.");

	assert_eq!(
		by_client_id.iter().map(|row| row.client_id.as_str()).collect::<Vec<_>>(),
		["b", "a"]
	);

	let by_enabled = store
		.find_all(&page(SortSpec::asc(SortField::Enabled), 0, 2))
		.await
		.expect("Listing should succeed.");

	assert_eq!(by_enabled.iter().map(|row| row.id).collect::<Vec<_>>(), [ClientKey(1), ClientKey(2)]);
	assert!(
		store
			.find_all(&page(SortSpec::default(), 0, 0))
			.await
			.expect("Listing should succeed.")
			.is_empty()
	);
}

#[tokio::test]
async fn concurrent_inserts_allow_single_winner() {
	let store = MemoryStore::default();
	let store_a = store.clone();
	let store_b = store.clone();
	let task_a = tokio::spawn(async move { store_a.insert(common::stored("race")).await });
	let task_b = tokio::spawn(async move { store_b.insert(common::stored("race")).await });
	let (outcome_a, outcome_b) = tokio::join!(task_a, task_b);
	let outcomes = [
		outcome_a.expect("Insert task A should not panic."),
		outcome_b.expect("Insert task B should not panic."),
	];
	let successes = outcomes.iter().filter(|outcome| outcome.is_ok()).count();

	assert_eq!(successes, 1, "only one insert should succeed");
	assert!(
		outcomes
			.iter()
			.any(|outcome| matches!(outcome, Err(StoreError::UniqueViolation { .. })))
	);
	assert_eq!(store.count().await.expect("Count should succeed."), 1);
}
