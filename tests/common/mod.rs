//! Shared fixtures for registry integration tests.

#![allow(dead_code)]

// std
use std::sync::Arc;
// self
use oidc_registry::{
	mapper,
	model::{ClientConfig, ClientId, ClientKey, ClientTemplate},
	query::PageRequest,
	registry::{ClientRegistry, CreateClient},
	store::{
		ChildRows, ClientRow, ClientStore, CollectionKind, MemoryStore, StoreError, StoreFuture,
		StoredClient,
	},
};

/// Registry over a fresh in-memory store; the store handle shares state with the registry.
pub fn memory_registry() -> (ClientRegistry, MemoryStore) {
	let store = MemoryStore::default();

	(ClientRegistry::new(Arc::new(store.clone())), store)
}

/// Registry whose store misbehaves as described by `fault`, over shared in-memory state.
pub fn faulty_registry(store: &MemoryStore, fault: Fault) -> ClientRegistry {
	ClientRegistry::new(Arc::new(FaultyStore { inner: store.clone(), fault }))
}

/// Creates a client through the registry.
pub async fn create(
	registry: &ClientRegistry,
	template: ClientTemplate,
	client_id: &str,
) -> ClientConfig {
	registry
		.create(CreateClient::new(template, client_id, format!("{client_id} app")))
		.await
		.expect("Fixture client should be created.")
}

/// Storage image of a bare draft, ready for direct store calls.
pub fn stored(client_id: &str) -> StoredClient {
	let client = ClientConfig::draft(
		ClientId::new(client_id).expect("Fixture client id should be valid."),
		format!("{client_id} app"),
		"oidc",
	);

	mapper::to_stored(&client)
}

/// Misbehavior injected by [`FaultyStore`].
#[derive(Clone, Copy, Debug)]
pub enum Fault {
	/// Loading this collection fails with a backend error.
	FailChildren(CollectionKind),
	/// Loading this collection returns rows of another kind.
	MisrouteChildren(CollectionKind),
	/// The `client_id` lookup misses, so only the unique index can catch duplicates.
	BlindLookup,
	/// Counting fails with a backend error.
	FailCount,
	/// A concurrent delete lands right after every base-row or full-client read.
	DeleteAfterRead,
}

/// Store wrapper delegating to a [`MemoryStore`] except where a [`Fault`] applies.
#[derive(Clone, Debug)]
pub struct FaultyStore {
	inner: MemoryStore,
	fault: Fault,
}
impl FaultyStore {
	async fn race_delete(&self, id: ClientKey) -> Result<(), StoreError> {
		if let Fault::DeleteAfterRead = self.fault {
			self.inner.delete_by_ids(&[id]).await?;
		}

		Ok(())
	}
}
impl ClientStore for FaultyStore {
	fn find_by_id(&self, id: ClientKey) -> StoreFuture<'_, Option<ClientRow>> {
		Box::pin(async move {
			let row = self.inner.find_by_id(id).await?;

			self.race_delete(id).await?;

			Ok(row)
		})
	}

	fn find_full(&self, id: ClientKey) -> StoreFuture<'_, Option<StoredClient>> {
		Box::pin(async move {
			let Some(mut client) = self.inner.find_full(id).await? else {
				return Ok(None);
			};

			self.race_delete(id).await?;

			for rows in &mut client.children {
				match self.fault {
					Fault::FailChildren(kind) if rows.kind() == kind =>
						return Err(backend(&format!("{kind} table unavailable"))),
					Fault::MisrouteChildren(kind) if rows.kind() == kind =>
						*rows = ChildRows::empty(other_kind(kind)),
					_ => {},
				}
			}

			Ok(Some(client))
		})
	}

	fn find_key_by_client_id<'a>(
		&'a self,
		client_id: &'a str,
	) -> StoreFuture<'a, Option<ClientKey>> {
		match self.fault {
			Fault::BlindLookup => Box::pin(async { Ok(None) }),
			_ => self.inner.find_key_by_client_id(client_id),
		}
	}

	fn find_all<'a>(&'a self, page: &'a PageRequest) -> StoreFuture<'a, Vec<ClientRow>> {
		self.inner.find_all(page)
	}

	fn count(&self) -> StoreFuture<'_, u64> {
		match self.fault {
			Fault::FailCount => Box::pin(async { Err(backend("count timed out")) }),
			_ => self.inner.count(),
		}
	}

	fn load_children(&self, id: ClientKey, kind: CollectionKind) -> StoreFuture<'_, ChildRows> {
		match self.fault {
			Fault::FailChildren(failing) if failing == kind =>
				Box::pin(async move { Err(backend(&format!("{kind} table unavailable"))) }),
			Fault::MisrouteChildren(misrouted) if misrouted == kind =>
				Box::pin(async move { Ok(ChildRows::empty(other_kind(kind))) }),
			_ => self.inner.load_children(id, kind),
		}
	}

	fn insert(&self, client: StoredClient) -> StoreFuture<'_, ClientKey> {
		self.inner.insert(client)
	}

	fn update_full(&self, id: ClientKey, client: StoredClient) -> StoreFuture<'_, bool> {
		self.inner.update_full(id, client)
	}

	fn delete_by_ids<'a>(&'a self, ids: &'a [ClientKey]) -> StoreFuture<'a, Vec<ClientKey>> {
		self.inner.delete_by_ids(ids)
	}
}

fn other_kind(kind: CollectionKind) -> CollectionKind {
	if kind == CollectionKind::Scopes { CollectionKind::Claims } else { CollectionKind::Scopes }
}

fn backend(message: &str) -> StoreError {
	StoreError::Backend { message: message.into() }
}
