//! Thread-safe in-memory [`ClientStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	model::ClientKey,
	query::PageRequest,
	store::{
		ChildRows, ClientRow, ClientStore, CollectionKind, StoreError, StoreFuture, StoredClient,
		table::Tables,
	},
};

type SharedTables = Arc<RwLock<Tables>>;

/// Thread-safe storage backend that keeps client rows in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(SharedTables);
impl MemoryStore {
	fn insert_now(tables: SharedTables, client: StoredClient) -> Result<ClientKey, StoreError> {
		tables.write().insert(client)
	}

	fn update_now(
		tables: SharedTables,
		id: ClientKey,
		client: StoredClient,
	) -> Result<bool, StoreError> {
		tables.write().update_full(id, client)
	}
}
impl ClientStore for MemoryStore {
	fn find_by_id(&self, id: ClientKey) -> StoreFuture<'_, Option<ClientRow>> {
		let tables = self.0.clone();

		Box::pin(async move { Ok(tables.read().find(id)) })
	}

	fn find_full(&self, id: ClientKey) -> StoreFuture<'_, Option<StoredClient>> {
		let tables = self.0.clone();

		Box::pin(async move { Ok(tables.read().find_full(id)) })
	}

	fn find_key_by_client_id<'a>(
		&'a self,
		client_id: &'a str,
	) -> StoreFuture<'a, Option<ClientKey>> {
		let tables = self.0.clone();

		Box::pin(async move { Ok(tables.read().key_for(client_id)) })
	}

	fn find_all<'a>(&'a self, page: &'a PageRequest) -> StoreFuture<'a, Vec<ClientRow>> {
		let tables = self.0.clone();

		Box::pin(async move { Ok(tables.read().page(page)) })
	}

	fn count(&self) -> StoreFuture<'_, u64> {
		let tables = self.0.clone();

		Box::pin(async move { Ok(tables.read().count()) })
	}

	fn load_children(&self, id: ClientKey, kind: CollectionKind) -> StoreFuture<'_, ChildRows> {
		let tables = self.0.clone();

		Box::pin(async move { Ok(tables.read().children(id, kind)) })
	}

	fn insert(&self, client: StoredClient) -> StoreFuture<'_, ClientKey> {
		let tables = self.0.clone();

		Box::pin(async move { Self::insert_now(tables, client) })
	}

	fn update_full(&self, id: ClientKey, client: StoredClient) -> StoreFuture<'_, bool> {
		let tables = self.0.clone();

		Box::pin(async move { Self::update_now(tables, id, client) })
	}

	fn delete_by_ids<'a>(&'a self, ids: &'a [ClientKey]) -> StoreFuture<'a, Vec<ClientKey>> {
		let tables = self.0.clone();

		Box::pin(async move { Ok(tables.write().delete(ids)) })
	}
}
