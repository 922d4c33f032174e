//! Storage contracts and built-in store implementations for client configurations.
//!
//! Stores persist the client aggregate as one base [`ClientRow`] plus one [`ChildRows`]
//! collection per [`CollectionKind`], keyed by the owning client. Every method on
//! [`ClientStore`] is a single storage call: writes are applied atomically, so a cancelled
//! future never exposes a partial write.

pub mod file;
pub mod memory;
pub mod row;

mod table;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use row::*;

// self
use crate::{_prelude::*, model::ClientKey, query::PageRequest};

/// Boxed future returned by every [`ClientStore`] method.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract implemented by client configuration stores.
///
/// Implementations must enforce a unique index on `client_id` for both [`insert`] and
/// [`update_full`], reporting violations as [`StoreError::UniqueViolation`].
///
/// [`insert`]: ClientStore::insert
/// [`update_full`]: ClientStore::update_full
pub trait ClientStore
where
	Self: Send + Sync,
{
	/// Fetches the base row for a key, if present.
	fn find_by_id(&self, id: ClientKey) -> StoreFuture<'_, Option<ClientRow>>;

	/// Fetches the base row and every sub-collection of a client in one consistent read.
	///
	/// Collections come back in [`CollectionKind::ALL`] order; absent ones are empty. A write
	/// racing the call is either fully visible or not visible at all.
	fn find_full(&self, id: ClientKey) -> StoreFuture<'_, Option<StoredClient>>;

	/// Resolves the key currently holding a `client_id`, if any.
	fn find_key_by_client_id<'a>(
		&'a self,
		client_id: &'a str,
	) -> StoreFuture<'a, Option<ClientKey>>;

	/// Returns one sorted page of base rows.
	fn find_all<'a>(&'a self, page: &'a PageRequest) -> StoreFuture<'a, Vec<ClientRow>>;

	/// Counts all stored clients.
	fn count(&self) -> StoreFuture<'_, u64>;

	/// Loads one owned sub-collection; absent collections come back empty.
	fn load_children(&self, id: ClientKey, kind: CollectionKind) -> StoreFuture<'_, ChildRows>;

	/// Inserts a new client and returns the assigned key. The row's own key is ignored.
	fn insert(&self, client: StoredClient) -> StoreFuture<'_, ClientKey>;

	/// Replaces the base row and every sub-collection of an existing client.
	///
	/// Returns `false` when the key does not exist.
	fn update_full(&self, id: ClientKey, client: StoredClient) -> StoreFuture<'_, bool>;

	/// Deletes every listed client that exists, in one commit, and returns the removed keys.
	fn delete_by_ids<'a>(&'a self, ids: &'a [ClientKey]) -> StoreFuture<'a, Vec<ClientKey>>;
}

/// Error type produced by [`ClientStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// A unique constraint rejected the write.
	#[error("Unique constraint `{constraint}` violated by `{value}`.")]
	UniqueViolation {
		/// Constraint name.
		constraint: String,
		/// Offending value.
		value: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn store_error_can_be_serialized() {
		let err = StoreError::UniqueViolation { constraint: "client_id".into(), value: "a".into() };
		let payload = serde_json::to_string(&err).expect("StoreError should serialize to JSON.");
		let round_trip: StoreError =
			serde_json::from_str(&payload).expect("Serialized error should deserialize.");

		assert_eq!(round_trip, err);
		assert_eq!(err.to_string(), "Unique constraint `client_id` violated by `a`.");
	}
}
