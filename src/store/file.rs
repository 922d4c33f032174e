//! Simple file-backed [`ClientStore`] for lightweight single-node deployments.
//!
//! Every write is applied to a copy of the tables, persisted through a temporary file and an
//! atomic rename, and only then published to readers. A failed write leaves both the file and
//! the in-memory view untouched.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	model::ClientKey,
	query::PageRequest,
	store::{
		ChildRows, ClientRow, ClientStore, CollectionKind, StoreError, StoreFuture, StoredClient,
		table::{Tables, TablesSnapshot},
	},
};

/// Persists the client tables to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<Tables>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let tables = Tables::restore(Self::load_snapshot(&path)?)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(tables)) })
	}

	/// Location of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<TablesSnapshot, StoreError> {
		if !path.exists() {
			return Ok(TablesSnapshot::default());
		}

		let metadata = path.metadata().map_err(|e| StoreError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(TablesSnapshot::default());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist(&self, tables: &Tables) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(&tables.snapshot()).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize store snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}

	/// Runs a mutation against a copy of the tables and publishes it once persisted.
	fn commit<T>(
		&self,
		mutate: impl FnOnce(&mut Tables) -> Result<T, StoreError>,
	) -> Result<T, StoreError> {
		let mut guard = self.inner.write();
		let mut staged = guard.clone();
		let value = mutate(&mut staged)?;

		self.persist(&staged)?;
		*guard = staged;

		Ok(value)
	}
}
impl ClientStore for FileStore {
	fn find_by_id(&self, id: ClientKey) -> StoreFuture<'_, Option<ClientRow>> {
		Box::pin(async move { Ok(self.inner.read().find(id)) })
	}

	fn find_full(&self, id: ClientKey) -> StoreFuture<'_, Option<StoredClient>> {
		Box::pin(async move { Ok(self.inner.read().find_full(id)) })
	}

	fn find_key_by_client_id<'a>(
		&'a self,
		client_id: &'a str,
	) -> StoreFuture<'a, Option<ClientKey>> {
		Box::pin(async move { Ok(self.inner.read().key_for(client_id)) })
	}

	fn find_all<'a>(&'a self, page: &'a PageRequest) -> StoreFuture<'a, Vec<ClientRow>> {
		Box::pin(async move { Ok(self.inner.read().page(page)) })
	}

	fn count(&self) -> StoreFuture<'_, u64> {
		Box::pin(async move { Ok(self.inner.read().count()) })
	}

	fn load_children(&self, id: ClientKey, kind: CollectionKind) -> StoreFuture<'_, ChildRows> {
		Box::pin(async move { Ok(self.inner.read().children(id, kind)) })
	}

	fn insert(&self, client: StoredClient) -> StoreFuture<'_, ClientKey> {
		Box::pin(async move { self.commit(|tables| tables.insert(client)) })
	}

	fn update_full(&self, id: ClientKey, client: StoredClient) -> StoreFuture<'_, bool> {
		Box::pin(async move { self.commit(|tables| tables.update_full(id, client)) })
	}

	fn delete_by_ids<'a>(&'a self, ids: &'a [ClientKey]) -> StoreFuture<'a, Vec<ClientKey>> {
		Box::pin(async move { self.commit(|tables| Ok(tables.delete(ids))) })
	}
}
