//! Table engine shared by the built-in stores.

// std
use std::cmp::Ordering;
// self
use crate::{
	_prelude::*,
	model::ClientKey,
	query::{PageRequest, SortDirection, SortField},
	store::{ChildRows, ClientRow, CollectionKind, StoreError, StoredClient},
};

const CLIENT_ID_CONSTRAINT: &str = "client_id";

/// Base rows, owned child rows, and the `client_id` unique index.
#[derive(Clone, Debug, Default)]
pub(crate) struct Tables {
	next_key: u64,
	clients: BTreeMap<ClientKey, ClientRow>,
	children: HashMap<(ClientKey, CollectionKind), ChildRows>,
	client_ids: HashMap<String, ClientKey>,
}
impl Tables {
	pub(crate) fn find(&self, id: ClientKey) -> Option<ClientRow> {
		self.clients.get(&id).cloned()
	}

	pub(crate) fn find_full(&self, id: ClientKey) -> Option<StoredClient> {
		let row = self.find(id)?;
		let children =
			CollectionKind::ALL.into_iter().map(|kind| self.children(id, kind)).collect();

		Some(StoredClient { row, children })
	}

	pub(crate) fn key_for(&self, client_id: &str) -> Option<ClientKey> {
		self.client_ids.get(client_id).copied()
	}

	pub(crate) fn count(&self) -> u64 {
		self.clients.len() as u64
	}

	pub(crate) fn page(&self, page: &PageRequest) -> Vec<ClientRow> {
		let mut rows = self.clients.values().collect::<Vec<_>>();

		rows.sort_by(|a, b| {
			let ordering = compare(a, b, page.sort.field).then_with(|| a.id.cmp(&b.id));

			match page.sort.direction {
				SortDirection::Asc => ordering,
				SortDirection::Desc => ordering.reverse(),
			}
		});

		rows.into_iter().skip(page.skip).take(page.limit).cloned().collect()
	}

	pub(crate) fn children(&self, id: ClientKey, kind: CollectionKind) -> ChildRows {
		self.children.get(&(id, kind)).cloned().unwrap_or_else(|| ChildRows::empty(kind))
	}

	pub(crate) fn insert(&mut self, client: StoredClient) -> Result<ClientKey, StoreError> {
		let StoredClient { mut row, children } = client;

		if self.client_ids.contains_key(&row.client_id) {
			return Err(unique_violation(row.client_id));
		}

		self.next_key += 1;

		let id = ClientKey(self.next_key);

		row.id = id;
		self.client_ids.insert(row.client_id.clone(), id);
		self.clients.insert(id, row);
		self.replace_children(id, children);

		Ok(id)
	}

	pub(crate) fn update_full(
		&mut self,
		id: ClientKey,
		client: StoredClient,
	) -> Result<bool, StoreError> {
		let StoredClient { mut row, children } = client;
		let Some(previous) = self.clients.get(&id) else {
			return Ok(false);
		};

		if self.client_ids.get(&row.client_id).is_some_and(|owner| *owner != id) {
			return Err(unique_violation(row.client_id));
		}

		let previous_client_id = previous.client_id.clone();

		row.id = id;
		self.client_ids.remove(&previous_client_id);
		self.client_ids.insert(row.client_id.clone(), id);
		self.clients.insert(id, row);
		self.replace_children(id, children);

		Ok(true)
	}

	pub(crate) fn delete(&mut self, ids: &[ClientKey]) -> Vec<ClientKey> {
		let mut removed = Vec::new();

		for id in ids {
			let Some(row) = self.clients.remove(id) else {
				continue;
			};

			self.client_ids.remove(&row.client_id);

			for kind in CollectionKind::ALL {
				self.children.remove(&(*id, kind));
			}

			removed.push(*id);
		}

		removed
	}

	pub(crate) fn snapshot(&self) -> TablesSnapshot {
		let mut children = self
			.children
			.iter()
			.filter(|(_, rows)| !rows.is_empty())
			.map(|((client, _), rows)| ChildEntry { client: *client, rows: rows.clone() })
			.collect::<Vec<_>>();

		children.sort_by_key(|entry| (entry.client, entry.rows.kind()));

		TablesSnapshot {
			next_key: self.next_key,
			clients: self.clients.values().cloned().collect(),
			children,
		}
	}

	pub(crate) fn restore(snapshot: TablesSnapshot) -> Result<Self, StoreError> {
		let mut tables = Self { next_key: snapshot.next_key, ..Default::default() };

		for row in snapshot.clients {
			if tables.client_ids.insert(row.client_id.clone(), row.id).is_some() {
				return Err(StoreError::Serialization {
					message: format!("Snapshot holds duplicate client_id `{}`", row.client_id),
				});
			}

			tables.next_key = tables.next_key.max(row.id.get());
			tables.clients.insert(row.id, row);
		}
		for entry in snapshot.children {
			if !tables.clients.contains_key(&entry.client) {
				return Err(StoreError::Serialization {
					message: format!("Snapshot holds rows for unknown client {}", entry.client),
				});
			}

			tables.children.insert((entry.client, entry.rows.kind()), entry.rows);
		}

		Ok(tables)
	}

	fn replace_children(&mut self, id: ClientKey, children: Vec<ChildRows>) {
		for kind in CollectionKind::ALL {
			self.children.remove(&(id, kind));
		}
		for rows in children {
			self.children.insert((id, rows.kind()), rows);
		}
	}
}

/// Serializable image of [`Tables`]; the unique index is rebuilt on restore.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct TablesSnapshot {
	next_key: u64,
	clients: Vec<ClientRow>,
	children: Vec<ChildEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChildEntry {
	client: ClientKey,
	rows: ChildRows,
}

fn compare(a: &ClientRow, b: &ClientRow, field: SortField) -> Ordering {
	match field {
		SortField::Id => a.id.cmp(&b.id),
		SortField::ClientId => a.client_id.cmp(&b.client_id),
		SortField::ClientName => a.client_name.cmp(&b.client_name),
		SortField::Enabled => a.enabled.cmp(&b.enabled),
		SortField::Created => a.created.cmp(&b.created),
	}
}

fn unique_violation(value: String) -> StoreError {
	StoreError::UniqueViolation { constraint: CLIENT_ID_CONSTRAINT.into(), value }
}
