//! Batch deletion.

// self
use crate::{
	_prelude::*,
	model::ClientKey,
	obs::OpKind,
	query::ClientKeyList,
	registry::{self, ClientRegistry},
};

/// Result of a batch delete.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
	/// Keys that existed and were removed.
	pub deleted: Vec<ClientKey>,
	/// Requested keys that did not resolve.
	pub skipped: Vec<ClientKey>,
}

impl ClientRegistry {
	/// Deletes every listed client that exists, in one storage commit.
	///
	/// Keys that do not resolve are skipped, not reported as errors.
	pub async fn delete(&self, ids: &ClientKeyList) -> Result<DeleteOutcome> {
		registry::observe(OpKind::Delete, "delete", self.delete_inner(ids)).await
	}

	/// Parses a comma-separated id list (the `DELETE /clients/{ids}` segment) and deletes.
	pub async fn delete_str(&self, ids: &str) -> Result<DeleteOutcome> {
		registry::observe(OpKind::Delete, "delete_str", async move {
			let ids = ids.parse::<ClientKeyList>()?;

			self.delete_inner(&ids).await
		})
		.await
	}

	async fn delete_inner(&self, ids: &ClientKeyList) -> Result<DeleteOutcome> {
		let deleted = self.store.delete_by_ids(ids.as_slice()).await?;
		let skipped =
			ids.as_slice().iter().copied().filter(|id| !deleted.contains(id)).collect::<Vec<_>>();

		Ok(DeleteOutcome { deleted, skipped })
	}
}
