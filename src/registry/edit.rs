//! Section-scoped edits through a read-modify-write-full cycle.

// self
use crate::{
	_prelude::*,
	mapper,
	model::ClientKey,
	obs::OpKind,
	registry::{self, ClientRegistry},
	section::{Section, SectionPatch, SectionView},
};

impl ClientRegistry {
	/// Applies a section patch and returns the updated section view.
	///
	/// The full client is loaded, patched, validated as a whole, and written back with
	/// overwrite semantics: collections carried by the patch replace the stored ones, and
	/// fields of other sections keep their stored values. Concurrent edits are
	/// last-writer-wins.
	pub async fn edit(&self, id: ClientKey, patch: SectionPatch) -> Result<SectionView> {
		registry::observe(OpKind::Edit, "edit", self.edit_inner(id, patch)).await
	}

	/// Parses a section name and JSON body, then applies the edit.
	pub async fn edit_json(
		&self,
		section_name: &str,
		id: ClientKey,
		body: &[u8],
	) -> Result<SectionView> {
		registry::observe(OpKind::Edit, "edit_json", async move {
			let section = section_name.parse::<Section>()?;
			let patch = SectionPatch::from_json(section, body)?;

			self.edit_inner(id, patch).await
		})
		.await
	}

	async fn edit_inner(&self, id: ClientKey, patch: SectionPatch) -> Result<SectionView> {
		let section = patch.section();
		let mut client = self.load(id).await?;
		let previous_client_id = client.client_id.clone();

		patch.apply(&mut client);
		client.updated = Some(OffsetDateTime::now_utc());
		client.validate(self.config.max_client_id_len)?;

		if client.client_id != previous_client_id &&
			self.store
				.find_key_by_client_id(client.client_id.as_str())
				.await?
				.is_some_and(|owner| owner != id)
		{
			return Err(Error::Conflict { client_id: client.client_id.to_string() });
		}
		if !self.store.update_full(id, mapper::to_stored(&client)).await? {
			return Err(Error::NotFound { id });
		}

		Ok(SectionView::project(section, &client))
	}
}
