//! Listing and full-record retrieval.

// self
use crate::{
	_prelude::*,
	mapper,
	model::{ClientConfig, ClientKey, ClientSummary},
	obs::OpKind,
	query::{PageQuery, Paged},
	registry::{self, ClientRegistry},
	section::ClientView,
	store::StoredClient,
};

impl ClientRegistry {
	/// Returns one page of client summaries plus the unfiltered total.
	///
	/// Only base rows are read; sub-collections are never loaded for listings. The total comes
	/// from a separate count so callers can render page numbers even for an empty page.
	pub async fn list(&self, query: &PageQuery) -> Result<Paged<ClientSummary>> {
		registry::observe(OpKind::List, "list", async move {
			let page = query.resolve(&self.config);
			let rows = self.store.find_all(&page).await?;
			let total = self.store.count().await?;
			let items = rows.into_iter().map(mapper::summary).collect::<Result<Vec<_>, _>>()?;

			Ok(Paged { items, total })
		})
		.await
	}

	/// Loads the fully assembled client.
	///
	/// Fails with [`Error::NotFound`] when the key does not resolve. The base row and every
	/// sub-collection come from one store read, and any failure in that read fails the whole
	/// call; a partially assembled client is never returned.
	pub async fn get(&self, id: ClientKey) -> Result<ClientConfig> {
		registry::observe(OpKind::Get, "get", self.load(id)).await
	}

	/// Loads the client rendered as its five section views.
	pub async fn get_view(&self, id: ClientKey) -> Result<ClientView> {
		registry::observe(OpKind::Get, "get_view", async move {
			let client = self.load(id).await?;

			Ok(ClientView::from_config(&client))
		})
		.await
	}

	pub(crate) async fn load(&self, id: ClientKey) -> Result<ClientConfig> {
		let StoredClient { row, children } =
			self.store.find_full(id).await?.ok_or(Error::NotFound { id })?;

		Ok(mapper::assemble(row, children)?)
	}
}
