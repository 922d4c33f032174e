//! Registers a few clients from templates against the in-memory store, edits one section,
//! pages through the registry, and deletes in a batch.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
// self
use oidc_registry::{
	config::RegistryConfig,
	model::{ClientSecret, ClientTemplate},
	query::{PageQuery, SortField, SortSpec},
	registry::{ClientRegistry, CreateClient},
	section::{AuthenticatePatch, Section},
	store::MemoryStore,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = RegistryConfig::builder().default_page_size(2).build()?;
	let registry = ClientRegistry::with_config(Arc::new(MemoryStore::default()), config)?;
	let spa = registry
		.create(CreateClient::new(ClientTemplate::SinglePageApp, "spa1", "Storefront SPA"))
		.await?;
	let machine = registry
		.create(CreateClient::new(ClientTemplate::Machine, "billing-job", "Billing job"))
		.await?;
	let tv = registry
		.create_json(
			br#"{"template": "device", "client_id": "living-room-tv", "client_name": "TV"}"#,
		)
		.await?;

	for client in [&spa, &machine, &tv] {
		println!(
			"created {} as #{} ({:?})",
			client.client_id, client.id, client.allowed_grant_types
		);
	}

	registry
		.edit_json(
			Section::Basic.as_str(),
			spa.id,
			br#"{
				"redirect_uris": ["https://shop.example.com/callback"],
				"allowed_scopes": ["openid", "profile"]
			}"#,
		)
		.await?;

	let (plaintext, secret) = ClientSecret::generate();
	let view = registry
		.edit(machine.id, AuthenticatePatch {
			client_secrets: Some(vec![secret.with_description("issued by demo")]),
			..Default::default()
		}
		.into())
		.await?;

	println!(
		"issued a {}-char secret; authenticate view: {}",
		plaintext.len(),
		serde_json::to_string(&view)?
	);

	let mut query = PageQuery::first().sorted_by(SortSpec::asc(SortField::ClientId));

	loop {
		let page = registry.list(&query).await?;

		for item in &page.items {
			println!("  {:>3}  {:<16} {}", item.id, item.client_id.as_str(), item.client_name);
		}

		query.skip += page.items.len();

		if page.items.is_empty() || query.skip as u64 >= page.total {
			break;
		}
	}

	let outcome = registry.delete_str(&format!("{},{},404", machine.id, tv.id)).await?;

	println!("deleted {:?}, skipped {:?}", outcome.deleted, outcome.skipped);

	let remaining = registry.get_view(spa.id).await?;

	println!("{}", serde_json::to_string_pretty(&remaining)?);

	Ok(())
}
