//! Template-driven client creation.

// self
use crate::{
	_prelude::*,
	error::ValidationError,
	mapper,
	model::{ClientConfig, ClientId, ClientTemplate},
	obs::OpKind,
	registry::{self, ClientRegistry},
};

/// Body of `POST /clients`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateClient {
	/// Preset applied to the new client; accepts a name or a numeric code.
	pub template: ClientTemplate,
	/// Requested `client_id`.
	pub client_id: String,
	/// Display name.
	pub client_name: String,
}
impl CreateClient {
	/// Creates a request.
	pub fn new(
		template: ClientTemplate,
		client_id: impl Into<String>,
		client_name: impl Into<String>,
	) -> Self {
		Self { template, client_id: client_id.into(), client_name: client_name.into() }
	}

	/// Parses a JSON request body, reporting the failing path on error.
	pub fn from_json(bytes: &[u8]) -> Result<Self, ValidationError> {
		let de = &mut serde_json::Deserializer::from_slice(bytes);

		serde_path_to_error::deserialize(de).map_err(ValidationError::payload)
	}
}

impl ClientRegistry {
	/// Creates a client from a template and returns the persisted record.
	///
	/// Fails with [`Error::Conflict`] when the `client_id` is taken, whether the pre-check or
	/// the store's unique index catches it.
	pub async fn create(&self, request: CreateClient) -> Result<ClientConfig> {
		registry::observe(OpKind::Create, "create", self.create_inner(request)).await
	}

	/// Parses a JSON body and creates the client it describes.
	pub async fn create_json(&self, body: &[u8]) -> Result<ClientConfig> {
		registry::observe(OpKind::Create, "create_json", async move {
			let request = CreateClient::from_json(body)?;

			self.create_inner(request).await
		})
		.await
	}

	async fn create_inner(&self, request: CreateClient) -> Result<ClientConfig> {
		let CreateClient { template, client_id, client_name } = request;
		let client_id = ClientId::new(client_id).map_err(ValidationError::from)?;
		let mut client =
			ClientConfig::draft(client_id, client_name, &self.config.default_protocol_type);

		template.apply(&mut client);
		client.validate(self.config.max_client_id_len)?;

		if self.store.find_key_by_client_id(client.client_id.as_str()).await?.is_some() {
			return Err(Error::Conflict { client_id: client.client_id.to_string() });
		}

		client.id = self.store.insert(mapper::to_stored(&client)).await?;

		Ok(client)
	}
}
