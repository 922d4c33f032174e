//! Conversion between the typed client aggregate and its storage rows.
//!
//! Rows coming back from storage are trusted only as far as their shape: anything the domain
//! types reject (bad URLs, unknown grant names or codes, misrouted collections) becomes a
//! [`MapError`], which the registry reports as an internal failure.

// self
use crate::{
	_prelude::*,
	model::{
		AccessTokenType, ClientClaim, ClientConfig, ClientId, ClientSecret, ClientSummary,
		GrantType, RefreshTokenUsage, SecretValue, TokenExpiration,
	},
	store::{ChildRows, ClaimRow, ClientRow, CollectionKind, PropertyRow, SecretRow, StoredClient},
};

/// Stored data that cannot be represented by the domain model.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum MapError {
	/// Stored `client_id` fails identifier validation.
	#[error("Stored client_id `{value}` is invalid.")]
	InvalidClientId {
		/// Stored value.
		value: String,
	},
	/// Stored URI column or row does not parse.
	#[error("Stored {field} value `{value}` is not a valid URL.")]
	InvalidUrl {
		/// Column or collection name.
		field: &'static str,
		/// Stored value.
		value: String,
	},
	/// Stored grant type name is unknown.
	#[error("Stored grant type `{value}` is unknown.")]
	UnknownGrantType {
		/// Stored value.
		value: String,
	},
	/// Stored enumeration code is out of range.
	#[error("Stored {field} code {code} is unknown.")]
	UnknownCode {
		/// Column name.
		field: &'static str,
		/// Stored code.
		code: i32,
	},
	/// A collection load returned rows of the wrong kind.
	#[error("Expected {expected} rows but storage returned {actual}.")]
	UnexpectedCollection {
		/// Requested kind.
		expected: CollectionKind,
		/// Returned kind.
		actual: CollectionKind,
	},
	/// A collection was missing from the assembled set.
	#[error("Collection {kind} is missing.")]
	MissingCollection {
		/// Missing kind.
		kind: CollectionKind,
	},
}

/// Produces the full storage image of a client: the base row and all nine collections.
pub fn to_stored(client: &ClientConfig) -> StoredClient {
	let row = ClientRow {
		id: client.id,
		client_id: client.client_id.as_str().to_owned(),
		client_name: client.client_name.clone(),
		description: client.description.clone(),
		enabled: client.enabled,
		protocol_type: client.protocol_type.clone(),
		require_pkce: client.require_pkce,
		allow_plain_text_pkce: client.allow_plain_text_pkce,
		allow_offline_access: client.allow_offline_access,
		allow_access_tokens_via_browser: client.allow_access_tokens_via_browser,
		require_client_secret: client.require_client_secret,
		front_channel_logout_uri: client.front_channel_logout_uri.as_ref().map(Url::to_string),
		front_channel_logout_session_required: client.front_channel_logout_session_required,
		back_channel_logout_uri: client.back_channel_logout_uri.as_ref().map(Url::to_string),
		back_channel_logout_session_required: client.back_channel_logout_session_required,
		enable_local_login: client.enable_local_login,
		user_sso_lifetime: client.user_sso_lifetime,
		identity_token_lifetime: client.identity_token_lifetime,
		access_token_lifetime: client.access_token_lifetime,
		authorization_code_lifetime: client.authorization_code_lifetime,
		absolute_refresh_token_lifetime: client.absolute_refresh_token_lifetime,
		sliding_refresh_token_lifetime: client.sliding_refresh_token_lifetime,
		refresh_token_usage: client.refresh_token_usage.code(),
		refresh_token_expiration: client.refresh_token_expiration.code(),
		update_access_token_claims_on_refresh: client.update_access_token_claims_on_refresh,
		access_token_type: client.access_token_type.code(),
		include_jwt_id: client.include_jwt_id,
		always_send_client_claims: client.always_send_client_claims,
		always_include_user_claims_in_id_token: client.always_include_user_claims_in_id_token,
		client_claims_prefix: client.client_claims_prefix.clone(),
		pair_wise_subject_salt: client.pair_wise_subject_salt.clone(),
		require_consent: client.require_consent,
		allow_remember_consent: client.allow_remember_consent,
		consent_lifetime: client.consent_lifetime,
		client_uri: client.client_uri.as_ref().map(Url::to_string),
		logo_uri: client.logo_uri.as_ref().map(Url::to_string),
		user_code_type: client.user_code_type.clone(),
		device_code_lifetime: client.device_code_lifetime,
		created: client.created,
		updated: client.updated,
	};
	let children = CollectionKind::ALL.into_iter().map(|kind| child_rows(client, kind)).collect();

	StoredClient { row, children }
}

/// Assembles a client from its base row and one row set per [`CollectionKind`].
///
/// `children` must hold exactly the nine collections in [`CollectionKind::ALL`] order.
pub fn assemble(row: ClientRow, children: Vec<ChildRows>) -> Result<ClientConfig, MapError> {
	let mut client = base(row)?;
	let mut children = children.into_iter();

	for expected in CollectionKind::ALL {
		let rows = children.next().ok_or(MapError::MissingCollection { kind: expected })?;

		if rows.kind() != expected {
			return Err(MapError::UnexpectedCollection { expected, actual: rows.kind() });
		}

		attach(&mut client, rows)?;
	}

	Ok(client)
}

/// Builds the listing projection from a base row.
pub fn summary(row: ClientRow) -> Result<ClientSummary, MapError> {
	Ok(ClientSummary {
		id: row.id,
		client_id: client_id(row.client_id)?,
		client_name: row.client_name,
		description: row.description,
		enabled: row.enabled,
		protocol_type: row.protocol_type,
		created: row.created,
	})
}

fn child_rows(client: &ClientConfig, kind: CollectionKind) -> ChildRows {
	fn url_rows(set: &BTreeSet<Url>) -> Vec<String> {
		set.iter().map(Url::to_string).collect()
	}

	match kind {
		CollectionKind::Secrets => ChildRows::Secrets(
			client
				.client_secrets
				.iter()
				.map(|secret| SecretRow {
					secret_type: secret.secret_type.clone(),
					value: secret.value.expose().to_owned(),
					description: secret.description.clone(),
					expiration: secret.expiration,
					created: secret.created,
				})
				.collect(),
		),
		CollectionKind::GrantTypes => ChildRows::GrantTypes(
			client.allowed_grant_types.iter().map(|grant| grant.as_str().to_owned()).collect(),
		),
		CollectionKind::RedirectUris => ChildRows::RedirectUris(url_rows(&client.redirect_uris)),
		CollectionKind::PostLogoutRedirectUris =>
			ChildRows::PostLogoutRedirectUris(url_rows(&client.post_logout_redirect_uris)),
		CollectionKind::Scopes => ChildRows::Scopes(client.allowed_scopes.iter().cloned().collect()),
		CollectionKind::IdpRestrictions => ChildRows::IdpRestrictions(
			client.identity_provider_restrictions.iter().cloned().collect(),
		),
		CollectionKind::Claims => ChildRows::Claims(
			client
				.claims
				.iter()
				.map(|claim| ClaimRow {
					claim_type: claim.claim_type.clone(),
					value: claim.value.clone(),
				})
				.collect(),
		),
		CollectionKind::CorsOrigins =>
			ChildRows::CorsOrigins(client.allowed_cors_origins.iter().cloned().collect()),
		CollectionKind::Properties => ChildRows::Properties(
			client
				.properties
				.iter()
				.map(|(key, value)| PropertyRow { key: key.clone(), value: value.clone() })
				.collect(),
		),
	}
}

fn base(row: ClientRow) -> Result<ClientConfig, MapError> {
	Ok(ClientConfig {
		id: row.id,
		client_id: client_id(row.client_id)?,
		client_name: row.client_name,
		description: row.description,
		enabled: row.enabled,
		protocol_type: row.protocol_type,
		allowed_grant_types: BTreeSet::new(),
		require_pkce: row.require_pkce,
		allow_plain_text_pkce: row.allow_plain_text_pkce,
		redirect_uris: BTreeSet::new(),
		allowed_scopes: BTreeSet::new(),
		allow_offline_access: row.allow_offline_access,
		allow_access_tokens_via_browser: row.allow_access_tokens_via_browser,
		allowed_cors_origins: BTreeSet::new(),
		properties: BTreeMap::new(),
		require_client_secret: row.require_client_secret,
		client_secrets: Vec::new(),
		post_logout_redirect_uris: BTreeSet::new(),
		front_channel_logout_uri: optional_url(
			"front_channel_logout_uri",
			row.front_channel_logout_uri,
		)?,
		front_channel_logout_session_required: row.front_channel_logout_session_required,
		back_channel_logout_uri: optional_url("back_channel_logout_uri", row.back_channel_logout_uri)?,
		back_channel_logout_session_required: row.back_channel_logout_session_required,
		enable_local_login: row.enable_local_login,
		identity_provider_restrictions: BTreeSet::new(),
		user_sso_lifetime: row.user_sso_lifetime,
		identity_token_lifetime: row.identity_token_lifetime,
		access_token_lifetime: row.access_token_lifetime,
		authorization_code_lifetime: row.authorization_code_lifetime,
		absolute_refresh_token_lifetime: row.absolute_refresh_token_lifetime,
		sliding_refresh_token_lifetime: row.sliding_refresh_token_lifetime,
		refresh_token_usage: RefreshTokenUsage::from_code(row.refresh_token_usage).ok_or(
			MapError::UnknownCode { field: "refresh_token_usage", code: row.refresh_token_usage },
		)?,
		refresh_token_expiration: TokenExpiration::from_code(row.refresh_token_expiration)
			.ok_or(MapError::UnknownCode {
				field: "refresh_token_expiration",
				code: row.refresh_token_expiration,
			})?,
		update_access_token_claims_on_refresh: row.update_access_token_claims_on_refresh,
		access_token_type: AccessTokenType::from_code(row.access_token_type).ok_or(
			MapError::UnknownCode { field: "access_token_type", code: row.access_token_type },
		)?,
		include_jwt_id: row.include_jwt_id,
		always_send_client_claims: row.always_send_client_claims,
		always_include_user_claims_in_id_token: row.always_include_user_claims_in_id_token,
		client_claims_prefix: row.client_claims_prefix,
		pair_wise_subject_salt: row.pair_wise_subject_salt,
		claims: BTreeSet::new(),
		require_consent: row.require_consent,
		allow_remember_consent: row.allow_remember_consent,
		consent_lifetime: row.consent_lifetime,
		client_uri: optional_url("client_uri", row.client_uri)?,
		logo_uri: optional_url("logo_uri", row.logo_uri)?,
		user_code_type: row.user_code_type,
		device_code_lifetime: row.device_code_lifetime,
		created: row.created,
		updated: row.updated,
	})
}

fn attach(client: &mut ClientConfig, rows: ChildRows) -> Result<(), MapError> {
	match rows {
		ChildRows::Secrets(rows) =>
			client.client_secrets = rows
				.into_iter()
				.map(|row| ClientSecret {
					secret_type: row.secret_type,
					value: SecretValue::new(row.value),
					description: row.description,
					expiration: row.expiration,
					created: row.created,
				})
				.collect(),
		ChildRows::GrantTypes(rows) =>
			client.allowed_grant_types = rows
				.into_iter()
				.map(|value| {
					value.parse::<GrantType>().map_err(|_| MapError::UnknownGrantType { value })
				})
				.collect::<Result<_, _>>()?,
		ChildRows::RedirectUris(rows) => client.redirect_uris = urls("redirect_uris", rows)?,
		ChildRows::PostLogoutRedirectUris(rows) =>
			client.post_logout_redirect_uris = urls("post_logout_redirect_uris", rows)?,
		ChildRows::Scopes(rows) => client.allowed_scopes = rows.into_iter().collect(),
		ChildRows::IdpRestrictions(rows) =>
			client.identity_provider_restrictions = rows.into_iter().collect(),
		ChildRows::Claims(rows) =>
			client.claims =
				rows.into_iter().map(|row| ClientClaim::new(row.claim_type, row.value)).collect(),
		ChildRows::CorsOrigins(rows) => client.allowed_cors_origins = rows.into_iter().collect(),
		ChildRows::Properties(rows) =>
			client.properties = rows.into_iter().map(|row| (row.key, row.value)).collect(),
	}

	Ok(())
}

fn client_id(value: String) -> Result<ClientId, MapError> {
	ClientId::new(&value).map_err(|_| MapError::InvalidClientId { value })
}

fn url(field: &'static str, value: String) -> Result<Url, MapError> {
	Url::parse(&value).map_err(|_| MapError::InvalidUrl { field, value })
}

fn optional_url(field: &'static str, value: Option<String>) -> Result<Option<Url>, MapError> {
	value.map(|value| url(field, value)).transpose()
}

fn urls(field: &'static str, rows: Vec<String>) -> Result<BTreeSet<Url>, MapError> {
	rows.into_iter().map(|value| url(field, value)).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::model::{ClientKey, ClientTemplate};

	fn sample() -> ClientConfig {
		let mut client = ClientConfig::draft(
			ClientId::new("spa").expect("Client id fixture should be valid."),
			"Single page app",
			"oidc",
		);

		ClientTemplate::SinglePageApp.apply(&mut client);
		client.id = ClientKey(7);
		client.redirect_uris.insert(
			Url::parse("https://app.example.com/callback").expect("Redirect fixture should parse."),
		);
		client.allowed_scopes.extend(["openid".to_owned(), "profile".to_owned()]);
		client.claims.insert(ClientClaim::new("tier", "gold"));
		client.properties.insert("team".into(), "web".into());
		client.client_secrets.push(ClientSecret::shared("s3cret").with_description("primary"));
		client.logo_uri =
			Some(Url::parse("https://cdn.example.com/logo.png").expect("Logo fixture should parse."));
		client.access_token_type = AccessTokenType::Reference;

		client
	}

	#[test]
	fn stored_image_reassembles_to_the_same_client() {
		let client = sample();
		let stored = to_stored(&client);

		assert_eq!(
			stored.children.iter().map(ChildRows::kind).collect::<Vec<_>>(),
			CollectionKind::ALL
		);
		assert_eq!(stored.row.access_token_type, AccessTokenType::Reference.code());

		let assembled =
			assemble(stored.row, stored.children).expect("Stored image should reassemble.");

		assert_eq!(assembled, client);
	}

	#[test]
	fn misrouted_collections_are_rejected() {
		let stored = to_stored(&sample());
		let mut children = stored.children;

		children.swap(0, 1);

		let err = assemble(stored.row.clone(), children).expect_err("Swapped kinds must fail.");

		assert_eq!(err, MapError::UnexpectedCollection {
			expected: CollectionKind::Secrets,
			actual: CollectionKind::GrantTypes,
		});

		let err = assemble(stored.row, Vec::new()).expect_err("Missing kinds must fail.");

		assert_eq!(err, MapError::MissingCollection { kind: CollectionKind::Secrets });
	}

	#[test]
	fn corrupt_rows_are_reported() {
		let mut stored = to_stored(&sample());

		stored.row.refresh_token_usage = 9;

		assert!(matches!(
			assemble(stored.row.clone(), stored.children.clone()),
			Err(MapError::UnknownCode { field: "refresh_token_usage", code: 9 })
		));

		stored.row.refresh_token_usage = 0;
		stored.children[1] = ChildRows::GrantTypes(vec!["teleport".into()]);

		assert!(matches!(
			assemble(stored.row.clone(), stored.children.clone()),
			Err(MapError::UnknownGrantType { .. })
		));

		stored.row.client_id = "has space".into();

		assert!(matches!(summary(stored.row), Err(MapError::InvalidClientId { .. })));
	}
}
