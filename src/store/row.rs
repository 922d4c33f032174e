//! Storage representation of the client aggregate.
//!
//! Rows hold plain scalars (strings, integers, storage codes) the way a relational schema
//! would; [`mapper`](crate::mapper) owns the conversion to and from the typed domain model.

// self
use crate::{_prelude::*, model::ClientKey};

/// Base row of a client: every scalar column, no collections.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRow {
	/// Surrogate key; assigned by the store on insert.
	pub id: ClientKey,
	/// Unique `client_id` column.
	pub client_id: String,
	/// Display name.
	pub client_name: String,
	/// Optional description.
	pub description: Option<String>,
	/// Enabled flag.
	pub enabled: bool,
	/// Protocol type.
	pub protocol_type: String,
	/// PKCE required flag.
	pub require_pkce: bool,
	/// Plain PKCE allowed flag.
	pub allow_plain_text_pkce: bool,
	/// Offline access flag.
	pub allow_offline_access: bool,
	/// Browser access tokens flag.
	pub allow_access_tokens_via_browser: bool,
	/// Client secret required flag.
	pub require_client_secret: bool,
	/// Front-channel logout URI.
	pub front_channel_logout_uri: Option<String>,
	/// Front-channel logout session flag.
	pub front_channel_logout_session_required: bool,
	/// Back-channel logout URI.
	pub back_channel_logout_uri: Option<String>,
	/// Back-channel logout session flag.
	pub back_channel_logout_session_required: bool,
	/// Local login flag.
	pub enable_local_login: bool,
	/// SSO lifetime in seconds.
	pub user_sso_lifetime: Option<u32>,
	/// Identity token lifetime in seconds.
	pub identity_token_lifetime: u32,
	/// Access token lifetime in seconds.
	pub access_token_lifetime: u32,
	/// Authorization code lifetime in seconds.
	pub authorization_code_lifetime: u32,
	/// Absolute refresh token lifetime in seconds.
	pub absolute_refresh_token_lifetime: u32,
	/// Sliding refresh token lifetime in seconds.
	pub sliding_refresh_token_lifetime: u32,
	/// Refresh token usage code.
	pub refresh_token_usage: i32,
	/// Refresh token expiration code.
	pub refresh_token_expiration: i32,
	/// Claims-on-refresh flag.
	pub update_access_token_claims_on_refresh: bool,
	/// Access token type code.
	pub access_token_type: i32,
	/// JWT id flag.
	pub include_jwt_id: bool,
	/// Always send client claims flag.
	pub always_send_client_claims: bool,
	/// User claims in identity token flag.
	pub always_include_user_claims_in_id_token: bool,
	/// Client claim prefix.
	pub client_claims_prefix: String,
	/// Pairwise subject salt.
	pub pair_wise_subject_salt: Option<String>,
	/// Consent required flag.
	pub require_consent: bool,
	/// Remember consent flag.
	pub allow_remember_consent: bool,
	/// Consent lifetime in seconds.
	pub consent_lifetime: Option<u32>,
	/// Client home page URI.
	pub client_uri: Option<String>,
	/// Logo URI.
	pub logo_uri: Option<String>,
	/// Device flow user code type.
	pub user_code_type: Option<String>,
	/// Device code lifetime in seconds.
	pub device_code_lifetime: u32,
	/// Creation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created: OffsetDateTime,
	/// Last edit instant.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub updated: Option<OffsetDateTime>,
}

/// The nine owned sub-collections of a client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
	/// Client secrets.
	Secrets,
	/// Allowed grant types.
	GrantTypes,
	/// Redirect URIs.
	RedirectUris,
	/// Post-logout redirect URIs.
	PostLogoutRedirectUris,
	/// Allowed scopes.
	Scopes,
	/// Identity provider restrictions.
	IdpRestrictions,
	/// Client claims.
	Claims,
	/// Allowed CORS origins.
	CorsOrigins,
	/// Extension properties.
	Properties,
}
impl CollectionKind {
	/// Every collection, in assembly order.
	pub const ALL: [CollectionKind; 9] = [
		CollectionKind::Secrets,
		CollectionKind::GrantTypes,
		CollectionKind::RedirectUris,
		CollectionKind::PostLogoutRedirectUris,
		CollectionKind::Scopes,
		CollectionKind::IdpRestrictions,
		CollectionKind::Claims,
		CollectionKind::CorsOrigins,
		CollectionKind::Properties,
	];

	/// Returns a stable label suitable for logs and errors.
	pub const fn as_str(self) -> &'static str {
		match self {
			CollectionKind::Secrets => "secrets",
			CollectionKind::GrantTypes => "grant_types",
			CollectionKind::RedirectUris => "redirect_uris",
			CollectionKind::PostLogoutRedirectUris => "post_logout_redirect_uris",
			CollectionKind::Scopes => "scopes",
			CollectionKind::IdpRestrictions => "idp_restrictions",
			CollectionKind::Claims => "claims",
			CollectionKind::CorsOrigins => "cors_origins",
			CollectionKind::Properties => "properties",
		}
	}
}
impl Display for CollectionKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Stored client secret.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRow {
	/// Secret type.
	pub secret_type: String,
	/// Stored (hashed) value.
	pub value: String,
	/// Optional description.
	pub description: Option<String>,
	/// Expiration instant.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub expiration: Option<OffsetDateTime>,
	/// Creation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created: OffsetDateTime,
}

/// Stored client claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRow {
	/// Claim type.
	pub claim_type: String,
	/// Claim value.
	pub value: String,
}

/// Stored extension property.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRow {
	/// Property key.
	pub key: String,
	/// Property value.
	pub value: String,
}

/// Rows of one owned sub-collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum ChildRows {
	/// Client secrets.
	Secrets(Vec<SecretRow>),
	/// Grant type names.
	GrantTypes(Vec<String>),
	/// Redirect URIs.
	RedirectUris(Vec<String>),
	/// Post-logout redirect URIs.
	PostLogoutRedirectUris(Vec<String>),
	/// Scope names.
	Scopes(Vec<String>),
	/// Identity provider names.
	IdpRestrictions(Vec<String>),
	/// Claims.
	Claims(Vec<ClaimRow>),
	/// CORS origins.
	CorsOrigins(Vec<String>),
	/// Extension properties.
	Properties(Vec<PropertyRow>),
}
impl ChildRows {
	/// Empty collection of the given kind.
	pub fn empty(kind: CollectionKind) -> Self {
		match kind {
			CollectionKind::Secrets => ChildRows::Secrets(Vec::new()),
			CollectionKind::GrantTypes => ChildRows::GrantTypes(Vec::new()),
			CollectionKind::RedirectUris => ChildRows::RedirectUris(Vec::new()),
			CollectionKind::PostLogoutRedirectUris => ChildRows::PostLogoutRedirectUris(Vec::new()),
			CollectionKind::Scopes => ChildRows::Scopes(Vec::new()),
			CollectionKind::IdpRestrictions => ChildRows::IdpRestrictions(Vec::new()),
			CollectionKind::Claims => ChildRows::Claims(Vec::new()),
			CollectionKind::CorsOrigins => ChildRows::CorsOrigins(Vec::new()),
			CollectionKind::Properties => ChildRows::Properties(Vec::new()),
		}
	}

	/// Collection kind of the rows.
	pub fn kind(&self) -> CollectionKind {
		match self {
			ChildRows::Secrets(_) => CollectionKind::Secrets,
			ChildRows::GrantTypes(_) => CollectionKind::GrantTypes,
			ChildRows::RedirectUris(_) => CollectionKind::RedirectUris,
			ChildRows::PostLogoutRedirectUris(_) => CollectionKind::PostLogoutRedirectUris,
			ChildRows::Scopes(_) => CollectionKind::Scopes,
			ChildRows::IdpRestrictions(_) => CollectionKind::IdpRestrictions,
			ChildRows::Claims(_) => CollectionKind::Claims,
			ChildRows::CorsOrigins(_) => CollectionKind::CorsOrigins,
			ChildRows::Properties(_) => CollectionKind::Properties,
		}
	}

	/// Number of rows.
	pub fn len(&self) -> usize {
		match self {
			ChildRows::Secrets(rows) => rows.len(),
			ChildRows::Claims(rows) => rows.len(),
			ChildRows::Properties(rows) => rows.len(),
			ChildRows::GrantTypes(rows) |
			ChildRows::RedirectUris(rows) |
			ChildRows::PostLogoutRedirectUris(rows) |
			ChildRows::Scopes(rows) |
			ChildRows::IdpRestrictions(rows) |
			ChildRows::CorsOrigins(rows) => rows.len(),
		}
	}

	/// Returns `true` when the collection has no rows.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Complete storage image of one client: base row plus its sub-collections.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredClient {
	/// Base row.
	pub row: ClientRow,
	/// Sub-collections; kinds missing from the list are stored empty.
	pub children: Vec<ChildRows>,
}
