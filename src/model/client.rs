//! The client aggregate, its value records, and write-time validation.

// self
use crate::{
	_prelude::*,
	error::ValidationError,
	model::{ClientId, ClientKey, ClientSecret, GrantType},
};

const CLIENT_NAME_MAX_LEN: usize = 200;

/// How refresh tokens behave when they are redeemed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshTokenUsage {
	/// The same refresh token may be redeemed repeatedly.
	ReUse,
	/// Every redemption issues a new refresh token.
	#[default]
	OneTimeOnly,
}
impl RefreshTokenUsage {
	/// Storage code.
	pub const fn code(self) -> i32 {
		match self {
			RefreshTokenUsage::ReUse => 0,
			RefreshTokenUsage::OneTimeOnly => 1,
		}
	}

	/// Decodes a storage code.
	pub const fn from_code(code: i32) -> Option<Self> {
		match code {
			0 => Some(RefreshTokenUsage::ReUse),
			1 => Some(RefreshTokenUsage::OneTimeOnly),
			_ => None,
		}
	}
}

/// Refresh token expiration model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenExpiration {
	/// Lifetime is extended on each use, bounded by the absolute lifetime.
	Sliding,
	/// Lifetime is fixed at issuance.
	#[default]
	Absolute,
}
impl TokenExpiration {
	/// Storage code.
	pub const fn code(self) -> i32 {
		match self {
			TokenExpiration::Sliding => 0,
			TokenExpiration::Absolute => 1,
		}
	}

	/// Decodes a storage code.
	pub const fn from_code(code: i32) -> Option<Self> {
		match code {
			0 => Some(TokenExpiration::Sliding),
			1 => Some(TokenExpiration::Absolute),
			_ => None,
		}
	}
}

/// Format of issued access tokens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessTokenType {
	/// Self-contained JWT.
	#[default]
	Jwt,
	/// Opaque reference token resolved via introspection.
	Reference,
}
impl AccessTokenType {
	/// Storage code.
	pub const fn code(self) -> i32 {
		match self {
			AccessTokenType::Jwt => 0,
			AccessTokenType::Reference => 1,
		}
	}

	/// Decodes a storage code.
	pub const fn from_code(code: i32) -> Option<Self> {
		match code {
			0 => Some(AccessTokenType::Jwt),
			1 => Some(AccessTokenType::Reference),
			_ => None,
		}
	}
}

/// Claim stamped into tokens issued to the client.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClientClaim {
	/// Claim type, e.g. `role`.
	#[serde(rename = "type")]
	pub claim_type: String,
	/// Claim value.
	pub value: String,
}
impl ClientClaim {
	/// Creates a claim.
	pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
		Self { claim_type: claim_type.into(), value: value.into() }
	}
}

/// Listing projection: identity and display fields only, no sub-collections.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSummary {
	/// Surrogate key.
	pub id: ClientKey,
	/// OAuth client identifier.
	pub client_id: ClientId,
	/// Display name.
	pub client_name: String,
	/// Optional description.
	pub description: Option<String>,
	/// Whether the client may authenticate.
	pub enabled: bool,
	/// Protocol, normally `oidc`.
	pub protocol_type: String,
	/// Creation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created: OffsetDateTime,
}

/// Fully assembled client configuration aggregate.
///
/// Field groups follow the editable sections in [`Section`](crate::section::Section); the key
/// and the audit stamps belong to no section and are never touched by patches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
	/// Storage-assigned surrogate key.
	pub id: ClientKey,

	/// OAuth client identifier, unique across the registry.
	pub client_id: ClientId,
	/// Display name.
	pub client_name: String,
	/// Optional description.
	pub description: Option<String>,
	/// Whether the client may authenticate.
	pub enabled: bool,
	/// Protocol, normally `oidc`.
	pub protocol_type: String,
	/// Grant types the client may use.
	pub allowed_grant_types: BTreeSet<GrantType>,
	/// Whether PKCE is mandatory for code-based flows.
	pub require_pkce: bool,
	/// Whether the `plain` PKCE method is accepted.
	pub allow_plain_text_pkce: bool,
	/// Registered redirect URIs.
	pub redirect_uris: BTreeSet<Url>,
	/// Scopes the client may request.
	pub allowed_scopes: BTreeSet<String>,
	/// Whether refresh tokens may be issued.
	pub allow_offline_access: bool,
	/// Whether access tokens may travel through the browser.
	pub allow_access_tokens_via_browser: bool,
	/// Origins allowed to make CORS calls.
	pub allowed_cors_origins: BTreeSet<String>,
	/// Free-form extension properties.
	pub properties: BTreeMap<String, String>,

	/// Whether the client must authenticate with a secret.
	pub require_client_secret: bool,
	/// Stored client secrets.
	pub client_secrets: Vec<ClientSecret>,
	/// URIs allowed after logout.
	pub post_logout_redirect_uris: BTreeSet<Url>,
	/// Front-channel logout endpoint.
	pub front_channel_logout_uri: Option<Url>,
	/// Whether the session id is sent on front-channel logout.
	pub front_channel_logout_session_required: bool,
	/// Back-channel logout endpoint.
	pub back_channel_logout_uri: Option<Url>,
	/// Whether the session id is sent on back-channel logout.
	pub back_channel_logout_session_required: bool,
	/// Whether local (username/password) login is offered.
	pub enable_local_login: bool,
	/// External identity providers the client is limited to; empty means all.
	pub identity_provider_restrictions: BTreeSet<String>,
	/// Maximum seconds since last login before re-authentication.
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
	/// Refresh token redemption behavior.
	pub refresh_token_usage: RefreshTokenUsage,
	/// Refresh token expiration model.
	pub refresh_token_expiration: TokenExpiration,
	/// Whether claims are refreshed when a refresh token is redeemed.
	pub update_access_token_claims_on_refresh: bool,
	/// Access token format.
	pub access_token_type: AccessTokenType,
	/// Whether JWT access tokens carry a `jti`.
	pub include_jwt_id: bool,
	/// Whether client claims are sent for every flow.
	pub always_send_client_claims: bool,
	/// Whether user claims are always embedded in the identity token.
	pub always_include_user_claims_in_id_token: bool,
	/// Prefix applied to client claim types.
	pub client_claims_prefix: String,
	/// Salt for pairwise subject identifiers.
	pub pair_wise_subject_salt: Option<String>,
	/// Claims stamped into issued tokens.
	pub claims: BTreeSet<ClientClaim>,

	/// Whether a consent screen is shown.
	pub require_consent: bool,
	/// Whether users may remember consent decisions.
	pub allow_remember_consent: bool,
	/// Remembered consent lifetime in seconds; `None` never expires.
	pub consent_lifetime: Option<u32>,
	/// Client home page shown on the consent screen.
	pub client_uri: Option<Url>,
	/// Logo shown on the consent screen.
	pub logo_uri: Option<Url>,

	/// User code format for the device flow.
	pub user_code_type: Option<String>,
	/// Device code lifetime in seconds.
	pub device_code_lifetime: u32,

	/// Creation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created: OffsetDateTime,
	/// Instant of the last section edit.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub updated: Option<OffsetDateTime>,
}
impl ClientConfig {
	/// Default identity token lifetime (5 minutes).
	pub const DEFAULT_IDENTITY_TOKEN_LIFETIME: u32 = 300;
	/// Default access token lifetime (1 hour).
	pub const DEFAULT_ACCESS_TOKEN_LIFETIME: u32 = 3_600;
	/// Default authorization code lifetime (5 minutes).
	pub const DEFAULT_AUTHORIZATION_CODE_LIFETIME: u32 = 300;
	/// Default absolute refresh token lifetime (30 days).
	pub const DEFAULT_ABSOLUTE_REFRESH_TOKEN_LIFETIME: u32 = 2_592_000;
	/// Default sliding refresh token lifetime (15 days).
	pub const DEFAULT_SLIDING_REFRESH_TOKEN_LIFETIME: u32 = 1_296_000;
	/// Default device code lifetime (5 minutes).
	pub const DEFAULT_DEVICE_CODE_LIFETIME: u32 = 300;

	/// Builds an unpersisted client carrying the registry defaults and no collections.
	pub fn draft(
		client_id: ClientId,
		client_name: impl Into<String>,
		protocol_type: impl Into<String>,
	) -> Self {
		Self {
			id: ClientKey::UNASSIGNED,
			client_id,
			client_name: client_name.into(),
			description: None,
			enabled: true,
			protocol_type: protocol_type.into(),
			allowed_grant_types: BTreeSet::new(),
			require_pkce: false,
			allow_plain_text_pkce: false,
			redirect_uris: BTreeSet::new(),
			allowed_scopes: BTreeSet::new(),
			allow_offline_access: false,
			allow_access_tokens_via_browser: false,
			allowed_cors_origins: BTreeSet::new(),
			properties: BTreeMap::new(),
			require_client_secret: true,
			client_secrets: Vec::new(),
			post_logout_redirect_uris: BTreeSet::new(),
			front_channel_logout_uri: None,
			front_channel_logout_session_required: true,
			back_channel_logout_uri: None,
			back_channel_logout_session_required: true,
			enable_local_login: true,
			identity_provider_restrictions: BTreeSet::new(),
			user_sso_lifetime: None,
			identity_token_lifetime: Self::DEFAULT_IDENTITY_TOKEN_LIFETIME,
			access_token_lifetime: Self::DEFAULT_ACCESS_TOKEN_LIFETIME,
			authorization_code_lifetime: Self::DEFAULT_AUTHORIZATION_CODE_LIFETIME,
			absolute_refresh_token_lifetime: Self::DEFAULT_ABSOLUTE_REFRESH_TOKEN_LIFETIME,
			sliding_refresh_token_lifetime: Self::DEFAULT_SLIDING_REFRESH_TOKEN_LIFETIME,
			refresh_token_usage: RefreshTokenUsage::default(),
			refresh_token_expiration: TokenExpiration::default(),
			update_access_token_claims_on_refresh: false,
			access_token_type: AccessTokenType::default(),
			include_jwt_id: false,
			always_send_client_claims: false,
			always_include_user_claims_in_id_token: false,
			client_claims_prefix: "client_".into(),
			pair_wise_subject_salt: None,
			claims: BTreeSet::new(),
			require_consent: false,
			allow_remember_consent: true,
			consent_lifetime: None,
			client_uri: None,
			logo_uri: None,
			user_code_type: None,
			device_code_lifetime: Self::DEFAULT_DEVICE_CODE_LIFETIME,
			created: OffsetDateTime::now_utc(),
			updated: None,
		}
	}

	/// Listing projection of the record.
	pub fn summary(&self) -> ClientSummary {
		ClientSummary {
			id: self.id,
			client_id: self.client_id.clone(),
			client_name: self.client_name.clone(),
			description: self.description.clone(),
			enabled: self.enabled,
			protocol_type: self.protocol_type.clone(),
			created: self.created,
		}
	}

	/// Secrets that have not expired at the provided instant.
	pub fn active_secrets_at(&self, instant: OffsetDateTime) -> impl Iterator<Item = &ClientSecret> {
		self.client_secrets.iter().filter(move |secret| !secret.is_expired_at(instant))
	}

	/// Whether the client can authenticate at the provided instant.
	///
	/// Clients requiring a secret need at least one non-expired secret. The registry accepts
	/// records violating this; the protocol runtime checks it at use time.
	pub fn can_authenticate_at(&self, instant: OffsetDateTime) -> bool {
		self.enabled &&
			(!self.require_client_secret || self.active_secrets_at(instant).next().is_some())
	}

	/// Validates write-time invariants before the record is persisted.
	pub fn validate(&self, max_client_id_len: usize) -> Result<(), ValidationError> {
		self.client_id.check_len(max_client_id_len)?;

		let name = self.client_name.trim();

		if name.is_empty() {
			return Err(ValidationError::field("client_name", "cannot be empty"));
		}
		if name.chars().count() > CLIENT_NAME_MAX_LEN {
			return Err(ValidationError::field(
				"client_name",
				format!("exceeds {CLIENT_NAME_MAX_LEN} characters"),
			));
		}
		if self.protocol_type.trim().is_empty() {
			return Err(ValidationError::field("protocol_type", "cannot be empty"));
		}

		GrantType::check_combination(&self.allowed_grant_types)?;
		validate_tokens("allowed_scopes", &self.allowed_scopes)?;
		validate_tokens("identity_provider_restrictions", &self.identity_provider_restrictions)?;

		for origin in &self.allowed_cors_origins {
			validate_origin(origin)?;
		}

		if self.properties.keys().any(|key| key.trim().is_empty()) {
			return Err(ValidationError::field("properties", "property keys cannot be empty"));
		}
		if self.claims.iter().any(|claim| claim.claim_type.trim().is_empty()) {
			return Err(ValidationError::field("claims", "claim types cannot be empty"));
		}

		for (field, value) in [
			("identity_token_lifetime", self.identity_token_lifetime),
			("access_token_lifetime", self.access_token_lifetime),
			("authorization_code_lifetime", self.authorization_code_lifetime),
			("device_code_lifetime", self.device_code_lifetime),
		] {
			if value == 0 {
				return Err(ValidationError::field(field, "must be positive"));
			}
		}

		let mut seen = BTreeSet::new();

		for secret in &self.client_secrets {
			if secret.secret_type.trim().is_empty() {
				return Err(ValidationError::field("client_secrets", "secret type cannot be empty"));
			}
			if !seen.insert((secret.secret_type.as_str(), secret.value.expose())) {
				return Err(ValidationError::field("client_secrets", "duplicate secret"));
			}
		}

		Ok(())
	}
}

fn validate_tokens(field: &'static str, values: &BTreeSet<String>) -> Result<(), ValidationError> {
	for value in values {
		if value.is_empty() {
			return Err(ValidationError::field(field, "entries cannot be empty"));
		}
		if value.chars().any(char::is_whitespace) {
			return Err(ValidationError::field(field, format!("`{value}` contains whitespace")));
		}
	}

	Ok(())
}

fn validate_origin(origin: &str) -> Result<(), ValidationError> {
	const FIELD: &str = "allowed_cors_origins";

	let url = Url::parse(origin)
		.map_err(|e| ValidationError::field(FIELD, format!("`{origin}` is not a URL: {e}")))?;

	if !matches!(url.scheme(), "http" | "https") || url.host().is_none() {
		return Err(ValidationError::field(FIELD, format!("`{origin}` is not an http(s) origin")));
	}
	if url.path() != "/" || origin.ends_with('/') || url.query().is_some() || url.fragment().is_some()
	{
		return Err(ValidationError::field(
			FIELD,
			format!("`{origin}` must not carry a path, query, or fragment"),
		));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn draft() -> ClientConfig {
		ClientConfig::draft(
			ClientId::new("web").expect("Client id fixture should be valid."),
			"Web",
			"oidc",
		)
	}

	#[test]
	fn drafts_pass_validation() {
		let client = draft();

		assert!(client.validate(200).is_ok());
		assert!(!client.id.is_assigned());
		assert!(client.require_client_secret);
		assert!(client.allowed_grant_types.is_empty());
	}

	#[test]
	fn blank_names_and_short_limits_are_rejected() {
		let mut client = draft();

		client.client_name = "   ".into();

		assert_eq!(client.validate(200).unwrap_err().field_name(), Some("client_name"));
		assert!(draft().validate(2).is_err());
	}

	#[test]
	fn cors_origins_must_be_bare() {
		let mut client = draft();

		client.allowed_cors_origins.insert("https://app.example.com:8443".into());

		assert!(client.validate(200).is_ok());

		for bad in ["https://app.example.com/", "https://app.example.com/path", "app.example.com"] {
			let mut client = draft();

			client.allowed_cors_origins.insert(bad.into());

			assert_eq!(
				client.validate(200).unwrap_err().field_name(),
				Some("allowed_cors_origins"),
				"{bad} should be rejected",
			);
		}
	}

	#[test]
	fn duplicate_secrets_and_zero_lifetimes_are_rejected() {
		let mut client = draft();
		let secret = ClientSecret::shared("pw");

		client.client_secrets = vec![secret.clone(), secret];

		assert_eq!(client.validate(200).unwrap_err().field_name(), Some("client_secrets"));

		let mut client = draft();

		client.access_token_lifetime = 0;

		assert_eq!(client.validate(200).unwrap_err().field_name(), Some("access_token_lifetime"));
	}

	#[test]
	fn scopes_with_whitespace_are_rejected() {
		let mut client = draft();

		client.allowed_scopes.insert("open id".into());

		assert_eq!(client.validate(200).unwrap_err().field_name(), Some("allowed_scopes"));
	}

	#[test]
	fn authentication_requires_an_active_secret() {
		let now = macros::datetime!(2025-01-01 00:00 UTC);
		let mut client = draft();

		assert!(!client.can_authenticate_at(now));

		client.client_secrets.push(ClientSecret::shared("old").expires_at(now));

		assert!(!client.can_authenticate_at(now));

		client.client_secrets.push(ClientSecret::shared("new"));

		assert!(client.can_authenticate_at(now));
		assert_eq!(client.active_secrets_at(now).count(), 1);

		client.client_secrets.clear();
		client.require_client_secret = false;

		assert!(client.can_authenticate_at(now));
	}

	#[test]
	fn storage_codes_round_trip() {
		for usage in [RefreshTokenUsage::ReUse, RefreshTokenUsage::OneTimeOnly] {
			assert_eq!(RefreshTokenUsage::from_code(usage.code()), Some(usage));
		}
		for expiration in [TokenExpiration::Sliding, TokenExpiration::Absolute] {
			assert_eq!(TokenExpiration::from_code(expiration.code()), Some(expiration));
		}

		assert_eq!(AccessTokenType::from_code(7), None);
	}
}
