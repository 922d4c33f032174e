//! Editable sections of a client: section-shaped views and partial patches.
//!
//! Each section owns a fixed subset of [`ClientConfig`] fields. A patch only ever writes the
//! fields of its own section; keys belonging to other sections are ignored during
//! deserialization. Patch fields are optional: an absent key leaves the field untouched, while
//! an explicit `null` clears a nullable field. Collections are replaced wholesale.

// crates.io
use serde::Deserializer;
// self
use crate::{
	_prelude::*,
	error::ValidationError,
	model::{
		AccessTokenType, ClientClaim, ClientConfig, ClientId, ClientKey, ClientSecret, GrantType,
		RefreshTokenUsage, TokenExpiration,
	},
};

/// Independently editable field group of a client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
	/// Identity, grants, redirects, scopes, CORS, and properties.
	Basic,
	/// Secrets, logout endpoints, and login restrictions.
	Authenticate,
	/// Token lifetimes, formats, and claims.
	Token,
	/// Consent screen settings.
	Consent,
	/// Device flow settings.
	Device,
}
impl Section {
	/// Every section in display order.
	pub const ALL: [Section; 5] =
		[Section::Basic, Section::Authenticate, Section::Token, Section::Consent, Section::Device];

	/// Returns the lowercase section name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Section::Basic => "basic",
			Section::Authenticate => "authenticate",
			Section::Token => "token",
			Section::Consent => "consent",
			Section::Device => "device",
		}
	}
}
impl Display for Section {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Section {
	type Err = ValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|section| section.as_str().eq_ignore_ascii_case(s.trim()))
			.ok_or_else(|| ValidationError::UnknownSection { value: s.to_owned() })
	}
}

/// Wraps any present value, including an explicit `null`, so patches can tell absent keys apart.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	T::deserialize(deserializer).map(Some)
}

macro_rules! def_section {
	(
		$label:literal,
		$view:ident,
		$patch:ident {
			$(
				$(#[$field_meta:meta])*
				$field:ident: $ty:ty
			),+ $(,)?
		}
	) => {
		#[doc = concat!("Projection of the ", $label, " section.")]
		#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
		pub struct $view {
			/// Surrogate key of the client.
			pub id: ClientKey,
			$(
				$(#[$field_meta])*
				pub $field: $ty,
			)+
		}
		impl $view {
			/// Projects the section out of a full client.
			pub fn project(client: &ClientConfig) -> Self {
				Self { id: client.id, $($field: client.$field.clone(),)+ }
			}
		}

		#[doc = concat!("Partial update of the ", $label, " section; absent keys are kept.")]
		#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
		#[serde(default)]
		pub struct $patch {
			$(
				$(#[$field_meta])*
				#[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
				pub $field: Option<$ty>,
			)+
		}
		impl $patch {
			/// Writes every present field onto the client.
			pub fn apply(self, client: &mut ClientConfig) {
				$(
					if let Some(value) = self.$field {
						client.$field = value;
					}
				)+
			}

			/// Returns `true` when the patch carries no field.
			pub fn is_empty(&self) -> bool {
				$(self.$field.is_none())&&+
			}
		}
	};
}

def_section! {
	"basic",
	BasicView,
	BasicPatch {
		/// OAuth client identifier.
		client_id: ClientId,
		/// Display name.
		client_name: String,
		/// Optional description.
		description: Option<String>,
		/// Whether the client may authenticate.
		enabled: bool,
		/// Protocol type.
		protocol_type: String,
		/// Allowed grant types.
		allowed_grant_types: BTreeSet<GrantType>,
		/// Whether PKCE is mandatory.
		require_pkce: bool,
		/// Whether the `plain` PKCE method is accepted.
		allow_plain_text_pkce: bool,
		/// Registered redirect URIs.
		redirect_uris: BTreeSet<Url>,
		/// Allowed scopes.
		allowed_scopes: BTreeSet<String>,
		/// Whether refresh tokens may be issued.
		allow_offline_access: bool,
		/// Whether access tokens may travel through the browser.
		allow_access_tokens_via_browser: bool,
		/// Allowed CORS origins.
		allowed_cors_origins: BTreeSet<String>,
		/// Extension properties.
		properties: BTreeMap<String, String>,
	}
}

def_section! {
	"authenticate",
	AuthenticateView,
	AuthenticatePatch {
		/// Whether a client secret is required.
		require_client_secret: bool,
		/// Stored client secrets.
		client_secrets: Vec<ClientSecret>,
		/// URIs allowed after logout.
		post_logout_redirect_uris: BTreeSet<Url>,
		/// Front-channel logout endpoint.
		front_channel_logout_uri: Option<Url>,
		/// Whether the session id is sent on front-channel logout.
		front_channel_logout_session_required: bool,
		/// Back-channel logout endpoint.
		back_channel_logout_uri: Option<Url>,
		/// Whether the session id is sent on back-channel logout.
		back_channel_logout_session_required: bool,
		/// Whether local login is offered.
		enable_local_login: bool,
		/// Identity providers the client is limited to.
		identity_provider_restrictions: BTreeSet<String>,
		/// Maximum seconds since last login.
		user_sso_lifetime: Option<u32>,
	}
}

def_section! {
	"token",
	TokenView,
	TokenPatch {
		/// Identity token lifetime in seconds.
		identity_token_lifetime: u32,
		/// Access token lifetime in seconds.
		access_token_lifetime: u32,
		/// Authorization code lifetime in seconds.
		authorization_code_lifetime: u32,
		/// Absolute refresh token lifetime in seconds.
		absolute_refresh_token_lifetime: u32,
		/// Sliding refresh token lifetime in seconds.
		sliding_refresh_token_lifetime: u32,
		/// Refresh token redemption behavior.
		refresh_token_usage: RefreshTokenUsage,
		/// Refresh token expiration model.
		refresh_token_expiration: TokenExpiration,
		/// Whether claims are refreshed on refresh token redemption.
		update_access_token_claims_on_refresh: bool,
		/// Access token format.
		access_token_type: AccessTokenType,
		/// Whether JWT access tokens carry a `jti`.
		include_jwt_id: bool,
		/// Whether client claims are sent for every flow.
		always_send_client_claims: bool,
		/// Whether user claims are always embedded in the identity token.
		always_include_user_claims_in_id_token: bool,
		/// Prefix applied to client claim types.
		client_claims_prefix: String,
		/// Salt for pairwise subject identifiers.
		pair_wise_subject_salt: Option<String>,
		/// Claims stamped into issued tokens.
		claims: BTreeSet<ClientClaim>,
	}
}

def_section! {
	"consent",
	ConsentView,
	ConsentPatch {
		/// Whether a consent screen is shown.
		require_consent: bool,
		/// Whether users may remember consent decisions.
		allow_remember_consent: bool,
		/// Remembered consent lifetime in seconds.
		consent_lifetime: Option<u32>,
		/// Client home page.
		client_uri: Option<Url>,
		/// Logo shown on the consent screen.
		logo_uri: Option<Url>,
	}
}

def_section! {
	"device",
	DeviceView,
	DevicePatch {
		/// User code format.
		user_code_type: Option<String>,
		/// Device code lifetime in seconds.
		device_code_lifetime: u32,
	}
}

/// Section-scoped partial update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "section", content = "fields", rename_all = "snake_case")]
pub enum SectionPatch {
	/// Basic section fields.
	Basic(BasicPatch),
	/// Authenticate section fields.
	Authenticate(AuthenticatePatch),
	/// Token section fields.
	Token(TokenPatch),
	/// Consent section fields.
	Consent(ConsentPatch),
	/// Device section fields.
	Device(DevicePatch),
}
impl SectionPatch {
	/// Parses a JSON body as a patch for the named section.
	///
	/// Keys belonging to other sections are ignored; type errors report the offending path.
	pub fn from_json(section: Section, bytes: &[u8]) -> Result<Self, ValidationError> {
		let de = &mut serde_json::Deserializer::from_slice(bytes);
		let patch = match section {
			Section::Basic => serde_path_to_error::deserialize(&mut *de).map(SectionPatch::Basic),
			Section::Authenticate =>
				serde_path_to_error::deserialize(&mut *de).map(SectionPatch::Authenticate),
			Section::Token => serde_path_to_error::deserialize(&mut *de).map(SectionPatch::Token),
			Section::Consent =>
				serde_path_to_error::deserialize(&mut *de).map(SectionPatch::Consent),
			Section::Device => serde_path_to_error::deserialize(&mut *de).map(SectionPatch::Device),
		}
		.map_err(ValidationError::payload)?;

		de.end()
			.map_err(|e| ValidationError::Payload { path: ".".into(), message: e.to_string() })?;

		Ok(patch)
	}

	/// Section the patch targets.
	pub fn section(&self) -> Section {
		match self {
			SectionPatch::Basic(_) => Section::Basic,
			SectionPatch::Authenticate(_) => Section::Authenticate,
			SectionPatch::Token(_) => Section::Token,
			SectionPatch::Consent(_) => Section::Consent,
			SectionPatch::Device(_) => Section::Device,
		}
	}

	/// Writes the patch onto the client, touching only fields of its section.
	pub fn apply(self, client: &mut ClientConfig) {
		match self {
			SectionPatch::Basic(patch) => patch.apply(client),
			SectionPatch::Authenticate(patch) => patch.apply(client),
			SectionPatch::Token(patch) => patch.apply(client),
			SectionPatch::Consent(patch) => patch.apply(client),
			SectionPatch::Device(patch) => patch.apply(client),
		}
	}
}
impl From<BasicPatch> for SectionPatch {
	fn from(value: BasicPatch) -> Self {
		SectionPatch::Basic(value)
	}
}
impl From<AuthenticatePatch> for SectionPatch {
	fn from(value: AuthenticatePatch) -> Self {
		SectionPatch::Authenticate(value)
	}
}
impl From<TokenPatch> for SectionPatch {
	fn from(value: TokenPatch) -> Self {
		SectionPatch::Token(value)
	}
}
impl From<ConsentPatch> for SectionPatch {
	fn from(value: ConsentPatch) -> Self {
		SectionPatch::Consent(value)
	}
}
impl From<DevicePatch> for SectionPatch {
	fn from(value: DevicePatch) -> Self {
		SectionPatch::Device(value)
	}
}

/// Section-shaped projection returned by edits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "section", content = "fields", rename_all = "snake_case")]
pub enum SectionView {
	/// Basic section.
	Basic(BasicView),
	/// Authenticate section.
	Authenticate(AuthenticateView),
	/// Token section.
	Token(TokenView),
	/// Consent section.
	Consent(ConsentView),
	/// Device section.
	Device(DeviceView),
}
impl SectionView {
	/// Projects one section out of a full client.
	pub fn project(section: Section, client: &ClientConfig) -> Self {
		match section {
			Section::Basic => SectionView::Basic(BasicView::project(client)),
			Section::Authenticate => SectionView::Authenticate(AuthenticateView::project(client)),
			Section::Token => SectionView::Token(TokenView::project(client)),
			Section::Consent => SectionView::Consent(ConsentView::project(client)),
			Section::Device => SectionView::Device(DeviceView::project(client)),
		}
	}

	/// Section the view was projected from.
	pub fn section(&self) -> Section {
		match self {
			SectionView::Basic(_) => Section::Basic,
			SectionView::Authenticate(_) => Section::Authenticate,
			SectionView::Token(_) => Section::Token,
			SectionView::Consent(_) => Section::Consent,
			SectionView::Device(_) => Section::Device,
		}
	}
}

/// Full client rendered as its five sections, the shape returned by `GET /clients/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientView {
	/// Basic section.
	pub basic: BasicView,
	/// Authenticate section.
	pub authenticate: AuthenticateView,
	/// Token section.
	pub token: TokenView,
	/// Consent section.
	pub consent: ConsentView,
	/// Device section.
	pub device: DeviceView,
}
impl ClientView {
	/// Splits a full client into its section views.
	pub fn from_config(client: &ClientConfig) -> Self {
		Self {
			basic: BasicView::project(client),
			authenticate: AuthenticateView::project(client),
			token: TokenView::project(client),
			consent: ConsentView::project(client),
			device: DeviceView::project(client),
		}
	}
}
impl From<&ClientConfig> for ClientView {
	fn from(value: &ClientConfig) -> Self {
		Self::from_config(value)
	}
}
