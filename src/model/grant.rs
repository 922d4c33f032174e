//! OAuth 2.0 / OIDC grant types and their combination rules.

// self
use crate::{_prelude::*, error::ValidationError};

/// OAuth 2.0 / OIDC grant types a client may be allowed to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GrantType {
	/// Implicit grant.
	#[serde(rename = "implicit")]
	Implicit,
	/// OIDC hybrid flow.
	#[serde(rename = "hybrid")]
	Hybrid,
	/// Authorization Code grant (PKCE recommended).
	#[serde(rename = "authorization_code")]
	AuthorizationCode,
	/// Client Credentials grant for app-only tokens.
	#[serde(rename = "client_credentials")]
	ClientCredentials,
	/// Resource Owner Password Credentials grant.
	#[serde(rename = "password")]
	ResourceOwnerPassword,
	/// Device Authorization grant (RFC 8628).
	#[serde(rename = "urn:ietf:params:oauth:grant-type:device_code")]
	DeviceFlow,
}
impl GrantType {
	/// Pairs that a single client must not enable together.
	pub const EXCLUSIVE_PAIRS: [(GrantType, GrantType); 3] = [
		(GrantType::Implicit, GrantType::AuthorizationCode),
		(GrantType::Implicit, GrantType::Hybrid),
		(GrantType::AuthorizationCode, GrantType::Hybrid),
	];

	/// Returns the wire identifier for the grant type.
	pub const fn as_str(self) -> &'static str {
		match self {
			GrantType::Implicit => "implicit",
			GrantType::Hybrid => "hybrid",
			GrantType::AuthorizationCode => "authorization_code",
			GrantType::ClientCredentials => "client_credentials",
			GrantType::ResourceOwnerPassword => "password",
			GrantType::DeviceFlow => "urn:ietf:params:oauth:grant-type:device_code",
		}
	}

	/// Rejects grant sets that combine mutually exclusive interactive flows.
	pub fn check_combination(grants: &BTreeSet<GrantType>) -> Result<(), ValidationError> {
		for (first, second) in Self::EXCLUSIVE_PAIRS {
			if grants.contains(&first) && grants.contains(&second) {
				return Err(ValidationError::GrantTypeConflict {
					first: first.as_str(),
					second: second.as_str(),
				});
			}
		}

		Ok(())
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for GrantType {
	type Err = ValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"implicit" => Ok(GrantType::Implicit),
			"hybrid" => Ok(GrantType::Hybrid),
			"authorization_code" => Ok(GrantType::AuthorizationCode),
			"client_credentials" => Ok(GrantType::ClientCredentials),
			"password" => Ok(GrantType::ResourceOwnerPassword),
			"urn:ietf:params:oauth:grant-type:device_code" => Ok(GrantType::DeviceFlow),
			other => Err(ValidationError::UnknownGrantType { value: other.to_owned() }),
		}
	}
}
