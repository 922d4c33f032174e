//! Creation presets that seed grant types and security flags.

// self
use crate::{
	_prelude::*,
	error::ValidationError,
	model::{ClientConfig, GrantType},
};

/// Preset applied when a client is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TemplateRepr", into = "&'static str")]
pub enum ClientTemplate {
	/// No grant types, default flags.
	Empty,
	/// Server-side web application using the hybrid flow.
	Hybrid,
	/// Browser-based public client using authorization code + PKCE.
	SinglePageApp,
	/// Native/mobile application using the hybrid flow.
	Native,
	/// Machine-to-machine client.
	Machine,
	/// Input-constrained device using the device flow.
	Device,
}
impl ClientTemplate {
	/// Every template in selector-code order.
	pub const ALL: [ClientTemplate; 6] = [
		ClientTemplate::Empty,
		ClientTemplate::Hybrid,
		ClientTemplate::SinglePageApp,
		ClientTemplate::Native,
		ClientTemplate::Machine,
		ClientTemplate::Device,
	];

	/// Returns the canonical selector name.
	pub const fn as_str(self) -> &'static str {
		match self {
			ClientTemplate::Empty => "empty",
			ClientTemplate::Hybrid => "hybrid",
			ClientTemplate::SinglePageApp => "spa",
			ClientTemplate::Native => "native",
			ClientTemplate::Machine => "machine",
			ClientTemplate::Device => "device",
		}
	}

	/// Grant types seeded by the template.
	pub fn grant_types(self) -> BTreeSet<GrantType> {
		match self {
			ClientTemplate::Empty => BTreeSet::new(),
			ClientTemplate::Hybrid | ClientTemplate::Native => BTreeSet::from([GrantType::Hybrid]),
			ClientTemplate::SinglePageApp => BTreeSet::from([GrantType::AuthorizationCode]),
			ClientTemplate::Machine =>
				BTreeSet::from([GrantType::ResourceOwnerPassword, GrantType::ClientCredentials]),
			ClientTemplate::Device => BTreeSet::from([GrantType::DeviceFlow]),
		}
	}

	/// Applies the preset to a freshly drafted client.
	///
	/// Only grant types and the flags named by the preset change; collections such as redirect
	/// URIs are never seeded.
	pub fn apply(self, client: &mut ClientConfig) {
		client.allowed_grant_types = self.grant_types();

		match self {
			ClientTemplate::Empty |
			ClientTemplate::Hybrid |
			ClientTemplate::Native |
			ClientTemplate::Machine => {},
			ClientTemplate::SinglePageApp => {
				client.require_pkce = true;
				client.require_client_secret = false;
			},
			ClientTemplate::Device => {
				client.require_client_secret = false;
				client.allow_offline_access = true;
			},
		}
	}
}
impl Display for ClientTemplate {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl From<ClientTemplate> for &'static str {
	fn from(value: ClientTemplate) -> Self {
		value.as_str()
	}
}
impl FromStr for ClientTemplate {
	type Err = ValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let normalized = s.trim().to_ascii_lowercase().replace(['_', '-'], "");

		match normalized.as_str() {
			"empty" => Ok(ClientTemplate::Empty),
			"hybrid" => Ok(ClientTemplate::Hybrid),
			"spa" | "singlepageapp" => Ok(ClientTemplate::SinglePageApp),
			"native" => Ok(ClientTemplate::Native),
			"machine" => Ok(ClientTemplate::Machine),
			"device" => Ok(ClientTemplate::Device),
			_ => Err(ValidationError::UnknownTemplate { value: s.to_owned() }),
		}
	}
}
impl TryFrom<u64> for ClientTemplate {
	type Error = ValidationError;

	fn try_from(code: u64) -> Result<Self, Self::Error> {
		usize::try_from(code)
			.ok()
			.and_then(|idx| Self::ALL.get(idx).copied())
			.ok_or_else(|| ValidationError::UnknownTemplate { value: code.to_string() })
	}
}
impl TryFrom<TemplateRepr> for ClientTemplate {
	type Error = ValidationError;

	fn try_from(repr: TemplateRepr) -> Result<Self, Self::Error> {
		match repr {
			TemplateRepr::Code(code) => Self::try_from(code),
			TemplateRepr::Name(name) => name.parse(),
		}
	}
}

/// Wire shapes accepted for a template selector: a name or a numeric code.
#[derive(Deserialize)]
#[serde(untagged)]
enum TemplateRepr {
	Code(u64),
	Name(String),
}
