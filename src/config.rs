//! Registry configuration and its validating builder.

// self
use crate::{_prelude::*, error::ConfigError, model::CLIENT_ID_MAX_LEN};

/// Tunables shared by every registry operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
	/// Page size used when a listing omits `limit`.
	pub default_page_size: usize,
	/// Upper bound applied to caller-supplied `limit` values.
	pub max_page_size: usize,
	/// Protocol type stamped on new clients.
	pub default_protocol_type: String,
	/// Maximum accepted `client_id` length.
	pub max_client_id_len: usize,
}
impl RegistryConfig {
	/// Creates a builder seeded with the defaults.
	pub fn builder() -> RegistryConfigBuilder {
		RegistryConfigBuilder::default()
	}

	/// Parses and validates a JSON configuration document.
	pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
		let de = &mut serde_json::Deserializer::from_slice(bytes);
		let config: Self = serde_path_to_error::deserialize(de).map_err(|e| {
			let path = e.path().to_string();

			ConfigError::Parse { path, source: e.into_inner() }
		})?;

		config.validate()?;

		Ok(config)
	}

	/// Checks page sizes, the protocol type, and the `client_id` length limit.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.default_page_size == 0 ||
			self.max_page_size == 0 ||
			self.default_page_size > self.max_page_size
		{
			return Err(ConfigError::InvalidPageSize {
				default: self.default_page_size,
				max: self.max_page_size,
			});
		}
		if self.default_protocol_type.trim().is_empty() {
			return Err(ConfigError::EmptyProtocolType);
		}
		if self.max_client_id_len == 0 || self.max_client_id_len > CLIENT_ID_MAX_LEN {
			return Err(ConfigError::InvalidClientIdLength { max: CLIENT_ID_MAX_LEN });
		}

		Ok(())
	}
}
impl Default for RegistryConfig {
	fn default() -> Self {
		Self {
			default_page_size: 20,
			max_page_size: 100,
			default_protocol_type: "oidc".into(),
			max_client_id_len: CLIENT_ID_MAX_LEN,
		}
	}
}

/// Builder for [`RegistryConfig`] values.
#[derive(Debug, Default)]
pub struct RegistryConfigBuilder {
	config: RegistryConfig,
}
impl RegistryConfigBuilder {
	/// Sets the default page size.
	pub fn default_page_size(mut self, size: usize) -> Self {
		self.config.default_page_size = size;

		self
	}

	/// Sets the maximum page size.
	pub fn max_page_size(mut self, size: usize) -> Self {
		self.config.max_page_size = size;

		self
	}

	/// Sets the protocol type stamped on new clients.
	pub fn default_protocol_type(mut self, protocol: impl Into<String>) -> Self {
		self.config.default_protocol_type = protocol.into();

		self
	}

	/// Tightens the accepted `client_id` length.
	pub fn max_client_id_len(mut self, len: usize) -> Self {
		self.config.max_client_id_len = len;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<RegistryConfig, ConfigError> {
		self.config.validate()?;

		Ok(self.config)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_are_valid() {
		let config = RegistryConfig::builder().build().expect("Default config should validate.");

		assert_eq!(config, RegistryConfig::default());
		assert_eq!(config.default_protocol_type, "oidc");
	}

	#[test]
	fn builder_rejects_inconsistent_page_sizes() {
		let err = RegistryConfig::builder()
			.default_page_size(50)
			.max_page_size(10)
			.build()
			.expect_err("Default above max must be rejected.");

		assert!(matches!(err, ConfigError::InvalidPageSize { default: 50, max: 10 }));
		assert!(RegistryConfig::builder().default_protocol_type(" ").build().is_err());
		assert!(RegistryConfig::builder().max_client_id_len(0).build().is_err());
		assert!(
			RegistryConfig::builder().max_client_id_len(CLIENT_ID_MAX_LEN + 1).build().is_err()
		);
	}

	#[test]
	fn json_config_fills_defaults_and_reports_paths() {
		let config = RegistryConfig::from_json(br#"{"max_page_size": 50}"#)
			.expect("Partial config should parse.");

		assert_eq!(config.max_page_size, 50);
		assert_eq!(config.default_page_size, 20);

		let err = RegistryConfig::from_json(br#"{"default_page_size": "ten"}"#)
			.expect_err("Wrong field type must be rejected.");

		assert!(matches!(err, ConfigError::Parse { ref path, .. } if path == "default_page_size"));
	}
}
