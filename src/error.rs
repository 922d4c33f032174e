//! Registry-level error types shared across operations, stores, and the mapper.

// self
use crate::{
	_prelude::*,
	model::{ClientKey, IdentifierError},
};

/// Registry-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical registry error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure other than a unique constraint violation; the backend message
	/// stays in the source chain.
	#[error("Internal registry failure.")]
	Storage(#[source] crate::store::StoreError),
	/// Caller supplied malformed input.
	#[error(transparent)]
	Validation(#[from] ValidationError),

	/// The surrogate key does not resolve to a client.
	#[error("Client {id} was not found.")]
	NotFound {
		/// Key that failed to resolve.
		id: ClientKey,
	},
	/// Another client already uses the requested `client_id`.
	#[error("Client `{client_id}` already exists.")]
	Conflict {
		/// Offending `client_id` value.
		client_id: String,
	},
	/// Unexpected internal condition; the detail stays out of the rendered message.
	#[error("Internal registry failure.")]
	Failure {
		/// Internal diagnostic, suitable for logs only.
		detail: String,
	},
}
impl Error {
	/// Builds a [`Error::Failure`] from any displayable diagnostic.
	pub fn failure(detail: impl Display) -> Self {
		Self::Failure { detail: detail.to_string() }
	}

	/// Classifies the error into the registry taxonomy.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::NotFound { .. } => ErrorKind::NotFound,
			Error::Conflict { .. } => ErrorKind::Conflict,
			Error::Validation(_) => ErrorKind::Validation,
			Error::Storage(_) | Error::Failure { .. } => ErrorKind::Failure,
		}
	}

	/// Returns `true` for [`Error::NotFound`].
	pub fn is_not_found(&self) -> bool {
		matches!(self, Error::NotFound { .. })
	}
}
impl From<crate::store::StoreError> for Error {
	fn from(e: crate::store::StoreError) -> Self {
		match e {
			crate::store::StoreError::UniqueViolation { value, .. } =>
				Self::Conflict { client_id: value },
			other => Self::Storage(other),
		}
	}
}
impl From<crate::mapper::MapError> for Error {
	fn from(e: crate::mapper::MapError) -> Self {
		Self::failure(e)
	}
}

/// Coarse error taxonomy used by transport layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
	/// Identifier did not resolve.
	NotFound,
	/// Uniqueness violation.
	Conflict,
	/// Malformed input.
	Validation,
	/// Internal or storage failure.
	Failure,
}
impl ErrorKind {
	/// HTTP status code conventionally paired with the kind.
	pub const fn http_status(self) -> u16 {
		match self {
			ErrorKind::NotFound => 404,
			ErrorKind::Conflict => 409,
			ErrorKind::Validation => 400,
			ErrorKind::Failure => 500,
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorKind::NotFound => "not_found",
			ErrorKind::Conflict => "conflict",
			ErrorKind::Validation => "validation",
			ErrorKind::Failure => "failure",
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Malformed input rejected before anything reaches storage.
///
/// Every variant names the offending field so callers can render per-field detail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum ValidationError {
	/// Identifier failed validation.
	#[error(transparent)]
	Identifier(#[from] IdentifierError),
	/// Delete path segment was empty or contained a non-numeric id.
	#[error("Client id list `{input}` is malformed.")]
	InvalidKeyList {
		/// Raw input as received.
		input: String,
	},
	/// Surrogate key could not be parsed.
	#[error("Client key `{input}` is not a valid integer.")]
	InvalidKey {
		/// Raw input as received.
		input: String,
	},
	/// Template selector is not one of the known presets.
	#[error("Unknown client template `{value}`.")]
	UnknownTemplate {
		/// Raw selector value.
		value: String,
	},
	/// Section name is not one of the editable sections.
	#[error("Unknown client section `{value}`.")]
	UnknownSection {
		/// Raw section name.
		value: String,
	},
	/// Sort expression names an unsupported field or direction.
	#[error("Cannot sort by `{value}`.")]
	UnknownSortField {
		/// Raw sort expression.
		value: String,
	},
	/// Grant type string is not recognized.
	#[error("Unknown grant type `{value}`.")]
	UnknownGrantType {
		/// Raw grant type.
		value: String,
	},
	/// Two grant types that must not be combined were both allowed.
	#[error("Grant types `{first}` and `{second}` cannot be combined.")]
	GrantTypeConflict {
		/// First grant type of the pair.
		first: &'static str,
		/// Second grant type of the pair.
		second: &'static str,
	},
	/// JSON payload did not match the expected shape.
	#[error("Payload is invalid at `{path}`: {message}.")]
	Payload {
		/// Path to the failing element.
		path: String,
		/// Deserializer message.
		message: String,
	},
	/// A single field carries an invalid value.
	#[error("Field `{field}` is invalid: {reason}.")]
	InvalidField {
		/// Field name as exposed by the section views.
		field: &'static str,
		/// Human-readable reason.
		reason: String,
	},
}
impl ValidationError {
	/// Shorthand for [`ValidationError::InvalidField`].
	pub fn field(field: &'static str, reason: impl Into<String>) -> Self {
		Self::InvalidField { field, reason: reason.into() }
	}

	/// Builds a [`ValidationError::Payload`] from a path-aware serde failure.
	pub fn payload(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		let path = e.path().to_string();

		Self::Payload { path, message: e.into_inner().to_string() }
	}

	/// Name of the field the error refers to, when there is one.
	pub fn field_name(&self) -> Option<&str> {
		match self {
			ValidationError::Identifier(_) => Some("client_id"),
			ValidationError::InvalidKeyList { .. } | ValidationError::InvalidKey { .. } =>
				Some("id"),
			ValidationError::UnknownTemplate { .. } => Some("template"),
			ValidationError::UnknownSection { .. } => Some("section"),
			ValidationError::UnknownSortField { .. } => Some("sort"),
			ValidationError::UnknownGrantType { .. } |
			ValidationError::GrantTypeConflict { .. } => Some("allowed_grant_types"),
			ValidationError::Payload { path, .. } => Some(path),
			ValidationError::InvalidField { field, .. } => Some(field),
		}
	}
}

/// Configuration failures raised while building a [`RegistryConfig`](crate::config::RegistryConfig).
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Page sizes must be positive and the default must not exceed the maximum.
	#[error("Page size configuration is invalid: default {default}, max {max}.")]
	InvalidPageSize {
		/// Configured default page size.
		default: usize,
		/// Configured maximum page size.
		max: usize,
	},
	/// Protocol type must be a non-empty string.
	#[error("Default protocol type cannot be empty.")]
	EmptyProtocolType,
	/// Client id length limit must lie within the storage column width.
	#[error("The client_id length limit must be between 1 and {max}.")]
	InvalidClientIdLength {
		/// Largest supported limit.
		max: usize,
	},
	/// Configuration JSON could not be parsed.
	#[error("Configuration is invalid at `{path}`.")]
	Parse {
		/// Path to the failing element.
		path: String,
		/// Structured parsing failure.
		#[source]
		source: serde_json::Error,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::store::StoreError;

	#[test]
	fn unique_violation_becomes_conflict() {
		let err: Error =
			StoreError::UniqueViolation { constraint: "client_id".into(), value: "spa1".into() }
				.into();

		assert!(matches!(&err, Error::Conflict { client_id } if client_id == "spa1"));
		assert_eq!(err.kind(), ErrorKind::Conflict);
		assert_eq!(err.kind().http_status(), 409);
	}

	#[test]
	fn storage_error_keeps_source_but_classifies_as_failure() {
		let store_error = StoreError::Backend { message: "disk unreachable".into() };
		let err: Error = store_error.clone().into();
		let source = StdError::source(&err)
			.expect("Registry error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
		assert_eq!(err.kind(), ErrorKind::Failure);
	}

	#[test]
	fn failure_hides_detail() {
		let err = Error::failure("row 7 has grant type `bogus`");

		assert_eq!(err.to_string(), "Internal registry failure.");
		assert_eq!(err.kind().http_status(), 500);
	}

	#[test]
	fn storage_error_hides_backend_message() {
		let message = "Failed to write /var/lib/idp/clients.tmp: EACCES";
		let err = Error::from(StoreError::Backend { message: message.into() });

		assert_eq!(err.to_string(), "Internal registry failure.");
		assert!(!err.to_string().contains(message));
		assert_eq!(err.kind().http_status(), 500);
	}

	#[test]
	fn validation_errors_name_their_field() {
		assert_eq!(ValidationError::field("logo_uri", "bad").field_name(), Some("logo_uri"));
		assert_eq!(
			ValidationError::UnknownTemplate { value: "x".into() }.field_name(),
			Some("template")
		);
		assert_eq!(Error::from(ValidationError::field("x", "y")).kind().http_status(), 400);
	}
}
