//! Client secrets with redacted formatting and SHA-256 hashing helpers.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

const GENERATED_SECRET_LEN: usize = 48;

/// Secret type stored for hashed shared secrets.
pub const SHARED_SECRET: &str = "SharedSecret";

/// Redacted secret material wrapper keeping values out of logs.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretValue(String);
impl SecretValue {
	/// Wraps an already-prepared (typically hashed) secret value.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for SecretValue {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SecretValue").field(&"<redacted>").finish()
	}
}
impl Display for SecretValue {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Credential a confidential client presents at the token endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSecret {
	/// Secret kind, e.g. [`SHARED_SECRET`] or `X509Thumbprint`.
	pub secret_type: String,
	/// Stored (hashed) secret material.
	pub value: SecretValue,
	/// Optional operator note.
	#[serde(default)]
	pub description: Option<String>,
	/// Instant after which the secret no longer authenticates.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub expiration: Option<OffsetDateTime>,
	/// Creation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created: OffsetDateTime,
}
impl ClientSecret {
	/// Hashes a plaintext shared secret into its stored form.
	pub fn shared(plaintext: &str) -> Self {
		Self {
			secret_type: SHARED_SECRET.into(),
			value: SecretValue::new(hash_secret(plaintext)),
			description: None,
			expiration: None,
			created: OffsetDateTime::now_utc(),
		}
	}

	/// Generates a random plaintext secret and returns it alongside the stored form.
	///
	/// The plaintext is only available here; the registry keeps the digest.
	pub fn generate() -> (String, Self) {
		let plaintext = rand::rng()
			.sample_iter(Alphanumeric)
			.take(GENERATED_SECRET_LEN)
			.map(char::from)
			.collect::<String>();
		let secret = Self::shared(&plaintext);

		(plaintext, secret)
	}

	/// Attaches a description.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());

		self
	}

	/// Sets the expiration instant.
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expiration = Some(instant);

		self
	}

	/// Returns `true` if the secret expired at or before the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expiration.is_some_and(|expiration| expiration <= instant)
	}

	/// Checks a presented plaintext against a hashed shared secret.
	pub fn matches(&self, plaintext: &str) -> bool {
		self.secret_type == SHARED_SECRET && self.value.expose() == hash_secret(plaintext)
	}
}

fn hash_secret(plaintext: &str) -> String {
	let mut hasher = Sha256::new();

	hasher.update(plaintext.as_bytes());

	let digest = hasher.finalize();

	STANDARD.encode(digest)
}
