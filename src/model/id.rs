//! Strongly typed identifiers for registered clients.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::{_prelude::*, error::ValidationError};

/// Column width reserved for `client_id` values.
pub const CLIENT_ID_MAX_LEN: usize = 200;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier.
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier.
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier.
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Storage-assigned surrogate key of a client.
///
/// Key `0` is never handed out by a store; drafts that have not been inserted yet carry
/// [`ClientKey::UNASSIGNED`].
#[derive(
	Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ClientKey(pub u64);
impl ClientKey {
	/// Placeholder key carried by records that were never persisted.
	pub const UNASSIGNED: Self = Self(0);

	/// Returns the raw integer value.
	pub const fn get(self) -> u64 {
		self.0
	}

	/// Returns `true` once a store assigned the key.
	pub const fn is_assigned(self) -> bool {
		self.0 != 0
	}
}
impl From<u64> for ClientKey {
	fn from(value: u64) -> Self {
		Self(value)
	}
}
impl Display for ClientKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		Display::fmt(&self.0, f)
	}
}
impl FromStr for ClientKey {
	type Err = ValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		s.trim()
			.parse::<u64>()
			.map(Self)
			.map_err(|_| ValidationError::InvalidKey { input: s.to_owned() })
	}
}

/// Caller-chosen, globally unique OAuth `client_id`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(String);
impl ClientId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_view("Client", view, CLIENT_ID_MAX_LEN)?;

		Ok(Self(view.to_owned()))
	}

	/// Re-validates against a tighter, deployment-specific length limit.
	pub fn check_len(&self, max: usize) -> Result<(), IdentifierError> {
		validate_view("Client", &self.0, max)
	}

	/// Returns the identifier as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Deref for ClientId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for ClientId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<ClientId> for String {
	fn from(value: ClientId) -> Self {
		value.0
	}
}
impl TryFrom<String> for ClientId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view("Client", &value, CLIENT_ID_MAX_LEN)?;

		Ok(Self(value))
	}
}
impl Borrow<str> for ClientId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl Debug for ClientId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Client({})", self.0)
	}
}
impl Display for ClientId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for ClientId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(kind: &'static str, view: &str, max: usize) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.chars().count() > max {
		return Err(IdentifierError::TooLong { kind, max });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn client_ids_reject_whitespace_and_empty() {
		assert!(ClientId::new(" spa").is_err(), "Leading whitespace must be rejected.");
		assert!(ClientId::new("spa ").is_err(), "Trailing whitespace must be rejected.");
		assert!(ClientId::new("").is_err());

		let id = ClientId::new("spa-1").expect("Client id fixture should be considered valid.");

		assert_eq!(id.as_str(), "spa-1");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let id: ClientId =
			serde_json::from_str("\"machine\"").expect("Client id should deserialize.");

		assert_eq!(id.as_ref(), "machine");
		assert!(serde_json::from_str::<ClientId>("\"with space\"").is_err());
	}

	#[test]
	fn length_limits_apply() {
		let exact = "a".repeat(CLIENT_ID_MAX_LEN);

		ClientId::new(&exact).expect("Exact length should succeed.");

		assert!(ClientId::new("a".repeat(CLIENT_ID_MAX_LEN + 1)).is_err());

		let id = ClientId::new("abcdef").expect("Client id fixture should be valid.");

		assert!(id.check_len(6).is_ok());
		assert!(matches!(id.check_len(5), Err(IdentifierError::TooLong { max: 5, .. })));
	}

	#[test]
	fn client_keys_parse_trimmed_integers() {
		assert_eq!("42".parse::<ClientKey>(), Ok(ClientKey(42)));
		assert_eq!(" 7 ".parse::<ClientKey>(), Ok(ClientKey(7)));
		assert!(matches!("x1".parse::<ClientKey>(), Err(ValidationError::InvalidKey { .. })));
		assert!(!ClientKey::UNASSIGNED.is_assigned());
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<ClientId, u8> = HashMap::from_iter([(
			ClientId::new("spa1").expect("Client id used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("spa1"), Some(&7));
	}
}
