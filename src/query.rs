//! Listing, sorting, and id-list inputs of the registry API.

// self
use crate::{_prelude::*, config::RegistryConfig, error::ValidationError, model::ClientKey};

/// Column a listing can be sorted by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
	/// Surrogate key.
	#[default]
	Id,
	/// OAuth client identifier.
	ClientId,
	/// Display name.
	ClientName,
	/// Enabled flag.
	Enabled,
	/// Creation instant.
	Created,
}
impl SortField {
	/// Returns the snake_case column name.
	pub const fn as_str(self) -> &'static str {
		match self {
			SortField::Id => "id",
			SortField::ClientId => "client_id",
			SortField::ClientName => "client_name",
			SortField::Enabled => "enabled",
			SortField::Created => "created",
		}
	}
}

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
	/// Ascending.
	#[default]
	Asc,
	/// Descending.
	Desc,
}

/// Parsed sort expression; defaults to the surrogate key ascending.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SortSpec {
	/// Column.
	pub field: SortField,
	/// Direction.
	pub direction: SortDirection,
}
impl SortSpec {
	/// Ascending sort on a field.
	pub const fn asc(field: SortField) -> Self {
		Self { field, direction: SortDirection::Asc }
	}

	/// Descending sort on a field.
	pub const fn desc(field: SortField) -> Self {
		Self { field, direction: SortDirection::Desc }
	}
}
impl FromStr for SortSpec {
	type Err = ValidationError;

	/// Accepts `field`, `field asc`, `field desc`, or `-field`; field names may be written in
	/// snake_case, camelCase, or PascalCase. Blank input yields the default.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let unknown = || ValidationError::UnknownSortField { value: s.to_owned() };
		let trimmed = s.trim();

		if trimmed.is_empty() {
			return Ok(Self::default());
		}

		let mut parts = trimmed.split_whitespace();
		let raw_field = parts.next().ok_or_else(unknown)?;
		let (raw_field, mut direction) = match raw_field.strip_prefix('-') {
			Some(rest) => (rest, SortDirection::Desc),
			None => (raw_field, SortDirection::Asc),
		};

		if let Some(raw_direction) = parts.next() {
			direction = match raw_direction.to_ascii_lowercase().as_str() {
				"asc" => SortDirection::Asc,
				"desc" => SortDirection::Desc,
				_ => return Err(unknown()),
			};
		}
		if parts.next().is_some() {
			return Err(unknown());
		}

		let field = match raw_field.to_ascii_lowercase().replace('_', "").as_str() {
			"id" => SortField::Id,
			"clientid" => SortField::ClientId,
			"clientname" => SortField::ClientName,
			"enabled" => SortField::Enabled,
			"created" => SortField::Created,
			_ => return Err(unknown()),
		};

		Ok(Self { field, direction })
	}
}
impl TryFrom<String> for SortSpec {
	type Error = ValidationError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}
impl From<SortSpec> for String {
	fn from(value: SortSpec) -> Self {
		value.to_string()
	}
}
impl Display for SortSpec {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self.direction {
			SortDirection::Asc => f.write_str(self.field.as_str()),
			SortDirection::Desc => write!(f, "{} desc", self.field.as_str()),
		}
	}
}

/// Caller-facing listing query, shaped like `?sort=&skip=&limit=`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageQuery {
	/// Sort expression.
	pub sort: SortSpec,
	/// Rows to skip.
	pub skip: usize,
	/// Page size; `None` uses the configured default.
	pub limit: Option<usize>,
}
impl PageQuery {
	/// First page with the default sort and page size.
	pub fn first() -> Self {
		Self::default()
	}

	/// Parses raw query-string values.
	pub fn parse(
		sort: Option<&str>,
		skip: usize,
		limit: Option<usize>,
	) -> Result<Self, ValidationError> {
		let sort = sort.map(str::parse::<SortSpec>).transpose()?.unwrap_or_default();

		Ok(Self { sort, skip, limit })
	}

	/// Overrides the sort.
	pub fn sorted_by(mut self, sort: SortSpec) -> Self {
		self.sort = sort;

		self
	}

	/// Overrides the window.
	pub fn window(mut self, skip: usize, limit: usize) -> Self {
		self.skip = skip;
		self.limit = Some(limit);

		self
	}

	/// Resolves the page size against the configuration.
	pub fn resolve(&self, config: &RegistryConfig) -> PageRequest {
		let limit = self.limit.unwrap_or(config.default_page_size).min(config.max_page_size);

		PageRequest { sort: self.sort, skip: self.skip, limit }
	}
}

/// Fully resolved page window handed to stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
	/// Sort expression.
	pub sort: SortSpec,
	/// Rows to skip.
	pub skip: usize,
	/// Maximum rows to return.
	pub limit: usize,
}

/// One page of results plus the total row count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paged<T> {
	/// Items on this page.
	pub items: Vec<T>,
	/// Total number of rows, independent of the page window.
	pub total: u64,
}
impl<T> Paged<T> {
	/// Number of pages needed for `total` rows at `page_size` rows per page.
	pub fn page_count(&self, page_size: usize) -> u64 {
		if page_size == 0 {
			return 0;
		}

		self.total.div_ceil(page_size as u64)
	}
}

/// Ordered, de-duplicated list of client keys, parsed from a comma-separated path segment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientKeyList(Vec<ClientKey>);
impl ClientKeyList {
	/// Builds a list from keys, keeping the first occurrence of duplicates.
	pub fn new(keys: impl IntoIterator<Item = ClientKey>) -> Result<Self, ValidationError> {
		let mut seen = BTreeSet::new();
		let keys = keys.into_iter().filter(|key| seen.insert(*key)).collect::<Vec<_>>();

		if keys.is_empty() {
			return Err(ValidationError::InvalidKeyList { input: String::new() });
		}

		Ok(Self(keys))
	}

	/// Keys in request order.
	pub fn as_slice(&self) -> &[ClientKey] {
		&self.0
	}

	/// Number of keys.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Always `false`; empty lists are rejected at construction.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl FromStr for ClientKeyList {
	type Err = ValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let malformed = || ValidationError::InvalidKeyList { input: s.to_owned() };

		if s.trim().is_empty() {
			return Err(malformed());
		}

		let keys = s
			.split(',')
			.map(|part| part.parse::<ClientKey>().map_err(|_| malformed()))
			.collect::<Result<Vec<_>, _>>()?;

		Self::new(keys).map_err(|_| malformed())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn sort_expressions_parse() {
		assert_eq!("".parse::<SortSpec>(), Ok(SortSpec::default()));
		assert_eq!("ClientId".parse::<SortSpec>(), Ok(SortSpec::asc(SortField::ClientId)));
		assert_eq!(
			"clientName desc".parse::<SortSpec>(),
			Ok(SortSpec::desc(SortField::ClientName))
		);
		assert_eq!("-created".parse::<SortSpec>(), Ok(SortSpec::desc(SortField::Created)));
		assert_eq!("client_id ASC".parse::<SortSpec>(), Ok(SortSpec::asc(SortField::ClientId)));
		assert!("secret".parse::<SortSpec>().is_err());
		assert!("id sideways".parse::<SortSpec>().is_err());
		assert!("id desc extra".parse::<SortSpec>().is_err());
	}

	#[test]
	fn page_limits_resolve_against_config() {
		let config = RegistryConfig::default();

		assert_eq!(PageQuery::first().resolve(&config).limit, config.default_page_size);
		assert_eq!(
			PageQuery::first().window(0, 10_000).resolve(&config).limit,
			config.max_page_size
		);
		assert_eq!(PageQuery::first().window(5, 0).resolve(&config).limit, 0);

		let query = PageQuery::parse(Some("clientId desc"), 3, Some(2))
			.expect("Valid query parts should parse.");

		assert_eq!(query.sort, SortSpec::desc(SortField::ClientId));
		assert_eq!(query.skip, 3);
	}

	#[test]
	fn page_query_deserializes_from_query_shape() {
		let query: PageQuery = serde_json::from_str(r#"{"sort":"clientName","limit":5}"#)
			.expect("Page query should deserialize.");

		assert_eq!(query.sort, SortSpec::asc(SortField::ClientName));
		assert_eq!(query.skip, 0);
		assert_eq!(query.limit, Some(5));
	}

	#[test]
	fn key_lists_parse_and_dedupe() {
		let list = "3, 1,3,2".parse::<ClientKeyList>().expect("Key list should parse.");

		assert_eq!(list.as_slice(), &[ClientKey(3), ClientKey(1), ClientKey(2)]);

		for bad in ["", "  ", "1,,2", "1,a", "-1"] {
			assert!(
				matches!(bad.parse::<ClientKeyList>(), Err(ValidationError::InvalidKeyList { .. })),
				"{bad:?} should be rejected",
			);
		}
	}

	#[test]
	fn page_count_rounds_up() {
		let page = Paged::<u8> { items: Vec::new(), total: 41 };

		assert_eq!(page.page_count(20), 3);
		assert_eq!(page.page_count(0), 0);
	}
}
