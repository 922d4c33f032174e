//! Consistent, validated registry for OAuth 2.0 / OpenID Connect client configurations.
//!
//! The [`ClientRegistry`](registry::ClientRegistry) creates clients from typed templates,
//! applies section-scoped edits through a read-modify-write-full cycle, assembles the full
//! client aggregate atomically, and deletes clients in batches. Persistence is delegated to a
//! [`ClientStore`](store::ClientStore); in-memory and JSON-file stores ship with the crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod config;
pub mod error;
pub mod mapper;
pub mod model;
pub mod obs;
pub mod query;
pub mod registry;
pub mod section;
pub mod store;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, BTreeSet, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use time;
pub use url;
#[cfg(test)] use color_eyre as _;
