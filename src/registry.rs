//! Client registry facade over a [`ClientStore`].
//!
//! Every operation is a short-lived unit of work against the shared store: the registry keeps
//! no state of its own between calls, takes no locks, and leaves atomicity of each write to
//! the store.

pub mod create;
pub mod delete;

mod edit;
mod read;

pub use create::*;
pub use delete::*;

// self
use crate::{
	_prelude::*,
	config::RegistryConfig,
	error::ConfigError,
	obs::{self, OpKind, OpOutcome, OpSpan},
	store::ClientStore,
};

/// Validated registry of OAuth 2.0 / OIDC client configurations.
///
/// Cloning is cheap; clones share the underlying store.
#[derive(Clone)]
pub struct ClientRegistry {
	store: Arc<dyn ClientStore>,
	config: RegistryConfig,
}
impl ClientRegistry {
	/// Creates a registry with the default configuration.
	pub fn new(store: Arc<dyn ClientStore>) -> Self {
		Self { store, config: RegistryConfig::default() }
	}

	/// Creates a registry with a caller-provided configuration, validating it first.
	pub fn with_config(
		store: Arc<dyn ClientStore>,
		config: RegistryConfig,
	) -> Result<Self, ConfigError> {
		config.validate()?;

		Ok(Self { store, config })
	}

	/// Active configuration.
	pub fn config(&self) -> &RegistryConfig {
		&self.config
	}

	/// Backing store.
	pub fn store(&self) -> &Arc<dyn ClientStore> {
		&self.store
	}
}
impl Debug for ClientRegistry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientRegistry").field("config", &self.config).finish_non_exhaustive()
	}
}

/// Runs one registry operation inside its span, recording the outcome and logging failures.
async fn observe<T, Fut>(kind: OpKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = OpSpan::new(kind, stage);

	obs::record_op_outcome(kind, OpOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => obs::record_op_outcome(kind, OpOutcome::Success),
		Err(e) => {
			obs::record_op_outcome(kind, OpOutcome::Failure);
			obs::log_op_error(kind, e);
		},
	}

	result
}
