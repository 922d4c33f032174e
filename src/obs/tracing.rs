// self
use crate::{_prelude::*, obs::OpKind};
#[cfg(feature = "tracing")] use crate::error::ErrorKind;

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// A span builder used by registry operations.
#[derive(Clone, Debug)]
pub struct OpSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OpSpan {
	/// Creates a new span tagged with the provided operation + stage.
	pub fn new(kind: OpKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("oidc_registry.op", op = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Logs a failed operation; internal failures at `error`, caller mistakes at `debug`.
///
/// [`Error::Failure`] details and [`Error::Storage`] backend messages only ever reach this log
/// line.
pub fn log_op_error(kind: OpKind, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		let class = error.kind().as_str();

		match error {
			Error::Failure { detail } =>
				tracing::error!(op = kind.as_str(), class, %detail, "Operation failed."),
			Error::Storage(source) =>
				tracing::error!(op = kind.as_str(), class, %source, "Operation failed."),
			_ if error.kind() == ErrorKind::Failure =>
				tracing::error!(op = kind.as_str(), class, %error, "Operation failed."),
			_ => tracing::debug!(op = kind.as_str(), class, %error, "Operation rejected."),
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, error);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn logging_accepts_every_error_kind() {
		log_op_error(OpKind::Get, &Error::NotFound { id: 9.into() });
		log_op_error(OpKind::Edit, &Error::failure("row 9 is corrupt"));
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = OpSpan::new(OpKind::List, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
