//! Optional observability helpers for the negotiation flow.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `saml_negotiator.flow` with the `stage`
//!   (call site) field.
//! - Enable `metrics` to increment `saml_negotiator_round_total` per HTTP round trip (labeled
//!   by the extracted page action) and `saml_negotiator_flow_total` per negotiation (labeled by
//!   outcome).

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Page action labels recorded for each round trip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoundAction {
	/// The page carried a form.
	Form,
	/// The page carried a meta-refresh redirect.
	Redirect,
	/// The page carried nothing actionable.
	NoAction,
}
impl RoundAction {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RoundAction::Form => "form",
			RoundAction::Redirect => "redirect",
			RoundAction::NoAction => "no_action",
		}
	}
}
impl Display for RoundAction {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each negotiation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to the negotiation entry point.
	Attempt,
	/// Terminal assertion extracted.
	Assertion,
	/// Page without actionable content ended the flow.
	NoActionableContent,
	/// Redirect budget elapsed without an assertion.
	BudgetExhausted,
	/// Error propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Assertion => "assertion",
			FlowOutcome::NoActionableContent => "no_actionable_content",
			FlowOutcome::BudgetExhausted => "budget_exhausted",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
