// self
use crate::obs::{FlowOutcome, RoundAction};

/// Records one HTTP round trip via the global metrics recorder (when enabled).
pub fn record_round(action: RoundAction) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("saml_negotiator_round_total", "action" => action.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = action;
	}
}

/// Records a negotiation outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("saml_negotiator_flow_total", "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}
