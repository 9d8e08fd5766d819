mod common;

// self
use common::{build_negotiator, creds};
use saml_negotiator::{
	error::{ConfigError, Error},
	flow::NegotiationProfile,
};

#[tokio::test]
async fn empty_sp_url_is_rejected_before_any_request() {
	let negotiator = build_negotiator(NegotiationProfile::default());
	let err = negotiator
		.negotiate("", &creds())
		.await
		.expect_err("An empty service provider URL should be rejected.");

	assert!(matches!(err, Error::Config(ConfigError::EmptySpUrl)));
}

#[tokio::test]
async fn unparseable_sp_url_is_rejected_before_any_request() {
	let negotiator = build_negotiator(NegotiationProfile::default());
	let err = negotiator
		.negotiate("not a url", &creds())
		.await
		.expect_err("An unparseable service provider URL should be rejected.");

	assert!(matches!(err, Error::Config(ConfigError::InvalidSpUrl { .. })));
}

#[tokio::test]
async fn transport_failure_propagates_as_a_hard_error() {
	// Port 9 (discard) on localhost is expected to refuse the connection.
	let negotiator = build_negotiator(NegotiationProfile::default());
	let err = negotiator
		.negotiate("http://127.0.0.1:9/start", &creds())
		.await
		.expect_err("A refused connection should surface as a transport error.");

	assert!(matches!(err, Error::Transport(_)));
}
