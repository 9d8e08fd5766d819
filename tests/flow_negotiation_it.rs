mod common;

// crates.io
use httpmock::prelude::*;
// self
use common::{PASSWORD, USERNAME, build_negotiator, creds};
use saml_negotiator::flow::{NegotiationOutcome, NegotiationProfile};

const ASSERTION_BLOB: &str = "PHNhbWxwOlJlc3BvbnNlIC8+Pg==";

fn assertion_page(action: &str) -> String {
	format!(
		r#"<html><body onload="document.forms[0].submit()">
		<form action="{action}" method="post">
			<input type="hidden" name="SAMLResponse" value="{ASSERTION_BLOB}" />
			<input type="hidden" name="RelayState" value="token" />
		</form>
		</body></html>"#,
	)
}

#[tokio::test]
async fn three_hop_chain_returns_assertion_in_three_rounds() {
	let server = MockServer::start_async().await;
	let login = server
		.mock_async(|when, then| {
			when.method(GET).path("/start");
			then.status(200).header("content-type", "text/html").body(
				r#"<form action="/login" method="post">
					<input name="username" value="" />
					<input name="password" value="" />
					<input type="hidden" name="csrf_token" value="tok-1" />
				</form>"#,
			);
		})
		.await;
	let intermediate = server
		.mock_async(|when, then| {
			when.method(POST).path("/login");
			then.status(200).header("content-type", "text/html").body(
				r#"<form action="/continue" method="post">
					<input type="hidden" name="hop" value="2" />
				</form>"#,
			);
		})
		.await;
	let terminal = server
		.mock_async(|when, then| {
			when.method(POST).path("/continue");
			then.status(200)
				.header("content-type", "text/html")
				.body(assertion_page("https://sp.example/acs"));
		})
		.await;
	let negotiator = build_negotiator(NegotiationProfile::default());
	let report = negotiator
		.negotiate(&server.url("/start"), &creds())
		.await
		.expect("Three-hop negotiation should succeed.");

	assert_eq!(
		report.assertion().map(|assertion| assertion.as_str()),
		Some(ASSERTION_BLOB),
		"The raw assertion value should surface verbatim.",
	);
	assert_eq!(report.rounds, 3);

	// The terminal form is never submitted; the flow stops at extraction.
	login.assert_calls_async(1).await;
	intermediate.assert_calls_async(1).await;
	terminal.assert_calls_async(1).await;
}

#[tokio::test]
async fn get_form_carries_injected_fields_as_query_params() {
	let server = MockServer::start_async().await;
	let _start = server
		.mock_async(|when, then| {
			when.method(GET).path("/start");
			then.status(200).header("content-type", "text/html").body(
				r#"<form action="/verify" method="GET">
					<input name="USER_NAME" value="" />
					<input name="Password" value="" />
				</form>"#,
			);
		})
		.await;
	let verify = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/verify")
				.query_param("USER_NAME", USERNAME)
				.query_param("Password", PASSWORD);
			then.status(200).header("content-type", "text/html").body(assertion_page("/acs"));
		})
		.await;
	let negotiator = build_negotiator(NegotiationProfile::default());
	let report = negotiator
		.negotiate(&server.url("/start"), &creds())
		.await
		.expect("GET-form negotiation should succeed.");

	assert_eq!(report.rounds, 2);
	assert!(report.assertion().is_some());

	verify.assert_async().await;
}

#[tokio::test]
async fn budget_of_one_stops_after_exactly_one_round() {
	let server = MockServer::start_async().await;
	let login = server
		.mock_async(|when, then| {
			when.method(GET).path("/start");
			then.status(200).header("content-type", "text/html").body(
				r#"<form action="/login" method="post"><input name="username" /></form>"#,
			);
		})
		.await;
	let negotiator = build_negotiator(NegotiationProfile::default().with_max_redirects(1));
	let report = negotiator
		.negotiate(&server.url("/start"), &creds())
		.await
		.expect("Budget-bounded negotiation should finish without a transport error.");

	assert_eq!(report.outcome, NegotiationOutcome::BudgetExhausted);
	assert_eq!(report.rounds, 1);

	login.assert_calls_async(1).await;
}

#[tokio::test]
async fn empty_body_ends_with_no_actionable_content() {
	let server = MockServer::start_async().await;
	let start = server
		.mock_async(|when, then| {
			when.method(GET).path("/start");
			then.status(200).header("content-type", "text/html").body("");
		})
		.await;
	let negotiator = build_negotiator(NegotiationProfile::default());
	let report = negotiator
		.negotiate(&server.url("/start"), &creds())
		.await
		.expect("Negotiation against an empty page should finish without a transport error.");

	assert_eq!(report.outcome, NegotiationOutcome::NoActionableContent);
	assert_eq!(report.rounds, 1);

	start.assert_calls_async(1).await;
}

#[tokio::test]
async fn meta_refresh_hop_is_followed_with_get() {
	let server = MockServer::start_async().await;
	let _start = server
		.mock_async(|when, then| {
			when.method(GET).path("/start");
			then.status(200)
				.header("content-type", "text/html")
				.body(r#"<meta http-equiv="refresh" content="0;url=/sso">"#);
		})
		.await;
	let sso = server
		.mock_async(|when, then| {
			when.method(GET).path("/sso");
			then.status(200).header("content-type", "text/html").body(assertion_page("/acs"));
		})
		.await;
	let negotiator = build_negotiator(NegotiationProfile::default());
	let report = negotiator
		.negotiate(&server.url("/start"), &creds())
		.await
		.expect("Meta-refresh negotiation should succeed.");

	assert_eq!(report.rounds, 2);
	assert!(report.assertion().is_some());

	sso.assert_async().await;
}

#[tokio::test]
async fn assertion_on_a_later_hop_is_unreachable_with_a_budget_of_one() {
	let server = MockServer::start_async().await;
	let _start = server
		.mock_async(|when, then| {
			when.method(GET).path("/start");
			then.status(200)
				.header("content-type", "text/html")
				.body(r#"<meta http-equiv="refresh" content="0;url=/sso">"#);
		})
		.await;
	let sso = server
		.mock_async(|when, then| {
			when.method(GET).path("/sso");
			then.status(200).header("content-type", "text/html").body(assertion_page("/acs"));
		})
		.await;
	let negotiator = build_negotiator(NegotiationProfile::default().with_max_redirects(1));
	let report = negotiator
		.negotiate(&server.url("/start"), &creds())
		.await
		.expect("Budget-bounded negotiation should finish without a transport error.");

	assert_eq!(report.outcome, NegotiationOutcome::BudgetExhausted);
	assert_eq!(report.rounds, 1);

	sso.assert_calls_async(0).await;
}

#[tokio::test]
async fn custom_assertion_field_is_honored() {
	let server = MockServer::start_async().await;
	let _start = server
		.mock_async(|when, then| {
			when.method(GET).path("/start");
			then.status(200).header("content-type", "text/html").body(
				r#"<form action="/acs" method="post">
					<input type="hidden" name="TokenResponse" value="custom-blob" />
				</form>"#,
			);
		})
		.await;
	let negotiator =
		build_negotiator(NegotiationProfile::default().with_assertion_field("TokenResponse"));
	let report = negotiator
		.negotiate(&server.url("/start"), &creds())
		.await
		.expect("Negotiation with a custom assertion field should succeed.");

	assert_eq!(report.assertion().map(|assertion| assertion.as_str()), Some("custom-blob"));
	assert_eq!(report.rounds, 1);
}
