#![allow(dead_code)]

// self
use saml_negotiator::{
	creds::Credentials,
	flow::{NegotiationProfile, Negotiator, ReqwestNegotiator},
};

pub const USERNAME: &str = "alice";
pub const PASSWORD: &str = "hunter2";

/// Builds a reqwest-backed negotiator for the provided profile.
pub fn build_negotiator(profile: NegotiationProfile) -> ReqwestNegotiator {
	Negotiator::new(profile)
}

/// Credential fixture shared across the negotiation tests.
pub fn creds() -> Credentials {
	Credentials::new(USERNAME, PASSWORD)
}
