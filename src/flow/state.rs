//! Explicit per-round negotiation state and its transition function.
//!
//! Each HTTP round trip consumes the old state and produces either a successor state or a
//! terminal outcome, so the state machine's steps stay testable without a transport.

// self
use crate::{
	_prelude::*,
	creds::Credentials,
	error::ConfigError,
	flow::{EmptyActionPolicy, NegotiationOutcome, NegotiationProfile, SamlAssertion},
	http::{HttpMethod, PageRequest},
	page::{FormDescriptor, FormFields, PageAction, RedirectTarget},
};

/// Mutable-by-replacement loop state: the next request's target, verb, and fields, plus the
/// remaining redirect budget.
#[derive(Clone, Debug)]
pub(crate) struct NegotiationState {
	pub(crate) url: Url,
	pub(crate) method: HttpMethod,
	pub(crate) fields: FormFields,
	pub(crate) requests_remaining: u32,
}

/// Result of applying one page action to the current state.
#[derive(Debug)]
pub(crate) enum Step {
	/// Issue another round trip from the successor state.
	Continue(NegotiationState),
	/// The flow reached a terminal outcome; no further request is issued.
	Finished(NegotiationOutcome),
}

impl NegotiationState {
	/// Seeds the state for the first round: GET against the service provider URL.
	pub(crate) fn initial(url: Url, budget: u32) -> Self {
		Self {
			url,
			method: HttpMethod::Get,
			fields: FormFields::default(),
			requests_remaining: budget,
		}
	}

	/// Builds the outbound request for the current round.
	pub(crate) fn to_request(&self) -> PageRequest {
		PageRequest { method: self.method, url: self.url.clone(), fields: self.fields.clone() }
	}

	/// Consumes one unit of redirect budget after a round trip completes.
	pub(crate) fn after_round(mut self) -> Self {
		self.requests_remaining = self.requests_remaining.saturating_sub(1);

		self
	}

	/// Applies the extracted page action, producing the successor state or a terminal outcome.
	pub(crate) fn transition(
		self,
		action: Option<PageAction>,
		profile: &NegotiationProfile,
		creds: &Credentials,
	) -> Result<Step, ConfigError> {
		match action {
			None => Ok(Step::Finished(NegotiationOutcome::NoActionableContent)),
			Some(PageAction::Redirect(redirect)) => self.follow_redirect(redirect),
			Some(PageAction::Form(form)) => self.submit_form(form, profile, creds),
		}
	}

	fn follow_redirect(self, redirect: RedirectTarget) -> Result<Step, ConfigError> {
		let url = self.url.join(&redirect.target).map_err(|source| {
			ConfigError::InvalidRedirectTarget { target: redirect.target.clone(), source }
		})?;

		Ok(Step::Continue(Self {
			url,
			method: HttpMethod::Get,
			fields: FormFields::default(),
			requests_remaining: self.requests_remaining,
		}))
	}

	fn submit_form(
		self,
		form: FormDescriptor,
		profile: &NegotiationProfile,
		creds: &Credentials,
	) -> Result<Step, ConfigError> {
		// Absent and empty actions are treated alike; the policy decides what they mean.
		let url = match form.action.as_deref().filter(|action| !action.is_empty()) {
			Some(action) => self.url.join(action).map_err(|source| {
				ConfigError::InvalidFormAction { action: action.to_owned(), source }
			})?,
			None => match profile.empty_action {
				EmptyActionPolicy::ResubmitCurrent => self.url.clone(),
				EmptyActionPolicy::Reject => return Err(ConfigError::EmptyFormAction),
			},
		};
		let method = HttpMethod::parse(form.method.as_deref());
		let fields = form.fields.map_values(|name, value| {
			if profile.matches_username(name) {
				creds.username.clone()
			} else if profile.matches_password(name) {
				creds.password.expose().to_owned()
			} else {
				value
			}
		});

		if let Some(assertion) = fields.get(&profile.assertion_field).filter(|v| !v.is_empty()) {
			return Ok(Step::Finished(NegotiationOutcome::Assertion(SamlAssertion::new(
				assertion,
			))));
		}

		Ok(Step::Continue(Self { url, method, fields, requests_remaining: self.requests_remaining }))
	}
}
