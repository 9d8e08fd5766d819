//! SAML negotiation loop: bounded form/redirect walking until an assertion appears.
//!
//! [`Negotiator::negotiate`] owns the iteration: it issues one HTTP round trip at a time,
//! feeds each body to the [`page`](crate::page) extractor, injects credentials into
//! recognized fields, and stops on the first populated assertion field, the first page
//! without actionable content, or an exhausted redirect budget. Those three endings are
//! distinct [`NegotiationOutcome`] variants; transport failures propagate as errors instead.

mod state;

use state::{NegotiationState, Step};

// self
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;
use crate::{
	_prelude::*,
	creds::Credentials,
	error::ConfigError,
	http::PageHttpClient,
	obs::{self, FlowOutcome, FlowSpan, RoundAction},
	page::{self, PageAction},
};

const USERNAME_KEYS: &[&str] = &["username", "user_name", "client_id"];
const PASSWORD_KEYS: &[&str] = &["password", "passwd", "client_secret"];
const ASSERTION_FIELD: &str = "SAMLResponse";

#[cfg(feature = "reqwest")]
/// Negotiator specialized for the crate's default reqwest transport.
pub type ReqwestNegotiator = Negotiator<ReqwestHttpClient>;

/// Immutable per-negotiation configuration, replacing the classic module-level constant
/// tables so key sets and budgets can be overridden per invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationProfile {
	/// Field names (matched case-insensitively) that receive the username.
	pub username_keys: Vec<String>,
	/// Field names (matched case-insensitively) that receive the password.
	pub password_keys: Vec<String>,
	/// Field name (matched exactly) whose non-empty value ends the flow.
	pub assertion_field: String,
	/// Redirect budget; zero falls back to [`NegotiationProfile::DEFAULT_MAX_REDIRECTS`].
	pub max_redirects: u32,
	/// How a form with an empty or absent `action` is handled.
	pub empty_action: EmptyActionPolicy,
}
impl NegotiationProfile {
	/// Default redirect budget applied when none (or zero) is configured.
	pub const DEFAULT_MAX_REDIRECTS: u32 = 10;

	/// Replaces the username key set.
	pub fn with_username_keys<I>(mut self, keys: I) -> Self
	where
		I: IntoIterator,
		I::Item: Into<String>,
	{
		self.username_keys = keys.into_iter().map(Into::into).collect();

		self
	}

	/// Replaces the password key set.
	pub fn with_password_keys<I>(mut self, keys: I) -> Self
	where
		I: IntoIterator,
		I::Item: Into<String>,
	{
		self.password_keys = keys.into_iter().map(Into::into).collect();

		self
	}

	/// Overrides the terminal assertion field name.
	pub fn with_assertion_field(mut self, field: impl Into<String>) -> Self {
		self.assertion_field = field.into();

		self
	}

	/// Overrides the redirect budget.
	pub fn with_max_redirects(mut self, max_redirects: u32) -> Self {
		self.max_redirects = max_redirects;

		self
	}

	/// Overrides the empty-action policy.
	pub fn with_empty_action(mut self, policy: EmptyActionPolicy) -> Self {
		self.empty_action = policy;

		self
	}

	/// Effective redirect budget: the configured value, or the default when it is zero.
	pub fn budget(&self) -> u32 {
		if self.max_redirects == 0 { Self::DEFAULT_MAX_REDIRECTS } else { self.max_redirects }
	}

	pub(crate) fn matches_username(&self, name: &str) -> bool {
		self.username_keys.iter().any(|key| key.eq_ignore_ascii_case(name))
	}

	pub(crate) fn matches_password(&self, name: &str) -> bool {
		self.password_keys.iter().any(|key| key.eq_ignore_ascii_case(name))
	}
}
impl Default for NegotiationProfile {
	fn default() -> Self {
		Self {
			username_keys: USERNAME_KEYS.iter().map(|key| (*key).to_owned()).collect(),
			password_keys: PASSWORD_KEYS.iter().map(|key| (*key).to_owned()).collect(),
			assertion_field: ASSERTION_FIELD.to_owned(),
			max_redirects: Self::DEFAULT_MAX_REDIRECTS,
			empty_action: EmptyActionPolicy::default(),
		}
	}
}

/// How a form with an empty or absent `action` attribute is resolved.
///
/// Auto-submitting IdP pages differ here, so the behavior is explicit instead of guessed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyActionPolicy {
	#[default]
	/// Re-submit to the current URL, as a browser would.
	ResubmitCurrent,
	/// Surface [`ConfigError::EmptyFormAction`](crate::error::ConfigError::EmptyFormAction).
	Reject,
}

/// Raw `SAMLResponse` value extracted from the terminal form.
///
/// The blob (typically base64-encoded XML) is carried verbatim; the negotiator never decodes
/// or validates it. `Display` renders it verbatim for piping, while `Debug` redacts it to a
/// length since assertions grant access.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamlAssertion(String);
impl SamlAssertion {
	/// Wraps an extracted assertion value.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw assertion value.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Unwraps the raw assertion value.
	pub fn into_string(self) -> String {
		self.0
	}
}
impl AsRef<str> for SamlAssertion {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Debug for SamlAssertion {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "SamlAssertion({} bytes)", self.0.len())
	}
}
impl Display for SamlAssertion {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Terminal ending of a negotiation.
///
/// Only transport and caller-input failures are errors; every flow-level ending, including
/// the absent-assertion ones, is a distinct variant here so callers can tell the causes
/// apart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NegotiationOutcome {
	/// The terminal assertion value was extracted.
	Assertion(SamlAssertion),
	/// A page carried neither a form nor a usable meta-refresh.
	NoActionableContent,
	/// The redirect budget elapsed before an assertion appeared.
	BudgetExhausted,
}
impl NegotiationOutcome {
	/// Returns the assertion when the flow succeeded.
	pub fn assertion(&self) -> Option<&SamlAssertion> {
		match self {
			Self::Assertion(assertion) => Some(assertion),
			_ => None,
		}
	}
}

/// Outcome of a finished negotiation plus the number of HTTP round trips it consumed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationReport {
	/// Terminal ending of the flow.
	pub outcome: NegotiationOutcome,
	/// HTTP round trips issued before the flow ended.
	pub rounds: u32,
}
impl NegotiationReport {
	/// Returns the assertion when the flow succeeded.
	pub fn assertion(&self) -> Option<&SamlAssertion> {
		self.outcome.assertion()
	}
}

/// Drives non-interactive SAML Web Browser SSO flows against a service provider.
///
/// The negotiator owns the HTTP client and the profile; each [`negotiate`](Self::negotiate)
/// call owns an independent [`NegotiationState`], so a single negotiator can serve concurrent
/// flows. The transport's connection pool and cookie jar are the only state shared between
/// rounds, and the loop neither inspects nor resets them.
#[derive(Clone)]
pub struct Negotiator<C>
where
	C: ?Sized + PageHttpClient,
{
	/// HTTP client wrapper used for every round trip.
	pub http_client: Arc<C>,
	/// Key sets, budget, and policies applied to every negotiation.
	pub profile: NegotiationProfile,
}
impl<C> Negotiator<C>
where
	C: ?Sized + PageHttpClient,
{
	/// Creates a negotiator that reuses the caller-provided transport.
	pub fn with_http_client(profile: NegotiationProfile, http_client: impl Into<Arc<C>>) -> Self {
		Self { http_client: http_client.into(), profile }
	}

	/// Walks the SSO chain starting at `sp_url` until a terminal outcome.
	///
	/// Each iteration performs exactly one network round trip. Transport failures propagate
	/// as [`Error::Transport`](crate::error::Error::Transport); an empty or unparseable
	/// `sp_url` surfaces as a configuration error before any request is issued.
	pub async fn negotiate(&self, sp_url: &str, creds: &Credentials) -> Result<NegotiationReport> {
		let span = FlowSpan::new("negotiate");

		obs::record_flow_outcome(FlowOutcome::Attempt);

		let result = span.instrument(self.run(sp_url, creds)).await;

		match &result {
			Ok(report) => obs::record_flow_outcome(outcome_label(&report.outcome)),
			Err(_) => obs::record_flow_outcome(FlowOutcome::Failure),
		}

		result
	}

	async fn run(&self, sp_url: &str, creds: &Credentials) -> Result<NegotiationReport> {
		if sp_url.is_empty() {
			return Err(ConfigError::EmptySpUrl.into());
		}

		let url = Url::parse(sp_url).map_err(|source| ConfigError::InvalidSpUrl { source })?;
		let mut state = NegotiationState::initial(url, self.profile.budget());
		let mut rounds = 0_u32;

		loop {
			let response = self.http_client.fetch(state.to_request()).await?;

			rounds += 1;

			let action = page::extract(&response.body);
			let action_label = round_label(action.as_ref());

			obs::record_round(action_label);
			#[cfg(feature = "tracing")]
			tracing::debug!(
				round = rounds,
				status = response.status,
				action = %action_label,
				"Processed negotiation round."
			);

			match state.after_round().transition(action, &self.profile, creds)? {
				Step::Finished(outcome) => return Ok(NegotiationReport { outcome, rounds }),
				Step::Continue(next) if next.requests_remaining == 0 =>
					return Ok(NegotiationReport {
						outcome: NegotiationOutcome::BudgetExhausted,
						rounds,
					}),
				Step::Continue(next) => state = next,
			}
		}
	}
}
#[cfg(feature = "reqwest")]
impl Negotiator<ReqwestHttpClient> {
	/// Creates a negotiator backed by a default reqwest client.
	pub fn new(profile: NegotiationProfile) -> Self {
		Self::with_http_client(profile, ReqwestHttpClient::default())
	}

	/// Creates a negotiator whose reqwest client routes through the configured proxies.
	pub fn with_proxies(
		profile: NegotiationProfile,
		proxies: &crate::http::ProxyConfig,
	) -> Result<Self> {
		Ok(Self::with_http_client(profile, ReqwestHttpClient::with_proxies(proxies)?))
	}
}
impl<C> Debug for Negotiator<C>
where
	C: ?Sized + PageHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Negotiator").field("profile", &self.profile).finish()
	}
}

fn round_label(action: Option<&PageAction>) -> RoundAction {
	match action {
		Some(PageAction::Form(_)) => RoundAction::Form,
		Some(PageAction::Redirect(_)) => RoundAction::Redirect,
		None => RoundAction::NoAction,
	}
}

fn outcome_label(outcome: &NegotiationOutcome) -> FlowOutcome {
	match outcome {
		NegotiationOutcome::Assertion(_) => FlowOutcome::Assertion,
		NegotiationOutcome::NoActionableContent => FlowOutcome::NoActionableContent,
		NegotiationOutcome::BudgetExhausted => FlowOutcome::BudgetExhausted,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn default_profile_reproduces_the_classic_constants() {
		let profile = NegotiationProfile::default();

		assert_eq!(profile.username_keys, ["username", "user_name", "client_id"]);
		assert_eq!(profile.password_keys, ["password", "passwd", "client_secret"]);
		assert_eq!(profile.assertion_field, "SAMLResponse");
		assert_eq!(profile.budget(), 10);
		assert_eq!(profile.empty_action, EmptyActionPolicy::ResubmitCurrent);
	}

	#[test]
	fn zero_budget_falls_back_to_the_default() {
		let profile = NegotiationProfile::default().with_max_redirects(0);

		assert_eq!(profile.budget(), NegotiationProfile::DEFAULT_MAX_REDIRECTS);

		let profile = profile.with_max_redirects(3);

		assert_eq!(profile.budget(), 3);
	}

	#[test]
	fn assertion_debug_redacts_the_blob() {
		let assertion = SamlAssertion::new("opaque-blob");

		assert_eq!(format!("{assertion:?}"), "SamlAssertion(11 bytes)");
		assert_eq!(format!("{assertion}"), "opaque-blob");
	}
}
