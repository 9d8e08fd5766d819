//! Transport primitives for page fetches.
//!
//! The module exposes [`PageHttpClient`] so downstream crates can integrate custom HTTP
//! clients: the negotiator's only dependency on an HTTP stack is "send this method/URL/fields
//! triple, give me back the body". GET requests carry the pending fields as query parameters,
//! POST requests as a form-encoded body. The transport may follow HTTP-layer 3xx redirects
//! transparently; only document-level forms and meta-refresh directives drive the flow's own
//! navigation.

#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::{_prelude::*, error::TransportError, page::FormFields};
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// HTTP verb used for a page fetch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
	/// Fields travel as query parameters.
	#[default]
	Get,
	/// Fields travel as a form-encoded body.
	Post,
}
impl HttpMethod {
	/// Parses a form `method` attribute, case-insensitively.
	///
	/// Anything other than `post` (including an absent attribute) falls back to GET, matching
	/// the lenient auto-submitting-form convention.
	pub fn parse(value: Option<&str>) -> Self {
		match value {
			Some(v) if v.eq_ignore_ascii_case("post") => Self::Post,
			_ => Self::Get,
		}
	}

	/// Returns the canonical uppercase verb.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// One outbound page fetch: verb, resolved URL, and pending fields.
#[derive(Clone, Debug)]
pub struct PageRequest {
	/// Verb selected by the most recently parsed form (GET on the first round).
	pub method: HttpMethod,
	/// Fully resolved request URL.
	pub url: Url,
	/// Pending fields, already credential-injected.
	pub fields: FormFields,
}

/// Body and status of a fetched page.
///
/// The flow reads only the body; the status is kept for diagnostics, matching the original
/// auto-submit convention of parsing every response regardless of status.
#[derive(Clone, Debug)]
pub struct PageResponse {
	/// HTTP status code of the final response.
	pub status: u16,
	/// Response body decoded as text.
	pub body: String,
}

/// Future returned by [`PageHttpClient::fetch`].
pub type PageFuture<'a> =
	Pin<Box<dyn Future<Output = Result<PageResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of fetching SSO pages.
///
/// Implementations must be `Send + Sync + 'static` so a single client can back concurrent
/// [`Negotiator`](crate::flow::Negotiator) instances, and the returned future must be `Send`
/// so negotiation futures can hop executors.
pub trait PageHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Executes one page fetch, encoding the fields per the request's verb.
	fn fetch(&self, request: PageRequest) -> PageFuture<'_>;
}

/// Proxy URLs keyed by outbound scheme, mirroring the classic `{"http": …, "https": …}` dict.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
	/// Proxy applied to plain HTTP requests.
	pub http: Option<Url>,
	/// Proxy applied to HTTPS requests.
	pub https: Option<Url>,
}
impl ProxyConfig {
	/// Whether no proxy is configured for either scheme.
	pub fn is_empty(&self) -> bool {
		self.http.is_none() && self.https.is_none()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The default client follows HTTP-layer redirects per reqwest's standard policy; that is an
/// accepted simplification outside the flow's state machine. Install a cookie store on a
/// custom client when an IdP chain depends on session cookies.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client routing through the configured per-scheme proxies.
	pub fn with_proxies(proxies: &ProxyConfig) -> Result<Self, ConfigError> {
		let mut builder = ReqwestClient::builder();

		if let Some(http) = proxies.http.as_ref() {
			builder = builder.proxy(reqwest::Proxy::http(http.as_str())?);
		}
		if let Some(https) = proxies.https.as_ref() {
			builder = builder.proxy(reqwest::Proxy::https(https.as_str())?);
		}

		Ok(Self(builder.build()?))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl PageHttpClient for ReqwestHttpClient {
	fn fetch(&self, request: PageRequest) -> PageFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let builder = match request.method {
				HttpMethod::Get => client.get(request.url).query(request.fields.as_pairs()),
				HttpMethod::Post => client.post(request.url).form(request.fields.as_pairs()),
			};
			let response = builder.send().await?;
			let status = response.status().as_u16();
			let body = response.text().await?;

			Ok(PageResponse { status, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn method_parsing_is_case_insensitive_with_get_fallback() {
		assert_eq!(HttpMethod::parse(Some("POST")), HttpMethod::Post);
		assert_eq!(HttpMethod::parse(Some("Post")), HttpMethod::Post);
		assert_eq!(HttpMethod::parse(Some("get")), HttpMethod::Get);
		assert_eq!(HttpMethod::parse(Some("DIALOG")), HttpMethod::Get);
		assert_eq!(HttpMethod::parse(None), HttpMethod::Get);
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn proxy_config_builds_client() {
		let proxies = ProxyConfig {
			http: Some(Url::parse("http://proxy.internal:3128").expect("Proxy URL should parse.")),
			https: None,
		};

		assert!(!proxies.is_empty());
		assert!(ReqwestHttpClient::with_proxies(&proxies).is_ok());
	}
}
