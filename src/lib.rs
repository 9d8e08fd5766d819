//! Headless SAML Web Browser SSO negotiator—walk the auto-submitting form chain between a
//! service provider and an identity provider until a `SAMLResponse` appears, with a swappable
//! transport and transport-aware observability.
//!
//! The crate automates the classic scripted SSO pattern: issue a request, parse the returned
//! page for a login/continuation form or a meta-refresh redirect, inject credentials into
//! recognized fields, and repeat until the terminal assertion shows up or the redirect budget
//! runs out. No JavaScript execution, no MFA challenges, no assertion decoding.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod creds;
pub mod error;
pub mod flow;
pub mod http;
pub mod obs;
pub mod page;

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {httpmock as _, tokio as _};
