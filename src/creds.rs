//! Credential material injected into recognized login form fields.

// self
use crate::_prelude::*;

/// Username/password pair injected verbatim into matching form fields.
///
/// Both values are opaque to the negotiator: they are never parsed or validated, only copied
/// into fields whose names match the profile's key sets.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
	/// Account name for the identity provider.
	pub username: String,
	/// Account password, redacted in log output.
	pub password: Password,
}
impl Credentials {
	/// Creates a new credential pair.
	pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self { username: username.into(), password: Password::new(password) }
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("username", &self.username)
			.field("password", &self.password)
			.finish()
	}
}

/// Redacted password wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Password(String);
impl Password {
	/// Wraps a new password string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner password value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for Password {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for Password {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Password").field(&"<redacted>").finish()
	}
}
impl Display for Password {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
