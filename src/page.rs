//! Form/redirect extraction from a single HTML response body.
//!
//! The extractor is the negotiator's only view into a page: it reports either the first
//! `<form>` (with its `action`, `method`, and input fields verbatim), the first usable
//! `<meta http-equiv="refresh">` redirect, or nothing. Attribute values are never normalized
//! here—relative/absolute URL handling belongs to the flow. Malformed markup is tolerated by
//! best-effort parsing: unparseable fragments simply yield no matches.

// std
use std::sync::LazyLock;
// crates.io
use scraper::{ElementRef, Html, Selector};
// self
use crate::_prelude::*;

static FORM_SELECTOR: LazyLock<Selector> =
	LazyLock::new(|| Selector::parse("form").expect("Static selector must parse."));
static INPUT_SELECTOR: LazyLock<Selector> =
	LazyLock::new(|| Selector::parse("input").expect("Static selector must parse."));
static META_SELECTOR: LazyLock<Selector> =
	LazyLock::new(|| Selector::parse("meta").expect("Static selector must parse."));

/// Next action carried by a page, as decided by [`extract`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageAction {
	/// The page carries a form to submit.
	Form(FormDescriptor),
	/// The page carries a meta-refresh redirect to follow with GET.
	Redirect(RedirectTarget),
}

/// First `<form>` of a page: target, verb, and input fields, all verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDescriptor {
	/// `action` attribute exactly as written, [`None`] when absent.
	pub action: Option<String>,
	/// `method` attribute exactly as written, [`None`] when absent.
	pub method: Option<String>,
	/// Input fields in document order.
	pub fields: FormFields,
}

/// Meta-refresh destination; implies a GET with no fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectTarget {
	/// Destination exactly as written in the document.
	pub target: String,
}

/// Ordered `name → value` mapping for form inputs.
///
/// Names are unique: inserting an existing name overwrites its value while keeping the
/// original position, matching how browsers and the flow treat repeated inputs (last seen
/// wins).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields(Vec<(String, String)>);
impl FormFields {
	/// Inserts or overwrites a field value.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
		let name = name.into();
		let value = value.into();

		if let Some(entry) = self.0.iter_mut().find(|(n, _)| *n == name) {
			entry.1 = value;
		} else {
			self.0.push((name, value));
		}
	}

	/// Returns the value stored under an exact field name.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
	}

	/// Iterates fields in document order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
	}

	/// Maps every value through `f`, preserving names and order.
	pub(crate) fn map_values(self, mut f: impl FnMut(&str, String) -> String) -> Self {
		Self(self.0.into_iter().map(|(n, v)| { let v = f(&n, v); (n, v) }).collect())
	}

	/// Borrows the fields as serializable pairs for query/body encoding.
	pub fn as_pairs(&self) -> &[(String, String)] {
		&self.0
	}

	/// Number of fields.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether no fields are present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl<N, V> FromIterator<(N, V)> for FormFields
where
	N: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
		let mut fields = Self::default();

		for (name, value) in iter {
			fields.insert(name, value);
		}

		fields
	}
}

/// Determines the next action carried by a page.
///
/// Returns the first `<form>` when one exists, otherwise the first
/// `<meta http-equiv="refresh">` with a usable target (`data-url` attribute preferred, else
/// the substring after the first `url=` in `content`), otherwise [`None`].
pub fn extract(markup: &str) -> Option<PageAction> {
	let document = Html::parse_document(markup);

	if let Some(form) = document.select(&FORM_SELECTOR).next() {
		return Some(PageAction::Form(read_form(form)));
	}

	let meta = document.select(&META_SELECTOR).find(|meta| {
		meta.value().attr("http-equiv").is_some_and(|v| v.eq_ignore_ascii_case("refresh"))
	})?;

	read_meta_refresh(meta).map(PageAction::Redirect)
}

fn read_form(form: ElementRef) -> FormDescriptor {
	let element = form.value();
	let mut fields = FormFields::default();

	for input in form.select(&INPUT_SELECTOR) {
		// Nameless inputs cannot be submitted, so they carry nothing for the flow.
		let Some(name) = input.value().attr("name") else {
			continue;
		};

		fields.insert(name, input.value().attr("value").unwrap_or_default());
	}

	FormDescriptor {
		action: element.attr("action").map(str::to_owned),
		method: element.attr("method").map(str::to_owned),
		fields,
	}
}

fn read_meta_refresh(meta: ElementRef) -> Option<RedirectTarget> {
	let element = meta.value();

	if let Some(data_url) = element.attr("data-url").filter(|v| !v.is_empty()) {
		return Some(RedirectTarget { target: data_url.to_owned() });
	}

	let content = element.attr("content")?;
	let (_, target) = content.split_once("url=")?;

	Some(RedirectTarget { target: target.to_owned() })
}
