//! Search form
//!
//! Parses the two form fields of the global search page:
//!
//! - `shr`: "apply the explicit model selection" flag (boolean, optional)
//! - `mdl`: selected model choice indices, repeated or comma separated

use crate::types::RequestParams;
use std::collections::BTreeSet;

pub const SHR: &str = "shr";
pub const MDL: &str = "mdl";

/// Values of the search form fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFormData {
	pub shr: bool,
	pub mdl: BTreeSet<usize>,
}

/// Bound search form
///
/// # Examples
///
/// ```
/// use reinhardt_gsearch::SearchRequest;
/// use reinhardt_gsearch::forms::SearchForm;
///
/// let request = SearchRequest::builder()
///     .uri("/admin/gsearch/?mdl=abc,1&shr=on")
///     .build()
///     .unwrap();
/// let choices = vec![(0, "blog.post".to_string()), (1, "blog.author".to_string())];
/// let form = SearchForm::new(request.request_params(), &choices);
///
/// assert!(form.is_valid());
/// let val = form.get_val();
/// assert!(val.shr);
/// assert_eq!(val.mdl.into_iter().collect::<Vec<_>>(), vec![1]);
/// ```
#[derive(Debug, Clone)]
pub struct SearchForm {
	initial: SearchFormData,
	cleaned: Option<SearchFormData>,
}

impl SearchForm {
	/// Form without submitted data; it never validates
	///
	/// The initial `mdl` value selects every choice; `shr` starts unset.
	pub fn unbound(choices: &[(usize, String)]) -> Self {
		Self {
			initial: SearchFormData {
				shr: false,
				mdl: choices.iter().map(|(idx, _)| *idx).collect(),
			},
			cleaned: None,
		}
	}

	/// Bind the form to `params`, with `choices` as the `mdl` choices
	///
	/// Selected indices outside `choices` are kept; they match no model.
	pub fn new(params: RequestParams<'_>, choices: &[(usize, String)]) -> Self {
		let mut form = Self::unbound(choices);
		form.cleaned = Some(SearchFormData {
			shr: params.get(SHR).map(parse_bool).unwrap_or(false),
			mdl: Self::clean_mdl(&params.get_all(MDL)),
		});
		form
	}

	/// Keep the digit-only tokens of the submitted `mdl` values
	///
	/// Each value may hold several comma separated tokens; anything that is
	/// not a plain run of ASCII digits is dropped.
	pub fn clean_mdl(values: &[&str]) -> BTreeSet<usize> {
		values
			.iter()
			.flat_map(|value| value.split(','))
			.map(str::trim)
			.filter(|token| !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()))
			.filter_map(|token| token.parse().ok())
			.collect()
	}

	pub fn is_valid(&self) -> bool {
		self.cleaned.is_some()
	}

	pub fn initial(&self) -> &SearchFormData {
		&self.initial
	}

	/// Cleaned values when the form is valid and `shr` is set, initial values otherwise
	pub fn get_val(&self) -> SearchFormData {
		match &self.cleaned {
			Some(cleaned) if cleaned.shr => cleaned.clone(),
			_ => self.initial.clone(),
		}
	}
}

/// Checkbox semantics: absent, empty, `false` and `0` are false
fn parse_bool(value: &str) -> bool {
	!matches!(value.trim(), "" | "0" | "false" | "False")
}
