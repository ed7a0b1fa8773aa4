//! Sparse filter serialization and endpoint path templates.
//!
//! Every listable resource describes its filter as an ordered list of named
//! [`FilterValue`]s. Only values that are present and meaningful reach the
//! query string; everything else is omitted rather than sent empty.

use paas_core::{AppError, AppResult};
use url::form_urlencoded;

/// One optional scalar in a resource filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterValue<'a> {
    /// Numeric field, serialized only when strictly positive.
    Number(Option<i64>),
    /// Text field, serialized only when non-empty.
    Text(Option<&'a str>),
    /// Boolean flag, serialized only when `true`.
    Flag(Option<bool>),
}

impl FilterValue<'_> {
    /// Returns the query-string value, or `None` when the field must be omitted.
    #[must_use]
    pub fn serialize(&self) -> Option<String> {
        match *self {
            Self::Number(Some(value)) if value > 0 => Some(value.to_string()),
            Self::Text(Some(value)) if !value.is_empty() => Some(value.to_owned()),
            Self::Flag(Some(true)) => Some("true".to_owned()),
            Self::Number(_) | Self::Text(_) | Self::Flag(_) => None,
        }
    }
}

/// Filter shape of a listable resource.
pub trait QueryFilter {
    /// Returns the filter fields in declaration order.
    ///
    /// The order fixes the canonical query string; it has no semantic weight.
    fn fields(&self) -> Vec<(&'static str, FilterValue<'_>)>;
}

/// Filter for listings that accept no parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoFilter;

impl QueryFilter for NoFilter {
    fn fields(&self) -> Vec<(&'static str, FilterValue<'_>)> {
        Vec::new()
    }
}

/// Encodes the eligible filter fields, returning `None` when nothing qualifies.
#[must_use]
pub fn encode_query<F>(filter: &F) -> Option<String>
where
    F: QueryFilter + ?Sized,
{
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut appended = false;

    for (name, value) in filter.fields() {
        if let Some(value) = value.serialize() {
            serializer.append_pair(name, value.as_str());
            appended = true;
        }
    }

    appended.then(|| serializer.finish())
}

/// Appends the encoded filter to `path`, leaving out `?` when it would be empty.
#[must_use]
pub fn with_query<F>(path: &str, filter: &F) -> String
where
    F: QueryFilter + ?Sized,
{
    match encode_query(filter) {
        Some(query) => format!("{path}?{query}"),
        None => path.to_owned(),
    }
}

/// Endpoint path with `{name}` placeholders for user-controlled segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointTemplate(&'static str);

impl EndpointTemplate {
    /// Creates a template such as `/instances/{id}/service-logs`.
    #[must_use]
    pub const fn new(template: &'static str) -> Self {
        Self(template)
    }

    /// Returns the raw template text.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Interpolates percent-encoded parameter values into the template.
    pub fn render(&self, params: &[(&str, &str)]) -> AppResult<String> {
        let mut rendered = String::with_capacity(self.0.len());
        let mut rest = self.0;

        while let Some(start) = rest.find('{') {
            rendered.push_str(&rest[..start]);
            let after_open = &rest[start + 1..];
            let end = after_open.find('}').ok_or_else(|| {
                AppError::Internal(format!("endpoint template '{}' is unterminated", self.0))
            })?;
            let name = &after_open[..end];

            let value = params
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)
                .ok_or_else(|| {
                    AppError::Validation(format!(
                        "missing path parameter '{name}' for endpoint '{}'",
                        self.0
                    ))
                })?;
            if value.is_empty() {
                return Err(AppError::Validation(format!(
                    "path parameter '{name}' must not be empty"
                )));
            }

            rendered.push_str(&urlencoding::encode(value));
            rest = &after_open[end + 1..];
        }

        rendered.push_str(rest);
        Ok(rendered)
    }
}
