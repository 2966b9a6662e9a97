//! Free-text search predicates
//!
//! The engine cannot know which fields of an arbitrary entity are worth
//! searching, so the caller names them. [`TextSearch`] turns a search box
//! value into a [`Filter`] over those fields.

use crate::core::error::QueryError;
use crate::core::field::{FieldAccessor, FieldRegistry};
use crate::core::query::Filter;
use regex::{Regex, RegexBuilder};
use std::sync::Arc;

/// A free-text search request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextSearch {
    pub value: String,
    pub is_regex: bool,
}

impl TextSearch {
    pub fn new(value: impl Into<String>, is_regex: bool) -> Self {
        Self {
            value: value.into(),
            is_regex,
        }
    }

    /// Whether there is anything to search for
    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Build a predicate matching entities where any of `fields` matches
    ///
    /// Plain values match as case-insensitive substrings. Regex values are
    /// compiled case-insensitively and matched anywhere in the field text.
    /// Returns `Ok(None)` for an empty search.
    ///
    /// # Errors
    ///
    /// - [`QueryError::UnknownField`] if a field is not declared
    /// - [`QueryError::InvalidSearchPattern`] if the regex does not compile
    pub fn into_filter<E, S>(
        self,
        registry: &FieldRegistry<E>,
        fields: &[S],
    ) -> Result<Option<Filter<E>>, QueryError>
    where
        E: 'static,
        S: AsRef<str>,
    {
        if self.is_empty() {
            return Ok(None);
        }

        let accessors: Vec<FieldAccessor<E>> = fields
            .iter()
            .map(|field| {
                registry
                    .resolve(field.as_ref())
                    .map(|(_, accessor)| Arc::clone(accessor))
            })
            .collect::<Result<_, _>>()?;

        let matcher = Matcher::build(&self)?;

        tracing::trace!(
            entity = registry.entity(),
            fields = accessors.len(),
            regex = self.is_regex,
            "built text search filter"
        );

        let filter: Filter<E> = Arc::new(move |entity: &E| {
            accessors.iter().any(|accessor| {
                accessor(entity)
                    .as_text()
                    .is_some_and(|text| matcher.is_match(&text))
            })
        });
        Ok(Some(filter))
    }
}

enum Matcher {
    Substring(String),
    Pattern(Regex),
}

impl Matcher {
    fn build(search: &TextSearch) -> Result<Self, QueryError> {
        if search.is_regex {
            RegexBuilder::new(&search.value)
                .case_insensitive(true)
                .build()
                .map(Matcher::Pattern)
                .map_err(|e| QueryError::InvalidSearchPattern {
                    pattern: search.value.clone(),
                    message: e.to_string(),
                })
        } else {
            Ok(Matcher::Substring(search.value.trim().to_lowercase()))
        }
    }

    fn is_match(&self, text: &str) -> bool {
        match self {
            Matcher::Substring(needle) => text.to_lowercase().contains(needle.as_str()),
            Matcher::Pattern(regex) => regex.is_match(text),
        }
    }
}
