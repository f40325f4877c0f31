use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

const QUERY_SUFFIX: &str = "installation guide manual";

/// Inbound lookup as it arrives on the query string. Every field is optional
/// on the wire so that a missing one can be reported as a 400 instead of an
/// extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub component_type: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
}

impl SearchRequest {
    pub fn new(component_type: &str, brand: &str, model: Option<&str>) -> Self {
        Self {
            component_type: Some(component_type.to_string()),
            brand: Some(brand.to_string()),
            model: model.map(str::to_string),
        }
    }
}

/// Free-text search string shared by every source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn build(request: &SearchRequest) -> Result<SearchQuery, ValidationError> {
        let component_type = non_blank(&request.component_type)
            .ok_or(ValidationError::MissingRequiredFields)?;
        let brand = non_blank(&request.brand).ok_or(ValidationError::MissingRequiredFields)?;

        let query = match non_blank(&request.model) {
            Some(model) => format!("{brand} {model} {component_type} {QUERY_SUFFIX}"),
            None => format!("{brand} {component_type} {QUERY_SUFFIX}"),
        };
        Ok(SearchQuery(query))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased whitespace-separated terms, used for local relevance filtering.
    pub fn terms(&self) -> Vec<String> {
        self.0.split_whitespace().map(|t| t.to_lowercase()).collect()
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
