use crate::constants::protocols::ALLOWED_HTTP;
use crate::errors::ToolError;
use serde_json::Value;
use url::Url;

/// Argument checks shared by every tool handler.
///
/// The catalog schema already rejects most malformed input before a handler
/// runs; these helpers re-check what a handler depends on so a handler is
/// safe to call directly.
#[derive(Clone, Default)]
pub struct Validation;

impl Validation {
    pub fn new() -> Self {
        Self
    }

    pub fn ensure_string(
        &self,
        value: Option<&Value>,
        label: &str,
        trim: bool,
    ) -> Result<String, ToolError> {
        let text = value.and_then(|v| v.as_str()).ok_or_else(|| {
            ToolError::invalid_params(format!("{} must be a non-empty string", label))
        })?;
        let normalized = text.trim();
        if normalized.is_empty() {
            return Err(ToolError::invalid_params(format!(
                "{} must be a non-empty string",
                label
            )));
        }
        Ok(if trim {
            normalized.to_string()
        } else {
            text.to_string()
        })
    }

    pub fn ensure_choice(
        &self,
        value: Option<&Value>,
        label: &str,
        allowed: &[&str],
    ) -> Result<String, ToolError> {
        let raw = self.ensure_string(value, label, true)?;
        if allowed.contains(&raw.as_str()) {
            return Ok(raw);
        }
        Err(ToolError::invalid_params(format!(
            "{} must be one of: {}",
            label,
            allowed.join(", ")
        )))
    }

    pub fn ensure_optional_choice(
        &self,
        value: Option<&Value>,
        label: &str,
        allowed: &[&str],
    ) -> Result<Option<String>, ToolError> {
        match value {
            None => Ok(None),
            Some(v) if v.is_null() => Ok(None),
            Some(v) => self.ensure_choice(Some(v), label, allowed).map(Some),
        }
    }

    pub fn ensure_optional_int(
        &self,
        value: Option<&Value>,
        label: &str,
        min: i64,
        max: i64,
    ) -> Result<Option<i64>, ToolError> {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return Ok(None);
        };
        let numeric = value
            .as_i64()
            .or_else(|| {
                value
                    .as_f64()
                    .filter(|n| n.fract() == 0.0)
                    .map(|n| n as i64)
            })
            .ok_or_else(|| {
                ToolError::invalid_params(format!(
                    "{} must be an integer between {} and {}",
                    label, min, max
                ))
            })?;
        if numeric < min || numeric > max {
            return Err(ToolError::invalid_params(format!(
                "{} must be an integer between {} and {}",
                label, min, max
            )));
        }
        Ok(Some(numeric))
    }

    pub fn ensure_optional_number(
        &self,
        value: Option<&Value>,
        label: &str,
        range: (f64, f64),
    ) -> Result<Option<f64>, ToolError> {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return Ok(None);
        };
        let (min, max) = range;
        let numeric = value.as_f64().filter(|n| n.is_finite()).ok_or_else(|| {
            ToolError::invalid_params(format!("{} must be a number between {} and {}", label, min, max))
        })?;
        if numeric < min || numeric > max {
            return Err(ToolError::invalid_params(format!(
                "{} must be a number between {} and {}",
                label, min, max
            )));
        }
        Ok(Some(numeric))
    }

    /// Non-empty list of absolute http(s) URLs.
    pub fn ensure_url_list(
        &self,
        value: Option<&Value>,
        label: &str,
    ) -> Result<Vec<String>, ToolError> {
        let items = value.and_then(|v| v.as_array()).ok_or_else(|| {
            ToolError::invalid_params(format!("{} must be an array of URLs", label))
        })?;
        if items.is_empty() {
            return Err(ToolError::invalid_params(format!(
                "{} must contain at least one URL",
                label
            )));
        }
        items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let raw = item.as_str().map(str::trim).unwrap_or_default();
                let parsed = Url::parse(raw).map_err(|_| {
                    ToolError::invalid_params(format!("{}[{}] must be a valid URL", label, idx))
                })?;
                let scheme = format!("{}:", parsed.scheme());
                if !ALLOWED_HTTP.contains(&scheme.as_str()) {
                    return Err(ToolError::invalid_params(format!(
                        "{}[{}] must use http or https",
                        label, idx
                    )));
                }
                Ok(raw.to_string())
            })
            .collect()
    }
}
