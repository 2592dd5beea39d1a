use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failure surfaced by any widget transform. The wasm layer turns it into a
/// plain JS string so the page can drop it straight into a toast.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WidgetError {
    #[error("{0} is empty")]
    EmptyInput(&'static str),
    #[error("invalid {what}: {detail}")]
    Invalid { what: &'static str, detail: String },
    #[error("unsupported {what}: {value}")]
    Unsupported { what: &'static str, value: String },
    #[error("invalid regex pattern: {0}")]
    Regex(String),
    #[error("{0}")]
    Image(String),
    #[error("browser API unavailable: {0}")]
    Browser(&'static str),
    #[error("serialization failed: {0}")]
    Serialize(String),
}

impl WidgetError {
    pub(crate) fn invalid(what: &'static str, detail: impl Into<String>) -> Self {
        Self::Invalid {
            what,
            detail: detail.into(),
        }
    }

    pub(crate) fn unsupported(what: &'static str, value: impl Into<String>) -> Self {
        Self::Unsupported {
            what,
            value: value.into(),
        }
    }
}

impl From<serde_wasm_bindgen::Error> for WidgetError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

impl From<serde_json::Error> for WidgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

impl From<WidgetError> for JsValue {
    fn from(err: WidgetError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type WidgetResult<T> = Result<T, WidgetError>;
