//! Error types for the widget toolkit
//!
//! There is no fatal error category in this core: parse failures resolve
//! locally to a field's empty sentinel, and ownership conflicts resolve by
//! detaching the stale edge. Only configuration mistakes surface to the
//! caller, synchronously at construction or render time.

use thiserror::Error;

/// Widget toolkit errors
#[derive(Error, Debug)]
pub enum WidgetError {
    /// A required construction option is missing or invalid
    #[error("missing required config `{option}` for {widget} widget")]
    Configuration {
        widget: &'static str,
        option: &'static str,
    },

    /// Raw input could not be converted to an internal value.
    ///
    /// Never propagated on the UI path; fields substitute their empty
    /// sentinel instead. Exposed for callers that want strict parsing.
    #[error("cannot parse `{raw}` as {expected}")]
    Parse { raw: String, expected: &'static str },
}

/// Result type for widget operations
pub type Result<T> = std::result::Result<T, WidgetError>;
