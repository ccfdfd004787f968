//! Codec configuration.
//!
//! There is no process-wide state:
//! a [`CodecConfig`] is handed to every read and write entry point,
//! so that concurrent codecs may run with different settings.

/// What to do upon finding non-conformant data.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ValidationMode {
    /// Accept the data silently.
    Ignore,
    /// Log a warning, keep it in the diagnostics and carry on.
    #[default]
    Warn,
    /// Fail with an error.
    Strict,
}

/// Settings which affect how values are read and written.
///
/// Setters consume and return the configuration,
/// so that it can be built in a single expression.
///
/// ```
/// # use dcmcodec_core::{CodecConfig, ValidationMode};
/// let config = CodecConfig::default()
///     .datetime_conversion(true)
///     .reading_validation(ValidationMode::Strict)
///     .defer_size(Some(4096));
/// assert!(config.datetime_conversion);
/// assert_eq!(config.writing_validation, ValidationMode::Strict);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct CodecConfig {
    /// Validation applied while reading. Defaults to `Warn`.
    pub reading_validation: ValidationMode,
    /// Validation applied while writing. Defaults to `Strict`.
    pub writing_validation: ValidationMode,
    /// Whether DA, TM and DT values are decoded
    /// into date and time values instead of text.
    pub datetime_conversion: bool,
    /// Values with a defined length above this size are not read
    /// until they are first accessed.
    pub defer_size: Option<u32>,
    /// Whether explicit `UN` elements with a tag known to the dictionary
    /// are read again with the dictionary's value representation.
    pub replace_un_with_known_vr: bool,
    /// Whether DS and IS values are decoded into numbers.
    pub numeric_text_conversion: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            reading_validation: ValidationMode::Warn,
            writing_validation: ValidationMode::Strict,
            datetime_conversion: false,
            defer_size: None,
            replace_un_with_known_vr: true,
            numeric_text_conversion: true,
        }
    }
}

impl CodecConfig {
    /// Set the validation mode for reading.
    pub fn reading_validation(mut self, mode: ValidationMode) -> Self {
        self.reading_validation = mode;
        self
    }

    /// Set the validation mode for writing.
    pub fn writing_validation(mut self, mode: ValidationMode) -> Self {
        self.writing_validation = mode;
        self
    }

    /// Enable or disable date and time conversion.
    pub fn datetime_conversion(mut self, enabled: bool) -> Self {
        self.datetime_conversion = enabled;
        self
    }

    /// Set the size threshold for deferred reading.
    pub fn defer_size(mut self, size: Option<u32>) -> Self {
        self.defer_size = size;
        self
    }

    /// Enable or disable the replacement of `UN`
    /// with the dictionary's value representation.
    pub fn replace_un_with_known_vr(mut self, enabled: bool) -> Self {
        self.replace_un_with_known_vr = enabled;
        self
    }

    /// Enable or disable numeric decoding of DS and IS values.
    pub fn numeric_text_conversion(mut self, enabled: bool) -> Self {
        self.numeric_text_conversion = enabled;
        self
    }
}
