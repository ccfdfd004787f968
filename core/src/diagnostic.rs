//! Non-fatal diagnostics for data which does not conform to the standard.
//!
//! Reading is tolerant by default:
//! malformed but recoverable input is reported as a [`ConformanceWarning`]
//! and the codec carries on with its best interpretation of the data.
//! The [`ValidationMode`] in effect decides what reporting a warning does.
use crate::config::ValidationMode;
use crate::tag::Tag;
use snafu::Snafu;
use std::fmt;

/// The kind of non-conformance detected.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum WarningKind {
    /// A different tag was found where a delimiter was expected.
    UnexpectedDelimiter,
    /// A delimiter was followed by a non-zero length.
    DelimiterLength,
    /// A delimiter was found outside of a sequence or item.
    StrayDelimiter,
    /// A value has an odd length.
    OddLength,
    /// A value has more padding than expected.
    ExcessPadding,
    /// A DS or IS value could not be parsed as a number.
    InvalidNumericText,
    /// A DA, TM or DT value could not be parsed.
    InvalidDateTime,
    /// Text could not be decoded with the active character set.
    TextDecoding,
    /// The specific character set term is unknown or misspelled.
    UnknownCharacterSet,
    /// An ISO 2022 escape sequence is not recognized.
    UnknownEscapeSequence,
    /// A value violates its value representation's constraints.
    InvalidValue,
    /// The value representation field is not a known VR.
    UnknownVr,
    /// Decoded pixel data is longer than expected.
    PixelDataPadding,
    /// Frame boundaries in encapsulated pixel data were guessed.
    FrameBoundaries,
    /// A file has no preamble, magic code or file meta group.
    MissingFileMeta,
}

/// A single piece of non-conformant data,
/// with the location at which it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConformanceWarning {
    /// The kind of problem.
    pub kind: WarningKind,
    /// The tag of the element concerned, if any.
    pub tag: Option<Tag>,
    /// The byte position in the source, if known.
    pub position: Option<u64>,
    /// A human readable description.
    pub message: String,
}

impl ConformanceWarning {
    /// Create a warning without location information.
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        ConformanceWarning {
            kind,
            tag: None,
            position: None,
            message: message.into(),
        }
    }

    /// Attach the tag of the element concerned.
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Attach the byte position in the source.
    pub fn at(mut self, position: u64) -> Self {
        self.position = Some(position);
        self
    }
}

impl fmt::Display for ConformanceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(tag) = self.tag {
            write!(f, " in element {}", tag)?;
        }
        if let Some(position) = self.position {
            write!(f, " at position {:#x}", position)?;
        }
        Ok(())
    }
}

/// The error raised when a warning is reported in strict mode.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(display("Non-conformant data: {}", warning))]
pub struct NonConformantError {
    /// The offending warning.
    pub warning: ConformanceWarning,
}

/// A collector of conformance warnings,
/// acting according to a validation mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    mode: ValidationMode,
    warnings: Vec<ConformanceWarning>,
}

impl Diagnostics {
    /// Create an empty collector for the given validation mode.
    pub fn new(mode: ValidationMode) -> Self {
        Diagnostics {
            mode,
            warnings: Vec::new(),
        }
    }

    /// The validation mode in effect.
    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Report a warning.
    ///
    /// - In [`Ignore`](ValidationMode::Ignore) mode the warning is dropped.
    /// - In [`Warn`](ValidationMode::Warn) mode it is logged and kept.
    /// - In [`Strict`](ValidationMode::Strict) mode it is kept
    ///   and returned as an error.
    pub fn report(&mut self, warning: ConformanceWarning) -> Result<(), NonConformantError> {
        match self.mode {
            ValidationMode::Ignore => Ok(()),
            ValidationMode::Warn => {
                tracing::warn!(kind = ?warning.kind, "{}", warning);
                self.warnings.push(warning);
                Ok(())
            }
            ValidationMode::Strict => {
                self.warnings.push(warning.clone());
                NonConformantSnafu { warning }.fail()
            }
        }
    }

    /// Move all warnings from another collector into this one,
    /// without reporting them again.
    pub fn absorb(&mut self, other: Diagnostics) {
        self.warnings.extend(other.warnings);
    }

    /// The warnings collected so far.
    pub fn warnings(&self) -> &[ConformanceWarning] {
        &self.warnings
    }

    /// Take the collected warnings.
    pub fn into_warnings(self) -> Vec<ConformanceWarning> {
        self.warnings
    }

    /// The number of warnings collected.
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// Whether no warnings were collected.
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}
