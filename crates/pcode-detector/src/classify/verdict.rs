//! Tri-state verdicts and per-resource outcomes.

use serde::{Deserialize, Serialize};

use crate::matching::{ColumnMatch, CoordinatePair};

/// Outcome of one check on one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Not checked (pre-empted, skipped, or failed before a decision).
    #[default]
    Unknown,
    /// Checked and detected.
    Detected,
    /// Checked and not detected.
    NotDetected,
}

impl Verdict {
    /// Report rendering: `True`, `False`, or empty.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Unknown => "",
            Verdict::Detected => "True",
            Verdict::NotDetected => "False",
        }
    }

    pub fn is_detected(&self) -> bool {
        matches!(self, Verdict::Detected)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Verdict::Unknown)
    }

    /// Settle an unchecked verdict as not detected. `Detected` never regresses.
    pub fn settle(self) -> Self {
        match self {
            Verdict::Unknown => Verdict::NotDetected,
            other => other,
        }
    }
}

impl From<bool> for Verdict {
    fn from(detected: bool) -> Self {
        if detected {
            Verdict::Detected
        } else {
            Verdict::NotDetected
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Unknown => write!(f, "unknown"),
            Verdict::Detected => write!(f, "true"),
            Verdict::NotDetected => write!(f, "false"),
        }
    }
}

/// Why a resource was not read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The dataset's organization is exempt.
    OrgException { organization: String },
    /// The file type is not on the allow list.
    DisallowedFiletype { filetype: String },
    /// The resource is at or above the size ceiling (or its size is unknown).
    TooLarge { size: Option<u64> },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::OrgException { organization } => {
                write!(f, "organization {} is excepted", organization)
            }
            SkipReason::DisallowedFiletype { filetype } => {
                write!(f, "file type {} is not checked", filetype)
            }
            SkipReason::TooLarge { size: Some(size) } => write!(f, "resource is too large ({} bytes)", size),
            SkipReason::TooLarge { size: None } => write!(f, "resource size could not be determined"),
        }
    }
}

/// Which matcher fired, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Evidence {
    Pcode { fragment: String, column: ColumnMatch },
    Miscode { fragment: String, column: ColumnMatch },
    LatLong { fragment: String, pair: CoordinatePair },
}

/// Both verdicts for one resource plus the error, if any.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceVerdict {
    pub pcoded: Verdict,
    pub secondary: Verdict,
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped: Option<SkipReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Evidence>,
}

impl ResourceVerdict {
    /// Verdict for a resource rejected by a pre-filter.
    pub fn skipped(reason: SkipReason) -> Self {
        Self {
            pcoded: Verdict::NotDetected,
            skipped: Some(reason),
            ..Self::default()
        }
    }

    /// Verdict for a resource that could not be read.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Verdict::Detected.label(), "True");
        assert_eq!(Verdict::NotDetected.label(), "False");
        assert_eq!(Verdict::Unknown.label(), "");
    }

    #[test]
    fn test_settle_never_regresses() {
        assert_eq!(Verdict::Unknown.settle(), Verdict::NotDetected);
        assert_eq!(Verdict::Detected.settle(), Verdict::Detected);
        assert_eq!(Verdict::from(true), Verdict::Detected);
    }

    #[test]
    fn test_skipped_is_checked_negative() {
        let verdict = ResourceVerdict::skipped(SkipReason::TooLarge { size: Some(10) });
        assert_eq!(verdict.pcoded, Verdict::NotDetected);
        assert_eq!(verdict.secondary, Verdict::Unknown);
        assert!(!verdict.has_error());
    }

    #[test]
    fn test_failed_is_unknown() {
        let verdict = ResourceVerdict::failed("Unable to download file");
        assert_eq!(verdict.pcoded, Verdict::Unknown);
        assert!(verdict.has_error());
    }
}
