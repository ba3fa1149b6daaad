//! Common types shared by the resolution engine

use serde::Serialize;

use crate::version::error::StrategyError;

/// Outcome of resolving a single package
#[derive(Debug)]
pub enum Resolution {
    /// The upstream reported this version
    Found(String),
    /// No version could be determined right now
    Absent(AbsentReason),
}

/// Why a package resolved to nothing
#[derive(Debug)]
pub enum AbsentReason {
    /// The strategy failed (network, status, empty body) or matched nothing
    Strategy(StrategyError),
    /// The package is known but no strategy is wired up for it yet
    Unimplemented,
}

impl Resolution {
    pub fn version(&self) -> Option<&str> {
        match self {
            Resolution::Found(version) => Some(version),
            Resolution::Absent(_) => None,
        }
    }

    pub fn into_version(self) -> Option<String> {
        match self {
            Resolution::Found(version) => Some(version),
            Resolution::Absent(_) => None,
        }
    }
}

impl From<Result<String, StrategyError>> for Resolution {
    fn from(result: Result<String, StrategyError>) -> Self {
        match result {
            Ok(version) => Resolution::Found(version),
            Err(e) => Resolution::Absent(AbsentReason::Strategy(e)),
        }
    }
}

/// A `(package, version)` pair as handed to the output layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    pub package: String,
    pub version: Option<String>,
}

impl ResolutionResult {
    pub fn new(package: impl Into<String>, version: Option<String>) -> Self {
        Self {
            package: package.into(),
            version,
        }
    }

    pub fn is_absent(&self) -> bool {
        self.version.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_from_ok_is_found() {
        let resolution = Resolution::from(Ok("1.2.3".to_string()));
        assert_eq!(resolution.version(), Some("1.2.3"));
    }

    #[test]
    fn resolution_from_no_candidate_is_absent() {
        let resolution = Resolution::from(Err(StrategyError::NoCandidate));
        assert!(matches!(
            resolution,
            Resolution::Absent(AbsentReason::Strategy(StrategyError::NoCandidate))
        ));
        assert_eq!(resolution.into_version(), None);
    }

    #[test]
    fn result_serializes_absent_version_as_null() {
        let result = ResolutionResult::new("bash", None);
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"package":"bash","version":null}"#
        );
    }
}
