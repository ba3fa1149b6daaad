//! Candidate exclusion rules applied before picking the latest version

use std::sync::LazyLock;

use regex::Regex;

static PRERELEASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(alpha|beta|rc|pre|dev|snapshot|nightly|preview|\d[ab]\d+$)")
        .expect("valid prerelease pattern")
});

static PLATFORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)[-_.+](win(32|64|dows)?|mingw\w*|darwin|macos|osx|linux|android|ios|x86(_64)?|x64|arm(64|hf|el)?|aarch64)\b",
    )
    .expect("valid platform pattern")
});

/// Rules deciding which extracted strings count as stable release versions
#[derive(Debug, Clone)]
pub struct Exclusions {
    prerelease: bool,
    platform: bool,
    extra: Option<Regex>,
}

impl Default for Exclusions {
    fn default() -> Self {
        Self {
            prerelease: true,
            platform: true,
            extra: None,
        }
    }
}

impl Exclusions {
    /// Keep pre-release markers (for upstreams that never tag them)
    pub fn allow_prerelease(mut self) -> Self {
        self.prerelease = false;
        self
    }

    /// Additionally reject candidates matching `pattern`
    pub fn reject(mut self, pattern: &str) -> Self {
        self.extra = Some(Regex::new(pattern).expect("valid exclusion pattern"));
        self
    }

    pub fn accepts(&self, candidate: &str) -> bool {
        if !candidate.starts_with(|c: char| c.is_ascii_digit()) {
            return false;
        }
        if self.prerelease && PRERELEASE.is_match(candidate) {
            return false;
        }
        if self.platform && PLATFORM.is_match(candidate) {
            return false;
        }
        if let Some(extra) = &self.extra
            && extra.is_match(candidate)
        {
            return false;
        }
        true
    }

    pub fn apply(&self, candidates: Vec<String>) -> Vec<String> {
        candidates
            .into_iter()
            .filter(|candidate| self.accepts(candidate))
            .collect()
    }
}
