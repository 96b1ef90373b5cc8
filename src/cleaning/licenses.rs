use crate::models::{LICENSE_DELIMITER, LicenseToken};

/// Filters `+`-delimited license cells down to whitelisted licenses
#[derive(Debug, Clone, Copy, Default)]
pub struct LicenseNormalizer;

/// Outcome of cleaning a single cell
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CleanedLicenses {
    /// Whitelisted tokens in their original relative order
    pub kept: Vec<LicenseToken>,
    /// Non-empty tokens that were not on the whitelist
    pub dropped: Vec<String>,
}

impl CleanedLicenses {
    /// Rejoin kept tokens with the delimiter; empty if nothing was kept
    pub fn joined(&self) -> String {
        self.kept
            .iter()
            .map(LicenseToken::as_str)
            .collect::<Vec<_>>()
            .join(LICENSE_DELIMITER)
    }
}

impl LicenseNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Split a cell and sort its tokens into kept and dropped.
    ///
    /// Duplicates inside one cell are preserved.
    pub fn split(&self, raw: &str) -> CleanedLicenses {
        let mut cleaned = CleanedLicenses::default();

        for token in raw.split(LICENSE_DELIMITER).map(str::trim) {
            match LicenseToken::parse(token) {
                Some(license) => cleaned.kept.push(license),
                None if !token.is_empty() => cleaned.dropped.push(token.to_string()),
                None => {}
            }
        }

        cleaned
    }

    /// Clean a license cell, keeping only whitelisted licenses in their
    /// canonical spelling
    pub fn clean(&self, raw: &str) -> String {
        self.split(raw).joined()
    }
}
