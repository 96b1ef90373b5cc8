use std::fmt;

/// Delimiter between license names inside a single cell
pub const LICENSE_DELIMITER: &str = "+";

/// A license name from the fixed whitelist
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LicenseToken {
    PowerBiPro,
    VisioPlan2,
    PowerBiPremiumPerUser,
}

impl LicenseToken {
    /// Every whitelisted license
    pub const ALL: [LicenseToken; 3] = [
        LicenseToken::PowerBiPro,
        LicenseToken::VisioPlan2,
        LicenseToken::PowerBiPremiumPerUser,
    ];

    /// Canonical spelling, as written to the output tables
    pub fn as_str(&self) -> &'static str {
        match self {
            LicenseToken::PowerBiPro => "Power BI Pro",
            LicenseToken::VisioPlan2 => "Visio Plan 2",
            LicenseToken::PowerBiPremiumPerUser => "Power BI Premium Per User",
        }
    }

    /// Look up a license name, ignoring case and surrounding whitespace.
    ///
    /// Only whole-name matches count: "Power BI" or "Power BI Pro Trial" are
    /// not whitelisted.
    pub fn parse(name: &str) -> Option<Self> {
        let needle = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|token| token.as_str().to_lowercase() == needle)
    }
}

impl fmt::Display for LicenseToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
