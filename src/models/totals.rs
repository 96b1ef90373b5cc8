use serde::Serialize;

/// Number of times a license is held within one office. Field order is the
/// column order of the totals output.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct OfficeLicenseTotal {
    pub office: String,
    pub license: String,
    pub total: u64,
}

impl OfficeLicenseTotal {
    pub fn new(office: impl Into<String>, license: impl Into<String>, total: u64) -> Self {
        Self {
            office: office.into(),
            license: license.into(),
            total,
        }
    }
}
