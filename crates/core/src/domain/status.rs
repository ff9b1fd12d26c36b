// Vetting Status Domain Model

use serde::{Deserialize, Serialize};

/// Review outcome of a single vettable item.
///
/// Not monotonic: the most recent accept/reject wins and no history is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VettingStatus {
    #[default]
    Unprocessed,
    Accepted,
    Rejected,
}

impl VettingStatus {
    /// True for any decided status
    pub fn is_processed(&self) -> bool {
        !matches!(self, VettingStatus::Unprocessed)
    }
}

impl std::fmt::Display for VettingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VettingStatus::Unprocessed => write!(f, "unprocessed"),
            VettingStatus::Accepted => write!(f, "accepted"),
            VettingStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unprocessed() {
        assert_eq!(VettingStatus::default(), VettingStatus::Unprocessed);
        assert!(!VettingStatus::default().is_processed());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&VettingStatus::Rejected).unwrap();
        assert_eq!(json, "\"rejected\"");

        let status: VettingStatus = serde_json::from_str("\"accepted\"").unwrap();
        assert_eq!(status, VettingStatus::Accepted);
        assert_eq!(status.to_string(), "accepted");
    }
}
