//! Canonical progress derivation.
//!
//! The progress percentage of a work order is never entered by hand; it is
//! a pure function of the report status. Unknown statuses degrade to 0
//! rather than failing, since the secondary store carries historical
//! records written by older clients.

use rust_decimal::Decimal;
use tracing::warn;

/// Wire value for a freshly submitted report.
pub const STATUS_NEW: &str = "nouveau";
/// Wire value for a report whose work order is underway.
pub const STATUS_IN_PROGRESS: &str = "en cours";
/// Wire value for a resolved report.
pub const STATUS_DONE: &str = "terminé";

/// Audit comment for each canonical status, in display language.
const COMMENT_NEW: &str = "Travaux non commencés";
const COMMENT_IN_PROGRESS: &str = "Travaux en cours";
const COMMENT_DONE: &str = "Travaux terminés";

/// Whether `status` is one of the three canonical wire values.
#[must_use]
pub fn is_known_status(status: &str) -> bool {
    matches!(status, STATUS_NEW | STATUS_IN_PROGRESS | STATUS_DONE)
}

/// Derive the canonical progress percentage for a report status.
///
/// Total over all inputs: `nouveau` → 0, `en cours` → 50, `terminé` → 100,
/// and any other value → 0 with a logged warning.
#[must_use]
pub fn progress_for(status: &str) -> Decimal {
    match status {
        STATUS_NEW => Decimal::ZERO,
        STATUS_IN_PROGRESS => Decimal::from(50),
        STATUS_DONE => Decimal::from(100),
        other => {
            warn!(status = %other, "Unknown report status, defaulting progress to 0");
            Decimal::ZERO
        },
    }
}

/// Audit-trail comment matching [`progress_for`].
///
/// Unknown statuses pair with progress 0 and therefore get the
/// not-started comment.
#[must_use]
pub fn comment_for(status: &str) -> &'static str {
    match status {
        STATUS_IN_PROGRESS => COMMENT_IN_PROGRESS,
        STATUS_DONE => COMMENT_DONE,
        _ => COMMENT_NEW,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_for_known_statuses() {
        assert_eq!(progress_for(STATUS_NEW), Decimal::ZERO);
        assert_eq!(progress_for(STATUS_IN_PROGRESS), Decimal::from(50));
        assert_eq!(progress_for(STATUS_DONE), Decimal::from(100));
    }

    #[test]
    fn test_progress_for_is_total() {
        assert_eq!(progress_for(""), Decimal::ZERO);
        assert_eq!(progress_for("résolu"), Decimal::ZERO);
        assert_eq!(progress_for("EN COURS"), Decimal::ZERO);
    }

    #[test]
    fn test_comment_for_matches_status() {
        assert_eq!(comment_for(STATUS_NEW), "Travaux non commencés");
        assert_eq!(comment_for(STATUS_IN_PROGRESS), "Travaux en cours");
        assert_eq!(comment_for(STATUS_DONE), "Travaux terminés");
        assert_eq!(comment_for("n'importe quoi"), "Travaux non commencés");
    }

    #[test]
    fn test_is_known_status() {
        assert!(is_known_status(STATUS_NEW));
        assert!(is_known_status(STATUS_IN_PROGRESS));
        assert!(is_known_status(STATUS_DONE));
        assert!(!is_known_status("archivé"));
    }
}
