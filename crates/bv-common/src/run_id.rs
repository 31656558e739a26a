//! Process-level run ID plus fresh ULIDs for per-computation ids.
//!
//! Each process gets one ULID at startup; every scoring run within the
//! process logs it, so stored snapshots can be traced back to the deploy
//! that produced them. Individual computations get their own ULID via
//! [`generate`], stored as `computation_id` on profiles and assessments.

use once_cell::sync::Lazy;
use ulid::Ulid;

static RUN_ID: Lazy<String> = Lazy::new(|| Ulid::new().to_string());

/// Returns the process-level run ID (26 chars, time-ordered, URL-safe).
#[inline]
pub fn get() -> &'static str {
    &RUN_ID
}

/// Generates a fresh ULID for one computation or request.
#[inline]
pub fn generate() -> String {
    Ulid::new().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_same_value() {
        let first = get();
        let second = get();
        assert_eq!(first, second);
        assert_eq!(first.len(), 26);
    }

    #[test]
    fn generate_returns_unique_values() {
        let a = generate();
        let b = generate();
        assert_ne!(a, b);
        assert_eq!(a.len(), 26);
    }

    #[test]
    fn ids_sort_by_creation_time() {
        let older = generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let newer = generate();
        assert!(older < newer);
    }
}
