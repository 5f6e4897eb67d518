//! UUID helpers.
//!
//! All entity identifiers are UUIDv7: they embed a Unix timestamp, so IDs
//! sort chronologically and index locality stays good under append-heavy
//! workloads.

use uuid::Uuid;

/// Generate a new time-ordered UUIDv7.
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}

/// Check whether a UUID is version 7.
pub fn is_v7(id: &Uuid) -> bool {
    id.get_version_num() == 7
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_v7_is_version_7() {
        let id = new_v7();
        assert!(is_v7(&id));
    }

    #[test]
    fn test_new_v7_is_unique() {
        let a = new_v7();
        let b = new_v7();
        assert_ne!(a, b);
    }

    #[test]
    fn test_v4_is_not_v7() {
        let id = Uuid::new_v4();
        assert!(!is_v7(&id));
    }
}
