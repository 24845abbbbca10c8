//! Row identifiers

use uuid::Uuid;

/// Generate a primary key for a new row.
///
/// Random (v4) UUIDs, hyphenated. Unique for all practical purposes; no
/// ordering is implied.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_are_distinct() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_generated_id_shape() {
        let id = generate_id();
        assert_eq!(id.len(), 36);
        assert!(Uuid::parse_str(&id).is_ok());
    }
}
