pub const PATIENT_PREFIX: &str = "p";
pub const RECORD_PREFIX: &str = "rec";

///
/// Allocate the next id for a collection.
///
/// Takes the largest numeric suffix among `existing` (0 for an empty collection), adds one and
/// zero-pads to three digits. Ids whose suffix does not parse, or has no successor, are ignored.
///
/// The allocator is max-based rather than a counter: deleting the highest-numbered entity
/// frees its number for the next creation.
///
pub fn next_id<'a, I>(prefix: &str, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let next = existing
        .into_iter()
        .filter_map(|id| suffix(prefix, id))
        .filter_map(|n| n.checked_add(1))
        .max()
        .unwrap_or(1);

    format!("{prefix}{next:03}")
}

fn suffix(prefix: &str, id: &str) -> Option<u64> {
    id.strip_prefix(prefix).unwrap_or(id).parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collection_starts_at_one() {
        assert_eq!(next_id(PATIENT_PREFIX, Vec::<&str>::new()), "p001");
        assert_eq!(next_id(RECORD_PREFIX, Vec::<&str>::new()), "rec001");
    }

    #[test]
    fn follows_the_maximum_not_the_count() {
        let ids = ["p001", "p007", "p003"];
        assert_eq!(next_id(PATIENT_PREFIX, ids), "p008");
    }

    #[test]
    fn grows_past_three_digits() {
        assert_eq!(next_id(RECORD_PREFIX, ["rec999"]), "rec1000");
    }

    #[test]
    fn ignores_unparseable_ids() {
        let ids = ["p002", "legacy", "pXYZ"];
        assert_eq!(next_id(PATIENT_PREFIX, ids), "p003");
    }

    #[test]
    fn ignores_ids_at_the_numeric_limit() {
        let ids = ["p004", "p18446744073709551615"];
        assert_eq!(next_id(PATIENT_PREFIX, ids), "p005");

        assert_eq!(next_id(PATIENT_PREFIX, ["p18446744073709551615"]), "p001");
        assert_eq!(
            next_id(PATIENT_PREFIX, ["p18446744073709551614"]),
            "p18446744073709551615"
        );
    }
}
