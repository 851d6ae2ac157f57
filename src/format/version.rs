//! Dotted-version parsing for schema detection.

/// Parses a dotted numeric version like "1.0.9" into its components.
/// Any non-numeric component disqualifies the whole string; callers fall
/// through to the other detection rules instead of failing.
pub(super) fn parse_version(version: &str) -> Option<Vec<u64>> {
    version
        .split('.')
        .map(|part| part.parse::<u64>().ok())
        .collect()
}

/// Component-wise numeric comparison against 1.0.9, never lexicographic:
/// "1.1.0" qualifies, "0.2.104" does not.
pub(super) fn at_least_1_0_9(version: &str) -> bool {
    parse_version(version).is_some_and(|parts| parts >= vec![1, 0, 9])
}
