//! Fixed threat-category taxonomy used across analysis and querying.

/// The category keys the analysis service is allowed to report.
/// Keys outside this set are dropped during validation.
pub const THREAT_CATEGORIES: [&str; 4] = ["cyber", "military", "political", "space/satellite"];

/// Placeholder category for articles with no category scores.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Map an analysis-reported category key onto the fixed taxonomy,
/// tolerating case differences. Returns `None` for unknown keys.
pub fn normalize_category(name: &str) -> Option<&'static str> {
    let lower = name.trim().to_lowercase();
    THREAT_CATEGORIES.iter().find(|c| **c == lower).copied()
}
