//! Rewrites resource URLs that point at domains Salsa no longer serves.

/// Literal replacements, applied in order to every occurrence.
pub const REWRITES: &[(&str, &str)] = &[
    ("org2.democracyinaction.org", "org2.salsalabs.com"),
    ("salsa.democracyinaction.org", "org.salsalabs.com"),
    ("hq.demaction.org", "org.salsalabs.com"),
    ("cid:", "https:"),
];

/// Apply [`REWRITES`] to `text`.
pub fn scrub(text: &str) -> String {
    REWRITES
        .iter()
        .fold(text.to_string(), |acc, &(from, to)| acc.replace(from, to))
}
