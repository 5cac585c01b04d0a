//! Request eligibility.

/// Paths whose responses are branded. Everything else is proxied as is.
pub const REWRITABLE_PATHS: [&str; 2] = ["/", "/index.html"];

/// Check if responses for `path` are branded.
pub fn is_rewritable_path(path: &str) -> bool {
    REWRITABLE_PATHS.contains(&path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_points_are_rewritable() {
        assert!(is_rewritable_path("/"));
        assert!(is_rewritable_path("/index.html"));
    }

    #[test]
    fn test_other_paths_are_not() {
        assert!(!is_rewritable_path("/script.js"));
        assert!(!is_rewritable_path("/configs/acme.json"));
        assert!(!is_rewritable_path("/index.html/"));
        assert!(!is_rewritable_path(""));
    }
}
