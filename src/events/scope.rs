//! Document scope normalization

/// Normalize a document path into an event scope.
///
/// Leading forward slashes are stripped first, then backslashes become
/// forward slashes. The order matters: `\notes\a.md` normalizes to
/// `/notes/a.md`, not `notes/a.md`.
pub fn normalize_scope(path: &str) -> String {
    path.trim_start_matches('/').replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_leading_slashes() {
        assert_eq!(normalize_scope("/Characters/Tordek.md"), "Characters/Tordek.md");
        assert_eq!(normalize_scope("///Characters/Tordek.md"), "Characters/Tordek.md");
    }

    #[test]
    fn test_converts_backslashes() {
        assert_eq!(normalize_scope("Characters\\Tordek.md"), "Characters/Tordek.md");
    }

    #[test]
    fn test_equivalent_paths_collide() {
        let a = normalize_scope("/Characters/Tordek.md");
        let b = normalize_scope("Characters\\Tordek.md");
        assert_eq!(a, b);
    }

    #[test]
    fn test_leading_backslash_survives_as_slash() {
        assert_eq!(normalize_scope("\\Characters\\Tordek.md"), "/Characters/Tordek.md");
    }

    #[test]
    fn test_inner_slashes_untouched() {
        assert_eq!(normalize_scope("a//b.md"), "a//b.md");
        assert_eq!(normalize_scope(""), "");
    }
}
