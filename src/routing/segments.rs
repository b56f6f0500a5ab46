//! Path segment splitting.
//!
//! Registration and dispatch both split paths through this module, so a
//! parameter index recorded for a route means the same position in every
//! request path that reaches it.
//!
//! ```text
//! "/one/two"   → ["one", "two"]
//! "/one/two/"  → ["one", "two", ""]
//! "/one//two"  → ["one", "", "two"]
//! "/"          → [""]
//! ```

use std::str::Split;

/// Path delimiter.
pub const SEPARATOR: char = '/';

/// Splits `path` into its segments.
///
/// One leading `/` is stripped. A trailing `/` yields a trailing empty
/// segment and consecutive slashes yield empty segments in between. The
/// iterator borrows from `path` and never allocates.
///
/// Callers pass paths already known to start with `/`; an empty input
/// yields a single empty segment.
pub fn split_path(path: &str) -> Split<'_, char> {
    path.strip_prefix(SEPARATOR).unwrap_or(path).split(SEPARATOR)
}

/// Returns the segment at `index`, or `""` when the path is shorter.
pub fn nth(path: &str, index: usize) -> &str {
    split_path(path).nth(index).unwrap_or_default()
}

/// Returns everything from segment `index` to the end of the path.
///
/// Equivalent to joining the remaining segments with `/`, but sliced
/// straight out of `path`.
pub fn tail(path: &str, index: usize) -> &str {
    let mut rest = path.strip_prefix(SEPARATOR).unwrap_or(path);
    for _ in 0..index {
        match rest.find(SEPARATOR) {
            Some(pos) => rest = &rest[pos + 1..],
            None => return "",
        }
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(path: &str) -> Vec<&str> {
        split_path(path).collect()
    }

    #[test]
    fn test_split_plain_path() {
        assert_eq!(collect("/one/two"), vec!["one", "two"]);
        assert_eq!(collect("/one"), vec!["one"]);
    }

    #[test]
    fn test_split_trailing_slash() {
        assert_eq!(collect("/one/two/"), vec!["one", "two", ""]);
        assert_eq!(collect("/a/"), vec!["a", ""]);
    }

    #[test]
    fn test_split_root_and_doubled_slashes() {
        assert_eq!(collect("/"), vec![""]);
        assert_eq!(collect("/one//two"), vec!["one", "", "two"]);
        assert_eq!(collect("//"), vec!["", ""]);
    }

    #[test]
    fn test_split_empty_input_is_guarded() {
        assert_eq!(collect(""), vec![""]);
    }

    #[test]
    fn test_nth() {
        assert_eq!(nth("/users/42/posts/7", 1), "42");
        assert_eq!(nth("/users/42/posts/7", 3), "7");
        assert_eq!(nth("/users/42", 5), "");
    }

    #[test]
    fn test_tail() {
        assert_eq!(tail("/files/a/b/c", 1), "a/b/c");
        assert_eq!(tail("/files/a/b/c", 0), "files/a/b/c");
        assert_eq!(tail("/files/", 1), "");
        assert_eq!(tail("/files", 3), "");
    }
}
