// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! URL string helpers.

/// Remove a single trailing `/` from `url`.
///
/// An empty string stays empty and a lone `/` is returned unchanged.
pub fn strip_trailing_slash(url: &str) -> &str {
    if url.is_empty() || url == "/" {
        return url;
    }
    url.strip_suffix('/').unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn boundary_cases() {
        assert_eq!(strip_trailing_slash("/a/b/"), "/a/b");
        assert_eq!(strip_trailing_slash("/"), "/");
        assert_eq!(strip_trailing_slash(""), "");
        assert_eq!(strip_trailing_slash("https://example.com"), "https://example.com");
    }

    #[test]
    fn removes_only_one_slash() {
        assert_eq!(strip_trailing_slash("https://example.com//"), "https://example.com/");
        assert_eq!(strip_trailing_slash("//"), "/");
    }

    proptest! {
        #[test]
        fn strips_exactly_one_appended_slash(base in "[a-z:/.]{0,24}[a-z]") {
            let with_slash = format!("{base}/");
            prop_assert_eq!(strip_trailing_slash(&with_slash), base.as_str());
        }

        #[test]
        fn leaves_slashless_input_untouched(s in "[a-z:.]{0,24}") {
            prop_assert_eq!(strip_trailing_slash(&s), s.as_str());
        }
    }
}
