//! Slug derivation for posts and tags.
//!
//! Both kinds of slug lowercase their source text and collapse every run of
//! characters outside `[a-z0-9]` into a single `-`. Post slugs additionally
//! trim separators from both ends and carry a numeric suffix so that two posts
//! with the same title never collide.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Base used when a title contains nothing slug-able.
const FALLBACK_POST_BASE: &str = "post";

static LAST_SUFFIX: AtomicI64 = AtomicI64::new(0);

/// Lowercases `text` and replaces each run of non-`[a-z0-9]` characters with `-`.
pub fn collapse(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_gap = false;

    for ch in text.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            out.push(ch);
            in_gap = false;
        } else if !in_gap {
            out.push('-');
            in_gap = true;
        }
    }

    out
}

/// Slug for a tag name. Edges are kept as-is, so `"C++"` becomes `"c-"`.
pub fn tag_slug(name: &str) -> String {
    collapse(name)
}

/// Slug for a new post: `<collapsed-title>-<suffix>`.
pub fn post_slug(title: &str) -> String {
    let collapsed = collapse(title);
    let base = collapsed.trim_matches('-');
    let base = if base.is_empty() {
        FALLBACK_POST_BASE
    } else {
        base
    };

    format!("{}-{}", base, next_suffix())
}

/// Millisecond timestamp, bumped past the previous value when two calls land
/// in the same millisecond. Strictly increasing within the process.
fn next_suffix() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_SUFFIX.load(Ordering::Relaxed);

    loop {
        let next = now.max(last + 1);
        match LAST_SUFFIX.compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(current) => last = current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_runs() {
        assert_eq!(collapse("Hello,  World!"), "hello-world-");
        assert_eq!(collapse("Rust 2024 Edition"), "rust-2024-edition");
        assert_eq!(collapse("--a--b--"), "-a-b-");
    }

    #[test]
    fn test_tag_slug_keeps_edges() {
        assert_eq!(tag_slug("Rust Lang"), "rust-lang");
        assert_eq!(tag_slug("C++"), "c-");
        assert_eq!(tag_slug("Café"), "caf-");
    }

    #[test]
    fn test_post_slug_shape() {
        let slug = post_slug("  Hello, World!  ");
        let suffix = slug.strip_prefix("hello-world-").expect("title prefix");
        assert!(!suffix.is_empty());
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_post_slug_fallback_base() {
        assert!(post_slug("!!!").starts_with("post-"));
        assert!(post_slug("日本語").starts_with("post-"));
    }

    #[test]
    fn test_duplicate_titles_get_distinct_slugs() {
        let slugs: Vec<String> = (0..50).map(|_| post_slug("Same Title")).collect();
        let mut unique = slugs.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), slugs.len());
    }
}
