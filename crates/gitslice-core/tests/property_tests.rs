//! Property-based tests for prefix matching and path rewriting.
//!
//! These tests use proptest to generate repository layouts and verify the
//! selection rules hold across a wide range of paths.

#![allow(clippy::unwrap_used)]

use gitslice_core::EntryKind;
use gitslice_core::Subpath;
use gitslice_core::resolver::ArchivePrefix;
use gitslice_core::resolver::EntryAction;
use gitslice_core::resolver::Selection;
use gitslice_core::resolver::matches;
use gitslice_core::resolver::rewrite_path;
use gitslice_core::resolver::strip_count;
use proptest::prelude::*;

const PREFIX: &str = "owner-repo-0a1b2c3/";

fn segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-][a-zA-Z0-9_.-]{0,11}".prop_filter("not a dot segment", |s| s != "." && s != "..")
}

fn segments(range: std::ops::Range<usize>) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(segment(), range)
}

proptest! {
    /// Every descendant of the subpath matches and is rewritten to its path
    /// below the subpath.
    #[test]
    fn prop_descendants_match_and_flatten(
        subpath in segments(1..5),
        rest in segments(1..5),
        trailing_slash in any::<bool>(),
    ) {
        let mut entry = format!("{PREFIX}{}/{}", subpath.join("/"), rest.join("/"));
        if trailing_slash {
            entry.push('/');
        }

        prop_assert!(matches(&entry, PREFIX, &subpath));
        prop_assert_eq!(
            rewrite_path(&entry, strip_count(subpath.len(), false)),
            rest.join("/")
        );
    }

    /// Keeping the folder name puts the last subpath segment in front.
    #[test]
    fn prop_keep_folder_name_prepends_last_segment(
        subpath in segments(1..5),
        rest in segments(1..5),
    ) {
        let entry = format!("{PREFIX}{}/{}", subpath.join("/"), rest.join("/"));
        let expected = format!("{}/{}", subpath.last().unwrap(), rest.join("/"));

        prop_assert_eq!(rewrite_path(&entry, strip_count(subpath.len(), true)), expected);
    }

    /// The subpath directory itself never matches.
    #[test]
    fn prop_subpath_itself_never_matches(
        subpath in segments(1..5),
        trailing_slash in any::<bool>(),
    ) {
        let mut entry = format!("{PREFIX}{}", subpath.join("/"));
        if trailing_slash {
            entry.push('/');
        }

        prop_assert!(!matches(&entry, PREFIX, &subpath));
    }

    /// A sibling whose name merely starts with the last subpath segment is
    /// never selected.
    #[test]
    fn prop_string_prefix_sibling_never_matches(
        subpath in segments(1..4),
        suffix in "[a-z0-9-]{1,6}",
        rest in segments(1..3),
    ) {
        let mut sibling = subpath.clone();
        if let Some(last) = sibling.last_mut() {
            last.push_str(&suffix);
        }
        let entry = format!("{PREFIX}{}/{}", sibling.join("/"), rest.join("/"));

        prop_assert!(!matches(&entry, PREFIX, &subpath));
    }

    /// Entries outside the archive root never match.
    #[test]
    fn prop_foreign_root_never_matches(
        root in "[a-z]{1,10}",
        subpath in segments(0..3),
        rest in segments(1..3),
    ) {
        let entry = format!("{root}/{}", [subpath.clone(), rest].concat().join("/"));
        prop_assume!(!entry.starts_with(PREFIX));

        prop_assert!(!matches(&entry, PREFIX, &subpath));
    }

    /// The strip count stays within `1..=1 + |S|`.
    #[test]
    fn prop_strip_count_bounds(len in 0usize..64, keep in any::<bool>()) {
        let count = strip_count(len, keep);
        prop_assert!(count >= 1);
        prop_assert!(count <= 1 + len);
    }

    /// Rewritten paths never contain empty segments.
    #[test]
    fn prop_rewrite_has_no_empty_segments(
        path in "[a-z/]{0,40}",
        strip in 0usize..6,
    ) {
        let rewritten = rewrite_path(&path, strip);
        prop_assert!(rewritten.is_empty() || rewritten.split('/').all(|s| !s.is_empty()));
    }

    /// Resolution of files agrees with matching and rewriting.
    #[test]
    fn prop_resolve_agrees_with_parts(
        subpath in segments(0..4),
        rest in segments(1..4),
        keep in any::<bool>(),
    ) {
        let raw = subpath.join("/");
        let selection = Selection::new(Subpath::parse(&raw), keep);
        let prefix = ArchivePrefix::discover(PREFIX).unwrap();
        let entry = format!("{PREFIX}{}", [subpath.clone(), rest].concat().join("/"));

        let action = selection.resolve(&entry, EntryKind::File, Some(&prefix)).unwrap();
        let expected = rewrite_path(&entry, strip_count(subpath.len(), keep));

        prop_assert_eq!(action, EntryAction::WriteFile(expected));
    }
}
