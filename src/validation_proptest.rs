//! Property-based tests for identity validation and source-string parsing.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

use crate::metadata::{validate_id, validate_version};
use crate::source::{is_url, SourceKind, SourceSpec, VcsLocation};
use proptest::prelude::*;

// ============================================================================
// Addon identity
// ============================================================================

proptest! {
    /// Property: every string over the id alphabet is a valid id
    #[test]
    fn id_alphabet_is_accepted(id in "[a-z0-9._-]{1,40}") {
        prop_assert!(validate_id(&id));
    }

    /// Property: one character outside the alphabet anywhere rejects the id
    #[test]
    fn id_with_foreign_char_is_rejected(
        prefix in "[a-z0-9._-]{0,10}",
        bad in "[A-Z /:#@]",
        suffix in "[a-z0-9._-]{0,10}",
    ) {
        let id = format!("{}{}{}", prefix, bad, suffix);
        prop_assert!(!validate_id(&id), "accepted {:?}", id);
    }

    /// Property: three numeric components form a valid version
    #[test]
    fn three_component_versions_are_valid(
        major in 0u32..1000,
        minor in 0u32..1000,
        patch in 0u32..1000,
    ) {
        let version = format!("{}.{}.{}", major, minor, patch);
        prop_assert!(validate_version(&version));
    }

    /// Property: pre-release and build suffixes are accepted
    #[test]
    fn version_suffixes_are_valid(
        sep in "[-~]",
        pre in "[0-9A-Za-z]{1,8}(\\.[0-9A-Za-z]{1,8}){0,2}",
        build in "[0-9A-Za-z]{1,8}",
    ) {
        let prerelease = format!("1.2.3{}{}", sep, pre);
        let with_build = format!("{}+{}", prerelease, build);
        prop_assert!(validate_version(&prerelease), "rejected {:?}", prerelease);
        prop_assert!(validate_version(&with_build), "rejected {:?}", with_build);
    }

    /// Property: fewer than three components is never a version
    #[test]
    fn short_versions_are_invalid(major in 0u32..1000, minor in 0u32..1000) {
        let one = major.to_string();
        let two = format!("{}.{}", major, minor);
        prop_assert!(!validate_version(&one));
        prop_assert!(!validate_version(&two));
    }
}

// ============================================================================
// Source strings
// ============================================================================

proptest! {
    /// Property: url#branch:subpath splits back into its parts
    #[test]
    fn vcs_location_round_trips_parts(
        host in "[a-z]{1,10}\\.(com|org)",
        repo in "[a-z][a-z0-9-]{0,15}",
        branch in "[a-z0-9][a-z0-9._-]{0,10}",
        subpath in "[a-z][a-z0-9.]{0,8}(/[a-z][a-z0-9.]{0,8}){0,2}",
    ) {
        let url = format!("https://{}/{}.git", host, repo);
        let parsed = VcsLocation::parse(&format!("{}#{}:{}", url, branch, subpath));
        prop_assert_eq!(parsed.repository, url);
        prop_assert_eq!(parsed.branch, Some(branch));
        prop_assert_eq!(parsed.subpath, Some(subpath));
    }

    /// Property: a bare URL keeps its scheme colon and has no branch or subpath
    #[test]
    fn bare_url_is_repository_only(
        scheme in "(https|http|git|file)",
        path in "[a-z0-9/._-]{1,30}",
    ) {
        let url = format!("{}://{}", scheme, path);
        let parsed = VcsLocation::parse(&url);
        prop_assert_eq!(&parsed.repository, &url);
        prop_assert_eq!(parsed.branch.as_deref(), None);
        prop_assert_eq!(parsed.subpath.as_deref(), None);
        prop_assert_eq!(parsed.treeish(), "HEAD:");
        prop_assert!(is_url(&url));
    }

    /// Property: parsing never panics on arbitrary input
    #[test]
    fn vcs_parse_never_panics(input in ".*") {
        let _ = VcsLocation::parse(&input);
    }

    /// Property: strings without a scheme are never classified as git
    #[test]
    fn plain_paths_are_not_urls(path in "[A-Za-z0-9_./-]{1,30}") {
        prop_assert!(!is_url(&path));
        if let Ok(spec) = SourceSpec::classify(&path) {
            prop_assert!(!matches!(spec.kind, SourceKind::VersionControl(_)));
        }
    }
}
