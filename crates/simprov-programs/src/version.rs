//! Version token extraction from free-form `--version` banners.
//!
//! Simulators print heterogeneous banners ("NEURON -- VERSION 7.5 master
//! (6b4c19f) 2017-09-25", "Python 3.11.4", "NEST version 2.20.0"), so the
//! extraction is deliberately permissive: the first whitespace-terminated
//! token that starts with a digit wins. Structure is only imposed later, and
//! optionally, through [`coerce_semver`].

use std::sync::OnceLock;

use regex::Regex;

/// A parsed semantic version.
pub type Version = semver::Version;

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d\S*)\s").expect("version pattern is valid"))
}

fn numeric_prefix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d+)(?:\.(\d+))?(?:\.(\d+))?").expect("numeric prefix pattern is valid")
    })
}

/// Extract the version token from captured program output.
///
/// Returns `None` when no digit-initiated token followed by whitespace
/// exists, including for empty output.
pub fn extract_version(text: &str) -> Option<String> {
    version_pattern()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Leniently interpret a version token as a semantic version.
///
/// Exact semver strings parse as-is. Otherwise the leading
/// `major[.minor[.patch]]` run is used and missing components are zero,
/// so `"7.5"` becomes `7.5.0` and `"3.11.4rc1"` becomes `3.11.4`.
pub fn coerce_semver(token: &str) -> Option<Version> {
    if let Ok(v) = Version::parse(token) {
        return Some(v);
    }
    let caps = numeric_prefix().captures(token)?;
    let component = |i: usize| -> Option<u64> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };
    Some(Version::new(component(1)?, component(2)?, component(3)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_neuron_banner() {
        let banner = "NEURON -- VERSION 7.5 master (6b4c19f) 2017-09-25\n";
        assert_eq!(extract_version(banner).as_deref(), Some("7.5"));
    }

    #[test]
    fn extracts_from_python_banner() {
        assert_eq!(extract_version("Python 3.11.4\n").as_deref(), Some("3.11.4"));
    }

    #[test]
    fn token_keeps_trailing_non_space_characters() {
        assert_eq!(
            extract_version("nest version 2.20.0-rc1 (built)\n").as_deref(),
            Some("2.20.0-rc1")
        );
    }

    #[test]
    fn first_match_wins() {
        assert_eq!(
            extract_version("tool 1.0 linked against lib 9.9\n").as_deref(),
            Some("1.0")
        );
    }

    #[test]
    fn digit_inside_word_starts_a_token() {
        assert_eq!(extract_version("abc1.2 tail").as_deref(), Some("1.2"));
    }

    #[test]
    fn requires_trailing_whitespace() {
        assert_eq!(extract_version("Python 3.11.4"), None);
    }

    #[test]
    fn absent_without_digits() {
        assert_eq!(extract_version("usage: nrniv [options]\n"), None);
        assert_eq!(extract_version(""), None);
    }

    #[test]
    fn coerce_exact_semver() {
        assert_eq!(
            coerce_semver("2.20.0-rc1"),
            Some(Version::parse("2.20.0-rc1").unwrap())
        );
    }

    #[test]
    fn coerce_pads_missing_components() {
        assert_eq!(coerce_semver("7.5"), Some(Version::new(7, 5, 0)));
        assert_eq!(coerce_semver("3"), Some(Version::new(3, 0, 0)));
    }

    #[test]
    fn coerce_drops_suffix() {
        assert_eq!(coerce_semver("3.11.4rc1"), Some(Version::new(3, 11, 4)));
    }

    #[test]
    fn coerce_rejects_non_numeric() {
        assert_eq!(coerce_semver("master"), None);
    }
}
