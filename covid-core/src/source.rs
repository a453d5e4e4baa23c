use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Local snapshot looked up in the working directory.
pub const DEFAULT_LOCAL_CASES: &str = "WHO-COVID-19-global-daily-data.csv";

/// WHO daily case/death export.
pub const DEFAULT_REMOTE_CASES: &str =
    "https://srhdpeuwpubsa.blob.core.windows.net/whdh/COVID/WHO-COVID-19-global-daily-data.csv";

/// Where a dataset can be read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Local(PathBuf),
    Remote(String),
}

impl Source {
    /// Default candidate list for case data: local snapshot first, then
    /// the remote export.
    pub fn default_cases() -> Vec<Source> {
        vec![
            Source::Local(PathBuf::from(DEFAULT_LOCAL_CASES)),
            Source::Remote(DEFAULT_REMOTE_CASES.to_string()),
        ]
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Source::Remote(_))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Local(path) => write!(f, "{}", path.display()),
            Source::Remote(url) => write!(f, "{}", url),
        }
    }
}

impl FromStr for Source {
    type Err = std::convert::Infallible;

    /// `http://` and `https://` prefixes select a remote source; anything
    /// else is a local path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let lowered = s.to_lowercase();
        if lowered.starts_with("http://") || lowered.starts_with("https://") {
            Ok(Source::Remote(s.to_string()))
        } else {
            Ok(Source::Local(PathBuf::from(s)))
        }
    }
}

/// A table together with the source it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub table: T,
    pub source: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source() {
        let remote: Source = "https://example.org/data.csv".parse().unwrap();
        assert!(remote.is_remote());
        let upper: Source = "HTTP://example.org/data.csv".parse().unwrap();
        assert!(upper.is_remote());
        let local: Source = "data/who.csv".parse().unwrap();
        assert_eq!(local, Source::Local(PathBuf::from("data/who.csv")));
        assert_eq!(local.to_string(), "data/who.csv");
    }

    #[test]
    fn test_default_cases_order() {
        let sources = Source::default_cases();
        assert_eq!(sources.len(), 2);
        assert!(!sources[0].is_remote());
        assert!(sources[1].is_remote());
    }
}
