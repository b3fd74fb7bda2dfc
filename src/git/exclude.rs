//! Glob-based path exclusion for staged files.

use regex_lite::Regex;
use tracing::warn;

/// Lockfiles that rarely say anything useful about a change.
pub const DEFAULT_EXCLUDE_FILES: [&str; 4] =
    ["package-lock.json", "pnpm-lock.yaml", "bun.lockb", "*.lock"];

/// A compiled glob pattern.
#[derive(Debug, Clone)]
struct Matcher {
    regex: Regex,
    /// Patterns containing `/` are matched against the whole path,
    /// the rest against the file name only.
    full_path: bool,
}

/// A set of glob patterns used to hide paths from the diff.
///
/// Glob syntax: `*` and `?` never cross a `/`, `**` crosses directories.
#[derive(Debug, Clone, Default)]
pub struct ExcludePatterns {
    patterns: Vec<String>,
    matchers: Vec<Matcher>,
}

impl ExcludePatterns {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();

        let matchers = patterns
            .iter()
            .filter_map(|pattern| {
                let trimmed = pattern.trim_start_matches('/');
                match Regex::new(&glob_to_regex(trimmed)) {
                    Ok(regex) => Some(Matcher {
                        regex,
                        full_path: trimmed.contains('/'),
                    }),
                    Err(e) => {
                        warn!("Ignoring invalid exclude pattern '{}': {}", pattern, e);
                        None
                    }
                }
            })
            .collect();

        Self { patterns, matchers }
    }

    /// The default lockfile exclusions.
    pub fn default_lockfiles() -> Self {
        Self::new(DEFAULT_EXCLUDE_FILES)
    }

    /// No exclusions at all.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        let file_name = path.rsplit('/').next().unwrap_or(path);

        self.matchers.iter().any(|m| {
            if m.full_path {
                m.regex.is_match(path)
            } else {
                m.regex.is_match(file_name)
            }
        })
    }

    /// Keep only the paths that are not excluded, preserving order.
    pub fn filter<I>(&self, paths: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        paths.into_iter().filter(|p| !self.is_excluded(p)).collect()
    }
}

/// Translate a glob into an anchored regular expression.
fn glob_to_regex(glob: &str) -> String {
    let mut re = String::from("^");
    let mut chars = glob.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                if chars.peek() == Some(&'/') {
                    chars.next();
                    re.push_str("(?:.*/)?");
                } else {
                    re.push_str(".*");
                }
            }
            '*' => re.push_str("[^/]*"),
            '?' => re.push_str("[^/]"),
            other => re.push_str(&regex_lite::escape(&other.to_string())),
        }
    }

    re.push('$');
    re
}
