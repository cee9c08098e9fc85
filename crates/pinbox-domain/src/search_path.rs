use std::fmt;
use std::path::PathBuf;

/// POSIX search-path separator.
pub const SEARCH_PATH_SEPARATOR: char = ':';

/// Ordered list of roots handed to the build tool. Earlier entries shadow
/// later ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchPath {
    entries: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, root: PathBuf) {
        self.entries.push(root);
    }

    pub fn prepend(&mut self, root: PathBuf) {
        self.entries.insert(0, root);
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Render the value for the child's search-path variable, keeping the
    /// parent's own value (if any) after our entries as a fallback.
    pub fn to_env_value(&self, fallback: Option<&str>) -> String {
        let mut value = self.to_string();
        if let Some(fallback) = fallback.map(str::trim).filter(|v| !v.is_empty()) {
            if !value.is_empty() {
                value.push(SEARCH_PATH_SEPARATOR);
            }
            value.push_str(fallback);
        }
        value
    }
}

impl FromIterator<PathBuf> for SearchPath {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for SearchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, entry) in self.entries.iter().enumerate() {
            if idx > 0 {
                write!(f, "{SEARCH_PATH_SEPARATOR}")?;
            }
            write!(f, "{}", entry.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_entries_in_order() {
        let mut path: SearchPath = ["/a", "/b"].iter().map(PathBuf::from).collect();
        path.prepend(PathBuf::from("/scratch"));
        assert_eq!(path.to_string(), "/scratch:/a:/b");
        assert_eq!(path.entries()[1], PathBuf::from("/a"));
    }

    #[test]
    fn fallback_is_appended_after_entries() {
        let path: SearchPath = ["/a"].iter().map(PathBuf::from).collect();
        assert_eq!(path.to_env_value(Some("/home/me/go")), "/a:/home/me/go");
        assert_eq!(path.to_env_value(Some("  ")), "/a");
        assert_eq!(path.to_env_value(None), "/a");
    }

    #[test]
    fn empty_path_renders_only_fallback() {
        let path = SearchPath::new();
        assert!(path.entries().is_empty());
        assert_eq!(path.to_string(), "");
        assert_eq!(path.to_env_value(Some("/go")), "/go");
    }
}
