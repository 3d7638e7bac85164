use relative_path::{RelativePath, RelativePathBuf};

/// Folder whitelist restricting which documents get decorated.
///
/// An empty filter accepts every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeFilter {
    prefixes: Vec<RelativePathBuf>,
}

impl ScopeFilter {
    /// Build a filter from folder strings. Blank entries and surrounding slashes are ignored.
    pub fn new<S: AsRef<str>>(folders: impl IntoIterator<Item = S>) -> Self {
        let prefixes = folders
            .into_iter()
            .map(|f| f.as_ref().trim().trim_matches('/').to_string())
            .filter(|f| !f.is_empty())
            .map(RelativePathBuf::from)
            .collect();
        Self { prefixes }
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Whether `path` equals one of the folders or lives beneath one.
    ///
    /// Matching is per path component, so `law` does not admit `lawyer/x`.
    pub fn is_eligible(&self, path: &RelativePath) -> bool {
        self.prefixes.is_empty() || self.prefixes.iter().any(|prefix| path.starts_with(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&["notes/law"], "notes/law/x", true)]
    #[case(&[], "notes/law/x", true)]
    #[case(&["other"], "notes/law/x", false)]
    #[case(&["notes/law"], "notes/law", true)]
    #[case(&["notes/law"], "notes/lawyer/x.md", false)]
    #[case(&["notes"], "notes/law/deep/x.md", true)]
    #[case(&["other", "notes/law/"], "notes/law/x.md", true)]
    #[case(&["  ", ""], "anything.md", true)]
    #[case(&["notes"], "", false)]
    fn test_eligibility(#[case] folders: &[&str], #[case] path: &str, #[case] expected: bool) {
        let filter = ScopeFilter::new(folders.iter().copied());

        assert_eq!(filter.is_eligible(RelativePath::new(path)), expected);
    }
}
