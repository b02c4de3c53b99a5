/// Ordered substring patterns that keep URLs out of the sitemap
///
/// A URL is excluded if any pattern is a substring of it. The same rule set
/// is evaluated separately for page URLs and for image sources; an image is
/// never excluded just because the page it sits on is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionRules {
    patterns: Vec<String>,
}

impl ExclusionRules {
    /// Builds a rule set, dropping empty patterns (they would match everything)
    ///
    /// # Examples
    ///
    /// ```
    /// use site_cartographer::url::ExclusionRules;
    ///
    /// let rules = ExclusionRules::new(["/cart", "?sort="]);
    /// assert!(rules.is_excluded("https://example.com/cart/checkout"));
    /// assert!(!rules.is_excluded("https://example.com/about"));
    /// ```
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    /// Returns the first pattern contained in `candidate`, if any
    pub fn matching_pattern(&self, candidate: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|pattern| candidate.contains(pattern.as_str()))
            .map(String::as_str)
    }

    /// Returns true if any pattern is a substring of `candidate`
    pub fn is_excluded(&self, candidate: &str) -> bool {
        self.matching_pattern(candidate).is_some()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
