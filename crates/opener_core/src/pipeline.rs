use regex::{Regex, RegexBuilder};

/// Inclusive, 1-based window over the identifier list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeWindow {
    pub start: usize,
    pub end: usize,
}

impl Default for RangeWindow {
    fn default() -> Self {
        RangeWindow::full(0)
    }
}

impl RangeWindow {
    /// The whole list: `[1, total]`, or `[1, 0]` when there is nothing.
    pub fn full(total: usize) -> Self {
        Self { start: 1, end: total }
    }

    /// Clamp a requested window against `total` identifiers.
    ///
    /// `end` is clamped into `[1, total]` first, then `start` into `[1, end]`,
    /// so a start past the end is pulled down to the end.
    pub fn clamped(start: usize, end: usize, total: usize) -> Self {
        if total == 0 {
            return Self::full(0);
        }
        let end = end.clamp(1, total);
        let start = start.clamp(1, end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid filter pattern {pattern:?}: {message}")]
pub struct InvalidPatternError {
    pub pattern: String,
    pub message: String,
}

/// Output of [`derive_effective`]. A bad pattern does not fail the
/// derivation; the filter stage is skipped and the error is carried along.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Derived {
    pub urls: Vec<String>,
    pub pattern_error: Option<InvalidPatternError>,
}

/// Derive the effective list: range slice, then pattern filter, then
/// parameter append.
///
/// The window is not clamped here. A window that does not fit `identifiers`
/// selects nothing.
pub fn derive_effective(
    identifiers: &[String],
    range: RangeWindow,
    filter_pattern: &str,
    append_params: &str,
) -> Derived {
    let window = range
        .start
        .checked_sub(1)
        .and_then(|from| identifiers.get(from..range.end))
        .unwrap_or_default();

    let (matcher, pattern_error) = match compile_filter(filter_pattern) {
        Ok(matcher) => (matcher, None),
        Err(err) => (None, Some(err)),
    };

    let params = append_params.trim().trim_start_matches(['?', '&']);
    let urls = window
        .iter()
        .filter(|url| matcher.as_ref().is_none_or(|re| re.is_match(url)))
        .map(|url| append_query(url, params))
        .collect();

    Derived {
        urls,
        pattern_error,
    }
}

/// Compile a case-insensitive filter. An empty pattern means "no filter".
pub fn compile_filter(pattern: &str) -> Result<Option<Regex>, InvalidPatternError> {
    if pattern.is_empty() {
        return Ok(None);
    }
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|err| InvalidPatternError {
            pattern: pattern.to_string(),
            message: err.to_string(),
        })
}

/// Append `params` with `&` when the URL already has a query, `?` otherwise.
pub fn append_query(url: &str, params: &str) -> String {
    if params.is_empty() {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{params}")
}
