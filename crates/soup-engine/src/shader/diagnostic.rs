use std::fmt;

/// Default bound for a diagnostic log, in bytes.
pub const DEFAULT_LOG_LIMIT: usize = 512;

/// Bounded diagnostic text attached to shader objects and programs.
///
/// Entries are joined by newlines. Text past `limit` bytes is dropped at a
/// UTF-8 character boundary and the log is marked truncated; once truncated,
/// further entries are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticLog {
    text: String,
    limit: usize,
    truncated: bool,
}

impl DiagnosticLog {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            text: String::new(),
            limit,
            truncated: false,
        }
    }

    /// Appends one diagnostic entry.
    pub fn push(&mut self, entry: &str) {
        let entry = entry.trim_end();
        if self.truncated || entry.is_empty() {
            return;
        }

        let sep = if self.text.is_empty() { "" } else { "\n" };
        let remaining = self.limit.saturating_sub(self.text.len());

        if sep.len() + entry.len() <= remaining {
            self.text.push_str(sep);
            self.text.push_str(entry);
            return;
        }

        self.truncated = true;
        if remaining <= sep.len() {
            return;
        }

        let mut end = remaining - sep.len();
        while !entry.is_char_boundary(end) {
            end -= 1;
        }
        self.text.push_str(sep);
        self.text.push_str(&entry[..end]);
    }

    /// Appends every entry of `other`, subject to this log's bound.
    pub fn extend(&mut self, other: &DiagnosticLog) {
        for line in other.text.lines() {
            self.push(line);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::with_limit(DEFAULT_LOG_LIMIT)
    }
}

impl fmt::Display for DiagnosticLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)?;
        if self.truncated {
            f.write_str("\n[log truncated]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let log = DiagnosticLog::default();
        assert!(log.is_empty());
        assert!(!log.is_truncated());
        assert_eq!(log.limit(), DEFAULT_LOG_LIMIT);
    }

    #[test]
    fn entries_joined_by_newline() {
        let mut log = DiagnosticLog::with_limit(64);
        log.push("first");
        log.push("second\n");
        assert_eq!(log.as_str(), "first\nsecond");
    }

    #[test]
    fn truncates_at_limit() {
        let mut log = DiagnosticLog::with_limit(8);
        log.push("hello world");
        assert_eq!(log.as_str(), "hello wo");
        assert!(log.is_truncated());
        assert!(log.to_string().ends_with("[log truncated]"));
    }

    #[test]
    fn truncates_on_char_boundary() {
        // 'a' = 1 byte, 'é' = 2 bytes, '€' = 3 bytes.
        let mut log = DiagnosticLog::with_limit(4);
        log.push("aé€");
        assert_eq!(log.as_str(), "aé");
        assert!(log.is_truncated());
    }

    #[test]
    fn ignores_entries_after_truncation() {
        let mut log = DiagnosticLog::with_limit(10);
        log.push("0123456789ab");
        log.push("x");
        assert_eq!(log.as_str(), "0123456789");
    }

    #[test]
    fn exact_fit_is_not_truncated() {
        let mut log = DiagnosticLog::with_limit(5);
        log.push("12345");
        assert_eq!(log.as_str(), "12345");
        assert!(!log.is_truncated());
    }

    #[test]
    fn extend_respects_bound() {
        let mut inner = DiagnosticLog::with_limit(64);
        inner.push("vertex: bad");
        inner.push("fragment: bad");

        let mut outer = DiagnosticLog::with_limit(15);
        outer.extend(&inner);
        assert_eq!(outer.as_str(), "vertex: bad\nfra");
        assert!(outer.is_truncated());
    }
}
