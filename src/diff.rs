//! Line-level comparison between original and refactored code.

use similar::{ChangeTag, TextDiff};
use std::fmt::Write;

/// Renders a unified diff of a refactoring, labelled with `name`.
pub fn unified_diff(original: &str, refactored: &str, name: &str) -> String {
    let diff = TextDiff::from_lines(original, refactored);
    let mut output = String::new();

    writeln!(&mut output, "--- {name} (original)").unwrap();
    writeln!(&mut output, "+++ {name} (refactored)").unwrap();

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            writeln!(&mut output, "...").unwrap();
        }

        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };

                write!(&mut output, "{sign}{}", change.value()).unwrap();
                if change.missing_newline() {
                    writeln!(&mut output).unwrap();
                }
            }
        }
    }

    output
}

/// Number of lines inserted and removed by a refactoring.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChangeSummary {
    pub insertions: usize,
    pub deletions: usize,
}

impl ChangeSummary {
    /// Counts changed lines between original and refactored code.
    pub fn between(original: &str, refactored: &str) -> Self {
        let diff = TextDiff::from_lines(original, refactored);
        let mut summary = Self::default();

        for change in diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Insert => summary.insertions += 1,
                ChangeTag::Delete => summary.deletions += 1,
                ChangeTag::Equal => {}
            }
        }

        summary
    }

    /// Returns true if the texts are line-for-line identical.
    pub fn is_unchanged(&self) -> bool {
        self.insertions == 0 && self.deletions == 0
    }
}

impl std::fmt::Display for ChangeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} line(s) added, {} line(s) removed",
            self.insertions, self.deletions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_changed_lines() {
        let original = "a\nb\nc\n";
        let refactored = "header\na\nB\nc\n";
        let summary = ChangeSummary::between(original, refactored);
        assert_eq!(summary.insertions, 2);
        assert_eq!(summary.deletions, 1);
        assert_eq!(summary.to_string(), "2 line(s) added, 1 line(s) removed");
    }

    #[test]
    fn test_identical_text_is_unchanged() {
        assert!(ChangeSummary::between("same\n", "same\n").is_unchanged());
    }

    #[test]
    fn test_unified_diff_marks_lines() {
        let diff = unified_diff("getOrders();\n", "searchOrders();\n", "orders.js");
        assert!(diff.starts_with("--- orders.js (original)\n+++ orders.js (refactored)\n"));
        assert!(diff.contains("-getOrders();\n"));
        assert!(diff.contains("+searchOrders();\n"));
    }
}
