use crate::pipeline::BatchSummary;
use std::fmt;

/// Text report formatter for a batch summary
pub struct TextReport<'a> {
    summary: &'a BatchSummary,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(summary: &'a BatchSummary) -> Self {
        Self { summary }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.summary;

        writeln!(f, "De-identification Summary")?;
        writeln!(f, "=========================")?;
        writeln!(f)?;
        if s.archives_extracted > 0 || s.archives_failed > 0 {
            writeln!(
                f,
                "Archives:       {} extracted, {} corrupt",
                s.archives_extracted, s.archives_failed
            )?;
        }
        writeln!(f, "Discovered:     {}", s.discovered)?;
        writeln!(f, "Processed:      {}", s.processed)?;
        writeln!(f, "Skipped:        {}", s.skipped)?;
        writeln!(f, "Failed:         {}", s.failed)?;
        if s.preview_failures > 0 {
            writeln!(f, "Preview Errors: {}", s.preview_failures)?;
        }

        if !s.failures.is_empty() {
            writeln!(f)?;
            writeln!(f, "Failures")?;
            writeln!(f, "--------")?;
            for failure in &s.failures {
                writeln!(f, "{} [{}]", failure.path.display(), failure.kind)?;
                writeln!(f, "  {}", failure.message)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::RecordFailure;
    use std::path::PathBuf;

    #[test]
    fn test_text_report_format() {
        let summary = BatchSummary {
            archives_extracted: 3,
            archives_failed: 1,
            discovered: 10,
            processed: 7,
            skipped: 2,
            failed: 1,
            preview_failures: 0,
            failures: vec![RecordFailure {
                path: PathBuf::from("/data/study/IM0001.dcm"),
                kind: "decode-failure",
                message: "Failed to decode pixel data: truncated".to_string(),
            }],
        };

        let output = format!("{}", TextReport::new(&summary));

        assert!(output.contains("De-identification Summary"));
        assert!(output.contains("Archives:       3 extracted, 1 corrupt"));
        assert!(output.contains("Processed:      7"));
        assert!(output.contains("Skipped:        2"));
        assert!(output.contains("Failed:         1"));
        assert!(output.contains("/data/study/IM0001.dcm [decode-failure]"));
        assert!(!output.contains("Preview Errors"));
    }

    #[test]
    fn test_text_report_without_archives_or_failures() {
        let summary = BatchSummary {
            discovered: 1,
            processed: 1,
            ..Default::default()
        };
        let output = TextReport::new(&summary).to_string();

        assert!(!output.contains("Archives:"));
        assert!(!output.contains("Failures"));
    }
}
