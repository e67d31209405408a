//! Summary report for an evaluation run

use serde::{Deserialize, Serialize};

/// Aggregate results of evaluating one split
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalSummary {
    /// Which split was evaluated
    pub split: String,
    /// Total examples in the split
    pub total_examples: usize,
    /// Examples that decoded and were scored
    pub scored: usize,
    /// Examples skipped because the generation was malformed
    pub skipped_malformed: usize,
    /// Mean visual-token agreement over examples with a defined ratio
    pub mean_ratio_video: Option<f64>,
    /// Mean action-token agreement over examples with a defined ratio
    pub mean_ratio_action: Option<f64>,
    /// Timestamp of the run
    pub timestamp: String,
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{:.2}%", r * 100.0),
        None => "n/a".to_string(),
    }
}

impl EvalSummary {
    /// Build a summary from per-example agreement ratios
    pub fn new(
        split: String,
        total_examples: usize,
        scored: usize,
        skipped_malformed: usize,
        video_ratios: &[f64],
        action_ratios: &[f64],
    ) -> Self {
        Self {
            split,
            total_examples,
            scored,
            skipped_malformed,
            mean_ratio_video: mean(video_ratios),
            mean_ratio_action: mean(action_ratios),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Format the summary as markdown
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        md.push_str("# Evaluation Summary\n\n");
        md.push_str(&format!("**Timestamp**: {}\n\n", self.timestamp));
        md.push_str(&format!("**Split**: {}\n\n", self.split));
        md.push_str("| Metric | Value |\n");
        md.push_str("|--------|-------|\n");
        md.push_str(&format!("| Examples | {} |\n", self.total_examples));
        md.push_str(&format!("| Scored | {} |\n", self.scored));
        md.push_str(&format!("| Skipped (malformed) | {} |\n", self.skipped_malformed));
        md.push_str(&format!(
            "| Mean video agreement | {} |\n",
            format_ratio(self.mean_ratio_video)
        ));
        md.push_str(&format!(
            "| Mean action agreement | {} |\n",
            format_ratio(self.mean_ratio_action)
        ));
        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_means() {
        let summary = EvalSummary::new(
            "test".to_string(),
            4,
            3,
            1,
            &[0.5, 1.0],
            &[],
        );

        assert_eq!(summary.mean_ratio_video, Some(0.75));
        assert_eq!(summary.mean_ratio_action, None);
        assert!(!summary.timestamp.is_empty());
    }

    #[test]
    fn test_summary_markdown() {
        let summary = EvalSummary::new("test".to_string(), 2, 2, 0, &[1.0], &[0.5]);
        let md = summary.to_markdown();

        assert!(md.contains("# Evaluation Summary"));
        assert!(md.contains("100.00%"));
        assert!(md.contains("50.00%"));
        assert!(md.contains("| Scored | 2 |"));
    }
}
