//! Text output formatting with colors.

use promptprobe_core::{Answer, CandidatePlan};
use promptprobe_fetch::ProbeError;
use std::time::Duration;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats an answer with a one-line footer naming the model.
    pub fn format_answer(&self, answer: &Answer, attempts: usize, duration: Duration) -> String {
        let footer = format!(
            "via {} ({} {}, {})",
            answer.candidate.model,
            attempts,
            if attempts == 1 { "attempt" } else { "attempts" },
            format_duration(duration)
        );
        format!("{}\n\n{}", answer.text.trim_end(), self.dim(&footer))
    }

    /// Formats a terminal probe error with every per-candidate failure.
    pub fn format_probe_error(&self, error: &ProbeError) -> String {
        let mut lines = vec![format!("{}: {}", self.red("Error"), error)];
        for failure in error.failures() {
            lines.push(format!(
                "  {} {} {}",
                self.red("✗"),
                self.bold(&failure.candidate.model),
                self.dim(&failure.candidate.redacted_url())
            ));
            lines.push(format!("    {}", failure.message));
        }
        lines.join("\n")
    }

    /// Formats a model list.
    pub fn format_models(&self, models: &[String]) -> String {
        if models.is_empty() {
            return self.dim("No models available");
        }

        let mut lines = vec![self.bold(&format!("{} models", models.len()))];
        lines.extend(models.iter().map(|m| format!("  • {m}")));
        lines.join("\n")
    }

    /// Formats the candidate order with redacted URLs.
    pub fn format_plan(&self, plan: &CandidatePlan) -> String {
        let mut lines = vec![
            self.bold(&format!(
                "{} candidates ({} templates × {} models)",
                plan.len(),
                plan.templates().len(),
                plan.models().len()
            )),
            "─".repeat(50),
        ];

        for (i, candidate) in plan.candidates().enumerate() {
            lines.push(format!(
                "{:>3}. {:<20} {}",
                i + 1,
                self.cyan(&candidate.model),
                self.dim(&candidate.redacted_url())
            ));
        }

        lines.join("\n")
    }

    /// Formats a check result line.
    pub fn format_check(&self, label: &str, ok: bool, detail: &str) -> String {
        let status = if ok {
            self.green("✓")
        } else {
            self.red("✗")
        };
        format!("{label:<12} {status} {detail}")
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

/// Formats a duration as milliseconds below one second, seconds above.
pub fn format_duration(duration: Duration) -> String {
    let ms = duration.as_millis();
    if ms < 1000 {
        format!("{ms}ms")
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_duration(Duration::from_secs(30)), "30.0s");
    }

    #[test]
    fn test_format_check_without_colors() {
        let formatter = TextFormatter::new(false);
        assert_eq!(
            formatter.format_check("credential", true, "GEMINI_API_KEY"),
            "credential   ✓ GEMINI_API_KEY"
        );
    }

    #[test]
    fn test_empty_models() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.format_models(&[]), "No models available");
    }
}
