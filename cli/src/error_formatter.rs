use crate::rulefile::RuleFileError;
use ariadne::{Color, Label, Report, ReportKind, Source};
use primeproof::ProofError;

/// Format a rule file error with fancy terminal output using Ariadne
pub fn format_rule_file_error(error: &RuleFileError) -> String {
    let mut output = Vec::new();

    let message = format!(
        "Parse error: {} (file {}:{})",
        error.message, error.source_id, error.line
    );

    let mut report = Report::build(ReportKind::Error, &error.source_id, error.span.start)
        .with_message(message)
        .with_label(
            Label::new((&error.source_id, error.span.clone()))
                .with_message("")
                .with_color(Color::Red),
        );

    if let Some(suggestion) = &error.suggestion {
        report = report.with_help(suggestion);
    }

    match report.finish().write(
        (&error.source_id, Source::from(error.source_text.as_str())),
        &mut output,
    ) {
        Ok(_) => String::from_utf8_lossy(&output).to_string(),
        Err(_) => {
            // Fallback to simple format
            format!("{}", error)
        }
    }
}

pub fn format_proof_error(error: &ProofError) -> String {
    match error {
        ProofError::ResourceLimitExceeded {
            limit_name,
            limit_value,
            actual_value,
            suggestion,
        } => {
            format!(
                "Resource limit exceeded: {}\n  Limit: {}\n  Actual: {}\n  {}",
                limit_name, limit_value, actual_value, suggestion
            )
        }
        other => format!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rulefile::parse_rules;

    #[test]
    fn test_rule_file_error_mentions_location() {
        let err = parse_rules("a = b\nc d\n", "bad.rules").unwrap_err();
        let output = format_rule_file_error(&err);
        assert!(output.contains("bad.rules:2"));
        assert!(output.contains("Expected `=`"));
    }

    #[test]
    fn test_limit_error_is_multiline() {
        let err = ProofError::ResourceLimitExceeded {
            limit_name: "max_axioms".to_string(),
            limit_value: "1".to_string(),
            actual_value: "2".to_string(),
            suggestion: "Raise max_axioms".to_string(),
        };
        let output = format_proof_error(&err);
        assert_eq!(output.lines().count(), 4);
        assert!(output.contains("Limit: 1"));
    }
}
