//! `.rules` files
//!
//! One axiom per line, written `lhs tokens = rhs tokens`. Tokens are separated
//! by whitespace and everything after `#` is a comment.

use std::ops::Range;
use thiserror::Error;

/// Token sequences of both sides of an equation
pub type Equation = (Vec<String>, Vec<String>);

/// A line that could not be read as an equation
#[derive(Debug, Clone, Error)]
#[error("{source_id}:{line}: {message}")]
pub struct RuleFileError {
    pub source_id: String,
    pub source_text: String,
    pub span: Range<usize>,
    pub line: usize,
    pub message: String,
    pub suggestion: Option<String>,
}

/// Parse every axiom in a rule file
pub fn parse_rules(source: &str, source_id: &str) -> Result<Vec<Equation>, RuleFileError> {
    let mut axioms = Vec::new();
    let mut offset = 0;

    for (index, raw_line) in source.split_inclusive('\n').enumerate() {
        let line_start = offset;
        offset += raw_line.len();

        let content = raw_line.split('#').next().unwrap_or_default();
        if content.trim().is_empty() {
            continue;
        }

        let equation = parse_line(content).map_err(|(span, message, suggestion)| RuleFileError {
            source_id: source_id.to_string(),
            source_text: source.to_string(),
            span: line_start + span.start..line_start + span.end,
            line: index + 1,
            message,
            suggestion,
        })?;
        axioms.push(equation);
    }

    Ok(axioms)
}

/// Parse a single equation such as a theorem given on the command line
pub fn parse_equation(text: &str, source_id: &str) -> Result<Equation, RuleFileError> {
    parse_line(text).map_err(|(span, message, suggestion)| RuleFileError {
        source_id: source_id.to_string(),
        source_text: text.to_string(),
        span,
        line: 1,
        message,
        suggestion,
    })
}

type LineError = (Range<usize>, String, Option<String>);

fn parse_line(content: &str) -> Result<Equation, LineError> {
    let trimmed_start = content.len() - content.trim_start().len();
    let trimmed_end = content.trim_end().len();
    let whole = trimmed_start..trimmed_end.max(trimmed_start);

    let Some(eq) = content.find('=') else {
        return Err((
            whole,
            "Expected `=` between the two sides".to_string(),
            Some("Write the axiom as `lhs tokens = rhs tokens`".to_string()),
        ));
    };
    if let Some(second) = content[eq + 1..].find('=') {
        let at = eq + 1 + second;
        return Err((
            at..at + 1,
            "An equation has exactly one `=`".to_string(),
            Some("Put each axiom on its own line".to_string()),
        ));
    }

    let lhs = tokens(&content[..eq]);
    let rhs = tokens(&content[eq + 1..]);
    if lhs.is_empty() {
        return Err((
            trimmed_start..eq + 1,
            "Left-hand side is empty".to_string(),
            None,
        ));
    }
    if rhs.is_empty() {
        return Err((
            eq..trimmed_end.max(eq + 1),
            "Right-hand side is empty".to_string(),
            None,
        ));
    }
    Ok((lhs, rhs))
}

fn tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}
