use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Row, Table};
use primeproof::{CallGraph, ProofReport, ProofStatus, RuleRecord, THEOREM_ID};

pub struct Formatter {}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {}
    }

    /// Proof outcome; `raw` prints the commit log only, one step per line
    pub fn format_report(&self, theorem: &str, report: &ProofReport, raw: bool) -> String {
        if raw {
            return report
                .commit_log
                .iter()
                .map(|line| format!("{}\n", line))
                .collect();
        }

        let mut output = String::new();
        output.push_str(&format!("{} {}\n", status_label(report.status), theorem));
        if let Some(reason) = report.stop_reason {
            output.push_str(&format!("Search stopped: {:?}\n", reason));
        }
        if report.theorem_swapped {
            output.push_str("Sides were exchanged so that the larger composite is on the left\n");
        }
        output.push('\n');

        if !report.proof_steps.is_empty() {
            if !report.is_proved() {
                output.push_str("Best partial trace:\n");
            }
            output.push_str(&self.format_steps(report));
            output.push('\n');
        }

        output.push_str(&format!(
            "{} = {}\n",
            report.final_lhs.join(" "),
            report.final_rhs.join(" ")
        ));

        let stats = &report.stats;
        output.push_str(&format!(
            "\n{} states popped, {} expanded, {} children, {} duplicates\n",
            stats.states_popped,
            stats.states_expanded,
            stats.children_generated,
            stats.duplicates_skipped
        ));
        if stats.rejected_batches > 0 {
            output.push_str(&format!(
                "Admission control rejected {} batch(es), dropping {} transition(s)\n",
                stats.rejected_batches, stats.dropped_transitions
            ));
        }
        if report.rejected_candidates > 0 {
            output.push_str(&format!(
                "{} candidate(s) failed token verification\n",
                report.rejected_candidates
            ));
        }
        output
    }

    fn format_steps(&self, report: &ProofReport) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("#").set_alignment(CellAlignment::Right),
            Cell::new("Rewrite").set_alignment(CellAlignment::Left),
            Cell::new("Left").set_alignment(CellAlignment::Left),
            Cell::new("Right").set_alignment(CellAlignment::Left),
        ]));

        for (index, step) in report.proof_steps.iter().enumerate() {
            table.add_row(Row::from(vec![
                Cell::new(index + 1).set_alignment(CellAlignment::Right),
                Cell::new(&step.description),
                Cell::new(step.lhs.join(" ")),
                Cell::new(step.rhs.join(" ")),
            ]));
        }

        table.to_string()
    }

    pub fn format_graph(&self, graph: &CallGraph) -> String {
        if graph.is_empty() {
            return "No rewrite relations\n".to_string();
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec!["Source", "Relation", "Target"]));
        for edge in graph.edges() {
            table.add_row(Row::from(vec![
                equation_name(edge.source),
                edge.relation.to_string(),
                equation_name(edge.target),
            ]));
        }

        format!("{}\n{} edge(s)\n", table, graph.len())
    }

    pub fn format_axioms(&self, file_count: usize, axioms: &[RuleRecord]) -> String {
        let mut output = format!(
            "Workspace contains {} files, {} axioms\n\n",
            file_count,
            axioms.len()
        );
        if axioms.is_empty() {
            return output;
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec!["Axiom", "Equation", "Stored as"]));
        for rule in axioms {
            let (lhs, rhs) = rule.original_orientation();
            let stored = if rule.was_swapped { "swapped" } else { "as written" };
            table.add_row(Row::from(vec![
                equation_name(rule.id),
                format!("{} = {}", lhs.join(" "), rhs.join(" ")),
                stored.to_string(),
            ]));
        }
        output.push_str(&table.to_string());
        output.push('\n');
        output
    }
}

fn status_label(status: ProofStatus) -> &'static str {
    match status {
        ProofStatus::Proved => "Proved",
        ProofStatus::NoProof => "No proof found for",
        ProofStatus::VerificationFailed => "Verification failed for",
        ProofStatus::Cancelled => "Cancelled",
        ProofStatus::LimitReached => "Search limit reached for",
    }
}

fn equation_name(id: u64) -> String {
    if id == THEOREM_ID {
        "Theorem".to_string()
    } else {
        format!("Axiom_{}", id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primeproof::{Prover, ResourceLimits};

    fn prover() -> Prover {
        let mut prover = Prover::with_limits(ResourceLimits::default());
        prover
            .set_axioms([
                (vec!["1", "+", "1"], vec!["2"]),
                (vec!["2", "+", "2"], vec!["4"]),
            ])
            .unwrap();
        prover
    }

    #[test]
    fn test_proved_report() {
        let report = prover()
            .prove(&["1", "+", "1", "+", "1", "+", "1"], &["4"])
            .unwrap();
        let output = Formatter::new().format_report("1 + 1 + 1 + 1 = 4", &report, false);

        assert!(output.starts_with("Proved 1 + 1 + 1 + 1 = 4"));
        assert!(output.contains("rhs_expand via Axiom_2"));
        assert!(output.contains("1 + 1 + 2"));
        assert!(!output.contains("Best partial trace"));
    }

    #[test]
    fn test_raw_report_is_commit_log() {
        let report = prover()
            .prove(&["1", "+", "1", "+", "1", "+", "1"], &["4"])
            .unwrap();
        let output = Formatter::new().format_report("", &report, true);
        assert_eq!(
            output,
            "rhs_expand via Axiom_2\nrhs_expand via Axiom_1\nrhs_expand via Axiom_1\n"
        );
    }

    #[test]
    fn test_unproved_report() {
        let report = prover().prove(&["1", "+", "1", "+", "1"], &["4"]).unwrap();
        let output = Formatter::new().format_report("1 + 1 + 1 = 4", &report, false);
        assert!(output.starts_with("No proof found for 1 + 1 + 1 = 4"));
        assert!(output.contains("Search stopped: Exhausted"));
    }

    #[test]
    fn test_graph_table() {
        let graph = prover()
            .call_graph(&["1", "+", "1", "+", "1", "+", "1"], &["4"])
            .unwrap();
        let output = Formatter::new().format_graph(&graph);
        assert!(output.contains("Theorem"));
        assert!(output.contains("lhs_expand"));
        assert!(output.ends_with("3 edge(s)\n"));
    }

    #[test]
    fn test_axiom_listing_shows_original_orientation() {
        let mut prover = prover();
        prover.add_axiom(&["x"], &["y", "y"]).unwrap();
        let output = Formatter::new().format_axioms(1, prover.axioms());
        assert!(output.contains("3 axioms"));
        assert!(output.contains("x = y y"));
        assert!(output.contains("swapped"));
    }
}
