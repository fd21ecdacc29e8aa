//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use lineage_coverage::{CoverageLevel, CoverageReport};
use lineage_curator::{EdgeStats, MergeOutcome};
use lineage_gatekeeper::{IntegrityReport, Severity};
use lineage_janitor::JanitorMetrics;
use lineage_source::FetchOutcome;
use serde::Serialize;
use std::path::Path;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format the result of a merge.
    pub fn merge_outcome(&self, outcome: &MergeOutcome) -> Result<String> {
        let stats = &outcome.stats;
        match self.format {
            OutputFormat::Json => to_json(&serde_json::json!({
                "stats": stats,
                "persons": outcome.persons.len(),
                "rejections": outcome.rejections,
                "conflicts": outcome.conflicts,
                "decisions": outcome.decisions,
                "pendingRemovals": outcome.pending_removals,
            })),
            OutputFormat::Quiet => Ok(format!(
                "added={} updated={} unchanged={} duplicate={} invalid={}",
                stats.added,
                stats.updated_existing,
                stats.unchanged,
                stats.rejected_duplicate_name,
                stats.rejected_invalid
            )),
            OutputFormat::Table => {
                let mut sections = vec![counter_table(&[
                    ("Added", stats.added),
                    ("Updated existing", stats.updated_existing),
                    ("Unchanged", stats.unchanged),
                    ("Rejected (duplicate name)", stats.rejected_duplicate_name),
                    ("Rejected (invalid)", stats.rejected_invalid),
                    ("Persons in set", outcome.persons.len()),
                ])];

                if !outcome.rejections.is_empty() {
                    let mut builder = Builder::default();
                    builder.push_record(["#", "ID", "Reason"]);
                    for rejection in &outcome.rejections {
                        builder.push_record([
                            rejection.index.to_string(),
                            rejection.id.clone().unwrap_or_else(|| "-".to_string()),
                            rejection.reason.clone(),
                        ]);
                    }
                    sections.push(styled(builder));
                }

                for conflict in &outcome.conflicts {
                    let ids: Vec<&str> = conflict.ids.iter().map(|id| id.as_str()).collect();
                    sections.push(self.warning(&format!(
                        "Name collision '{}': {}",
                        conflict.normalized_name,
                        ids.join(", ")
                    )));
                }
                if !outcome.pending_removals.is_empty() {
                    sections.push(self.info(&format!(
                        "{} existing identifier(s) lost a collision; run `lineage cleanup --resolve-duplicates` to remove them",
                        outcome.pending_removals.len()
                    )));
                }

                Ok(sections.join("\n"))
            }
        }
    }

    /// Format edge counters.
    pub fn edge_stats(&self, stats: &EdgeStats, edges_in_graph: usize) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(&serde_json::json!({
                "stats": stats,
                "edgesInGraph": edges_in_graph,
            })),
            OutputFormat::Quiet => Ok(format!(
                "added={} missing={} duplicate={} ambiguous={} invalid={}",
                stats.added,
                stats.skipped_missing_endpoint,
                stats.skipped_duplicate,
                stats.skipped_ambiguous_target,
                stats.rejected_invalid
            )),
            OutputFormat::Table => Ok(counter_table(&[
                ("Added", stats.added),
                ("Skipped (missing endpoint)", stats.skipped_missing_endpoint),
                ("Skipped (duplicate)", stats.skipped_duplicate),
                ("Skipped (ambiguous target)", stats.skipped_ambiguous_target),
                ("Rejected (invalid)", stats.rejected_invalid),
                ("Edges in graph", edges_in_graph),
            ])),
        }
    }

    /// Format an integrity report.
    pub fn integrity_report(&self, report: &IntegrityReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(report),
            OutputFormat::Quiet => Ok(format!(
                "critical={} warnings={}",
                report.critical_count(),
                report.warning_count()
            )),
            OutputFormat::Table => {
                let header = format!(
                    "Checked {} persons, {} sources, {} edges",
                    report.persons_checked, report.sources_checked, report.edges_checked
                );
                if report.issues.is_empty() {
                    return Ok(format!("{}\n{}", header, self.success("No issues found")));
                }

                let mut builder = Builder::default();
                builder.push_record(["Issue", "Severity", "Count", "Examples"]);
                for issue in &report.issues {
                    let severity = match issue.severity {
                        Severity::Critical => self.colorize("critical", "red"),
                        Severity::Warning => self.colorize("warning", "yellow"),
                    };
                    builder.push_record([
                        issue.code.to_string(),
                        severity,
                        issue.count.to_string(),
                        issue.examples.join("\n"),
                    ]);
                }

                let verdict = if report.is_well_formed() {
                    self.success(&format!("Well formed ({} warning(s))", report.warning_count()))
                } else {
                    self.error(&format!("{} critical issue(s)", report.critical_count()))
                };
                Ok(format!("{}\n{}\n{}", header, styled(builder), verdict))
            }
        }
    }

    /// Format a coverage report.
    pub fn coverage_report(&self, report: &CoverageReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(report),
            OutputFormat::Quiet => Ok(report
                .suggestions()
                .iter()
                .map(|slice| format!("{}:{}:{}", slice.start_year, slice.end_year, slice.min_fame))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if report.buckets.is_empty() {
                    return Ok(self.colorize("No persons to analyze.", "yellow"));
                }

                let mut buckets = Builder::default();
                buckets.push_record(["Century", "Years", "Persons", "Level"]);
                for bucket in &report.buckets {
                    buckets.push_record([
                        bucket.century.to_string(),
                        format!("{}..={}", bucket.start_year, bucket.end_year),
                        bucket.count.to_string(),
                        self.level(bucket.level),
                    ]);
                }

                let mut sections = vec![
                    format!(
                        "{} persons, gap threshold {} per century",
                        report.total_persons, report.min_per_bucket
                    ),
                    styled(buckets),
                ];

                if report.gaps.is_empty() {
                    sections.push(self.success("No gaps"));
                } else {
                    let mut gaps = Builder::default();
                    gaps.push_record(["Range", "Persons", "Worst", "Suggested fetch"]);
                    for gap in &report.gaps {
                        gaps.push_record([
                            format!("{}..={}", gap.start_year, gap.end_year),
                            gap.total.to_string(),
                            self.level(gap.worst),
                            format!(
                                "--slice {}:{}:{}",
                                gap.suggestion.start_year, gap.suggestion.end_year, gap.suggestion.min_fame
                            ),
                        ]);
                    }
                    sections.push(styled(gaps));
                }

                Ok(sections.join("\n"))
            }
        }
    }

    /// Format cleanup metrics.
    pub fn janitor_metrics(&self, metrics: &JanitorMetrics) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(metrics),
            OutputFormat::Quiet => Ok(metrics.total_changes().to_string()),
            OutputFormat::Table => {
                let table = counter_table(&[
                    ("Persons removed", metrics.persons_removed),
                    ("Edge lists removed", metrics.edge_lists_removed),
                    ("Edges removed", metrics.edges_removed),
                    ("Edges migrated", metrics.edges_migrated),
                    ("Ambiguous edges left", metrics.ambiguous_edges_left),
                ]);
                if metrics.dry_run {
                    Ok(format!("{}\n{}", table, self.info("Dry run: nothing was written")))
                } else {
                    Ok(table)
                }
            }
        }
    }

    /// Format the result of a fetch.
    pub fn fetch_outcome(&self, outcome: &FetchOutcome, output: &Path) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(&serde_json::json!({
                "records": outcome.records.len(),
                "skipped": outcome.skipped,
                "output": output.display().to_string(),
            })),
            OutputFormat::Quiet => Ok(output.display().to_string()),
            OutputFormat::Table => {
                let mut lines = vec![self.success(&format!(
                    "Fetched {} record(s) into {}",
                    outcome.records.len(),
                    output.display()
                ))];
                for skipped in &outcome.skipped {
                    lines.push(self.warning(&format!("Skipped {}: {}", skipped.slice, skipped.reason)));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn level(&self, level: CoverageLevel) -> String {
        let color = match level {
            CoverageLevel::Critical => "red",
            CoverageLevel::Low => "yellow",
            CoverageLevel::Moderate => "cyan",
            CoverageLevel::Good => "green",
        };
        self.colorize(&level.to_string(), color)
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn counter_table(rows: &[(&str, usize)]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["", "Count"]);
    for (label, count) in rows {
        builder.push_record([label.to_string(), count.to_string()]);
    }
    styled(builder)
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}
