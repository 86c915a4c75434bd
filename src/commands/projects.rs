//! `portal projects` command.

use tracing::warn;

use crate::context::ServiceContext;
use crate::domain::{Project, Record};

/// Execute the `projects` command.
///
/// Displays a table of all projects showing identifier, name, type, and
/// status.
///
/// # Errors
///
/// Returns an error string if the project listing fails.
pub async fn run(ctx: &ServiceContext) -> Result<(), String> {
    let records =
        ctx.records.list_projects().await.map_err(|e| format!("Failed to list projects: {e}"))?;
    print!("{}", render(&parse(&records)));
    Ok(())
}

/// Parses project records, skipping those without an identifier or with
/// malformed fields.
#[must_use]
pub fn parse(records: &[Record]) -> Vec<Project> {
    let mut projects = Vec::new();
    for record in records {
        match Project::from_record(record) {
            Ok(Some(project)) => projects.push(project),
            Ok(None) => {}
            Err(err) => warn!(error = %err, "skipping project"),
        }
    }
    projects
}

/// Renders the dashboard table.
#[must_use]
pub fn render(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects found.\n".to_string();
    }

    let rows: Vec<[&str; 5]> = projects
        .iter()
        .map(|p| {
            [
                p.record_id.as_str(),
                p.project_id.as_str(),
                p.display_name(),
                p.project_type.as_deref().unwrap_or("-"),
                p.status.as_deref().unwrap_or("-"),
            ]
        })
        .collect();

    let headers = ["RECORD", "PROJECT", "NAME", "TYPE", "STATUS"];
    let mut widths = headers.map(width_of);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(width_of(cell));
        }
    }

    // `format!` pads by char count, matching `width_of`.
    let line = |cells: [&str; 5]| {
        let padded: Vec<String> =
            cells.iter().zip(widths).map(|(cell, width)| format!("{cell:<width$}")).collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = line(headers);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("{}\n", rule.join("  ")));
    for row in rows {
        out.push_str(&line(row));
    }
    out.push_str(&format!("\n{} project(s) total.\n", projects.len()));
    out
}

fn width_of(cell: &str) -> usize {
    cell.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(values: serde_json::Value) -> Vec<Record> {
        serde_json::from_value(values).unwrap()
    }

    #[test]
    fn skips_projects_without_identifier() {
        let projects = parse(&records(json!([
            {"id": "recP1", "fields": {"Project ID": "ACME-001", "Project Name": "Acme Audit", "Project Type": "Audit", "Status": "Active"}},
            {"id": "recP2", "fields": {"Project Name": "Draft"}},
            {"id": "recP3"},
            {"id": "recP4", "fields": {"Project ID": {"formula": true}}},
            {"id": "recP5", "fields": {"Project ID": "BETA-7"}}
        ])));
        let ids: Vec<&str> = projects.iter().map(|p| p.project_id.as_str()).collect();
        assert_eq!(ids, ["ACME-001", "BETA-7"]);
    }

    #[test]
    fn numeric_identifiers_are_listed_as_text() {
        let projects = parse(&records(json!([
            {"id": "recP1", "fields": {"Project ID": 42, "Project Name": "Autonumbered"}}
        ])));
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].project_id, "42");
    }

    #[test]
    fn non_ascii_names_are_measured_in_chars() {
        let projects = parse(&records(json!([
            {"id": "recP1", "fields": {"Project ID": "A-1", "Project Name": "Café Müller", "Status": "Active"}},
            {"id": "recP2", "fields": {"Project ID": "B-2", "Project Name": "Plain", "Status": "Done"}}
        ])));
        let table = render(&projects);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "RECORD  PROJECT  NAME         TYPE  STATUS");
        assert_eq!(lines[1], "------  -------  -----------  ----  ------");
        assert_eq!(lines[2], "recP1   A-1      Café Müller  -     Active");
        assert_eq!(lines[3], "recP2   B-2      Plain        -     Done");
    }

    #[test]
    fn table_aligns_columns() {
        let projects = parse(&records(json!([
            {"id": "recP1", "fields": {"Project ID": "ACME-001", "Project Name": "Acme Audit", "Project Type": "Audit", "Status": "Active"}},
            {"id": "recP5", "fields": {"Project ID": "B-7"}}
        ])));
        let table = render(&projects);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "RECORD  PROJECT   NAME        TYPE   STATUS");
        assert_eq!(lines[1], "------  --------  ----------  -----  ------");
        assert_eq!(lines[2], "recP1   ACME-001  Acme Audit  Audit  Active");
        assert_eq!(lines[3], "recP5   B-7       B-7         -      -");
        assert!(table.ends_with("2 project(s) total.\n"));
    }

    #[test]
    fn empty_listing_says_so() {
        assert_eq!(render(&[]), "No projects found.\n");
    }
}
