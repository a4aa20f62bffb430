use roster_core::{AppViewModel, DatasetRow, Phase};

const HEADERS: [&str; 6] = [
    "Reg No",
    "First Name",
    "Last Name",
    "Email",
    "Department",
    "Level",
];

/// Renders one frame of the view model as plain text lines.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    let file = view.selected_file.as_deref().unwrap_or("(none)");
    let action = if view.submission_in_flight {
        "Uploading…"
    } else if view.can_submit {
        "Upload"
    } else {
        "Upload (disabled)"
    };
    lines.push(format!("File: {file} [{action}]"));

    if let Some(error) = &view.upload_error {
        lines.push(format!("Upload error: {error}"));
    }
    if let Some(job_id) = &view.snapshot.job_id {
        lines.push(format!(
            "Task ID: {job_id} | Status: {} | {}",
            view.snapshot.status,
            phase_label(view.phase)
        ));
    }
    if let Some(warning) = &view.poll_warning {
        lines.push(format!("Warning: {warning}"));
    }

    if let Some(error) = &view.dataset_error {
        lines.push(format!("Students error: {error}"));
    }
    if view.dataset_loading && view.dataset.is_empty() {
        lines.push("Loading students…".to_string());
    }
    if !view.dataset.is_empty() {
        lines.extend(render_table(&view.dataset));
    }

    lines
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "Idle",
        Phase::Submitting => "Submitting",
        Phase::Tracking => "Tracking",
        Phase::Terminal => "Done",
    }
}

fn render_table(rows: &[DatasetRow]) -> Vec<String> {
    let cells: Vec<[&str; 6]> = rows
        .iter()
        .map(|row| {
            [
                row.reg_no.as_str(),
                row.first_name.as_str(),
                row.last_name.as_str(),
                row.email.as_str(),
                row.department.as_str(),
                row.level.as_str(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|header| header.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(cells.len() + 2);
    lines.push(format_row(&HEADERS, &widths));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    lines.extend(cells.iter().map(|row| format_row(row, &widths)));
    lines
}

fn format_row(cells: &[&str; 6], widths: &[usize; 6]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use roster_core::{JobSnapshot, JobStatus};

    use super::*;

    fn row(reg_no: &str, first_name: &str) -> DatasetRow {
        DatasetRow {
            reg_no: reg_no.to_string(),
            first_name: first_name.to_string(),
            last_name: "Okafor".to_string(),
            email: "x@y.z".to_string(),
            department: "Physics".to_string(),
            level: "200".to_string(),
        }
    }

    #[test]
    fn idle_view_without_file_disables_upload() {
        let lines = render(&AppViewModel::default());
        assert_eq!(lines, vec!["File: (none) [Upload (disabled)]".to_string()]);
    }

    #[test]
    fn tracking_view_shows_task_and_status() {
        let view = AppViewModel {
            phase: Phase::Tracking,
            snapshot: JobSnapshot::tracking("t1", JobStatus::Pending),
            selected_file: Some("students.csv".to_string()),
            submission_in_flight: true,
            dataset_loading: true,
            ..AppViewModel::default()
        };
        let lines = render(&view);
        assert_eq!(lines[0], "File: students.csv [Uploading…]");
        assert_eq!(lines[1], "Task ID: t1 | Status: PENDING | Tracking");
        assert_eq!(lines[2], "Loading students…");
    }

    #[test]
    fn errors_are_rendered_independently() {
        let view = AppViewModel {
            upload_error: Some("bad file".to_string()),
            dataset_error: Some("server down".to_string()),
            dataset: vec![row("A1", "Ada")],
            dataset_loading: true,
            ..AppViewModel::default()
        };
        let lines = render(&view);
        assert!(lines.contains(&"Upload error: bad file".to_string()));
        assert!(lines.contains(&"Students error: server down".to_string()));
        assert!(!lines.iter().any(|line| line.starts_with("Loading")));
    }

    #[test]
    fn table_columns_are_aligned() {
        let table = render_table(&[row("A1", "Ada"), row("B22", "Chimamanda")]);
        assert_eq!(table.len(), 4);
        assert!(table[0].starts_with("Reg No | First Name | Last Name"));
        assert!(table[2].starts_with("A1     | Ada        | Okafor"));
        assert!(table[3].starts_with("B22    | Chimamanda | Okafor"));
    }
}
