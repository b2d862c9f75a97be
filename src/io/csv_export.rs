use crate::model::Todo;
use std::path::Path;

/// Format used for the due date column.
pub const CSV_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Export todos to a semicolon-delimited CSV file matching the import format.
///
/// Columns: Title ; Description ; Due Date ; Priority ; Completed
/// Returns the number of todos written.
pub fn export_csv(todos: &[Todo], path: &Path) -> Result<usize, String> {
    let wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_path(path)
        .map_err(|e| format!("Failed to create CSV file: {}", e))?;
    write_todos(wtr, todos)
}

fn write_todos<W: std::io::Write>(mut wtr: csv::Writer<W>, todos: &[Todo]) -> Result<usize, String> {
    wtr.write_record(["Title", "Description", "Due Date", "Priority", "Completed"])
        .map_err(|e| format!("Failed to write header: {}", e))?;

    for todo in todos {
        let due = todo.due_date().format(CSV_DATE_FORMAT).to_string();
        wtr.write_record([
            todo.title(),
            todo.description(),
            due.as_str(),
            todo.priority().label(),
            if todo.completed { "yes" } else { "no" },
        ])
        .map_err(|e| format!("Failed to write todo '{}': {}", todo.title(), e))?;
    }

    wtr.flush().map_err(|e| format!("Failed to flush CSV: {}", e))?;
    Ok(todos.len())
}
