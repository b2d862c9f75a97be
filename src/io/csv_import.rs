use std::path::Path;

use log::warn;

use crate::model::todo::parse_due_date;
use crate::model::{Priority, Todo};

/// Parse a "completed" cell.
fn parse_completed(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "yes" | "y" | "true" | "1" | "x" | "done" | "finished" | "complete" | "completed"
    )
}

/// Try the due date formats we export plus a few common day-first ones.
fn parse_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    if let Some(dt) = parse_due_date(s) {
        return Some(dt);
    }
    let s = s.trim();
    for fmt in &["%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"] {
        if let Ok(d) = chrono::NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

/// Normalize a header string to a canonical column key.
fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace([' ', '-', '_'], "")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Title,
    Description,
    Due,
    Priority,
    Completed,
}

fn header_to_col(normalized: &str) -> Option<Column> {
    match normalized {
        "title" | "name" | "task" | "taskname" | "todo" | "label" => Some(Column::Title),
        "description" | "notes" | "note" | "details" | "comment" | "comments" => {
            Some(Column::Description)
        }
        "due" | "duedate" | "deadline" | "date" => Some(Column::Due),
        "priority" | "pri" | "importance" => Some(Column::Priority),
        "completed" | "done" | "status" | "complete" => Some(Column::Completed),
        _ => None,
    }
}

/// Import todos from a CSV file. See [`import_csv_str`].
pub fn import_csv(path: &Path) -> Result<(Vec<Todo>, usize), String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}", e))?;
    import_csv_str(&content)
}

/// Import todos from CSV text.
///
/// Auto-detects the delimiter (semicolon, comma, tab) and matches headers
/// loosely. A title column is required; rows with an empty title are skipped,
/// unreadable due dates fall back to now.
/// Returns `(todos, skipped_count)` on success.
pub fn import_csv_str(content: &str) -> Result<(Vec<Todo>, usize), String> {
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| format!("Failed to read CSV headers: {}", e))?
        .clone();

    let col_map: Vec<Option<Column>> = headers
        .iter()
        .map(|h| header_to_col(&normalize_header(h)))
        .collect();

    if !col_map.contains(&Some(Column::Title)) {
        let found: Vec<&str> = headers.iter().collect();
        return Err(format!(
            "CSV is missing a title column. Found headers: {:?}.",
            found
        ));
    }

    let mut todos = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("event=csv_import module=io status=skip row={} error={}", i + 2, e);
                skipped += 1;
                continue;
            }
        };

        let mut title = "";
        let mut description = "";
        let mut due = None;
        let mut priority = None;
        let mut completed = false;

        for (field, col) in record.iter().zip(col_map.iter()) {
            match col {
                Some(Column::Title) => title = field,
                Some(Column::Description) => description = field,
                Some(Column::Due) if !field.is_empty() => {
                    due = parse_date(field);
                    if due.is_none() {
                        warn!(
                            "event=csv_import module=io status=bad_date row={} value={}",
                            i + 2,
                            field
                        );
                    }
                }
                Some(Column::Priority) => priority = Priority::parse(field),
                Some(Column::Completed) => completed = parse_completed(field),
                _ => {}
            }
        }

        if title.is_empty() {
            skipped += 1;
            continue;
        }

        let mut todo = Todo::new(title, description, due, priority);
        todo.completed = completed;
        todos.push(todo);
    }

    if todos.is_empty() && skipped > 0 {
        return Err(format!(
            "No valid todos found in CSV ({} rows skipped)",
            skipped
        ));
    }
    if todos.is_empty() {
        return Err("CSV file is empty or has no data rows".to_string());
    }

    Ok((todos, skipped))
}
