use std::error::Error;
use std::io::Write;

use serde::Serialize;

use super::model::TaskStatus;
use super::queries::TaskQueries;

/// Rows shown per list in the demo output.
const PREVIEW_ROWS: usize = 5;

/// Run a handful of catalog queries and print their results, one line each.
///
/// Any failing query aborts the demo with its error.
///
/// # Errors
/// Returns the first query, serialization, or write error.
pub async fn run_demo<W: Write>(queries: &TaskQueries, out: &mut W) -> Result<(), Box<dyn Error>> {
    let counts = queries.task_count_by_status().await?;
    print_line(out, "q10 counts", &counts)?;

    let new_tasks = queries
        .tasks_by_status_name(TaskStatus::New.as_str())
        .await?;
    print_line(out, "q2 'new'", preview(&new_tasks))?;

    let inserted = queries
        .insert_task_for_user(
            1,
            "Write report",
            Some("Draft v1"),
            TaskStatus::InProgress.as_str(),
        )
        .await?;
    print_line(out, "insert", &inserted)?;

    let gmail = queries.tasks_by_user_email_domain("%@gmail.com").await?;
    print_line(out, "domain '@gmail.com'", preview(&gmail))?;

    Ok(())
}

fn preview<T>(rows: &[T]) -> &[T] {
    &rows[..rows.len().min(PREVIEW_ROWS)]
}

fn print_line<W: Write, T: Serialize + ?Sized>(
    out: &mut W,
    label: &str,
    value: &T,
) -> Result<(), Box<dyn Error>> {
    writeln!(out, "{label}: {}", serde_json::to_string(value)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_caps_at_five_rows() {
        let rows: Vec<i32> = (1..=8).collect();
        assert_eq!(preview(&rows), &[1, 2, 3, 4, 5]);
        assert_eq!(preview(&rows[..2]), &[1, 2]);
    }

    #[test]
    fn lines_are_labelled_json() {
        let mut out = Vec::new();
        print_line(&mut out, "insert", &42).unwrap();
        print_line(&mut out, "q2 'new'", &[1, 2][..]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "insert: 42\nq2 'new': [1,2]\n");
    }
}
