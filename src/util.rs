//! Text summaries of datasets.

use crate::data::{Dataset, Variable};

/// Group the digits of a count in threes.
pub fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let head = match digits.len() % 3 {
        0 => 3.min(digits.len()),
        r => r,
    };
    let mut groups = vec![&digits[..head]];
    groups.extend((head..digits.len()).step_by(3).map(|i| &digits[i..i + 3]));
    groups.join(",")
}

/// Format a data value for a summary line.
///
/// Integral values print without a fraction, so cell labels stay exact.
pub fn format_stat_value(val: f64) -> String {
    if !val.is_finite() {
        format!("{}", val)
    } else if val.fract() == 0.0 && val.abs() < 1e15 {
        format!("{}", val as i64)
    } else if (1e-3..1e6).contains(&val.abs()) {
        format!("{:.4}", val)
    } else {
        format!("{:.3e}", val)
    }
}

/// One-line description of a variable.
pub fn describe_variable(name: &str, var: &Variable) -> String {
    let dims = var
        .dims
        .iter()
        .zip(var.shape())
        .map(|(d, n)| format!("{}: {}", d, n))
        .collect::<Vec<_>>()
        .join(", ");
    let range = match var.min_max() {
        Some((min, max)) => format!("[{}, {}]", format_stat_value(min), format_stat_value(max)),
        None => "[all missing]".to_string(),
    };
    format!(
        "{} ({}) missing {} of {} {}",
        name,
        dims,
        format_number(var.missing_count()),
        format_number(var.data.len()),
        range
    )
}

/// Tree-style summary of every variable in a dataset.
pub fn format_dataset(ds: &Dataset, title: &str) -> String {
    let mut text = format!("{}\n", title);
    text.push_str(&"=".repeat(title.len().max(20)));
    text.push('\n');

    let count = ds.len();
    for (i, (name, var)) in ds.variables().enumerate() {
        let connector = if i + 1 == count { "└── " } else { "├── " };
        text.push_str(connector);
        text.push_str(&describe_variable(name, var));
        text.push('\n');
    }
    text
}
