//! Diff rendering for failed value observations.

/// Render a line diff between expected and actual output.
#[must_use]
pub fn render_diff(expected: &str, actual: &str) -> String {
    if expected == actual {
        return String::from("[identical]");
    }

    let expected_lines: Vec<&str> = expected.lines().collect();
    let actual_lines: Vec<&str> = actual.lines().collect();
    let rows = expected_lines.len().max(actual_lines.len());

    let mut out = String::new();
    out.push_str("--- expected\n");
    out.push_str("+++ actual\n");
    for i in 0..rows {
        let e = expected_lines.get(i).copied();
        let a = actual_lines.get(i).copied();
        if e == a {
            continue;
        }
        out.push_str(&format!("@@ line {} @@\n", i + 1));
        if let Some(e) = e {
            out.push_str(&format!("-{e}\n"));
            if let Some(a) = a
                && let Some(col) = first_difference(e, a)
            {
                out.push_str(&format!("  first difference at column {}\n", col + 1));
            }
        }
        if let Some(a) = a {
            out.push_str(&format!("+{a}\n"));
        }
    }
    out
}

fn first_difference(a: &str, b: &str) -> Option<usize> {
    let mismatch = a.chars().zip(b.chars()).position(|(x, y)| x != y);
    let (len_a, len_b) = (a.chars().count(), b.chars().count());
    mismatch.or_else(|| (len_a != len_b).then_some(len_a.min(len_b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs() {
        assert_eq!(render_diff("0101", "0101"), "[identical]");
    }

    #[test]
    fn single_line_reports_column() {
        let diff = render_diff("01011", "01111");
        assert!(diff.contains("@@ line 1 @@"));
        assert!(diff.contains("-01011"));
        assert!(diff.contains("+01111"));
        assert!(diff.contains("first difference at column 3"));
    }

    #[test]
    fn extra_actual_lines_are_shown() {
        let diff = render_diff("a", "a\nb");
        assert!(diff.contains("@@ line 2 @@\n+b\n"));
    }

    #[test]
    fn prefix_mismatch_points_past_shorter_side() {
        assert_eq!(first_difference("abc", "ab"), Some(2));
    }
}
