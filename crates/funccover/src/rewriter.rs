//! Byte-preserving splicing (SourceRewriter)
//!
//! Copies the original bytes in one forward pass and splices a tracking
//! statement at every planned offset, plus the exit guard inside the entry
//! point. Nothing of the original is removed or reordered, and spliced text
//! never contains a newline, so every original line keeps its number.

use crate::{InsertionPlan, InstrumentError, Result};

/// Name of the local binding that keeps the exit guard alive
pub const EXIT_GUARD_BINDING: &str = "_funccover_exit_guard";

/// Output of [`rewrite`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    /// Instrumented bytes, without the declaration block
    pub bytes: Vec<u8>,
    /// Whether the exit guard was spliced into an entry point
    pub has_entry_point: bool,
}

/// Statement marking flag `index` of `table_var` as executed
#[must_use]
pub fn tracking_statement(table_var: &str, index: usize) -> String {
    format!(" {table_var}.hit({index});")
}

/// Statement arming `exit_hook_var` for the rest of the entry point
#[must_use]
pub fn exit_guard_statement(exit_hook_var: &str) -> String {
    format!(" let {EXIT_GUARD_BINDING} = {exit_hook_var}.guard();")
}

/// Splice tracking statements into `content` according to `plan`
pub fn rewrite(
    content: &[u8],
    plan: &InsertionPlan,
    table_var: &str,
    exit_hook_var: &str,
) -> Result<Rewritten> {
    check_plan(content.len(), plan)?;

    let guard = exit_guard_statement(exit_hook_var);
    let mut bytes = Vec::with_capacity(
        content.len() + plan.events.len() * (table_var.len() + 16) + guard.len(),
    );

    let mut cursor = 0;
    for (index, &offset) in plan.events.iter().enumerate() {
        bytes.extend_from_slice(&content[cursor..offset]);
        bytes.extend_from_slice(tracking_statement(table_var, index).as_bytes());
        if plan.entry_point == Some(offset) {
            bytes.extend_from_slice(guard.as_bytes());
        }
        cursor = offset;
    }
    bytes.extend_from_slice(&content[cursor..]);

    Ok(Rewritten {
        bytes,
        has_entry_point: plan.has_entry_point(),
    })
}

fn check_plan(len: usize, plan: &InsertionPlan) -> Result<()> {
    if let Some(pair) = plan.events.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(InstrumentError::internal(format!(
            "splice offsets out of order: {} then {}",
            pair[0], pair[1]
        )));
    }
    if let Some(&last) = plan.events.last() {
        if last > len {
            return Err(InstrumentError::internal(format!(
                "splice offset {last} beyond end of source ({len} bytes)"
            )));
        }
    }
    if let Some(entry) = plan.entry_point {
        if !plan.events.contains(&entry) {
            return Err(InstrumentError::internal(format!(
                "entry point offset {entry} is not a function body"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plan(events: Vec<usize>, entry_point: Option<usize>) -> InsertionPlan {
        InsertionPlan {
            events,
            entry_point,
        }
    }

    fn rewrite_str(src: &str, plan: &InsertionPlan) -> String {
        let out = rewrite(src.as_bytes(), plan, "Cov", "HOOK").unwrap();
        String::from_utf8(out.bytes).unwrap()
    }

    #[test]
    fn test_empty_plan_copies_input() {
        let src = "fn a() {}\n";
        assert_eq!(rewrite_str(src, &plan(vec![], None)), src);
    }

    #[test]
    fn test_statements_are_spliced_after_delimiters() {
        let src = "fn a() {}\nfn b() {\n}\n";
        let out = rewrite_str(src, &plan(vec![8, 18], None));
        assert_eq!(out, "fn a() { Cov.hit(0);}\nfn b() { Cov.hit(1);\n}\n");
    }

    #[test]
    fn test_exit_guard_follows_tracking_statement() {
        let src = "fn main() {\n}\n";
        let out = rewrite(src.as_bytes(), &plan(vec![11], Some(11)), "Cov", "HOOK").unwrap();
        assert!(out.has_entry_point);
        assert_eq!(
            String::from_utf8(out.bytes).unwrap(),
            "fn main() { Cov.hit(0); let _funccover_exit_guard = HOOK.guard();\n}\n"
        );
    }

    #[test]
    fn test_line_count_is_preserved() {
        let src = "fn a() {\n}\n\nfn main() {\n    a();\n}\n";
        let out = rewrite_str(src, &plan(vec![8, 23], Some(23)));
        assert_eq!(out.lines().count(), src.lines().count());
    }

    #[test]
    fn test_splice_at_end_of_content() {
        let out = rewrite_str("{", &plan(vec![1], None));
        assert_eq!(out, "{ Cov.hit(0);");
    }

    #[test]
    fn test_unordered_events_are_rejected() {
        let err = rewrite(b"{{", &plan(vec![2, 1], None), "Cov", "HOOK").unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_duplicate_events_are_rejected() {
        let err = rewrite(b"{{", &plan(vec![1, 1], None), "Cov", "HOOK").unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_out_of_range_event_is_rejected() {
        let err = rewrite(b"{}", &plan(vec![3], None), "Cov", "HOOK").unwrap_err();
        assert!(err.to_string().contains("beyond end"));
    }

    #[test]
    fn test_entry_point_must_be_an_event() {
        let err = rewrite(b"{}", &plan(vec![1], Some(2)), "Cov", "HOOK").unwrap_err();
        assert!(err.is_internal());
    }
}
