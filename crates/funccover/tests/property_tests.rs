//! Property-based tests for the instrumentation pipeline.
//!
//! Sources are assembled from a small grammar of items so that every case
//! parses; the properties then check that instrumentation only ever adds.

#![allow(clippy::unwrap_used)]

use funccover::{
    emit_declaration, exit_guard_statement, instrument, plan, scan, tracking_statement,
    InstrumentConfig,
};
use proptest::prelude::*;

const VAR: &str = "FuncCoverProp";
const HOOK: &str = "FUNC_COVER_EXIT_HOOK";

/// One top-level item, possibly spanning several lines
fn item() -> impl Strategy<Value = String> {
    let name = "[a-z][a-z0-9]{0,6}".prop_map(|s| format!("f_{s}"));
    prop_oneof![
        name.clone().prop_map(|n| format!("fn {n}() {{}}")),
        name.clone()
            .prop_map(|n| format!("pub fn {n}(x: u32) -> u32 {{\n    x + 1\n}}")),
        name.clone()
            .prop_map(|n| format!("const fn {n}() -> u8 {{\n    7\n}}")),
        name.clone().prop_map(|n| format!(
            "fn {n}() {{\n    #![allow(unused)]\n    let _é = \"{{ }}\";\n}}"
        )),
        name.clone().prop_map(|n| format!(
            "struct S_{n};\n\nimpl S_{n} {{\n    fn get(&self) -> u8 {{ 1 }}\n    fn set(&mut self) {{}}\n}}"
        )),
        name.clone().prop_map(|n| format!(
            "trait T_{n} {{\n    fn required(&self);\n    fn provided(&self) {{}}\n}}"
        )),
        name.prop_map(|n| format!("mod m_{n} {{\n    fn hidden() {{}}\n}}")),
        Just("// just a comment".to_string()),
        Just("fn main() {\n    println!(\"hi\");\n}".to_string()),
    ]
}

fn source() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(item(), 0..8),
        prop::bool::ANY,
        "\n{0,2}",
    )
        .prop_map(|(items, doc, trailer)| {
            let header = if doc { "//! Generated\n\n" } else { "" };
            format!("{header}{}{trailer}", items.join("\n\n"))
        })
}

proptest! {
    /// Removing every spliced statement and the appended block yields the input.
    #[test]
    fn prop_instrumentation_only_inserts(src in source()) {
        let out = String::from_utf8(instrument("prop.rs", src.as_bytes(), VAR).unwrap()).unwrap();

        let records = scan(src.as_bytes()).unwrap();
        let has_entry_point = plan(&records).has_entry_point();
        let block = emit_declaration(
            VAR,
            "prop.rs",
            has_entry_point,
            &records,
            &InstrumentConfig::default(),
        )
        .unwrap();
        prop_assert!(out.ends_with(&block));

        let mut body = out[..out.len() - block.len()].to_string();
        body = body.replace(&exit_guard_statement(HOOK), "");
        for index in 0..records.len() {
            body = body.replacen(&tracking_statement(VAR, index), "", 1);
        }
        prop_assert_eq!(body, src);
    }

    /// Instrumented output is still valid Rust.
    #[test]
    fn prop_output_reparses(src in source()) {
        let out = String::from_utf8(instrument("prop.rs", src.as_bytes(), VAR).unwrap()).unwrap();
        prop_assert!(syn::parse_file(&out).is_ok(), "output does not parse:\n{}", out);
    }

    /// One tracking statement per record, in index order.
    #[test]
    fn prop_one_statement_per_function(src in source()) {
        let out = String::from_utf8(instrument("prop.rs", src.as_bytes(), VAR).unwrap()).unwrap();
        let records = scan(src.as_bytes()).unwrap();

        prop_assert_eq!(out.matches(&format!("{VAR}.hit(")).count(), records.len());
        let mut last = 0;
        for index in 0..records.len() {
            let at = out.find(&tracking_statement(VAR, index));
            prop_assert!(at.is_some());
            let at = at.unwrap_or_default();
            prop_assert!(at >= last);
            last = at;
        }
    }

    /// Recorded lines point at the `fn` keyword of the original source.
    #[test]
    fn prop_lines_point_at_fn_keyword(src in source()) {
        let records = scan(src.as_bytes()).unwrap();
        let lines: Vec<&str> = src.lines().collect();
        for record in &records {
            let line = lines[record.line as usize - 1];
            prop_assert!(line.contains("fn "), "line {} is {:?}", record.line, line);
        }
    }

    /// Entry point wiring is present iff a top-level main exists.
    #[test]
    fn prop_entry_point_iff_main(src in source()) {
        let out = String::from_utf8(instrument("prop.rs", src.as_bytes(), VAR).unwrap()).unwrap();
        let has_main = src.contains("\nfn main() {") || src.starts_with("fn main() {");
        prop_assert_eq!(out.contains(&exit_guard_statement(HOOK)), has_main);
        prop_assert_eq!(out.contains("pub static FUNC_COVER_EXIT_HOOK"), has_main);
    }
}
