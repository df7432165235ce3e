/// Integration tests for interface scanning and lens building
mod common;

use common::fixtures::{STORE_INTERFACE, WORKSPACE};
use common::mock::MockDocuments;
use impls_lens::app::service::LensService;
use impls_lens::config::LensConfig;
use impls_lens::domain::anchor::Range;
use impls_lens::domain::scanner::InterfaceScanner;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn generated_interface(n: usize) -> (String, Vec<String>) {
    let names: Vec<String> = (0..n).map(|i| format!("Method{i}")).collect();
    let mut text = String::from("package gen\n\ntype Generated interface {\n");
    for (i, name) in names.iter().enumerate() {
        text.push_str(&format!("    {name}(a{i} int) error\n"));
    }
    text.push_str("}\n");
    (text, names)
}

#[test]
fn test_n_simple_methods_give_n_anchors() {
    for n in [0, 1, 5, 40] {
        let (text, names) = generated_interface(n);
        let anchors = InterfaceScanner::new().scan(&text);
        assert_eq!(anchors.len(), n);

        let lines: Vec<&str> = text.lines().collect();
        for (i, (anchor, name)) in anchors.iter().zip(&names).enumerate() {
            assert_eq!(&anchor.name, name);
            assert_eq!(anchor.range.start.line as usize, 3 + i);
            let line = lines[anchor.range.start.line as usize];
            let span =
                &line[anchor.range.start.character as usize..anchor.range.end.character as usize];
            assert_eq!(span, name);
        }
    }
}

#[test]
fn test_store_fixture() {
    let anchors = InterfaceScanner::new().scan(STORE_INTERFACE);
    let found: Vec<(&str, Range)> = anchors.iter().map(|a| (a.name.as_str(), a.range)).collect();
    assert_eq!(
        found,
        vec![
            ("Get", Range::on_line(5, 1, 4)),
            ("List", Range::on_line(6, 1, 5)),
            ("Delete", Range::on_line(12, 1, 7)),
        ]
    );
}

#[test]
fn test_malformed_inputs_never_panic() {
    let inputs = [
        "type",
        "type X interface {",
        "type X interface {\n\n\n",
        "}}}}\n{{{{",
        "type X interface {\n\t(\n\t)\n}",
        "type X interface {\n\tA(\n\tB(\n\tC(",
        "type X interface {\n\t日本語(x int)\n}",
        "\u{feff}type X interface {\n\tA()\n}",
        "type X interface {\n\t\"}\"\n\tA()\n}",
    ];
    for input in inputs {
        let _ = InterfaceScanner::new().scan(input);
    }
}

#[test]
fn test_unicode_method_name_columns() {
    let anchors = InterfaceScanner::new().scan("type X interface {\n\tÜber(x int)\n}");
    assert_eq!(anchors.len(), 1);
    assert_eq!(anchors[0].name, "Über");
    assert_eq!(anchors[0].range, Range::on_line(1, 1, 5));
}

#[test]
fn test_service_lenses_for_fixture() {
    let service = LensService::new(
        PathBuf::from(WORKSPACE),
        LensConfig::default(),
        Arc::new(MockDocuments::new()),
    );
    let res = service.lenses_for_text(Path::new("/work/shop/store/store.go"), STORE_INTERFACE);
    let methods: Vec<&str> = res
        .lenses
        .iter()
        .map(|l| l.arguments.method_name.as_str())
        .collect();
    assert_eq!(methods, vec!["Get", "List", "Delete"]);
    assert!(res.lenses.iter().all(|l| l.command == "impls-lens.showImplementations"));
    assert_eq!(res.lenses[1].range.start_line_1based, 7);
}

#[test]
fn test_commented_wrapped_signatures_keep_later_methods() {
    let text = "package repo

type Repo interface {
\tFind( // by primary key
\t\tctx context.Context,
\t\t// id is the row key
\t\tid string,
\t) (*Row, error)
\tSave(
\t\tctx context.Context, // request scope
\t\trow *Row,
\t) error
\tCount() int
}
";
    let anchors = InterfaceScanner::new().scan(text);
    let found: Vec<(&str, u32)> = anchors
        .iter()
        .map(|a| (a.name.as_str(), a.range.start.line))
        .collect();
    assert_eq!(found, vec![("Find", 3), ("Save", 8), ("Count", 12)]);
}
