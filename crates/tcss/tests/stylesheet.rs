//! Integration tests for the stylesheet object model.

use std::rc::Rc;

use tcss::TcssError;
use tcss::parser::{SheetFlags, StyleSheet, parse_stylesheet};

fn names(sheet: &StyleSheet) -> Vec<Option<&str>> {
    sheet.rules().iter().map(|rule| rule.name()).collect()
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

#[test]
fn test_constructed_sheet_defaults() {
    let sheet = StyleSheet::new();
    assert!(sheet.is_empty());
    assert!(sheet.is_constructed());
    assert!(sheet.is_origin_clean());
    assert!(!sheet.disallows_modification());
    assert!(!sheet.is_disabled());
    assert_eq!(sheet.flags(), SheetFlags::ORIGIN_CLEAN | SheetFlags::CONSTRUCTED);
    assert_eq!(sheet.mime_type(), "text/css");
    assert_eq!(sheet.href(), None);
}

#[test]
fn test_builder_metadata() {
    let sheet = StyleSheet::new()
        .with_base_url("file:///app/")
        .with_location("file:///app/app.tcss")
        .with_title("");
    assert_eq!(sheet.base_url(), Some("file:///app/"));
    assert_eq!(sheet.href(), Some("file:///app/app.tcss"));
    assert_eq!(sheet.title(), None);
    assert_eq!(sheet.with_title("dark").title(), Some("dark"));
}

#[test]
fn test_parent_is_not_owned() {
    let parent = Rc::new(parse_stylesheet("@import url(child.tcss);", None));
    let child = StyleSheet::new().with_parent(&parent);
    assert_eq!(child.parent().map(|p| p.len()), Some(1));

    drop(parent);
    assert!(child.parent().is_none());
}

#[test]
fn test_display_one_rule_per_line() {
    let sheet = parse_stylesheet(
        "@import \"base.tcss\";\n\nScreen { layout: vertical; }",
        None,
    );
    insta::assert_snapshot!(sheet.to_string().trim_end(), @r#"
    @import "base.tcss";
    Screen { layout: vertical; }
    "#);
}

// ============================================================================
// INSERT
// ============================================================================

#[test]
fn test_insert_returns_index() {
    let mut sheet = StyleSheet::new();
    assert_eq!(sheet.insert_rule("Label { color: red; }", 0).unwrap(), 0);
    assert_eq!(sheet.insert_rule("Button {}", 1).unwrap(), 1);
    assert_eq!(sheet.insert_rule("Screen {}", 0).unwrap(), 0);
    assert_eq!(sheet.rules()[0].to_string(), "Screen {}");
    assert_eq!(sheet.len(), 3);
}

#[test]
fn test_insert_index_out_of_range() {
    let mut sheet = StyleSheet::new();
    let result = sheet.insert_rule("Label {}", 5);
    assert!(matches!(result, Err(TcssError::IndexSize { index: 5, len: 0 })));
}

#[test]
fn test_insert_invalid_rule() {
    let mut sheet = StyleSheet::new();
    assert!(matches!(
        sheet.insert_rule("Label", 0),
        Err(TcssError::InvalidSyntax(_))
    ));
    assert!(matches!(
        sheet.insert_rule("A {} B {}", 0),
        Err(TcssError::InvalidSyntax(_))
    ));
    assert!(sheet.is_empty());
}

#[test]
fn test_insert_import_into_constructed_sheet() {
    let mut sheet = StyleSheet::new();
    let result = sheet.insert_rule("@import url(base.tcss);", 0);
    assert!(matches!(result, Err(TcssError::InvalidSyntax(_))));
}

#[test]
fn test_insert_import_into_parsed_sheet() {
    let mut sheet = parse_stylesheet("Label {}", None);
    sheet.insert_rule("@import url(base.tcss);", 0).unwrap();
    assert_eq!(names(&sheet), vec![Some("import"), None]);
}

#[test]
fn test_namespace_ordering() {
    let mut sheet = parse_stylesheet("@import url(a.tcss);", None);
    sheet.insert_rule("@namespace svg url(x);", 1).unwrap();
    sheet.insert_rule("Label {}", 2).unwrap();

    let result = sheet.insert_rule("@namespace html url(y);", 2);
    assert!(matches!(result, Err(TcssError::InvalidState(_))));
    assert_eq!(sheet.len(), 3);
}

#[test]
fn test_namespace_into_empty_sheet() {
    let mut sheet = StyleSheet::new();
    assert_eq!(sheet.insert_rule("@namespace svg url(x);", 0).unwrap(), 0);
    assert_eq!(sheet.insert_rule("@namespace html url(y);", 1).unwrap(), 1);
    assert_eq!(names(&sheet), vec![Some("namespace"), Some("namespace")]);
}

#[test]
fn test_style_rule_before_namespace_is_not_checked() {
    let mut sheet = StyleSheet::new();
    sheet.insert_rule("@namespace svg url(x);", 0).unwrap();
    sheet.insert_rule("Label {}", 0).unwrap();
    assert_eq!(names(&sheet), vec![None, Some("namespace")]);
}

#[test]
fn test_namespace_name_is_case_insensitive() {
    let mut sheet = parse_stylesheet("Label {}", None);
    let result = sheet.insert_rule("@NAMESPACE svg url(x);", 0);
    assert!(matches!(result, Err(TcssError::InvalidState(_))));
}

#[test]
fn test_insert_rejected_when_origin_dirty() {
    let mut sheet = StyleSheet::new();
    sheet.set_origin_clean(false);
    assert!(matches!(
        sheet.insert_rule("Label {}", 0),
        Err(TcssError::Security)
    ));
}

#[test]
fn test_insert_rejected_when_modification_disallowed() {
    let mut sheet = StyleSheet::new().with_disallow_modification(true);
    assert!(matches!(
        sheet.insert_rule("Label {}", 0),
        Err(TcssError::NotAllowed(_))
    ));

    sheet.set_disallow_modification(false);
    assert!(sheet.insert_rule("Label {}", 0).is_ok());
}

// ============================================================================
// DELETE
// ============================================================================

#[test]
fn test_delete_rule() {
    let mut sheet = parse_stylesheet("A {} B {} C {}", None);
    sheet.delete_rule(1).unwrap();
    let rendered: Vec<String> = sheet.rules().iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["A {}", "C {}"]);
}

#[test]
fn test_delete_index_out_of_range() {
    let mut sheet = StyleSheet::new();
    assert!(matches!(
        sheet.delete_rule(0),
        Err(TcssError::IndexSize { index: 0, len: 0 })
    ));
}

#[test]
fn test_delete_namespace() {
    let mut sheet = parse_stylesheet("@namespace svg url(x); Label {}", None);
    assert!(matches!(
        sheet.delete_rule(0),
        Err(TcssError::InvalidState(_))
    ));

    sheet.delete_rule(1).unwrap();
    sheet.delete_rule(0).unwrap();
    assert!(sheet.is_empty());
}

#[test]
fn test_delete_rejected_when_origin_dirty() {
    let mut sheet = parse_stylesheet("Label {}", None);
    sheet.set_origin_clean(false);
    assert!(matches!(sheet.delete_rule(0), Err(TcssError::Security)));
    assert_eq!(sheet.len(), 1);
}

// ============================================================================
// REPLACE
// ============================================================================

#[test]
fn test_replace_keeps_only_imports() {
    let mut sheet = StyleSheet::new();
    sheet.insert_rule("Screen {}", 0).unwrap();
    sheet
        .replace("@import url(a.tcss); Label {} @media x {} @import url(b.tcss);")
        .unwrap();
    assert_eq!(names(&sheet), vec![Some("import"), Some("import")]);
}

#[test]
fn test_replace_requires_constructed_sheet() {
    let mut sheet = parse_stylesheet("Label {}", None);
    assert!(matches!(
        sheet.replace("Button {}"),
        Err(TcssError::NotAllowed(_))
    ));
    assert_eq!(sheet.len(), 1);
}

#[test]
fn test_replace_rejected_when_modification_disallowed() {
    let mut sheet = StyleSheet::new().with_disallow_modification(true);
    assert!(matches!(
        sheet.replace("@import url(a.tcss);"),
        Err(TcssError::NotAllowed(_))
    ));
}
