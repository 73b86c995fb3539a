//! Integration tests for declarations, style blocks and declaration lists.

use tcss::Diagnostic;
use tcss::lexer::Lexer;
use tcss::parser::{
    Component, Parser, Rule, StyleItem, parse_declaration, parse_declaration_list,
    parse_style_block,
};
use tcss::token::Token;

fn ident(name: &str) -> Component {
    Component::Preserved(Token::Ident(name.into()))
}

fn declaration_names(items: &[StyleItem]) -> Vec<&str> {
    items
        .iter()
        .filter_map(|item| match item {
            StyleItem::Declaration(declaration) => Some(declaration.name.as_str()),
            StyleItem::Rule(_) => None,
        })
        .collect()
}

// ============================================================================
// SINGLE DECLARATIONS
// ============================================================================

#[test]
fn test_declaration_important() {
    let declaration = parse_declaration("color: red !important").unwrap();
    assert_eq!(declaration.name, "color");
    assert_eq!(declaration.value, vec![ident("red")]);
    assert!(declaration.important);
}

#[test]
fn test_declaration_important_is_case_insensitive() {
    let declaration = parse_declaration("color: red ! IMPORTANT").unwrap();
    assert!(!declaration.important);

    let declaration = parse_declaration("color: red !IMPORTANT").unwrap();
    assert!(declaration.important);
    assert_eq!(declaration.value, vec![ident("red")]);
}

#[test]
fn test_declaration_whitespace_around_colon() {
    let declaration = parse_declaration("  width :  1fr  ").unwrap();
    assert_eq!(declaration.name, "width");
    assert_eq!(declaration.value.len(), 1);
    assert!(!declaration.important);
}

#[test]
fn test_declaration_with_functions() {
    let declaration = parse_declaration("background: rgb(1, 2, 3) url(x.png)").unwrap();
    assert_eq!(declaration.value.len(), 3);
    assert!(matches!(declaration.value[0], Component::Function(_)));
    assert_eq!(
        declaration.value[2],
        Component::Preserved(Token::Url("x.png".into()))
    );
}

#[test]
fn test_declaration_custom_property() {
    let declaration = parse_declaration("--accent: $primary").unwrap();
    assert_eq!(declaration.name, "--accent");
    assert_eq!(declaration.value[0], Component::Preserved(Token::Delim('$')));
}

#[test]
fn test_declaration_missing_colon() {
    assert!(parse_declaration("color red").is_err());
}

#[test]
fn test_declaration_must_start_with_ident() {
    assert!(parse_declaration("10px: red").is_err());
    assert!(parse_declaration("").is_err());
}

#[test]
fn test_declaration_display() {
    let declaration = parse_declaration("color:red  !important").unwrap();
    assert_eq!(declaration.to_string(), "color: red !important");
}

#[test]
fn test_declaration_from_tokens() {
    let tokens: Vec<Token> = Lexer::new("height: 3").collect();
    let declaration = parse_declaration(tokens.as_slice()).unwrap();
    assert_eq!(declaration.name, "height");
}

// ============================================================================
// STYLE BLOCKS
// ============================================================================

#[test]
fn test_style_block_declarations_before_rules() {
    let source = "color: red; &:hover { color: blue; } @media x { } width: 1";
    let items = parse_style_block(source);
    assert_eq!(items.len(), 4);
    assert_eq!(declaration_names(&items), vec!["color", "width"]);

    let StyleItem::Rule(Rule::Qualified(nested)) = &items[2] else {
        panic!("expected nested rule");
    };
    assert_eq!(nested.prelude[0], Component::Preserved(Token::Delim('&')));
    assert_eq!(nested.declarations()[0].value, vec![ident("blue")]);

    let StyleItem::Rule(rule) = &items[3] else {
        panic!("expected at-rule");
    };
    assert!(rule.is_at_rule("media"));
}

#[test]
fn test_style_block_skips_invalid_items() {
    let mut parser = Parser::new("color: red; 10px; width: 1");
    let items = parser.parse_style_block();
    assert_eq!(declaration_names(&items), vec!["color", "width"]);
    assert_eq!(parser.diagnostics(), &[Diagnostic::InvalidStyleBlock]);
}

#[test]
fn test_style_block_missing_colon() {
    let mut parser = Parser::new("color red; width: 1");
    let items = parser.parse_style_block();
    assert_eq!(declaration_names(&items), vec!["width"]);
    assert_eq!(
        parser.diagnostics(),
        &[Diagnostic::MissingColon("color".into())]
    );
}

#[test]
fn test_semicolon_inside_block_does_not_split() {
    let items = parse_style_block("grid: {a; b}; width: 1");
    assert_eq!(declaration_names(&items), vec!["grid", "width"]);
    let StyleItem::Declaration(grid) = &items[0] else {
        panic!("expected declaration");
    };
    assert!(matches!(grid.value[..], [Component::Block(_)]));
}

#[test]
fn test_rule_style_block() {
    let rule = tcss::parser::parse_rule("Label { color: red; &.big { width: 2; } }").unwrap();
    let Rule::Qualified(rule) = rule else {
        panic!("expected qualified rule");
    };
    let items = rule.style_block();
    assert_eq!(items.len(), 2);
    assert_eq!(rule.declarations().len(), 1);
}

// ============================================================================
// DECLARATION LISTS
// ============================================================================

#[test]
fn test_declaration_list_keeps_source_order() {
    let items = parse_declaration_list("@apply foo; color: red; @page { }");
    assert_eq!(items.len(), 3);
    assert!(matches!(&items[0], StyleItem::Rule(rule) if rule.is_at_rule("apply")));
    assert!(matches!(&items[1], StyleItem::Declaration(d) if d.name == "color"));
    assert!(matches!(&items[2], StyleItem::Rule(rule) if rule.is_at_rule("page")));
}

#[test]
fn test_declaration_list_rejects_nested_rules() {
    let mut parser = Parser::new("&:hover { color: blue }; width: 1");
    let items = parser.parse_declaration_list();
    assert_eq!(declaration_names(&items), vec!["width"]);
    assert_eq!(parser.diagnostics(), &[Diagnostic::InvalidDeclarationList]);
}

#[test]
fn test_block_declaration_list() {
    let rule = tcss::parser::parse_rule("@font-face { family: mono; size: 2 }").unwrap();
    let items = rule.block().unwrap().declaration_list();
    assert_eq!(declaration_names(&items), vec!["family", "size"]);
}
