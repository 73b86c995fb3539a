//! TCSS parsing: component values, declarations, rules and stylesheets.
//!
//! This module implements the CSS Syntax Level 3 parser entry points on top of
//! the [`Lexer`]. Every entry point accepts raw text, a token list or a list of
//! already-parsed component values (see [`ParserInput`]).
//!
//! - [`parse_stylesheet`]: a full stylesheet wrapped in a [`StyleSheet`]
//! - [`parse_rule_list`] / [`parse_rule`]: rules
//! - [`parse_style_block`] / [`parse_declaration_list`]: block contents
//! - [`parse_declaration`]: a single `name: value`
//! - [`parse_component_value`] / [`parse_component_values`] /
//!   [`parse_comma_separated`]: raw component values
//!
//! The free functions discard recoverable diagnostics (they are still logged at
//! `trace` level). Drive a [`Parser`] directly to inspect them.
//!
//! ## Submodules
//!
//! - [`component`]: the component, declaration and rule tree
//! - [`stylesheet`]: the mutable stylesheet object model
//!
//! ## Example
//!
//! ```rust
//! use tcss::parser::{parse_stylesheet, Rule};
//!
//! let sheet = parse_stylesheet("Button { color: red; }", None);
//! let Rule::Qualified(rule) = &sheet.rules()[0] else { panic!() };
//! let declarations = rule.declarations();
//! assert_eq!(declarations[0].name, "color");
//! ```

pub mod component;
pub mod stylesheet;

pub use crate::parser::component::{
    AtRule, Block, Component, Declaration, FunctionBlock, QualifiedRule, Rule, StyleItem,
};
pub use crate::parser::stylesheet::{SheetFlags, StyleSheet};

use crate::error::{Diagnostic, Result, TcssError};
use crate::lexer::Lexer;
use crate::token::{Bracket, Token};

/// Returned by [`Parser::peek`] once the input is exhausted.
static EOF: Component = Component::Preserved(Token::Eof);

/// The three input shapes a [`Parser`] accepts.
#[derive(Clone, Debug)]
pub enum ParserInput<'a> {
    Text(&'a str),
    Tokens(Vec<Token>),
    Components(Vec<Component>),
}

impl<'a> From<&'a str> for ParserInput<'a> {
    fn from(text: &'a str) -> Self {
        ParserInput::Text(text)
    }
}

impl<'a> From<&'a String> for ParserInput<'a> {
    fn from(text: &'a String) -> Self {
        ParserInput::Text(text)
    }
}

impl From<Vec<Token>> for ParserInput<'_> {
    fn from(tokens: Vec<Token>) -> Self {
        ParserInput::Tokens(tokens)
    }
}

impl From<&[Token]> for ParserInput<'_> {
    fn from(tokens: &[Token]) -> Self {
        ParserInput::Tokens(tokens.to_vec())
    }
}

impl From<Vec<Component>> for ParserInput<'_> {
    fn from(components: Vec<Component>) -> Self {
        ParserInput::Components(components)
    }
}

impl From<&[Component]> for ParserInput<'_> {
    fn from(components: &[Component]) -> Self {
        ParserInput::Components(components.to_vec())
    }
}

/// Parser limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParserConfig {
    /// Blocks and functions nested deeper than this are skipped and reported
    /// as [`Diagnostic::NestingTooDeep`].
    pub max_nesting_depth: usize,
}

impl ParserConfig {
    pub const DEFAULT_MAX_NESTING_DEPTH: usize = 128;

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: Self::DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

/// A single-use parser over one input.
///
/// Comment tokens are dropped when the input is normalized. Raw text is lexed
/// up front and the lexer's diagnostics become the parser's first diagnostics.
///
/// ```rust
/// use tcss::parser::Parser;
/// use tcss::Diagnostic;
///
/// let mut parser = Parser::new("a { b: (c");
/// let rules = parser.parse_rule_list();
/// assert_eq!(rules.len(), 1);
/// assert_eq!(
///     parser.diagnostics(),
///     &[Diagnostic::UnterminatedBlock, Diagnostic::UnterminatedBlock]
/// );
/// ```
#[derive(Debug)]
pub struct Parser {
    items: Vec<Component>,
    pos: usize,
    depth: usize,
    config: ParserConfig,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    pub fn new<'a>(input: impl Into<ParserInput<'a>>) -> Self {
        Self::with_config(input, ParserConfig::default())
    }

    pub fn with_config<'a>(input: impl Into<ParserInput<'a>>, config: ParserConfig) -> Self {
        let mut diagnostics = Vec::new();
        let items = match input.into() {
            ParserInput::Text(text) => {
                let mut lexer = Lexer::new(text);
                let tokens = lexer.process();
                diagnostics = lexer.take_diagnostics();
                Self::preserve(tokens)
            }
            ParserInput::Tokens(tokens) => Self::preserve(tokens),
            ParserInput::Components(components) => components,
        };
        Self {
            items,
            pos: 0,
            depth: 0,
            config,
            diagnostics,
        }
    }

    fn preserve(tokens: Vec<Token>) -> Vec<Component> {
        tokens
            .into_iter()
            .filter(|token| !matches!(token, Token::Comment(_)))
            .map(Component::Preserved)
            .collect()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        log::trace!("parser: {diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    /// The next unconsumed item, or an end-of-input token.
    pub fn peek(&self) -> &Component {
        self.items.get(self.pos).unwrap_or(&EOF)
    }

    fn peek_token(&self) -> Option<&Token> {
        self.peek().token()
    }

    fn at_end(&self) -> bool {
        self.peek_token().is_some_and(Token::is_eof)
    }

    fn at_end_or_semicolon(&self) -> bool {
        matches!(self.peek_token(), Some(Token::Eof | Token::Semicolon))
    }

    fn next_item(&mut self) -> Component {
        if self.at_end() {
            return EOF.clone();
        }
        let item = std::mem::replace(&mut self.items[self.pos], EOF.clone());
        self.pos += 1;
        item
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_whitespace() {
            self.pos += 1;
        }
    }

    /// Take a `{}` block sitting next in the queue, whether still a `{` token
    /// or an already-built block.
    fn take_curly_block(&mut self) -> Option<Block> {
        match self.peek() {
            Component::Preserved(Token::LCurly) => {
                self.pos += 1;
                Some(self.consume_simple_block(Bracket::Curly))
            }
            Component::Block(block) if block.bracket == Bracket::Curly => match self.next_item() {
                Component::Block(block) => Some(block),
                _ => None,
            },
            _ => None,
        }
    }

    // ========================================================================
    // Consume algorithms
    // ========================================================================

    /// Consume one component value. At end of input this returns the
    /// end-of-input token.
    pub fn consume_component_value(&mut self) -> Component {
        match self.next_item() {
            Component::Preserved(token) => {
                if let Some(bracket) = token.opening_bracket() {
                    Component::Block(self.consume_simple_block(bracket))
                } else if let Token::Function(name) = token {
                    Component::Function(self.consume_function(name))
                } else {
                    Component::Preserved(token)
                }
            }
            other => other,
        }
    }

    /// The opening bracket has already been consumed.
    fn consume_simple_block(&mut self, bracket: Bracket) -> Block {
        let mut block = Block::new(bracket);
        if self.depth >= self.config.max_nesting_depth {
            self.report(Diagnostic::NestingTooDeep(self.config.max_nesting_depth));
            self.skip_nested(bracket);
            return block;
        }

        self.depth += 1;
        loop {
            match self.peek_token() {
                Some(token) if token.closing_bracket() == Some(bracket) => {
                    self.pos += 1;
                    break;
                }
                Some(Token::Eof) => {
                    self.report(Diagnostic::UnterminatedBlock);
                    break;
                }
                _ => {
                    let value = self.consume_component_value();
                    block.value.push(value);
                }
            }
        }
        self.depth -= 1;
        block
    }

    /// The function token has already been consumed.
    fn consume_function(&mut self, name: String) -> FunctionBlock {
        let mut function = FunctionBlock::new(name);
        if self.depth >= self.config.max_nesting_depth {
            self.report(Diagnostic::NestingTooDeep(self.config.max_nesting_depth));
            self.skip_nested(Bracket::Paren);
            return function;
        }

        self.depth += 1;
        loop {
            match self.peek_token() {
                Some(Token::RParen) => {
                    self.pos += 1;
                    break;
                }
                Some(Token::Eof) => {
                    let name = function.name.clone();
                    self.report(Diagnostic::UnterminatedFunction(name));
                    break;
                }
                _ => {
                    let value = self.consume_component_value();
                    function.value.push(value);
                }
            }
        }
        self.depth -= 1;
        function
    }

    /// Discard everything up to the bracket closing `bracket`, tracking nested
    /// brackets on an explicit stack instead of recursing.
    fn skip_nested(&mut self, bracket: Bracket) {
        let mut open = vec![bracket];
        while let Some(&innermost) = open.last() {
            let Component::Preserved(token) = self.next_item() else {
                continue;
            };
            if token.is_eof() {
                self.report(Diagnostic::UnterminatedBlock);
                break;
            }
            if let Some(bracket) = token.opening_bracket() {
                open.push(bracket);
            } else if matches!(token, Token::Function(_)) {
                open.push(Bracket::Paren);
            } else if token.closing_bracket() == Some(innermost) {
                open.pop();
            }
        }
    }

    /// The next item must be an at-keyword.
    fn consume_at_rule(&mut self) -> AtRule {
        let name = match self.next_item() {
            Component::Preserved(Token::AtKeyword(name)) => name,
            _ => String::new(),
        };
        let mut rule = AtRule::new(name);

        loop {
            match self.peek_token() {
                Some(Token::Semicolon) => {
                    self.pos += 1;
                    return rule;
                }
                Some(Token::Eof) => {
                    self.report(Diagnostic::UnterminatedAtRule(rule.name.clone()));
                    return rule;
                }
                _ => {}
            }
            if let Some(block) = self.take_curly_block() {
                rule.block = Some(block);
                return rule;
            }
            let value = self.consume_component_value();
            rule.prelude.push(value);
        }
    }

    /// `None` when the input ends before the rule's block.
    fn consume_qualified_rule(&mut self) -> Option<QualifiedRule> {
        let mut prelude = Vec::new();
        loop {
            if self.at_end() {
                self.report(Diagnostic::UnterminatedQualifiedRule);
                return None;
            }
            if let Some(block) = self.take_curly_block() {
                return Some(QualifiedRule { prelude, block });
            }
            prelude.push(self.consume_component_value());
        }
    }

    fn consume_rule_list(&mut self, top_level: bool) -> Vec<Rule> {
        let mut rules = Vec::new();
        loop {
            match self.peek_token() {
                Some(Token::Whitespace(_)) => {
                    self.pos += 1;
                }
                Some(Token::Eof) => return rules,
                Some(Token::Cdo | Token::Cdc) if top_level => {
                    self.pos += 1;
                }
                Some(Token::AtKeyword(_)) => rules.push(Rule::At(self.consume_at_rule())),
                _ => {
                    if let Some(rule) = self.consume_qualified_rule() {
                        rules.push(Rule::Qualified(rule));
                    }
                }
            }
        }
    }

    /// The next item must be the declaration's name.
    fn consume_declaration(&mut self) -> Option<Declaration> {
        let Component::Preserved(Token::Ident(name)) = self.next_item() else {
            return None;
        };
        self.skip_whitespace();

        if !matches!(self.peek_token(), Some(Token::Colon)) {
            self.report(Diagnostic::MissingColon(name));
            return None;
        }
        self.pos += 1;
        self.skip_whitespace();

        let mut declaration = Declaration::new(name);
        while !self.at_end() {
            let value = self.consume_component_value();
            declaration.value.push(value);
        }

        let value = &mut declaration.value;
        trim_trailing_whitespace(value);
        let len = value.len();
        if len >= 2 && value[len - 2].is_delim('!') && value[len - 1].is_ident("important") {
            value.truncate(len - 2);
            declaration.important = true;
            trim_trailing_whitespace(value);
        }
        Some(declaration)
    }

    /// Collect components up to the next `;` (exclusive) and parse them as one
    /// declaration in a sub-parser.
    fn consume_declaration_until_semicolon(&mut self) -> Option<Declaration> {
        let mut pending = vec![self.next_item()];
        while !self.at_end_or_semicolon() {
            pending.push(self.consume_component_value());
        }
        let mut sub = Parser::with_config(pending, self.config);
        let declaration = sub.consume_declaration();
        self.diagnostics.append(&mut sub.diagnostics);
        declaration
    }

    fn skip_until_semicolon(&mut self) {
        while !self.at_end_or_semicolon() {
            self.consume_component_value();
        }
    }

    fn consume_style_block(&mut self) -> Vec<StyleItem> {
        let mut declarations = Vec::new();
        let mut rules = Vec::new();
        loop {
            match self.peek_token() {
                Some(Token::Whitespace(_) | Token::Semicolon) => {
                    self.pos += 1;
                }
                Some(Token::Eof) => break,
                Some(Token::AtKeyword(_)) => {
                    rules.push(StyleItem::Rule(Rule::At(self.consume_at_rule())));
                }
                Some(Token::Ident(_)) => {
                    if let Some(declaration) = self.consume_declaration_until_semicolon() {
                        declarations.push(StyleItem::Declaration(declaration));
                    }
                }
                Some(Token::Delim('&')) => {
                    if let Some(rule) = self.consume_qualified_rule() {
                        rules.push(StyleItem::Rule(Rule::Qualified(rule)));
                    }
                }
                _ => {
                    self.report(Diagnostic::InvalidStyleBlock);
                    self.skip_until_semicolon();
                }
            }
        }
        declarations.extend(rules);
        declarations
    }

    fn consume_declaration_list(&mut self) -> Vec<StyleItem> {
        let mut items = Vec::new();
        loop {
            match self.peek_token() {
                Some(Token::Whitespace(_) | Token::Semicolon) => {
                    self.pos += 1;
                }
                Some(Token::Eof) => return items,
                Some(Token::AtKeyword(_)) => {
                    items.push(StyleItem::Rule(Rule::At(self.consume_at_rule())));
                }
                Some(Token::Ident(_)) => {
                    if let Some(declaration) = self.consume_declaration_until_semicolon() {
                        items.push(StyleItem::Declaration(declaration));
                    }
                }
                _ => {
                    self.report(Diagnostic::InvalidDeclarationList);
                    self.skip_until_semicolon();
                }
            }
        }
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Exactly one component value, optionally surrounded by whitespace.
    pub fn parse_component_value(&mut self) -> Result<Component> {
        self.skip_whitespace();
        if self.at_end() {
            return Err(TcssError::InvalidSyntax(
                "expected a component value".to_string(),
            ));
        }
        let value = self.consume_component_value();
        self.skip_whitespace();
        if self.at_end() {
            Ok(value)
        } else {
            Err(TcssError::InvalidSyntax(
                "expected only one component value".to_string(),
            ))
        }
    }

    /// Every component value up to end of input, whitespace included.
    pub fn parse_component_values(&mut self) -> Vec<Component> {
        let mut values = Vec::new();
        while !self.at_end() {
            values.push(self.consume_component_value());
        }
        values
    }

    /// Component values split on top-level commas. Each group is trimmed of
    /// leading and trailing whitespace; empty groups are dropped.
    pub fn parse_comma_separated(&mut self) -> Vec<Vec<Component>> {
        let mut groups = Vec::new();
        let mut current = Vec::new();
        loop {
            let value = self.consume_component_value();
            if value.token().is_some_and(Token::is_eof) {
                break;
            }
            if value.is_delim(',') {
                push_group(&mut groups, std::mem::take(&mut current));
            } else {
                current.push(value);
            }
        }
        push_group(&mut groups, current);
        groups
    }

    /// A nested rule list: CDO/CDC start qualified rules.
    pub fn parse_rule_list(&mut self) -> Vec<Rule> {
        self.consume_rule_list(false)
    }

    /// Exactly one rule, optionally surrounded by whitespace.
    pub fn parse_rule(&mut self) -> Result<Rule> {
        self.skip_whitespace();
        let rule = match self.peek_token() {
            Some(Token::Eof) => {
                return Err(TcssError::InvalidSyntax("expected a rule".to_string()));
            }
            Some(Token::AtKeyword(_)) => Rule::At(self.consume_at_rule()),
            _ => match self.consume_qualified_rule() {
                Some(rule) => Rule::Qualified(rule),
                None => {
                    return Err(TcssError::InvalidSyntax(
                        "qualified rule has no block".to_string(),
                    ));
                }
            },
        };
        self.skip_whitespace();
        if self.at_end() {
            Ok(rule)
        } else {
            Err(TcssError::InvalidSyntax(
                "unexpected input after rule".to_string(),
            ))
        }
    }

    /// A single `name: value` declaration.
    pub fn parse_declaration(&mut self) -> Result<Declaration> {
        self.skip_whitespace();
        if !matches!(self.peek_token(), Some(Token::Ident(_))) {
            return Err(TcssError::InvalidSyntax(
                "declaration must start with an identifier".to_string(),
            ));
        }
        self.consume_declaration()
            .ok_or_else(|| TcssError::InvalidSyntax("declaration is missing a colon".to_string()))
    }

    /// Declarations, `&` nested rules and at-rules. Declarations come first in
    /// the result, followed by rules in source order.
    pub fn parse_style_block(&mut self) -> Vec<StyleItem> {
        self.consume_style_block()
    }

    /// Declarations and at-rules in source order.
    pub fn parse_declaration_list(&mut self) -> Vec<StyleItem> {
        self.consume_declaration_list()
    }

    /// A top-level rule list wrapped in a stylesheet. Stray CDO/CDC are dropped.
    pub fn parse_stylesheet(&mut self, location: Option<&str>) -> StyleSheet {
        let rules = self.consume_rule_list(true);
        StyleSheet::from_rules(rules, location.map(str::to_string))
    }
}

fn trim_trailing_whitespace(value: &mut Vec<Component>) {
    while value.last().is_some_and(Component::is_whitespace) {
        value.pop();
    }
}

fn push_group(groups: &mut Vec<Vec<Component>>, mut group: Vec<Component>) {
    trim_trailing_whitespace(&mut group);
    let leading = group.iter().take_while(|c| c.is_whitespace()).count();
    group.drain(..leading);
    if !group.is_empty() {
        groups.push(group);
    }
}

// ============================================================================
// Convenience entry points
// ============================================================================

/// Parses a full stylesheet. `location` becomes the sheet's `href`.
pub fn parse_stylesheet<'a>(input: impl Into<ParserInput<'a>>, location: Option<&str>) -> StyleSheet {
    log::debug!("parse_stylesheet: location={location:?}");
    Parser::new(input).parse_stylesheet(location)
}

/// Parses a stylesheet file, honoring a leading `@charset`.
pub fn parse_stylesheet_file(path: impl AsRef<std::path::Path>) -> Result<StyleSheet> {
    let path = path.as_ref();
    let source = crate::loader::read_stylesheet(path)?;
    let location = path.to_string_lossy();
    Ok(parse_stylesheet(source.as_str(), Some(location.as_ref())))
}

pub fn parse_rule_list<'a>(input: impl Into<ParserInput<'a>>) -> Vec<Rule> {
    Parser::new(input).parse_rule_list()
}

pub fn parse_rule<'a>(input: impl Into<ParserInput<'a>>) -> Result<Rule> {
    Parser::new(input).parse_rule()
}

pub fn parse_declaration<'a>(input: impl Into<ParserInput<'a>>) -> Result<Declaration> {
    Parser::new(input).parse_declaration()
}

pub fn parse_style_block<'a>(input: impl Into<ParserInput<'a>>) -> Vec<StyleItem> {
    Parser::new(input).parse_style_block()
}

pub fn parse_declaration_list<'a>(input: impl Into<ParserInput<'a>>) -> Vec<StyleItem> {
    Parser::new(input).parse_declaration_list()
}

pub fn parse_component_value<'a>(input: impl Into<ParserInput<'a>>) -> Result<Component> {
    Parser::new(input).parse_component_value()
}

pub fn parse_component_values<'a>(input: impl Into<ParserInput<'a>>) -> Vec<Component> {
    Parser::new(input).parse_component_values()
}

pub fn parse_comma_separated<'a>(input: impl Into<ParserInput<'a>>) -> Vec<Vec<Component>> {
    Parser::new(input).parse_comma_separated()
}
