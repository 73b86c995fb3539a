//! Component values, declarations and rules built by the [`Parser`](super::Parser).

use std::fmt;

use crate::token::{Bracket, Token};

/// A component value: a preserved token or a nested function/block, plus
/// declarations once a style block has been parsed.
#[derive(Clone, Debug, PartialEq)]
pub enum Component {
    /// Any token other than an opening bracket, function, bad-string or bad-url
    /// once the parser has consumed it.
    Preserved(Token),
    Function(FunctionBlock),
    Block(Block),
    Declaration(Declaration),
}

impl Component {
    pub fn token(&self) -> Option<&Token> {
        match self {
            Component::Preserved(token) => Some(token),
            _ => None,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        self.token().is_some_and(Token::is_whitespace)
    }

    pub fn is_delim(&self, c: char) -> bool {
        self.token().is_some_and(|token| token.is_delim(c))
    }

    pub fn is_ident(&self, name: &str) -> bool {
        self.token()
            .and_then(Token::ident)
            .is_some_and(|ident| ident.eq_ignore_ascii_case(name))
    }
}

impl From<Token> for Component {
    fn from(token: Token) -> Self {
        Component::Preserved(token)
    }
}

fn write_all(f: &mut fmt::Formatter<'_>, components: &[Component]) -> fmt::Result {
    components.iter().try_for_each(|c| write!(f, "{c}"))
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Preserved(token) => write!(f, "{token}"),
            Component::Function(function) => write!(f, "{function}"),
            Component::Block(block) => write!(f, "{block}"),
            Component::Declaration(declaration) => write!(f, "{declaration}"),
        }
    }
}

/// `name( ... )`
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionBlock {
    pub name: String,
    pub value: Vec<Component>,
}

impl FunctionBlock {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Vec::new(),
        }
    }
}

impl fmt::Display for FunctionBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        write_all(f, &self.value)?;
        f.write_str(")")
    }
}

/// A `{}`, `[]` or `()` block.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub bracket: Bracket,
    pub value: Vec<Component>,
}

impl Block {
    pub fn new(bracket: Bracket) -> Self {
        Self {
            bracket,
            value: Vec::new(),
        }
    }

    /// The token that closes this block.
    pub fn closing(&self) -> Token {
        self.bracket.close_token()
    }

    /// Parse the block's contents as a style block.
    pub fn style_block(&self) -> Vec<StyleItem> {
        super::parse_style_block(self.value.clone())
    }

    /// Parse the block's contents as a declaration list.
    pub fn declaration_list(&self) -> Vec<StyleItem> {
        super::parse_declaration_list(self.value.clone())
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bracket.open_char())?;
        write_all(f, &self.value)?;
        write!(f, "{}", self.bracket.close_char())
    }
}

/// `name: value [!important]`
///
/// The value has surrounding whitespace and the `!important` marker removed.
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub value: Vec<Component>,
    pub important: bool,
}

impl Declaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Vec::new(),
            important: false,
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.name)?;
        write_all(f, &self.value)?;
        if self.important {
            f.write_str(" !important")?;
        }
        Ok(())
    }
}

/// `@name prelude;` or `@name prelude { ... }`
#[derive(Clone, Debug, PartialEq)]
pub struct AtRule {
    pub name: String,
    pub prelude: Vec<Component>,
    pub block: Option<Block>,
}

impl AtRule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prelude: Vec::new(),
            block: None,
        }
    }

    /// The block's contents as a style block; empty for block-less at-rules.
    pub fn style_block(&self) -> Vec<StyleItem> {
        self.block.as_ref().map(Block::style_block).unwrap_or_default()
    }
}

impl fmt::Display for AtRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        write_all(f, &self.prelude)?;
        match &self.block {
            Some(block) => write!(f, "{block}"),
            None => f.write_str(";"),
        }
    }
}

/// A prelude (usually a selector) followed by a `{}` block.
#[derive(Clone, Debug, PartialEq)]
pub struct QualifiedRule {
    pub prelude: Vec<Component>,
    pub block: Block,
}

impl QualifiedRule {
    pub fn style_block(&self) -> Vec<StyleItem> {
        self.block.style_block()
    }

    /// Only the declarations of the style block.
    pub fn declarations(&self) -> Vec<Declaration> {
        self.style_block()
            .into_iter()
            .filter_map(|item| match item {
                StyleItem::Declaration(declaration) => Some(declaration),
                StyleItem::Rule(_) => None,
            })
            .collect()
    }
}

impl fmt::Display for QualifiedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_all(f, &self.prelude)?;
        write!(f, "{}", self.block)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Rule {
    At(AtRule),
    Qualified(QualifiedRule),
}

impl Rule {
    /// The at-rule name, or `None` for a qualified rule.
    pub fn name(&self) -> Option<&str> {
        match self {
            Rule::At(rule) => Some(&rule.name),
            Rule::Qualified(_) => None,
        }
    }

    /// Whether this is the at-rule `@name` (ASCII case-insensitive).
    pub fn is_at_rule(&self, name: &str) -> bool {
        self.name().is_some_and(|n| n.eq_ignore_ascii_case(name))
    }

    pub fn block(&self) -> Option<&Block> {
        match self {
            Rule::At(rule) => rule.block.as_ref(),
            Rule::Qualified(rule) => Some(&rule.block),
        }
    }

    pub fn prelude(&self) -> &[Component] {
        match self {
            Rule::At(rule) => &rule.prelude,
            Rule::Qualified(rule) => &rule.prelude,
        }
    }
}

impl From<AtRule> for Rule {
    fn from(rule: AtRule) -> Self {
        Rule::At(rule)
    }
}

impl From<QualifiedRule> for Rule {
    fn from(rule: QualifiedRule) -> Self {
        Rule::Qualified(rule)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::At(rule) => write!(f, "{rule}"),
            Rule::Qualified(rule) => write!(f, "{rule}"),
        }
    }
}

/// An entry of a style block or declaration list.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleItem {
    Declaration(Declaration),
    Rule(Rule),
}

impl fmt::Display for StyleItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleItem::Declaration(declaration) => write!(f, "{declaration}"),
            StyleItem::Rule(rule) => write!(f, "{rule}"),
        }
    }
}
