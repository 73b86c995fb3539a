//! # TCSS - Terminal CSS syntax
//!
//! The stylesheet language of the contui terminal UI toolkit. This crate is
//! its syntax layer: a CSS Syntax Level 3 tokenizer, the family of CSS parser
//! entry points, and a small stylesheet object model. It produces a faithful
//! syntactic tree; selector matching, the cascade and property validation
//! happen downstream.
//!
//! - **Lexing**: [`Lexer`](lexer::Lexer) turns text into [`Token`](token::Token)s
//! - **Parsing**: [`parser`] builds component values, declarations and rules
//! - **Stylesheets**: [`StyleSheet`](parser::StyleSheet) owns a rule list and
//!   guards its mutation
//!
//! ## Quick Start
//!
//! ```rust
//! use tcss::parser::{parse_stylesheet, Component, Rule};
//! use tcss::token::Token;
//!
//! let source = r#"
//!     @import "base.tcss";
//!
//!     Button {
//!         color: red !important;
//!         &:hover { background: blue; }
//!     }
//! "#;
//!
//! let sheet = parse_stylesheet(source, None);
//! assert_eq!(sheet.rules().len(), 2);
//!
//! let Rule::Qualified(button) = &sheet.rules()[1] else { panic!() };
//! let declarations = button.declarations();
//! assert!(declarations[0].important);
//! assert_eq!(
//!     declarations[0].value,
//!     vec![Component::Preserved(Token::Ident("red".into()))]
//! );
//! ```
//!
//! ## Error handling
//!
//! Malformed input never aborts a parse. Problems are collected as
//! [`Diagnostic`]s on the [`Lexer`](lexer::Lexer) or
//! [`Parser`](parser::Parser) and recovery tokens or partial structures are
//! returned. Entry points that promise exactly one rule, declaration or
//! component value return a [`TcssError`] instead, as do stylesheet mutations.
//!
//! ## Modules
//!
//! - [`token`]: the token model
//! - [`lexer`]: the tokenizer
//! - [`parser`]: parser entry points, component tree and stylesheet model
//! - [`loader`]: `@charset`-aware file loading
//! - [`minify`]: compact re-serialization
//! - [`error`]: error and diagnostic types

pub mod error;
pub mod lexer;
pub mod loader;
pub mod minify;
pub mod parser;
pub mod token;

pub use error::{Diagnostic, Position, TcssError};
pub use lexer::Lexer;
pub use parser::{Parser, StyleSheet};
pub use token::Token;
