//! The stylesheet object model.
//!
//! A [`StyleSheet`] owns an ordered rule list. Insertion order is cascade
//! order. Rules are only changed through [`StyleSheet::insert_rule`],
//! [`StyleSheet::delete_rule`] and [`StyleSheet::replace`], which enforce:
//!
//! - no `@import` may be inserted into a constructed sheet;
//! - an `@namespace` rule may only sit among `@namespace`/`@import` rules.

use std::fmt;
use std::rc::{Rc, Weak};

use bitflags::bitflags;

use crate::error::{Result, TcssError};
use crate::parser::{Parser, Rule};

bitflags! {
    /// Mutation state of a [`StyleSheet`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SheetFlags: u8 {
        /// Rules may be read and changed by the owner.
        const ORIGIN_CLEAN = 1;
        /// Mutation is temporarily forbidden (e.g. while a replace is pending).
        const DISALLOW_MODIFICATION = 1 << 1;
        /// Built with [`StyleSheet::new`] rather than parsed from a source.
        const CONSTRUCTED = 1 << 2;
    }
}

#[derive(Clone, Debug)]
pub struct StyleSheet {
    rules: Vec<Rule>,
    base_url: Option<String>,
    location: Option<String>,
    title: Option<String>,
    parent: Option<Weak<StyleSheet>>,
    disabled: bool,
    flags: SheetFlags,
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleSheet {
    /// An empty, constructed stylesheet.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            base_url: None,
            location: None,
            title: None,
            parent: None,
            disabled: false,
            flags: SheetFlags::ORIGIN_CLEAN | SheetFlags::CONSTRUCTED,
        }
    }

    /// A parsed (not constructed) stylesheet owning `rules`.
    pub fn from_rules(rules: Vec<Rule>, location: Option<String>) -> Self {
        Self {
            rules,
            location,
            flags: SheetFlags::ORIGIN_CLEAN,
            ..Self::new()
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_location(mut self, url: impl Into<String>) -> Self {
        self.location = Some(url.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.title = (!title.is_empty()).then_some(title);
        self
    }

    /// Record `parent` as this sheet's parent without taking ownership of it.
    pub fn with_parent(mut self, parent: &Rc<StyleSheet>) -> Self {
        self.parent = Some(Rc::downgrade(parent));
        self
    }

    pub fn with_disallow_modification(mut self, disallow: bool) -> Self {
        self.flags.set(SheetFlags::DISALLOW_MODIFICATION, disallow);
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// The sheet's location.
    pub fn href(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The parent sheet, if it is still alive.
    pub fn parent(&self) -> Option<Rc<StyleSheet>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    pub fn mime_type(&self) -> &'static str {
        "text/css"
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn flags(&self) -> SheetFlags {
        self.flags
    }

    pub fn is_origin_clean(&self) -> bool {
        self.flags.contains(SheetFlags::ORIGIN_CLEAN)
    }

    pub fn set_origin_clean(&mut self, clean: bool) {
        self.flags.set(SheetFlags::ORIGIN_CLEAN, clean);
    }

    pub fn is_constructed(&self) -> bool {
        self.flags.contains(SheetFlags::CONSTRUCTED)
    }

    pub fn disallows_modification(&self) -> bool {
        self.flags.contains(SheetFlags::DISALLOW_MODIFICATION)
    }

    pub fn set_disallow_modification(&mut self, disallow: bool) {
        self.flags.set(SheetFlags::DISALLOW_MODIFICATION, disallow);
    }

    fn check_mutable(&self) -> Result<()> {
        if !self.is_origin_clean() {
            log::debug!("stylesheet mutation rejected: origin not clean");
            return Err(TcssError::Security);
        }
        if self.disallows_modification() {
            log::debug!("stylesheet mutation rejected: modification disallowed");
            return Err(TcssError::NotAllowed("stylesheet modification is disallowed"));
        }
        Ok(())
    }

    fn only_namespace_and_import(&self) -> bool {
        self.rules
            .iter()
            .all(|rule| rule.is_at_rule("namespace") || rule.is_at_rule("import"))
    }

    /// Parse `text` as a single rule and insert it at `index`.
    ///
    /// Only an inserted `@namespace` rule is checked against the ordering of
    /// the existing rules. Other rules may be inserted at any index, even
    /// ahead of an `@namespace`.
    ///
    /// ```rust
    /// use tcss::parser::StyleSheet;
    ///
    /// let mut sheet = StyleSheet::new();
    /// sheet.insert_rule("Label { color: red; }", 0).unwrap();
    /// assert!(sheet.insert_rule("@namespace svg url(x);", 0).is_err());
    /// ```
    pub fn insert_rule(&mut self, text: &str, index: usize) -> Result<usize> {
        self.check_mutable()?;

        let rule = Parser::new(text).parse_rule()?;
        if index > self.rules.len() {
            return Err(TcssError::IndexSize {
                index,
                len: self.rules.len(),
            });
        }
        if rule.is_at_rule("import") && self.is_constructed() {
            log::debug!("stylesheet mutation rejected: @import in constructed sheet");
            return Err(TcssError::InvalidSyntax(
                "@import rules cannot be inserted into a constructed stylesheet".to_string(),
            ));
        }
        if rule.is_at_rule("namespace") && !self.only_namespace_and_import() {
            log::debug!("stylesheet mutation rejected: @namespace after other rules");
            return Err(TcssError::InvalidState(
                "@namespace rules must precede all rules other than @import",
            ));
        }

        self.rules.insert(index, rule);
        Ok(index)
    }

    /// Remove the rule at `index`.
    pub fn delete_rule(&mut self, index: usize) -> Result<()> {
        self.check_mutable()?;

        let Some(rule) = self.rules.get(index) else {
            return Err(TcssError::IndexSize {
                index,
                len: self.rules.len(),
            });
        };
        if rule.is_at_rule("namespace") && !self.only_namespace_and_import() {
            log::debug!("stylesheet mutation rejected: @namespace removal");
            return Err(TcssError::InvalidState(
                "@namespace rules cannot be removed while other rules exist",
            ));
        }

        self.rules.remove(index);
        Ok(())
    }

    /// Replace the rule list with the `@import` rules found in `text`.
    ///
    /// Every other rule in `text` is discarded. Only constructed sheets may be
    /// replaced.
    pub fn replace(&mut self, text: &str) -> Result<&mut Self> {
        if !self.is_constructed() {
            return Err(TcssError::NotAllowed(
                "only constructed stylesheets can be replaced",
            ));
        }
        if self.disallows_modification() {
            return Err(TcssError::NotAllowed("stylesheet modification is disallowed"));
        }

        let rules = Parser::new(text).parse_rule_list();
        self.rules = rules
            .into_iter()
            .filter(|rule| rule.is_at_rule("import"))
            .collect();
        Ok(self)
    }
}

impl fmt::Display for StyleSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{rule}")?;
        }
        Ok(())
    }
}
