//! The rewrite table: an ordered list of candidate rules per tag.
//!
//! Dispatch preserves registration order, and a rule that declines (returns `Ok(false)`) simply
//! passes the node on to the next candidate for the same tag. Rules flagged *special* run before
//! the session reduces the node's children; they receive the children as written and are
//! responsible for reducing exactly the ones their algorithm needs, in whatever order it needs
//! them.

use crate::session::Session;
use las_error::Error;
use las_expr::{Expr, Tag};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// A rewrite function.
///
/// `Ok(true)` means the rule applied and has already performed its tree surgery; `Ok(false)`
/// means the rule does not apply to this node; `Err` aborts the whole reduction with a hard
/// domain error.
pub type Reducer = fn(&mut Expr, &mut Session) -> Result<bool, Error>;

/// A registered rewrite rule.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub reducer: Reducer,
    pub name: &'static str,
    pub special: bool,
}

/// An ordered collection of rewrite rules, keyed by node tag.
#[derive(Debug, Default)]
pub struct Registry {
    rules: HashMap<Tag, Vec<Rule>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule for the given tag, after all previously registered rules for that tag.
    pub fn add_reducer(&mut self, tag: Tag, reducer: Reducer, name: &'static str) {
        self.rules.entry(tag).or_default().push(Rule {
            reducer,
            name,
            special: false,
        });
    }

    /// Registers a rule that runs before the node's children are reduced.
    pub fn add_special_reducer(&mut self, tag: Tag, reducer: Reducer, name: &'static str) {
        self.rules.entry(tag).or_default().push(Rule {
            reducer,
            name,
            special: true,
        });
    }

    /// The rules registered for the given tag, in registration order.
    pub fn rules(&self, tag: Tag) -> &[Rule] {
        self.rules.get(&tag).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// The shared rule table with every rule of this crate registered.
pub fn default_registry() -> &'static Registry {
    static REGISTRY: Lazy<Registry> = Lazy::new(|| {
        let mut registry = Registry::new();
        crate::rules::register_all(&mut registry);
        registry
    });
    &REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    fn never(_: &mut Expr, _: &mut Session) -> Result<bool, Error> {
        Ok(false)
    }

    #[test]
    fn dispatch_order_is_registration_order() {
        let mut registry = Registry::new();
        registry.add_reducer(Tag::Add, never, "first");
        registry.add_special_reducer(Tag::Add, never, "second");

        let rules = registry.rules(Tag::Add);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].name, "first");
        assert!(!rules[0].special);
        assert_eq!(rules[1].name, "second");
        assert!(rules[1].special);
    }

    #[test]
    fn unknown_tags_have_no_rules() {
        let registry = Registry::new();
        assert!(registry.rules(Tag::List).is_empty());
    }
}
