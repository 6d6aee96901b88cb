//! The reduction session: drives nodes to normal form against a rule table.
//!
//! Reduction is single-threaded and strictly sequential. A rule that needs a subterm in normal
//! form re-enters the session through [`Session::reduce`] or [`Session::reduce_arg`]; the
//! sub-reduction runs to completion before control returns to the rule. This sequencing is
//! load-bearing: comprehension rules overwrite one scope slot per iteration and the sort rule
//! reuses one comparator template per comparison, and both are only correct because no two
//! in-flight reductions ever interleave. Exclusive `&mut` access to both the session and the
//! node makes that discipline a compile-time property rather than a convention.

use crate::registry::{default_registry, Registry};
use crate::scope::ScopeFrame;
use las_error::Error;
use las_expr::Expr;
use log::trace;

/// Drives expressions to normal form.
#[derive(Debug)]
pub struct Session<'r> {
    registry: &'r Registry,
    scopes: Vec<ScopeFrame>,
}

impl Session<'static> {
    /// Creates a session over the default rule table.
    pub fn new() -> Self {
        Self::with_registry(default_registry())
    }
}

impl Default for Session<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> Session<'r> {
    /// Creates a session over a custom rule table.
    pub fn with_registry(registry: &'r Registry) -> Self {
        Self {
            registry,
            scopes: Vec::new(),
        }
    }

    /// Reduces the expression in place until no rule applies to it.
    ///
    /// Special rules get first crack at the node exactly as written; if none of them fires,
    /// every child is reduced, then all rules for the tag are tried in registration order (a
    /// child rewrite may have enabled a special rule that declined earlier, and re-running one
    /// over already-reduced children is harmless). Any rule firing starts the cycle over, since
    /// the node, and often its tag, has changed.
    pub fn reduce(&mut self, expr: &mut Expr) -> Result<(), Error> {
        'rewritten: loop {
            let tag = expr.tag();
            for index in 0..self.registry.rules(tag).len() {
                let rule = self.registry.rules(tag)[index];
                if rule.special && (rule.reducer)(expr, self)? {
                    trace!("rule `{}` rewrote a `{:?}` node", rule.name, tag);
                    continue 'rewritten;
                }
            }

            for child in expr.children_mut() {
                self.reduce(child)?;
            }

            let tag = expr.tag();
            for index in 0..self.registry.rules(tag).len() {
                let rule = self.registry.rules(tag)[index];
                if (rule.reducer)(expr, self)? {
                    trace!("rule `{}` rewrote a `{:?}` node", rule.name, tag);
                    continue 'rewritten;
                }
            }

            return Ok(());
        }
    }

    /// Reduces an argument of a larger construct, tagging any hard error with its position.
    pub fn reduce_arg(&mut self, expr: &mut Expr, index: usize) -> Result<(), Error> {
        self.reduce(expr).map_err(|err| err.with_arg_index(index))
    }

    /// Opens a scope for the duration of a fill phase.
    pub fn push_scope(&mut self, frame: ScopeFrame) {
        self.scopes.push(frame);
    }

    /// Closes the innermost scope.
    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Overwrites a slot of the innermost scope.
    pub fn rebind(&mut self, slot: usize, value: Expr) {
        if let Some(frame) = self.scopes.last_mut() {
            frame.bind(slot, value);
        }
    }

    /// Resolves a symbol name against the scope stack, innermost first.
    pub fn lookup(&self, name: &str) -> Option<&Expr> {
        self.scopes.iter().rev().find_map(|frame| frame.lookup(name))
    }
}
