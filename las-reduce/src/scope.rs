//! Scoped variable bindings for comprehensions and lambda application.
//!
//! A [`ScopeFrame`] is an ordered set of named slots. The rule that opens a frame declares its
//! slots up front, then repeatedly overwrites them: once per comprehension iteration, or once per
//! lambda application. The overwrite-then-reduce-then-overwrite cycle is only sound because
//! reduction is strictly sequential; each clone of the template is reduced to completion before
//! the slot is written again, so no two clones ever observe different values of the same slot.
//!
//! Lookup walks the session's frame stack innermost-first, which gives nested comprehensions the
//! usual shadowing behavior.

use las_expr::Expr;

/// One scope's worth of bindings.
///
/// A slot holds `None` between its declaration and its first write; a symbol that resolves to an
/// unwritten slot is treated as unbound.
#[derive(Debug, Default)]
pub struct ScopeFrame {
    entries: Vec<(String, Option<Expr>)>,
}

impl ScopeFrame {
    /// Creates an empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a named slot and returns its index for later writes.
    pub fn declare(&mut self, name: impl Into<String>) -> usize {
        self.entries.push((name.into(), None));
        self.entries.len() - 1
    }

    /// Overwrites the value in the given slot.
    pub fn bind(&mut self, slot: usize, value: Expr) {
        self.entries[slot].1 = Some(value);
    }

    /// Looks up a bound value by name within this frame.
    pub fn lookup(&self, name: &str) -> Option<&Expr> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .and_then(|(_, value)| value.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn declared_but_unwritten_slots_are_unbound() {
        let mut frame = ScopeFrame::new();
        let slot = frame.declare("k");
        assert_eq!(frame.lookup("k"), None);

        frame.bind(slot, Expr::integer(3));
        assert_eq!(frame.lookup("k"), Some(&Expr::integer(3)));
    }

    #[test]
    fn rebinding_replaces_the_value() {
        let mut frame = ScopeFrame::new();
        let slot = frame.declare("k");
        frame.bind(slot, Expr::integer(1));
        frame.bind(slot, Expr::integer(2));
        assert_eq!(frame.lookup("k"), Some(&Expr::integer(2)));
    }
}
