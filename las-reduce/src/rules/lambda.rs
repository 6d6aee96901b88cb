//! Symbol resolution and lambda application.
//!
//! Comprehensions thread their iteration variable into cloned templates through the session's
//! scope stack, and the sort rule drives a user-supplied (or synthesized) comparator the same
//! way: by building an application node and reducing it. These two rules are the consumer side
//! of that machinery.

use crate::scope::ScopeFrame;
use crate::session::Session;
use las_error::Error;
use las_expr::Expr;

/// Replaces a symbol with a clone of its innermost bound value, if any.
pub fn resolve_symbol(expr: &mut Expr, session: &mut Session) -> Result<bool, Error> {
    let Expr::Symbol(name) = &*expr else {
        return Ok(false);
    };
    let Some(value) = session.lookup(name) else {
        return Ok(false);
    };
    let value = value.clone();
    *expr = value;
    Ok(true)
}

/// Applies a lambda to a list of arguments.
///
/// Registered as special: the body must not be reduced before the parameters are bound, so this
/// rule reduces only the argument list, then reduces a clone of the body under a fresh scope
/// binding each parameter to its argument.
pub fn apply_lambda(expr: &mut Expr, session: &mut Session) -> Result<bool, Error> {
    let Expr::Apply(lambda, args) = expr else {
        return Ok(false);
    };
    let Expr::Lambda(params, body) = lambda.as_ref() else {
        return Ok(false);
    };

    let names: Vec<String> = match params.as_ref() {
        Expr::Symbol(name) => vec![name.clone()],
        Expr::List(symbols) => {
            let mut names = Vec::with_capacity(symbols.len());
            for symbol in symbols {
                let Some(name) = symbol.as_symbol() else {
                    return Ok(false);
                };
                names.push(name.to_string());
            }
            names
        },
        _ => return Ok(false),
    };
    let template = (**body).clone();

    session.reduce_arg(args.as_mut(), 1)?;
    let Some(values) = args.as_list() else {
        return Ok(false);
    };
    if values.len() != names.len() {
        return Ok(false);
    }

    let mut frame = ScopeFrame::new();
    for (name, value) in names.iter().zip(values) {
        let slot = frame.declare(name.as_str());
        frame.bind(slot, value.clone());
    }

    let mut result = template;
    session.push_scope(frame);
    let outcome = session.reduce(&mut result);
    session.pop_scope();
    outcome?;

    *expr = result;
    Ok(true)
}
