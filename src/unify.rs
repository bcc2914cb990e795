use std::cmp::Ordering;

use crate::env::Environment;
use crate::error::UnificationError;
use crate::term::{Functor, Value, Var};

/// Finds the bindings that make `left` and `right` syntactically equal.
///
/// Both sides are resolved in `env` first. Two free variables are linked by
/// binding the one with the larger name to the other, so the result does not
/// depend on argument order. Functors unify argument by argument from left to
/// right, each pair seeing the bindings made by the previous ones.
///
/// No occurs check is performed: `X` unifies with `f(X)`.
///
/// # Errors
///
/// Returns [`UnificationError`] with the first pair of resolved terms that
/// cannot be made equal.
pub fn unify(
    env: &Environment,
    left: &Value,
    right: &Value,
) -> Result<Environment, UnificationError> {
    let l = env.resolve(left);
    let r = env.resolve(right);

    match (l, r) {
        (Value::Var(a), Value::Var(b)) => Ok(match a.name().cmp(b.name()) {
            Ordering::Less => env.put(b.clone(), l.clone()),
            Ordering::Greater => env.put(a.clone(), r.clone()),
            Ordering::Equal => env.clone(),
        }),
        (Value::Num(a), Value::Num(b)) if a == b => Ok(env.clone()),
        (Value::Atom(a), Value::Atom(b)) if a == b => Ok(env.clone()),
        (Value::Functor(a), Value::Functor(b)) => unify_functors(env, a, b),
        (Value::Var(var), _) => bind(env, var, r),
        (_, Value::Var(_)) => unify(env, r, l),
        _ => Err(UnificationError::new(l, r)),
    }
}

/// Unifies two functor applications: same name, same arity, then every
/// argument pair in order.
///
/// # Errors
///
/// Returns [`UnificationError`] on a name or arity mismatch, or with the first
/// argument pair that fails.
pub fn unify_functors(
    env: &Environment,
    left: &Functor,
    right: &Functor,
) -> Result<Environment, UnificationError> {
    if !left.same_signature(right) {
        return Err(UnificationError {
            left: Value::Functor(left.clone()),
            right: Value::Functor(right.clone()),
        });
    }

    left.args
        .iter()
        .zip(&right.args)
        .try_fold(env.clone(), |env, (l, r)| unify(&env, l, r))
}

fn bind(env: &Environment, var: &Var, value: &Value) -> Result<Environment, UnificationError> {
    if let Some(bound) = env.get(var) {
        if env.resolve(bound) != value {
            return Err(UnificationError::new(bound, value));
        }
    }
    Ok(env.put(var.clone(), value.clone()))
}
