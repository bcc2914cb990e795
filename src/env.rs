use std::fmt;

use im::OrdMap;

use crate::term::{Functor, Value, Var};

/// An immutable set of variable bindings.
///
/// Every update returns a new environment that shares structure with the old
/// one, so backtracking to an earlier choice point is just keeping the older
/// value around.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    bindings: OrdMap<Var, Value>,
}

impl Environment {
    /// The empty environment every query starts from.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The value directly bound to `var`, without following chains.
    #[must_use]
    pub fn get(&self, var: &Var) -> Option<&Value> {
        self.bindings.get(var)
    }

    /// Lookup by variable name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Returns a copy of this environment in which `var` maps to `value`.
    ///
    /// An existing binding is replaced; checking for conflicts is up to the caller.
    #[must_use]
    pub fn put(&self, var: Var, value: Value) -> Self {
        Self {
            bindings: self.bindings.update(var, value),
        }
    }

    /// Whether `var` has a binding.
    #[must_use]
    pub fn contains(&self, var: &Var) -> bool {
        self.bindings.contains_key(var)
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether there are no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings in variable-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&Var, &Value)> {
        self.bindings.iter()
    }

    /// Follows `value` through variable bindings until it reaches a non-variable
    /// or an unbound variable.
    ///
    /// Runs in a loop, so arbitrarily long chains cannot exhaust the stack.
    #[must_use]
    pub fn resolve<'a>(&'a self, value: &'a Value) -> &'a Value {
        let mut current = value;
        while let Value::Var(var) = current {
            match self.bindings.get(var) {
                // self-loop
                Some(Value::Var(next)) if next == var => break,
                Some(bound) => current = bound,
                None => break,
            }
        }
        current
    }

    /// Resolves `value` and every variable inside it.
    ///
    /// Unbound variables are left in place. There is no occurs check, so a
    /// cyclic binding such as `X = f(X)` does not terminate. Recursion follows
    /// term depth, so very deep terms hit the same stack limit as dropping a
    /// deep `Value`.
    #[must_use]
    pub fn resolve_deep(&self, value: &Value) -> Value {
        match self.resolve(value) {
            Value::Functor(functor) => Value::Functor(Functor {
                name: functor.name.clone(),
                args: functor
                    .args
                    .iter()
                    .map(|arg| self.resolve_deep(arg))
                    .collect(),
            }),
            resolved => resolved.clone(),
        }
    }

    /// Materializes a solution: user variables map to fully resolved terms and
    /// bindings of internal variables are dropped.
    ///
    /// A user variable that resolves to an unbound internal variable is still
    /// unbound, so it is dropped as well.
    #[must_use]
    pub fn resolve_all(&self) -> Self {
        self.bindings
            .iter()
            .filter(|(var, _)| !var.is_internal())
            .filter_map(|(var, value)| match self.resolve_deep(value) {
                Value::Var(free) if free.is_internal() => None,
                resolved => Some((var.clone(), resolved)),
            })
            .collect()
    }
}

/// Free-function form of [`Environment::resolve`].
#[must_use]
pub fn resolve<'a>(env: &'a Environment, value: &'a Value) -> &'a Value {
    env.resolve(value)
}

/// Free-function form of [`Environment::resolve_all`].
#[must_use]
pub fn resolve_all(env: &Environment) -> Environment {
    env.resolve_all()
}

impl FromIterator<(Var, Value)> for Environment {
    fn from_iter<I: IntoIterator<Item = (Var, Value)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[(Var, Value); N]> for Environment {
    fn from(bindings: [(Var, Value); N]) -> Self {
        bindings.into_iter().collect()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (var, value)) in self.bindings.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{var} = {value}")?;
        }
        f.write_str("}")
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Environment {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.bindings.iter().map(|(var, value)| (var.name(), value)))
    }
}
