use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A logic variable.
///
/// Identity is the name alone: two `Var`s with the same name are the same
/// variable whatever their `internal` flag says.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Var {
    name: String,
    internal: bool,
}

impl Var {
    /// A variable written by the user (or the parser).
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            internal: false,
        }
    }

    /// A variable introduced by rule instantiation.
    pub(crate) fn internal(name: String) -> Self {
        Self {
            name,
            internal: true,
        }
    }

    /// The variable's identity.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this variable was generated by rule instantiation.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.internal
    }
}

impl PartialEq for Var {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Var {}

impl PartialOrd for Var {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Var {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl Hash for Var {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl Borrow<str> for Var {
    fn borrow(&self) -> &str {
        &self.name
    }
}

/// A term: the data everything else is built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// Integer literal (e.g. `42`)
    Num(i64),
    /// Zero-arity symbolic constant (e.g. `nil`)
    Atom(String),
    /// Logic variable (e.g. `X`)
    Var(Var),
    /// Compound term (e.g. `cons(1, nil)`)
    Functor(Functor),
}

impl Value {
    /// Shorthand for [`Value::Atom`].
    #[must_use]
    pub fn atom(name: impl Into<String>) -> Self {
        Value::Atom(name.into())
    }

    /// Shorthand for a user variable.
    #[must_use]
    pub fn var(name: impl Into<String>) -> Self {
        Value::Var(Var::new(name))
    }

    /// Shorthand for [`Value::Functor`].
    #[must_use]
    pub fn functor(name: impl Into<String>, args: Vec<Value>) -> Self {
        Value::Functor(Functor::new(name, args))
    }

    /// Whether any variable occurs in this term.
    #[must_use]
    pub fn has_variables(&self) -> bool {
        match self {
            Value::Num(_) | Value::Atom(_) => false,
            Value::Var(_) => true,
            Value::Functor(functor) => functor.has_variables(),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Num(value)
    }
}

impl From<Var> for Value {
    fn from(var: Var) -> Self {
        Value::Var(var)
    }
}

impl From<Functor> for Value {
    fn from(functor: Functor) -> Self {
        Value::Functor(functor)
    }
}

/// A named compound term (e.g. `edge(1, 3)`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Functor {
    /// The functor symbol (e.g. `"edge"`)
    pub name: String,
    /// The ordered arguments; arity is their count
    pub args: Vec<Value>,
}

impl Functor {
    /// Create a functor application.
    #[must_use]
    pub fn new(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Number of arguments.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Same name and same arity.
    #[must_use]
    pub fn same_signature(&self, other: &Functor) -> bool {
        self.name == other.name && self.args.len() == other.args.len()
    }

    /// Whether any variable occurs in the arguments, at any depth.
    #[must_use]
    pub fn has_variables(&self) -> bool {
        self.args.iter().any(Value::has_variables)
    }
}

/// A single functor usable as a clause head or as one body goal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fact(pub Functor);

impl From<Functor> for Fact {
    fn from(functor: Functor) -> Self {
        Fact(functor)
    }
}

/// A Horn clause (e.g. `path(X, Z) :- edge(X, Y), path(Y, Z)`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rule {
    /// The conclusion pattern
    pub head: Fact,
    /// The conjunctive goals, solved left to right
    pub body: Vec<Fact>,
}

impl Rule {
    /// Create a rule from a head functor and body functors.
    #[must_use]
    pub fn new(head: Functor, body: Vec<Functor>) -> Self {
        Self {
            head: Fact(head),
            body: body.into_iter().map(Fact).collect(),
        }
    }
}

/// One entry of a program.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Declaration {
    /// A variable-free functor, matched directly
    Fact(Fact),
    /// A template, instantiated before every application
    Rule(Rule),
}

impl Declaration {
    /// Classify a bare top-level functor.
    ///
    /// Without variables it is a [`Declaration::Fact`]; with variables it becomes a
    /// [`Declaration::Rule`] with an empty body, so that it is freshly renamed on
    /// every use.
    #[must_use]
    pub fn classify(functor: Functor) -> Self {
        if functor.has_variables() {
            Declaration::Rule(Rule {
                head: Fact(functor),
                body: Vec::new(),
            })
        } else {
            Declaration::Fact(Fact(functor))
        }
    }

    /// The head functor: the fact itself, or the rule's head.
    #[must_use]
    pub fn head(&self) -> &Functor {
        match self {
            Declaration::Fact(Fact(functor)) => functor,
            Declaration::Rule(rule) => &rule.head.0,
        }
    }
}

impl From<Rule> for Declaration {
    fn from(rule: Rule) -> Self {
        Declaration::Rule(rule)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Num(n) => write!(f, "{n}"),
            Value::Atom(name) => f.write_str(name),
            Value::Var(var) => write!(f, "{var}"),
            Value::Functor(functor) => write!(f, "{functor}"),
        }
    }
}

impl fmt::Display for Functor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        for (i, goal) in self.body.iter().enumerate() {
            f.write_str(if i == 0 { " :- " } else { ", " })?;
            write!(f, "{goal}")?;
        }
        f.write_str(".")
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declaration::Fact(fact) => write!(f, "{fact}."),
            Declaration::Rule(rule) => write!(f, "{rule}"),
        }
    }
}
