use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;

use crate::search::{search, Solutions};
use crate::term::{Declaration, Fact, Functor, Rule, Value, Var};

#[cfg(feature = "parsing")]
use crate::error::Result;

/// Prefix of instantiation-generated variable names. The parser never
/// produces an identifier starting with `_`, so these cannot collide with
/// variables from source text.
const FRESH_PREFIX: &str = "_G";

/// A knowledge base: an ordered list of facts and rules.
///
/// Declaration order is the order in which clauses are tried and therefore the
/// order in which solutions come out of [`Database::query`].
#[derive(Debug, Default)]
pub struct Database {
    declarations: Vec<Declaration>,
    /// Next fresh variable number; shared by every query on this database
    fresh: AtomicU64,
}

impl Database {
    /// Create a database from already built declarations.
    #[must_use]
    pub fn new(declarations: Vec<Declaration>) -> Self {
        Self {
            declarations,
            fresh: AtomicU64::new(0),
        }
    }

    /// Parse a program and load it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`](crate::Error::Parse) if `source` is not a
    /// valid program.
    #[cfg(feature = "parsing")]
    pub fn from_source(source: &str) -> Result<Self> {
        let declarations = crate::parser::parse_program(source)?;
        log::debug!("loaded {} declarations", declarations.len());
        Ok(Self::new(declarations))
    }

    /// Add a functor as a fact.
    ///
    /// A functor containing variables is stored as a rule with an empty body
    /// (see [`Declaration::classify`]).
    pub fn add_fact(&mut self, functor: Functor) {
        self.declarations.push(Declaration::classify(functor));
    }

    /// Add a rule after all existing declarations.
    pub fn add_rule(&mut self, rule: Rule) {
        self.declarations.push(Declaration::Rule(rule));
    }

    /// Add any declaration after all existing ones.
    pub fn push(&mut self, declaration: Declaration) {
        self.declarations.push(declaration);
    }

    /// All declarations in search order.
    #[must_use]
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether the database has no declarations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// How many fresh variables have been handed out so far.
    #[must_use]
    pub fn fresh_count(&self) -> u64 {
        self.fresh.load(Ordering::Relaxed)
    }

    /// A new internal variable, distinct from every variable handed out before.
    pub fn fresh_var(&self) -> Var {
        let n = self.fresh.fetch_add(1, Ordering::Relaxed);
        Var::internal(format!("{FRESH_PREFIX}{n}"))
    }

    /// Rename every variable of `rule` apart. See [`instantiate`].
    #[must_use]
    pub fn instantiate(&self, rule: &Rule) -> Rule {
        instantiate(self, rule)
    }

    /// Lazily solve a conjunction of goals.
    ///
    /// Nothing is computed until the returned iterator is pulled.
    pub fn query<I>(&self, goals: I) -> Solutions<'_>
    where
        I: IntoIterator<Item = Functor>,
    {
        search(self, goals)
    }

    /// Parse a query such as `node(X), edge(X, Y).` and solve it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`](crate::Error::Parse) if `query` is not a
    /// valid query.
    #[cfg(feature = "parsing")]
    pub fn query_str(&self, query: &str) -> Result<Solutions<'_>> {
        let goals = crate::parser::parse_query(query)?;
        Ok(self.query(goals))
    }

    /// Returns whether the goals have at least one solution.
    #[must_use]
    pub fn ask<I>(&self, goals: I) -> bool
    where
        I: IntoIterator<Item = Functor>,
    {
        self.query(goals).next().is_some()
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            declarations: self.declarations.clone(),
            fresh: AtomicU64::new(self.fresh_count()),
        }
    }
}

/// Databases are equal when they hold the same declarations in the same order.
impl PartialEq for Database {
    fn eq(&self, other: &Self) -> bool {
        self.declarations == other.declarations
    }
}

impl Eq for Database {}

impl From<Vec<Declaration>> for Database {
    fn from(declarations: Vec<Declaration>) -> Self {
        Self::new(declarations)
    }
}

impl FromIterator<Declaration> for Database {
    fn from_iter<I: IntoIterator<Item = Declaration>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(feature = "parsing")]
impl std::str::FromStr for Database {
    type Err = crate::Error;

    fn from_str(source: &str) -> Result<Self> {
        Self::from_source(source)
    }
}

/// Returns a copy of `rule` with every variable replaced by a fresh internal
/// one from `database`.
///
/// All occurrences of one name, in the head and in every body goal and at any
/// depth, map to the same fresh variable. Each call draws new numbers, so two
/// applications of the same rule never share variables.
#[must_use]
pub fn instantiate(database: &Database, rule: &Rule) -> Rule {
    let mut renamer = Renamer {
        database,
        renaming: IndexMap::new(),
    };
    let head = Fact(renamer.functor(&rule.head.0));
    let body = rule
        .body
        .iter()
        .map(|goal| Fact(renamer.functor(&goal.0)))
        .collect();
    Rule { head, body }
}

struct Renamer<'db> {
    database: &'db Database,
    /// Original name to its fresh replacement
    renaming: IndexMap<String, Var>,
}

impl Renamer<'_> {
    fn functor(&mut self, functor: &Functor) -> Functor {
        Functor {
            name: functor.name.clone(),
            args: functor.args.iter().map(|arg| self.value(arg)).collect(),
        }
    }

    fn value(&mut self, value: &Value) -> Value {
        match value {
            Value::Num(_) | Value::Atom(_) => value.clone(),
            Value::Var(var) => {
                let database = self.database;
                let fresh = self
                    .renaming
                    .entry(var.name().to_owned())
                    .or_insert_with(|| database.fresh_var());
                Value::Var(fresh.clone())
            }
            Value::Functor(functor) => Value::Functor(self.functor(functor)),
        }
    }
}
