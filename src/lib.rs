//! # Hornlog
//!
//! A small deductive query engine over facts and Horn-clause rules, solved by
//! depth-first SLD resolution.
//!
//! ## Features
//!
//! - First-order terms: integers, atoms, variables and nested functors
//! - Persistent binding environments shared between alternative branches
//! - Lazy, cancellable solution iterators
//! - Program and query text syntax (`parsing` feature)
//! - Serialization of terms and environments (`serde` feature)
//! - A `Stream` adapter over solutions (`async` feature)
//!
//! ## Example
//!
//! ```rust
//! use hornlog::{Database, Functor, Rule, Value};
//!
//! let mut db = Database::default();
//! db.add_fact(Functor::new("edge", vec![Value::Num(1), Value::Num(2)]));
//! db.add_fact(Functor::new("edge", vec![Value::Num(2), Value::Num(3)]));
//! // path(X, Y) :- edge(X, Y).
//! db.add_rule(Rule::new(
//!     Functor::new("path", vec![Value::var("X"), Value::var("Y")]),
//!     vec![Functor::new("edge", vec![Value::var("X"), Value::var("Y")])],
//! ));
//!
//! let answers: Vec<String> = db
//!     .query([Functor::new("path", vec![Value::Num(1), Value::var("Y")])])
//!     .materialized()
//!     .map(|env| env.to_string())
//!     .collect();
//! assert_eq!(answers, vec!["{Y = 2}"]);
//! ```

/// Facts, rules and renaming apart.
pub mod database;
/// Variable bindings.
pub mod env;
/// Error types.
pub mod error;
/// Directed graphs and their reachability programs.
pub mod graph;
/// Program and query text syntax.
#[cfg(feature = "parsing")]
pub mod parser;
pub mod search;
/// The term model.
pub mod term;
/// Syntactic unification.
pub mod unify;

pub use database::{instantiate, Database};
pub use env::{resolve, resolve_all, Environment};
pub use error::{Error, ParseError, Result, UnificationError};
pub use graph::Graph;
#[cfg(feature = "parsing")]
pub use parser::{parse_program, parse_query};
pub use search::{search, Solutions};
pub use term::{Declaration, Fact, Functor, Rule, Value, Var};
pub use unify::{unify, unify_functors};
