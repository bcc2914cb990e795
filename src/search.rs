//! # Depth-first SLD resolution
//!
//! [`search`] turns a conjunction of goals into a lazy [`Solutions`] iterator.
//! The iterator keeps an explicit stack of choice points instead of recursing,
//! so the proof depth it can handle is bounded by heap memory, not by the call
//! stack, and it does no work until the next solution is requested.
//!
//! Clauses are tried in database order and goals are solved left to right, so
//! the order of solutions is fully determined by the program text.

use std::fmt;
use std::sync::Arc;

use log::{debug, trace};

use crate::database::Database;
use crate::env::Environment;
use crate::term::{Declaration, Fact, Functor, Rule};
use crate::unify::unify_functors;

/// Lazily solve `goals` against `database`.
///
/// Each item is an environment under which all goals hold. Environments
/// contain the raw bindings, including those of internal variables; use
/// [`Environment::resolve_all`] or [`Solutions::materialized`] to get
/// display-ready answers.
///
/// The search is depth-first and has no cycle detection: a left-recursive
/// program can run forever, so pull only as many solutions as you need.
pub fn search<I>(database: &Database, goals: I) -> Solutions<'_>
where
    I: IntoIterator<Item = Functor>,
{
    let goals: Vec<Functor> = goals.into_iter().collect();
    debug!(
        "query `{}` against {} declarations",
        DisplayGoals(&goals),
        database.len()
    );

    Solutions {
        database,
        stack: vec![Frame {
            goals: Goals::default().prepend(goals),
            env: Environment::new(),
            next: 0,
        }],
    }
}

/// Iterator over every solution of a query, in search order.
///
/// Dropping it cancels the search; it holds nothing that needs releasing.
#[derive(Debug)]
pub struct Solutions<'db> {
    database: &'db Database,
    /// Choice points, innermost last
    stack: Vec<Frame>,
}

/// A state of the goal machine together with the next clause to try.
#[derive(Debug)]
struct Frame {
    /// Goals still to prove, leftmost first
    goals: Goals,
    /// Bindings accumulated on the way to this state
    env: Environment,
    /// Index of the next declaration to try against the first goal
    next: usize,
}

impl<'db> Solutions<'db> {
    /// Materialize every solution with [`Environment::resolve_all`].
    pub fn materialized(self) -> impl Iterator<Item = Environment> + 'db {
        self.map(|env| env.resolve_all())
    }

    /// Adapt the iterator into a [`futures::Stream`].
    ///
    /// The stream is always ready; each poll runs the search up to the next
    /// solution.
    #[cfg(feature = "async")]
    pub fn into_stream(self) -> impl futures::Stream<Item = Environment> + 'db {
        futures::stream::iter(self)
    }

    /// Try `declaration` against the first goal of a frame.
    ///
    /// Returns the successor state, or `None` when the clause does not apply.
    fn expand(
        &self,
        goal: &Functor,
        rest: &Goals,
        env: &Environment,
        declaration: &Declaration,
    ) -> Option<Frame> {
        if !goal.same_signature(declaration.head()) {
            return None;
        }
        trace!("trying `{declaration}` for `{goal}`");

        let (unified, goals) = match declaration {
            Declaration::Fact(Fact(fact)) => (unify_functors(env, goal, fact), rest.clone()),
            Declaration::Rule(rule) => {
                let Rule { head, body } = self.database.instantiate(rule);
                let unified = unify_functors(env, goal, &head.0);
                (unified, rest.prepend(body.into_iter().map(|fact| fact.0)))
            }
        };

        match unified {
            Ok(env) => Some(Frame {
                goals,
                env,
                next: 0,
            }),
            Err(err) => {
                trace!("rejected: {err}");
                None
            }
        }
    }
}

impl Iterator for Solutions<'_> {
    type Item = Environment;

    fn next(&mut self) -> Option<Self::Item> {
        let database = self.database;
        let declarations = database.declarations();

        while let Some(mut frame) = self.stack.pop() {
            let Some((goal, rest)) = frame.goals.split_first() else {
                debug!("solution {}", frame.env);
                return Some(frame.env);
            };
            let Some(declaration) = declarations.get(frame.next) else {
                // every clause tried: backtrack
                continue;
            };
            frame.next += 1;

            let child = self.expand(goal, rest, &frame.env, declaration);
            if frame.next < declarations.len() {
                self.stack.push(frame);
            }
            if let Some(child) = child {
                self.stack.push(child);
            }
        }
        None
    }
}

/// Persistent goal list: rule bodies are pushed in front of the pending
/// goals while every older frame keeps its own view of the list.
#[derive(Debug, Clone, Default)]
struct Goals(Option<Arc<GoalNode>>);

#[derive(Debug)]
struct GoalNode {
    goal: Functor,
    rest: Goals,
}

impl Goals {
    fn split_first(&self) -> Option<(&Functor, &Goals)> {
        self.0.as_deref().map(|node| (&node.goal, &node.rest))
    }

    /// `goals ++ self`
    fn prepend<I>(&self, goals: I) -> Goals
    where
        I: IntoIterator<Item = Functor>,
        I::IntoIter: DoubleEndedIterator,
    {
        goals.into_iter().rev().fold(self.clone(), |rest, goal| {
            Goals(Some(Arc::new(GoalNode { goal, rest })))
        })
    }
}

/// Unlinks the list in a loop; a recursive drop of a long list would
/// overflow the stack.
impl Drop for Goals {
    fn drop(&mut self) {
        let mut next = self.0.take();
        while let Some(node) = next {
            next = Arc::try_unwrap(node)
                .ok()
                .and_then(|mut node| node.rest.0.take());
        }
    }
}

struct DisplayGoals<'a>(&'a [Functor]);

impl fmt::Display for DisplayGoals<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, goal) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{goal}")?;
        }
        f.write_str(".")
    }
}
