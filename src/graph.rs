use indexmap::{IndexMap, IndexSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::term::{Declaration, Functor, Rule, Value};

/// A directed graph over integer nodes, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Graph {
    /// Each node's successors
    adjacency: IndexMap<i64, IndexSet<i64>>,
}

impl Graph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the edge `from -> to`. Returns false if it was already present.
    pub fn add_edge(&mut self, from: i64, to: i64) -> bool {
        self.adjacency.entry(from).or_default().insert(to)
    }

    /// Successors of `node`, in insertion order.
    pub fn neighbours(&self, node: i64) -> impl Iterator<Item = i64> + '_ {
        self.adjacency
            .get(&node)
            .into_iter()
            .flat_map(|targets| targets.iter().copied())
    }

    /// All edges, grouped by source node.
    pub fn edges(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.adjacency
            .iter()
            .flat_map(|(&from, targets)| targets.iter().map(move |&to| (from, to)))
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(IndexSet::len).sum()
    }

    /// Lazily visit every node reachable from `start`, `start` included.
    ///
    /// Depth-first, each node at most once, so cycles are fine.
    #[must_use]
    pub fn transitive_closure(&self, start: i64) -> Closure<'_> {
        Closure {
            graph: self,
            stack: vec![start],
            seen: IndexSet::new(),
        }
    }

    /// One `predicate(from, to)` fact per edge.
    #[must_use]
    pub fn edge_facts(&self, predicate: &str) -> Vec<Declaration> {
        self.edges()
            .map(|(from, to)| {
                Declaration::classify(Functor::new(predicate, vec![from.into(), to.into()]))
            })
            .collect()
    }

    /// A database answering `path(From, To)` over this graph's `edge` facts.
    ///
    /// The `path` rules are right-recursive, so queries terminate on acyclic
    /// graphs; on cyclic graphs pull a bounded number of solutions.
    #[must_use]
    pub fn reachability_database(&self) -> Database {
        let var = Value::var;
        let mut declarations = self.edge_facts("edge");
        // path(X, Y) :- edge(X, Y).
        declarations.push(Declaration::Rule(Rule::new(
            Functor::new("path", vec![var("X"), var("Y")]),
            vec![Functor::new("edge", vec![var("X"), var("Y")])],
        )));
        // path(X, Z) :- edge(X, Y), path(Y, Z).
        declarations.push(Declaration::Rule(Rule::new(
            Functor::new("path", vec![var("X"), var("Z")]),
            vec![
                Functor::new("edge", vec![var("X"), var("Y")]),
                Functor::new("path", vec![var("Y"), var("Z")]),
            ],
        )));
        Database::new(declarations)
    }
}

impl FromIterator<(i64, i64)> for Graph {
    fn from_iter<I: IntoIterator<Item = (i64, i64)>>(iter: I) -> Self {
        let mut graph = Graph::new();
        for (from, to) in iter {
            graph.add_edge(from, to);
        }
        graph
    }
}

/// Iterator returned by [`Graph::transitive_closure`].
#[derive(Debug)]
pub struct Closure<'g> {
    graph: &'g Graph,
    stack: Vec<i64>,
    seen: IndexSet<i64>,
}

impl Iterator for Closure<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        while let Some(node) = self.stack.pop() {
            if !self.seen.insert(node) {
                continue;
            }
            self.stack.extend(self.graph.neighbours(node));
            return Some(node);
        }
        None
    }
}
