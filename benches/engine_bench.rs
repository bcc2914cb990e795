#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hornlog::{unify, Database, Declaration, Environment, Functor, Rule, Value};

fn cons(head: Value, tail: Value) -> Value {
    Value::functor("cons", vec![head, tail])
}

fn list(items: impl DoubleEndedIterator<Item = i64>) -> Value {
    items.rev().fold(Value::atom("nil"), |tail, n| cons(Value::Num(n), tail))
}

/// append(nil, Y, Y).
/// append(cons(X, Xs), Y, cons(X, Z)) :- append(Xs, Y, Z).
fn append_database() -> Database {
    let var = Value::var;
    let mut db = Database::default();
    db.add_fact(Functor::new("append", vec![Value::atom("nil"), var("Y"), var("Y")]));
    db.add_rule(Rule::new(
        Functor::new(
            "append",
            vec![cons(var("X"), var("Xs")), var("Y"), cons(var("X"), var("Z"))],
        ),
        vec![Functor::new("append", vec![var("Xs"), var("Y"), var("Z")])],
    ));
    db
}

/// Benchmark for unifying a long pattern list against a ground list
fn bench_unify_lists(c: &mut Criterion) {
    let ground = list(0..500);
    let pattern = (0..500)
        .rev()
        .fold(Value::atom("nil"), |tail, n| cons(Value::var(format!("V{n}")), tail));

    c.bench_function("unify_lists", |b| {
        b.iter(|| black_box(unify(&Environment::new(), &pattern, &ground)));
    });
}

/// Benchmark for renaming a rule apart
fn bench_instantiate(c: &mut Criterion) {
    let db = append_database();
    let Declaration::Rule(rule) = &db.declarations()[1] else {
        panic!("second declaration is the recursive append rule");
    };

    c.bench_function("instantiate_rule", |b| {
        b.iter(|| black_box(db.instantiate(rule)));
    });
}

/// Benchmark for a deep recursive derivation
fn bench_append(c: &mut Criterion) {
    let db = append_database();
    let goal = Functor::new("append", vec![list(0..200), list(200..210), Value::var("Z")]);

    c.bench_function("append_200", |b| {
        b.iter(|| black_box(db.query([goal.clone()]).materialized().next()));
    });
}

/// Benchmark for scanning many facts for a single match
fn bench_fact_scan(c: &mut Criterion) {
    let mut db = Database::default();
    for i in 0..10000 {
        db.add_fact(Functor::new(
            "large_relation",
            vec![Value::atom(format!("item_{i}")), Value::Num(i % 100)],
        ));
    }
    let goal = Functor::new(
        "large_relation",
        vec![Value::atom("item_9999"), Value::var("V")],
    );

    c.bench_function("fact_scan", |b| {
        b.iter(|| black_box(db.query([goal.clone()]).count()));
    });
}

criterion_group!(
    benches,
    bench_unify_lists,
    bench_instantiate,
    bench_append,
    bench_fact_scan
);
criterion_main!(benches);
