//! Text syntax for programs and queries.
//!
//! ```text
//! % comment to end of line
//! node(1).
//! edge(1, 3).
//! path(X, Y) :- edge(X, Y).
//! path(X, Z) :- edge(X, Y), path(Y, Z).
//! ```
//!
//! Lowercase-leading identifiers are atoms (or functor names), uppercase-leading
//! identifiers are variables and digit sequences are integers. A bare clause
//! that mentions a variable is loaded as a rule with an empty body.

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while};
use nom::character::complete::{char as pchar, digit1, multispace1, not_line_ending, satisfy};
use nom::combinator::{map, map_res, recognize, value};
use nom::multi::{many0, many0_count, separated_list1};
use nom::sequence::{delimited, pair, preceded, terminated};
use nom::IResult;

use crate::error::ParseError;
use crate::term::{Declaration, Functor, Rule, Value};

/// Parse a whole program into declarations, in source order.
///
/// # Errors
///
/// Returns a [`ParseError`] pointing at the first clause that cannot be parsed.
pub fn parse_program(source: &str) -> Result<Vec<Declaration>, ParseError> {
    match preceded(blank, many0(terminated(declaration, blank)))(source) {
        Ok(("", declarations)) => Ok(declarations),
        Ok((remaining, _)) => {
            let at = match declaration(remaining) {
                Err(nom::Err::Error(e) | nom::Err::Failure(e)) => e.input,
                _ => remaining,
            };
            Err(unexpected(source, at))
        }
        Err(err) => Err(from_nom(source, err)),
    }
}

/// Parse a conjunctive query such as `node(X), edge(X, Y).`
///
/// # Errors
///
/// Returns a [`ParseError`] if the text is not a comma-separated list of
/// functor applications terminated by a period.
pub fn parse_query(source: &str) -> Result<Vec<Functor>, ParseError> {
    match delimited(blank, terminated(goals, pchar('.')), blank)(source) {
        Ok(("", goals)) => Ok(goals),
        Ok((remaining, _)) => Err(unexpected(source, remaining)),
        Err(err) => Err(from_nom(source, err)),
    }
}

fn declaration(input: &str) -> IResult<&str, Declaration> {
    let (input, head) = ws(functor)(input)?;
    let (input, body) = alt((
        map(preceded(tag(":-"), terminated(goals, pchar('.'))), Some),
        map(pchar('.'), |_| None),
    ))(input)?;

    let declaration = match body {
        Some(body) => Declaration::Rule(Rule::new(head, body)),
        None => Declaration::classify(head),
    };
    Ok((input, declaration))
}

fn goals(input: &str) -> IResult<&str, Vec<Functor>> {
    separated_list1(pchar(','), ws(functor))(input)
}

fn functor(input: &str) -> IResult<&str, Functor> {
    map(
        pair(
            name,
            delimited(
                ws(pchar('(')),
                separated_list1(pchar(','), ws(term)),
                pchar(')'),
            ),
        ),
        |(name, args)| Functor::new(name, args),
    )(input)
}

fn term(input: &str) -> IResult<&str, Value> {
    alt((
        map(functor, Value::Functor),
        map(map_res(digit1, str::parse::<i64>), Value::Num),
        map(name, Value::atom),
        map(variable, Value::var),
    ))(input)
}

fn name(input: &str) -> IResult<&str, &str> {
    recognize(pair(satisfy(|c| c.is_ascii_lowercase()), identifier_tail))(input)
}

fn variable(input: &str) -> IResult<&str, &str> {
    recognize(pair(satisfy(|c| c.is_ascii_uppercase()), identifier_tail))(input)
}

fn identifier_tail(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

/// Whitespace and `%` line comments.
fn blank(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0_count(alt((multispace1, preceded(pchar('%'), not_line_ending)))),
    )(input)
}

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(blank, inner, blank)
}

fn unexpected(source: &str, at: &str) -> ParseError {
    let found: String = at.lines().next().unwrap_or_default().chars().take(20).collect();
    if found.is_empty() {
        ParseError::at(source, at, "unexpected end of input")
    } else {
        ParseError::at(source, at, format!("unexpected `{found}`"))
    }
}

fn from_nom(source: &str, err: nom::Err<nom::error::Error<&str>>) -> ParseError {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => unexpected(source, e.input),
        nom::Err::Incomplete(_) => ParseError::at(source, "", "unexpected end of input"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::env::Environment;
    use crate::error::Error;
    use crate::term::{Fact, Var};

    fn num(n: i64) -> Value {
        Value::Num(n)
    }

    fn app(name: &str, args: Vec<Value>) -> Functor {
        Functor::new(name, args)
    }

    const GRAPH: &str = "
        node(1).
        node(2).
        node(3).
        node(4).
        edge(1, 3).
        edge(2, 4).
        edge(3, 2).
        path(X, Y) :- edge(X, Y).
        path(X, Z) :- edge(X, Y), path(Y, Z).
    ";

    #[test]
    fn test_fact() {
        assert_eq!(
            parse_program("a(b, 1).").unwrap(),
            vec![Declaration::Fact(Fact(app("a", vec![Value::atom("b"), num(1)])))]
        );
    }

    #[test]
    fn test_fact_with_variable_becomes_rule() {
        assert_eq!(
            parse_program("a(X, 1).").unwrap(),
            vec![Declaration::Rule(Rule::new(
                app("a", vec![Value::var("X"), num(1)]),
                vec![]
            ))]
        );
    }

    #[test]
    fn test_rule_with_nested_functor() {
        assert_eq!(
            parse_program("a(X, 1) :- b(path(1, X)), c(2).").unwrap(),
            vec![Declaration::Rule(Rule::new(
                app("a", vec![Value::var("X"), num(1)]),
                vec![
                    app("b", vec![Value::functor("path", vec![num(1), Value::var("X")])]),
                    app("c", vec![num(2)]),
                ]
            ))]
        );
    }

    #[test]
    fn test_query() {
        assert_eq!(
            parse_query("a(1), c(2).").unwrap(),
            vec![app("a", vec![num(1)]), app("c", vec![num(2)])]
        );
    }

    #[test]
    fn test_whitespace_and_comments() {
        let source = "
            % the graph
            edge( 1 ,3 ) .   % trailing comment
            path(X,Y):-
                edge(X,Y).
        ";
        let program = parse_program(source).unwrap();
        assert_eq!(program.len(), 2);
        assert_eq!(program[1].to_string(), "path(X, Y) :- edge(X, Y).");
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(parse_program("").unwrap(), vec![]);
        assert_eq!(parse_program("  % nothing here\n").unwrap(), vec![]);
    }

    #[test]
    fn test_identifier_classes() {
        let goals = parse_query("p(abc, Abc, aBC_1, X_y, 42).").unwrap();
        assert_eq!(
            goals[0].args,
            vec![
                Value::atom("abc"),
                Value::var("Abc"),
                Value::atom("aBC_1"),
                Value::var("X_y"),
                num(42),
            ]
        );
    }

    #[test]
    fn test_reserved_fresh_names_are_not_parseable() {
        assert!(parse_query("p(_G0).").is_err());
        assert!(parse_program("p(_G0).").is_err());
    }

    #[test]
    fn test_missing_period_reports_position() {
        let err = parse_program("node(1).\nnode(2) node(3).").unwrap_err();
        assert_eq!((err.line, err.column), (2, 9));
        assert_eq!(err.message, "unexpected `node(3).`");
    }

    #[test]
    fn test_empty_argument_list_is_rejected() {
        assert!(parse_program("f().").is_err());
        assert!(parse_query("f().").is_err());
    }

    #[test]
    fn test_query_requires_period() {
        let err = parse_query("node(X)").unwrap_err();
        assert_eq!(err.message, "unexpected end of input");
        assert!(parse_query("").is_err());
        assert!(parse_query("node(X). extra").is_err());
    }

    #[test]
    fn test_number_overflow_is_an_error() {
        assert!(parse_query("n(99999999999999999999).").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let program = parse_program(GRAPH).unwrap();
        let printed: String = program.iter().map(|d| format!("{d}\n")).collect();
        assert_eq!(parse_program(&printed).unwrap(), program);
    }

    #[test]
    fn test_database_from_program() {
        let db = Database::from_source(GRAPH).unwrap();
        let x = || Value::var("X");
        let y = || Value::var("Y");
        let z = || Value::var("Z");

        let mut expected: Vec<Declaration> = (1..=4)
            .map(|n| Declaration::classify(app("node", vec![num(n)])))
            .collect();
        expected.extend(
            [(1, 3), (2, 4), (3, 2)]
                .map(|(a, b)| Declaration::classify(app("edge", vec![num(a), num(b)]))),
        );
        expected.push(Declaration::Rule(Rule::new(
            app("path", vec![x(), y()]),
            vec![app("edge", vec![x(), y()])],
        )));
        expected.push(Declaration::Rule(Rule::new(
            app("path", vec![x(), z()]),
            vec![app("edge", vec![x(), y()]), app("path", vec![y(), z()])],
        )));

        assert_eq!(db, Database::new(expected));
        assert_eq!(GRAPH.parse::<Database>().unwrap(), db);
    }

    #[test]
    fn test_query_str_join() {
        let db = Database::from_source(GRAPH).unwrap();
        let result: Vec<String> = db
            .query_str("node(X), edge(X, Y), node(Y).")
            .unwrap()
            .map(|env| env.to_string())
            .collect();
        assert_eq!(
            result,
            vec!["{X = 1, Y = 3}", "{X = 2, Y = 4}", "{X = 3, Y = 2}"]
        );
    }

    #[test]
    fn test_query_str_append() {
        let db = Database::from_source(
            "
            append(nil, Y, Y).
            append(cons(X, Xs), Y, cons(X, Z)) :- append(Xs, Y, Z).
            ",
        )
        .unwrap();

        let result: Vec<_> = db
            .query_str("append(cons(1, nil), cons(2, cons(3, nil)), Z).")
            .unwrap()
            .materialized()
            .collect();
        let expected = parse_query("l(cons(1, cons(2, cons(3, nil)))).").unwrap();
        assert_eq!(
            result,
            vec![Environment::from([(Var::new("Z"), expected[0].args[0].clone())])]
        );

        let result: Vec<_> = db
            .query_str("append(cons(1, nil), Z, cons(1, cons(2, nil))).")
            .unwrap()
            .materialized()
            .map(|env| env.to_string())
            .collect();
        assert_eq!(result, vec!["{Z = cons(2, nil)}"]);
    }

    #[test]
    fn test_query_str_syntax_error() {
        let db = Database::from_source(GRAPH).unwrap();
        assert!(matches!(db.query_str("node(X"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_syntax_error_in_database() {
        let err = Database::from_source("node(1).\nedge(1, ).").unwrap_err();
        assert!(matches!(&err, Error::Parse(inner) if inner.line == 2), "{err:?}");
    }
}
