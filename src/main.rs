//! Command-line front end: load a program file and print the answers to a query.
//!
//! ```text
//! hornlog <program> <query> [--limit N] [--json]
//! ```
//!
//! Set `RUST_LOG=debug` (or `trace`) to watch the search.

use std::env;
use std::fs;
use std::process;

use anyhow::{bail, Context, Result};
use hornlog::{Database, Environment};

struct Options {
    program: String,
    query: String,
    limit: Option<usize>,
    json: bool,
}

fn usage() -> ! {
    eprintln!("Usage: hornlog <program> <query> [--limit N] [--json]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --limit N   Stop after N solutions");
    eprintln!("  --json      Print one JSON object per solution");
    process::exit(2);
}

fn parse_args() -> Result<Options> {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut positional = Vec::new();
    let mut limit = None;
    let mut json = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => usage(),
            "--json" => json = true,
            "--limit" => {
                i += 1;
                let Some(value) = args.get(i) else {
                    bail!("--limit needs a value");
                };
                limit = Some(
                    value
                        .parse()
                        .with_context(|| format!("invalid --limit `{value}`"))?,
                );
            }
            arg if arg.starts_with("--") => bail!("unknown option `{arg}`"),
            arg => positional.push(arg.to_owned()),
        }
        i += 1;
    }

    let [program, query] = <[String; 2]>::try_from(positional).unwrap_or_else(|_| usage());
    Ok(Options {
        program,
        query,
        limit,
        json,
    })
}

fn print_solution(env: &Environment, json: bool) -> Result<()> {
    if json {
        #[cfg(feature = "serde")]
        {
            println!("{}", serde_json::to_string(env)?);
            return Ok(());
        }
        #[cfg(not(feature = "serde"))]
        bail!("--json needs the `serde` feature");
    }

    if env.is_empty() {
        println!("true.");
    } else {
        println!("{env}");
    }
    Ok(())
}

fn run(options: &Options) -> Result<()> {
    let source = fs::read_to_string(&options.program)
        .with_context(|| format!("failed to read {}", options.program))?;
    let database = Database::from_source(&source)
        .with_context(|| format!("failed to load {}", options.program))?;
    let solutions = database
        .query_str(&options.query)
        .context("failed to parse query")?
        .materialized()
        .take(options.limit.unwrap_or(usize::MAX));

    let mut found = 0usize;
    for env in solutions {
        print_solution(&env, options.json)?;
        found += 1;
    }
    if found == 0 && !options.json {
        println!("false.");
    }
    log::debug!("{found} solutions");
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let options = parse_args()?;
    run(&options)
}
