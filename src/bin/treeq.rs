use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser};
use serde_json::Value;
use tracing_subscriber::EnvFilter;
use treeql::json::{pattern_from_json, tree_from_json, tree_to_json};
use treeql::{Query, QueryConfig, Rewrite, Tree};

/// Find and rewrite subtrees of a JSON document that match a JSON pattern
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
  /// Pattern as JSON text, or @file to read it from a file.
  /// {"__treeql_variable__": "name"} marks a variable.
  pub pattern: String,
  /// JSON document to search, stdin if omitted
  pub input: Option<PathBuf>,
  /// Replace every match with this JSON value
  #[arg(long, conflicts_with = "remove")]
  pub replace: Option<String>,
  /// Remove every match from its parent
  #[arg(long)]
  pub remove: bool,
  /// Only print the number of matches
  #[arg(short, long)]
  pub count: bool,
  /// Print the variables bound by each match instead of the tree
  #[arg(short, long)]
  pub bindings: bool,
  /// Fail if the document is nested deeper than this
  #[arg(long)]
  pub max_depth: Option<usize>,
  /// Indent the output
  #[arg(long)]
  pub pretty: bool,
  /// Log more, repeat for even more
  #[arg(short, long, action = ArgAction::Count)]
  pub verbose: u8,
}

fn init_logging(verbose: u8) {
  let level = match verbose {
    0 => "warn",
    1 => "debug",
    _ => "trace",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
  tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn read_json(text: &str, what: &str) -> Result<Value, String> {
  serde_json::from_str(text).map_err(|e| format!("Invalid JSON in {what}: {e}"))
}

fn load_pattern(arg: &str) -> Result<Value, String> {
  match arg.strip_prefix('@') {
    Some(path) => {
      let text = fs::read_to_string(path).map_err(|e| format!("Cannot read {path}: {e}"))?;
      read_json(&text, path)
    },
    None => read_json(arg, "pattern"),
  }
}

fn load_input(input: Option<&PathBuf>) -> Result<Value, String> {
  let text = match input {
    Some(path) =>
      fs::read_to_string(path).map_err(|e| format!("Cannot read {}: {e}", path.display()))?,
    None => {
      let mut text = String::new();
      io::stdin().read_to_string(&mut text).map_err(|e| format!("Cannot read stdin: {e}"))?;
      text
    },
  };
  read_json(&text, "input")
}

fn print_json(value: &Value, pretty: bool) -> Result<(), String> {
  let text =
    if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
  println!("{}", text.map_err(|e| e.to_string())?);
  Ok(())
}

fn run(args: Args) -> Result<(), String> {
  let pattern = pattern_from_json(&load_pattern(&args.pattern)?).map_err(|e| e.to_string())?;
  let input = tree_from_json(&load_input(args.input.as_ref())?).map_err(|e| e.to_string())?;
  let replacement = match &args.replace {
    Some(text) => {
      let value = read_json(text, "replacement")?;
      Some(tree_from_json(&value).map_err(|e| e.to_string())?)
    },
    None => None,
  };
  let mut config = QueryConfig::new();
  if let Some(depth) = args.max_depth {
    config = config.with_max_depth(depth);
  }
  let mut bound = Vec::new();
  let out = Query::new(&pattern)
    .config(config)
    .on_match(|_: &mut Tree, bindings| {
      if args.bindings {
        bound.push(bindings.to_tree());
      }
      match (&replacement, args.remove) {
        (Some(tree), _) => Rewrite::Replace(tree.clone()),
        (None, true) => Rewrite::Remove,
        (None, false) => Rewrite::Keep,
      }
    })
    .run(&input)
    .map_err(|e| e.to_string())?;
  if args.count {
    println!("{}", out.matches);
    return Ok(());
  }
  if args.bindings {
    for bindings in &bound {
      print_json(&tree_to_json(bindings).map_err(|e| e.to_string())?, false)?;
    }
  } else {
    print_json(&tree_to_json(&out.tree).map_err(|e| e.to_string())?, args.pretty)?;
  }
  eprintln!("matches: {}", out.matches);
  Ok(())
}

pub fn main() {
  let args = Args::parse();
  init_logging(args.verbose);
  if let Err(e) = run(args) {
    eprintln!("treeq: {e}");
    process::exit(1);
  }
}
