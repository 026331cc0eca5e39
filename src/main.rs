/* Description: Command-line driver over a file of patterns.

Copyright (C) 2024 Danny McClanahan <dmcC2@hypnicjerk.ai>
SPDX-License-Identifier: GPL-3.0-or-later

This file is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as
published by the Free Software Foundation; either version 3 of the
License, or (at your option) any later version.

This file is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <https://www.gnu.org/licenses/>. */

//! Command-line driver over a file of patterns.
//!
//! `thompson-regexp [--dot] [--batch] <FILE>`
//!
//! Set `RUST_LOG=thompson_regexp_automata=trace` to follow each construction.

use std::{env, fmt, process::ExitCode};

use displaydoc::Display;
use log::info;
use rustyline::{error::ReadlineError, Editor};
use thiserror::Error;
use thompson_regexp::{
  automata::{
    dfa::Dfa,
    graph::{AsGraph, GraphView},
    nfa::Nfa,
  },
  batch::{BatchEntry, BatchError, PatternSource},
  Compiled,
};

#[derive(Debug, Display, Error)]
enum CliError {
  /// usage: thompson-regexp [--dot] [--batch] <FILE>
  Usage,
  /// {0}
  Batch(#[from] BatchError),
  /// line editor failed: {0}
  Readline(#[from] ReadlineError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
  dot: bool,
  batch: bool,
  path: String,
}

impl Args {
  fn parse(args: impl IntoIterator<Item=String>) -> Result<Self, CliError> {
    let mut dot = false;
    let mut batch = false;
    let mut path: Option<String> = None;
    for arg in args {
      match arg.as_str() {
        "--dot" => dot = true,
        "--batch" => batch = true,
        s if s.starts_with("--") => return Err(CliError::Usage),
        _ if path.is_some() => return Err(CliError::Usage),
        _ => path = Some(arg),
      }
    }
    let path = path.ok_or(CliError::Usage)?;
    Ok(Self { dot, batch, path })
  }
}

/// Graphviz rendering of a [`GraphView`].
struct Dot<'a> {
  name: &'a str,
  view: &'a GraphView,
}

impl fmt::Display for Dot<'_> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    writeln!(f, "digraph {} {{", self.name)?;
    writeln!(f, "  rankdir=LR;")?;
    writeln!(f, "  __start [shape=point];")?;
    for node in self.view.nodes.iter() {
      let shape = if node.accept { "doublecircle" } else { "circle" };
      writeln!(f, "  \"{}\" [shape={}];", node.label, shape)?;
      if node.start {
        writeln!(f, "  __start -> \"{}\";", node.label)?;
      }
    }
    for edge in self.view.edges.iter() {
      writeln!(
        f,
        "  \"{}\" -> \"{}\" [label=\"{}\"];",
        edge.source, edge.target, edge.symbol
      )?;
    }
    write!(f, "}}")
  }
}

fn summarize_nfa(nfa: &Nfa) -> String {
  format!(
    "{} states, start {}, accept {}, alphabet {:?}",
    nfa.len(),
    nfa.start(),
    nfa.accept(),
    nfa.alphabet()
  )
}

fn summarize_dfa(dfa: &Dfa) -> String {
  let accepting: Vec<String> = dfa
    .states()
    .filter(|(_, _, node)| node.is_accepting())
    .map(|(_, label, _)| format!("{{{}}}", label))
    .collect();
  let start = dfa
    .label(dfa.start())
    .map(|l| l.to_string())
    .unwrap_or_default();
  format!(
    "{} states, start {{{}}}, accepting [{}]",
    dfa.len(),
    start,
    accepting.join(", ")
  )
}

fn report(compiled: &mut Compiled, dot: bool) {
  println!("Original: {}", compiled.pattern());
  println!("Postfix: {}", compiled.postfix());
  if dot {
    println!("{}", Dot {
      name: "nfa",
      view: &compiled.nfa().as_graph(),
    });
    println!("{}", Dot {
      name: "dfa",
      view: &compiled.dfa().as_graph(),
    });
    println!("{}", Dot {
      name: "min_dfa",
      view: &compiled.minimize().as_graph(),
    });
  } else {
    println!("NFA: {}", summarize_nfa(compiled.nfa()));
    println!("DFA: {}", summarize_dfa(compiled.dfa()));
    println!("Minimized DFA: {}", summarize_dfa(compiled.minimize()));
  }
}

fn verdict_word(accepted: bool) -> &'static str {
  if accepted {
    "accepted"
  } else {
    "rejected"
  }
}

/// Test strings against `compiled` until the user interrupts or closes input.
fn interact(rl: &mut Editor<()>, compiled: &Compiled) -> Result<(), CliError> {
  println!("Enter strings to test against {} (Ctrl-C or Ctrl-D for the next pattern)", compiled.pattern());
  loop {
    match rl.readline("string > ") {
      Ok(line) => {
        let verdict = compiled.verdict(&line);
        println!(
          "NFA: {}  DFA: {}",
          verdict_word(verdict.nfa),
          verdict_word(verdict.dfa)
        );
        rl.add_history_entry(line);
      },
      Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
      Err(e) => return Err(e.into()),
    }
  }
  Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
  let source = PatternSource::open(&args.path)?;
  let mut rl = if args.batch {
    None
  } else {
    Some(Editor::<()>::new()?)
  };
  let (mut ok, mut invalid) = (0usize, 0usize);
  for entry in source.entries() {
    let BatchEntry {
      line,
      pattern,
      result,
    } = entry?;
    match result {
      Ok(mut compiled) => {
        ok += 1;
        report(&mut compiled, args.dot);
        if let Some(rl) = rl.as_mut() {
          interact(rl, &compiled)?;
        }
      },
      Err(e) => {
        invalid += 1;
        println!("line {}: {:?} is invalid: {}", line, pattern, e);
      },
    }
    println!();
  }
  info!("{} patterns compiled, {} invalid", ok, invalid);
  Ok(())
}

fn main() -> ExitCode {
  env_logger::init();

  let result = Args::parse(env::args().skip(1)).and_then(run);
  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("error: {}", e);
      ExitCode::FAILURE
    },
  }
}

#[cfg(test)]
mod test {
  use super::*;

  fn args(xs: &[&str]) -> Result<Args, CliError> { Args::parse(xs.iter().map(|s| s.to_string())) }

  #[test]
  fn parse_args() {
    assert_eq!(args(&["patterns.txt"]).unwrap(), Args {
      dot: false,
      batch: false,
      path: "patterns.txt".to_string(),
    });
    assert_eq!(args(&["--batch", "p", "--dot"]).unwrap(), Args {
      dot: true,
      batch: true,
      path: "p".to_string(),
    });
    assert!(matches!(args(&[]), Err(CliError::Usage)));
    assert!(matches!(args(&["a", "b"]), Err(CliError::Usage)));
    assert!(matches!(args(&["--verbose", "a"]), Err(CliError::Usage)));
  }

  #[test]
  fn dot_output() {
    let compiled = Compiled::compile("a").unwrap();
    let view = compiled.dfa().as_graph();
    let rendered = Dot {
      name: "dfa",
      view: &view,
    }
    .to_string();
    assert!(rendered.starts_with("digraph dfa {\n"));
    assert!(rendered.contains("  __start -> \"0\";\n"));
    assert!(rendered.contains("[shape=doublecircle];"));
    assert!(rendered.contains("[label=\"a\"];"));
    assert!(rendered.ends_with('}'));
  }

  #[test]
  fn summaries() {
    let mut compiled = Compiled::compile("a*").unwrap();
    assert_eq!(
      summarize_nfa(compiled.nfa()),
      "4 states, start 2, accept 3, alphabet ['a']"
    );
    assert_eq!(
      summarize_dfa(compiled.minimize()),
      "1 states, start {0=2=3}, accepting [{0=2=3}]"
    );
    assert_eq!(verdict_word(true), "accepted");
  }
}
