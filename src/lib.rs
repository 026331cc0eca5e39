/* Description: Compile regexp patterns into NFAs, DFAs and minimal DFAs.

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

//! Compile regexp patterns into NFAs, DFAs and minimal DFAs.
//!
//! ```
//! use thompson_regexp::Compiled;
//!
//! let mut c = Compiled::compile("(a|b)*abb").unwrap();
//! assert_eq!(c.postfix().to_string(), "ab|*a·b·b·");
//! assert_eq!(c.dfa().len(), 5);
//! c.minimize();
//! assert_eq!(c.dfa().len(), 4);
//! assert!(c.verdict("babb").is_match());
//! ```

#![warn(rustdoc::missing_crate_level_docs)]
// #![warn(missing_docs)]
#![deny(unsafe_code)]
/* Ensure any doctest warnings fails the doctest! */
#![doc(test(attr(deny(warnings))))]

pub mod batch;

pub use thompson_regexp_automata as automata;
use thompson_regexp_automata::{dfa::Dfa, nfa::Nfa};
pub use thompson_regexp_syntax as syntax;
use thompson_regexp_syntax::{ast::postfix::Postfix, parser, InvalidPattern};

/// Acceptance of one input by each automaton of a [`Compiled`] pattern.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Verdict {
  pub nfa: bool,
  pub dfa: bool,
}

impl Verdict {
  /// Both automata accepted.
  pub fn is_match(&self) -> bool { self.nfa && self.dfa }

  /// The automata disagreed, which should never happen for a correct
  /// construction.
  pub fn is_inconsistent(&self) -> bool { self.nfa != self.dfa }
}

/// Every stage of the pipeline for a single pattern.
#[derive(Debug, Clone)]
pub struct Compiled {
  pattern: String,
  postfix: Postfix,
  nfa: Nfa,
  dfa: Dfa,
}

impl Compiled {
  pub fn compile(pattern: &str) -> Result<Self, InvalidPattern> {
    let postfix = parser::parse(pattern)?;
    let nfa = Nfa::from_postfix(&postfix)?;
    let dfa = Dfa::from_nfa(&nfa);
    Ok(Self {
      pattern: pattern.to_string(),
      postfix,
      nfa,
      dfa,
    })
  }

  pub fn pattern(&self) -> &str { &self.pattern }

  pub fn postfix(&self) -> &Postfix { &self.postfix }

  pub fn nfa(&self) -> &Nfa { &self.nfa }

  /// The DFA, minimized or not depending on whether [`Self::minimize`] has
  /// been called.
  pub fn dfa(&self) -> &Dfa { &self.dfa }

  pub fn minimize(&mut self) -> &Dfa {
    self.dfa.minimize();
    &self.dfa
  }

  pub fn verdict(&self, input: &str) -> Verdict {
    Verdict {
      nfa: self.nfa.simulate(input),
      dfa: self.dfa.simulate(input),
    }
  }
}

static_assertions::assert_impl_all!(Compiled: Send, Sync, Clone);

#[cfg(test)]
mod test {
  use proptest::prelude::*;
  use thompson_regexp_syntax::{strategies, InvalidPatternKind};

  use super::*;

  #[test]
  fn pipeline() {
    let mut c = Compiled::compile("ab").unwrap();
    assert_eq!(c.pattern(), "ab");
    assert_eq!(c.postfix().to_string(), "ab·");
    assert_eq!(c.nfa().len(), 4);
    assert!(!c.dfa().is_minimized());
    assert!(c.minimize().is_minimized());
    assert_eq!(
      c.verdict("ab"),
      Verdict {
        nfa: true,
        dfa: true
      }
    );
    assert_eq!(
      c.verdict("a"),
      Verdict {
        nfa: false,
        dfa: false
      }
    );
  }

  #[test]
  fn rejects_invalid() {
    let err = Compiled::compile("a|").unwrap_err();
    assert_eq!(err.kind, InvalidPatternKind::MissingRightOperand('|'));
    assert_eq!(err.at, 1);
    assert_eq!(
      Compiled::compile("").unwrap_err().kind,
      InvalidPatternKind::Empty
    );
  }

  #[test]
  fn scenarios() {
    let cases: &[(&str, &[&str], &[&str])] = &[
      ("a|b", &["a", "b"], &["ab", ""]),
      ("a*", &["", "aaaa"], &["b"]),
      ("a+", &["a", "aa"], &[""]),
      ("a?", &["", "a"], &["aa"]),
      ("(a|b)*abb", &["abb", "aabb", "babb"], &["ab", "abbb"]),
      ("ab*c", &["ac", "abbbc"], &["ab", "abcc"]),
    ];
    for (pattern, accepted, rejected) in cases.iter() {
      let mut c = Compiled::compile(pattern).unwrap();
      for _ in 0..2 {
        for s in accepted.iter() {
          assert!(c.verdict(s).is_match(), "{} on {:?}", pattern, s);
        }
        for s in rejected.iter() {
          let v = c.verdict(s);
          assert!(!v.nfa && !v.dfa, "{} on {:?}", pattern, s);
        }
        c.minimize();
      }
    }
  }

  proptest! {
    #[test]
    fn verdicts_consistent(p in strategies::pattern(), s in strategies::input(10)) {
      let mut c = Compiled::compile(&p).unwrap();
      prop_assert!(!c.verdict(&s).is_inconsistent());
      c.minimize();
      prop_assert!(!c.verdict(&s).is_inconsistent());
    }
  }
}
