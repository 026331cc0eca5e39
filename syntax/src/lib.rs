/* Description: Validation and postfix conversion of regexp pattern strings.

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

#![warn(rustdoc::missing_crate_level_docs)]
// #![warn(missing_docs)]
#![deny(unsafe_code)]
/* Ensure any doctest warnings fails the doctest! */
#![doc(test(attr(deny(warnings))))]

//! Validation and postfix conversion of regexp pattern strings.
//!
//! Patterns are built from literal characters, `|`, `*`, `+`, `?` and
//! parentheses. Concatenation has no source syntax, so [`parser::to_postfix`]
//! makes it explicit:
//!
//! ```
//! use thompson_regexp_syntax::parser::parse;
//!
//! assert_eq!(parse("(a|b)*abb").unwrap().to_string(), "ab|*a·b·b·");
//! assert!(parse("a|").is_err());
//! ```

pub mod ast;
pub mod parser;

pub use parser::{InvalidPattern, InvalidPatternKind};

/// Generators for valid patterns and candidate inputs, shared with the test
/// suites of downstream crates.
#[cfg(any(test, feature = "proptest"))]
pub mod strategies {
  use proptest::{collection::vec, prelude::*, sample::select};

  use crate::ast::postfix_operators::SimpleOperator;

  pub const ALPHABET: [char; 3] = ['a', 'b', 'c'];

  pub fn literal() -> impl Strategy<Value=char> { select(ALPHABET.to_vec()) }

  /// Structurally valid patterns. Every operand of a postfix operator or an
  /// alternation is parenthesized, so the output always passes validation.
  pub fn pattern() -> BoxedStrategy<String> {
    literal()
      .prop_map(|c| c.to_string())
      .prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
          (inner.clone(), any::<SimpleOperator>()).prop_map(|(e, op)| format!("({}){}", e, op)),
          vec(inner.clone(), 2..=3).prop_map(|es| es.concat()),
          vec(inner, 2..=3).prop_map(|es| format!("({})", es.join("|"))),
        ]
      })
      .boxed()
  }

  /// Candidate inputs over [`ALPHABET`], plus one character never used by
  /// [`pattern`].
  pub fn input(max_len: usize) -> impl Strategy<Value=String> {
    vec(select(vec!['a', 'b', 'c', 'z']), 0..=max_len).prop_map(|cs| cs.into_iter().collect())
  }
}
