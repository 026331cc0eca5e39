/* Description: Thompson NFAs, subset-constructed DFAs and their minimization.

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

//! Thompson NFAs, subset-constructed DFAs and their minimization.
//!
//! ```
//! use thompson_regexp_automata::{dfa::Dfa, nfa::Nfa};
//! use thompson_regexp_syntax::parser::parse;
//!
//! let nfa = Nfa::from_postfix(&parse("(a|b)*abb").unwrap()).unwrap();
//! let mut dfa = Dfa::from_nfa(&nfa);
//! dfa.minimize();
//! assert!(nfa.simulate("aabb"));
//! assert!(dfa.simulate("aabb"));
//! assert!(!dfa.simulate("abbb"));
//! ```

#![warn(rustdoc::missing_crate_level_docs)]
// #![warn(missing_docs)]
#![deny(unsafe_code)]
/* Ensure any doctest warnings fails the doctest! */
#![doc(test(attr(deny(warnings))))]

use core::hash::BuildHasherDefault;

use rustc_hash::FxHasher;

pub mod dfa;
pub mod graph;
pub mod label;
pub mod minimize;
pub mod nfa;
pub mod simple_eval;

pub(crate) type FxBuildHasher = BuildHasherDefault<FxHasher>;

pub mod alphabet {
  use core::fmt;

  /// The display form of [`Symbol::Epsilon`].
  pub const EPSILON: char = 'ε';

  /// An edge label. Epsilon only ever appears on NFA edges, and never in an
  /// automaton's alphabet.
  #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
  pub enum Symbol {
    Epsilon,
    Literal(char),
  }

  impl Symbol {
    pub const fn is_epsilon(&self) -> bool { matches!(self, Self::Epsilon) }
  }

  impl From<char> for Symbol {
    fn from(c: char) -> Self { Self::Literal(c) }
  }

  impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
      match self {
        Self::Epsilon => write!(f, "{}", EPSILON),
        Self::Literal(c) => write!(f, "{}", c),
      }
    }
  }
}

/* Each pattern's automata are self-contained, so independent patterns may be
 * compiled on separate threads. */
static_assertions::assert_impl_all!(nfa::Nfa: Send, Sync, Clone);
static_assertions::assert_impl_all!(dfa::Dfa: Send, Sync, Clone);
