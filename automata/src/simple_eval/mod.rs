/* Description: Left-to-right evaluation (parsing) methods.

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

//! Left-to-right evaluation (parsing) methods.
//!
//! Every evaluation runs against its own cache, so an automaton can be
//! simulated any number of times without mutating anything it owns.

/// Why an input was not accepted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Rejection {
  /// No transition existed for the input character at this offset.
  Stuck { at: usize },
  /// The whole input was consumed without ending in an accepting state.
  NotAccepting,
}

pub trait SearchState<Eval: ?Sized> {
  type Args;

  fn create(args: Self::Args) -> Self;
  fn reset(&mut self, eval: &Eval);
}

pub trait SimpleEvaluator<Cache: SearchState<Self>> {
  type Tok;
  type Success;
  type Err;

  fn create_cache(&self, args: Cache::Args) -> Cache {
    let mut cache = Cache::create(args);
    cache.reset(self);
    cache
  }

  fn evaluate(
    &self,
    cache: &mut Cache,
    tokens: impl Iterator<Item=Self::Tok>,
  ) -> Result<Self::Success, Self::Err>;
}


pub mod nfa {
  use indexmap::IndexSet;
  use log::trace;

  use super::{Rejection, SearchState, SimpleEvaluator};
  use crate::{
    nfa::{Nfa, State},
    FxBuildHasher,
  };

  /// The set of currently active NFA states.
  #[derive(Debug, Clone, Default)]
  pub struct NFACache {
    current_states: IndexSet<State, FxBuildHasher>,
  }

  impl NFACache {
    pub fn new() -> Self { Self::default() }

    pub fn current_states(&self) -> impl Iterator<Item=State>+'_ {
      self.current_states.iter().copied()
    }

    pub fn drain(&mut self) -> impl Iterator<Item=State>+'_ { self.current_states.drain(..) }

    fn replace(&mut self, states: impl IntoIterator<Item=State>) {
      self.current_states.clear();
      self.current_states.extend(states);
    }
  }

  impl SearchState<Nfa> for NFACache {
    type Args = ();

    fn create(_args: ()) -> Self { Self::new() }

    fn reset(&mut self, eval: &Nfa) {
      let initial_state = eval.start();
      assert!(eval.lookup_state(initial_state).is_some());
      self.replace(eval.epsilon_closure([initial_state]).iter().copied());
    }
  }

  impl SimpleEvaluator<NFACache> for Nfa {
    type Err = Rejection;
    type Success = ();
    type Tok = char;

    fn evaluate(
      &self,
      cache: &mut NFACache,
      tokens: impl Iterator<Item=char>,
    ) -> Result<(), Rejection> {
      cache.reset(self);
      for (at, c) in tokens.enumerate() {
        let current: Vec<State> = cache.drain().collect();
        let next = self.advance(&current, c);
        if next.is_empty() {
          trace!("NFA stuck on {:?} at {}", c, at);
          return Err(Rejection::Stuck { at });
        }
        cache.replace(next.iter().copied());
      }
      if cache.current_states.contains(&self.accept()) {
        Ok(())
      } else {
        Err(Rejection::NotAccepting)
      }
    }
  }

  #[cfg(test)]
  mod test {
    use thompson_regexp_syntax::parser::parse;

    use super::*;

    fn compile(pattern: &str) -> Nfa { Nfa::from_postfix(&parse(pattern).unwrap()).unwrap() }

    #[test]
    fn eval_simple() {
      let nfa = compile("ab*");
      let mut cache: NFACache = nfa.create_cache(());

      assert_eq!(nfa.evaluate(&mut cache, "abbb".chars()), Ok(()));
      assert_eq!(nfa.evaluate(&mut cache, "a".chars()), Ok(()));
      assert_eq!(
        nfa.evaluate(&mut cache, "abab".chars()),
        Err(Rejection::Stuck { at: 2 })
      );
      assert_eq!(
        nfa.evaluate(&mut cache, "".chars()),
        Err(Rejection::NotAccepting)
      );
    }

    #[test]
    fn reset_starts_from_closure() {
      let nfa = compile("a*");
      let cache: NFACache = nfa.create_cache(());
      let mut active: Vec<_> = cache.current_states().map(|s| s.as_usize()).collect();
      active.sort_unstable();
      assert_eq!(active, vec![0, 2, 3]);
    }

    #[test]
    fn cache_is_reusable() {
      let nfa = compile("(a|b)*abb");
      let mut cache = NFACache::new();
      for _ in 0..3 {
        assert!(nfa.evaluate(&mut cache, "babb".chars()).is_ok());
        assert!(nfa.evaluate(&mut cache, "bab".chars()).is_err());
      }
    }
  }
}

pub mod dfa {
  use log::trace;

  use super::{Rejection, SearchState, SimpleEvaluator};
  use crate::dfa::{DState, Dfa};

  /// The single current DFA state.
  #[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
  pub struct DFACache {
    current: Option<DState>,
  }

  impl DFACache {
    pub fn new() -> Self { Self::default() }

    pub fn current(&self) -> Option<DState> { self.current }
  }

  impl SearchState<Dfa> for DFACache {
    type Args = ();

    fn create(_args: ()) -> Self { Self::new() }

    fn reset(&mut self, eval: &Dfa) { self.current = Some(eval.start()); }
  }

  impl SimpleEvaluator<DFACache> for Dfa {
    type Err = Rejection;
    type Success = DState;
    type Tok = char;

    fn evaluate(
      &self,
      cache: &mut DFACache,
      tokens: impl Iterator<Item=char>,
    ) -> Result<DState, Rejection> {
      cache.reset(self);
      let mut state = self.start();
      for (at, c) in tokens.enumerate() {
        /* No backtracking: a missing edge is an immediate rejection. */
        let Some(next) = self.transition(state, c) else {
          trace!("DFA stuck in {} on {:?} at {}", state, c, at);
          cache.current = None;
          return Err(Rejection::Stuck { at });
        };
        state = next;
        cache.current = Some(state);
      }
      if self.is_accepting(state) {
        Ok(state)
      } else {
        Err(Rejection::NotAccepting)
      }
    }
  }

}
