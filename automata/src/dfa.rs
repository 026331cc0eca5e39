/* Description: Deterministic finite automata built by subset construction.

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

//! Deterministic finite automata built by subset construction.

use core::fmt;

use indexmap::IndexMap;
use log::debug;

pub use crate::label::Label;
use crate::{nfa::Nfa, FxBuildHasher};

mod subset {
  use std::collections::VecDeque;

  use indexmap::{map::Entry, IndexMap};
  use log::trace;

  use super::{DState, Dfa, DfaNode};
  use crate::{label::Label, nfa::Nfa, FxBuildHasher};

  /// Owns the label memo and the queue of states still to be expanded for a
  /// single construction.
  pub struct SubsetBuilder<'n> {
    nfa: &'n Nfa,
    states: IndexMap<Label, DfaNode, FxBuildHasher>,
    unexpanded: VecDeque<DState>,
  }

  impl<'n> SubsetBuilder<'n> {
    pub fn new(nfa: &'n Nfa) -> Self {
      Self {
        nfa,
        states: IndexMap::default(),
        unexpanded: VecDeque::new(),
      }
    }

    /// Look up the state for `label`, materializing and enqueueing it on a memo
    /// miss. Each label is therefore enqueued, and expanded, exactly once.
    fn intern(&mut self, label: Label) -> DState {
      match self.states.entry(label) {
        Entry::Occupied(e) => DState(e.index()),
        Entry::Vacant(e) => {
          let state = DState(e.index());
          let accept = e.key().contains(self.nfa.accept());
          trace!("new DFA state {} = {{{}}} (accept: {})", state, e.key(), accept);
          e.insert(DfaNode::new(accept));
          self.unexpanded.push_back(state);
          state
        },
      }
    }

    fn expand(&mut self, state: DState) {
      let DState(index) = state;
      let Some((label, _)) = self.states.get_index(index) else {
        return;
      };
      let label = label.clone();
      for &c in self.nfa.alphabet() {
        let next = self.nfa.advance(label.states(), c);
        /* An empty set means no transition: implicit rejection. */
        if next.is_empty() {
          continue;
        }
        let target = self.intern(next);
        self.states[index].trans.insert(c, target);
      }
    }

    pub fn build(mut self) -> Dfa {
      let initial = self.nfa.epsilon_closure([self.nfa.start()]);
      let start = self.intern(initial);
      while let Some(state) = self.unexpanded.pop_front() {
        self.expand(state);
      }
      Dfa {
        states: self.states,
        start,
        alphabet: self.nfa.alphabet().into(),
        minimized: false,
      }
    }
  }
}

/// An index into the state table of one [`Dfa`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct DState(pub(crate) usize);

impl DState {
  pub const fn as_usize(self) -> usize { self.0 }
}

impl fmt::Display for DState {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "D{}", self.0) }
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct DfaNode {
  pub(crate) accept: bool,
  pub(crate) trans: IndexMap<char, DState, FxBuildHasher>,
}

impl DfaNode {
  pub(crate) fn new(accept: bool) -> Self {
    Self {
      accept,
      trans: IndexMap::default(),
    }
  }

  pub fn is_accepting(&self) -> bool { self.accept }

  pub fn transition(&self, c: char) -> Option<DState> { self.trans.get(&c).copied() }

  pub fn transitions(&self) -> impl Iterator<Item=(char, DState)>+'_ {
    self.trans.iter().map(|(c, s)| (*c, *s))
  }
}

impl fmt::Debug for DfaNode {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(
      f,
      "DfaNode {{ accept: {:?}, trans: {:?} }}",
      self.accept, &self.trans
    )
  }
}

/// A DFA keyed by canonical labels.
///
/// Before minimization each state is a reachable set of NFA states; afterwards
/// each state stands for a class of equivalent states, labelled by its
/// representative.
#[derive(Clone)]
pub struct Dfa {
  pub(crate) states: IndexMap<Label, DfaNode, FxBuildHasher>,
  pub(crate) start: DState,
  pub(crate) alphabet: Box<[char]>,
  pub(crate) minimized: bool,
}

impl Dfa {
  /// Subset construction.
  pub fn from_nfa(nfa: &Nfa) -> Self {
    let dfa = subset::SubsetBuilder::new(nfa).build();
    debug!(
      "built DFA from {}-state NFA: {} states",
      nfa.len(),
      dfa.len()
    );
    dfa
  }

  pub fn start(&self) -> DState { self.start }

  pub fn len(&self) -> usize { self.states.len() }

  pub fn alphabet(&self) -> &[char] { &self.alphabet }

  pub fn is_minimized(&self) -> bool { self.minimized }

  pub fn lookup_state(&self, state: DState) -> Option<(&Label, &DfaNode)> {
    let DState(index) = state;
    self.states.get_index(index)
  }

  pub fn find(&self, label: &Label) -> Option<DState> { self.states.get_index_of(label).map(DState) }

  pub fn label(&self, state: DState) -> Option<&Label> { self.lookup_state(state).map(|(l, _)| l) }

  pub fn is_accepting(&self, state: DState) -> bool {
    self
      .lookup_state(state)
      .is_some_and(|(_, node)| node.is_accepting())
  }

  pub fn transition(&self, state: DState, c: char) -> Option<DState> {
    self
      .lookup_state(state)
      .and_then(|(_, node)| node.transition(c))
  }

  pub fn states(&self) -> impl Iterator<Item=(DState, &Label, &DfaNode)>+'_ {
    self
      .states
      .iter()
      .enumerate()
      .map(|(i, (label, node))| (DState(i), label, node))
  }

  /// Whether this automaton accepts the whole of `input`.
  pub fn simulate(&self, input: &str) -> bool {
    use crate::simple_eval::{dfa::DFACache, SimpleEvaluator};

    let mut cache: DFACache = self.create_cache(());
    self.evaluate(&mut cache, input.chars()).is_ok()
  }
}

/// Structural equality: same labels in the same order, same flags and the same
/// edges in the same order.
impl PartialEq for Dfa {
  fn eq(&self, other: &Self) -> bool {
    self.start == other.start
      && self.minimized == other.minimized
      && self.alphabet == other.alphabet
      && self.states.len() == other.states.len()
      && self
        .states
        .iter()
        .zip(other.states.iter())
        .all(|((l1, n1), (l2, n2))| {
          l1 == l2 && n1.accept == n2.accept && n1.transitions().eq(n2.transitions())
        })
  }
}

impl Eq for Dfa {}

impl fmt::Debug for Dfa {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(
      f,
      "Dfa {{ start: {:?}, minimized: {:?}, states: {:?} }}",
      self.start, self.minimized, &self.states
    )
  }
}

#[cfg(test)]
mod test {
  use thompson_regexp_syntax::parser::parse;

  use super::*;
  use crate::nfa::State;

  fn compile(pattern: &str) -> (Nfa, Dfa) {
    let nfa = Nfa::from_postfix(&parse(pattern).unwrap()).unwrap();
    let dfa = Dfa::from_nfa(&nfa);
    (nfa, dfa)
  }

  fn label(ids: &[usize]) -> Label { ids.iter().copied().map(State::new).collect() }

  #[test]
  fn start_is_closure_of_nfa_start() {
    let (nfa, dfa) = compile("a*");
    assert_eq!(dfa.start(), DState(0));
    assert_eq!(dfa.label(dfa.start()), Some(&label(&[0, 2, 3])));
    assert!(dfa.is_accepting(dfa.start()));
    assert_eq!(
      dfa.label(dfa.start()),
      Some(&nfa.epsilon_closure([nfa.start()]))
    );
  }

  #[test]
  fn single_literal() {
    let (_, dfa) = compile("a");
    assert_eq!(dfa.len(), 2);
    assert!(!dfa.is_accepting(DState(0)));
    assert_eq!(dfa.transition(DState(0), 'a'), Some(DState(1)));
    assert!(dfa.is_accepting(DState(1)));
    /* Missing edges are implicit rejections, not a materialized sink. */
    assert_eq!(dfa.transition(DState(1), 'a'), None);
  }

  #[test]
  fn labels_are_unique() {
    let (_, dfa) = compile("(a|b)*abb");
    let mut labels: Vec<&Label> = dfa.states().map(|(_, l, _)| l).collect();
    let n = labels.len();
    labels.sort();
    labels.dedup();
    assert_eq!(labels.len(), n);
    for (s, l, _) in dfa.states() {
      assert_eq!(dfa.find(l), Some(s));
    }
  }

  #[test]
  fn textbook_state_count() {
    /* The classic (a|b)*abb example has 5 subset-constructed states. */
    let (_, dfa) = compile("(a|b)*abb");
    assert_eq!(dfa.len(), 5);
    assert_eq!(dfa.states().filter(|(_, _, n)| n.is_accepting()).count(), 1);
    assert_eq!(dfa.alphabet(), &['a', 'b']);
    assert!(!dfa.is_minimized());
  }

  #[test]
  fn deterministic() {
    let (nfa, dfa) = compile("(a|b)*a(b|c)?");
    let again = Dfa::from_nfa(&nfa);
    assert_eq!(dfa, again);
    let labels1: Vec<_> = dfa.states().map(|(_, l, _)| l.clone()).collect();
    let labels2: Vec<_> = again.states().map(|(_, l, _)| l.clone()).collect();
    assert_eq!(labels1, labels2);
  }

  #[test]
  fn scenarios() {
    let (_, dfa) = compile("a|b");
    assert!(dfa.simulate("a"));
    assert!(dfa.simulate("b"));
    assert!(!dfa.simulate("ab"));
    assert!(!dfa.simulate(""));

    let (_, dfa) = compile("a*");
    assert!(dfa.simulate(""));
    assert!(dfa.simulate("aaaa"));
    assert!(!dfa.simulate("b"));

    let (_, dfa) = compile("a+");
    assert!(!dfa.simulate(""));
    assert!(dfa.simulate("a"));
    assert!(dfa.simulate("aa"));

    let (_, dfa) = compile("(a|b)*abb");
    assert!(dfa.simulate("abb"));
    assert!(dfa.simulate("aabb"));
    assert!(!dfa.simulate("ab"));
    assert!(!dfa.simulate("abbb"));
  }

  #[test]
  fn lookup_out_of_range() {
    let (_, dfa) = compile("a");
    assert!(dfa.lookup_state(DState(7)).is_none());
    assert!(!dfa.is_accepting(DState(7)));
    assert_eq!(dfa.transition(DState(7), 'a'), None);
  }
}
