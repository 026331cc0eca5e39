/* Description: Non-deterministic finite automation structure.

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

//! Non-deterministic finite automation structure.

use core::fmt;

use indexmap::{IndexMap, IndexSet};
use log::debug;
use smallvec::SmallVec;
use thompson_regexp_syntax::{ast::postfix::Postfix, InvalidPattern};

use crate::{alphabet::Symbol, label::Label, FxBuildHasher};

mod builder {
  use std::collections::BTreeSet;

  use log::trace;
  use thompson_regexp_syntax::{
    ast::{postfix::Postfix, postfix_operators::SimpleOperator, tokens::Token},
    InvalidPattern, InvalidPatternKind,
  };

  use super::{Node, State};
  use crate::alphabet::Symbol;

  /// A partially built automaton with exactly one entry and one exit. Interior
  /// states are already registered in the [`Universe`].
  #[derive(Debug, Copy, Clone, PartialEq, Eq)]
  pub struct Fragment {
    pub start: State,
    pub accept: State,
  }

  /// The growing table of states shared by every fragment of one automaton.
  #[derive(Debug, Default)]
  pub struct Universe {
    pub nodes: Vec<Node>,
    pub alphabet: BTreeSet<char>,
  }

  impl Universe {
    fn fresh_state(&mut self) -> State {
      let state = State(self.nodes.len());
      self.nodes.push(Node::default());
      state
    }

    fn connect(&mut self, from: State, sym: Symbol, to: State) {
      if let Symbol::Literal(c) = sym {
        self.alphabet.insert(c);
      }
      let State(from) = from;
      self.nodes[from].trans.entry(sym).or_default().push(to);
    }

    fn for_literal(&mut self, c: char) -> Fragment {
      let start = self.fresh_state();
      let accept = self.fresh_state();
      self.connect(start, Symbol::Literal(c), accept);
      Fragment { start, accept }
    }

    fn for_concatenation(&mut self, left: Fragment, right: Fragment) -> Fragment {
      self.connect(left.accept, Symbol::Epsilon, right.start);
      Fragment {
        start: left.start,
        accept: right.accept,
      }
    }

    fn for_alternation(&mut self, left: Fragment, right: Fragment) -> Fragment {
      let start = self.fresh_state();
      let accept = self.fresh_state();
      self.connect(start, Symbol::Epsilon, left.start);
      self.connect(start, Symbol::Epsilon, right.start);
      self.connect(left.accept, Symbol::Epsilon, accept);
      self.connect(right.accept, Symbol::Epsilon, accept);
      Fragment { start, accept }
    }

    /// Star, plus and optional share one shape: a new entry and exit around
    /// `inner`. Star keeps both the loop-back and the skip edge; plus drops the
    /// skip; optional drops the loop-back.
    fn for_postfix(&mut self, inner: Fragment, op: SimpleOperator) -> Fragment {
      let (loop_back, skip) = match op {
        SimpleOperator::Star => (true, true),
        SimpleOperator::Plus => (true, false),
        SimpleOperator::Question => (false, true),
      };
      let start = self.fresh_state();
      let accept = self.fresh_state();
      self.connect(start, Symbol::Epsilon, inner.start);
      if loop_back {
        self.connect(inner.accept, Symbol::Epsilon, inner.start);
      }
      self.connect(inner.accept, Symbol::Epsilon, accept);
      if skip {
        self.connect(start, Symbol::Epsilon, accept);
      }
      Fragment { start, accept }
    }

    /// Thompson's construction over a postfix token stream.
    pub fn construct(postfix: &Postfix) -> Result<(Self, Fragment), InvalidPattern> {
      let mut universe = Self::default();
      let mut fragments: Vec<Fragment> = Vec::new();

      let malformed = |at: usize| InvalidPattern::new(InvalidPatternKind::MalformedPostfix, at);

      for (at, tok) in postfix.iter().enumerate() {
        let frag = match tok {
          Token::Literal(c) => universe.for_literal(c),
          Token::Concat => {
            let right = fragments.pop().ok_or_else(|| malformed(at))?;
            let left = fragments.pop().ok_or_else(|| malformed(at))?;
            universe.for_concatenation(left, right)
          },
          Token::Alternation => {
            let right = fragments.pop().ok_or_else(|| malformed(at))?;
            let left = fragments.pop().ok_or_else(|| malformed(at))?;
            universe.for_alternation(left, right)
          },
          Token::Postfix(op) => {
            let inner = fragments.pop().ok_or_else(|| malformed(at))?;
            universe.for_postfix(inner, op)
          },
          Token::OpenGroup | Token::CloseGroup => return Err(malformed(at)),
        };
        trace!("token {} ({}): {:?}", at, tok, frag);
        fragments.push(frag);
      }

      /* Exactly one fragment must cover the whole pattern. */
      match fragments[..] {
        [frag] => Ok((universe, frag)),
        _ => Err(malformed(postfix.len())),
      }
    }
  }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct State(usize);

impl State {
  pub const fn new(id: usize) -> Self { Self(id) }

  pub const fn as_usize(self) -> usize { self.0 }
}

impl fmt::Display for State {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Most states have one or two successors per symbol.
pub type Successors = SmallVec<[State; 2]>;

#[derive(Clone, Default, PartialEq, Eq)]
pub struct Node {
  trans: IndexMap<Symbol, Successors, FxBuildHasher>,
}

impl Node {
  pub fn successors(&self, sym: Symbol) -> &[State] {
    self.trans.get(&sym).map(|s| &s[..]).unwrap_or(&[])
  }

  pub fn transitions(&self) -> impl Iterator<Item=(Symbol, &[State])>+'_ {
    self.trans.iter().map(|(sym, succ)| (*sym, &succ[..]))
  }
}

impl fmt::Debug for Node {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "Node {{ trans: {:?} }}", &self.trans)
  }
}

/// An NFA with a single start and a single accept state. Immutable once
/// built.
#[derive(Clone, PartialEq, Eq)]
pub struct Nfa {
  states: Box<[Node]>,
  start: State,
  accept: State,
  alphabet: Box<[char]>,
}

impl Nfa {
  pub fn from_postfix(postfix: &Postfix) -> Result<Self, InvalidPattern> {
    let (builder::Universe { nodes, alphabet }, builder::Fragment { start, accept }) =
      builder::Universe::construct(postfix)?;
    let nfa = Self {
      states: nodes.into_boxed_slice(),
      start,
      accept,
      alphabet: alphabet.into_iter().collect(),
    };
    debug!(
      "built NFA for {}: {} states, alphabet {:?}",
      postfix,
      nfa.len(),
      nfa.alphabet
    );
    Ok(nfa)
  }

  #[inline(always)]
  pub fn lookup_state(&self, state: State) -> Option<&Node> {
    let State(state) = state;
    self.states.get(state)
  }

  pub fn start(&self) -> State { self.start }

  pub fn accept(&self) -> State { self.accept }

  /// Literal symbols in ascending order. Never contains epsilon.
  pub fn alphabet(&self) -> &[char] { &self.alphabet }

  pub fn len(&self) -> usize { self.states.len() }

  pub fn states(&self) -> impl Iterator<Item=(State, &Node)>+'_ {
    self
      .states
      .iter()
      .enumerate()
      .map(|(i, node)| (State(i), node))
  }

  fn successors(&self, state: State, sym: Symbol) -> &[State] {
    self
      .lookup_state(state)
      .map(|node| node.successors(sym))
      .unwrap_or(&[])
  }

  /// The smallest superset of `states` closed under epsilon edges.
  ///
  /// The visited set lives only for this call, and guarantees termination
  /// across the epsilon cycles introduced by `*` and `+`.
  pub fn epsilon_closure(&self, states: impl IntoIterator<Item=State>) -> Label {
    let mut visited: IndexSet<State, FxBuildHasher> = IndexSet::default();
    let mut worklist: Vec<State> = Vec::new();
    for s in states {
      if visited.insert(s) {
        worklist.push(s);
      }
    }
    while let Some(s) = worklist.pop() {
      for &next in self.successors(s, Symbol::Epsilon) {
        if visited.insert(next) {
          worklist.push(next);
        }
      }
    }
    visited.into_iter().collect()
  }

  /// States reachable from any of `states` over one `c` edge, without closing.
  pub fn step(&self, states: &[State], c: char) -> Vec<State> {
    states
      .iter()
      .flat_map(|&s| self.successors(s, Symbol::Literal(c)).iter().copied())
      .collect()
  }

  /// [`Self::step`] followed by [`Self::epsilon_closure`].
  pub fn advance(&self, states: &[State], c: char) -> Label {
    self.epsilon_closure(self.step(states, c))
  }

  /// Whether this automaton accepts the whole of `input`.
  pub fn simulate(&self, input: &str) -> bool {
    use crate::simple_eval::{nfa::NFACache, SimpleEvaluator};

    let mut cache: NFACache = self.create_cache(());
    self.evaluate(&mut cache, input.chars()).is_ok()
  }
}

impl fmt::Debug for Nfa {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(
      f,
      "Nfa {{ start: {:?}, accept: {:?}, states: {:?} }}",
      self.start, self.accept, &self.states
    )
  }
}

#[cfg(test)]
mod test {
  use thompson_regexp_syntax::{
    ast::{postfix_operators::SimpleOperator, tokens::Token},
    parser::parse,
    InvalidPatternKind,
  };

  use super::*;

  fn compile(pattern: &str) -> Nfa { Nfa::from_postfix(&parse(pattern).unwrap()).unwrap() }

  fn edges(nfa: &Nfa) -> Vec<(usize, Symbol, usize)> {
    let mut edges: Vec<_> = nfa
      .states()
      .flat_map(|(State(src), node)| {
        node
          .transitions()
          .flat_map(move |(sym, succ)| succ.iter().map(move |State(dst)| (src, sym, *dst)))
      })
      .collect();
    edges.sort();
    edges
  }

  fn closure(nfa: &Nfa, ids: &[usize]) -> Vec<usize> {
    nfa
      .epsilon_closure(ids.iter().copied().map(State))
      .iter()
      .map(|s| s.as_usize())
      .collect()
  }

  #[test]
  fn compile_single_lit() {
    let nfa = compile("a");
    assert_eq!(nfa.len(), 2);
    assert_eq!(nfa.start(), State(0));
    assert_eq!(nfa.accept(), State(1));
    assert_eq!(edges(&nfa), vec![(0, Symbol::Literal('a'), 1)]);
    assert_eq!(nfa.alphabet(), &['a']);
  }

  #[test]
  fn compile_concat() {
    let nfa = compile("ab");
    assert_eq!((nfa.start(), nfa.accept()), (State(0), State(3)));
    assert_eq!(edges(&nfa), vec![
      (0, Symbol::Literal('a'), 1),
      (1, Symbol::Epsilon, 2),
      (2, Symbol::Literal('b'), 3),
    ]);
  }

  #[test]
  fn compile_alt() {
    let nfa = compile("a|b");
    assert_eq!((nfa.start(), nfa.accept()), (State(4), State(5)));
    assert_eq!(edges(&nfa), vec![
      (0, Symbol::Literal('a'), 1),
      (1, Symbol::Epsilon, 5),
      (2, Symbol::Literal('b'), 3),
      (3, Symbol::Epsilon, 5),
      (4, Symbol::Epsilon, 0),
      (4, Symbol::Epsilon, 2),
    ]);
    assert_eq!(nfa.alphabet(), &['a', 'b']);
  }

  #[test]
  fn compile_postfix() {
    let nfa = compile("a*");
    assert_eq!((nfa.start(), nfa.accept()), (State(2), State(3)));
    assert_eq!(edges(&nfa), vec![
      (0, Symbol::Literal('a'), 1),
      (1, Symbol::Epsilon, 0),
      (1, Symbol::Epsilon, 3),
      (2, Symbol::Epsilon, 0),
      (2, Symbol::Epsilon, 3),
    ]);

    let nfa = compile("a+");
    assert_eq!(edges(&nfa), vec![
      (0, Symbol::Literal('a'), 1),
      (1, Symbol::Epsilon, 0),
      (1, Symbol::Epsilon, 3),
      (2, Symbol::Epsilon, 0),
    ]);

    let nfa = compile("a?");
    assert_eq!(edges(&nfa), vec![
      (0, Symbol::Literal('a'), 1),
      (1, Symbol::Epsilon, 3),
      (2, Symbol::Epsilon, 0),
      (2, Symbol::Epsilon, 3),
    ]);
  }

  #[test]
  fn identities_are_unique() {
    let nfa = compile("(a|b)*abb");
    let ids: Vec<usize> = nfa.states().map(|(s, _)| s.as_usize()).collect();
    assert_eq!(ids, (0..14).collect::<Vec<_>>());
    assert!(nfa.lookup_state(State(14)).is_none());
  }

  #[test]
  fn closure_follows_cycles() {
    let nfa = compile("a*");
    assert_eq!(closure(&nfa, &[2]), vec![0, 2, 3]);
    assert_eq!(closure(&nfa, &[1]), vec![0, 1, 3]);
    /* Idempotent. */
    let once = nfa.epsilon_closure([State(1)]);
    let twice = nfa.epsilon_closure(once.iter().copied());
    assert_eq!(once, twice);
  }

  #[test]
  fn closure_order_independent() {
    let nfa = compile("(a|b)*abb");
    assert_eq!(closure(&nfa, &[0, 6, 9]), closure(&nfa, &[9, 0, 6]));
    assert_eq!(closure(&nfa, &[]), Vec::<usize>::new());
  }

  #[test]
  fn advance_moves_then_closes() {
    let nfa = compile("ab");
    assert_eq!(nfa.step(&[State(0)], 'a'), vec![State(1)]);
    let next = nfa.advance(&[State(0)], 'a');
    assert_eq!(next.states(), &[State(1), State(2)]);
    assert!(nfa.advance(&[State(0)], 'b').is_empty());
  }

  #[test]
  fn malformed_postfix() {
    let underflow = Postfix::from_tokens([Token::Literal('a'), Token::Concat]);
    assert_eq!(
      Nfa::from_postfix(&underflow).unwrap_err(),
      InvalidPattern::new(InvalidPatternKind::MalformedPostfix, 1)
    );

    let leftover = Postfix::from_tokens([Token::Literal('a'), Token::Literal('b')]);
    assert_eq!(
      Nfa::from_postfix(&leftover).unwrap_err(),
      InvalidPattern::new(InvalidPatternKind::MalformedPostfix, 2)
    );

    let empty = Postfix::from_tokens(Vec::<Token>::new());
    assert_eq!(
      Nfa::from_postfix(&empty).unwrap_err().kind,
      InvalidPatternKind::MalformedPostfix
    );

    let dangling_op = Postfix::from_tokens([Token::Postfix(SimpleOperator::Star)]);
    assert_eq!(
      Nfa::from_postfix(&dangling_op).unwrap_err(),
      InvalidPattern::new(InvalidPatternKind::MalformedPostfix, 0)
    );

    let paren = Postfix::from_tokens([Token::Literal('a'), Token::OpenGroup]);
    assert!(Nfa::from_postfix(&paren).is_err());
  }

  #[test]
  fn scenarios() {
    let nfa = compile("a|b");
    assert!(nfa.simulate("a"));
    assert!(nfa.simulate("b"));
    assert!(!nfa.simulate("ab"));
    assert!(!nfa.simulate(""));

    let nfa = compile("a*");
    assert!(nfa.simulate(""));
    assert!(nfa.simulate("aaaa"));
    assert!(!nfa.simulate("b"));

    let nfa = compile("a+");
    assert!(!nfa.simulate(""));
    assert!(nfa.simulate("a"));
    assert!(nfa.simulate("aa"));

    let nfa = compile("(a|b)*abb");
    assert!(nfa.simulate("abb"));
    assert!(nfa.simulate("aabb"));
    assert!(!nfa.simulate("ab"));
    assert!(!nfa.simulate("abbb"));
  }
}
