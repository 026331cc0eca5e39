/* Description: Table-filling minimization of DFAs.

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

//! Table-filling minimization of DFAs.
//!
//! Two states are distinguishable if exactly one accepts, if exactly one has a
//! transition on some symbol, or if some symbol leads them to a distinguishable
//! pair. Every pair left unmarked once no sweep marks anything new is merged.

use core::mem;

use indexmap::IndexMap;
use log::{debug, trace};

use crate::dfa::{DState, Dfa, DfaNode};

/// Lower-triangular table of marked pairs, one slot per unordered pair of
/// distinct states.
struct DistinguishTable {
  marks: Vec<bool>,
}

impl DistinguishTable {
  fn new(n: usize) -> Self {
    Self {
      marks: vec![false; n * n.saturating_sub(1) / 2],
    }
  }

  #[inline]
  fn index(lo: DState, hi: DState) -> usize {
    debug_assert!(lo < hi);
    let (lo, hi) = (lo.as_usize(), hi.as_usize());
    hi * (hi - 1) / 2 + lo
  }

  fn is_marked(&self, lo: DState, hi: DState) -> bool { self.marks[Self::index(lo, hi)] }

  fn mark(&mut self, lo: DState, hi: DState) { self.marks[Self::index(lo, hi)] = true; }
}

/// Union-find over state indices where every class is rooted at its lowest
/// member.
struct Classes {
  parent: Vec<usize>,
}

impl Classes {
  fn new(n: usize) -> Self {
    Self {
      parent: (0..n).collect(),
    }
  }

  fn find(&mut self, x: usize) -> usize {
    let mut root = x;
    while self.parent[root] != root {
      root = self.parent[root];
    }
    let mut cur = x;
    while self.parent[cur] != root {
      let next = self.parent[cur];
      self.parent[cur] = root;
      cur = next;
    }
    root
  }

  fn union(&mut self, a: usize, b: usize) {
    let (ra, rb) = (self.find(a), self.find(b));
    if ra == rb {
      return;
    }
    let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
    self.parent[hi] = lo;
  }
}

impl Dfa {
  fn pair_distinguished(&self, table: &DistinguishTable, p: DState, q: DState) -> bool {
    for &c in self.alphabet.iter() {
      match (self.transition(p, c), self.transition(q, c)) {
        (None, None) => (),
        (Some(_), None) | (None, Some(_)) => return true,
        (Some(p1), Some(q1)) => {
          let lo = p1.min(q1);
          let hi = p1.max(q1);
          if lo != hi && table.is_marked(lo, hi) {
            return true;
          }
        },
      }
    }
    false
  }

  fn fill_table(&self) -> DistinguishTable {
    let n = self.len();
    let mut table = DistinguishTable::new(n);
    for hi in (1..n).map(DState) {
      for lo in (0..hi.as_usize()).map(DState) {
        if self.is_accepting(lo) != self.is_accepting(hi) {
          table.mark(lo, hi);
        }
      }
    }

    let mut sweeps = 0usize;
    loop {
      sweeps += 1;
      let mut changed = false;
      for hi in (1..n).map(DState) {
        for lo in (0..hi.as_usize()).map(DState) {
          if table.is_marked(lo, hi) {
            continue;
          }
          if self.pair_distinguished(&table, lo, hi) {
            trace!("distinguished {} and {}", lo, hi);
            table.mark(lo, hi);
            changed = true;
          }
        }
      }
      if !changed {
        break;
      }
    }
    trace!("distinguishability table stable after {} sweeps", sweeps);
    table
  }

  /// Merge every class of equivalent states into its lowest-indexed member.
  ///
  /// Each merged state keeps its representative's label, accepts if any member
  /// accepted, and has its transitions rewritten to point at representatives.
  /// The start state is always index 0, which is the lowest member of its own
  /// class, so it stays at index 0. Minimizing an already-minimized DFA does
  /// nothing.
  pub fn minimize(&mut self) {
    if self.minimized {
      return;
    }
    let n = self.len();
    let table = self.fill_table();

    let mut classes = Classes::new(n);
    for hi in 1..n {
      for lo in 0..hi {
        if !table.is_marked(DState(lo), DState(hi)) {
          classes.union(lo, hi);
        }
      }
    }

    /* Roots are visited in increasing order, before any other member of their
     * class, so renumbering by first appearance is dense and order-preserving. */
    let mut renumbered: Vec<usize> = vec![0; n];
    let mut next_index = 0usize;
    for i in 0..n {
      let root = classes.find(i);
      if root == i {
        renumbered[i] = next_index;
        next_index += 1;
      } else {
        renumbered[i] = renumbered[root];
      }
    }

    let old = mem::take(&mut self.states);
    let mut merged: IndexMap<_, DfaNode, _> =
      IndexMap::with_capacity_and_hasher(next_index, Default::default());
    for (i, (label, node)) in old.into_iter().enumerate() {
      let target = renumbered[i];
      if target == merged.len() {
        merged.insert(label, DfaNode::new(false));
      }
      let rep = &mut merged[target];
      rep.accept |= node.accept;
      for (c, DState(t)) in node.trans.into_iter() {
        rep.trans.entry(c).or_insert(DState(renumbered[t]));
      }
    }

    debug!("minimized DFA: {} -> {} states", n, merged.len());
    self.states = merged;
    self.start = DState(renumbered[self.start.as_usize()]);
    self.minimized = true;
  }

  /// A minimized copy of this automaton.
  pub fn minimized(&self) -> Self {
    let mut ret = self.clone();
    ret.minimize();
    ret
  }
}
