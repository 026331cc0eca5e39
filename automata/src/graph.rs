/* Description: Read-only graph views of automata for rendering.

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

//! Read-only graph views of automata for rendering.
//!
//! Nothing here draws anything: a view is a flat list of nodes and labelled
//! edges which a collaborator may lay out however it likes.

use crate::{alphabet::Symbol, dfa::Dfa, nfa::Nfa};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GraphNode {
  pub label: String,
  pub accept: bool,
  pub start: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GraphEdge {
  pub source: String,
  pub symbol: Symbol,
  pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphView {
  pub nodes: Vec<GraphNode>,
  pub edges: Vec<GraphEdge>,
}

impl GraphView {
  pub fn start(&self) -> Option<&GraphNode> { self.nodes.iter().find(|n| n.start) }

  pub fn accepting(&self) -> impl Iterator<Item=&GraphNode>+'_ {
    self.nodes.iter().filter(|n| n.accept)
  }
}

pub trait AsGraph {
  fn as_graph(&self) -> GraphView;
}

impl AsGraph for Nfa {
  fn as_graph(&self) -> GraphView {
    let mut view = GraphView::default();
    for (state, node) in self.states() {
      let label = state.to_string();
      view.nodes.push(GraphNode {
        label: label.clone(),
        accept: state == self.accept(),
        start: state == self.start(),
      });
      for (symbol, targets) in node.transitions() {
        view.edges.extend(targets.iter().map(|t| GraphEdge {
          source: label.clone(),
          symbol,
          target: t.to_string(),
        }));
      }
    }
    view
  }
}

impl AsGraph for Dfa {
  fn as_graph(&self) -> GraphView {
    let mut view = GraphView::default();
    for (state, label, node) in self.states() {
      let label = label.to_string();
      view.nodes.push(GraphNode {
        label: label.clone(),
        accept: node.is_accepting(),
        start: state == self.start(),
      });
      for (c, target) in node.transitions() {
        /* Every target was interned before its edge was recorded. */
        if let Some(target) = self.label(target) {
          view.edges.push(GraphEdge {
            source: label.clone(),
            symbol: Symbol::Literal(c),
            target: target.to_string(),
          });
        }
      }
    }
    view
  }
}
