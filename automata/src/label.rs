/* Description: Canonical labels for sets of NFA states.

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

//! Canonical labels for sets of NFA states.

use core::{fmt, ops};

use crate::nfa::State;

/// A sorted, deduplicated set of NFA states.
///
/// Two sets with the same members always produce equal labels, whatever order
/// they were collected in, so labels are used directly as memo keys during
/// subset construction.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Label(Box<[State]>);

impl Label {
  pub fn empty() -> Self { Self::default() }

  pub fn states(&self) -> &[State] { &self.0 }

  pub fn contains(&self, state: State) -> bool { self.0.binary_search(&state).is_ok() }
}

impl FromIterator<State> for Label {
  fn from_iter<T: IntoIterator<Item=State>>(iter: T) -> Self {
    let mut states: Vec<State> = iter.into_iter().collect();
    states.sort_unstable();
    states.dedup();
    Self(states.into_boxed_slice())
  }
}

impl ops::Deref for Label {
  type Target = [State];

  fn deref(&self) -> &[State] { &self.0 }
}

impl fmt::Debug for Label {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "Label({})", self) }
}

/// Renders the member identities joined with `=`, e.g. `0=1=3`.
impl fmt::Display for Label {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let mut first = true;
    for s in self.0.iter() {
      if !first {
        write!(f, "=")?;
      }
      first = false;
      write!(f, "{}", s.as_usize())?;
    }
    Ok(())
  }
}
