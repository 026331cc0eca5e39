/* Description: Validation and postfix conversion of regexp patterns.

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

//! Validation and postfix conversion of regexp patterns.

use displaydoc::Display;
use log::trace;
use thiserror::Error;

use crate::ast::{
  postfix::Postfix,
  tokens::{lex, Token, ALTERNATION},
};

#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash)]
pub enum InvalidPatternKind {
  /// the pattern is empty
  Empty,
  /// unmatched `(`
  UnmatchedOpenParen,
  /// unmatched `)`
  UnmatchedCloseParen,
  /// empty group `()`
  EmptyGroup,
  /// operator `{0}` has no left operand
  MissingLeftOperand(char),
  /// operator `{0}` has no right operand
  MissingRightOperand(char),
  /// malformed postfix token sequence
  MalformedPostfix,
}

/// invalid pattern: {kind} at offset {at}
#[derive(Debug, Display, Error, Copy, Clone, PartialEq, Eq, Hash)]
pub struct InvalidPattern {
  pub kind: InvalidPatternKind,
  /// Character offset into the pattern, or token offset into a postfix stream.
  pub at: usize,
}

impl InvalidPattern {
  pub const fn new(kind: InvalidPatternKind, at: usize) -> Self { Self { kind, at } }
}

/// Reject structurally invalid patterns. Constructs nothing.
pub fn validate(pattern: &str) -> Result<(), InvalidPattern> {
  if pattern.is_empty() {
    return Err(InvalidPattern::new(InvalidPatternKind::Empty, 0));
  }

  let mut open_groups: Vec<usize> = Vec::new();
  let mut prev: Option<(usize, Token)> = None;

  for (at, tok) in lex(pattern) {
    match tok {
      Token::Literal(_) => (),
      Token::OpenGroup => open_groups.push(at),
      Token::CloseGroup => {
        let Some(open_at) = open_groups.pop() else {
          return Err(InvalidPattern::new(InvalidPatternKind::UnmatchedCloseParen, at));
        };
        match prev {
          Some((_, Token::OpenGroup)) => {
            return Err(InvalidPattern::new(InvalidPatternKind::EmptyGroup, open_at));
          },
          Some((alt_at, Token::Alternation)) => {
            return Err(InvalidPattern::new(
              InvalidPatternKind::MissingRightOperand(ALTERNATION),
              alt_at,
            ));
          },
          _ => (),
        }
      },
      Token::Alternation | Token::Postfix(_) => {
        if let None | Some((_, Token::OpenGroup | Token::Alternation)) = prev {
          let op = match tok {
            Token::Postfix(op) => op.as_char(),
            _ => ALTERNATION,
          };
          return Err(InvalidPattern::new(
            InvalidPatternKind::MissingLeftOperand(op),
            at,
          ));
        }
      },
      Token::Concat => unreachable!("concatenation is never lexed from a pattern"),
    }
    prev = Some((at, tok));
  }

  if let Some((alt_at, Token::Alternation)) = prev {
    return Err(InvalidPattern::new(
      InvalidPatternKind::MissingRightOperand(ALTERNATION),
      alt_at,
    ));
  }
  if let Some(open_at) = open_groups.pop() {
    return Err(InvalidPattern::new(InvalidPatternKind::UnmatchedOpenParen, open_at));
  }
  Ok(())
}

/// Shunting-yard conversion into postfix order, synthesizing explicit
/// concatenation operators.
///
/// This assumes `pattern` has already passed [`validate`], and only re-checks
/// parenthesis matching.
pub fn to_postfix(pattern: &str) -> Result<Postfix, InvalidPattern> {
  let mut output: Vec<Token> = Vec::with_capacity(pattern.len() * 2);
  let mut operators: Vec<(usize, Token)> = Vec::new();
  let mut prev: Option<Token> = None;

  fn push_operator(op: Token, at: usize, output: &mut Vec<Token>, operators: &mut Vec<(usize, Token)>) {
    debug_assert!(op.is_operator());
    while let Some(&(_, top)) = operators.last() {
      if !top.is_operator() || top.precedence() < op.precedence() {
        break;
      }
      output.push(top);
      operators.pop();
    }
    operators.push((at, op));
  }

  for (at, tok) in lex(pattern) {
    if tok.begins_operand() && prev.is_some_and(|p| p.ends_operand()) {
      push_operator(Token::Concat, at, &mut output, &mut operators);
    }
    match tok {
      Token::Literal(_) => output.push(tok),
      Token::OpenGroup => operators.push((at, tok)),
      Token::CloseGroup => loop {
        match operators.pop() {
          Some((_, Token::OpenGroup)) => break,
          Some((_, op)) => output.push(op),
          None => {
            return Err(InvalidPattern::new(InvalidPatternKind::UnmatchedCloseParen, at));
          },
        }
      },
      Token::Postfix(_) | Token::Alternation | Token::Concat => {
        push_operator(tok, at, &mut output, &mut operators);
      },
    }
    prev = Some(tok);
  }

  while let Some((at, op)) = operators.pop() {
    if op == Token::OpenGroup {
      return Err(InvalidPattern::new(InvalidPatternKind::UnmatchedOpenParen, at));
    }
    output.push(op);
  }

  let postfix = Postfix::from_tokens(output);
  trace!("postfix for {:?}: {}", pattern, postfix);
  Ok(postfix)
}

/// Validate `pattern`, then convert it to postfix.
pub fn parse(pattern: &str) -> Result<Postfix, InvalidPattern> {
  validate(pattern)?;
  to_postfix(pattern)
}
