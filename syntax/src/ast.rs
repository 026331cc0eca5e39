/* Description: Token and postfix representations of regexp patterns.

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

//! Token and postfix representations of regexp patterns.

pub mod postfix_operators {
  use core::fmt;

  /// The unary operators which bind to the element on their left.
  #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
  #[cfg_attr(any(test, feature = "proptest"), derive(proptest_derive::Arbitrary))]
  pub enum SimpleOperator {
    /// `*`: zero or more.
    Star,
    /// `+`: one or more.
    Plus,
    /// `?`: zero or one.
    Question,
  }

  impl SimpleOperator {
    pub const fn from_char(c: char) -> Option<Self> {
      match c {
        '*' => Some(Self::Star),
        '+' => Some(Self::Plus),
        '?' => Some(Self::Question),
        _ => None,
      }
    }

    pub const fn as_char(self) -> char {
      match self {
        Self::Star => '*',
        Self::Plus => '+',
        Self::Question => '?',
      }
    }
  }

  impl fmt::Display for SimpleOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.as_char()) }
  }
}

pub mod tokens {
  use core::fmt;

  use super::postfix_operators::SimpleOperator;

  pub const ALTERNATION: char = '|';
  pub const OPEN_GROUP: char = '(';
  pub const CLOSE_GROUP: char = ')';
  /// Only ever produced by the postfix converter; never read from a pattern.
  pub const CONCAT: char = '·';

  #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
  pub enum Token {
    /// `a`
    Literal(char),
    /// `<expr>*`, `<expr>+` or `<expr>?`
    Postfix(SimpleOperator),
    /// The implicit operator between two juxtaposed elements.
    Concat,
    /// `<expr>|<expr>`
    Alternation,
    /// `(`
    OpenGroup,
    /// `)`
    CloseGroup,
  }

  impl Token {
    /// Every character which is not an operator or a parenthesis is a literal.
    pub const fn from_char(c: char) -> Self {
      match c {
        ALTERNATION => Self::Alternation,
        OPEN_GROUP => Self::OpenGroup,
        CLOSE_GROUP => Self::CloseGroup,
        c => match SimpleOperator::from_char(c) {
          Some(op) => Self::Postfix(op),
          None => Self::Literal(c),
        },
      }
    }

    /// Binding strength for the shunting-yard converter. Groups are never
    /// popped by precedence, only by a matching close paren.
    pub const fn precedence(&self) -> u8 {
      match self {
        Self::Postfix(_) => 3,
        Self::Concat => 2,
        Self::Alternation => 1,
        Self::Literal(_) | Self::OpenGroup | Self::CloseGroup => 0,
      }
    }

    pub const fn is_operator(&self) -> bool {
      matches!(self, Self::Postfix(_) | Self::Concat | Self::Alternation)
    }

    /// Whether this token can be the left side of an implicit concatenation.
    pub const fn ends_operand(&self) -> bool {
      matches!(self, Self::Literal(_) | Self::CloseGroup | Self::Postfix(_))
    }

    /// Whether this token can be the right side of an implicit concatenation.
    pub const fn begins_operand(&self) -> bool { matches!(self, Self::Literal(_) | Self::OpenGroup) }
  }

  impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
      match self {
        Self::Literal(c) => write!(f, "{}", c),
        Self::Postfix(op) => write!(f, "{}", op),
        Self::Concat => write!(f, "{}", CONCAT),
        Self::Alternation => write!(f, "{}", ALTERNATION),
        Self::OpenGroup => write!(f, "{}", OPEN_GROUP),
        Self::CloseGroup => write!(f, "{}", CLOSE_GROUP),
      }
    }
  }

  /// Pair each character of `pattern` with its character offset.
  pub fn lex(pattern: &str) -> impl Iterator<Item=(usize, Token)>+'_ {
    pattern
      .chars()
      .enumerate()
      .map(|(at, c)| (at, Token::from_char(c)))
  }
}

pub mod postfix {
  use core::{fmt, ops};

  use super::tokens::Token;

  /// A token stream in postfix (reverse polish) order, with every
  /// concatenation made explicit.
  #[derive(Debug, Clone, PartialEq, Eq, Hash)]
  pub struct Postfix(Box<[Token]>);

  impl Postfix {
    /// Wrap a token sequence without checking that it is well-formed. Consumers
    /// such as the NFA builder detect malformed sequences themselves.
    pub fn from_tokens(tokens: impl IntoIterator<Item=Token>) -> Self {
      Self(tokens.into_iter().collect())
    }

    pub fn tokens(&self) -> &[Token] { &self.0 }

    pub fn iter(&self) -> impl Iterator<Item=Token>+'_ { self.0.iter().copied() }

    /// All distinct literal characters, in order of first appearance.
    pub fn literals(&self) -> impl Iterator<Item=char>+'_ {
      let mut seen: Vec<char> = Vec::new();
      self.iter().filter_map(move |t| match t {
        Token::Literal(c) if !seen.contains(&c) => {
          seen.push(c);
          Some(c)
        },
        _ => None,
      })
    }
  }

  impl ops::Deref for Postfix {
    type Target = [Token];

    fn deref(&self) -> &[Token] { &self.0 }
  }

  impl fmt::Display for Postfix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
      for t in self.0.iter() {
        write!(f, "{}", t)?;
      }
      Ok(())
    }
  }
}
