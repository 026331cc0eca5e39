/* Description: Reading pattern files line by line.

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

//! Reading pattern files line by line.
//!
//! A pattern file holds one pattern per line. Blank lines are skipped and
//! surrounding whitespace is trimmed. An invalid pattern only affects its own
//! line; failing to open or read the file is fatal.

use std::{
  fs::File,
  io::{self, BufRead, BufReader},
  path::Path,
};

use displaydoc::Display;
use log::{debug, warn};
use thiserror::Error;
use thompson_regexp_syntax::InvalidPattern;

use crate::Compiled;

#[derive(Debug, Display, Error)]
pub enum BatchError {
  /// could not open pattern file {path}: {source}
  MissingSource {
    path: String,
    #[source]
    source: io::Error,
  },
  /// failed to read line {line}: {source}
  Read {
    line: usize,
    #[source]
    source: io::Error,
  },
}

/// Non-blank pattern lines from some reader, numbered from 1.
pub struct PatternSource<R> {
  lines: io::Lines<R>,
  line: usize,
}

impl PatternSource<BufReader<File>> {
  pub fn open(path: impl AsRef<Path>) -> Result<Self, BatchError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| BatchError::MissingSource {
      path: path.display().to_string(),
      source,
    })?;
    debug!("reading patterns from {}", path.display());
    Ok(Self::from_reader(BufReader::new(file)))
  }
}

impl<R: BufRead> PatternSource<R> {
  pub fn from_reader(reader: R) -> Self {
    Self {
      lines: reader.lines(),
      line: 0,
    }
  }

  /// Compile every remaining line.
  pub fn entries(self) -> impl Iterator<Item=Result<BatchEntry, BatchError>> {
    self.map(|r| r.map(|(line, pattern)| compile_line(line, pattern)))
  }
}

impl<R: BufRead> Iterator for PatternSource<R> {
  type Item = Result<(usize, String), BatchError>;

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      let next = self.lines.next()?;
      self.line += 1;
      let line = self.line;
      let text = match next {
        Ok(text) => text,
        Err(source) => return Some(Err(BatchError::Read { line, source })),
      };
      let trimmed = text.trim();
      if !trimmed.is_empty() {
        return Some(Ok((line, trimmed.to_string())));
      }
    }
  }
}

/// One pattern line and what compiling it produced.
#[derive(Debug, Clone)]
pub struct BatchEntry {
  pub line: usize,
  pub pattern: String,
  pub result: Result<Compiled, InvalidPattern>,
}

pub fn compile_line(line: usize, pattern: String) -> BatchEntry {
  let result = Compiled::compile(&pattern);
  if let Err(ref e) = result {
    warn!("line {}: {:?} is invalid: {}", line, pattern, e);
  }
  BatchEntry {
    line,
    pattern,
    result,
  }
}

#[cfg(test)]
mod test {
  use std::io::{Cursor, ErrorKind};

  use thompson_regexp_syntax::InvalidPatternKind;

  use super::*;

  #[test]
  fn skips_blank_lines() {
    let src = PatternSource::from_reader(Cursor::new("a|b\n\n   \n  (a|b)*abb  \r\nc\n"));
    let lines: Vec<_> = src.map(Result::unwrap).collect();
    assert_eq!(
      lines,
      vec![
        (1, "a|b".to_string()),
        (4, "(a|b)*abb".to_string()),
        (5, "c".to_string()),
      ]
    );
  }

  #[test]
  fn invalid_line_does_not_abort() {
    let src = PatternSource::from_reader(Cursor::new("a\na|\n(ab\nb*\n"));
    let entries: Vec<BatchEntry> = src.entries().map(Result::unwrap).collect();
    assert_eq!(entries.len(), 4);
    assert!(entries[0].result.is_ok());
    assert_eq!(
      entries[1].result.as_ref().unwrap_err().kind,
      InvalidPatternKind::MissingRightOperand('|')
    );
    assert_eq!(
      entries[2].result.as_ref().unwrap_err().kind,
      InvalidPatternKind::UnmatchedOpenParen
    );
    assert_eq!(entries[3].line, 4);
    assert!(entries[3].result.as_ref().unwrap().verdict("bbb").is_match());
  }

  #[test]
  fn missing_file_is_fatal() {
    let err = PatternSource::open("/nonexistent/thompson-regexp/patterns.txt")
      .err()
      .unwrap();
    match err {
      BatchError::MissingSource {
        ref path,
        ref source,
      } => {
        assert_eq!(path, "/nonexistent/thompson-regexp/patterns.txt");
        assert_eq!(source.kind(), ErrorKind::NotFound);
      },
      BatchError::Read { .. } => unreachable!(),
    }
    assert!(err
      .to_string()
      .starts_with("could not open pattern file /nonexistent/thompson-regexp/patterns.txt: "));
    assert!(std::error::Error::source(&err).is_some());
  }

  #[test]
  fn read_errors_are_numbered() {
    let src = PatternSource::from_reader(Cursor::new(&b"a\n\xff\xfe\n"[..]));
    let results: Vec<_> = src.collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(BatchError::Read { line: 2, .. })));
  }
}
