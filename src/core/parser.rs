// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! src/core/parser.rs
//!
//! Remap rules file parser
//!
//! Parses the textual rules format consumed by the CLI:
//!
//! ```text
//! # comments and blank lines are skipped
//! remap = CapsLock, LCtrl
//! remap = Ctrl+Shift+M, text:hello
//! remap = LWin+Space, Alt+Space, firefox.exe
//! remap = F1, exec:https://example.com
//! ```
//!
//! One rule per line: `remap = <source>, <target>[, <app>]`. Sources and key
//! targets are key names joined with `+` (modifiers first, one trailing
//! action key); `text:` and `exec:` prefixes select literal-text and
//! execution targets. The parser only structures data; all conflict checking
//! happens in the validator after parsing.

use nom::{
    bytes::complete::{tag, take_until, take_while1},
    character::complete::{char, space0},
    combinator::opt,
    sequence::preceded,
    IResult, Parser,
};
use thiserror::Error;

use crate::core::keys::VirtualKey;
use crate::core::shortcut::{RemapBuffer, RemapRow, RemapSource, RemapTarget, Shortcut};

/// Parse errors with line number context
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Parse error on line {line}: {message}")]
    InvalidSyntax { line: usize, message: String },

    #[error("Unknown key '{name}' on line {line}")]
    UnknownKey { name: String, line: usize },

    #[error("IO error reading rules: {0}")]
    IoError(#[from] std::io::Error),
}

/// Parses a complete rules file into a remap buffer.
///
/// Empty lines and `#` comments are skipped; every other line must be a
/// `remap = ...` rule.
pub fn parse_rules_file(content: &str) -> Result<RemapBuffer, ParseError> {
    let mut buffer = RemapBuffer::new();

    for (line_num, line) in content.lines().enumerate() {
        let line_num = line_num + 1; // Human-readable numbers start at 1

        let line_trimmed = line.trim();
        if line_trimmed.is_empty() || line_trimmed.starts_with('#') {
            continue;
        }

        match parse_remap_line(line_trimmed) {
            Ok((_, raw)) => buffer.push(raw.resolve(line_num)?),
            Err(e) => {
                return Err(ParseError::InvalidSyntax {
                    line: line_num,
                    message: format!("{e:?}"),
                });
            }
        }
    }

    Ok(buffer)
}

/// A rule with names still unresolved.
#[derive(Debug)]
struct RawRule<'a> {
    source_keys: Vec<&'a str>,
    target: RawTarget<'a>,
    app: Option<&'a str>,
}

#[derive(Debug)]
enum RawTarget<'a> {
    Keys(Vec<&'a str>),
    Text(&'a str),
    Exec(&'a str),
}

impl RawRule<'_> {
    fn resolve(self, line: usize) -> Result<RemapRow, ParseError> {
        let source_keys = resolve_keys(&self.source_keys, line)?;
        let source = build_source(&source_keys, line)?;

        let target = match self.target {
            RawTarget::Text(text) => RemapTarget::Text(text.to_string()),
            RawTarget::Exec(what) => RemapTarget::Exec(what.to_string()),
            RawTarget::Keys(names) => {
                let keys = resolve_keys(&names, line)?;
                match build_source(&keys, line)? {
                    RemapSource::Key(key) => RemapTarget::Key(key),
                    RemapSource::Shortcut(shortcut) => RemapTarget::Shortcut(shortcut),
                }
            }
        };

        Ok(RemapRow::new(
            source,
            target,
            self.app.map(String::from),
        ))
    }
}

fn resolve_keys(names: &[&str], line: usize) -> Result<Vec<VirtualKey>, ParseError> {
    names
        .iter()
        .map(|name| {
            VirtualKey::from_name(name).ok_or_else(|| ParseError::UnknownKey {
                name: name.trim().to_string(),
                line,
            })
        })
        .collect()
}

fn build_source(keys: &[VirtualKey], line: usize) -> Result<RemapSource, ParseError> {
    match keys {
        [only] => Ok(RemapSource::Key(*only)),
        _ => Shortcut::from_keys(keys)
            .map(RemapSource::Shortcut)
            .ok_or_else(|| ParseError::InvalidSyntax {
                line,
                message: "shortcut must be modifiers followed by one action key".to_string(),
            }),
    }
}

/// Parses a single rule line.
///
/// Format: `remap = <source>, <target>[, <app>]`
fn parse_remap_line(input: &str) -> IResult<&str, RawRule<'_>> {
    let (input, _) = tag("remap").parse(input)?;
    let (input, _) = (space0, char('='), space0).parse(input)?;
    let (input, source) = take_until(",")(input)?;
    let (input, _) = (char(','), space0).parse(input)?;
    let (input, target) = parse_target(input)?;
    let (input, app) = opt(preceded(
        (space0, char(','), space0),
        take_while1(|c: char| c != '\n'),
    ))
    .parse(input)?;

    Ok((
        input,
        RawRule {
            source_keys: split_keys(source),
            target,
            app: app.map(str::trim),
        },
    ))
}

/// Parses the target cell: `text:...`, `exec:...`, or a key sequence.
///
/// Payloads run to the next comma, so literal text containing a comma cannot
/// be combined with an application scope on the same line.
fn parse_target(input: &str) -> IResult<&str, RawTarget<'_>> {
    let (rest, cell) = take_while1(|c: char| c != ',' && c != '\n')(input)?;

    let cell_trimmed = cell.trim();
    let target = if let Some(payload) = cell_trimmed.strip_prefix("text:") {
        RawTarget::Text(payload.trim())
    } else if let Some(payload) = cell_trimmed.strip_prefix("exec:") {
        RawTarget::Exec(payload.trim())
    } else {
        RawTarget::Keys(split_keys(cell_trimmed))
    };

    Ok((rest, target))
}

/// Splits a `+`-joined key sequence into trimmed name tokens.
fn split_keys(input: &str) -> Vec<&str> {
    input
        .split('+')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}
