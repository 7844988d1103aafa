/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! Classification of one source line.

use pest::Parser;
use pest_derive::Parser;

use crate::errors::AssemblyError;
use crate::types::Word;

#[derive(Parser)]
#[grammar = "source/grammar.pest"]
pub struct LineParser;

/// One classified source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Blank,
    Comment,
    Include(String),
    Define { name: String, value: String },
    Block(Word),
    Label(String),
    Data(Word),
    /// A mnemonic with its operand tokens, or a lone identifier that may
    /// turn out to be a label used as data.
    Statement(Vec<String>),
}

pub fn classify(text: &str) -> Result<Line, AssemblyError> {
    let pairs = LineParser::parse(Rule::line, text)?;

    let mut content = None;
    let mut has_comment = false;
    for pair in pairs.flatten() {
        match pair.as_rule() {
            Rule::comment => has_comment = true,
            Rule::include => {
                let path = pair
                    .into_inner()
                    .flatten()
                    .find(|p| p.as_rule() == Rule::path)
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                content = Some(Line::Include(path));
            }
            Rule::define => {
                let mut inner = pair.into_inner();
                let name = next_text(&mut inner);
                let value = next_text(&mut inner);
                content = Some(Line::Define { name, value });
            }
            Rule::block => {
                let mut inner = pair.into_inner();
                let size = next_text(&mut inner);
                content = Some(Line::Block(parse_number(&size, text)?));
            }
            Rule::label => {
                let mut inner = pair.into_inner();
                content = Some(Line::Label(next_text(&mut inner)));
            }
            Rule::statement => {
                let tokens: Vec<String> = pair
                    .into_inner()
                    .map(|p| p.as_str().to_string())
                    .collect();
                // A lone hex literal is a data word.
                content = Some(if tokens.len() == 1 && tokens[0].starts_with("0x") {
                    Line::Data(parse_number(&tokens[0], text)?)
                } else {
                    Line::Statement(tokens)
                });
            }
            _ => {}
        }
    }

    Ok(match (content, has_comment) {
        (Some(line), _) => line,
        (None, true) => Line::Comment,
        (None, false) => Line::Blank,
    })
}

/// Parse a `0x`-prefixed literal of at most eight hex digits.
pub fn parse_number(token: &str, line: &str) -> Result<Word, AssemblyError> {
    let digits = token
        .strip_prefix("0x")
        .ok_or_else(|| AssemblyError::at_line(line, format!("{token} is not a hex literal")))?;
    Word::from_str_radix(digits, 16)
        .map_err(|_| AssemblyError::at_line(line, format!("{token} does not fit in a word")))
}

fn next_text(pairs: &mut pest::iterators::Pairs<'_, Rule>) -> String {
    pairs
        .next()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default()
}
