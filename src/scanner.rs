//! Free-variable detection for the implicit-parameter form.
//!
//! Reserved words and the bound variables of nested function literals are not
//! understood: `true ? x : y` infers `true`, which the compiler then rejects as
//! a parameter name, and an identifier directly before a `:` is taken for an
//! object key even inside a conditional.

use crate::{
  lexer::{is_identifier_part, is_identifier_start},
  loc::Name,
};

const RESERVED: [&str; 2] = ["this", "arguments"];

pub fn free_variables(text: &str) -> Vec<Name> {
  let chars = text.chars().collect::<Vec<_>>();
  let mut names: Vec<Name> = vec![];
  let mut index = 0;

  while index < chars.len() {
    match chars[index] {
      quote @ ('\'' | '"') => index = string_end(&chars, index, quote).unwrap_or(index + 1),
      char if char.is_ascii_digit() => {
        while index < chars.len() && is_identifier_part(chars[index]) {
          index += 1;
        }
      }
      char if is_identifier_start(char) => {
        let start = index;
        while index < chars.len() && is_identifier_part(chars[index]) {
          index += 1;
        }
        let word = chars[start..index].iter().collect::<String>();

        let property = start > 0 && chars[start - 1] == '.';
        let key = chars[index..]
          .iter()
          .find(|char| !char.is_whitespace())
          .is_some_and(|char| *char == ':');
        let capitalized = char.is_ascii_uppercase();
        let reserved = RESERVED.contains(&word.as_str());

        if !(property || key || capitalized || reserved) && !names.iter().any(|name| *name == *word) {
          names.push(Name::from(word));
        }
      }
      _ => index += 1,
    }
  }

  names
}

fn string_end(chars: &[char], start: usize, quote: char) -> Option<usize> {
  let mut index = start + 1;
  while index < chars.len() {
    match chars[index] {
      '\\' => index += 2,
      char if char == quote => return Some(index + 1),
      _ => index += 1,
    }
  }
  None
}
