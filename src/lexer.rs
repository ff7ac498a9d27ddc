use std::{iter::Peekable, str::Chars};

use crate::token::{Token, TokenKind};

pub struct Lexer<'src> {
  pub source: crate::loc::Source,
  pub peekable: Peekable<Chars<'src>>,
  pub index: usize,
  pub start: usize,
}

pub fn is_identifier_start(char: char) -> bool {
  char.is_ascii_alphabetic() || char == '_' || char == '$'
}

pub fn is_identifier_part(char: char) -> bool {
  char.is_ascii_alphanumeric() || char == '_' || char == '$'
}

pub fn keyword(word: &str) -> Option<TokenKind> {
  match word {
    "true" => Some(TokenKind::True),
    "false" => Some(TokenKind::False),
    "null" => Some(TokenKind::Null),
    "undefined" => Some(TokenKind::Undefined),
    "this" => Some(TokenKind::This),
    "return" => Some(TokenKind::Return),
    "var" | "let" | "const" => Some(TokenKind::Var),
    _ => None,
  }
}

impl<'src> Lexer<'src> {
  pub fn new(source: crate::loc::Source, text: &'src str) -> Self {
    Self {
      source,
      peekable: text.chars().peekable(),
      index: 0,
      start: 0,
    }
  }

  fn advance(&mut self) -> Option<char> {
    let char = self.peekable.next()?;
    self.index += char.len_utf8();
    Some(char)
  }

  fn save(&mut self) {
    self.start = self.index;
  }

  #[inline(always)]
  fn peek(&mut self) -> Option<&char> {
    self.peekable.peek()
  }

  fn advance_while(&mut self, predicate: impl Fn(&char) -> bool) {
    while let Some(char) = self.peek() {
      if !predicate(char) {
        break;
      }
      self.advance();
    }
  }

  fn loc(&self) -> crate::loc::Loc {
    crate::loc::Loc {
      start: self.start,
      end: self.index,
      source: self.source.clone(),
    }
  }

  fn skip(&mut self) {
    self.advance_while(|c| c.is_whitespace());
  }

  fn lexeme(&self) -> &str {
    &self.source.text()[self.start..self.index]
  }

  fn consume(&mut self, expected: char) -> bool {
    match self.peek() {
      Some(char) if *char == expected => {
        self.advance();
        true
      }
      _ => false,
    }
  }

  fn string(&mut self, quote: char) -> Option<String> {
    let mut buf = String::with_capacity(16);

    loop {
      match self.advance()? {
        char if char == quote => return Some(buf),
        '\\' => match self.advance()? {
          'n' => buf.push('\n'),
          't' => buf.push('\t'),
          'r' => buf.push('\r'),
          '0' => buf.push('\0'),
          other => buf.push(other),
        },
        char => buf.push(char),
      }
    }
  }

  fn number(&mut self) {
    self.advance_while(|c| c.is_ascii_digit());
    if self.consume('.') {
      self.advance_while(|c| c.is_ascii_digit());
    }
    if self.consume('e') || self.consume('E') {
      if !self.consume('+') {
        self.consume('-');
      }
      self.advance_while(|c| c.is_ascii_digit());
    }
  }

  pub fn next_token(&mut self) -> Token {
    self.skip();
    self.save();

    let token_kind = if let Some(char) = self.advance() {
      match char {
        ';' => TokenKind::Separator,
        '(' => TokenKind::LParens,
        ')' => TokenKind::RParens,
        '[' => TokenKind::LBracket,
        ']' => TokenKind::RBracket,
        '{' => TokenKind::LBrace,
        '}' => TokenKind::RBrace,
        ',' => TokenKind::Comma,
        ':' => TokenKind::Colon,
        '?' => TokenKind::Question,
        '+' => TokenKind::Plus,
        '-' => TokenKind::Minus,
        '*' => TokenKind::Star,
        '/' => TokenKind::Slash,
        '%' => TokenKind::Percent,
        '^' => TokenKind::Caret,
        '&' if self.consume('&') => TokenKind::AmpAmp,
        '&' => TokenKind::Amp,
        '|' if self.consume('|') => TokenKind::PipePipe,
        '|' => TokenKind::Pipe,
        '=' if self.consume('=') => {
          self.consume('=');
          TokenKind::EqualEqual
        }
        '=' => TokenKind::Equal,
        '!' if self.consume('=') => {
          self.consume('=');
          TokenKind::NotEqual
        }
        '!' => TokenKind::Bang,
        '<' if self.consume('=') => TokenKind::LessEqual,
        '<' => TokenKind::Less,
        '>' if self.consume('=') => TokenKind::GreaterEqual,
        '>' => TokenKind::Greater,
        '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
          self.number();
          TokenKind::Number
        }
        '.' => TokenKind::Dot,
        '0'..='9' => {
          self.number();
          TokenKind::Number
        }
        c if is_identifier_start(c) => {
          self.advance_while(|c| is_identifier_part(*c));
          keyword(self.lexeme()).unwrap_or(TokenKind::Identifier)
        }
        quote @ ('"' | '\'') => {
          if let Some(string) = self.string(quote) {
            return Token {
              token_kind: TokenKind::String,
              lexeme: string,
              loc: self.loc(),
            };
          } else {
            TokenKind::Error
          }
        }
        _ => TokenKind::Error,
      }
    } else {
      TokenKind::Eof
    };

    Token {
      token_kind,
      lexeme: self.lexeme().to_owned(),
      loc: self.loc(),
    }
  }
}

impl<'src> Iterator for Lexer<'src> {
  type Item = Token;

  fn next(&mut self) -> Option<Self::Item> {
    match self.next_token() {
      token if token.token_kind == TokenKind::Eof => None,
      token => Some(token),
    }
  }
}
