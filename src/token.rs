#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
  Identifier,
  Number,
  String,
  True,
  False,
  Null,
  Undefined,
  This,
  Return,
  Var,
  LParens,
  RParens,
  LBracket,
  RBracket,
  LBrace,
  RBrace,
  Comma,
  Dot,
  Colon,
  Question,
  Equal,
  EqualEqual,
  NotEqual,
  Less,
  LessEqual,
  Greater,
  GreaterEqual,
  AmpAmp,
  PipePipe,
  Amp,
  Pipe,
  Caret,
  Bang,
  Plus,
  Minus,
  Star,
  Slash,
  Percent,
  Separator,
  Error,
  Eof,
}

#[derive(Clone, Debug)]
pub struct Token {
  pub token_kind: TokenKind,
  pub lexeme: String,
  pub loc: crate::loc::Loc,
}

impl std::fmt::Display for TokenKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      TokenKind::Identifier => write!(f, "identifier"),
      TokenKind::Number => write!(f, "number"),
      TokenKind::String => write!(f, "string"),
      TokenKind::True => write!(f, "true"),
      TokenKind::False => write!(f, "false"),
      TokenKind::Null => write!(f, "null"),
      TokenKind::Undefined => write!(f, "undefined"),
      TokenKind::This => write!(f, "this"),
      TokenKind::Return => write!(f, "return"),
      TokenKind::Var => write!(f, "declaration"),
      TokenKind::LParens => write!(f, "left parenthesis"),
      TokenKind::RParens => write!(f, "right parenthesis"),
      TokenKind::LBracket => write!(f, "left bracket"),
      TokenKind::RBracket => write!(f, "right bracket"),
      TokenKind::LBrace => write!(f, "left brace"),
      TokenKind::RBrace => write!(f, "right brace"),
      TokenKind::Comma => write!(f, "comma"),
      TokenKind::Dot => write!(f, "dot"),
      TokenKind::Colon => write!(f, "colon"),
      TokenKind::Question => write!(f, "question mark"),
      TokenKind::Equal => write!(f, "equal"),
      TokenKind::EqualEqual => write!(f, "double equal"),
      TokenKind::NotEqual => write!(f, "not equal"),
      TokenKind::Less => write!(f, "less than"),
      TokenKind::LessEqual => write!(f, "less or equal"),
      TokenKind::Greater => write!(f, "greater than"),
      TokenKind::GreaterEqual => write!(f, "greater or equal"),
      TokenKind::AmpAmp => write!(f, "and"),
      TokenKind::PipePipe => write!(f, "or"),
      TokenKind::Amp => write!(f, "ampersand"),
      TokenKind::Pipe => write!(f, "pipe"),
      TokenKind::Caret => write!(f, "caret"),
      TokenKind::Bang => write!(f, "bang"),
      TokenKind::Plus => write!(f, "plus"),
      TokenKind::Minus => write!(f, "minus"),
      TokenKind::Star => write!(f, "star"),
      TokenKind::Slash => write!(f, "slash"),
      TokenKind::Percent => write!(f, "percent"),
      TokenKind::Separator => write!(f, "separator (;)"),
      TokenKind::Error => write!(f, "error"),
      TokenKind::Eof => write!(f, "end of input"),
    }
  }
}
