use crate::{
  lexer::Lexer,
  loc::{Loc, Name, Source, Text},
  parse_tree::{Literal, Op, Tree, TreeKind, UnaryOp},
  token::{Token, TokenKind},
};

type ParseResult<T> = Result<T, SyntaxError>;

#[derive(thiserror::Error, Debug, miette::Diagnostic)]
pub enum SyntaxError {
  #[error("expected {expected}, found '{lexeme}'")]
  #[diagnostic(code(Parser::expected))]
  Expected {
    expected: TokenKind,
    lexeme: String,

    #[label("this token")]
    got: Loc,

    #[source_code]
    src: Source,
  },

  #[error("unexpected {token} '{lexeme}'")]
  #[diagnostic(code(Parser::unexpected))]
  Unexpected {
    token: TokenKind,
    lexeme: String,

    #[label("here")]
    loc: Loc,

    #[source_code]
    src: Source,
  },

  #[error("'{name}' is not a valid parameter name")]
  #[diagnostic(code(Parser::parameter))]
  InvalidParameter {
    name: String,

    #[label("in this parameter list")]
    loc: Loc,

    #[source_code]
    src: Source,
  },

  #[error("invalid number literal '{lexeme}'")]
  #[diagnostic(code(Parser::number))]
  InvalidNumber {
    lexeme: String,

    #[label("here")]
    loc: Loc,

    #[source_code]
    src: Source,
  },
}

pub struct Parser<'src> {
  pub lexer: Lexer<'src>,
  pub token: Token,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
  None = 0,
  Conditional,
  Or,
  And,
  BitOr,
  BitXor,
  BitAnd,
  Equality,
  Relational,
  Sum,
  Product,
  Unary,
  Postfix,
  End,
}

impl Precedence {
  fn left(self) -> Self {
    match self {
      Precedence::None => Precedence::Conditional,
      Precedence::Conditional => Precedence::Or,
      Precedence::Or => Precedence::And,
      Precedence::And => Precedence::BitOr,
      Precedence::BitOr => Precedence::BitXor,
      Precedence::BitXor => Precedence::BitAnd,
      Precedence::BitAnd => Precedence::Equality,
      Precedence::Equality => Precedence::Relational,
      Precedence::Relational => Precedence::Sum,
      Precedence::Sum => Precedence::Product,
      Precedence::Product => Precedence::Unary,
      Precedence::Unary => Precedence::Postfix,
      Precedence::Postfix | Precedence::End => Precedence::End,
    }
  }
}

pub fn parse_expression(source: Source) -> ParseResult<Tree> {
  let text = source.text().to_owned();
  let mut parser = Parser::new(Lexer::new(source, &text));
  let tree = parser.expression(Precedence::None)?;
  parser.expect(TokenKind::Eof)?;
  Ok(tree)
}

/// Parses `source` as a `;` separated statement list, the shape of an explicit-return body.
pub fn parse_body(source: Source) -> ParseResult<Tree> {
  let text = source.text().to_owned();
  let mut parser = Parser::new(Lexer::new(source, &text));
  parser.body()
}

macro_rules! infix {
  ($self:expr, $lhs:expr, $token:ident, $op:ident, $assoc:ident) => {{
    let lhs_loc = $lhs.loc.clone();
    $self.expect(TokenKind::$token)?;
    let rhs = $self.expression(Precedence::$assoc.left())?;
    let rhs_loc = rhs.loc.clone();
    Ok(Tree::new(
      TreeKind::Binary(Op::$op, $lhs.into(), rhs.into()),
      lhs_loc.merge(rhs_loc),
    ))
  }};
}

impl<'src> Parser<'src> {
  pub fn new(mut lexer: Lexer<'src>) -> Self {
    Self {
      token: lexer.next_token(),
      lexer,
    }
  }

  fn is(&self, token_kind: TokenKind) -> bool {
    self.token.token_kind == token_kind
  }

  fn expected<T>(&self, token_kind: TokenKind) -> ParseResult<T> {
    Err(SyntaxError::Expected {
      expected: token_kind,
      lexeme: self.token.lexeme.clone(),
      got: self.token.loc.clone(),
      src: self.lexer.source.clone(),
    })
  }

  fn unexpected<T>(&self) -> ParseResult<T> {
    Err(SyntaxError::Unexpected {
      token: self.token.token_kind,
      lexeme: self.token.lexeme.clone(),
      loc: self.token.loc.clone(),
      src: self.lexer.source.clone(),
    })
  }

  fn expect(&mut self, token_kind: TokenKind) -> ParseResult<Token> {
    if self.is(token_kind) {
      Ok(self.advance())
    } else {
      self.expected(token_kind)
    }
  }

  fn peek(&self) -> TokenKind {
    self.token.token_kind
  }

  fn advance(&mut self) -> Token {
    let new_token = self.lexer.next_token();
    std::mem::replace(&mut self.token, new_token)
  }

  fn skip_separator(&mut self) {
    while self.is(TokenKind::Separator) {
      self.advance();
    }
  }

  fn precedence(&self) -> Precedence {
    match self.peek() {
      TokenKind::Question => Precedence::Conditional,
      TokenKind::PipePipe => Precedence::Or,
      TokenKind::AmpAmp => Precedence::And,
      TokenKind::Pipe => Precedence::BitOr,
      TokenKind::Caret => Precedence::BitXor,
      TokenKind::Amp => Precedence::BitAnd,
      TokenKind::EqualEqual | TokenKind::NotEqual => Precedence::Equality,
      TokenKind::Less | TokenKind::LessEqual | TokenKind::Greater | TokenKind::GreaterEqual => {
        Precedence::Relational
      }
      TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
      TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Precedence::Product,
      TokenKind::LParens | TokenKind::LBracket | TokenKind::Dot => Precedence::Postfix,
      _ => Precedence::End,
    }
  }

  fn primary(&mut self) -> ParseResult<Tree> {
    match self.peek() {
      TokenKind::Identifier => self.identifier(),
      TokenKind::This => {
        let token = self.advance();
        Ok(Tree::new(TreeKind::This, token.loc))
      }
      TokenKind::Number
      | TokenKind::String
      | TokenKind::True
      | TokenKind::False
      | TokenKind::Null
      | TokenKind::Undefined => self.literal(),
      TokenKind::LParens => {
        self.expect(TokenKind::LParens)?;
        let expr = self.expression(Precedence::None)?;
        self.expect(TokenKind::RParens)?;
        Ok(expr)
      }
      TokenKind::LBracket => {
        let start = self.expect(TokenKind::LBracket)?;
        let elements = self.many(TokenKind::RBracket)?;
        let end = self.expect(TokenKind::RBracket)?;
        Ok(Tree::new(TreeKind::Array(elements), start.loc.merge(end.loc)))
      }
      TokenKind::LBrace => self.object(),
      TokenKind::Bang | TokenKind::Minus | TokenKind::Plus => self.unary(),
      _ => self.unexpected(),
    }
  }

  fn name(&mut self) -> ParseResult<(Name, Loc)> {
    let token = self.expect(TokenKind::Identifier)?;
    Ok((Name::from(token.lexeme), token.loc))
  }

  fn identifier(&mut self) -> ParseResult<Tree> {
    let (name, loc) = self.name()?;
    Ok(Tree::new(TreeKind::Variable(name), loc))
  }

  fn number(&self, token: &Token) -> ParseResult<f64> {
    token
      .lexeme
      .parse()
      .map_err(|_| SyntaxError::InvalidNumber {
        lexeme: token.lexeme.clone(),
        loc: token.loc.clone(),
        src: self.lexer.source.clone(),
      })
  }

  fn literal(&mut self) -> ParseResult<Tree> {
    let token = self.advance();
    let literal = match token.token_kind {
      TokenKind::Number => Literal::Number(self.number(&token)?),
      TokenKind::String => Literal::String(Text::from(token.lexeme)),
      TokenKind::True => Literal::Boolean(true),
      TokenKind::False => Literal::Boolean(false),
      TokenKind::Null => Literal::Null,
      TokenKind::Undefined => Literal::Undefined,
      _ => unreachable!("literal called on {}", token.token_kind),
    };
    Ok(Tree::new(TreeKind::Literal(literal), token.loc))
  }

  fn object(&mut self) -> ParseResult<Tree> {
    let start = self.expect(TokenKind::LBrace)?;
    let mut fields = vec![];
    while !self.is(TokenKind::RBrace) {
      let key = match self.peek() {
        TokenKind::Identifier | TokenKind::String => self.advance().lexeme,
        TokenKind::Number => {
          let token = self.advance();
          crate::value::format_number(self.number(&token)?)
        }
        _ => self.unexpected()?,
      };
      self.expect(TokenKind::Colon)?;
      let value = self.expression(Precedence::Conditional)?;
      fields.push((Name::from(key), value));
      if !self.is(TokenKind::Comma) {
        break;
      }
      self.advance();
    }
    let end = self.expect(TokenKind::RBrace)?;
    Ok(Tree::new(TreeKind::Object(fields), start.loc.merge(end.loc)))
  }

  fn unary(&mut self) -> ParseResult<Tree> {
    let token = self.advance();
    let op = match token.token_kind {
      TokenKind::Bang => UnaryOp::Not,
      TokenKind::Minus => UnaryOp::Neg,
      _ => UnaryOp::Plus,
    };
    let operand = self.expression(Precedence::Unary)?;
    let loc = token.loc.merge(operand.loc.clone());
    Ok(Tree::new(TreeKind::Unary(op, operand.into()), loc))
  }

  fn infix(&mut self, prec: Precedence) -> ParseResult<Tree> {
    let mut lhs = self.primary()?;

    loop {
      let p = self.precedence();
      if p >= prec && p != Precedence::End {
        let rule = match self.peek() {
          TokenKind::Question => Self::conditional,
          TokenKind::PipePipe => Self::or,
          TokenKind::AmpAmp => Self::and,
          TokenKind::Pipe => Self::bit_or,
          TokenKind::Caret => Self::bit_xor,
          TokenKind::Amp => Self::bit_and,
          TokenKind::EqualEqual => Self::equal,
          TokenKind::NotEqual => Self::not_equal,
          TokenKind::Less => Self::less,
          TokenKind::LessEqual => Self::less_equal,
          TokenKind::Greater => Self::greater,
          TokenKind::GreaterEqual => Self::greater_equal,
          TokenKind::Plus => Self::add,
          TokenKind::Minus => Self::sub,
          TokenKind::Star => Self::mul,
          TokenKind::Slash => Self::div,
          TokenKind::Percent => Self::rem,
          TokenKind::Dot => Self::member,
          TokenKind::LBracket => Self::index,
          _ => Self::call,
        };
        lhs = rule(self, lhs)?;
      } else {
        break;
      }
    }

    Ok(lhs)
  }

  fn conditional(&mut self, lhs: Tree) -> ParseResult<Tree> {
    let lhs_loc = lhs.loc.clone();
    self.expect(TokenKind::Question)?;
    let then = self.expression(Precedence::Conditional)?;
    self.expect(TokenKind::Colon)?;
    let otherwise = self.expression(Precedence::Conditional)?;
    let loc = lhs_loc.merge(otherwise.loc.clone());
    Ok(Tree::new(
      TreeKind::Conditional(lhs.into(), then.into(), otherwise.into()),
      loc,
    ))
  }

  fn or(&mut self, lhs: Tree) -> ParseResult<Tree> {
    infix!(self, lhs, PipePipe, Or, Or)
  }

  fn and(&mut self, lhs: Tree) -> ParseResult<Tree> {
    infix!(self, lhs, AmpAmp, And, And)
  }

  fn bit_or(&mut self, lhs: Tree) -> ParseResult<Tree> {
    infix!(self, lhs, Pipe, BitOr, BitOr)
  }

  fn bit_xor(&mut self, lhs: Tree) -> ParseResult<Tree> {
    infix!(self, lhs, Caret, BitXor, BitXor)
  }

  fn bit_and(&mut self, lhs: Tree) -> ParseResult<Tree> {
    infix!(self, lhs, Amp, BitAnd, BitAnd)
  }

  fn equal(&mut self, lhs: Tree) -> ParseResult<Tree> {
    infix!(self, lhs, EqualEqual, Equal, Equality)
  }

  fn not_equal(&mut self, lhs: Tree) -> ParseResult<Tree> {
    infix!(self, lhs, NotEqual, NotEqual, Equality)
  }

  fn less(&mut self, lhs: Tree) -> ParseResult<Tree> {
    infix!(self, lhs, Less, Less, Relational)
  }

  fn less_equal(&mut self, lhs: Tree) -> ParseResult<Tree> {
    infix!(self, lhs, LessEqual, LessEqual, Relational)
  }

  fn greater(&mut self, lhs: Tree) -> ParseResult<Tree> {
    infix!(self, lhs, Greater, Greater, Relational)
  }

  fn greater_equal(&mut self, lhs: Tree) -> ParseResult<Tree> {
    infix!(self, lhs, GreaterEqual, GreaterEqual, Relational)
  }

  fn add(&mut self, lhs: Tree) -> ParseResult<Tree> {
    infix!(self, lhs, Plus, Add, Sum)
  }

  fn sub(&mut self, lhs: Tree) -> ParseResult<Tree> {
    infix!(self, lhs, Minus, Sub, Sum)
  }

  fn mul(&mut self, lhs: Tree) -> ParseResult<Tree> {
    infix!(self, lhs, Star, Mul, Product)
  }

  fn div(&mut self, lhs: Tree) -> ParseResult<Tree> {
    infix!(self, lhs, Slash, Div, Product)
  }

  fn rem(&mut self, lhs: Tree) -> ParseResult<Tree> {
    infix!(self, lhs, Percent, Rem, Product)
  }

  fn member(&mut self, lhs: Tree) -> ParseResult<Tree> {
    self.expect(TokenKind::Dot)?;
    let (name, loc) = match self.peek() {
      // keywords are valid property names after a dot
      TokenKind::Identifier
      | TokenKind::True
      | TokenKind::False
      | TokenKind::Null
      | TokenKind::Undefined
      | TokenKind::This
      | TokenKind::Return
      | TokenKind::Var => {
        let token = self.advance();
        (Name::from(token.lexeme), token.loc)
      }
      _ => self.expected(TokenKind::Identifier)?,
    };
    let loc = lhs.loc.clone().merge(loc);
    Ok(Tree::new(TreeKind::Member(lhs.into(), name), loc))
  }

  fn index(&mut self, lhs: Tree) -> ParseResult<Tree> {
    self.expect(TokenKind::LBracket)?;
    let index = self.expression(Precedence::None)?;
    let end = self.expect(TokenKind::RBracket)?;
    let loc = lhs.loc.clone().merge(end.loc);
    Ok(Tree::new(TreeKind::Index(lhs.into(), index.into()), loc))
  }

  fn call(&mut self, lhs: Tree) -> ParseResult<Tree> {
    self.expect(TokenKind::LParens)?;
    let arguments = self.many(TokenKind::RParens)?;
    let end = self.expect(TokenKind::RParens)?;
    let loc = lhs.loc.clone().merge(end.loc);
    Ok(Tree::new(TreeKind::Call(lhs.into(), arguments), loc))
  }

  fn expression(&mut self, prec: Precedence) -> ParseResult<Tree> {
    self.infix(prec)
  }

  fn statement(&mut self) -> ParseResult<Tree> {
    match self.peek() {
      TokenKind::Return => {
        let start = self.expect(TokenKind::Return)?;
        if self.is(TokenKind::Separator) || self.is(TokenKind::Eof) {
          let loc = start.loc.clone();
          let value = Tree::new(TreeKind::Literal(Literal::Undefined), start.loc);
          return Ok(Tree::new(TreeKind::Return(value.into()), loc));
        }
        let value = self.expression(Precedence::None)?;
        let loc = start.loc.merge(value.loc.clone());
        Ok(Tree::new(TreeKind::Return(value.into()), loc))
      }
      TokenKind::Var => {
        let start = self.expect(TokenKind::Var)?;
        let (name, _) = self.name()?;
        self.expect(TokenKind::Equal)?;
        let value = self.expression(Precedence::None)?;
        let loc = start.loc.merge(value.loc.clone());
        Ok(Tree::new(TreeKind::Let(name, value.into()), loc))
      }
      _ => self.expression(Precedence::None),
    }
  }

  fn body(&mut self) -> ParseResult<Tree> {
    let start = self.token.loc.clone();
    let mut statements = vec![];
    self.skip_separator();
    while !self.is(TokenKind::Eof) {
      statements.push(self.statement()?);
      if self.is(TokenKind::Eof) {
        break;
      }
      self.expect(TokenKind::Separator)?;
      self.skip_separator();
    }
    let end = self.expect(TokenKind::Eof)?;
    Ok(Tree::new(TreeKind::Block(statements), start.merge(end.loc)))
  }

  fn many(&mut self, end: TokenKind) -> ParseResult<Vec<Tree>> {
    let mut trees = vec![];
    while !self.is(end) {
      trees.push(self.expression(Precedence::Conditional)?);
      if !self.is(TokenKind::Comma) {
        break;
      }
      self.advance();
    }
    Ok(trees)
  }
}
