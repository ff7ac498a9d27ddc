use crate::loc::{Loc, Name, Text};

#[derive(Clone)]
pub struct Tree {
  pub tree_kind: TreeKind,
  pub loc: Loc,
}

impl Tree {
  pub fn new(tree_kind: TreeKind, loc: Loc) -> Self {
    Self { tree_kind, loc }
  }
}

impl std::fmt::Debug for Tree {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:?}", self.tree_kind)
  }
}

#[derive(Clone, Debug)]
pub enum TreeKind {
  Variable(Name),
  This,
  Literal(Literal),
  Array(Vec<Tree>),
  Object(Vec<(Name, Tree)>),
  Member(Box<Tree>, Name),
  Index(Box<Tree>, Box<Tree>),
  Call(Box<Tree>, Vec<Tree>),
  Unary(UnaryOp, Box<Tree>),
  Binary(Op, Box<Tree>, Box<Tree>),
  Conditional(Box<Tree>, Box<Tree>, Box<Tree>),
  Lambda(Vec<Name>, Box<Tree>),
  Let(Name, Box<Tree>),
  Return(Box<Tree>),
  Block(Vec<Tree>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
  Number(f64),
  Boolean(bool),
  String(Text),
  Null,
  Undefined,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
  Not,
  Neg,
  Plus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
  Equal,
  NotEqual,
  Less,
  LessEqual,
  Greater,
  GreaterEqual,
  And,
  Or,
  BitAnd,
  BitOr,
  BitXor,
  Add,
  Sub,
  Mul,
  Div,
  Rem,
}

impl std::fmt::Display for Op {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let symbol = match self {
      Op::Equal => "===",
      Op::NotEqual => "!==",
      Op::Less => "<",
      Op::LessEqual => "<=",
      Op::Greater => ">",
      Op::GreaterEqual => ">=",
      Op::And => "&&",
      Op::Or => "||",
      Op::BitAnd => "&",
      Op::BitOr => "|",
      Op::BitXor => "^",
      Op::Add => "+",
      Op::Sub => "-",
      Op::Mul => "*",
      Op::Div => "/",
      Op::Rem => "%",
    };
    f.write_str(symbol)
  }
}

impl std::fmt::Display for UnaryOp {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      UnaryOp::Not => f.write_str("!"),
      UnaryOp::Neg => f.write_str("-"),
      UnaryOp::Plus => f.write_str("+"),
    }
  }
}
