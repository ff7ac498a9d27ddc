pub mod callable;
pub mod combinators;
pub mod curry;
pub mod error;
pub mod eval;
pub mod globals;
pub mod lambda;
pub mod lexer;
pub mod list;
pub mod loc;
pub mod parse_tree;
pub mod parser;
pub mod scanner;
pub mod token;
pub mod value;

pub use callable::{AsCallable, Callable};
pub use curry::{curry, ncurry, partial, rcurry, rncurry, Applied, Arg, Partial, HOLE};
pub use error::{Error, Result};
pub use globals::Globals;
pub use lambda::{compile, Compiler, Form};
pub use value::{Function, Value};
