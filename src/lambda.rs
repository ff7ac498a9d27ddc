//! Compiles text expressions into callables.
//!
//! Four grammars are tried in order:
//!
//! 1. arrow: `x, y -> x + y`, `x -> y -> x + y` (curried, right associative)
//! 2. underscore: `_ + 1`
//! 3. section: `/2`, `2/`, `/`, `.name`
//! 4. implicit: every free variable becomes a parameter, `y + 2*x` takes `(y, x)`

use crate::{
  error::Result,
  eval,
  globals::Globals,
  lexer::{is_identifier_part, is_identifier_start, keyword},
  loc::{Loc, Name, Source},
  parse_tree::{Tree, TreeKind},
  parser::{parse_body, parse_expression, SyntaxError},
  scanner,
  value::Function,
};

const ARROW: &str = "->";
const LEFT_SECTION: &[char] = &['+', '*', '/', '%', '&', '|', '^', '.', '=', '<', '>'];
const RIGHT_SECTION: &[char] = &['+', '-', '*', '/', '%', '&', '|', '^', '.', '=', '<', '>', '!'];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Form {
  Arrow,
  Underscore,
  Section { left: bool, right: bool },
  Implicit,
}

impl Form {
  pub fn of(text: &str) -> Self {
    if text.contains(ARROW) {
      return Form::Arrow;
    }
    if has_underscore(text) {
      return Form::Underscore;
    }
    let (left, right) = sections(text);
    if left || right {
      Form::Section { left, right }
    } else {
      Form::Implicit
    }
  }
}

fn has_underscore(text: &str) -> bool {
  let word = |char: Option<char>| char.is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
  text.char_indices().any(|(i, char)| {
    char == '_' && !word(text[..i].chars().next_back()) && !word(text[i + 1..].chars().next())
  })
}

/// Whether an operand is missing on the left and on the right. A leading `-`
/// is a negation, and a leading `!` only opens a section as part of `!=`.
fn sections(text: &str) -> (bool, bool) {
  let start = text.trim_start();
  let end = text.trim_end();
  let left = start.starts_with(LEFT_SECTION) || start.starts_with("!=");
  let right = end.ends_with(RIGHT_SECTION);
  (left, right)
}

fn fresh(text: &str, from: usize) -> (Name, usize) {
  let mut n = from;
  loop {
    let candidate = format!("${n}");
    let taken = text.match_indices(&candidate).any(|(i, _)| {
      let after = text[i + candidate.len()..].chars().next();
      !after.is_some_and(is_identifier_part)
    });
    if !taken {
      return (Name::from(candidate), n);
    }
    n += 1;
  }
}

#[derive(Clone, Debug)]
pub struct Compiler {
  globals: Globals,
}

impl Default for Compiler {
  fn default() -> Self {
    Self::new(Globals::shared())
  }
}

impl Compiler {
  pub fn new(globals: Globals) -> Self {
    Self { globals }
  }

  #[tracing::instrument(level = "debug", skip(self))]
  pub fn compile(&self, text: &str) -> Result<Function> {
    let form = Form::of(text);
    let (parameters, body) = match form {
      Form::Arrow => self.arrow(text)?,
      Form::Underscore => (vec![Name::from("_")], parse_expression(Source::from(text))?),
      Form::Section { left, right } => {
        let mut parameters = vec![];
        let mut source = text.to_owned();
        let mut next = 1;
        if left {
          let (name, n) = fresh(text, next);
          source = format!("{name}{source}");
          parameters.push(name);
          next = n + 1;
        }
        if right {
          let (name, _) = fresh(text, next.max(2));
          source = format!("{source}{name}");
          parameters.push(name);
        }
        (parameters, parse_expression(Source::from(source))?)
      }
      Form::Implicit => {
        let parameters = scanner::free_variables(text);
        reject_keywords(text, &parameters)?;
        (parameters, parse_expression(Source::from(text))?)
      }
    };

    tracing::debug!(?form, ?parameters, "compiled text expression");
    Ok(eval::build(parameters, &body, &self.globals))
  }

  /// Builds a callable with no declared parameters from a statement body
  /// such as `var y = arguments[0]; return y * 2`.
  pub fn body(&self, text: &str) -> Result<Function> {
    let body = parse_body(Source::from(text))?;
    tracing::debug!("compiled explicit body");
    Ok(eval::build(vec![], &body, &self.globals))
  }

  fn arrow(&self, text: &str) -> Result<(Vec<Name>, Tree)> {
    let mut segments = vec![];
    let mut start = 0;
    for (i, _) in text.match_indices(ARROW) {
      segments.push((start, &text[start..i]));
      start = i + ARROW.len();
    }
    let body = parse_expression(Source::from(text[start..].trim()))?;

    let source = Source::from(text);
    let mut lists = segments
      .into_iter()
      .map(|(start, segment)| parameter_list(&source, start, segment))
      .collect::<Result<Vec<_>, _>>()?;

    // the innermost list owns the body, each outer list returns the next callable
    let outer = lists.remove(0);
    let body = lists.into_iter().rev().fold(body, |body, parameters| {
      let loc = body.loc.clone();
      Tree::new(TreeKind::Lambda(parameters, body.into()), loc)
    });
    Ok((outer, body))
  }
}

fn parameter_list(source: &Source, start: usize, segment: &str) -> Result<Vec<Name>, SyntaxError> {
  segment
    .split(|c: char| c == ',' || c.is_whitespace())
    .filter(|name| !name.is_empty())
    .map(|name| {
      let mut chars = name.chars();
      let valid = chars.next().is_some_and(is_identifier_start)
        && chars.all(is_identifier_part)
        && keyword(name).is_none();
      if valid {
        Ok(Name::from(name))
      } else {
        Err(SyntaxError::InvalidParameter {
          name: name.to_owned(),
          loc: Loc {
            start,
            end: start + segment.len(),
            source: source.clone(),
          },
          src: source.clone(),
        })
      }
    })
    .collect()
}

// the scanner does not know reserved words, so `false || n` would infer `false`
fn reject_keywords(text: &str, parameters: &[Name]) -> Result<(), SyntaxError> {
  let Some(name) = parameters
    .iter()
    .map(Name::as_ref)
    .find(|name: &&str| keyword(name).is_some())
  else {
    return Ok(());
  };
  let source = Source::from(text);
  let start = text.find(name).unwrap_or(0);
  Err(SyntaxError::InvalidParameter {
    name: name.to_owned(),
    loc: Loc {
      start,
      end: start + name.len(),
      source: source.clone(),
    },
    src: source,
  })
}

pub fn compile(text: &str) -> Result<Function> {
  Compiler::default().compile(text)
}

#[cfg(test)]
mod test {
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  use super::{compile, Compiler, Form};
  use crate::{error::Error, globals::Globals, parser::SyntaxError, value::Value};

  fn parameters(text: &str) -> Vec<String> {
    let function = compile(text).unwrap();
    function.parameters().iter().map(|name| name.to_string()).collect()
  }

  fn call(text: &str, arguments: &[Value]) -> Value {
    compile(text).unwrap().call(arguments).unwrap()
  }

  #[rstest]
  #[case("x -> x + 1", Form::Arrow)]
  #[case("_ + 1", Form::Underscore)]
  #[case("x_ + _y", Form::Implicit)]
  #[case("/2", Form::Section { left: true, right: false })]
  #[case("2/", Form::Section { left: false, right: true })]
  #[case("/", Form::Section { left: true, right: true })]
  #[case("  != 3", Form::Section { left: true, right: false })]
  #[case("!x", Form::Implicit)]
  #[case("-2*x", Form::Implicit)]
  #[case("x -", Form::Section { left: false, right: true })]
  #[case("y + 2*x", Form::Implicit)]
  fn selects_form(#[case] text: &str, #[case] expected: Form) {
    assert_eq!(Form::of(text), expected);
  }

  #[rstest]
  #[case("x, y -> x * 10 + y", &[1.into(), 2.into()], 12.0)]
  #[case("x y -> x * 10 + y", &[1.into(), 2.into()], 12.0)]
  #[case("x,y->x-y", &[5.into(), 2.into()], 3.0)]
  #[case("_ + 1", &[1.into()], 2.0)]
  #[case("/2", &[4.into()], 2.0)]
  #[case("2/", &[4.into()], 0.5)]
  #[case("/", &[2.into(), 4.into()], 0.5)]
  #[case("-2*x", &[3.into()], -6.0)]
  #[case("y + 2*x", &[1.into(), 2.into()], 5.0)]
  #[case("Math.max(a, b)", &[3.into(), 7.into()], 7.0)]
  fn evaluates(#[case] text: &str, #[case] arguments: &[Value], #[case] expected: f64) {
    assert_eq!(call(text, arguments), Value::Number(expected));
  }

  #[test]
  fn chained_arrows_curry_right_associatively() {
    let add = compile("x -> y -> x + y").unwrap();
    assert_eq!(add.arity(), 1);
    let inner = match add.call(&[1.into()]).unwrap() {
      Value::Function(inner) => inner,
      other => panic!("expected a function, got {other:?}"),
    };
    assert_eq!(inner.parameters().len(), 1);
    assert_eq!(inner.call(&[2.into()]).unwrap(), Value::from(3));
  }

  #[test]
  fn three_arrows_nest_twice() {
    let function = compile("a -> b -> c -> a * 100 + b * 10 + c").unwrap();
    let mut value = Value::Function(function);
    for argument in [1, 2, 3] {
      value = match value {
        Value::Function(f) => f.call(&[argument.into()]).unwrap(),
        other => panic!("expected a function, got {other:?}"),
      };
    }
    assert_eq!(value, Value::from(123));
  }

  #[test]
  fn empty_arrow_parameter_list() {
    assert_eq!(parameters("-> 42"), Vec::<String>::new());
    assert_eq!(call("-> 42", &[]), Value::from(42));
  }

  #[rstest]
  #[case("/2", &["$1"])]
  #[case("2/", &["$2"])]
  #[case("<", &["$1", "$2"])]
  #[case("$1 +", &["$2"])]
  #[case("$2 *", &["$3"])]
  #[case("+ $1 +", &["$2", "$3"])]
  #[case("y + 2*x", &["y", "x"])]
  #[case("_ * _", &["_"])]
  #[case("x, y -> x", &["x", "y"])]
  fn infers_parameters(#[case] text: &str, #[case] expected: &[&str]) {
    assert_eq!(parameters(text), expected);
  }

  #[test]
  fn leading_minus_is_not_a_section() {
    assert_eq!(parameters("-2*x"), vec!["x"]);
  }

  #[test]
  fn property_section() {
    let point = Value::object([("x", Value::from(1)), ("y", Value::from(2))]);
    assert_eq!(call(".y", &[point.clone()]), Value::from(2));
    assert_eq!(call("point.x", &[point]), Value::from(1));
  }

  #[test]
  fn capitalized_names_resolve_globally() {
    assert_eq!(parameters("Math.PI * r * r"), vec!["r"]);
    let globals = Globals::empty().with("Scale", Value::from(3));
    let function = Compiler::new(globals).compile("Scale * n").unwrap();
    assert_eq!(function.call(&[2.into()]).unwrap(), Value::from(6));
  }

  #[test]
  fn underscore_without_argument_fails() {
    let result = compile("_ + 1").unwrap().call(&[]);
    assert!(matches!(result, Err(Error::Type(_))));
  }

  #[rstest]
  #[case("x -> (x")]
  #[case("1 -> x")]
  #[case("x + )")]
  #[case("f(")]
  #[case("false || n")]
  #[case("true && y")]
  #[case("null -> 1")]
  #[case("x -> let -> x")]
  fn syntax_errors_surface_at_compile_time(#[case] text: &str) {
    assert!(matches!(compile(text), Err(Error::Syntax(_))));
  }

  #[test]
  fn keywords_are_never_parameters() {
    match compile("false || n") {
      Err(Error::Syntax(SyntaxError::InvalidParameter { name, loc, .. })) => {
        assert_eq!(name, "false");
        assert_eq!((loc.start, loc.end), (0, 5));
      }
      other => panic!("unexpected result {other:?}"),
    }
    assert_eq!(call("n -> n || false", &[0.into()]), Value::Bool(false));
  }

  #[test]
  fn recompiling_is_independent() {
    let first = compile("x+1").unwrap();
    let second = compile("x+1").unwrap();
    assert!(!first.ptr_eq(&second));
    for _ in 0..3 {
      assert_eq!(first.call(&[1.into()]).unwrap(), Value::from(2));
      assert_eq!(second.call(&[1.into()]).unwrap(), Value::from(2));
    }
  }

  #[test]
  fn explicit_body() {
    let function = Compiler::default()
      .body("var total = arguments[0] + arguments[1]; return total * 2")
      .unwrap();
    assert_eq!(function.arity(), 0);
    assert_eq!(function.call(&[1.into(), 2.into()]).unwrap(), Value::from(6));
  }
}
