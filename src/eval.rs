use std::{collections::HashMap, rc::Rc};

use crate::{
  error::{type_error, ReferenceError, Result},
  globals::Globals,
  loc::Name,
  parse_tree::{Literal, Op, Tree, TreeKind, UnaryOp},
  value::{Function, Value},
};

pub type Env = HashMap<Name, Value>;

#[derive(Clone)]
pub struct Compiled(Rc<dyn Fn(&mut Env) -> Result<Value>>);

impl Compiled {
  pub fn new(closure: impl Fn(&mut Env) -> Result<Value> + 'static) -> Self {
    Self(Rc::new(closure))
  }

  pub fn run(&self, env: &mut Env) -> Result<Value> {
    self.0(env)
  }
}

const THIS: &str = "this";
const ARGUMENTS: &str = "arguments";

/// Wraps a compiled body into a callable binding `parameters` positionally.
/// Missing arguments read as `undefined`; surplus ones are only reachable through `arguments`.
pub fn lambda(parameters: Vec<Name>, body: Compiled, captured: Env) -> Function {
  let names = parameters.clone();
  Function::lambda(parameters, move |this, arguments| {
    let mut env = captured.clone();
    env.insert(Name::from(THIS), this.clone());
    env.insert(Name::from(ARGUMENTS), Value::from(arguments.to_vec()));
    for (i, name) in names.iter().enumerate() {
      env.insert(name.clone(), arguments.get(i).cloned().unwrap_or_default());
    }
    body.run(&mut env)
  })
}

pub fn build(parameters: Vec<Name>, body: &Tree, globals: &Globals) -> Function {
  lambda(parameters, compile(body, globals), Env::new())
}

pub fn compile(tree: &Tree, globals: &Globals) -> Compiled {
  match &tree.tree_kind {
    TreeKind::Variable(name) => {
      let name = name.clone();
      let globals = globals.clone();
      Compiled::new(move |env| {
        if let Some(value) = env.get(&name) {
          return Ok(value.clone());
        }
        match globals.get(name.as_ref()) {
          Some(value) => Ok(value.clone()),
          None => Err(ReferenceError { name: name.clone() })?,
        }
      })
    }

    TreeKind::This => Compiled::new(|env| Ok(env.get(THIS).cloned().unwrap_or_default())),

    TreeKind::Literal(literal) => {
      let value = match literal {
        Literal::Number(num) => Value::Number(*num),
        Literal::Boolean(bool) => Value::Bool(*bool),
        Literal::String(text) => Value::String(text.clone()),
        Literal::Null => Value::Null,
        Literal::Undefined => Value::Undefined,
      };
      Compiled::new(move |_| Ok(value.clone()))
    }

    TreeKind::Array(elements) => {
      let elements = elements.iter().map(|tree| compile(tree, globals)).collect::<Vec<_>>();
      Compiled::new(move |env| {
        let items = elements
          .iter()
          .map(|element| element.run(env))
          .collect::<Result<Vec<_>>>()?;
        Ok(Value::from(items))
      })
    }

    TreeKind::Object(fields) => {
      let fields = fields
        .iter()
        .map(|(key, tree)| (key.clone(), compile(tree, globals)))
        .collect::<Vec<_>>();
      Compiled::new(move |env| {
        let mut object = std::collections::BTreeMap::new();
        for (key, value) in fields.iter() {
          object.insert(key.clone(), value.run(env)?);
        }
        Ok(Value::Object(Rc::new(object)))
      })
    }

    TreeKind::Member(object, name) => {
      let object = compile(object, globals);
      let name = name.clone();
      Compiled::new(move |env| object.run(env)?.property(name.as_ref()))
    }

    TreeKind::Index(object, key) => {
      let object = compile(object, globals);
      let key = compile(key, globals);
      Compiled::new(move |env| {
        let object = object.run(env)?;
        object.index(&key.run(env)?)
      })
    }

    TreeKind::Call(callee, arguments) => {
      let arguments = arguments.iter().map(|tree| compile(tree, globals)).collect::<Vec<_>>();
      let description = describe(callee);

      // method calls evaluate the receiver once and pass it as `this`
      let callee: Box<dyn Fn(&mut Env) -> Result<(Value, Value)>> = match &callee.tree_kind {
        TreeKind::Member(object, name) => {
          let object = compile(object, globals);
          let name = name.clone();
          Box::new(move |env: &mut Env| {
            let receiver = object.run(env)?;
            let method = receiver.property(name.as_ref())?;
            Ok((receiver, method))
          })
        }
        TreeKind::Index(object, key) => {
          let object = compile(object, globals);
          let key = compile(key, globals);
          Box::new(move |env: &mut Env| {
            let receiver = object.run(env)?;
            let method = receiver.index(&key.run(env)?)?;
            Ok((receiver, method))
          })
        }
        _ => {
          let callee = compile(callee, globals);
          Box::new(move |env: &mut Env| Ok((Value::Undefined, callee.run(env)?)))
        }
      };

      Compiled::new(move |env| {
        let (receiver, callee) = callee(env)?;
        let arguments = arguments
          .iter()
          .map(|argument| argument.run(env))
          .collect::<Result<Vec<_>>>()?;
        match callee {
          Value::Function(function) => function.call_with(&receiver, &arguments),
          other => type_error(format!("{description} is not a function ({})", other.type_name())),
        }
      })
    }

    TreeKind::Unary(op, operand) => {
      let op = *op;
      let operand = compile(operand, globals);
      Compiled::new(move |env| match (op, operand.run(env)?) {
        (UnaryOp::Not, value) => Ok(Value::Bool(!value.truthy())),
        (UnaryOp::Neg, Value::Number(num)) => Ok(Value::Number(-num)),
        (UnaryOp::Plus, Value::Number(num)) => Ok(Value::Number(num)),
        (op, value) => type_error(format!("cannot apply '{op}' to {}", value.type_name())),
      })
    }

    TreeKind::Binary(Op::And, lhs, rhs) => {
      let lhs = compile(lhs, globals);
      let rhs = compile(rhs, globals);
      Compiled::new(move |env| match lhs.run(env)? {
        value if !value.truthy() => Ok(value),
        _ => rhs.run(env),
      })
    }

    TreeKind::Binary(Op::Or, lhs, rhs) => {
      let lhs = compile(lhs, globals);
      let rhs = compile(rhs, globals);
      Compiled::new(move |env| match lhs.run(env)? {
        value if value.truthy() => Ok(value),
        _ => rhs.run(env),
      })
    }

    TreeKind::Binary(op, lhs, rhs) => {
      let op = *op;
      let lhs = compile(lhs, globals);
      let rhs = compile(rhs, globals);
      Compiled::new(move |env| {
        let lhs = lhs.run(env)?;
        let rhs = rhs.run(env)?;
        binary(op, lhs, rhs)
      })
    }

    TreeKind::Conditional(condition, then, otherwise) => {
      let condition = compile(condition, globals);
      let then = compile(then, globals);
      let otherwise = compile(otherwise, globals);
      Compiled::new(move |env| {
        if condition.run(env)?.truthy() {
          then.run(env)
        } else {
          otherwise.run(env)
        }
      })
    }

    TreeKind::Lambda(parameters, body) => {
      let parameters = parameters.clone();
      let body = compile(body, globals);
      Compiled::new(move |env| {
        let function = lambda(parameters.clone(), body.clone(), env.clone());
        Ok(Value::Function(function))
      })
    }

    TreeKind::Let(bind, value) => {
      let bind = bind.clone();
      let value = compile(value, globals);
      Compiled::new(move |env| {
        let value = value.run(env)?;
        env.insert(bind.clone(), value);
        Ok(Value::Undefined)
      })
    }

    TreeKind::Return(value) => compile(value, globals),

    TreeKind::Block(block) => {
      let block = block
        .iter()
        .map(|tree| (matches!(tree.tree_kind, TreeKind::Return(_)), compile(tree, globals)))
        .collect::<Vec<_>>();
      Compiled::new(move |env| {
        for (returns, statement) in block.iter() {
          let value = statement.run(env)?;
          if *returns {
            return Ok(value);
          }
        }
        Ok(Value::Undefined)
      })
    }
  }
}

fn describe(tree: &Tree) -> String {
  match &tree.tree_kind {
    TreeKind::Variable(name) => format!("'{name}'"),
    TreeKind::Member(_, name) => format!("'.{name}'"),
    _ => "expression".to_string(),
  }
}

fn int32(num: f64) -> i32 {
  if num.is_finite() {
    num.trunc() as i64 as i32
  } else {
    0
  }
}

pub fn binary(op: Op, lhs: Value, rhs: Value) -> Result<Value> {
  match (op, lhs, rhs) {
    (Op::Equal, x, y) => Ok(Value::Bool(x == y)),
    (Op::NotEqual, x, y) => Ok(Value::Bool(x != y)),
    (Op::Add, Value::Number(x), Value::Number(y)) => Ok(Value::Number(x + y)),
    (Op::Add, x @ Value::String(_), y) | (Op::Add, x, y @ Value::String(_)) => {
      Ok(Value::from(format!("{x}{y}")))
    }
    (Op::Sub, Value::Number(x), Value::Number(y)) => Ok(Value::Number(x - y)),
    (Op::Mul, Value::Number(x), Value::Number(y)) => Ok(Value::Number(x * y)),
    (Op::Div, Value::Number(x), Value::Number(y)) => Ok(Value::Number(x / y)),
    (Op::Rem, Value::Number(x), Value::Number(y)) => Ok(Value::Number(x % y)),
    (Op::BitAnd, Value::Number(x), Value::Number(y)) => Ok(Value::from(int32(x) & int32(y))),
    (Op::BitOr, Value::Number(x), Value::Number(y)) => Ok(Value::from(int32(x) | int32(y))),
    (Op::BitXor, Value::Number(x), Value::Number(y)) => Ok(Value::from(int32(x) ^ int32(y))),
    (Op::Less, Value::Number(x), Value::Number(y)) => Ok(Value::Bool(x < y)),
    (Op::LessEqual, Value::Number(x), Value::Number(y)) => Ok(Value::Bool(x <= y)),
    (Op::Greater, Value::Number(x), Value::Number(y)) => Ok(Value::Bool(x > y)),
    (Op::GreaterEqual, Value::Number(x), Value::Number(y)) => Ok(Value::Bool(x >= y)),
    (Op::Less, Value::String(x), Value::String(y)) => Ok(Value::Bool(x < y)),
    (Op::LessEqual, Value::String(x), Value::String(y)) => Ok(Value::Bool(x <= y)),
    (Op::Greater, Value::String(x), Value::String(y)) => Ok(Value::Bool(x > y)),
    (Op::GreaterEqual, Value::String(x), Value::String(y)) => Ok(Value::Bool(x >= y)),
    (op, x, y) => type_error(format!(
      "cannot apply '{op}' to {} and {}",
      x.type_name(),
      y.type_name()
    )),
  }
}

#[cfg(test)]
mod test {
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  use super::build;
  use crate::{
    error::Error,
    globals::Globals,
    loc::{Name, Source},
    parser::{parse_body, parse_expression},
    value::Value,
  };

  fn run(text: &str, parameters: &[&str], arguments: &[Value]) -> Result<Value, Error> {
    let tree = parse_expression(Source::from(text))?;
    let parameters = parameters.iter().map(|name| Name::from(*name)).collect();
    build(parameters, &tree, &Globals::standard()).call(arguments)
  }

  #[rstest]
  #[case("1 + 2 * 3", 7.0)]
  #[case("(1 + 2) * 3", 9.0)]
  #[case("7 % 4", 3.0)]
  #[case("1 / 0", f64::INFINITY)]
  #[case("-(2 - 5)", 3.0)]
  #[case("6 & 3 | 8", 10.0)]
  #[case("5 ^ 1", 4.0)]
  #[case("Math.max(1, 9, 4)", 9.0)]
  #[case("[10, 20, 30][1]", 20.0)]
  #[case("[1, 2, 3].length", 3.0)]
  #[case("{a: {b: 4}}.a.b", 4.0)]
  #[case("true ? 1 : 2", 1.0)]
  #[case("0 || 5", 5.0)]
  #[case("0 && 5", 0.0)]
  fn arithmetic(#[case] text: &str, #[case] expected: f64) {
    assert_eq!(run(text, &[], &[]).unwrap(), Value::Number(expected));
  }

  #[rstest]
  #[case("'a' + 1", "a1")]
  #[case("1.5 + 'b'", "1.5b")]
  #[case("'ab'[0] + \"cd\"[1]", "ad")]
  #[case("String([1, 2])", "1,2")]
  fn strings(#[case] text: &str, #[case] expected: &str) {
    assert_eq!(run(text, &[], &[]).unwrap(), Value::from(expected));
  }

  #[rstest]
  #[case("1 === 1", true)]
  #[case("1 == '1'", false)]
  #[case("'a' < 'b'", true)]
  #[case("2 >= 3", false)]
  #[case("!0", true)]
  #[case("[1, [2]] == [1, [2]]", true)]
  #[case("null != undefined", true)]
  fn comparisons(#[case] text: &str, #[case] expected: bool) {
    assert_eq!(run(text, &[], &[]).unwrap(), Value::Bool(expected));
  }

  #[test]
  fn parameters_bind_positionally() {
    let result = run("a - b", &["a", "b"], &[10.into(), 3.into(), 99.into()]).unwrap();
    assert_eq!(result, Value::from(7));
  }

  #[test]
  fn missing_arguments_are_undefined() {
    assert_eq!(run("b", &["a", "b"], &[1.into()]).unwrap(), Value::Undefined);
  }

  #[test]
  fn arguments_holds_every_actual_argument() {
    let result = run("arguments.length", &["a"], &[1.into(), 2.into(), 3.into()]).unwrap();
    assert_eq!(result, Value::from(3));
  }

  #[test]
  fn method_calls_pass_receiver() {
    let tree = parse_expression(Source::from("this.base + n")).unwrap();
    let method = build(vec![Name::from("n")], &tree, &Globals::standard());
    let object = Value::object([("base", Value::from(40)), ("add", Value::Function(method))]);

    let tree = parse_expression(Source::from("o.add(2)")).unwrap();
    let call = build(vec![Name::from("o")], &tree, &Globals::standard());
    assert_eq!(call.call(&[object]).unwrap(), Value::from(42));
  }

  #[test]
  fn body_returns_first_return() {
    let tree = parse_body(Source::from("var y = arguments[0] * 2; return y + 1; return 0")).unwrap();
    let function = build(vec![], &tree, &Globals::standard());
    assert_eq!(function.call(&[5.into()]).unwrap(), Value::from(11));
  }

  #[test]
  fn body_without_return_is_undefined() {
    let tree = parse_body(Source::from("1 + 1")).unwrap();
    let function = build(vec![], &tree, &Globals::standard());
    assert_eq!(function.call(&[]).unwrap(), Value::Undefined);
  }

  #[rstest]
  #[case("undefined + 1")]
  #[case("'a' - 1")]
  #[case("null.x")]
  #[case("(1)(2)")]
  #[case("-'a'")]
  #[case("[] < 1")]
  fn type_errors(#[case] text: &str) {
    assert!(matches!(run(text, &[], &[]), Err(Error::Type(_))));
  }

  #[test]
  fn unbound_names_fail_at_call_time() {
    let tree = parse_expression(Source::from("missing + 1")).unwrap();
    let function = build(vec![], &tree, &Globals::standard());
    match function.call(&[]) {
      Err(Error::Reference(error)) => assert_eq!(error.name, Name::from("missing")),
      other => panic!("unexpected result {other:?}"),
    }
  }

  #[rstest]
  #[case("false && missing", Value::Bool(false))]
  #[case("1 || missing", Value::from(1))]
  #[case("'' || null", Value::Null)]
  fn logical_operators_short_circuit(#[case] text: &str, #[case] expected: Value) {
    assert_eq!(run(text, &[], &[]).unwrap(), expected);
  }

  #[test]
  fn environment_is_fresh_per_call() {
    let tree = parse_body(Source::from("var seen = arguments.length; return seen")).unwrap();
    let function = build(vec![], &tree, &Globals::standard());
    assert_eq!(function.call(&[1.into(), 2.into()]).unwrap(), Value::from(2));
    assert_eq!(function.call(&[]).unwrap(), Value::from(0));
  }
}
