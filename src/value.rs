use std::{collections::BTreeMap, rc::Rc};

use crate::{
  error::{type_error, Result},
  loc::{Name, Text},
};

#[derive(Clone, Debug, Default)]
pub enum Value {
  #[default]
  Undefined,
  Null,
  Bool(bool),
  Number(f64),
  String(Text),
  Array(Rc<Vec<Value>>),
  Object(Rc<BTreeMap<Name, Value>>),
  Function(Function),
}

type Invoke = dyn Fn(&Value, &[Value]) -> Result<Value>;

struct Repr {
  parameters: Vec<Name>,
  arity: usize,
  invoke: Box<Invoke>,
}

#[derive(Clone)]
pub struct Function(Rc<Repr>);

impl Function {
  pub fn new(arity: usize, invoke: impl Fn(&[Value]) -> Result<Value> + 'static) -> Self {
    Self::with_receiver(arity, move |_, arguments| invoke(arguments))
  }

  pub fn with_receiver(
    arity: usize,
    invoke: impl Fn(&Value, &[Value]) -> Result<Value> + 'static,
  ) -> Self {
    Self(Rc::new(Repr {
      parameters: vec![],
      arity,
      invoke: Box::new(invoke),
    }))
  }

  pub(crate) fn lambda(
    parameters: Vec<Name>,
    invoke: impl Fn(&Value, &[Value]) -> Result<Value> + 'static,
  ) -> Self {
    Self(Rc::new(Repr {
      arity: parameters.len(),
      parameters,
      invoke: Box::new(invoke),
    }))
  }

  pub fn call(&self, arguments: &[Value]) -> Result<Value> {
    self.call_with(&Value::Undefined, arguments)
  }

  pub fn call_with(&self, this: &Value, arguments: &[Value]) -> Result<Value> {
    (self.0.invoke)(this, arguments)
  }

  pub fn arity(&self) -> usize {
    self.0.arity
  }

  pub fn parameters(&self) -> &[Name] {
    &self.0.parameters
  }

  pub fn ptr_eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.0, &other.0)
  }
}

impl std::fmt::Debug for Function {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let parameters = self.0.parameters.iter().map(Name::as_ref).collect::<Vec<_>>();
    write!(f, "Function({})", parameters.join(", "))
  }
}

impl PartialEq for Function {
  fn eq(&self, other: &Self) -> bool {
    self.ptr_eq(other)
  }
}

impl PartialEq for Value {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
      (Value::Bool(x), Value::Bool(y)) => x == y,
      (Value::Number(x), Value::Number(y)) => x == y,
      (Value::String(x), Value::String(y)) => x == y,
      (Value::Array(x), Value::Array(y)) => x == y,
      (Value::Object(x), Value::Object(y)) => x == y,
      (Value::Function(x), Value::Function(y)) => x == y,
      _ => false,
    }
  }
}

impl Value {
  pub fn truthy(&self) -> bool {
    match self {
      Value::Undefined | Value::Null => false,
      Value::Bool(bool) => *bool,
      Value::Number(num) => *num != 0.0 && !num.is_nan(),
      Value::String(text) => !text.as_ref().is_empty(),
      Value::Array(_) | Value::Object(_) | Value::Function(_) => true,
    }
  }

  pub fn type_name(&self) -> &'static str {
    match self {
      Value::Undefined => "undefined",
      Value::Null => "null",
      Value::Bool(_) => "boolean",
      Value::Number(_) => "number",
      Value::String(_) => "string",
      Value::Array(_) => "array",
      Value::Object(_) => "object",
      Value::Function(_) => "function",
    }
  }

  pub fn to_number(&self) -> f64 {
    match self {
      Value::Number(num) => *num,
      Value::Bool(bool) => f64::from(u8::from(*bool)),
      Value::Null => 0.0,
      Value::String(text) => match text.as_ref().trim() {
        "" => 0.0,
        text => text.parse().unwrap_or(f64::NAN),
      },
      _ => f64::NAN,
    }
  }

  pub fn object<K: Into<Name>>(fields: impl IntoIterator<Item = (K, Value)>) -> Self {
    let fields = fields.into_iter().map(|(key, value)| (key.into(), value));
    Value::Object(Rc::new(fields.collect()))
  }

  pub fn property(&self, name: &str) -> Result<Value> {
    match self {
      Value::Undefined | Value::Null => {
        type_error(format!("cannot read property '{name}' of {}", self.type_name()))
      }
      Value::Object(fields) => Ok(fields.get(name).cloned().unwrap_or_default()),
      Value::Array(items) if name == "length" => Ok(Value::Number(items.len() as f64)),
      Value::String(text) if name == "length" => {
        Ok(Value::Number(text.as_ref().chars().count() as f64))
      }
      Value::Function(function) if name == "length" => Ok(Value::Number(function.arity() as f64)),
      Value::Array(_) | Value::String(_) => match name.parse::<usize>() {
        Ok(index) => Ok(self.element(index)),
        Err(_) => Ok(Value::Undefined),
      },
      _ => Ok(Value::Undefined),
    }
  }

  pub fn index(&self, key: &Value) -> Result<Value> {
    match key {
      Value::Number(num) if num.fract() == 0.0 && *num >= 0.0 => match self {
        Value::Array(_) | Value::String(_) => Ok(self.element(*num as usize)),
        _ => self.property(&format_number(*num)),
      },
      key => self.property(&key.to_string()),
    }
  }

  fn element(&self, index: usize) -> Value {
    match self {
      Value::Array(items) => items.get(index).cloned().unwrap_or_default(),
      Value::String(text) => match text.as_ref().chars().nth(index) {
        Some(char) => Value::String(Text::from(char.to_string())),
        None => Value::Undefined,
      },
      _ => Value::Undefined,
    }
  }
}

/// Renders a number the way script engines print it: integral values without a fraction.
pub fn format_number(num: f64) -> String {
  if num.is_nan() {
    "NaN".to_string()
  } else if num.is_infinite() {
    let sign = if num > 0.0 { "" } else { "-" };
    format!("{sign}Infinity")
  } else if num.fract() == 0.0 && num.abs() < 1e15 {
    format!("{}", num as i64)
  } else {
    format!("{num}")
  }
}

impl std::fmt::Display for Value {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Value::Undefined => write!(f, "undefined"),
      Value::Null => write!(f, "null"),
      Value::Bool(bool) => write!(f, "{bool}"),
      Value::Number(num) => write!(f, "{}", format_number(*num)),
      Value::String(text) => write!(f, "{text}"),
      Value::Array(items) => {
        for (i, item) in items.iter().enumerate() {
          if i > 0 {
            write!(f, ",")?;
          }
          match item {
            Value::Undefined | Value::Null => {}
            item => write!(f, "{item}")?,
          }
        }
        Ok(())
      }
      Value::Object(_) => write!(f, "[object Object]"),
      Value::Function(_) => write!(f, "function"),
    }
  }
}

impl From<f64> for Value {
  fn from(value: f64) -> Self {
    Value::Number(value)
  }
}

impl From<i32> for Value {
  fn from(value: i32) -> Self {
    Value::Number(value.into())
  }
}

impl From<bool> for Value {
  fn from(value: bool) -> Self {
    Value::Bool(value)
  }
}

impl From<&str> for Value {
  fn from(value: &str) -> Self {
    Value::String(Text::from(value))
  }
}

impl From<String> for Value {
  fn from(value: String) -> Self {
    Value::String(Text::from(value))
  }
}

impl From<Vec<Value>> for Value {
  fn from(value: Vec<Value>) -> Self {
    Value::Array(Rc::new(value))
  }
}

impl From<Function> for Value {
  fn from(value: Function) -> Self {
    Value::Function(value)
  }
}
