//! The built-in function library.
//!
//! Built-ins are identified by their discriminant: the enum order below IS
//! the registration order shared by the compiler's symbol table and the
//! VM's `GetBuiltin` dispatch, so it must never be reordered. Errors are
//! returned as [`Value::Error`] with fixed messages that callers (and
//! tests) match on.

use std::fmt::Write as _;
use std::rc::Rc;

use strum::{Display, EnumIter, EnumString, FromRepr, IntoStaticStr};

use crate::{io::PrintWriter, value::Value};

/// A host-provided function callable from language code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, FromRepr, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum Builtin {
    Len,
    First,
    Last,
    Rest,
    Push,
    Puts,
}

impl Builtin {
    /// Resolves a source-level name to its built-in, if any.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    /// Recovers a built-in from its registration index.
    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        Self::from_repr(index)
    }

    /// The registration index encoded by `GetBuiltin`.
    #[must_use]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Invokes the built-in. Failures come back as [`Value::Error`].
    pub fn call(self, args: &[Value], printer: &mut dyn PrintWriter) -> Value {
        match self {
            Self::Len => Self::len(args),
            Self::First => Self::first(args),
            Self::Last => Self::last(args),
            Self::Rest => Self::rest(args),
            Self::Push => Self::push(args),
            Self::Puts => {
                for arg in args {
                    printer.write_line(&arg.to_string());
                }
                Value::Null
            }
        }
    }

    fn len(args: &[Value]) -> Value {
        if args.len() != 1 {
            return wrong_arg_count(args.len(), 1);
        }
        match &args[0] {
            // Lengths count Unicode scalar values, not bytes.
            Value::Str(content) => Value::Int(content.chars().count() as i64),
            Value::Array(elements) => Value::Int(elements.len() as i64),
            other => Value::Error(format!("argument to 'len' not supported, got {}", other.kind())),
        }
    }

    fn first(args: &[Value]) -> Value {
        if args.len() != 1 {
            return wrong_arg_count(args.len(), 1);
        }
        match &args[0] {
            Value::Str(content) => content
                .chars()
                .next()
                .map_or(Value::Null, |c| Value::string(c.to_string())),
            Value::Array(elements) => elements.first().cloned().unwrap_or(Value::Null),
            other => Value::Error(format!("argument to 'first' not supported, got {}", other.kind())),
        }
    }

    fn last(args: &[Value]) -> Value {
        if args.len() != 1 {
            return wrong_arg_count(args.len(), 1);
        }
        match &args[0] {
            Value::Str(content) => content
                .chars()
                .last()
                .map_or(Value::Null, |c| Value::string(c.to_string())),
            Value::Array(elements) => elements.last().cloned().unwrap_or(Value::Null),
            other => Value::Error(format!("argument to 'last' not supported, got {}", other.kind())),
        }
    }

    fn rest(args: &[Value]) -> Value {
        if args.len() != 1 {
            return wrong_arg_count(args.len(), 1);
        }
        match &args[0] {
            Value::Str(content) => {
                if content.is_empty() {
                    Value::Null
                } else {
                    let rest: String = content.chars().skip(1).collect();
                    Value::string(rest)
                }
            }
            Value::Array(elements) => {
                if elements.is_empty() {
                    Value::Null
                } else {
                    Value::Array(Rc::new(elements[1..].to_vec()))
                }
            }
            other => Value::Error(format!("argument to 'rest' not supported, got {}", other.kind())),
        }
    }

    /// `push(array, e…)` appends elements; `push(string, e…)` concatenates
    /// string representations. Always returns a new container.
    fn push(args: &[Value]) -> Value {
        if args.len() < 2 {
            return wrong_arg_count(args.len(), 2);
        }
        match &args[0] {
            Value::Array(elements) => {
                let mut extended = elements.as_ref().clone();
                extended.extend(args[1..].iter().cloned());
                Value::Array(Rc::new(extended))
            }
            Value::Str(content) => {
                let mut extended = content.to_string();
                for arg in &args[1..] {
                    match arg {
                        Value::Str(tail) => extended.push_str(tail),
                        other => {
                            let _ = write!(extended, "{other}");
                        }
                    }
                }
                Value::string(extended)
            }
            other => Value::Error(format!("argument to 'push' not supported, got {}", other.kind())),
        }
    }
}

fn wrong_arg_count(got: usize, want: usize) -> Value {
    Value::Error(format!("wrong number of arguments. got={got}, want={want}"))
}
