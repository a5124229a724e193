//! Runtime values shared by both execution engines.
//!
//! Small immediate values (integers, booleans, null) are stored inline;
//! everything else shares its payload behind `Rc`, since values are
//! immutable once built — built-ins that "modify" a container return a
//! fresh one. The evaluator materializes runtime errors as [`Value::Error`]
//! so they can propagate through expression evaluation; the VM surfaces
//! errors from `run` instead.

use std::{cell::RefCell, fmt, rc::Rc};

use indexmap::IndexMap;
use strum::Display;

use crate::{
    ast::{BlockStatement, Expression, Identifier},
    builtins::Builtin,
    bytecode::Instructions,
    env::Environment,
};

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Str(Rc<str>),
    Null,
    Array(Rc<Vec<Value>>),
    Hash(Rc<HashValue>),
    /// A user function as the evaluator sees it: parameters, body, and the
    /// environment captured at the definition site.
    Function(Rc<Function>),
    /// A unit of compiled bytecode. Only ever executed through a [`Closure`].
    CompiledFunction(Rc<CompiledFunction>),
    /// A compiled function paired with its captured free-variable values.
    Closure(Rc<Closure>),
    Builtin(Builtin),
    /// A reified AST fragment, produced by `quote(…)`.
    Quote(Rc<Expression>),
    /// A macro definition captured by `define_macros`.
    Macro(Rc<MacroValue>),
    /// Evaluator-only wrapper that unwinds a `return` to the nearest
    /// function boundary. Never observable from language code.
    Return(Box<Value>),
    /// Evaluator-only error value; see the module docs.
    Error(String),
}

/// The kind tag of a [`Value`], used in error messages and hash keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ValueKind {
    #[strum(serialize = "INTEGER")]
    Integer,
    #[strum(serialize = "BOOLEAN")]
    Boolean,
    #[strum(serialize = "STRING")]
    String,
    #[strum(serialize = "NULL")]
    Null,
    #[strum(serialize = "ARRAY")]
    Array,
    #[strum(serialize = "HASH")]
    Hash,
    #[strum(serialize = "FUNCTION")]
    Function,
    #[strum(serialize = "COMPILED_FUNCTION")]
    CompiledFunction,
    #[strum(serialize = "CLOSURE")]
    Closure,
    #[strum(serialize = "BUILTIN")]
    Builtin,
    #[strum(serialize = "QUOTE")]
    Quote,
    #[strum(serialize = "MACRO")]
    Macro,
    #[strum(serialize = "RETURN_VALUE")]
    ReturnValue,
    #[strum(serialize = "ERROR")]
    Error,
}

/// A user function value for the tree-walking evaluator.
#[derive(Debug)]
pub struct Function {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: Rc<RefCell<Environment>>,
}

/// A macro definition: like a function, but its body runs on quoted
/// argument ASTs during expansion rather than on values at run time.
#[derive(Debug)]
pub struct MacroValue {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: Rc<RefCell<Environment>>,
}

/// Instructions plus the frame layout the VM needs to call them.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFunction {
    pub instructions: Instructions,
    /// Total local slots, parameters included.
    pub num_locals: usize,
    pub num_parameters: usize,
}

/// A compiled function bound to its captured free values.
#[derive(Debug)]
pub struct Closure {
    pub function: Rc<CompiledFunction>,
    pub free: Vec<Value>,
}

/// Key under which a value is stored in a hash map.
///
/// Only integers, booleans, and strings are admissible; anything else is
/// "unusable as hash key". The key is a `(kind, 64-bit)` pair so equal
/// values of different kinds can never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub kind: ValueKind,
    pub value: u64,
}

/// A hash-map value.
///
/// Pairs are keyed by [`HashKey`] but keep the original key value for
/// display. Insertion order is preserved, which makes display and the
/// compiler's pair emission deterministic.
#[derive(Debug, Default, PartialEq)]
pub struct HashValue {
    pub pairs: IndexMap<HashKey, (Value, Value)>,
}

impl HashValue {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pairs: IndexMap::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, key: HashKey, original_key: Value, value: Value) {
        self.pairs.insert(key, (original_key, value));
    }

    #[must_use]
    pub fn get(&self, key: HashKey) -> Option<&Value> {
        self.pairs.get(&key).map(|(_, value)| value)
    }
}

/// FNV-1a 64-bit offset basis.
const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
/// FNV-1a 64-bit prime.
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Hashes bytes with 64-bit FNV-1a.
///
/// String hash keys use this deterministic hash so a string key computed
/// at compile time (constants pool) and one built at run time always land
/// on the same slot.
#[must_use]
pub(crate) fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

impl Value {
    /// A shared string value.
    #[must_use]
    pub fn string(content: impl AsRef<str>) -> Self {
        Self::Str(Rc::from(content.as_ref()))
    }

    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Int(_) => ValueKind::Integer,
            Self::Bool(_) => ValueKind::Boolean,
            Self::Str(_) => ValueKind::String,
            Self::Null => ValueKind::Null,
            Self::Array(_) => ValueKind::Array,
            Self::Hash(_) => ValueKind::Hash,
            Self::Function(_) => ValueKind::Function,
            Self::CompiledFunction(_) => ValueKind::CompiledFunction,
            Self::Closure(_) => ValueKind::Closure,
            Self::Builtin(_) => ValueKind::Builtin,
            Self::Quote(_) => ValueKind::Quote,
            Self::Macro(_) => ValueKind::Macro,
            Self::Return(_) => ValueKind::ReturnValue,
            Self::Error(_) => ValueKind::Error,
        }
    }

    /// Truthiness: `false`, `null`, and `0` are falsy, everything else is
    /// truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Bool(false) | Self::Null | Self::Int(0))
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The hash key for this value, or `None` if its kind is not hashable.
    #[must_use]
    pub fn hash_key(&self) -> Option<HashKey> {
        let key = match self {
            Self::Int(value) => HashKey {
                kind: ValueKind::Integer,
                value: u64::from_ne_bytes(value.to_ne_bytes()),
            },
            Self::Bool(value) => HashKey {
                kind: ValueKind::Boolean,
                value: u64::from(*value),
            },
            Self::Str(content) => HashKey {
                kind: ValueKind::String,
                value: fnv1a_64(content.as_bytes()),
            },
            _ => return None,
        };
        Some(key)
    }
}

/// Language-level `==`.
///
/// Matching primitive kinds compare by value; every other pairing compares
/// by truthiness, preserving the original design.
#[must_use]
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Null, Value::Null) => true,
        _ => left.is_truthy() == right.is_truthy(),
    }
}

impl PartialEq for Value {
    /// Structural equality for primitives and containers; identity for
    /// functions, closures, and macros. Used by tests and host embedders;
    /// language-level `==` goes through [`values_equal`].
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Null, Self::Null) => true,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Hash(a), Self::Hash(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::CompiledFunction(a), Self::CompiledFunction(b)) => Rc::ptr_eq(a, b),
            (Self::Closure(a), Self::Closure(b)) => Rc::ptr_eq(a, b),
            (Self::Builtin(a), Self::Builtin(b)) => a == b,
            (Self::Quote(a), Self::Quote(b)) => a == b,
            (Self::Macro(a), Self::Macro(b)) => Rc::ptr_eq(a, b),
            (Self::Return(a), Self::Return(b)) => a == b,
            (Self::Error(a), Self::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Str(content) => write!(f, "\"{content}\""),
            Self::Null => write!(f, "null"),
            Self::Array(elements) => {
                write!(f, "[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{element}")?;
                }
                write!(f, "]")
            }
            Self::Hash(hash) => {
                write!(f, "{{")?;
                for (i, (key, value)) in hash.pairs.values().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            Self::Function(function) => {
                write!(f, "fn(")?;
                for (i, parameter) in function.parameters.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{parameter}")?;
                }
                write!(f, ") {{\n{}\n}}", function.body)
            }
            Self::Macro(macro_value) => {
                write!(f, "macro(")?;
                for (i, parameter) in macro_value.parameters.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{parameter}")?;
                }
                write!(f, ") {{\n{}\n}}", macro_value.body)
            }
            Self::CompiledFunction(function) => {
                write!(f, "CompiledFunction[{:p}]", Rc::as_ptr(function))
            }
            // A closure displays as its function.
            Self::Closure(closure) => write!(f, "CompiledFunction[{:p}]", Rc::as_ptr(&closure.function)),
            Self::Builtin(_) => write!(f, "builtin function"),
            Self::Quote(node) => write!(f, "QUOTE({node})"),
            Self::Return(value) => write!(f, "{value}"),
            Self::Error(message) => write!(f, "ERROR: {message}"),
        }
    }
}
