#![doc = include_str!("../../../README.md")]

pub mod ast;
pub mod builtins;
pub mod bytecode;
pub mod env;
pub mod eval;
pub mod io;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod repl;
pub mod run;
pub mod token;
pub mod value;

pub use crate::{
    builtins::Builtin,
    bytecode::{Bytecode, CompileError, Compiler, Instructions, Opcode, RuntimeError, SymbolTable, Vm},
    env::Environment,
    eval::Evaluator,
    io::{CollectStringPrint, NoPrint, PrintWriter, StdPrint},
    lexer::Lexer,
    macros::{define_macros, expand_macros},
    parser::{ParseErrors, Parser, parse},
    repl::ReplSession,
    run::{Engine, RunError, run_source},
    value::{Value, ValueKind},
};
