//! One-shot execution helpers and engine selection.

use std::{error, fmt};

use strum::{Display, EnumString};

use crate::{
    bytecode::{CompileError, Compiler, RuntimeError, Vm},
    env::Environment,
    eval::Evaluator,
    io::PrintWriter,
    macros::{define_macros, expand_macros},
    parser::{ParseErrors, parse},
    value::Value,
};

/// Which back-end executes the program. Both must agree on observable
/// results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Engine {
    Vm,
    Eval,
}

/// Any failure on the source→result pipeline.
///
/// Note that evaluator runtime errors are *not* reported here: the
/// evaluator materializes them as [`Value::Error`] results instead.
#[derive(Debug)]
pub enum RunError {
    Parse(ParseErrors),
    Compile(CompileError),
    Runtime(RuntimeError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(errors) => write!(f, "{errors}"),
            Self::Compile(error) => write!(f, "{error}"),
            Self::Runtime(error) => write!(f, "{error}"),
        }
    }
}

impl error::Error for RunError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Parse(errors) => Some(errors),
            Self::Compile(error) => Some(error),
            Self::Runtime(error) => Some(error),
        }
    }
}

impl From<ParseErrors> for RunError {
    fn from(errors: ParseErrors) -> Self {
        Self::Parse(errors)
    }
}

impl From<CompileError> for RunError {
    fn from(error: CompileError) -> Self {
        Self::Compile(error)
    }
}

impl From<RuntimeError> for RunError {
    fn from(error: RuntimeError) -> Self {
        Self::Runtime(error)
    }
}

/// Parses, expands macros, and runs `source` on the chosen engine,
/// returning the program's result value.
pub fn run_source(source: &str, engine: Engine, printer: &mut dyn PrintWriter) -> Result<Value, RunError> {
    let mut program = parse(source)?;
    let macro_env = Environment::new();
    define_macros(&mut program, &macro_env);
    let program = expand_macros(program, &macro_env, printer);

    match engine {
        Engine::Eval => {
            let env = Environment::new();
            Ok(Evaluator::new(printer).eval_program(&program, &env))
        }
        Engine::Vm => {
            let mut compiler = Compiler::new();
            compiler.compile(&program)?;
            let mut vm = Vm::new(compiler.bytecode(), printer);
            vm.run()?;
            Ok(vm.last_popped().clone())
        }
    }
}
