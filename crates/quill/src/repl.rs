//! Persistent interactive sessions.
//!
//! `ReplSession` keeps interpreter state alive across `execute()` calls:
//! the macro environment, the compiler's symbol table and constants pool,
//! and the VM's globals array. All of these are append-only, so an index
//! assigned by an earlier entry stays valid in every later one.

use std::{cell::RefCell, rc::Rc};

use crate::{
    bytecode::{Compiler, SymbolTable, Vm},
    env::Environment,
    io::PrintWriter,
    macros::{define_macros, expand_macros},
    parser::parse,
    run::RunError,
    value::Value,
};

/// A REPL session: compile→run with state carried between entries.
#[derive(Debug)]
pub struct ReplSession {
    macro_env: Rc<RefCell<Environment>>,
    symbol_table: SymbolTable,
    constants: Vec<Value>,
    globals: Vec<Value>,
}

impl Default for ReplSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            macro_env: Environment::new(),
            symbol_table: SymbolTable::with_builtins(),
            constants: Vec::new(),
            globals: Vec::new(),
        }
    }

    /// Runs one entry and returns its result value.
    ///
    /// Macros defined by the entry are registered for all later entries;
    /// `let` bindings land in the shared globals array.
    pub fn execute(&mut self, source: &str, printer: &mut dyn PrintWriter) -> Result<Value, RunError> {
        let mut program = parse(source)?;
        define_macros(&mut program, &self.macro_env);
        let program = expand_macros(program, &self.macro_env, printer);

        let mut compiler = Compiler::with_state(
            std::mem::take(&mut self.symbol_table),
            std::mem::take(&mut self.constants),
        );
        let compiled = compiler.compile(&program);
        let bytecode = compiler.bytecode();
        // Take the state back even when compilation failed, so the session
        // stays usable.
        (self.symbol_table, self.constants) = compiler.into_state();
        compiled?;

        let mut vm = Vm::with_globals(bytecode, std::mem::take(&mut self.globals), printer);
        let ran = vm.run();
        let value = vm.last_popped().clone();
        self.globals = vm.into_globals();
        ran?;
        Ok(value)
    }
}
