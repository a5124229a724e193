//! Macro definition extraction and call-site expansion.
//!
//! Macros run between parsing and execution: `define_macros` pulls macro
//! definitions out of the program, then `expand_macros` rewrites every
//! call to a registered macro by evaluating the macro body over the
//! *quoted* argument ASTs and splicing the resulting code in place.
//!
//! The rewrite primitive is [`modify_expression`], a sequential post-order
//! walk: children are rebuilt first, then the callback observes the node.
//! The callback sees every expression exactly once.

use std::{cell::RefCell, rc::Rc};

use crate::{
    ast::{BlockStatement, Expression, Program, Statement},
    env::Environment,
    eval::Evaluator,
    io::PrintWriter,
    value::{MacroValue, Value},
};

/// Rewrites every expression in `program`, children before parents.
pub fn modify_program(mut program: Program, f: &mut dyn FnMut(Expression) -> Expression) -> Program {
    program.statements = program
        .statements
        .into_iter()
        .map(|statement| modify_statement(statement, f))
        .collect();
    program
}

/// Rewrites the expressions carried by one statement.
pub fn modify_statement(statement: Statement, f: &mut dyn FnMut(Expression) -> Expression) -> Statement {
    match statement {
        Statement::Let(mut s) => {
            s.value = modify_expression(s.value, f);
            Statement::Let(s)
        }
        Statement::Return(mut s) => {
            s.value = modify_expression(s.value, f);
            Statement::Return(s)
        }
        Statement::Expression(mut s) => {
            s.expression = modify_expression(s.expression, f);
            Statement::Expression(s)
        }
    }
}

fn modify_block(mut block: BlockStatement, f: &mut dyn FnMut(Expression) -> Expression) -> BlockStatement {
    block.statements = block
        .statements
        .into_iter()
        .map(|statement| modify_statement(statement, f))
        .collect();
    block
}

/// Post-order rewrite of one expression tree.
///
/// Every child position that can carry an expression is descended into:
/// both sides of infix and index expressions, condition and branches of
/// `if`, array elements, hash keys and values, function parameters and
/// bodies, and call callees and arguments.
pub fn modify_expression(expression: Expression, f: &mut dyn FnMut(Expression) -> Expression) -> Expression {
    let rebuilt = match expression {
        Expression::Prefix(mut e) => {
            e.right = Box::new(modify_expression(*e.right, f));
            Expression::Prefix(e)
        }
        Expression::Infix(mut e) => {
            e.left = Box::new(modify_expression(*e.left, f));
            e.right = Box::new(modify_expression(*e.right, f));
            Expression::Infix(e)
        }
        Expression::Index(mut e) => {
            e.left = Box::new(modify_expression(*e.left, f));
            e.index = Box::new(modify_expression(*e.index, f));
            Expression::Index(e)
        }
        Expression::If(mut e) => {
            e.condition = Box::new(modify_expression(*e.condition, f));
            e.consequence = modify_block(e.consequence, f);
            e.alternative = e.alternative.map(|alternative| modify_block(alternative, f));
            Expression::If(e)
        }
        Expression::Array(mut e) => {
            e.elements = e
                .elements
                .into_iter()
                .map(|element| modify_expression(element, f))
                .collect();
            Expression::Array(e)
        }
        Expression::Hash(mut e) => {
            e.pairs = e
                .pairs
                .into_iter()
                .map(|(key, value)| (modify_expression(key, f), modify_expression(value, f)))
                .collect();
            Expression::Hash(e)
        }
        Expression::Function(mut e) => {
            e.parameters = e
                .parameters
                .into_iter()
                .map(|parameter| match modify_expression(Expression::Identifier(parameter.clone()), f) {
                    Expression::Identifier(rewritten) => rewritten,
                    _ => parameter,
                })
                .collect();
            e.body = modify_block(e.body, f);
            Expression::Function(e)
        }
        Expression::Macro(mut e) => {
            e.body = modify_block(e.body, f);
            Expression::Macro(e)
        }
        Expression::Call(mut e) => {
            e.function = Box::new(modify_expression(*e.function, f));
            e.arguments = e
                .arguments
                .into_iter()
                .map(|argument| modify_expression(argument, f))
                .collect();
            Expression::Call(e)
        }
        leaf @ (Expression::Identifier(_) | Expression::Int(_) | Expression::Bool(_) | Expression::Str(_)) => leaf,
    };
    f(rebuilt)
}

/// Removes every top-level `let <name> = macro(…){…};` from the program
/// and registers it in `env` as a [`Value::Macro`] carrying the macro's
/// parameters, body, and the environment snapshot.
pub fn define_macros(program: &mut Program, env: &Rc<RefCell<Environment>>) {
    let statements = std::mem::take(&mut program.statements);
    program.statements = statements
        .into_iter()
        .filter(|statement| {
            if let Statement::Let(let_statement) = statement
                && let Expression::Macro(macro_literal) = &let_statement.value
            {
                let macro_value = MacroValue {
                    parameters: macro_literal.parameters.clone(),
                    body: macro_literal.body.clone(),
                    env: env.clone(),
                };
                env.borrow_mut()
                    .set(let_statement.name.name.clone(), Value::Macro(Rc::new(macro_value)));
                return false;
            }
            true
        })
        .collect();
}

/// Expands every call to a macro registered in `env`.
///
/// Arguments are bound *unevaluated*, each wrapped in a [`Value::Quote`];
/// the macro body then runs in a fresh frame over the macro's captured
/// environment. A body that evaluates to a `Quote` has its wrapped node
/// spliced over the call site; any other result leaves the call
/// unchanged. Expansion is idempotent once all macros are defined.
pub fn expand_macros(
    program: Program,
    env: &Rc<RefCell<Environment>>,
    printer: &mut dyn PrintWriter,
) -> Program {
    modify_program(program, &mut |expression| {
        let Expression::Call(call) = &expression else {
            return expression;
        };
        let Expression::Identifier(ident) = call.function.as_ref() else {
            return expression;
        };
        let Some(Value::Macro(macro_value)) = env.borrow().get(&ident.name) else {
            return expression;
        };

        let expansion_env = Environment::new_enclosed(macro_value.env.clone());
        for (parameter, argument) in macro_value.parameters.iter().zip(&call.arguments) {
            expansion_env
                .borrow_mut()
                .set(parameter.name.clone(), Value::Quote(Rc::new(argument.clone())));
        }

        let mut result = Evaluator::new(printer).eval_block(&macro_value.body, &expansion_env);
        if let Value::Return(inner) = result {
            result = *inner;
        }
        match result {
            Value::Quote(node) => (*node).clone(),
            _ => expression,
        }
    })
}
