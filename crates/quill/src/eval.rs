//! The tree-walking evaluator.
//!
//! Evaluation mirrors the AST. Runtime failures are [`Value::Error`]
//! values: any node that sees an error in a subexpression returns it
//! immediately, and a program that reaches the top with one evaluates to
//! it. `return` unwinds through [`Value::Return`], which `eval_program`
//! and function application unwrap.

use std::{cell::RefCell, rc::Rc};

use crate::{
    ast::{
        BlockStatement, Expression, HashLiteral, InfixOperator, PrefixOperator, Program, Statement,
    },
    builtins::Builtin,
    env::Environment,
    io::PrintWriter,
    macros::modify_expression,
    token::{Token, TokenKind},
    value::{Function, HashValue, Value, values_equal},
};

/// Evaluates AST nodes against an [`Environment`].
///
/// The evaluator itself is stateless apart from the output writer handed
/// to built-ins; all bindings live in the environment chain.
pub struct Evaluator<'a> {
    printer: &'a mut dyn PrintWriter,
}

impl<'a> Evaluator<'a> {
    pub fn new(printer: &'a mut dyn PrintWriter) -> Self {
        Self { printer }
    }

    /// Evaluates a program, unwrapping a top-level `return`.
    pub fn eval_program(&mut self, program: &Program, env: &Rc<RefCell<Environment>>) -> Value {
        let mut result = Value::Null;
        for statement in &program.statements {
            result = self.eval_statement(statement, env);
            match result {
                Value::Return(value) => return *value,
                Value::Error(_) => return result,
                _ => {}
            }
        }
        result
    }

    /// Evaluates a block, propagating `Return` wrappers and errors to the
    /// enclosing function boundary without unwrapping them.
    pub(crate) fn eval_block(&mut self, block: &BlockStatement, env: &Rc<RefCell<Environment>>) -> Value {
        let mut result = Value::Null;
        for statement in &block.statements {
            result = self.eval_statement(statement, env);
            if matches!(result, Value::Return(_) | Value::Error(_)) {
                return result;
            }
        }
        result
    }

    fn eval_statement(&mut self, statement: &Statement, env: &Rc<RefCell<Environment>>) -> Value {
        match statement {
            Statement::Let(s) => {
                let value = self.eval_expression(&s.value, env);
                if value.is_error() {
                    return value;
                }
                env.borrow_mut().set(s.name.name.clone(), value);
                Value::Null
            }
            Statement::Return(s) => {
                let value = self.eval_expression(&s.value, env);
                if value.is_error() {
                    return value;
                }
                Value::Return(Box::new(value))
            }
            Statement::Expression(s) => self.eval_expression(&s.expression, env),
        }
    }

    fn eval_expression(&mut self, expression: &Expression, env: &Rc<RefCell<Environment>>) -> Value {
        match expression {
            Expression::Int(literal) => Value::Int(literal.value),
            Expression::Bool(literal) => Value::Bool(literal.value),
            Expression::Str(literal) => Value::string(&literal.value),
            Expression::Identifier(ident) => self.eval_identifier(&ident.name, env),
            Expression::Prefix(prefix) => {
                let right = self.eval_expression(&prefix.right, env);
                if right.is_error() {
                    return right;
                }
                eval_prefix(prefix.operator, &right)
            }
            Expression::Infix(infix) => {
                let left = self.eval_expression(&infix.left, env);
                if left.is_error() {
                    return left;
                }
                let right = self.eval_expression(&infix.right, env);
                if right.is_error() {
                    return right;
                }
                eval_infix(infix.operator, &left, &right)
            }
            Expression::If(if_expr) => {
                let condition = self.eval_expression(&if_expr.condition, env);
                if condition.is_error() {
                    return condition;
                }
                if condition.is_truthy() {
                    self.eval_block(&if_expr.consequence, env)
                } else if let Some(alternative) = &if_expr.alternative {
                    self.eval_block(alternative, env)
                } else {
                    Value::Null
                }
            }
            Expression::Function(literal) => Value::Function(Rc::new(Function {
                parameters: literal.parameters.clone(),
                body: literal.body.clone(),
                env: env.clone(),
            })),
            Expression::Macro(_) => Value::Error("misplaced macro literal".to_owned()),
            Expression::Call(call) => {
                // quote(…) receives its argument unevaluated.
                if let Expression::Identifier(ident) = call.function.as_ref()
                    && ident.name == "quote"
                    && call.arguments.len() == 1
                {
                    return self.quote(&call.arguments[0], env);
                }
                let function = self.eval_expression(&call.function, env);
                if function.is_error() {
                    return function;
                }
                let mut arguments = Vec::with_capacity(call.arguments.len());
                for argument in &call.arguments {
                    let value = self.eval_expression(argument, env);
                    if value.is_error() {
                        return value;
                    }
                    arguments.push(value);
                }
                self.apply_function(&function, arguments)
            }
            Expression::Array(literal) => {
                let mut elements = Vec::with_capacity(literal.elements.len());
                for element in &literal.elements {
                    let value = self.eval_expression(element, env);
                    if value.is_error() {
                        return value;
                    }
                    elements.push(value);
                }
                Value::Array(Rc::new(elements))
            }
            Expression::Hash(literal) => self.eval_hash_literal(literal, env),
            Expression::Index(index_expr) => {
                let left = self.eval_expression(&index_expr.left, env);
                if left.is_error() {
                    return left;
                }
                let index = self.eval_expression(&index_expr.index, env);
                if index.is_error() {
                    return index;
                }
                eval_index(&left, &index)
            }
        }
    }

    fn eval_identifier(&self, name: &str, env: &Rc<RefCell<Environment>>) -> Value {
        if let Some(value) = env.borrow().get(name) {
            return value;
        }
        if let Some(builtin) = Builtin::lookup(name) {
            return Value::Builtin(builtin);
        }
        Value::Error(format!("identifier not found: {name}"))
    }

    fn eval_hash_literal(&mut self, literal: &HashLiteral, env: &Rc<RefCell<Environment>>) -> Value {
        let mut hash = HashValue::with_capacity(literal.pairs.len());
        for (key_expr, value_expr) in &literal.pairs {
            let key = self.eval_expression(key_expr, env);
            if key.is_error() {
                return key;
            }
            let Some(hash_key) = key.hash_key() else {
                return Value::Error(format!("unusable as hash key: {}", key.kind()));
            };
            let value = self.eval_expression(value_expr, env);
            if value.is_error() {
                return value;
            }
            hash.insert(hash_key, key, value);
        }
        Value::Hash(Rc::new(hash))
    }

    fn apply_function(&mut self, function: &Value, arguments: Vec<Value>) -> Value {
        match function {
            Value::Function(function) => {
                if arguments.len() != function.parameters.len() {
                    return Value::Error(format!(
                        "wrong argument number: want={}, got={}",
                        function.parameters.len(),
                        arguments.len()
                    ));
                }
                let call_env = Environment::new_enclosed(function.env.clone());
                for (parameter, argument) in function.parameters.iter().zip(arguments) {
                    call_env.borrow_mut().set(parameter.name.clone(), argument);
                }
                match self.eval_block(&function.body, &call_env) {
                    Value::Return(value) => *value,
                    other => other,
                }
            }
            Value::Builtin(builtin) => builtin.call(&arguments, self.printer),
            other => Value::Error(format!("not a function: {}", other.kind())),
        }
    }

    /// Reifies `expression` as a `Quote`, evaluating `unquote(…)` calls
    /// inside it and splicing their results back as AST.
    fn quote(&mut self, expression: &Expression, env: &Rc<RefCell<Environment>>) -> Value {
        let processed = modify_expression(expression.clone(), &mut |node| {
            let Expression::Call(call) = &node else {
                return node;
            };
            let Expression::Identifier(ident) = call.function.as_ref() else {
                return node;
            };
            if ident.name != "unquote" || call.arguments.len() != 1 {
                return node;
            }
            let value = self.eval_expression(&call.arguments[0], env);
            value_to_expression(value, node)
        });
        Value::Quote(Rc::new(processed))
    }
}

/// Converts an evaluated unquote result back into AST.
///
/// Integers and booleans become the matching literal; a `Quote` splices
/// its wrapped node verbatim. Any other value leaves the unquote call in
/// place.
fn value_to_expression(value: Value, fallback: Expression) -> Expression {
    match value {
        Value::Int(v) => Expression::Int(crate::ast::IntegerLiteral {
            token: Token::new(TokenKind::Int, v.to_string()),
            value: v,
        }),
        Value::Bool(v) => Expression::Bool(crate::ast::BooleanLiteral {
            token: Token::new(
                if v { TokenKind::True } else { TokenKind::False },
                if v { "true" } else { "false" },
            ),
            value: v,
        }),
        Value::Quote(node) => (*node).clone(),
        _ => fallback,
    }
}

fn eval_prefix(operator: PrefixOperator, right: &Value) -> Value {
    match operator {
        PrefixOperator::Bang => Value::Bool(!right.is_truthy()),
        PrefixOperator::Minus => match right {
            Value::Int(value) => Value::Int(value.wrapping_neg()),
            other => Value::Error(format!("unknown operator: -{}", other.kind())),
        },
    }
}

fn eval_infix(operator: InfixOperator, left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => eval_integer_infix(operator, *l, *r),
        (Value::Str(l), Value::Str(r)) => match operator {
            InfixOperator::Plus => Value::string(format!("{l}{r}")),
            InfixOperator::Eq => Value::Bool(l == r),
            InfixOperator::NotEq => Value::Bool(l != r),
            _ => unknown_operator(operator, left, right),
        },
        _ => match operator {
            InfixOperator::Eq => Value::Bool(values_equal(left, right)),
            InfixOperator::NotEq => Value::Bool(!values_equal(left, right)),
            _ => unknown_operator(operator, left, right),
        },
    }
}

fn eval_integer_infix(operator: InfixOperator, left: i64, right: i64) -> Value {
    match operator {
        InfixOperator::Plus => Value::Int(left.wrapping_add(right)),
        InfixOperator::Minus => Value::Int(left.wrapping_sub(right)),
        InfixOperator::Star => Value::Int(left.wrapping_mul(right)),
        InfixOperator::Slash => {
            if right == 0 {
                Value::Error("division by zero".to_owned())
            } else {
                Value::Int(left.wrapping_div(right))
            }
        }
        InfixOperator::Lt => Value::Bool(left < right),
        InfixOperator::Lte => Value::Bool(left <= right),
        InfixOperator::Gt => Value::Bool(left > right),
        InfixOperator::Gte => Value::Bool(left >= right),
        InfixOperator::Eq => Value::Bool(left == right),
        InfixOperator::NotEq => Value::Bool(left != right),
    }
}

fn unknown_operator(operator: InfixOperator, left: &Value, right: &Value) -> Value {
    Value::Error(format!("unknown operator: {} {operator} {}", left.kind(), right.kind()))
}

fn eval_index(left: &Value, index: &Value) -> Value {
    match (left, index) {
        (Value::Array(elements), Value::Int(i)) => usize::try_from(*i)
            .ok()
            .and_then(|i| elements.get(i).cloned())
            .unwrap_or(Value::Null),
        (Value::Str(content), Value::Int(i)) => usize::try_from(*i)
            .ok()
            .and_then(|i| content.chars().nth(i))
            .map_or(Value::Null, |c| Value::string(c.to_string())),
        (Value::Hash(hash), key) => match key.hash_key() {
            Some(hash_key) => hash.get(hash_key).cloned().unwrap_or(Value::Null),
            None => Value::Error(format!("unusable as hash key: {}", key.kind())),
        },
        _ => Value::Error(format!("index operator not supported: {}", left.kind())),
    }
}
