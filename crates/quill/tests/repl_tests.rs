//! Behavioral tests for `ReplSession`: interpreter state (globals,
//! constants, symbol table, macros) persists across `execute()` calls.

use pretty_assertions::assert_eq;
use quill::{CollectStringPrint, NoPrint, ReplSession, Value};

fn execute(session: &mut ReplSession, source: &str) -> Value {
    session
        .execute(source, &mut NoPrint)
        .unwrap_or_else(|error| panic!("execute failed for {source:?}: {error}"))
}

/// Executing an expression returns its value.
#[test]
fn expressions_return_their_value() {
    let mut session = ReplSession::new();
    assert_eq!(execute(&mut session, "1 + 2"), Value::Int(3));
}

/// A let entry binds a global that later entries can read.
#[test]
fn globals_persist_across_entries() {
    let mut session = ReplSession::new();
    execute(&mut session, "let x = 5;");
    assert_eq!(execute(&mut session, "x"), Value::Int(5));
    assert_eq!(execute(&mut session, "x * 3"), Value::Int(15));
}

/// A let entry itself evaluates to null.
#[test]
fn let_entries_produce_null() {
    let mut session = ReplSession::new();
    assert_eq!(execute(&mut session, "let x = 5;"), Value::Null);
}

/// Functions defined in one entry are callable in later ones, including
/// recursively.
#[test]
fn functions_persist_across_entries() {
    let mut session = ReplSession::new();
    execute(&mut session, "let double = fn(x) { x * 2 };");
    assert_eq!(execute(&mut session, "double(21)"), Value::Int(42));
    execute(
        &mut session,
        "let fib = fn(x){ if(x==0){0} else { if(x==1){1} else { fib(x-1)+fib(x-2) } } };",
    );
    assert_eq!(execute(&mut session, "fib(10)"), Value::Int(55));
}

/// Globals keep their slots as later entries define more names: an early
/// function still reads the right global after many definitions.
#[test]
fn global_indices_stay_valid_as_the_session_grows() {
    let mut session = ReplSession::new();
    execute(&mut session, "let base = 100;");
    execute(&mut session, "let addBase = fn(x) { x + base };");
    execute(&mut session, "let a = 1; let b = 2; let c = 3;");
    assert_eq!(execute(&mut session, "addBase(7)"), Value::Int(107));
    assert_eq!(execute(&mut session, "a + b + c"), Value::Int(6));
}

/// Constants-pool indices assigned by earlier entries stay valid: a
/// function compiled in entry one still loads its own constants after
/// later entries extend the pool.
#[test]
fn constant_indices_stay_valid_as_the_pool_grows() {
    let mut session = ReplSession::new();
    execute(&mut session, "let greet = fn() { \"hello\" };");
    execute(&mut session, "\"filler one\"; \"filler two\"; 12345;");
    assert_eq!(execute(&mut session, "greet()"), Value::string("hello"));
}

/// Macros defined in one entry expand in all later entries.
#[test]
fn macros_persist_across_entries() {
    let mut session = ReplSession::new();
    assert_eq!(
        execute(&mut session, "let rev = macro(a, b) { quote(unquote(b) - unquote(a)) };"),
        Value::Null
    );
    assert_eq!(execute(&mut session, "rev(2 + 2, 10 - 5)"), Value::Int(1));
    assert_eq!(execute(&mut session, "rev(1, 100)"), Value::Int(99));
}

/// Built-ins work in a session and puts output goes to the writer.
#[test]
fn builtins_and_output() {
    let mut session = ReplSession::new();
    let mut printer = CollectStringPrint::new();
    let result = session.execute("puts(len(\"four\"))", &mut printer).unwrap();
    assert_eq!(result, Value::Null);
    assert_eq!(printer.output(), "4\n");
}

/// A failing entry leaves the session usable.
#[test]
fn errors_do_not_poison_the_session() {
    let mut session = ReplSession::new();
    execute(&mut session, "let x = 10;");

    // Parse error
    assert!(session.execute("let = ;", &mut NoPrint).is_err());
    // Compile error
    assert!(session.execute("missing", &mut NoPrint).is_err());
    // Runtime error
    assert!(session.execute("1 + true", &mut NoPrint).is_err());

    assert_eq!(execute(&mut session, "x + 1"), Value::Int(11));
}

/// Values built in one entry flow through builtins in another.
#[test]
fn values_flow_between_entries() {
    let mut session = ReplSession::new();
    execute(&mut session, "let xs = [1, 2, 3];");
    execute(&mut session, "let ys = push(xs, 4);");
    assert_eq!(execute(&mut session, "len(ys)"), Value::Int(4));
    assert_eq!(execute(&mut session, "last(ys)"), Value::Int(4));
    // The original array is unchanged.
    assert_eq!(execute(&mut session, "len(xs)"), Value::Int(3));
}
