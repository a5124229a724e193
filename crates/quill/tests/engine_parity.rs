//! Two-engine agreement: for every program in the shared corpus, the
//! evaluator's result and the VM's last-popped value must have equal
//! display forms, and both engines must produce identical `puts` output.

use pretty_assertions::assert_eq;
use quill::{CollectStringPrint, Engine, run_source};

/// Programs both engines must agree on. Built-in error values are
/// included: the evaluator propagates them and the VM leaves them on the
/// stack, so both report the same value.
const CORPUS: &[&str] = &[
    // Arithmetic and precedence
    "1 + 2",
    "50 / 2 * 2 + 10 - 5",
    "(5 + 10 * 2 + 15 / 3) * 2 + -10",
    "-50 + 100 + -50",
    // Booleans, comparisons, truthiness
    "1 < 2",
    "1 <= 1",
    "2 > 1",
    "2 >= 3",
    "true != false",
    "!5",
    "!0",
    "!!0",
    "1 == true",
    "0 == false",
    // Conditionals
    "if (1 > 2) { 10 } else { 20 }",
    "if (true) { 10 }",
    "if (false) { 10 }",
    "if (0) { 10 } else { 20 }",
    "if ((if (false) { 10 })) { 10 } else { 20 }",
    // Let bindings
    "let a = 5; let b = a; let c = a + b + 5; c;",
    "let x = 7;",
    // Strings
    "\"Hello\" + \" \" + \"World!\"",
    "\"héllo\"[1]",
    "\"hi\"[99]",
    "\"a\" == \"a\"",
    // Arrays
    "[1, 2 * 2, 3 + 3]",
    "[1, 2, 3][0 + 2]",
    "[1, 2, 3][99]",
    "[1, 2, 3][-1]",
    "[[1, 1, 1]][0][0]",
    // Hashes
    "{\"one\": 10 - 9, \"two\": 1 + 1}",
    "{\"foo\": 5}[\"foo\"]",
    "{\"foo\": 5}[\"bar\"]",
    "{5: 5}[5]",
    "{true: 5}[true]",
    "{}[\"missing\"]",
    // Functions, closures, recursion
    "let identity = fn(x) { x; }; identity(5);",
    "let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));",
    "fn(x) { x; }(5)",
    "let earlyExit = fn() { return 99; 100; }; earlyExit();",
    "let noReturn = fn() { }; noReturn();",
    "let one = fn(){1}; let two = fn(){one()+1}; two()",
    "let makeAdder = fn(a){ fn(b){ a+b } }; makeAdder(10)(5)",
    "let newClosure = fn(a) { fn() { a; }; }; let closure = newClosure(99); closure();",
    "let fib = fn(x){ if(x==0){0} else { if(x==1){1} else { fib(x-1)+fib(x-2) } } }; fib(10)",
    // Built-ins, including their error values
    "len(\"héllo wörld\")",
    "len(\"\")",
    "len([1, 2, 3])",
    "len(1)",
    "len(\"one\", \"two\")",
    "first([1, 2, 3])",
    "first([])",
    "first(\"héllo\")",
    "last([1, 2, 3])",
    "last([])",
    "rest([1, 2, 3])",
    "rest(\"héllo\")",
    "rest([])",
    "push([1, 2], 3)",
    "push([], 1, 2)",
    "push(\"n=\", 42)",
    "push(1)",
    "puts(1, \"two\", [3])",
    // Macros
    "let rev = macro(a, b) { quote(unquote(b) - unquote(a)) }; rev(2 + 2, 10 - 5);",
    "let unless = macro(c, t, e) { quote(if (!(unquote(c))) { unquote(t) } else { unquote(e) }) };
     unless(2 > 5, \"lesser\", \"greater\")",
];

#[test]
fn engines_agree_on_the_corpus() {
    for source in CORPUS {
        let mut eval_output = CollectStringPrint::new();
        let eval_result = run_source(source, Engine::Eval, &mut eval_output)
            .unwrap_or_else(|error| panic!("eval failed for {source:?}: {error}"));

        let mut vm_output = CollectStringPrint::new();
        let vm_result = run_source(source, Engine::Vm, &mut vm_output)
            .unwrap_or_else(|error| panic!("vm failed for {source:?}: {error}"));

        assert_eq!(
            eval_result.to_string(),
            vm_result.to_string(),
            "result mismatch for {source:?}"
        );
        assert_eq!(
            eval_output.output(),
            vm_output.output(),
            "puts output mismatch for {source:?}"
        );
    }
}

#[test]
fn engines_agree_on_integer_round_trips() {
    for n in [-99, -1, 0, 1, 7, 255, 65535, 1_000_000_007] {
        let source = n.to_string();
        let eval_result = run_source(&source, Engine::Eval, &mut quill::NoPrint).unwrap();
        let vm_result = run_source(&source, Engine::Vm, &mut quill::NoPrint).unwrap();
        assert_eq!(eval_result.to_string(), n.to_string());
        assert_eq!(vm_result.to_string(), n.to_string());
    }
}
