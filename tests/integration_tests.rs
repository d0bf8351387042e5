use jackc::codegen::{ArithmeticOp, Emitter, Instruction, Segment};
use jackc::error::ErrorKind;
use jackc::lexer::Lexer;
use jackc::parser::{Parser, MAX_NESTING};

fn wrap_in_main(input: &str) -> String {
    format!("class Main {{ {} }}", input)
}

fn compile_lines(input: &str) -> Vec<String> {
    jackc::compile_to_vm(input)
        .unwrap()
        .lines()
        .map(|l| l.to_string())
        .collect()
}

fn compile_err(input: &str) -> ErrorKind {
    jackc::compile(input).unwrap_err().kind
}

#[test]
fn if_else() {
    let input = wrap_in_main(
        "function void main() {
            var int x, y;
            if (x) { let y = 1; } else { let y = 2; }
            return;
        }",
    );
    assert_eq!(
        compile_lines(&input),
        vec![
            "function Main.main 2",
            "push local 0",
            "if-goto IF_TRUE0",
            "goto IF_FALSE0",
            "label IF_TRUE0",
            "push constant 1",
            "pop local 1",
            "goto IF_END0",
            "label IF_FALSE0",
            "push constant 2",
            "pop local 1",
            "label IF_END0",
            "push constant 0",
            "return",
        ]
    );
}

#[test]
fn if_without_else() {
    let input = wrap_in_main(
        "function void main() {
            var boolean b;
            if (b) { let b = false; }
            return;
        }",
    );
    assert_eq!(
        compile_lines(&input),
        vec![
            "function Main.main 1",
            "push local 0",
            "if-goto IF_TRUE0",
            "goto IF_FALSE0",
            "label IF_TRUE0",
            "push constant 0",
            "pop local 0",
            "label IF_FALSE0",
            "push constant 0",
            "return",
        ]
    );
}

#[test]
fn implicit_call_counts_receiver() {
    let input = "class Foo {
        method void bar() { do foo(1, 2); return; }
        method void foo(int a, int b) { return; }
    }";
    let lines = compile_lines(input);
    assert_eq!(
        lines[..10],
        [
            "function Foo.bar 0",
            "push argument 0",
            "pop pointer 0",
            "push pointer 0",
            "push constant 1",
            "push constant 2",
            "call Foo.foo 3",
            "pop temp 0",
            "push constant 0",
            "return",
        ]
    );
}

#[test]
fn constructor_allocates_fields() {
    let input = "class Point {
        field int x, y;
        static int count;
        constructor Point new(int ax, int ay) {
            let x = ax;
            let y = ay;
            let count = count + 1;
            return this;
        }
    }";
    assert_eq!(
        compile_lines(input),
        vec![
            "function Point.new 0",
            "push constant 2",
            "call Memory.alloc 1",
            "pop pointer 0",
            "push argument 0",
            "pop this 0",
            "push argument 1",
            "pop this 1",
            "push static 0",
            "push constant 1",
            "add",
            "pop static 0",
            "push pointer 0",
            "return",
        ]
    );
}

#[test]
fn method_arguments_are_shifted() {
    let input = "class Point {
        field int x;
        method int plus(int dx) { return x + dx; }
    }";
    assert_eq!(
        compile_lines(input),
        vec![
            "function Point.plus 0",
            "push argument 0",
            "pop pointer 0",
            "push this 0",
            "push argument 1",
            "add",
            "return",
        ]
    );
}

#[test]
fn while_labels_are_unique_across_subroutines() {
    let input = wrap_in_main(
        "function void a() { var int i; while (i < 3) { let i = i + 1; } return; }
         function void b() { while (true) { } return; }",
    );
    assert_eq!(
        compile_lines(&input),
        vec![
            "function Main.a 1",
            "label WHILE_EXP0",
            "push local 0",
            "push constant 3",
            "lt",
            "not",
            "if-goto WHILE_END0",
            "push local 0",
            "push constant 1",
            "add",
            "pop local 0",
            "goto WHILE_EXP0",
            "label WHILE_END0",
            "push constant 0",
            "return",
            "function Main.b 0",
            "label WHILE_EXP1",
            "push constant 0",
            "not",
            "not",
            "if-goto WHILE_END1",
            "goto WHILE_EXP1",
            "label WHILE_END1",
            "push constant 0",
            "return",
        ]
    );
}

#[test]
fn nested_ifs_take_increasing_indices() {
    let input = wrap_in_main(
        "function void main() {
            if (true) { if (false) { } }
            if (true) { }
            return;
        }",
    );
    let labels: Vec<String> = compile_lines(&input)
        .into_iter()
        .filter(|l| l.starts_with("label"))
        .collect();
    assert_eq!(
        labels,
        vec![
            "label IF_TRUE0",
            "label IF_TRUE1",
            "label IF_FALSE1",
            "label IF_FALSE0",
            "label IF_TRUE2",
            "label IF_FALSE2",
        ]
    );
}

#[test]
fn array_let_stages_value_through_temp() {
    let input = wrap_in_main(
        "function void main() {
            var Array a;
            let a[1] = a[2];
            return;
        }",
    );
    assert_eq!(
        compile_lines(&input),
        vec![
            "function Main.main 1",
            "push local 0",
            "push constant 1",
            "add",
            "push local 0",
            "push constant 2",
            "add",
            "pop pointer 1",
            "push that 0",
            "pop temp 0",
            "pop pointer 1",
            "push temp 0",
            "pop that 0",
            "push constant 0",
            "return",
        ]
    );
}

#[test]
fn calls_on_variables_and_classes() {
    let input = wrap_in_main(
        "function void main() {
            var Point p;
            let p = Point.new(1, 2);
            do p.move(3);
            do Output.printInt(p.getX());
            return;
        }",
    );
    assert_eq!(
        compile_lines(&input),
        vec![
            "function Main.main 1",
            "push constant 1",
            "push constant 2",
            "call Point.new 2",
            "pop local 0",
            "push local 0",
            "push constant 3",
            "call Point.move 2",
            "pop temp 0",
            "push local 0",
            "call Point.getX 1",
            "call Output.printInt 1",
            "pop temp 0",
            "push constant 0",
            "return",
        ]
    );
}

#[test]
fn string_constants() {
    let input = wrap_in_main(
        "function void main() { var String s; let s = \"hi\"; return; }",
    );
    assert_eq!(
        compile_lines(&input),
        vec![
            "function Main.main 1",
            "push constant 2",
            "call String.new 1",
            "push constant 104",
            "call String.appendChar 2",
            "push constant 105",
            "call String.appendChar 2",
            "pop local 0",
            "push constant 0",
            "return",
        ]
    );
}

#[test]
fn operators_apply_left_to_right() {
    let input = wrap_in_main(
        "function int main() { var int x; let x = 10 - 2 - 3 * 4 / x; return x; }",
    );
    assert_eq!(
        compile_lines(&input),
        vec![
            "function Main.main 1",
            "push constant 10",
            "push constant 2",
            "sub",
            "push constant 3",
            "sub",
            "push constant 4",
            "call Math.multiply 2",
            "push local 0",
            "call Math.divide 2",
            "pop local 0",
            "push local 0",
            "return",
        ]
    );
}

#[test]
fn unary_operators_and_constants() {
    let input = wrap_in_main(
        "function void main() {
            var int x;
            let x = -x;
            let x = ~(x = null);
            let x = ^x;
            let x = #x;
            return;
        }",
    );
    assert_eq!(
        compile_lines(&input)[1..17],
        [
            "push local 0",
            "neg",
            "pop local 0",
            "push local 0",
            "push constant 0",
            "eq",
            "not",
            "pop local 0",
            "push local 0",
            "shiftleft",
            "pop local 0",
            "push local 0",
            "shiftright",
            "pop local 0",
            "push constant 0",
            "return",
        ]
    );
}

#[test]
fn comments_are_ignored() {
    let input = "/** Docs for Main. */
    class Main {
        // a line comment
        function void main() { /* inline */ return; } /* trailing
        over lines */
    }";
    assert_eq!(
        compile_lines(input),
        vec!["function Main.main 0", "push constant 0", "return"]
    );
}

#[test]
fn instructions_without_text() {
    let tokens = Lexer::tokenize("class A { function int f() { return 1 + 2; } }").unwrap();
    let mut parser = Parser::new(tokens, Vec::<Instruction>::new());
    parser.parse().unwrap();
    assert_eq!(
        parser.into_emitter(),
        vec![
            Instruction::Function("A.f".to_string(), 0),
            Instruction::Push(Segment::Constant, 1),
            Instruction::Push(Segment::Constant, 2),
            Instruction::Arithmetic(ArithmeticOp::Add),
            Instruction::Return,
        ]
    );
}

#[derive(Default)]
struct CallCounter {
    calls: Vec<(String, u16)>,
}

impl Emitter for CallCounter {
    fn emit(&mut self, instruction: Instruction) {
        if let Instruction::Call(name, n) = instruction {
            self.calls.push((name, n));
        }
    }
}

#[test]
fn custom_emitter() {
    let tokens = Lexer::tokenize(
        "class Game { field Ball ball;
            method void run() { do ball.bounce(1, 2); do draw(); do Screen.clear(); return; }
        }",
    )
    .unwrap();
    let mut parser = Parser::new(tokens, CallCounter::default());
    parser.parse().unwrap();
    assert_eq!(
        parser.into_emitter().calls,
        vec![
            ("Ball.bounce".to_string(), 3),
            ("Game.draw".to_string(), 1),
            ("Screen.clear".to_string(), 0),
        ]
    );
}

#[test]
fn undeclared_variable() {
    let err = jackc::compile("class Main {\n function void main() {\n  let z = 1;\n  return;\n }\n}")
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::UndeclaredVariable("z".to_string()));
    assert_eq!(err.pos.line, 3);
    assert_eq!(err.pos.column, 7);
}

#[test]
fn undeclared_variable_in_term() {
    let input = wrap_in_main("function int main() { return y; }");
    assert_eq!(
        compile_err(&input),
        ErrorKind::UndeclaredVariable("y".to_string())
    );
}

#[test]
fn missing_semicolon() {
    let input = wrap_in_main("function void main() { var int x; let x = 1 return; }");
    assert_eq!(
        compile_err(&input),
        ErrorKind::Expected {
            expected: "';'".to_string(),
            found: "keyword 'return'".to_string(),
        }
    );
}

#[test]
fn missing_term() {
    let input = wrap_in_main("function int main() { return }");
    assert_eq!(
        compile_err(&input),
        ErrorKind::Expected {
            expected: "a term".to_string(),
            found: "symbol '}'".to_string(),
        }
    );
}

#[test]
fn missing_closing_brace() {
    let input = "class Main { function void main() { return; }";
    assert_eq!(
        compile_err(input),
        ErrorKind::Expected {
            expected: "'}'".to_string(),
            found: "end of input".to_string(),
        }
    );
}

#[test]
fn trailing_input() {
    let input = "class Main { } class Other { }";
    assert_eq!(
        compile_err(input),
        ErrorKind::TrailingInput("keyword 'class'".to_string())
    );
}

#[test]
fn empty_input() {
    assert_eq!(compile_err("  // nothing here\n"), ErrorKind::UnexpectedEof);
}

#[test]
fn call_is_not_assignable() {
    let input = wrap_in_main("function void main() { let f() = 1; return; }");
    assert_eq!(
        compile_err(&input),
        ErrorKind::NotAssignable("f".to_string())
    );
}

#[test]
fn do_requires_a_call() {
    let input = wrap_in_main("function void main() { var int x; do x; return; }");
    assert!(matches!(compile_err(&input), ErrorKind::Expected { .. }));
}

#[test]
fn void_is_not_a_variable_type() {
    let input = wrap_in_main("function void main() { var void x; return; }");
    assert_eq!(
        compile_err(&input),
        ErrorKind::Expected {
            expected: "a type".to_string(),
            found: "keyword 'void'".to_string(),
        }
    );
}

#[test]
fn lexical_errors_surface() {
    let input = wrap_in_main("function void main() { do Output.printString(\"oops); return; }");
    assert_eq!(compile_err(&input), ErrorKind::UnterminatedString);
}

#[test]
fn wide_characters_are_rejected() {
    let input = wrap_in_main(
        "function void main() { do Output.printString(\"\u{1F600}\"); return; }",
    );
    assert_eq!(
        compile_err(&input),
        ErrorKind::CharacterOutOfRange('\u{1F600}')
    );

    let input = wrap_in_main(
        "function void main() { do Output.printString(\"\u{7FFF}\"); return; }",
    );
    assert!(compile_lines(&input).contains(&"push constant 32767".to_string()));
}

#[test]
fn deep_parentheses_are_an_error() {
    let depth = 10_000;
    let input = wrap_in_main(&format!(
        "function int main() {{ return {}1{}; }}",
        "(".repeat(depth),
        ")".repeat(depth)
    ));
    assert_eq!(compile_err(&input), ErrorKind::NestingTooDeep(MAX_NESTING));
}

#[test]
fn deep_unary_chains_are_an_error() {
    let input = wrap_in_main(&format!(
        "function int main() {{ return {}1; }}",
        "-".repeat(10_000)
    ));
    assert_eq!(compile_err(&input), ErrorKind::NestingTooDeep(MAX_NESTING));
}

#[test]
fn deep_blocks_are_an_error() {
    let depth = 1_000;
    let input = wrap_in_main(&format!(
        "function void main() {{ {}{} return; }}",
        "while (true) { ".repeat(depth),
        "}".repeat(depth)
    ));
    assert_eq!(compile_err(&input), ErrorKind::NestingTooDeep(MAX_NESTING));
}

#[test]
fn moderate_nesting_compiles() {
    let depth = 100;
    let input = wrap_in_main(&format!(
        "function int main() {{ {}{} return {}1{}; }}",
        "if (true) { ".repeat(depth),
        "}".repeat(depth),
        "(".repeat(depth),
        ")".repeat(depth)
    ));
    let lines = compile_lines(&input);
    assert!(lines.contains(&"label IF_FALSE99".to_string()));
    assert_eq!(lines[lines.len() - 2..], ["push constant 1", "return"]);
}
