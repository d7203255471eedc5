use wisp::error::{CompileErrorKind, InterpretError, RuntimeErrorKind};

fn run(source: &str) -> (Result<(), InterpretError>, String) {
  let mut buf = Vec::new();
  let result = wisp::interpret_to(source, &mut buf);
  (result, String::from_utf8(buf).expect("program output is UTF-8"))
}

fn expect_output(source: &str, expected: &str) {
  let (result, output) = run(source);
  assert!(result.is_ok(), "expected success, got {:?}", result);
  assert_eq!(output, expected);
}

#[test]
fn while_loop_sums_to_a_million() {
  expect_output(
    "let i = 0; let sum = 0; while i < 1_000_000 { i += 1; sum += i; } print sum;",
    "500000500000\n",
  );
}

#[test]
fn if_else_takes_the_true_branch() {
  expect_output(r#"let x = 5; if x > 3 { print "big"; } else { print "small"; }"#, "big\n");
}

#[test]
fn function_call_adds_its_arguments() {
  expect_output("fn add(a, b) { return a + b; } print add(2, 3);", "5\n");
}

#[test]
fn break_exits_the_enclosing_loop_only() {
  expect_output(
    "let s = 0; let i = 0; while i < 10 { if i == 5 { break; } s += i; i += 1; } print s;",
    "10\n",
  );
}

#[test]
fn recursive_fibonacci() {
  expect_output(
    "fn fib(n) { if n < 2 { return n; } return fib(n - 1) + fib(n - 2); } print fib(10);",
    "55\n",
  );
}

#[test]
fn print_joins_multiple_values_with_spaces() {
  expect_output("print 1, 2, 3;", "1 2 3\n");
}

#[test]
fn nested_loops_each_get_their_own_break_list() {
  // A naive single break-list design would patch the inner loop's break
  // onto the outer loop's exit (or vice versa); this must land each
  // break strictly within the loop it syntactically belongs to.
  expect_output(
    r#"
    let hits = 0;
    let i = 0;
    while i < 3 {
      let j = 0;
      while j < 3 {
        if j == 1 { break; }
        hits += 1;
        j += 1;
      }
      i += 1;
    }
    print hits;
    "#,
    "3\n",
  );
}

#[test]
fn globals_are_visible_inside_functions_declared_after_them() {
  expect_output("let limit = 41; fn over() { return limit + 1; } print over();", "42\n");
}

#[test]
fn reading_an_undefined_global_is_a_runtime_error_with_a_line() {
  let (result, _) = run("print x;");
  match result {
    Err(InterpretError::Runtime { kind: RuntimeErrorKind::UndefinedGlobal(name), line }) => {
      assert_eq!(name, "x");
      assert_eq!(line, 1);
    }
    other => panic!("expected an undefined-global runtime error, got {:?}", other),
  }
}

#[test]
fn adding_an_int_and_a_float_is_a_type_mismatch() {
  let (result, _) = run("let a = 1; let b = 1.0; print a + b;");
  assert!(matches!(
    result,
    Err(InterpretError::Runtime { kind: RuntimeErrorKind::TypeMismatch(_), .. })
  ));
}

#[test]
fn calling_with_the_wrong_arity_is_a_runtime_error() {
  let (result, _) = run("fn f(x) { return x; } f(1, 2);");
  assert!(matches!(
    result,
    Err(InterpretError::Runtime { kind: RuntimeErrorKind::ArityMismatch { .. }, .. })
  ));
}

#[test]
fn break_outside_a_loop_is_a_compile_error() {
  let (result, _) = run("break;");
  assert!(matches!(
    result,
    Err(InterpretError::Compile { kind: CompileErrorKind::BreakOutsideLoop, .. })
  ));
}

#[test]
fn return_at_top_level_is_a_compile_error() {
  let (result, _) = run("return 1;");
  assert!(matches!(
    result,
    Err(InterpretError::Compile { kind: CompileErrorKind::ReturnOutsideFunction, .. })
  ));
}

#[test]
fn division_by_zero_is_a_runtime_error_not_a_panic() {
  let (result, _) = run("let z = 0; print 1 / z;");
  assert!(matches!(
    result,
    Err(InterpretError::Runtime { kind: RuntimeErrorKind::DivisionByZero, .. })
  ));
}

#[test]
fn cross_variant_equality_is_false_not_an_error() {
  expect_output("print 1 == true;", "false\n");
}

#[test]
fn compound_assignment_leaves_no_residue_on_the_stack() {
  // Runs to completion and prints the right thing only if SET_LOCAL's
  // "leaves the value on the stack" contract is matched by the
  // expression-statement / assignment-statement POP discipline.
  expect_output("let a = 1; a += 1; a += 1; print a;", "3\n");
}
