//! Behavior of the expression builder over whole files.

mod common;

use common::{NullResolver, extract_source};
use gosift::Expr;
use rstest::rstest;

#[test]
fn assignment_from_named_composite_literal() {
    let record = extract_source("package p\n\nfunc F() {\n\tx = Foo{}\n}\n", &NullResolver);

    assert_eq!(record.lines.len(), 1, "lines: {:?}", record.lines);
    let Expr::Assignment { lhs, rhs, scope, .. } = &record.lines[0] else {
        panic!("expected assignment, got {:?}", record.lines[0]);
    };
    assert_eq!(scope, "F");

    assert_eq!(lhs.len(), 1);
    let Expr::Variable { name, reference, .. } = &lhs[0] else {
        panic!("expected variable binding, got {:?}", lhs[0]);
    };
    assert_eq!(name, "x");
    assert_eq!(reference.as_deref(), Some("Foo"));

    let Some(rhs) = rhs else { panic!("expected a right-hand side") };
    let Expr::ConstructStruct { struct_name, .. } = rhs.as_ref() else {
        panic!("expected constructstruct, got {rhs:?}");
    };
    assert_eq!(struct_name, "Foo");
}

#[test]
fn discard_placeholder_never_binds() {
    let record = extract_source("package p\n\nfunc F() {\n\t_, y = f()\n}\n", &NullResolver);

    let Expr::Assignment { lhs, rhs, .. } = &record.lines[0] else {
        panic!("expected assignment");
    };
    assert_eq!(lhs.len(), 1);
    let Expr::Variable { name, .. } = &lhs[0] else {
        panic!("expected variable");
    };
    assert_eq!(name, "y");

    let Some(rhs) = rhs else { panic!("expected rhs") };
    assert!(matches!(rhs.as_ref(), Expr::Func { name, .. } if name == "f"));
}

#[test]
fn qualified_call_with_arguments() {
    let record = extract_source(
        "package p\n\nfunc F() {\n\tpkg.Get(a, \"lit\")\n}\n",
        &NullResolver,
    );

    assert_eq!(record.lines.len(), 1);
    let Expr::Func { name, reference, arguments, scope, .. } = &record.lines[0] else {
        panic!("expected function, got {:?}", record.lines[0]);
    };
    assert_eq!(name, "Get");
    // resolver had no answer: reference falls back to the raw qualifier
    assert_eq!(reference.as_deref(), Some("pkg"));
    assert_eq!(scope, "F");

    assert_eq!(arguments.len(), 2);
    assert!(matches!(&arguments[0], Expr::Variable { name, .. } if name == "a"));
    let Expr::Value { value, .. } = &arguments[1] else {
        panic!("expected constant argument");
    };
    assert_eq!(value, "\"lit\"");
}

#[test]
fn bare_call_has_no_reference() {
    let record = extract_source("package p\n\nfunc F() {\n\thelper()\n}\n", &NullResolver);

    let Expr::Func { name, reference, .. } = &record.lines[0] else {
        panic!("expected function");
    };
    assert_eq!(name, "helper");
    assert!(reference.is_none());
}

#[test]
fn overlapping_spans_emit_only_the_outer_expression() {
    let record = extract_source(
        "package p\n\nfunc F() {\n\tx := pkg.Get(a, \"lit\")\n}\n",
        &NullResolver,
    );

    // the call and its literal argument are absorbed by the assignment;
    // neither reappears as a sibling
    assert_eq!(record.lines.len(), 1, "lines: {:?}", record.lines);
    assert!(matches!(record.lines[0], Expr::Assignment { .. }));
}

#[test]
fn claimed_subtrees_suppress_unmodeled_inner_content() {
    let record = extract_source(
        "package p\n\nfunc F() {\n\tBar{A: a, B: \"x\", 1, g()}\n}\n",
        &NullResolver,
    );

    // one constructstruct; the dropped keyed element, the literal element and
    // the call inside the braces never surface separately
    assert_eq!(record.lines.len(), 1, "lines: {:?}", record.lines);
    let Expr::ConstructStruct { struct_name, arguments, kvargs, .. } = &record.lines[0] else {
        panic!("expected constructstruct, got {:?}", record.lines[0]);
    };
    assert_eq!(struct_name, "Bar");
    assert_eq!(arguments, &vec!["1".to_string()]);
    assert_eq!(kvargs.len(), 1);
    assert_eq!(kvargs.get("A").map(|v| v.as_str()), Some("a"));
}

#[test]
fn composite_literal_as_call_argument() {
    let record = extract_source(
        "package p\n\nfunc F() {\n\tsave(Foo{A: a})\n}\n",
        &NullResolver,
    );

    let Expr::Func { arguments, .. } = &record.lines[0] else {
        panic!("expected function");
    };
    assert_eq!(arguments.len(), 1);
    assert!(
        matches!(&arguments[0], Expr::ConstructStruct { struct_name, .. } if struct_name == "Foo")
    );
}

#[test]
fn file_scope_literal_is_dropped_function_scope_literal_is_kept() {
    let top = extract_source("package p\n\nconst x = 5\n", &NullResolver);
    assert!(top.lines.is_empty(), "lines: {:?}", top.lines);

    let nested = extract_source("package p\n\nfunc F() {\n\tconst x = 5\n}\n", &NullResolver);
    assert_eq!(nested.lines.len(), 1);
    let Expr::Value { value, scope, .. } = &nested.lines[0] else {
        panic!("expected constant, got {:?}", nested.lines[0]);
    };
    assert_eq!(value, "5");
    assert_eq!(scope, "F");
}

#[rstest]
#[case("5", "INT")]
#[case("3.14", "FLOAT")]
#[case("2i", "IMAG")]
#[case("'a'", "CHAR")]
#[case("\"s\"", "STRING")]
fn literal_kind_tags(#[case] literal: &str, #[case] expected: &str) {
    let source = format!("package p\n\nfunc F() {{\n\t{literal}\n}}\n");
    let record = extract_source(&source, &NullResolver);

    assert_eq!(record.lines.len(), 1);
    let json = serde_json::to_string(&record.lines[0]).unwrap();
    assert!(
        json.contains(&format!("\"typeOf\":\"{expected}\"")),
        "json: {json}"
    );
}

#[test]
fn method_scope_includes_receiver_type() {
    let record = extract_source(
        "package p\n\nfunc (s *Server) Run() {\n\tlog.Print(\"up\")\n}\n",
        &NullResolver,
    );

    let Expr::Func { scope, .. } = &record.lines[0] else {
        panic!("expected function");
    };
    assert_eq!(scope, "*Server#Run");
}

#[test]
fn nested_declaration_keeps_function_scope() {
    // a var declaration inside the body must not reset the scope
    let record = extract_source(
        "package p\n\nfunc F() {\n\tvar x = 5\n\tg()\n}\n",
        &NullResolver,
    );

    let scopes: Vec<_> = record.lines.iter().map(|e| e.scope().to_string()).collect();
    assert_eq!(scopes, vec!["F", "F"], "lines: {:?}", record.lines);
}

#[test]
fn top_level_declaration_resets_scope() {
    // after F, the top-level var returns the walk to file scope, so its
    // literal initializer is dropped
    let record = extract_source(
        "package p\n\nfunc F() {\n\tg()\n}\n\nvar limit = 100\n",
        &NullResolver,
    );

    assert_eq!(record.lines.len(), 1, "lines: {:?}", record.lines);
    assert!(matches!(&record.lines[0], Expr::Func { name, .. } if name == "g"));
}

#[test]
fn chained_selector_call_keeps_member_name_without_reference() {
    // `client.api.Call()` has no bare-identifier qualifier; the member name
    // is kept and no resolution is attempted
    let record = extract_source(
        "package p\n\nfunc F() {\n\tclient.api.Call()\n}\n",
        &NullResolver,
    );

    let Expr::Func { name, reference, .. } = &record.lines[0] else {
        panic!("expected function, got {:?}", record.lines[0]);
    };
    assert_eq!(name, "Call");
    assert!(reference.is_none());
}

#[test]
fn multiple_statements_emit_in_source_order() {
    let record = extract_source(
        "package p\n\nfunc F() {\n\ta := one()\n\tb := two()\n\tuse(a, b)\n}\n",
        &NullResolver,
    );

    assert_eq!(record.lines.len(), 3);
    let mut offsets: Vec<_> = record.lines.iter().map(Expr::offset).collect();
    let sorted = {
        let mut s = offsets.clone();
        s.sort_unstable();
        s
    };
    assert_eq!(offsets, sorted);
    offsets.dedup();
    assert_eq!(offsets.len(), 3, "top-level offsets must be unique");
}

#[test]
fn range_bindings_are_not_assignments() {
    let record = extract_source(
        "package p\n\nfunc F() {\n\tfor k, v := range m {\n\t\thandle(k, v)\n\t}\n}\n",
        &NullResolver,
    );

    // the loop binding emits nothing; the body call still surfaces
    assert_eq!(record.lines.len(), 1, "lines: {:?}", record.lines);
    assert!(matches!(&record.lines[0], Expr::Func { name, .. } if name == "handle"));
}

#[test]
fn if_init_assignment_is_emitted() {
    let record = extract_source(
        "package p\n\nfunc F() {\n\tif err := run(); err != nil {\n\t\tpanicOn(err)\n\t}\n}\n",
        &NullResolver,
    );

    assert_eq!(record.lines.len(), 2, "lines: {:?}", record.lines);
    let Expr::Assignment { lhs, rhs, .. } = &record.lines[0] else {
        panic!("expected assignment, got {:?}", record.lines[0]);
    };
    assert!(matches!(&lhs[0], Expr::Variable { name, .. } if name == "err"));
    assert!(matches!(rhs.as_deref(), Some(Expr::Func { name, .. }) if name == "run"));
    assert!(matches!(&record.lines[1], Expr::Func { name, .. } if name == "panicOn"));
}

#[test]
fn pathological_nesting_is_bounded() {
    let mut call = String::from("x");
    for _ in 0..200 {
        call = format!("f({call})");
    }
    let source = format!("package p\n\nfunc F() {{\n\t{call}\n}}\n");
    let record = extract_source(&source, &NullResolver);

    // the outer call is emitted; construction stops at the depth limit
    // instead of recursing through all 200 levels
    assert_eq!(record.lines.len(), 1);
    assert!(matches!(&record.lines[0], Expr::Func { name, .. } if name == "f"));
}

#[test]
fn record_identity_fields() {
    let record = extract_source("package widgets\n\nfunc F() {}\n", &NullResolver);
    assert_eq!(record.package, "widgets");
    assert_eq!(record.file, "demo.go");
    assert_eq!(record.path, "demo.go");
    assert_eq!(record.meta.source, "github.com");
}
