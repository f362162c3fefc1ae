//! Resolver integration: caching, fallback, and normalization through the
//! whole pipeline.

mod common;

use common::{RecordingResolver, extract_source, extract_source_with};
use gosift::{Expr, ResolverCache};

fn first_reference(record: &gosift::SourceFileRecord) -> Option<String> {
    record.lines.iter().find_map(|line| match line {
        Expr::Func { reference, .. } => reference.clone(),
        _ => None,
    })
}

#[test]
fn same_identifier_resolved_externally_once() {
    let resolver = RecordingResolver::answering("example.com/pkg");
    let record = extract_source(
        "package p\n\nfunc F() {\n\tpkg.A()\n\tpkg.B()\n\tpkg.C()\n}\n",
        &resolver,
    );

    assert_eq!(record.lines.len(), 3);
    assert_eq!(resolver.call_count(), 1, "calls: {:?}", resolver.calls.borrow());
    for line in &record.lines {
        let Expr::Func { reference, .. } = line else {
            panic!("expected function");
        };
        assert_eq!(reference.as_deref(), Some("example.com/pkg"));
    }
}

#[test]
fn cache_spans_files_within_one_run() {
    let resolver = RecordingResolver::answering("example.com/pkg");
    let mut cache = ResolverCache::new();

    let first = extract_source_with(
        "package p\n\nfunc F() {\n\tpkg.A()\n}\n",
        &resolver,
        &mut cache,
    );
    let second = extract_source_with(
        "package p\n\nfunc G() {\n\tpkg.B()\n}\n",
        &resolver,
        &mut cache,
    );

    assert_eq!(first_reference(&first).as_deref(), Some("example.com/pkg"));
    assert_eq!(first_reference(&second).as_deref(), Some("example.com/pkg"));
    // second file hit the run-scoped cache
    assert_eq!(resolver.call_count(), 1);
}

#[test]
fn failed_query_falls_back_and_is_retried() {
    let resolver = RecordingResolver::failing();
    let record = extract_source(
        "package p\n\nfunc F() {\n\tpkg.A()\n\tpkg.B()\n}\n",
        &resolver,
    );

    // the raw identifier stands in for the unresolved reference
    for line in &record.lines {
        let Expr::Func { reference, .. } = line else {
            panic!("expected function");
        };
        assert_eq!(reference.as_deref(), Some("pkg"));
    }
    // failures are not cached: each occurrence retried the resolver
    assert_eq!(resolver.call_count(), 2);
}

#[test]
fn empty_answer_falls_back_and_is_retried() {
    let resolver = RecordingResolver::default();
    let record = extract_source(
        "package p\n\nfunc F() {\n\tpkg.A()\n\tpkg.B()\n}\n",
        &resolver,
    );

    assert_eq!(first_reference(&record).as_deref(), Some("pkg"));
    assert_eq!(resolver.call_count(), 2);
}

#[test]
fn vendored_paths_are_normalized() {
    let resolver =
        RecordingResolver::answering("github.com/acme/tool/vendor/github.com/pkg/errors");
    let record = extract_source(
        "package p\n\nfunc F() {\n\terrors.Wrap(err, \"boom\")\n}\n",
        &resolver,
    );

    assert_eq!(
        first_reference(&record).as_deref(),
        Some("github.com/pkg/errors")
    );
}

#[test]
fn query_carries_file_path_and_selector_offset() {
    let resolver = RecordingResolver::answering("example.com/pkg");
    let source = "package p\n\nfunc F() {\n\tpkg.A()\n}\n";
    extract_source(source, &resolver);

    let calls = resolver.calls.borrow();
    assert_eq!(calls.len(), 1);
    let (file, offset) = &calls[0];
    assert_eq!(file, "demo.go");
    // the query points at the qualified selector's start, i.e. `pkg`
    assert_eq!(*offset as usize, source.find("pkg.A").unwrap());
}

#[test]
fn unqualified_calls_do_not_query_the_resolver() {
    let resolver = RecordingResolver::answering("example.com/pkg");
    extract_source("package p\n\nfunc F() {\n\thelper(x)\n}\n", &resolver);
    assert_eq!(resolver.call_count(), 0);
}
