//! Error accumulation and reporting: furthest-failure tracking, expectation
//! merging across alternatives, formatted output, and the loud error
//! channel.

use crate::common::{compile, run};
use expect_test::expect;
use ometa::{
    make_grammar, Expectation, Globals, HostError, MatchError, Matcher, ParseError, Stream,
};
use pretty_assertions::assert_eq;

fn sorted(expectations: &[Expectation]) -> Vec<Expectation> {
    let mut out = expectations.to_vec();
    out.sort_by_key(|e| (e.kind.clone(), e.value.clone()));
    out
}

fn tokens(names: &[&str]) -> Vec<Expectation> {
    sorted(&names.iter().map(|n| Expectation::token(*n)).collect::<Vec<_>>())
}

#[test]
fn raw_reporting_tracks_the_furthest_failure() {
    let g = compile(
        r#"
        start ::= ( (<person> <feeling> <target>)
                  | (<adjective> <animal> <feeling> <token "some"> <target>))
        adjective ::= <token "crazy"> | <token "clever"> | <token "awesome">
        feeling ::= <token "likes"> | <token "loves"> | <token "hates">
        animal ::= <token "monkey"> | <token "horse"> | <token "unicorn">
        person ::= <token "crazy horse"> | <token "hacker">
        target ::= (<token "bananas"> | <token "robots"> | <token "americans">
                   | <token "bacon">)
        "#,
    );

    // Warmup: these all parse.
    for input in [
        "clever monkey hates some robots",
        "awesome unicorn loves some bacon",
        "crazy horse hates americans",
        "hacker likes robots",
    ] {
        g.apply_str("start", input)
            .unwrap_or_else(|e| panic!("{input:?} should parse: {e}"));
    }

    // `horse` got further than any other animal, so it is the only
    // expectation reported.
    let e = g.apply_str("start", "clever hacker likes bacon").unwrap_err();
    assert_eq!(e.position(), 8);
    assert_eq!(sorted(e.expectations()), tokens(&["horse"]));

    // Matching "some" commits the error report to the second branch.
    let e = g
        .apply_str("start", "crazy horse likes some grass")
        .unwrap_err();
    assert_eq!(e.position(), 23);
    assert_eq!(
        sorted(e.expectations()),
        tokens(&["americans", "bacon", "bananas", "robots"])
    );

    // Without "some" both branches are viable at the failure point; their
    // expectations merge.
    let e = g
        .apply_str("start", "crazy horse likes mountains")
        .unwrap_err();
    assert_eq!(e.position(), 18);
    assert_eq!(
        sorted(e.expectations()),
        tokens(&["americans", "bacon", "bananas", "robots", "some"])
    );
}

#[test]
fn formatted_reporting_points_at_the_failure() {
    let g = compile(
        "dig ::= '1' | '2' | '3'
         bits ::= <dig>+",
    );

    let input = "123x321";
    let e = g.apply_str("bits", input).unwrap_err();
    assert_eq!(
        e.format_error(input),
        "\n123x321\n   ^\nParse error at line 1, column 3: expected one of '1', '2', or '3'\n",
    );

    let input = "foo\nbaz\nboz\ncharlie\nbuz";
    let e = ParseError::new(
        12,
        vec![Expectation::token("foo"), Expectation::item("b")],
    );
    expect!["expected one of token 'foo', or 'b'"].assert_eq(&e.reason());
    assert_eq!(
        e.format_error(input),
        "\ncharlie\n^\nParse error at line 4, column 0: expected one of token 'foo', or 'b'\n",
    );

    let input = "123x321";
    let e = ParseError::expected(3, Expectation::named("digit"));
    expect!["expected a digit"].assert_eq(&e.reason());
    assert_eq!(
        e.format_error(input),
        "\n123x321\n   ^\nParse error at line 1, column 3: expected a digit\n",
    );
}

#[test]
fn grammar_compile_errors_are_parse_errors_against_the_source() {
    let source = "andHandler ::= <handler>:h1 'and' <handler>:h2 => mk(h1, h2)";
    let e = make_grammar("TestGrammar", source, Globals::new()).unwrap_err();
    // `'and'` is not a character literal; the closing quote is expected
    // where `n` sits.
    assert_eq!(e.position(), 30);
    assert_eq!(e.expectations(), &[Expectation::token("'")]);
}

#[test]
fn unbalanced_host_expressions_fail_at_compile_time() {
    make_grammar("TestGrammar", "foo ::= ?(x[1]]) '1'", Globals::new()).unwrap_err();
    make_grammar("TestGrammar", "foo ::= '1' => ", Globals::new()).unwrap_err();
    // Host syntax errors also surface when the grammar compiles.
    make_grammar("TestGrammar", "foo ::= '1' => x +", Globals::new()).unwrap_err();
}

#[test]
fn host_evaluation_failures_are_not_parse_errors() {
    let g = make_grammar("TestGrammar", "foo ::= '1' => nosuch(1)", Globals::new()).unwrap();
    let mut session = Matcher::new(g, Stream::from_str("1"));
    let err = session.apply("foo", &[]).unwrap_err();
    assert!(matches!(
        err,
        MatchError::Host(HostError::UnknownName(ref name)) if name == "nosuch"
    ));
}

#[test]
fn applying_a_missing_rule_fails_loudly() {
    let g = make_grammar("TestGrammar", "foo ::= <nosuch>", Globals::new()).unwrap();
    let mut session = Matcher::new(g, Stream::from_str("x"));
    let err = session.apply("foo", &[]).unwrap_err();
    assert!(matches!(
        err,
        MatchError::Host(HostError::UnknownRule(ref name)) if name == "nosuch"
    ));
}

#[test]
fn runaway_recursion_is_stopped_by_the_limit() {
    let g = make_grammar("Deep", "x ::= '(' <x> ')' | '0'", Globals::new()).unwrap();

    let shallow = format!("{}0{}", "(".repeat(100), ")".repeat(100));
    run(&g, "x", Stream::from_str(&shallow)).unwrap();

    let deep = format!("{}0{}", "(".repeat(400), ")".repeat(400));
    let mut session = Matcher::new(g.clone(), Stream::from_str(&deep));
    let err = session.apply("x", &[]).unwrap_err();
    assert!(matches!(
        err,
        MatchError::Host(HostError::RecursionLimit(_))
    ));

    let mut session = Matcher::new(g, Stream::from_str("((0))")).recursion_limit(2);
    let err = session.apply("x", &[]).unwrap_err();
    assert!(matches!(
        err,
        MatchError::Host(HostError::RecursionLimit(_))
    ));
    assert_eq!(session.recursion_usage().high, 3);
}
