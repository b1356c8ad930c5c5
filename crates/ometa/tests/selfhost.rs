//! Self-hosting: the grammar parsers written in OMeta must be drop-in
//! replacements for the bootstrap parser, producing identical syntax trees,
//! including for their own source, which closes the fixed point.

use ometa::{
    ometa2_grammar, ometa_grammar, parse_grammar, parse_with, AstBuilder, Dialect,
    OMETA2_SOURCE, OMETA_SOURCE,
};
use pretty_assertions::assert_eq;
use unindent::unindent;

#[test]
fn fixed_point_classic_dialect() {
    let bootstrap = parse_grammar(OMETA_SOURCE, Dialect::V1, "OMeta", &mut AstBuilder)
        .expect("the bootstrap should parse the self-hosted source");
    let parser = ometa_grammar().expect("the self-hosted parser should compile");
    let self_hosted =
        parse_with(&parser, OMETA_SOURCE, "OMeta").expect("the self-hosted parser should parse");
    assert_eq!(bootstrap, self_hosted);
}

#[test]
fn fixed_point_ometa2_dialect() {
    let bootstrap = parse_grammar(OMETA2_SOURCE, Dialect::V2, "OMeta2", &mut AstBuilder)
        .expect("the bootstrap should parse the self-hosted source");
    let parser = ometa2_grammar().expect("the self-hosted parser should compile");
    let self_hosted =
        parse_with(&parser, OMETA2_SOURCE, "OMeta2").expect("the self-hosted parser should parse");
    assert_eq!(bootstrap, self_hosted);
}

#[test]
fn self_hosted_trees_match_the_bootstrap_classic() {
    let parser = ometa_grammar().expect("the self-hosted parser should compile");
    let samples = [
        "digit ::= '1'",
        "xs ::= 'x'* | 'y'+ | 'z'?",
        "foo ::= ~'0' <anything> => 12",
        "stuff ::= 17 0x1F -2 0177 \"str\" '\\n'",
        "fact 0 => 1\nfact :n ::= <fact (n - 1)>:m => n * m",
        "interp ::= [<digit>:x '+' <digit>:y] => x + y",
        "start ::= <token \"crazy horse\"> | ~~(:x) <bar x>",
        "#leading comment\nbits ::= <dig>+ #trailing",
        "expr ::= <super> | <digit>",
    ];
    for source in samples {
        let a = parse_grammar(source, Dialect::V1, "Sample", &mut AstBuilder)
            .unwrap_or_else(|e| panic!("bootstrap rejected {source:?}: {e}"));
        let b = parse_with(&parser, source, "Sample")
            .unwrap_or_else(|e| panic!("self-hosted parser rejected {source:?}: {e}"));
        assert_eq!(a, b, "trees differ for {source:?}");
    }
}

#[test]
fn self_hosted_trees_match_the_bootstrap_ometa2() {
    let parser = ometa2_grammar().expect("the self-hosted parser should compile");
    let samples = [
        "digit = '1'",
        "xs = 'x'* | 'y'+ | 'z'?",
        "foo = ~'0' anything -> 12",
        "stuff = 17 0x1F -2 0177 \"str\" '\\n'",
        "fact 0 -> 1\nfact :n = fact(n - 1):m -> n * m",
        "lower = 'a'-'z'",
        "interp = [digit:x '+' digit:y] -> x + y",
        "foo = ~~(:x) bar(x)",
    ];
    for source in samples {
        let a = parse_grammar(source, Dialect::V2, "Sample", &mut AstBuilder)
            .unwrap_or_else(|e| panic!("bootstrap rejected {source:?}: {e}"));
        let b = parse_with(&parser, source, "Sample")
            .unwrap_or_else(|e| panic!("self-hosted parser rejected {source:?}: {e}"));
        assert_eq!(a, b, "trees differ for {source:?}");
    }
}

#[test]
fn dedented_sources_parse_the_same() {
    let source = unindent(
        "
        num ::= (<num>:n <digit>:d => n * 10 + d
               | <digit>)
        digit ::= :x ?(is_digit(x)) => int(x)
        ",
    );
    let parser = ometa_grammar().expect("the self-hosted parser should compile");
    let a = parse_grammar(&source, Dialect::V1, "Num", &mut AstBuilder).unwrap();
    let b = parse_with(&parser, &source, "Num").unwrap();
    assert_eq!(a, b);
}
