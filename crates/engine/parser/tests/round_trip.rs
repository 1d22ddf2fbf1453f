use engine_parser::{parse_query, print_document};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case::shorthand("{ latest { id name } }")]
#[case::named_with_variables(
    r#"query Latest($id: Int! = 1, $names: [String!] = ["a", "b"]) { latest(id: $id) { id } }"#
)]
#[case::aliases_and_directives("{ test: __schema @include(if: true) { queryType { name } } }")]
#[case::block_string(r#"{ echo(text: """  indented "quotes" """) }"#)]
#[case::objects_and_enums("mutation { add(input: { color: RED, tags: [], nested: { n: null } }) }")]
#[case::fragments(
    "query A { ...F ... on latest { id } ... @skip(if: false) { name } } query B { __typename } fragment F on TestSchema { latest { name } } fragment G on TestSchema { __typename }"
)]
fn printing_round_trips(#[case] query: &str) {
    let printed = print_document(&parse_query(query).unwrap());
    let reprinted = print_document(&parse_query(&printed).unwrap());

    assert_eq!(printed, reprinted);
}

#[test]
fn printed_layout() {
    let document = parse_query("query Q($a: Int) { x: f(a: $a) { g } ...F } fragment F on T { h }").unwrap();

    assert_eq!(
        print_document(&document),
        "query Q($a: Int) {\n  x: f(a: $a) {\n    g\n  }\n  ...F\n}\n\nfragment F on T {\n  h\n}"
    );
}

#[test]
fn operations_print_in_source_order() {
    let document = parse_query("query B { b } query A { a } fragment Z on T { z } fragment Y on T { y }").unwrap();
    let printed = print_document(&document);

    let order = ["query B", "query A", "fragment Z", "fragment Y"].map(|needle| printed.find(needle));
    assert!(order.iter().all(Option::is_some), "{printed}");
    assert!(order.windows(2).all(|pair| pair[0] < pair[1]), "{printed}");
}
