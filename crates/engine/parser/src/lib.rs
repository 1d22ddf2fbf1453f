//! Parsing of GraphQL executable documents.
//!
//! Documents are parsed by `async-graphql-parser`. On top of it this crate bounds how deeply a
//! document may nest and prints documents back to GraphQL text with [`print_document`].

mod depth;
mod error;
mod printer;

pub use async_graphql_parser::{types, Pos, Positioned};
pub use error::{Error, Result};
pub use printer::print_document;

/// Maximum nesting of selection sets and compound values.
pub const MAX_RECURSION_DEPTH: usize = 128;

/// Parse a GraphQL query document.
///
/// # Errors
///
/// Fails if the query is not a valid executable document or nests deeper than
/// [`MAX_RECURSION_DEPTH`].
pub fn parse_query<T: AsRef<str>>(input: T) -> Result<types::ExecutableDocument> {
    let document = async_graphql_parser::parse_query(input)?;
    depth::check(&document)?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use engine_value::{ConstValue, Name, Value};
    use pretty_assertions::assert_eq;

    use super::{types::*, *};

    fn single(query: &str) -> OperationDefinition {
        match parse_query(query).unwrap().operations {
            DocumentOperations::Single(operation) => operation.node,
            DocumentOperations::Multiple(_) => unreachable!("expected an anonymous operation"),
        }
    }

    fn field(selection: &Selection) -> &Field {
        match selection {
            Selection::Field(field) => &field.node,
            other => unreachable!("expected a field, got {other:?}"),
        }
    }

    #[test]
    fn shorthand_query() {
        let operation = single("{ __type(name: \"__Type\") { name } }");
        assert_eq!(operation.ty, OperationType::Query);

        let type_field = field(&operation.selection_set.node.items[0].node);
        assert_eq!(type_field.name.node.as_str(), "__type");
        assert_eq!(
            type_field.get_argument("name").map(|value| &value.node),
            Some(&Value::String("__Type".to_string()))
        );
        assert_eq!(
            field(&type_field.selection_set.node.items[0].node).name.node.as_str(),
            "name"
        );
    }

    #[test]
    fn named_operations_with_variables() {
        let document = parse_query(
            r"
            query Latest($id: Int! = 1, $withName: Boolean) {
              test: latest(id: $id) {
                id
                name @include(if: $withName)
              }
            }
            ",
        )
        .unwrap();

        let DocumentOperations::Multiple(operations) = &document.operations else {
            unreachable!("expected a named operation");
        };
        let operation = &operations[&Name::new("Latest")].node;
        assert_eq!(operation.variable_definitions.len(), 2);
        assert_eq!(
            operation.variable_definitions[0].node.default_value(),
            Some(&ConstValue::Number(1.into()))
        );
        assert_eq!(operation.variable_definitions[1].node.default_value(), Some(&ConstValue::Null));

        let latest = field(&operation.selection_set.node.items[0].node);
        assert_eq!(latest.response_key().node.as_str(), "test");
        assert_eq!(latest.name.node.as_str(), "latest");
        assert_eq!(
            latest.get_argument("id").map(|value| &value.node),
            Some(&Value::Variable(Name::new("id")))
        );

        let name = &latest.selection_set.node.items[1].node;
        assert_eq!(name.directives()[0].node.name.node.as_str(), "include");
    }

    #[test]
    fn duplicates_and_anonymous_operations_are_rejected() {
        for query in [
            "query A { a } query A { b }",
            "{ a } { b }",
            "{ a } query B { b }",
            "{ ...F } fragment F on T { a } fragment F on T { b }",
            "fragment F on T { a }",
        ] {
            assert!(matches!(parse_query(query), Err(Error::Syntax(_))), "{query}");
        }
    }

    #[test]
    fn syntax_errors_carry_positions() {
        let err = parse_query("{\n  a(x: ) }").unwrap_err();
        let positions = err.positions().collect::<Vec<_>>();
        assert_eq!(positions.first().map(|pos| pos.line), Some(2));
    }

    #[test]
    fn nesting_is_bounded() {
        let nested = |depth: usize| format!("{}{}", "{ a ".repeat(depth), "}".repeat(depth));

        assert!(parse_query(nested(16)).is_ok());
        assert!(parse_query(nested(MAX_RECURSION_DEPTH * 4)).is_err());

        let depth = MAX_RECURSION_DEPTH + 1;
        let list = format!("{{ a(x: {}1{}) }}", "[".repeat(depth), "]".repeat(depth));
        assert!(parse_query(list).is_err());
    }
}
