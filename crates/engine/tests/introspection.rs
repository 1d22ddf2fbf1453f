use engine::{
    ConstValue, EngineConfig, EnumType, InputObjectType, InterfaceType, MetaEnumValue, MetaField, MetaInputValue,
    Name, ObjectType, Schema, UnionType,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

fn latest_schema() -> Schema {
    let mut builder = Schema::build(ObjectType::new("TestSchema").with_description("Root of TestSchema"));
    builder
        .add_query(
            MetaField::new("latest", "latest")
                .with_description("latest description")
                .deprecated(Some("for test"))
                .with_argument(MetaInputValue::new("id", "Int"))
                .with_resolver_fn(|_| Ok(json!({ "id": 1, "name": "Alex" }).into())),
        )
        .register_type(
            ObjectType::new("latest")
                .with_field(MetaField::new("id", "Int"))
                .with_field(MetaField::new("name", "String")),
        );
    builder.finish().unwrap()
}

#[rstest]
#[case::type_without_name(
    "{ __type { name } }",
    json!({ "errors": [{ "message": "Require \"name\" arguments to query \"__type\"" }] })
)]
#[case::type_by_name(
    r#"{ __type (name: "__Type") { name } }"#,
    json!({ "data": { "__type": { "name": "__Type" } } })
)]
#[case::aliased_schema(
    r"{
      test : __schema {
        queryType {
          kind,
          name,
          fields {
            name,
            isDeprecated,
            deprecationReason,
            description,
            type {
              name
            }
          }
        }
      }
    }",
    json!({
        "data": {
            "test": {
                "queryType": {
                    "kind": "OBJECT",
                    "name": "TestSchema",
                    "fields": [{
                        "name": "latest",
                        "isDeprecated": true,
                        "deprecationReason": "for test",
                        "description": "latest description",
                        "type": { "name": "latest" }
                    }]
                }
            }
        }
    })
)]
#[case::query_type_metadata(
    r"{
      __schema {
        queryType {
          kind,
          name,
          description,
          interfaces {
            name
          },
          possibleTypes {
            name
          },
          inputFields {
            name
          },
          ofType{
            name
          }
        }
      }
    }",
    json!({
        "data": {
            "__schema": {
                "queryType": {
                    "kind": "OBJECT",
                    "name": "TestSchema",
                    "description": "Root of TestSchema",
                    "interfaces": [],
                    "possibleTypes": null,
                    "inputFields": null,
                    "ofType": null
                }
            }
        }
    })
)]
#[tokio::test]
async fn predefined_queries(#[case] query: &str, #[case] expected: serde_json::Value) {
    let response = latest_schema().execute(query).await;
    assert_eq!(response.into_json().unwrap(), expected);
}

#[tokio::test]
async fn all_types_with_their_fields() {
    let response = latest_schema()
        .execute("{ __schema { types { name, fields { name } } } }")
        .await;

    insta::assert_json_snapshot!(response, @r###"
    {
      "data": {
        "__schema": {
          "types": [
            {
              "name": "TestSchema",
              "fields": [
                {
                  "name": "latest"
                }
              ]
            },
            {
              "name": "Int",
              "fields": null
            },
            {
              "name": "latest",
              "fields": [
                {
                  "name": "id"
                },
                {
                  "name": "name"
                }
              ]
            },
            {
              "name": "String",
              "fields": null
            },
            {
              "name": "__Schema",
              "fields": [
                {
                  "name": "queryType"
                },
                {
                  "name": "mutationType"
                },
                {
                  "name": "subscriptionType"
                },
                {
                  "name": "types"
                },
                {
                  "name": "directives"
                }
              ]
            },
            {
              "name": "__Type",
              "fields": [
                {
                  "name": "kind"
                },
                {
                  "name": "name"
                },
                {
                  "name": "description"
                },
                {
                  "name": "fields"
                },
                {
                  "name": "interfaces"
                },
                {
                  "name": "possibleTypes"
                },
                {
                  "name": "enumValues"
                },
                {
                  "name": "inputFields"
                },
                {
                  "name": "ofType"
                }
              ]
            },
            {
              "name": "__TypeKind",
              "fields": null
            },
            {
              "name": "Boolean",
              "fields": null
            },
            {
              "name": "__Field",
              "fields": [
                {
                  "name": "name"
                },
                {
                  "name": "description"
                },
                {
                  "name": "args"
                },
                {
                  "name": "type"
                },
                {
                  "name": "isDeprecated"
                },
                {
                  "name": "deprecationReason"
                }
              ]
            },
            {
              "name": "__InputValue",
              "fields": [
                {
                  "name": "name"
                },
                {
                  "name": "description"
                },
                {
                  "name": "type"
                },
                {
                  "name": "defaultValue"
                }
              ]
            },
            {
              "name": "__EnumValue",
              "fields": [
                {
                  "name": "name"
                },
                {
                  "name": "description"
                },
                {
                  "name": "isDeprecated"
                },
                {
                  "name": "deprecationReason"
                }
              ]
            },
            {
              "name": "__Directive",
              "fields": [
                {
                  "name": "name"
                },
                {
                  "name": "description"
                },
                {
                  "name": "locations"
                },
                {
                  "name": "args"
                }
              ]
            },
            {
              "name": "__DirectiveLocation",
              "fields": null
            },
            {
              "name": "__Subscription",
              "fields": [
                {
                  "name": "name"
                }
              ]
            }
          ]
        }
      }
    }
    "###);
}

#[tokio::test]
async fn deprecated_fields_can_be_hidden() {
    let response = latest_schema()
        .execute(
            r#"{
              all: __type(name: "TestSchema") { fields { name } }
              current: __type(name: "TestSchema") { fields(includeDeprecated: false) { name } }
            }"#,
        )
        .await;

    assert_eq!(
        response.into_json().unwrap(),
        json!({
            "data": {
                "all": { "fields": [{ "name": "latest" }] },
                "current": { "fields": [] }
            }
        })
    );
}

#[tokio::test]
async fn unknown_types_are_null() {
    let response = latest_schema().execute(r#"{ __type(name: "Missing") { name } }"#).await;
    assert_eq!(response.into_json().unwrap(), json!({ "data": { "__type": null } }));
}

#[tokio::test]
async fn scalars_have_no_members() {
    let response = latest_schema()
        .execute(
            r#"{
              __type(name: "Int") {
                kind
                fields { name }
                interfaces { name }
                possibleTypes { name }
                inputFields { name }
                enumValues { name }
              }
            }"#,
        )
        .await;

    assert_eq!(
        response.into_json().unwrap(),
        json!({
            "data": {
                "__type": {
                    "kind": "SCALAR",
                    "fields": null,
                    "interfaces": null,
                    "possibleTypes": null,
                    "inputFields": null,
                    "enumValues": null
                }
            }
        })
    );
}

#[tokio::test]
async fn subscription_meta_type() {
    let response = latest_schema()
        .execute(r#"{ __type(name: "__Subscription") { kind fields { name type { kind name } } } }"#)
        .await;

    assert_eq!(
        response.into_json().unwrap(),
        json!({
            "data": {
                "__type": {
                    "kind": "OBJECT",
                    "fields": [{ "name": "name", "type": { "kind": "SCALAR", "name": "String" } }]
                }
            }
        })
    );
}

fn catalog_schema() -> Schema {
    let mut builder = Schema::build(ObjectType::new("Query"));
    builder
        .add_query(
            MetaField::new("products", "[Product!]!")
                .with_argument(MetaInputValue::new("filter", "ProductFilter"))
                .with_argument(MetaInputValue::new("first", "Int").with_default(10)),
        )
        .add_query(MetaField::new("search", "[SearchResult]"))
        .register_type(
            InterfaceType::new("Node")
                .with_description("An object with an id.")
                .with_field(MetaField::new("id", "ID!")),
        )
        .register_type(
            ObjectType::new("Product")
                .implementing("Node")
                .with_field(MetaField::new("id", "ID!"))
                .with_field(MetaField::new("color", "Color")),
        )
        .register_type(
            ObjectType::new("Category")
                .implementing("Node")
                .with_field(MetaField::new("id", "ID!")),
        )
        .register_type(
            UnionType::new("SearchResult")
                .with_member("Product")
                .with_member("Category"),
        )
        .register_type(
            EnumType::new("Color")
                .with_value(MetaEnumValue::new("RED").with_description("Warm."))
                .with_value(MetaEnumValue::new("GREEN").deprecated(Some("Use RED")))
                .with_value(MetaEnumValue::new("BLUE")),
        )
        .register_type(
            InputObjectType::new("ProductFilter")
                .with_input_field(
                    MetaInputValue::new("color", "Color").with_default(ConstValue::Enum(Name::new("RED"))),
                )
                .with_input_field(MetaInputValue::new("tags", "[String!]")),
        );
    builder.finish().unwrap()
}

#[tokio::test]
async fn wrapped_types_expose_of_type() {
    let response = catalog_schema()
        .execute(
            r#"{
              __type(name: "Query") {
                fields {
                  name
                  type { kind name ofType { kind name ofType { kind name ofType { kind name } } } }
                }
              }
            }"#,
        )
        .await;

    assert_eq!(
        response.into_json().unwrap(),
        json!({
            "data": {
                "__type": {
                    "fields": [
                        {
                            "name": "products",
                            "type": {
                                "kind": "NON_NULL",
                                "name": null,
                                "ofType": {
                                    "kind": "LIST",
                                    "name": null,
                                    "ofType": {
                                        "kind": "NON_NULL",
                                        "name": null,
                                        "ofType": { "kind": "OBJECT", "name": "Product" }
                                    }
                                }
                            }
                        },
                        {
                            "name": "search",
                            "type": {
                                "kind": "LIST",
                                "name": null,
                                "ofType": { "kind": "UNION", "name": "SearchResult", "ofType": null }
                            }
                        }
                    ]
                }
            }
        })
    );
}

#[tokio::test]
async fn arguments_and_input_fields() {
    let response = catalog_schema()
        .execute(
            r#"{
              products: __type(name: "Query") { fields { args { name defaultValue type { name } } } }
              filter: __type(name: "ProductFilter") { kind fields { name } inputFields { name defaultValue } }
            }"#,
        )
        .await;

    assert_eq!(
        response.into_json().unwrap(),
        json!({
            "data": {
                "products": {
                    "fields": [
                        {
                            "args": [
                                { "name": "filter", "defaultValue": null, "type": { "name": "ProductFilter" } },
                                { "name": "first", "defaultValue": "10", "type": { "name": "Int" } }
                            ]
                        },
                        { "args": [] }
                    ]
                },
                "filter": {
                    "kind": "INPUT_OBJECT",
                    "fields": null,
                    "inputFields": [
                        { "name": "color", "defaultValue": "RED" },
                        { "name": "tags", "defaultValue": null }
                    ]
                }
            }
        })
    );
}

#[tokio::test]
async fn enums_and_abstract_types() {
    let response = catalog_schema()
        .execute(
            r#"{
              color: __type(name: "Color") {
                kind
                enumValues { name description isDeprecated deprecationReason }
                current: enumValues(includeDeprecated: false) { name }
              }
              node: __type(name: "Node") { kind description possibleTypes { name } interfaces { name } }
              search: __type(name: "SearchResult") { kind possibleTypes { name } fields { name } }
              product: __type(name: "Product") { interfaces { name } possibleTypes { name } }
            }"#,
        )
        .await;

    assert_eq!(
        response.into_json().unwrap(),
        json!({
            "data": {
                "color": {
                    "kind": "ENUM",
                    "enumValues": [
                        { "name": "RED", "description": "Warm.", "isDeprecated": false, "deprecationReason": null },
                        { "name": "GREEN", "description": null, "isDeprecated": true, "deprecationReason": "Use RED" },
                        { "name": "BLUE", "description": null, "isDeprecated": false, "deprecationReason": null }
                    ],
                    "current": [{ "name": "RED" }, { "name": "BLUE" }]
                },
                "node": {
                    "kind": "INTERFACE",
                    "description": "An object with an id.",
                    "possibleTypes": [{ "name": "Product" }, { "name": "Category" }],
                    "interfaces": null
                },
                "search": {
                    "kind": "UNION",
                    "possibleTypes": [{ "name": "Product" }, { "name": "Category" }],
                    "fields": null
                },
                "product": {
                    "interfaces": [{ "name": "Node" }],
                    "possibleTypes": null
                }
            }
        })
    );
}

#[tokio::test]
async fn schema_roots_and_directives() {
    let mut builder = Schema::build(ObjectType::new("Query"));
    builder
        .add_query(MetaField::new("version", "String"))
        .add_mutation(MetaField::new("bump", "Int"));
    let schema = builder.finish().unwrap();

    let response = schema
        .execute(
            r"{
              __schema {
                queryType { name }
                mutationType { name }
                subscriptionType { name }
                directives { name locations args { name type { kind ofType { name } } } }
              }
            }",
        )
        .await;

    assert_eq!(
        response.into_json().unwrap(),
        json!({
            "data": {
                "__schema": {
                    "queryType": { "name": "Query" },
                    "mutationType": { "name": "Mutation" },
                    "subscriptionType": null,
                    "directives": [
                        {
                            "name": "skip",
                            "locations": ["FIELD", "FRAGMENT_SPREAD", "INLINE_FRAGMENT"],
                            "args": [{ "name": "if", "type": { "kind": "NON_NULL", "ofType": { "name": "Boolean" } } }]
                        },
                        {
                            "name": "include",
                            "locations": ["FIELD", "FRAGMENT_SPREAD", "INLINE_FRAGMENT"],
                            "args": [{ "name": "if", "type": { "kind": "NON_NULL", "ofType": { "name": "Boolean" } } }]
                        }
                    ]
                }
            }
        })
    );
}

#[tokio::test]
async fn typename_is_available_everywhere() {
    let response = latest_schema()
        .execute("{ __typename latest { __typename id } __schema { __typename queryType { __typename } } }")
        .await;

    assert_eq!(
        response.into_json().unwrap(),
        json!({
            "data": {
                "__typename": "TestSchema",
                "latest": { "__typename": "latest", "id": 1 },
                "__schema": { "__typename": "__Schema", "queryType": { "__typename": "__Type" } }
            }
        })
    );
}

#[tokio::test]
async fn introspection_can_be_disabled() {
    let mut builder = Schema::build(ObjectType::new("Query")).config(EngineConfig {
        introspection: false,
        ..Default::default()
    });
    builder.add_query(MetaField::new("version", "String"));
    let schema = builder.finish().unwrap();

    assert!(schema.get_type("__Schema").is_none());
    assert_eq!(
        schema.types().map(|ty| ty.name().to_string()).collect::<Vec<_>>(),
        vec!["Query", "String", "Boolean"]
    );

    let response = schema.execute("{ __schema { types { name } } }").await;
    assert_eq!(
        response.into_json().unwrap(),
        json!({ "errors": [{ "message": "Field \"__schema\" not found in type \"Query\"" }] })
    );

    let response = schema.execute("{ __typename }").await;
    assert_eq!(response.into_json().unwrap(), json!({ "data": { "__typename": "Query" } }));
}
