use indexmap::IndexMap;

use crate::MetaInputValue;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DirectiveLocation {
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
    VariableDefinition,
    Schema,
    Scalar,
    Object,
    FieldDefinition,
    ArgumentDefinition,
    Interface,
    Union,
    Enum,
    EnumValue,
    InputObject,
    InputFieldDefinition,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetaDirective {
    pub name: String,
    pub description: Option<String>,
    pub locations: Vec<DirectiveLocation>,
    pub args: IndexMap<String, MetaInputValue>,
    pub is_repeatable: bool,
}

impl MetaDirective {
    /// `@skip(if: Boolean!)`
    pub fn skip() -> Self {
        Self::conditional(
            "skip",
            "Directs the executor to skip this field or fragment when the `if` argument is true.",
            "Skipped when true.",
        )
    }

    /// `@include(if: Boolean!)`
    pub fn include() -> Self {
        Self::conditional(
            "include",
            "Directs the executor to include this field or fragment only when the `if` argument is true.",
            "Included when true.",
        )
    }

    fn conditional(name: &str, description: &str, if_description: &str) -> Self {
        let condition = MetaInputValue::new("if", "Boolean!").with_description(if_description);
        MetaDirective {
            name: name.to_string(),
            description: Some(description.to_string()),
            locations: vec![
                DirectiveLocation::Field,
                DirectiveLocation::FragmentSpread,
                DirectiveLocation::InlineFragment,
            ],
            args: IndexMap::from([(condition.name.clone(), condition)]),
            is_repeatable: false,
        }
    }
}
