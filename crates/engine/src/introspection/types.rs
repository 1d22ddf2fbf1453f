use std::any::Any;

use engine_registry::{
    DirectiveLocation, EnumType, Error, MetaDirective, MetaEnumValue, MetaField, MetaFieldType, MetaInputValue,
    MetaType, MetaTypeName, ObjectType, Registry, ResolvedValue, ResolverContext, TypeKind,
};
use strum::IntoEnumIterator;

use super::SchemaHandle;

/// A named type, or a list or non-null wrapper around one.
#[derive(Debug, Clone)]
pub(super) struct TypeRef(MetaFieldType);

impl TypeRef {
    pub(super) fn named(name: &str) -> Self {
        TypeRef(name.into())
    }

    fn kind(&self, registry: &Registry) -> Option<TypeKind> {
        match MetaTypeName::create(self.0.as_str()) {
            MetaTypeName::NonNull(_) => Some(TypeKind::NonNull),
            MetaTypeName::List(_) => Some(TypeKind::List),
            MetaTypeName::Named(name) => registry.lookup_type(name).map(MetaType::kind),
        }
    }

    /// The type itself, `None` for wrappers.
    fn named_type<'a>(&self, registry: &'a Registry) -> Option<&'a MetaType> {
        match MetaTypeName::create(self.0.as_str()) {
            MetaTypeName::Named(name) => registry.lookup_type(name),
            _ => None,
        }
    }

    fn of_type(&self) -> Option<TypeRef> {
        match MetaTypeName::create(self.0.as_str()) {
            MetaTypeName::NonNull(inner) | MetaTypeName::List(inner) => Some(TypeRef(inner.into())),
            MetaTypeName::Named(_) => None,
        }
    }
}

impl From<TypeRef> for ResolvedValue {
    fn from(ty: TypeRef) -> Self {
        ResolvedValue::opaque(ty)
    }
}

fn parent<'a, T: Any>(ctx: &'a ResolverContext<'_>) -> Result<&'a T, Error> {
    ctx.parent.downcast_ref::<T>().ok_or_else(|| {
        Error::new(format!(
            "Introspection field \"{}\" resolved on an unexpected value",
            ctx.field.name
        ))
    })
}

fn string(value: Option<&str>) -> ResolvedValue {
    value.map_or_else(ResolvedValue::null, |value| ResolvedValue::new(value.into()))
}

fn include_deprecated(ctx: &ResolverContext<'_>) -> Result<bool, Error> {
    Ok(ctx.argument_as::<bool>("includeDeprecated")?.unwrap_or(true))
}

fn list<T: Any + Send + Sync>(items: impl IntoIterator<Item = T>) -> ResolvedValue {
    ResolvedValue::list(items.into_iter().map(ResolvedValue::opaque))
}

fn include_deprecated_argument() -> MetaInputValue {
    MetaInputValue::new("includeDeprecated", "Boolean").with_default(true)
}

/// The meta types, in the order their fields reference each other.
pub(super) fn meta_types() -> Vec<MetaType> {
    vec![
        schema().into(),
        type_().into(),
        type_kind().into(),
        field().into(),
        input_value().into(),
        enum_value().into(),
        directive().into(),
        directive_location().into(),
        subscription().into(),
    ]
}

fn schema() -> ObjectType {
    ObjectType::new("__Schema")
        .with_description(
            "A GraphQL Schema defines the capabilities of a GraphQL server. It exposes all available types and \
             directives on the server, as well as the entry points for query, mutation, and subscription operations.",
        )
        .with_field(
            MetaField::new("queryType", "__Type!")
                .with_description("The type that query operations will be rooted at.")
                .with_resolver_fn(|ctx| {
                    parent::<SchemaHandle>(ctx)?;
                    Ok(TypeRef::named(ctx.registry.query_type().name()).into())
                }),
        )
        .with_field(
            MetaField::new("mutationType", "__Type")
                .with_description("If this server supports mutation, the type that mutation operations will be rooted at.")
                .with_resolver_fn(|ctx| {
                    parent::<SchemaHandle>(ctx)?;
                    Ok(ctx
                        .registry
                        .mutation_type()
                        .map_or_else(ResolvedValue::null, |ty| TypeRef::named(ty.name()).into()))
                }),
        )
        .with_field(
            MetaField::new("subscriptionType", "__Type")
                .with_description(
                    "If this server supports subscription, the type that subscription operations will be rooted at.",
                )
                .with_resolver_fn(|ctx| {
                    parent::<SchemaHandle>(ctx)?;
                    Ok(ctx
                        .registry
                        .subscription_type()
                        .map_or_else(ResolvedValue::null, |ty| TypeRef::named(ty.name()).into()))
                }),
        )
        .with_field(
            MetaField::new("types", "[__Type!]!")
                .with_description("A list of all types supported by this server.")
                .with_resolver_fn(|ctx| {
                    parent::<SchemaHandle>(ctx)?;
                    Ok(list(ctx.registry.types().map(|ty| TypeRef::named(ty.name()))))
                }),
        )
        .with_field(
            MetaField::new("directives", "[__Directive!]!")
                .with_description("A list of all directives supported by this server.")
                .with_resolver_fn(|ctx| {
                    parent::<SchemaHandle>(ctx)?;
                    Ok(list(ctx.registry.directives().cloned()))
                }),
        )
}

fn type_() -> ObjectType {
    ObjectType::new("__Type")
        .with_description(
            "The fundamental unit of any GraphQL Schema is the type. There are many kinds of types in GraphQL as \
             represented by the `__TypeKind` enum.",
        )
        .with_field(MetaField::new("kind", "__TypeKind!").with_resolver_fn(|ctx| {
            let ty = parent::<TypeRef>(ctx)?;
            let kind = ty
                .kind(ctx.registry)
                .ok_or_else(|| Error::new(format!("Unknown type \"{}\"", ty.0)))?;
            Ok(ResolvedValue::new(kind.to_string().into()))
        }))
        .with_field(MetaField::new("name", "String").with_resolver_fn(|ctx| {
            let ty = parent::<TypeRef>(ctx)?;
            Ok(string(ty.named_type(ctx.registry).map(MetaType::name)))
        }))
        .with_field(MetaField::new("description", "String").with_resolver_fn(|ctx| {
            let ty = parent::<TypeRef>(ctx)?;
            Ok(string(ty.named_type(ctx.registry).and_then(MetaType::description)))
        }))
        .with_field(
            MetaField::new("fields", "[__Field!]")
                .with_argument(include_deprecated_argument())
                .with_resolver_fn(|ctx| {
                    let ty = parent::<TypeRef>(ctx)?;
                    let include_deprecated = include_deprecated(ctx)?;
                    let Some(fields) = ty.named_type(ctx.registry).and_then(MetaType::fields) else {
                        return Ok(ResolvedValue::null());
                    };
                    Ok(list(
                        fields
                            .values()
                            .filter(|field| !field.name.starts_with("__"))
                            .filter(|field| include_deprecated || !field.deprecation.is_deprecated())
                            .cloned(),
                    ))
                }),
        )
        .with_field(MetaField::new("interfaces", "[__Type!]").with_resolver_fn(|ctx| {
            let ty = parent::<TypeRef>(ctx)?;
            Ok(match ty.named_type(ctx.registry) {
                Some(MetaType::Object(object)) => list(
                    ctx.registry
                        .interfaces_implemented(&object.name)
                        .map(|interface| TypeRef::named(interface.name())),
                ),
                _ => ResolvedValue::null(),
            })
        }))
        .with_field(MetaField::new("possibleTypes", "[__Type!]").with_resolver_fn(|ctx| {
            let ty = parent::<TypeRef>(ctx)?;
            Ok(match ty.named_type(ctx.registry) {
                Some(ty) if ty.is_abstract() => list(
                    ctx.registry
                        .possible_types(ty)
                        .map(|possible| TypeRef::named(possible.name())),
                ),
                _ => ResolvedValue::null(),
            })
        }))
        .with_field(
            MetaField::new("enumValues", "[__EnumValue!]")
                .with_argument(include_deprecated_argument())
                .with_resolver_fn(|ctx| {
                    let ty = parent::<TypeRef>(ctx)?;
                    let include_deprecated = include_deprecated(ctx)?;
                    let Some(values) = ty.named_type(ctx.registry).and_then(MetaType::enum_values) else {
                        return Ok(ResolvedValue::null());
                    };
                    Ok(list(
                        values
                            .values()
                            .filter(|value| include_deprecated || !value.deprecation.is_deprecated())
                            .cloned(),
                    ))
                }),
        )
        .with_field(MetaField::new("inputFields", "[__InputValue!]").with_resolver_fn(|ctx| {
            let ty = parent::<TypeRef>(ctx)?;
            Ok(ty
                .named_type(ctx.registry)
                .and_then(MetaType::input_fields)
                .map_or_else(ResolvedValue::null, |fields| list(fields.values().cloned())))
        }))
        .with_field(MetaField::new("ofType", "__Type").with_resolver_fn(|ctx| {
            let ty = parent::<TypeRef>(ctx)?;
            Ok(ty.of_type().map_or_else(ResolvedValue::null, Into::into))
        }))
}

fn type_kind() -> EnumType {
    TypeKind::iter().fold(
        EnumType::new("__TypeKind").with_description("An enum describing what kind of type a given `__Type` is."),
        |ty, kind| ty.with_value(MetaEnumValue::new(kind.to_string())),
    )
}

fn field() -> ObjectType {
    ObjectType::new("__Field")
        .with_description(
            "Object and Interface types are described by a list of Fields, each of which has a name, potentially \
             a list of arguments, and a return type.",
        )
        .with_field(MetaField::new("name", "String!").with_resolver_fn(|ctx| {
            Ok(string(Some(parent::<MetaField>(ctx)?.name.as_str())))
        }))
        .with_field(MetaField::new("description", "String").with_resolver_fn(|ctx| {
            Ok(string(parent::<MetaField>(ctx)?.description.as_deref()))
        }))
        .with_field(MetaField::new("args", "[__InputValue!]!").with_resolver_fn(|ctx| {
            Ok(list(parent::<MetaField>(ctx)?.args.values().cloned()))
        }))
        .with_field(MetaField::new("type", "__Type!").with_resolver_fn(|ctx| {
            Ok(TypeRef(parent::<MetaField>(ctx)?.ty.clone()).into())
        }))
        .with_field(MetaField::new("isDeprecated", "Boolean!").with_resolver_fn(|ctx| {
            Ok(ResolvedValue::new(
                parent::<MetaField>(ctx)?.deprecation.is_deprecated().into(),
            ))
        }))
        .with_field(MetaField::new("deprecationReason", "String").with_resolver_fn(|ctx| {
            Ok(string(parent::<MetaField>(ctx)?.deprecation.reason()))
        }))
}

fn input_value() -> ObjectType {
    ObjectType::new("__InputValue")
        .with_description(
            "Arguments provided to Fields or Directives and the input fields of an InputObject are represented as \
             Input Values which describe their type and optionally a default value.",
        )
        .with_field(MetaField::new("name", "String!").with_resolver_fn(|ctx| {
            Ok(string(Some(parent::<MetaInputValue>(ctx)?.name.as_str())))
        }))
        .with_field(MetaField::new("description", "String").with_resolver_fn(|ctx| {
            Ok(string(parent::<MetaInputValue>(ctx)?.description.as_deref()))
        }))
        .with_field(MetaField::new("type", "__Type!").with_resolver_fn(|ctx| {
            Ok(TypeRef(parent::<MetaInputValue>(ctx)?.ty.clone()).into())
        }))
        .with_field(
            MetaField::new("defaultValue", "String")
                .with_description("A GraphQL-formatted string representing the default value for this input value.")
                .with_resolver_fn(|ctx| {
                    let default_value = parent::<MetaInputValue>(ctx)?
                        .default_value
                        .as_ref()
                        .map(ToString::to_string);
                    Ok(string(default_value.as_deref()))
                }),
        )
}

fn enum_value() -> ObjectType {
    ObjectType::new("__EnumValue")
        .with_description(
            "One possible value for a given Enum. Enum values are unique values, not a placeholder for a string or \
             numeric value.",
        )
        .with_field(MetaField::new("name", "String!").with_resolver_fn(|ctx| {
            Ok(string(Some(parent::<MetaEnumValue>(ctx)?.name.as_str())))
        }))
        .with_field(MetaField::new("description", "String").with_resolver_fn(|ctx| {
            Ok(string(parent::<MetaEnumValue>(ctx)?.description.as_deref()))
        }))
        .with_field(MetaField::new("isDeprecated", "Boolean!").with_resolver_fn(|ctx| {
            Ok(ResolvedValue::new(
                parent::<MetaEnumValue>(ctx)?.deprecation.is_deprecated().into(),
            ))
        }))
        .with_field(MetaField::new("deprecationReason", "String").with_resolver_fn(|ctx| {
            Ok(string(parent::<MetaEnumValue>(ctx)?.deprecation.reason()))
        }))
}

fn directive() -> ObjectType {
    ObjectType::new("__Directive")
        .with_description(
            "A Directive provides a way to describe alternate runtime execution and type validation behavior in a \
             GraphQL document.",
        )
        .with_field(MetaField::new("name", "String!").with_resolver_fn(|ctx| {
            Ok(string(Some(parent::<MetaDirective>(ctx)?.name.as_str())))
        }))
        .with_field(MetaField::new("description", "String").with_resolver_fn(|ctx| {
            Ok(string(parent::<MetaDirective>(ctx)?.description.as_deref()))
        }))
        .with_field(
            MetaField::new("locations", "[__DirectiveLocation!]!").with_resolver_fn(|ctx| {
                let locations = parent::<MetaDirective>(ctx)?
                    .locations
                    .iter()
                    .map(|location| serde_json::Value::String(location.to_string()))
                    .collect();
                Ok(ResolvedValue::new(serde_json::Value::Array(locations)))
            }),
        )
        .with_field(MetaField::new("args", "[__InputValue!]!").with_resolver_fn(|ctx| {
            Ok(list(parent::<MetaDirective>(ctx)?.args.values().cloned()))
        }))
}

fn subscription() -> ObjectType {
    ObjectType::new("__Subscription")
        .with_description("The root type of subscription operations, when the schema has one.")
        .with_field(MetaField::new("name", "String").with_resolver_fn(|ctx| {
            Ok(string(ctx.registry.subscription_type().map(MetaType::name)))
        }))
}

fn directive_location() -> EnumType {
    DirectiveLocation::iter().fold(
        EnumType::new("__DirectiveLocation").with_description(
            "A Directive can be adjacent to many parts of the GraphQL language, a __DirectiveLocation describes one \
             such possible adjacencies.",
        ),
        |ty, location| ty.with_value(MetaEnumValue::new(location.to_string())),
    )
}
