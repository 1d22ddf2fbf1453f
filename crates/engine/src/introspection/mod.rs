//! The introspection meta-schema.
//!
//! `__Schema`, `__Type` and friends are registered as ordinary types. Their resolvers pass opaque
//! handles to each other and read everything else from the registry of the resolver context.

mod types;

use engine_registry::{MetaField, MetaInputValue, RegistryBuilder, ResolvedValue};

use self::types::TypeRef;

/// Handle passed from `__schema` to the `__Schema` fields.
struct SchemaHandle;

/// Registers the meta types together with `__schema` and `__type` on the query root.
pub(crate) fn register(builder: &mut RegistryBuilder) {
    for ty in types::meta_types() {
        builder.add_introspection_type(ty);
    }

    builder
        .add_introspection_field(
            MetaField::new("__schema", "__Schema!")
                .with_description("Access the current type schema of this server.")
                .with_resolver_fn(|_| Ok(ResolvedValue::opaque(SchemaHandle))),
        )
        .add_introspection_field(
            MetaField::new("__type", "__Type")
                .with_description("Request the type information of a single type.")
                .with_argument(MetaInputValue::new("name", "String!"))
                .with_resolver_fn(|ctx| {
                    let name = ctx.argument_as::<String>("name")?.unwrap_or_default();
                    Ok(match ctx.registry.lookup_type(&name) {
                        Some(ty) => TypeRef::named(ty.name()).into(),
                        None => ResolvedValue::null(),
                    })
                }),
        );
}
