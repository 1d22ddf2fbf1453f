//! The type system of the engine.
//!
//! A [`Registry`] is built once through a [`RegistryBuilder`] and is immutable afterwards. It owns
//! every type reachable from the root operation types, in a deterministic order, together with
//! the resolvers attached to their fields.

mod builder;
mod directives;
mod error;
mod field_types;
mod fields;
mod input_values;
pub mod resolvers;
mod scalars;
mod types;

use engine_parser::types::OperationType;
use indexmap::IndexMap;

pub use self::{
    builder::RegistryBuilder,
    directives::{DirectiveLocation, MetaDirective},
    error::{Error, SchemaError},
    field_types::{named_type_from_type_str, MetaFieldType, MetaTypeName, WrappingType, WrappingTypeIter},
    fields::{Deprecation, MetaEnumValue, MetaField, MetaInputValue},
    input_values::{coerce_input_value, InputValueError},
    resolvers::{Data, ResolvedValue, Resolver, ResolverContext},
    scalars::{ScalarParser, BUILTIN_SCALARS},
    types::{EnumType, InputObjectType, InterfaceType, MetaType, ObjectType, ScalarType, TypeKind, UnionType},
};

#[derive(Debug)]
pub struct Registry {
    types: IndexMap<String, MetaType>,
    directives: IndexMap<String, MetaDirective>,
    query_type: String,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
    typename_field: MetaField,
}

impl Registry {
    /// Every reachable type: the root types first, then in order of discovery.
    pub fn types(&self) -> impl ExactSizeIterator<Item = &MetaType> {
        self.types.values()
    }

    pub fn lookup_type(&self, name: &str) -> Option<&MetaType> {
        self.types.get(name)
    }

    pub fn directives(&self) -> impl ExactSizeIterator<Item = &MetaDirective> {
        self.directives.values()
    }

    pub fn lookup_directive(&self, name: &str) -> Option<&MetaDirective> {
        self.directives.get(name)
    }

    pub fn query_type(&self) -> &MetaType {
        &self.types[self.query_type.as_str()]
    }

    pub fn mutation_type(&self) -> Option<&MetaType> {
        self.mutation_type.as_deref().and_then(|name| self.lookup_type(name))
    }

    pub fn subscription_type(&self) -> Option<&MetaType> {
        self.subscription_type.as_deref().and_then(|name| self.lookup_type(name))
    }

    pub fn root_type(&self, operation_type: OperationType) -> Option<&MetaType> {
        match operation_type {
            OperationType::Query => Some(self.query_type()),
            OperationType::Mutation => self.mutation_type(),
            OperationType::Subscription => self.subscription_type(),
        }
    }

    /// Looks up a field of a composite type, including the implicit `__typename`.
    pub fn lookup_field<'a>(&'a self, ty: &'a MetaType, name: &str) -> Option<&'a MetaField> {
        if name == "__typename" && ty.is_composite() {
            return Some(&self.typename_field);
        }
        ty.field(name)
    }

    pub fn interfaces_implemented<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a MetaType> + 'a {
        let implements = match self.lookup_type(name) {
            Some(MetaType::Object(object)) => Some(&object.implements),
            _ => None,
        };
        implements
            .into_iter()
            .flatten()
            .filter_map(|interface| self.lookup_type(interface))
    }

    /// Concrete object types of an abstract type, in registration order.
    pub fn possible_types<'a>(&'a self, ty: &'a MetaType) -> impl Iterator<Item = &'a MetaType> + 'a {
        ty.possible_types()
            .into_iter()
            .flatten()
            .filter_map(|name| self.lookup_type(name))
    }

    /// Whether a fragment on `condition` can apply to a value of type `ty`.
    pub fn types_overlap(&self, ty: &MetaType, condition: &MetaType) -> bool {
        if ty.name() == condition.name() {
            return true;
        }
        match (ty.is_abstract(), condition.is_abstract()) {
            (false, false) => false,
            (false, true) => condition.is_possible_type(ty.name()),
            (true, false) => ty.is_possible_type(condition.name()),
            (true, true) => self
                .possible_types(ty)
                .any(|possible| condition.is_possible_type(possible.name())),
        }
    }
}
