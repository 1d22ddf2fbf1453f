use engine_parser::types::Type;
use indexmap::{map::Entry, IndexMap};

use crate::{
    scalars::{builtin_scalar, BUILTIN_SCALARS},
    MetaDirective, MetaField, MetaType, ObjectType, Registry, SchemaError,
};

/// Collects root fields and types, then checks and orders them into a [`Registry`].
#[derive(Debug)]
pub struct RegistryBuilder {
    query: ObjectType,
    mutation: Option<ObjectType>,
    subscription: Option<ObjectType>,
    introspection_fields: Vec<MetaField>,
    introspection_types: Vec<String>,
    types: IndexMap<String, MetaType>,
    errors: Vec<SchemaError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Input,
    Output,
}

impl RegistryBuilder {
    pub fn new(query_root: ObjectType) -> Self {
        RegistryBuilder {
            query: query_root,
            mutation: None,
            subscription: None,
            introspection_fields: Vec::new(),
            introspection_types: Vec::new(),
            types: IndexMap::new(),
            errors: Vec::new(),
        }
    }

    /// Use a custom mutation root, otherwise one named `Mutation` is created on demand.
    #[must_use]
    pub fn with_mutation_root(mut self, root: ObjectType) -> Self {
        self.mutation = Some(merge_root(self.mutation.take(), root));
        self
    }

    /// Use a custom subscription root, otherwise one named `Subscription` is created on demand.
    #[must_use]
    pub fn with_subscription_root(mut self, root: ObjectType) -> Self {
        self.subscription = Some(merge_root(self.subscription.take(), root));
        self
    }

    pub fn add_query(&mut self, field: MetaField) -> &mut Self {
        add_root_field(&mut self.query, field, &mut self.errors);
        self
    }

    pub fn add_mutation(&mut self, field: MetaField) -> &mut Self {
        let root = self.mutation.get_or_insert_with(|| ObjectType::new("Mutation"));
        add_root_field(root, field, &mut self.errors);
        self
    }

    pub fn add_subscription(&mut self, field: MetaField) -> &mut Self {
        let root = self.subscription.get_or_insert_with(|| ObjectType::new("Subscription"));
        add_root_field(root, field, &mut self.errors);
        self
    }

    /// Adds one of the reserved `__` fields to the query root, after every other root field.
    pub fn add_introspection_field(&mut self, field: MetaField) -> &mut Self {
        self.introspection_fields.push(field);
        self
    }

    /// Registers a meta type, listed in [`Registry::types`] even when no field returns it.
    pub fn add_introspection_type(&mut self, ty: impl Into<MetaType>) -> &mut Self {
        let ty = ty.into();
        self.introspection_types.push(ty.name().to_string());
        self.register_type(ty)
    }

    /// Makes a named type available. Registering the same definition twice is allowed.
    pub fn register_type(&mut self, ty: impl Into<MetaType>) -> &mut Self {
        let ty = ty.into();
        match self.types.entry(ty.name().to_string()) {
            Entry::Occupied(entry) => {
                if entry.get() != &ty {
                    self.errors.push(SchemaError::DuplicateType(entry.key().clone()));
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(ty);
            }
        }
        self
    }

    /// A type registered so far, or a built-in scalar.
    pub fn get_type(&self, name: &str) -> Option<MetaType> {
        self.types
            .get(name)
            .cloned()
            .or_else(|| builtin_scalar(name).map(MetaType::Scalar))
    }

    pub fn finish(self) -> Result<Registry, SchemaError> {
        let RegistryBuilder {
            mut query,
            mutation,
            subscription,
            introspection_fields,
            introspection_types,
            mut types,
            errors,
        } = self;

        if let Some(error) = errors.into_iter().next() {
            return Err(error);
        }

        for field in introspection_fields {
            query.fields.insert(field.name.clone(), field);
        }

        for name in BUILTIN_SCALARS {
            if !types.contains_key(name) {
                if let Some(scalar) = builtin_scalar(name) {
                    types.insert(name.to_string(), scalar.into());
                }
            }
        }

        let query_type = query.name.clone();
        let mutation_type = mutation.as_ref().map(|root| root.name.clone());
        let subscription_type = subscription.as_ref().map(|root| root.name.clone());
        let roots: Vec<ObjectType> = std::iter::once(query).chain(mutation).chain(subscription).collect();
        for root in &roots {
            if types.contains_key(&root.name) {
                return Err(SchemaError::DuplicateType(root.name.clone()));
            }
        }

        link_abstract_types(&mut types)?;

        let mut ordering = Ordering {
            declared: types,
            ordered: IndexMap::new(),
        };
        for root in &roots {
            ordering.ordered.insert(root.name.clone(), MetaType::Object(root.clone()));
        }
        for root in roots {
            ordering.visit_children(&MetaType::Object(root))?;
        }

        let directives = [MetaDirective::skip(), MetaDirective::include()];
        for directive in &directives {
            for argument in directive.args.values() {
                ordering.visit(
                    argument.ty.as_str(),
                    Position::Input,
                    &format!("@{}({}:)", directive.name, argument.name),
                )?;
            }
        }
        for name in &introspection_types {
            ordering.visit(name, Position::Output, name)?;
        }

        Ok(Registry {
            types: ordering.ordered,
            directives: directives
                .into_iter()
                .map(|directive| (directive.name.clone(), directive))
                .collect(),
            query_type,
            mutation_type,
            subscription_type,
            typename_field: MetaField::new("__typename", "String!")
                .with_description("The name of the current object type."),
        })
    }
}

fn merge_root(existing: Option<ObjectType>, mut root: ObjectType) -> ObjectType {
    if let Some(existing) = existing {
        for (name, field) in existing.fields {
            root.fields.entry(name).or_insert(field);
        }
    }
    root
}

fn add_root_field(root: &mut ObjectType, field: MetaField, errors: &mut Vec<SchemaError>) {
    if field.name.starts_with("__") {
        errors.push(SchemaError::ReservedFieldName(field.name));
        return;
    }
    match root.fields.entry(field.name.clone()) {
        Entry::Occupied(entry) => errors.push(SchemaError::DuplicateField {
            ty: root.name.clone(),
            field: entry.key().clone(),
        }),
        Entry::Vacant(entry) => {
            entry.insert(field);
        }
    }
}

/// Checks union members and interface implementations, and records implementors on interfaces.
fn link_abstract_types(types: &mut IndexMap<String, MetaType>) -> Result<(), SchemaError> {
    for ty in types.values() {
        if let MetaType::Union(union) = ty {
            for member in &union.possible_types {
                match types.get(member) {
                    Some(MetaType::Object(_)) => {}
                    Some(_) => {
                        return Err(SchemaError::InvalidUnionMember {
                            union: union.name.clone(),
                            member: member.clone(),
                        })
                    }
                    None => {
                        return Err(SchemaError::UndefinedType {
                            name: member.clone(),
                            referenced_by: union.name.clone(),
                        })
                    }
                }
            }
        }
    }

    let mut implementations = Vec::new();
    for ty in types.values() {
        if let MetaType::Object(object) = ty {
            for interface in &object.implements {
                if !matches!(types.get(interface), Some(MetaType::Interface(_))) {
                    return Err(SchemaError::UnknownInterface {
                        object: object.name.clone(),
                        interface: interface.clone(),
                    });
                }
                implementations.push((interface.clone(), object.name.clone()));
            }
        }
    }

    for (interface, object) in implementations {
        if let Some(MetaType::Interface(interface)) = types.get_mut(&interface) {
            interface.possible_types.insert(object);
        }
    }

    Ok(())
}

/// Moves reachable types from `declared` into `ordered`, in pre-order.
struct Ordering {
    declared: IndexMap<String, MetaType>,
    ordered: IndexMap<String, MetaType>,
}

impl Ordering {
    fn visit(&mut self, type_ref: &str, position: Position, referenced_by: &str) -> Result<(), SchemaError> {
        if Type::new(type_ref).is_none() {
            return Err(SchemaError::InvalidTypeReference {
                ty: type_ref.to_string(),
                referenced_by: referenced_by.to_string(),
            });
        }
        let name = crate::named_type_from_type_str(type_ref);

        let newly_found = match self.ordered.get(name) {
            Some(ty) => {
                check_position(ty, position, referenced_by)?;
                None
            }
            None => {
                let ty = self
                    .declared
                    .shift_remove(name)
                    .ok_or_else(|| SchemaError::UndefinedType {
                        name: name.to_string(),
                        referenced_by: referenced_by.to_string(),
                    })?;
                check_position(&ty, position, referenced_by)?;
                self.ordered.insert(name.to_string(), ty.clone());
                Some(ty)
            }
        };

        match newly_found {
            Some(ty) => self.visit_children(&ty),
            None => Ok(()),
        }
    }

    fn visit_children(&mut self, ty: &MetaType) -> Result<(), SchemaError> {
        let type_name = ty.name();
        match ty {
            MetaType::Object(_) | MetaType::Interface(_) => {
                for field in ty.fields().into_iter().flat_map(|fields| fields.values()) {
                    let referenced_by = format!("{type_name}.{}", field.name);
                    for argument in field.args.values() {
                        self.visit(
                            argument.ty.as_str(),
                            Position::Input,
                            &format!("{referenced_by}({}:)", argument.name),
                        )?;
                    }
                    self.visit(field.ty.as_str(), Position::Output, &referenced_by)?;
                }
                if let MetaType::Object(object) = ty {
                    for interface in &object.implements {
                        self.visit(interface, Position::Output, type_name)?;
                    }
                }
                for possible_type in ty.possible_types().into_iter().flatten() {
                    self.visit(possible_type, Position::Output, type_name)?;
                }
            }
            MetaType::Union(union) => {
                for member in &union.possible_types {
                    self.visit(member, Position::Output, type_name)?;
                }
            }
            MetaType::InputObject(object) => {
                for field in object.input_fields.values() {
                    self.visit(
                        field.ty.as_str(),
                        Position::Input,
                        &format!("{type_name}.{}", field.name),
                    )?;
                }
            }
            MetaType::Scalar(_) | MetaType::Enum(_) => {}
        }
        Ok(())
    }
}

fn check_position(ty: &MetaType, position: Position, referenced_by: &str) -> Result<(), SchemaError> {
    match position {
        Position::Input if !ty.is_input() => Err(SchemaError::NotAnInputType {
            name: ty.name().to_string(),
            referenced_by: referenced_by.to_string(),
        }),
        Position::Output if !ty.is_output() => Err(SchemaError::NotAnOutputType {
            name: ty.name().to_string(),
            referenced_by: referenced_by.to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{EnumType, InputObjectType, InterfaceType, MetaEnumValue, MetaInputValue, UnionType};

    fn latest() -> ObjectType {
        ObjectType::new("latest")
            .with_field(MetaField::new("id", "Int"))
            .with_field(MetaField::new("name", "String"))
    }

    fn test_schema() -> RegistryBuilder {
        let mut builder = RegistryBuilder::new(ObjectType::new("TestSchema").with_description("Root of TestSchema"));
        builder
            .add_query(
                MetaField::new("latest", "latest")
                    .with_argument(MetaInputValue::new("id", "Int"))
                    .with_description("latest description")
                    .deprecated(Some("for test")),
            )
            .register_type(latest());
        builder
    }

    fn type_names(registry: &Registry) -> Vec<&str> {
        registry.types().map(MetaType::name).collect()
    }

    #[test]
    fn types_in_discovery_order() {
        let registry = test_schema().finish().unwrap();
        assert_eq!(type_names(&registry), vec!["TestSchema", "Int", "latest", "String", "Boolean"]);
        assert_eq!(registry.query_type().name(), "TestSchema");
        assert_eq!(registry.query_type().description(), Some("Root of TestSchema"));
    }

    #[test]
    fn roots_come_first() {
        let mut builder = test_schema();
        builder
            .add_mutation(MetaField::new("rename", "latest").with_argument(MetaInputValue::new("to", "ID!")))
            .add_subscription(MetaField::new("ticks", "Float"));
        let registry = builder.finish().unwrap();

        assert_eq!(
            type_names(&registry),
            vec!["TestSchema", "Mutation", "Subscription", "Int", "latest", "String", "ID", "Float", "Boolean"]
        );
        assert_eq!(registry.mutation_type().map(MetaType::name), Some("Mutation"));
        assert_eq!(registry.subscription_type().map(MetaType::name), Some("Subscription"));
    }

    #[test]
    fn abstract_types_list_their_implementations() {
        let mut builder = RegistryBuilder::new(ObjectType::new("Query"));
        builder
            .add_query(MetaField::new("node", "Node"))
            .add_query(MetaField::new("search", "[SearchResult!]!"))
            .register_type(InterfaceType::new("Node").with_field(MetaField::new("id", "ID!")))
            .register_type(
                ObjectType::new("User")
                    .implementing("Node")
                    .with_field(MetaField::new("id", "ID!")),
            )
            .register_type(ObjectType::new("Post").with_field(MetaField::new("title", "String")))
            .register_type(UnionType::new("SearchResult").with_member("User").with_member("Post"))
            .register_type(ObjectType::new("Unreachable").with_field(MetaField::new("x", "Int")));
        let registry = builder.finish().unwrap();

        assert_eq!(
            type_names(&registry),
            vec!["Query", "Node", "ID", "User", "SearchResult", "Post", "String", "Boolean"]
        );
        let node = registry.lookup_type("Node").unwrap();
        assert!(node.is_possible_type("User"));
        assert!(!node.is_possible_type("Post"));
    }

    #[test]
    fn introspection_types_are_always_listed() {
        let mut builder = test_schema();
        builder
            .add_introspection_type(ObjectType::new("__Meta").with_field(MetaField::new("name", "ID")))
            .add_introspection_type(latest());
        let registry = builder.finish().unwrap();
        assert_eq!(
            type_names(&registry),
            vec!["TestSchema", "Int", "latest", "String", "Boolean", "__Meta", "ID"]
        );
    }

    #[test]
    fn same_definition_twice_is_fine() {
        let mut builder = test_schema();
        builder.register_type(latest());
        assert!(builder.finish().is_ok());
    }

    #[test]
    fn schema_errors() {
        let mut builder = test_schema();
        builder.register_type(ObjectType::new("latest").with_field(MetaField::new("id", "ID")));
        assert_eq!(
            builder.finish().unwrap_err(),
            SchemaError::DuplicateType("latest".to_string())
        );

        let mut builder = test_schema();
        builder.add_query(MetaField::new("__secret", "Int"));
        assert_eq!(
            builder.finish().unwrap_err(),
            SchemaError::ReservedFieldName("__secret".to_string())
        );

        let mut builder = test_schema();
        builder.add_query(MetaField::new("missing", "[Missing]"));
        assert_eq!(
            builder.finish().unwrap_err().to_string(),
            "Type \"Missing\" used by \"TestSchema.missing\" is not defined"
        );

        let mut builder = test_schema();
        builder
            .add_query(MetaField::new("color", "Color").with_argument(MetaInputValue::new("filter", "latest")))
            .register_type(EnumType::new("Color").with_value(MetaEnumValue::new("RED")));
        assert_eq!(
            builder.finish().unwrap_err().to_string(),
            "\"TestSchema.color(filter:)\" expects an input type but \"latest\" is an output type"
        );

        let mut builder = test_schema();
        builder
            .add_query(MetaField::new("input", "Filter"))
            .register_type(InputObjectType::new("Filter").with_input_field(MetaInputValue::new("id", "Int")));
        assert!(matches!(
            builder.finish().unwrap_err(),
            SchemaError::NotAnOutputType { .. }
        ));

        let mut builder = test_schema();
        builder
            .add_query(MetaField::new("either", "Either"))
            .register_type(UnionType::new("Either").with_member("Int"));
        assert!(matches!(
            builder.finish().unwrap_err(),
            SchemaError::InvalidUnionMember { .. }
        ));

        let mut builder = test_schema();
        builder.register_type(ObjectType::new("Orphan").implementing("Nope"));
        assert!(matches!(
            builder.finish().unwrap_err(),
            SchemaError::UnknownInterface { .. }
        ));
    }
}
