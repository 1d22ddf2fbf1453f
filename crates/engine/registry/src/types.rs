use indexmap::{IndexMap, IndexSet};

use crate::{MetaEnumValue, MetaField, MetaInputValue, ScalarParser};

/// The kinds of type reported by introspection.
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
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScalarType {
    pub name: String,
    pub description: Option<String>,
    pub parser: ScalarParser,
}

impl ScalarType {
    /// A custom scalar, values pass through unchanged.
    pub fn new(name: impl Into<String>) -> Self {
        ScalarType {
            name: name.into(),
            description: None,
            parser: ScalarParser::PassThrough,
        }
    }

    #[must_use]
    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_parser(self, parser: ScalarParser) -> Self {
        Self { parser, ..self }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectType {
    pub name: String,
    pub description: Option<String>,
    pub fields: IndexMap<String, MetaField>,
    /// Names of the interfaces this object implements.
    pub implements: IndexSet<String>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        ObjectType {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: MetaField) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    #[must_use]
    pub fn implementing(mut self, interface: impl Into<String>) -> Self {
        self.implements.insert(interface.into());
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InterfaceType {
    pub name: String,
    pub description: Option<String>,
    pub fields: IndexMap<String, MetaField>,
    /// Objects implementing this interface, filled in when the registry is built.
    pub possible_types: IndexSet<String>,
}

impl InterfaceType {
    pub fn new(name: impl Into<String>) -> Self {
        InterfaceType {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: MetaField) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnionType {
    pub name: String,
    pub description: Option<String>,
    pub possible_types: IndexSet<String>,
}

impl UnionType {
    pub fn new(name: impl Into<String>) -> Self {
        UnionType {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_member(mut self, member: impl Into<String>) -> Self {
        self.possible_types.insert(member.into());
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    pub description: Option<String>,
    pub enum_values: IndexMap<String, MetaEnumValue>,
}

impl EnumType {
    pub fn new(name: impl Into<String>) -> Self {
        EnumType {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: MetaEnumValue) -> Self {
        self.enum_values.insert(value.name.clone(), value);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputObjectType {
    pub name: String,
    pub description: Option<String>,
    pub input_fields: IndexMap<String, MetaInputValue>,
}

impl InputObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        InputObjectType {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_input_field(mut self, field: MetaInputValue) -> Self {
        self.input_fields.insert(field.name.clone(), field);
        self
    }
}

/// A named type of the schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MetaType {
    Scalar(ScalarType),
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Enum(EnumType),
    InputObject(InputObjectType),
}

impl MetaType {
    pub fn name(&self) -> &str {
        match self {
            MetaType::Scalar(ty) => &ty.name,
            MetaType::Object(ty) => &ty.name,
            MetaType::Interface(ty) => &ty.name,
            MetaType::Union(ty) => &ty.name,
            MetaType::Enum(ty) => &ty.name,
            MetaType::InputObject(ty) => &ty.name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            MetaType::Scalar(ty) => ty.description.as_deref(),
            MetaType::Object(ty) => ty.description.as_deref(),
            MetaType::Interface(ty) => ty.description.as_deref(),
            MetaType::Union(ty) => ty.description.as_deref(),
            MetaType::Enum(ty) => ty.description.as_deref(),
            MetaType::InputObject(ty) => ty.description.as_deref(),
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            MetaType::Scalar(_) => TypeKind::Scalar,
            MetaType::Object(_) => TypeKind::Object,
            MetaType::Interface(_) => TypeKind::Interface,
            MetaType::Union(_) => TypeKind::Union,
            MetaType::Enum(_) => TypeKind::Enum,
            MetaType::InputObject(_) => TypeKind::InputObject,
        }
    }

    /// Fields of objects and interfaces.
    pub fn fields(&self) -> Option<&IndexMap<String, MetaField>> {
        match self {
            MetaType::Object(ty) => Some(&ty.fields),
            MetaType::Interface(ty) => Some(&ty.fields),
            _ => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&MetaField> {
        self.fields()?.get(name)
    }

    /// Objects an abstract type may resolve to.
    pub fn possible_types(&self) -> Option<&IndexSet<String>> {
        match self {
            MetaType::Interface(ty) => Some(&ty.possible_types),
            MetaType::Union(ty) => Some(&ty.possible_types),
            _ => None,
        }
    }

    pub fn is_possible_type(&self, type_name: &str) -> bool {
        match self {
            MetaType::Object(ty) => ty.name == type_name,
            _ => self
                .possible_types()
                .is_some_and(|possible_types| possible_types.contains(type_name)),
        }
    }

    pub fn enum_values(&self) -> Option<&IndexMap<String, MetaEnumValue>> {
        match self {
            MetaType::Enum(ty) => Some(&ty.enum_values),
            _ => None,
        }
    }

    pub fn input_fields(&self) -> Option<&IndexMap<String, MetaInputValue>> {
        match self {
            MetaType::InputObject(ty) => Some(&ty.input_fields),
            _ => None,
        }
    }

    /// Objects, interfaces and unions: types that take a selection set.
    pub fn is_composite(&self) -> bool {
        matches!(self, MetaType::Object(_) | MetaType::Interface(_) | MetaType::Union(_))
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self, MetaType::Interface(_) | MetaType::Union(_))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, MetaType::Scalar(_) | MetaType::Enum(_))
    }

    pub fn is_input(&self) -> bool {
        matches!(self, MetaType::Scalar(_) | MetaType::Enum(_) | MetaType::InputObject(_))
    }

    pub fn is_output(&self) -> bool {
        !matches!(self, MetaType::InputObject(_))
    }
}

impl From<ScalarType> for MetaType {
    fn from(ty: ScalarType) -> Self {
        MetaType::Scalar(ty)
    }
}

impl From<ObjectType> for MetaType {
    fn from(ty: ObjectType) -> Self {
        MetaType::Object(ty)
    }
}

impl From<InterfaceType> for MetaType {
    fn from(ty: InterfaceType) -> Self {
        MetaType::Interface(ty)
    }
}

impl From<UnionType> for MetaType {
    fn from(ty: UnionType) -> Self {
        MetaType::Union(ty)
    }
}

impl From<EnumType> for MetaType {
    fn from(ty: EnumType) -> Self {
        MetaType::Enum(ty)
    }
}

impl From<InputObjectType> for MetaType {
    fn from(ty: InputObjectType) -> Self {
        MetaType::InputObject(ty)
    }
}
