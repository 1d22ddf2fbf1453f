use std::{fmt, sync::Arc};

use engine_value::ConstValue;
use indexmap::IndexMap;

use crate::{
    field_types::MetaFieldType,
    resolvers::{FnResolver, ResolvedValue, Resolver, ResolverContext},
    Error,
};

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, Hash, PartialEq, Eq, Default)]
pub enum Deprecation {
    #[default]
    NoDeprecated,
    Deprecated {
        reason: Option<String>,
    },
}

impl Deprecation {
    pub fn is_deprecated(&self) -> bool {
        matches!(self, Deprecation::Deprecated { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Deprecation::NoDeprecated => None,
            Deprecation::Deprecated { reason } => reason.as_deref(),
        }
    }
}

/// A field of an object or interface type.
///
/// A field without a resolver reads the property with the same name from its parent value.
#[derive(Clone, Default)]
pub struct MetaField {
    pub name: String,
    pub description: Option<String>,
    pub args: IndexMap<String, MetaInputValue>,
    pub ty: MetaFieldType,
    pub deprecation: Deprecation,
    pub resolver: Option<Arc<dyn Resolver>>,
}

impl MetaField {
    pub fn new(name: impl Into<String>, ty: impl Into<MetaFieldType>) -> MetaField {
        MetaField {
            name: name.into(),
            ty: ty.into(),
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
    pub fn deprecated(self, reason: Option<&str>) -> Self {
        Self {
            deprecation: Deprecation::Deprecated {
                reason: reason.map(str::to_string),
            },
            ..self
        }
    }

    #[must_use]
    pub fn with_argument(mut self, argument: MetaInputValue) -> Self {
        self.args.insert(argument.name.clone(), argument);
        self
    }

    #[must_use]
    pub fn with_resolver(self, resolver: impl Resolver + 'static) -> Self {
        Self {
            resolver: Some(Arc::new(resolver)),
            ..self
        }
    }

    /// Resolve this field with a synchronous closure.
    #[must_use]
    pub fn with_resolver_fn<F>(self, f: F) -> Self
    where
        F: Fn(&ResolverContext<'_>) -> Result<ResolvedValue, Error> + Send + Sync + 'static,
    {
        self.with_resolver(FnResolver(f))
    }

    pub fn is_typename(&self) -> bool {
        self.name == "__typename"
    }
}

impl fmt::Debug for MetaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetaField")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("args", &self.args)
            .field("ty", &self.ty)
            .field("deprecation", &self.deprecation)
            .field("resolver", &self.resolver.as_ref().map(|_| "<resolver>"))
            .finish()
    }
}

/// Equality ignores the resolver.
impl PartialEq for MetaField {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.description == other.description
            && self.args == other.args
            && self.ty == other.ty
            && self.deprecation == other.deprecation
    }
}

impl Eq for MetaField {}

/// An argument of a field or directive, or a field of an input object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetaInputValue {
    pub name: String,
    pub description: Option<String>,
    pub ty: MetaFieldType,
    pub default_value: Option<ConstValue>,
}

impl MetaInputValue {
    pub fn new(name: impl Into<String>, ty: impl Into<MetaFieldType>) -> MetaInputValue {
        MetaInputValue {
            name: name.into(),
            ty: ty.into(),
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
    pub fn with_default(self, default_value: impl Into<ConstValue>) -> Self {
        Self {
            default_value: Some(default_value.into()),
            ..self
        }
    }

    /// Whether a value must be supplied: the type is non-null and there is no default.
    pub fn is_required(&self) -> bool {
        self.ty.is_non_null() && self.default_value.is_none()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetaEnumValue {
    pub name: String,
    pub description: Option<String>,
    pub deprecation: Deprecation,
}

impl MetaEnumValue {
    pub fn new(name: impl Into<String>) -> MetaEnumValue {
        MetaEnumValue {
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
    pub fn deprecated(self, reason: Option<&str>) -> Self {
        Self {
            deprecation: Deprecation::Deprecated {
                reason: reason.map(str::to_string),
            },
            ..self
        }
    }
}
