//! The resolver capability.
//!
//! A resolver is called once per field occurrence with the parent value, the coerced arguments
//! and the request data. It returns a [`ResolvedValue`] which the executor then completes against
//! the field's declared type.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
    sync::Arc,
};

use engine_value::{ConstValue, Name};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;

use crate::{Error, MetaField, MetaType, Registry};

#[async_trait::async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, ctx: &ResolverContext<'_>) -> Result<ResolvedValue, Error>;
}

/// Everything a resolver can look at.
pub struct ResolverContext<'a> {
    pub registry: &'a Registry,
    /// The type the field is resolved on.
    pub parent_type: &'a MetaType,
    pub field: &'a MetaField,
    pub parent: &'a ResolvedValue,
    /// Coerced arguments, defaults included.
    pub arguments: &'a IndexMap<Name, ConstValue>,
    pub data: &'a Data,
}

impl ResolverContext<'_> {
    pub fn argument(&self, name: &str) -> Option<&ConstValue> {
        self.arguments.get(name)
    }

    /// Deserialize an argument, `None` if it was not provided or is null.
    pub fn argument_as<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, Error> {
        match self.arguments.get(name) {
            None | Some(ConstValue::Null) => Ok(None),
            Some(value) => value
                .clone()
                .into_json()
                .and_then(serde_json::from_value)
                .map(Some)
                .map_err(|err| Error::new(format!("Invalid argument \"{name}\": {err}"))),
        }
    }

    /// Request data of the given type.
    pub fn data<D: Any + Send + Sync>(&self) -> Result<&D, Error> {
        self.data
            .get::<D>()
            .ok_or_else(|| Error::new(format!("Data `{}` does not exist.", std::any::type_name::<D>())))
    }
}

/// The value produced by a resolver.
///
/// Cheap to clone.
#[derive(Clone)]
pub enum ResolvedValue {
    Json(Arc<serde_json::Value>),
    List(Vec<ResolvedValue>),
    /// A value only a child resolver knows how to read, see [`ResolvedValue::downcast_ref`].
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl ResolvedValue {
    pub fn new(value: serde_json::Value) -> Self {
        ResolvedValue::Json(Arc::new(value))
    }

    pub fn null() -> Self {
        Self::new(serde_json::Value::Null)
    }

    pub fn list(items: impl IntoIterator<Item = ResolvedValue>) -> Self {
        ResolvedValue::List(items.into_iter().collect())
    }

    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        ResolvedValue::Opaque(Arc::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ResolvedValue::Json(value) if value.is_null())
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ResolvedValue::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            ResolvedValue::Opaque(value) => value.downcast_ref(),
            _ => None,
        }
    }

    /// The property `name` of an object, null when absent.
    pub fn get_field(&self, name: &str) -> ResolvedValue {
        match self {
            ResolvedValue::Json(value) => value
                .get(name)
                .map_or_else(ResolvedValue::null, |value| ResolvedValue::new(value.clone())),
            _ => ResolvedValue::null(),
        }
    }

    /// The items of a list, `None` if this value is not a list.
    pub fn items(&self) -> Option<Vec<ResolvedValue>> {
        match self {
            ResolvedValue::List(items) => Some(items.clone()),
            ResolvedValue::Json(value) => value
                .as_array()
                .map(|items| items.iter().cloned().map(ResolvedValue::new).collect()),
            ResolvedValue::Opaque(_) => None,
        }
    }
}

impl Default for ResolvedValue {
    fn default() -> Self {
        Self::null()
    }
}

impl From<serde_json::Value> for ResolvedValue {
    fn from(value: serde_json::Value) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for ResolvedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedValue::Json(value) => f.debug_tuple("Json").field(value).finish(),
            ResolvedValue::List(items) => f.debug_tuple("List").field(items).finish(),
            ResolvedValue::Opaque(_) => f.write_str("Opaque"),
        }
    }
}

/// Wraps a synchronous closure, see [`MetaField::with_resolver_fn`].
pub struct FnResolver<F>(pub F);

#[async_trait::async_trait]
impl<F> Resolver for FnResolver<F>
where
    F: Fn(&ResolverContext<'_>) -> Result<ResolvedValue, Error> + Send + Sync,
{
    async fn resolve(&self, ctx: &ResolverContext<'_>) -> Result<ResolvedValue, Error> {
        (self.0)(ctx)
    }
}

/// Always resolves to the same JSON value.
pub struct ValueResolver(pub serde_json::Value);

#[async_trait::async_trait]
impl Resolver for ValueResolver {
    async fn resolve(&self, _ctx: &ResolverContext<'_>) -> Result<ResolvedValue, Error> {
        Ok(ResolvedValue::new(self.0.clone()))
    }
}

/// Request scoped data, keyed by type.
#[derive(Default)]
pub struct Data(HashMap<TypeId, Box<dyn Any + Send + Sync>>);

impl Data {
    pub fn insert<D: Any + Send + Sync>(&mut self, data: D) {
        self.0.insert(TypeId::of::<D>(), Box::new(data));
    }

    pub fn get<D: Any + Send + Sync>(&self) -> Option<&D> {
        self.0.get(&TypeId::of::<D>()).and_then(|data| data.downcast_ref())
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Data").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MetaInputValue, ObjectType, RegistryBuilder};

    struct Greeting(&'static str);

    #[test]
    fn closures_read_arguments_and_data() {
        let field = MetaField::new("greet", "String!")
            .with_argument(MetaInputValue::new("name", "String"))
            .with_resolver_fn(|ctx| {
                let greeting = ctx.data::<Greeting>()?;
                let name = ctx.argument_as::<String>("name")?.unwrap_or_else(|| "world".to_string());
                Ok(serde_json::json!(format!("{}, {name}!", greeting.0)).into())
            });
        let mut builder = RegistryBuilder::new(ObjectType::new("Query"));
        builder.add_query(field);
        let registry = builder.finish().unwrap();

        let mut data = Data::default();
        data.insert(Greeting("Hello"));
        let arguments = IndexMap::from([(Name::new("name"), ConstValue::String("Alex".into()))]);
        let parent = ResolvedValue::null();
        let field = registry.query_type().field("greet").unwrap();
        let ctx = ResolverContext {
            registry: &registry,
            parent_type: registry.query_type(),
            field,
            parent: &parent,
            arguments: &arguments,
            data: &data,
        };

        let resolver = field.resolver.as_ref().unwrap();
        let value = futures::executor::block_on(resolver.resolve(&ctx)).unwrap();
        assert_eq!(value.as_json(), Some(&serde_json::json!("Hello, Alex!")));

        let empty = Data::default();
        let ctx = ResolverContext { data: &empty, ..ctx };
        let err = futures::executor::block_on(resolver.resolve(&ctx)).unwrap_err();
        assert!(err.message.starts_with("Data `"), "{}", err.message);
    }

    #[test]
    fn property_lookup_on_values() {
        let value = ResolvedValue::new(serde_json::json!({ "id": 1, "tags": ["a", "b"] }));
        assert_eq!(value.get_field("id").as_json(), Some(&serde_json::json!(1)));
        assert!(value.get_field("missing").is_null());
        assert_eq!(value.get_field("tags").items().map(|items| items.len()), Some(2));
        assert!(ResolvedValue::opaque(3_u8).get_field("id").is_null());
        assert_eq!(ResolvedValue::opaque(3_u8).downcast_ref::<u8>(), Some(&3));
    }
}
