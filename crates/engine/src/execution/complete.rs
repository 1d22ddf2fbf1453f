//! Field resolution and value completion.
//!
//! Every step returns a [`Completion`]. `Err` means the value is null where null is not allowed,
//! so the enclosing container decides whether it absorbs the null or passes it further up.

use engine_parser::{
    types::{Field, SelectionSet},
    Positioned,
};
use engine_registry::{
    coerce_input_value, MetaField, MetaType, MetaTypeName, Registry, ResolvedValue, ResolverContext,
};
use engine_value::{ConstValue, Name};
use futures::{future::BoxFuture, FutureExt};
use indexmap::IndexMap;

use super::{collect::collect_fields, ExecutionContext};
use crate::{ErrorCode, PathSegment, ServerError};

pub(super) type Completion = Result<Completed, Vec<ServerError>>;

/// A completed value with the errors of its nullable descendants.
#[derive(Debug)]
pub(super) struct Completed {
    pub value: serde_json::Value,
    pub errors: Vec<ServerError>,
}

impl Completed {
    fn new(value: serde_json::Value) -> Self {
        Completed {
            value,
            errors: Vec::new(),
        }
    }

    pub(super) fn null(errors: Vec<ServerError>) -> Self {
        Completed {
            value: serde_json::Value::Null,
            errors,
        }
    }
}

pub(super) fn execute_selection_set<'a>(
    ctx: &'a ExecutionContext<'a>,
    object_type: &'a MetaType,
    parent: &'a ResolvedValue,
    selection_sets: &[&'a SelectionSet],
    path: &'a [PathSegment],
    serial: bool,
) -> BoxFuture<'a, Completion> {
    tracing::trace!("Executing selection set of {}", object_type.name());
    let fields = collect_fields(ctx, object_type, selection_sets);

    async move {
        let futures = fields.iter().map(|(key, fields)| {
            let mut path = path.to_vec();
            path.push(PathSegment::Field((*key).to_string()));
            resolve_field(ctx, object_type, parent, fields, path)
        });

        let results = if serial {
            let mut results = Vec::with_capacity(fields.len());
            for future in futures {
                results.push(future.await);
            }
            results
        } else {
            futures::future::join_all(futures).await
        };

        let mut object = serde_json::Map::with_capacity(fields.len());
        let mut errors = Vec::new();
        let mut failed = false;
        for (key, result) in fields.keys().zip(results) {
            match result {
                Ok(completed) => {
                    object.insert((*key).to_string(), completed.value);
                    errors.extend(completed.errors);
                }
                Err(field_errors) => {
                    failed = true;
                    errors.extend(field_errors);
                }
            }
        }

        if failed {
            Err(errors)
        } else {
            Ok(Completed {
                value: serde_json::Value::Object(object),
                errors,
            })
        }
    }
    .boxed()
}

async fn resolve_field(
    ctx: &ExecutionContext<'_>,
    object_type: &MetaType,
    parent: &ResolvedValue,
    fields: &[&Positioned<Field>],
    path: Vec<PathSegment>,
) -> Completion {
    let Some(field) = fields.first() else {
        return Ok(Completed::null(Vec::new()));
    };
    let name = field.node.name.node.as_str();
    if name == "__typename" {
        return Ok(Completed::new(object_type.name().into()));
    }

    let Some(definition) = ctx.registry.lookup_field(object_type, name) else {
        let message = format!("Field \"{name}\" not found in type \"{}\"", object_type.name());
        return Ok(Completed::null(vec![field_error(message, ErrorCode::BadRequest, fields, &path)]));
    };

    let result = match coerce_arguments(ctx, definition, &field.node) {
        Ok(arguments) => {
            let resolver_ctx = ResolverContext {
                registry: ctx.registry,
                parent_type: object_type,
                field: definition,
                parent,
                arguments: &arguments,
                data: ctx.data,
            };
            match call_resolver(ctx, &resolver_ctx).await {
                Ok(value) => complete_value(ctx, definition.ty.as_str(), fields, value, &path).await,
                Err((message, code)) => Err(vec![field_error(message, code, fields, &path)]),
            }
        }
        Err(message) => Err(vec![field_error(message, ErrorCode::BadRequest, fields, &path)]),
    };

    match result {
        Err(errors) if definition.ty.is_nullable() => Ok(Completed::null(errors)),
        result => result,
    }
}

/// Literal values, then variables, then defaults. An argument bound to a missing variable is
/// treated as absent.
fn coerce_arguments(
    ctx: &ExecutionContext<'_>,
    definition: &MetaField,
    field: &Field,
) -> Result<IndexMap<Name, ConstValue>, String> {
    let mut arguments = IndexMap::with_capacity(definition.args.len());
    for (name, argument) in &definition.args {
        let value = field
            .get_argument(name)
            .and_then(|value| value.node.clone().into_const_with(|name| ctx.variable(&name).ok_or(())).ok())
            .or_else(|| argument.default_value.clone());
        let value = match value {
            Some(value) => value,
            None if argument.is_required() => ConstValue::Null,
            None => continue,
        };
        let value = coerce_input_value(ctx.registry, argument.ty.as_str(), value)
            .map_err(|err| format!("Invalid value for argument \"{name}\": {err}"))?;
        arguments.insert(Name::new(name), value);
    }
    Ok(arguments)
}

async fn call_resolver(
    ctx: &ExecutionContext<'_>,
    resolver_ctx: &ResolverContext<'_>,
) -> Result<ResolvedValue, (String, ErrorCode)> {
    let field = resolver_ctx.field;
    let Some(resolver) = &field.resolver else {
        return Ok(resolver_ctx.parent.get_field(&field.name));
    };

    let result = match ctx.deadline {
        Some(deadline) => match tokio::time::timeout_at(deadline, resolver.resolve(resolver_ctx)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("Resolver of {}.{} timed out", resolver_ctx.parent_type.name(), field.name);
                return Err((
                    format!("Timed out while resolving \"{}\"", field.name),
                    ErrorCode::Timeout,
                ));
            }
        },
        None => resolver.resolve(resolver_ctx).await,
    };

    result.map_err(|err| (err.message, ErrorCode::ResolverError))
}

/// Completes `value` against the type reference `ty`.
fn complete_value<'a>(
    ctx: &'a ExecutionContext<'a>,
    ty: &'a str,
    fields: &'a [&'a Positioned<Field>],
    value: ResolvedValue,
    path: &'a [PathSegment],
) -> BoxFuture<'a, Completion> {
    async move {
        match MetaTypeName::create(ty) {
            MetaTypeName::NonNull(inner) => {
                let completed = complete_inner(ctx, inner, fields, value, path).await?;
                if !completed.value.is_null() {
                    return Ok(completed);
                }
                let mut errors = completed.errors;
                if errors.is_empty() {
                    let message = format!("Cannot return null for non-nullable field \"{}\"", field_name(fields));
                    errors.push(field_error(message, ErrorCode::InvalidResponseValue, fields, path));
                }
                Err(errors)
            }
            _ => Ok(complete_inner(ctx, ty, fields, value, path)
                .await
                .unwrap_or_else(Completed::null)),
        }
    }
    .boxed()
}

async fn complete_inner(
    ctx: &ExecutionContext<'_>,
    ty: &str,
    fields: &[&Positioned<Field>],
    value: ResolvedValue,
    path: &[PathSegment],
) -> Completion {
    if value.is_null() {
        return Ok(Completed::null(Vec::new()));
    }

    let invalid = |message: String| vec![field_error(message, ErrorCode::InvalidResponseValue, fields, path)];

    let name = match MetaTypeName::create(ty) {
        MetaTypeName::NonNull(_) => return complete_value(ctx, ty, fields, value, path).await,
        MetaTypeName::List(item_type) => return complete_list(ctx, item_type, fields, value, path).await,
        MetaTypeName::Named(name) => name,
    };
    let Some(meta_type) = ctx.registry.lookup_type(name) else {
        return Err(invalid(format!("Unknown type \"{name}\"")));
    };

    match meta_type {
        MetaType::Scalar(scalar) => {
            let Some(json) = value.as_json() else {
                return Err(invalid(format!("{name} cannot represent a non JSON value")));
            };
            scalar
                .parser
                .coerce_output(json.clone())
                .map(Completed::new)
                .map_err(invalid)
        }
        MetaType::Enum(enum_type) => match value.as_json() {
            Some(serde_json::Value::String(symbol)) if enum_type.enum_values.contains_key(symbol) => {
                Ok(Completed::new(symbol.clone().into()))
            }
            json => Err(invalid(format!(
                "Enum \"{name}\" cannot represent value: {}",
                json.map_or_else(|| "<opaque>".to_string(), ToString::to_string)
            ))),
        },
        MetaType::Object(_) => {
            if !is_object_like(&value) {
                return Err(invalid(format!(
                    "Expected an object for field \"{}\" of type \"{name}\"",
                    field_name(fields)
                )));
            }
            let selection_sets = sub_selections(fields);
            execute_selection_set(ctx, meta_type, &value, &selection_sets, path, false).await
        }
        MetaType::Interface(_) | MetaType::Union(_) => {
            let Some(object_type) = resolve_abstract_type(ctx.registry, meta_type, &value) else {
                return Err(invalid(format!(
                    "Abstract type \"{name}\" could not be resolved to an object type for field \"{}\"",
                    field_name(fields)
                )));
            };
            let selection_sets = sub_selections(fields);
            execute_selection_set(ctx, object_type, &value, &selection_sets, path, false).await
        }
        MetaType::InputObject(_) => Err(invalid(format!("Input object \"{name}\" cannot be used as output"))),
    }
}

/// Items complete concurrently. A failed item fails the whole list.
async fn complete_list(
    ctx: &ExecutionContext<'_>,
    item_type: &str,
    fields: &[&Positioned<Field>],
    value: ResolvedValue,
    path: &[PathSegment],
) -> Completion {
    let Some(items) = value.items() else {
        let message = format!("Expected a list for field \"{}\"", field_name(fields));
        return Err(vec![field_error(message, ErrorCode::InvalidResponseValue, fields, path)]);
    };

    let paths = (0..items.len())
        .map(|index| {
            let mut path = path.to_vec();
            path.push(PathSegment::Index(index));
            path
        })
        .collect::<Vec<_>>();
    let results = futures::future::join_all(
        items
            .into_iter()
            .zip(&paths)
            .map(|(item, path)| complete_value(ctx, item_type, fields, item, path)),
    )
    .await;

    let mut values = Vec::with_capacity(results.len());
    let mut errors = Vec::new();
    let mut failed = false;
    for result in results {
        match result {
            Ok(completed) => {
                values.push(completed.value);
                errors.extend(completed.errors);
            }
            Err(item_errors) => {
                failed = true;
                errors.extend(item_errors);
            }
        }
    }

    if failed {
        Err(errors)
    } else {
        Ok(Completed {
            value: serde_json::Value::Array(values),
            errors,
        })
    }
}

/// Picks the object type of a value of an interface or union: `__typename` first, then the only
/// possible type, then the first possible type declaring every key of the value.
fn resolve_abstract_type<'a>(registry: &'a Registry, ty: &'a MetaType, value: &ResolvedValue) -> Option<&'a MetaType> {
    let object = value.as_json().and_then(serde_json::Value::as_object);
    if let Some(typename) = object
        .and_then(|object| object.get("__typename"))
        .and_then(serde_json::Value::as_str)
    {
        return registry.possible_types(ty).find(|possible| possible.name() == typename);
    }

    let possible_types = registry.possible_types(ty).collect::<Vec<_>>();
    if let [single] = possible_types.as_slice() {
        return Some(*single);
    }

    let object = object?;
    possible_types.into_iter().find(|possible| {
        possible
            .fields()
            .is_some_and(|fields| object.keys().all(|key| fields.contains_key(key)))
    })
}

fn is_object_like(value: &ResolvedValue) -> bool {
    match value {
        ResolvedValue::Json(json) => json.is_object(),
        ResolvedValue::List(_) => false,
        ResolvedValue::Opaque(_) => true,
    }
}

fn sub_selections<'a>(fields: &[&'a Positioned<Field>]) -> Vec<&'a SelectionSet> {
    fields.iter().map(|field| &field.node.selection_set.node).collect()
}

fn field_name<'a>(fields: &[&'a Positioned<Field>]) -> &'a str {
    fields.first().map_or("", |field| field.node.name.node.as_str())
}

fn field_error(message: String, code: ErrorCode, fields: &[&Positioned<Field>], path: &[PathSegment]) -> ServerError {
    ServerError::new(message, code)
        .with_locations(fields.first().map(|field| field.pos))
        .with_path(path.to_vec())
}
