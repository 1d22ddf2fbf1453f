//! Input coercion for arguments and variables.

use std::fmt;

use engine_value::{ConstValue, Name};
use indexmap::IndexMap;

use crate::{field_types::MetaTypeName, MetaType, Registry};

/// Why a value does not fit an input type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputValueError {
    /// Location inside the value, empty when the value itself is wrong.
    pub path: Vec<String>,
    pub reason: String,
}

impl InputValueError {
    fn new(path: &[String], reason: String) -> Self {
        InputValueError {
            path: path.to_vec(),
            reason,
        }
    }
}

impl fmt::Display for InputValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.reason)
        } else {
            write!(f, "\"{}\", {}", self.path.join("."), self.reason)
        }
    }
}

/// Coerces `value` to the input type `type_name`, applying input object defaults and wrapping
/// single values into lists.
pub fn coerce_input_value(registry: &Registry, type_name: &str, value: ConstValue) -> Result<ConstValue, InputValueError> {
    coerce(registry, type_name, value, &mut Vec::new())
}

fn coerce(
    registry: &Registry,
    type_name: &str,
    value: ConstValue,
    path: &mut Vec<String>,
) -> Result<ConstValue, InputValueError> {
    match MetaTypeName::create(type_name) {
        MetaTypeName::NonNull(type_name) => match value {
            ConstValue::Null => Err(InputValueError::new(path, format!("expected type \"{type_name}!\""))),
            value => coerce(registry, type_name, value, path),
        },
        MetaTypeName::List(item_type) => match value {
            ConstValue::Null => Ok(ConstValue::Null),
            ConstValue::List(items) => {
                let mut coerced = Vec::with_capacity(items.len());
                for (idx, item) in items.into_iter().enumerate() {
                    path.push(idx.to_string());
                    coerced.push(coerce(registry, item_type, item, path)?);
                    path.pop();
                }
                Ok(ConstValue::List(coerced))
            }
            value => Ok(ConstValue::List(vec![coerce(registry, item_type, value, path)?])),
        },
        MetaTypeName::Named(type_name) => {
            if matches!(value, ConstValue::Null) {
                return Ok(ConstValue::Null);
            }

            let Some(ty) = registry.lookup_type(type_name) else {
                return Err(InputValueError::new(path, format!("unknown type \"{type_name}\"")));
            };

            match ty {
                MetaType::Scalar(scalar) => scalar
                    .parser
                    .coerce_input(value)
                    .map_err(|reason| InputValueError::new(path, reason)),
                MetaType::Enum(enum_type) => {
                    let name = match &value {
                        ConstValue::Enum(name) => name.as_str(),
                        ConstValue::String(name) => name.as_str(),
                        _ => {
                            return Err(InputValueError::new(path, format!("expected type \"{type_name}\"")));
                        }
                    };
                    if enum_type.enum_values.contains_key(name) {
                        Ok(ConstValue::Enum(Name::new(name)))
                    } else {
                        Err(InputValueError::new(
                            path,
                            format!(
                                "enumeration type \"{}\" does not contain the value \"{name}\"",
                                enum_type.name
                            ),
                        ))
                    }
                }
                MetaType::InputObject(object) => {
                    let ConstValue::Object(mut fields) = value else {
                        return Err(InputValueError::new(path, format!("expected type \"{type_name}\"")));
                    };

                    if let Some(unknown) = fields.keys().find(|name| !object.input_fields.contains_key(name.as_str())) {
                        return Err(InputValueError::new(
                            path,
                            format!("unknown field \"{unknown}\" of type \"{}\"", object.name),
                        ));
                    }

                    let mut coerced = IndexMap::with_capacity(object.input_fields.len());
                    for field in object.input_fields.values() {
                        match fields.shift_remove(field.name.as_str()) {
                            Some(value) => {
                                path.push(field.name.clone());
                                let value = coerce(registry, field.ty.as_str(), value, path)?;
                                path.pop();
                                coerced.insert(Name::new(&field.name), value);
                            }
                            None => match &field.default_value {
                                Some(default) => {
                                    coerced.insert(Name::new(&field.name), default.clone());
                                }
                                None if field.ty.is_non_null() => {
                                    return Err(InputValueError::new(
                                        path,
                                        format!(
                                            "field \"{}\" of type \"{}\" is required but not provided",
                                            field.name, object.name
                                        ),
                                    ));
                                }
                                None => {}
                            },
                        }
                    }
                    Ok(ConstValue::Object(coerced))
                }
                _ => Err(InputValueError::new(
                    path,
                    format!("\"{type_name}\" is not an input type"),
                )),
            }
        }
    }
}
