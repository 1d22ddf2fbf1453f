//! Values flowing into the engine: argument literals, variables and defaults.
//!
//! [`Value`] is what the parser produces and may still reference variables. [`ConstValue`] is the
//! fully resolved form handed to resolvers.

mod variables;

pub use async_graphql_value::{ConstValue, Name, Value};
pub use serde_json::Number;
pub use variables::Variables;

/// Names of every variable referenced by `value`, in order of appearance.
pub fn variables_used(value: &Value) -> Vec<&Name> {
    fn collect<'a>(value: &'a Value, vars: &mut Vec<&'a Name>) {
        match value {
            Value::Variable(name) => vars.push(name),
            Value::List(values) => values.iter().for_each(|value| collect(value, vars)),
            Value::Object(obj) => obj.values().for_each(|value| collect(value, vars)),
            _ => {}
        }
    }

    let mut vars = Vec::new();
    collect(value, &mut vars);
    vars
}
