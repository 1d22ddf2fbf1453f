//! Built-in scalars: `Int`, `Float`, `String`, `Boolean` and `ID`.

use engine_value::{ConstValue, Number};
use serde_json::Value;

use crate::ScalarType;

pub const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

/// How values of a scalar are checked on the way in and out.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarParser {
    Int,
    Float,
    String,
    Boolean,
    Id,
    /// Do not check the value, used for custom scalars.
    #[default]
    PassThrough,
}

impl ScalarParser {
    /// Turns a resolved value into the response representation of this scalar.
    pub fn coerce_output(self, value: Value) -> Result<Value, String> {
        match (self, value) {
            (ScalarParser::PassThrough, value) => Ok(value),
            (ScalarParser::Int, Value::Number(number)) => int_from_number(&number)
                .map(Value::from)
                .ok_or_else(|| format!("Int cannot represent value: {number}")),
            (ScalarParser::Int, Value::Bool(b)) => Ok(Value::from(i32::from(b))),
            (ScalarParser::Float, Value::Number(number)) => number
                .as_f64()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| format!("Float cannot represent value: {number}")),
            (ScalarParser::String, Value::String(s)) => Ok(Value::String(s)),
            (ScalarParser::String, Value::Number(number)) => Ok(Value::String(number.to_string())),
            (ScalarParser::String, Value::Bool(b)) => Ok(Value::String(b.to_string())),
            (ScalarParser::Boolean, Value::Bool(b)) => Ok(Value::Bool(b)),
            (ScalarParser::Id, Value::String(s)) => Ok(Value::String(s)),
            (ScalarParser::Id, Value::Number(number)) if number.is_i64() || number.is_u64() => {
                Ok(Value::String(number.to_string()))
            }
            (parser, value) => Err(format!("{} cannot represent value: {value}", parser.type_name())),
        }
    }

    /// Checks an input value for this scalar, converting it where the scalar allows it.
    pub fn coerce_input(self, value: ConstValue) -> Result<ConstValue, String> {
        match (self, value) {
            (ScalarParser::PassThrough, value) => Ok(value),
            (ScalarParser::Int, ConstValue::Number(number)) if int_from_number(&number).is_some() => {
                Ok(ConstValue::Number(number))
            }
            (ScalarParser::Float, ConstValue::Number(number)) => Ok(ConstValue::Number(number)),
            (ScalarParser::String, ConstValue::String(s)) => Ok(ConstValue::String(s)),
            (ScalarParser::Boolean, ConstValue::Boolean(b)) => Ok(ConstValue::Boolean(b)),
            (ScalarParser::Id, ConstValue::String(s)) => Ok(ConstValue::String(s)),
            (ScalarParser::Id, ConstValue::Number(number)) if number.is_i64() || number.is_u64() => {
                Ok(ConstValue::String(number.to_string()))
            }
            (parser, _) => Err(format!("expected type \"{}\"", parser.type_name())),
        }
    }

    fn type_name(self) -> &'static str {
        match self {
            ScalarParser::Int => "Int",
            ScalarParser::Float => "Float",
            ScalarParser::String => "String",
            ScalarParser::Boolean => "Boolean",
            ScalarParser::Id => "ID",
            ScalarParser::PassThrough => "custom scalar",
        }
    }
}

/// 32-bit integers only, floats are accepted when they have no fractional part.
fn int_from_number(number: &Number) -> Option<i32> {
    if let Some(int) = number.as_i64() {
        return i32::try_from(int).ok();
    }
    let float = number.as_f64()?;
    if float.fract() == 0.0 && float >= f64::from(i32::MIN) && float <= f64::from(i32::MAX) {
        #[allow(clippy::cast_possible_truncation)]
        return Some(float as i32);
    }
    None
}

pub(crate) fn builtin_scalar(name: &str) -> Option<ScalarType> {
    let (parser, description) = match name {
        "Int" => (
            ScalarParser::Int,
            "The `Int` scalar type represents non-fractional signed whole numeric values. Int can represent values between -(2^31) and 2^31 - 1.",
        ),
        "Float" => (
            ScalarParser::Float,
            "The `Float` scalar type represents signed double-precision fractional values as specified by IEEE 754.",
        ),
        "String" => (
            ScalarParser::String,
            "The `String` scalar type represents textual data, represented as UTF-8 character sequences.",
        ),
        "Boolean" => (ScalarParser::Boolean, "The `Boolean` scalar type represents `true` or `false`."),
        "ID" => (
            ScalarParser::Id,
            "The `ID` scalar type represents a unique identifier, serialized as a string.",
        ),
        _ => return None,
    };

    Some(
        ScalarType::new(name)
            .with_description(description)
            .with_parser(parser),
    )
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(ScalarParser::Int, json!(1), Ok(json!(1)))]
    #[case(ScalarParser::Int, json!(2.0), Ok(json!(2)))]
    #[case(ScalarParser::Int, json!(2.5), Err("Int cannot represent value: 2.5"))]
    #[case(ScalarParser::Int, json!(4_294_967_296_i64), Err("Int cannot represent value: 4294967296"))]
    #[case(ScalarParser::Int, json!("1"), Err("Int cannot represent value: \"1\""))]
    #[case(ScalarParser::Float, json!(1), Ok(json!(1.0)))]
    #[case(ScalarParser::String, json!("Alex"), Ok(json!("Alex")))]
    #[case(ScalarParser::String, json!(12), Ok(json!("12")))]
    #[case(ScalarParser::String, json!({"a": 1}), Err("String cannot represent value: {\"a\":1}"))]
    #[case(ScalarParser::Boolean, json!(true), Ok(json!(true)))]
    #[case(ScalarParser::Boolean, json!(0), Err("Boolean cannot represent value: 0"))]
    #[case(ScalarParser::Id, json!(7), Ok(json!("7")))]
    #[case(ScalarParser::PassThrough, json!([1, "a"]), Ok(json!([1, "a"])))]
    fn output_coercion(#[case] parser: ScalarParser, #[case] value: Value, #[case] expected: Result<Value, &str>) {
        assert_eq!(parser.coerce_output(value), expected.map_err(str::to_string));
    }

    #[rstest]
    #[case(ScalarParser::Int, ConstValue::Number(3.into()), true)]
    #[case(ScalarParser::Int, ConstValue::Number((i64::from(i32::MAX) + 1).into()), false)]
    #[case(ScalarParser::Int, ConstValue::String("3".into()), false)]
    #[case(ScalarParser::Float, ConstValue::Number(3.into()), true)]
    #[case(ScalarParser::String, ConstValue::Number(3.into()), false)]
    #[case(ScalarParser::Boolean, ConstValue::Boolean(false), true)]
    #[case(ScalarParser::Id, ConstValue::Number(3.into()), true)]
    #[case(ScalarParser::Id, ConstValue::Boolean(true), false)]
    fn input_coercion(#[case] parser: ScalarParser, #[case] value: ConstValue, #[case] valid: bool) {
        assert_eq!(parser.coerce_input(value).is_ok(), valid);
    }
}
