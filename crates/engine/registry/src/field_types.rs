//! Type references such as `[Int!]!`, as written on fields, arguments and input fields.

use std::fmt;

/// A reference to a type, including its list and non-null wrappers.
#[derive(Clone, Default, Hash, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct MetaFieldType(String);

impl MetaFieldType {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_non_null(&self) -> bool {
        self.0.ends_with('!')
    }

    pub fn is_nullable(&self) -> bool {
        !self.is_non_null()
    }

    pub fn is_list(&self) -> bool {
        self.0.trim_end_matches('!').starts_with('[')
    }

    /// The named type at the bottom of the wrappers.
    pub fn base_type_name(&self) -> &str {
        named_type_from_type_str(&self.0)
    }

    /// The wrapping types from the outermost inwards.
    pub fn wrapping_types(&self) -> WrappingTypeIter<'_> {
        WrappingTypeIter(self.0.chars())
    }
}

impl fmt::Display for MetaFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MetaFieldType {
    fn from(value: &str) -> MetaFieldType {
        MetaFieldType(value.to_string())
    }
}

impl From<String> for MetaFieldType {
    fn from(value: String) -> MetaFieldType {
        MetaFieldType(value)
    }
}

impl From<&String> for MetaFieldType {
    fn from(value: &String) -> MetaFieldType {
        MetaFieldType(value.clone())
    }
}

/// One level of a type reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaTypeName<'a> {
    List(&'a str),
    NonNull(&'a str),
    Named(&'a str),
}

impl<'a> MetaTypeName<'a> {
    /// Peel off the outermost wrapper of a type string.
    pub fn create(type_name: &'a str) -> MetaTypeName<'a> {
        if let Some(type_name) = type_name.strip_suffix('!') {
            MetaTypeName::NonNull(type_name)
        } else if let Some(type_name) = type_name.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            MetaTypeName::List(type_name)
        } else {
            MetaTypeName::Named(type_name)
        }
    }
}

/// Strips the NonNull and List wrappers from a type string to get the named type within.
pub fn named_type_from_type_str(meta: &str) -> &str {
    meta.trim_start_matches('[').trim_end_matches([']', '!'])
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum WrappingType {
    NonNull,
    List,
}

/// Iterates over the wrappers of a type string, outermost first.
pub struct WrappingTypeIter<'a>(std::str::Chars<'a>);

impl Iterator for WrappingTypeIter<'_> {
    type Item = WrappingType;

    fn next(&mut self) -> Option<Self::Item> {
        match self.0.next_back()? {
            '!' => Some(WrappingType::NonNull),
            ']' => Some(WrappingType::List),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_types() {
        let wrapping_types = |s: &str| MetaFieldType::from(s).wrapping_types().collect::<Vec<_>>();
        assert_eq!(wrapping_types("String"), vec![]);
        assert_eq!(wrapping_types("String!"), vec![WrappingType::NonNull]);
        assert_eq!(
            wrapping_types("[String]!"),
            vec![WrappingType::NonNull, WrappingType::List]
        );
        assert_eq!(
            wrapping_types("[[String!]]"),
            vec![WrappingType::List, WrappingType::List, WrappingType::NonNull]
        );
    }

    #[test]
    fn type_name_layers() {
        assert_eq!(MetaTypeName::create("[Int!]!"), MetaTypeName::NonNull("[Int!]"));
        assert_eq!(MetaTypeName::create("[Int!]"), MetaTypeName::List("Int!"));
        assert_eq!(MetaTypeName::create("Int"), MetaTypeName::Named("Int"));

        let ty = MetaFieldType::from("[Int!]!");
        assert!(ty.is_non_null());
        assert!(ty.is_list());
        assert_eq!(ty.base_type_name(), "Int");
    }
}
