use std::fmt::{self, Display, Formatter, Write};

use async_graphql_parser::types::{
    Directive, DocumentOperations, ExecutableDocument, OperationDefinition, Selection, SelectionSet,
};
use engine_value::{Name, Value};

use crate::Positioned;

/// Prints a document back to GraphQL text.
///
/// Operations and fragments are printed in source order, so parsing the output again yields the
/// same document.
pub fn print_document(document: &ExecutableDocument) -> String {
    Printer(document).to_string()
}

struct Printer<'a>(&'a ExecutableDocument);

impl Display for Printer<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let document = self.0;

        let mut operations = match &document.operations {
            DocumentOperations::Single(operation) => vec![(None, operation)],
            DocumentOperations::Multiple(operations) => {
                operations.iter().map(|(name, operation)| (Some(name), operation)).collect()
            }
        };
        operations.sort_by_key(|(_, operation)| operation.pos);

        let mut fragments = document.fragments.iter().collect::<Vec<_>>();
        fragments.sort_by_key(|(_, fragment)| fragment.pos);

        let mut first = true;
        let mut separate = |f: &mut Formatter<'_>| {
            if std::mem::take(&mut first) {
                Ok(())
            } else {
                f.write_str("\n\n")
            }
        };

        for (name, operation) in operations {
            separate(f)?;
            write_operation(name, &operation.node, f)?;
        }

        for (name, fragment) in fragments {
            separate(f)?;
            write!(f, "fragment {name} on {}", fragment.node.type_condition.node.on.node)?;
            write_directives(&fragment.node.directives, f)?;
            f.write_char(' ')?;
            write_selection_set(&fragment.node.selection_set.node, 0, f)?;
        }

        Ok(())
    }
}

fn write_operation(name: Option<&Name>, operation: &OperationDefinition, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", operation.ty)?;
    if let Some(name) = name {
        write!(f, " {name}")?;
    }

    if !operation.variable_definitions.is_empty() {
        f.write_char('(')?;
        for (i, definition) in operation.variable_definitions.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            let definition = &definition.node;
            write!(f, "${}: {}", definition.name.node, definition.var_type.node)?;
            if let Some(default) = &definition.default_value {
                write!(f, " = {}", default.node)?;
            }
        }
        f.write_char(')')?;
    }

    write_directives(&operation.directives, f)?;
    f.write_char(' ')?;
    write_selection_set(&operation.selection_set.node, 0, f)
}

fn write_selection_set(selection_set: &SelectionSet, indent: usize, f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str("{\n")?;
    for selection in &selection_set.items {
        write!(f, "{:width$}", "", width = (indent + 1) * 2)?;
        match &selection.node {
            Selection::Field(field) => {
                let field = &field.node;
                if let Some(alias) = &field.alias {
                    write!(f, "{}: ", alias.node)?;
                }
                f.write_str(field.name.node.as_str())?;
                write_arguments(&field.arguments, f)?;
                write_directives(&field.directives, f)?;
                if !field.selection_set.node.items.is_empty() {
                    f.write_char(' ')?;
                    write_selection_set(&field.selection_set.node, indent + 1, f)?;
                }
            }
            Selection::FragmentSpread(spread) => {
                write!(f, "...{}", spread.node.fragment_name.node)?;
                write_directives(&spread.node.directives, f)?;
            }
            Selection::InlineFragment(fragment) => {
                let fragment = &fragment.node;
                f.write_str("...")?;
                if let Some(condition) = &fragment.type_condition {
                    write!(f, " on {}", condition.node.on.node)?;
                }
                write_directives(&fragment.directives, f)?;
                f.write_char(' ')?;
                write_selection_set(&fragment.selection_set.node, indent + 1, f)?;
            }
        }
        f.write_char('\n')?;
    }
    write!(f, "{:width$}}}", "", width = indent * 2)
}

fn write_arguments(arguments: &[(Positioned<Name>, Positioned<Value>)], f: &mut Formatter<'_>) -> fmt::Result {
    if arguments.is_empty() {
        return Ok(());
    }
    f.write_char('(')?;
    for (i, (name, value)) in arguments.iter().enumerate() {
        if i != 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}: {}", name.node, value.node)?;
    }
    f.write_char(')')
}

fn write_directives(directives: &[Positioned<Directive>], f: &mut Formatter<'_>) -> fmt::Result {
    for directive in directives {
        write!(f, " @{}", directive.node.name.node)?;
        write_arguments(&directive.node.arguments, f)?;
    }
    Ok(())
}
