use async_graphql_parser::types::{Directive, ExecutableDocument, Selection, SelectionSet};
use engine_value::{Name, Value};

use crate::{Error, Pos, Positioned, Result, MAX_RECURSION_DEPTH};

pub(crate) fn check(document: &ExecutableDocument) -> Result<()> {
    for (_, operation) in document.operations.iter() {
        let operation = &operation.node;
        for variable in &operation.variable_definitions {
            if let Some(default) = &variable.node.default_value {
                check_value(&default.node.clone().into_value(), default.pos, 0)?;
            }
        }
        check_directives(&operation.directives, 0)?;
        check_selection_set(&operation.selection_set, 0)?;
    }

    for fragment in document.fragments.values() {
        check_directives(&fragment.node.directives, 0)?;
        check_selection_set(&fragment.node.selection_set, 0)?;
    }

    Ok(())
}

fn enter(depth: usize, pos: Pos) -> Result<usize> {
    let depth = depth + 1;
    if depth > MAX_RECURSION_DEPTH {
        return Err(Error::RecursionLimitExceeded { pos });
    }
    Ok(depth)
}

fn check_selection_set(selection_set: &Positioned<SelectionSet>, depth: usize) -> Result<()> {
    let depth = enter(depth, selection_set.pos)?;

    for selection in &selection_set.node.items {
        match &selection.node {
            Selection::Field(field) => {
                check_arguments(&field.node.arguments, depth)?;
                check_directives(&field.node.directives, depth)?;
                if !field.node.selection_set.node.items.is_empty() {
                    check_selection_set(&field.node.selection_set, depth)?;
                }
            }
            Selection::FragmentSpread(spread) => check_directives(&spread.node.directives, depth)?,
            Selection::InlineFragment(fragment) => {
                check_directives(&fragment.node.directives, depth)?;
                check_selection_set(&fragment.node.selection_set, depth)?;
            }
        }
    }

    Ok(())
}

fn check_directives(directives: &[Positioned<Directive>], depth: usize) -> Result<()> {
    directives
        .iter()
        .try_for_each(|directive| check_arguments(&directive.node.arguments, depth))
}

fn check_arguments(arguments: &[(Positioned<Name>, Positioned<Value>)], depth: usize) -> Result<()> {
    arguments
        .iter()
        .try_for_each(|(_, value)| check_value(&value.node, value.pos, depth))
}

fn check_value(value: &Value, pos: Pos, depth: usize) -> Result<()> {
    match value {
        Value::List(items) => {
            let depth = enter(depth, pos)?;
            items.iter().try_for_each(|item| check_value(item, pos, depth))
        }
        Value::Object(fields) => {
            let depth = enter(depth, pos)?;
            fields.values().try_for_each(|field| check_value(field, pos, depth))
        }
        _ => Ok(()),
    }
}
