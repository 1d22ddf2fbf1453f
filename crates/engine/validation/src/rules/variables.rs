use std::collections::HashSet;

use engine_parser::{
    types::{BaseType, Directive, OperationDefinition, Type, VariableDefinition},
    Positioned,
};
use engine_registry::{coerce_input_value, DirectiveLocation};
use engine_value::{variables_used, Name, Value};

use crate::{Visitor, VisitorContext};

#[derive(Default)]
pub(crate) struct UniqueVariableNames<'a> {
    names: HashSet<&'a str>,
}

impl<'a> Visitor<'a> for UniqueVariableNames<'a> {
    fn enter_operation_definition(
        &mut self,
        _ctx: &mut VisitorContext<'a>,
        _name: Option<&'a Name>,
        _operation_definition: &'a Positioned<OperationDefinition>,
    ) {
        self.names.clear();
    }

    fn enter_variable_definition(
        &mut self,
        ctx: &mut VisitorContext<'a>,
        variable_definition: &'a Positioned<VariableDefinition>,
    ) {
        let name = &variable_definition.node.name;
        if !self.names.insert(name.node.as_str()) {
            ctx.report_error(
                vec![variable_definition.pos],
                format!("There can only be one variable named \"${}\"", name.node),
            );
        }
    }
}

fn base_type_name(ty: &Type) -> &str {
    match &ty.base {
        BaseType::Named(name) => name.as_str(),
        BaseType::List(inner) => base_type_name(inner),
    }
}

pub(crate) struct VariablesAreInputTypes;

impl<'a> Visitor<'a> for VariablesAreInputTypes {
    fn enter_variable_definition(
        &mut self,
        ctx: &mut VisitorContext<'a>,
        variable_definition: &'a Positioned<VariableDefinition>,
    ) {
        let var_type = &variable_definition.node.var_type;
        let type_name = base_type_name(&var_type.node);
        let registry = ctx.registry;
        match registry.lookup_type(type_name) {
            None => ctx.report_error(vec![var_type.pos], format!("Unknown type \"{type_name}\"")),
            Some(ty) if !ty.is_input() => ctx.report_error(
                vec![var_type.pos],
                format!(
                    "Variable \"${}\" cannot be of non-input type \"{}\"",
                    variable_definition.node.name.node, var_type.node
                ),
            ),
            Some(_) => {}
        }
    }
}

pub(crate) struct DefaultValuesOfCorrectType;

impl<'a> Visitor<'a> for DefaultValuesOfCorrectType {
    fn enter_variable_definition(
        &mut self,
        ctx: &mut VisitorContext<'a>,
        variable_definition: &'a Positioned<VariableDefinition>,
    ) {
        let Some(default_value) = &variable_definition.node.default_value else {
            return;
        };
        let var_type = &variable_definition.node.var_type.node;
        if ctx.registry.lookup_type(base_type_name(var_type)).is_none() {
            return;
        }

        if let Err(err) = coerce_input_value(ctx.registry, &var_type.to_string(), default_value.node.clone()) {
            ctx.report_error(
                vec![default_value.pos],
                format!(
                    "Invalid default value for variable \"${}\": {err}",
                    variable_definition.node.name.node
                ),
            );
        }
    }
}

pub(crate) struct NoUndefinedVariables;

impl NoUndefinedVariables {
    fn check(ctx: &mut VisitorContext<'_>, value: &Positioned<Value>) {
        for name in variables_used(&value.node) {
            if ctx.variable_definition(name).is_some() {
                continue;
            }
            let message = match ctx.operation_name() {
                Some(operation) => format!("Variable \"${name}\" is not defined by operation \"{operation}\""),
                None => format!("Variable \"${name}\" is not defined"),
            };
            ctx.report_error(vec![value.pos], message);
        }
    }
}

impl<'a> Visitor<'a> for NoUndefinedVariables {
    fn enter_argument(&mut self, ctx: &mut VisitorContext<'a>, _name: &'a Positioned<Name>, value: &'a Positioned<Value>) {
        Self::check(ctx, value);
    }

    fn enter_directive(
        &mut self,
        ctx: &mut VisitorContext<'a>,
        directive: &'a Positioned<Directive>,
        _location: DirectiveLocation,
    ) {
        for (_, value) in &directive.node.arguments {
            Self::check(ctx, value);
        }
    }
}
