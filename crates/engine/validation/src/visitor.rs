use std::collections::HashSet;

use engine_parser::{
    types::{
        Directive, ExecutableDocument, Field, FragmentSpread, InlineFragment, OperationDefinition, OperationType,
        Selection, SelectionSet, VariableDefinition,
    },
    Pos, Positioned,
};
use engine_registry::{DirectiveLocation, MetaType, Registry};
use engine_value::{ConstValue, Name, Value, Variables};

use crate::rules;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RuleError {
    pub locations: Vec<Pos>,
    pub message: String,
}

impl RuleError {
    pub fn new(locations: Vec<Pos>, message: impl Into<String>) -> Self {
        Self {
            locations,
            message: message.into(),
        }
    }
}

pub struct VisitorContext<'a> {
    pub registry: &'a Registry,
    pub variables: Option<&'a Variables>,
    pub document: &'a ExecutableDocument,
    pub(crate) errors: Vec<RuleError>,
    type_stack: Vec<Option<&'a MetaType>>,
    fragment_stack: Vec<&'a str>,
    expanded_fragments: HashSet<&'a str>,
    variable_definitions: &'a [Positioned<VariableDefinition>],
    operation_name: Option<&'a Name>,
}

impl<'a> VisitorContext<'a> {
    pub fn new(registry: &'a Registry, document: &'a ExecutableDocument, variables: Option<&'a Variables>) -> Self {
        Self {
            registry,
            variables,
            document,
            errors: Vec::new(),
            type_stack: Vec::new(),
            fragment_stack: Vec::new(),
            expanded_fragments: HashSet::new(),
            variable_definitions: &[],
            operation_name: None,
        }
    }

    /// Identical errors, typically from a fragment spread twice, are reported once.
    pub fn report_error(&mut self, locations: Vec<Pos>, message: impl Into<String>) {
        let error = RuleError::new(locations, message);
        if !self.errors.contains(&error) {
            self.errors.push(error);
        }
    }

    /// The type owning the selection set being visited, `None` when it could not be determined.
    pub fn current_type(&self) -> Option<&'a MetaType> {
        self.type_stack.last().copied().flatten()
    }

    /// Fragments being expanded, outermost first.
    pub fn fragment_stack(&self) -> &[&'a str] {
        &self.fragment_stack
    }

    pub fn operation_name(&self) -> Option<&'a Name> {
        self.operation_name
    }

    pub fn variable_definition(&self, name: &str) -> Option<&'a Positioned<VariableDefinition>> {
        self.variable_definitions
            .iter()
            .find(|definition| definition.node.name.node == name)
    }

    /// Replaces variables with the provided values or their defaults.
    ///
    /// `None` if a variable is neither provided nor defaulted.
    pub fn resolve_value(&self, value: &Value) -> Option<ConstValue> {
        value
            .clone()
            .into_const_with(|name| {
                if let Some(value) = self.variables.and_then(|variables| variables.get(&name)) {
                    return Ok(value.clone());
                }
                self.variable_definition(&name)
                    .and_then(|definition| definition.node.default_value.as_ref())
                    .map(|default_value| default_value.node.clone())
                    .ok_or(())
            })
            .ok()
    }
}

#[allow(unused_variables)]
pub trait Visitor<'a> {
    fn enter_operation_definition(
        &mut self,
        ctx: &mut VisitorContext<'a>,
        name: Option<&'a Name>,
        operation_definition: &'a Positioned<OperationDefinition>,
    ) {
    }
    fn exit_operation_definition(
        &mut self,
        ctx: &mut VisitorContext<'a>,
        name: Option<&'a Name>,
        operation_definition: &'a Positioned<OperationDefinition>,
    ) {
    }

    fn enter_variable_definition(
        &mut self,
        ctx: &mut VisitorContext<'a>,
        variable_definition: &'a Positioned<VariableDefinition>,
    ) {
    }

    fn enter_directive(
        &mut self,
        ctx: &mut VisitorContext<'a>,
        directive: &'a Positioned<Directive>,
        location: DirectiveLocation,
    ) {
    }

    /// Only called for fields which passed the field checks.
    fn enter_field(&mut self, ctx: &mut VisitorContext<'a>, field: &'a Positioned<Field>) {}
    fn exit_field(&mut self, ctx: &mut VisitorContext<'a>, field: &'a Positioned<Field>) {}

    fn enter_argument(&mut self, ctx: &mut VisitorContext<'a>, name: &'a Positioned<Name>, value: &'a Positioned<Value>) {}

    fn enter_fragment_spread(&mut self, ctx: &mut VisitorContext<'a>, fragment_spread: &'a Positioned<FragmentSpread>) {}

    fn enter_inline_fragment(&mut self, ctx: &mut VisitorContext<'a>, inline_fragment: &'a Positioned<InlineFragment>) {}
}

pub struct VisitorNil;

impl VisitorNil {
    pub(crate) fn with<V>(self, visitor: V) -> VisitorCons<V, Self> {
        VisitorCons(visitor, self)
    }
}

pub struct VisitorCons<A, B>(A, B);

impl<A, B> VisitorCons<A, B> {
    pub(crate) fn with<V>(self, visitor: V) -> VisitorCons<V, Self> {
        VisitorCons(visitor, self)
    }
}

impl Visitor<'_> for VisitorNil {}

impl<'a, A, B> Visitor<'a> for VisitorCons<A, B>
where
    A: Visitor<'a>,
    B: Visitor<'a>,
{
    fn enter_operation_definition(
        &mut self,
        ctx: &mut VisitorContext<'a>,
        name: Option<&'a Name>,
        operation_definition: &'a Positioned<OperationDefinition>,
    ) {
        self.0.enter_operation_definition(ctx, name, operation_definition);
        self.1.enter_operation_definition(ctx, name, operation_definition);
    }

    fn exit_operation_definition(
        &mut self,
        ctx: &mut VisitorContext<'a>,
        name: Option<&'a Name>,
        operation_definition: &'a Positioned<OperationDefinition>,
    ) {
        self.0.exit_operation_definition(ctx, name, operation_definition);
        self.1.exit_operation_definition(ctx, name, operation_definition);
    }

    fn enter_variable_definition(
        &mut self,
        ctx: &mut VisitorContext<'a>,
        variable_definition: &'a Positioned<VariableDefinition>,
    ) {
        self.0.enter_variable_definition(ctx, variable_definition);
        self.1.enter_variable_definition(ctx, variable_definition);
    }

    fn enter_directive(
        &mut self,
        ctx: &mut VisitorContext<'a>,
        directive: &'a Positioned<Directive>,
        location: DirectiveLocation,
    ) {
        self.0.enter_directive(ctx, directive, location);
        self.1.enter_directive(ctx, directive, location);
    }

    fn enter_field(&mut self, ctx: &mut VisitorContext<'a>, field: &'a Positioned<Field>) {
        self.0.enter_field(ctx, field);
        self.1.enter_field(ctx, field);
    }

    fn exit_field(&mut self, ctx: &mut VisitorContext<'a>, field: &'a Positioned<Field>) {
        self.0.exit_field(ctx, field);
        self.1.exit_field(ctx, field);
    }

    fn enter_argument(&mut self, ctx: &mut VisitorContext<'a>, name: &'a Positioned<Name>, value: &'a Positioned<Value>) {
        self.0.enter_argument(ctx, name, value);
        self.1.enter_argument(ctx, name, value);
    }

    fn enter_fragment_spread(&mut self, ctx: &mut VisitorContext<'a>, fragment_spread: &'a Positioned<FragmentSpread>) {
        self.0.enter_fragment_spread(ctx, fragment_spread);
        self.1.enter_fragment_spread(ctx, fragment_spread);
    }

    fn enter_inline_fragment(&mut self, ctx: &mut VisitorContext<'a>, inline_fragment: &'a Positioned<InlineFragment>) {
        self.0.enter_inline_fragment(ctx, inline_fragment);
        self.1.enter_inline_fragment(ctx, inline_fragment);
    }
}

/// Walks every operation of the document in source order.
///
/// A fragment is expanded at its first spread within an operation. Later spreads of the same
/// fragment only call [`Visitor::enter_fragment_spread`].
pub fn visit<'a, V: Visitor<'a>>(v: &mut V, ctx: &mut VisitorContext<'a>, doc: &'a ExecutableDocument) {
    let mut operations = doc.operations.iter().collect::<Vec<_>>();
    operations.sort_by_key(|(_, operation)| operation.pos);

    for (name, operation) in operations {
        ctx.operation_name = name;
        ctx.variable_definitions = &operation.node.variable_definitions;
        ctx.expanded_fragments.clear();

        v.enter_operation_definition(ctx, name, operation);
        for variable_definition in &operation.node.variable_definitions {
            v.enter_variable_definition(ctx, variable_definition);
        }
        let location = match operation.node.ty {
            OperationType::Query => DirectiveLocation::Query,
            OperationType::Mutation => DirectiveLocation::Mutation,
            OperationType::Subscription => DirectiveLocation::Subscription,
        };
        visit_directives(v, ctx, &operation.node.directives, location);

        let root = ctx.registry.root_type(operation.node.ty);
        ctx.type_stack.push(root);
        visit_selection_set(v, ctx, &operation.node.selection_set);
        ctx.type_stack.pop();

        v.exit_operation_definition(ctx, name, operation);
    }
}

fn visit_directives<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut VisitorContext<'a>,
    directives: &'a [Positioned<Directive>],
    location: DirectiveLocation,
) {
    for directive in directives {
        v.enter_directive(ctx, directive, location);
    }
}

fn visit_selection_set<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut VisitorContext<'a>,
    selection_set: &'a Positioned<SelectionSet>,
) {
    for selection in &selection_set.node.items {
        match &selection.node {
            Selection::Field(field) => {
                visit_directives(v, ctx, &field.node.directives, DirectiveLocation::Field);
                visit_field(v, ctx, field);
            }
            Selection::FragmentSpread(fragment_spread) => {
                visit_directives(
                    v,
                    ctx,
                    &fragment_spread.node.directives,
                    DirectiveLocation::FragmentSpread,
                );
                visit_fragment_spread(v, ctx, fragment_spread);
            }
            Selection::InlineFragment(inline_fragment) => {
                visit_directives(
                    v,
                    ctx,
                    &inline_fragment.node.directives,
                    DirectiveLocation::InlineFragment,
                );
                v.enter_inline_fragment(ctx, inline_fragment);

                let ty = match &inline_fragment.node.type_condition {
                    Some(condition) => composite_type(ctx, &condition.node.on.node),
                    None => ctx.current_type(),
                };
                ctx.type_stack.push(ty);
                visit_selection_set(v, ctx, &inline_fragment.node.selection_set);
                ctx.type_stack.pop();
            }
        }
    }
}

fn visit_field<'a, V: Visitor<'a>>(v: &mut V, ctx: &mut VisitorContext<'a>, field: &'a Positioned<Field>) {
    let Some(parent) = ctx.current_type() else {
        return;
    };
    let Some(ty) = rules::check_field(ctx, parent, field) else {
        return;
    };

    v.enter_field(ctx, field);
    for (name, value) in &field.node.arguments {
        v.enter_argument(ctx, name, value);
    }

    ctx.type_stack.push(Some(ty));
    visit_selection_set(v, ctx, &field.node.selection_set);
    ctx.type_stack.pop();

    v.exit_field(ctx, field);
}

fn visit_fragment_spread<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut VisitorContext<'a>,
    fragment_spread: &'a Positioned<FragmentSpread>,
) {
    v.enter_fragment_spread(ctx, fragment_spread);

    let name = fragment_spread.node.fragment_name.node.as_str();
    if ctx.fragment_stack.contains(&name) || !ctx.expanded_fragments.insert(name) {
        return;
    }
    let Some(fragment) = ctx.document.fragments.get(name) else {
        return;
    };

    for directive in &fragment.node.directives {
        v.enter_directive(ctx, directive, DirectiveLocation::FragmentDefinition);
    }

    ctx.fragment_stack.push(name);
    let ty = composite_type(ctx, &fragment.node.type_condition.node.on.node);
    ctx.type_stack.push(ty);
    visit_selection_set(v, ctx, &fragment.node.selection_set);
    ctx.type_stack.pop();
    ctx.fragment_stack.pop();
}

fn composite_type<'a>(ctx: &VisitorContext<'a>, name: &str) -> Option<&'a MetaType> {
    ctx.registry.lookup_type(name).filter(|ty| ty.is_composite())
}
