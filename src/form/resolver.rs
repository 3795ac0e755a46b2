//! Input option resolution: widget type inference, option list lookup,
//! wrapping div attributes and output order.

use crate::form::field::FieldPath;
use crate::form::html::Attributes;
use crate::form::input_type::InputType;
use crate::form::model::ModelContext;
use crate::form::options::{
    DivOption, EmptyOption, ErrorOption, FormatElement, InputOptions, Multiple, OptionList,
};
use crate::schema::ColumnType;
use log::trace;
use std::collections::BTreeMap;

const PASSWORD_FIELDS: &[&str] = &["password", "passwd", "psword"];

/// Option lists declared by the caller, keyed by dotted path or bare field
#[derive(Debug, Clone, Default)]
pub struct OptionBindings {
    lists: BTreeMap<String, OptionList>,
}

impl OptionBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, field: impl Into<String>, options: OptionList) {
        self.lists.insert(field.into(), options);
    }

    /// The full dotted path wins over the bare field name
    pub fn lookup(&self, path: &FieldPath) -> Option<&OptionList> {
        self.lists
            .get(&path.dotted())
            .or_else(|| self.lists.get(path.field()))
    }
}

/// Options after inference, ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInput {
    pub path: FieldPath,
    pub input_type: InputType,
    pub options: InputOptions,
}

fn is_text_like(input_type: InputType) -> bool {
    matches!(
        input_type,
        InputType::Text
            | InputType::Password
            | InputType::Email
            | InputType::Url
            | InputType::Search
            | InputType::Tel
    )
}

/// Copy a bound option list into `options` when none was given; any input
/// but a radio that finds one becomes a select
fn apply_option_binding(
    path: &FieldPath,
    input_type: InputType,
    options: &mut InputOptions,
    bindings: &OptionBindings,
) -> InputType {
    if options.options.is_some() {
        return input_type;
    }
    match bindings.lookup(path) {
        Some(list) => {
            trace!("Option list bound for {}", path.dotted());
            options.options = Some(list.clone());
            match input_type {
                InputType::Radio => InputType::Radio,
                _ => InputType::Select,
            }
        }
        None => input_type,
    }
}

/// Infer the widget of a field without an explicit type
fn infer(
    path: &FieldPath,
    options: &mut InputOptions,
    model: Option<&dyn ModelContext>,
    bindings: &OptionBindings,
) -> InputType {
    let field = path.field();
    let column = model.and_then(|m| m.field(field));

    let mut input_type = if options.options.is_some() {
        InputType::Select
    } else if PASSWORD_FIELDS.contains(&field) {
        InputType::Password
    } else if options.checked.is_some() {
        InputType::Checkbox
    } else if model.and_then(|m| m.primary_key()) == Some(field) && column.is_some() {
        InputType::Hidden
    } else if let Some(column) = column {
        let inferred = InputType::from_column_type(column.column_type).unwrap_or(InputType::Text);
        if inferred == InputType::Number && column.column_type == ColumnType::Float {
            options.step.get_or_insert_with(|| "any".to_string());
        }
        inferred
    } else {
        InputType::Text
    };

    if input_type == InputType::Hidden {
        return input_type;
    }
    if field.ends_with("_id") {
        input_type = InputType::Select;
    }
    if path.model() == Some(field) {
        options.multiple.get_or_insert(Multiple::Select);
        return InputType::Select;
    }
    if input_type == InputType::Text {
        input_type = apply_option_binding(path, input_type, options, bindings);
    }
    input_type
}

/// Derive `maxlength` from the column when not given
fn apply_max_length(
    input_type: InputType,
    options: &mut InputOptions,
    model: Option<&dyn ModelContext>,
    field: &str,
) {
    if options.maxlength.is_some() {
        return;
    }
    let Some(column) = model.and_then(|m| m.field(field)) else {
        return;
    };
    let Some(length) = column.length else {
        return;
    };
    match column.column_type {
        ColumnType::Float if input_type == InputType::Number || is_text_like(input_type) => {
            options.maxlength = Some(length + column.precision.unwrap_or(0) + 1);
        }
        ColumnType::Decimal => {}
        _ if is_text_like(input_type) => options.maxlength = Some(length),
        _ => {}
    }
}

/// Resolve the widget type and final options of one input
pub fn resolve(
    path: &FieldPath,
    mut options: InputOptions,
    model: Option<&dyn ModelContext>,
    bindings: &OptionBindings,
) -> ResolvedInput {
    let mut input_type = match options.input_type {
        Some(explicit) => explicit,
        None => infer(path, &mut options, model, bindings),
    };

    if input_type.takes_options() {
        input_type = apply_option_binding(path, input_type, &mut options, bindings);
    }
    if options.rows.is_some() || options.cols.is_some() {
        input_type = InputType::Textarea;
    }
    if input_type != InputType::Hidden {
        apply_max_length(input_type, &mut options, model, path.field());
    }
    if input_type.is_date_time() || input_type == InputType::Select {
        options.empty.get_or_insert(EmptyOption::Disabled);
    }

    trace!("Resolved {} as {}", path.dotted(), input_type);
    options.input_type = Some(input_type);
    ResolvedInput {
        path: path.clone(),
        input_type,
        options,
    }
}

/// Attributes of the wrapping div, `None` when the input has no div
pub fn div_attributes(
    resolved: &ResolvedInput,
    model: Option<&dyn ModelContext>,
) -> Option<Attributes> {
    if resolved.input_type == InputType::Hidden {
        return None;
    }
    let mut attributes =
        Attributes::new().with("class", format!("input {}", resolved.input_type));
    match &resolved.options.div {
        DivOption::Disabled => return None,
        DivOption::Auto => {}
        DivOption::Class(class) => attributes.set("class", class.as_str()),
        DivOption::Custom(custom) => attributes.merge(custom),
    }

    let field = resolved.path.field();
    if model.map_or(false, |m| m.validates(field)) {
        attributes.add_class("required");
    }
    let has_error = model.map_or(false, |m| !m.errors(field).is_empty());
    if has_error && resolved.options.error != ErrorOption::Disabled {
        attributes.add_class("error");
    }
    Some(attributes)
}

/// Order in which the parts of an input are emitted
pub fn format(resolved: &ResolvedInput) -> Vec<FormatElement> {
    use FormatElement::*;

    if resolved.input_type == InputType::Hidden {
        return vec![Input];
    }
    if let Some(format) = &resolved.options.format {
        if format.contains(&Input) {
            return format.clone();
        }
    }
    match resolved.input_type {
        InputType::Checkbox => vec![Before, Input, Between, Label, After, Error],
        _ => vec![Before, Label, Between, Input, After, Error],
    }
}
