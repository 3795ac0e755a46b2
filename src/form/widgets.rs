//! Control markup for each widget kind.
//!
//! Widgets register their fields with the [`FormSecurity`] they are handed;
//! wrapping, labels and error messages belong to the builder.

use crate::form::field::FieldPath;
use crate::form::html::{escape, tag, void_tag, Attributes};
use crate::form::inflector::{camelize, humanize, slug};
use crate::form::input_type::InputType;
use crate::form::model::PostedValue;
use crate::form::options::{
    EmptyOption, HiddenField, InputOptions, Legend, Multiple, OptionEntry, OptionList, Secure,
    SelectOption,
};
use crate::form::security::FormSecurity;

/// Sub-fields a file upload posts
const FILE_FIELDS: &[&str] = &["name", "type", "tmp_name", "error", "size"];

/// One control being rendered
pub(crate) struct Control<'a> {
    pub path: &'a FieldPath,
    pub options: &'a InputOptions,
    pub posted: Option<&'a PostedValue>,
}

impl<'a> Control<'a> {
    pub fn new(
        path: &'a FieldPath,
        options: &'a InputOptions,
        posted: Option<&'a PostedValue>,
    ) -> Self {
        Self {
            path,
            options,
            posted,
        }
    }

    /// Explicit value, else the posted value, else the default
    pub fn value(&self) -> Option<String> {
        self.options
            .value
            .clone()
            .or_else(|| self.posted.and_then(PostedValue::as_text).map(str::to_string))
            .or_else(|| self.options.default.clone())
    }

    /// Every selected value of an option control
    pub fn selected(&self) -> Vec<String> {
        if let Some(value) = &self.options.value {
            return vec![value.clone()];
        }
        match self.posted {
            Some(PostedValue::Text(text)) => vec![text.clone()],
            Some(PostedValue::List(values)) => values.clone(),
            None => self.options.default.iter().cloned().collect(),
        }
    }

    /// Registration mode; disabled controls are never registered
    pub fn secure(&self) -> Secure {
        if self.options.disabled {
            Secure::Skip
        } else {
            self.options.secure.unwrap_or(Secure::Lock)
        }
    }

    pub fn dom_id(&self) -> String {
        self.options
            .attributes
            .text("id")
            .map(str::to_string)
            .unwrap_or_else(|| self.path.dom_id())
    }

    /// `name` and `id`, then caller attributes and resolved limits
    pub fn attributes(&self) -> Attributes {
        let mut attributes = Attributes::new()
            .with("name", self.path.input_name())
            .with("id", self.path.dom_id());
        attributes.merge(&self.options.attributes);
        if let Some(maxlength) = self.options.maxlength {
            attributes.set("maxlength", maxlength);
        }
        if let Some(step) = &self.options.step {
            attributes.set("step", step.as_str());
        }
        if self.options.disabled {
            attributes.set("disabled", true);
        }
        attributes
    }
}

fn hidden_companion(name: String, id: String, value: &str) -> String {
    let attributes = Attributes::new()
        .with("type", "hidden")
        .with("name", name)
        .with("id", id)
        .with("value", value);
    void_tag("input", &attributes)
}

fn option_label(option: &SelectOption, escape_labels: bool) -> String {
    if escape_labels {
        escape(&option.label)
    } else {
        option.label.clone()
    }
}

pub(crate) fn text(
    control: &Control,
    input_type: InputType,
    security: &mut FormSecurity,
) -> String {
    let mut attributes = Attributes::new().with("type", input_type.as_str());
    attributes.merge(&control.attributes());
    if let Some(value) = control.value() {
        attributes.set("value", value);
    }
    security.register(control.path, control.secure(), None);
    void_tag("input", &attributes)
}

pub(crate) fn textarea(control: &Control, security: &mut FormSecurity) -> String {
    let mut attributes = control.attributes();
    attributes.set("cols", control.options.cols.unwrap_or(30));
    attributes.set("rows", control.options.rows.unwrap_or(6));
    let value = control.value().unwrap_or_default();
    let content = if control.options.escape {
        escape(&value)
    } else {
        value
    };
    security.register(control.path, control.secure(), None);
    tag("textarea", &content, &attributes)
}

/// Hidden inputs lock their value along with their name
pub(crate) fn hidden(control: &Control, security: &mut FormSecurity) -> String {
    let mut attributes = Attributes::new().with("type", "hidden");
    attributes.merge(&control.attributes());
    let value = control.value();
    if let Some(value) = &value {
        attributes.set("value", value.as_str());
    }
    security.register(
        control.path,
        control.secure(),
        Some(value.as_deref().unwrap_or("")),
    );
    void_tag("input", &attributes)
}

pub(crate) fn file(control: &Control, security: &mut FormSecurity) -> String {
    let mut attributes = Attributes::new().with("type", "file");
    attributes.merge(&control.attributes());
    match control.secure() {
        Secure::Lock => {
            for suffix in FILE_FIELDS {
                security.lock(&control.path.child(suffix), None);
            }
        }
        other => security.register(control.path, other, None),
    }
    void_tag("input", &attributes)
}

pub(crate) fn checkbox(control: &Control, security: &mut FormSecurity) -> String {
    let value = control
        .options
        .value
        .clone()
        .unwrap_or_else(|| "1".to_string());
    let checked = control
        .options
        .checked
        .unwrap_or_else(|| control.posted.map_or(false, |posted| posted.contains(&value)));

    let mut out = String::new();
    let companion = match &control.options.hidden_field {
        HiddenField::Auto => Some("0"),
        HiddenField::Value(value) => Some(value.as_str()),
        HiddenField::Disabled => None,
    };
    if let Some(companion) = companion {
        out.push_str(&hidden_companion(
            control.path.input_name(),
            format!("{}_", control.dom_id()),
            companion,
        ));
    }

    let mut attributes = Attributes::new().with("type", "checkbox");
    attributes.merge(&control.attributes());
    attributes.set("value", value);
    if checked {
        attributes.set("checked", true);
    }
    security.register(control.path, control.secure(), None);
    out.push_str(&void_tag("input", &attributes));
    out
}

pub(crate) fn radio(control: &Control, security: &mut FormSecurity) -> String {
    let empty = OptionList::new();
    let list = control.options.options.as_ref().unwrap_or(&empty);
    let selected = control.value();
    let name = control.path.input_name();
    let dom_id = control.dom_id();

    let radios: Vec<String> = list
        .items()
        .map(|option| {
            let id = format!("{}{}", dom_id, camelize(&slug(&option.value)));
            let mut attributes = Attributes::new()
                .with("type", "radio")
                .with("name", name.as_str())
                .with("id", id.as_str())
                .with("value", option.value.as_str());
            if selected.as_deref() == Some(option.value.as_str()) {
                attributes.set("checked", true);
            }
            if option.disabled || control.options.disabled {
                attributes.set("disabled", true);
            }
            let label = tag(
                "label",
                &option_label(option, control.options.escape),
                &Attributes::new().with("for", id),
            );
            format!("{}{}", void_tag("input", &attributes), label)
        })
        .collect();

    let mut out = control.options.between.clone();
    let unselected = selected.as_deref().map_or(true, str::is_empty);
    if unselected && control.options.hidden_field != HiddenField::Disabled {
        out.push_str(&hidden_companion(name.clone(), format!("{}_", dom_id), ""));
    }
    out.push_str(&radios.join(&control.options.separator));

    security.register(control.path, control.secure(), None);

    let legend = match &control.options.legend {
        Legend::Auto if list.len() > 1 => Some(humanize(control.path.field())),
        Legend::Auto | Legend::Disabled => None,
        Legend::Text(text) => Some(text.clone()),
    };
    match legend {
        Some(legend) => {
            let content = format!("{}{}", tag("legend", &escape(&legend), &Attributes::new()), out);
            tag("fieldset", &content, &Attributes::new())
        }
        None => out,
    }
}

fn option_tags(list: &OptionList, selected: &[String], escape_labels: bool) -> Vec<String> {
    let render = |option: &SelectOption| {
        let mut attributes = Attributes::new().with("value", option.value.as_str());
        if selected.iter().any(|s| s == &option.value) {
            attributes.set("selected", true);
        }
        if option.disabled {
            attributes.set("disabled", true);
        }
        tag("option", &option_label(option, escape_labels), &attributes)
    };
    let mut tags = Vec::new();
    for entry in list.entries() {
        match entry {
            OptionEntry::Item(option) => tags.push(render(option)),
            OptionEntry::Group { label, options } => {
                let label = if escape_labels { escape(label) } else { label.clone() };
                tags.push(format!("<optgroup label=\"{}\">", label));
                tags.extend(options.iter().map(&render));
                tags.push("</optgroup>".to_string());
            }
        }
    }
    tags
}

/// A `<select>` with one option per line
pub(crate) fn select_element(
    attributes: &Attributes,
    list: &OptionList,
    selected: &[String],
    empty: &EmptyOption,
    escape_labels: bool,
) -> String {
    let mut lines = vec![format!("<select{}>", attributes.render())];
    match empty {
        EmptyOption::Disabled => {}
        EmptyOption::Blank => lines.push("<option value=\"\"></option>".to_string()),
        EmptyOption::Text(text) => {
            lines.push(format!("<option value=\"\">{}</option>", escape(text)));
        }
    }
    lines.extend(option_tags(list, selected, escape_labels));
    lines.push("</select>".to_string());
    lines.join("\n")
}

pub(crate) fn select(control: &Control, security: &mut FormSecurity) -> String {
    let empty_list = OptionList::new();
    let list = control.options.options.as_ref().unwrap_or(&empty_list);
    let empty = control.options.empty.clone().unwrap_or(EmptyOption::Disabled);
    let selected = control.selected();
    let name = control.path.input_name();
    let dom_id = control.dom_id();

    let companion = match &control.options.hidden_field {
        HiddenField::Disabled => None,
        HiddenField::Auto => Some(String::new()),
        HiddenField::Value(value) => Some(value.clone()),
    };

    let out = match control.options.multiple {
        Some(Multiple::Checkbox) => {
            let mut parts = Vec::new();
            if let Some(companion) = &companion {
                parts.push(hidden_companion(name.clone(), dom_id.clone(), companion));
            }
            for option in list.items() {
                let id = format!("{}{}", dom_id, camelize(&slug(&option.value)));
                let mut attributes = Attributes::new()
                    .with("type", "checkbox")
                    .with("name", format!("{}[]", name))
                    .with("value", option.value.as_str())
                    .with("id", id.as_str());
                if selected.iter().any(|s| s == &option.value) {
                    attributes.set("checked", true);
                }
                if option.disabled || control.options.disabled {
                    attributes.set("disabled", true);
                }
                let label = tag(
                    "label",
                    &option_label(option, control.options.escape),
                    &Attributes::new().with("for", id),
                );
                parts.push(tag(
                    "div",
                    &format!("{}{}", void_tag("input", &attributes), label),
                    &Attributes::new().with("class", "checkbox"),
                ));
            }
            parts.join("\n")
        }
        Some(Multiple::Select) => {
            let mut attributes = control.attributes();
            attributes.set("name", format!("{}[]", name));
            attributes.set("multiple", true);
            let element =
                select_element(&attributes, list, &selected, &empty, control.options.escape);
            match &companion {
                Some(companion) => format!(
                    "{}\n{}",
                    hidden_companion(name.clone(), format!("{}_", dom_id), companion),
                    element
                ),
                None => element,
            }
        }
        None => select_element(
            &control.attributes(),
            list,
            &selected,
            &empty,
            control.options.escape,
        ),
    };

    let has_choices =
        !list.is_empty() || empty != EmptyOption::Disabled || control.options.multiple.is_some();
    if has_choices {
        security.register(control.path, control.secure(), None);
    }
    out
}
