//! Form builder: opens and closes forms and renders complete inputs.

use crate::form::datetime::{self, Picker};
use crate::form::error::{FormError, FormResult};
use crate::form::field::FieldPath;
use crate::form::html::{escape, hidden_block, nested_list, tag, void_tag, Attributes};
use crate::form::inflector::{camelize, humanize, underscore};
use crate::form::input_type::InputType;
use crate::form::model::{ModelContext, RequestData};
use crate::form::options::{
    EmptyOption, ErrorOption, FormatElement, InputOptions, LabelOption, OptionList, TimeFormat,
};
use crate::form::resolver::{div_attributes, format, resolve, OptionBindings, ResolvedInput};
use crate::form::security::FormSecurity;
use crate::form::widgets::{self, Control};
use log::{debug, trace};
use rand::Rng;
use std::collections::BTreeMap;

/// HTTP method a form submits with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMethod {
    Post,
    Get,
    Put,
    Delete,
    /// POST with a multipart body
    File,
}

impl FormMethod {
    /// Value of the hidden `_method` field
    fn override_value(&self) -> Option<&'static str> {
        match self {
            FormMethod::Get => None,
            FormMethod::Post | FormMethod::File => Some("POST"),
            FormMethod::Put => Some("PUT"),
            FormMethod::Delete => Some("DELETE"),
        }
    }
}

/// Options of [`FormBuilder::create`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormOptions {
    /// PUT when the posted data carries the model's primary key, else POST
    pub method: Option<FormMethod>,
    /// Target URL, the current URL by default
    pub url: Option<String>,
    /// Action name used in the form id
    pub action: Option<String>,
    pub id: Option<String>,
    pub attributes: Attributes,
    /// Options every [`FormBuilder::input`] of this form starts from
    pub input_defaults: Option<InputOptions>,
}

fn model_for<'a>(
    models: &'a BTreeMap<String, Box<dyn ModelContext>>,
    path: &FieldPath,
) -> Option<&'a dyn ModelContext> {
    path.model()
        .and_then(|name| models.get(name))
        .map(|model| model.as_ref())
}

fn random_id(prefix: &str) -> String {
    format!("{}{}", prefix, rand::thread_rng().gen::<u32>())
}

/// Builds the markup of one form at a time, tracking which fields it
/// rendered for tamper protection
pub struct FormBuilder {
    request: RequestData,
    security: FormSecurity,
    models: BTreeMap<String, Box<dyn ModelContext>>,
    bindings: OptionBindings,
    model: Option<String>,
    defaults: InputOptions,
}

impl FormBuilder {
    pub fn new(request: RequestData, salt: impl Into<String>) -> Self {
        Self {
            request,
            security: FormSecurity::new(salt),
            models: BTreeMap::new(),
            bindings: OptionBindings::new(),
            model: None,
            defaults: InputOptions::new(),
        }
    }

    pub fn add_model(&mut self, model: impl ModelContext + 'static) {
        self.models.insert(model.name().to_string(), Box::new(model));
    }

    /// Declare the option list of `field` (dotted path or bare name)
    pub fn bind_options(&mut self, field: impl Into<String>, options: OptionList) {
        self.bindings.bind(field, options);
    }

    pub fn security(&self) -> &FormSecurity {
        &self.security
    }

    pub fn request(&self) -> &RequestData {
        &self.request
    }

    /// Set the options every [`input`](Self::input) starts from; `merge`
    /// layers `options` over the current defaults instead of replacing them
    pub fn defaults(&mut self, options: InputOptions, merge: bool) {
        self.defaults = if merge {
            options.merged_over(&self.defaults)
        } else {
            options
        };
    }

    pub fn input_defaults(&self) -> &InputOptions {
        &self.defaults
    }

    fn path(&self, field: &str) -> FieldPath {
        FieldPath::parse(field, self.model.as_deref())
    }

    fn record_exists(&self, model: &str) -> bool {
        let Some(key) = self.models.get(model).and_then(|m| m.primary_key()) else {
            return false;
        };
        self.request
            .data
            .get(&format!("{}.{}", model, key))
            .and_then(|value| value.as_text())
            .map_or(false, |value| !value.is_empty())
    }

    /// Open a form for `model`, resetting the field registry and the
    /// input defaults
    pub fn create(&mut self, model: Option<&str>, options: FormOptions) -> String {
        self.model = model.map(str::to_string);
        self.defaults = options.input_defaults.unwrap_or_default();
        let method = options.method.unwrap_or_else(|| match model {
            Some(model) if self.record_exists(model) => FormMethod::Put,
            _ => FormMethod::Post,
        });
        let url = options.url.unwrap_or_else(|| self.request.here.clone());
        let action = options
            .action
            .unwrap_or_else(|| self.request.action.clone());
        let id = options
            .id
            .unwrap_or_else(|| format!("{}{}Form", model.unwrap_or(""), camelize(&action)));

        let mut attributes = Attributes::new()
            .with("action", url.as_str())
            .with("id", id)
            .with(
                "method",
                if method == FormMethod::Get { "get" } else { "post" },
            );
        if method == FormMethod::File {
            attributes.set("enctype", "multipart/form-data");
        }
        attributes.set("accept-charset", "utf-8");
        attributes.merge(&options.attributes);

        self.security.start();
        let mut hidden = String::new();
        if let Some(value) = method.override_value() {
            let method_field = Attributes::new()
                .with("type", "hidden")
                .with("name", "_method")
                .with("value", value);
            hidden.push_str(&void_tag("input", &method_field));
        }
        if let Some(token) = &self.request.token {
            let key_field = Attributes::new()
                .with("type", "hidden")
                .with("name", "data[_Token][key]")
                .with("value", token.key.as_str())
                .with("id", random_id("Token"));
            hidden.push_str(&void_tag("input", &key_field));
            for field in &token.unlocked_fields {
                self.security.unlock(field);
            }
        }
        debug!("Opening form {:?} with method {:?}", model, method);

        let mut out = format!("<form{}>", attributes.render());
        if !hidden.is_empty() {
            out.push_str(&hidden_block(&hidden));
        }
        out
    }

    /// Close the form, emitting an optional submit button and, when the
    /// request carries a token, the secured field block
    pub fn end(&mut self, submit: Option<&str>) -> FormResult<String> {
        let mut out = String::new();
        if let Some(caption) = submit {
            out.push_str(&self.submit(caption, Attributes::new()));
        }
        if self.request.token.is_some() {
            out.push_str(&self.secure()?);
        }
        out.push_str("</form>");
        self.model = None;
        Ok(out)
    }

    /// Hidden `_Token[fields]` and `_Token[unlocked]` inputs
    pub fn secure(&self) -> FormResult<String> {
        debug!(
            "Securing {} locked and {} valued field(s)",
            self.security.locked_fields().len(),
            self.security.valued_fields().len()
        );
        let fields = Attributes::new()
            .with("type", "hidden")
            .with("name", "data[_Token][fields]")
            .with("value", self.security.fields_token()?)
            .with("id", random_id("TokenFields"));
        let unlocked = Attributes::new()
            .with("type", "hidden")
            .with("name", "data[_Token][unlocked]")
            .with("value", self.security.unlocked_token())
            .with("id", random_id("TokenUnlocked"));
        Ok(hidden_block(&format!(
            "{}{}",
            void_tag("input", &fields),
            void_tag("input", &unlocked)
        )))
    }

    /// Exclude `name` from the tamper hash. A bare field name resolves
    /// against the current model like any input name.
    pub fn unlock_field(&mut self, name: &str) {
        let path = self.path(name);
        self.security.unlock_path(&path);
    }

    pub fn submit(&self, caption: &str, attributes: Attributes) -> String {
        let mut button = Attributes::new()
            .with("type", "submit")
            .with("value", caption);
        button.merge(&attributes);
        tag(
            "div",
            &void_tag("input", &button),
            &Attributes::new().with("class", "submit"),
        )
    }

    /// `<label>` for `field`; the text defaults to the humanized field name
    pub fn label(&self, field: &str, text: Option<&str>, attributes: Attributes) -> String {
        let path = self.path(field);
        let mut label = Attributes::new().with("for", path.dom_id());
        label.merge(&attributes);
        let text = text.map(str::to_string).unwrap_or_else(|| default_label(&path));
        tag("label", &text, &label)
    }

    /// Validation messages of `field`, `None` when it is valid
    pub fn error(&self, field: &str) -> Option<String> {
        let path = self.path(field);
        self.error_html(&path, &ErrorOption::Auto)
    }

    fn error_html(&self, path: &FieldPath, option: &ErrorOption) -> Option<String> {
        let messages = model_for(&self.models, path)
            .map(|model| model.errors(path.field()))
            .unwrap_or_default();
        if messages.is_empty() {
            return None;
        }
        let content = match option {
            ErrorOption::Disabled => return None,
            ErrorOption::Text(text) => escape(text),
            ErrorOption::Auto if messages.len() == 1 => escape(&messages[0]),
            ErrorOption::Auto => {
                let items: Vec<String> = messages.iter().map(|m| escape(m)).collect();
                nested_list(&items)
            }
        };
        Some(tag(
            "div",
            &content,
            &Attributes::new().with("class", "error-message"),
        ))
    }

    fn label_html(&self, resolved: &ResolvedInput) -> Option<String> {
        if resolved.input_type == InputType::Radio {
            return None;
        }
        let path = &resolved.path;
        let mut target = resolved
            .options
            .attributes
            .text("id")
            .map(str::to_string)
            .unwrap_or_else(|| path.dom_id());
        if resolved.input_type.is_date_time() {
            if let Some(suffix) = datetime::label_suffix(resolved.input_type, &resolved.options) {
                target.push_str(suffix);
            }
        }
        let mut attributes = Attributes::new().with("for", target);
        let text = match &resolved.options.label {
            LabelOption::Disabled => return None,
            LabelOption::Auto => default_label(path),
            LabelOption::Text(text) => text.clone(),
            LabelOption::Custom { text, attributes: custom } => {
                attributes.merge(custom);
                text.clone().unwrap_or_else(|| default_label(path))
            }
        };
        Some(tag("label", &text, &attributes))
    }

    /// Flag invalid and required controls
    fn decorate(&self, path: &FieldPath, options: &mut InputOptions) {
        let Some(model) = model_for(&self.models, path) else {
            return;
        };
        let field = path.field();
        if options.error != ErrorOption::Disabled && !model.errors(field).is_empty() {
            options.attributes.add_class("form-error");
        }
        if model.validates(field) && !options.attributes.contains("required") {
            options.attributes.set("required", true);
        }
    }

    fn render_control(
        &mut self,
        path: &FieldPath,
        input_type: InputType,
        options: &InputOptions,
    ) -> String {
        let posted = self.request.value(path);
        let control = Control::new(path, options, posted);
        let security = &mut self.security;
        match input_type {
            InputType::Hidden => widgets::hidden(&control, security),
            InputType::Textarea => widgets::textarea(&control, security),
            InputType::File => widgets::file(&control, security),
            InputType::Checkbox => widgets::checkbox(&control, security),
            InputType::Radio => widgets::radio(&control, security),
            InputType::Select => widgets::select(&control, security),
            InputType::Date | InputType::Time | InputType::Datetime => {
                datetime::render(path, input_type, options, &self.request, security)
            }
            InputType::Text
            | InputType::Password
            | InputType::Email
            | InputType::Url
            | InputType::Search
            | InputType::Tel
            | InputType::Number
            | InputType::Color
            | InputType::Range => widgets::text(&control, input_type, security),
        }
    }

    /// A complete input: control plus label, error and wrapping div
    pub fn input(&mut self, field: &str, options: InputOptions) -> String {
        let path = self.path(field);
        let options = options.merged_over(&self.defaults);
        let model = model_for(&self.models, &path);
        let mut resolved = resolve(&path, options, model, &self.bindings);
        let div = div_attributes(&resolved, model);
        self.decorate(&path, &mut resolved.options);
        trace!("Rendering input {} as {}", path.dotted(), resolved.input_type);

        let label = self.label_html(&resolved);
        let error = self.error_html(&path, &resolved.options.error);
        let control = self.render_control(&path, resolved.input_type, &resolved.options);

        let mut out = String::new();
        for element in format(&resolved) {
            match element {
                FormatElement::Before => out.push_str(&resolved.options.before),
                FormatElement::Label => out.push_str(label.as_deref().unwrap_or("")),
                FormatElement::Between if resolved.input_type != InputType::Radio => {
                    out.push_str(&resolved.options.between)
                }
                FormatElement::Between => {}
                FormatElement::Input => out.push_str(&control),
                FormatElement::After => out.push_str(&resolved.options.after),
                FormatElement::Error => out.push_str(error.as_deref().unwrap_or("")),
            }
        }
        match div {
            Some(attributes) => tag("div", &out, &attributes),
            None => out,
        }
    }

    /// One bare control of `input_type`, without label or div
    pub fn control(
        &mut self,
        field: &str,
        input_type: InputType,
        mut options: InputOptions,
    ) -> String {
        let path = self.path(field);
        self.decorate(&path, &mut options);
        options.input_type = Some(input_type);
        self.render_control(&path, input_type, &options)
    }

    /// Bare control named by a type string, as in `widget("email", ..)`
    pub fn widget(
        &mut self,
        type_name: &str,
        field: Option<&str>,
        options: InputOptions,
    ) -> FormResult<String> {
        let field = field.ok_or_else(|| FormError::MissingFieldName {
            method: type_name.to_string(),
        })?;
        let input_type: InputType = type_name.parse()?;
        Ok(self.control(field, input_type, options))
    }

    pub fn text(&mut self, field: &str, options: InputOptions) -> String {
        self.control(field, InputType::Text, options)
    }

    pub fn hidden(&mut self, field: &str, options: InputOptions) -> String {
        self.control(field, InputType::Hidden, options)
    }

    pub fn textarea(&mut self, field: &str, options: InputOptions) -> String {
        self.control(field, InputType::Textarea, options)
    }

    pub fn checkbox(&mut self, field: &str, options: InputOptions) -> String {
        self.control(field, InputType::Checkbox, options)
    }

    pub fn file(&mut self, field: &str, options: InputOptions) -> String {
        self.control(field, InputType::File, options)
    }

    pub fn radio(&mut self, field: &str, list: OptionList, options: InputOptions) -> String {
        self.control(field, InputType::Radio, options.options(list))
    }

    pub fn select(&mut self, field: &str, list: OptionList, options: InputOptions) -> String {
        self.control(field, InputType::Select, options.options(list))
    }

    /// Bare date/time pickers; a blank option leads each select unless
    /// `empty` is given
    pub fn date_time(
        &mut self,
        field: &str,
        input_type: InputType,
        mut options: InputOptions,
    ) -> FormResult<String> {
        if !input_type.is_date_time() {
            return Err(FormError::UnknownInputType(input_type.to_string()));
        }
        options.empty.get_or_insert(EmptyOption::Blank);
        Ok(self.control(field, input_type, options))
    }

    /// One picker select named `data[Model][field][<part>]`
    pub fn date_part(&mut self, field: &str, picker: Picker, mut options: InputOptions) -> String {
        let path = self.path(field);
        self.decorate(&path, &mut options);
        datetime::render_part(&path, picker, &options, &self.request, &mut self.security)
    }

    pub fn day(&mut self, field: &str, options: InputOptions) -> String {
        self.date_part(field, Picker::Day, options)
    }

    pub fn month(&mut self, field: &str, options: InputOptions) -> String {
        self.date_part(field, Picker::Month, options)
    }

    pub fn year(&mut self, field: &str, min: i32, max: i32, options: InputOptions) -> String {
        self.date_part(field, Picker::Year, options.years(min, max))
    }

    pub fn hour(&mut self, field: &str, format: TimeFormat, options: InputOptions) -> String {
        self.date_part(field, Picker::Hour, options.time_format(format))
    }

    pub fn minute(&mut self, field: &str, options: InputOptions) -> String {
        self.date_part(field, Picker::Minute, options)
    }

    pub fn meridian(&mut self, field: &str, options: InputOptions) -> String {
        self.date_part(field, Picker::Meridian, options)
    }
}

/// `author_id` -> `Author`, `firstName` -> `First Name`
fn default_label(path: &FieldPath) -> String {
    let field = path.field();
    let field = field.strip_suffix("_id").unwrap_or(field);
    humanize(&underscore(field))
}
