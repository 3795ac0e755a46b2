//! Caller options for a single input.
//!
//! Every switch a caller can pass is a typed field; enum variants replace the
//! loosely typed `false` / string / map values a looser API would accept.

use crate::form::html::{AttrValue, Attributes};
use crate::form::input_type::InputType;

/// Label rendering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LabelOption {
    /// Humanized field name
    #[default]
    Auto,
    Disabled,
    Text(String),
    Custom {
        text: Option<String>,
        attributes: Attributes,
    },
}

/// Wrapping div
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DivOption {
    /// `class="input <type>"`
    #[default]
    Auto,
    Disabled,
    /// Replaces the class entirely
    Class(String),
    /// Merged over the automatic attributes
    Custom(Attributes),
}

/// Error message rendering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ErrorOption {
    #[default]
    Auto,
    Disabled,
    /// Replaces the validation message
    Text(String),
}

/// Leading empty option of a select
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyOption {
    Disabled,
    Blank,
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiple {
    /// `<select multiple="multiple">`
    Select,
    /// One checkbox per option
    Checkbox,
}

/// How a field takes part in tamper protection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Secure {
    Lock,
    Unlock,
    /// Neither locked nor unlocked
    Skip,
}

/// Hidden companion of checkboxes, radios and multiple selects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HiddenField {
    #[default]
    Auto,
    Disabled,
    Value(String),
}

/// Legend of a radio fieldset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Legend {
    /// Humanized field name, shown for more than one option
    #[default]
    Auto,
    Disabled,
    Text(String),
}

/// One slot of the input output order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatElement {
    Before,
    Label,
    Between,
    Input,
    After,
    Error,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeFormat {
    #[default]
    Twelve,
    TwentyFour,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub disabled: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionEntry {
    Item(SelectOption),
    Group {
        label: String,
        options: Vec<SelectOption>,
    },
}

/// Ordered option list for selects, radios and checkbox groups
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionList {
    entries: Vec<OptionEntry>,
}

impl OptionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.entries
            .push(OptionEntry::Item(SelectOption::new(value, label)));
        self
    }

    pub fn with_group<V, L>(mut self, label: impl Into<String>, options: Vec<(V, L)>) -> Self
    where
        V: Into<String>,
        L: Into<String>,
    {
        let options = options
            .into_iter()
            .map(|(value, label)| SelectOption::new(value, label))
            .collect();
        self.entries.push(OptionEntry::Group {
            label: label.into(),
            options,
        });
        self
    }

    pub fn entries(&self) -> &[OptionEntry] {
        &self.entries
    }

    /// Every selectable option, flattening groups
    pub fn items(&self) -> impl Iterator<Item = &SelectOption> {
        self.entries.iter().flat_map(|entry| match entry {
            OptionEntry::Item(option) => std::slice::from_ref(option).iter(),
            OptionEntry::Group { options, .. } => options.iter(),
        })
    }

    pub fn len(&self) -> usize {
        self.items().count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Into<String>, L: Into<String>> FromIterator<(V, L)> for OptionList {
    fn from_iter<I: IntoIterator<Item = (V, L)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(OptionList::new(), |list, (value, label)| {
                list.with_option(value, label)
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputOptions {
    /// Explicit widget; inferred when `None`
    pub input_type: Option<InputType>,
    pub label: LabelOption,
    pub div: DivOption,
    pub error: ErrorOption,
    pub options: Option<OptionList>,
    pub empty: Option<EmptyOption>,
    pub multiple: Option<Multiple>,
    /// Overrides the posted value
    pub value: Option<String>,
    /// Used when nothing was posted
    pub default: Option<String>,
    pub checked: Option<bool>,
    /// `None` locks the field
    pub secure: Option<Secure>,
    pub disabled: bool,
    pub escape: bool,
    pub hidden_field: HiddenField,
    pub legend: Legend,
    pub separator: String,
    pub before: String,
    pub between: String,
    pub after: String,
    pub format: Option<Vec<FormatElement>>,
    pub rows: Option<u32>,
    pub cols: Option<u32>,
    pub maxlength: Option<u32>,
    pub step: Option<String>,
    /// Order of the day, month and year pickers, e.g. `MDY`
    pub date_format: String,
    pub time_format: TimeFormat,
    /// Minute step of time pickers
    pub interval: u32,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    /// Extra attributes copied onto the control
    pub attributes: Attributes,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            input_type: None,
            label: LabelOption::Auto,
            div: DivOption::Auto,
            error: ErrorOption::Auto,
            options: None,
            empty: None,
            multiple: None,
            value: None,
            default: None,
            checked: None,
            secure: None,
            disabled: false,
            escape: true,
            hidden_field: HiddenField::Auto,
            legend: Legend::Auto,
            separator: String::new(),
            before: String::new(),
            between: String::new(),
            after: String::new(),
            format: None,
            rows: None,
            cols: None,
            maxlength: None,
            step: None,
            date_format: "MDY".to_string(),
            time_format: TimeFormat::Twelve,
            interval: 1,
            min_year: None,
            max_year: None,
            attributes: Attributes::new(),
        }
    }
}

impl InputOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_type(mut self, input_type: InputType) -> Self {
        self.input_type = Some(input_type);
        self
    }

    pub fn label(mut self, text: impl Into<String>) -> Self {
        self.label = LabelOption::Text(text.into());
        self
    }

    pub fn no_label(mut self) -> Self {
        self.label = LabelOption::Disabled;
        self
    }

    pub fn div(mut self, div: DivOption) -> Self {
        self.div = div;
        self
    }

    pub fn no_div(mut self) -> Self {
        self.div = DivOption::Disabled;
        self
    }

    pub fn error(mut self, error: ErrorOption) -> Self {
        self.error = error;
        self
    }

    pub fn options(mut self, options: OptionList) -> Self {
        self.options = Some(options);
        self
    }

    pub fn empty(mut self, empty: EmptyOption) -> Self {
        self.empty = Some(empty);
        self
    }

    pub fn multiple(mut self, multiple: Multiple) -> Self {
        self.multiple = Some(multiple);
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    pub fn secure(mut self, secure: Secure) -> Self {
        self.secure = Some(secure);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn escape(mut self, escape: bool) -> Self {
        self.escape = escape;
        self
    }

    pub fn hidden_field(mut self, hidden_field: HiddenField) -> Self {
        self.hidden_field = hidden_field;
        self
    }

    pub fn legend(mut self, legend: Legend) -> Self {
        self.legend = legend;
        self
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn before(mut self, html: impl Into<String>) -> Self {
        self.before = html.into();
        self
    }

    pub fn between(mut self, html: impl Into<String>) -> Self {
        self.between = html.into();
        self
    }

    pub fn after(mut self, html: impl Into<String>) -> Self {
        self.after = html.into();
        self
    }

    pub fn format(mut self, format: Vec<FormatElement>) -> Self {
        self.format = Some(format);
        self
    }

    pub fn rows(mut self, rows: u32) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn cols(mut self, cols: u32) -> Self {
        self.cols = Some(cols);
        self
    }

    pub fn maxlength(mut self, maxlength: u32) -> Self {
        self.maxlength = Some(maxlength);
        self
    }

    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn time_format(mut self, format: TimeFormat) -> Self {
        self.time_format = format;
        self
    }

    pub fn interval(mut self, minutes: u32) -> Self {
        self.interval = minutes.max(1);
        self
    }

    pub fn years(mut self, min: i32, max: i32) -> Self {
        self.min_year = Some(min);
        self.max_year = Some(max);
        self
    }

    pub fn attr(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.attributes.set(key, value);
        self
    }

    /// Fill every option still at its default from `defaults`; attributes
    /// are merged with these winning
    pub fn merged_over(mut self, defaults: &InputOptions) -> Self {
        let base = InputOptions::default();
        inherit(&mut self.input_type, &base.input_type, &defaults.input_type);
        inherit(&mut self.label, &base.label, &defaults.label);
        inherit(&mut self.div, &base.div, &defaults.div);
        inherit(&mut self.error, &base.error, &defaults.error);
        inherit(&mut self.options, &base.options, &defaults.options);
        inherit(&mut self.empty, &base.empty, &defaults.empty);
        inherit(&mut self.multiple, &base.multiple, &defaults.multiple);
        inherit(&mut self.value, &base.value, &defaults.value);
        inherit(&mut self.default, &base.default, &defaults.default);
        inherit(&mut self.checked, &base.checked, &defaults.checked);
        inherit(&mut self.secure, &base.secure, &defaults.secure);
        inherit(&mut self.disabled, &base.disabled, &defaults.disabled);
        inherit(&mut self.escape, &base.escape, &defaults.escape);
        inherit(&mut self.hidden_field, &base.hidden_field, &defaults.hidden_field);
        inherit(&mut self.legend, &base.legend, &defaults.legend);
        inherit(&mut self.separator, &base.separator, &defaults.separator);
        inherit(&mut self.before, &base.before, &defaults.before);
        inherit(&mut self.between, &base.between, &defaults.between);
        inherit(&mut self.after, &base.after, &defaults.after);
        inherit(&mut self.format, &base.format, &defaults.format);
        inherit(&mut self.rows, &base.rows, &defaults.rows);
        inherit(&mut self.cols, &base.cols, &defaults.cols);
        inherit(&mut self.maxlength, &base.maxlength, &defaults.maxlength);
        inherit(&mut self.step, &base.step, &defaults.step);
        inherit(&mut self.date_format, &base.date_format, &defaults.date_format);
        inherit(&mut self.time_format, &base.time_format, &defaults.time_format);
        inherit(&mut self.interval, &base.interval, &defaults.interval);
        inherit(&mut self.min_year, &base.min_year, &defaults.min_year);
        inherit(&mut self.max_year, &base.max_year, &defaults.max_year);
        let mut attributes = defaults.attributes.clone();
        attributes.merge(&self.attributes);
        self.attributes = attributes;
        self
    }
}

fn inherit<T: PartialEq + Clone>(value: &mut T, base: &T, fallback: &T) {
    if value == base {
        *value = fallback.clone();
    }
}
