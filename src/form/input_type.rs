//! Closed set of input widget kinds.

use crate::form::error::FormError;
use crate::schema::ColumnType;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputType {
    Text,
    Password,
    Email,
    Url,
    Search,
    Tel,
    Number,
    Color,
    Range,
    Textarea,
    Hidden,
    File,
    Checkbox,
    Radio,
    Select,
    Date,
    Time,
    Datetime,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Password => "password",
            InputType::Email => "email",
            InputType::Url => "url",
            InputType::Search => "search",
            InputType::Tel => "tel",
            InputType::Number => "number",
            InputType::Color => "color",
            InputType::Range => "range",
            InputType::Textarea => "textarea",
            InputType::Hidden => "hidden",
            InputType::File => "file",
            InputType::Checkbox => "checkbox",
            InputType::Radio => "radio",
            InputType::Select => "select",
            InputType::Date => "date",
            InputType::Time => "time",
            InputType::Datetime => "datetime",
        }
    }

    /// Widget inferred from a column type
    pub fn from_column_type(column_type: ColumnType) -> Option<InputType> {
        match column_type {
            ColumnType::String => Some(InputType::Text),
            ColumnType::Text => Some(InputType::Textarea),
            ColumnType::Boolean => Some(InputType::Checkbox),
            ColumnType::Date => Some(InputType::Date),
            ColumnType::Time => Some(InputType::Time),
            ColumnType::Datetime | ColumnType::Timestamp => Some(InputType::Datetime),
            ColumnType::Float | ColumnType::Integer => Some(InputType::Number),
            ColumnType::BigInteger
            | ColumnType::Decimal
            | ColumnType::Uuid
            | ColumnType::Binary => None,
        }
    }

    pub fn is_date_time(&self) -> bool {
        matches!(self, InputType::Date | InputType::Time | InputType::Datetime)
    }

    /// Types that take an option list
    pub fn takes_options(&self) -> bool {
        matches!(self, InputType::Checkbox | InputType::Radio | InputType::Select)
    }
}

impl FromStr for InputType {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input_type = match s.to_ascii_lowercase().as_str() {
            "text" => InputType::Text,
            "password" => InputType::Password,
            "email" => InputType::Email,
            "url" => InputType::Url,
            "search" => InputType::Search,
            "tel" => InputType::Tel,
            "number" => InputType::Number,
            "color" => InputType::Color,
            "range" => InputType::Range,
            "textarea" => InputType::Textarea,
            "hidden" => InputType::Hidden,
            "file" => InputType::File,
            "checkbox" => InputType::Checkbox,
            "radio" => InputType::Radio,
            "select" => InputType::Select,
            "date" => InputType::Date,
            "time" => InputType::Time,
            "datetime" => InputType::Datetime,
            _ => return Err(FormError::UnknownInputType(s.to_string())),
        };
        Ok(input_type)
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
