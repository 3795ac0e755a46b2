//! Form-input resolution and HTML form rendering.
//!
//! [`FormBuilder`] resolves the widget of each field from caller options and
//! model metadata, renders it with its label, error message and wrapping div,
//! and tracks every rendered field in a [`FormSecurity`] registry whose hash
//! is emitted when the form closes.

pub mod builder;
mod datetime;
pub mod error;
pub mod field;
pub mod html;
pub mod inflector;
pub mod input_type;
pub mod model;
pub mod options;
pub mod resolver;
pub mod security;
mod widgets;

pub use builder::{FormBuilder, FormMethod, FormOptions};
pub use datetime::Picker;
pub use error::{FormError, FormResult};
pub use field::FieldPath;
pub use html::{AttrValue, Attributes};
pub use input_type::InputType;
pub use model::{ModelContext, ModelSchema, PostedValue, RequestData, SecurityToken};
pub use options::{
    DivOption, EmptyOption, ErrorOption, FormatElement, HiddenField, InputOptions, LabelOption,
    Legend, Multiple, OptionEntry, OptionList, Secure, SelectOption, TimeFormat,
};
pub use resolver::{resolve, OptionBindings, ResolvedInput};
pub use security::FormSecurity;
