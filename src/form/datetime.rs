//! Date and time pickers: one select per component.

use crate::form::field::FieldPath;
use crate::form::html::Attributes;
use crate::form::input_type::InputType;
use crate::form::model::{PostedValue, RequestData};
use crate::form::options::{EmptyOption, InputOptions, OptionList, Secure, TimeFormat};
use crate::form::security::FormSecurity;
use crate::form::widgets::select_element;
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Years offered on each side of the current year
const YEAR_SPAN: i32 = 20;

/// One component select of a date/time input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Picker {
    Day,
    Month,
    Year,
    Hour,
    Minute,
    Meridian,
}

impl Picker {
    /// Key of the component under the field, `data[Model][field][<key>]`
    pub fn key(&self) -> &'static str {
        match self {
            Picker::Day => "day",
            Picker::Month => "month",
            Picker::Year => "year",
            Picker::Hour => "hour",
            Picker::Minute => "min",
            Picker::Meridian => "meridian",
        }
    }
}

/// Components of a posted or default date/time value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Moment {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    hour: Option<u32>,
    minute: Option<u32>,
}

impl Moment {
    fn parse(text: &str) -> Moment {
        let text = text.trim();
        let date = |d: NaiveDate| Moment {
            year: Some(d.year()),
            month: Some(d.month()),
            day: Some(d.day()),
            ..Moment::default()
        };
        let time = |t: NaiveTime| Moment {
            hour: Some(t.hour()),
            minute: Some(t.minute()),
            ..Moment::default()
        };
        for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
                return Moment {
                    hour: Some(datetime.hour()),
                    minute: Some(datetime.minute()),
                    ..date(datetime.date())
                };
            }
        }
        if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return date(d);
        }
        for format in ["%H:%M:%S", "%H:%M"] {
            if let Ok(t) = NaiveTime::parse_from_str(text, format) {
                return time(t);
            }
        }
        Moment::default()
    }
}

fn pickers(input_type: InputType, options: &InputOptions) -> Vec<Picker> {
    let date: Vec<Picker> = options
        .date_format
        .chars()
        .filter_map(|c| match c.to_ascii_uppercase() {
            'D' => Some(Picker::Day),
            'M' => Some(Picker::Month),
            'Y' => Some(Picker::Year),
            _ => None,
        })
        .collect();
    let mut time = vec![Picker::Hour, Picker::Minute];
    if options.time_format == TimeFormat::Twelve {
        time.push(Picker::Meridian);
    }
    match input_type {
        InputType::Date => date,
        InputType::Time => time,
        _ => date.into_iter().chain(time).collect(),
    }
}

/// DOM id suffix of the first picker, which labels point at
pub(crate) fn label_suffix(input_type: InputType, options: &InputOptions) -> Option<&'static str> {
    pickers(input_type, options).first().map(|picker| match picker {
        Picker::Day => "Day",
        Picker::Month => "Month",
        Picker::Year => "Year",
        Picker::Hour => "Hour",
        Picker::Minute => "Min",
        Picker::Meridian => "Meridian",
    })
}

fn padded(values: impl Iterator<Item = u32>) -> OptionList {
    values.map(|v| (format!("{:02}", v), format!("{:02}", v))).collect()
}

fn picker_options(picker: Picker, options: &InputOptions) -> OptionList {
    match picker {
        Picker::Day => padded(1..=31),
        Picker::Month => MONTH_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| (format!("{:02}", i + 1), name.to_string()))
            .collect(),
        Picker::Year => {
            let current = Local::now().year();
            let min = options.min_year.unwrap_or(current - YEAR_SPAN);
            let max = options.max_year.unwrap_or(current + YEAR_SPAN);
            (min..=max)
                .rev()
                .map(|year| (year.to_string(), year.to_string()))
                .collect()
        }
        Picker::Hour => match options.time_format {
            TimeFormat::Twelve => padded(1..=12),
            TimeFormat::TwentyFour => padded(0..=23),
        },
        Picker::Minute => padded((0..60).step_by(options.interval.max(1) as usize)),
        Picker::Meridian => [("am", "am"), ("pm", "pm")].into_iter().collect(),
    }
}

fn picker_value(picker: Picker, moment: &Moment, options: &InputOptions) -> Option<String> {
    let twelve = options.time_format == TimeFormat::Twelve;
    match picker {
        Picker::Day => moment.day.map(|d| format!("{:02}", d)),
        Picker::Month => moment.month.map(|m| format!("{:02}", m)),
        Picker::Year => moment.year.map(|y| y.to_string()),
        Picker::Hour => moment.hour.map(|h| match (twelve, h % 12) {
            (true, 0) => "12".to_string(),
            (true, h12) => format!("{:02}", h12),
            (false, _) => format!("{:02}", h),
        }),
        Picker::Minute => {
            let interval = options.interval.max(1);
            moment.minute.map(|m| format!("{:02}", m - m % interval))
        }
        Picker::Meridian => moment
            .hour
            .map(|h| if h < 12 { "am" } else { "pm" }.to_string()),
    }
}

fn whole_value(path: &FieldPath, options: &InputOptions, request: &RequestData) -> Moment {
    options
        .value
        .as_deref()
        .or_else(|| request.value(path).and_then(PostedValue::as_text))
        .or(options.default.as_deref())
        .map(Moment::parse)
        .unwrap_or_default()
}

fn secure_mode(options: &InputOptions) -> Secure {
    if options.disabled {
        Secure::Skip
    } else {
        options.secure.unwrap_or(Secure::Lock)
    }
}

/// One component select, registered under `path.<key>`
fn render_picker(
    path: &FieldPath,
    picker: Picker,
    moment: &Moment,
    empty: &EmptyOption,
    options: &InputOptions,
    request: &RequestData,
    security: &mut FormSecurity,
) -> String {
    let child = path.child(picker.key());
    let selected: Vec<String> = request
        .value(&child)
        .and_then(PostedValue::as_text)
        .map(str::to_string)
        .or_else(|| picker_value(picker, moment, options))
        .into_iter()
        .collect();
    let mut attributes = Attributes::new()
        .with("name", child.input_name())
        .with("id", child.dom_id());
    if options.disabled {
        attributes.set("disabled", true);
    }
    let html = select_element(
        &attributes,
        &picker_options(picker, options),
        &selected,
        empty,
        true,
    );
    security.register(&child, secure_mode(options), None);
    html
}

/// Render the pickers of a date, time or datetime input
pub(crate) fn render(
    path: &FieldPath,
    input_type: InputType,
    options: &InputOptions,
    request: &RequestData,
    security: &mut FormSecurity,
) -> String {
    let moment = whole_value(path, options, request);
    let empty = options.empty.clone().unwrap_or(EmptyOption::Disabled);

    let mut out = String::new();
    let mut previous: Option<Picker> = None;
    for picker in pickers(input_type, options) {
        if let Some(previous) = previous {
            out.push_str(match (previous, picker) {
                (Picker::Hour, Picker::Minute) => ":",
                (Picker::Minute, Picker::Meridian) => " ",
                (Picker::Day | Picker::Month | Picker::Year, Picker::Hour) => " ",
                _ => "-",
            });
        }
        previous = Some(picker);
        out.push_str(&render_picker(
            path, picker, &moment, &empty, options, request, security,
        ));
    }
    out
}

/// A single component select on its own; offers a blank option unless
/// `empty` says otherwise
pub(crate) fn render_part(
    path: &FieldPath,
    picker: Picker,
    options: &InputOptions,
    request: &RequestData,
    security: &mut FormSecurity,
) -> String {
    let moment = whole_value(path, options, request);
    let empty = options.empty.clone().unwrap_or(EmptyOption::Blank);
    render_picker(path, picker, &moment, &empty, options, request, security)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_moment() {
        let moment = Moment::parse("2024-03-05 14:07:00");
        assert_eq!(moment.year, Some(2024));
        assert_eq!(moment.month, Some(3));
        assert_eq!(moment.day, Some(5));
        assert_eq!(moment.hour, Some(14));
        assert_eq!(moment.minute, Some(7));
        assert_eq!(Moment::parse("09:30").hour, Some(9));
        assert_eq!(Moment::parse("not a date"), Moment::default());
    }

    #[test]
    fn test_picker_order_and_label() {
        let options = InputOptions::new();
        assert_eq!(
            pickers(InputType::Datetime, &options),
            vec![
                Picker::Month,
                Picker::Day,
                Picker::Year,
                Picker::Hour,
                Picker::Minute,
                Picker::Meridian
            ]
        );
        assert_eq!(label_suffix(InputType::Date, &options), Some("Month"));
        assert_eq!(label_suffix(InputType::Time, &options), Some("Hour"));
        let dmy = InputOptions::new().date_format("DMY");
        assert_eq!(label_suffix(InputType::Date, &dmy), Some("Day"));
    }

    #[test]
    fn test_twelve_hour_values() {
        let options = InputOptions::new().interval(15);
        let moment = Moment::parse("00:50");
        assert_eq!(picker_value(Picker::Hour, &moment, &options).as_deref(), Some("12"));
        assert_eq!(picker_value(Picker::Minute, &moment, &options).as_deref(), Some("45"));
        assert_eq!(picker_value(Picker::Meridian, &moment, &options).as_deref(), Some("am"));
        let evening = Moment::parse("21:05");
        assert_eq!(picker_value(Picker::Hour, &evening, &options).as_deref(), Some("09"));
        let military = InputOptions::new().time_format(TimeFormat::TwentyFour);
        assert_eq!(picker_value(Picker::Hour, &evening, &military).as_deref(), Some("21"));
        assert_eq!(picker_options(Picker::Minute, &options).len(), 4);
    }

    #[test]
    fn test_render_date() {
        let path = FieldPath::parse("published_on", Some("Post"));
        let options = InputOptions::new().years(2023, 2024);
        let request = RequestData::default().with_value("Post.published_on", "2024-02-29");
        let mut security = FormSecurity::new("salt");
        let html = render(&path, InputType::Date, &options, &request, &mut security);

        assert!(html.starts_with(
            "<select name=\"data[Post][published_on][month]\" id=\"PostPublishedOnMonth\">\n"
        ));
        assert!(html.contains("<option value=\"02\" selected=\"selected\">February</option>"));
        assert!(html.contains("<option value=\"29\" selected=\"selected\">29</option>"));
        assert!(html.contains(
            "</select>-<select name=\"data[Post][published_on][year]\" id=\"PostPublishedOnYear\">\n\
             <option value=\"2024\" selected=\"selected\">2024</option>\n\
             <option value=\"2023\">2023</option>\n</select>"
        ));
        assert_eq!(
            security.locked_fields(),
            [
                "Post.published_on.month",
                "Post.published_on.day",
                "Post.published_on.year"
            ]
        );
    }

    #[test]
    fn test_render_time_from_components() {
        let path = FieldPath::parse("starts", Some("Event"));
        let options = InputOptions::new()
            .time_format(TimeFormat::TwentyFour)
            .empty(EmptyOption::Blank);
        let request = RequestData::default()
            .with_value("Event.starts.hour", "08")
            .with_value("Event.starts.min", "30");
        let mut security = FormSecurity::new("salt");
        let html = render(&path, InputType::Time, &options, &request, &mut security);
        assert!(html.contains("id=\"EventStartsHour\">\n<option value=\"\"></option>"));
        assert!(html.contains("<option value=\"08\" selected=\"selected\">08</option>"));
        assert!(html.contains("</select>:<select name=\"data[Event][starts][min]\""));
        assert!(html.contains("<option value=\"30\" selected=\"selected\">30</option>"));
        assert!(!html.contains("meridian"));
    }

    #[test]
    fn test_render_single_part() {
        let path = FieldPath::parse("published_on", Some("Post"));
        let request = RequestData::default().with_value("Post.published_on", "2024-02-29 18:20:00");
        let mut security = FormSecurity::new("salt");

        let html = render_part(&path, Picker::Hour, &InputOptions::new(), &request, &mut security);
        assert!(html.starts_with(
            "<select name=\"data[Post][published_on][hour]\" id=\"PostPublishedOnHour\">\n\
             <option value=\"\"></option>"
        ));
        assert!(html.contains("<option value=\"06\" selected=\"selected\">06</option>"));

        let options = InputOptions::new().empty(EmptyOption::Disabled).secure(Secure::Unlock);
        let html = render_part(&path, Picker::Meridian, &options, &request, &mut security);
        assert!(!html.contains("<option value=\"\">"));
        assert!(html.contains("<option value=\"pm\" selected=\"selected\">pm</option>"));

        assert_eq!(security.locked_fields(), ["Post.published_on.hour"]);
        assert_eq!(security.unlocked_fields(), ["Post.published_on.meridian"]);
    }
}
