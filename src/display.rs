use serde::{Deserialize, Serialize};

use crate::age::AgeBreakdown;
use crate::birthday::BirthdayCountdown;
use crate::driver::Snapshot;

const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

pub struct ThemeColors {
    pub text: &'static str,
    pub key: &'static str,
    pub value: &'static str,
    pub error: &'static str,
    pub banner: &'static str,
}

impl Theme {
    pub fn colors(self) -> ThemeColors {
        match self {
            Theme::Dark => ThemeColors {
                text: "\x1b[38;2;201;209;217m",
                key: "\x1b[38;2;255;166;87m",
                value: "\x1b[38;2;165;214;255m",
                error: "\x1b[38;2;255;123;114m",
                banner: "\x1b[1;38;2;210;168;255m",
            },
            Theme::Light => ThemeColors {
                text: "\x1b[38;2;36;41;47m",
                key: "\x1b[38;2;215;58;73m",
                value: "\x1b[38;2;3;102;214m",
                error: "\x1b[38;2;207;34;46m",
                banner: "\x1b[1;38;2;130;80;223m",
            },
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Label of the button that switches away from this theme.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Dark => "Light Mode",
            Theme::Light => "Dark Mode",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn plural(n: i64) -> &'static str {
    if n == 1 { "" } else { "s" }
}

fn count(n: i64, unit: &str) -> String {
    format!("{n} {unit}{}", plural(n))
}

fn line(colors: &ThemeColors, key: &str, value: &str) -> String {
    format!("{}{key}:{RESET} {}{value}{RESET}\n", colors.key, colors.value)
}

fn age_lines(age: &AgeBreakdown, colors: &ThemeColors) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}Your age is:{RESET}\n", colors.text));
    out.push_str(&line(
        colors,
        "Age",
        &format!(
            "{}, {}, {}",
            count(age.years, "year"),
            count(age.months, "month"),
            count(age.days, "day")
        ),
    ));
    out.push_str(&line(
        colors,
        "Time",
        &format!(
            "{}, {}, {}",
            count(age.hours.into(), "hour"),
            count(age.minutes.into(), "minute"),
            count(age.seconds.into(), "second")
        ),
    ));
    out.push_str(&line(
        colors,
        "Total",
        &format!(
            "{}, {}",
            count(age.total_months, "month"),
            count(age.total_days, "day")
        ),
    ));
    out
}

fn countdown_value(countdown: &BirthdayCountdown) -> String {
    format!(
        "{}, {}, {}, {}",
        count(countdown.days, "day"),
        count(countdown.hours, "hour"),
        count(countdown.minutes, "minute"),
        count(countdown.seconds, "second")
    )
}

/// Renders a snapshot as coloured terminal text.
///
/// A future birth date shows only the error; the countdown is shown either way.
pub fn render_text(snapshot: &Snapshot, theme: Theme) -> String {
    let colors = theme.colors();
    let mut out = String::new();

    match &snapshot.age {
        Err(err) => {
            out.push_str(&format!("{}{err}{RESET}\n", colors.error));
        }
        Ok(age) => {
            if snapshot.birthday_today {
                out.push_str(&format!("{}Happy Birthday! 🎉{RESET}\n", colors.banner));
            }
            out.push_str(&age_lines(age, &colors));
        }
    }

    out.push_str(&line(
        &colors,
        "Next Birthday in",
        &countdown_value(&snapshot.countdown),
    ));
    out
}

#[derive(Serialize)]
struct JsonSnapshot<'a> {
    birth_date: String,
    taken_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    age: Option<&'a AgeBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
    next_birthday: &'a BirthdayCountdown,
    birthday_today: bool,
}

/// One JSON object per snapshot, without a trailing newline.
pub fn render_json(snapshot: &Snapshot) -> serde_json::Result<String> {
    let view = JsonSnapshot {
        birth_date: snapshot.birth_date.format("%Y-%m-%d").to_string(),
        taken_at: snapshot.taken_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
        age: snapshot.age.as_ref().ok(),
        error: snapshot.age.as_ref().err().map(|_| "FUTURE_DATE"),
        next_birthday: &snapshot.countdown,
        birthday_today: snapshot.birthday_today,
    };
    serde_json::to_string(&view)
}
