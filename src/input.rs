use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Date of birth is required")]
    Missing,
    #[error("'{0}' is not a date, expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// One line typed at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Submit(NaiveDate),
    ToggleTheme,
    Clear,
    Quit,
}

pub fn parse_birth_date(raw: &str) -> Result<NaiveDate, InputError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(InputError::Missing);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| InputError::InvalidDate(raw.to_string()))
}

pub fn parse_command(line: &str) -> Result<Command, InputError> {
    match line.trim().to_ascii_lowercase().as_str() {
        "theme" => Ok(Command::ToggleTheme),
        "clear" => Ok(Command::Clear),
        "quit" | "exit" => Ok(Command::Quit),
        _ => parse_birth_date(line).map(Command::Submit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_date() {
        assert_eq!(
            parse_command(" 1990-03-10\n"),
            Ok(Command::Submit(NaiveDate::from_ymd_opt(1990, 3, 10).unwrap()))
        );
    }

    #[test]
    fn empty_line_is_missing_date() {
        assert_eq!(parse_command("   "), Err(InputError::Missing));
        assert_eq!(parse_birth_date(""), Err(InputError::Missing));
    }

    #[test]
    fn rejects_impossible_dates() {
        assert_eq!(
            parse_birth_date("2023-02-29"),
            Err(InputError::InvalidDate("2023-02-29".into()))
        );
        assert!(parse_birth_date("10/03/1990").is_err());
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(parse_command("Theme"), Ok(Command::ToggleTheme));
        assert_eq!(parse_command("CLEAR"), Ok(Command::Clear));
        assert_eq!(parse_command("exit"), Ok(Command::Quit));
    }
}
