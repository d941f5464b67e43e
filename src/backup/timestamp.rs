//! Rendering and parsing snapshot timestamps with strftime-style formats

use std::fmt::Write;

use chrono::format::{parse as parse_items, Item, ParseResult, Parsed, StrftimeItems};
use chrono::{DateTime, Local, NaiveDateTime};

use crate::error::{SnapkeepError, SnapkeepResult};

/// Render `now` with `format`, producing a string usable as part of a
/// directory name
pub fn render(now: &DateTime<Local>, format: &str) -> SnapkeepResult<String> {
    let invalid = |reason: &str| SnapkeepError::TimestampFormat {
        format: format.to_string(),
        reason: reason.to_string(),
    };

    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(invalid("unsupported or incomplete conversion specifier"));
    }

    let mut rendered = String::new();
    write!(rendered, "{}", now.format_with_items(items.iter()))
        .map_err(|_| invalid("format cannot be rendered for the current time"))?;

    if rendered.is_empty() {
        return Err(invalid("format renders to an empty name"));
    }
    if rendered.contains('/') || rendered.contains('\\') {
        return Err(invalid("rendered timestamp contains a path separator"));
    }

    Ok(rendered)
}

/// Parse a rendered timestamp back into a point in time
///
/// The whole input must match the format. Fields the format does not carry
/// take strptime's defaults: year 1900, January, day 1, midnight.
pub fn parse(value: &str, format: &str) -> Option<NaiveDateTime> {
    let mut parsed = Parsed::new();
    parse_items(&mut parsed, value, StrftimeItems::new(format)).ok()?;

    if parsed.timestamp().is_some() {
        return parsed.to_naive_datetime_with_offset(0).ok();
    }

    fill_missing_fields(&mut parsed).ok()?;
    let date = parsed.to_naive_date().ok()?;
    let time = parsed.to_naive_time().ok()?;
    Some(date.and_time(time))
}

fn fill_missing_fields(parsed: &mut Parsed) -> ParseResult<()> {
    let has_year = parsed.year().is_some()
        || parsed.year_div_100().is_some()
        || parsed.year_mod_100().is_some()
        || parsed.isoyear().is_some()
        || parsed.isoyear_div_100().is_some()
        || parsed.isoyear_mod_100().is_some();
    if !has_year {
        parsed.set_year(1900)?;
    }

    // Ordinal and week-based dates pin the day on their own
    let has_day_of_year = parsed.ordinal().is_some()
        || parsed.week_from_sun().is_some()
        || parsed.week_from_mon().is_some()
        || parsed.isoweek().is_some();
    if !has_day_of_year {
        if parsed.month().is_none() {
            parsed.set_month(1)?;
        }
        if parsed.day().is_none() {
            parsed.set_day(1)?;
        }
    }

    match (parsed.hour_div_12(), parsed.hour_mod_12()) {
        (None, None) => parsed.set_hour(0)?,
        (None, Some(_)) => parsed.set_ampm(false)?,
        (Some(pm), None) => parsed.set_hour(i64::from(pm) * 12)?,
        (Some(_), Some(_)) => {}
    }
    if parsed.minute().is_none() {
        parsed.set_minute(0)?;
    }
    if parsed.second().is_none() {
        parsed.set_second(0)?;
    }
    Ok(())
}

/// Check a format without needing a real clock reading
pub fn check_format(format: &str) -> SnapkeepResult<()> {
    render(&Local::now(), format).map(|_| ())
}
