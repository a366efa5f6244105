pub mod category;
pub mod config;
pub mod export;
pub mod grid;
pub mod schedule;
pub mod task;

use chrono::{NaiveDate, Weekday};
use serde::Serialize;
use weekplan_core::{Category, PlanDb};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parse a `YYYY-MM-DD` date argument.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| format!("invalid date '{s}', expected YYYY-MM-DD"))
}

/// Parse a weekday argument: `mon`, `Monday`, or 1..=7 with Monday as 1.
pub fn parse_day(s: &str) -> Result<Weekday, String> {
    if let Ok(n) = s.parse::<u8>() {
        return match n {
            1..=7 => Ok(weekplan_core::WEEK[usize::from(n - 1)]),
            _ => Err(format!("day number {n} is outside 1..=7")),
        };
    }
    s.parse::<Weekday>()
        .map_err(|_| format!("unknown day '{s}'"))
}

/// Find a category by id, then by case-insensitive name.
pub fn find_category(db: &PlanDb, key: &str) -> Result<Category, Box<dyn std::error::Error>> {
    if let Some(category) = db.get_category(key)? {
        return Ok(category);
    }
    db.list_categories()?
        .into_iter()
        .find(|c| c.name.eq_ignore_ascii_case(key))
        .ok_or_else(|| format!("category not found: {key}").into())
}
