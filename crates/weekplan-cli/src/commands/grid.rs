//! Availability grid commands for CLI.

use std::collections::HashMap;

use chrono::Weekday;
use clap::Subcommand;
use weekplan_core::{AvailabilityGrid, Category, Config, HourRange, PlanDb, WEEK};

use super::{find_category, parse_day, print_json, CmdResult};

const COLUMN: usize = 10;

#[derive(Subcommand)]
pub enum GridAction {
    /// Print the weekly grid
    Show {
        /// Output the stored grid as JSON
        #[arg(long)]
        json: bool,
    },
    /// Paint a category onto hours of one day
    Set {
        /// Day: mon..sun, a full name, or 1..7
        #[arg(value_parser = parse_day)]
        day: Weekday,
        /// First hour to paint
        from: u8,
        /// Last hour to paint (defaults to `from`)
        #[arg(long)]
        to: Option<u8>,
        /// Category id or name; "none" clears the cells
        category: String,
    },
    /// Change the visible hour range (inclusive)
    Hours { start: u8, end: u8 },
    /// Empty every cell
    Clear,
}

pub fn run(action: GridAction) -> CmdResult {
    let db = PlanDb::open()?;
    let mut config = Config::load()?;
    let mut grid = db.load_grid(config.hour_range())?;

    match action {
        GridAction::Show { json } => {
            if json {
                print_json(&grid)?;
            } else {
                print!("{}", render(&grid, &db.list_categories()?));
            }
        }
        GridAction::Set {
            day,
            from,
            to,
            category,
        } => {
            let id = if category.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(find_category(&db, &category)?.id)
            };
            let to = to.unwrap_or(from);
            grid.paint(day, from, to, id.as_deref())?;
            db.save_grid(&grid)?;
            eprintln!("Painted {day} {from:02}:00-{:02}:00", to + 1);
        }
        GridAction::Hours { start, end } => {
            let hours = HourRange::new(start, end)?;
            config.grid.start_hour = hours.start;
            config.grid.end_hour = hours.end;
            config.save()?;
            rekey_stored(&db, hours)?;
            eprintln!("Grid hours set to {start}..={end}");
        }
        GridAction::Clear => {
            grid.clear();
            db.save_grid(&grid)?;
            eprintln!("Grid cleared");
        }
    }
    Ok(())
}

/// Re-key the stored grid so it covers exactly `hours`.
pub fn rekey_stored(db: &PlanDb, hours: HourRange) -> weekplan_core::error::Result<()> {
    let mut grid = db.load_grid(hours)?;
    grid.rekey(hours);
    db.save_grid(&grid)
}

/// Text table: one row per hour, one column per day. Empty cells show `.`,
/// cells whose category was deleted show `?`.
fn render(grid: &AvailabilityGrid, categories: &[Category]) -> String {
    let names: HashMap<&str, &str> = categories
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();

    let mut out = format!("{:6}", "");
    for day in WEEK {
        out.push_str(&format!("{:<COLUMN$}", day.to_string()));
    }
    out = out.trim_end().to_string();
    out.push('\n');

    for hour in grid.hours().hours() {
        let mut line = format!("{hour:02}:00 ");
        for day in WEEK {
            let label = match grid.get(day, hour) {
                None => ".",
                Some(id) => names.get(id).copied().unwrap_or("?"),
            };
            let label: String = label.chars().take(COLUMN - 1).collect();
            line.push_str(&format!("{label:<COLUMN$}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekplan_core::Context;

    #[test]
    fn render_shows_names_empty_and_dangling_cells() {
        let mut grid = AvailabilityGrid::new(HourRange::new(8, 9).unwrap());
        grid.set(Weekday::Mon, 8, Some("hw".into())).unwrap();
        grid.set(Weekday::Tue, 8, Some("gone".into())).unwrap();
        let categories = vec![Category::new("hw", "Homework", Context::Home)];

        let text = render(&grid, &categories);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("      Mon"));
        assert!(lines[1].starts_with("08:00 Homework  ?"));
        assert!(lines[2].starts_with("09:00 ."));
    }

    #[test]
    fn long_names_are_truncated() {
        let mut grid = AvailabilityGrid::new(HourRange::new(8, 8).unwrap());
        grid.set(Weekday::Mon, 8, Some("pl".into())).unwrap();
        let categories = vec![Category::new("pl", "Placement at the bakery", Context::Placement)];
        let text = render(&grid, &categories);
        assert!(text.contains("08:00 Placement ."));
    }
}
