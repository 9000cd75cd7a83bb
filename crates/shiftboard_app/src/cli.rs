use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{ArgAction, Args, Parser, Subcommand};
use shiftboard_core::SHIRT_SIZES;

#[derive(Parser)]
#[command(name = "shiftboard")]
#[command(version)]
#[command(about = "Manage volunteers, jobs and shifts for the event", long_about = None)]
pub struct Cli {
    /// RON config file; missing means defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL, overriding the config file
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// More log output on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Volunteer roster and editor
    #[command(subcommand)]
    Volunteers(VolunteersCommand),
    /// Jobs grouped by location
    #[command(subcommand)]
    Jobs(JobsCommand),
    /// Shift assignments
    #[command(subcommand)]
    Shifts(ShiftsCommand),
    /// Summaries
    #[command(subcommand)]
    Stats(StatsCommand),
}

#[derive(Subcommand)]
pub enum VolunteersCommand {
    /// List volunteers, optionally filtered by name, email or phone
    List {
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Show one volunteer with their shifts
    Show {
        id: String,
        /// Also list every shift with the volunteer's selection
        #[arg(long)]
        shifts: bool,
    },
    /// Edit fields and save
    Edit {
        id: String,
        #[command(flatten)]
        fields: VolunteerFields,
        /// Ask the server to email the volunteer about the change
        #[arg(long)]
        send_email: bool,
    },
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Default)]
pub struct VolunteerFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long, value_parser = clap::builder::PossibleValuesParser::new(SHIRT_SIZES.iter().copied()))]
    pub shirt_size: Option<String>,
    #[arg(long)]
    pub referral: Option<String>,
    #[arg(long)]
    pub emergency_name: Option<String>,
    #[arg(long)]
    pub emergency_phone: Option<String>,
    #[arg(long)]
    pub emergency_email: Option<String>,
}

#[derive(Subcommand)]
pub enum JobsCommand {
    List,
    /// Edit an existing job, or create one with --new
    Edit {
        #[arg(required_unless_present = "new", conflicts_with = "new")]
        id: Option<String>,
        #[arg(long)]
        new: bool,
        #[command(flatten)]
        fields: JobFields,
    },
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Default)]
pub struct JobFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Location id, one of those already used by a job
    #[arg(long)]
    pub location: Option<String>,
    /// Add a shift as START,END (RFC 3339)
    #[arg(long, value_parser = parse_window)]
    pub add_shift: Vec<ShiftWindowArg>,
    /// Add shifts that continue after the last one, same length
    #[arg(long, default_value_t = 0)]
    pub repeat_shift: u32,
    /// Capacity for every added shift
    #[arg(long, default_value_t = 1)]
    pub capacity: u32,
    #[arg(long)]
    pub remove_shift: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindowArg {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

fn parse_window(value: &str) -> Result<ShiftWindowArg, String> {
    let (start, end) = value
        .split_once(',')
        .ok_or_else(|| format!("expected START,END but got {value:?}"))?;
    let parse = |text: &str| {
        DateTime::parse_from_rfc3339(text.trim())
            .map(|time| time.with_timezone(&Utc))
            .map_err(|err| format!("{text:?}: {err}"))
    };
    Ok(ShiftWindowArg {
        start: parse(start)?,
        end: parse(end)?,
    })
}

#[derive(Subcommand)]
pub enum ShiftsCommand {
    /// Flip a volunteer's assignment to a shift
    Toggle { volunteer: String, shift: String },
}

#[derive(Subcommand)]
pub enum StatsCommand {
    /// Sign-ups per day
    Registrations,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn window_parses_offsets_to_utc() {
        let window = parse_window("2024-08-06T10:00:00+02:00, 2024-08-06T12:00:00Z").unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 8, 6, 8, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2024, 8, 6, 12, 0, 0).unwrap());
        assert!(parse_window("2024-08-06T10:00:00Z").is_err());
    }

    #[test]
    fn shirt_size_is_restricted() {
        let parsed = Cli::try_parse_from([
            "shiftboard", "volunteers", "edit", "v1", "--shirt-size", "XL",
        ]);
        assert!(parsed.is_ok());
        let parsed = Cli::try_parse_from([
            "shiftboard", "volunteers", "edit", "v1", "--shirt-size", "huge",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn job_edit_needs_id_or_new() {
        assert!(Cli::try_parse_from(["shiftboard", "jobs", "edit"]).is_err());
        assert!(Cli::try_parse_from(["shiftboard", "jobs", "edit", "--new"]).is_ok());
        assert!(Cli::try_parse_from(["shiftboard", "jobs", "edit", "j1", "--new"]).is_err());
    }
}
