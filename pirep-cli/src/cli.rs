use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use inquire::{Select, Text};
use pirep_core::{
    AssignmentTable, Config, CoreError, Sector, SectorReport, Snapshot, SourceKind,
    normalize::pirep::parse_report_time,
    source::{aviationweather::DEFAULT_METAR_URL, default_source_from_config},
};
use std::path::PathBuf;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "pirep", version, about = "Which stations need a fresh PIREP")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct ViewArgs {
    /// Print the board as JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Evaluate freshness at this UTC time ("YYYY-MM-DD HH:MM:SS") instead of now.
    #[arg(long)]
    pub now: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively configure the report source, assignment table and default sector.
    Configure,

    /// Show the board for one sector.
    Show {
        /// Sector name, e.g. "NORTH". Defaults to the configured sector.
        sector: Option<String>,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Show the boards for every sector.
    All {
        #[command(flatten)]
        view: ViewArgs,
    },

    /// List the sector names.
    Sectors,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure()?,
            Command::Show { sector, view } => {
                let config = Config::load()?;
                let sector = resolve_sector(sector, &config)?;
                let now = resolve_now(view.now.as_deref())?;

                let (snapshot, table) = fetch(&config).await?;
                print_reports(&[snapshot.sector(sector, &table, now)], view.json)?;
            }
            Command::All { view } => {
                let config = Config::load()?;
                let now = resolve_now(view.now.as_deref())?;

                let (snapshot, table) = fetch(&config).await?;
                print_reports(&snapshot.aggregate_all(&table, now), view.json)?;
            }
            Command::Sectors => {
                for sector in Sector::all() {
                    println!("{sector}");
                }
            }
        }

        Ok(())
    }
}

async fn fetch(config: &Config) -> anyhow::Result<(Snapshot, AssignmentTable)> {
    let table = AssignmentTable::load_or_builtin(config.assignments.as_deref())?;
    let source = default_source_from_config(config)?;
    tracing::debug!(?source, "fetching feeds");
    let snapshot = Snapshot::fetch(source.as_ref()).await?;
    Ok((snapshot, table))
}

fn print_reports(reports: &[SectorReport], json: bool) -> anyhow::Result<()> {
    if json {
        let body = match reports {
            [single] => serde_json::to_string_pretty(single),
            _ => serde_json::to_string_pretty(reports),
        }
        .context("Failed to serialize board as JSON")?;
        println!("{body}");
    } else {
        for report in reports {
            println!("{}", render::sector_board(report));
        }
    }
    Ok(())
}

/// Explicit argument first, then the configured default, then a prompt.
fn resolve_sector(arg: Option<String>, config: &Config) -> anyhow::Result<Sector> {
    if let Some(name) = arg {
        return parse_sector(&name);
    }
    if let Some(sector) = config.default_sector()? {
        return Ok(sector);
    }
    Ok(Select::new("Sector:", Sector::all().to_vec()).prompt()?)
}

/// Command-line sector names are case-insensitive; the core only takes canonical ones.
fn parse_sector(name: &str) -> anyhow::Result<Sector> {
    Sector::try_from(name.trim().to_uppercase().as_str()).map_err(|e| match e {
        CoreError::UnknownSector(_) => anyhow!("Sector not found: {name}"),
        other => other.into(),
    })
}

fn resolve_now(arg: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
    match arg {
        Some(s) => parse_report_time(s)
            .ok_or_else(|| anyhow!("Invalid --now '{s}'. Expected format: YYYY-MM-DD HH:MM:SS")),
        None => Ok(Utc::now()),
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let kind = Select::new("Report source:", SourceKind::all().to_vec()).prompt()?;
    config.set_source(kind);

    match kind {
        SourceKind::AviationWeather => {
            let current = config.aviationweather.metar_url.clone().unwrap_or_default();
            let metar_url = Text::new("METAR CSV URL (empty for aviationweather.gov Alaska):")
                .with_default(&current)
                .prompt()?;
            config.aviationweather.metar_url =
                non_empty(metar_url).filter(|u| u != DEFAULT_METAR_URL);

            let current = config.aviationweather.pirep_url.clone().unwrap_or_default();
            let pirep_url = Text::new("PIREP JSON URL:").with_default(&current).prompt()?;
            config.aviationweather.pirep_url = non_empty(pirep_url);
        }
        SourceKind::Files => {
            let current = path_default(&config.files.metar_csv);
            let metar_csv = Text::new("METAR CSV file:").with_default(&current).prompt()?;
            config.files.metar_csv = non_empty(metar_csv).map(PathBuf::from);

            let current = path_default(&config.files.pireps_json);
            let pireps_json = Text::new("PIREP JSON file:").with_default(&current).prompt()?;
            config.files.pireps_json = non_empty(pireps_json).map(PathBuf::from);
        }
    }

    let current = path_default(&config.assignments);
    let assignments = Text::new("Assignment table TOML (empty for built-in):")
        .with_default(&current)
        .prompt()?;
    config.assignments = non_empty(assignments).map(PathBuf::from);
    if let Some(path) = &config.assignments {
        AssignmentTable::load(path)?;
    }

    let sector = Select::new("Default sector:", Sector::all().to_vec()).prompt()?;
    config.set_default_sector(sector);

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn path_default(path: &Option<PathBuf>) -> String {
    path.as_ref().map(|p| p.display().to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn unknown_sector_is_not_found() {
        let err = parse_sector("WEST").unwrap_err();
        assert_eq!(err.to_string(), "Sector not found: WEST");
    }

    #[test]
    fn command_line_sector_ignores_case_and_padding() {
        assert_eq!(parse_sector(" north ").unwrap(), Sector::North);
        assert_eq!(parse_sector("Atop").unwrap(), Sector::Atop);
        assert_eq!(parse_sector("west").unwrap_err().to_string(), "Sector not found: west");
    }

    #[test]
    fn explicit_sector_beats_configured_default() {
        let mut config = Config::default();
        config.set_default_sector(Sector::South);

        let sector = resolve_sector(Some("high".to_string()), &config).unwrap();
        assert_eq!(sector, Sector::High);

        let sector = resolve_sector(None, &config).unwrap();
        assert_eq!(sector, Sector::South);
    }

    #[test]
    fn now_override_is_parsed_as_utc() {
        let now = resolve_now(Some("2024-03-01 18:00:00")).unwrap();
        assert_eq!(now, Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap());
        assert!(resolve_now(Some("18:00")).is_err());
    }

    #[test]
    fn blank_answers_clear_the_setting() {
        assert_eq!(non_empty("  ".to_string()), None);
        assert_eq!(non_empty(" x ".to_string()), Some("x".to_string()));
    }

    #[test]
    fn cli_parses_show_with_flags() {
        let cli = Cli::try_parse_from(["pirep", "show", "NORTH", "--json", "--now", "2024-03-01 18:00:00"])
            .unwrap();
        match cli.command {
            Command::Show { sector, view } => {
                assert_eq!(sector.as_deref(), Some("NORTH"));
                assert!(view.json);
                assert_eq!(view.now.as_deref(), Some("2024-03-01 18:00:00"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
