//! StaffTracker - register of staff appointments and dismissals.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use staff_tracker as st;

use st::AppError;
use st::app::App;
use st::config::{AppConfig, ConfigLoadResult};
use st::db;
use st::export::{self, ExportForm, ExportType};
use st::grid::{self, GridPage};
use st::grid_state::{ColumnFilterState, ColumnSortState, EntryGridState, FilterValue, SortDirection};
use st::models::{Entry, EntryType};

/// Register of staff appointments and dismissals.
#[derive(Parser)]
#[command(name = "staff-tracker", version)]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the database and per-user files
    Init {
        /// Insert sample entries into an empty register
        #[arg(long)]
        seed: bool,
    },
    /// List entries using the saved grid state
    List {
        #[arg(long, value_enum, default_value_t = KindArg::All)]
        kind: KindArg,
        /// Ignore the saved grid state
        #[arg(long)]
        no_grid: bool,
        /// Match name, IDN or company
        #[arg(long)]
        search: Option<String>,
    },
    /// Print one entry as JSON
    Show { id: i32 },
    /// Add an entry from a JSON file
    Add { file: PathBuf },
    /// Replace an entry with the contents of a JSON file
    Update { id: i32, file: PathBuf },
    /// Delete an entry
    Delete { id: i32 },
    /// Export entries to an Excel workbook
    Export(ExportArgs),
    /// Show or change app settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Show or change the saved grid state
    Grid {
        #[command(subcommand)]
        action: GridAction,
    },
    /// Row counts per table
    Stats,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    All,
    Appointments,
    Dismissals,
}

#[derive(Args)]
#[command(group(clap::ArgGroup::new("period").required(true).args(["day", "month", "year", "from"])))]
struct ExportArgs {
    /// Single day (YYYY-MM-DD)
    #[arg(long)]
    day: Option<NaiveDate>,
    /// Whole month (YYYY-MM)
    #[arg(long, value_parser = parse_month)]
    month: Option<NaiveDate>,
    /// Whole year
    #[arg(long)]
    year: Option<i32>,
    /// Range start (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,
    /// Range end (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,
    /// Output folder, defaults to the settings' download destination
    #[arg(long)]
    folder: Option<PathBuf>,
    /// File name without period suffix, defaults to the settings' file name
    #[arg(long)]
    file_name: Option<String>,
    /// Only entries of this company
    #[arg(long)]
    company: Option<String>,
}

#[derive(Subcommand)]
enum SettingsAction {
    Show,
    /// Set a setting by its JSON name, e.g. `culture en-US`
    Set { key: String, value: String },
}

#[derive(Subcommand)]
enum GridAction {
    Show,
    /// Forget all saved grid state
    Reset,
    /// Sort by a column; repeated calls add secondary sorts
    Sort {
        property: String,
        #[arg(value_enum)]
        direction: DirectionArg,
    },
    /// Filter a column, e.g. `CompanyName contains ООД`
    Filter {
        property: String,
        operator: String,
        value: Option<String>,
    },
    /// Page size (0 for all) and zero-based page index
    Page { size: i32, index: i32 },
    /// Hide columns; pass none to show all
    Hide { columns: Vec<String> },
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Asc,
    Desc,
    None,
}

impl From<DirectionArg> for SortDirection {
    fn from(d: DirectionArg) -> Self {
        match d {
            DirectionArg::Asc => SortDirection::Ascending,
            DirectionArg::Desc => SortDirection::Descending,
            DirectionArg::None => SortDirection::None,
        }
    }
}

fn parse_month(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").map_err(|_| format!("expected YYYY-MM, got {s:?}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Determine config path based on mode
    let config_path = if cli.dev {
        PathBuf::from("config.toml")
    } else {
        AppConfig::default_path()
    };

    let (config, created) = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => (config, false),
        ConfigLoadResult::Missing => {
            let config = AppConfig::default();
            config
                .save(&config_path)
                .with_context(|| format!("Cannot write default config to {}", config_path.display()))?;
            (config, true)
        }
        ConfigLoadResult::Invalid(e) => bail!("Invalid config {}: {e}", config_path.display()),
    };

    let _guard = st::logging::init(&config.logging, &config.log_dir()).context("Cannot initialize logging")?;

    tracing::info!("StaffTracker starting...");
    if cli.dev {
        tracing::info!("Dev mode: loading config from current directory");
    }
    if created {
        tracing::info!("Config missing, wrote defaults to {:?}", config_path);
    } else {
        tracing::info!("Config loaded from {:?}", config_path);
    }

    let app = App::open(config).await.context("Cannot open database")?;

    run(&app, cli.command).await
}

async fn run(app: &App, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Init { seed } => {
            let settings = app.settings.get().await;
            app.grid_state.get().await;
            if seed {
                let inserted = db::seed_test_data(&app.db).await?;
                println!("Inserted {inserted} sample entries");
            }
            println!("Database: {}", app.config.database_path().display());
            println!("Settings: {}", app.settings.path().display());
            println!("Grid state: {}", app.grid_state.path().display());
            println!("Culture: {}", settings.culture());
        }
        Command::List { kind, no_grid, search } => {
            let entries: Vec<Entry> = db::entry::list_all(&app.db)
                .await?
                .into_iter()
                .filter(|e| match kind {
                    KindArg::All => true,
                    KindArg::Appointments => e.entry_type() == EntryType::Appointment,
                    KindArg::Dismissals => e.entry_type() == EntryType::Dismissal,
                })
                .collect();

            let state = if no_grid {
                EntryGridState {
                    page_size: 0,
                    ..Default::default()
                }
            } else {
                let settings = app.settings.get().await;
                app.grid_state.restore_for(&settings).await
            };

            print_page(&grid::apply(entries, &state, search.as_deref()));
        }
        Command::Show { id } => {
            let entry = db::entry::require(&app.db, id).await?;
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        Command::Add { file } => {
            let entry = db::entry::create(&app.db, read_entry(&file)?).await?;
            println!("Created {} entry {}", entry.entry_type(), entry.id());
        }
        Command::Update { id, file } => match db::entry::update(&app.db, id, read_entry(&file)?).await? {
            Some(entry) => println!("Updated {} entry {}", entry.entry_type(), entry.id()),
            None => return Err(AppError::not_found(format!("entry {id}")).into()),
        },
        Command::Delete { id } => {
            if !db::entry::delete(&app.db, id).await? {
                return Err(AppError::not_found(format!("entry {id}")).into());
            }
            println!("Deleted entry {id}");
        }
        Command::Export(args) => {
            let settings = app.settings.get().await;
            let outcome = export::export_for_form(&app.db, &settings, &export_form(args)).await?;
            println!("Exported {} entries to {}", outcome.count, outcome.path.display());
        }
        Command::Settings { action } => {
            let settings = match action {
                SettingsAction::Show => app.settings.get().await,
                SettingsAction::Set { key, value } => {
                    let mut settings = app.settings.get().await;
                    settings.set_field(&key, &value)?;
                    app.settings.update(settings).await?
                }
            };
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        Command::Grid { action } => {
            let state = grid_action(app, action).await?;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Command::Stats => {
            let counts = db::get_table_counts(&app.db).await?;
            println!("Entries:      {}", counts.entries);
            println!("Appointments: {}", counts.appointments);
            println!("Dismissals:   {}", counts.dismissals);
        }
    }
    Ok(())
}

async fn grid_action(app: &App, action: GridAction) -> anyhow::Result<EntryGridState> {
    let settings = app.settings.get().await;
    let mut state = app.grid_state.get().await;

    match action {
        GridAction::Show => return Ok(state),
        GridAction::Reset => return Ok(app.grid_state.update_full_state(EntryGridState::default()).await),
        GridAction::Sort { property, direction } => {
            state.sorts.retain(|s| s.property_name != property);
            let index = state.sorts.iter().map(|s| s.index + 1).max().unwrap_or(0);
            state.sorts.push(ColumnSortState {
                property_name: property,
                direction: direction.into(),
                index,
            });
        }
        GridAction::Filter {
            property,
            operator,
            value,
        } => {
            state.filters.retain(|f| f.property_name != property);
            state.filters.push(ColumnFilterState {
                property_name: property,
                operator,
                value: value.as_deref().map_or(FilterValue::Null, FilterValue::from_text),
            });
        }
        GridAction::Page { size, index } => {
            if size < 0 || index < 0 {
                bail!("Page size and index must not be negative");
            }
            state.page_size = size;
            state.page_index = index;
        }
        GridAction::Hide { columns } => state.hidden_columns = columns,
    }

    if !settings.is_grid_state_saving_enabled() {
        tracing::warn!("Grid state saving is turned off in the settings, change not stored");
    }
    Ok(app.grid_state.save_for(&settings, state).await)
}

fn export_form(args: ExportArgs) -> ExportForm {
    let export_type = if args.day.is_some() {
        ExportType::Day
    } else if args.month.is_some() {
        ExportType::Month
    } else if args.year.is_some() {
        ExportType::Year
    } else {
        ExportType::Range
    };

    ExportForm {
        export_type,
        day: args.day,
        month: args.month,
        year: args.year,
        range_start: args.from,
        range_end: args.to,
        folder: args.folder.unwrap_or_default(),
        file_name: args.file_name.unwrap_or_default(),
        company: args.company,
    }
}

fn read_entry(path: &Path) -> anyhow::Result<Entry> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid entry JSON in {}", path.display()))
}

fn print_page(page: &GridPage) {
    let columns = page.visible_columns();
    let rows: Vec<Vec<String>> = page
        .items
        .iter()
        .map(|entry| {
            columns
                .iter()
                .map(|column| match *column {
                    "EntryType" => entry.entry_type().to_string(),
                    name => grid::property(entry, name).map(|v| v.display()).unwrap_or_default(),
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain([column.chars().count()])
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    println!("{}", line(columns.clone()));
    for row in &rows {
        println!("{}", line(row.iter().map(String::as_str).collect()));
    }
    println!(
        "Page {} of {}, {} entries",
        page.page_index + 1,
        page.page_count,
        page.total
    );
}
