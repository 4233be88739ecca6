use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;

use estatebook_lib::config::AppConfig;
use estatebook_lib::export::{self, ExportFormat};
use estatebook_lib::import::{self, ImportIssue, Importable};
use estatebook_lib::notify::TracingNotifier;
use estatebook_lib::screen::{EntityScreen, ScreenColumns};
use estatebook_lib::store::{JsonFileStore, RecordStore};
use estatebook_lib::table::{RenderedTable, TableBody};
use estatebook_lib::{Asset, EntityKind, Flat, Person, Supplier};

#[derive(Debug, Parser)]
#[command(name = "estatebook", about = "Building records: people, flats, assets, suppliers", version)]
struct Cli {
    /// Directory holding the record files and logs.
    #[arg(long, value_name = "PATH", global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate a CSV file and create its records.
    Import {
        entity: EntityKind,
        path: PathBuf,
        /// Validate and report without saving anything.
        #[arg(long)]
        dry_run: bool,
        /// Building the imported records belong to.
        #[arg(long, value_name = "ID")]
        building: Option<String>,
    },
    /// Write the current records to a CSV or JSON file.
    Export {
        entity: EntityKind,
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        /// Output directory, defaults to `<data-dir>/exports`.
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
        /// Print to stdout instead of writing a file.
        #[arg(long)]
        stdout: bool,
        #[arg(long, value_name = "ID")]
        building: Option<String>,
        /// Used in the file name instead of today's date.
        #[arg(long, value_name = "NAME")]
        building_name: Option<String>,
    },
    /// Show one page of records.
    List {
        entity: EntityKind,
        #[arg(long, short)]
        query: Option<String>,
        /// Column key to sort by.
        #[arg(long, value_name = "KEY")]
        sort: Option<String>,
        #[arg(long, requires = "sort")]
        desc: bool,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Include archived records.
        #[arg(long)]
        archived: bool,
        #[arg(long, value_name = "ID")]
        building: Option<String>,
        /// Emit the rendered table as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the import template for an entity.
    Template { entity: EntityKind },
    /// Archive a record; it stays on disk and can be restored.
    Delete { entity: EntityKind, id: String },
    /// Bring an archived record back.
    Restore { entity: EntityKind, id: String },
}

impl Commands {
    fn entity(&self) -> EntityKind {
        match self {
            Commands::Import { entity, .. }
            | Commands::Export { entity, .. }
            | Commands::List { entity, .. }
            | Commands::Template { entity }
            | Commands::Delete { entity, .. }
            | Commands::Restore { entity, .. } => *entity,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let mut config = AppConfig::load();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let guard = match estatebook_lib::init_logging(&config) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Warning: file logging disabled: {err:#}");
            None
        }
    };

    let code = match handle_cli(cli.command, &config).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            1
        }
    };
    drop(guard);
    process::exit(code);
}

async fn handle_cli(command: Commands, config: &AppConfig) -> Result<i32> {
    if let Commands::Template { entity } = command {
        println!("{}", export::template_for(entity));
        return Ok(0);
    }
    match command.entity() {
        EntityKind::People => run::<Person>(command, config).await,
        EntityKind::Flats => run::<Flat>(command, config).await,
        EntityKind::Assets => run::<Asset>(command, config).await,
        EntityKind::Suppliers => run::<Supplier>(command, config).await,
    }
}

async fn run<T>(command: Commands, config: &AppConfig) -> Result<i32>
where
    T: Importable + ScreenColumns + DeserializeOwned,
{
    let store: Arc<dyn RecordStore<T>> = Arc::new(JsonFileStore::<T>::open(&config.data_dir));
    let screen = EntityScreen::new(store, Arc::new(TracingNotifier)).with_page_size(config.page_size);

    match command {
        Commands::Import {
            path,
            dry_run,
            building,
            ..
        } => {
            let mut screen = with_building(screen, building);
            let text = import::read_import_file(&path)
                .await
                .with_context(|| format!("read {}", path.display()))?;
            let preview = screen
                .begin_import(&text)
                .with_context(|| format!("parse {}", path.display()))?;

            println!(
                "{} valid, {} errors, {} warnings",
                preview.summary.valid, preview.summary.errors, preview.summary.warnings
            );
            print_issues("Errors", &preview.errors);
            print_issues("Warnings", &preview.warnings);

            if !preview.can_confirm {
                if preview.summary.errors == 0 {
                    println!("Nothing to import.");
                }
                return Ok(1);
            }
            if dry_run {
                println!("Dry run: no {} were saved.", T::KIND.plural());
                return Ok(0);
            }

            let report = screen.confirm_import().await.context("confirm import")?;
            println!("Created {} {}.", report.created, T::KIND.plural());
            for failure in &report.failures {
                println!(
                    "{:<6} {:<44} {} ({})",
                    failure.index, failure.record_id, failure.message, failure.code
                );
            }
            Ok(if report.is_complete() { 0 } else { 1 })
        }
        Commands::Export {
            format,
            out,
            stdout,
            building,
            building_name,
            ..
        } => {
            let mut screen = with_building(screen, building);
            screen.load().await.context("load records")?;
            let contents = screen.export(format).context("serialize export")?;
            if stdout {
                println!("{contents}");
                return Ok(0);
            }
            let dir = out.unwrap_or_else(|| config.export_dir());
            let filename = screen.export_filename(building_name.as_deref(), format);
            let path = export::write_export(&dir, &filename, &contents)
                .await
                .context("write export")?;
            println!("Export stored at {}", path.display());
            Ok(0)
        }
        Commands::List {
            query,
            sort,
            desc,
            page,
            archived,
            building,
            json,
            ..
        } => {
            let mut screen = with_building(screen, building);
            screen.load().await.context("load records")?;
            screen.show_archived(archived);
            if let Some(query) = query {
                screen.set_query(query);
            }
            if let Some(key) = sort {
                if screen.table().column(&key).is_none() {
                    anyhow::bail!("unknown column '{key}' for {}", T::KIND.plural());
                }
                screen.toggle_sort(&key);
                if desc {
                    screen.toggle_sort(&key);
                }
            }
            screen.set_page(page);

            let table = screen.render();
            if json {
                let serialized =
                    serde_json::to_string_pretty(&table).context("serialize table")?;
                println!("{serialized}");
            } else {
                print_table(&table);
            }
            Ok(0)
        }
        Commands::Delete { id, .. } => set_active(screen, &id, false).await,
        Commands::Restore { id, .. } => set_active(screen, &id, true).await,
        Commands::Template { entity } => {
            println!("{}", export::template_for(entity));
            Ok(0)
        }
    }
}

async fn set_active<T>(mut screen: EntityScreen<T>, id: &str, active: bool) -> Result<i32>
where
    T: Importable + ScreenColumns + DeserializeOwned,
{
    screen.load().await.context("load records")?;
    if active {
        screen.restore(id).await.context("restore record")?;
        println!("Restored {} {id}", T::KIND.singular());
    } else {
        screen.archive(id).await.context("archive record")?;
        println!("Archived {} {id}", T::KIND.singular());
    }
    Ok(0)
}

fn with_building<T>(screen: EntityScreen<T>, building: Option<String>) -> EntityScreen<T>
where
    T: Importable + ScreenColumns + DeserializeOwned,
{
    match building {
        Some(id) => screen.with_building(id),
        None => screen,
    }
}

fn print_issues(title: &str, issues: &[ImportIssue]) {
    if issues.is_empty() {
        return;
    }
    println!("\n{title}:");
    println!("{:<6} {:<20} Message", "Row", "Field");
    for issue in issues {
        println!("{:<6} {:<20} {}", issue.row, issue.field, issue.message);
    }
}

fn print_table(table: &RenderedTable) {
    let rows = match &table.body {
        TableBody::Loading => {
            println!("Loading...");
            return;
        }
        TableBody::Empty { message } => {
            println!("{message}");
            return;
        }
        TableBody::Rows { rows } => rows,
    };

    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.title.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(&row.cells) {
            *width = (*width).max(cell.chars().count()).min(32);
        }
    }

    let header: Vec<String> = table
        .headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:<w$}", h.title, w = *w))
        .collect();
    println!("{:<38} {}", "Id", header.join("  "));
    for row in rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<w$}", truncate(cell, *w), w = *w))
            .collect();
        println!("{:<38} {}", row.id, cells.join("  "));
    }
    println!(
        "\nPage {} of {} ({} records)",
        table.page.page,
        table.page.page_count.max(1),
        table.page.total
    );
}

fn truncate(cell: &str, width: usize) -> String {
    if cell.chars().count() <= width {
        return cell.to_string();
    }
    let mut out: String = cell.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
