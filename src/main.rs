use clap::Parser;
use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use std::fs::File;
use std::path::PathBuf;

use xui_editor::export::{export_csv, export_json};
use xui_editor::model::Window;
use xui_editor::parser::import_layout_file;
use xui_editor::session::{EditorSession, EditorSettings, DEFAULT_GRID_SIZE};
use xui_editor::ui::App;

#[derive(Parser, Debug)]
#[command(name = "xui-editor")]
#[command(about = "XUI Editor - place, resize and name UI elements in XUI window layouts")]
#[command(version)]
struct Args {
    /// XUI file to open (created on first save if it does not exist)
    file: Option<PathBuf>,

    /// Window name written on export (default: the file's, else "myWindow")
    #[arg(long)]
    name: Option<String>,

    /// Grid size used for snapping
    #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
    grid: f64,

    /// Start with grid snapping turned off
    #[arg(long)]
    no_snap: bool,

    /// Write the layout as XUI to this file and exit
    #[arg(long, value_name = "FILE")]
    save_as: Option<PathBuf>,

    /// Export a JSON report and exit
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Export a CSV inventory and exit
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Write log output to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn is_batch(&self) -> bool {
        self.save_as.is_some() || self.json.is_some() || self.csv.is_some()
    }
}

fn init_logging(args: &Args) -> Result<()> {
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut builder = env_logger::Builder::from_env(env);

    if let Some(path) = &args.log_file {
        let file = File::create(path)
            .wrap_err_with(|| format!("cannot create log file '{}'", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    } else if !args.is_batch() {
        // The editor owns the terminal; stderr output would corrupt it.
        builder.filter_level(log::LevelFilter::Off);
    }

    builder.init();
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(&args)?;

    if !(args.grid > 0.0 && args.grid.is_finite()) {
        bail!("--grid must be a positive number, got {}", args.grid);
    }

    let window = match &args.file {
        Some(path) if path.exists() => import_layout_file(path)?,
        _ => Window::default(),
    };

    let settings = EditorSettings {
        window_name: window.name.clone(),
        snap_to_grid: !args.no_snap,
        grid_size: args.grid,
        ..EditorSettings::default()
    };
    let mut session = EditorSession::from_window(window, settings);
    if let Some(name) = &args.name {
        session.set_window_name(name.clone());
    }
    if let Some(path) = &args.file {
        session.set_file_path(path.clone());
    }

    if args.is_batch() {
        if let Some(path) = &args.save_as {
            session.save_as(path)?;
            println!("Saved XUI: {}", path.display());
        }
        if let Some(path) = &args.json {
            export_json(&session.to_window(), path)?;
            println!("Exported to JSON: {}", path.display());
        }
        if let Some(path) = &args.csv {
            export_csv(&session.to_window(), path)?;
            println!("Exported to CSV: {}", path.display());
        }
        return Ok(());
    }

    let terminal = ratatui::init();
    let result = execute!(std::io::stdout(), EnableMouseCapture)
        .map_err(color_eyre::Report::from)
        .and_then(|()| App::new(session).run(terminal));
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();
    result
}
