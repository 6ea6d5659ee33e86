mod app;
mod config;
mod fileio;
mod input;
mod style;
mod table;
mod ui;

use std::io::{self, Write};
use std::panic;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, info, warn, Level};
use tracing_subscriber::fmt::writer::MakeWriter;

use crossterm::{
    cursor::MoveToColumn,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use app::App;
use config::AppConfig;
use fileio::{delimiter_name, FileFormat, FileIO};
use style::Theme;
use table::TableView;

/// Command line options
#[derive(Debug, Default, PartialEq)]
struct Args {
    file_path: Option<PathBuf>,
    file_type: Option<FileFormat>,
    delimiter: Option<u8>,
    height: Option<usize>,
    theme: Option<String>,
    help: bool,
}

/// Parse command line arguments (without the program name)
fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args::default();

    let mut i = 0;
    while i < args.len() {
        let next = args.get(i + 1).cloned();
        let value = |name: &str| {
            next.clone()
                .ok_or_else(|| format!("{} requires an argument", name))
        };
        match args[i].as_str() {
            "-d" | "--delimiter" => {
                parsed.delimiter = parse_delimiter(&value("--delimiter")?)?;
                i += 2;
            }
            "-t" | "--file-type" | "--file_type" => {
                parsed.file_type = FileFormat::parse_arg(&value("--file-type")?)?;
                i += 2;
            }
            "-H" | "--height" => {
                let raw = value("--height")?;
                let height = raw
                    .parse::<usize>()
                    .ok()
                    .filter(|h| *h > 0)
                    .ok_or_else(|| format!("Invalid height: '{}'. Use a positive number of rows.", raw))?;
                parsed.height = Some(height);
                i += 2;
            }
            "--theme" => {
                parsed.theme = Some(value("--theme")?);
                i += 2;
            }
            "-h" | "--help" => {
                parsed.help = true;
                i += 1;
            }
            arg if arg.starts_with('-') && arg.len() > 1 => {
                return Err(format!("Unknown option: {}", arg));
            }
            _ => {
                parsed.file_path = Some(PathBuf::from(&args[i]));
                i += 1;
            }
        }
    }

    Ok(parsed)
}

/// Parse a delimiter string into a byte; `auto` leaves detection on
fn parse_delimiter(s: &str) -> Result<Option<u8>, String> {
    match s.to_lowercase().as_str() {
        "auto" => Ok(None),
        "comma" | "," => Ok(Some(b',')),
        "tab" | "\\t" | "\t" => Ok(Some(b'\t')),
        "semicolon" | ";" => Ok(Some(b';')),
        "pipe" | "|" => Ok(Some(b'|')),
        _ if s.len() == 1 => Ok(Some(s.as_bytes()[0])),
        _ => Err(format!(
            "Invalid delimiter: '{}'. Use auto, comma, tab, semicolon, pipe, or a single character.",
            s
        )),
    }
}

/// Handle panics gracefully
fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        if TUI_ACTIVE.swap(false, Ordering::Relaxed) {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }

        if let Some(location) = info.location() {
            error!(
                file = location.file(),
                line = location.line(),
                "panic occured"
            );
        } else {
            error!("panic occured");
        }

        default_hook(info);
    }));
}

/// Set while the alternate screen is owned by the table view
static TUI_ACTIVE: AtomicBool = AtomicBool::new(false);

/// A `MakeWriter` for `tracing` that logs to the **main screen** by leaving the alternate screen temporarily.
pub struct MainScreenWriter;

impl<'a> MakeWriter<'a> for MainScreenWriter {
    type Writer = MainScreenWriterHandle;

    fn make_writer(&'a self) -> Self::Writer {
        MainScreenWriterHandle
    }
}

/// A handle that writes to stdout outside the alternate screen
pub struct MainScreenWriterHandle;

impl Write for MainScreenWriterHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !TUI_ACTIVE.load(Ordering::Relaxed) {
            return io::stderr().write(buf);
        }
        execute!(io::stdout(), LeaveAlternateScreen)?;
        execute!(io::stdout(), MoveToColumn(0))?;
        let result = io::stdout().write(buf);
        execute!(io::stdout(), MoveToColumn(0))?;
        io::stdout().flush()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        result
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        io::stdout().flush()
    }
}

/// Log level from `TABLESPY_LOG`, `info` when unset or unparsable
fn log_level() -> Level {
    std::env::var("TABLESPY_LOG")
        .ok()
        .and_then(|v| Level::from_str(v.trim()).ok())
        .unwrap_or(Level::INFO)
}

fn print_help() {
    let prog = std::env::args()
        .next()
        .map(PathBuf::from)
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "tablespy".to_string());

    eprintln!("Read table data from a file");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    {} [OPTIONS] FILE", prog);
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -t, --file-type <TYPE>   Force file type: auto, csv, tsv or excel (default auto)");
    eprintln!("    -d, --delimiter <DELIM>  Field delimiter: auto, comma, tab, semicolon, pipe, or char");
    eprintln!("    -H, --height <ROWS>      Maximum table height in rows (default {})", config::DEFAULT_HEIGHT);
    eprintln!("        --theme <NAME>       Colour theme: {}", Theme::builtin_names().join(", "));
    eprintln!("    -h, --help               Print this help message");
    eprintln!();
    eprintln!("Keys: arrows or hjkl move, b/f or PgUp/PgDn page, a number prefix repeats, q quits.");
    eprintln!("Configuration is read from {}", AppConfig::default_path().display());
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(log_level())
        .with_writer(MainScreenWriter)
        .init();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if args.help {
        print_help();
        std::process::exit(0);
    }

    let Some(file_path) = args.file_path else {
        eprintln!("filename is required");
        print_help();
        std::process::exit(0);
    };

    let mut config = AppConfig::load_or_default(&AppConfig::default_path());
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(name) = args.theme {
        if Theme::by_name(&name).is_none() {
            warn!(theme = %name, "unknown theme requested");
        }
        config.theme = name;
        config.colors = None;
        config.theme_file = None;
    }
    let theme = config.resolve_theme();

    let file_io = FileIO::new(file_path, args.file_type, args.delimiter);
    let load_result = file_io.load_table().map_err(|e| {
        error!(error = %e, "Failed to load table");
        e
    })?;

    info!(
        rows = load_result.grid.row_count(),
        columns = load_result.grid.col_count(),
        height = config.height,
        theme = %theme.name,
        "tablespy started"
    );

    let view = TableView::new(load_result.grid, config.height, theme.clone());
    let mut app = App::new(view, theme, file_io.file_name());

    let mut messages: Vec<String> = load_result.warnings;
    if let (None, FileFormat::Csv, Some(delimiter)) =
        (args.delimiter, file_io.format(), load_result.delimiter)
    {
        messages.push(format!("Delimiter: {}", delimiter_name(delimiter)));
    }
    if !messages.is_empty() {
        app.message = Some(messages.join("; "));
    }

    install_panic_hook();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    TUI_ACTIVE.store(true, Ordering::Relaxed);

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    TUI_ACTIVE.store(false, Ordering::Relaxed);
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}
