//! rawsheet CLI - spreadsheet to table conversion tool
//!
//! A command-line tool for turning XLSX workbooks and delimited text into
//! CSV, JSON, Markdown, or aligned plain text.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use rawsheet::render::{JsonFormat, OutputFormat, RenderOptions};
use rawsheet::{DecodeOptions, FormatType, SheetSelector};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

/// Spreadsheet and delimited text conversion to plain tables
#[derive(Parser)]
#[command(
    name = "rawsheet",
    version,
    about = "Turn spreadsheets into plain tables",
    long_about = "rawsheet - Self-contained XLSX and CSV reader.\n\n\
                  Converts XLSX workbooks and delimited text to CSV, JSON, Markdown, or text."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a workbook or text table to another format
    #[command(visible_alias = "c")]
    Convert {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (default: from the output extension, else csv)
        #[arg(short, long)]
        format: Option<Format>,

        /// Worksheet number or name (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Input delimiter for text tables: a character, "tab" or "space"
        #[arg(short, long, value_parser = parse_delimiter)]
        delimiter: Option<u8>,

        /// Trim whitespace around workbook cells
        #[arg(long)]
        trim: bool,

        /// Normalize cell text to Unicode NFC
        #[arg(long)]
        nfc: bool,

        /// Swap rows and columns
        #[arg(long)]
        transpose: bool,

        /// Do not treat the first row as a header (markdown, text)
        #[arg(long)]
        no_header: bool,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,
    },

    /// List the worksheets of a workbook
    Sheets {
        /// Input file path
        input: PathBuf,

        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the ZIP entries of a workbook
    Entries {
        /// Input file path
        input: PathBuf,
    },

    /// Show table information
    Info {
        /// Input file path
        input: PathBuf,

        /// Worksheet number or name (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,
    },

    /// Show version information
    Version,
}

/// Output format
#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Comma-separated values, every field quoted
    Csv,
    /// JSON object with a rows array
    Json,
    /// Markdown pipe table
    Markdown,
    /// Aligned plain text table
    Text,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => OutputFormat::Csv,
            Format::Json => OutputFormat::Json,
            Format::Markdown => OutputFormat::Markdown,
            Format::Text => OutputFormat::Text,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Library records go through the `log` facade and are bridged by tracing-log.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level_for(cli.verbose))
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Level for a repeated `-v` flag: warnings by default, then info, debug, trace.
fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Convert {
            input,
            output,
            format,
            sheet,
            delimiter,
            trim,
            nfc,
            transpose,
            no_header,
            compact,
        } => {
            let pb = create_spinner("Reading table...");

            let mut options = DecodeOptions::new()
                .with_trim_cells(trim)
                .with_normalize_unicode(nfc)
                .with_transpose(transpose);
            if let Some(sheet) = sheet.as_deref() {
                options = options.with_sheet(parse_sheet(sheet));
            }
            if let Some(delimiter) = delimiter {
                options = options.with_delimiter(delimiter);
            }

            let matrix = rawsheet::decode_file(&input, &options)?;

            let format = format
                .map(OutputFormat::from)
                .or_else(|| output.as_deref().and_then(format_from_extension))
                .unwrap_or_default();
            pb.set_message(format!("Rendering to {}...", format.extension()));

            let json_format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            let render_options = RenderOptions::new()
                .with_header_row(!no_header)
                .with_json_format(json_format);
            let rendered = rawsheet::render::render(&matrix, format, &render_options)?;

            pb.finish_and_clear();
            write_output(output.as_ref(), &rendered)?;

            if let Some(path) = output {
                println!(
                    "{} Converted {} x {} table: {}",
                    "✓".green().bold(),
                    matrix.height(),
                    matrix.width(),
                    path.display()
                );
            }
        }

        Commands::Sheets { input, json } => {
            let data = fs::read(&input)?;
            let sheets = rawsheet::list_sheets(&data)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&sheets)?);
            } else if sheets.is_empty() {
                println!("{} No worksheets found", "!".yellow().bold());
            } else {
                for sheet in &sheets {
                    println!(
                        "{:>3}  {}  {}",
                        sheet.position,
                        sheet.name.bold(),
                        sheet.path.dimmed()
                    );
                }
            }
        }

        Commands::Entries { input } => {
            let data = fs::read(&input)?;
            let entries = rawsheet::container::read_local_entries(&data)?;

            println!(
                "{:<8} {:>12} {:>12}  {}",
                "Method".bold(),
                "Compressed".bold(),
                "Size".bold(),
                "Name".bold()
            );
            for entry in entries.values() {
                let method = match entry.compression_method {
                    rawsheet::container::METHOD_STORED => "stored".to_string(),
                    rawsheet::container::METHOD_DEFLATE => "deflate".to_string(),
                    other => format!("#{}", other),
                };
                println!(
                    "{:<8} {:>12} {:>12}  {}",
                    method, entry.compressed_size, entry.declared_uncompressed_size, entry.name
                );
            }
            println!("\n{} entries", entries.len());
        }

        Commands::Info { input, sheet } => {
            let pb = create_spinner("Analyzing table...");

            let data = fs::read(&input)?;
            let format = rawsheet::detect_format_from_bytes(&data)?;
            let mut options = DecodeOptions::new();
            if let Some(sheet) = sheet.as_deref() {
                options = options.with_sheet(parse_sheet(sheet));
            }
            let matrix = rawsheet::read_table(&data, &options)?;

            pb.finish_and_clear();

            println!("{}", "Table Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            println!("{}: {}", "Format".bold(), format);

            match format {
                FormatType::Xlsx => {
                    let sheets = rawsheet::list_sheets(&data)?;
                    println!("{}: {}", "Sheets".bold(), sheets.len());
                    println!("{}: {}", "Selected".bold(), options.sheet);
                }
                FormatType::Delimited => {
                    let text = rawsheet::delimited::decode_text(&data);
                    let delimiter = rawsheet::detect_delimiter(&text);
                    println!("{}: {}", "Delimiter".bold(), describe_delimiter(delimiter));
                }
            }

            let filled = matrix
                .rows()
                .iter()
                .flatten()
                .filter(|cell| !cell.is_empty())
                .count();
            println!("\n{}", "Content Statistics".cyan().bold());
            println!("{}", "─".repeat(40));
            println!("{}: {}", "Rows".bold(), matrix.height());
            println!("{}: {}", "Columns".bold(), matrix.width());
            println!("{}: {}", "Non-empty cells".bold(), filled);
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

/// A number selects `sheetN.xml`, anything else is a sheet name.
fn parse_sheet(value: &str) -> SheetSelector {
    match value.parse::<u32>() {
        Ok(index) => SheetSelector::Index(index),
        Err(_) => SheetSelector::Name(value.to_string()),
    }
}

fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\\t" => Ok(b'\t'),
        "space" => Ok(b' '),
        _ => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Ok(c as u8),
                _ => Err(format!(
                    "delimiter must be a single ASCII character, \"tab\" or \"space\", got {:?}",
                    value
                )),
            }
        }
    }
}

fn describe_delimiter(delimiter: u8) -> String {
    match delimiter {
        b'\t' => "tab".to_string(),
        b' ' => "space".to_string(),
        other => format!("'{}'", other as char),
    }
}

fn format_from_extension(path: &Path) -> Option<OutputFormat> {
    match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
        "csv" => Some(OutputFormat::Csv),
        "json" => Some(OutputFormat::Json),
        "md" | "markdown" => Some(OutputFormat::Markdown),
        "txt" => Some(OutputFormat::Text),
        _ => None,
    }
}

fn print_version() {
    println!("{} {}", "rawsheet".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Self-contained XLSX and CSV reader");
    println!();
    println!("Input formats: XLSX, CSV/TSV and other delimited text");
    println!("Output formats: CSV, JSON, Markdown, text");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write!(handle, "{}", content)?;
            if !content.ends_with('\n') {
                writeln!(handle)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_convert_args() {
        let cli = Cli::try_parse_from([
            "rawsheet", "-vv", "c", "book.xlsx", "-o", "out.md", "--sheet", "Data", "-d", "tab",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);

        match cli.command {
            Commands::Convert {
                input,
                output,
                sheet,
                delimiter,
                ..
            } => {
                assert_eq!(input, PathBuf::from("book.xlsx"));
                assert_eq!(output, Some(PathBuf::from("out.md")));
                assert_eq!(sheet.as_deref(), Some("Data"));
                assert_eq!(delimiter, Some(b'\t'));
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(0), LevelFilter::WARN);
        assert_eq!(level_for(1), LevelFilter::INFO);
        assert_eq!(level_for(2), LevelFilter::DEBUG);
        assert_eq!(level_for(9), LevelFilter::TRACE);
    }

    #[test]
    fn test_bad_delimiter_rejected() {
        let result = Cli::try_parse_from(["rawsheet", "convert", "a.csv", "-d", ";;"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_sheet() {
        assert_eq!(parse_sheet("3"), SheetSelector::Index(3));
        assert_eq!(parse_sheet("Summary"), SheetSelector::Name("Summary".into()));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            format_from_extension(Path::new("out.MD")),
            Some(OutputFormat::Markdown)
        );
        assert_eq!(format_from_extension(Path::new("out.xlsx")), None);
        assert_eq!(format_from_extension(Path::new("out")), None);
    }
}
