use chrono::Local;
use clap::{Args as ClapArgs, Parser, Subcommand};
use ratingscope::{ChartConfig, Dashboard, ScopeResult};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{error, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ratingscope")]
#[command(author, version, about = "Chart board game ratings by year and drill into the most rated games")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Games CSV (optional in GUI mode)
    path: Option<PathBuf>,

    /// Launch GUI file picker (auto-enabled when no path is given)
    #[arg(long)]
    gui: bool,

    /// Output report file (.html, .svg, .json, .csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for auto-generated reports
    #[arg(long, default_value = "ratingscope-reports")]
    report_dir: PathBuf,

    /// Don't auto-generate a report
    #[arg(long)]
    no_report: bool,

    /// Don't prompt to open report
    #[arg(long)]
    no_open: bool,

    #[command(flatten)]
    chart: ChartArgs,

    /// Debug logging and dropped-row details
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only show summary
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(ClapArgs, Debug)]
struct ChartArgs {
    /// JSON chart config; flags below override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// First year shown
    #[arg(long, global = true)]
    from_year: Option<i32>,

    /// Last year shown
    #[arg(long, global = true)]
    to_year: Option<i32>,

    /// Items in the detail chart
    #[arg(long, global = true)]
    top: Option<usize>,
}

impl ChartArgs {
    fn resolve(&self) -> ScopeResult<ChartConfig> {
        let mut config = match &self.config {
            Some(path) => ChartConfig::load_from_file(path)?,
            None => ChartConfig::default(),
        };
        if let Some(y) = self.from_year {
            config.from_year = y;
        }
        if let Some(y) = self.to_year {
            config.to_year = y;
        }
        if let Some(n) = self.top {
            config.top_n = n;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start interactive web UI
    Serve {
        /// Games CSV
        path: PathBuf,

        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,

        /// Don't open a browser
        #[arg(long)]
        no_open: bool,
    },

    /// Print the most rated games of one year and rating bucket
    Top {
        /// Games CSV
        path: PathBuf,

        #[arg(short, long)]
        year: i32,

        /// Rating bucket (floor of the average rating)
        #[arg(short, long)]
        rating: i32,
    },
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let config = match args.chart.resolve() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    // Handle subcommands first
    if let Some(cmd) = args.command {
        let result = match cmd {
            Command::Serve { path, port, no_open } => load(&path, config)
                .and_then(|d| ratingscope::serve::start(port, d, &path.display().to_string(), !no_open)),
            Command::Top { path, year, rating } => load(&path, config).map(|d| print_top(&d, year, rating)),
        };
        if let Err(e) = result {
            error!("{}", e);
            std::process::exit(1);
        }
        return;
    }

    // With the GUI feature a missing path means "pick one", so double-click just works
    #[cfg(feature = "gui")]
    let use_gui = args.gui || args.path.is_none();

    #[cfg(not(feature = "gui"))]
    let use_gui = false;

    #[cfg(feature = "gui")]
    let path = match args.path.clone() {
        Some(p) if !use_gui => p,
        _ => match pick_path_gui() {
            Some(p) => p,
            None => {
                eprintln!("No file selected.");
                std::process::exit(0);
            }
        },
    };

    #[cfg(not(feature = "gui"))]
    let path = if let Some(p) = args.path.clone() {
        p
    } else {
        eprintln!("Usage: ratingscope <PATH>");
        eprintln!("Run 'ratingscope --help' for more options.");
        eprintln!("Note: GUI mode not available in this build.");
        std::process::exit(1);
    };

    let dashboard = match load(&path, config) {
        Ok(d) => d,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if !args.quiet {
        eprintln!("\x1b[1mratingscope - {}\x1b[0m", dashboard.config().primary_title());
        eprintln!("{}", "─".repeat(70));
        print_table(&dashboard);
    }

    if args.verbose {
        for diag in &dashboard.dataset().rejected {
            eprintln!("    \x1b[90mdropped {}\x1b[0m", diag);
        }
    }

    let summary = dashboard.summary();
    eprintln!("\n{}", "─".repeat(70));
    eprintln!("\x1b[1mSummary:\x1b[0m");
    eprintln!("  Rows read: {}", summary.rows_read);
    eprintln!("  \x1b[32mKept:\x1b[0m      {}", summary.kept);
    if summary.dropped > 0 {
        eprintln!("  \x1b[33mDropped:\x1b[0m   {}", summary.dropped);
    }

    let report_path = if let Some(ref output) = args.output {
        Some(output.clone())
    } else if !args.no_report {
        if let Err(e) = std::fs::create_dir_all(&args.report_dir) {
            error!("Failed to create {}: {}", args.report_dir.display(), e);
            std::process::exit(1);
        }
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let filename = format!("ratingscope_report_{}.html", timestamp);
        Some(args.report_dir.join(filename))
    } else {
        None
    };

    if let Some(ref output_path) = report_path {
        if let Err(e) = ratingscope::report::generate(output_path, &dashboard) {
            error!("Failed to write report: {}", e);
            std::process::exit(1);
        }
        if !args.quiet {
            eprintln!("\n\x1b[32mReport saved: {}\x1b[0m", output_path.display());
        }

        if !args.no_open {
            if use_gui {
                let _ = open::that(output_path);
            } else if !args.quiet {
                eprint!("\nOpen report in browser? [Y/n] ");
                io::stderr().flush().ok();

                let mut input = String::new();
                if io::stdin().read_line(&mut input).is_ok() {
                    let input = input.trim().to_lowercase();
                    if input.is_empty() || input == "y" || input == "yes" {
                        if let Err(e) = open::that(output_path) {
                            eprintln!("Failed to open report: {}", e);
                        }
                    }
                }
            }
        }
    }
}

/// `RUST_LOG` wins; otherwise `-v` is debug, `-q` is warnings only.
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load(path: &Path, config: ChartConfig) -> ScopeResult<Dashboard> {
    Dashboard::load(path, config)
}

fn print_table(dashboard: &Dashboard) {
    let table = dashboard.table();
    if table.years().is_empty() || table.buckets().is_empty() {
        println!("No games in range.");
        return;
    }

    print!("{:<6}", "YEAR");
    for b in table.buckets().iter() {
        print!("{:>7}", b);
    }
    println!("{:>8}", "TOTAL");
    println!("{}", "-".repeat(6 + 7 * table.buckets().len() + 8));

    for (i, year) in table.years().iter().enumerate() {
        let color = dashboard.config().color(i);
        print!("{}{:<6}\x1b[0m", ansi_for(color), year);
        for (_, count) in table.series(year) {
            print!("{:>7}", count);
        }
        println!("{:>8}", table.year_total(year));
    }
}

fn print_top(dashboard: &Dashboard, year: i32, rating: i32) {
    let result = dashboard.top(year, rating);
    let title = format!("Top {} Most Rated Games of {} with Rating {}", dashboard.config().top_n, year, rating);
    println!("\x1b[1m{}\x1b[0m", title);
    if result.is_empty() {
        println!("No games.");
        return;
    }
    println!("{:<4} {:>10}  {}", "#", "RATED BY", "NAME");
    println!("{}", "-".repeat(60));
    for (i, game) in result.iter().enumerate() {
        println!("{:<4} {:>10}  {}", i + 1, game.popularity, truncate(&game.name, 44));
    }
}

/// Closest terminal color for a palette entry; plain text if unknown.
fn ansi_for(hex: &str) -> &'static str {
    match hex {
        "#1f77b4" | "#17becf" => "\x1b[34m",
        "#ff7f0e" | "#bcbd22" => "\x1b[33m",
        "#2ca02c" => "\x1b[32m",
        "#d62728" => "\x1b[31m",
        "#9467bd" | "#e377c2" => "\x1b[35m",
        "#8c564b" | "#7f7f7f" => "\x1b[90m",
        _ => "",
    }
}

#[cfg(feature = "gui")]
fn pick_path_gui() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Select board games CSV")
        .add_filter("CSV files", &["csv"])
        .pick_file()
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
