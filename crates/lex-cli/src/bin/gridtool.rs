use clap::{Args, Parser, Subcommand, ValueEnum};

use lex_cli::commands::grid_ops::{GridOptions, Pin};
use lex_cli::commands::{config_ops, grid_ops};
use lex_cli::trace_init::init_tracing;
use lex_grid::CandidateFilter;

#[derive(Parser)]
#[command(name = "gridtool", about = "Compositor grid diagnostics")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log compositor spans to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

/// Flags shared by every subcommand that builds a grid.
#[derive(Args)]
struct GridArgs {
    /// Path to the text language model (`key value score` per line)
    lm_file: String,
    /// Readings to type, in order
    #[arg(required = true)]
    readings: Vec<String>,
    /// Settings TOML to start from instead of the built-in defaults
    #[arg(long)]
    settings: Option<String>,
    /// Separator joining multi-key readings
    #[arg(long)]
    separator: Option<String>,
    /// Longest span a node may cover (at least 6)
    #[arg(long)]
    max_span: Option<usize>,
    /// The model file lists `value key score` (word segmentation)
    #[arg(long)]
    swap: bool,
}

impl GridArgs {
    fn options(&self) -> GridOptions {
        GridOptions {
            settings: self.settings.clone(),
            separator: self.separator.clone(),
            max_span: self.max_span,
            swap: self.swap,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterArg {
    All,
    Begin,
    End,
}

impl From<FilterArg> for CandidateFilter {
    fn from(f: FilterArg) -> Self {
        match f {
            FilterArg::All => CandidateFilter::All,
            FilterArg::Begin => CandidateFilter::BeginAt,
            FilterArg::End => CandidateFilter::EndAt,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print the best segmentation of the readings
    Walk {
        #[command(flatten)]
        grid: GridArgs,
        /// Pin a candidate before walking (repeatable)
        #[arg(long, value_name = "VALUE@POS")]
        pin: Vec<Pin>,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List candidates around a cursor position
    Candidates {
        #[command(flatten)]
        grid: GridArgs,
        /// Cursor position
        #[arg(long)]
        at: usize,
        /// Which nodes around the cursor to list
        #[arg(long, value_enum, default_value = "all")]
        filter: FilterArg,
    },
    /// Dump the grid as a Graphviz digraph
    Dot {
        #[command(flatten)]
        grid: GridArgs,
        /// Pin a candidate before dumping (repeatable)
        #[arg(long, value_name = "VALUE@POS")]
        pin: Vec<Pin>,
    },
    /// List every node in the grid as JSON
    Nodes {
        #[command(flatten)]
        grid: GridArgs,
    },
    /// Print the walked grid record as JSON
    Snapshot {
        #[command(flatten)]
        grid: GridArgs,
        /// Pin a candidate before walking (repeatable)
        #[arg(long, value_name = "VALUE@POS")]
        pin: Vec<Pin>,
    },
    /// Export default settings TOML to stdout
    SettingsExport,
    /// Validate a settings TOML file
    SettingsValidate {
        /// Path to TOML file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Walk { grid, pin, json } => {
            grid_ops::walk_cmd(&grid.lm_file, &grid.readings, &pin, json, &grid.options())
        }
        Command::Candidates { grid, at, filter } => grid_ops::candidates_cmd(
            &grid.lm_file,
            &grid.readings,
            at,
            filter.into(),
            &grid.options(),
        ),
        Command::Dot { grid, pin } => {
            grid_ops::dot_cmd(&grid.lm_file, &grid.readings, &pin, &grid.options())
        }
        Command::Nodes { grid } => {
            grid_ops::nodes_cmd(&grid.lm_file, &grid.readings, &grid.options())
        }
        Command::Snapshot { grid, pin } => {
            grid_ops::snapshot_cmd(&grid.lm_file, &grid.readings, &pin, &grid.options())
        }
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}
