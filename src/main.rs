use clap::{Parser as ClapParser, Subcommand};
use fern_lang::cli::{self, Command, EvalOptions, Source};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(ClapParser)]
#[command(name = "fern")]
#[command(about = "Fern - parse, print and evaluate fern code")]
#[command(version)]
struct Cli {
    /// More output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct InputArgs {
    /// Source file (reads from stdin if neither a file nor --code is given)
    file: Option<PathBuf>,

    /// Code given inline
    #[arg(short, long, conflicts_with = "file")]
    code: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump the token stream
    Tokens {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Parse and print every declaration
    Print {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Evaluate the top-level expression
    Eval {
        #[command(flatten)]
        input: InputArgs,

        /// Declaration to evaluate instead of the top-level expression
        #[arg(short, long)]
        entry: Option<String>,

        /// Bind a number, as name=value (repeatable)
        #[arg(long = "var", value_parser = cli::parse_binding)]
        vars: Vec<(String, f64)>,
    },

    /// Export every declaration as JSON
    Json {
        #[command(flatten)]
        input: InputArgs,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (command, input) = match cli.command {
        Commands::Tokens { input } => (Command::Tokens, input),
        Commands::Print { input } => (Command::Print, input),
        Commands::Eval { input, entry, vars } => {
            (Command::Eval(EvalOptions { entry, vars }), input)
        }
        Commands::Json { input, pretty } => (Command::Json { pretty }, input),
    };

    let result = select_source(input).and_then(|source| cli::run(&command, source));

    match result {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    // RUST_LOG wins unless -v is given
    let mut builder = env_logger::Builder::from_default_env();
    if verbose > 0 || std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(level);
    }
    builder.init();
}

fn select_source(input: InputArgs) -> Result<Source, cli::CliError> {
    match (input.file, input.code) {
        (Some(path), _) => Ok(Source::File(path)),
        (None, Some(code)) => Ok(Source::Code(code)),
        (None, None) if !atty::is(atty::Stream::Stdin) => Ok(Source::Stdin),
        (None, None) => Err(cli::CliError::NoInput),
    }
}
