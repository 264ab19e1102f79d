use clap::{Parser as ClapParser, Subcommand};
use esl_search::SearchSpec;
use esl_search::cli::{self, CheckOptions, CheckResult, CliError, SearchOptions};
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(ClapParser)]
#[command(name = "esl")]
#[command(about = "ESL - compile filter expressions and collect search results")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an ESL query and print the backend filter
    Check {
        /// The ESL query (reads from stdin if not provided)
        query: Option<String>,

        /// Condition ANDed with the query
        #[arg(short, long, default_value = "")]
        system_condition: String,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't print the filter
        #[arg(long)]
        syntax_only: bool,
    },

    /// Run an ESL query against Elasticsearch and print id -> payload
    Search {
        /// The ESL query (reads from stdin if not provided)
        query: Option<String>,

        #[arg(short, long)]
        index: String,

        #[arg(short = 't', long, default_value = "")]
        doc_type: String,

        #[arg(short, long)]
        app_key: String,

        #[arg(long, default_value = "")]
        platform: String,

        /// Field to project; repeat for several
        #[arg(short, long = "field")]
        fields: Vec<String>,

        /// Condition ANDed with the query
        #[arg(short, long, default_value = "")]
        system_condition: String,

        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Elasticsearch base URL, overrides the config file
        #[arg(long)]
        backend_url: Option<String>,

        /// Hits per page, overrides the config file
        #[arg(long)]
        page_size: Option<usize>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'esl docs' to list categories)
        category: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            query,
            system_condition,
            pretty,
            syntax_only,
        } => run_check(query, system_condition, pretty, syntax_only),
        Commands::Search {
            query,
            index,
            doc_type,
            app_key,
            platform,
            fields,
            system_condition,
            config,
            backend_url,
            page_size,
            pretty,
        } => read_query(query).and_then(|esl| {
            let spec = SearchSpec {
                app_key,
                platform,
                index,
                doc_type,
                fields,
                esl_text: esl,
                system_condition,
            };
            let options = SearchOptions {
                spec,
                config_path: config,
                backend_url,
                page_size,
            };
            let output = cli::execute_search(&options)?;
            print_json(&output, pretty)
        }),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => match cli::get_doc_category(&category) {
            Ok(content) => {
                print!("{}", content);
                Ok(())
            }
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_query(query: Option<String>) -> Result<String, CliError> {
    match query {
        Some(s) => Ok(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            Ok(buffer)
        }
        None => Err(CliError::NoInput),
    }
}

fn print_json(value: &serde_json::Value, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }?;
    println!("{}", json);
    Ok(())
}

fn run_check(
    query: Option<String>,
    system_condition: String,
    pretty: bool,
    syntax_only: bool,
) -> Result<(), CliError> {
    let options = CheckOptions {
        query: read_query(query)?,
        system_condition,
        pretty,
        syntax_only,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Success(output) => print_json(&output, pretty)?,
    }
    Ok(())
}
