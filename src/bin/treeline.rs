//! Command-line interface for treeline
//!
//! Usage:
//!   treeline parse `<path>` [--format `<name>`] [--output `<json|yaml>`]  - Parse a document and print it
//!   treeline check `<path>` [--format `<name>`]                         - Validate a document
//!   treeline formats                                                  - List registered formats

use clap::{Arg, Command};

use treeline::TreelinePipeline;

fn main() {
    let matches = Command::new("treeline")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for parsing treeline outline documents")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("parse")
                .about("Parse a document and print the result")
                .arg(
                    Arg::new("path")
                        .help("Path to the document")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Input format name")
                        .default_value("tree"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output serialization ('json' or 'yaml')")
                        .default_value("json"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Validate a document")
                .arg(
                    Arg::new("path")
                        .help("Path to the document")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Input format name")
                        .default_value("tree"),
                ),
        )
        .subcommand(Command::new("formats").about("List registered formats"))
        .get_matches();

    match matches.subcommand() {
        Some(("parse", parse_matches)) => {
            let path = parse_matches.get_one::<String>("path").unwrap();
            let format = parse_matches.get_one::<String>("format").unwrap();
            let output = parse_matches.get_one::<String>("output").unwrap();
            handle_parse_command(path, format, output);
        }
        Some(("check", check_matches)) => {
            let path = check_matches.get_one::<String>("path").unwrap();
            let format = check_matches.get_one::<String>("format").unwrap();
            handle_check_command(path, format);
        }
        Some(("formats", _)) => {
            handle_formats_command();
        }
        _ => unreachable!(),
    }
}

fn read_source(path: &str) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|err| {
        eprintln!("Error reading file: {}", err);
        std::process::exit(1);
    })
}

/// Handle the parse command
fn handle_parse_command(path: &str, format: &str, output: &str) {
    let source = read_source(path);

    let mut pipeline = TreelinePipeline::new();
    let doc = pipeline.parse_as(&source, format).unwrap_or_else(|err| {
        eprintln!("Parse error: {}", err);
        std::process::exit(1);
    });

    let rendered = match output {
        "json" => serde_json::to_string_pretty(&doc).unwrap_or_else(|err| {
            eprintln!("Serialization error: {}", err);
            std::process::exit(1);
        }),
        "yaml" => serde_yaml::to_string(&doc).unwrap_or_else(|err| {
            eprintln!("Serialization error: {}", err);
            std::process::exit(1);
        }),
        other => {
            eprintln!("Unknown output format '{}'; expected 'json' or 'yaml'", other);
            std::process::exit(1);
        }
    };

    println!("{}", rendered);
}

/// Handle the check command
fn handle_check_command(path: &str, format: &str) {
    let source = read_source(path);

    let mut pipeline = TreelinePipeline::new();
    match pipeline.parse_as(&source, format) {
        Ok(doc) => {
            println!("{}: ok ({} top-level tasks)", path, doc.tasks.len());
        }
        Err(err) => {
            eprintln!("{}: {}", path, err);
            std::process::exit(1);
        }
    }
}

/// Handle the formats command
fn handle_formats_command() {
    let pipeline = TreelinePipeline::new();
    println!("Registered formats:\n");
    for name in pipeline.available_formats() {
        println!("  {}", name);
    }
}
