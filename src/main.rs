use std::{
    fs::read_to_string,
    io::{self, Read},
    path::PathBuf,
    process::ExitCode,
    str::FromStr,
    time::Instant,
};

use clap::Parser;
use hobby::{
    ast::ast::{Node, NodeType},
    display_error,
    lexer::lexer::tokenize,
    parser::{parser::ScriptParser, source::TokenStream},
};
use log::{debug, error, LevelFilter};

#[derive(Parser)]
#[command(name = "hobby")]
#[command(about = "Parses a hobby script and prints its syntax trees")]
struct Args {
    /// Script to parse, read from stdin when omitted
    file: Option<PathBuf>,
    /// Log level (off, error, warn, info, debug, trace), overrides RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
    /// Print the token stream instead of parsing it
    #[arg(long)]
    tokens: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = args
        .log_level
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "WARN".to_owned());
    let level = LevelFilter::from_str(&level).unwrap_or(LevelFilter::Warn);

    if simplelog::TermLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_time_format_custom(&[])
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )
    .is_err()
    {
        eprintln!("Failed to initialise logging");
    }

    let (file_name, source) = match read_source(&args) {
        Ok(read) => read,
        Err(err) => {
            error!("failed to read script: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    let tokens = match tokenize(source.clone(), Some(file_name)) {
        Ok(tokens) => tokens,
        Err(err) => {
            display_error(&err, &source);
            return ExitCode::FAILURE;
        }
    };
    debug!("Tokenized in {:?}", start.elapsed());

    if args.tokens {
        for token in &tokens {
            println!("{}", token);
        }
        return ExitCode::SUCCESS;
    }

    let parser = match ScriptParser::new() {
        Ok(parser) => parser,
        Err(err) => {
            error!("invalid grammar: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let parse_start = Instant::now();
    let mut stream = TokenStream::new(tokens);

    while stream.has_tokens() {
        match parser.parse_statement(&mut stream) {
            Ok(stmt) if stmt.get_node_type() == NodeType::Empty => {}
            Ok(stmt) => println!("{}", stmt),
            Err(err) => {
                display_error(&err, &source);
                return ExitCode::FAILURE;
            }
        }
    }

    debug!("Parsed in {:?}", parse_start.elapsed());
    ExitCode::SUCCESS
}

fn read_source(args: &Args) -> io::Result<(String, String)> {
    match &args.file {
        Some(path) => {
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("unknown")
                .to_string();
            Ok((file_name, read_to_string(path)?))
        }
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok((String::from("stdin"), source))
        }
    }
}
