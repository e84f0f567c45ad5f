use std::fs;
use std::process;

use clap::{Parser as ClapParser, Subcommand};
use colored::Colorize;

use rove::environment::Environment;
use rove::interpreter::Interpreter;
use rove::lexer::{Lexer, TokenKind};
use rove::parser::Parser;

#[derive(ClapParser)]
#[command(name = "rove", about = "The Rove language interpreter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a Rove file and print the final environment
    Run {
        file: String,
        /// Print the final environment as JSON
        #[arg(long)]
        json: bool,
    },
    /// Dump the token stream of a Rove file
    Tokens { file: String },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run { file, json } => run(&file, json),
        Commands::Tokens { file } => tokens(&file),
    };
    if let Err(msg) = result {
        eprintln!("{}", msg.red());
        process::exit(1);
    }
}

fn read_file(path: &str) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("Cannot open file '{}': {}", path, e))
}

fn run(file: &str, json: bool) -> Result<(), String> {
    let source = read_file(file)?;
    let lexer = Lexer::new(&source);
    let mut parser = Parser::new(lexer).map_err(|e| format!("Lexing error: {}", e))?;
    let program = parser.parse().map_err(|e| format!("Parsing error: {}", e))?;

    let env = Environment::new();
    let mut interpreter = Interpreter::new();
    interpreter
        .exec_ast(&program, &env)
        .map_err(|e| format!("Runtime error: {}", e))?;

    if json {
        println!("{}", env.borrow().to_json());
    } else {
        println!("Env content:");
        for line in env.borrow().to_strings() {
            println!("{}", line);
        }
    }
    Ok(())
}

fn tokens(file: &str) -> Result<(), String> {
    let source = read_file(file)?;
    let mut lexer = Lexer::new(&source);
    loop {
        let token = lexer
            .next_token()
            .map_err(|e| format!("Lexing error: {}", e))?;
        println!(
            "{:>4}:{:<4} {:?} {:?}",
            token.line, token.col, token.kind, token.lexeme
        );
        if token.kind == TokenKind::Eof {
            return Ok(());
        }
    }
}
