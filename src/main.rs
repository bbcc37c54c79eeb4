use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use inkwell::context::Context;

use lagoon_compiler::ast::Literal;
use lagoon_compiler::compiler::CompilationContext;
use lagoon_compiler::error::CompileResult;
use lagoon_compiler::lexer::{tokenize, TokenKind};
use lagoon_compiler::parser::parse_program;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Emit {
    /// The token stream
    Tokens,
    /// The parsed tree as an s-expression
    Ast,
    /// The LLVM module
    Ir,
}

/// Compile an arithmetic expression to LLVM IR.
#[derive(Debug, Parser)]
#[command(name = "lagoon", version)]
struct Cli {
    /// Source file. Read from stdin when neither FILE nor --expr is given.
    file: Option<PathBuf>,

    /// Compile this expression instead of reading a file.
    #[arg(short, long, conflicts_with = "file")]
    expr: Option<String>,

    /// What to print on success.
    #[arg(long, value_enum, default_value_t = Emit::Ir)]
    emit: Emit,

    /// Name of the generated LLVM module.
    #[arg(long, default_value = "lagoon")]
    module_name: String,

    /// Bind a named value before lowering, e.g. `-D x=2.5`.
    #[arg(short = 'D', long = "define", value_name = "NAME=NUMBER", value_parser = parse_define)]
    defines: Vec<(String, Literal)>,

    /// Declare an all-double external function, e.g. `--extern sin/1`.
    #[arg(long = "extern", value_name = "NAME/ARITY", value_parser = parse_extern)]
    externs: Vec<(String, usize)>,
}

fn is_identifier(name: &str) -> bool {
    matches!(
        tokenize(name).as_deref(),
        Ok([ident, eof]) if ident.kind == TokenKind::Identifier && eof.kind == TokenKind::Eof
    )
}

fn parse_define(arg: &str) -> Result<(String, Literal), String> {
    let (name, number) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=NUMBER, got `{}`", arg))?;
    if !is_identifier(name) {
        return Err(format!("`{}` is not an identifier", name));
    }

    let (negative, digits) = match number.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, number),
    };
    let tokens = tokenize(digits).map_err(|err| err.to_string())?;
    let literal = match tokens.as_slice() {
        [token, eof] if eof.kind == TokenKind::Eof => match token.kind {
            TokenKind::Integer(value) if negative => Literal::Integer(-value),
            TokenKind::Integer(value) => Literal::Integer(value),
            TokenKind::Float(value) if negative => Literal::Float(-value),
            TokenKind::Float(value) => Literal::Float(value),
            _ => return Err(format!("`{}` is not a number", number)),
        },
        _ => return Err(format!("`{}` is not a number", number)),
    };
    Ok((name.to_string(), literal))
}

fn parse_extern(arg: &str) -> Result<(String, usize), String> {
    let (name, arity) = arg
        .split_once('/')
        .ok_or_else(|| format!("expected NAME/ARITY, got `{}`", arg))?;
    if !is_identifier(name) {
        return Err(format!("`{}` is not an identifier", name));
    }
    let arity = arity
        .parse::<usize>()
        .map_err(|err| format!("invalid arity `{}`: {}", arity, err))?;
    Ok((name.to_string(), arity))
}

fn read_source(cli: &Cli) -> io::Result<(String, String)> {
    if let Some(expr) = &cli.expr {
        return Ok((expr.clone(), "<expr>".to_string()));
    }
    match &cli.file {
        Some(path) => Ok((fs::read_to_string(path)?, path.display().to_string())),
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok((source, "<stdin>".to_string()))
        }
    }
}

fn run(cli: &Cli, source: &str) -> CompileResult<String> {
    match cli.emit {
        Emit::Tokens => {
            let tokens = tokenize(source)?;
            Ok(tokens
                .iter()
                .map(|token| {
                    format!(
                        "{:?} {:?} {}..{}\n",
                        token.kind, token.lexeme, token.span.start, token.span.end
                    )
                })
                .collect())
        }
        Emit::Ast => Ok(format!("{}\n", parse_program(source)?)),
        Emit::Ir => {
            let context = Context::create();
            let mut ctx = CompilationContext::new(&context, &cli.module_name);
            for (name, literal) in &cli.defines {
                match *literal {
                    Literal::Integer(value) => ctx.bind_int(name.as_str(), value),
                    Literal::Float(value) => ctx.bind_float(name.as_str(), value),
                }
            }
            for (name, arity) in &cli.externs {
                ctx.declare_extern(name, *arity)?;
            }
            ctx.compile_source(source)?;
            Ok(ctx.print_to_string())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (source, filename) = match read_source(&cli) {
        Ok(input) => input,
        Err(err) => {
            eprintln!("error: failed to read input: {}", err);
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, &source) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            if err.eprint(&source, &filename, io::stderr().is_terminal()).is_err() {
                eprintln!("{}: {}", err.kind_name(), err);
            }
            ExitCode::FAILURE
        }
    }
}
