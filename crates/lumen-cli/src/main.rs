//! lumen CLI tool
//!
//! Highlights a source file and dumps the resulting token stream.
//!
//! Usage:
//!   lumen [--lang <name>] [--json] [--coalesce] [file]
//!
//! With no file argument, or with `-`, the source is read from stdin.

use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use lumen_highlight::{HighlightOptions, Lang, highlight};
use lumen_token::Token;
use serde_json::json;

const EXIT_SUCCESS: u8 = 0;
const EXIT_USAGE_ERROR: u8 = 1;
const EXIT_IO_ERROR: u8 = 2;

struct Args {
    lang: String,
    json: bool,
    coalesce: bool,
    input: Option<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        lang: "mmml".to_string(),
        json: false,
        coalesce: false,
        input: None,
    };

    let mut argv = std::env::args().skip(1);
    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--json" => args.json = true,
            "--coalesce" => args.coalesce = true,
            "--lang" => {
                args.lang = argv
                    .next()
                    .ok_or_else(|| "--lang requires a language name".to_string())?;
            }
            "--help" | "-h" => {
                return Err("usage: lumen [--lang <name>] [--json] [--coalesce] [file]".into());
            }
            _ if arg.starts_with("--") => {
                return Err(format!("unknown option: {arg}"));
            }
            _ => {
                if args.input.replace(arg).is_some() {
                    return Err("more than one input file given".into());
                }
            }
        }
    }
    Ok(args)
}

fn read_source(input: Option<&str>) -> io::Result<String> {
    match input {
        None | Some("-") => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
        Some(path) => fs::read_to_string(path),
    }
}

fn print_tokens(tokens: &[Token], json: bool) {
    if json {
        let entries: Vec<_> = tokens
            .iter()
            .map(|t| {
                json!({
                    "begin": t.begin,
                    "length": t.length,
                    "kind": t.kind.as_str(),
                })
            })
            .collect();
        println!("{}", serde_json::Value::Array(entries));
    } else {
        for token in tokens {
            println!("{}..{} {}", token.begin, token.end(), token.kind.as_str());
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let Some(lang) = Lang::from_name(&args.lang) else {
        eprintln!("unknown language: {}", args.lang);
        return ExitCode::from(EXIT_USAGE_ERROR);
    };

    let source = match read_source(args.input.as_deref()) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error reading input: {err}");
            return ExitCode::from(EXIT_IO_ERROR);
        }
    };

    let options = HighlightOptions {
        coalescing: args.coalesce,
    };
    print_tokens(&highlight(&source, lang, options), args.json);
    ExitCode::from(EXIT_SUCCESS)
}
