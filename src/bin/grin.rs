use grin::{decode_file, encode_file};
use std::env;
use std::process::ExitCode;

const USAGE: &str = "usage: grin <encode|decode> <infile> <outfile>";

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    }
    let (command, infile, outfile) = (&args[1], &args[2], &args[3]);

    let result = match command.to_lowercase().as_str() {
        "encode" => encode_file(infile, outfile).map(|_| ()),
        "decode" => decode_file(infile, outfile).map(|_| ()),
        _ => {
            eprintln!("unknown command '{}'", command);
            eprintln!("{}", USAGE);
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("grin {}: {}", command, e);
            ExitCode::FAILURE
        }
    }
}
