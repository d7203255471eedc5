use std::io::ErrorKind;
use std::{env, fs, io, process};

fn main() {
  let args: Vec<String> = env::args().collect();

  match args.as_slice() {
    [_, file] => run_file(file),
    [prog] => {
      eprintln!("Usage: {} <file>", prog);
      process::exit(64);
    }
    _ => {
      eprintln!("Usage: {} <file>", args[0]);
      process::exit(64);
    }
  }
}

fn run_file(filename: &str) {
  let source = read_file(filename);

  match wisp::interpret(&source) {
    Ok(()) => process::exit(0),
    Err(error) => {
      eprintln!("{}", error);
      process::exit(65);
    }
  }
}

/// Reads `filename` as UTF-8 source, turning the common `io::Error` kinds
/// into a friendly one-line message rather than a raw Rust error `Debug`
/// dump.
fn read_file(filename: &str) -> String {
  match fs::read_to_string(filename) {
    Ok(contents) => contents,
    Err(error) => {
      match error.kind() {
        ErrorKind::NotFound => eprintln!("File '{}' not found.", filename),
        ErrorKind::PermissionDenied => eprintln!("Need permission to open '{}'.", filename),
        ErrorKind::InvalidData => {
          eprintln!("File '{}' is not valid UTF-8 source text.", filename)
        }
        _ => eprintln!("Unexpected error when opening file '{}'.", filename),
      }
      process::exit(io_error_exit_code(&error));
    }
  }
}

fn io_error_exit_code(error: &io::Error) -> i32 {
  error.raw_os_error().unwrap_or(70)
}
