//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = shillscope_cli::run() {
        eprintln!("shillscope: {err}");
        std::process::exit(1);
    }
}
