//! Binary entrypoint for the `canvas` command.

fn main() {
    std::process::exit(canvas_cli::run());
}
