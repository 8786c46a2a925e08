use std::process::ExitCode;

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    chatdesk::cli::main()
}
