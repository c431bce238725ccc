use std::process::ExitCode;

fn main() -> ExitCode {
    rillc::run()
}
