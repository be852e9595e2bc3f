use std::process::ExitCode;

fn main() -> ExitCode {
    expense_tracker_lib::run()
}
