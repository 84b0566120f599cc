use std::process::ExitCode;

fn main() -> ExitCode {
    match githunts::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            githunts::ui::output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
