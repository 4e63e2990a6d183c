use std::process::ExitCode;

fn main() -> ExitCode {
    match gifboxd::run_engine() {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("gifboxd: {error}");
            ExitCode::FAILURE
        }
    }
}
