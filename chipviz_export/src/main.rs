use std::process::ExitCode;

fn main() -> ExitCode {
    match chipviz_export::run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("chipviz-export: {e}");
            ExitCode::FAILURE
        }
    }
}
