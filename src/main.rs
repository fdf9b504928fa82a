use std::process::ExitCode;

use track_renamer::output as out;
use track_renamer::RenamerError;

mod app;
mod logging;

fn main() -> ExitCode {
    let args = track_renamer::cli::parse();
    match app::run(args) {
        Ok(code) => code,
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            let code = e
                .downcast_ref::<RenamerError>()
                .map(|re| re.code())
                .unwrap_or(1);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
