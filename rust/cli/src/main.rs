use std::io;
use std::process::ExitCode;

use xidach_table::{init_logging, LogFormat};

fn main() -> ExitCode {
    // Table logs go to stderr only when XIDACH_LOG names a format
    if let Ok(value) = std::env::var("XIDACH_LOG") {
        match LogFormat::parse(&value) {
            Some(format) => {
                if let Err(e) = init_logging(format) {
                    eprintln!("Warning: logging disabled: {e}");
                }
            }
            None => eprintln!("Warning: unknown XIDACH_LOG format '{value}', expected text or json"),
        }
    }

    let code = xidach_cli::run(std::env::args(), &mut io::stdout(), &mut io::stderr());
    ExitCode::from(u8::try_from(code).unwrap_or(2))
}
