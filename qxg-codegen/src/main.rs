use std::path::PathBuf;
use std::process::ExitCode;

use qxg_codegen::{driver, error::{CodeGenError, CodeGenErrorKind}, verify};

fn main() -> ExitCode {
    env_logger::init();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> Result<(), CodeGenError> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.as_slice() {
        [flag, xsd] if flag == "--verify" => {
            verify::verify_against_meta_schema(&PathBuf::from(xsd))
        }
        [flag, xsd, hdr, src] if flag == "--skip-verify" => {
            driver::generate(&PathBuf::from(xsd), &PathBuf::from(hdr), &PathBuf::from(src)).map(|_| ())
        }
        [xsd, hdr, src] => {
            // A meta-schema failure is a warning in normal mode (§7); only
            // `--verify` treats it as fatal. Any other error (I/O, parse)
            // still aborts the run.
            if let Err(e) = verify::verify_against_meta_schema(&PathBuf::from(xsd)) {
                match &*e.kind {
                    CodeGenErrorKind::MetaValidation(msg) => {
                        log::warn!("schema failed meta-schema validation: {msg}");
                    }
                    _ => return Err(e),
                }
            }
            driver::generate(&PathBuf::from(xsd), &PathBuf::from(hdr), &PathBuf::from(src)).map(|_| ())
        }
        _ => {
            eprintln!(
                "Usage:\n  qxmlcodegen <xsd> <hdr> <src>\n  qxmlcodegen --skip-verify <xsd> <hdr> <src>\n  qxmlcodegen --verify <xsd>"
            );
            Err(CodeGenError::other("invalid command-line arguments"))
        }
    }
}
