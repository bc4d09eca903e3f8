use anyhow::Result;
use colored::*;
use filehash_core::{compute_file_hash, Processor, Resolved};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

/// At least one selected file could not be hashed
pub const EXIT_HASH_FAILURE: u8 = 1;
/// Not found, unsupported type, not a file or folder, or bad configuration
pub const EXIT_INPUT_REJECTED: u8 = 2;

pub fn prompt_for_path() -> io::Result<String> {
    print!("File or Folder Path: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

pub fn run(processor: &Processor, path: &Path, json: bool) -> Result<ExitCode> {
    if json {
        return run_json(processor, path);
    }

    let resolved = match processor.resolve(path) {
        Ok(resolved) => resolved,
        Err(err) if err.is_warning() => {
            for warning in err.walk_warnings() {
                println!("{}", format!("Warning: {}", warning).yellow());
            }
            println!("{}", format!("Warning: {}.", err).yellow());
            return Ok(ExitCode::SUCCESS);
        }
        Err(err) => {
            println!("{}", format!("Error: {}", err).red());
            return Ok(ExitCode::from(EXIT_INPUT_REJECTED));
        }
    };

    match &resolved {
        Resolved::File { path, extension } => {
            println!(
                "Processing single file: '{}' (Type: '{}')",
                path.display(),
                extension
            );
        }
        Resolved::Directory { root, selection } => {
            println!("Processing folder recursively: '{}'", root.display());
            for warning in &selection.warnings {
                println!("{}", format!("Warning: {}", warning).yellow());
            }
        }
    }

    let files = resolved.files();
    println!("\n--- Hashing {} Supported Files ---", files.len());

    let mut failed = 0usize;
    for file in files {
        match compute_file_hash(file) {
            Ok(digest) => println!("File: '{}'\n  Hash: {}\n", file.display(), digest),
            Err(err) => {
                failed += 1;
                println!("{}", err.to_string().red());
            }
        }
    }

    if failed > 0 {
        println!(
            "{}",
            format!("{} of {} files could not be hashed.", failed, files.len()).red()
        );
        return Ok(ExitCode::from(EXIT_HASH_FAILURE));
    }
    Ok(ExitCode::SUCCESS)
}

fn run_json(processor: &Processor, path: &Path) -> Result<ExitCode> {
    let (value, code) = match processor.run(path) {
        Ok(report) => {
            let code = if report.all_succeeded() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_HASH_FAILURE)
            };
            (serde_json::to_value(&report)?, code)
        }
        Err(err) if err.is_warning() => (
            serde_json::json!({
                "input": path,
                "warning": err.to_string(),
                "warnings": err.walk_warnings(),
                "results": [],
            }),
            ExitCode::SUCCESS,
        ),
        Err(err) => (
            serde_json::json!({ "input": path, "error": err.to_string() }),
            ExitCode::from(EXIT_INPUT_REJECTED),
        ),
    };

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(code)
}
