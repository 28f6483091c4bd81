//! Common test utilities for turtle integration tests

use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

pub use turtle::{Executor, Status};

/// Run `input` in `executor` with stdout captured, returning status and output
pub fn eval_with(executor: &mut Executor, input: &str) -> Result<(Status, String), String> {
    let mut out = tempfile::tempfile().map_err(|e| e.to_string())?;
    let capture = out.try_clone().map_err(|e| e.to_string())?;
    executor.set_output(capture);

    let result = turtle::run(executor, input);
    executor.reset_streams();
    let status = result.map_err(|e| e.to_string())?;

    Ok((status, read_back(&mut out)))
}

/// Helper to evaluate turtle input in a fresh executor and return its output
pub fn eval(input: &str) -> Result<String, String> {
    eval_with(&mut Executor::new(), input).map(|(_, out)| out)
}

/// Helper to evaluate and get exit status
#[allow(dead_code)]
pub fn eval_exit_code(input: &str) -> Status {
    eval_with(&mut Executor::new(), input).unwrap().0
}

/// Write a script into `dir` and return its path
#[allow(dead_code)]
pub fn write_script(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn read_back(file: &mut File) -> String {
    let mut text = String::new();
    file.seek(SeekFrom::Start(0)).unwrap();
    file.read_to_string(&mut text).unwrap();
    text
}
