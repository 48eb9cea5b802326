use anyhow::Context;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::Path,
};

/// Helper function to append a line to a file, creating the file if missing.
pub fn append_line(path: &Path, line: &str) -> Result<(), anyhow::Error> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context(format!("Can't append file at {}", path.display()))?;
    writeln!(file, "{line}")?;
    Ok(())
}

/// Helper function to remove a file that logs the path of the file in case of an error.
pub fn remove_file(path: &Path) -> Result<(), anyhow::Error> {
    if path.exists() {
        fs::remove_file(path).context(format!("Can't remove file at {}", path.display()))
    } else {
        Ok(())
    }
}
