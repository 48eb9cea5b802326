use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};
use std::{fs, path::Path};

/// Serialize a value as pretty-printed JSON, as written to the settings and
/// snapshot files.
pub fn serialize(value: impl Serialize) -> Result<Vec<u8>, anyhow::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

pub fn deserialize<T: DeserializeOwned>(slice: &[u8]) -> Result<T, anyhow::Error> {
    let value = serde_json::from_slice(slice)?;
    Ok(value)
}

/// Read and deserialize a JSON file, reporting the path in case of an error.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, anyhow::Error> {
    let buf =
        fs::read(path).context(format!("Can't read JSON file at {}", path.display()))?;
    deserialize(&buf).context(format!("Can't parse JSON file at {}", path.display()))
}

/// Serialize and write a JSON file, reporting the path in case of an error.
pub fn write_json(path: &Path, value: impl Serialize) -> Result<(), anyhow::Error> {
    let buf = serialize(value)?;
    fs::write(path, buf).context(format!("Can't write JSON file at {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_write_json() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("value.json");

        write_json(&path, vec![1, 2, 3]).unwrap();
        let value: Vec<u32> = read_json(&path).unwrap();
        assert_eq!(value, vec![1, 2, 3]);
    }

    #[test]
    fn test_read_json_missing_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("missing.json");
        let res = read_json::<Vec<u32>>(&path);
        assert!(res.is_err());
    }
}
