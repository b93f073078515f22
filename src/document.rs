//! Document I/O - reading and writing JSON files, and addressing nested
//! entities inside a loaded document by JSON pointer (`/location/planet`).

use crate::entity::Entity;
use crate::error::{EchoError, Result};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

pub fn read_json(path: &Path) -> Result<Value> {
    debug!("Reading {}", path.display());
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

pub fn write_json(path: &Path, data: &Value) -> Result<()> {
    debug!("Writing {}", path.display());
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, data)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn get<'a>(doc: &'a Value, pointer: &str) -> Result<&'a Value> {
    doc.pointer(pointer)
        .ok_or_else(|| EchoError::MissingPath(pointer.to_string()))
}

/// Copy of the object stored at `pointer`.
pub fn get_entity(doc: &Value, pointer: &str) -> Result<Entity> {
    get(doc, pointer)?
        .as_object()
        .cloned()
        .ok_or_else(|| EchoError::InvalidField {
            field: pointer.to_string(),
            reason: "expected an object".to_string(),
        })
}

/// Replace the value at `pointer`. The location must already exist.
pub fn set(doc: &mut Value, pointer: &str, value: Value) -> Result<()> {
    let slot = doc
        .pointer_mut(pointer)
        .ok_or_else(|| EchoError::MissingPath(pointer.to_string()))?;
    *slot = value;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_pointer_access() {
        let mut doc = json!({
            "visiting_starships": {"freighters": [{"name": "Falcon"}, {"pilot": {"name": "Dash"}}]}
        });

        let pilot = get_entity(&doc, "/visiting_starships/freighters/1/pilot").unwrap();
        assert_eq!(pilot["name"], json!("Dash"));

        set(&mut doc, "/visiting_starships/freighters/0", json!({"name": "Millennium Falcon"})).unwrap();
        assert_eq!(doc["visiting_starships"]["freighters"][0]["name"], json!("Millennium Falcon"));
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let mut doc = json!({"location": {}});
        assert!(matches!(get(&doc, "/location/planet"), Err(EchoError::MissingPath(_))));
        assert!(set(&mut doc, "/garrison/commander", json!({})).is_err());
        assert!(matches!(
            get_entity(&json!({"a": [1]}), "/a"),
            Err(EchoError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("planets.json");

        let data = json!([{"name": "Hoth", "population": null}]);
        write_json(&path, &data).unwrap();
        assert_eq!(read_json(&path).unwrap(), data);
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_json(&temp_dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, EchoError::Io(_)));
    }
}
