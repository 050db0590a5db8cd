use std::env;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use toml::Value;

/// Generated `app_metadata.rs`, included by `libs::data_storage`.
struct MetadataFile {
    file: File,
}

impl MetadataFile {
    fn create(out_dir: &str) -> io::Result<Self> {
        let file = File::create(Path::new(out_dir).join("app_metadata.rs"))?;
        Ok(Self { file })
    }

    fn constant(&mut self, key: &str, value: &str) -> io::Result<()> {
        writeln!(
            self.file,
            "#[allow(unused)]\npub const APP_METADATA_{}: &str = {:?};",
            key.to_uppercase(),
            value
        )
    }
}

fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed=Cargo.toml");

    let out_dir = env::var("OUT_DIR").map_err(|e| io::Error::new(io::ErrorKind::NotFound, e))?;
    let manifest: Value = toml::from_str(&fs::read_to_string("Cargo.toml")?)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let mut metadata_file = MetadataFile::create(&out_dir)?;
    metadata_file.constant("NAME", env!("CARGO_PKG_NAME"))?;
    metadata_file.constant("VERSION", env!("CARGO_PKG_VERSION"))?;

    // [package.metadata] string entries, e.g. `owner`
    let package_metadata = manifest
        .get("package")
        .and_then(|package| package.get("metadata"))
        .and_then(Value::as_table);
    if let Some(entries) = package_metadata {
        for (key, value) in entries {
            if let Some(value) = value.as_str() {
                metadata_file.constant(key, value)?;
            }
        }
    }

    Ok(())
}
