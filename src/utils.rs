//! Helpers for persisting generated layout and netlist data.

use std::fs;
use std::io::BufWriter;
use std::path::Path;

use crate::layout::cell::Library;
use crate::schematic::Module;

pub fn save_lib(path: impl AsRef<Path>, lib: &Library) -> anyhow::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let f = BufWriter::new(fs::File::create(path)?);
    serde_json::to_writer_pretty(f, lib)?;
    Ok(())
}

pub fn save_modules(path: impl AsRef<Path>, modules: &[Module]) -> anyhow::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let f = BufWriter::new(fs::File::create(path)?);
    serde_json::to_writer_pretty(f, modules)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::config::ColumnMuxArrayParams;
    use crate::layout::mux::draw_column_mux_array;
    use crate::schematic::mux::column_mux_array;
    use crate::tech::scn4m;

    use super::*;

    #[test]
    fn test_save_lib() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("gds/colmux_array.json");

        let mut lib = scn4m::pdk_lib("test_save_lib");
        draw_column_mux_array(&mut lib, &ColumnMuxArrayParams::new(8, 4))?;
        save_lib(&path, &lib.lib)?;

        let raw = fs::read_to_string(&path)?;
        let value: serde_json::Value = serde_json::from_str(&raw)?;
        assert_eq!(value["name"], "test_save_lib");
        assert_eq!(value["cells"].as_array().unwrap().len(), 4);

        Ok(())
    }

    #[test]
    fn test_save_modules() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("netlist/colmux_array.json");

        let modules = column_mux_array(&ColumnMuxArrayParams::new(8, 4))?;
        save_modules(&path, &modules)?;

        let raw = fs::read_to_string(&path)?;
        let value: serde_json::Value = serde_json::from_str(&raw)?;
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[1]["name"], "column_mux_array");

        Ok(())
    }
}
