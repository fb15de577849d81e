pub use crate::error::{Error, Result};

pub mod config;
pub mod error;
pub mod geom;
pub mod layout;
pub mod schematic;
pub mod tech;
pub mod utils;

use arcstr::ArcStr;

use crate::layout::cell::Library;
use crate::tech::TechConfig;

/// A cell library together with the technology configuration its cells
/// were generated against.
pub struct PdkLib {
    pub tech: TechConfig,
    pub lib: Library,
}

impl PdkLib {
    pub fn new(tech: TechConfig, name: impl Into<ArcStr>) -> Self {
        Self {
            tech,
            lib: Library::new(name),
        }
    }

    pub fn save_json(&self, path: impl AsRef<std::path::Path>) -> anyhow::Result<()> {
        crate::utils::save_lib(path, &self.lib)
    }
}

pub fn bus_bit(name: &str, index: usize) -> ArcStr {
    arcstr::format!("{name}[{index}]")
}

#[cfg(test)]
mod tests {
    use super::bus_bit;

    #[test]
    fn test_bus_bit() {
        assert_eq!(bus_bit("bl", 3), "bl[3]");
        assert_eq!(bus_bit("sel", 0), "sel[0]");
    }
}
