//! The built-in SCMOS deep-submicron technology configuration.

use arcstr::ArcStr;
use lazy_static::lazy_static;

use super::TechConfig;
use crate::PdkLib;

const SCN4M_DRC_CONFIG_TOML: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tech/scn4m/drc_config.toml"
));

lazy_static! {
    static ref SCN4M_CONFIG: TechConfig = TechConfig::from_toml(SCN4M_DRC_CONFIG_TOML)
        .expect("failed to load scn4m_subm tech config");
}

pub fn tech_config() -> TechConfig {
    SCN4M_CONFIG.clone()
}

/// A fresh [`PdkLib`] backed by the scn4m_subm rules.
pub fn pdk_lib(name: impl Into<ArcStr>) -> PdkLib {
    PdkLib::new(tech_config(), name)
}
