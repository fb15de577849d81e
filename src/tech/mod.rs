//! Process design-rule configuration.

use std::collections::HashMap;
use std::fmt::Display;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geom::Int;

pub mod scn4m;

/// Layers known to the generators.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Poly,
    Contact,
    Metal1,
    Via1,
    Metal2,
    Nwell,
    Pwell,
}

impl Layer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Poly => "poly",
            Self::Contact => "contact",
            Self::Metal1 => "metal1",
            Self::Via1 => "via1",
            Self::Metal2 => "metal2",
            Self::Nwell => "nwell",
            Self::Pwell => "pwell",
        }
    }
}

impl Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Nano,
    Micro,
    Angstrom,
}

/// A three-layer contact stack: bottom routing layer, cut, top routing layer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct ContactStack {
    pub bot: Layer,
    pub cut: Layer,
    pub top: Layer,
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct SpacingConfig {
    pub from: Layer,
    pub to: Layer,
    pub dist: Int,
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct Enclosure {
    pub layer: Layer,
    pub enclosure: Int,
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct LayerConfig {
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub width: Int,
    #[serde(default)]
    pub space: Int,
    #[serde(default)]
    pub area: Int,
    pub layernum: i16,
    #[serde(default)]
    pub enclosures: Vec<Enclosure>,
}

impl LayerConfig {
    /// The minimum enclosure of this layer by layer `l`.
    pub fn enclosure(&self, l: Layer) -> Int {
        self.enclosures
            .iter()
            .filter(|enc| enc.layer == l)
            .map(|enc| enc.enclosure)
            .max()
            .unwrap_or_default()
    }
}

/// A technology's design-rule values.
///
/// Resolved once at generator construction and handed down read-only;
/// accessors fail hard on layers or stacks absent from the table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TechConfig {
    pub grid: Int,
    pub tech: String,
    pub units: Units,
    layers: HashMap<Layer, LayerConfig>,
    spacing: Vec<SpacingConfig>,
    stacks: HashMap<String, ContactStack>,
}

impl TechConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let txt = std::fs::read_to_string(path)?;
        Self::from_toml(&txt)
    }

    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn layer(&self, l: Layer) -> Result<&LayerConfig> {
        self.layers.get(&l).ok_or(Error::MissingLayer(l))
    }

    /// The minimum spacing between `from` and `to`, from the cross-layer
    /// spacing table.
    pub fn space(&self, from: Layer, to: Layer) -> Result<Int> {
        self.spacing
            .iter()
            .find(|s| (s.from == from && s.to == to) || (s.to == from && s.from == to))
            .map(|s| s.dist)
            .ok_or(Error::MissingSpacing { from, to })
    }

    pub fn stack(&self, stack: &str) -> Result<&ContactStack> {
        self.stacks
            .get(stack)
            .ok_or_else(|| Error::MissingStack(stack.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scn4m_design_rules() -> anyhow::Result<()> {
        let tc = scn4m::tech_config();

        assert_eq!(&tc.tech, "scn4m_subm");
        assert_eq!(tc.units, Units::Nano);
        assert_eq!(tc.layer(Layer::Poly)?.width, 400);
        assert_eq!(tc.layer(Layer::Metal2)?.space, 800);
        assert_eq!(tc.layer(Layer::Via1)?.enclosure(Layer::Metal2), 150);
        assert_eq!(tc.layer(Layer::Contact)?.enclosure(Layer::Poly), 150);
        assert_eq!(tc.space(Layer::Nwell, Layer::Pwell)?, 3600);
        assert_eq!(tc.space(Layer::Pwell, Layer::Nwell)?, 3600);

        let stack = tc.stack("m1m2")?;
        assert_eq!(stack.bot, Layer::Metal1);
        assert_eq!(stack.cut, Layer::Via1);
        assert_eq!(stack.top, Layer::Metal2);

        Ok(())
    }

    #[test]
    fn test_missing_rules_fail_hard() {
        let tc = scn4m::tech_config();
        assert!(matches!(
            tc.space(Layer::Poly, Layer::Metal2),
            Err(crate::Error::MissingSpacing { .. })
        ));
        assert!(matches!(
            tc.stack("m2m3"),
            Err(crate::Error::MissingStack(_))
        ));
    }

    #[test]
    fn test_serialize_layer() -> anyhow::Result<()> {
        let layer = LayerConfig {
            desc: "test layer".into(),
            width: 200,
            space: 300,
            area: 0,
            layernum: 67,
            enclosures: vec![Enclosure {
                layer: Layer::Metal1,
                enclosure: 100,
            }],
        };

        let s = toml::to_string(&layer)?;
        let layer2: LayerConfig = toml::from_str(&s)?;
        assert_eq!(layer, layer2);

        Ok(())
    }
}
