use arcstr::ArcStr;
use serde::{Deserialize, Serialize};

use super::Instance;
use crate::geom::Int;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MosType {
    Nmos,
    Pmos,
}

/// A four-terminal MOS device instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mosfet {
    pub name: ArcStr,
    pub width: Int,
    pub length: Int,
    pub drain: ArcStr,
    pub gate: ArcStr,
    pub source: ArcStr,
    pub body: ArcStr,
    pub mos_type: MosType,
}

impl From<Mosfet> for Instance {
    fn from(m: Mosfet) -> Self {
        Instance {
            name: m.name,
            module: match m.mos_type {
                MosType::Nmos => arcstr::literal!("nmos"),
                MosType::Pmos => arcstr::literal!("pmos"),
            },
            connections: vec![m.drain, m.gate, m.source, m.body],
            params: vec![
                (arcstr::literal!("w"), m.width),
                (arcstr::literal!("l"), m.length),
            ],
        }
    }
}
