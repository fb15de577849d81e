//! Netlist data structures and generation.

pub mod mos;
pub mod mux;

use arcstr::ArcStr;
use serde::{Deserialize, Serialize};

use crate::geom::Int;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    Input,
    Output,
    InOut,
}

/// A named signal or bus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signal {
    pub name: ArcStr,
    pub width: usize,
}

pub fn signal(name: impl Into<ArcStr>) -> Signal {
    Signal {
        name: name.into(),
        width: 1,
    }
}

pub fn bus(name: impl Into<ArcStr>, width: usize) -> Signal {
    Signal {
        name: name.into(),
        width,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Port {
    pub signal: Signal,
    pub direction: PortDirection,
}

pub fn port_input(s: &Signal) -> Port {
    Port {
        signal: s.to_owned(),
        direction: PortDirection::Input,
    }
}

pub fn port_output(s: &Signal) -> Port {
    Port {
        signal: s.to_owned(),
        direction: PortDirection::Output,
    }
}

pub fn port_inout(s: &Signal) -> Port {
    Port {
        signal: s.to_owned(),
        direction: PortDirection::InOut,
    }
}

/// An instantiated module or primitive.
///
/// `connections` lists one net per port, in the instantiated module's port
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instance {
    pub name: ArcStr,
    pub module: ArcStr,
    pub connections: Vec<ArcStr>,
    pub params: Vec<(ArcStr, Int)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Module {
    pub name: ArcStr,
    pub ports: Vec<Port>,
    pub instances: Vec<Instance>,
}

impl Module {
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            ports: Vec::new(),
            instances: Vec::new(),
        }
    }

    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.signal.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_ports() {
        let mut m = Module::new("test");
        let a = bus("a", 4);
        let clk = signal("clk");
        m.ports.push(port_inout(&a));
        m.ports.push(port_input(&clk));

        assert_eq!(m.port("a").unwrap().signal.width, 4);
        assert_eq!(m.port("clk").unwrap().direction, PortDirection::Input);
        assert!(m.port("b").is_none());
    }
}
