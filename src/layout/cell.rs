//! Cells, instances, and the abstract pin registry.

use std::sync::Arc;

use arcstr::ArcStr;
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::geom::{BoundBox, Point, Rect};
use crate::tech::Layer;

/// Shared handle to an immutable, fully-built cell.
pub type Ptr<T> = Arc<T>;

/// Orientation of a placed instance.
///
/// [`Rotation::R90`] rotates counterclockwise about the placement point, so
/// the footprint of a `w x h` cell lands to the left of its location.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Rotation {
    #[default]
    R0,
    R90,
}

/// A drawn rectangle on a single layer.
#[derive(Debug, Clone, Serialize)]
pub struct Element {
    pub net: Option<ArcStr>,
    pub layer: Layer,
    pub rect: Rect,
}

/// A named pin with one or more geometric shapes.
#[derive(Debug, Clone, Serialize)]
pub struct AbstractPort {
    pub net: ArcStr,
    pub shapes: Vec<(Layer, Rect)>,
}

impl AbstractPort {
    pub fn new(net: impl Into<ArcStr>) -> Self {
        Self {
            net: net.into(),
            shapes: Vec::new(),
        }
    }

    pub fn add_shape(&mut self, layer: Layer, rect: Rect) {
        self.shapes.push((layer, rect));
    }

    /// Absorbs all shapes of `other` into this port.
    pub fn merge(&mut self, other: AbstractPort) {
        self.shapes.extend(other.shapes);
    }

    pub fn largest_rect(&self, layer: Layer) -> Option<Rect> {
        self.shapes
            .iter()
            .filter(|(l, _)| *l == layer)
            .map(|(_, r)| *r)
            .max_by_key(|r| r.area())
    }

    fn transformed(&self, loc: Point, rotation: Rotation) -> Self {
        Self {
            net: self.net.clone(),
            shapes: self
                .shapes
                .iter()
                .map(|(l, r)| (*l, transform_rect(*r, loc, rotation)))
                .collect(),
        }
    }
}

/// The ordered boundary-pin registry of a cell.
#[derive(Debug, Clone, Serialize)]
pub struct Abstract {
    pub name: ArcStr,
    pub ports: Vec<AbstractPort>,
}

impl Abstract {
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            ports: Vec::new(),
        }
    }

    /// Registers a port. A port with the same net name absorbs the new
    /// shapes rather than creating a duplicate registration.
    pub fn add_port(&mut self, port: AbstractPort) {
        match self.ports.iter_mut().find(|p| p.net == port.net) {
            Some(existing) => existing.merge(port),
            None => self.ports.push(port),
        }
    }

    pub fn port(&self, net: &str) -> Option<&AbstractPort> {
        self.ports.iter().find(|p| p.net == net)
    }
}

/// The drawn content of a cell.
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub name: ArcStr,
    pub insts: Vec<Instance>,
    pub elems: Vec<Element>,
}

impl Layout {
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            insts: Vec::new(),
            elems: Vec::new(),
        }
    }

    pub fn add(&mut self, elem: Element) {
        self.elems.push(elem);
    }

    pub fn add_inst(&mut self, inst: Instance) {
        self.insts.push(inst);
    }

    pub fn bbox(&self) -> BoundBox {
        let mut bbox = BoundBox::empty();
        for elem in &self.elems {
            bbox = bbox.union(elem.rect);
        }
        for inst in &self.insts {
            let b = inst.bbox();
            if !b.is_empty() {
                bbox = bbox.union(b.into_rect());
            }
        }
        bbox
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Cell {
    pub name: ArcStr,
    pub abs: Option<Abstract>,
    pub layout: Option<Layout>,
}

impl Cell {
    pub fn empty(name: impl Into<ArcStr>) -> Self {
        let name = name.into();
        Self {
            abs: Some(Abstract::new(name.clone())),
            layout: Some(Layout::new(name.clone())),
            name,
        }
    }

    pub fn abs_mut(&mut self) -> &mut Abstract {
        let name = self.name.clone();
        self.abs.get_or_insert_with(|| Abstract::new(name))
    }

    pub fn layout_mut(&mut self) -> &mut Layout {
        let name = self.name.clone();
        self.layout.get_or_insert_with(|| Layout::new(name))
    }

    /// Registers a boundary pin shape, merging into an existing pin of the
    /// same name.
    pub fn add_pin(&mut self, net: impl Into<ArcStr>, layer: Layer, rect: Rect) {
        let mut port = AbstractPort::new(net);
        port.add_shape(layer, rect);
        self.abs_mut().add_port(port);
    }

    /// Looks up a boundary pin by name.
    pub fn port(&self, net: &str) -> Result<&AbstractPort> {
        self.abs
            .as_ref()
            .and_then(|abs| abs.port(net))
            .ok_or_else(|| Error::MissingPin {
                cell: self.name.clone(),
                port: net.into(),
            })
    }

    pub fn ports(&self) -> impl Iterator<Item = &AbstractPort> {
        self.abs.iter().flat_map(|abs| abs.ports.iter())
    }

    pub fn has_abstract(&self) -> bool {
        self.abs.is_some()
    }

    pub fn bbox(&self) -> BoundBox {
        self.layout
            .as_ref()
            .map(|l| l.bbox())
            .unwrap_or_else(BoundBox::empty)
    }
}

/// A placed copy of a cell.
///
/// Owns no geometry of its own; pin lookups resolve through the placement
/// transform.
#[derive(Debug, Clone, Serialize)]
pub struct Instance {
    pub inst_name: ArcStr,
    #[serde(serialize_with = "serialize_cell_ref", rename = "cell")]
    pub cell: Ptr<Cell>,
    pub loc: Point,
    pub rotation: Rotation,
}

impl Instance {
    pub fn new(inst_name: impl Into<ArcStr>, cell: Ptr<Cell>) -> Self {
        Self {
            inst_name: inst_name.into(),
            cell,
            loc: Point::zero(),
            rotation: Rotation::R0,
        }
    }

    /// The named pin of the underlying cell, moved through this instance's
    /// placement transform.
    pub fn port(&self, net: &str) -> Result<AbstractPort> {
        Ok(self.cell.port(net)?.transformed(self.loc, self.rotation))
    }

    pub fn ports(&self) -> Vec<AbstractPort> {
        self.cell
            .ports()
            .map(|p| p.transformed(self.loc, self.rotation))
            .collect()
    }

    pub fn bbox(&self) -> BoundBox {
        let bbox = self.cell.bbox();
        if bbox.is_empty() {
            return bbox;
        }
        let rect = transform_rect(bbox.into_rect(), self.loc, self.rotation);
        BoundBox::empty().union(rect)
    }
}

/// A collection of generated cells.
#[derive(Debug, Clone, Serialize)]
pub struct Library {
    pub name: ArcStr,
    #[serde(serialize_with = "serialize_cell_list")]
    pub cells: Vec<Ptr<Cell>>,
}

impl Library {
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            cells: Vec::new(),
        }
    }

    pub fn cell_named(&self, name: &str) -> Option<Ptr<Cell>> {
        self.cells.iter().find(|c| c.name == name).cloned()
    }
}

fn transform_rect(r: Rect, loc: Point, rotation: Rotation) -> Rect {
    let r = match rotation {
        Rotation::R0 => r,
        Rotation::R90 => Rect::new(
            Point::new(-r.p1.y, r.p0.x),
            Point::new(-r.p0.y, r.p1.x),
        ),
    };
    r.translated(loc)
}

fn serialize_cell_ref<S: Serializer>(cell: &Ptr<Cell>, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(cell.name.as_str())
}

fn serialize_cell_list<S: Serializer>(
    cells: &[Ptr<Cell>],
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    s.collect_seq(cells.iter().map(|c| c.as_ref()))
}

#[cfg(test)]
mod tests {
    use crate::geom::Span;

    use super::*;

    fn pin_cell() -> Cell {
        let mut cell = Cell::empty("unit");
        let rect = Rect::from_spans(Span::new(0, 600), Span::new(0, 2_000));
        cell.layout_mut().add(Element {
            net: None,
            layer: Layer::Metal2,
            rect,
        });
        cell.add_pin("a", Layer::Metal2, rect);
        cell
    }

    #[test]
    fn test_port_merge() {
        let mut cell = pin_cell();
        cell.add_pin(
            "a",
            Layer::Metal2,
            Rect::from_spans(Span::new(1_000, 1_600), Span::new(0, 2_000)),
        );
        let port = cell.port("a").unwrap();
        assert_eq!(port.shapes.len(), 2);
        assert!(cell.port("b").is_err());
    }

    #[test]
    fn test_instance_transform() {
        let cell = Ptr::new(pin_cell());

        let mut inst = Instance::new("x0", cell.clone());
        inst.loc = Point::new(5_000, 100);
        let r = inst.port("a").unwrap().largest_rect(Layer::Metal2).unwrap();
        assert_eq!(r, Rect::from_spans(Span::new(5_000, 5_600), Span::new(100, 2_100)));

        let mut rot = Instance::new("x1", cell);
        rot.loc = Point::new(5_000, 100);
        rot.rotation = Rotation::R90;
        let r = rot.port("a").unwrap().largest_rect(Layer::Metal2).unwrap();
        assert_eq!(
            r,
            Rect::from_spans(Span::new(3_000, 5_000), Span::new(100, 700))
        );
    }

    #[test]
    fn test_missing_pin_names_cell() {
        let cell = pin_cell();
        let err = cell.port("sel[0]").unwrap_err();
        assert!(err.to_string().contains("unit"));
        assert!(err.to_string().contains("sel[0]"));
    }
}
