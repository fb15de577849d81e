//! Contact and via generation.

use std::fmt::Display;

use arcstr::ArcStr;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geom::{BoundBox, Int, Point, Rect, Span};
use crate::layout::cell::{Cell, Element, Instance, Layout, Ptr, Rotation};
use crate::tech::TechConfig;

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Builder)]
pub struct ContactParams {
    #[builder(setter(into))]
    pub stack: String,
    #[builder(default = "1")]
    pub rows: Int,
    #[builder(default = "1")]
    pub cols: Int,
}

impl ContactParams {
    #[inline]
    pub fn builder() -> ContactParamsBuilder {
        ContactParamsBuilder::default()
    }
}

impl Display for ContactParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}x{}", &self.stack, self.rows, self.cols)
    }
}

/// A generated contact cell, with its overall footprint dimensions.
#[derive(Debug, Clone)]
pub struct Contact {
    pub params: ContactParams,
    pub cell: Ptr<Cell>,
    pub width: Int,
    pub height: Int,
}

impl Contact {
    /// Places this contact at `offset` with the given rotation.
    pub fn place(&self, inst_name: impl Into<ArcStr>, offset: Point, rotation: Rotation) -> Instance {
        Instance {
            inst_name: inst_name.into(),
            cell: self.cell.clone(),
            loc: offset,
            rotation,
        }
    }
}

/// Draws the cut array and enclosing layer boxes for a contact stack.
pub fn draw_contact(tc: &TechConfig, params: &ContactParams) -> Result<Contact> {
    let rows = params.rows;
    let cols = params.cols;
    assert!(rows > 0);
    assert!(cols > 0);

    let stack = *tc.stack(&params.stack)?;
    let cut = tc.layer(stack.cut)?;

    let ctw = cut.width;
    let cts = cut.space;
    let ctbw = ctw * cols + cts * (cols - 1);
    let ctbh = ctw * rows + cts * (rows - 1);
    let ct_bbox = Rect::from_spans(Span::new(0, ctbw), Span::new(0, ctbh));

    let mut elems = Vec::new();
    for i in 0..rows {
        for j in 0..cols {
            let left = j * (ctw + cts);
            let bot = i * (ctw + cts);
            elems.push(Element {
                net: None,
                layer: stack.cut,
                rect: Rect::from_spans(
                    Span::with_start_and_length(left, ctw),
                    Span::with_start_and_length(bot, ctw),
                ),
            });
        }
    }

    let mut bbox = BoundBox::empty().union(ct_bbox);
    for layer in [stack.bot, stack.top] {
        let enc = cut.enclosure(layer);
        let rect = Rect::from_spans(
            Span::new(ct_bbox.left() - enc, ct_bbox.right() + enc),
            Span::new(ct_bbox.bottom() - enc, ct_bbox.top() + enc),
        );
        bbox = bbox.union(rect);
        elems.push(Element {
            net: None,
            layer,
            rect,
        });
    }

    let bbox = bbox.into_rect();
    // Re-origin so the lower-left corner of the overall footprint is (0, 0).
    let shift = Point::zero() - bbox.p0;
    let elems = elems
        .into_iter()
        .map(|e| Element {
            rect: e.rect.translated(shift),
            ..e
        })
        .collect();

    let name = arcstr::format!("{}", params);
    let layout = Layout {
        name: name.clone(),
        insts: vec![],
        elems,
    };
    let cell = Cell {
        name,
        abs: None,
        layout: Some(layout),
    };

    Ok(Contact {
        params: params.clone(),
        cell: Ptr::new(cell),
        width: bbox.width(),
        height: bbox.height(),
    })
}

#[cfg(test)]
mod tests {
    use crate::tech::scn4m;

    use super::*;

    #[test]
    fn test_m1m2_via_dims() {
        let tc = scn4m::tech_config();
        let params = ContactParams::builder().stack("m1m2").build().unwrap();
        let via = draw_contact(&tc, &params).unwrap();

        // 400 cut plus 150 of metal2 enclosure on each side.
        assert_eq!(via.width, 700);
        assert_eq!(via.height, 700);
        assert_eq!(via.cell.name, "m1m2_1x1");
        // Cut, bottom metal, top metal.
        assert_eq!(via.cell.layout.as_ref().unwrap().elems.len(), 3);
    }

    #[test]
    fn test_contact_array_dims() {
        let tc = scn4m::tech_config();
        let params = ContactParams::builder()
            .stack("polym1")
            .rows(2)
            .cols(3)
            .build()
            .unwrap();
        let ct = draw_contact(&tc, &params).unwrap();

        // 3 cuts of 400 with 600 gaps, plus 150 poly enclosure per side.
        assert_eq!(ct.width, 3 * 400 + 2 * 600 + 2 * 150);
        assert_eq!(ct.height, 2 * 400 + 600 + 2 * 150);
        assert_eq!(ct.cell.layout.as_ref().unwrap().elems.len(), 8);
    }

    #[test]
    fn test_rotated_placement() {
        let tc = scn4m::tech_config();
        let params = ContactParams::builder().stack("m1m2").build().unwrap();
        let via = draw_contact(&tc, &params).unwrap();

        let inst = via.place("xvia", Point::new(1_000, 500), Rotation::R90);
        let bbox = inst.bbox().into_rect();
        assert_eq!(bbox, Rect::from_spans(Span::new(300, 1_000), Span::new(500, 1_200)));

        let missing = tc.stack("m2m3");
        assert!(missing.is_err());
    }
}
