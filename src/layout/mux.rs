//! Column mux leaf cell and array layout generation.

use arcstr::ArcStr;
use itertools::Itertools;
use log::{debug, info};

use crate::bus_bit;
use crate::config::{ColumnMuxArrayParams, ColumnMuxParams};
use crate::error::{Error, Result};
use crate::geom::{snap_to_grid, Int, Point, Rect, Span};
use crate::layout::cell::{Cell, Element, Instance, Ptr, Rotation};
use crate::layout::contact::{draw_contact, Contact, ContactParams};
use crate::tech::{Layer, TechConfig};
use crate::PdkLib;

/// The leaf pass-gate mux, as seen by the array: pin geometry, overall
/// dimensions, and the position of the first pass-transistor gate.
pub struct ColumnMux {
    pub params: ColumnMuxParams,
    pub cell: Ptr<Cell>,
    pub width: Int,
    pub height: Int,
    pub gate_pos: Point,
}

/// Generates the leaf column mux cell.
pub fn draw_column_mux(lib: &mut PdkLib, params: &ColumnMuxParams) -> Result<ColumnMux> {
    let tc = &lib.tech;
    let m1 = tc.layer(Layer::Metal1)?;
    let m2 = tc.layer(Layer::Metal2)?;
    let poly = tc.layer(Layer::Poly)?;

    // Not instantiated; used for track spacing calculations only.
    let via = draw_contact(tc, &ContactParams::builder().stack("m1m2").build().unwrap())?;
    let track = via.width + std::cmp::max(m1.space, m2.space);

    let bl_x = 0;
    let bl_out_x = bl_x + track;
    let gnd_x = bl_out_x + track;
    // The output merge via reaches one via width left of the br_out strap;
    // keep a full m2 space beyond that.
    let br_out_x = gnd_x + m2.width + m2.space + via.width;
    let br_x = br_out_x + track;
    let width = br_x + m2.width + m2.space;
    let height = 2 * params.tx_size + 4 * (poly.width + poly.space);
    let gate_x = snap_to_grid((width - poly.width) / 2, tc.grid);

    let mut cell = Cell::empty("column_mux");

    let strap = |x: Int, h: Int| {
        Rect::from_spans(Span::with_start_and_length(x, m2.width), Span::new(0, h))
    };
    let pins = [
        ("bl", strap(bl_x, height)),
        ("br", strap(br_x, height)),
        ("bl_out", strap(bl_out_x, 2 * m2.width)),
        ("br_out", strap(br_out_x, 2 * m2.width)),
        ("gnd", strap(gnd_x, height)),
    ];
    for (net, rect) in pins {
        cell.layout_mut().add(Element {
            net: None,
            layer: Layer::Metal2,
            rect,
        });
        cell.add_pin(net, Layer::Metal2, rect);
    }

    cell.layout_mut().add(Element {
        net: None,
        layer: Layer::Poly,
        rect: Rect::from_spans(
            Span::with_start_and_length(gate_x, poly.width),
            Span::new(0, params.tx_size),
        ),
    });

    let cell = Ptr::new(cell);
    lib.lib.cells.push(cell.clone());

    Ok(ColumnMux {
        params: *params,
        cell,
        width,
        height,
        gate_pos: Point::new(gate_x, 0),
    })
}

/// Layout constants derived once per array.
pub(crate) struct PhysicalDesign {
    pub(crate) m1_pitch: Int,
    pub(crate) route_height: Int,
    pub(crate) width: Int,
    pub(crate) height: Int,
}

pub(crate) fn physical_design(
    tc: &TechConfig,
    params: &ColumnMuxArrayParams,
    mux: &ColumnMux,
    via: &Contact,
) -> Result<PhysicalDesign> {
    let m1 = tc.layer(Layer::Metal1)?;
    let m2 = tc.layer(Layer::Metal2)?;
    let words_per_row = params.words_per_row() as Int;

    let m1_pitch = via.width + std::cmp::max(m1.space, m2.space);
    // One m1 track per select signal, a pair to interconnect the mux
    // outputs, and one extra pitch to space from the block above.
    let route_height = (words_per_row + 3) * m1_pitch;
    let width = params.columns as Int * mux.width;
    let height = mux.height + route_height + tc.space(Layer::Nwell, Layer::Pwell)?;

    debug!("column mux array: m1_pitch={m1_pitch} route_height={route_height} width={width} height={height}");

    Ok(PhysicalDesign {
        m1_pitch,
        route_height,
        width,
        height,
    })
}

/// Generates the column mux array: `columns` leaf muxes on a shared pitch,
/// select rails and gate taps below them, and the per-word output merge.
pub fn draw_column_mux_array(lib: &mut PdkLib, params: &ColumnMuxArrayParams) -> Result<Ptr<Cell>> {
    params.validate()?;
    info!(
        "generating column mux array: columns={} word_size={}",
        params.columns, params.word_size
    );

    let mux = draw_column_mux(lib, &params.mux)?;
    let m1m2_via = draw_contact(
        &lib.tech,
        &ContactParams::builder().stack("m1m2").build().unwrap(),
    )?;
    let poly_contact = draw_contact(
        &lib.tech,
        &ContactParams::builder().stack("polym1").build().unwrap(),
    )?;
    lib.lib.cells.push(m1m2_via.cell.clone());
    lib.lib.cells.push(poly_contact.cell.clone());

    let dsn = physical_design(&lib.tech, params, &mux, &m1m2_via)?;

    let mut cell = Cell::empty("column_mux_array");
    let insts = place_mux_instances(&mut cell, &lib.tech, params, &mux, &dsn)?;
    draw_sel_rails(&mut cell, params, &dsn, &m1m2_via)?;
    draw_gate_taps(&mut cell, &lib.tech, params, &mux, &dsn, &m1m2_via, &poly_contact)?;
    route_bitlines(&mut cell, &lib.tech, params, &dsn, &insts, &m1m2_via)?;

    let ptr = Ptr::new(cell);
    lib.lib.cells.push(ptr.clone());
    Ok(ptr)
}

/// Places one leaf mux per column and promotes its bitline and ground pins
/// to the array boundary.
fn place_mux_instances(
    cell: &mut Cell,
    tc: &TechConfig,
    params: &ColumnMuxArrayParams,
    mux: &ColumnMux,
    dsn: &PhysicalDesign,
) -> Result<Vec<Instance>> {
    let m2 = tc.layer(Layer::Metal2)?;

    let mut insts = Vec::with_capacity(params.columns);
    for col in 0..params.columns {
        let mut inst = Instance::new(bus_bit("xmux", col), mux.cell.clone());
        inst.loc = Point::new(col as Int * mux.width, dsn.route_height);

        // Full-height bitline straps, so the block above can tap them at any
        // height.
        for pin in ["bl", "br"] {
            let src = pin_rect(&inst, pin, Layer::Metal2)?;
            let rect = Rect::from_spans(
                Span::with_start_and_length(src.left(), m2.width),
                Span::new(src.bottom(), dsn.height),
            );
            cell.layout_mut().add(Element {
                net: None,
                layer: Layer::Metal2,
                rect,
            });
            cell.add_pin(bus_bit(pin, col), Layer::Metal2, rect);
        }

        // Odd-column ground shapes sit on the same rail as their even
        // neighbor; only even columns are promoted to avoid duplicates.
        if col % 2 == 0 {
            let gnd = inst.port("gnd")?;
            for (layer, shape) in gnd.shapes.iter() {
                if *layer != Layer::Metal2 {
                    continue;
                }
                let rect = Rect::from_spans(
                    Span::with_start_and_length(shape.left(), m2.width),
                    Span::new(0, dsn.height),
                );
                cell.layout_mut().add(Element {
                    net: None,
                    layer: Layer::Metal2,
                    rect,
                });
                cell.add_pin(arcstr::literal!("gnd"), Layer::Metal2, rect);
            }
        }

        cell.layout_mut().add_inst(inst.clone());
        insts.push(inst);
    }

    Ok(insts)
}

/// Draws the select input rails on m1 below the mux transistors.
fn draw_sel_rails(
    cell: &mut Cell,
    params: &ColumnMuxArrayParams,
    dsn: &PhysicalDesign,
    via: &Contact,
) -> Result<()> {
    for j in 0..params.words_per_row() {
        let y = dsn.route_height - (j as Int + 1) * dsn.m1_pitch;
        let rect = Rect::from_spans(
            Span::new(0, dsn.width),
            Span::with_start_and_length(y, via.width),
        );
        cell.layout_mut().add(Element {
            net: None,
            layer: Layer::Metal1,
            rect,
        });
        cell.add_pin(bus_bit("sel", j), Layer::Metal1, rect);
    }
    Ok(())
}

/// Connects each column's gate poly down to its select rail.
///
/// The rails must already be registered; a missing rail pin here is an
/// ordering violation between the routing passes.
fn draw_gate_taps(
    cell: &mut Cell,
    tc: &TechConfig,
    params: &ColumnMuxArrayParams,
    mux: &ColumnMux,
    dsn: &PhysicalDesign,
    m1m2_via: &Contact,
    poly_contact: &Contact,
) -> Result<()> {
    let poly = tc.layer(Layer::Poly)?;
    let words_per_row = params.words_per_row();

    // Only the x component of the gate position matters below the cell.
    let gate_pos = mux.gate_pos.scaled(Point::new(1, 0));

    for col in 0..params.columns {
        let sel_index = col % words_per_row;
        let sel = bus_bit("sel", sel_index);
        let rail = cell
            .port(&sel)?
            .largest_rect(Layer::Metal1)
            .ok_or_else(|| Error::MissingPin {
                cell: cell.name.clone(),
                port: sel.clone(),
            })?;

        let gate_x = gate_pos.x + col as Int * mux.width;
        let sel_height = rail.bottom();
        cell.layout_mut().add(Element {
            net: None,
            layer: Layer::Poly,
            rect: Rect::from_spans(
                Span::with_start_and_length(gate_x, poly.width),
                Span::new(sel_height, dsn.route_height),
            ),
        });

        // The contact is shifted by the via height to account for the
        // rotation about its lower-left corner.
        let ct = poly_contact.place(
            arcstr::format!("xtap_{col}"),
            Point::new(gate_x + m1m2_via.height, sel_height),
            Rotation::R90,
        );
        cell.layout_mut().add_inst(ct);
    }

    Ok(())
}

/// Connects the output bitlines to form the appropriate width mux.
fn route_bitlines(
    cell: &mut Cell,
    tc: &TechConfig,
    params: &ColumnMuxArrayParams,
    dsn: &PhysicalDesign,
    insts: &[Instance],
    via: &Contact,
) -> Result<()> {
    let m2 = tc.layer(Layer::Metal2)?;
    let words_per_row = params.words_per_row();
    let wpr = words_per_row as Int;

    for (col, inst) in insts.iter().enumerate() {
        let bl_out_offset =
            pin_rect(inst, "bl_out", Layer::Metal2)?.p0 - Point::new(0, (wpr + 1) * dsn.m1_pitch);
        let br_out_offset =
            pin_rect(inst, "br_out", Layer::Metal2)?.p0 - Point::new(0, (wpr + 2) * dsn.m1_pitch);

        if col % words_per_row == 0 {
            let word = col / words_per_row;
            let group = &insts[col..col + words_per_row];

            for (pin, offset) in [("bl_out", bl_out_offset), ("br_out", br_out_offset)] {
                // The merge bar joining the word group's outputs. It is m2
                // width so the vias are enclosed and m1 min width holds.
                let bar = merge_bar(group, pin, offset, m2.width, via.width)?;
                cell.layout_mut().add(Element {
                    net: None,
                    layer: Layer::Metal1,
                    rect: bar,
                });

                // Extend the output rail downward on the first column of the
                // group; the remaining columns land on the shared bar.
                let rect = Rect::from_spans(
                    Span::with_start_and_length(offset.x, m2.width),
                    Span::new(0, dsn.route_height),
                );
                cell.layout_mut().add(Element {
                    net: None,
                    layer: Layer::Metal2,
                    rect,
                });
                cell.add_pin(bus_bit(pin, word), Layer::Metal2, rect);
            }
        } else {
            for offset in [bl_out_offset, br_out_offset] {
                let rect = Rect::from_spans(
                    Span::with_start_and_length(offset.x, m2.width),
                    Span::new(offset.y, dsn.route_height),
                );
                cell.layout_mut().add(Element {
                    net: None,
                    layer: Layer::Metal2,
                    rect,
                });
            }
        }

        // Via on the right of the bl_out strap and on the left of the
        // br_out strap, so the two rows of vias never collide.
        let vbl = via.place(
            arcstr::format!("xvia_bl_{col}"),
            bl_out_offset + Point::new(via.height, 0),
            Rotation::R90,
        );
        let vbr = via.place(arcstr::format!("xvia_br_{col}"), br_out_offset, Rotation::R90);
        cell.layout_mut().add_inst(vbl);
        cell.layout_mut().add_inst(vbr);
    }

    Ok(())
}

fn merge_bar(
    group: &[Instance],
    pin: &str,
    offset: Point,
    height: Int,
    via_width: Int,
) -> Result<Rect> {
    let xs: Vec<Int> = group
        .iter()
        .map(|inst| pin_rect(inst, pin, Layer::Metal2).map(|r| r.left()))
        .collect::<Result<_>>()?;
    let (lo, hi) = xs
        .into_iter()
        .minmax()
        .into_option()
        .expect("word group is never empty");
    Ok(Rect::from_spans(
        Span::new(lo, hi + via_width),
        Span::with_start_and_length(offset.y, height),
    ))
}

fn pin_rect(inst: &Instance, net: &str, layer: Layer) -> Result<Rect> {
    inst.port(net)?
        .largest_rect(layer)
        .ok_or_else(|| Error::MissingPin {
            cell: inst.cell.name.clone(),
            port: ArcStr::from(net),
        })
}
