//! Column mux netlists.

use log::info;

use super::mos::{MosType, Mosfet};
use super::{bus, port_inout, port_input, signal, Instance, Module};
use crate::bus_bit;
use crate::config::{ColumnMuxArrayParams, ColumnMuxParams};
use crate::error::Result;

/// The leaf mux: an NMOS pass gate per bitline.
pub fn column_mux(params: &ColumnMuxParams) -> Module {
    let mut m = Module::new("column_mux");
    for sig in ["bl", "br", "bl_out", "br_out"] {
        m.ports.push(port_inout(&signal(sig)));
    }
    m.ports.push(port_input(&signal("sel")));
    m.ports.push(port_inout(&signal("gnd")));

    m.instances.push(
        Mosfet {
            name: arcstr::literal!("MBL"),
            width: params.tx_size,
            length: params.length,
            drain: arcstr::literal!("bl_out"),
            gate: arcstr::literal!("sel"),
            source: arcstr::literal!("bl"),
            body: arcstr::literal!("gnd"),
            mos_type: MosType::Nmos,
        }
        .into(),
    );
    m.instances.push(
        Mosfet {
            name: arcstr::literal!("MBR"),
            width: params.tx_size,
            length: params.length,
            drain: arcstr::literal!("br_out"),
            gate: arcstr::literal!("sel"),
            source: arcstr::literal!("br"),
            body: arcstr::literal!("gnd"),
            mos_type: MosType::Nmos,
        }
        .into(),
    );

    m
}

/// The array netlist: one leaf mux per column, with net indices derived from
/// the same column/words-per-row arithmetic as the physical routing.
pub fn column_mux_array(params: &ColumnMuxArrayParams) -> Result<Vec<Module>> {
    params.validate()?;
    info!(
        "generating column mux array netlist: columns={} word_size={}",
        params.columns, params.word_size
    );

    let words_per_row = params.words_per_row();
    let mux = column_mux(&params.mux);

    let mut m = Module::new("column_mux_array");
    m.ports.push(port_inout(&bus("bl", params.columns)));
    m.ports.push(port_inout(&bus("br", params.columns)));
    m.ports.push(port_input(&bus("sel", words_per_row)));
    m.ports.push(port_inout(&bus("bl_out", params.word_size)));
    m.ports.push(port_inout(&bus("br_out", params.word_size)));
    m.ports.push(port_inout(&signal("gnd")));

    for col in 0..params.columns {
        let word = col / words_per_row;
        let sel_index = col % words_per_row;
        m.instances.push(Instance {
            name: bus_bit("xmux", col),
            module: mux.name.clone(),
            connections: vec![
                bus_bit("bl", col),
                bus_bit("br", col),
                bus_bit("bl_out", word),
                bus_bit("br_out", word),
                bus_bit("sel", sel_index),
                arcstr::literal!("gnd"),
            ],
            params: vec![],
        });
    }

    Ok(vec![mux, m])
}

#[cfg(test)]
mod tests {
    use crate::error::Error;

    use super::*;

    #[test]
    fn test_column_mux() {
        let mux = column_mux(&ColumnMuxParams::default());
        assert_eq!(mux.name, "column_mux");
        let port_names: Vec<&str> = mux.ports.iter().map(|p| p.signal.name.as_str()).collect();
        assert_eq!(port_names, ["bl", "br", "bl_out", "br_out", "sel", "gnd"]);
        assert_eq!(mux.instances.len(), 2);
        assert_eq!(mux.instances[0].module, "nmos");
        assert_eq!(
            mux.instances[0].params,
            vec![(arcstr::literal!("w"), 1_600), (arcstr::literal!("l"), 400)]
        );
    }

    #[test]
    fn test_column_mux_array_8x4() {
        let params = ColumnMuxArrayParams::new(8, 4);
        let modules = column_mux_array(&params).unwrap();
        assert_eq!(modules.len(), 2);
        let m = &modules[1];

        assert_eq!(m.port("bl").unwrap().signal.width, 8);
        assert_eq!(m.port("br").unwrap().signal.width, 8);
        assert_eq!(m.port("sel").unwrap().signal.width, 2);
        assert_eq!(m.port("bl_out").unwrap().signal.width, 4);
        assert_eq!(m.port("br_out").unwrap().signal.width, 4);
        assert_eq!(m.port("gnd").unwrap().signal.width, 1);

        assert_eq!(m.instances.len(), 8);
        // Column 5: word 5 / 2 = 2, select 5 % 2 = 1.
        assert_eq!(
            m.instances[5].connections,
            vec![
                bus_bit("bl", 5),
                bus_bit("br", 5),
                bus_bit("bl_out", 2),
                bus_bit("br_out", 2),
                bus_bit("sel", 1),
                arcstr::literal!("gnd"),
            ]
        );

        for (col, inst) in m.instances.iter().enumerate() {
            assert_eq!(inst.name, bus_bit("xmux", col));
            assert_eq!(inst.connections.len(), modules[0].ports.len());
            assert_eq!(inst.connections[2], bus_bit("bl_out", col / 2));
            assert_eq!(inst.connections[4], bus_bit("sel", col % 2));
        }
    }

    #[test]
    fn test_column_mux_array_single_word() {
        // word_size == columns: every column drives its own output pair and
        // shares the single select line.
        let params = ColumnMuxArrayParams::new(4, 4);
        let modules = column_mux_array(&params).unwrap();
        let m = &modules[1];

        assert_eq!(m.port("sel").unwrap().signal.width, 1);
        for (col, inst) in m.instances.iter().enumerate() {
            assert_eq!(inst.connections[2], bus_bit("bl_out", col));
            assert_eq!(inst.connections[4], bus_bit("sel", 0));
        }
    }

    #[test]
    fn test_column_mux_array_bad_ratio() {
        let params = ColumnMuxArrayParams::new(6, 4);
        assert!(matches!(
            column_mux_array(&params),
            Err(Error::BadMuxRatio { .. })
        ));
    }
}
