//! Fixed-width writers for the hydrology model's channel input files.
//!
//! - [`StreamNetworkWriter`]: the stream network file, one row per arc:
//!   `id order slope length class downstream` with widths
//!   `%5d %3d %11.5f %17.5f %3d %7d`; outlets write `-1` as downstream and
//!   may carry the `SAVE` flag.
//! - [`ConvergenceWriter`]: per arc, its downstream arc, length and every
//!   arc draining into it.
//! - [`ArcTableWriter`]: the complete derived record stream with a header.
//!
//! # Limitations
//! - Soil-depth dependent columns (effective depth) are not produced.
//! - Rows follow input order; no re-sorting by id or order.

use crate::algs::pipeline::DerivedNetwork;
use crate::io::NetworkWrite;
use crate::network_error::NetworkError;
use crate::topology::arc::DerivedArc;
use crate::topology::ids::raw_or_none;
use std::io::Write;

/// Writer for the stream network file.
#[derive(Debug, Default, Clone)]
pub struct StreamNetworkWriter {
    /// Append the `SAVE` flag to outlet rows so the model records their flow.
    pub save_outlets: bool,
}

impl StreamNetworkWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_save_outlets(mut self, save: bool) -> Self {
        self.save_outlets = save;
        self
    }

    fn row(&self, arc: &DerivedArc) -> Result<String, NetworkError> {
        if arc.order == 0 {
            return Err(NetworkError::Unexportable {
                arc: arc.id(),
                reason: "stream order unassigned".into(),
            });
        }
        let class = arc.class_id().ok_or_else(|| NetworkError::Unexportable {
            arc: arc.id(),
            reason: "channel class unassigned".into(),
        })?;
        let mut row = format!(
            "{:5} {:3} {:11.5} {:17.5} {:3} {:7}",
            arc.id().get(),
            arc.order,
            arc.slope,
            arc.record.length,
            class,
            raw_or_none(arc.downstream)
        );
        if self.save_outlets && arc.is_outlet() {
            row.push_str(" SAVE");
        }
        Ok(row)
    }
}

impl NetworkWrite for StreamNetworkWriter {
    fn write<W: Write>(&self, mut writer: W, network: &DerivedNetwork) -> Result<(), NetworkError> {
        for arc in network.arcs() {
            writeln!(writer, "{}", self.row(arc)?)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Writer for the convergence (connectivity) file.
///
/// Row layout: `id downstream length n_upstream [upstream ids...]`.
#[derive(Debug, Default, Clone)]
pub struct ConvergenceWriter;

impl NetworkWrite for ConvergenceWriter {
    fn write<W: Write>(&self, mut writer: W, network: &DerivedNetwork) -> Result<(), NetworkError> {
        for arc in network.arcs() {
            let upstream = network.inflows(arc.id());
            write!(
                writer,
                "{} {} {:.3} {}",
                arc.id(),
                raw_or_none(arc.downstream),
                arc.record.length,
                upstream.len()
            )?;
            for up in upstream {
                write!(writer, " {up}")?;
            }
            writeln!(writer)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Writer for the full derived arc table.
///
/// Unassigned links are `-1`, an unassigned class is `0` with zero geometry.
#[derive(Debug, Default, Clone)]
pub struct ArcTableWriter;

const ARC_TABLE_HEADER: &str = "id from_node to_node length elev_drop local_area \
max_upstream_accumulation slope downstream upstream order mean_contributing_area \
channel_class hyd_depth hyd_width eff_width";

impl NetworkWrite for ArcTableWriter {
    fn write<W: Write>(&self, mut writer: W, network: &DerivedNetwork) -> Result<(), NetworkError> {
        writeln!(writer, "{ARC_TABLE_HEADER}")?;
        for arc in network.arcs() {
            let r = &arc.record;
            let (class, depth, width, eff) = arc
                .channel
                .map_or((0, 0.0, 0.0, 0.0), |c| {
                    (c.id, c.hyd_depth, c.hyd_width, c.eff_width)
                });
            writeln!(
                writer,
                "{} {} {} {:.5} {:.5} {} {} {:.5} {} {} {} {:.3} {} {:.2} {:.2} {:.2}",
                r.id,
                r.from_node,
                r.to_node,
                r.length,
                r.elev_drop,
                r.local_area,
                r.max_upstream_accumulation,
                arc.slope,
                raw_or_none(arc.downstream),
                raw_or_none(arc.upstream),
                arc.order,
                arc.mean_contributing_area,
                class,
                depth,
                width,
                eff
            )?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::topology::arc::ArcRecord;
    use crate::topology::network::StreamNetwork;

    fn derived() -> DerivedNetwork {
        StreamNetwork::from_records([
            ArcRecord::new(1, 10, 20, 120.0)
                .with_elev_drop(0.12)
                .with_local_area(100.0),
            ArcRecord::new(2, 11, 20, 80.0)
                .with_elev_drop(4.0)
                .with_local_area(50.0),
            ArcRecord::new(3, 20, 30, 250.5)
                .with_elev_drop(0.5)
                .with_local_area(10.0)
                .with_max_upstream_accumulation(150.0),
        ])
        .unwrap()
        .derive(&EngineConfig::default().with_cell_size(10.0))
        .unwrap()
    }

    #[test]
    fn stream_network_rows_are_fixed_width() {
        let text = StreamNetworkWriter::new().write_to_string(&derived()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "    1   1     0.00100         120.00000   1       3"
        );
        assert_eq!(
            lines[2],
            "    3   2     0.00200         250.50000   1      -1"
        );
    }

    #[test]
    fn save_flag_marks_outlets_only() {
        let text = StreamNetworkWriter::new()
            .with_save_outlets(true)
            .write_to_string(&derived())
            .unwrap();
        let saved: Vec<&str> = text.lines().filter(|l| l.ends_with(" SAVE")).collect();
        assert_eq!(saved.len(), 1);
        assert!(saved[0].trim_start().starts_with("3 "));
    }

    #[test]
    fn convergence_lists_all_inflows() {
        let text = ConvergenceWriter.write_to_string(&derived()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "1 3 120.000 0");
        assert_eq!(lines[2], "3 -1 250.500 2 1 2");
    }

    #[test]
    fn arc_table_has_header_and_all_columns() {
        let text = ArcTableWriter.write_to_string(&derived()).unwrap();
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert_eq!(header.split_whitespace().count(), 16);
        for line in lines {
            assert_eq!(line.split_whitespace().count(), 16);
        }
    }

    #[test]
    fn unresolved_order_is_not_exportable() {
        let net = StreamNetwork::from_records([
            ArcRecord::new(1, 1, 2, 1.0),
            ArcRecord::new(2, 2, 3, 1.0),
            ArcRecord::new(3, 2, 4, 1.0),
        ])
        .unwrap()
        .derive(&EngineConfig::default())
        .unwrap();
        let err = StreamNetworkWriter::new().write_to_string(&net).unwrap_err();
        assert!(matches!(err, NetworkError::Unexportable { .. }));
    }
}
