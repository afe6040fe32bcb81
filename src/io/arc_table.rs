//! Text arc table reader.
//!
//! # Supported format
//! - One header row naming the seven input columns, in any order.
//! - Whitespace- or comma-separated fields.
//! - Blank lines and lines starting with `#` are skipped.
//! - An empty, `null` or `NA` `local_area` field reads as `0` (arcs with no
//!   local watershed cells carry no count in the extraction output).
//!
//! Column names are matched case-insensitively; common aliases from the
//! extraction toolkit are accepted (`arcid`, `from_node`, `dz`, `local`,
//! `maxgrid`, `shape_length`, ...).

use crate::io::ArcTableRead;
use crate::network_error::NetworkError;
use crate::topology::arc::ArcRecord;
use crate::topology::ids::{ArcId, NodeId};
use std::io::Read;

/// Input columns, in canonical order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Column {
    Id,
    FromNode,
    ToNode,
    Length,
    ElevDrop,
    LocalArea,
    MaxUpstreamAccumulation,
}

const COLUMNS: [Column; 7] = [
    Column::Id,
    Column::FromNode,
    Column::ToNode,
    Column::Length,
    Column::ElevDrop,
    Column::LocalArea,
    Column::MaxUpstreamAccumulation,
];

impl Column {
    fn from_header(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        let col = match lower.as_str() {
            "id" | "arcid" | "arc_id" => Column::Id,
            "from_node" | "fromnode" | "from" => Column::FromNode,
            "to_node" | "tonode" | "to" => Column::ToNode,
            "length" | "shape_length" => Column::Length,
            "elev_drop" | "elevdrop" | "dz" => Column::ElevDrop,
            "local_area" | "localarea" | "local" => Column::LocalArea,
            "max_upstream_accumulation" | "max_upstream_acc" | "maxgrid" => {
                Column::MaxUpstreamAccumulation
            }
            _ => return None,
        };
        Some(col)
    }

    fn name(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::FromNode => "from_node",
            Column::ToNode => "to_node",
            Column::Length => "length",
            Column::ElevDrop => "elev_drop",
            Column::LocalArea => "local_area",
            Column::MaxUpstreamAccumulation => "max_upstream_accumulation",
        }
    }
}

/// Reader for delimited text arc tables.
#[derive(Debug, Default, Clone)]
pub struct ArcTableReader;

impl ArcTableReader {
    fn split(line: &str) -> Vec<&str> {
        if line.contains(',') {
            line.split(',').map(str::trim).collect()
        } else {
            line.split_whitespace().collect()
        }
    }

    /// Map header position -> column; unknown headers are ignored.
    fn parse_header(line: &str, line_no: usize) -> Result<Vec<Option<Column>>, NetworkError> {
        let layout: Vec<Option<Column>> = Self::split(line)
            .into_iter()
            .map(Column::from_header)
            .collect();
        for col in COLUMNS {
            let count = layout.iter().filter(|c| **c == Some(col)).count();
            if count != 1 {
                return Err(NetworkError::ArcTableParse {
                    line: line_no,
                    reason: format!(
                        "header must name column `{}` exactly once (found {count})",
                        col.name()
                    ),
                });
            }
        }
        Ok(layout)
    }

    fn parse_int(raw: &str, col: Column, line: usize) -> Result<i64, NetworkError> {
        raw.parse::<i64>().map_err(|_| NetworkError::ArcTableParse {
            line,
            reason: format!("invalid {}: {raw}", col.name()),
        })
    }

    fn parse_real(raw: &str, col: Column, line: usize) -> Result<f64, NetworkError> {
        if col == Column::LocalArea && is_null(raw) {
            return Ok(0.0);
        }
        raw.parse::<f64>().map_err(|_| NetworkError::ArcTableParse {
            line,
            reason: format!("invalid {}: {raw}", col.name()),
        })
    }

    fn parse_row(
        fields: &[&str],
        layout: &[Option<Column>],
        line: usize,
    ) -> Result<ArcRecord, NetworkError> {
        if fields.len() != layout.len() {
            return Err(NetworkError::ArcTableParse {
                line,
                reason: format!("expected {} fields, found {}", layout.len(), fields.len()),
            });
        }
        let mut record = ArcRecord::new(0, 0, 0, 0.0);
        for (raw, col) in fields.iter().zip(layout) {
            let Some(col) = *col else { continue };
            match col {
                Column::Id => record.id = ArcId::new(Self::parse_int(raw, col, line)?),
                Column::FromNode => {
                    record.from_node = NodeId::new(Self::parse_int(raw, col, line)?)
                }
                Column::ToNode => record.to_node = NodeId::new(Self::parse_int(raw, col, line)?),
                Column::Length => record.length = Self::parse_real(raw, col, line)?,
                Column::ElevDrop => record.elev_drop = Self::parse_real(raw, col, line)?,
                Column::LocalArea => record.local_area = Self::parse_real(raw, col, line)?,
                Column::MaxUpstreamAccumulation => {
                    record.max_upstream_accumulation = Self::parse_real(raw, col, line)?
                }
            }
        }
        Ok(record)
    }
}

fn is_null(raw: &str) -> bool {
    raw.is_empty() || raw.eq_ignore_ascii_case("null") || raw.eq_ignore_ascii_case("na")
}

impl ArcTableRead for ArcTableReader {
    fn read_records<R: Read>(&self, mut reader: R) -> Result<Vec<ArcRecord>, NetworkError> {
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;

        let mut layout: Option<Vec<Option<Column>>> = None;
        let mut records = Vec::new();
        for (k, line) in contents.lines().enumerate() {
            let line_no = k + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if let Some(cols) = &layout {
                let fields = Self::split(trimmed);
                records.push(Self::parse_row(&fields, cols, line_no)?);
            } else {
                layout = Some(Self::parse_header(trimmed, line_no)?);
            }
        }
        if layout.is_none() {
            return Err(NetworkError::ArcTableParse {
                line: 0,
                reason: "missing header row".into(),
            });
        }
        log::debug!("read {} arc records", records.len());
        Ok(records)
    }
}
