//! Extracts the csv-encoded tile grid of one named layer.

use tracing::debug;

use super::scanner::{Scanner, TagKind};
use crate::error::CompileError;
use crate::model::CollisionGrid;

/// Read the first `<layer name="{layer}">` whose `<data>` is csv encoded.
///
/// The cell count must equal `width × height`.
pub fn load_grid(doc: &str, layer: &str) -> Result<CollisionGrid, CompileError> {
    let mut in_layer = false;
    let mut in_data = false;
    let mut found = false;
    let (mut width, mut height) = (0, 0);
    let mut data_line = 0;
    let mut csv = String::new();

    for tag in Scanner::new(doc) {
        if in_data {
            // closing tag may share the line with the last row
            match tag.text().split_once("</data") {
                Some((rest, _)) => {
                    push_row(&mut csv, rest);
                    found = true;
                    break;
                }
                None => push_row(&mut csv, tag.text()),
            }
            continue;
        }

        match tag.kind {
            TagKind::LayerOpen if tag.attr("name") == layer => {
                in_layer = true;
                width = tag.int_attr("width")?;
                height = tag.int_attr("height")?;
            }
            TagKind::LayerClose => in_layer = false,
            TagKind::DataOpen if in_layer && tag.attr("encoding") == "csv" => {
                data_line = tag.line;
                let after_open = tag.text().split_once('>').map_or("", |(_, rest)| rest);
                match after_open.split_once("</data") {
                    Some((rest, _)) => {
                        push_row(&mut csv, rest);
                        found = true;
                        break;
                    }
                    None => {
                        push_row(&mut csv, after_open);
                        in_data = true;
                    }
                }
            }
            _ => {}
        }
    }

    if !found {
        return Err(CompileError::MissingLayer {
            layer: layer.to_string(),
        });
    }

    // one trailing comma is tolerated, any other empty cell is an error
    let body = csv.strip_suffix(',').unwrap_or(&csv);
    let cells = body
        .split(',')
        .filter(|_| !body.is_empty())
        .map(str::trim)
        .map(|v| {
            v.parse::<u32>().map_err(|_| CompileError::InvalidNumber {
                line: data_line,
                attribute: "data".into(),
                value: v.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let expected = usize::try_from(width)
        .ok()
        .zip(usize::try_from(height).ok())
        .map(|(w, h)| w * h);
    if expected != Some(cells.len()) {
        return Err(CompileError::DimensionMismatch {
            layer: layer.to_string(),
            width,
            height,
            cells: cells.len(),
        });
    }

    debug!(layer, width, height, "grid loaded");
    Ok(CollisionGrid {
        width: width as usize,
        height: height as usize,
        cells,
    })
}

/// Rows end with a trailing comma except the last one; keep them separated.
fn push_row(csv: &mut String, row: &str) {
    let row = row.trim();
    if row.is_empty() {
        return;
    }
    if !csv.is_empty() && !csv.ends_with(',') {
        csv.push(',');
    }
    csv.push_str(row);
}
