//! Component 2 – the functional core.
//!
//! Turns parsed objects into the typed, grouped model and collision grids
//! into the array the runtime decodes.
pub mod grouping;
pub mod rle;

use tracing::info;

use crate::error::CompileError;
use crate::model::{CollisionArray, CollisionGrid, GridData, MapObject, ObjectModel};

/// Runs every object pass and returns a read-only structure for writers.
pub fn run(objects: Vec<MapObject>) -> Result<ObjectModel, CompileError> {
    let model = grouping::build_model(objects)?;
    info!(
        groups = model.groups.len(),
        paths = model.paths.len(),
        "object model ready"
    );
    Ok(model)
}

pub fn pack_grid(grid: CollisionGrid, compress: bool) -> CollisionArray {
    let data = if compress {
        let bytes = rle::encode(&grid.cells);
        info!(
            cells = grid.cells.len(),
            bytes = bytes.len(),
            "collision grid compressed"
        );
        GridData::Rle(bytes)
    } else {
        GridData::Raw(grid.cells)
    };

    CollisionArray {
        width: grid.width,
        height: grid.height,
        data,
    }
}
