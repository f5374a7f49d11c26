//! Slope segments from the `Slopes` object container.

use tracing::debug;

use super::scanner::{Scanner, ShapeKind, TagKind};
use crate::error::CompileError;
use crate::model::Slope;

#[derive(Debug)]
struct PendingSlope {
    x: f64,
    y: f64,
    kind: u8,
    points: Option<Vec<(f64, f64)>>,
}

impl PendingSlope {
    /// Only the first two points of the first polyline count; coordinates
    /// are truncated, not rounded.
    fn finish(self) -> Option<Slope> {
        let points = self.points?;
        let [p1, p2, ..] = points.as_slice() else {
            return None;
        };
        let (ox, oy) = (self.x as i32, self.y as i32);
        Some(Slope {
            x1: ox + p1.0 as i32,
            y1: oy + p1.1 as i32,
            x2: ox + p2.0 as i32,
            y2: oy + p2.1 as i32,
            kind: self.kind,
        })
    }
}

pub fn load_slopes(doc: &str, container: &str) -> Result<Vec<Slope>, CompileError> {
    let mut slopes = Vec::new();
    let mut current: Option<PendingSlope> = None;

    for tag in Scanner::new(doc).within(container) {
        match tag.kind {
            TagKind::Object => {
                slopes.extend(current.take().and_then(PendingSlope::finish));
                let coord = |name: &str| -> Result<f64, CompileError> {
                    tag.float_attr(name)?.ok_or_else(|| {
                        CompileError::malformed(tag.line, format!("slope object has no `{name}`"))
                    })
                };
                current = Some(PendingSlope {
                    x: coord("x")?,
                    y: coord("y")?,
                    kind: 0,
                    points: None,
                });
            }
            TagKind::Property => {
                // container-level properties have no object to belong to
                let Some(slope) = current.as_mut() else {
                    continue;
                };
                if tag.attr("name") == "slopeType" && tag.attr("value").contains("down") {
                    slope.kind = 1;
                }
            }
            TagKind::Shape(ShapeKind::Polyline) => {
                if let Some(slope) = current.as_mut() {
                    if slope.points.is_none() {
                        slope.points = Some(tag.points()?);
                    }
                }
            }
            _ => {}
        }
    }
    slopes.extend(current.and_then(PendingSlope::finish));

    debug!(container, count = slopes.len(), "slopes loaded");
    Ok(slopes)
}
