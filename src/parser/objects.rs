//! Builds the ordered `MapObject` list of one object container.

use tracing::debug;

use super::scanner::{Scanner, Tag, TagKind};
use crate::error::CompileError;
use crate::model::{MapObject, Point, TypeHint};

/// Event-driven builder holding at most one in-progress object.
///
/// Properties and shapes always attach to the most recently opened object;
/// seeing one before any object has been opened is malformed input.
#[derive(Debug, Default)]
pub struct ObjectBuilder {
    done: Vec<MapObject>,
    current: Option<MapObject>,
}

impl ObjectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new object. Its own position is the base for any shape points.
    pub fn open(&mut self, name: &str, id: &str, x: i32, y: i32) {
        self.done.extend(self.current.take());
        self.current = Some(MapObject {
            name: name.to_string(),
            id: id.to_string(),
            x,
            y,
            ..MapObject::default()
        });
    }

    pub fn property(
        &mut self,
        line: usize,
        key: &str,
        value: &str,
        declared: &str,
    ) -> Result<(), CompileError> {
        let obj = self.current_mut(line, "property")?;
        obj.properties.insert(key.to_string(), value.to_string());
        if let Some(hint) = TypeHint::from_declared(declared) {
            obj.hints.insert(key.to_string(), hint);
        }
        Ok(())
    }

    /// Append relative shape points, offset by the object's position.
    pub fn shape(&mut self, line: usize, points: &[(f64, f64)]) -> Result<(), CompileError> {
        let obj = self.current_mut(line, "polyline/polygon")?;
        let base = Point::new(obj.x, obj.y);
        obj.path_points.extend(points.iter().map(|&(px, py)| {
            Point::new(base.x + px.round() as i32, base.y + py.round() as i32)
        }));
        Ok(())
    }

    pub fn finish(mut self) -> Vec<MapObject> {
        self.done.extend(self.current.take());
        self.done
    }

    fn current_mut(&mut self, line: usize, what: &str) -> Result<&mut MapObject, CompileError> {
        self.current
            .as_mut()
            .ok_or_else(|| CompileError::malformed(line, format!("{what} outside of any object")))
    }

    fn feed(&mut self, tag: &Tag<'_>) -> Result<(), CompileError> {
        match tag.kind {
            TagKind::Object => {
                let name = tag.attr("name");
                let id = tag.attr("id");
                self.open(&name, &id, tag.int_attr("x")?, tag.int_attr("y")?);
            }
            TagKind::Property => {
                self.property(
                    tag.line,
                    &tag.attr("name"),
                    &tag.attr("value"),
                    &tag.attr("type"),
                )?;
            }
            TagKind::Shape(_) => self.shape(tag.line, &tag.points()?)?,
            _ => {}
        }
        Ok(())
    }
}

/// Collect every object of `<objectgroup name="{container}">` in document order.
pub fn load_objects(doc: &str, container: &str) -> Result<Vec<MapObject>, CompileError> {
    let mut builder = ObjectBuilder::new();
    for tag in Scanner::new(doc).within(container) {
        builder.feed(&tag)?;
    }
    let objects = builder.finish();
    debug!(container, count = objects.len(), "objects loaded");
    Ok(objects)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<map version="1.10" orientation="orthogonal" width="40" height="30" tilewidth="16" tileheight="16">
 <objectgroup id="2" name="objetos">
  <object id="3" name="Inimigo" x="100.4" y="50.5">
   <properties>
    <property name="vida" type="int" value="10"/>
    <property name="nome" value="Goomba"/>
    <property name="vida" type="int" value="12"/>
   </properties>
  </object>
  <object id="4" name="rota" x="5" y="5">
   <polyline points="0,0 10,0 10,10"/>
  </object>
 </objectgroup>
</map>"#;

    #[test]
    fn test_objects_in_document_order() {
        let objects = load_objects(DOC, "objetos").unwrap();
        assert_eq!(objects.len(), 2);

        let enemy = &objects[0];
        assert_eq!(enemy.name, "Inimigo");
        assert_eq!(enemy.id, "3");
        assert_eq!((enemy.x, enemy.y), (100, 51));
        // re-declared key keeps its first position but takes the new value
        let props: Vec<_> = enemy
            .properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(props, vec![("vida", "12"), ("nome", "Goomba")]);
        assert_eq!(enemy.hints.get("vida"), Some(&TypeHint::Int));
        assert_eq!(enemy.hints.get("nome"), None);
        assert!(!enemy.is_path_source());
    }

    #[test]
    fn test_shape_points_are_absolute() {
        let objects = load_objects(DOC, "objetos").unwrap();
        assert_eq!(
            objects[1].path_points,
            vec![Point::new(5, 5), Point::new(15, 5), Point::new(15, 15)]
        );
    }

    #[test]
    fn test_other_containers_are_ignored() {
        assert!(load_objects(DOC, "Slopes").unwrap().is_empty());
    }

    #[test]
    fn test_property_without_object_is_fatal() {
        let doc = r#"<objectgroup name="objetos">
<properties>
<property name="orphan" value="1"/>
</properties>
</objectgroup>"#;
        assert_eq!(
            load_objects(doc, "objetos"),
            Err(CompileError::malformed(3, "property outside of any object"))
        );
    }

    #[test]
    fn test_polyline_without_object_is_fatal() {
        let doc = r#"<objectgroup name="objetos">
<polyline points="0,0 8,0"/>
</objectgroup>"#;
        assert_eq!(
            load_objects(doc, "objetos"),
            Err(CompileError::malformed(2, "polyline/polygon outside of any object"))
        );
    }

    #[test]
    fn test_fractional_points_round_half_away_from_zero() {
        let doc = r#"<objectgroup name="objetos">
<object id="7" name="path_b" x="10" y="10">
<polyline points="0.5,-0.5 2.5,0"/>
</object>
</objectgroup>"#;
        let objects = load_objects(doc, "objetos").unwrap();
        assert_eq!(objects[0].path_points, vec![Point::new(11, 9), Point::new(13, 10)]);
    }

    #[test]
    fn test_shape_without_points_is_fatal() {
        let doc = r#"<objectgroup name="objetos">
<object id="1" name="path_a" x="0" y="0">
<polygon/>
</object>
</objectgroup>"#;
        assert!(matches!(
            load_objects(doc, "objetos"),
            Err(CompileError::MalformedInput { line: 3, .. })
        ));
    }
}
