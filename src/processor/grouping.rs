//! Groups objects by name, fixes a native type per field and resolves
//! path-agent records against the path table.
//!
//! The first member of a group decides its shape (fields, field types and
//! whether it embeds a `PathAgentDef`). Later members are not checked
//! against it beyond having every field the first one has.

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::CompileError;
use crate::model::{
    Field, FieldType, FieldValue, Group, MapObject, ObjectModel, PRIVATE_PREFIX, PathAgent,
    PathMode, PathTable, Point, RESERVED_KEYS, Record, TypeHint, normalize_decimal,
};

/// A declared hint wins; otherwise the literal decides.
pub fn infer_field_type(hint: Option<TypeHint>, value: &str) -> FieldType {
    match hint {
        Some(TypeHint::Bool) => FieldType::Bool,
        Some(TypeHint::Float) => FieldType::Fix16,
        Some(TypeHint::Int) => FieldType::U8,
        None if value == "true" || value == "false" => FieldType::Bool,
        None if value.parse::<i32>().is_ok() => FieldType::U8,
        None => FieldType::Str,
    }
}

/// Whether `key` becomes a plain struct field.
pub fn is_data_key(key: &str) -> bool {
    !key.starts_with(PRIVATE_PREFIX) && !RESERVED_KEYS.contains(&key)
}

/// Split objects into path sources and groups, in first-seen order.
pub fn build_model(objects: Vec<MapObject>) -> Result<ObjectModel, CompileError> {
    let mut paths = PathTable::new();
    let mut members: IndexMap<String, Vec<MapObject>> = IndexMap::new();

    for obj in objects {
        if obj.is_path_source() {
            paths.entry(obj.id).or_insert(obj.path_points);
        } else {
            members.entry(obj.name.clone()).or_default().push(obj);
        }
    }

    let mut groups = IndexMap::with_capacity(members.len());
    for (name, objs) in members {
        let group = build_group(name, &objs, &paths)?;
        debug!(
            group = %group.name,
            fields = group.fields.len(),
            records = group.records.len(),
            path_agent = group.path_agent,
            "group built"
        );
        groups.insert(group.name.clone(), group);
    }

    Ok(ObjectModel { paths, groups })
}

fn build_group(
    name: String,
    objs: &[MapObject],
    paths: &PathTable,
) -> Result<Group, CompileError> {
    let Some(sample) = objs.first() else {
        return Ok(Group {
            name,
            path_agent: false,
            fields: Vec::new(),
            records: Vec::new(),
        });
    };

    let path_agent = sample.is_path_agent();
    let fields: Vec<Field> = sample
        .properties
        .iter()
        .filter(|(key, _)| is_data_key(key))
        .map(|(key, value)| Field {
            key: key.clone(),
            ty: infer_field_type(sample.hints.get(key).copied(), value),
        })
        .collect();

    let records = objs
        .iter()
        .map(|obj| -> Result<Record, CompileError> {
            let agent = if path_agent {
                Some(resolve_agent(&name, obj, paths)?)
            } else {
                None
            };
            let values = fields
                .iter()
                .map(|field| {
                    required(&name, obj, &field.key).map(|raw| FieldValue::new(field.ty, raw))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Record { agent, values })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Group {
        name,
        path_agent,
        fields,
        records,
    })
}

/// Pack the path-agent keys of `obj`. An unknown path id is not fatal: the
/// record keeps the name and gets a zero length.
fn resolve_agent(
    group: &str,
    obj: &MapObject,
    paths: &PathTable,
) -> Result<PathAgent, CompileError> {
    let path_id = required(group, obj, "path")?;
    let path_len = match paths.get(path_id) {
        Some(points) => points.len(),
        None => {
            warn!(
                group,
                object = %obj.id,
                path = path_id,
                "path not found, using path_len = 0"
            );
            0
        }
    };
    let optional = |key: &str, default: &str| {
        obj.properties
            .get(key)
            .map_or_else(|| default.to_string(), Clone::clone)
    };

    Ok(PathAgent {
        position: Point::new(obj.x, obj.y),
        path_id: path_id.to_string(),
        path_len,
        initial_delay: required(group, obj, "delayInicial")?.to_string(),
        mode: PathMode::from_authored(required(group, obj, "path_mode")?),
        speed: normalize_decimal(required(group, obj, "velocidade")?),
        sprite: optional("sprite", ""),
        w: optional("w", "0"),
        h: optional("h", "0"),
    })
}

fn required<'o>(group: &str, obj: &'o MapObject, key: &str) -> Result<&'o str, CompileError> {
    obj.properties
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| CompileError::MissingField {
            group: group.to_string(),
            field: key.to_string(),
        })
}
