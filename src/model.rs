use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// Authored property keys that never become plain struct fields.
///
/// `x`/`y` are positional; the rest are packed into the path agent record.
pub const RESERVED_KEYS: &[&str] = &[
    "x",
    "y",
    "path",
    "path_mode",
    "velocidade",
    "delayInicial",
    "sprite",
    "w",
    "h",
];

/// Keys carrying this prefix are private to the compiler.
pub const PRIVATE_PREFIX: &str = "__";

/// The four keys an object needs to be driven along a path.
pub const PATH_AGENT_KEYS: [&str; 4] = ["path", "path_mode", "velocidade", "delayInicial"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Declared `type="…"` of a Tiled property, when it is one we map natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TypeHint {
    Bool,
    Float,
    Int,
}

impl TypeHint {
    /// `None` for declared types that fall back to literal inference
    /// (`string`, `color`, `file`, …).
    pub fn from_declared(declared: &str) -> Option<Self> {
        match declared {
            "bool" => Some(TypeHint::Bool),
            "float" => Some(TypeHint::Float),
            "int" => Some(TypeHint::Int),
            _ => None,
        }
    }
}

/// One authored entity of the object container.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MapObject {
    pub name: String,
    /// Tiled object id; only used to name generated path arrays.
    pub id: String,
    pub x: i32,
    pub y: i32,
    /// Insertion ordered; a re-declared key keeps its first position.
    pub properties: IndexMap<String, String>,
    pub hints: HashMap<String, TypeHint>,
    /// Absolute coordinates, non-empty only for path sources.
    pub path_points: Vec<Point>,
}

impl MapObject {
    pub fn is_path_source(&self) -> bool {
        !self.path_points.is_empty()
    }

    pub fn is_path_agent(&self) -> bool {
        PATH_AGENT_KEYS
            .iter()
            .all(|key| self.properties.contains_key(*key))
    }
}

/// Native field type chosen for one property key of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldType {
    Bool,
    Fix16,
    U8,
    Str,
}

impl FieldType {
    pub fn c_type(self) -> &'static str {
        match self {
            FieldType::Bool => "bool",
            FieldType::Fix16 => "fix16",
            FieldType::U8 => "u8",
            FieldType::Str => "char*",
        }
    }
}

/// A property value after its group's field type has been fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FieldValue {
    Bool(String),
    /// Decimal literal, already normalised to `.`.
    Fix16(String),
    Int(String),
    Str(String),
}

impl FieldValue {
    pub fn new(ty: FieldType, raw: &str) -> Self {
        match ty {
            FieldType::Bool => FieldValue::Bool(raw.to_string()),
            FieldType::Fix16 => FieldValue::Fix16(normalize_decimal(raw)),
            FieldType::U8 => FieldValue::Int(raw.to_string()),
            FieldType::Str => FieldValue::Str(raw.to_string()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(v) | FieldValue::Int(v) => f.write_str(v),
            FieldValue::Fix16(v) => write!(f, "FIX16({v})"),
            FieldValue::Str(v) => write!(f, "\"{}\"", escape_c(v)),
        }
    }
}

/// Authored decimals may use `,` as separator.
pub fn normalize_decimal(raw: &str) -> String {
    raw.trim().replace(',', ".")
}

fn escape_c(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PathMode {
    Loop,
    PingPong,
    OneShot,
}

impl PathMode {
    /// Case-insensitive; anything unknown loops.
    pub fn from_authored(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "pingpong" => PathMode::PingPong,
            "oneshot" => PathMode::OneShot,
            _ => PathMode::Loop,
        }
    }

    pub fn c_name(self) -> &'static str {
        match self {
            PathMode::Loop => "PATHMODE_LOOP",
            PathMode::PingPong => "PATHMODE_PINGPONG",
            PathMode::OneShot => "PATHMODE_ONESHOT",
        }
    }
}

/// The embedded `PathAgentDef` of one group member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathAgent {
    pub position: Point,
    pub path_id: String,
    /// Zero when `path_id` names no path source.
    pub path_len: usize,
    pub initial_delay: String,
    pub mode: PathMode,
    pub speed: String,
    pub sprite: String,
    pub w: String,
    pub h: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub key: String,
    pub ty: FieldType,
}

/// Initializer of one group member, in field order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub agent: Option<PathAgent>,
    pub values: Vec<FieldValue>,
}

/// All objects sharing one name; becomes `<name>_t` and `<name>s[]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub name: String,
    pub path_agent: bool,
    pub fields: Vec<Field>,
    pub records: Vec<Record>,
}

/// Path sources keyed by object id, in first-seen order.
pub type PathTable = IndexMap<String, Vec<Point>>;

/// Fully processed object container handed to the writer.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ObjectModel {
    pub paths: PathTable,
    pub groups: IndexMap<String, Group>,
}

/// Row-major tile ids of the collision layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionGrid {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridData {
    Raw(Vec<u32>),
    Rle(Vec<u8>),
}

/// What the collision header is rendered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionArray {
    pub width: usize,
    pub height: usize,
    pub data: GridData,
}

impl CollisionArray {
    pub fn is_compressed(&self) -> bool {
        matches!(self.data, GridData::Rle(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slope {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    /// 1 for slopes going down, 0 otherwise.
    pub kind: u8,
}
