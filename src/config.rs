//! Optional JSON configuration; every field has a default matching the
//! game project layout, so running without a config file is the norm.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub objects: ObjectsConfig,
    pub collision: CollisionConfig,
    pub slopes: SlopesConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObjectsConfig {
    /// Name of the object container to compile.
    pub container: String,
    pub header_guard: String,
    /// Verbatim `#include` targets, e.g. `<genesis.h>` or `"foo.h"`.
    pub includes: Vec<String>,
}

impl Default for ObjectsConfig {
    fn default() -> Self {
        Self {
            container: "objetos".into(),
            header_guard: "OBJETOS_H".into(),
            includes: vec![
                "<genesis.h>".into(),
                "\"components/path_agent.h\"".into(),
                "\"components/path_def.h\"".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CollisionConfig {
    pub layer: String,
    pub includes: Vec<String>,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            layer: "collision".into(),
            includes: vec!["<genesis.h>".into(), "\"tiled_map.h\"".into()],
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SlopesConfig {
    pub container: String,
    pub header_guard: String,
    pub includes: Vec<String>,
}

impl Default for SlopesConfig {
    fn default() -> Self {
        Self {
            container: "Slopes".into(),
            header_guard: "_SLOPES_H_".into(),
            includes: vec!["<genesis.h>".into(), "\"physics/physic_def.h\"".into()],
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Reading {}", path.display()))?;
        Self::from_json(&json)
            .with_context(|| format!("Parsing config {}", path.display()))
    }
}
