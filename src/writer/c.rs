//! Emit the C header/source pair for the object container.
//!
//! Output order is always first-seen order from the document, so the same
//! map produces byte-identical files.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::ObjectsConfig;
use crate::model::{FieldValue, Group, ObjectModel, PathAgent, Record};

pub fn write_header<W: Write>(
    w: &mut W,
    model: &ObjectModel,
    cfg: &ObjectsConfig,
) -> io::Result<()> {
    writeln!(w, "#ifndef {}", cfg.header_guard)?;
    writeln!(w, "#define {}\n", cfg.header_guard)?;
    for include in &cfg.includes {
        writeln!(w, "#include {include}")?;
    }
    writeln!(w)?;

    for id in model.paths.keys() {
        writeln!(w, "extern const Vect2D_u16 path_{id}[];")?;
    }

    for group in model.groups.values() {
        writeln!(w, "typedef struct {{")?;
        if group.path_agent {
            writeln!(w, "    PathAgentDef agentDef;")?;
        }
        for field in &group.fields {
            writeln!(w, "    {} {};", field.ty.c_type(), field.key)?;
        }
        writeln!(w, "}} {}_t;\n", group.name)?;
        writeln!(w, "extern const {n}_t {n}s[];", n = group.name)?;
    }

    writeln!(w, "\n#endif // {}", cfg.header_guard)?;
    Ok(())
}

/// `header_name` is what the source `#include`s.
pub fn write_source<W: Write>(
    w: &mut W,
    model: &ObjectModel,
    header_name: &str,
) -> io::Result<()> {
    writeln!(w, "#include \"{header_name}\"\n")?;

    for (id, points) in &model.paths {
        writeln!(w, "const Vect2D_u16 path_{id}[] = {{")?;
        for p in points {
            writeln!(w, "    {{ {}, {} }},", p.x, p.y)?;
        }
        writeln!(w, "}};\n")?;
    }

    for group in model.groups.values() {
        writeln!(w, "const {n}_t {n}s[] = {{", n = group.name)?;
        for record in &group.records {
            writeln!(w, "    {{ {} }},", initializer(group, record))?;
        }
        writeln!(w, "}};\n")?;
    }

    Ok(())
}

fn initializer(group: &Group, record: &Record) -> String {
    let mut parts = Vec::with_capacity(group.fields.len() + 1);
    if let Some(agent) = &record.agent {
        parts.push(agent_literal(agent));
    }
    for (field, value) in group.fields.iter().zip(&record.values) {
        parts.push(format!(".{} = {}", field.key, value));
    }
    parts.join(", ")
}

fn agent_literal(agent: &PathAgent) -> String {
    format!(
        ".agentDef = {{ .position = {{ {}, {} }}, .path = path_{}, .path_len = {}, \
         .delayInicial = {}, .path_mode = {}, .velocidade = FIX16({}), \
         .sprite = {}, .w = {}, .h = {} }}",
        agent.position.x,
        agent.position.y,
        agent.path_id,
        agent.path_len,
        agent.initial_delay,
        agent.mode.c_name(),
        agent.speed,
        FieldValue::Str(agent.sprite.clone()),
        agent.w,
        agent.h,
    )
}

/// Source file name for a header name: `fase1_obj.h` → `fase1_obj.c`.
pub fn source_name(header_name: &str) -> String {
    match header_name.strip_suffix(".h") {
        Some(stem) => format!("{stem}.c"),
        None => format!("{header_name}.c"),
    }
}

/// Render both files fully, then write them under `out_dir`.
pub fn emit(
    model: &ObjectModel,
    cfg: &ObjectsConfig,
    out_dir: &Path,
    header_name: &str,
) -> io::Result<[PathBuf; 2]> {
    let mut header = Vec::new();
    write_header(&mut header, model, cfg)?;
    let mut source = Vec::new();
    write_source(&mut source, model, header_name)?;

    let header_path = out_dir.join(header_name);
    let source_path = out_dir.join(source_name(header_name));
    for path in [&header_path, &source_path] {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&header_path, header)?;
    fs::write(&source_path, source)?;

    Ok([header_path, source_path])
}
