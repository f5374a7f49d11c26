//! Emit the slope table header.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::config::SlopesConfig;
use crate::model::Slope;

pub fn write_header<W: Write>(w: &mut W, slopes: &[Slope], cfg: &SlopesConfig) -> io::Result<()> {
    writeln!(w, "#ifndef {}", cfg.header_guard)?;
    writeln!(w, "#define {}\n", cfg.header_guard)?;
    for include in &cfg.includes {
        writeln!(w, "#include {include}")?;
    }
    writeln!(w)?;

    writeln!(w, "#define SLOPE_COUNT {}", slopes.len())?;
    writeln!(w, "const Slope slopes[SLOPE_COUNT] = {{")?;
    for (i, s) in slopes.iter().enumerate() {
        let sep = if i + 1 < slopes.len() { "," } else { "" };
        writeln!(
            w,
            "    {{ {}, {}, {}, {}, {} }}{sep}",
            s.x1, s.y1, s.x2, s.y2, s.kind
        )?;
    }
    writeln!(w, "}};\n")?;
    writeln!(w, "#endif")?;
    Ok(())
}

pub fn emit(slopes: &[Slope], cfg: &SlopesConfig, out_file: &Path) -> io::Result<()> {
    let mut buf = Vec::new();
    write_header(&mut buf, slopes, cfg)?;
    if let Some(parent) = out_file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(out_file, buf)
}
