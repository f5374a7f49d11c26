//! Emit the `CollisionArray` header.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::model::{CollisionArray, GridData};

/// C identifier for a header name: `fase1_col.h` → `fase1_col`.
pub fn array_name(header_name: &str) -> &str {
    header_name.strip_suffix(".h").unwrap_or(header_name)
}

pub fn write_header<W: Write>(
    w: &mut W,
    grid: &CollisionArray,
    name: &str,
    includes: &[String],
) -> io::Result<()> {
    writeln!(w, "#pragma once")?;
    for include in includes {
        writeln!(w, "#include {include}")?;
    }
    writeln!(w)?;

    writeln!(w, "const CollisionArray {name} = {{")?;
    writeln!(w, "    .data = (const u8[]){{")?;
    match &grid.data {
        GridData::Rle(bytes) => {
            let listed: Vec<String> = bytes.iter().map(u8::to_string).collect();
            writeln!(w, "        {}", listed.join(", "))?;
        }
        GridData::Raw(cells) => {
            // one source line per map row
            let total = cells.len();
            for (row_idx, row) in cells.chunks(grid.width.max(1)).enumerate() {
                write!(w, "        ")?;
                for (col, cell) in row.iter().enumerate() {
                    write!(w, "{cell}")?;
                    if row_idx * grid.width + col + 1 < total {
                        write!(w, ", ")?;
                    }
                }
                writeln!(w)?;
            }
        }
    }
    writeln!(w, "    }},")?;

    writeln!(w, "    .width = {},", grid.width)?;
    writeln!(w, "    .height = {},", grid.height)?;
    let flag = if grid.is_compressed() { "TRUE" } else { "FALSE" };
    writeln!(w, "    .compressed = {flag}")?;
    writeln!(w, "}};")?;
    Ok(())
}

pub fn emit(
    grid: &CollisionArray,
    includes: &[String],
    out_dir: &Path,
    header_name: &str,
) -> io::Result<PathBuf> {
    let mut buf = Vec::new();
    write_header(&mut buf, grid, array_name(header_name), includes)?;

    let path = out_dir.join(header_name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, buf)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollisionConfig;
    use similar_asserts::assert_eq;

    fn render(grid: &CollisionArray) -> String {
        let mut buf = Vec::new();
        write_header(&mut buf, grid, "fase1_col", &CollisionConfig::default().includes).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_raw_rows() {
        let grid = CollisionArray {
            width: 3,
            height: 2,
            data: GridData::Raw(vec![0, 1, 0, 2, 2, 300]),
        };
        assert_eq!(
            render(&grid),
            "#pragma once\n\
             #include <genesis.h>\n\
             #include \"tiled_map.h\"\n\
             \n\
             const CollisionArray fase1_col = {\n\
             \x20   .data = (const u8[]){\n\
             \x20       0, 1, 0, \n\
             \x20       2, 2, 300\n\
             \x20   },\n\
             \x20   .width = 3,\n\
             \x20   .height = 2,\n\
             \x20   .compressed = FALSE\n\
             };\n"
        );
    }

    #[test]
    fn test_rle_bytes() {
        let grid = CollisionArray {
            width: 2,
            height: 2,
            data: GridData::Rle(vec![0x82, 3, 5]),
        };
        let out = render(&grid);
        assert!(out.contains("    .data = (const u8[]){\n        130, 3, 5\n    },\n"));
        assert!(out.contains("    .compressed = TRUE\n"));
    }

    #[test]
    fn test_array_name() {
        assert_eq!(array_name("fase1_col.h"), "fase1_col");
        assert_eq!(array_name("col"), "col");
    }
}
