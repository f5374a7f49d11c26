//! Line-oriented tag scanner for `.tmx` documents.
//!
//! Tiled writes one element per line, so we never build a tree: every
//! trimmed line is classified by its opening tag and attributes are looked
//! up on demand. Only the shallow vocabulary the compilers need is
//! recognised, everything else comes out as `TagKind::Other`.
//
//  Vocabulary (informal):
//
//      <objectgroup name=…>   … </objectgroup>
//      <object id=… name=… x=… y=…>
//      <property name=… value=… [type=…]/>
//      <polyline points="x,y x,y …"/>  |  <polygon points=…/>
//      <layer name=… width=… height=…>
//      <data encoding="csv"> 1,2,3,… </data>
//
//  Missing attributes read as "" (strings) or -1 (integers).

use std::borrow::Cow;
use std::iter::Enumerate;
use std::str::Lines;

use crate::error::CompileError;

/// Integer read for an attribute that is not present.
pub const MISSING_INT: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Polyline,
    Polygon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    GroupOpen,
    GroupClose,
    Object,
    Property,
    Shape(ShapeKind),
    LayerOpen,
    LayerClose,
    DataOpen,
    DataClose,
    Other,
}

impl TagKind {
    fn classify(text: &str) -> Self {
        // order matters: `<objectgroup` also starts with `<object`, and
        // `<properties>` must not be taken for a property
        if text.starts_with("<objectgroup") {
            TagKind::GroupOpen
        } else if text.starts_with("</objectgroup") {
            TagKind::GroupClose
        } else if text.starts_with("<object") {
            TagKind::Object
        } else if text.starts_with("<property") && !text.starts_with("<properties") {
            TagKind::Property
        } else if text.starts_with("<polyline") {
            TagKind::Shape(ShapeKind::Polyline)
        } else if text.starts_with("<polygon") {
            TagKind::Shape(ShapeKind::Polygon)
        } else if text.starts_with("<layer") {
            TagKind::LayerOpen
        } else if text.starts_with("</layer") {
            TagKind::LayerClose
        } else if text.starts_with("<data") {
            TagKind::DataOpen
        } else if text.starts_with("</data") {
            TagKind::DataClose
        } else {
            TagKind::Other
        }
    }
}

/// One classified line of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'a> {
    /// 1-based line number.
    pub line: usize,
    pub kind: TagKind,
    text: &'a str,
}

impl<'a> Tag<'a> {
    /// Trimmed source line.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Raw (still escaped) attribute value.
    pub fn raw_attr(&self, name: &str) -> Option<&'a str> {
        find_attr(self.text, name)
    }

    /// Attribute value with XML entities resolved; "" when missing.
    pub fn attr(&self, name: &str) -> Cow<'a, str> {
        self.raw_attr(name).map(unescape).unwrap_or(Cow::Borrowed(""))
    }

    /// Numeric attribute as a float. Accepts `,` as decimal separator.
    pub fn float_attr(&self, name: &str) -> Result<Option<f64>, CompileError> {
        let Some(raw) = self.raw_attr(name) else {
            return Ok(None);
        };
        parse_decimal(raw)
            .map(Some)
            .ok_or_else(|| CompileError::InvalidNumber {
                line: self.line,
                attribute: name.to_string(),
                value: raw.to_string(),
            })
    }

    /// Numeric attribute rounded half away from zero; [`MISSING_INT`] when missing.
    pub fn int_attr(&self, name: &str) -> Result<i32, CompileError> {
        Ok(self
            .float_attr(name)?
            .map_or(MISSING_INT, |v| v.round() as i32))
    }

    /// The `points` list of a polyline/polygon, still relative to its object.
    pub fn points(&self) -> Result<Vec<(f64, f64)>, CompileError> {
        let raw = self.raw_attr("points").unwrap_or("").trim();
        if raw.is_empty() {
            return Err(CompileError::malformed(self.line, "shape has no points"));
        }

        raw.split_whitespace()
            .map(|pair| -> Result<(f64, f64), CompileError> {
                let (x, y) = pair.split_once(',').ok_or_else(|| {
                    CompileError::malformed(self.line, format!("point `{pair}` is not an x,y pair"))
                })?;
                let coord = |v: &str| {
                    v.trim().parse::<f64>().map_err(|_| CompileError::InvalidNumber {
                        line: self.line,
                        attribute: "points".into(),
                        value: pair.to_string(),
                    })
                };
                Ok((coord(x)?, coord(y)?))
            })
            .collect()
    }
}

/// Iterator over every line of a document as a [`Tag`].
#[derive(Clone)]
pub struct Scanner<'a> {
    lines: Enumerate<Lines<'a>>,
}

impl<'a> Scanner<'a> {
    pub fn new(doc: &'a str) -> Self {
        Self {
            lines: doc.lines().enumerate(),
        }
    }

    /// Restrict the scan to the children of `<objectgroup name="{container}">`.
    pub fn within<'n>(self, container: &'n str) -> Within<'a, 'n> {
        Within {
            inner: self,
            container,
            inside: false,
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (idx, line) = self.lines.next()?;
        let text = line.trim();
        Some(Tag {
            line: idx + 1,
            kind: TagKind::classify(text),
            text,
        })
    }
}

/// Tags strictly inside one named object container; the group's own
/// open/close tags are not yielded.
pub struct Within<'a, 'n> {
    inner: Scanner<'a>,
    container: &'n str,
    inside: bool,
}

impl<'a> Iterator for Within<'a, '_> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for tag in self.inner.by_ref() {
            match tag.kind {
                TagKind::GroupOpen => {
                    // an empty layer is written self-closed and has no children
                    self.inside =
                        tag.attr("name") == self.container && !tag.text().ends_with("/>");
                }
                TagKind::GroupClose => self.inside = false,
                _ if self.inside => return Some(tag),
                _ => {}
            }
        }
        None
    }
}

/// Locate `name="…"` as a whole attribute (so `id` never matches `gid`).
fn find_attr<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("{name}=\"");
    let mut from = 0;
    while let Some(pos) = text[from..].find(&needle) {
        let start = from + pos;
        let value_start = start + needle.len();
        let at_boundary = text[..start]
            .chars()
            .next_back()
            .is_none_or(char::is_whitespace);
        if at_boundary {
            let len = text[value_start..].find('"')?;
            return Some(&text[value_start..value_start + len]);
        }
        from = value_start;
    }
    None
}

/// Parse an authored decimal, tolerating `,` as separator.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    raw.trim().replace(',', ".").parse::<f64>().ok()
}

/// Resolve the predefined entities and numeric character references in one
/// pass. Anything else starting with `&` is kept as written.
fn unescape(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .and_then(|end| entity(&tail[1..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn entity(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "amp" => Some('&'),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
                    u32::from_str_radix(hex, 16).ok()?
                }
                Some(_) => return None,
                None if !code.is_empty() && code.bytes().all(|b| b.is_ascii_digit()) => {
                    code.parse().ok()?
                }
                None => return None,
            };
            char::from_u32(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(text: &str) -> Tag<'_> {
        Scanner::new(text).next().unwrap()
    }

    #[test]
    fn test_classification() {
        let doc = r#"<objectgroup id="2" name="objetos">
  <object id="5" name="Inimigo" x="10" y="20">
   <properties>
    <property name="vida" type="int" value="10"/>
   </properties>
   <polyline points="0,0 10,0"/>
  </object>
 </objectgroup>"#;

        let kinds: Vec<_> = Scanner::new(doc).map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TagKind::GroupOpen,
                TagKind::Object,
                TagKind::Other,
                TagKind::Property,
                TagKind::Other,
                TagKind::Shape(ShapeKind::Polyline),
                TagKind::Other,
                TagKind::GroupClose,
            ]
        );
    }

    #[test]
    fn test_attribute_lookup() {
        let t = tag(r#"<object id="7" gid="99" name="Item" x="12.5" y="-3,5">"#);
        assert_eq!(t.attr("id"), "7");
        assert_eq!(t.attr("name"), "Item");
        assert_eq!(t.attr("type"), "");
        // half away from zero, both separators
        assert_eq!(t.int_attr("x").unwrap(), 13);
        assert_eq!(t.int_attr("y").unwrap(), -4);
        assert_eq!(t.int_attr("width").unwrap(), MISSING_INT);
    }

    #[test]
    fn test_attribute_entities() {
        let t = tag(r#"<property name="nome" value="Tom &amp; &quot;Jerry&quot;"/>"#);
        assert_eq!(t.attr("value"), "Tom & \"Jerry\"");
    }

    #[test]
    fn test_numeric_character_references() {
        let text = r#"<property name="m" value="a&#10;b&#13;&#x9;c&#X41;&amp;lt;&bogus; &#xZZ;"/>"#;
        let t = tag(text);
        assert_eq!(t.attr("value"), "a\nb\r\tcA&lt;&bogus; &#xZZ;");
    }

    #[test]
    fn test_bad_number_is_reported() {
        let t = tag(r#"<object id="1" x="abc"/>"#);
        assert_eq!(
            t.int_attr("x"),
            Err(CompileError::InvalidNumber {
                line: 1,
                attribute: "x".into(),
                value: "abc".into(),
            })
        );
    }

    #[test]
    fn test_points() {
        let t = tag(r#"<polygon points="0,0 10.4,0 10,-9.5"/>"#);
        assert_eq!(
            t.points().unwrap(),
            vec![(0.0, 0.0), (10.4, 0.0), (10.0, -9.5)]
        );

        let missing = tag(r#"<polyline/>"#);
        assert!(matches!(
            missing.points(),
            Err(CompileError::MalformedInput { line: 1, .. })
        ));

        let half = tag(r#"<polyline points="0,0 10"/>"#);
        assert!(matches!(
            half.points(),
            Err(CompileError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_within_container() {
        let doc = r#"<objectgroup name="other">
<object id="1" name="Skip"/>
</objectgroup>
<objectgroup name="objetos">
<object id="2" name="Keep"/>
</objectgroup>
<object id="3" name="Outside"/>"#;

        let names: Vec<_> = Scanner::new(doc)
            .within("objetos")
            .map(|t| t.attr("name").into_owned())
            .collect();
        assert_eq!(names, vec!["Keep".to_string()]);
    }

    #[test]
    fn test_self_closed_container_has_no_children() {
        let doc = r#"<objectgroup id="3" name="objetos"/>
<layer id="2" name="collision" width="1" height="1">
<properties>
<property name="solid" type="bool" value="true"/>
</properties>
</layer>"#;

        assert_eq!(Scanner::new(doc).within("objetos").count(), 0);
    }
}
