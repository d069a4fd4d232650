//! SVG export post-processing.
//!
//! Rendered SVG markup is sized for the renderer's own viewport and usually
//! carries a transparent background. Before upload the markup is rewritten to
//! a fixed canvas with an opaque background and serialized as a standalone
//! image document.

use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

/// Exported canvas width in pixels.
pub const EXPORT_WIDTH: u32 = 1200;

/// Exported canvas height in pixels.
pub const EXPORT_HEIGHT: u32 = 800;

/// XML declaration for the standalone image document.
const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#;

/// Opaque background painted behind the diagram.
const BACKGROUND_RECT: &str = r##"<rect width="100%" height="100%" fill="#ffffff"/>"##;

/// Root `<svg ...>` open tag.
static SVG_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<svg\b[^>]*>").expect("valid regex"));

/// `width`/`height` attributes inside the root tag.
static DIMENSION_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\s+(?:width|height)\s*=\s*"[^"]*""#).expect("valid regex"));

/// Rewrite rendered SVG markup into a standalone export image.
///
/// Forces the canvas to [`EXPORT_WIDTH`]×[`EXPORT_HEIGHT`], paints an opaque
/// background, guarantees the SVG namespace, and prepends the XML
/// declaration. Markup without an `<svg>` root is returned with only the
/// declaration prepended; the upload pipeline treats such input as a renderer
/// defect and fails on the backend side.
#[must_use]
pub fn to_standalone_svg(svg: &str) -> String {
    let svg = svg.trim();

    let Some(open_tag) = SVG_OPEN_RE.find(svg) else {
        return format!("{XML_DECLARATION}\n{svg}");
    };

    let stripped = DIMENSION_ATTR_RE.replace_all(open_tag.as_str(), "");
    let tag = stripped.strip_suffix('>').unwrap_or(stripped.as_ref());
    // A self-closing root also sheds its slash; forced attributes follow.
    let mut rewritten = tag.trim_end().strip_suffix('/').unwrap_or(tag).trim_end().to_string();
    if !rewritten.contains("xmlns=") {
        rewritten.push_str(r#" xmlns="http://www.w3.org/2000/svg""#);
    }
    rewritten.push_str(&format!(
        r#" width="{EXPORT_WIDTH}" height="{EXPORT_HEIGHT}">"#
    ));

    format!(
        "{XML_DECLARATION}\n{}{rewritten}{BACKGROUND_RECT}{}",
        &svg[..open_tag.start()],
        &svg[open_tag.end()..]
    )
}

/// Content-addressed attachment filename for a diagram source.
///
/// The same source always produces the same filename, so re-syncing a
/// document upserts instead of accumulating attachments.
#[must_use]
pub fn attachment_filename(source: &str) -> String {
    let digest = Sha256::digest(source.as_bytes());
    let hash = hex::encode(digest);
    format!("diagram_{}.svg", &hash[..12])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn forces_fixed_canvas() {
        let out = to_standalone_svg(r#"<svg width="420" height="96" viewBox="0 0 420 96"><g/></svg>"#);
        assert!(out.contains(r#"width="1200""#));
        assert!(out.contains(r#"height="800""#));
        assert!(!out.contains(r#"width="420""#));
        assert!(out.contains(r#"viewBox="0 0 420 96""#));
    }

    #[test]
    fn prepends_xml_declaration() {
        let out = to_standalone_svg("<svg><g/></svg>");
        assert!(out.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#));
    }

    #[test]
    fn injects_opaque_background_first() {
        let out = to_standalone_svg("<svg><circle r=\"4\"/></svg>");
        let rect_pos = out.find("<rect").unwrap();
        let circle_pos = out.find("<circle").unwrap();
        assert!(rect_pos < circle_pos);
        assert!(out.contains(r##"fill="#ffffff""##));
    }

    #[test]
    fn adds_missing_namespace() {
        let out = to_standalone_svg("<svg><g/></svg>");
        assert!(out.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
    }

    #[test]
    fn keeps_existing_namespace() {
        let out = to_standalone_svg(r#"<svg xmlns="http://www.w3.org/2000/svg"><g/></svg>"#);
        assert_eq!(out.matches("xmlns=").count(), 1);
    }

    #[test]
    fn self_closing_root_sheds_its_slash() {
        let out = to_standalone_svg(r#"<svg width="10" height="10" />"#);
        assert!(out.contains(r#" width="1200" height="800">"#));
        assert!(!out.contains("/ "));
        assert!(!out.contains(r#"/ width"#));
    }

    #[test]
    fn markup_without_svg_root_is_passed_through() {
        let out = to_standalone_svg("not svg at all");
        assert!(out.ends_with("not svg at all"));
    }

    #[test]
    fn filename_is_stable_per_source() {
        let a = attachment_filename("graph TD\nA --> B");
        let b = attachment_filename("graph TD\nA --> B");
        let c = attachment_filename("graph TD\nA --> C");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("diagram_"));
        assert!(a.ends_with(".svg"));
        assert_eq!(a.len(), "diagram_".len() + 12 + ".svg".len());
    }
}
