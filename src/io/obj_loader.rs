use crate::scene::mesh::{DEFAULT_VERTEX_COLOR, Mesh};
use log::{error, info};
use std::fs;

/// Result of an import: the mesh (only when the whole source parsed cleanly)
/// plus every diagnostic message produced along the way, in source order.
pub struct ObjImport {
    pub mesh: Option<Mesh>,
    pub messages: Vec<String>,
}

impl ObjImport {
    pub fn is_ok(&self) -> bool {
        self.mesh.is_some()
    }
}

/// Running parser state; errors mark the import failed but scanning
/// continues so one pass reports every problem in the file.
struct ParseState {
    positions: Vec<f32>,
    triangles: Vec<u32>,
    vertex_colors: Vec<f32>,
    colored_vertex_count: usize,
    messages: Vec<String>,
    ok: bool,
}

impl ParseState {
    fn new() -> Self {
        Self {
            positions: Vec::new(),
            triangles: Vec::new(),
            vertex_colors: Vec::new(),
            colored_vertex_count: 0,
            messages: Vec::new(),
            ok: true,
        }
    }

    fn info(&mut self, message: String) {
        self.messages.push(message);
    }

    fn fail(&mut self, message: String) {
        self.messages.push(message);
        self.ok = false;
    }
}

/// Parses the line-oriented mesh format.
///
/// Recognized directives:
/// - `v x y z [r g b]`: vertex position with optional color components,
///   each a 0..1 float scaled to 0..255; missing trailing components
///   default to white.
/// - `f i j k`: triangle face, exactly three 1-based vertex indices.
/// - `#` and blank lines are ignored; any other leading token is recorded
///   as a warning but does not fail the import.
///
/// Malformed `v`/`f` records are fatal: no mesh is produced, but the rest of
/// the source is still scanned so the message list covers every problem.
pub fn parse_obj_source(source: &str) -> ObjImport {
    let mut state = ParseState::new();

    for (line_index, raw_line) in source.lines().enumerate() {
        let line_no = line_index + 1;
        let mut tokens = raw_line.split_whitespace();

        match tokens.next() {
            None | Some("#") => {}
            Some("v") => parse_vertex(&mut state, line_no, &tokens.collect::<Vec<_>>()),
            Some("f") => parse_face(&mut state, line_no, &tokens.collect::<Vec<_>>()),
            Some(other) => {
                state.info(format!(
                    "warning: unknown element \"{other}\" at line {line_no}: \"{}\"",
                    raw_line.trim()
                ));
            }
        }
    }

    if !state.ok {
        return ObjImport {
            mesh: None,
            messages: state.messages,
        };
    }

    let vertex_count = state.positions.len() / 3;
    let triangle_count = state.triangles.len() / 3;
    let colored = state.colored_vertex_count;

    match Mesh::new(
        state.positions,
        state.triangles,
        Some(state.vertex_colors),
    ) {
        Ok(mesh) => {
            state.messages.push(format!(
                "imported {vertex_count} vertices, {triangle_count} triangles and {colored} vertex colors"
            ));
            ObjImport {
                mesh: Some(mesh),
                messages: state.messages,
            }
        }
        Err(e) => {
            state.messages.push(format!("mesh rejected: {e}"));
            ObjImport {
                mesh: None,
                messages: state.messages,
            }
        }
    }
}

fn parse_vertex(state: &mut ParseState, line_no: usize, args: &[&str]) {
    if args.len() < 3 {
        state.fail(format!(
            "line {line_no}: geometric vertex has fewer than 3 coordinates"
        ));
        return;
    }

    for coord in &args[..3] {
        match coord.parse::<f32>() {
            Ok(value) => state.positions.push(value),
            Err(_) => {
                state.fail(format!(
                    "line {line_no}: geometric vertex has non-numeric coordinate \"{coord}\""
                ));
                return;
            }
        }
    }

    // Components 4..6 are an optional vertex color, 0..1 scaled to 0..255;
    // anything past them is ignored.
    let mut color = [DEFAULT_VERTEX_COLOR; 3];
    let mut read_color = false;
    for (channel, arg) in args.iter().skip(3).take(3).enumerate() {
        match arg.parse::<f32>() {
            Ok(value) => {
                color[channel] = (255.0 * value).round();
                read_color = true;
            }
            Err(_) => {
                state.fail(format!(
                    "line {line_no}: vertex color has non-numeric component \"{arg}\""
                ));
                return;
            }
        }
    }

    state.vertex_colors.extend_from_slice(&color);
    if read_color {
        state.colored_vertex_count += 1;
    }
}

fn parse_face(state: &mut ParseState, line_no: usize, args: &[&str]) {
    if args.len() < 3 {
        state.fail(format!(
            "line {line_no}: polygonal face has fewer than 3 indices"
        ));
        return;
    }
    if args.len() > 3 {
        state.fail(format!(
            "line {line_no}: can't import polygon of {} vertices; only triangles are supported",
            args.len()
        ));
        return;
    }

    for arg in args {
        match arg.parse::<i64>() {
            // Indices are 1-based in the source format.
            Ok(index) if index >= 1 => state.triangles.push((index - 1) as u32),
            _ => {
                state.fail(format!(
                    "line {line_no}: polygonal face has invalid index \"{arg}\""
                ));
                return;
            }
        }
    }
}

/// Loads a mesh from disk, logging every import message.
pub fn load_obj(path: &str) -> Result<Mesh, String> {
    let source =
        fs::read_to_string(path).map_err(|e| format!("failed to read \"{path}\": {e}"))?;

    info!("Loading mesh: {path}");
    let import = parse_obj_source(&source);
    for message in &import.messages {
        if import.is_ok() {
            info!("{message}");
        } else {
            error!("{message}");
        }
    }

    import
        .mesh
        .ok_or_else(|| format!("failed to import \"{path}\": {}", import.messages.join("; ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imports_minimal_triangle() {
        let import = parse_obj_source("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3");
        assert!(import.is_ok());

        let mesh = import.mesh.unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangles, vec![0, 1, 2]);
        // No colors in the source: every vertex defaults to opaque white.
        assert_eq!(mesh.vertex_colors, vec![255.0; 9]);
    }

    #[test]
    fn reads_vertex_colors_scaled_to_255() {
        let import = parse_obj_source("v 0 0 0 1 0.5 0\nv 1 0 0 0 0 0\nv 0 1 0\nf 1 2 3");
        let mesh = import.mesh.unwrap();
        assert_eq!(&mesh.vertex_colors[..3], &[255.0, 128.0, 0.0]);
        assert_eq!(&mesh.vertex_colors[3..6], &[0.0, 0.0, 0.0]);
        // Trailing components missing entirely: white.
        assert_eq!(&mesh.vertex_colors[6..], &[255.0, 255.0, 255.0]);
    }

    #[test]
    fn partial_vertex_color_defaults_missing_channels() {
        let import = parse_obj_source("v 0 0 0 0.2\nv 1 0 0\nv 0 1 0\nf 1 2 3");
        let mesh = import.mesh.unwrap();
        assert_eq!(&mesh.vertex_colors[..3], &[51.0, 255.0, 255.0]);
    }

    #[test]
    fn quad_face_fails_with_diagnostic() {
        let import = parse_obj_source("v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nf 1 2 3 4");
        assert!(!import.is_ok());
        assert!(import.mesh.is_none());
        assert!(
            import
                .messages
                .iter()
                .any(|m| m.contains("polygon of 4 vertices"))
        );
    }

    #[test]
    fn short_vertex_fails_but_scanning_continues() {
        let import = parse_obj_source("v 0 0\nf 1 2 3 4\nv 0 0 0");
        assert!(!import.is_ok());
        // Both problems are reported from a single pass.
        assert!(import.messages.iter().any(|m| m.contains("fewer than 3")));
        assert!(import.messages.iter().any(|m| m.contains("polygon of 4")));
    }

    #[test]
    fn unknown_directive_warns_without_failing() {
        let import = parse_obj_source("vn 0 1 0\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3");
        assert!(import.is_ok());
        assert!(
            import
                .messages
                .iter()
                .any(|m| m.contains("unknown element \"vn\""))
        );
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let import = parse_obj_source("# header\n\nv 0 0 0\nv 1 0 0\nv 0 1 0\n\nf 1 2 3\n");
        assert!(import.is_ok());
        assert_eq!(import.mesh.unwrap().triangle_count(), 1);
    }

    #[test]
    fn face_referencing_missing_vertex_fails() {
        let import = parse_obj_source("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4");
        assert!(!import.is_ok());
        assert!(import.messages.iter().any(|m| m.contains("out of range")));
    }

    #[test]
    fn zero_index_fails() {
        let import = parse_obj_source("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2");
        assert!(!import.is_ok());
        assert!(import.messages.iter().any(|m| m.contains("invalid index")));
    }
}
