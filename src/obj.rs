//! Wavefront OBJ loading, reduced to what a triangle soup needs: `v` and `f`
//! statements. Texture and normal references are consumed and discarded,
//! polygons become triangle fans, and indices may be negative (counting back
//! from the end of the vertex list, per the OBJ convention).

use std::{
    fs,
    io::{self, BufRead, BufReader},
    path::Path,
};

use thiserror::Error;

use crate::geometry::{FloatType, Triangle, WorldPoint};

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("failed to read OBJ data: {0}")]
    Read(#[from] io::Error),

    #[error("line {line}: malformed vertex statement")]
    MalformedVertex { line: usize },

    #[error("line {line}: malformed face index {token:?}")]
    MalformedFaceIndex { line: usize, token: String },

    #[error("line {line}: vertex index {index} is out of bounds")]
    IndexOutOfBounds { line: usize, index: i64 },
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<Vec<Triangle>, ObjError> {
    load_from_reader(BufReader::new(fs::File::open(path)?))
}

pub fn load_from_reader(reader: impl BufRead) -> Result<Vec<Triangle>, ObjError> {
    let mut vertices: Vec<WorldPoint> = Vec::new();
    let mut triangles: Vec<Triangle> = Vec::new();

    for (line_index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut tokens = line.split_whitespace();
        // 1-based for error messages.
        let line_number = line_index + 1;

        match tokens.next() {
            Some("v") => {
                let mut component = || -> Result<FloatType, ObjError> {
                    tokens
                        .next()
                        .and_then(|token| token.parse().ok())
                        .ok_or(ObjError::MalformedVertex { line: line_number })
                };
                let x = component()?;
                let y = component()?;
                let z = component()?;
                vertices.push(WorldPoint::new(x, y, z));
            }
            Some("f") => {
                let mut points = Vec::new();
                for token in tokens {
                    points.push(resolve_index(token, &vertices, line_number)?);
                }
                // Triangle fan: (first, previous, current).
                for i in 2..points.len() {
                    triangles.push(Triangle::new(points[0], points[i - 1], points[i]));
                }
            }
            // Normals, texture coordinates, groups, materials and the rest
            // carry nothing a triangle soup cares about.
            _ => {}
        }
    }

    Ok(triangles)
}

/// Resolves one face token (`7`, `7/1`, `7//3`, `7/1/3` or a negative
/// variant) against the vertex list seen so far.
fn resolve_index(
    token: &str,
    vertices: &[WorldPoint],
    line_number: usize,
) -> Result<WorldPoint, ObjError> {
    let vertex_part = token.split('/').next().unwrap_or(token);
    let index: i64 = vertex_part
        .parse()
        .map_err(|_| ObjError::MalformedFaceIndex {
            line: line_number,
            token: token.to_owned(),
        })?;

    let resolved = if index < 0 {
        vertices.len() as i64 + index
    } else {
        index - 1
    };
    usize::try_from(resolved)
        .ok()
        .and_then(|i| vertices.get(i))
        .copied()
        .ok_or(ObjError::IndexOutOfBounds {
            line: line_number,
            index,
        })
}
