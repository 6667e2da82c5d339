//! OBJ file loader for 3D models
//!
//! Parses Wavefront OBJ text into mesh groups, one per run of faces sharing
//! an object/group name and `usemtl` material. Faces are fan-triangulated.

use thiserror::Error;

use super::geometry::{GeometryDecoder, GeometryError};
use super::materials::MaterialResolver;
use crate::loading::format::file_name;
use crate::scene::{Mesh, MeshGroup, SceneObject, Vertex};

/// OBJ parsing errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ObjError {
    /// A number or index could not be parsed
    #[error("Parse error on line {line}: {message}")]
    ParseError {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// Structurally invalid content
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Faces sharing a name and material
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjGroup {
    /// Object or group name (`o` / `g`)
    pub name: String,
    /// Material from the last `usemtl`
    pub material_name: Option<String>,
    /// Triangulated geometry
    pub mesh: Mesh,
}

/// Parsed OBJ file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjModel {
    /// Libraries named by `mtllib`
    pub material_libraries: Vec<String>,
    /// Non-empty groups in file order
    pub groups: Vec<ObjGroup>,
}

impl ObjModel {
    /// Distinct material names in order of first use
    pub fn material_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.groups.iter().filter_map(|g| g.material_name.as_deref()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

/// OBJ text parser
pub struct ObjLoader;

impl ObjLoader {
    /// Parse OBJ file contents
    pub fn parse(contents: &str) -> Result<ObjModel, ObjError> {
        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut normals: Vec<[f32; 3]> = Vec::new();
        let mut tex_coords: Vec<[f32; 2]> = Vec::new();

        let mut model = ObjModel::default();
        let mut current = ObjGroup::default();

        for (number, line) in contents.lines().enumerate() {
            let line_no = number + 1;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            match parts[0] {
                "v" => positions.push(parse_floats::<3>(&parts[1..], line_no, "vertex")?),
                "vn" => normals.push(parse_floats::<3>(&parts[1..], line_no, "normal")?),
                "vt" => tex_coords.push(parse_floats::<2>(&parts[1..], line_no, "texture coordinate")?),
                "o" | "g" => {
                    let name = parts[1..].join(" ");
                    Self::start_group(&mut model, &mut current);
                    current.name = name;
                }
                "usemtl" => {
                    let name = parts[1..].join(" ");
                    Self::start_group(&mut model, &mut current);
                    current.material_name = (!name.is_empty()).then_some(name);
                }
                "mtllib" => {
                    if parts.len() > 1 {
                        model.material_libraries.push(parts[1..].join(" "));
                    }
                }
                "f" => {
                    if parts.len() < 4 {
                        return Err(ObjError::ParseError {
                            line: line_no,
                            message: format!("face needs at least 3 vertices, got {}", parts.len() - 1),
                        });
                    }

                    let mesh = &mut current.mesh;
                    let first = u32::try_from(mesh.vertices.len())
                        .map_err(|_| ObjError::InvalidFormat("too many vertices".to_string()))?;

                    for vertex_data in &parts[1..] {
                        let mut refs = vertex_data.split('/');
                        let pos_idx = resolve_index(refs.next(), positions.len(), line_no)?
                            .ok_or_else(|| parse_error(line_no, "missing position index"))?;
                        let tex_idx = resolve_index(refs.next(), tex_coords.len(), line_no)?;
                        let normal_idx = resolve_index(refs.next(), normals.len(), line_no)?;

                        let position = positions
                            .get(pos_idx)
                            .ok_or_else(|| ObjError::InvalidFormat(format!("position index out of bounds on line {}", line_no)))?;
                        let tex_coord = tex_idx.and_then(|idx| tex_coords.get(idx)).unwrap_or(&[0.0, 0.0]);
                        let normal = normal_idx.and_then(|idx| normals.get(idx)).unwrap_or(&[0.0, 1.0, 0.0]);

                        mesh.vertices.push(Vertex::new(*position, *normal, *tex_coord));
                    }

                    // Fan triangulation
                    let count = u32::try_from(parts.len() - 1).unwrap_or(u32::MAX);
                    for i in 1..count - 1 {
                        mesh.indices.extend_from_slice(&[first, first + i, first + i + 1]);
                    }
                }
                other => log::trace!("Ignoring OBJ statement '{}' on line {}", other, line_no),
            }
        }

        Self::start_group(&mut model, &mut current);

        if model.groups.is_empty() {
            return Err(ObjError::InvalidFormat("No faces found in OBJ file".to_string()));
        }

        log::debug!(
            "Parsed OBJ: {} position(s), {} group(s), {} material librar(ies)",
            positions.len(),
            model.groups.len(),
            model.material_libraries.len()
        );
        Ok(model)
    }

    /// Close the current group if it has faces; name and material carry over
    fn start_group(model: &mut ObjModel, current: &mut ObjGroup) {
        if current.mesh.indices.is_empty() {
            current.mesh = Mesh::default();
            return;
        }
        let next = ObjGroup {
            name: current.name.clone(),
            material_name: current.material_name.clone(),
            mesh: Mesh::default(),
        };
        model.groups.push(std::mem::replace(current, next));
    }
}

fn parse_error(line: usize, message: &str) -> ObjError {
    ObjError::ParseError {
        line,
        message: message.to_string(),
    }
}

fn parse_floats<const N: usize>(tokens: &[&str], line: usize, what: &str) -> Result<[f32; N], ObjError> {
    if tokens.len() < N {
        return Err(parse_error(line, &format!("{} needs {} components", what, N)));
    }
    let mut out = [0.0; N];
    for (slot, token) in out.iter_mut().zip(tokens) {
        *slot = token
            .parse()
            .map_err(|_| parse_error(line, &format!("invalid {} component '{}'", what, token)))?;
    }
    Ok(out)
}

/// Turn a 1-based (or negative, relative) OBJ index into a 0-based one
fn resolve_index(token: Option<&str>, count: usize, line: usize) -> Result<Option<usize>, ObjError> {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    let value: i64 = token
        .parse()
        .map_err(|_| parse_error(line, &format!("invalid index '{}'", token)))?;
    let count = i64::try_from(count).unwrap_or(i64::MAX);
    let index = match value {
        0 => return Err(parse_error(line, "index 0 is not valid")),
        v if v > 0 => v - 1,
        v => count + v,
    };
    usize::try_from(index)
        .map(Some)
        .map_err(|_| parse_error(line, &format!("relative index {} out of range", value)))
}

/// Geometry decoder for OBJ files
///
/// Each group becomes a [`MeshGroup`]; its material is looked up in the
/// resolver when one is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct ObjDecoder;

impl GeometryDecoder for ObjDecoder {
    fn decode(
        &self,
        bytes: &[u8],
        url: &str,
        mut materials: Option<&mut MaterialResolver>,
    ) -> Result<SceneObject, GeometryError> {
        let text = String::from_utf8_lossy(bytes);
        let model = ObjLoader::parse(&text)?;

        let mut object = SceneObject::new(file_name(url));
        for group in model.groups {
            let material = match (group.material_name.as_deref(), materials.as_deref_mut()) {
                (Some(name), Some(resolver)) => {
                    let resolved = resolver.resolve(name);
                    if resolved.is_none() {
                        log::warn!("Material '{}' used by {} is not in the library", name, url);
                    }
                    resolved
                }
                _ => None,
            };
            object.groups.push(MeshGroup {
                name: group.name,
                material_name: group.material_name,
                material,
                mesh: group.mesh,
            });
        }

        Ok(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::materials::{MaterialOptions, MtlParser};
    use crate::assets::textures::NullTextureLoader;

    const CUBE_FACES: &str = r#"
mtllib car.mtl
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 1
vn 0 0 1
o Body
usemtl Paint
f 1/1/1 2/2/1 3//1
f 1 3 4
usemtl Glass
f -4 -3 -2 -1
"#;

    #[test]
    fn test_groups_split_on_usemtl() {
        let model = ObjLoader::parse(CUBE_FACES).unwrap();

        assert_eq!(model.material_libraries, vec!["car.mtl"]);
        assert_eq!(model.groups.len(), 2);
        assert_eq!(model.material_names(), vec!["Paint", "Glass"]);

        let paint = &model.groups[0];
        assert_eq!(paint.name, "Body");
        assert_eq!(paint.mesh.vertices.len(), 6);
        assert_eq!(paint.mesh.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(paint.mesh.vertices[1].tex_coord, [1.0, 1.0]);
        assert_eq!(paint.mesh.vertices[2].normal, [0.0, 0.0, 1.0]);
        assert_eq!(paint.mesh.vertices[3].normal, [0.0, 1.0, 0.0]);

        let glass = &model.groups[1];
        assert_eq!(glass.name, "Body");
        assert_eq!(glass.material_name.as_deref(), Some("Glass"));
        assert_eq!(glass.mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(glass.mesh.vertices[3].position, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_faces_without_groups() {
        let model = ObjLoader::parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(model.groups.len(), 1);
        assert_eq!(model.groups[0].material_name, None);
        assert_eq!(model.groups[0].mesh.triangle_count(), 1);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(ObjLoader::parse("v 0 0 0\n"), Err(ObjError::InvalidFormat(_))));
        assert!(matches!(
            ObjLoader::parse("v 0 x 0\n"),
            Err(ObjError::ParseError { line: 1, .. })
        ));
        assert!(matches!(
            ObjLoader::parse("v 0 0 0\nf 1 2\n"),
            Err(ObjError::ParseError { line: 2, .. })
        ));
        assert!(matches!(
            ObjLoader::parse("v 0 0 0\nf 1 2 9\n"),
            Err(ObjError::InvalidFormat(_))
        ));
        assert!(matches!(
            ObjLoader::parse("v 0 0 0\nf 0 1 1\n"),
            Err(ObjError::ParseError { line: 2, .. })
        ));
    }

    #[test]
    fn test_decoder_binds_materials() {
        let mut resolver = MaterialResolver::new(Box::new(NullTextureLoader));
        resolver.configure("", MaterialOptions::default());
        resolver.set_materials(MtlParser::parse("newmtl Paint\nKd 1 0 0\n"));

        let object = ObjDecoder
            .decode(CUBE_FACES.as_bytes(), "models/car.obj?v=3", Some(&mut resolver))
            .unwrap();

        assert_eq!(object.name, "car.obj");
        assert_eq!(object.groups[0].material.as_ref().map(|m| m.name.as_str()), Some("Paint"));
        assert!(object.groups[1].material.is_none());
        assert_eq!(object.groups[1].material_name.as_deref(), Some("Glass"));
    }

    #[test]
    fn test_decoder_without_materials() {
        let object = ObjDecoder.decode(CUBE_FACES.as_bytes(), "car.obj", None).unwrap();
        assert!(object.groups.iter().all(|g| g.material.is_none()));
        assert!(object.animations.is_empty());
    }
}
