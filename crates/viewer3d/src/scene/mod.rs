//! Scene collaborators
//!
//! The orchestrator only needs two things from the host application: a place
//! to attach decoded objects ([`Scene`]) and a camera it can frame
//! ([`CameraRig`]). [`SceneGraph`] and [`ViewCamera`] are stock
//! implementations for headless use and tests.

use crate::assets::materials::MaterialHandle;
use crate::foundation::math::{Bounds, Vec3};

/// Vertex with position, normal and texture coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in model space
    pub position: [f32; 3],
    /// Normal vector
    pub normal: [f32; 3],
    /// Texture coordinates
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }
}

/// Triangle mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex data
    pub vertices: Vec<Vertex>,
    /// Triangle list indices into `vertices`
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new mesh
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Bounds of all vertices, `None` for an empty mesh
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.vertices.iter().map(|v| &v.position))
    }
}

/// Part of an object drawn with a single material
#[derive(Debug, Clone)]
pub struct MeshGroup {
    /// Object or group name the faces were declared under
    pub name: String,
    /// Material name referenced by the geometry, if any
    pub material_name: Option<String>,
    /// Bound material; `None` when unnamed or not resolvable
    pub material: Option<MaterialHandle>,
    /// Geometry
    pub mesh: Mesh,
}

/// Named animation carried by a decoded object
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    /// Clip name
    pub name: String,
    /// Length in seconds
    pub duration: f32,
}

/// Decoded geometry ready to be attached to a scene
#[derive(Debug, Clone, Default)]
pub struct SceneObject {
    /// Object name, usually the source file name
    pub name: String,
    /// Material groups
    pub groups: Vec<MeshGroup>,
    /// Animation clips; empty for static formats
    pub animations: Vec<AnimationClip>,
}

impl SceneObject {
    /// Create an empty object
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Bounds over every group, `None` when there are no vertices
    pub fn bounds(&self) -> Option<Bounds> {
        self.groups
            .iter()
            .filter_map(|group| group.mesh.bounds())
            .reduce(|mut acc, b| {
                acc.merge(&b);
                acc
            })
    }

    /// Total vertex count
    pub fn vertex_count(&self) -> usize {
        self.groups.iter().map(|g| g.mesh.vertices.len()).sum()
    }

    /// Total triangle count
    pub fn triangle_count(&self) -> usize {
        self.groups.iter().map(|g| g.mesh.triangle_count()).sum()
    }
}

/// Receives decoded objects
pub trait Scene {
    /// Attach an object
    fn add(&mut self, object: SceneObject);

    /// Center of the scene; the origin unless overridden
    fn center(&self) -> Vec3 {
        Vec3::zeros()
    }
}

/// Camera the orchestrator frames once geometry is attached
pub trait CameraRig {
    /// Move the camera
    fn set_position(&mut self, position: Vec3);
    /// Set Euler rotation in radians (XYZ order)
    fn set_rotation(&mut self, rotation: Vec3);
    /// Turn the camera to face `target`
    fn look_at(&mut self, target: Vec3);
}

/// Flat list of attached objects
#[derive(Debug, Default)]
pub struct SceneGraph {
    objects: Vec<SceneObject>,
}

impl SceneGraph {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Attached objects in insertion order
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Number of attached objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether nothing is attached
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Bounds over every attached object
    pub fn bounds(&self) -> Option<Bounds> {
        self.objects
            .iter()
            .filter_map(SceneObject::bounds)
            .reduce(|mut acc, b| {
                acc.merge(&b);
                acc
            })
    }
}

impl Scene for SceneGraph {
    fn add(&mut self, object: SceneObject) {
        log::debug!(
            "Attaching '{}' ({} group(s), {} triangle(s))",
            object.name,
            object.groups.len(),
            object.triangle_count()
        );
        self.objects.push(object);
    }
}

/// Perspective camera with look-at orientation
///
/// Uses a right-handed Y-up coordinate system. `rotation` holds XYZ Euler
/// angles in radians and is kept in sync by [`CameraRig::look_at`].
#[derive(Debug, Clone, PartialEq)]
pub struct ViewCamera {
    /// Position in world space
    pub position: Vec3,
    /// Euler rotation in radians
    pub rotation: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl ViewCamera {
    /// Create a perspective camera looking down -Z
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            rotation: Vec3::zeros(),
            target: position - Vec3::z(),
            up: Vec3::y(),
            fov: fov_degrees.to_radians(),
            aspect,
            near,
            far,
        }
    }

    /// Unit vector from the camera towards its target
    pub fn forward(&self) -> Vec3 {
        let dir = self.target - self.position;
        if dir.norm_squared() > f32::EPSILON {
            dir.normalize()
        } else {
            -Vec3::z()
        }
    }
}

impl Default for ViewCamera {
    fn default() -> Self {
        Self::perspective(Vec3::new(0.0, 0.0, 250.0), 45.0, 16.0 / 9.0, 1.0, 2000.0)
    }
}

impl CameraRig for ViewCamera {
    fn set_position(&mut self, position: Vec3) {
        let offset = self.target - self.position;
        self.position = position;
        self.target = position + offset;
        log::trace!("Camera position updated to: {:?}", position);
    }

    fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        let (pitch, yaw) = (rotation.x, rotation.y);
        let forward = Vec3::new(-yaw.sin() * pitch.cos(), pitch.sin(), -yaw.cos() * pitch.cos());
        let distance = (self.target - self.position).norm().max(1.0);
        self.target = self.position + forward * distance;
    }

    fn look_at(&mut self, target: Vec3) {
        self.target = target;
        let dir = self.forward();
        let pitch = dir.y.clamp(-1.0, 1.0).asin();
        let yaw = (-dir.x).atan2(-dir.z);
        self.rotation = Vec3::new(pitch, yaw, 0.0);
        log::trace!("Camera looking at {:?} from {:?}", target, self.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad(offset: f32) -> Mesh {
        let v = |x: f32, y: f32| Vertex::new([x + offset, y, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]);
        Mesh::new(vec![v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0)], vec![0, 1, 2, 2, 3, 0])
    }

    fn group(mesh: Mesh) -> MeshGroup {
        MeshGroup {
            name: "g".into(),
            material_name: None,
            material: None,
            mesh,
        }
    }

    #[test]
    fn test_object_bounds_merge_groups() {
        let mut object = SceneObject::new("pair");
        object.groups.push(group(quad(0.0)));
        object.groups.push(group(quad(4.0)));

        let bounds = object.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(5.0, 1.0, 0.0));
        assert_eq!(bounds.center(), Vec3::new(2.5, 0.5, 0.0));
        assert_eq!(object.triangle_count(), 4);
        assert_eq!(object.vertex_count(), 8);
    }

    #[test]
    fn test_empty_object_has_no_bounds() {
        assert!(SceneObject::new("empty").bounds().is_none());
        assert!(SceneGraph::new().bounds().is_none());
    }

    #[test]
    fn test_scene_graph_add() {
        let mut scene = SceneGraph::new();
        let mut object = SceneObject::new("quad");
        object.groups.push(group(quad(-2.0)));
        scene.add(object);

        assert_eq!(scene.len(), 1);
        assert_eq!(scene.objects()[0].name, "quad");
        assert_eq!(scene.center(), Vec3::zeros());
        assert_eq!(scene.bounds().unwrap().min.x, -2.0);
    }

    #[test]
    fn test_camera_defaults() {
        let camera = ViewCamera::default();
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 250.0));
        assert_relative_eq!(camera.fov, 45.0_f32.to_radians());
        assert_relative_eq!(camera.forward(), -Vec3::z());
    }

    #[test]
    fn test_look_at_updates_rotation() {
        let mut camera = ViewCamera::default();
        camera.set_position(Vec3::new(10.0, 0.0, 0.0));
        camera.look_at(Vec3::zeros());

        assert_eq!(camera.target, Vec3::zeros());
        assert_relative_eq!(camera.forward(), -Vec3::x(), epsilon = 1e-6);
        assert_relative_eq!(camera.rotation.y, std::f32::consts::FRAC_PI_2, epsilon = 1e-6);
        assert_relative_eq!(camera.rotation.x, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_set_rotation_turns_forward() {
        let mut camera = ViewCamera::default();
        camera.set_rotation(Vec3::new(0.0, std::f32::consts::PI, 0.0));
        assert_relative_eq!(camera.forward(), Vec3::z(), epsilon = 1e-5);
    }

    #[test]
    fn test_set_position_keeps_view_direction() {
        let mut camera = ViewCamera::default();
        camera.set_position(Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(camera.forward(), -Vec3::z(), epsilon = 1e-6);
    }
}
