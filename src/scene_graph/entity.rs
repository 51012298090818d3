use std::fmt;

use glam::Vec3;
use id_arena::Id;

use crate::scene_graph::transform::Transform;

pub type EntityId = Id<Entity>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Cube,
    Sphere,
    Light,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Cube, EntityKind::Sphere, EntityKind::Light];

    pub fn display_name(self) -> &'static str {
        match self {
            EntityKind::Cube => "Cube",
            EntityKind::Sphere => "Sphere",
            EntityKind::Light => "PointLight",
        }
    }

    /// Label used for console messages and toolbar buttons.
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Cube => "Cube",
            EntityKind::Sphere => "Sphere",
            EntityKind::Light => "Light",
        }
    }

    pub fn is_animated(self) -> bool {
        !matches!(self, EntityKind::Light)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeshShape {
    Box { width: f32, height: f32, depth: f32 },
    Sphere { radius: f32, width_segments: u32, height_segments: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Appearance {
    Mesh { shape: MeshShape, color: Vec3 },
    PointLight { color: Vec3, intensity: f32, range: f32 },
}

impl Appearance {
    pub fn color(&self) -> Vec3 {
        match self {
            Appearance::Mesh { color, .. } | Appearance::PointLight { color, .. } => *color,
        }
    }
}

#[derive(Debug)]
pub struct Entity {
    pub kind: EntityKind,
    pub name: String,
    pub transform: Transform,
    pub appearance: Appearance,
}

impl Entity {
    pub fn new(kind: EntityKind, appearance: Appearance, translation: Vec3) -> Self {
        Self {
            kind,
            name: kind.display_name().to_string(),
            transform: Transform::from_translation(translation),
            appearance,
        }
    }

    pub fn mesh_shape(&self) -> Option<MeshShape> {
        match self.appearance {
            Appearance::Mesh { shape, .. } => Some(shape),
            Appearance::PointLight { .. } => None,
        }
    }
}

/// Converts a `0xRRGGBB` literal to linear-ish `[0, 1]` components.
pub fn rgb_hex(hex: u32) -> Vec3 {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Vec3::new(r, g, b)
}
