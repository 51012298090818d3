pub mod entity;
pub mod registry;
pub mod transform;

// Re-export main types for convenience
pub use entity::{rgb_hex, Appearance, Entity, EntityId, EntityKind, MeshShape};
pub use registry::EntityRegistry;
pub use transform::Transform;
