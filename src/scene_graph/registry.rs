use glam::Vec3;
use id_arena::Arena;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::config::{PlacementConfig, PlacementMode};
use crate::scene_graph::entity::{rgb_hex, Appearance, Entity, EntityId, EntityKind, MeshShape};

const MESH_HEIGHT: f32 = 1.0;
const LIGHT_HEIGHT: f32 = 4.0;
const FIXED_LIGHT_POSITION: Vec3 = Vec3::new(2.0, 4.0, 2.0);

const CUBE_COLOR: u32 = 0x88aaff;
const SPHERE_COLOR: u32 = 0xffb86b;
const LIGHT_COLOR: u32 = 0xffffff;
const LIGHT_INTENSITY: f32 = 1.0;

/// Owns every entity created during the session.
///
/// Entities are never removed, so arena ids stay valid for the registry's lifetime
/// and iteration order is creation order.
pub struct EntityRegistry {
    entities: Arena<Entity>,
    placement: Placement,
}

struct Placement {
    config: PlacementConfig,
    rng: StdRng,
}

impl Placement {
    fn new(config: &PlacementConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config: config.clone(),
            rng,
        }
    }

    fn random_ground_offset(&mut self) -> (f32, f32) {
        let spread = self.config.spread.abs();
        if spread <= f32::EPSILON {
            return (0.0, 0.0);
        }
        (
            self.rng.gen_range(-spread..=spread),
            self.rng.gen_range(-spread..=spread),
        )
    }

    fn position_for(&mut self, kind: EntityKind) -> Vec3 {
        match (self.config.mode, kind) {
            (PlacementMode::Fixed, EntityKind::Light) => FIXED_LIGHT_POSITION,
            (PlacementMode::Fixed, _) => Vec3::new(0.0, MESH_HEIGHT, 0.0),
            (PlacementMode::Randomized, EntityKind::Light) => {
                let (x, z) = self.random_ground_offset();
                Vec3::new(x, LIGHT_HEIGHT, z)
            }
            (PlacementMode::Randomized, _) => {
                let (x, z) = self.random_ground_offset();
                Vec3::new(x, MESH_HEIGHT, z)
            }
        }
    }

    fn appearance_for(&self, kind: EntityKind) -> Appearance {
        match kind {
            EntityKind::Cube => Appearance::Mesh {
                shape: MeshShape::Box {
                    width: 1.0,
                    height: 1.0,
                    depth: 1.0,
                },
                color: rgb_hex(CUBE_COLOR),
            },
            EntityKind::Sphere => Appearance::Mesh {
                shape: MeshShape::Sphere {
                    radius: self.config.sphere_radius,
                    width_segments: 24,
                    height_segments: 16,
                },
                color: rgb_hex(SPHERE_COLOR),
            },
            EntityKind::Light => Appearance::PointLight {
                color: rgb_hex(LIGHT_COLOR),
                intensity: LIGHT_INTENSITY,
                range: self.config.light_range,
            },
        }
    }
}

impl EntityRegistry {
    pub fn new(placement: &PlacementConfig) -> Self {
        Self {
            entities: Arena::new(),
            placement: Placement::new(placement),
        }
    }

    /// Builds the per-kind defaults, inserts the entity and returns its id.
    pub fn create(&mut self, kind: EntityKind) -> EntityId {
        let translation = self.placement.position_for(kind);
        let appearance = self.placement.appearance_for(kind);
        let id = self.entities.alloc(Entity::new(kind, appearance, translation));

        log::debug!("Created {} at {}", kind, translation);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.len() == 0
    }

    /// Entities in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut Entity)> {
        self.entities.iter_mut()
    }

    /// Entities with the most recently created first.
    pub fn iter_newest_first(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter().rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_registry() -> EntityRegistry {
        EntityRegistry::new(&PlacementConfig::default())
    }

    #[test]
    fn create_uses_per_kind_defaults() {
        let mut registry = fixed_registry();
        let cube = registry.create(EntityKind::Cube);
        let sphere = registry.create(EntityKind::Sphere);
        let light = registry.create(EntityKind::Light);

        let cube = registry.get(cube).expect("cube exists");
        assert_eq!(cube.name, "Cube");
        assert_eq!(cube.transform.translation(), Vec3::new(0.0, 1.0, 0.0));
        assert!(matches!(
            cube.appearance,
            Appearance::Mesh {
                shape: MeshShape::Box { width, .. },
                ..
            } if width == 1.0
        ));

        let sphere = registry.get(sphere).expect("sphere exists");
        assert_eq!(sphere.name, "Sphere");
        assert!(matches!(
            sphere.mesh_shape(),
            Some(MeshShape::Sphere { radius, .. }) if (radius - 0.6).abs() < f32::EPSILON
        ));

        let light = registry.get(light).expect("light exists");
        assert_eq!(light.name, "PointLight");
        assert_eq!(light.transform.translation(), Vec3::new(2.0, 4.0, 2.0));
        assert!(matches!(
            light.appearance,
            Appearance::PointLight { range, .. } if range == 15.0
        ));
    }

    #[test]
    fn repeated_kinds_are_independent_entities() {
        let mut registry = fixed_registry();
        let first = registry.create(EntityKind::Cube);
        let second = registry.create(EntityKind::Cube);

        assert_ne!(first, second);
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get(first).map(|e| e.name.as_str()),
            registry.get(second).map(|e| e.name.as_str())
        );
    }

    #[test]
    fn newest_first_reverses_creation_order() {
        let mut registry = fixed_registry();
        let ids: Vec<_> = EntityKind::ALL.iter().map(|kind| registry.create(*kind)).collect();

        let creation: Vec<_> = registry.iter().map(|(id, _)| id).collect();
        let newest: Vec<_> = registry.iter_newest_first().map(|(id, _)| id).collect();

        assert_eq!(creation, ids);
        assert_eq!(newest, ids.into_iter().rev().collect::<Vec<_>>());
    }

    #[test]
    fn randomized_placement_is_seeded_and_bounded() {
        let config = PlacementConfig {
            mode: PlacementMode::Randomized,
            spread: 3.0,
            seed: Some(42),
            ..PlacementConfig::default()
        };

        let mut a = EntityRegistry::new(&config);
        let mut b = EntityRegistry::new(&config);

        for kind in [EntityKind::Cube, EntityKind::Sphere, EntityKind::Light] {
            let id_a = a.create(kind);
            let id_b = b.create(kind);
            let pa = a.get(id_a).map(|e| e.transform.translation());
            let pb = b.get(id_b).map(|e| e.transform.translation());
            assert_eq!(pa, pb);

            let position = pa.expect("entity exists");
            assert!(position.x.abs() <= 3.0 && position.z.abs() <= 3.0);
            let expected_height = if kind == EntityKind::Light { 4.0 } else { 1.0 };
            assert_eq!(position.y, expected_height);
        }
    }
}
