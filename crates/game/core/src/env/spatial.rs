//! Spatial queries and target access injected by the host.
//!
//! The core never owns a scene. Resolvers ask the world who is where through
//! [`SpatialQuery`] and mutate stats through [`TargetStore`].

use glam::Vec3;

use crate::combat::{CombatantId, Damageable, TargetKind};

/// A query volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Region {
    Sphere {
        center: Vec3,
        radius: f32,
    },
    /// Box starting at `origin` extending `length` along the unit `direction`.
    Box {
        origin: Vec3,
        direction: Vec3,
        length: f32,
        half_width: f32,
    },
}

impl Region {
    pub fn contains(&self, point: Vec3) -> bool {
        match *self {
            Region::Sphere { center, radius } => center.distance_squared(point) <= radius * radius,
            Region::Box {
                origin,
                direction,
                length,
                half_width,
            } => {
                let rel = point - origin;
                let along = rel.dot(direction);
                if !(0.0..=length).contains(&along) {
                    return false;
                }
                (rel - direction * along).length_squared() <= half_width * half_width
            }
        }
    }
}

/// A live combatant as seen by a query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub id: CombatantId,
    pub kind: TargetKind,
    pub position: Vec3,
    /// Physical radius used for touch contacts.
    pub radius: f32,
}

/// Read side of the world.
pub trait SpatialQuery {
    /// Every live combatant, in a stable order.
    fn contacts(&self) -> Vec<Contact>;

    /// Live combatants whose position lies inside `region`.
    fn overlap(&self, region: &Region) -> Vec<Contact> {
        self.contacts()
            .into_iter()
            .filter(|contact| region.contains(contact.position))
            .collect()
    }

    /// Distance to the first non-combatant obstacle along the ray, if any
    /// lies within `max`.
    fn obstacle_distance(&self, origin: Vec3, direction: Vec3, max: f32) -> Option<f32>;

    fn position_of(&self, id: CombatantId) -> Option<Vec3> {
        self.contacts()
            .into_iter()
            .find(|contact| contact.id == id)
            .map(|contact| contact.position)
    }
}

/// Write side of the world.
pub trait TargetStore {
    fn damageable_mut(&mut self, id: CombatantId) -> Option<&mut dyn Damageable>;
}

/// Everything a resolver needs from the host.
pub trait CombatWorld: SpatialQuery + TargetStore {}

impl<T: SpatialQuery + TargetStore + ?Sized> CombatWorld for T {}
