//! Placed scene objects.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stable handle to a [`SceneObject`] within one [`Scene`](crate::Scene).
///
/// Names can be edited and vector positions shift on delete, so links and
/// editing calls address objects through this id instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// Editor-level category of a placed object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Static obstacle welded to the world.
    Wall,
    /// Pushable obstacle with no goal.
    Movable,
    /// Pushable object that must be delivered to its paired location.
    GoalObject,
    /// Floor marker the paired goal object must reach. Has no contact.
    GoalLocation,
    /// The robot itself.
    Agent,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 5] = [
        Self::Wall,
        Self::Movable,
        Self::GoalObject,
        Self::GoalLocation,
        Self::Agent,
    ];

    /// Whether objects of this kind take part in goal pairing.
    pub fn is_goal(self) -> bool {
        matches!(self, Self::GoalObject | Self::GoalLocation)
    }

    /// The kind a link partner must have, if this kind can be linked at all.
    pub fn partner_kind(self) -> Option<ObjectKind> {
        match self {
            Self::GoalObject => Some(Self::GoalLocation),
            Self::GoalLocation => Some(Self::GoalObject),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wall => "wall",
            Self::Movable => "movable",
            Self::GoalObject => "goal_object",
            Self::GoalLocation => "goal_location",
            Self::Agent => "agent",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One placed entity.
///
/// Position and size are in world meters, origin at the world center, +Y up.
/// The color is kept as a `#rrggbb` string (or the `"gray"` placeholder for
/// colors that could not be read back from a file).
///
/// `kind` and `link` are read-only from outside the crate: the kind is fixed at
/// creation and the link is maintained by [`Scene`](crate::Scene) so that it stays
/// symmetric.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    id: ObjectId,

    /// Durable identifier, written verbatim as the block name.
    pub name: String,

    kind: ObjectKind,

    /// Center of the object in world meters.
    pub position: Vec2,

    /// Full width/height in world meters.
    pub size: Vec2,

    pub color: String,

    /// Non-owning back-reference to the paired goal object/location.
    link: Option<ObjectId>,
}

impl SceneObject {
    pub(crate) fn new(
        id: ObjectId,
        name: String,
        kind: ObjectKind,
        position: Vec2,
        size: Vec2,
        color: String,
    ) -> Self {
        Self {
            id,
            name,
            kind,
            position,
            size,
            color,
            link: None,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn link(&self) -> Option<ObjectId> {
        self.link
    }

    pub(crate) fn set_link(&mut self, link: Option<ObjectId>) {
        self.link = link;
    }

    /// The name shown on the canvas: everything before the first `_`.
    pub fn display_name(&self) -> &str {
        display_name(&self.name)
    }
}

/// Strips a joint-suffix segment (the first `_` and everything after it).
pub fn display_name(name: &str) -> &str {
    name.split('_').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_strips_first_underscore_segment() {
        assert_eq!(display_name("obs_1"), "obs");
        assert_eq!(display_name("box_a_b"), "box");
        assert_eq!(display_name("goal3"), "goal3");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn partner_kinds_are_complementary() {
        for kind in ObjectKind::ALL {
            match kind.partner_kind() {
                Some(partner) => assert_eq!(partner.partner_kind(), Some(kind)),
                None => assert!(!kind.is_goal()),
            }
        }
    }
}
