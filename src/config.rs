//! Editor and codec configuration.

use crate::object::ObjectKind;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Base name and initial size used when the editor spawns an object of a kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectPreset {
    /// Prefix for generated names; a numeric suffix is appended.
    pub base_name: String,
    /// Initial width/height in meters.
    pub size: Vec2,
}

impl ObjectPreset {
    fn new(base_name: &str, width: f32, height: f32) -> Self {
        Self {
            base_name: base_name.to_owned(),
            size: Vec2::new(width, height),
        }
    }
}

/// Per-kind spawn presets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Presets {
    pub wall: ObjectPreset,
    pub movable: ObjectPreset,
    pub goal_object: ObjectPreset,
    pub goal_location: ObjectPreset,
    pub agent: ObjectPreset,
}

impl Default for Presets {
    fn default() -> Self {
        Self {
            wall: ObjectPreset::new("wall", 0.1, 1.5),
            movable: ObjectPreset::new("obs", 0.3, 1.2),
            goal_object: ObjectPreset::new("obj", 0.3, 0.3),
            goal_location: ObjectPreset::new("goal", 0.3, 0.3),
            agent: ObjectPreset::new("ego", 0.4, 0.4),
        }
    }
}

impl Presets {
    pub fn for_kind(&self, kind: ObjectKind) -> &ObjectPreset {
        match kind {
            ObjectKind::Wall => &self.wall,
            ObjectKind::Movable => &self.movable,
            ObjectKind::GoalObject => &self.goal_object,
            ObjectKind::GoalLocation => &self.goal_location,
            ObjectKind::Agent => &self.agent,
        }
    }
}

/// Per-kind default colors (`#rrggbb`).
///
/// Used for newly spawned objects and as the decoder's fallback when a block
/// has no readable `color` field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindColors {
    pub wall: String,
    pub movable: String,
    pub goal_object: String,
    pub goal_location: String,
    pub agent: String,
}

impl Default for KindColors {
    fn default() -> Self {
        Self {
            // What the fixed wall triple `0.69 0.51 0.45` reads back as.
            wall: "#af8272".to_owned(),
            movable: "#ffffff".to_owned(),
            goal_object: "#0000ff".to_owned(),
            goal_location: "#ff0000".to_owned(),
            agent: "#ffff00".to_owned(),
        }
    }
}

impl KindColors {
    pub fn for_kind(&self, kind: ObjectKind) -> &str {
        match kind {
            ObjectKind::Wall => &self.wall,
            ObjectKind::Movable => &self.movable,
            ObjectKind::GoalObject => &self.goal_object,
            ObjectKind::GoalLocation => &self.goal_location,
            ObjectKind::Agent => &self.agent,
        }
    }
}

/// Configuration shared by the viewport, the codec and the editing session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Extent of the floor in meters (width, height), centered on the origin.
    pub world_size: Vec2,
    /// Extra world-space border kept visible around the floor. Default: 0.25 m
    /// (two boundary wall thicknesses plus slack).
    pub viewport_margin: f32,
    /// Canvas size in pixels before the host reports a real one.
    pub default_viewport: Vec2,
    /// `Include:` reference written when a scene has none of its own.
    pub default_base_file: String,
    pub colors: KindColors,
    /// Color triple written for every wall. Walls are not individually colored.
    pub wall_rgb: String,
    /// Height of the implicit joint anchor body. Default: 0.1 m.
    pub joint_height: f32,
    /// Alpha appended to goal-location colors. Default: 0.3.
    pub goal_alpha: f32,
    /// Size assigned to a decoded block that carries no `size` field.
    pub fallback_size: Vec2,
    /// Where [`Scene::add_goal_pair`](crate::Scene::add_goal_pair) places the goal object.
    pub goal_object_spawn: Vec2,
    /// Where [`Scene::add_goal_pair`](crate::Scene::add_goal_pair) places the goal location.
    pub goal_location_spawn: Vec2,
    /// Inclusive channel range for randomly generated goal-pair colors.
    pub goal_color_range: (u8, u8),
    /// Seed for goal-color generation. `None` seeds from OS entropy.
    pub rng_seed: Option<u64>,
    /// When set, every agent is written under this fixed block identifier
    /// (e.g. `ego` / `egoJoint`) instead of its own name.
    pub fixed_agent_name: Option<String>,
    pub presets: Presets,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            world_size: Vec2::new(4.0, 4.0),
            viewport_margin: 0.25,
            default_viewport: Vec2::new(900.0, 900.0),
            default_base_file: "<../base-walls-min.g>".to_owned(),
            colors: KindColors::default(),
            wall_rgb: "0.69 0.51 0.45".to_owned(),
            joint_height: 0.1,
            goal_alpha: 0.3,
            fallback_size: Vec2::new(0.1, 0.1),
            goal_object_spawn: Vec2::new(-0.5, 0.0),
            goal_location_spawn: Vec2::new(0.5, 0.0),
            goal_color_range: (50, 200),
            rng_seed: None,
            fixed_agent_name: None,
            presets: Presets::default(),
        }
    }
}

impl EditorConfig {
    /// Default configuration with a fixed RNG seed, for reproducible sessions.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng_seed: Some(seed),
            ..Default::default()
        }
    }
}
