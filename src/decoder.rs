//! Recovers typed objects from scene text.
//!
//! Each field is pulled out of a block body by its own pattern function, so a
//! block with missing or odd fields still decodes with defaults, and a
//! malformed block never stops the rest of the file from loading.

use crate::color::from_normalized_rgb;
use crate::config::EditorConfig;
use crate::object::{ObjectKind, display_name};
use crate::outcome::Decoded;
use crate::tokenizer::{RawBlock, blocks};
use glam::Vec2;
use log::{debug, warn};
use regex::Regex;
use std::sync::LazyLock;

/// Boundary blocks supplied by the base file; the editor draws these itself.
pub const INFRASTRUCTURE_BLOCKS: [&str; 5] =
    ["floor", "wall_north", "wall_south", "wall_east", "wall_west"];

/// Names containing this are visualization helpers, not scene content.
const VISUAL_ONLY_MARKER: &str = "_vis";

const NUM: &str = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";

fn pair_pattern(prefix: &str) -> Regex {
    let pattern = format!(r"{prefix}\s*({NUM})[\s,]+({NUM})");
    Regex::new(&pattern).expect("field pattern")
}

static Q_BRACKET: LazyLock<Regex> = LazyLock::new(|| pair_pattern(r"\bQ\s*[:=]\s*\[\s*"));
static Q_TRANSLATION: LazyLock<Regex> =
    LazyLock::new(|| pair_pattern(r#"\bQ\s*[:=]\s*"?\s*t\(\s*"#));
static SIZE: LazyLock<Regex> = LazyLock::new(|| pair_pattern(r"\bsize\s*[:=]\s*\[\s*"));
static COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bcolor\s*[:=]\s*(\[[^\]]*\])").expect("color pattern"));
static NO_CONTACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bcontact\s*[:=]\s*0\b").expect("contact pattern"));
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+$").expect("identifier pattern"));
static INCLUDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Include:\s*(<[^>]+>)").expect("include pattern"));
static CAMERA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"camera_gl\s*\(\s*world\s*\)\s*\{\s*([^}]+?)\s*\}").expect("camera pattern")
});

/// An object recovered from one block. Not yet linked to a partner.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedObject {
    /// Raw block name, kept as the durable identifier.
    pub name: String,
    /// Parent reference from the block header.
    pub parent: String,
    /// `Fallback(Wall)` when no classification marker matched.
    pub kind: Decoded<ObjectKind>,
    pub position: Vec2,
    pub size: Vec2,
    pub color: Decoded<String>,
}

impl DecodedObject {
    pub fn display_name(&self) -> &str {
        display_name(&self.name)
    }
}

/// Everything read from one scene text.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedScene {
    pub objects: Vec<DecodedObject>,
    /// `Include:` reference, e.g. `<../base-walls-min.g>`.
    pub base_file: String,
    /// Body of the `camera_gl(world)` block, when the file has one.
    pub camera: Option<String>,
}

/// Decodes scene text into unlinked objects.
#[derive(Clone, Copy, Debug)]
pub struct SceneDecoder<'c> {
    config: &'c EditorConfig,
}

impl<'c> SceneDecoder<'c> {
    pub fn new(config: &'c EditorConfig) -> Self {
        Self { config }
    }

    /// Decodes every recognizable block of `text`.
    ///
    /// Infrastructure, camera, shapeless and visualization-only blocks are
    /// skipped. Never fails: bad fields fall back to per-kind defaults.
    pub fn decode(&self, text: &str) -> DecodedScene {
        let objects = blocks(text)
            .filter_map(|block| self.decode_block(&block))
            .collect();

        let base_file = extract_include(text)
            .map(str::to_owned)
            .unwrap_or_else(|| self.config.default_base_file.clone());

        DecodedScene {
            objects,
            base_file,
            camera: extract_camera(text).map(str::to_owned),
        }
    }

    /// Decodes a single block, or `None` if it is not user content.
    pub fn decode_block(&self, block: &RawBlock<'_>) -> Option<DecodedObject> {
        let (name, body) = (block.name, block.body);

        // 1. Boundary geometry from the base file.
        if INFRASTRUCTURE_BLOCKS.contains(&name) {
            debug!("skipping infrastructure block `{name}`");
            return None;
        }
        if !block.terminated {
            warn!("block `{name}` is never closed; reading it to end of input");
        }

        // 2. Joints, cameras and visualization helpers.
        let has_shape = body.contains("shape") || body.contains("type");
        if !has_shape || body.contains("camera") || name.contains(VISUAL_ONLY_MARKER) {
            debug!("skipping non-object block `{name}`");
            return None;
        }

        // 3. Pose and extent.
        let position = extract_position(body).unwrap_or(Vec2::ZERO);
        let mut size = extract_size(body).unwrap_or(self.config.fallback_size);

        // 4. Kind. The agent form stores half-extents.
        let kind = classify(body);
        if *kind.value() == ObjectKind::Agent {
            size *= 2.0;
        }

        // 5. Color, falling back to the kind's default.
        let fallback = self.config.colors.for_kind(*kind.value()).to_owned();
        let color = match extract_color(body) {
            Some(text) => from_normalized_rgb(text).or_fallback(fallback),
            None => Decoded::Fallback(fallback),
        };
        if color.is_fallback() {
            debug!("block `{name}` has no readable color; using {}", color.value());
        }

        debug!("decoded `{name}` as {} at {position}", kind.value());
        Some(DecodedObject {
            name: name.to_owned(),
            parent: block.parent.to_owned(),
            kind,
            position,
            size,
            color,
        })
    }
}

/// Whether `name` can be written as a block identifier and read back as
/// user content: a bare identifier, not a boundary block, not a
/// visualization helper.
pub fn is_block_name(name: &str) -> bool {
    IDENTIFIER.is_match(name)
        && !INFRASTRUCTURE_BLOCKS.contains(&name)
        && !name.contains(VISUAL_ONLY_MARKER)
}

/// Classifies a block body by its markers.
///
/// Markers can co-occur, so the check order decides: `agent`, then
/// `movable_go`, then `movable_o`, then `goal` together with `contact:0`.
/// A body with only a color is a wall; a body with none of these is
/// `Fallback(Wall)`.
pub fn classify(body: &str) -> Decoded<ObjectKind> {
    if body.contains("agent") {
        Decoded::Parsed(ObjectKind::Agent)
    } else if body.contains("movable_go") {
        Decoded::Parsed(ObjectKind::GoalObject)
    } else if body.contains("movable_o") {
        Decoded::Parsed(ObjectKind::Movable)
    } else if body.contains("goal") && NO_CONTACT.is_match(body) {
        Decoded::Parsed(ObjectKind::GoalLocation)
    } else if body.contains("color") {
        Decoded::Parsed(ObjectKind::Wall)
    } else {
        Decoded::Fallback(ObjectKind::Wall)
    }
}

/// Planar position from `Q:[x y ...]`, or failing that `Q:"t(x y ...)"`.
pub fn extract_position(body: &str) -> Option<Vec2> {
    extract_pair(&Q_BRACKET, body).or_else(|| extract_pair(&Q_TRANSLATION, body))
}

/// First two components of `size:[...]`.
pub fn extract_size(body: &str) -> Option<Vec2> {
    extract_pair(&SIZE, body)
}

/// The bracketed `color:[...]` value, brackets included.
pub fn extract_color(body: &str) -> Option<&str> {
    COLOR
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// The `Include: <path>` reference, angle brackets included.
pub fn extract_include(text: &str) -> Option<&str> {
    INCLUDE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// The trimmed body of the `camera_gl(world)` block.
pub fn extract_camera(text: &str) -> Option<&str> {
    CAMERA
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn extract_pair(pattern: &Regex, body: &str) -> Option<Vec2> {
    let caps = pattern.captures(body)?;
    let x: f32 = caps.get(1)?.as_str().parse().ok()?;
    let y: f32 = caps.get(2)?.as_str().parse().ok()?;
    Some(Vec2::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_prefers_bracket_form() {
        let body = r#" Q:[1.5 -2 0.1], shape:ssBox "#;
        assert_eq!(extract_position(body), Some(Vec2::new(1.5, -2.0)));

        let body = r#" shape:ssBox, Q:"t(0.25 .5 .0)" "#;
        assert_eq!(extract_position(body), Some(Vec2::new(0.25, 0.5)));

        assert_eq!(extract_position(" shape:ssBox "), None);
    }

    #[test]
    fn fields_tolerate_equals_and_newlines() {
        let body = "shape:ssBox,\n  Q = [\n 3\n 4\n 0 ],\n  size =\n[0.2\n0.7 .2]";
        assert_eq!(extract_position(body), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(extract_size(body), Some(Vec2::new(0.2, 0.7)));
    }

    #[test]
    fn color_field_is_bracketed() {
        let body = " shape:ssBox, color:[0 0 1 .3], contact:0 ";
        assert_eq!(extract_color(body), Some("[0 0 1 .3]"));
        assert_eq!(extract_color(" shape:ssBox "), None);
    }

    #[test]
    fn block_names_must_read_back() {
        for name in ["obs1", "goal_2", "Ego"] {
            assert!(is_block_name(name), "{name:?} should be accepted");
        }
        for name in ["", "my box", "box-2", "floor", "wall_east", "crate_vis", "a(b)"] {
            assert!(!is_block_name(name), "{name:?} should be refused");
        }
    }

    #[test]
    fn agent_marker_wins_over_goal_object() {
        let body = " shape:ssCylinder, logical:{agent}, logical:{ movable_go } ";
        assert_eq!(classify(body), Decoded::Parsed(ObjectKind::Agent));
    }

    #[test]
    fn goal_requires_no_contact() {
        assert_eq!(
            classify(" shape:ssBox, color:[1 0 0], contact:0, logical:{goal} "),
            Decoded::Parsed(ObjectKind::GoalLocation)
        );
        assert_eq!(
            classify(" shape:ssBox, color:[1 0 0], contact: 1, logical:{goal} "),
            Decoded::Parsed(ObjectKind::Wall)
        );
        assert_eq!(
            classify(" shape:ssBox "),
            Decoded::Fallback(ObjectKind::Wall)
        );
    }

    #[test]
    fn include_and_camera() {
        let text = "Include: <../walls.g>\ncamera_gl(world){ Q:[0 0 5], focalLength:1 }\n";
        assert_eq!(extract_include(text), Some("<../walls.g>"));
        assert_eq!(extract_camera(text), Some("Q:[0 0 5], focalLength:1"));
    }

    #[test]
    fn skips_infrastructure_and_helpers() {
        let config = EditorConfig::default();
        let text = "floor (world){ shape:ssBox, size:[4 4 .1] }\n\
                    wall_north (world){ shape:ssBox, color:[1 1 1] }\n\
                    box_vis (world){ shape:ssBox, color:[1 1 1] }\n\
                    cam (world){ shape:camera }\n\
                    boxJoint(world){ Q:[0.0 0.0 0.1] }\n\
                    box(boxJoint) { shape:ssBox, Q:\"t(1 1 .0)\", logical:{ movable_o } }";
        let scene = SceneDecoder::new(&config).decode(text);
        assert_eq!(scene.objects.len(), 1);
        let object = &scene.objects[0];
        assert_eq!(object.name, "box");
        assert_eq!(object.parent, "boxJoint");
        assert_eq!(object.kind, Decoded::Parsed(ObjectKind::Movable));
        assert_eq!(object.size, config.fallback_size);
        assert_eq!(object.color, Decoded::Fallback("#ffffff".to_owned()));
        assert_eq!(scene.base_file, config.default_base_file);
        assert_eq!(scene.camera, None);
    }

    #[test]
    fn bad_color_uses_kind_default() {
        let config = EditorConfig::default();
        let text = "o1Joint(world){ Q:[0.0 0.0 0.1] }\n\
                    o1(o1Joint) { shape:ssBox, size:[.3 .3 .2 .02], logical:{ movable_go }, color:[blue] }";
        let scene = SceneDecoder::new(&config).decode(text);
        assert_eq!(scene.objects[0].kind, Decoded::Parsed(ObjectKind::GoalObject));
        assert_eq!(scene.objects[0].color, Decoded::Fallback("#0000ff".to_owned()));
    }

    #[test]
    fn agent_size_is_doubled() {
        let config = EditorConfig::default();
        let text = "egoJoint(world){ Q:[0.0 0.0 0.1] }\n\
                    ego(egoJoint) {\n  shape:ssCylinder, Q:\"t(0.5 -1 .0)\", size:[0.2 0.2 .02], color:[1 1 0], logical:{agent}\n}";
        let object = &SceneDecoder::new(&config).decode(text).objects[0];
        assert_eq!(object.kind, Decoded::Parsed(ObjectKind::Agent));
        assert_eq!(object.position, Vec2::new(0.5, -1.0));
        assert_eq!(object.size, Vec2::new(0.4, 0.4));
        assert_eq!(object.color, Decoded::Parsed("#ffff00".to_owned()));
    }

    #[test]
    fn display_name_drops_suffix() {
        let config = EditorConfig::default();
        let text = "crate_2 (world){ shape:ssBox, color:[0.69 0.51 0.45] }";
        let object = &SceneDecoder::new(&config).decode(text).objects[0];
        assert_eq!(object.name, "crate_2");
        assert_eq!(object.display_name(), "crate");
    }
}
