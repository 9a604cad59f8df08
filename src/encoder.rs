//! Writes scenes back out as simulator text.
//!
//! The templates below are what the simulator accepts: field order and
//! punctuation are part of the format. Positions and sizes are rounded to 3
//! decimals, color components to 4.

use crate::color::{round_to, to_normalized_rgb};
use crate::config::EditorConfig;
use crate::object::{ObjectKind, SceneObject};
use crate::scene::Scene;
use log::{debug, warn};

/// Serializes scenes using the fixed block templates.
#[derive(Clone, Copy, Debug)]
pub struct SceneEncoder<'c> {
    config: &'c EditorConfig,
}

impl<'c> SceneEncoder<'c> {
    pub fn new(config: &'c EditorConfig) -> Self {
        Self { config }
    }

    /// Full file text: `Include:` first, then the camera (if any), then one
    /// entry per object in scene order.
    pub fn encode(&self, scene: &Scene) -> String {
        let agents = scene
            .objects()
            .iter()
            .filter(|o| o.kind() == ObjectKind::Agent)
            .count();
        if agents != 1 {
            warn!("scene has {agents} agents; each is written as its own joint and body");
        }

        let mut sections = Vec::with_capacity(scene.objects().len() + 2);
        sections.push(format!("Include: {}", scene.base_file()));
        if let Some(camera) = scene.camera() {
            sections.push(format!("camera_gl(world){{ {camera} }}"));
        }
        sections.extend(scene.objects().iter().map(|o| self.encode_object(o)));

        let mut text = sections.join("\n\n");
        text.push('\n');
        text
    }

    /// Text for a single object. Movable, goal-object and agent kinds expand
    /// into a joint block followed by the body block.
    pub fn encode_object(&self, object: &SceneObject) -> String {
        let name = object.name.as_str();
        let (x, y) = (num(object.position.x), num(object.position.y));
        let (w, h) = (num(object.size.x), num(object.size.y));
        let rgb = to_normalized_rgb(&object.color);
        if rgb.is_fallback() {
            debug!("`{name}` has no hex color ({}); writing white", object.color);
        }
        let rgb = rgb.into_value();

        match object.kind() {
            ObjectKind::Wall => format!(
                r#"{name} (world){{ shape:ssBox, Q:"t({x} {y} 0.3)", size:[{w} {h} 0.6 .02], color:[{wall}], contact: 1 }}"#,
                wall = self.config.wall_rgb,
            ),
            ObjectKind::Movable | ObjectKind::GoalObject => {
                let tag = if object.kind() == ObjectKind::GoalObject {
                    "movable_go"
                } else {
                    "movable_o"
                };
                format!(
                    r#"{joint}
{name}({name}Joint) {{ shape:ssBox, Q:"t({x} {y} .0)", size:[{w} {h} .2 .02], logical:{{ {tag} }}, color:[{rgb}], joint:rigid, contact: 1 }}"#,
                    joint = self.joint(name),
                )
            }
            ObjectKind::GoalLocation => format!(
                r#"{name} (floor){{ shape:ssBox, Q:"t({x} {y} .1)", size:[{w} {h} .2 .02], color:[{rgb} {alpha}], contact:0, joint:rigid, logical:{{goal}} }}"#,
                alpha = num(self.config.goal_alpha),
            ),
            ObjectKind::Agent => {
                let body = self.config.fixed_agent_name.as_deref().unwrap_or(name);
                // Stored as a half-extent; the decoder doubles it back.
                let (rx, ry) = (num(object.size.x / 2.0), num(object.size.y / 2.0));
                format!(
                    r#"{joint}
{body}({body}Joint) {{
    shape:ssCylinder, Q:"t({x} {y} .0)", size:[{rx} {ry} .02], color:[{rgb}], logical:{{agent}}, limits: [-4 4 -4 4],
    joint:transXY, contact: 1
}}"#,
                    joint = self.joint(body),
                )
            }
        }
    }

    /// Invisible anchor body at the configured height.
    fn joint(&self, name: &str) -> String {
        format!(
            "{name}Joint(world){{ Q:[0.0 0.0 {z}] }}",
            z = num(self.config.joint_height)
        )
    }
}

fn num(v: f32) -> String {
    format!("{}", round_to(v as f64, 3))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_round_to_three_places() {
        assert_eq!(num(1.0), "1");
        assert_eq!(num(0.3), "0.3");
        assert_eq!(num(1.23456), "1.235");
        assert_eq!(num(-0.0001), "0");
    }
}
