//! Goal-object / goal-location pairing.

use crate::object::{ObjectKind, SceneObject};
use log::debug;

/// Pairs freshly decoded goal locations with goal objects of the same color.
///
/// Walks goal locations in scene order and links each unlinked one to the
/// first unlinked goal object whose color string is identical. First match
/// wins with no backtracking, so three or more objects sharing a color pair
/// up in file order, which may not be the pairing the author meant.
///
/// Returns the number of pairs created.
pub fn resolve_links(objects: &mut [SceneObject]) -> usize {
    let mut linked = 0;
    for loc in 0..objects.len() {
        if objects[loc].kind() != ObjectKind::GoalLocation || objects[loc].link().is_some() {
            continue;
        }
        let partner = objects.iter().position(|o| {
            o.kind() == ObjectKind::GoalObject
                && o.link().is_none()
                && o.color == objects[loc].color
        });
        if let Some(obj) = partner {
            let (loc_id, obj_id) = (objects[loc].id(), objects[obj].id());
            objects[loc].set_link(Some(obj_id));
            objects[obj].set_link(Some(loc_id));
            debug!(
                "linked `{}` <-> `{}` by color {}",
                objects[obj].name, objects[loc].name, objects[loc].color
            );
            linked += 1;
        }
    }
    linked
}

/// Checks the pairing invariant: every link points at an existing object of
/// the complementary goal kind, with the same color, that links back.
pub fn links_are_consistent(objects: &[SceneObject]) -> bool {
    objects.iter().all(|o| {
        let Some(partner_id) = o.link() else {
            return true;
        };
        let Some(partner) = objects.iter().find(|p| p.id() == partner_id) else {
            return false;
        };
        o.kind().partner_kind() == Some(partner.kind())
            && partner.link() == Some(o.id())
            && partner.color == o.color
    })
}
