//! The editing session: an ordered set of objects plus the operations the UI
//! layer calls to change it.
//!
//! Every mutation goes through [`Scene`] so names stay unique and goal links
//! stay symmetric. Objects are addressed by [`ObjectId`].

use crate::color::{random_goal_color, snap_color};
use crate::config::EditorConfig;
use crate::decoder::{SceneDecoder, is_block_name};
use crate::encoder::SceneEncoder;
use crate::error::{Result, SceneError};
use crate::link::resolve_links;
use crate::object::{ObjectId, ObjectKind, SceneObject};
use glam::Vec2;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A copied object, ready to be pasted elsewhere.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clipboard {
    pub kind: ObjectKind,
    pub size: Vec2,
    pub color: String,
    /// Source name with trailing digits and underscores removed.
    pub base_name: String,
}

/// One load -> edit -> save session.
#[derive(Clone, Debug)]
pub struct Scene {
    config: EditorConfig,
    base_file: String,
    camera: Option<String>,
    objects: Vec<SceneObject>,
    next_id: u32,
    rng: StdRng,
}

impl Scene {
    /// An empty scene using the configured default base file.
    pub fn new(config: EditorConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            base_file: config.default_base_file.clone(),
            camera: None,
            objects: Vec::new(),
            next_id: 0,
            rng,
            config,
        }
    }

    /// Builds a scene from file text: decode, then pair goals by color.
    ///
    /// Names are taken verbatim from the file. Duplicates are logged but kept.
    pub fn load(text: &str, config: EditorConfig) -> Self {
        let decoded = SceneDecoder::new(&config).decode(text);
        let mut scene = Self::new(config);
        scene.base_file = decoded.base_file;
        scene.camera = decoded.camera;

        for object in decoded.objects {
            let id = scene.alloc_id();
            scene.objects.push(SceneObject::new(
                id,
                object.name,
                object.kind.into_value(),
                object.position,
                object.size,
                object.color.into_value(),
            ));
        }

        let pairs = resolve_links(&mut scene.objects);
        scene.warn_duplicate_names();
        info!(
            "loaded {} objects ({pairs} goal pairs) including {}",
            scene.objects.len(),
            scene.base_file
        );
        scene
    }

    /// Reads and loads a scene file. The file is read completely before any
    /// decoding, so a read failure never yields a partial scene.
    pub fn open(path: impl AsRef<Path>, config: EditorConfig) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SceneError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        info!("opened {}", path.display());
        Ok(Self::load(&text, config))
    }

    /// Renders the scene as simulator text.
    pub fn save(&self) -> String {
        SceneEncoder::new(&self.config).encode(self)
    }

    /// Renders the scene and writes it to `path` in one call.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = self.save();
        fs::write(path, text).map_err(|source| SceneError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!("saved {} objects to {}", self.objects.len(), path.display());
        Ok(())
    }

    // --- Accessors ---

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn base_file(&self) -> &str {
        &self.base_file
    }

    pub fn set_base_file(&mut self, base_file: impl Into<String>) {
        self.base_file = base_file.into();
    }

    pub fn camera(&self) -> Option<&str> {
        self.camera.as_deref()
    }

    pub fn set_camera(&mut self, camera: Option<String>) {
        self.camera = camera;
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    /// First object with the given name.
    pub fn find(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// The linked goal partner of `id`, if any.
    pub fn partner(&self, id: ObjectId) -> Option<&SceneObject> {
        self.get(id)?.link().and_then(|p| self.get(p))
    }

    // --- Naming ---

    /// `base` followed by the smallest positive integer no existing name uses.
    ///
    /// Both `base3` and `base_3` count as using 3.
    pub fn next_name(&self, base: &str) -> String {
        let used: HashSet<u64> = self
            .objects
            .iter()
            .filter_map(|o| o.name.strip_prefix(base))
            .filter_map(|suffix| {
                let digits = suffix.strip_prefix('_').unwrap_or(suffix);
                if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                    digits.parse().ok()
                } else {
                    None
                }
            })
            .collect();
        let n = (1u64..).find(|n| !used.contains(n)).unwrap_or(1);
        format!("{base}{n}")
    }

    fn name_taken(&self, name: &str) -> bool {
        self.objects.iter().any(|o| o.name == name)
    }

    // --- Creation ---

    /// Adds an object and returns its id.
    ///
    /// With `name` given, that name is used unless another object already has
    /// it, in which case a numbered variant is generated from it. Without a
    /// name, or with one that would not read back as a block name, one is
    /// generated from the kind's preset base name. Colors of kinds other than
    /// walls are snapped with [`snap_color`].
    pub fn add_object(
        &mut self,
        kind: ObjectKind,
        size: Vec2,
        color: impl Into<String>,
        position: Vec2,
        name: Option<&str>,
    ) -> ObjectId {
        let name = match name {
            Some(name) if !is_block_name(name) => {
                let generated = self.next_name(&self.config.presets.for_kind(kind).base_name);
                debug!("`{name}` is not a usable block name; using `{generated}`");
                generated
            }
            Some(name) if !self.name_taken(name) => name.to_owned(),
            Some(name) => {
                let generated = self.next_name(name);
                debug!("name `{name}` is taken; using `{generated}`");
                generated
            }
            None => self.next_name(&self.config.presets.for_kind(kind).base_name),
        };
        self.insert(name, kind, position, size, color.into())
    }

    /// Adds an object of `kind` at the origin using its preset size and
    /// default color. Goal kinds create a whole pair and return the half of
    /// the requested kind.
    pub fn add_preset(&mut self, kind: ObjectKind) -> ObjectId {
        match kind {
            ObjectKind::GoalObject => self.add_goal_pair().0,
            ObjectKind::GoalLocation => self.add_goal_pair().1,
            _ => {
                let size = self.config.presets.for_kind(kind).size;
                let color = self.config.colors.for_kind(kind).to_owned();
                self.add_object(kind, size, color, Vec2::ZERO, None)
            }
        }
    }

    /// Adds a linked goal object and goal location sharing a fresh color and
    /// a shared numeric suffix (`obj3` / `goal3`).
    pub fn add_goal_pair(&mut self) -> (ObjectId, ObjectId) {
        let object_preset = self.config.presets.goal_object.clone();
        let location_preset = self.config.presets.goal_location.clone();

        let mut n = 1u64;
        let (object_name, location_name) = loop {
            let object_name = format!("{}{n}", object_preset.base_name);
            let location_name = format!("{}{n}", location_preset.base_name);
            if !self.name_taken(&object_name) && !self.name_taken(&location_name) {
                break (object_name, location_name);
            }
            n += 1;
        };

        let color = random_goal_color(&mut self.rng, self.config.goal_color_range);
        let object = self.insert(
            object_name,
            ObjectKind::GoalObject,
            self.config.goal_object_spawn,
            object_preset.size,
            color.clone(),
        );
        let location = self.insert(
            location_name,
            ObjectKind::GoalLocation,
            self.config.goal_location_spawn,
            location_preset.size,
            color,
        );
        self.set_link(object, Some(location));
        self.set_link(location, Some(object));
        (object, location)
    }

    // --- Deletion ---

    /// Removes an object.
    ///
    /// Deleting a goal object also deletes its goal location. Deleting a goal
    /// location only unlinks its goal object, which stays in the scene.
    pub fn delete_object(&mut self, id: ObjectId) -> bool {
        let Some(target) = self.get(id) else {
            return false;
        };
        let (kind, partner) = (target.kind(), target.link());

        match (kind, partner) {
            (ObjectKind::GoalObject, Some(partner)) => {
                self.remove(partner);
            }
            (ObjectKind::GoalLocation, Some(partner)) => self.set_link(partner, None),
            _ => {}
        }
        self.remove(id);
        true
    }

    /// Drops every object. Config and base file are kept.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    // --- Edits ---

    /// Renames an object. Fails on a name used by another object, and on one
    /// that would not read back from the file (see [`is_block_name`]).
    pub fn rename(&mut self, id: ObjectId, new_name: &str) -> bool {
        let taken = self
            .objects
            .iter()
            .any(|o| o.name == new_name && o.id() != id);
        if !is_block_name(new_name) || taken {
            debug!("refusing rename to `{new_name}`");
            return false;
        }
        match self.get_mut(id) {
            Some(object) => {
                object.name = new_name.to_owned();
                true
            }
            None => false,
        }
    }

    /// Sets the color of an object and of its linked partner, snapped with
    /// [`snap_color`] unless it is a wall.
    pub fn recolor(&mut self, id: ObjectId, color: &str) -> bool {
        let Some(object) = self.get_mut(id) else {
            return false;
        };
        let color = stored_color(object.kind(), color);
        object.color = color.clone();
        if let Some(partner) = object.link()
            && let Some(partner) = self.get_mut(partner)
        {
            partner.color = color;
        }
        true
    }

    /// Translates an object by a world-space delta in meters.
    pub fn move_by(&mut self, id: ObjectId, dx: f32, dy: f32) -> bool {
        match self.get_mut(id) {
            Some(object) => {
                object.position += Vec2::new(dx, dy);
                true
            }
            None => false,
        }
    }

    /// Sets an object's width and height in meters. No minimum is enforced.
    pub fn resize(&mut self, id: ObjectId, width: f32, height: f32) -> bool {
        match self.get_mut(id) {
            Some(object) => {
                object.size = Vec2::new(width, height);
                true
            }
            None => false,
        }
    }

    // --- Clipboard ---

    pub fn copy(&self, id: ObjectId) -> Option<Clipboard> {
        let object = self.get(id)?;
        let stripped = object
            .name
            .trim_end_matches(|c: char| c.is_ascii_digit())
            .trim_end_matches('_');
        let base_name = if stripped.is_empty() {
            self.config.presets.for_kind(object.kind()).base_name.clone()
        } else {
            stripped.to_owned()
        };
        Some(Clipboard {
            kind: object.kind(),
            size: object.size,
            color: object.color.clone(),
            base_name,
        })
    }

    /// Copies then deletes, with the usual goal cascade.
    pub fn cut(&mut self, id: ObjectId) -> Option<Clipboard> {
        let clipboard = self.copy(id)?;
        self.delete_object(id);
        Some(clipboard)
    }

    /// Adds an unlinked copy of the clipboard contents at `position`.
    pub fn paste(&mut self, clipboard: &Clipboard, position: Vec2) -> ObjectId {
        let base = if is_block_name(&clipboard.base_name) {
            clipboard.base_name.as_str()
        } else {
            self.config.presets.for_kind(clipboard.kind).base_name.as_str()
        };
        let name = self.next_name(base);
        self.insert(
            name,
            clipboard.kind,
            position,
            clipboard.size,
            clipboard.color.clone(),
        )
    }

    // --- Internals ---

    fn alloc_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert(
        &mut self,
        name: String,
        kind: ObjectKind,
        position: Vec2,
        size: Vec2,
        color: String,
    ) -> ObjectId {
        let id = self.alloc_id();
        let color = stored_color(kind, &color);
        debug!("adding {kind} `{name}` at {position}");
        self.objects
            .push(SceneObject::new(id, name, kind, position, size, color));
        id
    }

    fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id() == id)
    }

    fn set_link(&mut self, id: ObjectId, link: Option<ObjectId>) {
        if let Some(object) = self.get_mut(id) {
            object.set_link(link);
        }
    }

    /// Removes an object and clears any link still pointing at it.
    fn remove(&mut self, id: ObjectId) {
        if let Some(object) = self.get(id) {
            debug!("removing {} `{}`", object.kind(), object.name);
        }
        self.objects.retain(|o| o.id() != id);
        for object in &mut self.objects {
            if object.link() == Some(id) {
                object.set_link(None);
            }
        }
    }

    fn warn_duplicate_names(&self) {
        let mut seen = HashSet::new();
        for object in &self.objects {
            if !seen.insert(object.name.as_str()) {
                warn!("duplicate block name `{}`; saving will repeat it", object.name);
            }
        }
    }
}

/// Walls are written with the fixed wall triple, so their color never goes
/// through the notation and is kept as given.
fn stored_color(kind: ObjectKind, color: &str) -> String {
    match kind {
        ObjectKind::Wall => color.to_owned(),
        _ => snap_color(color),
    }
}
