//! The two-slot editor.
//!
//! `PhotoSlotEditor` owns both slots, the shared stage and guides, and the
//! pointer drag tracker. Interaction methods route to whichever slot is
//! active; saving reads both.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::EditorConfig;
use crate::decode::{ensure_supported_path, DecodedImage};
use crate::encode::encode_jpeg_image;
use crate::error::{EditorError, Result};
use crate::overlay::OverlayGuides;
use crate::photo::{PhotoState, SlotSnapshot};
use crate::sheet::{assign_rows, compose_sheet};
use crate::viewport::{DragState, Stage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SlotId {
    #[default]
    First,
    Second,
}

impl SlotId {
    pub const ALL: [SlotId; 2] = [SlotId::First, SlotId::Second];

    pub fn index(self) -> usize {
        match self {
            SlotId::First => 0,
            SlotId::Second => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSnapshot {
    pub active: SlotId,
    pub slots: [SlotSnapshot; 2],
    pub can_save: bool,
}

#[derive(Debug, Clone)]
pub struct PhotoSlotEditor {
    config: EditorConfig,
    stage: Stage,
    guides: OverlayGuides,
    slots: [PhotoState; 2],
    active: SlotId,
    drag: DragState,
}

impl Default for PhotoSlotEditor {
    fn default() -> Self {
        Self::with_valid_config(EditorConfig::default())
    }
}

impl PhotoSlotEditor {
    pub fn new(config: EditorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: EditorConfig) -> Self {
        let stage = Stage::from_config(&config);
        let guides = OverlayGuides::new(&stage);
        Self {
            config,
            stage,
            guides,
            slots: [PhotoState::empty(), PhotoState::empty()],
            active: SlotId::First,
            drag: DragState::default(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn guides(&self) -> &OverlayGuides {
        &self.guides
    }

    pub fn active_slot(&self) -> SlotId {
        self.active
    }

    /// Switch the slot that receives interactions. Any drag in progress ends.
    pub fn select_slot(&mut self, slot: SlotId) {
        self.drag.release();
        self.active = slot;
    }

    pub fn slot(&self, slot: SlotId) -> &PhotoState {
        &self.slots[slot.index()]
    }

    pub fn slot_mut(&mut self, slot: SlotId) -> &mut PhotoState {
        &mut self.slots[slot.index()]
    }

    pub fn active(&self) -> &PhotoState {
        self.slot(self.active)
    }

    pub fn active_mut(&mut self) -> &mut PhotoState {
        self.slot_mut(self.active)
    }

    /// Load an image file into the active slot.
    ///
    /// The extension is checked before the file is read. On any failure the
    /// slot keeps its previous contents.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        if let Err(e) = ensure_supported_path(path) {
            warn!(path = %path.display(), "Rejected file type");
            return Err(e.into());
        }
        let bytes = fs::read(path)?;
        self.load_bytes(&bytes)?;
        info!(path = %path.display(), slot = ?self.active, "Loaded file");
        Ok(())
    }

    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let slot = &mut self.slots[self.active.index()];
        if let Err(e) = slot.load_bytes(bytes, &self.stage) {
            warn!(error = %e, "Image could not be loaded");
            return Err(e.into());
        }
        Ok(())
    }

    /// Load an already decoded image into the active slot.
    pub fn load_image(&mut self, image: DecodedImage) -> Result<()> {
        self.slots[self.active.index()].load(image, &self.stage)?;
        Ok(())
    }

    pub fn rotate_90(&mut self) -> Result<()> {
        self.slots[self.active.index()].rotate_90(&self.stage)?;
        Ok(())
    }

    pub fn set_angle(&mut self, degrees: f64) {
        self.active_mut().set_angle(degrees);
    }

    pub fn set_zoom(&mut self, value: f64) {
        self.slots[self.active.index()].set_zoom(value, &self.stage);
    }

    pub fn wheel(&mut self, delta: f64) {
        self.slots[self.active.index()].wheel(delta, &self.stage);
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.active_mut().pan(dx, dy);
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.drag.press(x, y);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if let Some((dx, dy)) = self.drag.motion(x, y) {
            self.pan(dx, dy);
        }
    }

    pub fn pointer_up(&mut self) {
        self.drag.release();
    }

    /// Render the active slot into a viewport frame.
    pub fn render_viewport(&self) -> DecodedImage {
        self.active().render_viewport(&self.stage, &self.guides)
    }

    pub fn can_save(&self) -> bool {
        self.slots.iter().any(PhotoState::has_image)
    }

    /// Compose the print sheet from whichever slots hold a photo.
    pub fn render_sheet(&self) -> Result<DecodedImage> {
        let first = self.slots[0].render_crop(&self.stage)?;
        let second = self.slots[1].render_crop(&self.stage)?;

        let rows = assign_rows(self.stage.layout.rows, first.as_ref(), second.as_ref())
            .ok_or(EditorError::NothingToSave)?;
        Ok(compose_sheet(&self.stage.layout, &rows))
    }

    /// The sheet as JPEG bytes tagged with the configured DPI.
    pub fn encode_sheet(&self) -> Result<Vec<u8>> {
        let sheet = self.render_sheet()?;
        let dpi = u16::try_from(self.config.dpi).unwrap_or(u16::MAX);
        Ok(encode_jpeg_image(&sheet, self.config.jpeg_quality, dpi)?)
    }

    /// Write the sheet to `path`.
    ///
    /// The JPEG is fully encoded first and written through a sibling
    /// temporary file, so a failure never leaves a partial file at `path`.
    pub fn save_sheet(&self, path: &Path) -> Result<()> {
        let bytes = self.encode_sheet()?;

        let tmp = part_path(path);
        let written = fs::write(&tmp, &bytes).and_then(|()| fs::rename(&tmp, path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            warn!(path = %path.display(), error = %e, "Saving sheet failed");
            return Err(e.into());
        }

        info!(
            path = %path.display(),
            bytes = bytes.len(),
            dpi = self.config.dpi,
            "Sheet saved"
        );
        Ok(())
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            active: self.active,
            slots: [self.slots[0].snapshot(), self.slots[1].snapshot()],
            can_save: self.can_save(),
        }
    }
}

fn part_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}
