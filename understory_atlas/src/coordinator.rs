// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named atlases: build, commit, destroy, and look up placements.

use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt::Debug;

use futures_util::future::join_all;
use hashbrown::{HashMap, HashSet};
use understory_pack::PackTree;

use crate::color::ColorGrid;
use crate::error::AtlasError;
use crate::raster::{AtlasSurface, Raster, Rasterizer};
use crate::types::{
    AtlasConfig, AtlasId, AtlasReady, ColorHandle, ColorPlacement, Generation, HandleKey,
    ImageHandle, ImagePlacement, UvRect,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Occupant {
    Colors,
    Image(HandleKey),
}

struct Atlas {
    id: AtlasId,
    surface: AtlasSurface,
    pack: PackTree<Occupant>,
}

#[derive(Default)]
struct Slot {
    generation: Generation,
    atlas: Option<Atlas>,
}

struct Owned<T> {
    owner: AtlasId,
    value: T,
}

/// Permission to commit one build of a named atlas.
///
/// Issued by [`AtlasCoordinator::begin`]. Any later `begin` or
/// [`destroy_atlas`](AtlasCoordinator::destroy_atlas) for the same name makes it stale.
#[derive(Debug, PartialEq, Eq)]
pub struct AtlasTicket {
    name: String,
    generation: Generation,
}

impl AtlasTicket {
    /// Atlas name this ticket builds.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Generation the build started at.
    pub fn generation(&self) -> Generation {
        self.generation
    }
}

/// Summary of a committed build.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AtlasReport {
    /// The new atlas.
    pub atlas: AtlasId,
    /// Images that received real pixels.
    pub placed: usize,
    /// Images that fell back to [`ImagePlacement::DEFAULT`].
    pub defaulted: usize,
    /// Images skipped because an earlier image in the batch had the same key.
    pub duplicates: usize,
    /// Colors placed on the grid.
    pub colors: usize,
    /// Colors left without a placement because the grid could not be reserved.
    pub unplaced_colors: usize,
    /// Why the color grid was skipped, if it was.
    pub color_error: Option<AtlasError>,
}

/// Result of [`AtlasCoordinator::commit`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The build is now the live atlas for its name.
    Committed(AtlasReport),
    /// A newer build or a destroy happened first; nothing was changed.
    Superseded,
}

/// Owns every named atlas and the placement tables that annotate caller handles.
///
/// Atlases are never patched: each build tears down the previous atlas of that name
/// and packs everything again on a fresh surface.
pub struct AtlasCoordinator {
    config: AtlasConfig,
    slots: HashMap<String, Slot>,
    images: HashMap<HandleKey, Owned<ImagePlacement>>,
    colors: HashMap<HandleKey, Owned<ColorPlacement>>,
    next_id: u32,
}

impl Debug for AtlasCoordinator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AtlasCoordinator")
            .field("config", &self.config)
            .field("names", &self.slots.len())
            .field("images", &self.images.len())
            .field("colors", &self.colors.len())
            .field("ready", &self.ready())
            .finish_non_exhaustive()
    }
}

impl Default for AtlasCoordinator {
    fn default() -> Self {
        Self::new(AtlasConfig::default())
    }
}

impl AtlasCoordinator {
    /// Create a coordinator whose atlases all use `config`.
    pub fn new(config: AtlasConfig) -> Self {
        Self {
            config,
            slots: HashMap::new(),
            images: HashMap::new(),
            colors: HashMap::new(),
            next_id: 0,
        }
    }

    /// Surface size and color cell size used for new atlases.
    pub fn config(&self) -> AtlasConfig {
        self.config
    }

    /// Build the atlas `name` from scratch.
    ///
    /// Every image is rasterized concurrently; placement happens afterwards in one
    /// sequential commit. If another build or a destroy for `name` starts while the
    /// rasterizations are pending, this build resolves to
    /// [`CommitOutcome::Superseded`] and leaves the newer state alone.
    ///
    /// The coordinator is only borrowed around the synchronous halves, never across
    /// the await.
    pub async fn create_atlas<R: Rasterizer + ?Sized>(
        this: &RefCell<Self>,
        name: &str,
        images: &[ImageHandle],
        colors: &[ColorHandle],
        rasterizer: &R,
    ) -> CommitOutcome {
        let ticket = this.borrow_mut().begin(name);
        let rasters = join_all(images.iter().map(|h| rasterizer.rasterize(&h.source))).await;
        this.borrow_mut().commit(ticket, images, &rasters, colors)
    }

    /// Start a build of `name`: tear down the current atlas and issue a ticket for the
    /// next generation.
    pub fn begin(&mut self, name: &str) -> AtlasTicket {
        let slot = self.slots.entry_ref(name).or_default();
        let generation = slot.generation.next();
        slot.generation = generation;
        if let Some(atlas) = slot.atlas.take() {
            Self::release(atlas, &mut self.images, &mut self.colors);
        }
        AtlasTicket {
            name: name.into(),
            generation,
        }
    }

    /// Pack `colors` and the rasterized `images` onto a fresh surface and make it the
    /// live atlas for the ticket's name.
    ///
    /// `rasters[i]` belongs to `images[i]`; a missing or `None` entry is a load failure.
    /// Images that cannot be placed get [`ImagePlacement::DEFAULT`]. A color grid too
    /// large for the surface is skipped and reported in
    /// [`AtlasReport::color_error`]; the images are placed regardless. Only the first
    /// image with a given key is placed.
    pub fn commit(
        &mut self,
        ticket: AtlasTicket,
        images: &[ImageHandle],
        rasters: &[Option<Raster>],
        colors: &[ColorHandle],
    ) -> CommitOutcome {
        let _span = tracing::debug_span!(
            "atlas_commit",
            name = ticket.name.as_str(),
            images = images.len(),
            colors = colors.len()
        )
        .entered();
        if self.generation(&ticket.name) != Some(ticket.generation) {
            tracing::debug!(
                generation = ticket.generation.get(),
                "discarding superseded atlas build"
            );
            return CommitOutcome::Superseded;
        }

        let AtlasConfig {
            width,
            height,
            color_cell,
        } = self.config;
        let id = AtlasId(self.next_id);
        let mut atlas = Atlas {
            id,
            surface: AtlasSurface::new(width, height),
            pack: PackTree::new(width, height),
        };

        let mut color_error = None;
        let color_placements = if colors.is_empty() {
            Vec::new()
        } else {
            Self::place_colors(&mut atlas, colors, color_cell).unwrap_or_else(|err| {
                tracing::warn!(%err, "color grid skipped; colors stay unplaced");
                color_error = Some(err);
                Vec::new()
            })
        };

        let mut seen = HashSet::with_capacity(images.len());
        let mut placed = 0;
        let mut duplicates = 0;
        let mut image_placements = Vec::with_capacity(images.len());
        for (i, handle) in images.iter().enumerate() {
            if !seen.insert(handle.key) {
                tracing::warn!(key = ?handle.key, "duplicate image key in batch; skipped");
                duplicates += 1;
                continue;
            }
            let raster = rasters.get(i).and_then(Option::as_ref);
            let placement = Self::place_image(&mut atlas, handle.key, raster);
            if !placement.is_default() {
                placed += 1;
            }
            image_placements.push((handle.key, placement));
        }
        let defaulted = image_placements.len() - placed;
        if placed == 0 && !image_placements.is_empty() {
            tracing::warn!(
                images = image_placements.len(),
                "no image could be placed; atlas holds placeholders only"
            );
        }

        self.next_id = self.next_id.wrapping_add(1);
        for (key, value) in image_placements {
            self.images.insert(key, Owned { owner: id, value });
        }
        let unplaced_colors = colors.len() - color_placements.len();
        for (key, value) in color_placements {
            self.colors.insert(key, Owned { owner: id, value });
        }
        let slot = self.slots.entry_ref(ticket.name.as_str()).or_default();
        if let Some(old) = slot.atlas.replace(atlas) {
            Self::release(old, &mut self.images, &mut self.colors);
        }

        let report = AtlasReport {
            atlas: id,
            placed,
            defaulted,
            duplicates,
            colors: colors.len() - unplaced_colors,
            unplaced_colors,
            color_error,
        };
        tracing::debug!(?report, "atlas committed");
        CommitOutcome::Committed(report)
    }

    /// Reserve the color grid as the first placement and paint one cell per color.
    fn place_colors(
        atlas: &mut Atlas,
        colors: &[ColorHandle],
        cell: u32,
    ) -> Result<Vec<(HandleKey, ColorPlacement)>, AtlasError> {
        let (width, height) = (atlas.surface.width(), atlas.surface.height());
        let grid = ColorGrid::layout(colors.len(), cell, width, height, atlas.pack.padding())?;
        let origin = atlas
            .pack
            .insert(grid.pixel_width(), grid.pixel_height(), Occupant::Colors)?
            .ok_or(AtlasError::ColorCapacity {
                colors: colors.len(),
                capacity: grid.capacity,
            })?
            .draw;
        Ok((0..grid.count)
            .zip(colors)
            .map(|(index, handle)| {
                let c = handle.color.to_rgba8();
                atlas
                    .surface
                    .fill(grid.cell_rect(origin, index), [c.r, c.g, c.b, c.a]);
                (handle.key, grid.placement(atlas.id, origin, index, width, height))
            })
            .collect())
    }

    fn place_image(
        atlas: &mut Atlas,
        key: HandleKey,
        raster: Option<&Raster>,
    ) -> ImagePlacement {
        let Some(raster) = raster else {
            tracing::warn!(?key, "image failed to load; using placeholder");
            return ImagePlacement::DEFAULT;
        };
        if !raster.is_well_formed() {
            tracing::warn!(?key, ?raster, "raster does not match its pixel buffer; using placeholder");
            return ImagePlacement::DEFAULT;
        }
        match atlas.pack.insert(raster.width, raster.height, Occupant::Image(key)) {
            Ok(Some(p)) => {
                atlas.surface.blit(p.draw.x, p.draw.y, raster);
                let (w, h) = (atlas.surface.width(), atlas.surface.height());
                ImagePlacement {
                    atlas: Some(atlas.id),
                    uv: UvRect::from_pixels(p.draw, w, h),
                    pixel_width: raster.width,
                    pixel_height: raster.height,
                }
            }
            Ok(None) => {
                tracing::warn!(
                    ?key,
                    width = raster.width,
                    height = raster.height,
                    "atlas full; using placeholder"
                );
                ImagePlacement::DEFAULT
            }
            Err(err) => {
                tracing::warn!(?key, %err, "image cannot be placed; using placeholder");
                ImagePlacement::DEFAULT
            }
        }
    }

    fn release(
        mut atlas: Atlas,
        images: &mut HashMap<HandleKey, Owned<ImagePlacement>>,
        colors: &mut HashMap<HandleKey, Owned<ColorPlacement>>,
    ) {
        atlas.pack.destroy();
        images.retain(|_, a| a.owner != atlas.id);
        colors.retain(|_, a| a.owner != atlas.id);
    }

    /// Drop the atlas `name`, clear every placement it owns, and cancel pending builds.
    ///
    /// Returns `true` if a built atlas was dropped.
    pub fn destroy_atlas(&mut self, name: &str) -> bool {
        let Some(slot) = self.slots.get_mut(name) else {
            return false;
        };
        slot.generation = slot.generation.next();
        match slot.atlas.take() {
            Some(atlas) => {
                tracing::debug!(name, atlas = atlas.id.get(), "atlas destroyed");
                Self::release(atlas, &mut self.images, &mut self.colors);
                true
            }
            None => false,
        }
    }

    /// Pixels of the live atlas `name`.
    pub fn texture(&self, name: &str) -> Option<&AtlasSurface> {
        self.live(name).map(|a| &a.surface)
    }

    /// Id of the live atlas `name`.
    pub fn atlas_id(&self, name: &str) -> Option<AtlasId> {
        self.live(name).map(|a| a.id)
    }

    /// Padded area reserved on the live atlas `name`.
    pub fn used_area(&self, name: &str) -> Option<u64> {
        self.live(name).map(|a| a.pack.used_area())
    }

    fn live(&self, name: &str) -> Option<&Atlas> {
        self.slots.get(name).and_then(|s| s.atlas.as_ref())
    }

    /// Placement recorded for an image handle, placeholder included.
    pub fn image(&self, key: HandleKey) -> Option<ImagePlacement> {
        self.images.get(&key).map(|a| a.value)
    }

    /// Placement recorded for a color handle.
    pub fn color(&self, key: HandleKey) -> Option<ColorPlacement> {
        self.colors.get(&key).map(|a| a.value)
    }

    /// True once a build of `name` has committed and not been torn down since.
    pub fn is_ready(&self, name: &str) -> bool {
        self.live(name).is_some()
    }

    /// Ready flags for the well-known atlas names.
    pub fn ready(&self) -> AtlasReady {
        self.slots
            .iter()
            .filter(|(_, s)| s.atlas.is_some())
            .fold(AtlasReady::empty(), |acc, (name, _)| {
                acc | AtlasReady::for_name(name)
            })
    }

    /// Current build generation of `name`, or `None` if it was never built.
    pub fn generation(&self, name: &str) -> Option<Generation> {
        self.slots.get(name).map(|s| s.generation)
    }
}
