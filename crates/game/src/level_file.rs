//! RON level descriptions: box or eight-corner segments, their connections,
//! walls, see-through overlays and what to spawn where.

use anyhow::{bail, Context, Result};
use engine_core::Vec3;
use physics::{Level, LevelBuilder, SegId, SideId, Tag, TexId, TextureInfo, WallKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

const BUILTIN_LEVEL: &str = include_str!("../../../data/level.ron");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SegmentDesc {
    Box { min: Vec3, max: Vec3 },
    /// Corners in the engine's vertex slot order.
    Corners(Vec<Vec3>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureDesc {
    pub name: String,
    #[serde(default)]
    pub transparent: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectionDesc {
    pub from: u32,
    pub side: SideId,
    pub to: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallDesc {
    pub segment: u32,
    pub side: SideId,
    pub kind: WallKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayDesc {
    pub segment: u32,
    pub side: SideId,
    pub texture: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnDesc {
    /// Catalog object template name.
    pub template: String,
    pub position: Vec3,
    #[serde(default = "default_facing")]
    pub facing: Vec3,
}

fn default_facing() -> Vec3 {
    -Vec3::Z
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDesc {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub textures: Vec<TextureDesc>,
    pub segments: Vec<SegmentDesc>,
    #[serde(default)]
    pub connections: Vec<ConnectionDesc>,
    #[serde(default)]
    pub walls: Vec<WallDesc>,
    #[serde(default)]
    pub overlays: Vec<OverlayDesc>,
    pub player_start: SpawnDesc,
    #[serde(default)]
    pub spawns: Vec<SpawnDesc>,
}

/// A validated level plus its spawn list.
#[derive(Debug, Clone)]
pub struct LoadedLevel {
    pub name: String,
    pub level: Level,
    pub player_start: SpawnDesc,
    pub spawns: Vec<SpawnDesc>,
}

impl LevelDesc {
    pub fn parse(data: &str) -> Result<Self> {
        ron::from_str(data).context("parsing level description")
    }

    fn segment(&self, index: u32) -> Result<SegId> {
        if (index as usize) < self.segments.len() {
            Ok(SegId(index))
        } else {
            bail!(
                "segment {} does not exist ({} segments)",
                index,
                self.segments.len()
            )
        }
    }

    /// Build and validate the level geometry.
    pub fn build(&self) -> Result<Level> {
        let mut builder = LevelBuilder::new();
        let mut textures: HashMap<&str, TexId> = HashMap::new();
        for tex in &self.textures {
            let info = if tex.transparent {
                TextureInfo::transparent(&tex.name, None)
            } else {
                TextureInfo::opaque(&tex.name)
            };
            textures.insert(tex.name.as_str(), builder.add_texture(info));
        }

        for (i, seg) in self.segments.iter().enumerate() {
            match seg {
                SegmentDesc::Box { min, max } => {
                    if !min.cmplt(*max).all() {
                        bail!("segment {}: box min {:?} is not below max {:?}", i, min, max);
                    }
                    builder.add_box_segment(*min, *max);
                }
                SegmentDesc::Corners(corners) => {
                    let Ok(corners) = <[Vec3; 8]>::try_from(corners.as_slice()) else {
                        bail!("segment {}: expected 8 corners, got {}", i, corners.len());
                    };
                    builder.add_segment(corners);
                }
            }
        }

        for c in &self.connections {
            let (from, to) = (self.segment(c.from)?, self.segment(c.to)?);
            builder.connect(from, c.side, to);
        }
        for w in &self.walls {
            builder.add_wall(Tag::new(self.segment(w.segment)?, w.side), w.kind);
        }
        for o in &self.overlays {
            let Some(&texture) = textures.get(o.texture.as_str()) else {
                bail!("overlay on segment {} uses unknown texture {:?}", o.segment, o.texture);
            };
            builder.set_overlay(Tag::new(self.segment(o.segment)?, o.side), texture);
        }

        Ok(builder.build()?)
    }

    pub fn into_loaded(self) -> Result<LoadedLevel> {
        let level = self.build()?;
        Ok(LoadedLevel {
            name: self.name,
            level,
            player_start: self.player_start,
            spawns: self.spawns,
        })
    }
}

/// Read, parse and validate a level file.
pub fn load(path: &Path) -> Result<LoadedLevel> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading level {}", path.display()))?;
    LevelDesc::parse(&data)
        .and_then(LevelDesc::into_loaded)
        .with_context(|| format!("loading level {}", path.display()))
}

/// The level shipped with the binary.
pub fn builtin() -> Result<LoadedLevel> {
    LevelDesc::parse(BUILTIN_LEVEL)
        .and_then(LevelDesc::into_loaded)
        .context("loading built-in level")
}
