//! Static level geometry: segments (cells), their six sides, and walls.
//!
//! A level is a set of convex-ish hexahedral segments sharing a vertex pool.
//! Each side is either open (a portal into a neighboring segment), solid, or
//! covered by a wall that decides whether objects and rays may cross it.
//! Side faces are wound so that their normals point into the owning segment.

use crate::face::Face;
use engine_core::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Distance a point may sit outside a side plane and still count as inside
/// the segment. Absorbs float error at portals.
pub const CONTAINMENT_EPSILON: f32 = 1e-3;

/// Segment index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegId(pub u32);

impl SegId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seg{}", self.0)
    }
}

/// One of the six sides of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SideId {
    Left,
    Top,
    Right,
    Bottom,
    Back,
    Front,
}

impl SideId {
    pub const ALL: [SideId; 6] = [
        SideId::Left,
        SideId::Top,
        SideId::Right,
        SideId::Bottom,
        SideId::Back,
        SideId::Front,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The side facing this one across a box-shaped segment.
    pub fn opposite(self) -> SideId {
        match self {
            SideId::Left => SideId::Right,
            SideId::Right => SideId::Left,
            SideId::Top => SideId::Bottom,
            SideId::Bottom => SideId::Top,
            SideId::Back => SideId::Front,
            SideId::Front => SideId::Back,
        }
    }
}

/// Segment vertex slots used by each side, in winding order.
///
/// Vertex slot layout for a box from `min` to `max`:
/// 0 `(x0,y0,z0)`, 1 `(x1,y0,z0)`, 2 `(x1,y1,z0)`, 3 `(x0,y1,z0)`,
/// 4 `(x0,y0,z1)`, 5 `(x1,y0,z1)`, 6 `(x1,y1,z1)`, 7 `(x0,y1,z1)`.
pub const SIDE_VERTS: [[usize; 4]; 6] = [
    [0, 3, 7, 4], // Left   (-x)
    [3, 2, 6, 7], // Top    (+y)
    [1, 5, 6, 2], // Right  (+x)
    [0, 4, 5, 1], // Bottom (-y)
    [4, 7, 6, 5], // Back   (+z)
    [0, 1, 2, 3], // Front  (-z)
];

/// A specific face of the level: segment plus side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tag {
    pub seg: SegId,
    pub side: SideId,
}

impl Tag {
    pub fn new(seg: SegId, side: SideId) -> Self {
        Self { seg, side }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:?}", self.seg, self.side)
    }
}

/// Texture index into [`Level::textures`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TexId(pub u16);

/// Wall index into [`Level::walls`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WallId(pub u16);

/// Coarse see-through mask of a texture, sampled when a query hit-tests textures.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaMask {
    width: usize,
    height: usize,
    opaque: Vec<bool>,
}

impl AlphaMask {
    /// Build a mask from row-major opacity values. Returns None on a size mismatch.
    pub fn new(width: usize, height: usize, opaque: Vec<bool>) -> Option<Self> {
        if width == 0 || height == 0 || opaque.len() != width * height {
            return None;
        }
        Some(Self {
            width,
            height,
            opaque,
        })
    }

    /// Sample at a texture coordinate; coordinates wrap.
    pub fn is_opaque(&self, uv: Vec2) -> bool {
        let u = uv.x.rem_euclid(1.0);
        let v = uv.y.rem_euclid(1.0);
        let x = ((u * self.width as f32) as usize).min(self.width - 1);
        let y = ((v * self.height as f32) as usize).min(self.height - 1);
        self.opaque.get(y * self.width + x).copied().unwrap_or(true)
    }
}

/// Texture metadata the physics core cares about.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextureInfo {
    pub name: String,
    /// Has see-through pixels (grates, windows).
    pub transparent: bool,
    pub mask: Option<AlphaMask>,
}

impl TextureInfo {
    pub fn opaque(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn transparent(name: &str, mask: Option<AlphaMask>) -> Self {
        Self {
            name: name.to_string(),
            transparent: true,
            mask,
        }
    }
}

/// Behavior of a wall placed on a connected side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WallKind {
    /// Permanently blocking.
    Closed,
    Door { open: bool },
    /// Blocks until its hit points are shot away.
    Destroyable { hit_points: f32 },
    /// Looks solid, flies through.
    Illusion,
    /// See-through overlay: stops objects, rays may pass.
    Grate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub tag: Tag,
    pub kind: WallKind,
}

/// How a side behaves for movement and line queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passage {
    /// Nothing to cross into.
    Solid,
    /// Portal to a neighbor.
    Open(SegId),
    /// Portal covered by a see-through surface.
    Transparent(SegId),
}

/// A quad face of a segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Side {
    pub connection: Option<SegId>,
    pub wall: Option<WallId>,
    pub tmap: TexId,
    pub tmap2: Option<TexId>,
    pub uvs: [Vec2; 4],
    pub light_radius: Option<f32>,
}

impl Default for Side {
    fn default() -> Self {
        Self {
            connection: None,
            wall: None,
            tmap: TexId(0),
            tmap2: None,
            uvs: [
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ],
            light_radius: None,
        }
    }
}

/// A hexahedral cell of the level.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub verts: [u32; 8],
    pub sides: [Side; 6],
}

impl Segment {
    pub fn new(verts: [u32; 8]) -> Self {
        Self {
            verts,
            sides: Default::default(),
        }
    }

    pub fn side(&self, side: SideId) -> &Side {
        &self.sides[side.index()]
    }

    pub fn side_mut(&mut self, side: SideId) -> &mut Side {
        &mut self.sides[side.index()]
    }

    /// Neighbors reachable through any connected side.
    pub fn connections(&self) -> impl Iterator<Item = (SideId, SegId)> + '_ {
        SideId::ALL
            .iter()
            .filter_map(|&side| self.side(side).connection.map(|seg| (side, seg)))
    }
}

/// Level validation failures, reported before the simulation ever runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LevelError {
    #[error("level has no segments")]
    Empty,
    #[error("{seg} references vertex {index} but the level has {count} vertices")]
    VertexOutOfRange { seg: SegId, index: u32, count: usize },
    #[error("side {tag} connects to missing segment {target}")]
    MissingSegment { tag: Tag, target: SegId },
    #[error("side {tag} connects to {target}, which has no side leading back")]
    OneWayConnection { tag: Tag, target: SegId },
    #[error("side {tag} references wall {wall} but the level has {count} walls")]
    WallOutOfRange { tag: Tag, wall: u16, count: usize },
    #[error("wall {wall} claims side {claimed} but is placed on {tag}")]
    WallTagMismatch { tag: Tag, wall: u16, claimed: Tag },
    #[error("side {tag} uses texture {texture} but the level has {count} textures")]
    TextureOutOfRange { tag: Tag, texture: u16, count: usize },
}

/// Loaded level geometry. Read-only during a tick; walls change only between ticks.
#[derive(Debug, Clone)]
pub struct Level {
    vertices: Vec<Vec3>,
    segments: Vec<Segment>,
    walls: Vec<Wall>,
    textures: Vec<TextureInfo>,
}

impl Level {
    /// Validate and assemble a level.
    pub fn new(
        vertices: Vec<Vec3>,
        segments: Vec<Segment>,
        walls: Vec<Wall>,
        textures: Vec<TextureInfo>,
    ) -> Result<Self, LevelError> {
        let level = Self {
            vertices,
            segments,
            walls,
            textures,
        };
        level.validate()?;
        Ok(level)
    }

    fn validate(&self) -> Result<(), LevelError> {
        if self.segments.is_empty() {
            return Err(LevelError::Empty);
        }
        for (i, seg) in self.segments.iter().enumerate() {
            let id = SegId(i as u32);
            if let Some(&index) = seg.verts.iter().find(|&&v| v as usize >= self.vertices.len()) {
                return Err(LevelError::VertexOutOfRange {
                    seg: id,
                    index,
                    count: self.vertices.len(),
                });
            }
            for side_id in SideId::ALL {
                let tag = Tag::new(id, side_id);
                let side = seg.side(side_id);
                if let Some(target) = side.connection {
                    let Some(other) = self.segments.get(target.index()) else {
                        return Err(LevelError::MissingSegment { tag, target });
                    };
                    if !other.connections().any(|(_, back)| back == id) {
                        return Err(LevelError::OneWayConnection { tag, target });
                    }
                }
                if let Some(WallId(wall)) = side.wall {
                    let Some(w) = self.walls.get(wall as usize) else {
                        return Err(LevelError::WallOutOfRange {
                            tag,
                            wall,
                            count: self.walls.len(),
                        });
                    };
                    if w.tag != tag {
                        return Err(LevelError::WallTagMismatch {
                            tag,
                            wall,
                            claimed: w.tag,
                        });
                    }
                }
                for tex in std::iter::once(side.tmap).chain(side.tmap2) {
                    if tex.0 as usize >= self.textures.len() {
                        return Err(LevelError::TextureOutOfRange {
                            tag,
                            texture: tex.0,
                            count: self.textures.len(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn segment(&self, id: SegId) -> Option<&Segment> {
        self.segments.get(id.index())
    }

    pub fn segments(&self) -> impl Iterator<Item = (SegId, &Segment)> {
        self.segments
            .iter()
            .enumerate()
            .map(|(i, s)| (SegId(i as u32), s))
    }

    pub fn side(&self, tag: Tag) -> Option<&Side> {
        self.segment(tag.seg).map(|s| s.side(tag.side))
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn wall(&self, tag: Tag) -> Option<&Wall> {
        let id = self.side(tag)?.wall?;
        self.walls.get(id.0 as usize)
    }

    pub fn texture(&self, id: TexId) -> Option<&TextureInfo> {
        self.textures.get(id.0 as usize)
    }

    pub fn vertex(&self, index: u32) -> Option<Vec3> {
        self.vertices.get(index as usize).copied()
    }

    /// The eight corner positions of a segment.
    pub fn segment_points(&self, id: SegId) -> Option<[Vec3; 8]> {
        let seg = self.segment(id)?;
        let mut points = [Vec3::ZERO; 8];
        for (point, &v) in points.iter_mut().zip(seg.verts.iter()) {
            *point = self.vertex(v)?;
        }
        Some(points)
    }

    pub fn segment_center(&self, id: SegId) -> Option<Vec3> {
        self.segment_points(id)
            .map(|p| p.iter().copied().sum::<Vec3>() / 8.0)
    }

    /// Resolved corner positions of a side, in winding order.
    pub fn side_points(&self, tag: Tag) -> Option<[Vec3; 4]> {
        let seg = self.segment(tag.seg)?;
        let slots = SIDE_VERTS[tag.side.index()];
        let mut points = [Vec3::ZERO; 4];
        for (point, slot) in points.iter_mut().zip(slots) {
            *point = self.vertex(seg.verts[slot])?;
        }
        Some(points)
    }

    /// Transient geometric view of a side.
    pub fn face(&self, tag: Tag) -> Option<Face<'_>> {
        Some(Face::new(tag, self.side_points(tag)?, self.side(tag)?))
    }

    /// The side of the connected segment that leads back through `tag`.
    pub fn back_tag(&self, tag: Tag) -> Option<Tag> {
        let target = self.side(tag)?.connection?;
        let other = self.segment(target)?;
        other
            .connections()
            .find(|&(_, back)| back == tag.seg)
            .map(|(side, _)| Tag::new(target, side))
    }

    /// How a side behaves for crossings.
    pub fn passage(&self, tag: Tag) -> Passage {
        let Some(side) = self.side(tag) else {
            return Passage::Solid;
        };
        let Some(target) = side.connection else {
            return Passage::Solid;
        };
        let Some(wall) = self.wall(tag) else {
            return Passage::Open(target);
        };
        match wall.kind {
            WallKind::Closed => Passage::Solid,
            WallKind::Door { open: true } | WallKind::Illusion => Passage::Open(target),
            WallKind::Door { open: false } => Passage::Solid,
            WallKind::Destroyable { hit_points } if hit_points <= 0.0 => Passage::Open(target),
            WallKind::Destroyable { .. } => Passage::Solid,
            WallKind::Grate => Passage::Transparent(target),
        }
    }

    /// True if `point` lies inside the segment (within [`CONTAINMENT_EPSILON`]).
    pub fn segment_contains(&self, id: SegId, point: Vec3) -> bool {
        SideId::ALL.iter().all(|&side| {
            let Some(face) = self.face(Tag::new(id, side)) else {
                return false;
            };
            (0..2).all(|tri| match face.plane(tri) {
                Some((normal, origin)) => (point - origin).dot(normal) >= -CONTAINMENT_EPSILON,
                // Degenerate triangles do not constrain containment.
                None => true,
            })
        })
    }

    /// Find the segment containing `point`, checking `hint` and its
    /// neighbors before falling back to a full scan.
    pub fn find_segment(&self, point: Vec3, hint: Option<SegId>) -> Option<SegId> {
        if let Some(hint) = hint {
            if self.segment_contains(hint, point) {
                return Some(hint);
            }
            if let Some(seg) = self.segment(hint) {
                if let Some((_, found)) = seg
                    .connections()
                    .find(|&(_, id)| self.segment_contains(id, point))
                {
                    return Some(found);
                }
            }
        }
        self.segments()
            .map(|(id, _)| id)
            .find(|&id| self.segment_contains(id, point))
    }

    /// Apply damage to a destroyable wall on `tag` and its back side.
    /// Returns true when this call destroyed the wall.
    pub fn damage_wall(&mut self, tag: Tag, amount: f32) -> bool {
        let mut destroyed = false;
        for t in std::iter::once(tag).chain(self.back_tag(tag)) {
            if let Some(wall) = self.wall_mut(t) {
                if let WallKind::Destroyable { hit_points } = &mut wall.kind {
                    if *hit_points > 0.0 {
                        *hit_points -= amount;
                        if *hit_points <= 0.0 {
                            destroyed = true;
                        }
                    }
                }
            }
        }
        if destroyed {
            log::info!("Wall at {} destroyed", tag);
        }
        destroyed
    }

    /// Open or close a door on `tag` and its back side. Returns false if there is no door.
    pub fn set_door(&mut self, tag: Tag, open: bool) -> bool {
        let mut found = false;
        for t in std::iter::once(tag).chain(self.back_tag(tag)) {
            if let Some(wall) = self.wall_mut(t) {
                if let WallKind::Door { open: state } = &mut wall.kind {
                    *state = open;
                    found = true;
                }
            }
        }
        found
    }

    fn wall_mut(&mut self, tag: Tag) -> Option<&mut Wall> {
        let id = self.side(tag)?.wall?;
        self.walls.get_mut(id.0 as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::LevelBuilder;

    fn two_rooms() -> (Level, SegId, SegId) {
        let mut b = LevelBuilder::new();
        let a = b.add_box_segment(Vec3::new(-5.0, -5.0, -5.0), Vec3::new(5.0, 5.0, 5.0));
        let c = b.add_box_segment(Vec3::new(5.0, -5.0, -5.0), Vec3::new(15.0, 5.0, 5.0));
        b.connect(a, SideId::Right, c);
        (b.build().expect("valid level"), a, c)
    }

    #[test]
    fn box_side_normals_point_inward() {
        let (level, a, _) = two_rooms();
        let center = level.segment_center(a).unwrap();
        for side in SideId::ALL {
            let face = level.face(Tag::new(a, side)).unwrap();
            let n = face.average_normal();
            assert!((center - face.center()).dot(n) > 0.0, "{:?} faces outward", side);
        }
    }

    #[test]
    fn containment_and_lookup() {
        let (level, a, c) = two_rooms();
        assert!(level.segment_contains(a, Vec3::ZERO));
        assert!(!level.segment_contains(a, Vec3::new(7.0, 0.0, 0.0)));
        assert_eq!(level.find_segment(Vec3::new(7.0, 0.0, 0.0), Some(a)), Some(c));
        assert_eq!(level.find_segment(Vec3::new(0.0, 0.0, 0.0), None), Some(a));
        assert_eq!(level.find_segment(Vec3::new(50.0, 0.0, 0.0), Some(a)), None);
    }

    #[test]
    fn back_tag_pairs_portal_sides() {
        let (level, a, c) = two_rooms();
        assert_eq!(level.back_tag(Tag::new(a, SideId::Right)), Some(Tag::new(c, SideId::Left)));
        assert_eq!(level.back_tag(Tag::new(a, SideId::Top)), None);
        assert_eq!(level.passage(Tag::new(a, SideId::Right)), Passage::Open(c));
        assert_eq!(level.passage(Tag::new(a, SideId::Left)), Passage::Solid);
    }

    #[test]
    fn destroyable_wall_opens_both_sides() {
        let mut b = LevelBuilder::new();
        let a = b.add_box_segment(Vec3::splat(-5.0), Vec3::splat(5.0));
        let c = b.add_box_segment(Vec3::new(5.0, -5.0, -5.0), Vec3::new(15.0, 5.0, 5.0));
        b.connect(a, SideId::Right, c);
        b.add_wall(Tag::new(a, SideId::Right), WallKind::Destroyable { hit_points: 10.0 });
        let mut level = b.build().unwrap();

        let tag = Tag::new(a, SideId::Right);
        assert_eq!(level.passage(tag), Passage::Solid);
        assert!(!level.damage_wall(tag, 4.0));
        assert!(level.damage_wall(Tag::new(c, SideId::Left), 6.0));
        assert_eq!(level.passage(tag), Passage::Open(c));
        assert_eq!(level.passage(Tag::new(c, SideId::Left)), Passage::Open(a));
    }

    #[test]
    fn doors_toggle() {
        let mut b = LevelBuilder::new();
        let a = b.add_box_segment(Vec3::splat(-5.0), Vec3::splat(5.0));
        let c = b.add_box_segment(Vec3::new(-5.0, -5.0, 5.0), Vec3::new(5.0, 5.0, 15.0));
        b.connect(a, SideId::Back, c);
        b.add_wall(Tag::new(a, SideId::Back), WallKind::Door { open: false });
        let mut level = b.build().unwrap();
        let tag = Tag::new(a, SideId::Back);
        assert_eq!(level.passage(tag), Passage::Solid);
        assert!(level.set_door(tag, true));
        assert_eq!(level.passage(tag), Passage::Open(c));
        assert!(!level.set_door(Tag::new(a, SideId::Top), true));
    }

    #[test]
    fn validation_rejects_bad_references() {
        let mut seg = Segment::new([0, 1, 2, 3, 4, 5, 6, 99]);
        let err = Level::new(vec![Vec3::ZERO; 8], vec![seg.clone()], vec![], vec![TextureInfo::default()])
            .unwrap_err();
        assert!(matches!(err, LevelError::VertexOutOfRange { index: 99, .. }));

        seg.verts = [0, 1, 2, 3, 4, 5, 6, 7];
        seg.side_mut(SideId::Left).connection = Some(SegId(4));
        let err = Level::new(vec![Vec3::ZERO; 8], vec![seg], vec![], vec![TextureInfo::default()])
            .unwrap_err();
        assert!(matches!(err, LevelError::MissingSegment { .. }));

        assert_eq!(
            Level::new(vec![], vec![], vec![], vec![]).unwrap_err(),
            LevelError::Empty
        );
    }

    #[test]
    fn alpha_mask_wraps() {
        let mask = AlphaMask::new(2, 1, vec![true, false]).unwrap();
        assert!(mask.is_opaque(Vec2::new(0.25, 0.5)));
        assert!(!mask.is_opaque(Vec2::new(0.75, 0.5)));
        assert!(!mask.is_opaque(Vec2::new(1.75, 0.5)));
        assert!(AlphaMask::new(2, 2, vec![true]).is_none());
    }
}
