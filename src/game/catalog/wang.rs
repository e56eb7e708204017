use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Index of a wang set inside the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WangSetId(pub u16);

/// Corner colour within one wang set.
///
/// `0` is the empty colour. `1..=n` index the set's declared colours in
/// declaration order, matching the tileset editor's numbering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WangColor(pub u8);

impl WangColor {
    pub const EMPTY: WangColor = WangColor(0);

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// The four corners of a cell, in signature order.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    NorthEast = 0,
    SouthEast = 1,
    SouthWest = 2,
    NorthWest = 3,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::NorthEast,
        Corner::SouthEast,
        Corner::SouthWest,
        Corner::NorthWest,
    ];

    #[inline]
    pub fn as_index(self) -> usize {
        self as usize
    }

    /// The four cells sharing this corner of the cell at the origin, as
    /// offsets paired with the corner of that cell that touches the shared
    /// point. Listed NW, NE, SW, SE around the shared point.
    pub fn sharing_cells(self) -> [((i32, i32), Corner); 4] {
        // Shared point lies at (sx, sy) relative to the top-left of the cell.
        let (sx, sy) = match self {
            Corner::NorthEast => (1, 0),
            Corner::SouthEast => (1, 1),
            Corner::SouthWest => (0, 1),
            Corner::NorthWest => (0, 0),
        };
        [
            ((sx - 1, sy - 1), Corner::SouthEast),
            ((sx, sy - 1), Corner::SouthWest),
            ((sx - 1, sy), Corner::NorthEast),
            ((sx, sy), Corner::NorthWest),
        ]
    }
}

/// Corner colours of a tile: NE, SE, SW, NW.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CornerSignature(pub [WangColor; 4]);

impl CornerSignature {
    pub fn uniform(color: WangColor) -> Self {
        Self([color; 4])
    }

    pub fn new(ne: u8, se: u8, sw: u8, nw: u8) -> Self {
        Self([WangColor(ne), WangColor(se), WangColor(sw), WangColor(nw)])
    }

    #[inline]
    pub fn corner(&self, corner: Corner) -> WangColor {
        self.0[corner.as_index()]
    }

    /// Parse an 8-slot wang id ("top,top-right,right,...,top-left").
    /// Corner sets only use the odd slots; edge slots must be 0.
    pub fn from_wang_id(wang_id: &str) -> Result<Self, String> {
        let slots = wang_id
            .split(',')
            .map(|s| s.trim().parse::<u8>().map_err(|e| format!("bad wang id slot '{s}': {e}")))
            .collect::<Result<SmallVec<[u8; 8]>, _>>()?;
        if slots.len() != 8 {
            return Err(format!("wang id '{wang_id}' has {} slots, expected 8", slots.len()));
        }
        if slots.iter().step_by(2).any(|&edge| edge != 0) {
            return Err(format!("wang id '{wang_id}' sets edge colours in a corner set"));
        }
        Ok(Self::new(slots[1], slots[3], slots[5], slots[7]))
    }
}

impl fmt::Display for CornerSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [ne, se, sw, nw] = self.0;
        write!(f, "[NE={} SE={} SW={} NW={}]", ne.0, se.0, sw.0, nw.0)
    }
}

/// A palette of corner colours and the tiles painted with them.
#[derive(Clone, Debug)]
pub struct WangSet {
    pub name: String,
    /// Colour names, `colors[i]` is `WangColor(i + 1)`.
    pub colors: SmallVec<[String; 4]>,
    /// Colour assumed around cells that carry no paint of this set.
    pub background: WangColor,
}

impl WangSet {
    pub fn contains(&self, color: WangColor) -> bool {
        (color.0 as usize) <= self.colors.len()
    }

    pub fn color_named(&self, name: &str) -> Option<WangColor> {
        self.colors
            .iter()
            .position(|c| c == name)
            .map(|i| WangColor(i as u8 + 1))
    }

    pub fn color_name(&self, color: WangColor) -> Option<&str> {
        if color.is_empty() {
            return None;
        }
        self.colors.get(color.0 as usize - 1).map(String::as_str)
    }

    /// Colour that wins when `a` and `b` meet at a shared corner: the one
    /// declared first. The empty colour never wins.
    #[inline]
    pub fn dominant(a: WangColor, b: WangColor) -> WangColor {
        match (a.is_empty(), b.is_empty()) {
            (true, _) => b,
            (_, true) => a,
            _ => a.min(b),
        }
    }
}

/// Authoring intent for a cell: "this should become `color` of `set`".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaintColor {
    pub set: WangSetId,
    pub color: WangColor,
}

impl PaintColor {
    pub fn new(set: WangSetId, color: WangColor) -> Self {
        Self { set, color }
    }
}
