//! Level Templates
//!
//! Hand-authored 20x20 room templates that the generator stamps out and
//! then mutates. Template choice is a pure function of the level
//! coordinate, so revisiting a coordinate always starts from the same
//! geometry.
//!
//! Every template leaves its mid-edge cells (columns 9-10 on the top and
//! bottom rows, rows 9-10 on the left and right columns) as plain floor.
//! Those are the only cells the exit carver touches.

use crate::core::coord::LevelCoord;

/// Side length of every level layout.
pub const GRID_SIZE: usize = 20;

/// A level layout grid, indexed `layout[z][x]`.
pub type Layout = [[i32; GRID_SIZE]; GRID_SIZE];

/// The five procedural room templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// Rows of server racks.
    ServerRoom,
    /// Desks and workstations.
    Office,
    /// Router clusters behind partition walls.
    NetworkHub,
    /// Guarded inner room ringed by camera stations.
    SecurityRoom,
    /// Large walled suite with a private office.
    ExecutiveOffice,
}

impl TemplateKind {
    /// Templates in selection order. The order is load-bearing: the
    /// coordinate hash indexes into it.
    pub const ALL: [TemplateKind; 5] = [
        TemplateKind::ServerRoom,
        TemplateKind::Office,
        TemplateKind::NetworkHub,
        TemplateKind::SecurityRoom,
        TemplateKind::ExecutiveOffice,
    ];

    /// Deterministically pick the template for a level coordinate.
    pub fn for_coord(coord: LevelCoord) -> TemplateKind {
        let index = (coord.x.unsigned_abs() as u64 * 7 + coord.y.unsigned_abs() as u64 * 13)
            % Self::ALL.len() as u64;
        Self::ALL[index as usize]
    }

    /// Name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            TemplateKind::ServerRoom => "server_room",
            TemplateKind::Office => "office",
            TemplateKind::NetworkHub => "network_hub",
            TemplateKind::SecurityRoom => "security_room",
            TemplateKind::ExecutiveOffice => "executive_office",
        }
    }

    /// The template's layout grid.
    pub fn layout(self) -> &'static Layout {
        match self {
            TemplateKind::ServerRoom => &SERVER_ROOM,
            TemplateKind::Office => &OFFICE,
            TemplateKind::NetworkHub => &NETWORK_HUB,
            TemplateKind::SecurityRoom => &SECURITY_ROOM,
            TemplateKind::ExecutiveOffice => &EXECUTIVE_OFFICE,
        }
    }
}

/// The fixed origin lobby at (0, 0).
///
/// All four exits are permanently open, the pair of guide NPCs stands at
/// the center crossing, and the portal sits in the bottom-right corner.
/// This layout is served as-is, bypassing the generator entirely.
pub fn origin_layout() -> &'static Layout {
    &ORIGIN
}

const SERVER_ROOM: Layout = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 7, 7, 7, 0, 7, 7, 7, 0, 0, 7, 7, 7, 0, 7, 7, 7, 0, 1],
    [1, 0, 7, 0, 0, 0, 7, 0, 0, 0, 0, 0, 0, 7, 0, 0, 0, 7, 0, 1],
    [1, 0, 7, 0, 8, 0, 7, 0, 8, 0, 0, 8, 0, 7, 0, 8, 0, 7, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 7, 0, 7, 0, 0, 0, 7, 0, 0, 7, 0, 0, 0, 7, 0, 7, 0, 1],
    [1, 0, 7, 0, 7, 0, 9, 0, 7, 0, 0, 7, 0, 9, 0, 7, 0, 7, 0, 1],
    [1, 0, 7, 0, 7, 0, 0, 0, 7, 0, 0, 7, 0, 0, 0, 7, 0, 7, 0, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [1, 0, 7, 0, 7, 0, 0, 0, 7, 0, 0, 7, 0, 0, 0, 7, 0, 7, 0, 1],
    [1, 0, 7, 0, 7, 0, 9, 0, 7, 0, 0, 7, 0, 9, 0, 7, 0, 7, 0, 1],
    [1, 0, 7, 0, 7, 0, 0, 0, 7, 0, 0, 7, 0, 0, 0, 7, 0, 7, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 7, 0, 8, 0, 7, 0, 8, 0, 0, 8, 0, 7, 0, 8, 0, 7, 0, 1],
    [1, 0, 7, 0, 0, 0, 7, 0, 0, 0, 0, 0, 0, 7, 0, 0, 0, 7, 0, 1],
    [1, 0, 7, 7, 7, 0, 7, 7, 7, 0, 0, 7, 7, 7, 0, 7, 7, 7, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

const OFFICE: Layout = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 11, 0, 8, 0, 11, 0, 8, 0, 0, 8, 0, 11, 0, 8, 0, 11, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 11, 0, 8, 0, 11, 0, 8, 0, 0, 8, 0, 11, 0, 8, 0, 11, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 11, 0, 8, 0, 11, 0, 8, 0, 0, 8, 0, 11, 0, 8, 0, 11, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 11, 0, 8, 0, 11, 0, 8, 0, 0, 8, 0, 11, 0, 8, 0, 11, 0, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [1, 0, 11, 0, 8, 0, 11, 0, 8, 0, 0, 8, 0, 11, 0, 8, 0, 11, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 11, 0, 8, 0, 11, 0, 8, 0, 0, 8, 0, 11, 0, 8, 0, 11, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 11, 0, 8, 0, 11, 0, 8, 0, 0, 8, 0, 11, 0, 8, 0, 11, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 11, 0, 8, 0, 11, 0, 8, 0, 0, 8, 0, 11, 0, 8, 0, 11, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

const NETWORK_HUB: Layout = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 9, 0, 9, 0, 9, 0, 1, 0, 0, 1, 0, 9, 0, 9, 0, 9, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 9, 0, 9, 0, 9, 0, 1, 0, 0, 1, 0, 9, 0, 9, 0, 9, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 9, 0, 9, 0, 9, 0, 0, 0, 0, 0, 0, 9, 0, 9, 0, 9, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 1, 1, 1, 1, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [1, 1, 1, 1, 1, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 9, 0, 9, 0, 9, 0, 0, 0, 0, 0, 0, 9, 0, 9, 0, 9, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 9, 0, 9, 0, 9, 0, 1, 0, 0, 1, 0, 9, 0, 9, 0, 9, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 9, 0, 9, 0, 9, 0, 1, 0, 0, 1, 0, 9, 0, 9, 0, 9, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

const SECURITY_ROOM: Layout = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 8, 0, 1, 1, 1, 1, 1, 0, 0, 1, 1, 1, 1, 1, 0, 8, 0, 1],
    [1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1],
    [1, 0, 8, 0, 1, 0, 7, 7, 7, 0, 0, 7, 7, 7, 0, 1, 0, 8, 0, 1],
    [1, 0, 0, 0, 1, 0, 7, 0, 0, 0, 0, 0, 0, 7, 0, 1, 0, 0, 0, 1],
    [1, 0, 8, 0, 1, 0, 7, 0, 8, 0, 0, 8, 0, 7, 0, 1, 0, 8, 0, 1],
    [1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1],
    [1, 0, 8, 0, 1, 1, 1, 1, 1, 0, 0, 1, 1, 1, 1, 1, 0, 8, 0, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [1, 0, 8, 0, 1, 1, 1, 1, 1, 0, 0, 1, 1, 1, 1, 1, 0, 8, 0, 1],
    [1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1],
    [1, 0, 8, 0, 1, 0, 7, 0, 8, 0, 0, 8, 0, 7, 0, 1, 0, 8, 0, 1],
    [1, 0, 0, 0, 1, 0, 7, 0, 0, 0, 0, 0, 0, 7, 0, 1, 0, 0, 0, 1],
    [1, 0, 8, 0, 1, 0, 7, 7, 7, 0, 0, 7, 7, 7, 0, 1, 0, 8, 0, 1],
    [1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1],
    [1, 0, 8, 0, 1, 1, 1, 1, 1, 0, 0, 1, 1, 1, 1, 1, 0, 8, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

const EXECUTIVE_OFFICE: Layout = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 1],
    [1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1],
    [1, 0, 0, 1, 0, 11, 11, 11, 0, 0, 0, 0, 8, 8, 0, 0, 1, 0, 0, 1],
    [1, 0, 0, 1, 0, 11, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1],
    [1, 0, 0, 1, 0, 11, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1],
    [1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1],
    [0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0],
    [0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0],
    [1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1],
    [1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1],
    [1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1],
    [1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1],
    [1, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

const ORIGIN: Layout = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 4, 4, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 7, 7, 7, 0, 7, 7, 7, 0, 0, 7, 7, 7, 0, 7, 7, 7, 0, 1],
    [1, 0, 7, 0, 0, 0, 7, 0, 0, 0, 0, 0, 0, 7, 0, 0, 0, 7, 0, 1],
    [1, 0, 7, 0, 8, 0, 7, 0, 8, 0, 0, 8, 0, 7, 0, 8, 0, 7, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 7, 0, 7, 0, 0, 0, 7, 0, 0, 7, 0, 0, 0, 7, 0, 7, 0, 1],
    [1, 0, 7, 0, 7, 0, 9, 0, 7, 0, 0, 7, 0, 9, 0, 7, 0, 7, 0, 1],
    [1, 0, 7, 0, 7, 0, 0, 0, 7, 0, 0, 7, 0, 0, 0, 7, 0, 7, 0, 1],
    [6, 0, 0, 0, 0, 0, 0, 0, 0, 13, 13, 0, 0, 0, 0, 0, 0, 0, 0, 5],
    [6, 0, 0, 0, 0, 0, 0, 0, 0, 13, 13, 0, 0, 0, 0, 0, 0, 0, 0, 5],
    [1, 0, 7, 0, 7, 0, 0, 0, 7, 0, 0, 7, 0, 0, 0, 7, 0, 7, 0, 1],
    [1, 0, 7, 0, 7, 0, 9, 0, 7, 0, 0, 7, 0, 9, 0, 7, 0, 7, 0, 1],
    [1, 0, 7, 0, 7, 0, 0, 0, 7, 0, 0, 7, 0, 0, 0, 7, 0, 7, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 7, 0, 8, 0, 7, 0, 8, 0, 0, 8, 0, 7, 0, 8, 0, 7, 0, 1],
    [1, 0, 7, 0, 0, 0, 7, 0, 0, 0, 0, 0, 0, 7, 0, 0, 0, 7, 0, 1],
    [1, 0, 7, 7, 7, 0, 7, 7, 7, 0, 0, 7, 7, 7, 0, 7, 7, 7, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 2, 2, 0, 0, 0, 0, 0, 0, 30, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 3, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_selection_is_deterministic() {
        for x in -5..5 {
            for y in -5..5 {
                let c = LevelCoord::new(x, y);
                assert_eq!(TemplateKind::for_coord(c), TemplateKind::for_coord(c));
            }
        }
    }

    #[test]
    fn test_template_selection_known_coords() {
        // (|x| * 7 + |y| * 13) mod 5
        assert_eq!(
            TemplateKind::for_coord(LevelCoord::new(1, 0)),
            TemplateKind::NetworkHub
        );
        assert_eq!(
            TemplateKind::for_coord(LevelCoord::new(0, 1)),
            TemplateKind::SecurityRoom
        );
        assert_eq!(
            TemplateKind::for_coord(LevelCoord::new(1, 1)),
            TemplateKind::ServerRoom
        );
        // Mirrored coordinates hash identically.
        assert_eq!(
            TemplateKind::for_coord(LevelCoord::new(-1, 0)),
            TemplateKind::for_coord(LevelCoord::new(1, 0))
        );
    }

    #[test]
    fn test_templates_keep_mid_edges_open() {
        // The carver assumes every template leaves its mid-edge cells as
        // floor; a template violating this would bury a door.
        for kind in TemplateKind::ALL {
            let layout = kind.layout();
            for i in [9, 10] {
                assert_eq!(layout[0][i], 0, "{} top edge", kind.name());
                assert_eq!(layout[19][i], 0, "{} bottom edge", kind.name());
                assert_eq!(layout[i][0], 0, "{} left edge", kind.name());
                assert_eq!(layout[i][19], 0, "{} right edge", kind.name());
            }
        }
    }

    #[test]
    fn test_templates_have_no_spawn_markers() {
        // NPCs and puzzles are placed by the generator, never baked in.
        for kind in TemplateKind::ALL {
            for row in kind.layout() {
                for &code in row {
                    assert_ne!(code, 13, "{} has baked-in npc", kind.name());
                    assert_ne!(code, 14, "{} has baked-in puzzle", kind.name());
                }
            }
        }
    }

    #[test]
    fn test_origin_has_all_exits_open() {
        let layout = origin_layout();
        for i in [9, 10] {
            assert_eq!(layout[0][i], 4, "top exit");
            assert_eq!(layout[19][i], 3, "bottom exit");
            assert_eq!(layout[i][0], 6, "left exit");
            assert_eq!(layout[i][19], 5, "right exit");
        }
    }

    #[test]
    fn test_origin_fixtures() {
        let layout = origin_layout();
        // Guide NPCs at the center crossing.
        for z in [9, 10] {
            for x in [9, 10] {
                assert_eq!(layout[z][x], 13);
            }
        }
        // Entrance markers and the portal on the bottom row of the lobby.
        assert_eq!(layout[18][9], 2);
        assert_eq!(layout[18][10], 2);
        assert_eq!(layout[18][17], 30);
    }
}
