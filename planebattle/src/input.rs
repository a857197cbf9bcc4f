//! Classification of pointer gestures into game actions.
//!
//! The presentation layer hit-tests the pointer itself and hands the engine one
//! [`PointerEvent`] per pointer phase, each carrying the grid [`Coordinate`] under the
//! pointer. A [`Gesture`] tracks one press from down to up (or cancel) and decides what
//! it meant purely from where the pointer was released:
//!
//! - pressing a unit's head arms a grab; releasing on the same cell rotates the unit,
//!   releasing anywhere else moves its head there,
//! - pressing anywhere else and releasing on the same cell is a tap, which places,
//!   selects or attacks depending on the [`Surface`],
//! - pressing and releasing on different cells without a grab does nothing.
//!
//! Only a unit's head can be grabbed, so tapping a wing or tail of an existing plane
//! during setup still tries to place a new plane there.

use crate::{
    board::Coordinate,
    game::{Phase, ToolMode},
    planes::{Direction, Plane, PlaneId, PlaneList},
};

/// A pointer event with the pointer already resolved to a grid cell.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PointerEvent {
    /// The pointer was pressed on the cell.
    Down(Coordinate),
    /// The pointer moved over the cell.
    Move(Coordinate),
    /// The pointer was released over the cell.
    Up(Coordinate),
    /// The pointer left the grid.
    Leave,
    /// The system interrupted the gesture.
    Cancel,
}

/// What pointer input on the grid currently means, given the phase and selected tool.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Surface {
    /// Arranging the active player's own planes.
    Setup,
    /// Annotating the opponent's grid with ghost planes.
    Deduce,
    /// Choosing a cell of the opponent's grid to shoot.
    Attack,
    /// Input is ignored.
    Inert,
}

impl Surface {
    /// The surface for a phase and battle tool.
    pub fn of(phase: &Phase, tool: ToolMode) -> Self {
        match (phase, tool) {
            (Phase::Setup, _) => Surface::Setup,
            (Phase::Battle, ToolMode::Deduce) => Surface::Deduce,
            (Phase::Battle, ToolMode::Attack) => Surface::Attack,
            (Phase::Transition(_), _) | (Phase::GameOver(_), _) => Surface::Inert,
        }
    }

    /// The layer of units that can be grabbed on this surface.
    pub fn layer(self) -> Option<Layer> {
        match self {
            Surface::Setup => Some(Layer::Fleet),
            Surface::Deduce => Some(Layer::Ghosts),
            Surface::Attack | Surface::Inert => None,
        }
    }
}

/// Which list of planes a grab refers to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Layer {
    /// The active player's real planes.
    Fleet,
    /// The active player's ghost planes on the opponent's grid.
    Ghosts,
}

/// A plane held by the pointer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grab {
    /// The plane being held.
    pub target: PlaneId,
    /// The list the plane belongs to.
    pub layer: Layer,
    /// Direction of the plane when it was grabbed.
    pub direction: Direction,
    /// Cell the pointer was pressed on, the plane's head.
    pub start: Coordinate,
    /// Cell the pointer is currently over.
    pub hover: Coordinate,
}

/// State of the gesture in progress.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GestureState {
    /// Nothing is held.
    Idle {
        /// Where the pointer was pressed, if it is down.
        press: Option<Coordinate>,
        /// Last cell the pointer was seen over.
        hover: Option<Coordinate>,
    },
    /// A plane's head was pressed and the plane is held until release.
    Armed(Grab),
}

impl Default for GestureState {
    fn default() -> Self {
        GestureState::Idle {
            press: None,
            hover: None,
        }
    }
}

/// A game action resolved from a gesture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Intent {
    /// Place a new plane in the active player's fleet.
    Place(Coordinate),
    /// Turn a plane a quarter turn about its head.
    Rotate { layer: Layer, id: PlaneId },
    /// Move a plane's head, keeping its direction.
    Move {
        layer: Layer,
        id: PlaneId,
        head: Coordinate,
    },
    /// Select a ghost plane.
    Select(PlaneId),
    /// Clear the ghost selection.
    Deselect,
    /// Place a new ghost plane.
    PlaceGhost(Coordinate),
    /// Shoot a cell of the opponent's grid.
    Attack(Coordinate),
}

/// Tracks one pointer gesture at a time.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gesture {
    state: GestureState,
}

impl Gesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// The plane currently held, if any.
    pub fn grab(&self) -> Option<&Grab> {
        match &self.state {
            GestureState::Armed(grab) => Some(grab),
            GestureState::Idle { .. } => None,
        }
    }

    /// The cell the pointer was last seen over.
    pub fn hover(&self) -> Option<Coordinate> {
        match self.state {
            GestureState::Armed(grab) => Some(grab.hover),
            GestureState::Idle { hover, .. } => hover,
        }
    }

    /// Drop any gesture in progress without resolving it.
    pub fn reset(&mut self) {
        self.state = GestureState::default();
    }

    /// Feed one pointer event. `targets` are the planes that can be grabbed on this
    /// surface: the active fleet during setup, the active player's ghosts while
    /// deducing, and nothing otherwise.
    ///
    /// Returns the action the gesture resolved to, if any. Selection changes resolve on
    /// press; everything else resolves on release.
    pub fn handle<T>(&mut self, surface: Surface, event: PointerEvent, targets: &T) -> Option<Intent>
    where
        T: PlaneList + ?Sized,
    {
        match event {
            PointerEvent::Down(coord) => self.down(surface, coord, targets),
            PointerEvent::Move(coord) => {
                match &mut self.state {
                    GestureState::Armed(grab) => grab.hover = coord,
                    GestureState::Idle { hover, .. } => *hover = Some(coord),
                }
                None
            }
            PointerEvent::Up(coord) => self.up(surface, coord, targets),
            // The pointer is captured, so a held plane stays held off the grid.
            PointerEvent::Leave => None,
            PointerEvent::Cancel => {
                self.reset();
                None
            }
        }
    }

    fn down<T>(&mut self, surface: Surface, coord: Coordinate, targets: &T) -> Option<Intent>
    where
        T: PlaneList + ?Sized,
    {
        let layer = match surface.layer() {
            Some(layer) => layer,
            None if surface == Surface::Inert => {
                self.reset();
                return None;
            }
            None => {
                self.state = GestureState::Idle {
                    press: Some(coord),
                    hover: Some(coord),
                };
                return None;
            }
        };
        if let Some(plane) = targets.head_at(coord) {
            self.state = GestureState::Armed(Grab {
                target: plane.id(),
                layer,
                direction: plane.direction(),
                start: coord,
                hover: coord,
            });
            return if layer == Layer::Ghosts {
                Some(Intent::Select(plane.id()))
            } else {
                None
            };
        }
        self.state = GestureState::Idle {
            press: Some(coord),
            hover: Some(coord),
        };
        match (layer, targets.plane_at(coord)) {
            (Layer::Ghosts, Some(plane)) => Some(Intent::Select(plane.id())),
            (Layer::Ghosts, None) => Some(Intent::Deselect),
            (Layer::Fleet, _) => None,
        }
    }

    fn up<T>(&mut self, surface: Surface, coord: Coordinate, targets: &T) -> Option<Intent>
    where
        T: PlaneList + ?Sized,
    {
        let state = std::mem::take(&mut self.state);
        match state {
            GestureState::Armed(grab) if grab.start == coord => Some(Intent::Rotate {
                layer: grab.layer,
                id: grab.target,
            }),
            GestureState::Armed(grab) => Some(Intent::Move {
                layer: grab.layer,
                id: grab.target,
                head: coord,
            }),
            GestureState::Idle {
                press: Some(press), ..
            } if press == coord => match surface {
                Surface::Setup => Some(Intent::Place(coord)),
                Surface::Deduce => Some(
                    targets
                        .plane_at(coord)
                        .map(Plane::id)
                        .map_or(Intent::PlaceGhost(coord), Intent::Select),
                ),
                Surface::Attack => Some(Intent::Attack(coord)),
                Surface::Inert => None,
            },
            GestureState::Idle { .. } => None,
        }
    }
}
