// Copyright 2020 Zachary Stewart
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use std::{collections::HashSet, convert::TryFrom};

use thiserror::Error;

use crate::{
    board::{Coordinate, Dimensions},
    planes::{Direction, PlaneCell, PlanePart, ShapeProjection},
};

/// Offset of one cell of a plane relative to its head, for a plane pointing
/// [`Direction::Up`]. `y` grows towards the tail.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeOffset {
    pub dx: i32,
    pub dy: i32,
    pub part: PlanePart,
}

impl ShapeOffset {
    pub const fn new(dx: i32, dy: i32, part: PlanePart) -> Self {
        Self { dx, dy, part }
    }
}

/// The standard plane, pointing up:
///
/// ```text
///     H
///   WWWWW
///     B
///    TTT
/// ```
const STANDARD: [ShapeOffset; 10] = [
    ShapeOffset::new(0, 0, PlanePart::Head),
    ShapeOffset::new(-2, 1, PlanePart::Wing),
    ShapeOffset::new(-1, 1, PlanePart::Wing),
    ShapeOffset::new(0, 1, PlanePart::Wing),
    ShapeOffset::new(1, 1, PlanePart::Wing),
    ShapeOffset::new(2, 1, PlanePart::Wing),
    ShapeOffset::new(0, 2, PlanePart::Body),
    ShapeOffset::new(-1, 3, PlanePart::Tail),
    ShapeOffset::new(0, 3, PlanePart::Tail),
    ShapeOffset::new(1, 3, PlanePart::Tail),
];

/// Reason a custom shape table was rejected.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum ShapeError {
    #[error("a plane shape needs at least one cell")]
    Empty,
    #[error("a plane shape needs exactly one head, found {0}")]
    HeadCount(usize),
    #[error("the head of a plane shape must be at offset (0, 0)")]
    HeadNotAtOrigin,
    #[error("offset ({0}, {1}) appears more than once")]
    DuplicateOffset(i32, i32),
    #[error("offset ({0}, {1}) is farther from the head than any board is wide")]
    OffsetTooFar(i32, i32),
}

/// Table of cell offsets that defines the shape of every plane in a game.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<ShapeOffset>", into = "Vec<ShapeOffset>")
)]
pub struct PlaneShape {
    offsets: Vec<ShapeOffset>,
}

impl PlaneShape {
    /// The ten-cell plane: head, five-wide wings, body and three-wide tail.
    pub fn standard() -> Self {
        Self {
            offsets: STANDARD.to_vec(),
        }
    }

    /// Build a shape from a custom offset table. The table must contain exactly one
    /// head, located at `(0, 0)`, and no offset may repeat. Each offset must lie within
    /// [`Dimensions::MAX_SIZE`] of the head.
    pub fn new(offsets: Vec<ShapeOffset>) -> Result<Self, ShapeError> {
        if offsets.is_empty() {
            return Err(ShapeError::Empty);
        }
        let mut heads = offsets.iter().filter(|o| o.part == PlanePart::Head);
        match (heads.next(), heads.count()) {
            (Some(head), 0) if (head.dx, head.dy) == (0, 0) => {}
            (Some(_), 0) => return Err(ShapeError::HeadNotAtOrigin),
            (None, _) => return Err(ShapeError::HeadCount(0)),
            (Some(_), rest) => return Err(ShapeError::HeadCount(rest + 1)),
        }
        let reach = -(Dimensions::MAX_SIZE as i32)..=Dimensions::MAX_SIZE as i32;
        let mut seen = HashSet::with_capacity(offsets.len());
        for o in &offsets {
            if !reach.contains(&o.dx) || !reach.contains(&o.dy) {
                return Err(ShapeError::OffsetTooFar(o.dx, o.dy));
            }
            if !seen.insert((o.dx, o.dy)) {
                return Err(ShapeError::DuplicateOffset(o.dx, o.dy));
            }
        }
        Ok(Self { offsets })
    }

    /// Number of cells covered by a plane of this shape.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn offsets(&self) -> &[ShapeOffset] {
        &self.offsets
    }

    /// Project the shape onto the grid with its head at `head`, rotated to point along
    /// `direction`. The result may include cells outside any particular board; bounds
    /// are checked separately.
    pub fn project(&self, head: Coordinate, direction: Direction) -> ShapeProjection {
        self.offsets
            .iter()
            .map(|o| {
                let (dx, dy) = direction.rotate(o.dx, o.dy);
                PlaneCell {
                    coord: head.offset(dx, dy),
                    part: o.part,
                }
            })
            .collect()
    }
}

impl Default for PlaneShape {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<ShapeOffset>> for PlaneShape {
    type Error = ShapeError;

    fn try_from(offsets: Vec<ShapeOffset>) -> Result<Self, Self::Error> {
        Self::new(offsets)
    }
}

impl From<PlaneShape> for Vec<ShapeOffset> {
    fn from(shape: PlaneShape) -> Self {
        shape.offsets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(x: i32, y: i32, part: PlanePart) -> PlaneCell {
        PlaneCell {
            coord: Coordinate::new(x, y),
            part,
        }
    }

    #[test]
    fn standard_plane_pointing_up() {
        use crate::planes::PlanePart::*;
        let cells = PlaneShape::standard().project(Coordinate::new(3, 3), Direction::Up);
        assert_eq!(
            cells,
            vec![
                cell(3, 3, Head),
                cell(1, 4, Wing),
                cell(2, 4, Wing),
                cell(3, 4, Wing),
                cell(4, 4, Wing),
                cell(5, 4, Wing),
                cell(3, 5, Body),
                cell(2, 6, Tail),
                cell(3, 6, Tail),
                cell(4, 6, Tail),
            ]
        );
    }

    #[test]
    fn pointing_down_mirrors_through_the_head() {
        let cells = PlaneShape::standard().project(Coordinate::new(5, 6), Direction::Down);
        assert!(cells.contains(&cell(5, 6, PlanePart::Head)));
        assert!(cells.contains(&cell(5, 4, PlanePart::Body)));
        assert!(cells.contains(&cell(7, 5, PlanePart::Wing)));
        assert!(cells.contains(&cell(4, 3, PlanePart::Tail)));
    }

    #[test]
    fn projection_may_leave_the_board() {
        let cells = PlaneShape::standard().project(Coordinate::new(0, 0), Direction::Left);
        assert!(cells.iter().any(|c| c.coord.y < 0));
    }

    #[test]
    fn custom_tables_are_checked() {
        use crate::planes::PlanePart::*;
        assert_eq!(PlaneShape::new(vec![]), Err(ShapeError::Empty));
        assert_eq!(
            PlaneShape::new(vec![ShapeOffset::new(0, 1, Body)]),
            Err(ShapeError::HeadCount(0))
        );
        assert_eq!(
            PlaneShape::new(vec![ShapeOffset::new(0, 0, Head), ShapeOffset::new(0, 1, Head)]),
            Err(ShapeError::HeadCount(2))
        );
        assert_eq!(
            PlaneShape::new(vec![ShapeOffset::new(1, 0, Head)]),
            Err(ShapeError::HeadNotAtOrigin)
        );
        assert_eq!(
            PlaneShape::new(vec![
                ShapeOffset::new(0, 0, Head),
                ShapeOffset::new(0, 1, Body),
                ShapeOffset::new(0, 1, Tail),
            ]),
            Err(ShapeError::DuplicateOffset(0, 1))
        );
        assert_eq!(
            PlaneShape::new(vec![ShapeOffset::new(0, 0, Head), ShapeOffset::new(0, i32::MIN, Tail)]),
            Err(ShapeError::OffsetTooFar(0, i32::MIN))
        );
        let dart = PlaneShape::new(vec![ShapeOffset::new(0, 0, Head), ShapeOffset::new(0, 1, Tail)])
            .unwrap();
        assert_eq!(dart.len(), 2);
    }
}
