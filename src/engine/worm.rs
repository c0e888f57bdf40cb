use super::board::{Bounds, Cell};
use super::direction::Direction;
use std::collections::HashSet;

/// One cell-sized piece of the worm
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Segment {
    pub(crate) position: Cell,

    /// The direction in which this segment moved on its most recent step
    pub(crate) last_direction: Direction,
}

/// Worm state.
///
/// The segments are stored head first.  There is always at least one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Worm {
    pub(super) segments: Vec<Segment>,
}

impl Worm {
    /// The direction a freshly spawned worm is facing
    pub(crate) const DEFAULT_DIRECTION: Direction = Direction::Right;

    /// Create a new single-segment worm at `spawn` facing
    /// [`DEFAULT_DIRECTION`][Worm::DEFAULT_DIRECTION]
    pub(crate) fn new(spawn: Cell) -> Worm {
        Worm {
            segments: vec![Segment {
                position: spawn,
                last_direction: Self::DEFAULT_DIRECTION,
            }],
        }
    }

    pub(crate) fn head(&self) -> Cell {
        self.segments[0].position
    }

    pub(crate) fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub(crate) fn len(&self) -> usize {
        self.segments.len()
    }

    pub(crate) fn positions(&self) -> HashSet<Cell> {
        self.segments.iter().map(|seg| seg.position).collect()
    }

    /// Move the head one cell in `direction` and pull every other segment
    /// into the place the segment ahead of it just left.
    pub(crate) fn advance(&mut self, direction: Direction, bounds: Bounds) {
        let head = &mut self.segments[0];
        let mut vacated = head.position;
        head.position = direction.advance(vacated, bounds);
        head.last_direction = direction;
        for seg in self.segments.iter_mut().skip(1) {
            let old = std::mem::replace(&mut seg.position, vacated);
            if let Some(d) = Direction::between(old, seg.position, bounds) {
                seg.last_direction = d;
            }
            vacated = old;
        }
    }

    /// Append a new tail segment one step behind the current tail, measured
    /// against the tail's own last direction of travel.
    pub(crate) fn grow(&mut self, bounds: Bounds) {
        let Some(&tail) = self.segments.last() else {
            return;
        };
        let position = tail.last_direction.reverse().advance(tail.position, bounds);
        self.segments.push(Segment {
            position,
            last_direction: tail.last_direction,
        });
    }

    /// Shrink back to a single segment at `spawn`
    pub(crate) fn reset(&mut self, spawn: Cell) {
        *self = Worm::new(spawn);
    }

    pub(crate) fn has_self_collision(&self) -> bool {
        let head = self.head();
        self.segments.iter().skip(1).any(|seg| seg.position == head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Bounds = Bounds {
        width: 10,
        height: 10,
    };

    fn positions(worm: &Worm) -> Vec<Cell> {
        worm.segments().iter().map(|seg| seg.position).collect()
    }

    fn worm_from(cells: &[(u16, u16)], direction: Direction) -> Worm {
        Worm {
            segments: cells
                .iter()
                .map(|&c| Segment {
                    position: Cell::from(c),
                    last_direction: direction,
                })
                .collect(),
        }
    }

    #[test]
    fn new_worm() {
        let worm = Worm::new(Cell::new(0, 1));
        assert_eq!(worm.len(), 1);
        assert_eq!(worm.head(), Cell::new(0, 1));
        assert_eq!(worm.segments()[0].last_direction, Direction::Right);
        assert!(!worm.has_self_collision());
    }

    #[test]
    fn follow_the_leader() {
        let mut worm = worm_from(&[(0, 2), (0, 1), (0, 0)], Direction::Right);
        worm.advance(Direction::Up, BOUNDS);
        assert_eq!(
            positions(&worm),
            [Cell::new(9, 2), Cell::new(0, 2), Cell::new(0, 1)]
        );
        assert_eq!(worm.segments()[0].last_direction, Direction::Up);
        assert_eq!(worm.segments()[1].last_direction, Direction::Right);
        assert_eq!(worm.segments()[2].last_direction, Direction::Right);
        worm.advance(Direction::Up, BOUNDS);
        assert_eq!(
            positions(&worm),
            [Cell::new(8, 2), Cell::new(9, 2), Cell::new(0, 2)]
        );
        assert_eq!(worm.segments()[1].last_direction, Direction::Up);
        assert_eq!(worm.segments()[2].last_direction, Direction::Right);
    }

    #[test]
    fn last_direction_across_seam() {
        let mut worm = worm_from(&[(4, 0), (4, 9)], Direction::Right);
        worm.advance(Direction::Down, BOUNDS);
        assert_eq!(positions(&worm), [Cell::new(5, 0), Cell::new(4, 0)]);
        assert_eq!(worm.segments()[1].last_direction, Direction::Right);
    }

    #[test]
    fn last_direction_on_two_wide_board() {
        let bounds = Bounds {
            width: 2,
            height: 5,
        };
        let mut worm = worm_from(&[(2, 1), (2, 0)], Direction::Right);
        worm.advance(Direction::Right, bounds);
        assert_eq!(positions(&worm), [Cell::new(2, 0), Cell::new(2, 1)]);
        assert_eq!(worm.segments()[0].last_direction, Direction::Right);
        assert_eq!(worm.segments()[1].last_direction, Direction::Right);
    }

    #[test]
    fn grow_behind_straight_tail() {
        let mut worm = worm_from(&[(3, 5), (3, 4)], Direction::Right);
        worm.grow(BOUNDS);
        assert_eq!(
            positions(&worm),
            [Cell::new(3, 5), Cell::new(3, 4), Cell::new(3, 3)]
        );
        assert_eq!(worm.segments()[2].last_direction, Direction::Right);
    }

    #[test]
    fn grow_follows_tail_direction_not_head() {
        // Head has turned upwards, tail is still travelling right.
        let mut worm = worm_from(&[(0, 2), (0, 1), (0, 0)], Direction::Right);
        worm.advance(Direction::Up, BOUNDS);
        worm.grow(BOUNDS);
        assert_eq!(
            positions(&worm),
            [Cell::new(9, 2), Cell::new(0, 2), Cell::new(0, 1), Cell::new(0, 0)]
        );
        assert_eq!(worm.segments()[3].last_direction, Direction::Right);
    }

    #[test]
    fn grow_wraps() {
        let mut worm = worm_from(&[(5, 0)], Direction::Right);
        worm.grow(BOUNDS);
        assert_eq!(positions(&worm), [Cell::new(5, 0), Cell::new(5, 9)]);
    }

    #[test]
    fn self_collision() {
        let mut worm = worm_from(&[(1, 1), (1, 2), (2, 2), (2, 1), (2, 0)], Direction::Left);
        assert!(!worm.has_self_collision());
        worm.advance(Direction::Down, BOUNDS);
        assert_eq!(worm.head(), Cell::new(2, 1));
        assert!(worm.has_self_collision());
    }

    #[test]
    fn single_segment_never_collides() {
        let mut worm = Worm::new(Cell::new(0, 0));
        let bounds = Bounds {
            width: 1,
            height: 1,
        };
        for d in [Direction::Up, Direction::Left, Direction::Down, Direction::Right] {
            worm.advance(d, bounds);
            assert!(!worm.has_self_collision());
        }
    }

    #[test]
    fn reset_round_trip() {
        let spawn = Cell::new(0, 1);
        let mut worm = Worm::new(spawn);
        let initial = worm.clone();
        worm.advance(Direction::Right, BOUNDS);
        worm.grow(BOUNDS);
        worm.advance(Direction::Down, BOUNDS);
        worm.grow(BOUNDS);
        worm.advance(Direction::Left, BOUNDS);
        assert_eq!(worm.len(), 3);
        worm.reset(spawn);
        assert_eq!(worm, initial);
        worm.reset(spawn);
        assert_eq!(worm, initial);
    }
}
