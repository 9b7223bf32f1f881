/// Binary cell state, one byte per cell.
///
/// Layout: `#[repr(u8)]` with Dead = 0 and Alive = 1, so a grid buffer can be
/// viewed as `&[u8]` and summing the bytes of a neighborhood yields the
/// living-neighbor count directly.
#[repr(u8)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, bytemuck::NoUninit, bytemuck::CheckedBitPattern,
)]
pub enum Cell {
    #[default]
    Dead = 0,
    Alive = 1,
}

/// Which rule of B3/S23 decided a cell's next state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Dead cell with exactly three living neighbors is born.
    Reproduction,
    /// Dead cell stays dead.
    Stasis,
    /// Living cell with fewer than two living neighbors dies.
    Underpopulation,
    /// Living cell with two or three living neighbors lives on.
    Survival,
    /// Living cell with more than three living neighbors dies.
    Overpopulation,
}

impl Cell {
    pub fn is_alive(self) -> bool {
        self == Cell::Alive
    }

    /// Decide the transition for this cell given its living-neighbor count.
    pub fn transition(self, living_neighbors: u8) -> Transition {
        match (self, living_neighbors) {
            (Cell::Dead, 3) => Transition::Reproduction,
            (Cell::Dead, _) => Transition::Stasis,
            (Cell::Alive, 0 | 1) => Transition::Underpopulation,
            (Cell::Alive, 2 | 3) => Transition::Survival,
            (Cell::Alive, _) => Transition::Overpopulation,
        }
    }

    /// State of this cell in the next generation.
    pub fn next(self, living_neighbors: u8) -> Cell {
        self.transition(living_neighbors).outcome()
    }
}

impl Transition {
    /// Cell state produced by this transition.
    pub fn outcome(self) -> Cell {
        match self {
            Transition::Reproduction | Transition::Survival => Cell::Alive,
            Transition::Stasis | Transition::Underpopulation | Transition::Overpopulation => {
                Cell::Dead
            }
        }
    }
}

impl From<bool> for Cell {
    fn from(alive: bool) -> Self {
        if alive {
            Cell::Alive
        } else {
            Cell::Dead
        }
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> Self {
        cell as u8
    }
}
