use std::fmt::Display;

/// The subtree of a dataset over which one aggregation runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Every sector in the dataset.
    Full,
    /// One sector by key.
    Sector(String),
    /// One board within a sector.
    Board { sector: String, board: String },
    /// One vmm within a board.
    Vmm {
        sector: String,
        board: String,
        vmm: String,
    },
}

impl Scope {
    pub fn sector(key: &str) -> Self {
        Scope::Sector(key.to_string())
    }

    pub fn board(sector: &str, board: &str) -> Self {
        Scope::Board {
            sector: sector.to_string(),
            board: board.to_string(),
        }
    }

    pub fn vmm(sector: &str, board: &str, vmm: &str) -> Self {
        Scope::Vmm {
            sector: sector.to_string(),
            board: board.to_string(),
            vmm: vmm.to_string(),
        }
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Full => write!(f, "all sectors"),
            Scope::Sector(key) => write!(f, "sector {key}"),
            Scope::Board { sector, board } => write!(f, "sector {sector} / {board}"),
            Scope::Vmm { sector, board, vmm } => {
                write!(f, "sector {sector} / {board} / {vmm}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_labels() {
        assert_eq!(Scope::Full.to_string(), "all sectors");
        assert_eq!(Scope::sector("-3").to_string(), "sector -3");
        assert_eq!(
            Scope::vmm("-3", "MMFE8_L1P3_IPR", "vmm2").to_string(),
            "sector -3 / MMFE8_L1P3_IPR / vmm2"
        );
    }
}
