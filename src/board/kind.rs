use serde::{Deserialize, Serialize};

/// Piece color. Match equality compares kinds, never identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
}

/// Display and reward data for a piece kind.
///
/// One immutable entry per kind, built as static data. Lookups go through
/// [`PieceKind::info`] rather than scattered per-field match statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindInfo {
    pub name: &'static str,
    pub rgba: [u8; 4],
    pub gold_value: u32,
}

impl PieceKind {
    /// All kinds, in a fixed order usable for random selection.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Red,
        PieceKind::Orange,
        PieceKind::Yellow,
        PieceKind::Green,
        PieceKind::Blue,
        PieceKind::Purple,
    ];

    /// Get the static info entry for this kind
    pub fn info(self) -> &'static KindInfo {
        match self {
            PieceKind::Red => &KindInfo {
                name: "Red",
                rgba: [220, 50, 47, 255],
                gold_value: 10,
            },
            PieceKind::Orange => &KindInfo {
                name: "Orange",
                rgba: [230, 126, 34, 255],
                gold_value: 10,
            },
            PieceKind::Yellow => &KindInfo {
                name: "Yellow",
                rgba: [241, 196, 15, 255],
                gold_value: 15,
            },
            PieceKind::Green => &KindInfo {
                name: "Green",
                rgba: [46, 204, 113, 255],
                gold_value: 15,
            },
            PieceKind::Blue => &KindInfo {
                name: "Blue",
                rgba: [52, 152, 219, 255],
                gold_value: 20,
            },
            PieceKind::Purple => &KindInfo {
                name: "Purple",
                rgba: [155, 89, 182, 255],
                gold_value: 25,
            },
        }
    }

    /// Kind name for display
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Gold awarded per piece of this kind when cleared
    pub fn gold_value(self) -> u32 {
        self.info().gold_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_kinds_have_distinct_names() {
        for (i, a) in PieceKind::ALL.iter().enumerate() {
            for b in PieceKind::ALL.iter().skip(i + 1) {
                assert_ne!(a.name(), b.name());
            }
        }
    }

    #[test]
    fn test_gold_values_positive() {
        for kind in PieceKind::ALL {
            assert!(kind.gold_value() > 0, "{} has no gold value", kind.name());
        }
    }

    #[test]
    fn test_info_is_stable() {
        // Two lookups for the same kind return the same entry
        assert_eq!(PieceKind::Blue.info(), PieceKind::Blue.info());
        assert_eq!(PieceKind::Red.name(), "Red");
    }
}
