use std::fmt::Display;
use std::str::FromStr;

use super::error::GeometryError;

/// Which multiplet of the double wedge a board sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quad {
    /// IP-side multiplet (layers 0-3)
    Ip,
    /// HO-side multiplet (layers 4-7)
    Ho,
}

/// Position of a frontend board within one sector, as (layer, radius) indices.
///
/// Board names encode this as `MMFE8_L{layer}P{pcb}_{IP|HO}{L|R}`; the name
/// uses 1-based layer/pcb numbers plus a side letter, while analysis code wants
/// flat 0-7 layer and radius indices. This type is the bidirectional codec
/// between the two conventions. It only affects labeling; aggregation never
/// depends on geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardId {
    layer: u8,
    radius: u8,
}

impl BoardId {
    pub fn new(layer: u8, radius: u8) -> Result<Self, GeometryError> {
        if layer >= 8 || radius >= 8 {
            return Err(GeometryError::BadGeometry(layer, radius));
        }
        Ok(Self { layer, radius })
    }

    pub fn layer(&self) -> u8 {
        self.layer
    }

    pub fn radius(&self) -> u8 {
        self.radius
    }

    pub fn quad(&self) -> Quad {
        if self.layer >= 4 {
            Quad::Ho
        } else {
            Quad::Ip
        }
    }
}

impl FromStr for BoardId {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || GeometryError::BadNodeName(s.to_string());

        let rest = s.strip_prefix("MMFE8_L").ok_or_else(bad)?;
        let bytes = rest.as_bytes();
        // Expect "{layer}P{pcb}_{quad}{side}" = 7 bytes
        if bytes.len() != 7 || bytes[1] != b'P' || bytes[3] != b'_' {
            return Err(bad());
        }
        let name_layer = (bytes[0] as char).to_digit(10).ok_or_else(bad)? as u8;
        let pcb = (bytes[2] as char).to_digit(10).ok_or_else(bad)? as u8;
        if !(1..=4).contains(&name_layer) || !(1..=4).contains(&pcb) {
            return Err(bad());
        }
        let quad = match &bytes[4..6] {
            b"IP" => Quad::Ip,
            b"HO" => Quad::Ho,
            _ => return Err(bad()),
        };
        let side = bytes[6];
        if side != b'L' && side != b'R' {
            return Err(bad());
        }

        let layer = match quad {
            Quad::Ho => 8 - name_layer,
            Quad::Ip => name_layer - 1,
        };
        let mut radius = (pcb - 1) * 2;
        // The side letter alternates with layer parity; the off-parity side
        // sits one radius step out.
        if !((side == b'R' && layer % 2 == 1) || (side == b'L' && layer % 2 == 0)) {
            radius += 1;
        }

        BoardId::new(layer, radius)
    }
}

impl Display for BoardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name_layer = if self.layer < 4 {
            self.layer + 1
        } else {
            8 - self.layer
        };
        let pcb = self.radius / 2 + 1;
        let quad = match self.quad() {
            Quad::Ho => "HO",
            Quad::Ip => "IP",
        };
        let side = if (self.radius + self.layer) % 2 == 1 {
            'R'
        } else {
            'L'
        };
        write!(f, "MMFE8_L{name_layer}P{pcb}_{quad}{side}")
    }
}

/// A signed sector index.
///
/// Positive indices are one wheel, negative the mirrored wheel; the sign is
/// display metadata only and never changes how a sector is aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SectorId(i32);

impl SectorId {
    pub fn new(index: i32) -> Result<Self, GeometryError> {
        if index == 0 || index.unsigned_abs() > 16 {
            return Err(GeometryError::BadSectorIndex(index));
        }
        Ok(Self(index))
    }

    pub fn index(&self) -> i32 {
        self.0
    }

    /// Wheel-style label: "A05" for sector 5, "C05" for sector -5.
    pub fn wheel_label(&self) -> String {
        let wheel = if self.0 > 0 { 'A' } else { 'C' };
        format!("{}{:02}", wheel, self.0.unsigned_abs())
    }
}

impl FromStr for SectorId {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let index: i32 = s
            .parse()
            .map_err(|_| GeometryError::BadSectorKey(s.to_string()))?;
        SectorId::new(index)
    }
}

impl Display for SectorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wheel_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_board_names() {
        let id = BoardId::from_str("MMFE8_L1P3_IPR").unwrap();
        assert_eq!(id.layer(), 0);
        assert_eq!(id.radius(), 5);
        assert_eq!(id.quad(), Quad::Ip);

        let id = BoardId::from_str("MMFE8_L1P1_HOL").unwrap();
        assert_eq!(id.layer(), 7);
        assert_eq!(id.radius(), 1);
        assert_eq!(id.quad(), Quad::Ho);
    }

    #[test]
    fn test_board_name_round_trip() {
        for layer in 0..8u8 {
            for radius in 0..8u8 {
                let id = BoardId::new(layer, radius).unwrap();
                let name = id.to_string();
                let parsed = BoardId::from_str(&name).unwrap();
                assert_eq!(id, parsed, "round trip failed for {name}");
            }
        }
    }

    #[test]
    fn test_bad_board_names() {
        for name in [
            "MMFE8_L5P1_IPR",
            "MMFE8_L1P0_IPR",
            "MMFE8_L1P1_XXR",
            "MMFE8_L1P1_IPQ",
            "VMM_L1P1_IPR",
            "MMFE8_L1P1_IP",
        ] {
            assert!(BoardId::from_str(name).is_err(), "{name} should not parse");
        }
    }

    #[test]
    fn test_bad_geometry() {
        assert_eq!(
            BoardId::new(8, 0),
            Err(GeometryError::BadGeometry(8, 0))
        );
        assert_eq!(
            BoardId::new(0, 8),
            Err(GeometryError::BadGeometry(0, 8))
        );
    }

    #[test]
    fn test_sector_labels_keep_sign() {
        assert_eq!(SectorId::from_str("5").unwrap().wheel_label(), "A05");
        assert_eq!(SectorId::from_str("-5").unwrap().wheel_label(), "C05");
        assert_eq!(SectorId::from_str("-16").unwrap().wheel_label(), "C16");
    }

    #[test]
    fn test_bad_sector_keys() {
        assert_eq!(
            SectorId::from_str("0"),
            Err(GeometryError::BadSectorIndex(0))
        );
        assert_eq!(
            SectorId::from_str("17"),
            Err(GeometryError::BadSectorIndex(17))
        );
        assert_eq!(
            SectorId::from_str("all"),
            Err(GeometryError::BadSectorKey(String::from("all")))
        );
    }

    #[test]
    fn test_extreme_sector_keys_rejected() {
        // i32::MIN has no positive counterpart, so the magnitude check must
        // not negate it
        assert_eq!(
            SectorId::from_str("-2147483648"),
            Err(GeometryError::BadSectorIndex(i32::MIN))
        );
        assert_eq!(
            SectorId::from_str("2147483647"),
            Err(GeometryError::BadSectorIndex(i32::MAX))
        );
    }
}
