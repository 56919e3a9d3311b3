//! Plant preset catalog.
//!
//! A preset is a named, fixed (white, red, uv) target triple applied
//! atomically to all three channels.  The catalog is immutable and lives in
//! a static table; the menu cycles a *previewed* preset which is only
//! applied on explicit confirmation.

use serde::{Deserialize, Serialize};

/// Enumeration of all catalog presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum PresetId {
    /// Low light, white dominant — germination.
    Seed = 0,
    /// High white, medium red — vegetative growth.
    Veg = 1,
    /// High red, medium white, low UV — flowering.
    Bloom = 2,
    /// Everything at maximum (UV at its safety ceiling).
    Full = 3,
}

impl PresetId {
    /// Total number of presets — used to size the catalog array.
    pub const COUNT: usize = 4;

    /// The preset after this one in preview order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::Seed => Self::Veg,
            Self::Veg => Self::Bloom,
            Self::Bloom => Self::Full,
            Self::Full => Self::Seed,
        }
    }
}

/// One catalog entry: target values for all three channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub id: PresetId,
    pub label: &'static str,
    pub white: u8,
    pub red: u8,
    pub uv: u8,
}

/// The static preset catalog, indexed by `PresetId as usize`.
pub const CATALOG: [Preset; PresetId::COUNT] = [
    Preset {
        id: PresetId::Seed,
        label: "Seed",
        white: 100,
        red: 40,
        uv: 0,
    },
    Preset {
        id: PresetId::Veg,
        label: "Veg",
        white: 220,
        red: 80,
        uv: 10,
    },
    Preset {
        id: PresetId::Bloom,
        label: "Bloom",
        white: 100,
        red: 255,
        uv: 60,
    },
    Preset {
        id: PresetId::Full,
        label: "Full",
        white: 255,
        red: 255,
        uv: 204,
    },
];

/// Look up a preset by id.
pub fn get(id: PresetId) -> &'static Preset {
    &CATALOG[id as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_index_matches_id() {
        for (i, p) in CATALOG.iter().enumerate() {
            assert_eq!(p.id as usize, i);
        }
    }

    #[test]
    fn bloom_triple() {
        let p = get(PresetId::Bloom);
        assert_eq!((p.white, p.red, p.uv), (100, 255, 60));
    }

    #[test]
    fn preview_cycle_wraps() {
        let mut id = PresetId::Seed;
        for _ in 0..PresetId::COUNT {
            id = id.next();
        }
        assert_eq!(id, PresetId::Seed);
    }

    #[test]
    fn uv_never_exceeds_default_ceiling() {
        for p in &CATALOG {
            assert!(p.uv <= 204, "{} preset exceeds the UV ceiling", p.label);
        }
    }
}
