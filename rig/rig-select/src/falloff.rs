//! Falloff curves mapping a distance to a selection weight.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::SelectError;

/// Distances at or below this are treated as coincident and get full weight.
pub const COINCIDENT_DISTANCE: f64 = 1e-4;

/// Shape of the weight curve between the seed and the cutoff distance.
///
/// With `l = distance / cutoff` in `(0, 1)`:
///
/// | Falloff | Weight |
/// |---------|--------|
/// | `Spike` | `1 - sqrt(2l - l²)` |
/// | `Linear` | `1 - l` |
/// | `Dome` | `sqrt(1 - l²)` |
/// | `Bell` | `(1 + 2l)(1 - l)²` |
/// | `Random` | uniform in `[0, 1)` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Falloff {
    /// Sharp peak at the seed.
    Spike,
    /// Smooth S-curve.
    #[default]
    Bell,
    /// Rounded plateau.
    Dome,
    /// Straight ramp.
    Linear,
    /// Uniform noise, ignores distance.
    Random,
}

impl Falloff {
    /// Every falloff kind.
    pub const ALL: [Self; 5] = [
        Self::Spike,
        Self::Bell,
        Self::Dome,
        Self::Linear,
        Self::Random,
    ];

    /// Upper-case name as used by hosts and command scripts.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Spike => "SPIKE",
            Self::Bell => "BELL",
            Self::Dome => "DOME",
            Self::Linear => "LINEAR",
            Self::Random => "RANDOM",
        }
    }

    /// Weight for a vertex at `distance` from the seed.
    ///
    /// Coincident vertices always get `1.0`, vertices at or beyond `cutoff`
    /// get `0.0`. Only [`Falloff::Random`] draws from `rng`.
    ///
    /// # Example
    ///
    /// ```
    /// use rig_select::Falloff;
    ///
    /// let mut rng = rand::thread_rng();
    /// assert_eq!(Falloff::Linear.weight(0.5, 2.0, &mut rng), 0.75);
    /// assert_eq!(Falloff::Bell.weight(2.0, 2.0, &mut rng), 0.0);
    /// assert_eq!(Falloff::Spike.weight(0.0, 2.0, &mut rng), 1.0);
    /// ```
    pub fn weight<R: Rng + ?Sized>(self, distance: f64, cutoff: f64, rng: &mut R) -> f64 {
        if distance <= COINCIDENT_DISTANCE {
            return 1.0;
        }
        if distance >= cutoff {
            return 0.0;
        }

        let l = distance / cutoff;
        match self {
            Self::Spike => 1.0 - (2.0 * l - l * l).sqrt(),
            Self::Linear => 1.0 - l,
            Self::Dome => (1.0 - l * l).sqrt(),
            Self::Bell => (1.0 + 2.0 * l) * (1.0 - l) * (1.0 - l),
            Self::Random => rng.gen::<f64>(),
        }
    }
}

impl fmt::Display for Falloff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Falloff {
    type Err = SelectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|falloff| falloff.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SelectError::UnknownFalloff { name: s.to_owned() })
    }
}
