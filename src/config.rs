//! Game and engine configuration.

use core::time::Duration;

use thiserror::Error;

use crate::threat::Parity;

/// Default number of transposition table slots.
pub const DEFAULT_TT_CAPACITY: usize = 1 << 18;

/// Searches finishing faster than this let the depth grow for the next turn.
pub const DEFAULT_TIME_THRESHOLD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

fn invalid(reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidConfiguration(reason.into())
}

/// Static board geometry. Never changes during a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Geometry {
    width: usize,
    height: usize,
    line_len: usize,
}

impl Geometry {
    pub fn new(width: usize, height: usize, line_len: usize) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 || line_len == 0 {
            return Err(invalid(format!(
                "dimensions must be positive ({width}x{height}, line length {line_len})"
            )));
        }
        if line_len > width && line_len > height {
            return Err(invalid(format!(
                "line length {line_len} fits neither width {width} nor height {height}"
            )));
        }
        Ok(Self {
            width,
            height,
            line_len,
        })
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub const fn line_len(&self) -> usize {
        self.line_len
    }

    #[must_use]
    pub const fn cells(&self) -> usize {
        self.width * self.height
    }

    /// Whether columns hold an even number of discs. Selects the search algorithm.
    #[must_use]
    pub const fn even_height(&self) -> bool {
        self.height % 2 == 0
    }

    /// Column indices ordered by distance to the horizontal center, ties by
    /// lower index.
    #[must_use]
    pub fn center_first_columns(&self) -> Vec<usize> {
        let mut columns = (0..self.width).collect::<Vec<_>>();
        columns.sort_by_key(|&col| (self.center_distance(col), col));
        columns
    }

    /// Doubled distance of `col` to the center, so that even widths stay integral.
    #[must_use]
    pub const fn center_distance(&self, col: usize) -> usize {
        (2 * col).abs_diff(self.width - 1)
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            width: 7,
            height: 6,
            line_len: 4,
        }
    }
}

/// Weights of open threats in the minimax heuristic.
///
/// `preferred_parity` is the parity that favours the first player; the second
/// player prefers the other one. A threat whose parity matches its owner's
/// preference weighs `preferred`, every other threat weighs `other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParityWeights {
    pub preferred_parity: Parity,
    pub preferred: i32,
    pub other: i32,
}

impl Default for ParityWeights {
    fn default() -> Self {
        Self {
            preferred_parity: Parity::Even,
            preferred: 4,
            other: 1,
        }
    }
}

/// Tunables of the search engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineParams {
    pub weights: ParityWeights,
    /// Number of slots in the transposition table.
    pub tt_capacity: usize,
    pub time_threshold: Duration,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            weights: ParityWeights::default(),
            tt_capacity: DEFAULT_TT_CAPACITY,
            time_threshold: DEFAULT_TIME_THRESHOLD,
        }
    }
}

impl EngineParams {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.weights.preferred <= self.weights.other {
            return Err(invalid(format!(
                "preferred parity weight {} must exceed the other weight {}",
                self.weights.preferred, self.weights.other
            )));
        }
        if self.tt_capacity == 0 {
            return Err(invalid("transposition table needs at least one slot"));
        }
        Ok(())
    }
}

/// Everything needed to set up a game against the computer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    geometry: Geometry,
    initial_depth: usize,
    adaptive_depth: bool,
    params: EngineParams,
}

impl Config {
    pub fn new(geometry: Geometry, initial_depth: usize) -> Result<Self, ConfigError> {
        if initial_depth == 0 {
            return Err(invalid("initial search depth must be positive"));
        }
        Ok(Self {
            geometry,
            initial_depth,
            adaptive_depth: true,
            params: EngineParams::default(),
        })
    }

    /// Keeps the depth fixed at its initial value for the whole game.
    #[must_use]
    pub const fn with_adaptive_depth(mut self, adaptive: bool) -> Self {
        self.adaptive_depth = adaptive;
        self
    }

    pub fn with_params(mut self, params: EngineParams) -> Result<Self, ConfigError> {
        params.validate()?;
        self.params = params;
        Ok(self)
    }

    #[must_use]
    pub const fn geometry(&self) -> Geometry {
        self.geometry
    }

    #[must_use]
    pub const fn initial_depth(&self) -> usize {
        self.initial_depth
    }

    #[must_use]
    pub const fn adaptive_depth(&self) -> bool {
        self.adaptive_depth
    }

    #[must_use]
    pub const fn params(&self) -> &EngineParams {
        &self.params
    }
}

/// Validates a game setup.
pub fn configure(
    width: usize,
    height: usize,
    line_len: usize,
    initial_depth: usize,
) -> Result<Config, ConfigError> {
    Config::new(Geometry::new(width, height, line_len)?, initial_depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_rejects_non_positive_dimensions() {
        assert!(configure(0, 6, 4, 3).is_err());
        assert!(configure(7, 0, 4, 3).is_err());
        assert!(configure(7, 6, 0, 3).is_err());
        assert!(configure(7, 6, 4, 0).is_err());
    }

    #[test]
    fn test_configure_line_length() {
        // too long in both directions
        assert!(matches!(
            configure(3, 3, 4, 1),
            Err(ConfigError::InvalidConfiguration(_))
        ));
        // fits vertically only
        assert!(configure(3, 5, 4, 1).is_ok());
        // fits horizontally only
        assert!(configure(5, 3, 4, 1).is_ok());
    }

    #[test]
    fn test_params_validation() {
        let config = configure(7, 6, 4, 2).unwrap();
        let mut params = EngineParams::default();
        params.weights.preferred = params.weights.other;
        assert!(config.with_params(params).is_err());

        let params = EngineParams {
            tt_capacity: 0,
            ..EngineParams::default()
        };
        assert!(config.with_params(params).is_err());
        assert!(config.with_params(EngineParams::default()).is_ok());
    }

    #[test]
    fn test_center_first_columns() {
        let geometry = Geometry::new(7, 6, 4).unwrap();
        assert_eq!(geometry.center_first_columns(), [3, 2, 4, 1, 5, 0, 6]);
        let geometry = Geometry::new(6, 5, 4).unwrap();
        assert_eq!(geometry.center_first_columns(), [2, 3, 1, 4, 0, 5]);
    }
}
