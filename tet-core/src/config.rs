use crate::error::TreeError;

/// Height-driven rules that shape every new branch.
///
/// All formulas take the parent's `basepos.y` as input and are deliberately
/// left unclamped, except the upward bias which is clamped to `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrowthRules {
    /// Branch probability for faces 1 and 2 is `branch_chance_per_height * y`.
    pub branch_chance_per_height: f32,
    /// Scale of the new apex offset.
    pub branch_length: f32,
    /// Maximum random rotation, in degrees, is `deviation_per_height * y`.
    pub deviation_per_height: f32,
    /// Upward bias is `clamp01(upward_slope * y + upward_offset)`.
    pub upward_slope: f32,
    pub upward_offset: f32,
}

impl Default for GrowthRules {
    fn default() -> Self {
        Self {
            branch_chance_per_height: 0.075,
            branch_length: 1.0,
            deviation_per_height: 10.0 * 0.1,
            upward_slope: -0.5,
            upward_offset: 1.0,
        }
    }
}

impl GrowthRules {
    pub fn branch_chance(&self, height: f32) -> f32 {
        self.branch_chance_per_height * height
    }

    pub fn max_deviation(&self, height: f32) -> f32 {
        self.deviation_per_height * height
    }

    pub fn upward_strength(&self, height: f32) -> f32 {
        (self.upward_slope * height + self.upward_offset).clamp(0.0, 1.0)
    }
}

/// Settings consumed by [`crate::driver::TetrahedronTree`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Seed used when `use_random_seed` is off. Overwritten with the drawn
    /// seed when it is on.
    pub seed: i32,
    pub use_random_seed: bool,
    /// Recursion bound. Negative values behave like `0`.
    pub max_depth: i32,
    pub rules: GrowthRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 0,
            use_random_seed: false,
            max_depth: 5,
            rules: GrowthRules::default(),
        }
    }
}

impl Config {
    /// Checks that every growth rule is a finite number.
    pub fn validate(&self) -> Result<(), TreeError> {
        let r = &self.rules;
        let fields = [
            ("branch_chance_per_height", r.branch_chance_per_height),
            ("branch_length", r.branch_length),
            ("deviation_per_height", r.deviation_per_height),
            ("upward_slope", r.upward_slope),
            ("upward_offset", r.upward_offset),
        ];
        match fields.iter().find(|(_, v)| !v.is_finite()) {
            Some((name, v)) => Err(TreeError::InvalidConfiguration(format!(
                "{name} must be finite, got {v}"
            ))),
            None => Ok(()),
        }
    }

    /// `max_depth` with negative values mapped to `0`.
    pub fn effective_depth(&self) -> i32 {
        self.max_depth.max(0)
    }
}
