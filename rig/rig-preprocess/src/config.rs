//! Preprocessing configuration.
//!
//! # Example
//!
//! ```
//! use rig_algebra::SubShapePolicy;
//! use rig_preprocess::PreprocessConfig;
//!
//! let config = PreprocessConfig::default()
//!     .with_relative_suffix("_export")
//!     .with_sub_shape_policy(SubShapePolicy::Strict);
//!
//! assert_eq!(config.output_name("head_abs").as_deref(), Some("head_export"));
//! assert_eq!(config.output_name("head"), None);
//! ```

use rig_algebra::SubShapePolicy;

use crate::error::{PreprocessError, PreprocessResult};

/// Naming conventions and policies for a preprocessing run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PreprocessConfig {
    /// Suffix an input (absolute) mesh name must end with.
    pub absolute_suffix: String,

    /// Suffix replacing [`absolute_suffix`](Self::absolute_suffix) in the
    /// output name.
    pub relative_suffix: String,

    /// Layers whose name contains this tag are selector helpers and are
    /// stripped from the output.
    pub selector_tag: String,

    /// Suffix appended to the mesh name by
    /// [`Preprocessor::rebuild_absolute`](crate::Preprocessor::rebuild_absolute).
    pub rebuilt_suffix: String,

    /// Handling of missing rank 1 sub-shapes.
    pub sub_shape_policy: SubShapePolicy,

    /// Whether an existing output mesh is replaced.
    pub overwrite: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            absolute_suffix: "_abs".to_string(),
            relative_suffix: "_rel".to_string(),
            selector_tag: "Selector".to_string(),
            rebuilt_suffix: "_absolute_correctors".to_string(),
            sub_shape_policy: SubShapePolicy::Lenient,
            overwrite: true,
        }
    }
}

impl PreprocessConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input suffix.
    #[must_use]
    pub fn with_absolute_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.absolute_suffix = suffix.into();
        self
    }

    /// Set the output suffix.
    #[must_use]
    pub fn with_relative_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.relative_suffix = suffix.into();
        self
    }

    /// Set the selector helper tag.
    #[must_use]
    pub fn with_selector_tag(mut self, tag: impl Into<String>) -> Self {
        self.selector_tag = tag.into();
        self
    }

    /// Set the suffix for rebuilt absolute meshes.
    #[must_use]
    pub fn with_rebuilt_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.rebuilt_suffix = suffix.into();
        self
    }

    /// Set the missing sub-shape policy.
    #[must_use]
    pub const fn with_sub_shape_policy(mut self, policy: SubShapePolicy) -> Self {
        self.sub_shape_policy = policy;
        self
    }

    /// Set whether an existing output mesh is replaced.
    #[must_use]
    pub const fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Output name for an input mesh, `None` if the input lacks the
    /// absolute suffix.
    #[must_use]
    pub fn output_name(&self, input: &str) -> Option<String> {
        input
            .strip_suffix(self.absolute_suffix.as_str())
            .map(|stem| format!("{stem}{}", self.relative_suffix))
    }

    /// Check that the configuration can drive a run.
    ///
    /// # Errors
    ///
    /// Returns [`PreprocessError::InvalidConfig`] for an empty selector
    /// tag, an empty absolute suffix, or identical input and output
    /// suffixes.
    pub fn validate(&self) -> PreprocessResult<()> {
        let reason = if self.selector_tag.is_empty() {
            "selector tag is empty"
        } else if self.absolute_suffix.is_empty() {
            "absolute suffix is empty"
        } else if self.absolute_suffix == self.relative_suffix {
            "absolute and relative suffixes are equal"
        } else {
            return Ok(());
        };
        Err(PreprocessError::InvalidConfig {
            reason: reason.to_owned(),
        })
    }

    /// Whether a layer name marks a selector helper.
    #[must_use]
    pub fn is_selector(&self, name: &str) -> bool {
        !self.selector_tag.is_empty() && name.contains(self.selector_tag.as_str())
    }
}
