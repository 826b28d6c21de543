//! The versioned table of operations a shape script may use.

use std::fmt;
use std::str::FromStr;

/// Version of the capability table.
///
/// Bumped whenever a capability is added, removed or changes meaning.
pub const CAPABILITY_TABLE_VERSION: u32 = 1;

/// One operation exposed to shape scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Capability {
    /// Add a shape's displacement to the working state.
    Add,
    /// Add a shape's displacement plus that of its sub-shapes.
    AddCorrected,
    /// Grow the selection by edge rings or by soft falloff.
    GrowSelection,
    /// Interpolate the working state towards a shape.
    Interp,
    /// Save the working state into a corrective and make it relative.
    OverrideCorrector,
    /// Reset the working state to the base pose.
    ResetState,
    /// Save the working state into a shape.
    SaveDelta,
    /// Replace the selection.
    Select,
    /// Keep one side of the selection.
    SelectHalf,
    /// Load a shape into the working state.
    SetState,
    /// Shrink the selection by edge rings.
    ShrinkSelection,
    /// Delete a shape.
    DeleteDelta,
    /// Offset the selected working positions.
    Translate,
    /// Read access to the mesh.
    GetMesh,
    /// Log the selection.
    PrintSel,
    /// Write the selection into a selector helper shape.
    VisualiseSel,
}

impl Capability {
    /// The full table, in declaration order.
    pub const ALL: [Self; 16] = [
        Self::Add,
        Self::AddCorrected,
        Self::GrowSelection,
        Self::Interp,
        Self::OverrideCorrector,
        Self::ResetState,
        Self::SaveDelta,
        Self::Select,
        Self::SelectHalf,
        Self::SetState,
        Self::ShrinkSelection,
        Self::DeleteDelta,
        Self::Translate,
        Self::GetMesh,
        Self::PrintSel,
        Self::VisualiseSel,
    ];

    /// Name used in command scripts.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::AddCorrected => "AddCorrected",
            Self::GrowSelection => "GrowSelection",
            Self::Interp => "Interp",
            Self::OverrideCorrector => "OverrideCorrector",
            Self::ResetState => "ResetState",
            Self::SaveDelta => "SaveDelta",
            Self::Select => "Select",
            Self::SelectHalf => "SelectHalf",
            Self::SetState => "SetState",
            Self::ShrinkSelection => "ShrinkSelection",
            Self::DeleteDelta => "DeleteDelta",
            Self::Translate => "Translate",
            Self::GetMesh => "GetMesh",
            Self::PrintSel => "PrintSel",
            Self::VisualiseSel => "VisualiseSel",
        }
    }

    /// Whether the capability can change the mesh.
    #[must_use]
    pub const fn mutates_mesh(self) -> bool {
        matches!(
            self,
            Self::OverrideCorrector | Self::SaveDelta | Self::DeleteDelta | Self::VisualiseSel
        )
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for a name outside the capability table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCapability(pub String);

impl FromStr for Capability {
    type Err = UnknownCapability;

    /// Case-insensitive lookup by [`Capability::name`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|capability| capability.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCapability(s.to_owned()))
    }
}
