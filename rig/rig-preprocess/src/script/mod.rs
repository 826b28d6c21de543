//! Shape scripting.
//!
//! A script edits the output mesh of a preprocessing run through a
//! [`ScriptContext`], limited to the operations of the [`Capability`]
//! table. Scripts are either Rust code implementing [`ShapeScript`]
//! (closures included) or a parsed [`CommandScript`].

mod capability;
mod command;
mod context;

pub use capability::{Capability, UnknownCapability, CAPABILITY_TABLE_VERSION};
pub use command::{Command, CommandScript, Growth, SelectTarget, DEFAULT_MOVE_TOLERANCE};
pub use context::{ScriptContext, DEFAULT_SELECTOR_TAG};

use crate::error::ScriptResult;

/// A script run by [`Preprocessor::run`](crate::Preprocessor::run).
///
/// # Example
///
/// ```
/// use rig_preprocess::{ScriptContext, ScriptResult, ShapeScript};
/// use rig_types::{Point3, RigMesh};
///
/// let mut script = |ctx: &mut ScriptContext<'_>| -> ScriptResult<()> {
///     ctx.select_all();
///     ctx.save_delta("Rest")
/// };
///
/// let mut mesh = RigMesh::new(vec![Point3::origin()], Vec::new());
/// script.run(&mut ScriptContext::new(&mut mesh)).unwrap();
/// assert!(mesh.shape("Rest").is_some());
/// ```
pub trait ShapeScript {
    /// Run the script.
    ///
    /// # Errors
    ///
    /// Any error aborts the preprocessing run.
    fn run(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult<()>;
}

impl<F> ShapeScript for F
where
    F: FnMut(&mut ScriptContext<'_>) -> ScriptResult<()>,
{
    fn run(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult<()> {
        self(ctx)
    }
}
