//! A line-oriented command language over the capability table.
//!
//! Each non-empty line holds one capability name followed by its
//! arguments, separated by whitespace. `#` starts a comment. Names are
//! matched case-insensitively.
//!
//! ```text
//! # Build a lip corrective from the two base shapes
//! Select shape JawOpen
//! GrowSelection soft 0.5 bell
//! ResetState
//! AddCorrected JawOpen_Smile
//! Translate 0 0.01 0
//! OverrideCorrector JawOpen_Smile
//! ```
//!
//! | Command | Arguments |
//! |---------|-----------|
//! | `Add`, `AddCorrected`, `Interp` | `shape [amount=1]` |
//! | `SetState`, `SaveDelta`, `DeleteDelta`, `OverrideCorrector` | `shape` |
//! | `ResetState`, `GetMesh`, `PrintSel` | none |
//! | `Select` | `all`, `none`, `shape name [tolerance]` or vertex indices |
//! | `SelectHalf` | `left` or `right` |
//! | `GrowSelection` | `[steps=1]` or `soft distance [falloff=bell]` |
//! | `ShrinkSelection` | `[steps=1]` |
//! | `Translate` | `x y z` |
//! | `VisualiseSel` | `index` |

use std::fs;
use std::path::Path;
use std::str::FromStr;

use rig_select::{Falloff, Side, SoftSelectParams};
use rig_types::Vector3;
use tracing::{error, info};

use super::capability::Capability;
use super::context::ScriptContext;
use super::ShapeScript;
use crate::error::{ScriptError, ScriptResult};

/// Default tolerance of `Select shape`.
pub const DEFAULT_MOVE_TOLERANCE: f64 = 1e-5;

/// Target of a `Select` command.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectTarget {
    /// Every vertex.
    All,
    /// Nothing.
    None,
    /// Explicit vertex indices.
    Indices(Vec<u32>),
    /// Vertices a shape moves by more than `tolerance`.
    Shape {
        /// The shape name.
        name: String,
        /// Minimum displacement.
        tolerance: f64,
    },
}

/// How a `GrowSelection` command grows.
#[derive(Debug, Clone, PartialEq)]
pub enum Growth {
    /// Hard growth by edge rings.
    Steps(usize),
    /// Soft propagation.
    Soft(SoftSelectParams),
}

/// One parsed command.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum Command {
    Add { shape: String, amount: f64 },
    AddCorrected { shape: String, amount: f64 },
    GrowSelection(Growth),
    Interp { shape: String, amount: f64 },
    OverrideCorrector { shape: String },
    ResetState,
    SaveDelta { shape: String },
    Select(SelectTarget),
    SelectHalf(Side),
    SetState { shape: String },
    ShrinkSelection { steps: usize },
    DeleteDelta { shape: String },
    Translate(Vector3<f64>),
    GetMesh,
    PrintSel,
    VisualiseSel { index: u32 },
}

impl Command {
    /// The capability this command exercises.
    #[must_use]
    pub const fn capability(&self) -> Capability {
        match self {
            Self::Add { .. } => Capability::Add,
            Self::AddCorrected { .. } => Capability::AddCorrected,
            Self::GrowSelection(_) => Capability::GrowSelection,
            Self::Interp { .. } => Capability::Interp,
            Self::OverrideCorrector { .. } => Capability::OverrideCorrector,
            Self::ResetState => Capability::ResetState,
            Self::SaveDelta { .. } => Capability::SaveDelta,
            Self::Select(_) => Capability::Select,
            Self::SelectHalf(_) => Capability::SelectHalf,
            Self::SetState { .. } => Capability::SetState,
            Self::ShrinkSelection { .. } => Capability::ShrinkSelection,
            Self::DeleteDelta { .. } => Capability::DeleteDelta,
            Self::Translate(_) => Capability::Translate,
            Self::GetMesh => Capability::GetMesh,
            Self::PrintSel => Capability::PrintSel,
            Self::VisualiseSel { .. } => Capability::VisualiseSel,
        }
    }

    /// Run the command against a context.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying [`ScriptContext`] operation.
    pub fn apply(&self, ctx: &mut ScriptContext<'_>) -> ScriptResult<()> {
        match self {
            Self::Add { shape, amount } => ctx.add(shape, *amount)?,
            Self::AddCorrected { shape, amount } => ctx.add_corrected(shape, *amount)?,
            Self::GrowSelection(Growth::Steps(steps)) => ctx.grow_selection(*steps),
            Self::GrowSelection(Growth::Soft(params)) => ctx.grow_soft(params),
            Self::Interp { shape, amount } => ctx.interp(shape, *amount)?,
            Self::OverrideCorrector { shape } => ctx.override_corrector(shape)?,
            Self::ResetState => ctx.reset_state(),
            Self::SaveDelta { shape } => ctx.save_delta(shape)?,
            Self::Select(SelectTarget::All) => ctx.select_all(),
            Self::Select(SelectTarget::None) => ctx.select_none(),
            Self::Select(SelectTarget::Indices(indices)) => {
                ctx.select_indices(indices.iter().copied());
            }
            Self::Select(SelectTarget::Shape { name, tolerance }) => {
                ctx.select_shape(name, *tolerance)?;
            }
            Self::SelectHalf(side) => ctx.select_half(*side),
            Self::SetState { shape } => ctx.set_state(shape)?,
            Self::ShrinkSelection { steps } => ctx.shrink_selection(*steps),
            Self::DeleteDelta { shape } => ctx.delete_delta(shape)?,
            Self::Translate(offset) => ctx.translate(offset),
            Self::GetMesh => {
                let mesh = ctx.mesh();
                info!(
                    vertices = mesh.vertex_count(),
                    faces = mesh.face_count(),
                    shapes = mesh.shapes().len(),
                    max_rank = mesh.max_rank(),
                    "Mesh"
                );
            }
            Self::PrintSel => ctx.print_selection(),
            Self::VisualiseSel { index } => {
                ctx.visualise_selection(*index)?;
            }
        }
        Ok(())
    }
}

/// A parsed command script.
///
/// Parsing validates every line up front, so a script with a typo on its
/// last line never runs its first.
///
/// # Example
///
/// ```
/// use rig_preprocess::{Capability, CommandScript};
///
/// let script: CommandScript = "
///     Select all   # everything
///     Add Smile 0.5
///     SaveDelta HalfSmile
/// "
/// .parse()
/// .unwrap();
///
/// assert_eq!(script.len(), 3);
/// assert_eq!(script.commands()[1].1.capability(), Capability::Add);
///
/// let err = "Select all\nExplode".parse::<CommandScript>().unwrap_err();
/// assert_eq!(err.to_string(), "line 2: unknown command 'Explode'");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandScript {
    commands: Vec<(usize, Command)>,
}

impl CommandScript {
    /// Parse script source.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::UnknownCommand`] or [`ScriptError::Parse`]
    /// for the first bad line.
    pub fn parse(source: &str) -> ScriptResult<Self> {
        let mut commands = Vec::new();
        for (index, raw) in source.lines().enumerate() {
            let line = index + 1;
            let text = raw.split('#').next().unwrap_or_default();
            let mut words = text.split_whitespace();
            let Some(head) = words.next() else {
                continue;
            };
            let args: Vec<&str> = words.collect();
            let capability: Capability =
                head.parse().map_err(|_| ScriptError::UnknownCommand {
                    line,
                    command: head.to_owned(),
                })?;
            commands.push((line, parse_command(capability, &args, line)?));
        }
        Ok(Self { commands })
    }

    /// Read and parse a script file.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Io`] if the file cannot be read, or any
    /// parse error.
    pub fn load(path: impl AsRef<Path>) -> ScriptResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let script = Self::parse(&source)?;
        info!(path = %path.display(), commands = script.len(), "Loaded shape script");
        Ok(script)
    }

    /// Commands with their 1-based line numbers.
    #[must_use]
    pub fn commands(&self) -> &[(usize, Command)] {
        &self.commands
    }

    /// Number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the script has no command.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl FromStr for CommandScript {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl ShapeScript for CommandScript {
    fn run(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult<()> {
        for (line, command) in &self.commands {
            command.apply(ctx).map_err(|source| {
                let capability = command.capability();
                error!(line, command = %capability, error = %source, "Script command failed");
                ScriptError::Command {
                    line: *line,
                    command: capability.name(),
                    source: Box::new(source),
                }
            })?;
        }
        Ok(())
    }
}

fn parse_command(capability: Capability, args: &[&str], line: usize) -> ScriptResult<Command> {
    let parser = Args {
        capability,
        args,
        line,
    };
    let command = match capability {
        Capability::Add => Command::Add {
            shape: parser.shape()?,
            amount: parser.optional_f64(1, 1.0)?,
        },
        Capability::AddCorrected => Command::AddCorrected {
            shape: parser.shape()?,
            amount: parser.optional_f64(1, 1.0)?,
        },
        Capability::Interp => Command::Interp {
            shape: parser.shape()?,
            amount: parser.optional_f64(1, 1.0)?,
        },
        Capability::GrowSelection => Command::GrowSelection(parser.growth()?),
        Capability::OverrideCorrector => Command::OverrideCorrector {
            shape: parser.only_shape()?,
        },
        Capability::SaveDelta => Command::SaveDelta {
            shape: parser.only_shape()?,
        },
        Capability::SetState => Command::SetState {
            shape: parser.only_shape()?,
        },
        Capability::DeleteDelta => Command::DeleteDelta {
            shape: parser.only_shape()?,
        },
        Capability::ResetState => parser.no_args(Command::ResetState)?,
        Capability::GetMesh => parser.no_args(Command::GetMesh)?,
        Capability::PrintSel => parser.no_args(Command::PrintSel)?,
        Capability::Select => Command::Select(parser.select_target()?),
        Capability::SelectHalf => {
            parser.max_args(1)?;
            let side = parser.required(0, "side")?;
            Command::SelectHalf(side.parse().map_err(|e| parser.error(e))?)
        }
        Capability::ShrinkSelection => {
            parser.max_args(1)?;
            Command::ShrinkSelection {
                steps: parser.optional_usize(0, 1)?,
            }
        }
        Capability::Translate => {
            parser.max_args(3)?;
            Command::Translate(Vector3::new(
                parser.required_f64(0, "x")?,
                parser.required_f64(1, "y")?,
                parser.required_f64(2, "z")?,
            ))
        }
        Capability::VisualiseSel => {
            parser.max_args(1)?;
            let index = parser.required(0, "index")?;
            Command::VisualiseSel {
                index: index.parse().map_err(|_| parser.error(format!("invalid index '{index}'")))?,
            }
        }
    };
    Ok(command)
}

struct Args<'a> {
    capability: Capability,
    args: &'a [&'a str],
    line: usize,
}

impl Args<'_> {
    fn error(&self, message: impl ToString) -> ScriptError {
        ScriptError::Parse {
            line: self.line,
            message: format!("{}: {}", self.capability, message.to_string()),
        }
    }

    fn max_args(&self, max: usize) -> ScriptResult<()> {
        if self.args.len() > max {
            Err(self.error(format!(
                "expected at most {max} arguments, found {}",
                self.args.len()
            )))
        } else {
            Ok(())
        }
    }

    fn no_args(&self, command: Command) -> ScriptResult<Command> {
        self.max_args(0)?;
        Ok(command)
    }

    fn required(&self, index: usize, what: &str) -> ScriptResult<&str> {
        self.args
            .get(index)
            .copied()
            .ok_or_else(|| self.error(format!("missing {what}")))
    }

    fn shape(&self) -> ScriptResult<String> {
        self.max_args(2)?;
        self.required(0, "shape name").map(str::to_owned)
    }

    fn only_shape(&self) -> ScriptResult<String> {
        self.max_args(1)?;
        self.required(0, "shape name").map(str::to_owned)
    }

    fn number<T: FromStr>(&self, text: &str) -> ScriptResult<T> {
        text.parse()
            .map_err(|_| self.error(format!("invalid number '{text}'")))
    }

    fn required_f64(&self, index: usize, what: &str) -> ScriptResult<f64> {
        self.number(self.required(index, what)?)
    }

    fn optional_f64(&self, index: usize, default: f64) -> ScriptResult<f64> {
        self.args
            .get(index)
            .map_or(Ok(default), |text| self.number(text))
    }

    fn optional_usize(&self, index: usize, default: usize) -> ScriptResult<usize> {
        self.args
            .get(index)
            .map_or(Ok(default), |text| self.number(text))
    }

    fn growth(&self) -> ScriptResult<Growth> {
        match self.args.first() {
            Some(word) if word.eq_ignore_ascii_case("soft") => {
                self.max_args(3)?;
                let distance = self.required_f64(1, "distance")?;
                let falloff = match self.args.get(2) {
                    Some(name) => name.parse::<Falloff>().map_err(|e| self.error(e))?,
                    None => Falloff::default(),
                };
                Ok(Growth::Soft(
                    SoftSelectParams::new()
                        .with_max_distance(distance)
                        .with_falloff(falloff),
                ))
            }
            _ => {
                self.max_args(1)?;
                Ok(Growth::Steps(self.optional_usize(0, 1)?))
            }
        }
    }

    fn select_target(&self) -> ScriptResult<SelectTarget> {
        let Some(first) = self.args.first() else {
            return Err(self.error("missing target"));
        };
        if first.eq_ignore_ascii_case("all") {
            self.max_args(1)?;
            Ok(SelectTarget::All)
        } else if first.eq_ignore_ascii_case("none") {
            self.max_args(1)?;
            Ok(SelectTarget::None)
        } else if first.eq_ignore_ascii_case("shape") {
            self.max_args(3)?;
            Ok(SelectTarget::Shape {
                name: self.required(1, "shape name")?.to_owned(),
                tolerance: self.optional_f64(2, DEFAULT_MOVE_TOLERANCE)?,
            })
        } else {
            self.args
                .iter()
                .map(|text| {
                    text.parse::<u32>()
                        .map_err(|_| self.error(format!("invalid vertex index '{text}'")))
                })
                .collect::<ScriptResult<Vec<u32>>>()
                .map(SelectTarget::Indices)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rig_types::{Point3, RigMesh};

    fn parse_one(line: &str) -> Command {
        let script = CommandScript::parse(line).unwrap();
        assert_eq!(script.len(), 1);
        script.commands()[0].1.clone()
    }

    fn parse_err(source: &str) -> (usize, String) {
        match CommandScript::parse(source).unwrap_err() {
            ScriptError::Parse { line, message } => (line, message),
            ScriptError::UnknownCommand { line, command } => (line, command),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn parses_every_capability() {
        let source = "
            Add A 0.5
            AddCorrected A_B
            GrowSelection 2
            Interp B -1
            OverrideCorrector A_B
            ResetState
            SaveDelta C
            Select 0 1 2
            SelectHalf left
            SetState A
            ShrinkSelection
            DeleteDelta C
            Translate 0 0.5 -1
            GetMesh
            PrintSel
            VisualiseSel 3
        ";
        let script = CommandScript::parse(source).unwrap();
        let capabilities: Vec<_> = script
            .commands()
            .iter()
            .map(|(_, command)| command.capability())
            .collect();
        assert_eq!(capabilities, Capability::ALL);
    }

    #[test]
    fn argument_defaults() {
        assert_eq!(
            parse_one("add Smile"),
            Command::Add {
                shape: "Smile".to_string(),
                amount: 1.0
            }
        );
        assert_eq!(
            parse_one("GrowSelection"),
            Command::GrowSelection(Growth::Steps(1))
        );
        assert_eq!(
            parse_one("ShrinkSelection 3"),
            Command::ShrinkSelection { steps: 3 }
        );
        assert_eq!(
            parse_one("Select shape Smile"),
            Command::Select(SelectTarget::Shape {
                name: "Smile".to_string(),
                tolerance: DEFAULT_MOVE_TOLERANCE
            })
        );
    }

    #[test]
    fn soft_growth() {
        let Command::GrowSelection(Growth::Soft(params)) = parse_one("GrowSelection soft 0.25 DOME")
        else {
            panic!("expected soft growth");
        };
        assert_eq!(params.max_distance, 0.25);
        assert_eq!(params.falloff, Falloff::Dome);

        let Command::GrowSelection(Growth::Soft(params)) = parse_one("GrowSelection soft 1") else {
            panic!("expected soft growth");
        };
        assert_eq!(params.falloff, Falloff::Bell);
    }

    #[test]
    fn comments_and_blank_lines() {
        let script = CommandScript::parse("# header\n\n  ResetState # trailing\n#only").unwrap();
        assert_eq!(script.len(), 1);
        assert_eq!(script.commands()[0].0, 3);
    }

    #[test]
    fn errors_carry_line_numbers() {
        assert_eq!(parse_err("ResetState\nFly away"), (2, "Fly".to_string()));

        let (line, message) = parse_err("\n\nAdd");
        assert_eq!(line, 3);
        assert!(message.contains("missing shape name"));

        let (line, message) = parse_err("Translate 1 x 2");
        assert_eq!(line, 1);
        assert!(message.contains("invalid number 'x'"));

        let (_, message) = parse_err("SelectHalf up");
        assert!(message.contains("unknown side"));

        let (_, message) = parse_err("GrowSelection soft 1 wobbly");
        assert!(message.contains("unknown falloff"));

        let (_, message) = parse_err("ResetState now");
        assert!(message.contains("at most 0"));

        let (_, message) = parse_err("Select 1 -2");
        assert!(message.contains("invalid vertex index '-2'"));
    }

    #[test]
    fn load_missing_file() {
        let err = CommandScript::load("/nonexistent/dir/script.txt").unwrap_err();
        assert!(matches!(err, ScriptError::Io { .. }));
    }

    #[test]
    fn run_applies_commands() {
        let mut mesh = RigMesh::new(
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
            vec![],
        );
        mesh.add_shape("Lift").unwrap().positions[1].z = 2.0;

        let mut script = CommandScript::parse(
            "Select 1
             Add Lift 0.5
             Translate 1 0 0
             SaveDelta Out",
        )
        .unwrap();
        let mut ctx = ScriptContext::new(&mut mesh);
        script.run(&mut ctx).unwrap();

        let out = &mesh.shape("Out").unwrap().positions;
        assert_relative_eq!(out[1], Point3::new(2.0, 0.0, 1.0));
        assert_eq!(out[0], Point3::origin());
    }

    #[test]
    fn run_reports_failing_line() {
        let mut mesh = RigMesh::new(vec![Point3::origin()], vec![]);
        let mut script = CommandScript::parse("Select all\n\nSetState Missing").unwrap();
        let mut ctx = ScriptContext::new(&mut mesh);

        let err = script.run(&mut ctx).unwrap_err();
        let ScriptError::Command {
            line,
            command,
            source,
        } = err
        else {
            panic!("expected command error");
        };
        assert_eq!(line, 3);
        assert_eq!(command, "SetState");
        assert!(matches!(*source, ScriptError::ShapeNotFound { .. }));
    }

    #[test]
    fn oversized_grow_finishes_on_saturated_mesh() {
        let mut mesh = RigMesh::new(
            vec![
                Point3::origin(),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        let mut script = CommandScript::parse(
            "Select 0
             GrowSelection 18446744073709551615
             ShrinkSelection 18446744073709551615",
        )
        .unwrap();
        let mut ctx = ScriptContext::new(&mut mesh);
        script.run(&mut ctx).unwrap();
        assert_eq!(ctx.selection().len(), 3);
    }
}
