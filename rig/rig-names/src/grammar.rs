//! Shape-name grammar, rank, and sub-shape enumeration.

use std::fmt;
use std::iter::FusedIterator;
use std::str::FromStr;

use hashbrown::HashSet;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{NameError, NameResult};

/// Separator between the base components of a name.
pub const SEPARATOR: char = '_';

/// Maximum number of components in a name.
pub const MAX_SEGMENTS: usize = 50;

/// Maximum number of letters in one component.
pub const MAX_LETTERS: usize = 100;

/// Maximum number of trailing digits in one component.
pub const MAX_DIGITS: usize = 100;

/// Number of components in a name.
///
/// The rank is computed from the raw text and does not validate it.
///
/// # Example
///
/// ```
/// use rig_names::rank;
///
/// assert_eq!(rank("A"), 1);
/// assert_eq!(rank("A_B"), 2);
/// assert_eq!(rank("A_B_C"), 3);
/// ```
#[must_use]
pub fn rank(name: &str) -> usize {
    name.split(SEPARATOR).count()
}

/// Iterate over the `_`-separated components of a name.
pub fn components(name: &str) -> impl Iterator<Item = &str> + Clone + '_ {
    name.split(SEPARATOR)
}

/// The lower-cased set of components of a name.
///
/// Two names with equal component sets address the same combination of
/// base shapes regardless of component order or case.
///
/// # Example
///
/// ```
/// use rig_names::component_set;
///
/// assert_eq!(component_set("Smile_JawOpen"), component_set("jawopen_SMILE"));
/// ```
#[must_use]
pub fn component_set(name: &str) -> HashSet<String> {
    components(name).map(str::to_ascii_lowercase).collect()
}

/// A component is letters then digits, within the length limits.
#[allow(clippy::expect_used)]
fn is_valid_component(component: &str) -> bool {
    lazy_static! {
        static ref COMPONENT_REGEX: Regex =
            Regex::new(r"^[A-Za-z]{1,100}[0-9]{0,100}$").expect("bad regex");
    }
    COMPONENT_REGEX.is_match(component)
}

/// Check a name against the shape grammar.
///
/// # Example
///
/// ```
/// use rig_names::is_valid_shape_name;
///
/// assert!(is_valid_shape_name("CloseLid25_CloseLidLo12"));
/// assert!(!is_valid_shape_name("12Lid"));
/// assert!(!is_valid_shape_name("A__B"));
/// ```
#[must_use]
pub fn is_valid_shape_name(name: &str) -> bool {
    let mut count = 0;
    for component in components(name) {
        count += 1;
        if count > MAX_SEGMENTS || !is_valid_component(component) {
            return false;
        }
    }
    true
}

/// A valid name with at least two components.
#[must_use]
pub fn is_corrective_name(name: &str) -> bool {
    name.contains(SEPARATOR) && is_valid_shape_name(name)
}

/// Enumerate the names of every sub-shape a corrective depends on.
///
/// For a rank-N corrective this yields one name per non-empty proper subset
/// of its components, 2^N - 2 names in total. Components inside a yielded
/// name keep the order they have in `name`, so generated names match shapes
/// authored with the same ordering. Names that are not correctives yield
/// nothing.
///
/// The iterator is lazy and [`Clone`], so a clone restarts from wherever the
/// original was cloned.
///
/// # Example
///
/// ```
/// use rig_names::sub_shape_names;
///
/// let subs: Vec<String> = sub_shape_names("A_B").collect();
/// assert_eq!(subs.len(), 2);
/// assert!(sub_shape_names("A").next().is_none());
/// ```
#[must_use]
pub fn sub_shape_names(name: &str) -> SubShapeNames<'_> {
    if !is_corrective_name(name) {
        return SubShapeNames {
            components: Vec::new(),
            mask: 1,
            end: 1,
        };
    }

    let components: Vec<&str> = components(name).collect();
    // MAX_SEGMENTS keeps the shift in range.
    let end = (1_u64 << components.len()) - 1;
    SubShapeNames {
        components,
        mask: 1,
        end,
    }
}

/// Lazy iterator returned by [`sub_shape_names`].
///
/// Bit `i` of the current mask selects component `i`; masks run from 1 up
/// to (but excluding) the full set.
#[derive(Debug, Clone)]
pub struct SubShapeNames<'a> {
    components: Vec<&'a str>,
    mask: u64,
    end: u64,
}

impl Iterator for SubShapeNames<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.mask >= self.end {
            return None;
        }
        let mask = self.mask;
        self.mask += 1;

        let mut name = String::new();
        for (i, component) in self.components.iter().enumerate() {
            if mask & (1 << i) != 0 {
                if !name.is_empty() {
                    name.push(SEPARATOR);
                }
                name.push_str(component);
            }
        }
        Some(name)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.end.saturating_sub(self.mask)).ok();
        (remaining.unwrap_or(usize::MAX), remaining)
    }
}

impl FusedIterator for SubShapeNames<'_> {}

/// A shape name that is known to satisfy the grammar.
///
/// # Example
///
/// ```
/// use rig_names::ShapeName;
///
/// let name = ShapeName::parse("JawOpen_Smile").unwrap();
/// assert_eq!(name.rank(), 2);
/// assert!(name.is_corrective());
/// assert!(ShapeName::parse("Jaw Open").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeName(String);

impl ShapeName {
    /// Validate and wrap a name.
    ///
    /// # Errors
    ///
    /// Returns [`NameError::InvalidName`] if the name breaks the grammar.
    pub fn parse(name: impl Into<String>) -> NameResult<Self> {
        let name = name.into();
        if is_valid_shape_name(&name) {
            Ok(Self(name))
        } else {
            Err(NameError::InvalidName { name })
        }
    }

    /// The name as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of components.
    #[must_use]
    pub fn rank(&self) -> usize {
        rank(&self.0)
    }

    /// Whether this name has two or more components.
    #[must_use]
    pub fn is_corrective(&self) -> bool {
        self.0.contains(SEPARATOR)
    }

    /// Iterate over the components.
    pub fn components(&self) -> impl Iterator<Item = &str> + Clone + '_ {
        components(&self.0)
    }

    /// Names of every sub-shape, see [`sub_shape_names`].
    #[must_use]
    pub fn sub_shapes(&self) -> SubShapeNames<'_> {
        sub_shape_names(&self.0)
    }

    /// Consume into the inner string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ShapeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShapeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ShapeName {
    type Err = NameError;

    fn from_str(s: &str) -> NameResult<Self> {
        Self::parse(s)
    }
}
