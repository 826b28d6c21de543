//! Shape-key name grammar and corrective validation.
//!
//! Corrective shapes encode the base shapes they combine in their name:
//! `JawOpen_Smile` is a rank-2 corrective that fires when both `JawOpen`
//! and `Smile` are active. This crate parses that grammar, enumerates the
//! sub-shapes a corrective depends on, and validates a whole shape set.
//!
//! # Grammar
//!
//! A name is 1 to 50 `_`-separated segments. Each segment is 1 to 100 ASCII
//! letters followed by 0 to 100 ASCII digits (`CloseLid25`, `A`, `MouthLo2`).
//! The **rank** of a name is its segment count; rank 1 is a base shape,
//! rank 2 and up is a corrective.
//!
//! # Example
//!
//! ```
//! use rig_names::{rank, sub_shape_names, is_corrective_name};
//!
//! assert_eq!(rank("A_B_C"), 3);
//! assert!(is_corrective_name("JawOpen_Smile"));
//!
//! let mut subs: Vec<String> = sub_shape_names("A_B_C").collect();
//! subs.sort();
//! assert_eq!(subs, ["A", "A_B", "A_C", "B", "B_C", "C"]);
//! ```
//!
//! # Validation
//!
//! ```
//! use rig_names::{check_redundancy, validate_names, NameError};
//!
//! assert!(validate_names(["A", "B", "A_B"]).is_ok());
//! assert!(matches!(
//!     check_redundancy(["A_B", "B_A"]),
//!     Err(NameError::AmbiguousCorrectives { .. })
//! ));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod grammar;
mod validate;

pub use error::{NameError, NameResult};
pub use grammar::{
    component_set, components, is_corrective_name, is_valid_shape_name, rank, sub_shape_names,
    ShapeName, SubShapeNames, MAX_DIGITS, MAX_LETTERS, MAX_SEGMENTS, SEPARATOR,
};
pub use validate::{check_redundancy, validate_names};
