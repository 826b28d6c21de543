//! Validation of a whole set of shape names.

use hashbrown::HashSet;
use tracing::warn;

use crate::error::{NameError, NameResult};
use crate::grammar::{component_set, is_valid_shape_name, rank};

/// Check every name against the grammar, stopping at the first failure.
///
/// # Errors
///
/// Returns [`NameError::InvalidName`] for the first name that breaks the
/// grammar.
///
/// # Example
///
/// ```
/// use rig_names::{validate_names, NameError};
///
/// assert!(validate_names(["JawOpen", "Smile", "JawOpen_Smile"]).is_ok());
///
/// let err = validate_names(["JawOpen", "Smile 2", "Bad-"]).unwrap_err();
/// assert_eq!(err, NameError::InvalidName { name: "Smile 2".into() });
/// ```
pub fn validate_names<'a, I>(names: I) -> NameResult<()>
where
    I: IntoIterator<Item = &'a str>,
{
    for name in names {
        if !is_valid_shape_name(name) {
            warn!(name, "Invalid shape name");
            return Err(NameError::InvalidName {
                name: name.to_owned(),
            });
        }
    }
    Ok(())
}

/// Reject correctives that reduce to the same set of base components.
///
/// Every unordered pair of rank 2+ names is compared by component set
/// (order and case ignored). Base shapes are never compared. The first
/// ambiguous pair found is reported in input order.
///
/// # Errors
///
/// Returns [`NameError::AmbiguousCorrectives`] naming both shapes.
///
/// # Example
///
/// ```
/// use rig_names::{check_redundancy, NameError};
///
/// assert!(check_redundancy(["A", "B", "A_B", "A_B_C"]).is_ok());
///
/// let err = check_redundancy(["X_Y", "Y_X"]).unwrap_err();
/// assert_eq!(
///     err,
///     NameError::AmbiguousCorrectives { first: "X_Y".into(), second: "Y_X".into() }
/// );
/// ```
pub fn check_redundancy<'a, I>(names: I) -> NameResult<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let correctives: Vec<(&str, HashSet<String>)> = names
        .into_iter()
        .filter(|name| rank(name) >= 2)
        .map(|name| (name, component_set(name)))
        .collect();

    for (i, (first, first_set)) in correctives.iter().enumerate() {
        for (second, second_set) in &correctives[i + 1..] {
            if first_set == second_set {
                warn!(first, second, "Ambiguous corrective shapes");
                return Err(NameError::AmbiguousCorrectives {
                    first: (*first).to_owned(),
                    second: (*second).to_owned(),
                });
            }
        }
    }
    Ok(())
}
