//! Ground-truth authenticity labels supplied by the caller.
//!
//! The feature pipeline never decides who is authentic. It asks a
//! [`LabelSource`] for each user and copies the answer into the feature row.
//! Any relabelling or identifier shuffling used to build experiment datasets
//! happens behind this trait.

use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Whether a rater is genuine or injected.
///
/// Encoded as `1` for authentic and `0` for inauthentic raters.
///
/// # Examples
/// ```
/// use shillscope_core::AuthenticityLabel;
///
/// assert_eq!(u8::from(AuthenticityLabel::Authentic), 1);
/// assert_eq!(AuthenticityLabel::try_from(0), Ok(AuthenticityLabel::Inauthentic));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub enum AuthenticityLabel {
    /// An injected or attack rater.
    Inauthentic,
    /// A genuine rater.
    Authentic,
}

/// Errors returned when decoding an [`AuthenticityLabel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthenticityLabelError {
    /// The encoded value was neither `0` nor `1`.
    #[error("authenticity label must be 0 or 1, got {0}")]
    Unknown(u8),
}

impl TryFrom<u8> for AuthenticityLabel {
    type Error = AuthenticityLabelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Inauthentic),
            1 => Ok(Self::Authentic),
            other => Err(AuthenticityLabelError::Unknown(other)),
        }
    }
}

impl From<AuthenticityLabel> for u8 {
    fn from(label: AuthenticityLabel) -> Self {
        match label {
            AuthenticityLabel::Inauthentic => 0,
            AuthenticityLabel::Authentic => 1,
        }
    }
}

/// Assign an authenticity label to a user.
///
/// Implementations must be thread-safe (`Send` + `Sync`) so labelling can
/// run alongside a threaded feature stage. Any `Fn(u64) -> AuthenticityLabel`
/// closure is a label source.
///
/// # Examples
/// ```
/// use shillscope_core::{AuthenticityLabel, LabelSource};
///
/// let even_are_fake = |user_id: u64| {
///     if user_id % 2 == 0 {
///         AuthenticityLabel::Inauthentic
///     } else {
///         AuthenticityLabel::Authentic
///     }
/// };
/// assert_eq!(even_are_fake.label(4), AuthenticityLabel::Inauthentic);
/// ```
pub trait LabelSource: Send + Sync {
    /// Return the label for `user_id`.
    fn label(&self, user_id: u64) -> AuthenticityLabel;
}

impl<F> LabelSource for F
where
    F: Fn(u64) -> AuthenticityLabel + Send + Sync,
{
    fn label(&self, user_id: u64) -> AuthenticityLabel {
        self(user_id)
    }
}

/// Labels the listed users inauthentic and everyone else authentic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InauthenticUsers {
    ids: BTreeSet<u64>,
}

impl InauthenticUsers {
    /// Build from a set of inauthentic user identifiers.
    #[expect(
        clippy::missing_const_for_fn,
        reason = "label sets are assembled at runtime"
    )]
    #[must_use]
    pub fn new(ids: BTreeSet<u64>) -> Self {
        Self { ids }
    }

    /// Report whether `user_id` is listed.
    #[must_use]
    pub fn contains(&self, user_id: u64) -> bool {
        self.ids.contains(&user_id)
    }

    /// Number of listed users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Report whether no user is listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<u64> for InauthenticUsers {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl LabelSource for InauthenticUsers {
    fn label(&self, user_id: u64) -> AuthenticityLabel {
        if self.contains(user_id) {
            AuthenticityLabel::Inauthentic
        } else {
            AuthenticityLabel::Authentic
        }
    }
}

/// Gives every user the same label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformLabel(pub AuthenticityLabel);

impl LabelSource for UniformLabel {
    fn label(&self, _user_id: u64) -> AuthenticityLabel {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, AuthenticityLabel::Inauthentic)]
    #[case(2, AuthenticityLabel::Authentic)]
    #[case(3, AuthenticityLabel::Inauthentic)]
    fn listed_users_are_inauthentic(#[case] user_id: u64, #[case] expected: AuthenticityLabel) {
        let source: InauthenticUsers = [1, 3].into_iter().collect();
        assert_eq!(source.label(user_id), expected);
    }

    #[rstest]
    fn unknown_encoding_is_rejected() {
        assert_eq!(
            AuthenticityLabel::try_from(2),
            Err(AuthenticityLabelError::Unknown(2))
        );
    }

    #[rstest]
    fn uniform_label_ignores_user() {
        let source = UniformLabel(AuthenticityLabel::Authentic);
        assert_eq!(source.label(42), AuthenticityLabel::Authentic);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn labels_serialise_as_integers() {
        let json = serde_json::to_string(&AuthenticityLabel::Inauthentic).expect("encode label");
        assert_eq!(json, "0");
    }
}
