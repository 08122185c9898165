//! Ordered, validated set of bodies taking part in a run.
//!
//! The position of a body inside its [`BodySet`] is its index in every output:
//! condensed vectors, square matrices, CSV columns. A set is resolved once against
//! a [`PositionOracle`] and then only read.

use std::{fmt, ops::Index};

use itertools::Itertools;

use crate::{
    condensed::condensed_len,
    constants::BodyCode,
    jpl_ephem::PositionOracle,
    syzygy_errors::SyzygyError,
};

/// A body resolved against a position oracle.
///
/// `name` is the identifier the user asked for (e.g. `"JUPITER_BARYCENTER"`),
/// `code` is whatever handle the oracle returned for it (a NAIF id for SPK kernels).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Body {
    name: String,
    code: BodyCode,
}

impl Body {
    pub fn new(name: impl Into<String>, code: BodyCode) -> Self {
        Body {
            name: name.into(),
            code,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> BodyCode {
        self.code
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Fixed-size, ordered, duplicate-free list of at least two bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct BodySet {
    bodies: Vec<Body>,
}

impl BodySet {
    /// Build a set from already resolved bodies.
    ///
    /// Arguments
    /// -----------------
    /// * `bodies`: bodies in output order.
    ///
    /// Return
    /// ----------
    /// * The set, or [`SyzygyError::InvalidParameters`] with fewer than two bodies,
    ///   or [`SyzygyError::DuplicateBody`] when a name appears twice.
    pub fn new(bodies: Vec<Body>) -> Result<Self, SyzygyError> {
        if bodies.len() < 2 {
            return Err(SyzygyError::InvalidParameters(format!(
                "at least two bodies are required, got {}",
                bodies.len()
            )));
        }

        if let Some(dup) = bodies.iter().map(Body::name).duplicates().next() {
            return Err(SyzygyError::DuplicateBody(dup.to_string()));
        }

        Ok(BodySet { bodies })
    }

    /// Resolve every name against `oracle`, keeping the order of `names`.
    ///
    /// See also
    /// ------------
    /// * [`PositionOracle::resolve`] – per-name resolution.
    pub fn resolve<O, S>(oracle: &O, names: &[S]) -> Result<Self, SyzygyError>
    where
        O: PositionOracle + ?Sized,
        S: AsRef<str>,
    {
        let bodies = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                oracle
                    .resolve(name)
                    .map_err(|cause| SyzygyError::BodyResolution {
                        name: name.to_string(),
                        cause,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        BodySet::new(bodies)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Always `false`: a set holds at least two bodies.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Length of the condensed distance vector for this set, `N·(N−1)/2`.
    pub fn n_pairs(&self) -> usize {
        condensed_len(self.len())
    }

    pub fn first(&self) -> &Body {
        &self.bodies[0]
    }

    pub fn get(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Body> {
        self.bodies.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.bodies.iter().map(Body::name).collect()
    }

    /// Index of the body called `name`, if it belongs to the set.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.bodies.iter().position(|b| b.name == name)
    }
}

impl Index<usize> for BodySet {
    type Output = Body;

    fn index(&self, index: usize) -> &Self::Output {
        &self.bodies[index]
    }
}

impl<'a> IntoIterator for &'a BodySet {
    type Item = &'a Body;
    type IntoIter = std::slice::Iter<'a, Body>;

    fn into_iter(self) -> Self::IntoIter {
        self.bodies.iter()
    }
}
