//! Disableable resolution features

use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolution stage that an accessor (or a whole interface) may switch off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// `${...}` expansion of keys and values
    VariableExpansion,
    /// printf-style formatting of values against call arguments
    ParameterFormatting,
}

impl Feature {
    const fn bit(self) -> u8 {
        match self {
            Feature::VariableExpansion => 0b01,
            Feature::ParameterFormatting => 0b10,
        }
    }

    /// All features, in declaration order.
    pub const ALL: [Feature; 2] = [Feature::VariableExpansion, Feature::ParameterFormatting];
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::VariableExpansion => f.write_str("variable_expansion"),
            Feature::ParameterFormatting => f.write_str("parameter_formatting"),
        }
    }
}

/// The set of features disabled for an accessor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FeatureSet(u8);

impl FeatureSet {
    /// An empty set: every feature enabled.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Add a feature to the set.
    pub fn insert(&mut self, feature: Feature) {
        self.0 |= feature.bit();
    }

    /// Builder-style [`FeatureSet::insert`].
    pub fn with(mut self, feature: Feature) -> Self {
        self.insert(feature);
        self
    }

    pub fn contains(&self, feature: Feature) -> bool {
        self.0 & feature.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Features present in either set.
    pub fn union(self, other: FeatureSet) -> Self {
        Self(self.0 | other.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = Feature> + '_ {
        Feature::ALL.into_iter().filter(|f| self.contains(*f))
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        iter.into_iter().fold(FeatureSet::empty(), FeatureSet::with)
    }
}
