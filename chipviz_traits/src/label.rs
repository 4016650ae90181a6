use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Identity of a cluster or class as it shows up in the toolchain outputs.
///
/// Ordering puts every integer label before every text label, integers by value
/// and texts lexicographically, so palettes are stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClusterLabel {
    Integer(i64),
    Text(String),
}

impl ClusterLabel {
    /// Label of a real valued cluster field. Finite values are truncated
    /// toward zero, anything else keeps its textual form.
    pub fn from_real(value: f64) -> Self {
        if value.is_finite() && value.abs() < i64::MAX as f64 {
            ClusterLabel::Integer(value.trunc() as i64)
        } else {
            ClusterLabel::Text(value.to_string())
        }
    }

    /// Builds the palette index of each distinct label, in label order.
    pub fn palette<'a, I>(labels: I) -> BTreeMap<ClusterLabel, usize>
    where
        I: IntoIterator<Item = &'a ClusterLabel>,
    {
        let mut palette: BTreeMap<ClusterLabel, usize> =
            labels.into_iter().map(|l| (l.clone(), 0)).collect();
        for (index, slot) in palette.values_mut().enumerate() {
            *slot = index;
        }
        palette
    }
}

impl Display for ClusterLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ClusterLabel::Integer(i) => write!(f, "{i}"),
            ClusterLabel::Text(s) => write!(f, "{s}"),
        }
    }
}
