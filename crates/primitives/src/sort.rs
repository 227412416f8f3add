use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::index::RecordKey;

/// Display order of a record collection, by index.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum SortDirection {
    #[serde(rename = "asc")]
    #[strum(serialize = "asc")]
    #[cfg_attr(feature = "clap", value(name = "asc"))]
    Ascending,
    #[default]
    #[serde(rename = "desc")]
    #[strum(serialize = "desc")]
    #[cfg_attr(feature = "clap", value(name = "desc"))]
    Descending,
}

impl SortDirection {
    /// Query-string form (`asc` / `desc`).
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Compare two keys in display order.
    pub fn compare(&self, a: &RecordKey, b: &RecordKey) -> Ordering {
        match self {
            Self::Ascending => a.cmp(b),
            Self::Descending => b.cmp(a),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_forms() {
        assert_eq!(SortDirection::Ascending.as_str(), "asc");
        assert_eq!("desc".parse::<SortDirection>().unwrap(), SortDirection::Descending);
        assert_eq!(
            serde_json::to_string(&SortDirection::Ascending).unwrap(),
            "\"asc\""
        );
        assert_eq!(SortDirection::default(), SortDirection::Descending);
    }

    #[test]
    fn compare_follows_direction() {
        let low = RecordKey::Indexed(1);
        let high = RecordKey::Indexed(2);
        assert_eq!(SortDirection::Ascending.compare(&low, &high), Ordering::Less);
        assert_eq!(SortDirection::Descending.compare(&low, &high), Ordering::Greater);
    }
}
