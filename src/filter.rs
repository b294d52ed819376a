//! Edit-operation filters attached to nodes and leafs

use std::fmt;
use std::str::FromStr;

use crate::error::YangError;

/// Edit intent of a node or leaf for one encode call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum YFilter {
    #[default]
    NotSet,
    Read,
    Merge,
    Create,
    Update,
    Replace,
    Remove,
    Delete,
}

impl YFilter {
    /// Wire token, as used in the NETCONF `operation` attribute
    pub fn as_str(self) -> &'static str {
        match self {
            YFilter::NotSet => "not_set",
            YFilter::Read => "read",
            YFilter::Merge => "merge",
            YFilter::Create => "create",
            YFilter::Update => "update",
            YFilter::Replace => "replace",
            YFilter::Remove => "remove",
            YFilter::Delete => "delete",
        }
    }

    pub fn is_set(self) -> bool {
        self != YFilter::NotSet
    }

    /// Whether the filter must be rendered as an XML `operation` attribute.
    /// `merge` is the NETCONF default and is never rendered.
    pub fn is_wire_visible(self) -> bool {
        !matches!(self, YFilter::NotSet | YFilter::Merge)
    }
}

impl fmt::Display for YFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for YFilter {
    type Err = YangError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_set" => Ok(YFilter::NotSet),
            "read" => Ok(YFilter::Read),
            "merge" => Ok(YFilter::Merge),
            "create" => Ok(YFilter::Create),
            "update" => Ok(YFilter::Update),
            "replace" => Ok(YFilter::Replace),
            "remove" => Ok(YFilter::Remove),
            "delete" => Ok(YFilter::Delete),
            other => Err(YangError::invalid_argument(format!(
                "unknown filter '{}'",
                other
            ))),
        }
    }
}
