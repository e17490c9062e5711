use std::fmt::{self, Display};

///
/// IndexDescriptor
///
/// Declared index over one attribute or an ordered attribute tuple.
/// Immutable once registered; composite order is the declaration order.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct IndexDescriptor {
    owner_type: String,
    attribute_names: Vec<String>,
    case_insensitive: bool,
}

impl IndexDescriptor {
    /// Build a descriptor without validation; [`IndexRegistry`](crate::registry::IndexRegistry)
    /// validates on registration.
    #[must_use]
    pub fn new(owner_type: &str, attribute_names: &[&str], case_insensitive: bool) -> Self {
        Self {
            owner_type: owner_type.to_string(),
            attribute_names: attribute_names.iter().map(ToString::to_string).collect(),
            case_insensitive,
        }
    }

    #[must_use]
    pub fn owner_type(&self) -> &str {
        &self.owner_type
    }

    #[must_use]
    pub fn attribute_names(&self) -> &[String] {
        &self.attribute_names
    }

    #[must_use]
    pub const fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.attribute_names.len() > 1
    }

    /// Whether `attribute_names` names this index, in declaration order.
    #[must_use]
    pub fn matches(&self, attribute_names: &[&str]) -> bool {
        self.attribute_names.len() == attribute_names.len()
            && self
                .attribute_names
                .iter()
                .zip(attribute_names)
                .all(|(declared, given)| declared == given)
    }

    /// Borrowed attribute names, for key construction.
    #[must_use]
    pub fn attribute_refs(&self) -> Vec<&str> {
        self.attribute_names.iter().map(String::as_str).collect()
    }
}

impl Display for IndexDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.attribute_names.join(", ");

        if self.case_insensitive {
            write!(f, "{}({}) CI", self.owner_type, fields)
        } else {
            write!(f, "{}({})", self.owner_type, fields)
        }
    }
}
