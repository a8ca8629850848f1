//! # Sort Descriptors
//!
//! An ordered list of (column, direction) pairs rendered to `ORDER BY` text.
//! Ascending is the default; multiple keys are tie-breakers in listed order.

use crate::schema::Field;
use std::marker::PhantomData;

/// Sort direction. Ascending unless asked otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    fn keyword(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// A rendered ordering over one record type.
#[derive(Debug, Clone)]
pub struct SortDescriptor<O> {
    sql: String,
    _record: PhantomData<fn() -> O>,
}

impl<O> SortDescriptor<O> {
    /// Sorts by the given fields, ascending, sharing one direction.
    ///
    /// # Panics
    ///
    /// Panics on an empty field list.
    pub fn by(fields: &[&Field<O>]) -> Self {
        Self::by_with_order(fields, SortOrder::default())
    }

    /// Sorts by the given fields, all sharing `order`.
    ///
    /// # Panics
    ///
    /// Panics on an empty field list.
    pub fn by_with_order(fields: &[&Field<O>], order: SortOrder) -> Self {
        assert!(!fields.is_empty(), "sort descriptor needs at least one field");
        let names: Vec<&str> = fields.iter().map(|f| f.name()).collect();
        SortDescriptor {
            sql: format!("{} {}", names.join(", "), order.keyword()),
            _record: PhantomData,
        }
    }

    /// Appends another descriptor as a lower-priority tie-break key, which
    /// is how per-field directions are expressed.
    pub fn then(self, other: Self) -> Self {
        SortDescriptor {
            sql: format!("{}, {}", self.sql, other.sql),
            _record: PhantomData,
        }
    }

    /// Rendered `ORDER BY` body.
    pub fn sql(&self) -> &str {
        &self.sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RecordSchema;
    use crate::types::DataType;
    use std::sync::LazyLock;

    static TRACK: LazyLock<RecordSchema> = LazyLock::new(|| {
        RecordSchema::builder("Track")
            .field("title", DataType::Text)
            .field("length", DataType::Int32)
            .primary_key("title")
            .build()
    });

    struct Track;

    fn title() -> Field<Track> {
        Field::resolve(&TRACK, "title")
    }

    fn length() -> Field<Track> {
        Field::resolve(&TRACK, "length")
    }

    #[test]
    fn single_field_defaults_to_ascending() {
        assert_eq!(SortDescriptor::by(&[&title()]).sql(), "title ASC");
    }

    #[test]
    fn multiple_fields_share_one_direction() {
        let sort = SortDescriptor::by_with_order(&[&length(), &title()], SortOrder::Descending);
        assert_eq!(sort.sql(), "length, title DESC");
    }

    #[test]
    fn then_chains_per_field_directions() {
        let sort = SortDescriptor::by_with_order(&[&length()], SortOrder::Descending)
            .then(SortDescriptor::by(&[&title()]));
        assert_eq!(sort.sql(), "length DESC, title ASC");
    }
}
