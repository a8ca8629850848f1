//! # Filter Descriptors
//!
//! A [`FilterDescriptor`] is a boolean expression tree rendered to
//! parenthesized predicate text. Leaves compare a field handle against a
//! literal value or against nullness; AND/OR wrap their joined children in
//! parentheses, NOT prefixes.
//!
//! Comparisons exist in both operand orders: field-first as methods on
//! [`Field`], value-first as the free functions in this module, which
//! reverse `<`/`>` so `lt(5, &age)` means `age > 5`.
//!
//! Optional-valued comparisons fold absence into nullness: `eq_opt(None)`
//! renders `IS NULL`, `ne_opt(None)` renders `IS NOT NULL`, and a present
//! value compares normally.
//!
//! A comparison value the codec cannot render (a list inside a list) does
//! not panic: the leaf renders as an always-false predicate and records the
//! defect, which [`validate`](FilterDescriptor::validate) reports when the
//! descriptor is actually used in a query.
//!
//! The `&`, `|` and `!` operators mirror the composition functions.

use crate::error::DbError;
use crate::schema::Field;
use crate::types::{codec, Value};
use eyre::Result;
use std::marker::PhantomData;

/// A rendered boolean predicate over one record type.
#[derive(Debug, Clone)]
pub struct FilterDescriptor<O> {
    sql: String,
    defect: Option<String>,
    _record: PhantomData<fn() -> O>,
}

impl<O> FilterDescriptor<O> {
    /// Wraps already-rendered predicate text. Escape hatch; the caller is
    /// responsible for the text being well-formed and safe.
    pub fn custom(sql: impl Into<String>) -> Self {
        FilterDescriptor {
            sql: sql.into(),
            defect: None,
            _record: PhantomData,
        }
    }

    fn unrenderable(detail: String) -> Self {
        FilterDescriptor {
            sql: "0".to_string(),
            defect: Some(detail),
            _record: PhantomData,
        }
    }

    /// Rendered predicate text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Fails when any comparison value in this tree could not be rendered
    /// as a literal. The façade checks this before splicing the predicate
    /// into a statement.
    pub fn validate(&self) -> Result<()> {
        match &self.defect {
            None => Ok(()),
            Some(detail) => Err(DbError::UnsupportedType(detail.clone()).into()),
        }
    }

    fn compose(self, other: Self, sql: String) -> Self {
        FilterDescriptor {
            sql,
            defect: self.defect.or(other.defect),
            _record: PhantomData,
        }
    }

    pub fn and(self, other: Self) -> Self {
        let sql = format!("({} AND {})", self.sql, other.sql);
        self.compose(other, sql)
    }

    pub fn or(self, other: Self) -> Self {
        let sql = format!("({} OR {})", self.sql, other.sql);
        self.compose(other, sql)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        FilterDescriptor {
            sql: format!("NOT {}", self.sql),
            defect: self.defect,
            _record: PhantomData,
        }
    }
}

impl<O> std::ops::BitAnd for FilterDescriptor<O> {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        self.and(rhs)
    }
}

impl<O> std::ops::BitOr for FilterDescriptor<O> {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.or(rhs)
    }
}

impl<O> std::ops::Not for FilterDescriptor<O> {
    type Output = Self;
    fn not(self) -> Self {
        FilterDescriptor::not(self)
    }
}

fn comparison<O>(name: &str, operator: &str, value: Value) -> FilterDescriptor<O> {
    match codec::literal(&value) {
        Ok(literal) => FilterDescriptor::custom(format!("{name} {operator} {literal}")),
        Err(e) => FilterDescriptor::unrenderable(format!(
            "value compared against '{name}' cannot be rendered as a literal: {e}"
        )),
    }
}

impl<O> Field<O> {
    /// `field = value`
    pub fn eq(&self, value: impl Into<Value>) -> FilterDescriptor<O> {
        comparison(self.name(), "=", value.into())
    }

    /// `NOT field = value`
    pub fn ne(&self, value: impl Into<Value>) -> FilterDescriptor<O> {
        self.eq(value).not()
    }

    /// `field < value`
    pub fn lt(&self, value: impl Into<Value>) -> FilterDescriptor<O> {
        comparison(self.name(), "<", value.into())
    }

    /// `field > value`
    pub fn gt(&self, value: impl Into<Value>) -> FilterDescriptor<O> {
        comparison(self.name(), ">", value.into())
    }

    /// `field IS NULL`
    pub fn is_null(&self) -> FilterDescriptor<O> {
        FilterDescriptor::custom(format!("{} IS NULL", self.name()))
    }

    /// `field IS NOT NULL`
    pub fn is_not_null(&self) -> FilterDescriptor<O> {
        FilterDescriptor::custom(format!("{} IS NOT NULL", self.name()))
    }

    /// Equality against an optional: absence folds into `IS NULL`.
    pub fn eq_opt<V: Into<Value>>(&self, value: Option<V>) -> FilterDescriptor<O> {
        match value {
            Some(value) => self.eq(value),
            None => self.is_null(),
        }
    }

    /// Inequality against an optional: absence folds into `IS NOT NULL`.
    pub fn ne_opt<V: Into<Value>>(&self, value: Option<V>) -> FilterDescriptor<O> {
        match value {
            Some(value) => self.ne(value),
            None => self.is_not_null(),
        }
    }
}

/// `value = field`
pub fn eq<O>(value: impl Into<Value>, field: &Field<O>) -> FilterDescriptor<O> {
    field.eq(value)
}

/// `NOT field = value`, value-first.
pub fn ne<O>(value: impl Into<Value>, field: &Field<O>) -> FilterDescriptor<O> {
    field.ne(value)
}

/// `value < field`, which renders as `field > value`.
pub fn lt<O>(value: impl Into<Value>, field: &Field<O>) -> FilterDescriptor<O> {
    field.gt(value)
}

/// `value > field`, which renders as `field < value`.
pub fn gt<O>(value: impl Into<Value>, field: &Field<O>) -> FilterDescriptor<O> {
    field.lt(value)
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
            .nullable_field("rating", DataType::Int8)
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

    fn rating() -> Field<Track> {
        Field::resolve(&TRACK, "rating")
    }

    #[test]
    fn comparison_leaves_render_field_operator_literal() {
        assert_eq!(title().eq("intro").sql(), "title = \"intro\"");
        assert_eq!(length().lt(300i32).sql(), "length < 300");
        assert_eq!(length().gt(60i32).sql(), "length > 60");
        assert_eq!(length().ne(0i32).sql(), "NOT length = 0");
    }

    #[test]
    fn value_first_forms_reverse_the_ordering_operators() {
        assert_eq!(lt(300i32, &length()).sql(), "length > 300");
        assert_eq!(gt(300i32, &length()).sql(), "length < 300");
        assert_eq!(eq("x", &title()).sql(), "title = \"x\"");
        assert_eq!(ne("x", &title()).sql(), "NOT title = \"x\"");
    }

    #[test]
    fn optional_comparisons_fold_absence_into_nullness() {
        assert_eq!(rating().eq_opt(None::<i8>).sql(), "rating IS NULL");
        assert_eq!(rating().ne_opt(None::<i8>).sql(), "rating IS NOT NULL");
        assert_eq!(rating().eq_opt(Some(5i8)).sql(), "rating = 5");
        assert_eq!(rating().ne_opt(Some(5i8)).sql(), "NOT rating = 5");
    }

    #[test]
    fn composition_parenthesizes_fully() {
        let filter = (title().eq("x") & length().lt(10i32)) | !rating().is_null();
        assert_eq!(
            filter.sql(),
            "((title = \"x\" AND length < 10) OR NOT rating IS NULL)"
        );
    }

    #[test]
    fn unrenderable_comparison_value_is_reported_by_validate() {
        // A list inside a list has no literal form.
        let filter = title().eq(vec![vec![1i32]]);
        assert_eq!(filter.sql(), "0");
        let err = filter.validate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DbError>(),
            Some(DbError::UnsupportedType(_))
        ));

        // Composition keeps the defect; a clean tree validates fine.
        assert!((filter & length().lt(10i32)).validate().is_err());
        assert!(length().lt(10i32).validate().is_ok());
    }

    #[test]
    fn comparison_values_are_escaped_like_any_literal() {
        assert_eq!(
            title().eq("a b\"c").sql(),
            "title = \"a%20b%22c\""
        );
    }
}
