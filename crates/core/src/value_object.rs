//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value** - they have no
/// identity of their own. `EmailAddress` or `CustomerNumber` are value
/// objects; a `Customer` is not.
///
/// Construction goes through an explicit fallible factory (`parse`/`create`
/// returning an outcome). There is deliberately no implicit conversion from
/// primitives: a conversion that can fail must say so in its signature.
///
/// To "modify" a value object, create a new one. This keeps them safe to
/// share and lets them behave like primitives (copied, compared, hashed).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
