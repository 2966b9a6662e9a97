//! Entity definition helpers
//!
//! See [`impl_entity!`](crate::impl_entity).

mod macros;
