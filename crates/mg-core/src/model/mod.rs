//! The member model: an immutable description of one declaring type and its annotated
//! members, as handed over by the host's symbol layer.

mod annotation;
mod member;
mod ty;
mod type_model;
mod value;

pub use annotation::*;
pub use member::*;
pub use ty::*;
pub use type_model::*;
pub use value::*;
