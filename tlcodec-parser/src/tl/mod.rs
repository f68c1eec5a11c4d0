//! The schema AST.

mod definition;
mod parameter;
mod ty;

pub use definition::Definition;
pub use parameter::{Flag, Parameter, ParameterType};
pub use ty::Type;

/// Whether a [`Definition`] is a data constructor or an RPC method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Before `---functions---`.
    Types,
    /// After `---functions---`.
    Functions,
}
