//! Built-in monoids over [ScanNumeric](crate::numeric::ScanNumeric) elements.

mod bitwise;
mod max;
mod min;
mod prod;
mod sum;

pub use bitwise::*;
pub use max::*;
pub use min::*;
pub use prod::*;
pub use sum::*;
