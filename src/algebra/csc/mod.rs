#![allow(non_snake_case)]

mod core;
pub use self::core::*;
mod matrix_math;
pub use matrix_math::*;
mod permute;
pub use permute::*;
mod random;
pub use random::*;
