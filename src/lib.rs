pub mod error;
pub mod interpolation;
pub mod output;
pub mod polynomial;
pub mod rational;
pub mod recover;
pub mod share;
pub mod sss;

pub use error::*;
pub use interpolation::*;
pub use polynomial::*;
pub use rational::*;
pub use recover::*;
pub use share::*;
pub use sss::*;
