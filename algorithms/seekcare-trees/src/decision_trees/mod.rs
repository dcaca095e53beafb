mod algorithm;
mod dot;
mod hyperparams;
mod iter;
mod render;

pub use algorithm::*;
pub use dot::*;
pub use hyperparams::*;
pub use iter::*;
pub use render::*;
