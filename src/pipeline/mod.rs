pub mod extract;
pub mod substitute;
pub mod transform;

pub use extract::extract;
pub use substitute::substitute;
pub use transform::transform;
