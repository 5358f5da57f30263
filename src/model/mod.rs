mod model;
pub use model::*;

mod display;
pub use display::*;

#[cfg(test)]
mod test_model;

#[cfg(test)]
mod test_display;
