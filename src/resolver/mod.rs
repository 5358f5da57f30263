mod resolver;
pub use resolver::*;

#[cfg(test)]
mod test_resolver;
