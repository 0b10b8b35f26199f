pub mod audio;
pub mod chart;
pub mod chartgen;
pub mod config;
pub mod input;
pub mod model;
pub mod play;
pub mod traits;
pub mod util;

#[cfg(test)]
mod test_utils;
