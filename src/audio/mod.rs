pub mod output;

pub use output::KiraOutput;
