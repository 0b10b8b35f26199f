pub mod error;
pub mod library;
pub mod model;

pub use error::ChartError;
pub use library::{LoadedSong, SongEntry, SongLibrary};
pub use model::{ChartFile, ChartNote, SongMeta};
