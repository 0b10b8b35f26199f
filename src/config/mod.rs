pub mod game_config;

pub use game_config::GameConfig;
