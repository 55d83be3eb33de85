mod loader;

pub use loader::{
    Config, HttpSettings, LrclibConfig, MusixmatchConfig, SourcesConfig, USERTOKEN_ENV,
};
