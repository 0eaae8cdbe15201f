mod settings;

pub use settings::{
    Config, IdentitySettings, PreviewSettings, ServerSettings, TomlConfig, EXAMPLE_CONFIG,
};
