use crate::engine::Languages;
use crate::Args;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub languages: Languages,
    pub confidence_threshold: f32,
    pub max_file_size: usize,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            languages: Languages {
                primary: args.primary_language,
                secondary: args.secondary_language,
            },
            confidence_threshold: args.confidence_threshold,
            max_file_size: args.max_file_size,
        }
    }
}
