use clap::ValueEnum;

/// Target platform environment
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum Platform {
    /// Browser environment; prefers `browser` package fields
    #[value(name = "browser")]
    Browser,

    /// Node.js environment; prefers `node` export conditions
    #[value(name = "node")]
    Node,

    /// No platform specific resolution
    #[value(name = "neutral")]
    Neutral,
}
