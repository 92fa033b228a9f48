pub mod cargo_env {
    pub const CARGO_PKG_NAME: &str = env!("CARGO_PKG_NAME");
}

pub mod defaults {
    pub const SEED: u64 = 0x5EED;
    /// Bounds of the times drawn by `SolveTimeRng`, in milliseconds.
    pub const RNG_MIN_MS: u64 = 5_000;
    pub const RNG_MAX_MS: u64 = 60_000;
}

pub mod env {
    /// Prefix of environment variables read into the runner settings.
    pub const SETTINGS_PREFIX: &str = "STACKCHECK";
}
