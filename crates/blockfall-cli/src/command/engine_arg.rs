use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{EngineConfig, GameEngine, PieceGenerator, PieceSeed};
use rand::Rng as _;

use crate::util;

/// Engine settings shared by every mode.
///
/// Values given on the command line override those read from `--config`.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct EngineArg {
    /// JSON file with engine settings; omitted fields keep their defaults
    #[clap(long)]
    config: Option<PathBuf>,
    /// Number of columns
    #[clap(long)]
    width: Option<usize>,
    /// Number of rows
    #[clap(long)]
    height: Option<usize>,
    /// Milliseconds between ticks while the piece falls on its own
    #[clap(long)]
    normal_interval_ms: Option<u64>,
    /// Milliseconds between ticks after a soft drop
    #[clap(long)]
    quick_interval_ms: Option<u64>,
    /// Points per cleared row
    #[clap(long)]
    line_bonus: Option<u64>,
    /// Seed for the piece sequence (32 hex digits)
    #[clap(long)]
    seed: Option<PieceSeed>,
}

impl EngineArg {
    pub(crate) fn load_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file("engine config", path)?,
            None => EngineConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut EngineConfig) {
        let Self {
            config: _,
            width,
            height,
            normal_interval_ms,
            quick_interval_ms,
            line_bonus,
            seed: _,
        } = self;
        if let Some(width) = width {
            config.width = *width;
        }
        if let Some(height) = height {
            config.height = *height;
        }
        if let Some(ms) = normal_interval_ms {
            config.normal_interval_ms = *ms;
        }
        if let Some(ms) = quick_interval_ms {
            config.quick_interval_ms = *ms;
        }
        if let Some(bonus) = line_bonus {
            config.line_bonus = *bonus;
        }
    }

    /// Builds the engine and returns it with the piece seed in use, drawn at random when
    /// `--seed` is omitted.
    pub(crate) fn build_engine(&self) -> anyhow::Result<(GameEngine, PieceSeed)> {
        let config = self.load_config()?;
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        let engine = GameEngine::with_generator(config, PieceGenerator::with_seed(seed))
            .context("Invalid engine configuration")?;
        Ok((engine, seed))
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestArgs {
        #[clap(flatten)]
        engine: EngineArg,
    }

    fn parse(args: &[&str]) -> EngineArg {
        TestArgs::try_parse_from(std::iter::once("test").chain(args.iter().copied()))
            .unwrap()
            .engine
    }

    #[test]
    fn test_defaults_without_flags() {
        let arg = parse(&[]);
        assert_eq!(arg.load_config().unwrap(), EngineConfig::default());
        assert_eq!(arg.seed, None);
    }

    #[test]
    fn test_flags_override_defaults() {
        let arg = parse(&[
            "--width",
            "12",
            "--line-bonus",
            "5",
            "--seed",
            "0123456789abcdef0123456789abcdef",
        ]);
        let config = arg.load_config().unwrap();
        assert_eq!(config.width, 12);
        assert_eq!(config.height, 15);
        assert_eq!(config.line_bonus, 5);
        assert_eq!(
            arg.seed.unwrap().to_string(),
            "0123456789abcdef0123456789abcdef"
        );
    }

    #[test]
    fn test_build_engine_reports_seed_in_use() {
        let seed = "0123456789abcdef0123456789abcdef";
        let (engine, used) = parse(&["--seed", seed]).build_engine().unwrap();
        assert_eq!(used.to_string(), seed);

        let mut replay =
            GameEngine::with_generator(EngineConfig::default(), PieceGenerator::with_seed(used))
                .unwrap();
        assert_eq!(replay.snapshot(), engine.snapshot());

        let (engine, drawn) = parse(&[]).build_engine().unwrap();
        replay =
            GameEngine::with_generator(EngineConfig::default(), PieceGenerator::with_seed(drawn))
                .unwrap();
        assert_eq!(replay.snapshot(), engine.snapshot());
    }

    #[test]
    fn test_rejects_malformed_seed() {
        let result = TestArgs::try_parse_from(["test", "--seed", "xyz"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let path = env::temp_dir().join(format!("blockfall-config-{}.json", process::id()));
        fs::write(&path, r#"{ "width": 8, "height": 20, "line_bonus": 10 }"#).unwrap();

        let arg = parse(&["--config", path.to_str().unwrap(), "--height", "12"]);
        let config = arg.load_config();
        fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!(config.width, 8);
        assert_eq!(config.height, 12);
        assert_eq!(config.line_bonus, 10);
        assert_eq!(config.normal_interval_ms, 500);
    }

    #[test]
    fn test_missing_config_file_is_reported() {
        let arg = parse(&["--config", "/nonexistent/blockfall.json"]);
        let err = arg.load_config().unwrap_err();
        assert!(err.to_string().contains("/nonexistent/blockfall.json"));
    }

    #[test]
    fn test_invalid_config_fails_at_construction() {
        let arg = parse(&["--width", "2"]);
        let err = arg.build_engine().unwrap_err();
        assert_eq!(err.to_string(), "Invalid engine configuration");
        assert_eq!(
            err.root_cause().to_string(),
            "grid width must be between 4 and 256, got 2"
        );
    }
}
