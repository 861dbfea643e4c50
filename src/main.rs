use clap::Parser;

use mbss_plot::cli::Args;
use mbss_plot::config::RunConfig;
use mbss_plot::pipeline;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = RunConfig::from_args(Args::parse());
    pipeline::run(&cfg)
}
