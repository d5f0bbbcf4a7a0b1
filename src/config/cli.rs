use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "ieum")]
#[command(about = "Jobs, apartment trades and youth policies for one rural region")]
pub struct CliArgs {
    /// Free-text query, e.g. "강릉 정규직 일자리"
    pub query: String,

    /// Region code or name; overrides any region named in the query
    #[arg(long)]
    pub region: Option<String>,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Apartment trade month (YYYYMM)
    #[arg(long)]
    pub deal_ymd: Option<String>,

    /// Price ceiling in 만원; overrides a ceiling parsed from the query
    #[arg(long)]
    pub max_price: Option<u64>,

    /// Print the aggregation as JSON
    #[arg(long)]
    pub json: bool,

    /// JSON log lines on stderr
    #[arg(long)]
    pub log_json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
