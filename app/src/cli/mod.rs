pub mod check;
pub mod convert;
pub mod import;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "nextreia")]
#[command(about = "NextReia Clash subscription converter", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch (or read) a subscription and rewrite its groups and rules
    Convert(convert::ConvertArgs),
    /// 批量导入规则文本（智能解析）
    Import(import::ImportArgs),
    /// Validate a policy config without converting anything
    Check(check::CheckArgs),
}
