use crate::domain::model::{AutoBuildRequest, BuildSelection, ComponentId};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "rig-builder")]
#[command(about = "Check PC build compatibility and assemble builds under a budget")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "rig-builder.toml")]
    pub config: String,

    /// Override the catalog CSV path from the config
    #[arg(long)]
    pub catalog: Option<String>,

    /// Override the component records JSON path from the config
    #[arg(long)]
    pub components: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check a selection of component ids for compatibility
    Validate(SelectionArgs),
    /// Search the catalog for the best build within a budget
    AutoBuild(AutoBuildArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SelectionArgs {
    #[arg(long)]
    pub cpu: Option<ComponentId>,
    #[arg(long)]
    pub motherboard: Option<ComponentId>,
    #[arg(long)]
    pub ram: Option<ComponentId>,
    #[arg(long)]
    pub gpu: Option<ComponentId>,
    #[arg(long)]
    pub psu: Option<ComponentId>,
    #[arg(long)]
    pub case: Option<ComponentId>,
    #[arg(long)]
    pub cooler: Option<ComponentId>,
    #[arg(long, value_delimiter = ',')]
    pub storage: Vec<ComponentId>,
}

impl From<SelectionArgs> for BuildSelection {
    fn from(args: SelectionArgs) -> Self {
        BuildSelection {
            cpu: args.cpu,
            motherboard: args.motherboard,
            ram: args.ram,
            gpu: args.gpu,
            psu: args.psu,
            case: args.case,
            cooler: args.cooler,
            storage: args.storage,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct AutoBuildArgs {
    #[arg(long)]
    pub budget: i64,

    /// Priority tags such as gaming, office, silent
    #[arg(long = "priority", value_delimiter = ',')]
    pub priorities: Vec<String>,

    /// "intel" for LGA sockets, anything else for AM sockets
    #[arg(long)]
    pub platform: Option<String>,
}

impl From<AutoBuildArgs> for AutoBuildRequest {
    fn from(args: AutoBuildArgs) -> Self {
        AutoBuildRequest {
            budget: args.budget,
            priorities: args.priorities,
            platform: args.platform,
        }
    }
}
