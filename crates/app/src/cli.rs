use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "brokerdesk", about = "Commission reports for a brokerage team")]
pub struct Args {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub level: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long, global = true)]
    pub timezone: Option<String>,
    /// Override reporting currency (ARS, USD, EUR).
    #[arg(long, global = true)]
    pub currency: Option<String>,
    /// Override the team leader id.
    #[arg(long, global = true)]
    pub team: Option<String>,
    /// Override the operations file (.json or .csv).
    #[arg(long, global = true)]
    pub operations: Option<String>,
    /// Override the roster file (.json).
    #[arg(long, global = true)]
    pub roster: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Totals, tips, averages and fees of the filtered operations.
    Summary(Filters),
    /// The filtered operations, sorted.
    List(Filters),
    /// One row per roster member with contribution percentages.
    Advisors(Filters),
    /// Month-by-month gross fees of closed operations.
    Monthly {
        /// Calendar year, or `current`.
        #[arg(long, default_value = "current")]
        year: String,
    },
    /// Fees still in progress this year and last year.
    Pipeline,
    /// Split an ad-hoc commission without touching stored operations.
    Split {
        #[arg(long)]
        value: f64,
        /// Total commission percent charged on both sides.
        #[arg(long)]
        gross: f64,
        #[arg(long, default_value_t = 0.0)]
        advisor: f64,
        #[arg(long, default_value_t = 0.0)]
        shared: f64,
        #[arg(long, default_value_t = 0.0)]
        referral: f64,
    },
    /// Full fee distribution of one stored operation.
    Breakdown {
        /// Operation id.
        id: uuid::Uuid,
    },
}

#[derive(Debug, Clone, Default, ClapArgs)]
pub struct Filters {
    /// all, active, in_progress, closed or fallen.
    #[arg(long, default_value = "all")]
    pub status: String,
    /// all, current, or a calendar year.
    #[arg(long, default_value = "all")]
    pub year: String,
    /// all, current, or 1-12.
    #[arg(long, default_value = "all")]
    pub month: String,
    /// all or an operation type.
    #[arg(long = "type", default_value = "all")]
    pub operation_type: String,
    /// Whitespace-separated terms, all of which must match.
    #[arg(long, default_value = "")]
    pub search: String,
    /// Report net fees for this participant instead of the whole team.
    #[arg(long)]
    pub participant: Option<String>,
    /// value, reservation or closing.
    #[arg(long)]
    pub sort: Option<String>,
    /// Ascending order for `--sort`.
    #[arg(long)]
    pub asc: bool,
}
