use crate::config::FurrowSettings;
use crate::model::{
    ChallengeCategory, CollectionStatus, InputLine, ItemCategory, NeededStatus, Severity,
    WorkCardStatus,
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

#[derive(Parser)]
#[command(name = "furrow")]
#[command(
    author,
    version,
    about = "A flat-file farm operations tracker: inventory, harvest payroll, work cards and seasonal reports"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file (searches upward for .furrow.toml by default)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Path to data directory (overrides config)
    #[arg(long, global = true, env = "FURROW_DATA_PATH")]
    pub data_path: Option<String>,

    /// Company to work in (defaults to the configured company)
    #[arg(long, global = true, env = "FURROW_COMPANY")]
    pub company: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write JSON logs to this file (rotated daily)
    #[arg(long, global = true)]
    pub log_file: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FrontmatterArg {
    Toml,
    Yaml,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new furrow project
    Init {
        /// Length of random ID suffix
        #[arg(long, default_value_t = FurrowSettings::default().id_length)]
        id_length: usize,

        /// Frontmatter format for new documents
        #[arg(long, value_enum, default_value = "toml")]
        frontmatter: FrontmatterArg,

        /// Currency code shown next to amounts
        #[arg(long, default_value_t = FurrowSettings::default().currency)]
        currency: String,
    },

    /// Manage companies
    #[command(subcommand)]
    Company(CompanyCommand),

    /// Manage inventory items and stock movements
    #[command(subcommand, visible_alias = "inv")]
    Item(ItemCommand),

    /// Manage the list of items that need to be bought
    #[command(subcommand)]
    Need(NeedCommand),

    /// Run harvest collections: pickers, weighing and payouts
    #[command(subcommand)]
    Harvest(HarvestCommand),

    /// Inspect and top up harvest cash pools
    #[command(subcommand)]
    Wallet(WalletCommand),

    /// Record and report daily work
    #[command(subcommand)]
    Log(LogCommand),

    /// Plan, submit and review work cards
    #[command(subcommand)]
    Card(CardCommand),

    /// Record problems faced during a season
    #[command(subcommand)]
    Challenge(ChallengeCommand),

    /// Show a dashboard of stock, harvests, cards and challenges
    Overview,

    /// Execute a GraphQL query
    Query {
        /// GraphQL query string
        query: String,

        /// Variables as JSON
        #[arg(long)]
        variables: Option<String>,
    },

    /// Execute a GraphQL mutation (wrapped in `mutation { }`)
    Mutate {
        /// GraphQL mutation body
        mutation: String,

        /// Variables as JSON
        #[arg(long)]
        variables: Option<String>,
    },

    /// Start the GraphQL server
    Serve {
        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Subcommand)]
pub enum CompanyCommand {
    /// Register a company
    Add {
        name: String,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// List companies
    #[command(visible_alias = "ls")]
    List {
        /// Include deactivated companies
        #[arg(long)]
        all: bool,
    },

    /// Show a company and how many records it owns
    Show { id: String },

    /// Change company details
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Make a company the default for later commands
    Use { id: String },

    /// Stop accepting new records for a company
    Deactivate { id: String },

    /// Accept new records for a company again
    Activate { id: String },

    /// Delete a company that owns no records
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum ItemCommand {
    /// Add an inventory item
    Add {
        name: String,

        /// Unit of measure, e.g. kg, l, bags
        #[arg(short, long)]
        unit: String,

        /// fertilizer, chemical, seed, fuel, packaging, tool or other
        #[arg(short, long, default_value = "other")]
        category: ItemCategory,

        /// Opening stock
        #[arg(short, long, default_value = "0")]
        quantity: Decimal,

        /// Stock level at or below which the item is reported as low
        #[arg(long, default_value = "0")]
        reorder_level: Decimal,

        #[arg(long)]
        unit_cost: Option<Decimal>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// List items
    #[command(visible_alias = "ls")]
    List {
        #[arg(short, long)]
        category: Option<ItemCategory>,

        /// Only items at or below their reorder level
        #[arg(long)]
        low: bool,
    },

    /// Show an item with its purchases and usage
    Show { id: String },

    /// Change item details
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        category: Option<ItemCategory>,
        #[arg(short, long)]
        unit: Option<String>,
        #[arg(long)]
        reorder_level: Option<Decimal>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Record a purchase and add it to stock
    Restock {
        id: String,
        quantity: Decimal,
        #[arg(long)]
        unit_cost: Decimal,
        #[arg(long)]
        supplier: Option<String>,
        /// Purchase date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Take stock out for use in the field
    Use {
        id: String,
        quantity: Decimal,
        #[arg(long)]
        purpose: String,
        #[arg(long)]
        project: Option<String>,
        /// Usage date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Workers to record on the generated work log
        #[arg(long)]
        workers: Option<u32>,
        /// Do not write a work log for this usage
        #[arg(long)]
        no_log: bool,
    },

    /// Correct the quantity on hand after a stock-take
    Adjust {
        id: String,
        quantity: Decimal,
        #[arg(long)]
        reason: String,
    },

    /// Delete an item with no purchase or usage history
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum NeedCommand {
    /// Add something that needs to be bought
    Add {
        name: String,
        quantity: Decimal,
        #[arg(short, long)]
        unit: String,
        #[arg(short, long, default_value = "other")]
        category: ItemCategory,
        /// Inventory item to restock on receipt
        #[arg(long)]
        item: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// List needed items
    #[command(visible_alias = "ls")]
    List {
        /// pending, ordered, received or cancelled
        #[arg(short, long)]
        status: Option<NeededStatus>,
    },

    /// Mark a needed item as ordered
    Order { id: String },

    /// Receive a needed item into stock
    Receive {
        id: String,
        #[arg(long)]
        unit_cost: Decimal,
        /// Received quantity (defaults to the needed quantity)
        #[arg(short, long)]
        quantity: Option<Decimal>,
        #[arg(long)]
        supplier: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Cancel a needed item
    Cancel { id: String },
}

#[derive(Subcommand)]
pub enum HarvestCommand {
    /// Open a harvest collection
    Open {
        #[arg(short, long)]
        project: String,
        #[arg(long)]
        crop: String,
        /// Price paid to pickers per kilogram
        #[arg(long)]
        price: Decimal,
        #[arg(long)]
        name: Option<String>,
        /// Harvest date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// List harvest collections
    #[command(visible_alias = "ls")]
    List {
        #[arg(short, long)]
        project: Option<String>,
        /// open or closed
        #[arg(short, long)]
        status: Option<CollectionStatus>,
    },

    /// Show a collection summary with picker totals
    Show { id: String },

    /// Add a picker to a collection
    Picker {
        collection: String,
        name: String,
        /// Picker number (defaults to the next free number)
        #[arg(short, long)]
        number: Option<u32>,
        #[arg(long)]
        phone: Option<String>,
    },

    /// List pickers of a collection with their totals
    Pickers { collection: String },

    /// Record a weighed trip for a picker (by number or id)
    Weigh {
        collection: String,
        picker: String,
        kg: Decimal,
    },

    /// List weigh entries of a collection
    Entries {
        collection: String,
        /// Picker number or id
        #[arg(long)]
        picker: Option<String>,
    },

    /// Remove a mistaken weigh entry
    Unweigh { entry: String },

    /// Pay pickers (number or id) from the cash pool; pays everyone owed when none are given
    Pay {
        collection: String,
        pickers: Vec<String>,
        #[arg(long)]
        reference: Option<String>,
    },

    /// List payment batches of a collection
    Batches { collection: String },

    /// Close a collection and carry the pool balance forward
    Close {
        collection: String,
        /// Close even if some pickers are still owed
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum WalletCommand {
    /// List cash pools
    #[command(visible_alias = "ls")]
    List,

    /// Show a cash pool and its ledger
    Show { id: String },

    /// Add cash to a pool, given by id or by project and crop
    TopUp {
        amount: Decimal,
        #[arg(long, conflicts_with_all = ["project", "crop"])]
        pool: Option<String>,
        #[arg(short, long, requires = "crop")]
        project: Option<String>,
        #[arg(long, requires = "project")]
        crop: Option<String>,
        #[arg(long)]
        reference: Option<String>,
    },
}

#[derive(Args)]
pub struct LogFilterArgs {
    #[arg(short, long)]
    pub project: Option<String>,
    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
    #[arg(short = 't', long = "type")]
    pub work_type: Option<String>,
}

#[derive(Subcommand)]
pub enum LogCommand {
    /// Record work done
    Add {
        #[arg(short, long)]
        project: String,
        #[arg(short = 't', long = "type")]
        work_type: Option<String>,
        #[arg(short, long)]
        workers: u32,
        /// Hours worked per worker
        #[arg(long)]
        hours: Option<Decimal>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// List work logs
    #[command(visible_alias = "ls")]
    List {
        #[command(flatten)]
        filter: LogFilterArgs,
    },

    /// Change a work log
    Update {
        id: String,
        #[arg(short, long)]
        project: Option<String>,
        #[arg(short = 't', long = "type")]
        work_type: Option<String>,
        #[arg(short, long)]
        workers: Option<u32>,
        #[arg(long)]
        hours: Option<Decimal>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a work log
    Delete { id: String },

    /// Worker-days and worker-hours per work type
    Summary {
        #[command(flatten)]
        filter: LogFilterArgs,
    },
}

#[derive(Args)]
pub struct PlanArgs {
    /// Day of the work (YYYY-MM-DD, default today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(short, long)]
    pub workers: u32,
    #[arg(long, default_value = "0")]
    pub labor_cost: Decimal,
    /// Input used, as name:quantity:unit (repeatable)
    #[arg(short, long = "input")]
    pub inputs: Vec<InputLine>,
}

#[derive(Subcommand)]
pub enum CardCommand {
    /// Plan a work card
    Plan {
        title: String,
        #[arg(short, long)]
        project: String,
        #[arg(short = 't', long = "type")]
        work_type: String,
        #[command(flatten)]
        plan: PlanArgs,
        #[arg(long)]
        notes: Option<String>,
    },

    /// List work cards
    #[command(visible_alias = "ls")]
    List {
        #[arg(short, long)]
        project: Option<String>,
        /// planned, submitted, approved or rejected
        #[arg(short, long)]
        status: Option<WorkCardStatus>,
        /// Only approved cards not yet paid
        #[arg(long)]
        unpaid: bool,
    },

    /// Show a work card with its planned-versus-actual variance
    Show { id: String },

    /// Change the plan of a card that has not been submitted
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short = 't', long = "type")]
        work_type: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(short, long)]
        workers: Option<u32>,
        #[arg(long)]
        labor_cost: Option<Decimal>,
        /// Replace the planned inputs, as name:quantity:unit (repeatable)
        #[arg(short, long = "input")]
        inputs: Vec<InputLine>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Submit what was actually done
    Submit {
        id: String,
        #[command(flatten)]
        actual: PlanArgs,
        #[arg(long)]
        by: Option<String>,
    },

    /// Approve submitted actuals and write the work log
    Approve {
        id: String,
        #[arg(long)]
        by: Option<String>,
    },

    /// Send submitted actuals back with a reason
    Reject {
        id: String,
        #[arg(long)]
        reason: String,
        #[arg(long)]
        by: Option<String>,
    },

    /// Mark an approved card as paid
    Paid { id: String },

    /// Delete a card that is still only planned
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum ChallengeCommand {
    /// Report a challenge
    Add {
        title: String,
        #[arg(short, long)]
        season: String,
        /// pest, disease, weather, labor, market, equipment or other
        #[arg(short, long, default_value = "other")]
        category: ChallengeCategory,
        /// low, medium, high or critical
        #[arg(long, default_value = "medium")]
        severity: Severity,
        #[arg(short, long)]
        project: Option<String>,
        /// Day the problem was observed (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// List challenges
    #[command(visible_alias = "ls")]
    List {
        #[arg(short, long)]
        season: Option<String>,
        #[arg(short, long)]
        category: Option<ChallengeCategory>,
        #[arg(long)]
        severity: Option<Severity>,
        /// Only unresolved challenges
        #[arg(long, conflicts_with = "resolved")]
        open: bool,
        /// Only resolved challenges
        #[arg(long)]
        resolved: bool,
    },

    /// Show a challenge
    Show { id: String },

    /// Change a challenge
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        season: Option<String>,
        #[arg(short, long)]
        category: Option<ChallengeCategory>,
        #[arg(long)]
        severity: Option<Severity>,
        #[arg(short, long)]
        project: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Mark a challenge as resolved
    Resolve { id: String, resolution: String },

    /// Reopen a resolved challenge
    Reopen { id: String },

    /// Delete a challenge
    Delete { id: String },

    /// Counts per season by category and severity
    Summary {
        #[arg(short, long)]
        season: Option<String>,
    },
}
