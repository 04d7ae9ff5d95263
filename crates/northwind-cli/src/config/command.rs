//! Subcommands and their arguments.

use anyhow::Context;
use clap::{Args, Subcommand};
use northwind_index::{DEFAULT_PAGE_SIZE, FieldPath, IndexDescriptor, Projection};

use super::PollArgs;

/// Operation to run against the store.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create an index and, unless `--no-wait`, wait for it to become active.
    CreateIndex(CreateIndexArgs),
    /// Wait for an existing index to become active.
    AwaitIndex(AwaitIndexArgs),
    /// Page through every entry of a values-only index.
    Paginate(PaginateArgs),
    /// Create the category indexes, wait for them and page through `categories_all`.
    Demo(DemoArgs),
}

impl Command {
    /// Subcommand name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateIndex(_) => "create-index",
            Self::AwaitIndex(_) => "await-index",
            Self::Paginate(_) => "paginate",
            Self::Demo(_) => "demo",
        }
    }

    /// Validates the arguments of the subcommand.
    pub fn validate(&self) -> anyhow::Result<()> {
        match self {
            Self::CreateIndex(args) => {
                args.index
                    .to_descriptor()
                    .validate()
                    .context("invalid index definition")?;
                if !args.no_wait {
                    args.poll.to_config().validate().context("invalid poll bounds")?;
                }
            }
            Self::AwaitIndex(args) => {
                args.poll.to_config().validate().context("invalid poll bounds")?;
            }
            Self::Paginate(args) => args.page.validate()?,
            Self::Demo(args) => {
                args.poll.to_config().validate().context("invalid poll bounds")?;
                args.page.validate()?;
            }
        }
        Ok(())
    }
}

/// Index to create.
#[derive(Debug, Clone, Args)]
pub struct IndexArgs {
    /// Name of the index.
    #[arg(long)]
    pub name: String,

    /// Collection the index reads from.
    #[arg(long)]
    pub source: String,

    /// Term field, as a dotted path (repeatable).
    #[arg(long = "term")]
    pub terms: Vec<FieldPath>,

    /// Value field, as a dotted path (repeatable).
    #[arg(long = "value")]
    pub values: Vec<FieldPath>,
}

impl IndexArgs {
    /// Builds the index definition.
    pub fn to_descriptor(&self) -> IndexDescriptor {
        IndexDescriptor::new(&self.name, &self.source)
            .with_terms(self.terms.iter().cloned())
            .with_values(self.values.iter().cloned())
    }
}

/// Arguments of `create-index`.
#[derive(Debug, Clone, Args)]
pub struct CreateIndexArgs {
    #[command(flatten)]
    pub index: IndexArgs,

    /// Return right after submitting the index.
    #[arg(long)]
    pub no_wait: bool,

    #[command(flatten)]
    pub poll: PollArgs,
}

/// An existing index.
#[derive(Debug, Clone, Args)]
pub struct NameArgs {
    /// Name of the index.
    #[arg(long)]
    pub name: String,
}

/// Arguments of `await-index`.
#[derive(Debug, Clone, Args)]
pub struct AwaitIndexArgs {
    #[command(flatten)]
    pub index: NameArgs,

    #[command(flatten)]
    pub poll: PollArgs,
}

/// How pages are fetched.
#[derive(Debug, Clone, Copy, Args)]
pub struct PageArgs {
    /// Maximum number of records per page.
    #[arg(long = "page-size", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Print raw index entries instead of the referenced documents.
    #[arg(long)]
    pub entries: bool,
}

impl PageArgs {
    /// Projection selected by `--entries`.
    pub fn projection(&self) -> Projection {
        if self.entries {
            Projection::Entries
        } else {
            Projection::Documents
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.page_size > 0, "page size must be positive");
        Ok(())
    }
}

/// Arguments of `paginate`.
#[derive(Debug, Clone, Args)]
pub struct PaginateArgs {
    /// Name of the values-only index to walk.
    #[arg(long)]
    pub name: String,

    #[command(flatten)]
    pub page: PageArgs,
}

/// Arguments of `demo`.
#[derive(Debug, Clone, Args)]
pub struct DemoArgs {
    #[command(flatten)]
    pub poll: PollArgs,

    #[command(flatten)]
    pub page: PageArgs,
}
