use clap::{Parser, Subcommand};

/// CLI configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug)]
#[command(name = "drover")]
#[command(version, about = "Publish datasets and S3-hosted resources to a CKAN portal")]
#[command(after_help = "Examples:
  drover site-read
  drover put-dataset --name bore-logs --notes 'Bore log extracts' \\
      --owner-org geological-survey --identifier bore-logs
  drover put-resource --dataset bore-logs --name logs.csv \\
      --description 'CSV extract' --s3-path s3://extracts/Dev/logs.csv
  drover delete-dataset bore-logs")]
pub struct Config {
    /// CKAN endpoint: base portal URL or a full /api/.../action/ path
    #[arg(long, env = "CKAN_URL")]
    pub url: String,

    /// CKAN API key, sent as the raw Authorization header
    #[arg(long, env = "CKAN_API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check connectivity and credentials against the portal
    SiteRead,
    /// Show a dataset by name
    Show { name: String },
    /// Search datasets with a filter query, e.g. "type:report"
    Query { query: String },
    /// Create a dataset, or update/skip it when it already exists
    PutDataset {
        /// Dataset name (slug); the reconciliation key
        #[arg(long)]
        name: String,
        /// Dataset description
        #[arg(long)]
        notes: String,
        /// Owning organization name
        #[arg(long)]
        owner_org: String,
        /// External identifier, stored as the extra:identifier field
        #[arg(long)]
        identifier: String,
        /// Update an existing dataset instead of skipping it
        #[arg(long)]
        update: bool,
    },
    /// Delete every resource, then delete and purge the dataset
    DeleteDataset { name: String },
    /// Create or update a resource and stream its S3 payload into the portal
    PutResource {
        /// Owning dataset name
        #[arg(long)]
        dataset: String,
        /// Resource name; the matching key within the dataset
        #[arg(long)]
        name: String,
        /// Resource description
        #[arg(long)]
        description: String,
        /// Object URI, e.g. s3://bucket/key
        #[arg(long)]
        s3_path: String,
        /// Update an existing resource instead of skipping it
        #[arg(long)]
        update: bool,
    },
}
