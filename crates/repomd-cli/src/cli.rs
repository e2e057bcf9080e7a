use clap::{ArgAction, Parser, Subcommand, ValueHint};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Disable progress bars
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Provide custom config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    /// Only query sources of this repository
    #[arg(short, long, global = true)]
    pub repo: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List configured metadata sources
    #[clap(name = "sources", visible_alias = "ls")]
    Sources,

    /// Find packages by exact name
    #[command(arg_required_else_help = true)]
    Resolve {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Find packages whose name contains a term
    #[command(arg_required_else_help = true)]
    #[clap(name = "search", visible_alias = "s")]
    Search {
        #[arg(required = true)]
        terms: Vec<String>,

        /// Also match summary, description and url
        #[arg(required = false, short, long)]
        details: bool,
    },

    /// Find packages by group
    #[command(arg_required_else_help = true)]
    Group {
        #[arg(required = true)]
        groups: Vec<String>,
    },

    /// Find packages by content hash
    #[command(arg_required_else_help = true)]
    Pkgid {
        #[arg(required = true)]
        pkgids: Vec<String>,
    },

    /// Find the packages owning files
    #[command(arg_required_else_help = true)]
    File {
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Find packages providing capabilities
    #[command(arg_required_else_help = true)]
    #[clap(name = "provides", visible_alias = "wp")]
    Provides {
        #[arg(required = true)]
        capabilities: Vec<String>,
    },

    /// List every package
    Packages,

    /// Look up packages by `name;evr;arch;repo`
    #[command(arg_required_else_help = true)]
    Find {
        #[arg(required = true)]
        package_ids: Vec<String>,
    },

    /// Show the changelog of a package
    #[command(arg_required_else_help = true)]
    #[clap(name = "changelog", visible_alias = "log")]
    Changelog {
        /// Content hash of the package
        #[arg(required = true)]
        pkgid: String,

        /// Number of entries to show
        #[arg(required = false, short, long)]
        limit: Option<usize>,
    },

    /// List the files of a package
    #[command(arg_required_else_help = true)]
    Files {
        /// Content hash of the package
        #[arg(required = true)]
        pkgid: String,
    },

    /// List comps categories
    Categories,

    /// List comps groups, optionally those of one category
    Groups {
        #[arg(required = false)]
        category: Option<String>,
    },

    /// List the packages of a comps group
    #[command(arg_required_else_help = true)]
    GroupPackages {
        #[arg(required = true)]
        group: String,
    },

    /// List update advisories
    Updates {
        /// Only advisories shipping this `name;evr;arch;repo`
        #[arg(required = false, short, long)]
        package: Option<String>,
    },

    /// List mirrors from metalink and mirrorlist sources
    Mirrors {
        /// Lowest metalink preference to accept
        #[arg(required = false, short, long)]
        threshold: Option<u32>,
    },

    /// Delete the backing files of metadata sources
    Clean {
        /// Only delete sources of this kind
        #[arg(required = false, short, long)]
        kind: Option<String>,
    },
}
