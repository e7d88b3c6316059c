use clap::{Args, Parser, Subcommand};
use issuehub_api::{IssuePriority, IssueSort, IssueStatus, MemberRole, SortOrder};

#[derive(Parser, Debug)]
#[command(name = "issuehub", author, version, about = "Issue Hub command-line client")]
pub struct CliArgs {
    /// API base URL, overriding the config file and ISSUEHUB_API_URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,
    /// Print raw JSON instead of formatted views
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Password; read from ISSUEHUB_PASSWORD or prompted when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        /// Password; read from ISSUEHUB_PASSWORD or prompted when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Check that the API is reachable
    Health,
    /// Browse and manage projects
    Projects {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Browse and manage issues
    Issues {
        #[command(subcommand)]
        command: IssueCommands,
    },
    /// Read and write issue comments
    Comments {
        #[command(subcommand)]
        command: CommentCommands,
    },
    /// Inspect or change local settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// List projects you are a member of
    List,
    /// Show a project and its members
    Show { project_id: i64 },
    /// Create a project; you become its maintainer
    Create {
        #[arg(long)]
        name: String,
        /// 2-10 letters or digits, stored upper-case
        #[arg(long)]
        key: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Add a registered user to a project (maintainers only)
    AddMember {
        project_id: i64,
        #[arg(long)]
        email: String,
        /// member or maintainer
        #[arg(long)]
        role: Option<MemberRole>,
    },
}

#[derive(Args, Debug, Default)]
pub struct IssueFilterArgs {
    /// Search text matched against issue titles
    #[arg(short, long)]
    pub search: Option<String>,
    #[arg(long)]
    pub status: Option<IssueStatus>,
    #[arg(long)]
    pub priority: Option<IssuePriority>,
    /// Only issues assigned to this user id
    #[arg(long)]
    pub assignee: Option<i64>,
    /// created_at, updated_at, priority or status
    #[arg(long)]
    pub sort: Option<IssueSort>,
    /// asc or desc
    #[arg(long)]
    pub order: Option<SortOrder>,
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub per_page: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum IssueCommands {
    /// List issues of a project
    List {
        project_id: i64,
        #[command(flatten)]
        filters: IssueFilterArgs,
    },
    /// Show an issue with its comments
    Show { issue_id: i64 },
    /// Report a new issue
    Create {
        project_id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// low, medium, high or critical
        #[arg(long)]
        priority: Option<IssuePriority>,
        /// Assignee user id; must be a project member
        #[arg(long)]
        assignee: Option<i64>,
        /// Expected completion date (YYYY-MM-DD or YYYY-MM-DDTHH:MM)
        #[arg(long)]
        due: Option<String>,
    },
    /// Change an issue (maintainers and the reporter)
    Update {
        issue_id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<IssueStatus>,
        #[arg(long)]
        priority: Option<IssuePriority>,
        #[arg(long, conflicts_with = "unassign")]
        assignee: Option<i64>,
        /// Remove the current assignee
        #[arg(long)]
        unassign: bool,
        #[arg(long)]
        due: Option<String>,
    },
    /// Delete an issue (maintainers and the reporter)
    Delete {
        issue_id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum CommentCommands {
    /// List comments of an issue
    List { issue_id: i64 },
    /// Add a comment to an issue
    Add {
        issue_id: i64,
        #[arg(long)]
        body: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Persist the API base URL
    SetApiUrl { url: String },
}
