//! Issue Hub native client: command handlers wiring the API client, auth store,
//! form validation, permission gating and terminal views together.

use clap::Parser;
use dialoguer::Confirm;
use issuehub_api::{HubClient, HubConfig, HubError, IssueQuery, Project, User};
use log::{debug, info};
use serde::Serialize;
use std::env;
use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Duration;

pub mod auth_store;
pub mod commands;
pub mod config;
pub mod forms;
pub mod notify;
pub mod permissions;
pub mod session;
pub mod views;

use auth_store::AuthStore;
use commands::{
    CliArgs, CommentCommands, Commands, ConfigCommands, IssueCommands, IssueFilterArgs,
    ProjectCommands,
};
use config::{Config, ConfigManager};
use forms::{
    CommentForm, IssueForm, IssueUpdateForm, LoginForm, MemberForm, ProjectForm, SignupForm,
};
use notify::Toast;
use permissions::IssueActions;
use session::KeyringTokenStore;

const PASSWORD_ENV: &str = "ISSUEHUB_PASSWORD";

/// Parses the command line, runs the command and returns the process exit code.
pub async fn run() -> i32 {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = CliArgs::parse();
    match execute(args).await {
        Ok(()) => 0,
        Err(message) => {
            Toast::error(message).show();
            1
        }
    }
}

/// Runs one parsed command against the configured API.
pub async fn execute(args: CliArgs) -> Result<(), String> {
    let manager = ConfigManager::new();
    let mut config = match &manager {
        Ok(manager) => manager.load(),
        Err(err) => {
            debug!("Using default config: {}", err);
            Config::default()
        }
    }
    .resolved();
    if let Some(url) = args.api_url.as_deref().map(str::trim).filter(|url| !url.is_empty()) {
        config.api_url = url.to_string();
    }

    if let Commands::Config { command } = &args.command {
        return run_config_command(command, manager.ok(), &config, args.json);
    }

    let app = App::new(config, args.json)?;
    app.dispatch(args.command).await
}

fn run_config_command(
    command: &ConfigCommands,
    manager: Option<ConfigManager>,
    config: &Config,
    json: bool,
) -> Result<(), String> {
    match command {
        ConfigCommands::Show => {
            if json {
                println!("{}", views::to_json(config)?);
            } else {
                if let Some(manager) = &manager {
                    println!("Config file: {}", manager.path().display());
                }
                println!("API URL: {}", config.api_url);
                println!("Issues per page: {}", config.issues_per_page);
                println!(
                    "Default ordering: {} {}",
                    config.default_sort, config.default_order
                );
                println!("Request timeout: {}s", config.request_timeout_secs);
            }
            Ok(())
        }
        ConfigCommands::SetApiUrl { url } => {
            let url = url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err("API URL must start with http:// or https://".to_string());
            }
            let manager = manager.ok_or("Could not determine config directory")?;
            let mut stored = manager.load();
            stored.api_url = url.to_string();
            manager
                .save(&stored)
                .map_err(|err| format!("Failed to save config: {err}"))?;
            if !json {
                Toast::success(format!("API URL set to {url}")).show();
            }
            Ok(())
        }
    }
}

/// Per-invocation application context.
struct App {
    config: Config,
    auth: AuthStore,
    json: bool,
}

impl App {
    fn new(config: Config, json: bool) -> Result<Self, String> {
        let hub_config = HubConfig::new(config.api_url.clone())
            .with_timeout(Duration::from_secs(config.request_timeout_secs))
            .with_user_agent(format!("issuehub/{}", env!("CARGO_PKG_VERSION")));
        let client = HubClient::new(hub_config).map_err(|err| err.to_string())?;
        let auth = AuthStore::new(client, Arc::new(KeyringTokenStore::default()));
        Ok(Self { config, auth, json })
    }

    fn client(&self) -> &HubClient {
        self.auth.client()
    }

    async fn dispatch(&self, command: Commands) -> Result<(), String> {
        match command {
            Commands::Signup {
                name,
                email,
                password,
            } => self.signup(name, email, password).await,
            Commands::Login { email, password } => self.login(email, password).await,
            Commands::Logout => {
                self.auth.logout();
                self.success("Signed out");
                Ok(())
            }
            Commands::Whoami => {
                let user = self.session().await?;
                self.emit(&user, || views::render_user(&user))
            }
            Commands::Health => {
                let health = self
                    .client()
                    .health()
                    .await
                    .map_err(api_failure("Failed to reach the API"))?;
                self.emit(&health, || {
                    format!("{} is {}", self.config.api_url, health.status)
                })
            }
            Commands::Projects { command } => self.projects(command).await,
            Commands::Issues { command } => self.issues(command).await,
            Commands::Comments { command } => self.comments(command).await,
            Commands::Config { .. } => Ok(()),
        }
    }

    async fn signup(&self, name: String, email: String, password: Option<String>) -> Result<(), String> {
        let password = resolve_password(password)?;
        let form = SignupForm {
            name,
            email,
            password,
        };
        form.validate().map_err(|errors| errors.to_string())?;

        let user = self
            .auth
            .signup(form.name.trim(), form.email.trim(), &form.password)
            .await
            .map_err(api_failure("Failed to create account"))?;
        info!("Created account {}", user.id);
        self.success("Account created");

        let user = self
            .auth
            .login(form.email.trim(), &form.password)
            .await
            .map_err(api_failure("Failed to log in"))?;
        self.success(format!("Signed in as {}", user.name));
        Ok(())
    }

    async fn login(&self, email: String, password: Option<String>) -> Result<(), String> {
        let password = resolve_password(password)?;
        let form = LoginForm { email, password };
        form.validate().map_err(|errors| errors.to_string())?;

        let user = self
            .auth
            .login(form.email.trim(), &form.password)
            .await
            .map_err(api_failure("Failed to log in"))?;
        self.success(format!("Signed in as {}", user.name));
        Ok(())
    }

    /// Restores the persisted session; the CLI's equivalent of the login redirect.
    async fn session(&self) -> Result<User, String> {
        self.auth.check_auth().await;
        self.auth.require_user()
    }

    async fn projects(&self, command: ProjectCommands) -> Result<(), String> {
        match command {
            ProjectCommands::List => {
                self.session().await?;
                let projects = self
                    .client()
                    .list_projects()
                    .await
                    .map_err(api_failure("Failed to load projects"))?;
                self.emit(&projects, || views::render_project_list(&projects))
            }
            ProjectCommands::Show { project_id } => {
                self.session().await?;
                let project = self.load_project(project_id).await?;
                self.emit(&project, || views::render_project_detail(&project))
            }
            ProjectCommands::Create {
                name,
                key,
                description,
            } => {
                let payload = ProjectForm {
                    name,
                    key,
                    description,
                }
                .validate()
                .map_err(|errors| errors.to_string())?;
                self.session().await?;
                let project = self
                    .client()
                    .create_project(&payload)
                    .await
                    .map_err(api_failure("Failed to create project"))?;
                self.success("Project created successfully");
                self.emit(&project, || views::render_project_detail(&project))
            }
            ProjectCommands::AddMember {
                project_id,
                email,
                role,
            } => {
                let payload = MemberForm { email, role }
                    .validate()
                    .map_err(|errors| errors.to_string())?;
                let user = self.session().await?;
                let project = self.load_project(project_id).await?;
                if !permissions::can_add_members(&project, user.id) {
                    return Err("Only project maintainers can add members".to_string());
                }
                let ack = self
                    .client()
                    .add_project_member(project_id, &payload)
                    .await
                    .map_err(api_failure("Failed to add member"))?;
                self.success(ack.message.clone());
                if self.json {
                    println!("{}", views::to_json(&ack)?);
                }
                Ok(())
            }
        }
    }

    async fn issues(&self, command: IssueCommands) -> Result<(), String> {
        match command {
            IssueCommands::List {
                project_id,
                filters,
            } => {
                self.session().await?;
                let query = self.issue_query(filters);
                let issues = self
                    .client()
                    .list_issues(project_id, &query)
                    .await
                    .map_err(api_failure("Failed to load issues"))?;
                self.emit(&issues, || views::render_issue_list(&issues))
            }
            IssueCommands::Show { issue_id } => {
                let user = self.session().await?;
                self.show_issue(issue_id, &user).await
            }
            IssueCommands::Create {
                project_id,
                title,
                description,
                priority,
                assignee,
                due,
            } => {
                let payload = IssueForm {
                    title,
                    description,
                    priority,
                    assignee_id: assignee,
                    expected_completion_date: due,
                }
                .validate()
                .map_err(|errors| errors.to_string())?;
                self.session().await?;
                let issue = self
                    .client()
                    .create_issue(project_id, &payload)
                    .await
                    .map_err(api_failure("Failed to create issue"))?;
                self.success(format!("Issue #{} created successfully", issue.id));
                self.emit(&issue, || views::render_issue_list(std::slice::from_ref(&issue)))
            }
            IssueCommands::Update {
                issue_id,
                title,
                description,
                status,
                priority,
                assignee,
                unassign,
                due,
            } => {
                let assignee = if unassign { Some(None) } else { assignee.map(Some) };
                let payload = IssueUpdateForm {
                    title,
                    description,
                    status,
                    priority,
                    assignee,
                    expected_completion_date: due,
                }
                .validate()
                .map_err(|errors| errors.to_string())?;
                let user = self.session().await?;
                let (issue, project) = self.load_issue_with_project(issue_id).await?;
                if !permissions::is_member(&project, user.id) {
                    return Err("You are not a member of this project".to_string());
                }
                if !permissions::can_apply_update(&project, &issue, &payload, user.id) {
                    return Err(
                        "Only project maintainers or the reporter can change status, assignee, priority or due date"
                            .to_string(),
                    );
                }
                let updated = self
                    .client()
                    .update_issue(issue_id, &payload)
                    .await
                    .map_err(api_failure("Failed to update issue"))?;
                self.success("Issue updated");
                let actions = IssueActions::for_user(&project, &updated, user.id);
                self.emit(&updated, || views::render_issue_detail(&updated, actions))
            }
            IssueCommands::Delete { issue_id, yes } => {
                let user = self.session().await?;
                let (issue, project) = self.load_issue_with_project(issue_id).await?;
                if !permissions::can_delete_issue(&project, &issue, user.id) {
                    return Err(
                        "Only project maintainers or the reporter can delete this issue"
                            .to_string(),
                    );
                }
                if !yes && !confirm(&format!("Delete issue #{issue_id} \"{}\"?", issue.title))? {
                    Toast::info("Cancelled").show();
                    return Ok(());
                }
                self.client()
                    .delete_issue(issue_id)
                    .await
                    .map_err(api_failure("Failed to delete issue"))?;
                self.success("Issue deleted");
                Ok(())
            }
        }
    }

    async fn comments(&self, command: CommentCommands) -> Result<(), String> {
        match command {
            CommentCommands::List { issue_id } => {
                self.session().await?;
                let comments = self
                    .client()
                    .list_comments(issue_id)
                    .await
                    .map_err(api_failure("Failed to load comments"))?;
                self.emit(&comments, || views::render_comments(&comments))
            }
            CommentCommands::Add { issue_id, body } => {
                let body = CommentForm { body }
                    .validate()
                    .map_err(|errors| errors.to_string())?;
                self.session().await?;
                let comment = self
                    .client()
                    .create_comment(issue_id, &body)
                    .await
                    .map_err(api_failure("Failed to add comment"))?;
                self.success("Comment added");
                self.emit(&comment, || views::render_comments(std::slice::from_ref(&comment)))
            }
        }
    }

    async fn show_issue(&self, issue_id: i64, user: &User) -> Result<(), String> {
        let (issue, project) = self.load_issue_with_project(issue_id).await?;
        let comments = match self.client().list_comments(issue_id).await {
            Ok(comments) => comments,
            Err(err) => {
                Toast::from_api_error(&err, "Failed to load comments").show();
                Vec::new()
            }
        };

        if self.json {
            let payload = IssueDetailPayload {
                issue: &issue,
                comments: &comments,
            };
            println!("{}", views::to_json(&payload)?);
            return Ok(());
        }

        let actions = IssueActions::for_user(&project, &issue, user.id);
        println!("{}", views::render_issue_detail(&issue, actions));
        println!("\nComments ({})", comments.len());
        println!("{}", views::render_comments(&comments));
        Ok(())
    }

    async fn load_project(&self, project_id: i64) -> Result<Project, String> {
        self.client()
            .get_project(project_id)
            .await
            .map_err(api_failure("Failed to load project"))
    }

    async fn load_issue_with_project(
        &self,
        issue_id: i64,
    ) -> Result<(issuehub_api::Issue, Project), String> {
        let issue = self
            .client()
            .get_issue(issue_id)
            .await
            .map_err(api_failure("Failed to load issue"))?;
        let project = self
            .client()
            .get_project(issue.project_id)
            .await
            .map_err(api_failure("Failed to load issue"))?;
        Ok((issue, project))
    }

    fn issue_query(&self, filters: IssueFilterArgs) -> IssueQuery {
        IssueQuery {
            q: filters.search,
            status: filters.status,
            priority: filters.priority,
            assignee_id: filters.assignee,
            sort: filters.sort.unwrap_or(self.config.default_sort),
            order: filters.order.unwrap_or(self.config.default_order),
            page: filters.page.unwrap_or(1),
            per_page: filters.per_page.unwrap_or(self.config.issues_per_page),
        }
    }

    fn success(&self, message: impl Into<String>) {
        if !self.json {
            Toast::success(message).show();
        }
    }

    /// Prints `value` as JSON in `--json` mode, otherwise the rendered view.
    fn emit<T, F>(&self, value: &T, render: F) -> Result<(), String>
    where
        T: Serialize + ?Sized,
        F: FnOnce() -> String,
    {
        if self.json {
            println!("{}", views::to_json(value)?);
        } else {
            println!("{}", render());
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct IssueDetailPayload<'a> {
    issue: &'a issuehub_api::Issue,
    comments: &'a [issuehub_api::Comment],
}

/// Maps an API failure to the message shown to the user.
fn api_failure(fallback: &'static str) -> impl Fn(HubError) -> String {
    move |err| Toast::from_api_error(&err, fallback).message
}

fn resolve_password(flag: Option<String>) -> Result<String, String> {
    if let Some(password) = flag {
        return Ok(password);
    }
    if let Ok(password) = env::var(PASSWORD_ENV) {
        return Ok(password);
    }
    if !io::stdin().is_terminal() {
        return Err(format!(
            "Cannot read password from stdin. Use --password or set {PASSWORD_ENV}."
        ));
    }
    rpassword::prompt_password("Password: ").map_err(|err| format!("Failed to read password: {err}"))
}

fn confirm(question: &str) -> Result<bool, String> {
    if !io::stdin().is_terminal() {
        return Err("Cannot ask for confirmation without a terminal. Pass --yes to proceed.".to_string());
    }
    Confirm::new()
        .with_prompt(question)
        .default(false)
        .interact()
        .map_err(|err| format!("Failed to read confirmation: {err}"))
}
