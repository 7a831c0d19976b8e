//! Terminal front end for the task board.
//!
//! Usage:
//!
//! ```text
//! taskboard [--config <path>] <command>
//! ```
//!
//! Every command loads configuration (defaults, optional TOML file, then
//! `TASKBOARD_*` environment variables), restores the session from the token
//! directory and talks to the API through the library services. Board
//! commands load the whole board first and print the resulting columns.

use std::io::{self, Write};
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use mockable::DefaultClock;
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::debug;

use taskboard::board::{
    domain::{Board, BoardDomainError, Column, ColumnId, Priority, TaskDraft, TaskId, TaskPatch},
    services::{BoardStateManager, LoadError, MoveOutcome, MutationError},
};
use taskboard::config::{ClientConfig, ConfigError};
use taskboard::directory::{
    domain::{DirectoryDomainError, NotificationId, Role, User, UserId},
    services::{DirectoryServiceError, NotificationService, UserAdminService},
};
use taskboard::http::HttpApiClient;
use taskboard::remote::RemoteStoreError;
use taskboard::session::{
    adapters::file::FileTokenStore,
    domain::{AuthState, Credentials, Registration, SessionDomainError},
    ports::TokenStore,
    services::{SessionError, SessionService},
};
use taskboard::telemetry::{self, TelemetryError};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

type Session = SessionService<FileTokenStore, HttpApiClient, DefaultClock>;

/// Errors surfaced to the terminal.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] io::Error),
    #[error("cannot open token directory: {0}")]
    TokenDir(#[source] io::Error),
    #[error("cannot reach the API: {0}")]
    Client(#[source] RemoteStoreError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Mutation(#[from] MutationError),
    #[error(transparent)]
    Directory(#[from] DirectoryServiceError),
    #[error("invalid input: {0}")]
    Input(String),
    #[error("not signed in; run `taskboard login` first")]
    NotSignedIn,
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl From<BoardDomainError> for CliError {
    fn from(err: BoardDomainError) -> Self {
        Self::Input(err.to_string())
    }
}

impl From<DirectoryDomainError> for CliError {
    fn from(err: DirectoryDomainError) -> Self {
        Self::Input(err.to_string())
    }
}

impl From<SessionDomainError> for CliError {
    fn from(err: SessionDomainError) -> Self {
        Self::Input(err.to_string())
    }
}

/// Kanban board client.
#[derive(Debug, Parser)]
#[command(name = "taskboard", version, about)]
struct Cli {
    /// TOML configuration file layered between defaults and environment.
    #[arg(long, global = true, env = "TASKBOARD_CONFIG")]
    config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and store the issued token.
    Login {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password.
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in with it.
    Register {
        /// Display name.
        #[arg(long)]
        username: String,
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password.
        #[arg(long)]
        password: String,
    },
    /// Forget the stored token.
    Logout,
    /// Show the signed-in user and their task counts.
    Whoami,
    /// Print every column with its tasks.
    Board,
    /// Move a task to another column (or position).
    Move {
        /// Task identifier.
        task: String,
        /// Destination column identifier.
        column: String,
        /// Destination position; defaults to the end of the column.
        #[arg(long)]
        index: Option<usize>,
    },
    /// Create a task.
    Create(CreateArgs),
    /// Change fields of a task.
    Update(UpdateArgs),
    /// Delete a task.
    Delete {
        /// Task identifier.
        task: String,
    },
    /// List users.
    Users {
        /// Only users that tasks can be assigned to.
        #[arg(long)]
        assignable: bool,
    },
    /// Change a user's role (admin only).
    SetRole {
        /// User identifier.
        user: String,
        /// `admin` or `user`.
        role: String,
    },
    /// Delete a user (admin only).
    DeleteUser {
        /// User identifier.
        user: String,
    },
    /// List notifications.
    Notifications {
        /// Only unread notifications.
        #[arg(long)]
        unread: bool,
    },
    /// Mark a notification as read.
    Read {
        /// Notification identifier.
        notification: String,
    },
}

#[derive(Debug, Args)]
struct CreateArgs {
    /// Task title.
    #[arg(long)]
    title: String,
    /// Task description.
    #[arg(long)]
    description: String,
    /// Column the task starts in.
    #[arg(long, default_value = "backlog")]
    column: String,
    /// 1 (high) to 3 (low).
    #[arg(long, default_value_t = 2)]
    priority: u8,
    /// User id or name of the assignee.
    #[arg(long)]
    assignee: Option<String>,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// Task identifier.
    task: String,
    /// New title.
    #[arg(long)]
    title: Option<String>,
    /// New description.
    #[arg(long)]
    description: Option<String>,
    /// New column; the task moves to its end.
    #[arg(long)]
    column: Option<String>,
    /// New priority, 1 (high) to 3 (low).
    #[arg(long)]
    priority: Option<u8>,
    /// New assignee.
    #[arg(long)]
    assignee: Option<String>,
}

struct App {
    client: Arc<HttpApiClient>,
    session: Session,
}

fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    run(cli).map_err(Into::into)
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = ClientConfig::load(cli.config.as_deref())?;
    telemetry::init_tracing(config.telemetry())?;
    debug!(api = %config.api_url(), "configuration loaded");

    let tokens = Arc::new(FileTokenStore::open(config.token_dir()).map_err(CliError::TokenDir)?);
    let shared: Arc<dyn TokenStore> = tokens.clone();
    let client = Arc::new(HttpApiClient::from_config(&config, shared).map_err(CliError::Client)?);
    let session = SessionService::new(tokens, Arc::clone(&client), Arc::new(DefaultClock));
    let app = App { client, session };

    build_runtime()?.block_on(app.execute(cli.command))
}

fn build_runtime() -> Result<tokio::runtime::Runtime, CliError> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::RuntimeInit)
}

impl App {
    async fn execute(&self, command: Command) -> Result<(), CliError> {
        let mut out = io::stdout().lock();
        match command {
            Command::Login { email, password } => {
                let credentials = Credentials::new(email, password)?;
                let state = self.session.sign_in(&credentials).await?;
                write_identity(&mut out, &state)?;
            }
            Command::Register {
                username,
                email,
                password,
            } => {
                let registration = Registration::new(username, email, password)?;
                let state = self.session.register(&registration).await?;
                write_identity(&mut out, &state)?;
            }
            Command::Logout => {
                self.session.logout()?;
                writeln!(out, "signed out")?;
            }
            Command::Whoami => self.whoami(&mut out).await?,
            Command::Board => {
                let manager = self.board().await?;
                if let Some(board) = manager.snapshot().board() {
                    write_board(&mut out, board)?;
                }
            }
            Command::Move {
                task,
                column,
                index,
            } => self.move_task(&mut out, &task, &column, index).await?,
            Command::Create(args) => self.create(&mut out, args).await?,
            Command::Update(args) => self.update(&mut out, args).await?,
            Command::Delete { task } => {
                let manager = self.board().await?;
                manager.delete_task(&TaskId::new(task)?).await?;
                writeln!(out, "task deleted")?;
            }
            Command::Users { assignable } => self.users(&mut out, assignable).await?,
            Command::SetRole { user, role } => self.set_role(&mut out, user, &role).await?,
            Command::DeleteUser { user } => {
                let actor = self.signed_in().await?;
                let users = UserAdminService::new(Arc::clone(&self.client));
                users.delete_user(&actor, &UserId::new(user)?).await?;
                writeln!(out, "user deleted")?;
            }
            Command::Notifications { unread } => self.notifications(&mut out, unread).await?,
            Command::Read { notification } => self.mark_read(&mut out, notification).await?,
        }
        Ok(())
    }

    async fn signed_in(&self) -> Result<User, CliError> {
        let state = self.session.init().await?;
        state.user().cloned().ok_or(CliError::NotSignedIn)
    }

    async fn board(&self) -> Result<BoardStateManager<HttpApiClient>, CliError> {
        self.signed_in().await?;
        let manager = BoardStateManager::new(Arc::clone(&self.client));
        manager.load().await?;
        Ok(manager)
    }

    async fn whoami(&self, out: &mut impl Write) -> Result<(), CliError> {
        let user = self.signed_in().await?;
        let manager = BoardStateManager::new(Arc::clone(&self.client));
        manager.load().await?;
        writeln!(
            out,
            "{} <{}> ({})",
            user.username(),
            user.email(),
            user.role()
        )?;
        if let Some(stats) = manager.user_stats(user.id().as_str(), user.username()) {
            writeln!(
                out,
                "tasks: {} total, {} in progress, {} awaiting approval, {} done",
                stats.total, stats.in_progress, stats.pending, stats.completed
            )?;
        }
        Ok(())
    }

    async fn move_task(
        &self,
        out: &mut impl Write,
        task: &str,
        column: &str,
        index: Option<usize>,
    ) -> Result<(), CliError> {
        let manager = self.board().await?;
        let task_id = TaskId::new(task)?;
        let dest = ColumnId::new(column)?;
        let snapshot = manager.snapshot();
        let board = snapshot
            .board()
            .ok_or_else(|| CliError::Input("board is empty".to_owned()))?;
        let source = board
            .task(&task_id)
            .map(|found| found.state().clone())
            .ok_or_else(|| CliError::Input(format!("unknown task {task_id}")))?;
        let dest_len = board
            .column(&dest)
            .map(Column::len)
            .ok_or_else(|| CliError::Input(format!("unknown column {dest}")))?;
        let append_at = if source == dest {
            dest_len.saturating_sub(1)
        } else {
            dest_len
        };
        let dest_index = index.unwrap_or(append_at);

        let outcome = manager
            .move_between_columns(&task_id, &source, &dest, dest_index)
            .await?;
        match outcome {
            MoveOutcome::Unchanged => writeln!(out, "task already at that position")?,
            MoveOutcome::Reordered(_) => {
                writeln!(out, "reordered locally; column order is not saved")?;
            }
            MoveOutcome::Confirmed(_) => writeln!(out, "moved {task_id} to {dest}")?,
        }
        Ok(())
    }

    async fn create(&self, out: &mut impl Write, args: CreateArgs) -> Result<(), CliError> {
        let manager = self.board().await?;
        let priority = Priority::try_from(i64::from(args.priority))?;
        let mut draft = TaskDraft::new(
            args.title,
            args.description,
            ColumnId::new(args.column)?,
            priority,
        )?;
        if let Some(assignee) = args.assignee {
            draft = draft.with_assignee(assignee);
        }
        let task = manager.create_task(draft).await?;
        writeln!(out, "created {} in {}", task.id(), task.state())?;
        Ok(())
    }

    async fn update(&self, out: &mut impl Write, args: UpdateArgs) -> Result<(), CliError> {
        let manager = self.board().await?;
        let mut patch = TaskPatch::new();
        if let Some(title) = args.title {
            patch = patch.with_title(title)?;
        }
        if let Some(description) = args.description {
            patch = patch.with_description(description)?;
        }
        if let Some(column) = args.column {
            patch = patch.with_state(ColumnId::new(column)?);
        }
        if let Some(priority) = args.priority {
            patch = patch.with_priority(Priority::try_from(i64::from(priority))?)?;
        }
        if let Some(assignee) = args.assignee {
            patch = patch.with_assignee(assignee);
        }
        let task = manager.update_task(&TaskId::new(args.task)?, patch).await?;
        writeln!(out, "updated {} ({})", task.id(), task.state())?;
        Ok(())
    }

    async fn set_role(&self, out: &mut impl Write, user: String, role: &str) -> Result<(), CliError> {
        let actor = self.signed_in().await?;
        let new_role: Role = role.parse()?;
        let users = UserAdminService::new(Arc::clone(&self.client));
        let updated = users
            .update_role(&actor, &UserId::new(user)?, new_role)
            .await?;
        writeln!(out, "{} is now {}", updated.username(), updated.role())?;
        Ok(())
    }

    async fn notifications(&self, out: &mut impl Write, unread_only: bool) -> Result<(), CliError> {
        self.signed_in().await?;
        let service = NotificationService::new(Arc::clone(&self.client));
        let listed = service.load().await?;
        for notification in listed
            .iter()
            .filter(|candidate| !(unread_only && candidate.is_read()))
        {
            let marker = if notification.is_read() { ' ' } else { '*' };
            writeln!(
                out,
                "{marker} {} {} {}",
                notification.id(),
                notification.created_at().format("%Y-%m-%d %H:%M"),
                notification.message()
            )?;
        }
        Ok(())
    }

    async fn mark_read(&self, out: &mut impl Write, notification: String) -> Result<(), CliError> {
        self.signed_in().await?;
        let service = NotificationService::new(Arc::clone(&self.client));
        service.load().await?;
        service.mark_read(&NotificationId::new(notification)?).await?;
        writeln!(out, "{} unread", service.unread_count())?;
        Ok(())
    }

    async fn users(&self, out: &mut impl Write, assignable: bool) -> Result<(), CliError> {
        self.signed_in().await?;
        let service = UserAdminService::new(Arc::clone(&self.client));
        let users = if assignable {
            service.assignable_users().await?
        } else {
            service.list_users().await?
        };
        for user in users {
            writeln!(
                out,
                "{}\t{}\t{}\t{}",
                user.id(),
                user.username(),
                user.email(),
                user.role()
            )?;
        }
        Ok(())
    }
}

fn write_identity(out: &mut impl Write, state: &AuthState) -> io::Result<()> {
    match state.user() {
        Some(user) if state.is_admin() => {
            writeln!(out, "signed in as {} (admin)", user.username())
        }
        Some(user) => writeln!(out, "signed in as {}", user.username()),
        None => writeln!(out, "not signed in"),
    }
}

fn write_board(out: &mut impl Write, board: &Board) -> io::Result<()> {
    for column in board.ordered_columns() {
        writeln!(out, "{} [{}] ({})", column.title(), column.id(), column.len())?;
        for task in board.tasks_in(column.id()) {
            let assignee = task.assignee().unwrap_or("-");
            writeln!(
                out,
                "  {} [{}] {} @{}",
                task.id(),
                task.priority().label(),
                task.title(),
                assignee
            )?;
        }
    }
    Ok(())
}
