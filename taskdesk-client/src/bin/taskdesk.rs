//! TaskDesk command-line client.
//!
//! ```bash
//! taskdesk register alice --password secret1
//! taskdesk login alice --password secret1
//! taskdesk add "buy milk" --description "2 litres"
//! taskdesk list
//! taskdesk toggle 1
//! taskdesk rm 1
//! taskdesk logout
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use taskdesk_client::{
    api::{ApiClient, NewTask, Task, TaskPatch, DEFAULT_BASE_URL},
    error::ClientError,
    forms::{LoginForm, RegisterForm},
    routes::{resolve, View},
    session::{Session, TokenStorage},
};
use tracing_subscriber::EnvFilter;

/// TaskDesk personal task tracker
#[derive(Debug, Parser)]
#[command(name = "taskdesk", version, about, long_about = None)]
struct Cli {
    /// API base URL
    #[arg(long, env = "TASKDESK_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    api_url: String,

    /// Where the login token is kept (default: platform config directory)
    #[arg(long, env = "TASKDESK_TOKEN_FILE", global = true)]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create an account
    Register {
        username: String,
        #[arg(long, env = "TASKDESK_PASSWORD")]
        password: String,
        /// Password confirmation (defaults to --password)
        #[arg(long)]
        confirm: Option<String>,
    },
    /// Log in and remember the token
    Login {
        username: String,
        #[arg(long, env = "TASKDESK_PASSWORD")]
        password: String,
    },
    /// Forget the stored token
    Logout,
    /// List your tasks
    List,
    /// Add a task
    Add {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Flip a task between open and done
    Toggle { id: i64 },
    /// Change a task's title or description
    Edit {
        id: i64,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long, conflicts_with = "clear_description")]
        description: Option<String>,
        /// Remove the description
        #[arg(long)]
        clear_description: bool,
    },
    /// Delete a task
    Rm { id: i64 },
}

impl Cli {
    async fn execute(self) -> Result<(), ClientError> {
        let storage = match &self.token_file {
            Some(path) => TokenStorage::new(path),
            None => TokenStorage::default_location()?,
        };
        let session = Session::restore(storage)?;
        let client = ApiClient::new(&self.api_url, session)?;

        match self.command {
            Commands::Register {
                username,
                password,
                confirm,
            } => {
                let confirm = confirm.unwrap_or_else(|| password.clone());
                client
                    .register(&RegisterForm::new(username, password, confirm))
                    .await?;
                println!("Registered. Run `taskdesk login` to sign in.");
            }
            Commands::Login { username, password } => {
                client.login(&LoginForm::new(username, password)).await?;
                println!("Logged in.");
            }
            Commands::Logout => {
                client.logout()?;
                println!("Logged out.");
            }
            command => {
                if resolve(View::Tasks, client.session()) != View::Tasks {
                    return Err(ClientError::NotLoggedIn);
                }
                run_task_command(&client, command).await?;
            }
        }

        Ok(())
    }
}

async fn run_task_command(client: &ApiClient, command: Commands) -> Result<(), ClientError> {
    match command {
        Commands::List => {
            let tasks = client.list_tasks().await?;
            if tasks.is_empty() {
                println!("No tasks.");
            }
            for task in &tasks {
                print_task(task);
            }
        }
        Commands::Add { title, description } => {
            let task = client
                .create_task(&NewTask { title, description })
                .await?;
            print_task(&task);
        }
        Commands::Toggle { id } => {
            let task = client
                .list_tasks()
                .await?
                .into_iter()
                .find(|task| task.id == id)
                .ok_or_else(|| ClientError::Api {
                    status: 404,
                    code: "not_found".to_string(),
                    message: "Task not found".to_string(),
                })?;
            print_task(&client.toggle_complete(&task).await?);
        }
        Commands::Edit {
            id,
            title,
            description,
            clear_description,
        } => {
            let description = if clear_description {
                Some(None)
            } else {
                description.map(Some)
            };
            let patch = TaskPatch {
                title,
                description,
                ..Default::default()
            };
            print_task(&client.update_task(id, &patch).await?);
        }
        Commands::Rm { id } => {
            println!("{}", client.delete_task(id).await?);
        }
        Commands::Register { .. } | Commands::Login { .. } | Commands::Logout => {}
    }

    Ok(())
}

fn print_task(task: &Task) {
    let mark = if task.is_complete { "x" } else { " " };
    match &task.description {
        Some(description) => println!("[{}] {:>4}  {} - {}", mark, task.id, task.title, description),
        None => println!("[{}] {:>4}  {}", mark, task.id, task.title),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli.execute().await {
        match e {
            ClientError::NotLoggedIn => eprintln!("Not logged in. Run `taskdesk login` first."),
            other => eprintln!("Error: {}", other),
        }
        std::process::exit(1);
    }
}
