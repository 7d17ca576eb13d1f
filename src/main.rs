use anyhow::Result;
use bitlet::areas::repository::Repository;
use bitlet::artifacts::core::CommandOutput;
use bitlet::errors::RepositoryError;
use bitlet::logging::init_logging;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use is_terminal::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "bitlet",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A tiny local version-control system",
    long_about = "bitlet keeps snapshots of a directory, one staging area per branch, \
    and merges branches with conflict markers. Everything is stored under `.bitlet`.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(
        short = 'C',
        global = true,
        value_name = "PATH",
        help = "Run as if bitlet was started in <PATH>"
    )]
    directory: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Create a new repository",
        long_about = "Creates `.bitlet` in the working directory together with the initial commit \
        and the `master` branch."
    )]
    Init,
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "rm", about = "Unstage a file or stage it for removal")]
    Rm {
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "commit", about = "Record the staged changes")]
    Commit {
        #[arg(index = 1, help = "The commit message")]
        message: String,
    },
    #[command(name = "log", about = "Show the history of the current branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of commits with the given message")]
    Find {
        #[arg(index = 1)]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged changes and untracked files")]
    Status,
    #[command(name = "branch", about = "Create a branch at the current head")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch pointer")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(
        name = "checkout",
        about = "Switch branches or restore a file",
        long_about = "`checkout <branch>` switches to a branch, `checkout -- <file>` restores a \
        file from the current head and `checkout <commit> -- <file>` restores it from any commit."
    )]
    Checkout {
        #[arg(index = 1, help = "Branch name, or commit id when a file is given")]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "File to restore")]
        file: Option<String>,
    },
    #[command(name = "reset", about = "Move the current branch to a commit")]
    Reset {
        #[arg(index = 1)]
        commit: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
}

impl Commands {
    fn wants_pager(&self) -> bool {
        matches!(self, Commands::Log | Commands::GlobalLog)
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    if let Commands::Checkout {
        target: None,
        file: None,
    } = cli.command
    {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "checkout needs a branch, `-- <file>` or `<commit> -- <file>`",
            )
            .exit();
    }
    init_logging()?;

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let pwd = match &cli.directory {
        Some(directory) => directory.clone(),
        None => std::env::current_dir()?,
    };
    let output = CommandOutput::select(cli.command.wants_pager());

    let outcome = run(&cli.command, pwd, &output);
    output.finish()?;

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(error) if error.is_no_op() => {
            println!("{error}");
            Ok(ExitCode::SUCCESS)
        }
        Err(RepositoryError::Internal(error)) => Err(error),
        Err(error) => {
            tracing::debug!(?error, "command failed");
            eprintln!("{error}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Run one command; the state is saved only when it succeeds
fn run(command: &Commands, pwd: PathBuf, output: &CommandOutput) -> bitlet::errors::Result<()> {
    if let Commands::Init = command {
        Repository::init(&pwd, output.writer())?;
        return Ok(());
    }

    let mut repository = Repository::open(&pwd, output.writer())?;

    match command {
        Commands::Init => {}
        Commands::Add { file } => repository.add(file)?,
        Commands::Rm { file } => repository.rm(file)?,
        Commands::Commit { message } => {
            repository.commit(message)?;
        }
        Commands::Log => repository.log()?,
        Commands::GlobalLog => repository.global_log()?,
        Commands::Find { message } => repository.find(message)?,
        Commands::Status => repository.status()?,
        Commands::Branch { name } => repository.branch(name)?,
        Commands::RmBranch { name } => repository.rm_branch(name)?,
        Commands::Checkout { target, file } => match (target, file) {
            (Some(branch), None) => repository.checkout_branch(branch)?,
            (None, Some(file)) => repository.checkout_file(file)?,
            (Some(commit), Some(file)) => repository.checkout_file_from(commit, file)?,
            (None, None) => {}
        },
        Commands::Reset { commit } => repository.reset(commit)?,
        Commands::Merge { branch } => {
            repository.merge(branch)?;
        }
    }

    repository.save()
}
