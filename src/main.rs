//nodian/src/main.rs
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use nodian::kernel::services::adapters::{
    get_config_path, get_state_path, ConfigService, JsonFileStore, LocalFileSystem, MemoryStore,
};
use nodian::kernel::services::ports::KeyValueStore;
use nodian::kernel::{EntryKind, Workspace, WorkspaceError};
use nodian::models::{join_path, normalize_path, FileTreeRow};

mod logging;

const USAGE: &str = "usage: nodian [--root DIR] <command>

commands:
  tree                  print the workspace tree
  open PATH             print a file
  write PATH TEXT       replace a file's content
  new-file PARENT NAME  create an empty file
  new-dir PARENT NAME   create a directory
  mv FROM TO            rename a file or directory
  rm PATH               delete a file or directory

Relative paths are resolved against the workspace root.";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Tree,
    Open(String),
    Write(String, String),
    NewFile(String, String),
    NewDir(String, String),
    Move(String, String),
    Remove(String),
}

#[derive(Debug)]
struct Cli {
    root: Option<String>,
    command: Command,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Cli, String> {
    let mut root = None;
    let mut rest = Vec::new();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--root" {
            root = Some(args.next().ok_or("--root needs a directory")?);
        } else if let Some(value) = arg.strip_prefix("--root=") {
            root = Some(value.to_string());
        } else {
            rest.push(arg);
        }
    }

    let mut rest = rest.into_iter();
    let name = rest.next().ok_or("missing command")?;
    let mut operand = |what: &str| {
        rest.next()
            .ok_or_else(|| format!("{name}: missing {what}"))
    };
    let command = match name.as_str() {
        "tree" => Command::Tree,
        "open" => Command::Open(operand("PATH")?),
        "write" => Command::Write(operand("PATH")?, operand("TEXT")?),
        "new-file" => Command::NewFile(operand("PARENT")?, operand("NAME")?),
        "new-dir" => Command::NewDir(operand("PARENT")?, operand("NAME")?),
        "mv" => Command::Move(operand("FROM")?, operand("TO")?),
        "rm" => Command::Remove(operand("PATH")?),
        other => return Err(format!("unknown command: {other}")),
    };
    Ok(Cli { root, command })
}

fn main() -> ExitCode {
    let cli = match parse_args(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("{message}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let _logging = logging::init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), WorkspaceError> {
    let config = get_config_path()
        .map(|path| ConfigService::load(&path))
        .unwrap_or_default();
    let store: Arc<dyn KeyValueStore> = match get_state_path() {
        Some(path) => Arc::new(JsonFileStore::open(path)),
        None => Arc::new(MemoryStore::new()),
    };
    let fs = Arc::new(LocalFileSystem::with_config(config.workspace().clone()));
    let workspace = Workspace::new(fs, store, config.workspace().clone());

    let mut root = workspace.load_initial_root().await?;
    if let Some(dir) = &cli.root {
        let cwd = std::env::current_dir().unwrap_or_default();
        let dir = absolute(&cwd, dir);
        if dir != root {
            workspace.set_root(&dir).await?;
            root = dir;
        }
    }

    match cli.command {
        Command::Tree => {
            workspace.expand_all();
            print_rows(&workspace.rows());
        }
        Command::Open(path) => {
            let path = resolve(&root, &path);
            workspace.select(&path).await?;
            if let Some(doc) = workspace.document(&path) {
                print!("{}", doc.content);
            }
        }
        Command::Write(path, text) => {
            let path = resolve(&root, &path);
            workspace.open(&path).await?;
            workspace.edit(&path, text)?;
            workspace.save(&path).await?;
        }
        Command::NewFile(parent, name) => {
            let created = workspace
                .create(&resolve(&root, &parent), &name, EntryKind::File)
                .await?;
            println!("{created}");
        }
        Command::NewDir(parent, name) => {
            let created = workspace
                .create(&resolve(&root, &parent), &name, EntryKind::Directory)
                .await?;
            println!("{created}");
        }
        Command::Move(from, to) => {
            workspace
                .rename(&resolve(&root, &from), &resolve(&root, &to))
                .await?;
        }
        Command::Remove(path) => {
            workspace.delete(&resolve(&root, &path)).await?;
        }
    }
    Ok(())
}

fn absolute(cwd: &Path, dir: &str) -> String {
    let path = Path::new(dir);
    if path.is_absolute() {
        normalize_path(dir)
    } else {
        normalize_path(&cwd.join(path).to_string_lossy())
    }
}

fn resolve(root: &str, path: &str) -> String {
    if path == "." {
        root.to_string()
    } else if Path::new(path).is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&join_path(root, path))
    }
}

fn print_rows(rows: &[FileTreeRow]) {
    for row in rows {
        let indent = "  ".repeat(row.depth as usize);
        let suffix = if row.is_dir { "/" } else { "" };
        println!("{indent}{}{suffix}", row.name);
    }
}

#[cfg(test)]
#[path = "../tests/unit/cli_startup_paths.rs"]
mod tests;
