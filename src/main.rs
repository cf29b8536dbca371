mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::Config;
use graph::{CharsetProfile, CommitOrder, GitWalker, TextRenderer};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tsgit_core::{ConflictError, ConflictFile, MergeOps, Resolution};

#[derive(Parser)]
#[command(name = "tsgit")]
#[command(about = "Commit graphs and conflict resolution for Git repositories", long_about = None)]
struct Cli {
    /// Configuration file (defaults to <repo>/.tsgit.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the commit graph
    Graph {
        /// Path to the repository
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Maximum number of commits to collect
        #[arg(short = 'n', long)]
        max_commits: Option<usize>,
        /// Order commits topologically instead of by timestamp
        #[arg(long)]
        topo: bool,
        /// Use ASCII glyphs
        #[arg(long)]
        ascii: bool,
        /// Print the graph model as JSON
        #[arg(long)]
        json: bool,
    },
    /// List conflicted files
    Conflicts {
        /// Path to the repository
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Show the conflict hunks of a file
    Show {
        /// File relative to the repository root
        file: PathBuf,
        /// Path to the repository
        #[arg(long, default_value = ".")]
        repo: PathBuf,
        /// Print the parsed file as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve conflict hunks and stage the result
    Resolve {
        /// File relative to the repository root
        file: PathBuf,
        /// Path to the repository
        #[arg(long, default_value = ".")]
        repo: PathBuf,
        /// Resolve every hunk the same way
        #[arg(long, value_enum)]
        all: Option<Choice>,
        /// Resolve one hunk, as ID=CHOICE
        #[arg(long, value_name = "ID=CHOICE")]
        choose: Vec<String>,
        /// Replace one hunk with the contents of a file, as ID=FILE
        #[arg(long, value_name = "ID=FILE")]
        custom: Vec<String>,
        /// Print the result instead of writing it
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Choice {
    Ours,
    Theirs,
    Both,
    Neither,
}

impl From<Choice> for Resolution {
    fn from(choice: Choice) -> Self {
        match choice {
            Choice::Ours => Resolution::Ours,
            Choice::Theirs => Resolution::Theirs,
            Choice::Both => Resolution::Both,
            Choice::Neither => Resolution::Neither,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let repo_root = match &cli.command {
        Commands::Graph { path, .. } | Commands::Conflicts { path } => path,
        Commands::Show { repo, .. } | Commands::Resolve { repo, .. } => repo,
    };
    let (config, config_path) = Config::discover(cli.config.as_deref(), repo_root)?;
    init_logging(&config.log_level, cli.verbose);
    match &config_path {
        Some(path) => debug!(path = %path.display(), "loaded config"),
        None => debug!("no config file, using defaults"),
    }

    match cli.command {
        Commands::Graph { path, max_commits, topo, ascii, json } => {
            let mut options = config.graph.build_options();
            if let Some(max_commits) = max_commits {
                options.max_commits = max_commits;
            }
            if topo {
                options.order = CommitOrder::Topological;
            }

            let walker = GitWalker::new(Some(path.as_path()))?;
            let model = walker.into_graph(options);
            debug!(stats = ?model.stats(), "graph ready");

            if json {
                println!("{}", serde_json::to_string_pretty(&model)?);
            } else {
                let charset = if ascii { CharsetProfile::Ascii } else { config.graph.charset };
                let renderer = TextRenderer::new(charset, config.graph.message_width);
                print!("{}", renderer.render(&model));
            }
        }
        Commands::Conflicts { path } => {
            let ops = MergeOps::open(&path)?;
            let paths = ops.conflicted_paths()?;

            if paths.is_empty() {
                println!("No conflicts");
                return Ok(());
            }

            for conflicted in paths {
                match ops.load_conflict(&conflicted) {
                    Ok(file) => println!(
                        "{}: {} conflict(s)",
                        conflicted,
                        file.hunks().len()
                    ),
                    Err(err) => {
                        debug!(path = %conflicted, error = %err, "could not parse conflicted file");
                        println!("{}: unreadable ({})", conflicted, err);
                    }
                }
            }
        }
        Commands::Show { file, repo, json } => {
            let ops = MergeOps::open(&repo)?;
            let conflict = ops.load_conflict(&file)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&conflict)?);
            } else {
                print_hunks(&conflict);
            }
        }
        Commands::Resolve { file, repo, all, choose, custom, dry_run } => {
            let ops = MergeOps::open(&repo)?;
            let mut conflict = ops.load_conflict(&file)?;

            if let Some(choice) = all {
                conflict.resolve_all(choice.into());
            }
            for assignment in &choose {
                let (id, choice) = parse_choice(assignment)?;
                conflict.resolve(id, choice.into())?;
            }
            for assignment in &custom {
                let (id, source) = split_assignment(assignment)?;
                let lines = read_custom_lines(Path::new(source))?;
                conflict.resolve(id, Resolution::Custom(lines))?;
            }

            if dry_run {
                println!("{}", conflict.generate());
                return Ok(());
            }

            match ops.write_resolution(&conflict) {
                Ok(written) => println!(
                    "Resolved {} hunk(s) in {}",
                    conflict.hunks().len(),
                    written.display()
                ),
                Err(ConflictError::Unresolved { path, remaining }) => {
                    let open: Vec<String> = conflict
                        .hunks()
                        .iter()
                        .filter(|hunk| !hunk.is_resolved())
                        .map(|hunk| hunk.id.to_string())
                        .collect();
                    bail!(
                        "{} still has {} unresolved hunk(s): {}",
                        path,
                        remaining,
                        open.join(", ")
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    Ok(())
}

fn init_logging(level: &str, verbose: bool) {
    let default = if verbose { "debug" } else { level };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_hunks(file: &ConflictFile) {
    println!("{}: {} conflict(s)", file.path, file.hunks().len());

    for hunk in file.hunks() {
        println!();
        println!(
            "[{}] lines {}-{}{}",
            hunk.id,
            hunk.marker_start + 1,
            hunk.marker_end + 1,
            if hunk.terminated { "" } else { " (unterminated)" }
        );
        print_side(&format!("ours {}", hunk.ours_label), &hunk.ours);
        if let Some(base) = &hunk.base {
            print_side(
                &format!("base {}", hunk.base_label.as_deref().unwrap_or("")),
                base,
            );
        }
        print_side(
            &format!("theirs {}", hunk.theirs_label.as_deref().unwrap_or("")),
            &hunk.theirs,
        );
    }
}

fn print_side(title: &str, lines: &[String]) {
    println!("  {}:", title.trim_end());
    for line in lines {
        println!("    | {}", line);
    }
}

fn split_assignment(assignment: &str) -> Result<(usize, &str)> {
    let (id, value) = assignment
        .split_once('=')
        .with_context(|| format!("expected ID=VALUE, got '{}'", assignment))?;
    let id = id
        .trim()
        .parse()
        .with_context(|| format!("invalid hunk id in '{}'", assignment))?;
    Ok((id, value.trim()))
}

fn parse_choice(assignment: &str) -> Result<(usize, Choice)> {
    let (id, value) = split_assignment(assignment)?;
    match Choice::from_str(value, true) {
        Ok(choice) => Ok((id, choice)),
        Err(_) => bail!("unknown resolution '{}' (expected ours, theirs, both or neither)", value),
    }
}

fn read_custom_lines(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(content.lines().map(str::to_string).collect())
}
