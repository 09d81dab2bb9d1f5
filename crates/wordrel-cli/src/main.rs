//! WordRel CLI
//!
//! Command-line interface for:
//! - Answering a parsed question against a parsed corpus (`ask`)
//! - Inspecting how a question normalizes (`vars`)
//! - Converting atom notation to binary snapshots (`.wrdb`) and back (`snapshot`, `show`)

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wordrel_atomspace::{Atom, AtomSpace, AtomType, Handle, SNAPSHOT_MAGIC};
use wordrel_query::{QueryConfig, QueryPredicate, QueryReport, RelationMatchMode, WordRelQuery};

#[derive(Parser)]
#[command(name = "wordrel")]
#[command(
    author,
    version,
    about = "WordRel: answer questions by unifying dependency graphs"
)]
struct Cli {
    /// Raise log verbosity (`-v` debug, `-vv` trace). `RUST_LOG` wins if set.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a question against a corpus
    Ask(AskArgs),

    /// Show the normalized predicate and bound variables of a question
    Vars {
        /// Question in atom notation
        #[arg(short, long)]
        question: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Write atom notation (or merged inputs) as a binary snapshot
    Snapshot {
        /// Atom notation or `.wrdb` files, loaded in order
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        #[arg(short, long)]
        out: PathBuf,
    },

    /// Render a text or snapshot file in atom notation
    Show {
        #[arg(short, long)]
        input: PathBuf,

        /// Print atom counts per type instead of the atoms
        #[arg(long)]
        stats: bool,
    },
}

#[derive(Args)]
struct AskArgs {
    /// Corpus files (atom notation or `.wrdb`), loaded in order
    #[arg(short, long, required = true, num_args = 1..)]
    corpus: Vec<PathBuf>,

    /// Question in atom notation
    #[arg(short, long)]
    question: PathBuf,

    /// Query config (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Both relationship names must be `isa`/`hypothetical_isa`
    #[arg(long, conflicts_with = "legacy")]
    strict: bool,

    /// Only the question's relationship name is checked
    #[arg(long)]
    legacy: bool,

    /// Stop at the first accepted answer
    #[arg(long)]
    first: bool,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Write the store (with answers attached) as a snapshot
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Ask(args) => cmd_ask(&args)?,
        Commands::Vars { question, json } => cmd_vars(&question, json)?,
        Commands::Snapshot { input, out } => cmd_snapshot(&input, &out)?,
        Commands::Show { input, stats } => cmd_show(&input, stats)?,
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// ============================================================================
// Loading
// ============================================================================

/// Load one file into `space`: a `.wrdb` snapshot (detected by magic, not
/// extension) or atom notation. Returns the top-level atoms: the expressions
/// as written for text, the atoms no link contains for a snapshot.
fn load_into(space: &mut AtomSpace, path: &Path) -> Result<Vec<Handle>> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;

    if bytes.starts_with(SNAPSHOT_MAGIC) {
        let snap = AtomSpace::from_bytes(&bytes)
            .with_context(|| format!("invalid snapshot {}", path.display()))?;
        let remap = merge_snapshot(space, &snap)?;
        return Ok(root_atoms(&snap)?
            .into_iter()
            .map(|h| remap[h.raw() as usize])
            .collect());
    }

    let text = std::str::from_utf8(&bytes)
        .with_context(|| format!("{} is neither a snapshot nor UTF-8 text", path.display()))?;
    space
        .import_text(text)
        .with_context(|| format!("in {}", path.display()))
}

/// Copy every atom of `snap` into `space`. Snapshots never contain forward
/// references, so one pass in handle order suffices.
fn merge_snapshot(space: &mut AtomSpace, snap: &AtomSpace) -> Result<Vec<Handle>> {
    let mut remap: Vec<Handle> = Vec::with_capacity(snap.len());
    for (_, atom) in snap.iter() {
        let h = match atom {
            Atom::Node { atom_type, name } => space.add_node(*atom_type, name)?,
            Atom::Link {
                atom_type,
                outgoing,
            } => {
                let children = outgoing
                    .iter()
                    .map(|c| remap[c.raw() as usize])
                    .collect();
                space.add_link(*atom_type, children)?
            }
        };
        remap.push(h);
    }
    Ok(remap)
}

fn load_all(paths: &[PathBuf]) -> Result<AtomSpace> {
    let mut space = AtomSpace::new();
    for path in paths {
        load_into(&mut space, path)?;
    }
    Ok(space)
}

/// Atoms that no link contains, in handle order.
fn root_atoms(space: &AtomSpace) -> Result<Vec<Handle>> {
    let mut roots = Vec::new();
    for (h, _) in space.iter() {
        if space.incoming(h)?.is_empty() {
            roots.push(h);
        }
    }
    Ok(roots)
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_ask(args: &AskArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => QueryConfig::from_json_file(path)?,
        None => QueryConfig::default(),
    };
    if args.strict {
        config.relation_match = RelationMatchMode::Strict;
    }
    if args.legacy {
        config.relation_match = RelationMatchMode::Legacy;
    }
    if args.first {
        config.stop_at_first_answer = true;
    }

    let mut space = load_all(&args.corpus)?;
    let corpus_atoms = space.len();
    let roots = load_into(&mut space, &args.question)?;
    tracing::debug!(
        corpus_atoms,
        question_roots = roots.len(),
        "loaded corpus and question"
    );

    let mut query = WordRelQuery::new(config);
    let report = query.solve(&mut space, &roots)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if let Some(out) = &args.save {
        write_snapshot(&space, out)?;
    }
    Ok(())
}

fn print_report(report: &QueryReport) {
    let names = report.distinct_answer_names();
    if names.is_empty() {
        println!("{}", "no answer found".yellow());
    }
    for name in &names {
        println!("{}", name.green().bold());
    }

    eprintln!(
        "{} {} grounding(s), {} answer(s), {} rejected",
        "ok".green().bold(),
        report.stats.groundings,
        report.answers.len(),
        report.rejected_variable_by_variable + report.rejected_malformed
    );
    if report.stats.truncated {
        eprintln!(
            "{} grounding limit reached; answers may be incomplete",
            "info:".yellow().bold()
        );
    }
}

#[derive(Serialize)]
struct VarsOutput {
    clauses: Vec<String>,
    vars: Vec<String>,
}

fn cmd_vars(question: &Path, json: bool) -> Result<()> {
    let mut space = AtomSpace::new();
    let roots = load_into(&mut space, question)?;
    let predicate = QueryPredicate::assemble(&space, &roots)?;

    let out = VarsOutput {
        clauses: predicate
            .predicate()
            .iter()
            .map(|&h| space.render(h))
            .collect::<Result<_, _>>()?,
        vars: predicate
            .vars()
            .iter()
            .map(|&h| space.render(h))
            .collect::<Result<_, _>>()?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{} ({})", "predicate".bold(), out.clauses.len());
    for clause in &out.clauses {
        println!("{clause}");
    }
    println!("{} ({})", "variables".bold(), out.vars.len());
    for var in &out.vars {
        println!("{var}");
    }
    Ok(())
}

fn write_snapshot(space: &AtomSpace, out: &Path) -> Result<()> {
    let bytes = space.to_bytes()?;
    fs::write(out, bytes).with_context(|| format!("failed to write {}", out.display()))?;
    eprintln!("{} {}", "wrote".green().bold(), out.display().to_string().bold());
    Ok(())
}

fn cmd_snapshot(inputs: &[PathBuf], out: &Path) -> Result<()> {
    let space = load_all(inputs)?;
    if space.is_empty() {
        return Err(anyhow!("no atoms in input"));
    }
    write_snapshot(&space, out)?;
    println!("{} atoms", space.len());
    Ok(())
}

fn cmd_show(input: &Path, stats: bool) -> Result<()> {
    let mut space = AtomSpace::new();
    load_into(&mut space, input)?;

    if stats {
        for atom_type in AtomType::ALL {
            let n = space.type_count(atom_type);
            if n > 0 {
                println!("{:<36} {n}", atom_type.as_str());
            }
        }
        println!("{:<36} {}", "total".bold(), space.len());
        return Ok(());
    }

    for h in root_atoms(&space)? {
        println!("{}", space.render(h)?);
    }
    Ok(())
}
