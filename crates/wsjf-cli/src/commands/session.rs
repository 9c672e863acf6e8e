//! Interactive session over stdin.
//!
//! Each line is one event: add, delete, a weight change, or an export. The
//! backlog lives only for the duration of the session.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use wsjf_core::{
    Backlog, InitiativeDraft, ReportExporter, ReportOptions, ScoreSet, WeightField,
};

use super::load_config;
use crate::table;

#[derive(Args)]
pub struct SessionArgs {
    /// Directory reports are written to when `export` is given no path
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

const HELP: &str = "\
Commands:
  add <name> <uv> <tc> <rr> <cr> <job>   add an initiative (scores 1-10, job 1-20)
  delete <id | id prefix | #rank>        remove an initiative
  weight <field> <value>                 change a weight and re-rank
  weights                                show the configured weights
  list                                   show the ranked initiatives
  export [path]                          write the PDF report
  help                                   show this help
  quit                                   leave the session";

#[derive(Debug, Clone, PartialEq)]
enum SessionCommand {
    Add(InitiativeDraft),
    Delete(String),
    Weight(WeightField, String),
    Weights,
    List,
    Export(Option<PathBuf>),
    Help,
    Quit,
}

/// Split a line on whitespace; double quotes group words.
fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() || quoted {
                    tokens.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            c => current.push(c),
        }
    }
    if in_quotes {
        return Err("unterminated quote".into());
    }
    if !current.is_empty() || quoted {
        tokens.push(current);
    }
    Ok(tokens)
}

fn parse_number(label: &str, raw: &str) -> Result<f64, String> {
    raw.parse::<f64>()
        .map_err(|_| format!("{label} must be a number, got '{raw}'"))
}

fn parse_command(line: &str) -> Result<Option<SessionCommand>, String> {
    let tokens = tokenize(line)?;
    let Some((head, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "add" => {
            if args.len() < 6 {
                return Err("usage: add <name> <uv> <tc> <rr> <cr> <job>".into());
            }
            // Everything before the five numbers is the name.
            let (name_parts, numbers) = args.split_at(args.len() - 5);
            let scores = ScoreSet::new(
                parse_number("uv", &numbers[0])?,
                parse_number("tc", &numbers[1])?,
                parse_number("rr", &numbers[2])?,
                parse_number("cr", &numbers[3])?,
            );
            let job_size = parse_number("job", &numbers[4])?;
            SessionCommand::Add(InitiativeDraft::new(name_parts.join(" "), scores, job_size))
        }
        "delete" | "del" | "rm" => match args {
            [id] => SessionCommand::Delete(id.clone()),
            _ => return Err("usage: delete <id | id prefix | #rank>".into()),
        },
        "weight" | "w" => match args {
            [field, value] => SessionCommand::Weight(
                field.parse::<WeightField>().map_err(|e| e.to_string())?,
                value.clone(),
            ),
            _ => return Err("usage: weight <field> <value>".into()),
        },
        "weights" => SessionCommand::Weights,
        "list" | "ls" => SessionCommand::List,
        "export" => match args {
            [] => SessionCommand::Export(None),
            [path] => SessionCommand::Export(Some(PathBuf::from(path))),
            _ => return Err("usage: export [path]".into()),
        },
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(command))
}

/// Resolve `#rank`, a full id, or a unique id prefix to an id.
fn resolve_id(backlog: &Backlog, target: &str) -> Result<String, String> {
    let not_found = || format!("no initiative matches '{target}'");
    let initiatives = backlog.initiatives();

    if let Some(rank) = target.strip_prefix('#') {
        return rank
            .parse::<usize>()
            .ok()
            .and_then(|rank| rank.checked_sub(1))
            .and_then(|index| initiatives.as_slice().get(index))
            .map(|i| i.id().to_string())
            .ok_or_else(not_found);
    }
    if let Some(initiative) = initiatives.get(target) {
        return Ok(initiative.id().to_string());
    }
    if target.is_empty() {
        return Err(not_found());
    }

    let mut matches = initiatives.iter().filter(|i| i.id().starts_with(target));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Ok(only.id().to_string()),
        (Some(_), Some(_)) => Err(format!("'{target}' matches more than one initiative")),
        (None, _) => Err(not_found()),
    }
}

/// Drives a backlog from line-oriented input.
pub struct Session {
    backlog: Backlog,
    exporter: ReportExporter,
    output_dir: PathBuf,
}

impl Session {
    pub fn new(backlog: Backlog, exporter: ReportExporter, output_dir: PathBuf) -> Self {
        Self {
            backlog,
            exporter,
            output_dir,
        }
    }

    /// Handle one line. Returns `false` when the session should end.
    fn handle<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<bool> {
        let command = match parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(true),
            Err(message) => {
                writeln!(out, "error: {message}")?;
                return Ok(true);
            }
        };

        match command {
            SessionCommand::Add(draft) => match self.backlog.add(draft) {
                Ok(initiative) => {
                    let id = initiative.id().to_string();
                    let (cod, wsjf) = (initiative.cod(), initiative.wsjf());
                    writeln!(out, "added {id} (CoD {cod:.2}, WSJF {wsjf:.2})")?;
                }
                Err(e) => writeln!(out, "error: {e}")?,
            },
            SessionCommand::Delete(target) => {
                match resolve_id(&self.backlog, &target) {
                    Ok(id) => match self.backlog.delete(&id) {
                        Some(initiative) => writeln!(out, "deleted {}", initiative.name())?,
                        None => writeln!(out, "no initiative matches '{target}'")?,
                    },
                    Err(message) => writeln!(out, "error: {message}")?,
                }
            }
            SessionCommand::Weight(field, raw) => {
                let value = self.backlog.set_weight(field, &raw);
                writeln!(out, "{} weight set to {value}", field.code())?;
                write!(out, "{}", table::render_initiatives(self.backlog.initiatives()))?;
            }
            SessionCommand::Weights => write!(out, "{}", table::render_weights(self.backlog.weights()))?,
            SessionCommand::List => write!(out, "{}", table::render_initiatives(self.backlog.initiatives()))?,
            SessionCommand::Export(path) => {
                let path = path.unwrap_or_else(|| self.output_dir.join(self.exporter.default_file_name()));
                match self.backlog.export(&self.exporter, &path) {
                    Ok(outcome) => writeln!(
                        out,
                        "report written: {} ({} page(s), {} layout)",
                        outcome.path.display(),
                        outcome.pages,
                        outcome.layout
                    )?,
                    Err(e) => writeln!(out, "error: {e}")?,
                }
            }
            SessionCommand::Help => writeln!(out, "{HELP}")?,
            SessionCommand::Quit => return Ok(false),
        }

        for event in self.backlog.drain_events() {
            tracing::debug!(?event, "backlog event");
        }
        Ok(true)
    }

    /// Read commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W, prompt: bool) -> io::Result<()> {
        if prompt {
            write!(out, "wsjf> ")?;
            out.flush()?;
        }
        for line in input.lines() {
            if !self.handle(&line?, out)? {
                break;
            }
            if prompt {
                write!(out, "wsjf> ")?;
                out.flush()?;
            }
        }
        Ok(())
    }

    pub fn backlog(&self) -> &Backlog {
        &self.backlog
    }
}

pub fn run(args: SessionArgs, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let exporter = ReportExporter::new(ReportOptions::from(&config.report));
    let mut session = Session::new(Backlog::new(config.weights), exporter, args.output_dir);

    println!("WSJF session. Type 'help' for commands.");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    session.run(stdin.lock(), &mut stdout, true)?;
    Ok(())
}
