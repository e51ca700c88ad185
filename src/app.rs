//! Command-line frontend.
//!
//! Parses the argument list into a `Command` and runs it against a
//! `HistoryStore`, printing results either as plain lines or as JSON.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use anyhow::{Context, Result, anyhow, bail};
use tracing::debug;

use crate::completion::{self, Direction, Navigator, Selection};
use crate::config::Config;
use crate::history::{Entry, HistoryStore, HistoryType, InputKind};

pub const USAGE: &str = "\
usage: histnav [--json] <command>

commands:
  add <command|search|url> <value> [secondary]   append a history entry
  cleanup                                        compact all history files
  load <command|search|url>                      print deduplicated history
  list <command|search|search-backward> [query]  prefix matches for inline stepping
  complete <url|search> [terms...]               completion candidates matching terms
  cycle <url|search> <steps> [--back] [input...] step through completion candidates";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        ty: HistoryType,
        value: String,
        secondary: Option<String>,
    },
    Cleanup,
    Load {
        ty: HistoryType,
    },
    List {
        kind: InputKind,
        query: String,
    },
    Complete {
        ty: HistoryType,
        input: String,
    },
    Cycle {
        ty: HistoryType,
        steps: usize,
        direction: Direction,
        input: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    pub json: bool,
}

impl Invocation {
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut json = false;
        let mut back = false;
        let mut rest = Vec::new();
        for arg in args {
            match arg.as_str() {
                "--json" => json = true,
                "--back" => back = true,
                _ => rest.push(arg),
            }
        }

        let mut rest = rest.into_iter();
        let name = rest.next().ok_or_else(|| anyhow!("missing command"))?;
        let command = match name.as_str() {
            "add" => {
                let ty = parse_type(rest.next())?;
                let value = rest.next().ok_or_else(|| anyhow!("add: missing value"))?;
                let secondary = rest.next();
                Command::Add {
                    ty,
                    value,
                    secondary,
                }
            }
            "cleanup" => Command::Cleanup,
            "load" => Command::Load {
                ty: parse_type(rest.next())?,
            },
            "list" => {
                let kind = rest
                    .next()
                    .ok_or_else(|| anyhow!("list: missing input kind"))?
                    .parse()?;
                Command::List {
                    kind,
                    query: rest.next().unwrap_or_default(),
                }
            }
            "complete" => Command::Complete {
                ty: parse_type(rest.next())?,
                input: rest.collect::<Vec<_>>().join(" "),
            },
            "cycle" => {
                let ty = parse_type(rest.next())?;
                let steps = rest
                    .next()
                    .ok_or_else(|| anyhow!("cycle: missing step count"))?;
                let steps = steps
                    .parse()
                    .with_context(|| format!("cycle: invalid step count {:?}", steps))?;
                Command::Cycle {
                    ty,
                    steps,
                    direction: Direction::from_back(back),
                    input: rest.collect::<Vec<_>>().join(" "),
                }
            }
            other => bail!("unknown command: {}", other),
        };

        Ok(Self { command, json })
    }
}

fn parse_type(arg: Option<String>) -> Result<HistoryType> {
    let arg = arg.ok_or_else(|| anyhow!("missing history type"))?;
    Ok(arg.parse()?)
}

pub struct App {
    store: HistoryStore,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self {
            store: HistoryStore::new(config.history_config()),
        }
    }

    pub fn with_store(store: HistoryStore) -> Self {
        Self { store }
    }

    pub fn run(&self, invocation: &Invocation, out: &mut impl Write) -> Result<()> {
        debug!("Running {:?}", invocation.command);
        let json = invocation.json;

        match &invocation.command {
            Command::Add {
                ty,
                value,
                secondary,
            } => {
                self.store.add(*ty, value, secondary.as_deref())?;
            }
            Command::Cleanup => self.store.cleanup(),
            Command::Load { ty } => {
                let entries = self.store.load(*ty);
                print_entries(out, &entries, json)?;
            }
            Command::List { kind, query } => {
                let list = self.store.get_list_for_input(*kind, query);
                print_lines(out, &list, json)?;
            }
            Command::Complete { ty, input } => {
                let all = completion::candidates(&self.store, *ty);
                let visible: Vec<Entry> = completion::filter(&all, input)
                    .into_iter()
                    .cloned()
                    .collect();
                print_entries(out, &visible, json)?;
            }
            Command::Cycle {
                ty,
                steps,
                direction,
                input,
            } => {
                let selections = self.cycle(*ty, *steps, *direction, input);
                print_lines(out, &selections, json)?;
            }
        }
        Ok(())
    }

    /// Run a completion session for `input` and collect the text shown after
    /// each of `steps` moves. Stops early when there is nothing to select.
    fn cycle(
        &self,
        ty: HistoryType,
        steps: usize,
        direction: Direction,
        input: &str,
    ) -> Vec<String> {
        let all = completion::candidates(&self.store, ty);
        let visible: Vec<Entry> = completion::filter(&all, input)
            .into_iter()
            .cloned()
            .collect();

        let shown = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&shown);
        let mut navigator = Navigator::new();
        navigator.start(
            visible,
            input,
            move |selection: Selection<'_, Entry>| {
                let text = match selection {
                    Selection::Input(input) => input.to_string(),
                    Selection::Candidate(entry) => entry.primary.clone(),
                };
                sink.borrow_mut().push(text);
            },
            direction,
        );

        for _ in 0..steps {
            if !navigator.step() {
                break;
            }
        }
        navigator.stop();

        shown.take()
    }
}

fn print_entries(out: &mut impl Write, entries: &[Entry], json: bool) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, entries)?;
        writeln!(out)?;
        return Ok(());
    }
    for entry in entries {
        writeln!(out, "{}", entry.to_line())?;
    }
    Ok(())
}

fn print_lines(out: &mut impl Write, lines: &[String], json: bool) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, lines)?;
        writeln!(out)?;
        return Ok(());
    }
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}
