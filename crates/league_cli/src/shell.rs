//! Line-oriented operator shell
//!
//! Reads one command per line and answers on the output stream. Failures are
//! reported and the loop carries on; only `quit` ends it. The play day in
//! progress lives in memory until it is committed, and the league file is
//! written only on `save`.

use anyhow::{Context, Result, anyhow, bail};
use chrono::{Local, NaiveDate};
use league_core::{EXPORT_DELIMITER, League, render_leaderboard, render_session};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const HELP: &str = "\
Commands:
  players                         list registered players
  add <name>                      register a player
  remove <name>                   remove a player
  config                          show league name and base stake
  set-name <name>                 rename the league
  set-stake <amount>              change the base stake
  draw [size] [names...|all]      draw tables (default: everyone present);
                                  a leading number is the table size, so
                                  give the size first when a name is a number
  date <YYYY-MM-DD>               date used for the next draw (default today)
  tables                          show the current draw
  results                         start entering results
  enter <table> <name> <cash> [top-up]
                                  record a seat (table numbers start at 1)
  check [table]                   money check and profits per table
  commit                          settle the play day
  discard                         drop the play day in progress
  standings                       leaderboard
  export [path]                   write the leaderboard as delimited text
  history                         settled play days, newest first
  save [path]                     write the league file
  load <path>                     replace the league with a file
                                  (load! discards unsaved changes)
  reset                           start an empty league
  quit                            leave (quit! discards unsaved changes)";

/// What the loop should do after a command
enum Flow {
    Continue,
    Quit,
}

pub struct Shell {
    league: League,
    path: PathBuf,
    group_size: usize,
    date: Option<NaiveDate>,
    dirty: bool,
}

impl Shell {
    pub fn new(league: League, path: PathBuf, group_size: usize) -> Self {
        Self {
            league,
            path,
            group_size,
            date: None,
            dirty: false,
        }
    }

    pub fn league(&self) -> &League {
        &self.league
    }

    /// Run commands from `input` until `quit` or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        writeln!(out, "{} - type `help` for commands", self.league.config().league_name)?;
        for line in input.lines() {
            let line = line?;
            let args = split_args(&line);
            if args.is_empty() {
                continue;
            }

            match self.execute(&args, out) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(e) => {
                    tracing::debug!(command = %args[0], error = %e, "command failed");
                    writeln!(out, "error: {e:#}")?;
                }
            }
            out.flush()?;
        }
        Ok(())
    }

    fn execute<W: Write>(&mut self, args: &[String], out: &mut W) -> Result<Flow> {
        let rest = &args[1..];
        match args[0].as_str() {
            "help" | "?" => writeln!(out, "{HELP}")?,
            "players" => self.players(out)?,
            "add" => {
                let name = joined(rest, "add <name>")?;
                self.league.add_player(&name)?;
                self.dirty = true;
                writeln!(out, "added {name}")?;
            }
            "remove" => {
                let name = joined(rest, "remove <name>")?;
                self.league.remove_player(&name)?;
                self.dirty = true;
                writeln!(out, "removed {name}")?;
                if self.league.draft().is_some() {
                    writeln!(out, "note: the current draw still seats {name}; draw again before committing")?;
                }
            }
            "config" => {
                let config = self.league.config();
                writeln!(out, "league: {}", config.league_name)?;
                writeln!(out, "base stake: {}", config.base_stake)?;
                writeln!(out, "players: {}", self.league.list_players().len())?;
            }
            "set-name" => {
                let name = joined(rest, "set-name <name>")?;
                self.league.set_configuration(Some(name), None)?;
                self.dirty = true;
            }
            "set-stake" => {
                let stake = parse_arg::<u32>(rest.first(), "amount")?;
                self.league.set_configuration(None, Some(stake))?;
                self.dirty = true;
            }
            "date" => {
                let text = rest.first().ok_or_else(|| anyhow!("usage: date <YYYY-MM-DD>"))?;
                let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .with_context(|| format!("invalid date '{text}'"))?;
                self.date = Some(date);
            }
            "draw" => self.draw(rest, out)?,
            "tables" => self.tables(out)?,
            "results" => {
                self.league.start_result_entry()?;
                writeln!(out, "result entry started; use `enter <table> <name> <cash> [top-up]`")?;
            }
            "enter" => self.enter(rest, out)?,
            "check" => self.check(rest, out)?,
            "commit" => {
                let session = self.league.commit()?;
                writeln!(
                    out,
                    "play day {} settled: {} players at {} tables",
                    session.date,
                    session.results.len(),
                    session.tables.len()
                )?;
                self.dirty = true;
            }
            "discard" => {
                if self.league.discard_draft().is_some() {
                    writeln!(out, "play day discarded")?;
                } else {
                    writeln!(out, "no play day in progress")?;
                }
            }
            "standings" => {
                let board = self.league.leaderboard();
                write!(out, "{}", render_leaderboard(&self.league.config().league_name, &board))?;
            }
            "export" => {
                let path = rest
                    .first()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(self.league.standings_file_name()));
                std::fs::write(&path, self.league.export_standings(EXPORT_DELIMITER))
                    .with_context(|| format!("failed to write {}", path.display()))?;
                writeln!(out, "standings written to {}", path.display())?;
            }
            "history" => self.history(out)?,
            "save" => {
                if let Some(path) = rest.first() {
                    self.path = PathBuf::from(path);
                }
                self.league.save(&self.path)?;
                self.dirty = false;
                writeln!(out, "saved to {}", self.path.display())?;
            }
            "load" | "load!" => {
                let path = rest.first().ok_or_else(|| anyhow!("usage: load <path>"))?;
                if self.dirty && args[0] == "load" {
                    writeln!(out, "unsaved changes: `save` first or `load! {path}` to discard them")?;
                    return Ok(Flow::Continue);
                }
                self.league = League::load(&PathBuf::from(path))?;
                self.path = PathBuf::from(path);
                self.dirty = false;
                writeln!(out, "loaded {}", self.league.config().league_name)?;
            }
            "reset" => {
                self.league.reset();
                self.dirty = true;
                writeln!(out, "league reset")?;
            }
            "quit" | "exit" => {
                if self.dirty {
                    writeln!(out, "unsaved changes: `save` first or `quit!` to discard them")?;
                } else {
                    return Ok(Flow::Quit);
                }
            }
            "quit!" => return Ok(Flow::Quit),
            other => bail!("unknown command '{other}' (try `help`)"),
        }
        Ok(Flow::Continue)
    }

    fn players<W: Write>(&self, out: &mut W) -> Result<()> {
        let players = self.league.list_players();
        if players.is_empty() {
            writeln!(out, "no players yet; `add <name>` registers one")?;
        }
        for player in players {
            writeln!(
                out,
                "{:<24} {:>8} {:>4} days",
                player.name, player.stats.total_profit, player.stats.days_played
            )?;
        }
        Ok(())
    }

    fn draw<W: Write>(&mut self, rest: &[String], out: &mut W) -> Result<()> {
        let (size, names) = match rest.first().map(|s| s.parse::<usize>()) {
            Some(Ok(size)) => (size, &rest[1..]),
            _ => (self.group_size, rest),
        };
        let everyone = names.is_empty() || (names.len() == 1 && names[0] == "all");
        let present: Vec<String> = if everyone {
            self.league.list_players().names().map(str::to_string).collect()
        } else {
            names.to_vec()
        };
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());

        self.league.begin_draft(&present, size, date)?;
        self.tables(out)
    }

    fn tables<W: Write>(&self, out: &mut W) -> Result<()> {
        let draft = self.league.draft().ok_or(league_core::LeagueError::NoDraft)?;
        writeln!(out, "date: {}  players: {}", draft.date(), draft.present_players().len())?;
        for (i, table) in draft.tables().iter().enumerate() {
            writeln!(out, "table {}: {}", i + 1, table.join(", "))?;
        }
        Ok(())
    }

    fn enter<W: Write>(&mut self, rest: &[String], out: &mut W) -> Result<()> {
        const USAGE: &str = "usage: enter <table> <name> <cash> [top-up]";
        if rest.len() < 3 {
            bail!(USAGE);
        }
        let table = table_index(&rest[0])?;
        let name = &rest[1];
        let cash = parse_arg::<u32>(rest.get(2), "cash")?;
        let top_up = match rest.get(3) {
            Some(_) => parse_arg::<u32>(rest.get(3), "top-up")?,
            None => 0,
        };

        self.league.record_table_entry(table, name, cash, top_up)?;
        let check = self.league.validate_table(table)?;
        writeln!(out, "table {}: difference {}", table + 1, check.difference)?;
        Ok(())
    }

    fn check<W: Write>(&self, rest: &[String], out: &mut W) -> Result<()> {
        let draft = self.league.draft().ok_or(league_core::LeagueError::NoDraft)?;
        let tables: Vec<usize> = match rest.first() {
            Some(t) => vec![table_index(t)?],
            None => (0..draft.tables().len()).collect(),
        };

        for table in tables {
            let report = self.league.table_report(table)?;
            let status = if report.check.is_balanced() { "ok" } else { "UNBALANCED" };
            writeln!(
                out,
                "table {}: {} (difference {})",
                table + 1,
                status,
                report.check.difference
            )?;
            let best = report.best_profit();
            let worst = report.worst_profit();
            for row in &report.rows {
                let mark = if Some(row.profit) == best {
                    "+"
                } else if Some(row.profit) == worst {
                    "-"
                } else {
                    " "
                };
                writeln!(
                    out,
                    " {mark} {:<24} cash {:>6}  top-up {:>6}  profit {:>6}",
                    row.name, row.amount_on_table, row.top_up, row.profit
                )?;
            }
        }
        Ok(())
    }

    fn history<W: Write>(&self, out: &mut W) -> Result<()> {
        let total = self.league.store().sessions().len();
        if total == 0 {
            writeln!(out, "no play days settled yet")?;
        }
        for (i, session) in self.league.history().enumerate() {
            write!(out, "{}", render_session(total - i, session))?;
        }
        Ok(())
    }
}

/// Split a command line on whitespace; double quotes group words
pub fn split_args(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut started = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                started = true;
            }
            c if c.is_whitespace() && !quoted => {
                if started {
                    args.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            c => {
                current.push(c);
                started = true;
            }
        }
    }
    if started {
        args.push(current);
    }
    args
}

/// Remaining words as one name, so `add Jan Novak` works without quotes
fn joined(rest: &[String], usage: &str) -> Result<String> {
    if rest.is_empty() {
        bail!("usage: {usage}");
    }
    Ok(rest.join(" "))
}

fn parse_arg<T: std::str::FromStr>(arg: Option<&String>, what: &str) -> Result<T> {
    let text = arg.ok_or_else(|| anyhow!("missing {what}"))?;
    text.parse()
        .map_err(|_| anyhow!("{what} must be a non-negative whole number, got '{text}'"))
}

/// Operator table numbers start at 1
fn table_index(text: &str) -> Result<usize> {
    match text.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => bail!("table must be a number from 1, got '{text}'"),
    }
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod shell_tests;
