//! Shared utilities
//!
//! Long outputs (`log`, `global-log`) go through the `minus` pager when
//! stdout is a terminal; everything else writes straight to stdout.

use derive_new::new;
use is_terminal::IsTerminal;
use minus::Pager;
use std::io::{self, Write};

/// Disables paging when set to any value
pub const NO_PAGER_ENV: &str = "NO_PAGER";

/// `Write` adapter feeding a `minus` pager
#[derive(new)]
pub struct PagerWriter {
    pager: Pager,
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s =
            std::str::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.pager.push_str(s).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Where a command prints its output
pub enum CommandOutput {
    Stdout,
    Paged(Pager),
}

impl CommandOutput {
    /// Page only when asked to, stdout is a terminal and `NO_PAGER` is unset
    pub fn select(wants_pager: bool) -> Self {
        let pager_allowed = std::env::var_os(NO_PAGER_ENV).is_none();

        if wants_pager && pager_allowed && io::stdout().is_terminal() {
            CommandOutput::Paged(Pager::new())
        } else {
            CommandOutput::Stdout
        }
    }

    pub fn writer(&self) -> Box<dyn Write> {
        match self {
            CommandOutput::Stdout => Box::new(io::stdout()),
            CommandOutput::Paged(pager) => Box::new(PagerWriter::new(pager.clone())),
        }
    }

    /// Show the collected output once the command is done
    pub fn finish(self) -> anyhow::Result<()> {
        match self {
            CommandOutput::Stdout => io::stdout().flush()?,
            CommandOutput::Paged(pager) => minus::page_all(pager)?,
        }

        Ok(())
    }
}
