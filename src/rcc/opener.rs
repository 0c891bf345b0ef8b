use log::{info, warn};

use std::path::Path;
use std::process::Command;

use snafu::prelude::*;

use crate::rcc::{OpenCommandFailedSnafu, OpeningReportSnafu, RccResult};

/// Hands a generated report over to the user.
pub trait FileOpener {
    fn open(&self, path: &Path) -> RccResult<()>;
}

/// Opens the file with the default application of the desktop.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

/// Does nothing. For tests and non-interactive runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpener;

impl FileOpener for NoOpener {
    fn open(&self, path: &Path) -> RccResult<()> {
        info!("Not opening {}", path.display());
        Ok(())
    }
}

impl FileOpener for SystemOpener {
    fn open(&self, path: &Path) -> RccResult<()> {
        let p = path.display().to_string();
        let mut cmd = match open_command(path) {
            Some(c) => c,
            None => {
                warn!(
                    "Do not know how to open files on this system, please open {} manually",
                    p
                );
                return Ok(());
            }
        };
        info!("Opening {} with {:?}", p, cmd);
        let status = cmd.status().context(OpeningReportSnafu { path: p.clone() })?;
        ensure!(status.success(), OpenCommandFailedSnafu { path: p, status });
        Ok(())
    }
}

fn open_command(path: &Path) -> Option<Command> {
    if cfg!(target_os = "windows") {
        // The empty argument is the title of the window for 'start'.
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]).arg(path);
        Some(c)
    } else if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg(path);
        Some(c)
    } else if cfg!(any(
        target_os = "linux",
        target_os = "freebsd",
        target_os = "openbsd",
        target_os = "netbsd"
    )) {
        let mut c = Command::new("xdg-open");
        c.arg(path);
        Some(c)
    } else {
        None
    }
}
