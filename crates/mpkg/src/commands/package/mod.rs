//! Package commands (render)
//!
//! `package new` is not offered: scaffolding a package involves cloning,
//! prompting and pushing to a remote, none of which this tool does.

mod render;

use anyhow::Result;

use crate::cli::PackageCommands;

/// Run package subcommands
pub async fn run(cmd: PackageCommands) -> Result<()> {
    match cmd {
        PackageCommands::Render(args) => render::run(args).await,
    }
}
