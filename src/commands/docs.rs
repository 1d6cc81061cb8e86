//! Doc and samples commands

use std::path::PathBuf;

use crate::cli::SamplesArgs;
use crate::environment::Environment;
use crate::error::Result;
use crate::toolchain::{self, Toolchain};

use super::helpers::Session;

fn sdk_path(session: &Session, name: &str) -> Result<PathBuf> {
    let mut settings = session.store.load_or_init()?;
    let locator = session.locator();
    Ok(Toolchain::new(&locator).sdk_root(&mut settings)?.join(name))
}

/// Run doc command
pub fn doc(env: &Environment) -> Result<()> {
    let session = Session::open(env)?;
    let readme = sdk_path(&session, "README.html")?;
    toolchain::open_with_desktop(session.platform, &readme)
}

/// Run samples command
pub fn samples(env: &Environment, args: SamplesArgs) -> Result<()> {
    let session = Session::open(env)?;
    let samples = sdk_path(&session, "samples")?;

    if args.print {
        println!("{}", samples.display());
        Ok(())
    } else {
        toolchain::open_with_desktop(session.platform, &samples)
    }
}
