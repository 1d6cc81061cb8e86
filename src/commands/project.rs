//! Project commands: build, release, run, auto, sim

use std::path::PathBuf;

use crate::cli::{ProjectArgs, RunArgs};
use crate::environment::Environment;
use crate::error::Result;
use crate::project::{BuildKind, Project};
use crate::toolchain::Toolchain;
use crate::watch;

use super::helpers::{Session, resolve_project_path};

fn open_project(path: Option<PathBuf>) -> Result<Project> {
    Project::open(&resolve_project_path(path)?)
}

/// Run build command
pub fn build(env: &Environment, args: ProjectArgs) -> Result<()> {
    compile(env, args, BuildKind::Debug)
}

/// Run release command
pub fn release(env: &Environment, args: ProjectArgs) -> Result<()> {
    compile(env, args, BuildKind::Release)
}

fn compile(env: &Environment, args: ProjectArgs, kind: BuildKind) -> Result<()> {
    let project = open_project(args.path)?;
    let session = Session::open(env)?;
    let mut settings = session.store.load_or_init()?;

    let locator = session.locator();
    Toolchain::new(&locator).build(&project, kind, &mut settings)?;
    Ok(())
}

/// Run run command
pub fn run(env: &Environment, args: RunArgs) -> Result<()> {
    let project = open_project(args.project.path)?;
    let session = Session::open(env)?;
    let mut settings = session.store.load_or_init()?;

    let locator = session.locator();
    Toolchain::new(&locator).run(&project, &mut settings, args.rebuild)
}

/// Run auto command
pub fn auto(env: &Environment, args: ProjectArgs) -> Result<()> {
    let project = open_project(args.path)?;
    let session = Session::open(env)?;
    let mut settings = session.store.load_or_init()?;

    let locator = session.locator();
    let toolchain = Toolchain::new(&locator);
    let output = project.output_path(BuildKind::Debug);

    watch::watch(project.root(), &output, |_changed| {
        toolchain.run(&project, &mut settings, true)
    })
}

/// Run sim command
pub fn sim(env: &Environment) -> Result<()> {
    let session = Session::open(env)?;
    let mut settings = session.store.load_or_init()?;

    let locator = session.locator();
    Toolchain::new(&locator).start_simulator(&mut settings)
}
