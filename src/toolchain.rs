//! Invoking the SDK tools
//!
//! Every tool runs as a child process with the project root as its working
//! directory. ciqw never changes its own working directory.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::net::{SocketAddr, TcpStream};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{CiqwError, Result};
use crate::keys;
use crate::platform::{COMPILER, Platform, RUNNER, SIMULATOR};
use crate::project::{self, BuildKind, Project};
use crate::sdk::SdkLocator;

/// Port the simulator listens on once started
pub const SIMULATOR_PORT: u16 = 42877;

/// Java options the device runner needs on recent JVMs
const JAVA_OPTIONS: &str = "--add-modules=java.xml.bind";

/// How long to wait for a freshly started simulator
const SIMULATOR_STARTUP: Duration = Duration::from_secs(15);

fn tool_name(program: &Path) -> String {
    program
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string())
}

fn command_line(program: &Path, args: &[OsString]) -> String {
    let words = std::iter::once(program.as_os_str())
        .chain(args.iter().map(OsString::as_os_str))
        .map(|word| word.to_string_lossy().into_owned());
    shell_words::join(words)
}

/// Run a tool to completion; a non-zero exit is `ToolFailed`
pub fn run_tool(
    program: &Path,
    args: &[OsString],
    cwd: Option<&Path>,
    envs: &[(&str, &str)],
) -> Result<()> {
    info!("Calling '{}'.", command_line(program, args));

    let mut command = Command::new(program);
    command.args(args);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }
    for (key, value) in envs {
        command.env(key, value);
    }

    let status = command.status().map_err(|e| CiqwError::ToolLaunchFailed {
        tool: tool_name(program),
        reason: e.to_string(),
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(CiqwError::ToolFailed {
            tool: tool_name(program),
            status: status.to_string(),
        })
    }
}

/// Start a program without waiting for it
pub fn spawn_detached(program: &Path, args: &[&OsStr]) -> Result<()> {
    let args: Vec<OsString> = args.iter().map(|a| a.to_os_string()).collect();
    info!("Calling '{}'.", command_line(program, &args));

    Command::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| CiqwError::ToolLaunchFailed {
            tool: tool_name(program),
            reason: e.to_string(),
        })?;
    Ok(())
}

/// Whether something accepts connections on the simulator port
pub fn simulator_running() -> bool {
    let addr = SocketAddr::from(([127, 0, 0, 1], SIMULATOR_PORT));
    TcpStream::connect_timeout(&addr, Duration::from_millis(300)).is_ok()
}

/// Open a file or directory in the desktop's default application
pub fn open_with_desktop(platform: Platform, target: &Path) -> Result<()> {
    let (program, leading) = platform.opener();
    let mut args: Vec<&OsStr> = leading.iter().map(OsStr::new).collect();
    args.push(target.as_os_str());
    spawn_detached(Path::new(program), &args)
}

/// Build, run and simulate a project with the configured SDK
pub struct Toolchain<'a> {
    locator: &'a SdkLocator<'a>,
}

impl<'a> Toolchain<'a> {
    pub fn new(locator: &'a SdkLocator<'a>) -> Self {
        Self { locator }
    }

    /// Compile a project; returns the output file
    pub fn build(
        &self,
        project: &Project,
        kind: BuildKind,
        settings: &mut Settings,
    ) -> Result<PathBuf> {
        let output = project.output_path(kind);
        if output.exists() {
            info!("Removing '{}'.", output.display());
            fs::remove_file(&output)?;
        }

        keys::ensure_signing_key(&settings.key)?;
        let compiler = self.locator.tool_path(settings, COMPILER)?;
        let args = project::compile_args(
            kind,
            &project.jungles()?,
            &project.output_name(kind),
            settings,
            settings.flag_args()?,
        );

        run_tool(&compiler, &args, Some(project.root()), &[])?;
        if output.exists() {
            info!("Generated '{}'.", output.display());
        }
        Ok(output)
    }

    /// Start the simulator unless it is already running
    ///
    /// Waits until the simulator accepts connections, so a device run can
    /// follow immediately.
    pub fn start_simulator(&self, settings: &mut Settings) -> Result<()> {
        if simulator_running() {
            info!("Simulator already running.");
            return Ok(());
        }

        let simulator = self.locator.tool_path(settings, SIMULATOR)?;
        spawn_detached(&simulator, &[])?;

        let started = Instant::now();
        while !simulator_running() {
            if started.elapsed() > SIMULATOR_STARTUP {
                debug!("Simulator not listening after {:?}", SIMULATOR_STARTUP);
                break;
            }
            thread::sleep(Duration::from_millis(500));
        }
        Ok(())
    }

    /// Run a project in the simulator, building it first when needed
    pub fn run(&self, project: &Project, settings: &mut Settings, force_build: bool) -> Result<()> {
        self.start_simulator(settings)?;

        let output = project.output_path(BuildKind::Debug);
        if force_build || !output.exists() {
            self.build(project, BuildKind::Debug, settings)?;
        }

        let runner = self.locator.tool_path(settings, RUNNER)?;
        let args: Vec<OsString> = vec![
            project.output_name(BuildKind::Debug).into(),
            settings.device.as_str().into(),
        ];
        run_tool(
            &runner,
            &args,
            Some(project.root()),
            &[("JAVA_OPTIONS", JAVA_OPTIONS)],
        )
    }

    /// Root directory of the configured SDK
    pub fn sdk_root(&self, settings: &mut Settings) -> Result<PathBuf> {
        self.locator.sdk_root(settings)
    }
}
