use clap::Parser;

/// Arguments for login command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Log in, prompting for credentials:\n    ciqw login\n\n\
                  Log in, prompting for the password only:\n    ciqw login dev@example.com")]
pub struct LoginArgs {
    /// Account user name or email (prompted when omitted)
    pub username: Option<String>,

    /// Account password (prompted when omitted)
    pub password: Option<String>,
}
