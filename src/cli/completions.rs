use clap::Parser;
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    ciqw completions bash > ~/.bash_completion.d/ciqw\n\n\
                  Generate zsh completions:\n    ciqw completions zsh > ~/.zfunc/_ciqw\n\n\
                  Generate fish completions:\n    ciqw completions fish > ~/.config/fish/completions/ciqw.fish")]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum, ignore_case = true)]
    pub shell: Shell,
}
