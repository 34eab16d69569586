use clap::{crate_description, crate_version, ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::convert::Infallible;
use std::path::PathBuf;

use get_reviewers::github::DEFAULT_API_URL;

// -----------------------------------------------------------------------------
// command-line args
// -----------------------------------------------------------------------------
#[derive(Parser, Debug)]
#[command(
    author,   // retrieved from Cargo.toml `authors`
    version,  // retrieved from Cargo.toml `version`
    about,    // retrieved from Cargo.toml `description`

    long_version = concat!(
        crate_version!(),
    ),

    long_about = concat!(
        crate_description!(),
        "\n\n",
        "The reviewers are printed to stdout as a single comma-separated line, ",
        "suitable for passing to a later pipeline step that requests the reviews.",
    ),
)]
#[deny(missing_docs)]
/// Determine pull request reviewers from the authors of new commits
pub struct CommandLineArgs {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global_args: GlobalArgs,
}

impl CommandLineArgs {
    pub fn parse_args() -> Self {
        let mut s = Self::parse();

        // If `NO_COLOR` is set in the environment, disable colored output
        //
        // https://no-color.org/
        if std::env::var("NO_COLOR").is_ok() {
            s.global_args.color = Mode::Never
        }

        s
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Find reviewers using the GitHub compare API
    ///
    /// The commits on the head branch that are not on the base branch are listed by GitHub, and
    /// the GitHub accounts linked to their authors become the reviewers. The required reviewers
    /// are always added.
    ///
    /// A token can be given in the `GITHUB_TOKEN` environment variable; it is sent as a bearer
    /// credential with every request.
    #[command(display_order = 1)]
    Compare(CompareArgs),

    /// Find reviewers using `git cherry` in a local repository
    ///
    /// Commits on the base branch with no equivalent patch on the target branch are considered
    /// new. The author email of each new commit is looked up with `git log` and mapped to a
    /// GitHub account with the user search API. Authors that match no account, or more than one,
    /// are reported as warnings and left out.
    ///
    /// The `git` binary on the PATH is used. It is invoked without any system-wide or
    /// user-specific configuration.
    #[command(display_order = 2)]
    Cherry(CherryArgs),
}

// -----------------------------------------------------------------------------
// global options
// -----------------------------------------------------------------------------
#[derive(Args, Debug)]
#[command(next_help_heading = "Global Options")]
pub struct GlobalArgs {
    /// Enable verbose output
    ///
    /// This can be repeated up to 3 times to enable successively more output.
    #[arg(global=true, long, short, action=ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error log messages
    ///
    /// This conflicts with `--verbose`.
    #[arg(global=true, long, short, conflicts_with="verbose")]
    pub quiet: bool,

    /// Enable or disable colored log output
    ///
    /// When this is "auto", colors are enabled when stderr is a tty.
    ///
    /// If the `NO_COLOR` environment variable is set, it takes precedence and is equivalent to `--color=never`.
    #[arg(global=true, long, default_value_t=Mode::Auto, value_name="MODE")]
    pub color: Mode,

    /// Use the specified URL for the GitHub REST API
    #[arg(
        global=true,
        long,
        env="GET_REVIEWERS_GITHUB_API_URL",
        default_value=DEFAULT_API_URL,
        value_name="URL"
    )]
    pub github_api_url: url::Url,

    /// Disable TLS certificate validation for GitHub API requests
    #[arg(global=true, long)]
    pub ignore_certs: bool,
}

impl GlobalArgs {
    pub fn use_color(&self) -> bool {
        match self.color {
            Mode::Never => false,
            Mode::Always => true,
            Mode::Auto => atty::is(atty::Stream::Stderr),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Mode {
    Auto,
    Never,
    Always,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Mode::Auto => "auto",
            Mode::Never => "never",
            Mode::Always => "always",
        };
        write!(f, "{s}")
    }
}

/// Interpret a flag value as a boolean: only a case-insensitive "true" is true.
fn cast_bool_arg(val: &str) -> Result<bool, Infallible> {
    Ok(val.eq_ignore_ascii_case("true"))
}

// -----------------------------------------------------------------------------
// `compare` command
// -----------------------------------------------------------------------------
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// The repository to compare branches in, as OWNER/NAME
    ///
    /// Required when reviewers are to be added.
    #[arg(long, value_name = "OWNER/NAME")]
    pub repository: Option<String>,

    /// The head branch of the comparison
    #[arg(long, value_name = "REF")]
    pub head_branch: Option<String>,

    /// The base branch of the comparison
    #[arg(long, value_name = "REF")]
    pub base_branch: Option<String>,

    /// Whether to find reviewers at all
    ///
    /// Any value other than a case-insensitive "true" means false, in which case nothing is done
    /// and nothing is printed.
    #[arg(
        long,
        action = ArgAction::Set,
        value_parser = cast_bool_arg,
        default_value = "false",
        value_name = "BOOL"
    )]
    pub should_add_reviewers: bool,

    /// Reviewers to always include, as a comma-separated list
    #[arg(long, value_name = "LOGINS")]
    pub required_reviewers: Option<String>,
}

// -----------------------------------------------------------------------------
// `cherry` command
// -----------------------------------------------------------------------------
#[derive(Args, Debug)]
pub struct CherryArgs {
    /// The branch whose new commits are considered
    #[arg(long, value_name = "REF")]
    pub base_branch: String,

    /// The branch to compare against
    #[arg(long, value_name = "REF")]
    pub target_branch: String,

    /// The Git repository to run in
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub repo_dir: PathBuf,
}
