use clap::{ArgAction, Parser};

pub const GPIP_BEFORE_HELP: &str = concat!(
    "gpip ",
    env!("CARGO_PKG_VERSION"),
    " – install helper for packages that need runtime workarounds\n\n",
    "\x1b[1;36mActions\x1b[0m\n",
    "  --list           List known packages with install recipes.\n",
    "  --install NAME   Run the recipe for a known package (download, patch, build).\n",
    "  --pypi NAME      Try a plain source install from the package index.\n",
);

pub const GPIP_AFTER_HELP: &str = concat!(
    "Environment:\n",
    "  GPIP_INDEX_URL      package index JSON API (default https://pypi.org/pypi)\n",
    "  GPIP_PYTHON         interpreter used for `setup.py install --user`\n",
    "  GPIP_PATCH          patch program (default `patch`)\n",
    "  GPIP_KEEP_WORKDIR   set to 1 to keep temporary build directories\n",
    "  GPIP_HTTP_TIMEOUT   HTTP timeout in seconds (default 60)\n",
);

#[derive(Parser, Debug)]
#[command(
    name = "gpip",
    author,
    version,
    about = "Install packages that need workarounds on alternative Python runtimes",
    before_help = GPIP_BEFORE_HELP,
    after_help = GPIP_AFTER_HELP
)]
#[allow(clippy::struct_excessive_bools)]
pub struct GpipCli {
    #[arg(
        long,
        help = "List known packages with potential workarounds available for installation"
    )]
    pub list: bool,
    #[arg(long, value_name = "NAME", help = "Install a known package")]
    pub install: Option<String>,
    #[arg(
        long,
        value_name = "NAME",
        help = "Attempt to install a package from PyPI (latest source release only; dependencies are not installed)"
    )]
    pub pypi: Option<String>,
    #[arg(
        short,
        long,
        help = "Suppress human output (errors still print to stderr)"
    )]
    pub quiet: bool,
    #[arg(short, long, action = ArgAction::Count, help = "Increase logging (-vv reaches trace)")]
    pub verbose: u8,
    #[arg(long, help = "Force trace logging regardless of -v/-q")]
    pub trace: bool,
    #[arg(long, help = "Emit {status,message,details} JSON envelopes")]
    pub json: bool,
    #[arg(long, help = "Disable colored human output")]
    pub no_color: bool,
    #[arg(
        long,
        help = "Keep temporary build directories (sets GPIP_KEEP_WORKDIR=1)"
    )]
    pub keep_workdir: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    List,
    Install(String),
    Pypi(String),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Install(_) => "install",
            Action::Pypi(_) => "pypi",
        }
    }
}

impl GpipCli {
    /// The single action to run: `--list` beats `--install`, which beats
    /// `--pypi`.
    pub fn action(&self) -> Option<Action> {
        if self.list {
            Some(Action::List)
        } else if let Some(name) = &self.install {
            Some(Action::Install(name.clone()))
        } else {
            self.pypi.as_ref().map(|name| Action::Pypi(name.clone()))
        }
    }
}
