use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args as ClapArgs, Parser, Subcommand};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Ancestry DNA match client
///
/// Reuses the cookies of a browser that is logged in to Ancestry and prints
/// the service's JSON responses to stdout.
///
/// Cookies come from a Netscape cookies.txt export (`cookie_file` in the
/// config or ANCESTRY_DNA_COOKIE_FILE) or a raw Cookie header
/// (`cookie_header` or ANCESTRY_DNA_COOKIES).
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    /// Also write logs to stderr. Logs always go to the log file.
    #[arg(long = "debug", global = true, help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", global = true, help_heading = "Debug")]
    pub log_file: Option<String>,

    /// List current configuration settings and exit
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Test kit the command acts on
#[derive(ClapArgs, Debug, Clone)]
pub struct TestArg {
    /// Test kit id (sample guid)
    #[arg(long = "test", short = 't')]
    pub test: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List DNA test kits
    Tests {
        /// Category of tests to list
        #[arg(long, default_value = ancestry_dna::constants::DEFAULT_TEST_CATEGORY)]
        category: String,
    },
    /// Ethnicity estimate of a test, optionally compared with a match
    Admixture {
        #[command(flatten)]
        test: TestArg,
        /// Match test id to compare with
        #[arg(long)]
        compare: Option<String>,
    },
    /// Fetch every page of the match list
    Matches {
        #[command(flatten)]
        test: TestArg,
        /// DATE or RELATIONSHIP
        #[arg(long, default_value = "RELATIONSHIP")]
        sort: String,
        /// Filter as name=value, repeatable (e.g. --filter minshareddna=20)
        #[arg(long = "filter", value_name = "NAME=VALUE")]
        filters: Vec<String>,
        /// Only list matches shared with this match test id
        #[arg(long)]
        shared: Option<String>,
    },
    /// Common ancestors with a match
    Ancestors {
        #[command(flatten)]
        test: TestArg,
        /// Match test id
        #[arg(long = "match", short = 'm')]
        match_id: String,
    },
    /// Tree comparison with a match
    Tree {
        #[command(flatten)]
        test: TestArg,
        /// Match test id
        #[arg(long = "match", short = 'm')]
        match_id: String,
    },
    /// List custom groups
    Groups {
        #[command(flatten)]
        test: TestArg,
    },
    /// Create a custom group
    CreateGroup {
        #[command(flatten)]
        test: TestArg,
        #[arg(long)]
        name: String,
        /// Hex color, e.g. #3366ff
        #[arg(long)]
        color: String,
    },
    /// Delete a custom group
    DeleteGroup {
        #[command(flatten)]
        test: TestArg,
        #[arg(long)]
        group: String,
    },
    /// Add a match to or remove it from a custom group
    GroupMember {
        #[command(flatten)]
        test: TestArg,
        /// add or remove
        action: String,
        #[arg(long)]
        group: String,
        /// Match test id
        #[arg(long = "match", short = 'm')]
        match_id: String,
    },
    /// Star a match
    Star {
        #[command(flatten)]
        test: TestArg,
        /// Match test id
        #[arg(long = "match", short = 'm')]
        match_id: String,
        /// Remove the star instead
        #[arg(long)]
        unstar: bool,
    },
}
