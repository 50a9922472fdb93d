use clap::{crate_version, Arg, ArgMatches, Command};

use super::{LogFormat, LogLevel};

/// Low-level `clap` command. `value_source` on its matches tells whether an
/// option was set by the user (cli/env) or left at its default, which decides
/// whether the TOML file may override it.
pub(super) fn command() -> Command {
    Command::new("Tessera")
        .about("Instantiates project templates and serves permission-scoped view queries")
        .version(crate_version!())
        .arg(
            Arg::new("template")
                .help("Path to the JSON template to instantiate")
                .short('t')
                .long("template")
                .value_name("TEMPLATE")
                .env("TESSERA_TEMPLATE")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("root-dir")
                .help("Root directory holding config/config.toml")
                .short('r')
                .long("root-dir")
                .value_name("ROOT_DIR")
                .env("TESSERA_ROOT_DIR")
                .value_parser(clap::value_parser!(String))
                .default_value("~/.tessera"),
        )
        .arg(
            Arg::new("log-level")
                .help("Log level")
                .long("log-level")
                .value_name("LOG_LEVEL")
                .env("TESSERA_LOG_LEVEL")
                .value_parser(clap::builder::EnumValueParser::<LogLevel>::new())
                .default_value("INFO"),
        )
        .arg(
            Arg::new("log-format")
                .help("Log format")
                .long("log-format")
                .value_name("LOG_FORMAT")
                .env("TESSERA_LOG_FORMAT")
                .value_parser(clap::builder::EnumValueParser::<LogFormat>::new())
                .default_value("PRETTY"),
        )
        .arg(
            Arg::new("user")
                .help("User the template is instantiated as")
                .short('u')
                .long("user")
                .value_name("USER")
                .env("TESSERA_USER")
                .value_parser(clap::value_parser!(String))
                .default_value("tessera"),
        )
        .arg(
            Arg::new("groups")
                .help("Groups of the user")
                .long("groups")
                .value_name("GROUPS")
                .env("TESSERA_GROUPS")
                .value_parser(clap::value_parser!(String))
                .value_delimiter(','),
        )
        .arg(
            Arg::new("date-format")
                .help("chrono format of dates in template configs, RFC 3339 when unset")
                .long("date-format")
                .value_name("DATE_FORMAT")
                .env("TESSERA_DATE_FORMAT")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("page-size")
                .help("Number of views listed after instantiation, 0 for all")
                .long("page-size")
                .value_name("PAGE_SIZE")
                .env("TESSERA_PAGE_SIZE")
                .value_parser(clap::value_parser!(u32))
                .default_value("20"),
        )
}

pub(super) fn get_matches() -> ArgMatches {
    command().get_matches()
}

pub(super) fn try_get_matches_from<I, T>(args: I) -> Result<ArgMatches, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    command().try_get_matches_from(args)
}
