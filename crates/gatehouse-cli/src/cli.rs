use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ColorChoice, Command,
};

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("gatehouse")
        .about("Admin sign-in with provider fallback")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg(
            Arg::new("env")
                .long("env")
                .help("Deployment to sign in against: development or production")
                .global(true)
                .value_parser(["development", "dev", "production", "prod"]),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Directory to write gatehouse.log into, in addition to stderr")
                .global(true)
                .value_name("DIR"),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)")
                .global(true)
                .action(ArgAction::Count),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in and store the session")
                .arg(
                    Arg::new("email")
                        .short('e')
                        .long("email")
                        .help("Account email")
                        .env("GATEHOUSE_EMAIL"),
                )
                .arg(
                    Arg::new("password-stdin")
                        .long("password-stdin")
                        .help("Read the password from the first line of stdin")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("whoami").about("Show the stored session identity"))
        .subcommand(Command::new("logout").about("Remove the stored session"))
}
