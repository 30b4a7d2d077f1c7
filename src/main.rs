#[macro_use]
extern crate rudiment;
#[macro_use]
extern crate log;
extern crate clap;

use clap::{App, Arg, ArgMatches};
use rudiment::config::clap::{self as cli, Action};
use rudiment::run;
use rudiment::Registry;

use std::io;
use std::process;

mod samples;

fn parse_cmdline() -> (App<'static, 'static>, ArgMatches<'static>) {
    let app = App::new("Rudimentary xUnit style test runner")
                          .version(env!("CARGO_PKG_VERSION"))
                          .author(env!("CARGO_PKG_AUTHORS"))
                          .about(env!("CARGO_PKG_DESCRIPTION"))
                          .arg(Arg::with_name("v")
                               .short("v")
                               .multiple(true)
                               .help("Sets the level of verbosity"));
    let app = cli::mount_inside_app(app);

    let matches = app.clone().get_matches();
    (app, matches)
}

fn main() {
    let (mut app, matches) = parse_cmdline();
    let registry = Registry::collected();
    let mut bootstrap = samples::SampleBootstrap;

    let result = match cli::action(&matches) {
        Action::Show => {
            let config = run::configure(&mut bootstrap, |c| {
                cli::parse_arguments(&matches, c);
            });
            cli::show(&matches, &config, &registry, &mut io::stdout()).map(|()| 0)
        },
        Action::Run => {
            debug!("running {} registered test classes", registry.classes().len());

            run::tests_with(&registry, &mut bootstrap, |c| {
                cli::parse_arguments(&matches, c);
            }).map(|status| status.code())
        },
    };

    match result {
        Ok(code) => {
            println!();
            process::exit(code);
        },
        Err(e) => {
            eprintln!("error: {}", e);
            for cause in e.iter().skip(1) {
                eprintln!("caused by: {}", cause);
            }

            eprintln!();
            // Best effort; the error itself was already printed.
            let _ = app.print_help();
            println!();
            process::exit(1);
        },
    }
}
