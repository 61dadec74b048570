use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uritmpl::{config::LinkCatalog, Link, Template};

fn set_arg() -> Arg {
    Arg::new("set")
        .short('s')
        .long("set")
        .value_name("NAME=VALUE")
        .action(ArgAction::Append)
        .help("Bind a variable; repeat to bind several values in order")
}

fn template_arg() -> Arg {
    Arg::new("template")
        .value_name("TEMPLATE")
        .required(true)
        .help("Template string, or a link name when --catalog is given")
}

fn cli() -> Command {
    Command::new("uritmpl")
        .about("Render URI templates and match URIs against them")
        .subcommand_required(true)
        .arg(
            Arg::new("catalog")
                .short('c')
                .long("catalog")
                .value_name("CATALOG")
                .help("Path to a YAML file containing named links"),
        )
        .subcommand(
            Command::new("render")
                .about("Bind variables and print the template")
                .arg(template_arg())
                .arg(set_arg())
                .arg(
                    Arg::new("unresolved")
                        .long("unresolved")
                        .action(ArgAction::SetTrue)
                        .help("Print template grammar instead of a URI"),
                ),
        )
        .subcommand(
            Command::new("match")
                .about("Print the variables captured from URI as JSON")
                .arg(template_arg())
                .arg(Arg::new("uri").value_name("URI").required(true)),
        )
        .subcommand(
            Command::new("link")
                .about("Print a bound catalog link as JSON")
                .arg(Arg::new("name").value_name("NAME").required(true))
                .arg(set_arg()),
        )
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("uritmpl=warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Group repeated `NAME=VALUE` flags by name, keeping first-seen order.
fn parse_assignments(matches: &ArgMatches) -> Result<Vec<(String, Vec<String>)>> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();

    for raw in matches.get_many::<String>("set").into_iter().flatten() {
        let (name, value) = raw
            .split_once('=')
            .with_context(|| format!("Expected NAME=VALUE but got '{}'", raw))?;
        match grouped.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, values)) => values.push(value.to_string()),
            None => grouped.push((name.to_string(), vec![value.to_string()])),
        }
    }

    Ok(grouped)
}

fn bind_all(template: Template, assignments: &[(String, Vec<String>)]) -> Result<Template> {
    assignments.iter().try_fold(template, |template, (name, values)| {
        template
            .bind(name, values)
            .with_context(|| format!("Cannot bind '{}'", name))
    })
}

fn lookup_template(text: &str, catalog: Option<&LinkCatalog>) -> Result<Template> {
    if let Some(link) = catalog.and_then(|catalog| catalog.get(text)) {
        debug!(name = text, "Using catalog link template");
        return Ok(link.template().clone());
    }
    Template::parse(text).with_context(|| format!("Invalid template '{}'", text))
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .with_context(|| format!("Missing argument: {}", id))
}

fn run(matches: &ArgMatches) -> Result<ExitCode> {
    let catalog = match matches.get_one::<String>("catalog") {
        Some(path) => Some(LinkCatalog::load(path)?),
        None => None,
    };

    match matches.subcommand() {
        Some(("render", sub)) => {
            let template = lookup_template(required(sub, "template")?, catalog.as_ref())?;
            let template = bind_all(template, &parse_assignments(sub)?)?;
            println!("{}", template.render(!sub.get_flag("unresolved")));
            Ok(ExitCode::SUCCESS)
        }
        Some(("match", sub)) => {
            let template = lookup_template(required(sub, "template")?, catalog.as_ref())?;
            let uri = required(sub, "uri")?;
            match template.match_uri(uri) {
                Some(captures) => {
                    println!("{}", serde_json::to_string_pretty(&captures)?);
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    info!(uri, template = %template, "URI does not match template");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Some(("link", sub)) => {
            let catalog = catalog.context("The link subcommand requires --catalog")?;
            let name = required(sub, "name")?;
            let link: &Link = catalog
                .get(name)
                .with_context(|| format!("No link named '{}' in catalog", name))?;
            let mut link = link.clone();
            for (var, values) in parse_assignments(sub)? {
                link = link
                    .bind(&var, &values)
                    .with_context(|| format!("Cannot bind '{}'", var))?;
            }
            println!("{}", serde_json::to_string_pretty(&link)?);
            Ok(ExitCode::SUCCESS)
        }
        Some((other, _)) => bail!("Unknown subcommand: {}", other),
        None => bail!("No subcommand given"),
    }
}

fn main() -> ExitCode {
    init_logging();

    match run(&cli().get_matches()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
