use std::io;

use clap::{CommandFactory, Parser, crate_authors, crate_description, crate_version};
use clap_complete::generate;
use eyre::Result;
use tracing::{info, trace};

use parcelctl::{
    Config, ListSubCommand, Opts, SubCommand, area_of, locate_parcel, render_location,
    search_place,
};

/// Binary name, using a different binary name
pub const NAME: &str = env!("CARGO_BIN_NAME");
/// Binary version
pub const VERSION: &str = crate_version!();
/// Authors
pub const AUTHORS: &str = crate_authors!();

#[tokio::main]
async fn main() -> Result<()> {
    let opts = Opts::parse();

    // Initialise logging.
    //
    parcel_common::init_logging(NAME, opts.verbose, opts.tree, opts.log_dir.clone())?;

    // Geocoder settings and defaults
    //
    let cfg = Config::load(opts.config.as_deref())?;

    // Banner
    //
    banner()?;

    handle_subcmd(&cfg, &opts.subcmd).await
}

pub async fn handle_subcmd(cfg: &Config, subcmd: &SubCommand) -> Result<()> {
    match subcmd {
        // Handle `area points...`
        //
        SubCommand::Area(aopts) => {
            trace!("area");

            let area = area_of(aopts);
            println!("{}", area);
            eprintln!("{}", parcel_engine::AREA_DISCLAIMER);
        }

        // Handle `locate points...`
        //
        SubCommand::Locate(lopts) => {
            trace!("locate");

            let res = locate_parcel(cfg, lopts).await?;
            if lopts.json {
                println!("{}", serde_json::to_string_pretty(&res)?);
            } else if lopts.form {
                println!("{}", serde_json::to_string_pretty(&res.to_form())?);
            } else {
                println!("{}", render_location(&res));
                eprintln!("{}", parcel_engine::AREA_DISCLAIMER);
            }
        }

        // Handle `search query`
        //
        SubCommand::Search(sopts) => {
            trace!("search");

            let (hit, viewport) = search_place(cfg, sopts).await?;
            if sopts.json {
                println!("{}", serde_json::to_string_pretty(&hit)?);
            } else {
                println!("{}", hit.address);
                println!(
                    "Map centred on {} at zoom {} ({} view)",
                    viewport.center, viewport.zoom, cfg.view
                );
            }
        }

        // Standalone completion generation
        //
        // NOTE: you can generate UNIX shells completion on Windows and vice-versa.  Not worth
        //       trying to limit depending on the OS.
        //
        SubCommand::Completion(copts) => {
            let generator = copts.shell;
            generate(generator, &mut Opts::command(), NAME, &mut io::stdout());
        }

        // Standalone `list` command
        //
        SubCommand::List(lopts) => match lopts.cmd {
            ListSubCommand::Views => {
                info!("Listing all map views:");

                let str = parcel_engine::list_views();
                eprintln!("{}", str);
                eprintln!("Default view: {}", cfg.view);
            }
        },

        // Standalone `version` command
        //
        SubCommand::Version => {
            eprintln!("Modules: ");
            eprintln!("\t{}", parcel_common::version());
            eprintln!("\t{}", parcel_engine::version());
        }
    }
    Ok(())
}

/// Display banner
///
fn banner() -> Result<()> {
    Ok(eprintln!(
        r##"
{}/{} by {}
{}
"##,
        NAME,
        VERSION,
        AUTHORS,
        crate_description!()
    ))
}
