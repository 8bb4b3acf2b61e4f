use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use photofind_cli::PhotoFindCli;
use photofind_core::{Conf, UnsplashClient, IMAGES_PER_PAGE};
use std::io;

#[derive(Parser)]
#[command(name = "photofind", version, about = "Search Unsplash photos from the terminal")]
struct Cli {
    /// API key to use for this run instead of the configured one
    #[arg(long = "key", global = true, value_name = "KEY")]
    key_override: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Search for photos and print their thumbnail URLs
    Search {
        #[arg(required = true)]
        query: Vec<String>,
        /// Number of result pages to fetch
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Print one random photo
    Random,
    /// Save settings to the config file and show the effective configuration
    Config {
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long)]
        base_url: Option<String>,
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut stdout = io::stdout();

    match cli.command {
        Some(Command::Config { api_key, base_url, timeout_secs }) => {
            configure(api_key, base_url, timeout_secs)?;
        }
        Some(Command::Search { query, pages }) => {
            let mut app = open_app(cli.key_override)?;
            let query = query.join(" ");
            if !app.search(&query, &mut stdout)? {
                bail!("search for \"{}\" failed", query);
            }
            for _ in 1..pages {
                if !app.session().state().can_load_more() {
                    break;
                }
                if !app.load_more(&mut stdout)? {
                    bail!("loading page {} failed", app.session().state().page + 1);
                }
            }
        }
        Some(Command::Random) => {
            let mut app = open_app(cli.key_override)?;
            if !app.random(&mut stdout)? {
                bail!("random image request failed");
            }
        }
        None => {
            let mut app = open_app(cli.key_override)?;
            println!("PhotoFind started. Results use {} per page.", IMAGES_PER_PAGE);
            app.run(io::stdin().lock(), stdout)?;
        }
    }

    Ok(())
}

fn open_app(api_key: Option<String>) -> Result<PhotoFindCli<UnsplashClient>> {
    let mut conf = Conf::new()?;
    if let Some(key) = api_key {
        conf.api_key = Some(key);
    }
    if conf.api_key.is_none() {
        log::warn!("No API key configured; every request will fail");
    }
    log::info!("Using {} with key {}", conf.base_url, conf.masked_api_key());

    Ok(PhotoFindCli::new(UnsplashClient::new(&conf)))
}

fn configure(api_key: Option<String>, base_url: Option<String>, timeout_secs: Option<u64>) -> Result<()> {
    let mut conf = Conf::load_from(&Conf::default_config_dir()?)?;
    let changed = api_key.is_some() || base_url.is_some() || timeout_secs.is_some();

    if let Some(key) = api_key {
        conf.api_key = Some(key);
    }
    if let Some(url) = base_url {
        conf.base_url = url;
    }
    if let Some(secs) = timeout_secs {
        conf.timeout_secs = secs;
    }
    if changed {
        conf.save()?;
        println!("Saved {}", conf.config_file.display());
    }

    println!("config file: {}", conf.config_file.display());
    println!("api key:     {}", conf.masked_api_key());
    println!("base url:    {}", conf.base_url);
    println!("timeout:     {}s", conf.timeout_secs);
    Ok(())
}
