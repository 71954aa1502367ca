use anyhow::Result;
use clap::{Parser, Subcommand};
use inquire::{Select, Text};
use weatherdash_core::{
    Config, KvStore, OpenWeatherClient, PreferenceStore, SearchHistoryStore, forecast,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Weather dashboard CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current conditions and the 5-day forecast for a city.
    Show {
        /// City name, e.g. "London".
        city: String,
    },

    /// Re-query the most recent successful search.
    Refresh,

    /// List recent searches, most recent first.
    Recent,

    /// Show the display theme.
    Theme {
        /// Flip between dark and light before showing it.
        #[arg(long)]
        toggle: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Some(Command::Configure) => configure(),
            Some(Command::Show { city }) => App::open()?.show(&city).await,
            Some(Command::Refresh) => App::open()?.refresh().await,
            Some(Command::Recent) => recent(),
            Some(Command::Theme { toggle }) => theme(toggle),
            None => App::open()?.dashboard().await,
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Text::new("OpenWeather API key:").prompt()?;
    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}

fn recent() -> Result<()> {
    let history = SearchHistoryStore::load(KvStore::open_default()?);

    if history.list().is_empty() {
        println!("No recent searches.");
    }
    for (i, city) in history.list().iter().enumerate() {
        println!("{}. {city}", i + 1);
    }
    Ok(())
}

fn theme(toggle: bool) -> Result<()> {
    let mut prefs = PreferenceStore::load(KvStore::open_default()?);

    if toggle {
        prefs.toggle();
    }
    println!(
        "Theme: {} {}",
        render::theme_name(prefs.dark_mode()),
        render::theme_glyph(prefs.dark_mode()),
    );
    Ok(())
}

/// Query client plus the two persisted stores, shared by the one-shot
/// commands and the dashboard loop.
struct App {
    client: OpenWeatherClient,
    history: SearchHistoryStore,
    prefs: PreferenceStore,
}

impl App {
    fn open() -> Result<Self> {
        let config = Config::load()?;
        let client = OpenWeatherClient::new(config.require_api_key()?.to_owned());

        let store = KvStore::open_default()?;
        let history = SearchHistoryStore::load(store.clone());
        let prefs = PreferenceStore::load(store);

        Ok(Self { client, history, prefs })
    }

    /// Fetch, aggregate, record the canonical name in history, render.
    async fn show(&mut self, city: &str) -> Result<()> {
        let report = self.client.fetch_weather(city).await?;
        let days = forecast::aggregate(&report.samples);

        self.history.record_search(&report.current.city);
        print!("{}", render::report(&report, &days, self.prefs.dark_mode()));
        Ok(())
    }

    async fn refresh(&mut self) -> Result<()> {
        let Some(city) = self.history.list().first().cloned() else {
            println!("No recent searches to refresh.");
            return Ok(());
        };
        self.show(&city).await
    }

    /// Interactive prompt loop: pick a recent city, search a new one,
    /// toggle the theme, or quit.
    async fn dashboard(&mut self) -> Result<()> {
        const SEARCH: &str = "Search for a city…";
        const TOGGLE: &str = "Toggle theme";
        const QUIT: &str = "Quit";

        println!("Weather Dashboard");
        loop {
            let mut options = vec![SEARCH.to_string()];
            options.extend(self.history.list().iter().cloned());
            options.push(TOGGLE.to_string());
            options.push(QUIT.to_string());

            let choice = Select::new("What next?", options).prompt()?;
            match choice.as_str() {
                SEARCH => {
                    let city = Text::new("City:").prompt()?;
                    self.show_or_report(&city).await;
                }
                TOGGLE => {
                    let dark = self.prefs.toggle();
                    println!("Theme: {}", render::theme_name(dark));
                }
                QUIT => break,
                city => self.show_or_report(city).await,
            }
        }
        Ok(())
    }

    /// Dashboard variant of [`App::show`]: failures are reported inline
    /// so the loop keeps running.
    async fn show_or_report(&mut self, city: &str) {
        if let Err(err) = self.show(city).await {
            println!("⚠️  {err}");
        }
    }
}
