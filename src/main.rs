use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use portraitgen::logger::{self, LoggerConfig};
use portraitgen::models::{find_category, Lang, Mode, PromptOptions, CONTROL_GROUPS};
use portraitgen::{build_prompt, Config, GeminiClient, Studio, StudioError};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate and edit AI portraits from a catalog of options", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every option category and its values
    Catalog {
        /// Label language
        #[arg(long, default_value = "en")]
        lang: Lang,

        #[arg(long)]
        json: bool,
    },
    /// Print the prompt that would be sent for the given selections
    Prompt {
        #[arg(long, default_value = "text-to-image")]
        mode: Mode,

        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Pick a random value for every category
    Lucky {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Generate a new portrait from the selections
    Generate {
        #[command(flatten)]
        selection: SelectionArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Edit an existing portrait
    Edit {
        /// Source image (PNG, JPEG or WebP)
        #[arg(short, long)]
        image: PathBuf,

        #[command(flatten)]
        selection: SelectionArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug, Clone)]
struct SelectionArgs {
    /// Selection as category=value (repeatable)
    #[arg(short, long = "set", value_name = "CATEGORY=VALUE")]
    set: Vec<String>,

    /// Free-text details appended to the prompt
    #[arg(long)]
    supplementary: Option<String>,
}

impl SelectionArgs {
    fn to_options(&self) -> Result<PromptOptions, StudioError> {
        let mut options = PromptOptions::new();
        for raw in &self.set {
            let (category_id, value) = PromptOptions::parse_assignment(raw)?;
            let category = find_category(&category_id).ok_or_else(|| {
                StudioError::ConfigError(format!("unknown category '{}'", category_id))
            })?;
            if !value.is_empty() && category.option(&value).is_none() {
                return Err(StudioError::ConfigError(format!(
                    "unknown value '{}' for category '{}'",
                    value, category_id
                )));
            }
            options.set(category_id, value);
        }
        if let Some(text) = &self.supplementary {
            options.supplementary = text.clone();
        }
        Ok(options)
    }
}

#[derive(Args, Debug, Clone)]
struct OutputArgs {
    /// Directory for the downloaded image
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    logger::init_with_config(LoggerConfig::from_env())?;
    if !dotenv_loaded {
        log::debug!("No .env file found, using system environment variables");
    }

    let cli = Cli::parse();
    match cli.command {
        Command::Catalog { lang, json } => print_catalog(lang, json)?,
        Command::Prompt { mode, selection } => {
            println!("{}", build_prompt(mode, &selection.to_options()?));
        }
        Command::Lucky { selection } => {
            let current = selection.to_options()?;
            let picked = portraitgen::lucky::lucky_choice(&mut rand::thread_rng(), &current);
            for (category, value) in &picked.selections {
                println!("--set {}={}", category, value);
            }
        }
        Command::Generate { selection, output } => {
            run_generation(Mode::TextToImage, None, selection, output).await?;
        }
        Command::Edit {
            image,
            selection,
            output,
        } => {
            run_generation(Mode::ImageToImage, Some(image), selection, output).await?;
        }
    }
    Ok(())
}

fn print_catalog(lang: Lang, json: bool) -> Result<(), StudioError> {
    if json {
        println!("{}", serde_json::to_string_pretty(CONTROL_GROUPS)?);
        return Ok(());
    }
    for group in CONTROL_GROUPS {
        println!("{}", group.name.get(lang));
        for category in group.controls {
            let values: Vec<String> = category
                .selectable()
                .map(|o| format!("{} ({})", o.value, o.label.get(lang)))
                .collect();
            println!("  {}: {}", category.id, values.join(", "));
        }
    }
    Ok(())
}

async fn run_generation(
    mode: Mode,
    image: Option<PathBuf>,
    selection: SelectionArgs,
    output: OutputArgs,
) -> Result<(), StudioError> {
    let config = Config::from_env();
    logger::log_config_info(&config);
    config.gemini.require_api_key()?;
    let client = GeminiClient::new(config.gemini.clone())?;

    let mut studio = Studio::new(config.watermark.clone());
    studio.set_mode(mode);
    if let Some(path) = image {
        studio.upload_file(&path).await?;
    }
    studio.set_options(selection.to_options()?);

    if !studio.can_generate() {
        return Err(StudioError::ConfigError(
            "select at least one option or pass --supplementary".into(),
        ));
    }

    let job = studio.begin_generation()?;
    let prompt = job.prompt().to_string();
    let outcome = job.run(client.image()).await;
    studio.finish_generation(outcome);
    if let Some(message) = studio.error() {
        return Err(StudioError::Remote(message.to_string()));
    }

    let url = studio
        .generated_image()
        .ok_or_else(|| StudioError::InternalError("generation produced no image".into()))?;
    let path = portraitgen::imaging::save_data_url(&output.out, &config.download_prefix, url).await?;

    if output.json {
        let item = studio.history().latest();
        let report = serde_json::json!({
            "path": path,
            "mode": mode,
            "prompt": prompt,
            "id": item.map(|i| i.id),
            "options": item.map(|i| &i.options),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", path.display());
    }
    Ok(())
}
