use clap::{Parser, Subcommand};
use mudawwana::config::{self, BlogConfig};
use mudawwana::generation::{ContentGenerator, GeminiClient};
use mudawwana::logging::{self, LogConfig, LogFormat};
use mudawwana::session::{Session, SessionOptions};
use mudawwana::storage::FileStorage;
use mudawwana::types::Category;
use mudawwana::{output, render, shell};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "mudawwana")]
#[command(about = "A single-user blog with AI-assisted drafts")]
#[command(long_about = "\
A single-user blog with AI-assisted drafts

Posts are kept in a local data directory (one file per storage key):

  .mudawwana/
  ├── blog_posts       # JSON array of posts, newest first
  └── theme            # light | dark

A fresh data directory starts with a few default posts. Drafts can be
pre-filled by the Gemini API: set API_KEY in the environment (or
generation.api_key in mudawwana.toml) and pass --autofill to 'new', or use
'autofill' inside 'shell'.

Run 'mudawwana gen-config' for a documented mudawwana.toml.")]
#[command(version)]
struct Cli {
    /// Config file (optional; missing file means defaults)
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Data directory, overriding storage.data_dir from the config
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log record format
    #[arg(long, value_enum, default_value = "compact", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the listing, newest first
    List {
        /// Only posts whose title or category contains this text
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Show one post
    Show {
        /// Post id
        id: String,
    },
    /// Write and publish a new post
    New(NewArgs),
    /// Ask the generation service for a post about TOPIC without saving it
    Generate {
        topic: String,
    },
    /// Show the theme, or toggle it
    Theme {
        #[arg(long)]
        toggle: bool,
    },
    /// Show post counters
    Stats,
    /// List the categories accepted by --category
    Categories,
    /// Write the listing and every post as static HTML
    Export {
        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// Browse and write posts interactively
    Shell,
    /// Print a stock mudawwana.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct NewArgs {
    /// Title; with --autofill it is also the topic sent to the service
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    summary: String,
    /// Body text; "\n" separates paragraphs
    #[arg(long, default_value = "")]
    content: String,
    /// tech | programming | design | ai | business
    #[arg(long)]
    category: Option<Category>,
    /// Cover image URL (defaults to draft.default_image_url)
    #[arg(long)]
    image: Option<String>,
    /// Pre-fill summary and content (and maybe the title) from the service
    #[arg(long)]
    autofill: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(&LogConfig::from_verbosity(cli.verbose).with_format(cli.log_format));

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }
    if let Command::Categories = cli.command {
        for line in output::format_categories() {
            println!("{}", line);
        }
        return Ok(());
    }

    let config = config::load_config(&cli.config)?;
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.storage.data_dir.clone());
    tracing::debug!(data_dir = %data_dir.display(), "opening blog");
    let mut session = Session::open(FileStorage::new(&data_dir), session_options(&config))?;

    match cli.command {
        Command::List { search } => {
            session.search(search.unwrap_or_default());
            output::print_listing(&session.visible_posts(), session.search_term());
        }
        Command::Show { id } => {
            session.select(&id)?;
            if let Some(post) = session.selected_post() {
                output::print_post(post);
            }
        }
        Command::New(args) => {
            session.open_authoring();
            let draft = session.draft_mut();
            draft.title = args.title;
            draft.summary = args.summary;
            draft.content = args.content.replace("\\n", "\n");
            if let Some(category) = args.category {
                draft.category = category;
            }
            if let Some(image) = args.image {
                draft.image_url = image;
            }
            if args.autofill {
                let client = GeminiClient::connect(config.generation.settings())?;
                println!("⏳ generating...");
                session
                    .autofill(&client)
                    .map_err(|e| e.user_message())?;
            }
            let post = session.submit()?;
            println!("==> Published {}", post.id);
            output::print_post(&post);
        }
        Command::Generate { topic } => {
            if topic.trim().is_empty() {
                return Err("topic must not be empty".into());
            }
            let client = GeminiClient::connect(config.generation.settings())?;
            let generated = client
                .generate(topic.trim())
                .map_err(|e| e.user_message())?;
            println!("Title: {}", generated.title.unwrap_or_default());
            println!("Summary: {}", generated.summary.unwrap_or_default());
            println!();
            println!("{}", generated.content.unwrap_or_default());
        }
        Command::Theme { toggle } => {
            if toggle {
                session.toggle_theme()?;
            }
            println!("{}", output::format_theme(session.theme()));
        }
        Command::Stats => {
            output::print_stats(&session.stats());
        }
        Command::Export { output: out_dir } => {
            let pages = render::export(session.posts(), session.theme(), &out_dir)?;
            println!("==> Exported {} pages to {}", pages, out_dir.display());
        }
        Command::Shell => {
            let client = GeminiClient::connect(config.generation.settings())?;
            let stdin = std::io::stdin();
            shell::run(&mut session, &client, stdin.lock(), std::io::stdout())?;
        }
        // Handled before the config was loaded.
        Command::GenConfig | Command::Categories => {}
    }

    Ok(())
}

fn session_options(config: &BlogConfig) -> SessionOptions {
    SessionOptions {
        author: config.author.name.clone(),
        default_image_url: config.draft.default_image_url.clone(),
    }
}
