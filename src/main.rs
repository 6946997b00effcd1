mod api;
mod config;
mod form;
mod macros;
mod model;
mod presentation;
mod submission;
mod thumbnail;

use std::path::PathBuf;

use api::{MarketClient, ProductCatalog};
use clap::Parser;
use form::{FormOutcome, ProductArgs, SubmitError};
use log::{debug, info};
use model::ProductId;
use submission::SubmissionBuilder;
use thumbnail::JpegResizer;

#[derive(Parser)]
#[command(name = env!("CARGO_BIN_NAME"))]
#[command(bin_name = env!("CARGO_BIN_NAME"))]
struct Cli {
    #[arg(short = 'c', long, global = true, default_value = "./config.toml")]
    config_path: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    #[command(about = "Prints tool version")]
    #[command(long_about = None)]
    Version,

    #[command(about = "Checks that the catalog server is reachable")]
    #[command(long_about = None)]
    Health,

    #[command(about = "Lists products page by page")]
    #[command(long_about = None)]
    List(ListArgs),

    #[command(about = "Shows product details")]
    #[command(long_about = None)]
    Show { id: ProductId },

    #[command(about = "Registers a new product")]
    #[command(long_about = None)]
    Create(CreateArgs),

    #[command(about = "Edits an existing product")]
    #[command(long_about = None)]
    Edit {
        id: ProductId,

        #[command(flatten)]
        product: ProductArgs,
    },

    #[command(about = "Deletes a product")]
    #[command(long_about = None)]
    Delete {
        id: ProductId,

        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(clap::Args)]
struct ListArgs {
    #[arg(short = 'p', long, default_value_t = 1)]
    page: u32,

    #[arg(long)]
    per_page: Option<u32>,
}

#[derive(clap::Args)]
struct CreateArgs {
    #[command(flatten)]
    product: ProductArgs,

    /// Путь до изображения, можно указать от 1 до 5 раз.
    #[arg(short = 'i', long = "image")]
    images: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Version => {
            println!(env!("CARGO_PKG_VERSION"));
        }
        command => run(command, cli.config_path)?,
    };

    Ok(())
}

fn run(command: Command, config_path: PathBuf) -> anyhow::Result<()> {
    debug!("Подгружаем конфиг из {:?}", config_path);
    let cfg = config::load(config_path)?;

    let client = MarketClient::new(&cfg.base_url, &cfg.identifier)?;
    let builder = SubmissionBuilder::new(cfg.secret.clone());

    match command {
        Command::Version => {}
        Command::Health => {
            client.health_check()?;
            println!("Сервер {} доступен", cfg.base_url);
        }
        Command::List(args) => {
            let per_page = args.per_page.unwrap_or(cfg.items_per_page);
            let page = client.list_products(args.page, per_page)?;

            for line in presentation::render_page(&page) {
                println!("{}", line);
            }
        }
        Command::Show { id } => {
            let details = client.fetch_product(id)?;

            for line in presentation::render_details(&details) {
                println!("{}", line);
            }
        }
        Command::Create(args) => {
            let resizer = JpegResizer::new(cfg.image_size);
            let draft = form::new_draft(&args.product, &args.images, &resizer)?;

            let outcome = form::register(&client, &builder, &draft).map_err(explain)?;
            report(outcome);
        }
        Command::Edit { id, product } => {
            let outcome = form::edit(&client, &builder, id, &product).map_err(explain)?;
            report(outcome);
        }
        Command::Delete { id, yes } => {
            let confirmed = yes
                || inquire::Confirm::new(&format!("Удалить товар {}?", id))
                    .with_default(false)
                    .prompt()?;

            if !confirmed {
                info!("Удаление отменено");
                return Ok(());
            }

            client.delete_product(id, &cfg.secret)?;
            println!("Товар {} удалён", id);
        }
    };

    Ok(())
}

/// Заменяет ошибку валидации понятным пользователю сообщением.
fn explain(err: SubmitError) -> anyhow::Error {
    match err {
        SubmitError::Invalid(e) => anyhow::Error::new(e).context(presentation::validation_message(&e)),
        e => e.into(),
    }
}

fn report(outcome: FormOutcome) {
    match outcome {
        FormOutcome::Registered(p) => {
            println!("Товар зарегистрирован: {}", presentation::render_summary(&p))
        }
        FormOutcome::Updated(p) => println!("Товар изменён: {}", presentation::render_summary(&p)),
        FormOutcome::Unchanged => println!("Изменений нет, товар не отправлялся"),
    }
}
