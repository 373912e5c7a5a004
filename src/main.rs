use anyhow::Result;
use clap::{Parser, Subcommand};
use mealinsights::cli::{self, OutputFormat, parse_date};
use mealinsights_shared::MealType;
use mealinsights_shopping::SortBy;
use time::Date;

/// mealinsights - Shopping lists and nutrition for meal plans
#[derive(Parser)]
#[command(name = "mealinsights")]
#[command(about = "Shopping lists and nutrition totals from a meal plan", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Path to the planner snapshot (overrides config file)
    #[arg(long, global = true)]
    snapshot: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate every ingredient planned in a date range
    ShoppingList {
        #[arg(long, value_parser = parse_date)]
        start: Date,

        #[arg(long, value_parser = parse_date)]
        end: Date,

        /// Meal type to leave out (repeatable)
        #[arg(long)]
        exclude: Vec<MealType>,

        #[arg(long)]
        sort_by: Option<SortBy>,

        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Calories and macros per day
    Nutrition {
        #[arg(long, value_parser = parse_date)]
        start: Date,

        #[arg(long, value_parser = parse_date)]
        end: Date,
    },
    /// Calories and macros for the seven days starting at --start
    Week {
        #[arg(long, value_parser = parse_date)]
        start: Date,
    },
    /// Meals a shopping list would be built from, grouped by day
    Preview {
        #[arg(long, value_parser = parse_date)]
        start: Date,

        #[arg(long, value_parser = parse_date)]
        end: Date,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = mealinsights::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    // Initialize observability (tracing + logging)
    mealinsights::observability::init_observability(
        "mealinsights",
        env!("CARGO_PKG_VERSION"),
        &config.logging,
    )?;

    let service = cli::build_service(&config, cli.snapshot)?;

    let output = match cli.command {
        Commands::ShoppingList {
            start,
            end,
            exclude,
            sort_by,
            format,
        } => {
            let request = cli::shopping_request(&config.shopping, start, end, exclude, sort_by);
            cli::shopping_list(&service, request, format).await?
        }
        Commands::Nutrition { start, end } => cli::nutrition(&service, start, end).await?,
        Commands::Week { start } => cli::week(&service, start).await?,
        Commands::Preview { start, end } => cli::preview(&service, start, end).await?,
    };

    println!("{output}");

    Ok(())
}
