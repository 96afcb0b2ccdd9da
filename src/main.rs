use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fieldscope::fetch::{FsFetcher, load_field_options};
use fieldscope::render::{BarRenderer, HtmlBarChart};
use fieldscope::{CategoryCatalog, Effect, QueryBuilder, Result, SelectionMachine};

#[derive(Parser)]
#[command(name = "fieldscope")]
#[command(about = "Build openFDA count queries from dataset field schemas", long_about = None)]
struct Cli {
    /// Catalog JSON (category -> dataset -> {query_token, schema_location}).
    /// Defaults to the built-in openFDA catalog.
    #[arg(long, global = true)]
    catalog: Option<String>,

    /// Directory that schema locations are resolved against.
    #[arg(long, global = true, default_value = ".")]
    schema_dir: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List categories.
    Categories,

    /// List the datasets of a category.
    Datasets {
        #[arg(long)]
        category: String,
    },

    /// List the queryable field paths of a dataset.
    Fields {
        #[arg(long)]
        category: String,

        #[arg(long)]
        dataset: String,
    },

    /// Print the count query locator for a field.
    Query {
        #[arg(long)]
        category: String,

        #[arg(long)]
        dataset: String,

        #[arg(long)]
        field: String,

        #[arg(long)]
        api_root: Option<String>,
    },

    /// Render query results (JSON) as an HTML bar chart.
    Plot {
        #[arg(long)]
        results: String,

        #[arg(short = 'o', long)]
        out: String,

        #[arg(long, default_value = "Count")]
        title: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let catalog = match &cli.catalog {
        Some(path) => CategoryCatalog::from_file(path)?,
        None => CategoryCatalog::openfda(),
    };
    let fetcher = FsFetcher::new(&cli.schema_dir);
    let mut machine = SelectionMachine::new(catalog);

    match cli.cmd {
        Commands::Categories => {
            for name in machine.catalog().category_names() {
                println!("{}", name);
            }
        }
        Commands::Datasets { category } => {
            for effect in machine.choose_category(&category)? {
                if let Effect::ReplaceDatasetOptions(names) = effect {
                    for name in names {
                        println!("{}", name);
                    }
                }
            }
        }
        Commands::Fields { category, dataset } => {
            for field in load_fields(&mut machine, &fetcher, &category, &dataset).await? {
                println!("{}", field);
            }
        }
        Commands::Query {
            category,
            dataset,
            field,
            api_root,
        } => {
            load_fields(&mut machine, &fetcher, &category, &dataset).await?;
            machine.choose_field(&field)?;

            let builder = api_root
                .as_deref()
                .map(QueryBuilder::with_api_root)
                .unwrap_or_default();
            println!("{}", builder.build(machine.selection(), machine.catalog())?);
        }
        Commands::Plot {
            results,
            out,
            title,
        } => {
            let text = std::fs::read_to_string(&results)
                .with_context(|| format!("read results file {}", results))?;
            let series = fieldscope::results::parse_query_results(&text)
                .with_context(|| format!("invalid results file {}", results))?
                .to_bar_series();

            let mut chart = HtmlBarChart::new(title);
            chart.render_bar_series(&series.categories, &series.values)?;
            chart.write_to(&out)?;
            println!("Wrote {}", out);
        }
    }

    Ok(())
}

/// Walk the machine to `DatasetChosen` and wait for the dataset's field list.
async fn load_fields(
    machine: &mut SelectionMachine,
    fetcher: &FsFetcher,
    category: &str,
    dataset: &str,
) -> Result<Vec<String>> {
    machine.choose_category(category)?;
    let (request, _) = machine.choose_dataset(dataset)?;
    load_field_options(machine, fetcher, request).await?;
    Ok(machine.field_options().to_vec())
}
