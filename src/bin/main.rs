use anyhow::Context;
use crossterm::style::Stylize;
use recommender_core::core::catalog::Catalog;
use recommender_core::core::types::Recommendation;
use recommender_core::{Config, Recommender};
use std::io::{stdin, stdout, Write};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env().context("failed to load configuration")?;
    let catalog = Catalog::from_csv(&config.dataset_path)
        .with_context(|| format!("failed to load '{}'", config.dataset_path.display()))?;
    let recommender = Recommender::open(catalog, &config)?;

    println!("{}", "Movie Recommendation App".bold());
    println!("Type a movie title and press [Enter]. 'exit' to quit.");
    println!("---------------------------------------------------------------");

    loop {
        print!("\nEnter your favorite movie: ");
        stdout().flush()?;

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }
        let query = input.trim();

        match query {
            "exit" => break,
            "" => warn("Please enter a movie title first."),
            _ => match recommender.recommend(query, config.top_k) {
                Ok(recs) if recs.is_empty() => warn(&format!(
                    "Sorry, no recommendations found for '{query}'. Please try another movie."
                )),
                Ok(recs) => print_recommendations(query, &recs),
                Err(e) if e.is_warning() => warn(&e.to_string()),
                Err(e) => return Err(e.into()),
            },
        }
    }
    Ok(())
}

fn warn(message: &str) {
    println!("{}", message.yellow());
}

fn print_recommendations(query: &str, recs: &[Recommendation]) {
    println!("{}", format!("Recommended movies for '{query}':").cyan());
    for (i, rec) in recs.iter().enumerate() {
        println!("{}", format!("  {}. {} ({})", i + 1, rec.title, rec.year).green());
    }
}
