use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use domain::{GenreFilter, MovieRecord, Role, Settings, TmdbSettings, MOVIE_GENRES, NO_TRAILER};
use engine::{RecommendationEngine, Transcript};
use metadata::{MetadataResolver, TitleResolver};
use std::io::Write;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

/// Reel Chat - conversational movie recommendations
#[derive(Parser, Debug)]
#[command(name = "reel-chat")]
#[command(
    about = "Movie recommendations from a language model, checked against TMDB",
    long_about = None
)]
struct Cli {
    /// Only keep movies tagged with this genre (repeatable)
    #[arg(short, long = "genre", global = true)]
    genres: Vec<String>,

    /// Print machine-readable JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get recommendations for a single request
    Recommend {
        /// What you are in the mood for
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Start an interactive conversation
    Chat,

    /// Look up one title and show its details
    Search {
        /// Movie title to resolve
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },

    /// List the genres that can be used with --genre
    Genres,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let genres = genre_filter(&cli.genres);

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend { text } => handle_recommend(&text.join(" "), &genres, cli.json).await?,
        Commands::Chat => handle_chat(genres, cli.json).await?,
        Commands::Search { title } => handle_search(&title.join(" "), cli.json).await?,
        Commands::Genres => handle_genres(cli.json)?,
    }

    Ok(())
}

fn load_settings() -> Result<Settings> {
    Settings::from_env().context("Failed to load configuration (check your .env file)")
}

/// Map the genre shortcuts people type to TMDB genre names
fn normalize_genre(raw: &str) -> String {
    let genre = raw.trim().to_lowercase();
    match genre.as_str() {
        "scifi" | "sci-fi" => "science fiction".to_string(),
        _ => genre,
    }
}

fn genre_filter<I, S>(raw: I) -> GenreFilter
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    GenreFilter::new(raw.into_iter().map(|g| normalize_genre(g.as_ref())))
}

/// Handle the 'recommend' command
async fn handle_recommend(text: &str, genres: &GenreFilter, json: bool) -> Result<()> {
    let engine = RecommendationEngine::from_settings(&load_settings()?)?;
    let mut transcript = Transcript::new();

    let start = Instant::now();
    let movies = engine.recommend(text, genres, &mut transcript).await;
    debug!("Request finished in {:?}", start.elapsed());

    if json {
        let output = serde_json::json!({
            "movies": movies,
            "transcript": transcript,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if let Some(reply) = transcript.last() {
        print_reply(reply.content());
    }
    print_movies(&movies);
    Ok(())
}

/// Handle the 'chat' command
async fn handle_chat(mut genres: GenreFilter, json: bool) -> Result<()> {
    let engine = RecommendationEngine::from_settings(&load_settings()?)?;
    let mut transcript = Transcript::with_greeting();

    if let Some(greeting) = transcript.last() {
        print_reply(greeting.content());
    }
    println!(
        "{}",
        "Type /genres a,b to change the genre filter, /quit to exit.".dimmed()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", ">".bold().green());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        if line.is_empty() {
            continue;
        }
        if line == "/quit" {
            break;
        }
        if let Some(rest) = line.strip_prefix("/genres") {
            genres = genre_filter(rest.split(','));
            if genres.is_empty() {
                println!("{}", "Genre filter cleared".yellow());
            } else {
                println!("{} {}", "Filtering on:".yellow(), genres.join(", "));
            }
            continue;
        }

        let movies = engine.recommend(line, &genres, &mut transcript).await;

        if json {
            println!("{}", serde_json::to_string(&movies)?);
            continue;
        }
        if let Some(reply) = transcript.last() {
            print_reply(reply.content());
        }
        print_movies(&movies);
    }

    let exchanged = transcript.iter().filter(|m| m.role() == Role::User).count();
    debug!("Chat ended after {} requests", exchanged);
    Ok(())
}

/// Handle the 'search' command
async fn handle_search(title: &str, json: bool) -> Result<()> {
    let settings = TmdbSettings::from_env()
        .context("Failed to load TMDB configuration (check your .env file)")?;
    let resolver = MetadataResolver::from_settings(&settings)?;

    let movie = resolver
        .resolve(title)
        .await
        .with_context(|| format!("Failed to look up '{}'", title))?;

    match (movie, json) {
        (Some(movie), true) => println!("{}", serde_json::to_string_pretty(&movie)?),
        (None, true) => println!("null"),
        (Some(movie), false) => print_movie(1, &movie),
        (None, false) => println!("{}", format!("No match for '{}'", title).yellow()),
    }
    Ok(())
}

/// Handle the 'genres' command
fn handle_genres(json: bool) -> Result<()> {
    if json {
        let table: Vec<_> = MOVIE_GENRES
            .iter()
            .map(|(id, name)| serde_json::json!({"id": id, "name": name}))
            .collect();
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    println!("{}", "Available genres:".bold().blue());
    for (id, name) in MOVIE_GENRES {
        println!("{}{} ({})", "• ".green(), name, id);
    }
    Ok(())
}

fn print_reply(content: &str) {
    println!("\n{}\n{}\n", "Assistant:".bold().cyan(), content);
}

/// Helper function to format and print a list of movies
fn print_movies(movies: &[MovieRecord]) {
    if movies.is_empty() {
        return;
    }
    println!("{}", "Movie Recommendations:".bold().blue());
    for (index, movie) in movies.iter().enumerate() {
        print_movie(index + 1, movie);
    }
}

fn print_movie(rank: usize, movie: &MovieRecord) {
    let year = movie
        .release_year()
        .map(|y| format!(" ({})", y))
        .unwrap_or_default();
    println!(
        "{}. {}{} - {:.1}/10 ({} votes)",
        rank.to_string().green(),
        movie.title.bold(),
        year,
        movie.vote_average,
        movie.vote_count
    );

    if !movie.genre_tags().is_empty() {
        println!("   Genres: {}", movie.genre_tags().join(", "));
    }
    if let Some(runtime) = movie.formatted_runtime() {
        println!("   Runtime: {}", runtime);
    }
    println!("   Director: {}", movie.director);
    println!("   Cast: {}", movie.cast.join(", "));
    if movie.trailer_link != NO_TRAILER {
        println!("   Trailer: {}", movie.trailer_link.underline());
    }
    if !movie.streaming.is_empty() {
        println!("   Streaming on:");
        for offer in &movie.streaming {
            match offer.logo_url() {
                Some(logo) => println!("     - {} ({})", offer.provider_name, logo.dimmed()),
                None => println!("     - {}", offer.provider_name),
            }
        }
    }
    println!("   {}", movie.overview.dimmed());
}
