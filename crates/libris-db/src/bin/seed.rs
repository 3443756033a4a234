//! # Seed Data Generator
//!
//! Populates the database with a test catalog for development.
//!
//! ## Usage
//! ```bash
//! # Generate the full catalog (default)
//! cargo run -p libris-db --bin seed
//!
//! # Generate a custom amount
//! cargo run -p libris-db --bin seed -- --count 50
//!
//! # Specify database path
//! cargo run -p libris-db --bin seed -- --db ./data/libris.db
//! ```
//!
//! Each generated book gets a deterministic price ($9.99 - $24.99), a
//! stock level (0 - 30), and its real publication year. A demo employee
//! (`clerk`) is created so sell flows work out of the box.

use std::env;

use chrono::NaiveDate;
use libris_core::{NewBook, NewUser};
use libris_db::{BookRepository, Database, DbConfig};

/// Title, author, publication year.
const CATALOG: &[(&str, &str, i32)] = &[
    ("Pride and Prejudice", "Jane Austen", 1813),
    ("Frankenstein", "Mary Shelley", 1818),
    ("Jane Eyre", "Charlotte Bronte", 1847),
    ("Wuthering Heights", "Emily Bronte", 1847),
    ("Moby-Dick", "Herman Melville", 1851),
    ("Great Expectations", "Charles Dickens", 1861),
    ("Crime and Punishment", "Fyodor Dostoevsky", 1866),
    ("War and Peace", "Leo Tolstoy", 1869),
    ("Middlemarch", "George Eliot", 1871),
    ("Anna Karenina", "Leo Tolstoy", 1878),
    ("The Brothers Karamazov", "Fyodor Dostoevsky", 1880),
    ("The Picture of Dorian Gray", "Oscar Wilde", 1890),
    ("Dracula", "Bram Stoker", 1897),
    ("Heart of Darkness", "Joseph Conrad", 1899),
    ("The Call of the Wild", "Jack London", 1903),
    ("Dubliners", "James Joyce", 1914),
    ("The Metamorphosis", "Franz Kafka", 1915),
    ("The Trial", "Franz Kafka", 1925),
    ("The Great Gatsby", "F. Scott Fitzgerald", 1925),
    ("Mrs Dalloway", "Virginia Woolf", 1925),
    ("The Sun Also Rises", "Ernest Hemingway", 1926),
    ("To the Lighthouse", "Virginia Woolf", 1927),
    ("Brave New World", "Aldous Huxley", 1932),
    ("Of Mice and Men", "John Steinbeck", 1937),
    ("The Grapes of Wrath", "John Steinbeck", 1939),
    ("Ficciones", "Jorge Luis Borges", 1944),
    ("Animal Farm", "George Orwell", 1945),
    ("Nineteen Eighty-Four", "George Orwell", 1949),
    ("The Catcher in the Rye", "J. D. Salinger", 1951),
    ("The Old Man and the Sea", "Ernest Hemingway", 1952),
    ("Fahrenheit 451", "Ray Bradbury", 1953),
    ("Lord of the Flies", "William Golding", 1954),
    ("Lolita", "Vladimir Nabokov", 1955),
    ("Things Fall Apart", "Chinua Achebe", 1958),
    ("To Kill a Mockingbird", "Harper Lee", 1960),
    ("Catch-22", "Joseph Heller", 1961),
    ("One Hundred Years of Solitude", "Gabriel Garcia Marquez", 1967),
    ("Slaughterhouse-Five", "Kurt Vonnegut", 1969),
    ("Song of Solomon", "Toni Morrison", 1977),
    ("The Name of the Rose", "Umberto Eco", 1980),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = CATALOG.len();
    let mut db_path = String::from("./libris_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(CATALOG.len());
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Libris Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  -c, --count <N>    Number of books to generate (default: {})",
                    CATALOG.len()
                );
                println!("  -d, --db <PATH>    Database file path (default: ./libris_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Libris Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!("Books:    {}", count.min(CATALOG.len()));
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing books
    let existing = db.books().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} books", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating books...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    for (seed, (title, author, year)) in CATALOG.iter().take(count).enumerate() {
        let book = generate_book(title, author, *year, seed);

        if let Err(e) = db.books().save(&book).await {
            eprintln!("Failed to insert {}: {}", book.title, e);
            continue;
        }

        generated += 1;
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} books in {:?}", generated, elapsed);

    // Demo employee for sell flows
    if !db.users().exists_by_username("clerk").await? {
        db.users()
            .insert(&NewUser {
                username: "clerk".to_string(),
                password: "clerk".to_string(),
            })
            .await?;
        println!("✓ Created demo employee 'clerk'");
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single book with deterministic data.
fn generate_book(title: &str, author: &str, year: i32, seed: usize) -> NewBook {
    // Price $9.99 - $24.99, stock 0 - 30
    let price_cents = 999 + ((seed * 53) % 1501) as i64;
    let stock = ((seed * 7) % 31) as i64;

    // Publication day derived from the seed; year is the real one
    let month = (seed % 12) as u32 + 1;
    let day = (seed % 28) as u32 + 1;
    let publication_date = NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or_default());

    NewBook {
        title: title.to_string(),
        author: author.to_string(),
        price_cents,
        stock,
        publication_date,
    }
}
