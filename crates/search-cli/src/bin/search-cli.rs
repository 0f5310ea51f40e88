use std::fs;
use std::io::{self, BufRead};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use search_index::{Hit, Index, Status};
use search_cli::{paginate, remove_duplicates};
use serde::Serialize;

#[derive(Parser)]
#[command(author, version, about = "In-memory TF-IDF search index CLI", long_about = None)]
struct Cli {
    /// Space-separated stop words to filter out of documents and queries.
    #[arg(long, default_value = "")]
    stop_words: String,

    /// File of documents to seed the index with, one per line:
    /// `id status rating1,rating2,... text...`. Reads stdin if omitted.
    #[arg(long)]
    documents: Option<String>,

    /// Page size for printed result lists.
    #[arg(long, default_value_t = 5)]
    page_size: usize,

    /// Print `search`/`match`/`frequencies` output as JSON instead of the
    /// plain-text display form.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a single document (in addition to any seeded via --documents).
    Add {
        id: i64,
        #[arg(value_enum)]
        status: CliStatus,
        /// Comma-separated integer ratings, e.g. "1,2,3".
        #[arg(default_value = "")]
        ratings: String,
        text: String,
    },
    /// Rank documents against a query (default status: Actual).
    Search { query: String },
    /// List which of a query's plus words a document contains.
    Match { query: String, id: i64 },
    /// Print a document's word -> term-frequency table.
    Frequencies { id: i64 },
    /// Remove a document by id.
    Remove { id: i64 },
    /// Remove documents with duplicate vocabulary.
    Dedupe,
    /// Print the number of indexed documents.
    Count,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum CliStatus {
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

impl From<CliStatus> for Status {
    fn from(status: CliStatus) -> Status {
        match status {
            CliStatus::Actual => Status::Actual,
            CliStatus::Irrelevant => Status::Irrelevant,
            CliStatus::Banned => Status::Banned,
            CliStatus::Removed => Status::Removed,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    let cli = Cli::parse();
    let mut index = Index::from_stop_words_text(&cli.stop_words)
        .context("building index from --stop-words")?;
    load_documents(&mut index, cli.documents.as_deref())?;

    match &cli.command {
        Commands::Add { id, status, ratings, text } => run_add(&mut index, *id, *status, ratings, text)?,
        Commands::Search { query } => run_search(&index, query, cli.page_size, cli.json)?,
        Commands::Match { query, id } => run_match(&index, query, *id, cli.json)?,
        Commands::Frequencies { id } => run_frequencies(&index, *id, cli.json)?,
        Commands::Remove { id } => run_remove(&mut index, *id),
        Commands::Dedupe => run_dedupe(&mut index),
        Commands::Count => println!("{}", index.document_count()),
    }

    Ok(())
}

/// JSON mirror of [`Hit`] (the original's `Display` form is plain text, so
/// this is a separate wire type rather than a `#[derive(Serialize)]` on
/// `Hit` itself).
#[derive(Serialize)]
struct HitJson {
    document_id: i64,
    relevance: f64,
    rating: i64,
}

impl From<&Hit> for HitJson {
    fn from(hit: &Hit) -> Self {
        Self { document_id: hit.id, relevance: hit.relevance, rating: hit.rating }
    }
}

#[derive(Serialize)]
struct MatchJson {
    words: Vec<String>,
    status: String,
}

#[derive(Serialize)]
struct FrequencyJson {
    word: String,
    tf: f64,
}

fn run_add(index: &mut Index, id: i64, status: CliStatus, ratings: &str, text: &str) -> Result<()> {
    let _span = tracing::info_span!("add_document", id).entered();
    let ratings = parse_ratings(ratings)?;
    index.add_document(id, text, status.into(), &ratings).context("adding document")?;
    Ok(())
}

fn parse_ratings(text: &str) -> Result<Vec<i64>> {
    text.split(',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<i64>().context("rating must be an integer"))
        .collect()
}

fn load_documents(index: &mut Index, path: Option<&str>) -> Result<()> {
    let _span = tracing::info_span!("load_documents").entered();
    let text;
    let lines: Box<dyn Iterator<Item = io::Result<String>> + '_> = match path {
        Some(path) => {
            text = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            Box::new(text.lines().map(|line| Ok(line.to_string())))
        }
        None => Box::new(io::stdin().lock().lines()),
    };

    for (line_no, line) in lines.enumerate() {
        let line = line.context("reading a document line")?;
        if line.trim().is_empty() {
            continue;
        }
        let (id, status, ratings, text) = parse_document_line(&line)
            .with_context(|| format!("parsing document line {}", line_no + 1))?;
        index
            .add_document(id, text, status, &ratings)
            .with_context(|| format!("indexing document {id}"))?;
    }
    Ok(())
}

fn parse_document_line(line: &str) -> Result<(i64, Status, Vec<i64>, &str)> {
    let mut parts = line.splitn(4, ' ');
    let id: i64 = parts
        .next()
        .context("missing document id")?
        .parse()
        .context("document id must be an integer")?;
    let status = match parts.next().context("missing status")? {
        "Actual" => Status::Actual,
        "Irrelevant" => Status::Irrelevant,
        "Banned" => Status::Banned,
        "Removed" => Status::Removed,
        other => bail!("unknown status {other:?}"),
    };
    let ratings = parse_ratings(parts.next().context("missing ratings")?)?;
    let text = parts.next().context("missing document text")?;
    Ok((id, status, ratings, text))
}

fn run_search(index: &Index, query: &str, page_size: usize, json: bool) -> Result<()> {
    let _span = tracing::info_span!("search", query).entered();
    let hits = index.find_top_default(query)?;
    if json {
        let hits_json: Vec<HitJson> = hits.iter().map(HitJson::from).collect();
        println!("{}", serde_json::to_string(&hits_json).context("serializing hits")?);
    } else {
        print_paged(&hits, page_size);
    }
    Ok(())
}

fn run_match(index: &Index, query: &str, id: i64, json: bool) -> Result<()> {
    let _span = tracing::info_span!("match_document", query, id).entered();
    let (words, status) = index.match_document(query, id)?;
    if json {
        let payload = MatchJson { words, status: format!("{status:?}") };
        println!("{}", serde_json::to_string(&payload).context("serializing match result")?);
    } else {
        println!("{words:?} {status:?}");
    }
    Ok(())
}

fn run_frequencies(index: &Index, id: i64, json: bool) -> Result<()> {
    let _span = tracing::info_span!("get_word_frequencies", id).entered();
    let freqs = index.get_word_frequencies(id)?;
    if json {
        let freqs_json: Vec<FrequencyJson> = freqs
            .into_iter()
            .map(|(word, tf)| FrequencyJson { word, tf })
            .collect();
        println!("{}", serde_json::to_string(&freqs_json).context("serializing frequencies")?);
    } else {
        for (word, tf) in freqs {
            println!("{word}\t{tf}");
        }
    }
    Ok(())
}

fn run_remove(index: &mut Index, id: i64) {
    let _span = tracing::info_span!("remove_document", id).entered();
    index.remove_document(id);
}

fn run_dedupe(index: &mut Index) {
    let _span = tracing::info_span!("remove_duplicates").entered();
    remove_duplicates(index, |id| println!("Found duplicate document id {id}"));
}

fn print_paged(hits: &[Hit], page_size: usize) {
    for (page_no, page) in paginate(hits, page_size).enumerate() {
        if page_no > 0 {
            println!("Page {}", page_no + 1);
        }
        for hit in page {
            println!("{hit}");
        }
    }
}
