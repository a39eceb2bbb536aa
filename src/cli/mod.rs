// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and prints results. All work is
// delegated to Layer 2.
//
//   `annotate` — annotate a table or PDF, print one page of
//                results, the totals overview and the top-N
//                rankings, then write the CSV exports
//   `entities` — print the ranked Entity/Count list of one
//                category

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{AnnotateArgs, Commands, EntitiesArgs};

use crate::application::annotate_use_case::{AnnotateUseCase, PipelineConfig};
use crate::domain::counts::CategoryOverview;
use crate::domain::mention::Category;
use crate::domain::store::Page;

/// Widest bar in the ranking charts
const BAR_WIDTH: usize = 40;

#[derive(Parser, Debug)]
#[command(
    name = "seaweed-ner",
    version = "0.1.0",
    about = "Highlight and count seaweed and location mentions in abstracts and papers."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Annotate(args) => run_annotate(args),
            Commands::Entities(args) => run_entities(args),
        }
    }
}

fn run_annotate(args: AnnotateArgs) -> Result<()> {
    let page = args.page.saturating_sub(1) as i64;
    let config: PipelineConfig = args.into();
    tracing::info!("Annotating '{}'", config.input.display());

    let mut use_case = AnnotateUseCase::new(config)?;
    let written      = use_case.execute()?;
    let top_n        = use_case.config().top_n;

    let session = use_case.session_mut();
    print_page(&session.get_page(page));
    if session.get_totals().is_empty() {
        println!("\nNo SEAWEED or LOCATION entities found.");
    }
    print_overview(&session.overview());
    for category in Category::counted() {
        print_ranking(category, &session.top_entities(category, top_n));
    }

    if !written.is_empty() {
        println!("\nExports:");
        for path in written {
            println!("  {}", path.display());
        }
    }
    Ok(())
}

fn run_entities(args: EntitiesArgs) -> Result<()> {
    let category: Category = args.category.into();
    let mut use_case = AnnotateUseCase::new(args.into())?;
    use_case.execute()?;

    let counts = use_case.session().get_detailed_counts(category);
    println!("{:<32} {:>7}", "Entity", "Count");
    for (entity, count) in counts {
        println!("{entity:<32} {count:>7}");
    }
    Ok(())
}

// ─── Printing ─────────────────────────────────────────────────────────────────

fn print_page(page: &Page<'_>) {
    if page.rows.is_empty() {
        println!("No results.");
        return;
    }
    println!("Page {} of {}", page.index + 1, page.total_pages);

    for row in &page.rows {
        let r = row.record;
        println!(
            "\n{}. [#{}] {}",
            row.display_no,
            r.sequence_no,
            r.title.as_deref().unwrap_or("(untitled)")
        );
        println!("   {}", r.annotated_abstract);
        println!("   Seaweed:  {}", r.summary.seaweed.summary_line());
        println!("   Location: {}", r.summary.location.summary_line());
    }
}

fn print_overview(overview: &[CategoryOverview]) {
    println!("\n{:<12} {:>16} {:>18}", "Entity Type", "Unique Entities", "Total Occurrences");
    for row in overview {
        println!(
            "{:<12} {:>16} {:>18}",
            row.category.label(),
            row.unique_entities,
            row.total_occurrences
        );
    }
}

/// Horizontal bar chart, longest bar = highest count
fn print_ranking(category: Category, ranking: &[(String, usize)]) {
    println!("\nTop {} {} entities", ranking.len(), category.label());
    let max = ranking.first().map(|(_, c)| *c).unwrap_or(0).max(1);
    let width = ranking.iter().map(|(e, _)| e.chars().count()).max().unwrap_or(0);

    for (entity, count) in ranking {
        let bar = "█".repeat((count * BAR_WIDTH).div_ceil(max));
        println!("  {entity:<width$} {bar} {count}");
    }
}
