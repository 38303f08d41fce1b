use crate::infra::{build_service, storage_with_override};
use clap::Args;
use std::path::{Path, PathBuf};
use wellness_advisor::config::AppConfig;
use wellness_advisor::error::AppError;
use wellness_advisor::recommendations::{
    AnswerRecord, Catalog, RecommendationOutcome, UserId,
};
use wellness_advisor::telemetry::{self, LogSink};

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Questionnaire answers: a path to a JSON file or an inline JSON object
    #[arg(long)]
    pub(crate) answers: String,
    /// User the assessment is recorded against
    #[arg(long, default_value = "cli-user")]
    pub(crate) user: String,
    /// JSON profile store to record the assessment in (overrides APP_PROFILE_STORE)
    #[arg(long)]
    pub(crate) store: Option<PathBuf>,
    /// Print the full outcome as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    /// Print the catalog as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        answers,
        user,
        store,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, LogSink::Stderr)?;

    let answers = load_answers(&answers)?;
    let storage = storage_with_override(&config.storage, store);
    let service = build_service(&storage, &config.recommendation)?;
    let outcome = service.recommend(&UserId(user), answers)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", render_outcome(&outcome));
    }
    Ok(())
}

pub(crate) fn run_catalog(args: CatalogArgs) -> Result<(), AppError> {
    let catalog = Catalog::standard()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(catalog.items())?);
    } else {
        print!("{}", render_catalog(&catalog));
    }
    Ok(())
}

/// Inline objects start with `{`; anything else is read as a file path.
pub(crate) fn load_answers(raw: &str) -> Result<AnswerRecord, AppError> {
    let trimmed = raw.trim();
    if trimmed.starts_with('{') {
        return Ok(serde_json::from_str(trimmed)?);
    }
    let bytes = std::fs::read(Path::new(trimmed))?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub(crate) fn render_outcome(outcome: &RecommendationOutcome) -> String {
    let mut out = format!("Recommendations for {}\n", outcome.user_id);

    if outcome.matched_archetypes.is_empty() {
        out.push_str("Profile: no archetype matched\n");
    } else {
        out.push_str(&format!(
            "Profile: {}\n",
            outcome.matched_archetypes.join(", ")
        ));
    }

    for (rank, recommended) in outcome.recommendations.iter().enumerate() {
        let item = &recommended.item;
        out.push_str(&format!(
            "{}. {} [{}] score {:.2}\n",
            rank + 1,
            item.name,
            item.category.label(),
            recommended.score
        ));
        out.push_str(&format!("   {} | {}\n", item.dosage, item.timing));
    }

    if !outcome.warnings.is_empty() {
        out.push_str("Warnings:\n");
        for warning in &outcome.warnings {
            out.push_str(&format!("  - {warning}\n"));
        }
    }
    out
}

pub(crate) fn render_catalog(catalog: &Catalog) -> String {
    let mut out = format!("Supplement catalog ({} items)\n", catalog.len());
    for item in catalog.items() {
        out.push_str(&format!(
            "- {} ({}) [{}]\n",
            item.name,
            item.id,
            item.category.label()
        ));
    }
    out
}
